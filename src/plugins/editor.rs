//! Editor plugin: a list of open files
//!
//! Saving runs on a worker thread and reports back through
//! `on_task_event`.

use std::path::{Path, PathBuf};

use crate::container::{DockableContainer, ToolbarItem, MAIN_TOOLBAR};
use crate::error::RuntimeError;
use crate::plugin::{Listeners, PaneSetup, Plugin, PluginContext, PluginId};
use crate::worker::{boxed, TaskEvent, TaskOutput};

use super::ids;

pub const NEW_FILE: &str = "new_file";
pub const SAVE: &str = "save";
pub const CLOSE_FILE: &str = "close_file";

const SAVE_TASK: &str = "save";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
    /// `None` until saved under a name
    pub path: Option<PathBuf>,
    pub text: String,
    pub modified: bool,
}

impl OpenFile {
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    }
}

#[derive(Debug, Default)]
pub struct Editor {
    files: Vec<OpenFile>,
    current: Option<usize>,
    /// Files to open once the pane is set up
    pending: Vec<PathBuf>,
    console_available: bool,
    saving: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor that opens `paths` during setup
    pub fn with_files(paths: Vec<PathBuf>) -> Self {
        Self {
            pending: paths,
            ..Self::default()
        }
    }

    pub fn files(&self) -> &[OpenFile] {
        &self.files
    }

    pub fn current(&self) -> Option<&OpenFile> {
        self.current.and_then(|i| self.files.get(i))
    }

    pub fn current_mut(&mut self) -> Option<&mut OpenFile> {
        self.current.and_then(|i| self.files.get_mut(i))
    }

    pub fn is_console_available(&self) -> bool {
        self.console_available
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Open `path`, or focus it if already open
    pub fn open(&mut self, path: &Path) {
        if let Some(idx) = self
            .files
            .iter()
            .position(|f| f.path.as_deref() == Some(path))
        {
            self.current = Some(idx);
            return;
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("{} does not exist yet, opening empty", path.display());
                String::new()
            }
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", path.display(), e);
                return;
            }
        };

        tracing::info!("Opened {}", path.display());
        self.files.push(OpenFile {
            path: Some(path.to_path_buf()),
            text,
            modified: false,
        });
        self.current = Some(self.files.len() - 1);
    }

    pub fn new_file(&mut self) {
        self.files.push(OpenFile {
            path: None,
            text: String::new(),
            modified: false,
        });
        self.current = Some(self.files.len() - 1);
    }

    pub fn close_current(&mut self) -> Option<OpenFile> {
        let idx = self.current?;
        let closed = self.files.remove(idx);
        self.current = if self.files.is_empty() {
            None
        } else {
            Some(idx.min(self.files.len() - 1))
        };
        Some(closed)
    }

    fn save_current(&mut self, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        let Some(file) = self.current() else {
            return Ok(());
        };
        let Some(path) = file.path.clone() else {
            cx.show_status_message("Untitled files cannot be saved yet");
            return Ok(());
        };
        let text = file.text.clone();

        cx.spawn_task(SAVE_TASK, move |task| {
            task.checkpoint()?;
            std::fs::write(&path, text)?;
            Ok(boxed(path))
        })?;
        self.saving = true;
        Ok(())
    }

    fn on_console_available(&mut self, _target: &PluginId, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.console_available = true;
        Ok(())
    }

    fn on_console_teardown(&mut self, _target: &PluginId, _cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.console_available = false;
        Ok(())
    }
}

impl Plugin for Editor {
    fn title(&self) -> String {
        "Editor".to_string()
    }

    fn icon(&self) -> String {
        "edit".to_string()
    }

    fn setup(&mut self, pane: &mut PaneSetup<'_>) -> anyhow::Result<()> {
        let new_file = pane.create_action(NEW_FILE, "New file", "_");
        let save = pane.create_action(SAVE, "Save", "_");
        let close = pane.create_action(CLOSE_FILE, "Close", "_");

        pane.add_item_to_toolbar(ToolbarItem::from(&new_file), MAIN_TOOLBAR, Some("file"), None)?;
        pane.add_item_to_toolbar(ToolbarItem::from(&save), MAIN_TOOLBAR, Some("file"), None)?;
        pane.add_to_options_menu(&close, "file");

        for path in std::mem::take(&mut self.pending) {
            self.open(&path);
        }
        Ok(())
    }

    fn update_actions(&mut self, container: &DockableContainer) {
        let has_file = self.current.is_some();
        if let Some(save) = container.action(SAVE) {
            save.set_enabled(has_file && !self.saving);
        }
        if let Some(close) = container.action(CLOSE_FILE) {
            close.set_enabled(has_file);
        }
    }

    fn can_close(&self) -> bool {
        !self.files.iter().any(|f| f.modified)
    }

    fn focus_widget(&self) -> Option<String> {
        Some("code_editor".to_string())
    }

    fn raise_and_focus(&self) -> bool {
        true
    }

    fn empty_message(&self) -> Option<String> {
        Some("No open files".to_string())
    }

    fn has_content(&self) -> bool {
        !self.files.is_empty()
    }

    fn on_action(&mut self, action: &str, _checked: bool, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        match action {
            NEW_FILE => self.new_file(),
            SAVE => self.save_current(cx)?,
            CLOSE_FILE => {
                if let Some(file) = self.close_current() {
                    tracing::debug!(file = %file.name(), "closed file");
                }
            }
            other => anyhow::bail!("unknown editor action '{}'", other),
        }
        Ok(())
    }

    fn on_task_event(
        &mut self,
        task: &str,
        event: TaskEvent<TaskOutput>,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        if task != SAVE_TASK || !event.is_terminal() {
            return Ok(());
        }
        self.saving = false;

        match event {
            TaskEvent::Finished(output) => {
                let path = output
                    .downcast::<PathBuf>()
                    .map_err(|_| anyhow::anyhow!("save task returned something else"))?;
                if let Some(file) = self.files.iter_mut().find(|f| f.path.as_ref() == Some(&*path)) {
                    file.modified = false;
                }
                cx.show_status_message(format!("Saved {}", path.display()));
            }
            TaskEvent::Failed(RuntimeError::UserCancelled) => {}
            TaskEvent::Failed(e) => {
                cx.show_status_message(format!("Save failed: {}", e));
            }
            TaskEvent::Progress { .. } => {}
        }
        Ok(())
    }

    fn listeners() -> Listeners<Self> {
        Listeners::new()
            .on_available(ids::CONSOLE, "on_console_available", Editor::on_console_available)
            .on_teardown(ids::CONSOLE, "on_console_teardown", Editor::on_console_teardown)
    }
}
