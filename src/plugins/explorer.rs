//! File explorer plugin
//!
//! Directory listings are read on a worker thread; a new refresh cancels the
//! one still running.

use std::path::PathBuf;

use crate::plugin::{Listeners, PaneSetup, Plugin, PluginContext, PluginId};
use crate::worker::{boxed, TaskEvent, TaskOutput};

use super::ids;

pub const REFRESH: &str = "refresh";
const LIST_TASK: &str = "list_directory";

#[derive(Debug)]
pub struct Explorer {
    root: PathBuf,
    entries: Vec<PathBuf>,
    loading: bool,
    editor_available: bool,
}

impl Explorer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
            loading: false,
            editor_available: false,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_editor_available(&self) -> bool {
        self.editor_available
    }

    fn refresh(&mut self, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        let root = self.root.clone();
        cx.spawn_task(LIST_TASK, move |task| {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(&root)? {
                task.checkpoint()?;
                entries.push(entry?.path());
            }
            entries.sort();
            Ok(boxed(entries))
        })?;
        self.loading = true;
        Ok(())
    }

    fn on_editor_available(&mut self, _target: &PluginId, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        self.editor_available = true;
        self.refresh(cx)
    }
}

impl Plugin for Explorer {
    fn title(&self) -> String {
        "Files".to_string()
    }

    fn icon(&self) -> String {
        "folder".to_string()
    }

    fn setup(&mut self, pane: &mut PaneSetup<'_>) -> anyhow::Result<()> {
        let refresh = pane.create_action(REFRESH, "Refresh", "main_widget");
        pane.add_to_options_menu(&refresh, "view");
        Ok(())
    }

    fn empty_message(&self) -> Option<String> {
        Some("This folder is empty".to_string())
    }

    fn has_content(&self) -> bool {
        !self.entries.is_empty()
    }

    fn on_action(&mut self, action: &str, _checked: bool, cx: &mut PluginContext<'_>) -> anyhow::Result<()> {
        match action {
            REFRESH => self.refresh(cx),
            other => anyhow::bail!("unknown explorer action '{}'", other),
        }
    }

    fn on_task_event(
        &mut self,
        task: &str,
        event: TaskEvent<TaskOutput>,
        cx: &mut PluginContext<'_>,
    ) -> anyhow::Result<()> {
        if task != LIST_TASK {
            return Ok(());
        }
        match event {
            TaskEvent::Finished(output) => {
                let entries = output
                    .downcast::<Vec<PathBuf>>()
                    .map_err(|_| anyhow::anyhow!("listing task returned something else"))?;
                self.entries = *entries;
                self.loading = false;
            }
            TaskEvent::Failed(e) => {
                self.loading = false;
                if !matches!(e, crate::error::RuntimeError::UserCancelled) {
                    cx.show_status_message(format!("Cannot list {}: {}", self.root.display(), e));
                }
            }
            TaskEvent::Progress { .. } => {}
        }
        Ok(())
    }

    fn listeners() -> Listeners<Self> {
        Listeners::new().on_available(ids::EDITOR, "on_editor_available", Explorer::on_editor_available)
    }
}
