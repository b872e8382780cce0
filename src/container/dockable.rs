//! The per-plugin dockable container
//!
//! A `DockableContainer` owns everything around a plugin's content: the main
//! and auxiliary toolbars, the options menu, the corner region, the default
//! pane actions and the empty-state overlay. Where the container currently
//! lives (docked, floating, hidden) is tracked by the host frame; operations
//! that move it are in `pane.rs`.

use std::rc::Rc;

use super::corner::{CornerWidget, OPTIONS_BUTTON};
use super::toolbar::{Toolbar, ToolbarItem};
use crate::actions::{Action, Context, Menu, Owner, ToolButton, UiRegistry, BOTTOM_SECTION};
use crate::error::{Result, RuntimeError};
use crate::host::DockArea;
use crate::messages::{Msg, PaneMsg};
use crate::plugin::{PluginDescriptor, PluginId};

/// Context under which a container registers its own UI objects
pub const MAIN_WIDGET_CONTEXT: &str = "main_widget";

pub const MAIN_TOOLBAR: &str = "main_toolbar";
pub const OPTIONS_MENU: &str = "options_menu";

pub const CLOSE_PANE: &str = "close_pane";
pub const DOCK_PANE: &str = "dock_pane";
pub const UNDOCK_PANE: &str = "undock_pane";
pub const LOCK_UNLOCK_POSITION: &str = "lock_unlock_position";

/// Id of the "show this pane" action of a plugin
pub fn toggle_view_action_id(plugin: &PluginId) -> String {
    format!("switch to {}", plugin)
}

const LOCK_TEXT: &str = "Lock position";
const UNLOCK_TEXT: &str = "Unlock position";

/// Text of the lock action, naming what triggering it would do
fn lock_text(locked: bool) -> &'static str {
    if locked {
        UNLOCK_TEXT
    } else {
        LOCK_TEXT
    }
}

#[derive(Debug)]
struct EmptyState {
    message: String,
    showing_message: bool,
}

/// Default pane actions created by `setup`
#[derive(Debug)]
struct PaneActions {
    dock: Rc<Action>,
    undock: Rc<Action>,
    close: Rc<Action>,
    lock_unlock: Rc<Action>,
    toggle_view: Rc<Action>,
}

#[derive(Debug)]
pub struct DockableContainer {
    plugin: PluginId,
    title: String,
    icon: String,
    is_dockable: bool,
    default_area: DockArea,

    main_toolbar: Rc<Toolbar>,
    auxiliary_toolbars: Vec<Rc<Toolbar>>,
    options_menu: Rc<Menu>,
    menus: Vec<Rc<Menu>>,
    corner: CornerWidget,
    /// Strong handles of every action the container created
    actions: Vec<Rc<Action>>,
    pane_actions: Option<PaneActions>,

    empty_state: Option<EmptyState>,
    content_present: bool,
    spinner_running: bool,
    title_bar_locked: bool,
    raise_and_focus: bool,
    focus_widget: Option<String>,
    maximized: bool,
    closed: bool,
}

impl DockableContainer {
    pub fn new(descriptor: &PluginDescriptor, title: String, icon: String) -> Self {
        let title = if title.is_empty() {
            descriptor.title.clone()
        } else {
            title
        };
        let icon = if icon.is_empty() {
            descriptor.icon.clone()
        } else {
            icon
        };

        Self {
            plugin: descriptor.id.clone(),
            title,
            icon,
            is_dockable: descriptor.is_dockable,
            default_area: descriptor.area,
            main_toolbar: Rc::new(Toolbar::new(MAIN_TOOLBAR)),
            auxiliary_toolbars: Vec::new(),
            options_menu: Rc::new(Menu::new(OPTIONS_MENU, "Options")),
            menus: Vec::new(),
            corner: CornerWidget::new(),
            actions: Vec::new(),
            pane_actions: None,
            empty_state: None,
            content_present: true,
            spinner_running: false,
            title_bar_locked: false,
            raise_and_focus: false,
            focus_widget: None,
            maximized: false,
            closed: false,
        }
    }

    /// One-shot wiring of the default pane actions, the options button and
    /// the options menu
    ///
    /// Returns false when the container was already set up.
    pub fn setup(&mut self, ui: &mut UiRegistry) -> bool {
        if self.pane_actions.is_some() {
            return false;
        }

        let pane = |msg: PaneMsg| Msg::Pane(msg);
        let id = self.plugin.clone();

        let dock = self.register_action(
            ui,
            Action::new(DOCK_PANE, "Dock", pane(PaneMsg::Dock(id.clone()))),
            MAIN_WIDGET_CONTEXT.into(),
        );
        let lock_unlock = self.register_action(
            ui,
            Action::new(
                LOCK_UNLOCK_POSITION,
                lock_text(self.title_bar_locked),
                pane(PaneMsg::LockUnlock(id.clone())),
            ),
            MAIN_WIDGET_CONTEXT.into(),
        );
        let undock = self.register_action(
            ui,
            Action::new(UNDOCK_PANE, "Undock", pane(PaneMsg::Undock(id.clone()))),
            MAIN_WIDGET_CONTEXT.into(),
        );
        let close = self.register_action(
            ui,
            Action::new(CLOSE_PANE, "Close", pane(PaneMsg::Close(id.clone()))),
            MAIN_WIDGET_CONTEXT.into(),
        );
        let toggle_view = self.register_action(
            ui,
            Action::new(
                toggle_view_action_id(&id),
                self.title.clone(),
                pane(PaneMsg::ToggleView {
                    plugin: id.clone(),
                    visible: false,
                }),
            )
            .checkable(false),
            MAIN_WIDGET_CONTEXT.into(),
        );

        for action in [&lock_unlock, &undock, &close, &dock] {
            self.options_menu.add_action(action, BOTTOM_SECTION);
        }

        let options_button = Rc::new(ToolButton::for_menu(
            OPTIONS_BUTTON,
            "Options",
            &self.options_menu,
        ));
        ui.tool_buttons
            .register(&options_button, OPTIONS_BUTTON, &id, MAIN_WIDGET_CONTEXT);
        // The corner is empty at this point, so this cannot fail
        if let Err(e) = self.corner.add(options_button, None) {
            tracing::error!(plugin = %id, "failed to add options button: {}", e);
        }

        ui.toolbars
            .register(&self.main_toolbar, MAIN_TOOLBAR, &id, MAIN_WIDGET_CONTEXT);
        ui.menus
            .register(&self.options_menu, OPTIONS_MENU, &id, MAIN_WIDGET_CONTEXT);

        self.pane_actions = Some(PaneActions {
            dock,
            undock,
            close,
            lock_unlock,
            toggle_view,
        });
        self.sync_dock_actions(false, true);
        tracing::debug!(plugin = %id, "container set up");
        true
    }

    pub fn is_setup(&self) -> bool {
        self.pane_actions.is_some()
    }

    #[track_caller]
    fn register_action(&mut self, ui: &mut UiRegistry, action: Action, context: Context) -> Rc<Action> {
        let action = Rc::new(action);
        ui.actions
            .register(&action, action.id().to_string(), &self.plugin, context);
        self.actions.push(Rc::clone(&action));
        action
    }

    // ========================================================================
    // Plugin-facing creation API
    // ========================================================================

    /// Create an action routed to the plugin's `on_action`
    #[track_caller]
    pub fn create_action(
        &mut self,
        ui: &mut UiRegistry,
        id: &str,
        text: &str,
        context: impl Into<Context>,
    ) -> Rc<Action> {
        let msg = Msg::plugin_action(self.plugin.clone(), id);
        self.register_action(ui, Action::new(id, text, msg), context.into())
    }

    /// Create a checkable action routed to the plugin's `on_action`
    #[track_caller]
    pub fn create_checkable_action(
        &mut self,
        ui: &mut UiRegistry,
        id: &str,
        text: &str,
        context: impl Into<Context>,
        checked: bool,
    ) -> Rc<Action> {
        let msg = Msg::plugin_action(self.plugin.clone(), id);
        self.register_action(
            ui,
            Action::new(id, text, msg).checkable(checked),
            context.into(),
        )
    }

    /// Append an auxiliary toolbar below the main toolbar
    #[track_caller]
    pub fn create_toolbar(&mut self, ui: &mut UiRegistry, id: &str) -> Result<Rc<Toolbar>> {
        if self.toolbar(id).is_some() {
            return Err(RuntimeError::invariant(format!(
                "toolbar '{}' already exists in plugin {}",
                id, self.plugin
            )));
        }
        let toolbar = Rc::new(Toolbar::new(id));
        ui.toolbars
            .register(&toolbar, id, &self.plugin, MAIN_WIDGET_CONTEXT);
        self.auxiliary_toolbars.push(Rc::clone(&toolbar));
        Ok(toolbar)
    }

    #[track_caller]
    pub fn create_menu(&mut self, ui: &mut UiRegistry, id: &str, title: &str) -> Result<Rc<Menu>> {
        if id == OPTIONS_MENU || self.menus.iter().any(|m| m.id() == id) {
            return Err(RuntimeError::invariant(format!(
                "menu '{}' already exists in plugin {}",
                id, self.plugin
            )));
        }
        let menu = Rc::new(Menu::new(id, title));
        ui.menus.register(&menu, id, &self.plugin, MAIN_WIDGET_CONTEXT);
        self.menus.push(Rc::clone(&menu));
        Ok(menu)
    }

    /// Add an item to the main toolbar or an auxiliary toolbar
    pub fn add_item_to_toolbar(
        &mut self,
        item: ToolbarItem,
        toolbar: &str,
        section: Option<&str>,
        before: Option<&str>,
    ) -> Result<()> {
        let Some(target) = self.toolbar(toolbar) else {
            return Err(RuntimeError::NotFound {
                kind: "toolbar",
                id: toolbar.to_string(),
                plugin: self.plugin.to_string(),
                context: MAIN_WIDGET_CONTEXT.to_string(),
            });
        };
        target.add_item(item, section, before)
    }

    /// Insert a button into the corner region
    pub fn add_corner_widget(
        &mut self,
        ui: &mut UiRegistry,
        button: Rc<ToolButton>,
        before: Option<&str>,
    ) -> Result<()> {
        let id = button.id().to_string();
        self.corner.add(Rc::clone(&button), before)?;
        ui.tool_buttons
            .register(&button, id, &self.plugin, MAIN_WIDGET_CONTEXT);
        Ok(())
    }

    pub fn corner_widget(&self, id: &str) -> Option<&Rc<ToolButton>> {
        self.corner.get(id)
    }

    pub fn corner_ids(&self) -> Vec<&str> {
        self.corner.ids()
    }

    /// Finalize every toolbar; idempotent
    pub fn render_toolbars(&self) {
        self.main_toolbar.render();
        for toolbar in &self.auxiliary_toolbars {
            toolbar.render();
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn plugin(&self) -> &PluginId {
        &self.plugin
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Change the title and the text of the toggle-view action
    pub fn update_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if let Some(actions) = &self.pane_actions {
            actions.toggle_view.set_text(self.title.clone());
        }
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn is_dockable(&self) -> bool {
        self.is_dockable
    }

    pub fn default_area(&self) -> DockArea {
        self.default_area
    }

    pub fn main_toolbar(&self) -> &Rc<Toolbar> {
        &self.main_toolbar
    }

    pub fn auxiliary_toolbars(&self) -> &[Rc<Toolbar>] {
        &self.auxiliary_toolbars
    }

    pub fn toolbar(&self, id: &str) -> Option<&Rc<Toolbar>> {
        if id == MAIN_TOOLBAR {
            return Some(&self.main_toolbar);
        }
        self.auxiliary_toolbars.iter().find(|t| t.id() == id)
    }

    pub fn options_menu(&self) -> &Rc<Menu> {
        &self.options_menu
    }

    pub fn menu(&self, id: &str) -> Option<&Rc<Menu>> {
        if id == OPTIONS_MENU {
            return Some(&self.options_menu);
        }
        self.menus.iter().find(|m| m.id() == id)
    }

    /// One of the container's own actions
    pub fn action(&self, id: &str) -> Option<&Rc<Action>> {
        self.actions.iter().find(|a| a.id() == id)
    }

    pub fn actions(&self) -> &[Rc<Action>] {
        &self.actions
    }

    pub fn toggle_view_action(&self) -> Option<&Rc<Action>> {
        self.pane_actions.as_ref().map(|a| &a.toggle_view)
    }

    // ========================================================================
    // Pane-facing state
    // ========================================================================

    /// Enable "Dock" while floating and "Undock"/"Close"/"Lock" while docked
    ///
    /// A hidden pane cannot be undocked.
    pub fn sync_dock_actions(&self, floating: bool, visible: bool) {
        if let Some(actions) = &self.pane_actions {
            actions.dock.set_enabled(floating);
            actions.undock.set_enabled(!floating && visible && self.is_dockable);
            actions.close.set_enabled(!floating);
            actions.lock_unlock.set_enabled(!floating);
        }
    }

    /// Reflect pane visibility in the toggle-view action
    pub fn set_visible_state(&self, visible: bool) {
        if let Some(actions) = &self.pane_actions {
            actions.toggle_view.set_checked(visible);
        }
    }

    pub fn is_title_bar_locked(&self) -> bool {
        self.title_bar_locked
    }

    /// Lock or unlock the title bar, swapping the lock action's text
    pub fn set_title_bar_locked(&mut self, locked: bool) {
        self.title_bar_locked = locked;
        if let Some(actions) = &self.pane_actions {
            actions.lock_unlock.set_text(lock_text(locked));
        }
    }

    pub fn get_maximized_state(&self) -> bool {
        self.maximized
    }

    pub fn set_maximized_state(&mut self, maximized: bool) {
        self.maximized = maximized;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn mark_closed(&mut self) {
        self.closed = true;
    }

    pub fn start_spinner(&mut self) {
        self.spinner_running = true;
    }

    pub fn stop_spinner(&mut self) {
        self.spinner_running = false;
    }

    pub fn is_spinner_running(&self) -> bool {
        self.spinner_running
    }

    pub(crate) fn set_raise_and_focus(&mut self, raise_and_focus: bool) {
        self.raise_and_focus = raise_and_focus;
    }

    pub fn raise_and_focus(&self) -> bool {
        self.raise_and_focus
    }

    pub(crate) fn set_focus_widget(&mut self, widget: Option<String>) {
        self.focus_widget = widget;
    }

    /// Id of the child receiving focus when the pane is raised
    ///
    /// Defaults to the container itself.
    pub fn get_focus_widget(&self) -> String {
        self.focus_widget
            .clone()
            .unwrap_or_else(|| self.plugin.to_string())
    }

    // ========================================================================
    // Empty state
    // ========================================================================

    /// Install the empty-state overlay if the plugin has a message and the
    /// preference is on
    pub(crate) fn configure_empty_state(&mut self, message: Option<String>, show: bool) {
        self.empty_state = match message {
            Some(message) if show => Some(EmptyState {
                message,
                showing_message: !self.content_present,
            }),
            _ => None,
        };
    }

    pub fn has_empty_state(&self) -> bool {
        self.empty_state.is_some()
    }

    pub fn empty_message(&self) -> Option<&str> {
        self.empty_state.as_ref().map(|e| e.message.as_str())
    }

    /// Whether the overlay currently covers the content
    pub fn is_showing_empty_message(&self) -> bool {
        self.empty_state
            .as_ref()
            .is_some_and(|e| e.showing_message)
    }

    /// Switch to the content widget; a no-op while there is no content
    pub fn show_content_widget(&mut self) {
        if !self.content_present {
            return;
        }
        if let Some(state) = &mut self.empty_state {
            state.showing_message = false;
        }
    }

    pub fn show_empty_message(&mut self) {
        if let Some(state) = &mut self.empty_state {
            state.showing_message = true;
        }
    }

    /// Record whether the content area has something and flip the overlay
    pub fn set_content_present(&mut self, present: bool) {
        self.content_present = present;
        if present {
            self.show_content_widget();
        } else {
            self.show_empty_message();
        }
    }

    pub fn has_content(&self) -> bool {
        self.content_present
    }
}
