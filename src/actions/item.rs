//! UI command objects: actions, tool buttons and menus
//!
//! These are shared through `Rc` between the container that owns them and
//! the widgets that display them. The reference registries only ever hold
//! `Weak` handles, so dropping the owning container invalidates lookups.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::messages::Msg;

/// A triggerable command
///
/// Triggering an action produces the message it carries. Checkable actions
/// flip their checked state first and report it in the message.
#[derive(Debug)]
pub struct Action {
    id: String,
    text: RefCell<String>,
    msg: Msg,
    checkable: bool,
    checked: Cell<bool>,
    enabled: Cell<bool>,
    shortcut: RefCell<Option<String>>,
}

impl Action {
    pub fn new(id: impl Into<String>, text: impl Into<String>, msg: Msg) -> Self {
        Self {
            id: id.into(),
            text: RefCell::new(text.into()),
            msg,
            checkable: false,
            checked: Cell::new(false),
            enabled: Cell::new(true),
            shortcut: RefCell::new(None),
        }
    }

    /// Make the action checkable, starting in `checked` state
    pub fn checkable(mut self, checked: bool) -> Self {
        self.checkable = true;
        self.checked.set(checked);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.text.borrow_mut() = text.into();
    }

    pub fn msg(&self) -> &Msg {
        &self.msg
    }

    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    /// Set the checked state without triggering
    pub fn set_checked(&self, checked: bool) {
        if self.checkable {
            self.checked.set(checked);
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Display string of the bound shortcut, if any
    pub fn shortcut(&self) -> Option<String> {
        self.shortcut.borrow().clone()
    }

    pub fn set_shortcut(&self, shortcut: Option<String>) {
        *self.shortcut.borrow_mut() = shortcut;
    }

    /// Activate the action, returning the message to dispatch
    ///
    /// Disabled actions produce nothing.
    pub fn trigger(&self) -> Option<Msg> {
        if !self.is_enabled() {
            tracing::debug!(action = %self.id, "ignoring trigger of disabled action");
            return None;
        }
        if self.checkable {
            self.checked.set(!self.checked.get());
            Some(self.msg.with_checked(self.checked.get()))
        } else {
            Some(self.msg.clone())
        }
    }
}

/// A button shown in a toolbar or the container's corner region
#[derive(Debug)]
pub struct ToolButton {
    id: String,
    tooltip: String,
    action: Option<Rc<Action>>,
    menu: Option<Rc<Menu>>,
}

impl ToolButton {
    /// Button that triggers `action`
    pub fn for_action(id: impl Into<String>, action: &Rc<Action>) -> Self {
        Self {
            id: id.into(),
            tooltip: action.text(),
            action: Some(Rc::clone(action)),
            menu: None,
        }
    }

    /// Button that pops up `menu`
    pub fn for_menu(id: impl Into<String>, tooltip: impl Into<String>, menu: &Rc<Menu>) -> Self {
        Self {
            id: id.into(),
            tooltip: tooltip.into(),
            action: None,
            menu: Some(Rc::clone(menu)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    pub fn action(&self) -> Option<&Rc<Action>> {
        self.action.as_ref()
    }

    pub fn menu(&self) -> Option<&Rc<Menu>> {
        self.menu.as_ref()
    }

    /// Press the button: trigger its action, if it has one
    pub fn click(&self) -> Option<Msg> {
        self.action.as_ref().and_then(|a| a.trigger())
    }
}

/// Entry of a menu section
#[derive(Debug, Clone)]
pub enum MenuItem {
    Action(Rc<Action>),
    Submenu(Rc<Menu>),
}

impl MenuItem {
    pub fn id(&self) -> String {
        match self {
            MenuItem::Action(a) => a.id().to_string(),
            MenuItem::Submenu(m) => m.id().to_string(),
        }
    }
}

/// Section that is always rendered last
pub const BOTTOM_SECTION: &str = "bottom";

/// A menu made of named sections
///
/// Sections render in insertion order, except `BOTTOM_SECTION` which always
/// comes last. Adding an item whose id is already present is ignored.
#[derive(Debug)]
pub struct Menu {
    id: String,
    title: String,
    sections: RefCell<Vec<(String, Vec<MenuItem>)>>,
}

impl Menu {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            sections: RefCell::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn add_action(&self, action: &Rc<Action>, section: &str) {
        self.add_item(MenuItem::Action(Rc::clone(action)), section);
    }

    pub fn add_menu(&self, menu: &Rc<Menu>, section: &str) {
        self.add_item(MenuItem::Submenu(Rc::clone(menu)), section);
    }

    fn add_item(&self, item: MenuItem, section: &str) {
        if self.contains(&item.id()) {
            tracing::debug!(menu = %self.id, item = %item.id(), "menu item already present");
            return;
        }

        let mut sections = self.sections.borrow_mut();
        match sections.iter_mut().find(|(name, _)| name == section) {
            Some((_, items)) => items.push(item),
            None => sections.push((section.to_string(), vec![item])),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sections
            .borrow()
            .iter()
            .any(|(_, items)| items.iter().any(|i| i.id() == id))
    }

    /// Drop every item of `section`
    pub fn clear_section(&self, section: &str) {
        self.sections.borrow_mut().retain(|(name, _)| name != section);
    }

    /// Section names in render order
    pub fn section_names(&self) -> Vec<String> {
        let sections = self.sections.borrow();
        let mut names: Vec<String> = sections
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| name != BOTTOM_SECTION)
            .collect();
        if sections.iter().any(|(name, _)| name == BOTTOM_SECTION) {
            names.push(BOTTOM_SECTION.to_string());
        }
        names
    }

    /// Items in render order
    pub fn items(&self) -> Vec<MenuItem> {
        let sections = self.sections.borrow();
        self.section_names()
            .iter()
            .flat_map(|name| {
                sections
                    .iter()
                    .filter(move |(n, _)| n == name)
                    .flat_map(|(_, items)| items.iter().cloned())
            })
            .collect()
    }

    /// Item ids in render order
    pub fn item_ids(&self) -> Vec<String> {
        self.items().iter().map(MenuItem::id).collect()
    }
}
