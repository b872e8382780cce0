//! Container toolbars
//!
//! Items are grouped in named sections rendered in insertion order. A
//! toolbar is finalized by `render`; items added later mark it dirty until
//! the next render.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::actions::{Action, ToolButton};
use crate::error::{Result, RuntimeError};

/// Section used when the caller names none
pub const DEFAULT_SECTION: &str = "default";

/// Something that can sit in a toolbar
#[derive(Debug, Clone)]
pub enum ToolbarItem {
    Action(Rc<Action>),
    Button(Rc<ToolButton>),
    /// Expanding spacer pushing the following items to the far end
    Stretcher(String),
}

impl ToolbarItem {
    pub fn stretcher(id: impl Into<String>) -> Self {
        ToolbarItem::Stretcher(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            ToolbarItem::Action(a) => a.id(),
            ToolbarItem::Button(b) => b.id(),
            ToolbarItem::Stretcher(id) => id,
        }
    }

    pub fn is_stretcher(&self) -> bool {
        matches!(self, ToolbarItem::Stretcher(_))
    }
}

impl From<&Rc<Action>> for ToolbarItem {
    fn from(action: &Rc<Action>) -> Self {
        ToolbarItem::Action(Rc::clone(action))
    }
}

impl From<&Rc<ToolButton>> for ToolbarItem {
    fn from(button: &Rc<ToolButton>) -> Self {
        ToolbarItem::Button(Rc::clone(button))
    }
}

#[derive(Debug)]
pub struct Toolbar {
    id: String,
    sections: RefCell<Vec<(String, Vec<ToolbarItem>)>>,
    rendered: Cell<bool>,
}

impl Toolbar {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sections: RefCell::new(Vec::new()),
            rendered: Cell::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add `item` to `section`, or right before the item `before`
    ///
    /// An id already present, or a `before` that is not, is an
    /// `InvariantViolation`.
    pub fn add_item(
        &self,
        item: ToolbarItem,
        section: Option<&str>,
        before: Option<&str>,
    ) -> Result<()> {
        if self.contains(item.id()) {
            return Err(RuntimeError::invariant(format!(
                "item '{}' is already in toolbar '{}'",
                item.id(),
                self.id
            )));
        }

        let mut sections = self.sections.borrow_mut();
        match before {
            Some(before) => {
                let position = sections.iter().enumerate().find_map(|(s, (_, items))| {
                    items.iter().position(|i| i.id() == before).map(|i| (s, i))
                });
                let Some((s, i)) = position else {
                    return Err(RuntimeError::invariant(format!(
                        "cannot insert '{}' before '{}': not in toolbar '{}'",
                        item.id(),
                        before,
                        self.id
                    )));
                };
                sections[s].1.insert(i, item);
            }
            None => {
                let section = section.unwrap_or(DEFAULT_SECTION);
                match sections.iter_mut().find(|(name, _)| name == section) {
                    Some((_, items)) => items.push(item),
                    None => sections.push((section.to_string(), vec![item])),
                }
            }
        }

        self.rendered.set(false);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sections
            .borrow()
            .iter()
            .any(|(_, items)| items.iter().any(|i| i.id() == id))
    }

    /// Finalize the toolbar; calling it again is harmless
    pub fn render(&self) {
        if !self.rendered.replace(true) {
            tracing::trace!(toolbar = %self.id, items = self.len(), "rendered toolbar");
        }
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered.get()
    }

    /// Item ids in display order
    pub fn item_ids(&self) -> Vec<String> {
        self.sections
            .borrow()
            .iter()
            .flat_map(|(_, items)| items.iter().map(|i| i.id().to_string()))
            .collect()
    }

    pub fn items(&self) -> Vec<ToolbarItem> {
        self.sections
            .borrow()
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections
            .borrow()
            .iter()
            .map(|(_, items)| items.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Msg;

    fn action(id: &str) -> Rc<Action> {
        Rc::new(Action::new(id, id, Msg::plugin_action("editor", id)))
    }

    #[test]
    fn test_sections_keep_insertion_order() {
        let toolbar = Toolbar::new("main_toolbar");
        toolbar
            .add_item((&action("run")).into(), Some("run"), None)
            .unwrap();
        toolbar
            .add_item((&action("save")).into(), Some("file"), None)
            .unwrap();
        toolbar
            .add_item((&action("debug")).into(), Some("run"), None)
            .unwrap();
        toolbar
            .add_item(ToolbarItem::stretcher("stretcher"), None, None)
            .unwrap();

        assert_eq!(
            toolbar.item_ids(),
            vec!["run", "debug", "save", "stretcher"]
        );
    }

    #[test]
    fn test_insert_before() {
        let toolbar = Toolbar::new("main_toolbar");
        toolbar.add_item((&action("b")).into(), None, None).unwrap();
        toolbar
            .add_item((&action("a")).into(), Some("ignored"), Some("b"))
            .unwrap();
        assert_eq!(toolbar.item_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_item_is_invariant_violation() {
        let toolbar = Toolbar::new("main_toolbar");
        let save = action("save");
        toolbar.add_item((&save).into(), None, None).unwrap();
        let err = toolbar.add_item((&save).into(), None, None).unwrap_err();
        assert!(matches!(err, RuntimeError::InvariantViolation(_)));
    }

    #[test]
    fn test_missing_before_is_invariant_violation() {
        let toolbar = Toolbar::new("main_toolbar");
        let err = toolbar
            .add_item((&action("a")).into(), None, Some("missing"))
            .unwrap_err();
        assert!(matches!(err, RuntimeError::InvariantViolation(_)));
    }

    #[test]
    fn test_render_is_idempotent() {
        let toolbar = Toolbar::new("main_toolbar");
        toolbar.add_item((&action("a")).into(), None, None).unwrap();
        assert!(!toolbar.is_rendered());
        toolbar.render();
        toolbar.render();
        assert!(toolbar.is_rendered());
        assert_eq!(toolbar.item_ids(), vec!["a"]);
    }
}
