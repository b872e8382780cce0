//! Three-level reference registry
//!
//! Objects are keyed by `(owner, context, id)`. The registry stores weak
//! handles only: an entry whose object was dropped behaves as if it was
//! never registered.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::Location;
use std::rc::{Rc, Weak};

use crate::error::{Result, RuntimeError};
use crate::plugin::PluginId;

/// Outer key: the plugin that registered an object, or the main window
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Owner {
    Main,
    Plugin(PluginId),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Main => f.write_str("main"),
            Owner::Plugin(id) => write!(f, "{}", id),
        }
    }
}

impl From<&PluginId> for Owner {
    fn from(id: &PluginId) -> Self {
        Owner::Plugin(id.clone())
    }
}

impl From<PluginId> for Owner {
    fn from(id: PluginId) -> Self {
        Owner::Plugin(id)
    }
}

impl From<&str> for Owner {
    fn from(id: &str) -> Self {
        if id == "main" {
            Owner::Main
        } else {
            Owner::Plugin(PluginId::from(id))
        }
    }
}

/// Middle key: a surface within the owner, or the global context
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Context {
    Global,
    Named(String),
}

impl Context {
    pub fn named(name: impl Into<String>) -> Self {
        Context::Named(name.into())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Global => f.write_str("_"),
            Context::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for Context {
    fn from(name: &str) -> Self {
        if name == "_" {
            Context::Global
        } else {
            Context::Named(name.to_string())
        }
    }
}

impl From<String> for Context {
    fn from(name: String) -> Self {
        Context::from(name.as_str())
    }
}

/// Replacement of a live entry by a second registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: &'static str,
    pub id: String,
    pub owner: Owner,
    pub context: Context,
    pub previous: &'static Location<'static>,
    pub current: &'static Location<'static>,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' (plugin '{}', context '{}') registered at {}:{} is replaced by registration at {}:{}",
            self.kind,
            self.id,
            self.owner,
            self.context,
            self.previous.file(),
            self.previous.line(),
            self.current.file(),
            self.current.line()
        )
    }
}

struct Entry<T> {
    object: Weak<T>,
    location: &'static Location<'static>,
}

/// Registry of weak references for one kind of UI object
pub struct ReferenceRegistry<T> {
    kind: &'static str,
    cells: HashMap<(Owner, Context), BTreeMap<String, Entry<T>>>,
}

impl<T> ReferenceRegistry<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            cells: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Store a weak reference to `object` under `(owner, context, id)`
    ///
    /// Replacing a live entry logs a warning citing both call sites and
    /// returns the collision.
    #[track_caller]
    pub fn register(
        &mut self,
        object: &Rc<T>,
        id: impl Into<String>,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> Option<Collision> {
        let current = Location::caller();
        let id = id.into();
        let owner = owner.into();
        let context = context.into();

        let cell = self
            .cells
            .entry((owner.clone(), context.clone()))
            .or_default();

        let previous = cell
            .get(&id)
            .filter(|entry| entry.object.strong_count() > 0)
            .map(|entry| entry.location);

        cell.insert(
            id.clone(),
            Entry {
                object: Rc::downgrade(object),
                location: current,
            },
        );

        previous.map(|previous| {
            let collision = Collision {
                kind: self.kind,
                id,
                owner,
                context,
                previous,
                current,
            };
            tracing::warn!("{}", collision);
            collision
        })
    }

    /// Live object under `(owner, context, id)`
    ///
    /// There is no fallback between contexts: an entry registered under a
    /// named context is not found under `Global`.
    pub fn get(
        &self,
        id: &str,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> Result<Rc<T>> {
        let owner = owner.into();
        let context = context.into();

        self.cells
            .get(&(owner.clone(), context.clone()))
            .and_then(|cell| cell.get(id))
            .and_then(|entry| entry.object.upgrade())
            .ok_or_else(|| RuntimeError::NotFound {
                kind: self.kind,
                id: id.to_string(),
                plugin: owner.to_string(),
                context: context.to_string(),
            })
    }

    /// Every live object of one `(owner, context)` cell, keyed by id
    pub fn get_all(
        &self,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> BTreeMap<String, Rc<T>> {
        self.cells
            .get(&(owner.into(), context.into()))
            .map(|cell| {
                cell.iter()
                    .filter_map(|(id, entry)| entry.object.upgrade().map(|obj| (id.clone(), obj)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Where the live entry was registered from
    pub fn location(
        &self,
        id: &str,
        owner: impl Into<Owner>,
        context: impl Into<Context>,
    ) -> Option<&'static Location<'static>> {
        self.cells
            .get(&(owner.into(), context.into()))
            .and_then(|cell| cell.get(id))
            .filter(|entry| entry.object.strong_count() > 0)
            .map(|entry| entry.location)
    }

    /// Drop every entry registered by `owner`
    pub fn remove_owner(&mut self, owner: &Owner) {
        self.cells.retain(|(o, _), _| o != owner);
    }

    /// Drop entries whose object is gone, returning how many were removed
    pub fn purge_dead(&mut self) -> usize {
        let mut removed = 0;
        for cell in self.cells.values_mut() {
            let before = cell.len();
            cell.retain(|_, entry| entry.object.strong_count() > 0);
            removed += before - cell.len();
        }
        self.cells.retain(|_, cell| !cell.is_empty());
        removed
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.cells
            .values()
            .flat_map(|cell| cell.values())
            .filter(|entry| entry.object.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries
    pub fn reset(&mut self) {
        self.cells.clear();
    }
}
