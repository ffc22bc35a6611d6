//! The view arena: views, parent/child links, subtree removal.
//!
//! Views live in a single slotmap; parent and children relationships sit
//! in secondary maps so removal is O(subtree size) and lookup is O(1).
//! `ViewId` keys are generational: once a view is removed, any key still
//! held by a caller stops resolving, which is what lets records reference
//! their source view without keeping it alive.

use std::collections::VecDeque;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::geometry::Rect;

new_key_type! {
    /// Unique identifier for a view. Copy, lightweight, generation-tracked.
    pub struct ViewId;
}

/// Empty slice returned when a view has no children.
const NO_CHILDREN: &[ViewId] = &[];

/// Per-view data held by the arena.
#[derive(Debug, Clone)]
pub struct View {
    /// Optional name used in diagnostics and reports.
    pub name: Option<String>,
    /// The view's frame. Input to the solver (suggestion) and output of
    /// a layout pass (solved position).
    pub frame: Rect,
    /// Whether the layout pass still translates this view's frame into
    /// strong solver holds. Every pin operation turns this off for the
    /// view being pinned.
    pub translates_frame: bool,
}

impl View {
    /// Create an unnamed view with a zero frame.
    pub fn new() -> Self {
        Self {
            name: None,
            frame: Rect::zero(),
            translates_frame: true,
        }
    }

    /// Create a named view (builder entry point).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Set the initial frame (builder).
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    /// The view's name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

/// The view arena.
pub struct ViewTree {
    views: SlotMap<ViewId, View>,
    children: SecondaryMap<ViewId, Vec<ViewId>>,
    parent: SecondaryMap<ViewId, ViewId>,
}

impl ViewTree {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
        }
    }

    /// Insert a parentless view.
    pub fn insert(&mut self, view: View) -> ViewId {
        let id = self.views.insert(view);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a view as a child of `parent`.
    ///
    /// If `parent` is no longer in the arena the view is inserted
    /// parentless, so a stale key never produces a dangling link.
    pub fn insert_child(&mut self, parent: ViewId, view: View) -> ViewId {
        let id = self.views.insert(view);
        self.children.insert(id, Vec::new());
        if self.views.contains_key(parent) {
            self.parent.insert(id, parent);
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.push(id);
            }
        }
        id
    }

    /// Remove a view and all of its descendants.
    ///
    /// Returns every removed id (subtree root first, breadth-first), or an
    /// empty vec if `id` was not in the arena. Callers use the list to
    /// release solver state tied to the removed views.
    pub fn remove(&mut self, id: ViewId) -> Vec<ViewId> {
        if !self.views.contains_key(id) {
            return Vec::new();
        }

        // Detach from the parent's children list.
        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    queue.push_back(child);
                }
            }
            self.parent.remove(current);
            if self.views.remove(current).is_some() {
                removed.push(current);
            }
        }
        removed
    }

    /// The parent of a view, if it has one.
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.parent.get(id).copied()
    }

    /// The children of a view. Empty for leaves and unknown ids.
    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(NO_CHILDREN)
    }

    /// Immutable access to a view.
    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(id)
    }

    /// Mutable access to a view.
    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(id)
    }

    /// Whether the arena still contains `id`.
    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(id)
    }

    /// Number of live views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Iterate over all live views.
    pub fn iter(&self) -> impl Iterator<Item = (ViewId, &View)> {
        self.views.iter()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}
