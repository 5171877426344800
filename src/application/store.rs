//! Todo list store
//!
//! Holds the todo tree plus UI view state and serves two derived views:
//! `todos` (pre-order flattening) and `filtered_todos` (by visibility filter).
//! Views are cached and recomputed lazily when the arena's version counters
//! no longer match the cached key.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::{DomainError, DomainResult, TodoArena, TodoId, TodoNode, VisibilityFilter};

/// Texts a fresh store is seeded with.
pub const DEMO_TODOS: [&str; 3] = ["Todo number 1!", "Todo number 2!", "Todo number 3!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FilterKey {
    structure: u64,
    content: u64,
    filter: VisibilityFilter,
}

#[derive(Debug)]
struct CachedView<K> {
    key: K,
    ids: Rc<[TodoId]>,
}

/// Owner of the todo tree.
#[derive(Debug)]
pub struct TodoListStore {
    visibility_filter: VisibilityFilter,
    demo_mode: bool,
    tree: TodoArena,
    todos_cache: RefCell<Option<CachedView<u64>>>,
    filtered_cache: RefCell<Option<CachedView<FilterKey>>>,
}

impl Default for TodoListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoListStore {
    /// Store seeded with the three demo todos.
    pub fn new() -> Self {
        Self::with_todos(DEMO_TODOS)
    }

    /// Store holding only the root.
    pub fn empty() -> Self {
        Self {
            visibility_filter: VisibilityFilter::default(),
            demo_mode: true,
            tree: TodoArena::new(),
            todos_cache: RefCell::new(None),
            filtered_cache: RefCell::new(None),
        }
    }

    /// Store with one root-level todo per text, in order.
    pub fn with_todos<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::empty();
        for text in texts {
            store.add_todo(text);
        }
        store
    }

    /// Store configured from settings: filter, demo flag and optional seed.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut store = if settings.seed_demo {
            Self::with_todos(settings.demo_todos.iter().cloned())
        } else {
            Self::empty()
        };
        store.visibility_filter = settings.visibility_filter;
        store.demo_mode = settings.demo_mode;
        store
    }

    pub fn todo_root(&self) -> TodoId {
        self.tree.root()
    }

    pub fn tree(&self) -> &TodoArena {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn visibility_filter(&self) -> VisibilityFilter {
        self.visibility_filter
    }

    pub fn set_visibility_filter(&mut self, filter: VisibilityFilter) {
        debug!("visibility filter: {} -> {}", self.visibility_filter, filter);
        self.visibility_filter = filter;
    }

    /// Sets the filter from its name; unknown names fail with `InvalidFilter`.
    pub fn set_visibility_filter_str(&mut self, name: &str) -> DomainResult<()> {
        let filter = name.parse()?;
        self.set_visibility_filter(filter);
        Ok(())
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn set_demo_mode(&mut self, demo_mode: bool) {
        self.demo_mode = demo_mode;
    }

    // ------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------

    /// All todos in depth-first pre-order, root excluded.
    ///
    /// Reads without an intervening structural change return the same `Rc`.
    #[instrument(level = "trace", skip(self))]
    pub fn todos(&self) -> Rc<[TodoId]> {
        let version = self.tree.structure_version();
        let mut cache = self.todos_cache.borrow_mut();
        match cache.as_ref() {
            Some(view) if view.key == version => Rc::clone(&view.ids),
            _ => {
                let ids: Rc<[TodoId]> = self.tree.iter().map(TodoNode::id).collect();
                debug!("todos: recomputed {} entries at version {}", ids.len(), version);
                *cache = Some(CachedView {
                    key: version,
                    ids: Rc::clone(&ids),
                });
                ids
            }
        }
    }

    /// `todos` narrowed by the current visibility filter.
    #[instrument(level = "trace", skip(self))]
    pub fn filtered_todos(&self) -> Rc<[TodoId]> {
        let key = FilterKey {
            structure: self.tree.structure_version(),
            content: self.tree.content_version(),
            filter: self.visibility_filter,
        };
        if let Some(view) = self.filtered_cache.borrow().as_ref() {
            if view.key == key {
                return Rc::clone(&view.ids);
            }
        }

        let todos = self.todos();
        let ids: Rc<[TodoId]> = match key.filter {
            VisibilityFilter::ShowAll => todos,
            filter => todos
                .iter()
                .copied()
                .filter(|&id| self.tree.get(id).is_some_and(|n| filter.matches(n.completed)))
                .collect(),
        };
        debug!("filtered_todos: {} entries for {}", ids.len(), key.filter);
        *self.filtered_cache.borrow_mut() = Some(CachedView {
            key,
            ids: Rc::clone(&ids),
        });
        ids
    }

    /// Nodes of `filtered_todos`, in order.
    pub fn filtered_nodes(&self) -> Vec<&TodoNode> {
        self.filtered_todos()
            .iter()
            .filter_map(|&id| self.tree.get(id))
            .collect()
    }

    // ------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------

    /// Finds `id` among the descendants of the root. Absence is not an error.
    pub fn find_node_by_id(&self, id: TodoId) -> Option<&TodoNode> {
        self.find_node_by_id_from(id, self.tree.root())
    }

    /// Finds `id` among the descendants of `start`; `start` itself never matches.
    #[instrument(level = "trace", skip(self))]
    pub fn find_node_by_id_from(&self, id: TodoId, start: TodoId) -> Option<&TodoNode> {
        if self.tree.is_descendant_of(id, start) {
            self.tree.get(id)
        } else {
            None
        }
    }

    /// Like `find_node_by_id`, but a missing id is a `NotFound` error.
    pub fn find_node_by_id_safe(&self, id: TodoId) -> DomainResult<&TodoNode> {
        self.find_node_by_id(id).ok_or(DomainError::NotFound(id))
    }

    pub fn node(&self, id: TodoId) -> Option<&TodoNode> {
        self.find_node_by_id(id)
    }

    /// Field access for editors. Structure stays private to the store.
    pub fn node_mut(&mut self, id: TodoId) -> Option<&mut TodoNode> {
        if !self.tree.is_descendant_of(id, self.tree.root()) {
            return None;
        }
        self.tree.get_mut(id)
    }

    pub fn parent_of(&self, id: TodoId) -> Option<TodoId> {
        self.find_node_by_id(id).and_then(TodoNode::parent)
    }

    pub fn children_of(&self, id: TodoId) -> Option<&[TodoId]> {
        self.tree.get(id).map(TodoNode::children)
    }

    /// Position of `id` among its siblings, derived at call time.
    pub fn index_of(&self, id: TodoId) -> Option<usize> {
        self.tree.index_of(id)
    }

    /// Nesting level; root-level todos have depth 1.
    pub fn depth(&self, id: TodoId) -> Option<usize> {
        self.tree.depth(id)
    }

    // ------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------

    /// Appends a new todo as the last child of the root.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_todo(&mut self, text: impl Into<String>) -> TodoId {
        let text = text.into();
        debug!("add_todo: {:?}", text);
        self.tree.append_to_root(text)
    }

    /// Inserts a new sibling directly after `node`, shifting later siblings right.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_todo_after(&mut self, node: TodoId, text: impl Into<String>) -> DomainResult<TodoId> {
        let target = self.tree.get(node).ok_or(DomainError::NotFound(node))?;
        let parent = target.parent().ok_or(DomainError::Detached(node))?;
        let index = self.tree.index_of(node).ok_or(DomainError::Detached(node))?;
        let text = text.into();
        debug!("add_todo_after: {} at {} {:?}", node, index + 1, text);
        self.tree
            .insert_child(parent, Some(index + 1), text)
            .ok_or(DomainError::Detached(node))
    }

    /// Appends a new todo as the last child of `parent`.
    #[instrument(level = "debug", skip(self, text))]
    pub fn add_child(&mut self, parent: TodoId, text: impl Into<String>) -> DomainResult<TodoId> {
        let parent = self.find_node_by_id_safe(parent)?.id();
        let text = text.into();
        debug!("add_child: under {} {:?}", parent, text);
        self.tree
            .insert_child(parent, None, text)
            .ok_or(DomainError::NotFound(parent))
    }

    /// Removes `id` and its whole subtree. Returns how many todos were dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_todo(&mut self, id: TodoId) -> DomainResult<usize> {
        let id = self.find_node_by_id_safe(id)?.id();
        let removed = self
            .tree
            .remove_subtree(id)
            .ok_or(DomainError::Detached(id))?;
        debug!("delete_todo: {} removed {} node(s)", id, removed);
        Ok(removed)
    }

    pub fn set_text(&mut self, id: TodoId, text: impl Into<String>) -> DomainResult<()> {
        self.find_node_by_id_safe(id)?;
        if let Some(node) = self.tree.get_mut(id) {
            node.text = text.into();
        }
        Ok(())
    }

    pub fn set_completed(&mut self, id: TodoId, completed: bool) -> DomainResult<()> {
        self.find_node_by_id_safe(id)?;
        if let Some(node) = self.tree.get_mut(id) {
            node.completed = completed;
        }
        Ok(())
    }

    /// Flips completion and returns the new state.
    pub fn toggle_completed(&mut self, id: TodoId) -> DomainResult<bool> {
        let completed = !self.find_node_by_id_safe(id)?.completed;
        self.set_completed(id, completed)?;
        Ok(completed)
    }
}
