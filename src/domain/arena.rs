use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

/// Opaque handle of a todo node.
///
/// Backed by a generational arena index: once a node is removed its id never
/// resolves again, even if the slot gets reused. Ids are only meaningful for
/// the arena (and store) that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TodoId(Index);

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "{}.{}", slot, generation)
    }
}

/// One todo item, or the sentinel root of the tree.
#[derive(Debug)]
pub struct TodoNode {
    id: TodoId,
    /// Item text, bound directly by editors
    pub text: String,
    /// Completion flag, bound directly by editors
    pub completed: bool,
    /// Owned children in display order
    children: Vec<TodoId>,
    /// Non-owning link to the parent, None for the root
    parent: Option<TodoId>,
}

impl TodoNode {
    fn new(id: TodoId, parent: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            children: Vec::new(),
            parent: Some(parent),
        }
    }

    fn root(id: TodoId) -> Self {
        Self {
            id,
            text: String::new(),
            completed: false,
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn parent(&self) -> Option<TodoId> {
        self.parent
    }

    pub fn children(&self) -> &[TodoId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-based todo tree.
///
/// The root is created with the arena and lives as long as it does. Two
/// counters track change: the structure version moves on every insert or
/// removal, the content version on every mutable node access.
#[derive(Debug)]
pub struct TodoArena {
    arena: Arena<TodoNode>,
    root: TodoId,
    structure_version: u64,
    content_version: u64,
}

impl Default for TodoArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoArena {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = TodoId(arena.insert_with(|idx| TodoNode::root(TodoId(idx))));
        Self {
            arena,
            root,
            structure_version: 0,
            content_version: 0,
        }
    }

    pub fn root(&self) -> TodoId {
        self.root
    }

    /// Number of todos, not counting the root.
    pub fn len(&self) -> usize {
        self.arena.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn structure_version(&self) -> u64 {
        self.structure_version
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: TodoId) -> Option<&TodoNode> {
        self.arena.get(id.0)
    }

    /// Mutable access to a node's fields. Counts as a content change.
    #[instrument(level = "trace", skip(self))]
    pub fn get_mut(&mut self, id: TodoId) -> Option<&mut TodoNode> {
        let node = self.arena.get_mut(id.0)?;
        self.content_version += 1;
        Some(node)
    }

    /// Appends a node as the last child of the root.
    #[instrument(level = "trace", skip(self, text))]
    pub fn append_to_root(&mut self, text: impl Into<String>) -> TodoId {
        let root = self.root;
        let text = text.into();
        let id = TodoId(
            self.arena
                .insert_with(|idx| TodoNode::new(TodoId(idx), root, text)),
        );
        if let Some(root_node) = self.arena.get_mut(root.0) {
            root_node.children.push(id);
        }
        self.structure_version += 1;
        id
    }

    /// Creates a node under `parent` at `position` (appends when None or past the end).
    #[instrument(level = "trace", skip(self, text))]
    pub fn insert_child(
        &mut self,
        parent: TodoId,
        position: Option<usize>,
        text: impl Into<String>,
    ) -> Option<TodoId> {
        if !self.arena.contains(parent.0) {
            return None;
        }
        let text = text.into();
        let id = TodoId(
            self.arena
                .insert_with(|idx| TodoNode::new(TodoId(idx), parent, text)),
        );
        let siblings = &mut self.arena.get_mut(parent.0)?.children;
        let at = position.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(at, id);
        self.structure_version += 1;
        Some(id)
    }

    /// Detaches `id` from its parent and frees it with all descendants.
    ///
    /// Returns the number of freed nodes, or None for unknown ids and the root.
    #[instrument(level = "trace", skip(self))]
    pub fn remove_subtree(&mut self, id: TodoId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        let siblings = &mut self.arena.get_mut(parent.0)?.children;
        let position = siblings.iter().position(|&child| child == id)?;
        siblings.remove(position);

        let doomed: Vec<TodoId> = self.iter_postorder(id).map(TodoNode::id).collect();
        for node in &doomed {
            self.arena.remove(node.0);
        }
        self.structure_version += 1;
        Some(doomed.len())
    }

    /// Current position of `id` within its parent's children.
    #[instrument(level = "trace", skip(self))]
    pub fn index_of(&self, id: TodoId) -> Option<usize> {
        let parent = self.get(id)?.parent?;
        self.get(parent)?
            .children
            .iter()
            .position(|&child| child == id)
    }

    /// Nesting level: 0 for the root, 1 for its children and so on.
    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self, id: TodoId) -> Option<usize> {
        let mut node = self.get(id)?;
        let mut depth = 0;
        while let Some(parent) = node.parent {
            depth += 1;
            node = self.get(parent)?;
        }
        Some(depth)
    }

    /// True when `ancestor` lies strictly above `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn is_descendant_of(&self, id: TodoId, ancestor: TodoId) -> bool {
        let mut current = self.get(id).and_then(TodoNode::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(TodoNode::parent);
        }
        false
    }

    /// Depth-first pre-order over all todos, root excluded.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Post-order over the subtree rooted at `from`, `from` included last.
    pub fn iter_postorder(&self, from: TodoId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, from)
    }
}

pub struct PreOrderIterator<'a> {
    arena: &'a TodoArena,
    stack: Vec<TodoId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(arena: &'a TodoArena) -> Self {
        let stack = arena
            .get(arena.root())
            .map(|root| root.children.iter().rev().copied().collect())
            .unwrap_or_default();
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = &'a TodoNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TodoArena,
    stack: Vec<(TodoId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TodoArena, from: TodoId) -> Self {
        Self {
            arena,
            stack: vec![(from, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = &'a TodoNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get(current) {
                if visited {
                    return Some(node);
                }
                self.stack.push((current, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
