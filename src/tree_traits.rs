/*
Rendering lives behind a trait so the store stays free of display concerns;
termtree does the box drawing.
 */
use std::collections::HashMap;

use termtree::Tree;
use tracing::instrument;

use crate::application::TodoListStore;
use crate::domain::{TodoArena, TodoId};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TodoArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        // post-order, so every child tree is finished before its parent takes it
        let mut built: HashMap<TodoId, Tree<String>> = HashMap::new();
        for node in self.iter_postorder(self.root()) {
            let label = if node.is_root() {
                format!("todos ({})", self.len())
            } else {
                let mark = if node.completed { "[x]" } else { "[ ]" };
                format!("{} {}", mark, node.text)
            };
            let leaves: Vec<Tree<String>> = node
                .children()
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(node.id(), Tree::new(label).with_leaves(leaves));
        }
        built
            .remove(&self.root())
            .unwrap_or_else(|| Tree::new(format!("todos ({})", self.len())))
    }
}

impl TreeNodeConvert for TodoListStore {
    fn to_tree_string(&self) -> Tree<String> {
        self.tree().to_tree_string()
    }
}
