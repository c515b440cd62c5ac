//! Menu tree and navigation stack
//!
//! The menu tree is built exactly once at startup and never changes shape
//! afterwards. Menus live in an arena owned by [`MenuTree`]; navigation is a
//! stack of [`MenuId`]s, so re-entering a menu always lands on the same
//! object rather than a fresh copy.

use crate::error::{EngineError, Result};
use crate::registry::CommandRegistry;

/// Stable handle to one menu in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(usize);

/// One node in the navigable menu tree
#[derive(Debug)]
pub struct Menu {
    name: String,
    registry: CommandRegistry,
    parent: Option<MenuId>,
    children: Vec<MenuId>,
}

impl Menu {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn parent(&self) -> Option<MenuId> {
        self.parent
    }
}

/// Arena of all menus, rooted at [`MenuTree::root`]
#[derive(Debug)]
pub struct MenuTree {
    menus: Vec<Menu>,
}

impl MenuTree {
    /// Create a tree containing only the root menu
    pub fn new(root_name: impl Into<String>, registry: CommandRegistry) -> Self {
        Self {
            menus: vec![Menu {
                name: root_name.into(),
                registry,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> MenuId {
        MenuId(0)
    }

    /// Add a child menu under `parent`; names must be unique per parent
    pub fn add_child(
        &mut self,
        parent: MenuId,
        name: impl Into<String>,
        registry: CommandRegistry,
    ) -> Result<MenuId> {
        let name = name.into();
        if self.child_named(parent, &name).is_some() {
            return Err(EngineError::DuplicateMenu {
                menu: self.menu(parent).name.clone(),
                child: name,
            });
        }
        let id = MenuId(self.menus.len());
        self.menus.push(Menu {
            name,
            registry,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.menus[parent.0].children.push(id);
        Ok(id)
    }

    pub fn menu(&self, id: MenuId) -> &Menu {
        &self.menus[id.0]
    }

    /// Find a direct child of `parent` by name
    pub fn child_named(&self, parent: MenuId, name: &str) -> Option<MenuId> {
        self.menus[parent.0]
            .children
            .iter()
            .copied()
            .find(|id| self.menus[id.0].name.eq_ignore_ascii_case(name))
    }
}

/// Navigation path from root to the current menu
///
/// Only the path is mutable at runtime; the menus themselves are not.
#[derive(Debug)]
pub struct MenuStack {
    stack: Vec<MenuId>,
}

impl MenuStack {
    pub fn new(root: MenuId) -> Self {
        Self { stack: vec![root] }
    }

    /// The menu currently accepting commands
    pub fn current(&self) -> MenuId {
        // Invariant: the stack always holds at least the root
        *self.stack.last().expect("menu stack never empty")
    }

    /// Enter a submenu
    pub fn push(&mut self, id: MenuId) {
        self.stack.push(id);
    }

    /// Go up one level; returns `false` (a no-op) at root
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Clear the stack back to just the root
    pub fn reset_to_root(&mut self) {
        self.stack.truncate(1);
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The path from root to current, for prompt rendering
    pub fn path(&self) -> &[MenuId] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (MenuTree, MenuId) {
        let mut tree = MenuTree::new("stocks", CommandRegistry::new());
        let ta = tree
            .add_child(tree.root(), "ta", CommandRegistry::new())
            .unwrap();
        (tree, ta)
    }

    #[test]
    fn test_child_lookup() {
        let (tree, ta) = small_tree();
        assert_eq!(tree.child_named(tree.root(), "ta"), Some(ta));
        assert_eq!(tree.child_named(tree.root(), "TA"), Some(ta));
        assert_eq!(tree.child_named(tree.root(), "fa"), None);
        assert_eq!(tree.menu(ta).parent(), Some(tree.root()));
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let (mut tree, _) = small_tree();
        let err = tree
            .add_child(tree.root(), "ta", CommandRegistry::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateMenu { .. }));
    }

    #[test]
    fn test_pop_at_root_is_noop() {
        let (tree, _) = small_tree();
        let mut stack = MenuStack::new(tree.root());
        assert!(!stack.pop());
        assert_eq!(stack.current(), tree.root());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_reentry_preserves_identity() {
        let (tree, ta) = small_tree();
        let mut stack = MenuStack::new(tree.root());

        stack.push(ta);
        let first_visit = stack.current();
        assert!(stack.pop());
        stack.push(ta);

        // Same arena slot, not a fresh instance
        assert_eq!(stack.current(), first_visit);
    }

    #[test]
    fn test_reset_to_root() {
        let (mut tree, ta) = small_tree();
        let deeper = tree.add_child(ta, "custom", CommandRegistry::new()).unwrap();

        let mut stack = MenuStack::new(tree.root());
        stack.push(ta);
        stack.push(deeper);
        assert_eq!(stack.depth(), 3);

        stack.reset_to_root();
        assert_eq!(stack.current(), tree.root());
        assert_eq!(stack.depth(), 1);
    }
}
