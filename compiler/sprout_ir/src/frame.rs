//! Lexical scopes.
//!
//! A `Frame` is created when the parser opens a block and lives for the
//! whole program: the control node that owns the block re-executes against
//! the same frame on every activation, so bindings persist across loop
//! passes and function calls.
//!
//! The function table is a second shared handle: every frame created while
//! parsing shares the table of the outermost frame, so a function defined
//! at the top level is callable from anywhere. At call time a function
//! frame copies its parent's table handle before detaching from the chain,
//! which is what makes recursion work while the parent pointer is gone.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::ast::FunctionDef;
use crate::shared::Shared;
use crate::value::ValueRef;

pub type FrameRef = Shared<Frame>;
pub type FunctionTable = Shared<FxHashMap<String, Rc<FunctionDef>>>;

#[derive(Debug, Default)]
pub struct Frame {
    vars: FxHashMap<String, ValueRef>,
    parent: Option<FrameRef>,
    loop_active: bool,
    functions: FunctionTable,
}

impl Frame {
    /// A frame with no parent and a fresh function table.
    pub fn root() -> FrameRef {
        Shared::new(Frame::default())
    }

    /// A child frame chained to `parent`, sharing its function table.
    pub fn child_of(parent: &FrameRef) -> FrameRef {
        let functions = parent.borrow().functions.clone();
        Shared::new(Frame {
            vars: FxHashMap::default(),
            parent: Some(parent.clone()),
            loop_active: false,
            functions,
        })
    }

    pub fn get_local(&self, name: &str) -> Option<ValueRef> {
        self.vars.get(name).cloned()
    }

    pub fn has_local(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn set_local(&mut self, name: impl Into<String>, value: ValueRef) {
        self.vars.insert(name.into(), value);
    }

    pub fn parent(&self) -> Option<FrameRef> {
        self.parent.clone()
    }

    pub fn set_parent(&mut self, parent: Option<FrameRef>) {
        self.parent = parent;
    }

    pub fn loop_active(&self) -> bool {
        self.loop_active
    }

    pub fn set_loop_active(&mut self, active: bool) {
        self.loop_active = active;
    }

    pub fn functions(&self) -> FunctionTable {
        self.functions.clone()
    }

    pub fn set_functions(&mut self, table: FunctionTable) {
        self.functions = table;
    }

    pub fn define_function(&self, def: Rc<FunctionDef>) {
        self.functions.borrow_mut().insert(def.name.clone(), def);
    }

    /// Walks the chain from `frame` outward for `name`.
    pub fn lookup(frame: &FrameRef, name: &str) -> Option<ValueRef> {
        let mut current = frame.clone();
        loop {
            if let Some(value) = current.borrow().get_local(name) {
                return Some(value);
            }
            let parent = current.borrow().parent();
            match parent {
                Some(next) => current = next,
                None => return None,
            }
        }
    }

    /// Nearest frame in the chain that already binds `name`.
    pub fn owner_of(frame: &FrameRef, name: &str) -> Option<FrameRef> {
        let mut current = frame.clone();
        loop {
            if current.borrow().has_local(name) {
                return Some(current);
            }
            let parent = current.borrow().parent();
            match parent {
                Some(next) => current = next,
                None => return None,
            }
        }
    }

    /// End of the parent chain, seen from `frame`.
    pub fn outermost(frame: &FrameRef) -> FrameRef {
        let mut current = frame.clone();
        loop {
            let parent = current.borrow().parent();
            match parent {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// Rebinds `name` in the nearest frame that owns it, or creates it in
    /// the outermost frame when nothing in the chain does.
    pub fn assign(frame: &FrameRef, name: &str, value: ValueRef) {
        let target = Frame::owner_of(frame, name).unwrap_or_else(|| Frame::outermost(frame));
        target.borrow_mut().set_local(name, value);
    }

    /// Clears the loop flag of the nearest frame in the chain that has it
    /// set. Returns false when no enclosing frame is looping.
    pub fn clear_nearest_loop(frame: &FrameRef) -> bool {
        let mut current = frame.clone();
        loop {
            if current.borrow().loop_active() {
                current.borrow_mut().set_loop_active(false);
                return true;
            }
            let parent = current.borrow().parent();
            match parent {
                Some(next) => current = next,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::Value;

    fn chain() -> (FrameRef, FrameRef, FrameRef) {
        let root = Frame::root();
        let mid = Frame::child_of(&root);
        let leaf = Frame::child_of(&mid);
        (root, mid, leaf)
    }

    mod lookup {
        use super::*;

        #[test]
        fn walks_outward_through_the_chain() {
            let (root, _mid, leaf) = chain();
            root.borrow_mut().set_local("x", Value::Int(7).into_ref());
            let found = Frame::lookup(&leaf, "x");
            assert!(found.is_some_and(|v| *v.borrow() == Value::Int(7)));
        }

        #[test]
        fn inner_binding_shadows_outer() {
            let (root, _mid, leaf) = chain();
            root.borrow_mut().set_local("x", Value::Int(1).into_ref());
            leaf.borrow_mut().set_local("x", Value::Int(2).into_ref());
            let found = Frame::lookup(&leaf, "x");
            assert!(found.is_some_and(|v| *v.borrow() == Value::Int(2)));
        }

        #[test]
        fn missing_name_is_none() {
            let (_root, _mid, leaf) = chain();
            assert!(Frame::lookup(&leaf, "ghost").is_none());
        }
    }

    mod assign {
        use super::*;

        #[test]
        fn rebinds_in_the_nearest_owner() {
            let (root, mid, leaf) = chain();
            mid.borrow_mut().set_local("x", Value::Int(1).into_ref());
            Frame::assign(&leaf, "x", Value::Int(9).into_ref());

            assert!(mid
                .borrow()
                .get_local("x")
                .is_some_and(|v| *v.borrow() == Value::Int(9)));
            assert!(!root.borrow().has_local("x"));
            assert!(!leaf.borrow().has_local("x"));
        }

        #[test]
        fn unbound_name_lands_in_the_outermost_frame() {
            let (root, _mid, leaf) = chain();
            Frame::assign(&leaf, "fresh", Value::Int(3).into_ref());
            assert!(root.borrow().has_local("fresh"));
            assert!(!leaf.borrow().has_local("fresh"));
        }
    }

    mod loops {
        use super::*;

        #[test]
        fn clear_nearest_loop_stops_at_the_first_active_frame() {
            let (root, mid, leaf) = chain();
            root.borrow_mut().set_loop_active(true);
            mid.borrow_mut().set_loop_active(true);

            assert!(Frame::clear_nearest_loop(&leaf));
            assert!(!mid.borrow().loop_active());
            assert!(root.borrow().loop_active());
        }

        #[test]
        fn no_active_loop_reports_false() {
            let (_root, _mid, leaf) = chain();
            assert!(!Frame::clear_nearest_loop(&leaf));
        }
    }

    #[test]
    fn children_share_the_root_function_table() {
        let (root, _mid, leaf) = chain();
        let root_table = root.borrow().functions();
        let leaf_table = leaf.borrow().functions();
        assert!(root_table.ptr_eq(&leaf_table));
        assert_eq!(leaf_table.borrow().len(), 0);
    }
}
