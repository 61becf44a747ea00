//! Scoped translation-mode state.
//!
//! The context is an immutable value threaded as an explicit parameter
//! through every recursive call. Entering a scope clones a modified copy;
//! nothing is restored on exit because nothing was mutated. Sibling
//! subtrees cannot observe each other's overrides by construction, and an
//! early return inside a subtree cannot leak state out of it.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::rc::Rc;

/// Translation-mode flags for the lexical region currently being walked.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Locals declared by the enclosing scope, including the bare `*` and
    /// `**` markers that make rest arguments forwardable.
    locals: Rc<FxHashSet<SmolStr>>,
    in_destructure: bool,
    in_pattern: bool,
}

impl Context {
    /// The context at the top of a compilation unit: no locals, no modes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a scope declaring the given locals, replacing the previous
    /// set entirely.
    pub fn with_locals<I, S>(&self, names: I) -> Context
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        Context {
            locals: Rc::new(names.into_iter().map(Into::into).collect()),
            ..self.clone()
        }
    }

    /// Enters a pattern-match subtree.
    pub fn entering_pattern(&self) -> Context {
        Context {
            in_pattern: true,
            ..self.clone()
        }
    }

    /// Enters a destructuring parameter group.
    pub fn entering_destructure(&self) -> Context {
        Context {
            in_destructure: true,
            ..self.clone()
        }
    }

    /// True inside a pattern-match subtree.
    pub fn in_pattern(&self) -> bool {
        self.in_pattern
    }

    /// True inside a destructuring target.
    pub fn in_destructure(&self) -> bool {
        self.in_destructure
    }

    /// True if the enclosing scope declares the given local (or forwarding
    /// marker).
    pub fn declared(&self, name: &str) -> bool {
        self.locals.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let ctx = Context::new();
        assert!(!ctx.in_pattern());
        assert!(!ctx.in_destructure());
        assert!(!ctx.declared("foo"));
    }

    #[test]
    fn test_modes_compose_independently() {
        let ctx = Context::new().entering_pattern().entering_destructure();
        assert!(ctx.in_pattern());
        assert!(ctx.in_destructure());
    }

    #[test]
    fn test_child_scope_does_not_leak_to_parent() {
        let parent = Context::new().with_locals(["foo"]);
        let child = parent.entering_pattern().with_locals(["bar", "*"]);

        assert!(child.in_pattern());
        assert!(child.declared("bar"));
        assert!(child.declared("*"));
        assert!(!child.declared("foo"));

        // The parent value is untouched by anything the child did.
        assert!(!parent.in_pattern());
        assert!(parent.declared("foo"));
        assert!(!parent.declared("bar"));
    }

    #[test]
    fn test_locals_replace_not_extend() {
        let outer = Context::new().with_locals(["a", "b"]);
        let inner = outer.with_locals(["c"]);
        assert!(!inner.declared("a"));
        assert!(inner.declared("c"));
    }
}
