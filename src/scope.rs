use std::collections::HashSet;
use std::sync::Arc;

/// Lexical scope threaded through generation.
///
/// The dispatcher never looks inside; only collaborators do. The default
/// expression generator uses it to resolve `this.<name>` reads against
/// locally bound names (slot params, loop variables).
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashSet<String>,
    parent: Option<Arc<Scope>>,
}

impl Scope {
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a child scope binding `names` on top of `self`.
    pub fn derive<I, S>(&self, names: I) -> Scope
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope {
            bindings: names.into_iter().map(Into::into).collect(),
            parent: Some(Arc::new(self.clone())),
        }
    }

    /// Whether `name` is bound here or in any enclosing scope.
    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains(name) || self.parent.as_ref().is_some_and(|p| p.has(name))
    }

    /// `true` when no scope in the chain binds anything.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty() && self.parent.as_ref().map_or(true, |p| p.is_empty())
    }
}
