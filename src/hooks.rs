//! Hook stacks: per-kind middleware around the default emitters.
//!
//! Hooks registered for a kind compose outermost-first: the first hook sees
//! the value before everyone else and the default emitter is the terminal.
//! Each hook receives a [`Next`] handle; it may call through, call through
//! with a different value, post-process the result, or return its own text
//! without calling through at all. Child values a hook generates itself go
//! through [`Next::generate`], which stays inside the running dispatch (and
//! its depth limit).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::GenerateOptions;
use crate::error::Result;
use crate::scope::Scope;
use crate::value::{CompositeValue, ValueKind};

/// A single interceptor in a hook stack.
pub trait Interceptor: Send + Sync {
    fn intercept(
        &self,
        value: &CompositeValue,
        scope: &Scope,
        options: &GenerateOptions,
        next: Next<'_>,
    ) -> Result<String>;
}

impl<F> Interceptor for F
where
    F: Fn(&CompositeValue, &Scope, &GenerateOptions, Next<'_>) -> Result<String> + Send + Sync,
{
    fn intercept(
        &self,
        value: &CompositeValue,
        scope: &Scope,
        options: &GenerateOptions,
        next: Next<'_>,
    ) -> Result<String> {
        self(value, scope, options, next)
    }
}

pub type Hook = Arc<dyn Interceptor>;

/// Terminal emitter at the bottom of a stack.
pub type Emitter<'a> = dyn Fn(&CompositeValue, &Scope) -> Result<String> + 'a;

/// Continuation handed to each hook: the rest of the stack plus the terminal.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    kind: ValueKind,
    rest: &'a [Hook],
    terminal: &'a Emitter<'a>,
    nested: &'a Emitter<'a>,
    options: &'a GenerateOptions,
}

impl<'a> Next<'a> {
    /// Kind whose stack is being executed.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Continue with the next hook, or the default emitter when none remain.
    pub fn run(&self, value: &CompositeValue, scope: &Scope) -> Result<String> {
        match self.rest.split_first() {
            Some((hook, rest)) => hook.intercept(
                value,
                scope,
                self.options,
                Next {
                    rest,
                    ..*self
                },
            ),
            None => (self.terminal)(value, scope),
        }
    }

    /// Generate a child value one level below the value being intercepted.
    pub fn generate(&self, child: &CompositeValue, scope: &Scope) -> Result<String> {
        (self.nested)(child, scope)
    }
}

/// Run `hooks` around `terminal` for a value of `kind`. `nested` generates
/// child values on behalf of the hooks.
pub fn execute(
    value: &CompositeValue,
    scope: &Scope,
    kind: ValueKind,
    hooks: &[Hook],
    terminal: &Emitter<'_>,
    nested: &Emitter<'_>,
    options: &GenerateOptions,
) -> Result<String> {
    Next {
        kind,
        rest: hooks,
        terminal,
        nested,
        options,
    }
    .run(value, scope)
}

// ═══════════════════════════════════════════════════════════════════════════════
// HANDLER SET
// ═══════════════════════════════════════════════════════════════════════════════

/// Registered hook stacks, keyed by value kind.
#[derive(Clone, Default)]
pub struct HandlerSet {
    stacks: HashMap<ValueKind, Vec<Hook>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closure hook to the stack for `kind`.
    pub fn push<F>(&mut self, kind: ValueKind, hook: F) -> &mut Self
    where
        F: Fn(&CompositeValue, &Scope, &GenerateOptions, Next<'_>) -> Result<String>
            + Send
            + Sync
            + 'static,
    {
        self.push_interceptor(kind, hook)
    }

    pub fn push_interceptor(
        &mut self,
        kind: ValueKind,
        hook: impl Interceptor + 'static,
    ) -> &mut Self {
        self.stacks.entry(kind).or_default().push(Arc::new(hook));
        self
    }

    /// Builder form of [`HandlerSet::push`].
    pub fn with<F>(mut self, kind: ValueKind, hook: F) -> Self
    where
        F: Fn(&CompositeValue, &Scope, &GenerateOptions, Next<'_>) -> Result<String>
            + Send
            + Sync
            + 'static,
    {
        self.push(kind, hook);
        self
    }

    /// The stack for `kind`; an empty stack counts as absent.
    pub fn stack(&self, kind: ValueKind) -> Option<&[Hook]> {
        self.stacks
            .get(&kind)
            .map(Vec::as_slice)
            .filter(|hooks| !hooks.is_empty())
    }

    pub fn clear(&mut self, kind: ValueKind) {
        self.stacks.remove(&kind);
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in ValueKind::ALL {
            if let Some(hooks) = self.stack(kind) {
                map.entry(&kind.as_str(), &hooks.len());
            }
        }
        map.finish()
    }
}
