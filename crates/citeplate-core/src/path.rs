//! Dotted-path resolution against a stack of nested scopes.
//!
//! # Lookup rules
//!
//! - `.` alone is the innermost scope's current value.
//! - Otherwise the path is split on `.`. Scopes are tried innermost first; the
//!   first scope in which the **first** segment resolves wins, and the rest of
//!   the path is resolved against that value only (no fallback mid-path).
//! - Objects are indexed by key, lists by non-negative integer segments.
//!   Anything else is absent.
//!
//! Loop metadata (`@index`, `@first`, ...) lives on the scope pushed for each
//! list element, so it shadows like any other binding: an inner loop's
//! `@index` hides the outer loop's.

use std::borrow::Cow;

use crate::value::Value;

/// The current-scope path.
pub const CURRENT: &str = ".";

static NULL: Value = Value::Null;

/// Position of a list element within the list being iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopMeta {
    pub index: usize,
    pub length: usize,
}

impl LoopMeta {
    /// Value of a `@name` binding, or `None` if `name` is not a loop binding.
    fn binding(&self, name: &str) -> Option<Value> {
        let value = match name {
            "@index" => Value::Integer(self.index as i64),
            "@number" => Value::Integer(self.index as i64 + 1),
            "@first" => Value::Bool(self.index == 0),
            "@last" => Value::Bool(self.index + 1 == self.length),
            "@odd" => Value::Bool(self.index % 2 == 1),
            "@even" => Value::Bool(self.index % 2 == 0),
            "@length" => Value::Integer(self.length as i64),
            _ => return None,
        };
        Some(value)
    }
}

/// A single layer of the context stack.
#[derive(Debug, Clone, Copy)]
struct Scope<'a> {
    value: &'a Value,
    meta: Option<LoopMeta>,
}

impl<'a> Scope<'a> {
    /// Resolve the first path segment in this scope alone.
    fn lookup(&self, segment: &str) -> Option<Cow<'a, Value>> {
        if let Some(meta) = &self.meta {
            if let Some(bound) = meta.binding(segment) {
                return Some(Cow::Owned(bound));
            }
        }
        step(self.value, segment).map(Cow::Borrowed)
    }
}

/// Ordered scopes, root first, innermost last.
#[derive(Debug, Clone)]
pub struct ContextStack<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> ContextStack<'a> {
    /// A stack holding only the caller-supplied root context.
    pub fn new(root: &'a Value) -> Self {
        Self {
            scopes: vec![Scope {
                value: root,
                meta: None,
            }],
        }
    }

    /// Push a section object as the new innermost scope.
    pub fn push(&mut self, value: &'a Value) {
        self.scopes.push(Scope { value, meta: None });
    }

    /// Push a list element together with its loop metadata.
    pub fn push_item(&mut self, item: &'a Value, meta: LoopMeta) {
        self.scopes.push(Scope {
            value: item,
            meta: Some(meta),
        });
    }

    /// Pop the innermost scope. The root scope is never removed.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of scopes, including the root.
    #[cfg(test)]
    fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost scope's value.
    pub fn current(&self) -> &'a Value {
        // The root scope is never popped, so the fallback is unreachable.
        self.scopes.last().map_or(&NULL, |scope| scope.value)
    }

    /// Resolve a dotted path. Loop metadata is synthesized, so it comes back
    /// owned; everything else borrows from the context tree.
    pub fn resolve(&self, path: &str) -> Option<Cow<'a, Value>> {
        if path == CURRENT {
            return Some(Cow::Borrowed(self.current()));
        }

        let mut segments = path.split('.');
        let first = segments.next()?;

        let mut found = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(first))?;

        for segment in segments {
            found = match found {
                Cow::Borrowed(value) => Cow::Borrowed(step(value, segment)?),
                // Loop bindings are scalars; there is nothing to descend into.
                Cow::Owned(value) => Cow::Owned(step(&value, segment)?.clone()),
            };
        }
        Some(found)
    }
}

/// One resolution step: object key, or list index for numeric segments.
fn step<'v>(value: &'v Value, segment: &str) -> Option<&'v Value> {
    match value {
        Value::Object(_) => value.get(segment),
        Value::List(_) if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) => {
            segment.parse::<usize>().ok().and_then(|idx| value.index(idx))
        }
        _ => None,
    }
}
