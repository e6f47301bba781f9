//! Renderer -- walks a parsed template against a context stack.
//!
//! Sections behave according to the value their path resolves to:
//!
//! - falsy (absent, `null`, `false`, `0`, `""`, `[]`): body skipped
//! - non-empty list: body rendered once per element, each element pushed as a
//!   scope carrying loop metadata (`@index`, `@number`, `@first`, `@last`,
//!   `@odd`, `@even`, `@length`)
//! - object: pushed as a scope, body rendered once
//! - any other truthy scalar: body rendered once with the scopes unchanged
//!
//! Inverted sections render their body once, scopes unchanged, iff the value
//! is falsy.
//!
//! Mode-specific post-processing runs once over the finished output.

use std::borrow::Cow;

use serde::Deserialize;

use crate::filter;
use crate::path::{ContextStack, LoopMeta};
use crate::template::Node;
use crate::value::Value;

/// How the rendered output is post-processed.
///
/// Deserializes from the host's option objects:
/// `{"sanitizeForCitekey": true, "yamlArray": false}`; missing fields default
/// to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Strip every character outside `[A-Za-z0-9_-]` from the output.
    pub sanitize_for_citekey: bool,
    /// The caller will parse the output as a JSON array. Advisory only: the
    /// renderer neither escapes nor adds brackets, the template must produce
    /// valid array syntax itself.
    pub yaml_array: bool,
}

impl RenderOptions {
    /// Options for citekey generation.
    pub fn for_citekey() -> Self {
        Self {
            sanitize_for_citekey: true,
            ..Self::default()
        }
    }

    /// Options for a structured field whose template produces a JSON array.
    pub fn for_array_field() -> Self {
        Self {
            yaml_array: true,
            ..Self::default()
        }
    }
}

/// Whether a structured-field template looks like it produces a JSON array,
/// i.e. whether a caller should render it with [`RenderOptions::for_array_field`].
pub fn is_array_template(template: &str) -> bool {
    let trimmed = template.trim();
    trimmed.starts_with('[') && trimmed.ends_with(']')
}

/// Render `nodes` against a fresh context stack rooted at `context`, then
/// apply the mode post-processing.
pub(crate) fn render_nodes(nodes: &[Node], context: &Value, options: &RenderOptions) -> String {
    let mut stack = ContextStack::new(context);
    let mut out = String::new();
    render_into(nodes, &mut stack, &mut out);

    if options.sanitize_for_citekey {
        out.retain(is_citekey_char);
    }

    tracing::debug!(
        sanitize_for_citekey = options.sanitize_for_citekey,
        yaml_array = options.yaml_array,
        output_len = out.len(),
        "rendered template"
    );
    out
}

fn is_citekey_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn render_into<'a>(nodes: &[Node], stack: &mut ContextStack<'a>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(text),
            Node::Variable { path, filters } => {
                let text = stack
                    .resolve(path)
                    .map(|value| value.to_template_string())
                    .unwrap_or_default();
                out.push_str(&filter::apply_all(filters, text));
            }
            Node::Section {
                path,
                negated: false,
                body,
            } => render_section(path, body, stack, out),
            Node::Section {
                path,
                negated: true,
                body,
            } => {
                let falsy = stack.resolve(path).map_or(true, |value| !value.is_truthy());
                if falsy {
                    render_into(body, stack, out);
                }
            }
        }
    }
}

fn render_section<'a>(path: &str, body: &[Node], stack: &mut ContextStack<'a>, out: &mut String) {
    let Some(value) = stack.resolve(path) else {
        return;
    };
    if !value.is_truthy() {
        return;
    }

    match value {
        Cow::Borrowed(data) => match data {
            Value::List(items) => {
                let length = items.len();
                for (index, item) in items.iter().enumerate() {
                    stack.push_item(item, LoopMeta { index, length });
                    render_into(body, stack, out);
                    stack.pop();
                }
            }
            Value::Object(_) => {
                stack.push(data);
                render_into(body, stack, out);
                stack.pop();
            }
            _ => render_into(body, stack, out),
        },
        // Loop metadata: always a scalar.
        Cow::Owned(_) => render_into(body, stack, out),
    }
}
