//! Parsed templates.
//!
//! A [`Template`] is the immutable result of parsing template text once. It can
//! be rendered any number of times, from any number of threads, against
//! different contexts.

use crate::error::Result;
use crate::filter::Filter;
use crate::parser;
use crate::renderer::{self, RenderOptions};
use crate::value::Value;

/// One node of the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Text copied verbatim to the output.
    Literal(String),
    /// `{{path|filter...}}`
    Variable { path: String, filters: Vec<Filter> },
    /// `{{#path}}...{{/path}}` (`negated: false`) or `{{^path}}...{{/path}}` (`negated: true`).
    Section {
        path: String,
        negated: bool,
        body: Vec<Node>,
    },
}

/// A parsed template.
///
/// ```
/// use citeplate_core::{RenderOptions, Template, Value};
/// use serde_json::json;
///
/// let template = Template::parse("{{author|lowercase}}{{year}}").unwrap();
/// let context = Value::from(json!({"author": "Smith", "year": 2024}));
/// assert_eq!(template.render(&context, &RenderOptions::default()), "smith2024");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse template text, validating section structure and filter names.
    pub fn parse(source: &str) -> Result<Template> {
        let nodes = parser::parse(source)?;
        tracing::debug!(
            source_len = source.len(),
            nodes = nodes.len(),
            "parsed template"
        );
        Ok(Template { nodes })
    }

    /// Top-level nodes in source order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Render against `context`. Missing data renders as empty text, so this
    /// cannot fail once the template has parsed.
    pub fn render(&self, context: &Value, options: &RenderOptions) -> String {
        renderer::render_nodes(&self.nodes, context, options)
    }
}
