//! # citeplate-core
//!
//! A small Mustache-flavored template engine for bibliographic metadata:
//! citekeys, note filenames, note bodies and structured note fields.
//!
//! Templates support dotted-path variables (`{{issued.date-parts.0.0}}`),
//! truthy and inverted sections (`{{#doi}}...{{/doi}}`, `{{^doi}}...{{/doi}}`),
//! list iteration with loop metadata (`{{@index}}`, `{{@first}}`, ...) and a
//! fixed set of pipe filters (`{{title|titleword|lowercase}}`).
//!
//! ## Quick start
//!
//! ```rust
//! use citeplate_core::{render, RenderOptions, Value};
//! use serde_json::json;
//!
//! let context = Value::from(json!({
//!     "authors_family": ["Smith", "Jones"],
//!     "year": 2024,
//!     "title": "The Structure of Scientific Revolutions",
//! }));
//!
//! let key = render(
//!     "{{authors_family.0|lowercase}}{{year}}{{title|titleword|lowercase}}",
//!     &context,
//!     &RenderOptions::for_citekey(),
//! )
//! .unwrap();
//! assert_eq!(key, "smith2024structure");
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the `Value` data model templates render against
//! - [`path`] — dotted-path resolution over a stack of scopes
//! - [`filter`] — the filter registry
//! - [`renderer`] — node tree + context → output; render options
//! - [`template`] — parsed, reusable templates and their node tree
//! - [`cache`] — parse cache keyed by template text
//! - [`error`] — error types

pub mod cache;
pub mod error;
pub mod filter;
mod parser;
pub mod path;
pub mod renderer;
pub mod template;
pub mod value;

pub use cache::TemplateCache;
pub use error::{Result, SyntaxErrorKind, TemplateError};
pub use filter::Filter;
pub use parser::MAX_SECTION_DEPTH;
pub use path::ContextStack;
pub use renderer::{is_array_template, RenderOptions};
pub use template::{Node, Template};
pub use value::Value;

/// Parse `template` and render it against `context`.
///
/// Fails only if the template is malformed: unbalanced or mismatched
/// sections, empty tags, or unknown filter names. Missing data is never an
/// error and renders as empty text.
pub fn render(template: &str, context: &Value, options: &RenderOptions) -> Result<String> {
    Ok(Template::parse(template)?.render(context, options))
}

/// Like [`render`], with the context given as JSON text.
///
/// ```
/// use citeplate_core::{render_json, RenderOptions};
///
/// let out = render_json("{{#a}}{{.}}{{/a}}", r#"{"a":["x","y"]}"#, &RenderOptions::default());
/// assert_eq!(out.unwrap(), "xy");
/// ```
pub fn render_json(template: &str, context_json: &str, options: &RenderOptions) -> Result<String> {
    let parsed = Template::parse(template)?;
    let context = Value::from_json_str(context_json)?;
    Ok(parsed.render(&context, options))
}

/// Check a template for syntax errors without rendering it.
pub fn validate(template: &str) -> Result<()> {
    Template::parse(template).map(|_| ())
}
