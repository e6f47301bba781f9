//! WASM bindings for citeplate-core.
//!
//! Exposes `render`, `validate` and `isArrayTemplate` as `#[wasm_bindgen]`
//! functions so a JavaScript host (e.g. a settings pane with a live template
//! preview) can call the engine directly. Built with `wasm-bindgen-cli`.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p citeplate-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/citeplate-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/citeplate_wasm.wasm
//! ```
//!
//! Parsed templates are cached per module instance, so a preview that
//! re-renders the same template on every metadata change only parses it once.
//! The cache is bounded: every keystroke in the template editor produces a new
//! template text, and only the most recently used ones are kept.

use std::sync::OnceLock;

use citeplate_core::{RenderOptions, TemplateCache, Value};
use wasm_bindgen::prelude::*;

/// Enough for every configured template plus the one being edited.
const CACHE_CAPACITY: usize = 64;

fn cache() -> &'static TemplateCache {
    static CACHE: OnceLock<TemplateCache> = OnceLock::new();
    CACHE.get_or_init(|| TemplateCache::with_capacity(CACHE_CAPACITY))
}

/// Render `template` against a JSON context.
///
/// Returns the rendered text, or throws a JS error if the template is
/// malformed or the context is not valid JSON.
#[wasm_bindgen]
pub fn render(
    template: &str,
    context_json: &str,
    sanitize_for_citekey: bool,
    yaml_array: bool,
) -> std::result::Result<String, JsValue> {
    let options = RenderOptions {
        sanitize_for_citekey,
        yaml_array,
    };
    let parsed = cache().get_or_parse(template).map_err(to_js)?;
    let context = Value::from_json_str(context_json).map_err(to_js)?;
    Ok(parsed.render(&context, &options))
}

/// Check a template for syntax errors. Throws a JS error describing the first
/// problem, with its line and column.
#[wasm_bindgen]
pub fn validate(template: &str) -> std::result::Result<(), JsValue> {
    cache().get_or_parse(template).map(|_| ()).map_err(to_js)
}

/// Whether a structured-field template looks like a JSON array template.
#[wasm_bindgen(js_name = isArrayTemplate)]
pub fn is_array_template(template: &str) -> bool {
    citeplate_core::is_array_template(template)
}

fn to_js(err: citeplate_core::TemplateError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
