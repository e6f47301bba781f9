//! Error types for template parsing and rendering.

use thiserror::Error;

/// Errors that can occur while parsing a template or loading its context.
///
/// Rendering a parsed [`crate::Template`] never fails: missing data renders as
/// empty text. Everything that can go wrong is caught while parsing.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template text is structurally invalid.
    /// Line and column are 1-based and point at the opening `{{` of the offending tag.
    #[error("template syntax error at line {line}, column {column}: {kind}")]
    Syntax {
        line: usize,
        column: usize,
        kind: SyntaxErrorKind,
    },

    /// The context supplied as JSON text could not be parsed.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl TemplateError {
    /// The syntax error kind, if this is a syntax error.
    pub fn syntax_kind(&self) -> Option<&SyntaxErrorKind> {
        match self {
            TemplateError::Syntax { kind, .. } => Some(kind),
            TemplateError::JsonParse(_) => None,
        }
    }
}

/// What exactly is wrong with a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// `{{/close}}` named a different path than the innermost open section.
    #[error("section `{open}` is closed by `{{{{/{close}}}}}`")]
    MismatchedClose { open: String, close: String },

    /// `{{/close}}` with no open section.
    #[error("unexpected close tag `{{{{/{close}}}}}` with no open section")]
    UnexpectedClose { close: String },

    /// End of input reached while a section was still open.
    #[error("unterminated section `{open}`")]
    UnterminatedSection { open: String },

    /// A `|name` segment that is not in the filter registry.
    #[error("unknown filter `{name}`")]
    UnknownFilter { name: String },

    /// A tag with nothing to resolve, e.g. `{{}}` or `{{#}}`.
    #[error("empty tag")]
    EmptyTag,

    /// Filters are only meaningful on variables.
    #[error("filters are not allowed on section tag `{path}`")]
    FilterOnSection { path: String },

    /// More sections open at once than [`crate::MAX_SECTION_DEPTH`].
    #[error("sections nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Convenience alias used throughout citeplate-core.
pub type Result<T> = std::result::Result<T, TemplateError>;
