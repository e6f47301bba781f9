//! Template parser -- turns template text into a tree of [`Node`]s.
//!
//! The scanner looks for `{{ ... }}` pairs and classifies each tag by its
//! leading sigil:
//!
//! - `{{path|f1|f2}}` -- variable with filters
//! - `{{.}}` -- variable on the current scope
//! - `{{#path}}` -- section, rendered when `path` is truthy (iterates lists)
//! - `{{^path}}` -- inverted section, rendered when `path` is falsy
//! - `{{/path}}` -- closes the innermost open section
//!
//! Text outside tags is kept verbatim, newlines included. A `{{` with no
//! matching `}}` is plain text, so a template without a complete tag renders to
//! itself.
//!
//! # Key design decisions
//!
//! - **Explicit open-section stack**: each open section stashes the node list it
//!   interrupted; closing it swaps that list back in and appends the finished
//!   section. Rendering and dropping the tree do recurse per level, so
//!   nesting is capped at [`MAX_SECTION_DEPTH`] open sections.
//! - **Filters resolved here**: names are checked against the registry while
//!   parsing, so rendering a parsed template cannot fail.

use std::mem;

use crate::error::{Result, SyntaxErrorKind, TemplateError};
use crate::filter::Filter;
use crate::template::Node;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const PIPE: char = '|';

/// Maximum number of sections open at the same time.
pub const MAX_SECTION_DEPTH: usize = 256;

/// A section whose close tag has not been seen yet.
struct OpenSection {
    path: String,
    negated: bool,
    /// Byte offset of the opening `{{`, for error positions.
    offset: usize,
    /// Nodes preceding the section at the enclosing level.
    parent: Vec<Node>,
}

struct Parser<'s> {
    source: &'s str,
    open: Vec<OpenSection>,
    current: Vec<Node>,
}

/// Parse a template into its node list.
pub(crate) fn parse(source: &str) -> Result<Vec<Node>> {
    let mut parser = Parser {
        source,
        open: Vec::new(),
        current: Vec::new(),
    };
    parser.run()?;
    Ok(parser.current)
}

impl<'s> Parser<'s> {
    fn run(&mut self) -> Result<()> {
        let source = self.source;
        let mut pos = 0;

        while let Some(rel_open) = source[pos..].find(OPEN) {
            let tag_start = pos + rel_open;
            let body_start = tag_start + OPEN.len();
            let Some(rel_close) = source[body_start..].find(CLOSE) else {
                // Unclosed `{{` -- the rest of the template is text.
                break;
            };
            let body_end = body_start + rel_close;

            self.push_literal(&source[pos..tag_start]);
            self.tag(&source[body_start..body_end], tag_start)?;
            pos = body_end + CLOSE.len();
        }
        self.push_literal(&source[pos..]);

        if let Some(section) = self.open.pop() {
            return Err(self.error(
                section.offset,
                SyntaxErrorKind::UnterminatedSection {
                    open: section.path,
                },
            ));
        }
        Ok(())
    }

    fn push_literal(&mut self, text: &str) {
        if !text.is_empty() {
            self.current.push(Node::Literal(text.to_string()));
        }
    }

    /// Classify one tag body (the text between the delimiters).
    fn tag(&mut self, raw: &str, offset: usize) -> Result<()> {
        let tag = raw.trim();
        if let Some(rest) = tag.strip_prefix('#') {
            self.open_section(rest, false, offset)
        } else if let Some(rest) = tag.strip_prefix('^') {
            self.open_section(rest, true, offset)
        } else if let Some(rest) = tag.strip_prefix('/') {
            self.close_section(rest, offset)
        } else {
            self.variable(tag, offset)
        }
    }

    fn open_section(&mut self, raw: &str, negated: bool, offset: usize) -> Result<()> {
        let path = self.section_path(raw, offset)?;
        if self.open.len() >= MAX_SECTION_DEPTH {
            return Err(self.error(
                offset,
                SyntaxErrorKind::NestingTooDeep {
                    limit: MAX_SECTION_DEPTH,
                },
            ));
        }
        self.open.push(OpenSection {
            path,
            negated,
            offset,
            parent: mem::take(&mut self.current),
        });
        Ok(())
    }

    fn close_section(&mut self, raw: &str, offset: usize) -> Result<()> {
        let close = self.section_path(raw, offset)?;
        let Some(section) = self.open.pop() else {
            return Err(self.error(offset, SyntaxErrorKind::UnexpectedClose { close }));
        };
        if section.path != close {
            return Err(self.error(
                offset,
                SyntaxErrorKind::MismatchedClose {
                    open: section.path,
                    close,
                },
            ));
        }

        let body = mem::replace(&mut self.current, section.parent);
        self.current.push(Node::Section {
            path: section.path,
            negated: section.negated,
            body,
        });
        Ok(())
    }

    /// Validate the path of a section or close tag: non-empty, no filters.
    fn section_path(&self, raw: &str, offset: usize) -> Result<String> {
        let path = raw.trim();
        if path.is_empty() {
            return Err(self.error(offset, SyntaxErrorKind::EmptyTag));
        }
        if path.contains(PIPE) {
            return Err(self.error(
                offset,
                SyntaxErrorKind::FilterOnSection {
                    path: path.to_string(),
                },
            ));
        }
        Ok(path.to_string())
    }

    /// `path|filter|filter`, each segment trimmed.
    fn variable(&mut self, tag: &str, offset: usize) -> Result<()> {
        let mut segments = tag.split(PIPE).map(str::trim);
        let path = segments.next().unwrap_or_default();
        if path.is_empty() {
            return Err(self.error(offset, SyntaxErrorKind::EmptyTag));
        }

        let filters = segments
            .map(|name| {
                Filter::from_name(name).ok_or_else(|| {
                    self.error(
                        offset,
                        SyntaxErrorKind::UnknownFilter {
                            name: name.to_string(),
                        },
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.current.push(Node::Variable {
            path: path.to_string(),
            filters,
        });
        Ok(())
    }

    /// Build a syntax error positioned at byte `offset` of the source.
    fn error(&self, offset: usize, kind: SyntaxErrorKind) -> TemplateError {
        let (line, column) = line_column(self.source, offset);
        TemplateError::Syntax { line, column, kind }
    }
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
