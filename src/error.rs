//! Error types.
//!
//! Compiling a template can only fail with a [`ParseError`], which is always
//! reported before any rendering begins. Rendering fails with a
//! [`RenderError`], which wraps one of the specific kinds:
//!
//! - [`ContextError`] when a variable path cannot be traversed,
//! - [`FilterError`] when a filter is unknown or fails,
//! - [`TagError`] when a tag is unknown or its handler fails.
//!
//! Missing data is never an error, it resolves to `null`.
use crate::{
    log::{locate, Pointer, Visual, RED, RESET},
    region::Region,
};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Boxed error used as the cause of a [`FilterError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Any error returned by the [`Engine`][`crate::Engine`].
#[derive(Debug, Error)]
pub enum Error {
    /// The template could not be compiled.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The template could not be rendered.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl From<ContextError> for Error {
    fn from(value: ContextError) -> Self {
        Error::Render(value.into())
    }
}

impl From<FilterError> for Error {
    fn from(value: FilterError) -> Self {
        Error::Render(value.into())
    }
}

impl From<TagError> for Error {
    fn from(value: TagError) -> Self {
        Error::Render(value.into())
    }
}

/// Describes a failure that happened while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Tag(#[from] TagError),
    /// Writing to the output buffer failed.
    #[error("failed to write rendered output")]
    Write,
}

impl From<fmt::Error> for RenderError {
    fn from(_: fmt::Error) -> Self {
        RenderError::Write
    }
}

/// A variable path could not be traversed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot resolve `{path}`: {message}")]
pub struct ContextError {
    /// The full path that was being resolved.
    pub path: String,
    /// Describes why traversal stopped.
    pub message: String,
}

impl ContextError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A filter was not found, or returned an error.
///
/// # Examples
///
/// ```
/// use quill::error::FilterError;
///
/// let error = FilterError::build("expected a string").with_name("upcase");
/// assert_eq!(error.to_string(), "filter `upcase` failed: expected a string");
/// ```
#[derive(Debug, Error)]
#[error("filter `{name}` failed: {message}")]
pub struct FilterError {
    /// Name of the filter, assigned by the renderer when left empty.
    pub name: String,
    /// Describes the failure.
    pub message: String,
    /// The underlying error, if any.
    #[source]
    pub cause: Option<BoxError>,
}

impl FilterError {
    /// Create a new [`FilterError`] with the given message.
    ///
    /// The name is filled in with the name the filter was registered under
    /// when the error reaches the renderer.
    pub fn build<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: String::new(),
            message: message.into(),
            cause: None,
        }
    }

    /// Set the filter name.
    pub fn with_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.name = name.into();

        self
    }

    /// Set the underlying error.
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.cause = Some(cause.into());

        self
    }
}

/// A tag was not found, or its handler failed.
#[derive(Debug, Error)]
#[error("tag `{name}` failed: {message}")]
pub struct TagError {
    /// Name of the tag.
    pub name: String,
    /// Describes the failure.
    pub message: String,
    /// The error raised while rendering the body of the tag, if any.
    #[source]
    pub cause: Option<Box<RenderError>>,
}

impl TagError {
    /// Create a new [`TagError`].
    pub fn new<N, M>(name: N, message: M) -> Self
    where
        N: Into<String>,
        M: Into<String>,
    {
        Self {
            name: name.into(),
            message: message.into(),
            cause: None,
        }
    }

    /// Wrap an error raised while rendering the body of the named tag.
    ///
    /// The original error is preserved as the cause.
    pub fn wrap<N>(name: N, cause: RenderError) -> Self
    where
        N: Into<String>,
    {
        Self {
            name: name.into(),
            message: cause.to_string(),
            cause: Some(Box::new(cause)),
        }
    }
}

/// Describes malformed template syntax.
///
/// When printed with `{:#}`, a pointer into the source is included:
///
/// ```text
/// error: unexpected eof
///   --> 1:11
///    |
///  1 | {{ invalid
///    |           ^---
///    |
///   = help: expected end of expression
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Short summary of the error.
    pub message: String,
    /// Additional information to display with the error.
    pub help: Option<String>,
    /// Byte offset into the source where the error was found.
    pub position: Option<usize>,
    /// 1-indexed line of `position`.
    pub line: Option<usize>,
    /// 1-indexed column of `position`.
    pub column: Option<usize>,
    /// Visualization of the location.
    pointer: Option<Pointer>,
}

impl ParseError {
    /// Create a new [`ParseError`] with the given message.
    pub fn build<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            message: message.into(),
            help: None,
            position: None,
            line: None,
            column: None,
            pointer: None,
        }
    }

    /// Set the help text, which is contextual information to accompany the
    /// message.
    pub fn with_help<T>(mut self, text: T) -> Self
    where
        T: Into<String>,
    {
        self.help = Some(text.into());

        self
    }

    /// Point the error at the given [`Region`] of the source text.
    ///
    /// Sets the position, line and column along with the visualization.
    pub fn with_pointer<T>(mut self, source: &str, region: T) -> Self
    where
        T: Into<Region>,
    {
        let region = region.into();
        let (line, column) = locate(source, region.begin);
        self.position = Some(region.begin);
        self.line = Some(line);
        self.column = Some(column);
        self.pointer = Some(Pointer::new(source, region));

        self
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{RED}error{RESET}: {}", self.message)?;
            if let Some(pointer) = &self.pointer {
                return pointer.display(f, self.help.as_deref());
            }
            return Ok(());
        }

        write!(f, "{}", self.message)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " at line {line}, column {column}")?;
        }
        if let Some(help) = &self.help {
            write!(f, " ({help})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_parse_error_location() {
        let error = ParseError::build("unexpected eof").with_pointer("a\n{{ b", 6..6);

        assert_eq!(error.position, Some(6));
        assert_eq!(error.line, Some(2));
        assert_eq!(error.column, Some(5));
        assert_eq!(error.to_string(), "unexpected eof at line 2, column 5");
    }

    #[test]
    fn test_parse_error_pointer_location() {
        let error = ParseError::build("unexpected eof")
            .with_help("expected end of expression")
            .with_pointer("a\n{{ b", 6..6);
        let shown = format!("{error:#}");

        assert!(shown.contains("--> 2:5"));
        assert!(shown.contains(" 2 | {{ b"));
        assert!(shown.contains("= help: expected end of expression"));
    }

    #[test]
    fn test_tag_error_preserves_cause() {
        let inner = RenderError::from(ContextError::new("user.name", "not an object"));
        let error = TagError::wrap("for", inner);

        let source = error.source().expect("cause should be kept");
        assert_eq!(source.to_string(), "cannot resolve `user.name`: not an object");
    }

    #[test]
    fn test_filter_error_cause_chain() {
        let parse = "x".parse::<f64>().unwrap_err();
        let error = FilterError::build("invalid number")
            .with_name("plus")
            .with_cause(parse);

        assert!(error.source().is_some());
        assert_eq!(error.to_string(), "filter `plus` failed: invalid number");
    }
}
