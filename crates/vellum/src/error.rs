//! Error types for template loading and rendering.
//!
//! [`TemplateError`] is returned by every fallible operation of the
//! [`TemplateManager`](crate::TemplateManager). Nothing is retried and nothing
//! is fatal: each variant identifies what failed so the caller can decide what
//! to show. When the caller needs to answer a request anyway, the error can
//! render the static fallback page via [`TemplateError::render_fallback`].

use std::io;
use std::path::PathBuf;

use crate::data::RenderData;
use crate::template::ErrorTemplate;

/// Errors produced while configuring, loading or rendering templates.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A template file is missing or unreadable.
    #[error("error reading template file '{name}' at {}: {source}", .path.display())]
    FileRead {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A template failed to compile.
    #[error("error parsing template '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The requested template was never registered.
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// The engine failed while executing a template.
    #[error("error executing template '{name}': {source}")]
    Execute {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The name is taken by the configured layout.
    #[error("template name '{name}' is reserved for the layout")]
    ReservedName { name: String },

    /// Render data could not be turned into a key-value context.
    #[error("invalid render data: {0}")]
    Data(String),

    /// Writing to the output stream failed outside the engine.
    #[error("error writing output: {0}")]
    Write(#[source] io::Error),

    /// Delimiters are a parse-time property and cannot change once loading began.
    #[error("delimiters cannot be changed after templates have been loaded")]
    DelimitersLocked,

    /// The delimiter pair was rejected.
    #[error("invalid delimiters '{left}' / '{right}': {reason}")]
    InvalidDelimiters {
        left: String,
        right: String,
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TemplateError {
    pub(crate) fn invalid_delimiters(
        left: impl Into<String>,
        right: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidDelimiters {
            left: left.into(),
            right: right.into(),
            reason: reason.into(),
        }
    }

    /// The logical template name this error refers to, if any.
    pub fn template_name(&self) -> Option<&str> {
        match self {
            Self::FileRead { name, .. }
            | Self::Parse { name, .. }
            | Self::NotFound { name }
            | Self::ReservedName { name }
            | Self::Execute { name, .. } => Some(name),
            _ => None,
        }
    }

    /// A short, user-facing description that does not leak paths or engine details.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::FileRead { .. } | Self::Parse { .. } | Self::ReservedName { .. } => {
                "The page template could not be loaded"
            }
            Self::NotFound { .. } => "The requested page does not exist",
            Self::Execute { .. } | Self::Data(_) | Self::Write(_) => {
                "The page could not be rendered"
            }
            Self::DelimitersLocked | Self::InvalidDelimiters { .. } | Self::Config(_) => {
                "The template engine is misconfigured"
            }
        }
    }

    /// Data for the fallback error page describing this error.
    pub fn fallback_data(&self) -> RenderData {
        let mut data = RenderData::new();
        data.insert("title".into(), "Server Error".into());
        data.insert("message".into(), self.summary().into());
        data
    }

    /// Renders the static error page for this error into `out`.
    ///
    /// The error page never touches the filesystem and does not depend on the
    /// manager's delimiters, so it still renders when the template set is broken.
    pub fn render_fallback<W: io::Write>(&self, out: W) -> Result<()> {
        ErrorTemplate::new().execute(out, &self.fallback_data())
    }
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;
