use miette::{Diagnostic, SourceSpan};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result},
    path::PathBuf,
};

#[derive(Debug, Diagnostic)]
pub enum UiConfigError {
    #[diagnostic(
        code(uiconfig::unknown_color),
        url(docsrs),
        help("names are looked up in the alias table first, then as base colors")
    )]
    UnknownColorName { name: String },

    #[diagnostic(code(uiconfig::resolution), url(docsrs))]
    Resolution { rule: String, base: String },

    #[diagnostic(
        code(uiconfig::cyclic_reference),
        url(docsrs),
        help("an alias or relative color refers back to itself")
    )]
    CyclicReference { path: Vec<String> },

    #[diagnostic(code(uiconfig::document), url(docsrs))]
    Document {
        #[source_code]
        src: String,
        #[label("invalid document content here")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(uiconfig::variable), url(docsrs))]
    Variable { name: String, msg: String },

    #[diagnostic(code(uiconfig::io), url(docsrs))]
    Io { path: PathBuf, msg: String },

    #[diagnostic(code(uiconfig::channel), url(docsrs))]
    ChannelClosed,
}

/// Result of a color lookup; the error stays typed so callers can tell the kinds apart.
pub type ColorResult<T> = std::result::Result<T, UiConfigError>;

pub type UiConfigResult<T> = miette::Result<T>;

impl Display for UiConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            UiConfigError::UnknownColorName { name } => {
                write!(f, "Unknown color name: '{}'", name)
            }
            UiConfigError::Resolution { rule, base } => write!(
                f,
                "Relative color '{}' refers to unresolvable color '{}'",
                rule, base
            ),
            UiConfigError::CyclicReference { path } => {
                write!(f, "Cyclic color reference: {}", path.join(" -> "))
            }
            UiConfigError::Document { msg, .. } => write!(f, "Document error: {}", msg),
            UiConfigError::Variable { name, msg } => {
                write!(f, "Variable '{}': {}", name, msg)
            }
            UiConfigError::Io { path, msg } => {
                write!(f, "IO error on {}: {}", path.display(), msg)
            }
            UiConfigError::ChannelClosed => write!(f, "Notification channel closed"),
        }
    }
}

impl Error for UiConfigError {}

impl UiConfigError {
    pub fn unknown_color(name: impl Into<String>) -> Self {
        Self::UnknownColorName { name: name.into() }
    }

    pub fn resolution(rule: impl Into<String>, base: impl Into<String>) -> Self {
        Self::Resolution {
            rule: rule.into(),
            base: base.into(),
        }
    }

    pub fn cyclic(path: Vec<String>) -> Self {
        Self::CyclicReference { path }
    }

    pub fn document(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Document {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    pub fn variable(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Variable {
            name: name.into(),
            msg: msg.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            msg: msg.into(),
        }
    }
}
