//! Application error taxonomy and handlers that route errors into the log engine.
//!
//! Errors are a closed set of variants resolved by pattern matching. A handler
//! either consumes an error ([`Disposition::Handled`]) or forwards a possibly
//! converted error ([`Disposition::Propagate`]) to the next handler in an
//! [`ErrorPipeline`].

use crate::domain::{Category, Severity};
use crate::engine::LogEngine;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{description} (code {code})")]
    Unknown { description: String, code: i64 },

    #[error("{description} (code {code})")]
    Domain {
        description: String,
        code: i64,
        #[source]
        cause: Option<BoxError>,
    },

    #[error("{description} (code {code})")]
    Business {
        description: String,
        code: i64,
        user_facing: bool,
    },
}

impl AppError {
    pub fn unknown(description: impl Into<String>, code: i64) -> Self {
        AppError::Unknown {
            description: description.into(),
            code,
        }
    }

    pub fn domain(description: impl Into<String>, code: i64, cause: Option<BoxError>) -> Self {
        AppError::Domain {
            description: description.into(),
            code,
            cause,
        }
    }

    pub fn business(description: impl Into<String>, code: i64, user_facing: bool) -> Self {
        AppError::Business {
            description: description.into(),
            code,
            user_facing,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            AppError::Unknown { description, .. }
            | AppError::Domain { description, .. }
            | AppError::Business { description, .. } => description,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            AppError::Unknown { code, .. }
            | AppError::Domain { code, .. }
            | AppError::Business { code, .. } => *code,
        }
    }

    /// Severity used when the error is logged.
    pub fn severity(&self) -> Severity {
        match self {
            AppError::Unknown { .. } => Severity::Critical,
            AppError::Domain { .. } => Severity::Error,
            AppError::Business { .. } => Severity::Warning,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unknown { .. } => "unknown",
            AppError::Domain { .. } => "domain",
            AppError::Business { .. } => "business",
        }
    }
}

/// Outcome of handing an error to an [`ErrorHandler`].
#[derive(Debug)]
pub enum Disposition {
    Handled,
    Propagate(AppError),
}

impl Disposition {
    pub fn is_handled(&self) -> bool {
        matches!(self, Disposition::Handled)
    }
}

pub trait ErrorHandler {
    fn handle(&self, error: AppError) -> Disposition;
}

/// Logs every error into a [`LogEngine`].
///
/// User-facing business errors are propagated after logging so an outer layer
/// can present them; everything else is consumed.
pub struct LoggingErrorHandler<'a> {
    engine: &'a LogEngine,
    category: Category,
}

impl<'a> LoggingErrorHandler<'a> {
    pub fn new(engine: &'a LogEngine, category: Category) -> Self {
        Self { engine, category }
    }
}

impl ErrorHandler for LoggingErrorHandler<'_> {
    fn handle(&self, error: AppError) -> Disposition {
        let mut message = format!("[{}] {}", error.kind(), error);
        if let AppError::Domain {
            cause: Some(cause), ..
        } = &error
        {
            message.push_str(&format!(": caused by {cause}"));
        }
        self.engine.emit(error.severity(), message, &self.category);

        match error {
            AppError::Business {
                user_facing: true, ..
            } => Disposition::Propagate(error),
            _ => Disposition::Handled,
        }
    }
}

/// Runs handlers in order until one consumes the error.
#[derive(Default)]
pub struct ErrorPipeline<'a> {
    handlers: Vec<Box<dyn ErrorHandler + 'a>>,
}

impl<'a> ErrorPipeline<'a> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn with(mut self, handler: impl ErrorHandler + 'a) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Returns `Handled` as soon as a handler consumes the error, otherwise the
    /// error as propagated by the last handler.
    pub fn process(&self, error: AppError) -> Disposition {
        let mut current = error;
        for handler in &self.handlers {
            match handler.handle(current) {
                Disposition::Handled => return Disposition::Handled,
                Disposition::Propagate(next) => current = next,
            }
        }
        Disposition::Propagate(current)
    }
}
