//! Reporting error model.

use thiserror::Error;

use ledgerbook_core::DomainError;

pub type ReportResult<T> = Result<T, ReportError>;

/// Failure to produce a report. Presenters render this as "could not
/// compute" rather than showing partial numbers.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("could not compute {subject}: {source}")]
    Compute {
        subject: String,
        #[source]
        source: DomainError,
    },

    #[error("invalid report window: {0}")]
    Window(String),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn compute(subject: impl Into<String>, source: DomainError) -> Self {
        Self::Compute {
            subject: subject.into(),
            source,
        }
    }
}
