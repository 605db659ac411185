use std::fmt;
use thiserror::Error;

use crate::edgegrid::ApiError;
use crate::template::TemplateError;

/// Phase of an export in which an upstream call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// Paging through a list endpoint
    Listing,
    /// Resolving the latest version of a versioned resource
    VersionFetch,
    /// Fetching a single resource body
    DetailFetch,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Listing => write!(f, "listing"),
            FetchPhase::VersionFetch => write!(f, "version fetch"),
            FetchPhase::DetailFetch => write!(f, "detail fetch"),
        }
    }
}

/// Named failures of an export run
#[derive(Debug, Error)]
pub enum ExportError {
    /// Resource/name absent after full pagination
    #[error("{kind} '{name}' does not exist")]
    NotFound { kind: &'static str, name: String },

    /// Resource variant outside the supported set
    #[error("{kind} type not supported: {code}")]
    UnsupportedType { kind: &'static str, code: String },

    /// Any upstream API failure
    #[error("unable to fetch {kind} ({phase}): {source}")]
    Fetch {
        kind: &'static str,
        phase: FetchPhase,
        #[source]
        source: ApiError,
    },

    /// Versioned resource has no versions at all
    #[error("no {kind} versions found")]
    NoVersions { kind: &'static str },

    /// Template lookup, render or write failure
    #[error("saving terraform project files: {0}")]
    SavingFiles(#[from] TemplateError),
}

impl ExportError {
    pub fn fetch(kind: &'static str, phase: FetchPhase, source: ApiError) -> Self {
        ExportError::Fetch {
            kind,
            phase,
            source,
        }
    }

    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::NotFound { .. } => 2,
            ExportError::UnsupportedType { .. } => 3,
            ExportError::Fetch { .. } | ExportError::NoVersions { .. } => 4,
            ExportError::SavingFiles(_) => 5,
        }
    }
}

/// Exit code for an error that reached `main`
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ExportError>())
        .map(ExportError::exit_code)
        .unwrap_or(1)
}
