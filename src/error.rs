use thiserror::Error;

/// Store lifecycle point at which a self-check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyPhase {
    /// Right after the initial random-order insertion
    AfterInsertion,
    /// After the keep-size removal pass
    AfterRemoval,
}

impl std::fmt::Display for VerifyPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerifyPhase::AfterInsertion => write!(f, "node insertion"),
            VerifyPhase::AfterRemoval => write!(f, "node removal"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("store failed verification after {phase}: implementation FAIL")]
    Verification {
        phase: VerifyPhase,
        /// Rendering of the invalid store
        snapshot: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("help requested")]
    Help,

    #[error("unknown option: {0}")]
    UnknownFlag(String),

    #[error("option {0} requires a value")]
    MissingValue(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
