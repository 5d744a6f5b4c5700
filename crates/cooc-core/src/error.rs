use std::fmt;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ConfigNotFound,
    ConfigInvalid,
    AliasConflict,
    CorpusReadFailed,
    CorpusFormatUnknown,
    EdgeTableMalformed,
    EdgeTableIo,
    EigenvectorNotConverged,
    EmptyGraph,
    ReportWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ConfigNotFound => "E1002",
            Self::ConfigInvalid => "E1003",
            Self::AliasConflict => "E1004",
            Self::CorpusReadFailed => "E2001",
            Self::CorpusFormatUnknown => "E2002",
            Self::EdgeTableMalformed => "E3001",
            Self::EdgeTableIo => "E3002",
            Self::EigenvectorNotConverged => "E4001",
            Self::EmptyGraph => "E4002",
            Self::ReportWriteFailed => "E5001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ConfigNotFound => "Config file not found",
            Self::ConfigInvalid => "Invalid config value",
            Self::AliasConflict => "Conflicting alias rules",
            Self::CorpusReadFailed => "Corpus could not be read",
            Self::CorpusFormatUnknown => "Unknown corpus format",
            Self::EdgeTableMalformed => "Malformed edge table",
            Self::EdgeTableIo => "Edge table could not be read or written",
            Self::EigenvectorNotConverged => "Eigenvector centrality did not converge",
            Self::EmptyGraph => "Graph has no nodes",
            Self::ReportWriteFailed => "Result file could not be written",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::ConfigNotFound => Some("Check the --config path or drop the flag to use defaults."),
            Self::ConfigInvalid => {
                Some("Use a positive tolerance and a non-zero iteration budget.")
            }
            Self::AliasConflict => {
                Some("List each alias under exactly one canonical name in [aliases].")
            }
            Self::CorpusReadFailed => Some("Check that the corpus file exists and is readable."),
            Self::CorpusFormatUnknown => {
                Some("Use a .csv or .jsonl file, or pass --input-format explicitly.")
            }
            Self::EdgeTableMalformed => {
                Some("The edge table needs nodeA, nodeB and integer weight columns.")
            }
            Self::EdgeTableIo => Some("Check the path, disk space and file permissions."),
            Self::EigenvectorNotConverged => {
                Some("Raise centrality.max_iterations or loosen centrality.tolerance.")
            }
            Self::EmptyGraph => Some("Lower --min-weight so that some edges survive."),
            Self::ReportWriteFailed => Some("Check --output-dir, disk space and permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors that map onto a stable [`ErrorCode`].
pub trait Coded {
    /// The code reported for this error.
    fn error_code(&self) -> ErrorCode;
}
