use thiserror::Error;

/// Convenient result alias for the tripgraph library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the requested start location is not in the registry.
    #[error("unknown start location: {name}{}", format_suggestions(.suggestions))]
    StartNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the requested goal location is not in the registry.
    #[error("unknown goal location: {name}{}", format_suggestions(.suggestions))]
    GoalNotFound {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when the frontier drained before the goal was settled.
    #[error("no path exists between {start} and {goal}")]
    NoPathExists { start: String, goal: String },

    /// Raised when growing an internal search structure failed to allocate.
    #[error("resource exhausted while growing {context}")]
    ResourceExhausted { context: &'static str },

    /// Raised when a location name is inserted twice under the reject policy.
    #[error("duplicate location name: {name}")]
    DuplicateLocation { name: String },

    /// Raised when an input file is structurally unusable.
    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },

    /// Raised when a computed path lacks any locations.
    #[error("path was empty")]
    EmptyPath,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for CSV reader errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for JSON serialisation errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error reports an unknown start or goal identity.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::StartNotFound { .. } | Error::GoalNotFound { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
