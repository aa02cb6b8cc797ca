use std::fmt;

/// Errors surfaced by loading and configuration.
///
/// Geometry itself never fails: degenerate input yields "no intersection" and
/// rejected graph edits return `false`.
#[derive(Debug)]
pub enum WorldError {
    Json(serde_json::Error),
    InvalidConfig { reason: String },
}

impl WorldError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "malformed json: {e}"),
            Self::InvalidConfig { reason } => write!(f, "invalid world config: {reason}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::InvalidConfig { .. } => None,
        }
    }
}

impl From<serde_json::Error> for WorldError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
