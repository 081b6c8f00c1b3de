//! Error taxonomy
//!
//! Only configuration problems are errors. Numeric degeneracy is recovered
//! inside the integrator and placement conflicts are reported as outcomes.

use std::fmt;

/// Errors surfaced by the simulation core.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Gizmo pose rotation is not one of the eight multiples of 45°
    UnsupportedOrientation { degree: i32 },
    /// Registry has no constructor for this tag
    UnknownGizmoKind(String),
    /// No gizmo with this id in the arena
    UnknownGizmo(u32),
    /// World configuration could not be parsed or is inconsistent
    Config(String),
}

/// Convenience alias for simulation results.
pub type SimResult<T> = Result<T, SimError>;

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsupportedOrientation { degree } => {
                write!(f, "unsupported gizmo orientation: {degree}° is not a multiple of 45°")
            }
            SimError::UnknownGizmoKind(tag) => write!(f, "unknown gizmo kind: {tag:?}"),
            SimError::UnknownGizmo(id) => write!(f, "no gizmo with id {id}"),
            SimError::Config(msg) => write!(f, "invalid world config: {msg}"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimError::UnsupportedOrientation { degree: 10 };
        assert!(err.to_string().contains("10°"));
        let err = SimError::UnknownGizmoKind("circle".into());
        assert_eq!(err.to_string(), "unknown gizmo kind: \"circle\"");
    }
}
