use thiserror::Error;

use crate::site::Site;

/// Errors from the low-level probing primitive.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The sensor never reported contact within the allowed travel.
    #[error("probe at {site} did not trigger")]
    NoTrigger {
        /// Site being probed.
        site: Site,
    },

    /// The move reached the axis travel limit before contact.
    #[error("probe at {site} exceeded travel limit of {limit:.3} mm")]
    OutOfRange {
        /// Site being probed.
        site: Site,
        /// Travel limit in mm.
        limit: f64,
    },

    /// The collision guard tripped before contact was detected.
    #[error("collision guard tripped before contact")]
    CollisionGuard,

    /// `check_probe` was requested and the probe is not in its safe state.
    #[error("probe not in its safe state")]
    ProbeNotReady,

    /// Controller or communication failure.
    #[error("hardware error: {0}")]
    Hardware(String),
}

/// A configured script action failed.
#[derive(Error, Debug)]
#[error("script '{name}' failed: {reason}")]
pub struct ScriptError {
    /// Name of the script action.
    pub name: String,
    /// Failure description.
    pub reason: String,
}

/// Toolhead or probe subsystem access failure.
#[derive(Error, Debug)]
pub enum MotionError {
    /// A required collaborator could not be reached.
    #[error("{0} is unavailable")]
    Unavailable(String),

    /// A reading was NaN or otherwise non-finite.
    #[error("invalid reading: {0}")]
    InvalidValue(String),
}

/// Site or offset resolution failure.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A required command parameter was absent with no configured default.
    #[error("missing parameter {key}")]
    MissingParameter {
        /// Parameter name.
        key: String,
    },

    /// A command parameter could not be parsed.
    #[error("parameter {key} has invalid value '{value}'")]
    InvalidParameter {
        /// Parameter name.
        key: String,
        /// Raw value as given.
        value: String,
    },

    /// The resolving collaborator itself is unavailable.
    #[error("{0} is unavailable")]
    Unavailable(String),
}
