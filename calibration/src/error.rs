use machine::{MotionError, ProbeError, ResolveError, ScriptError};
use thiserror::Error;

use crate::sequencer::Stage;

/// Error during probe calibration or offset application.
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// A pre/post/transition script action failed.
    #[error("{stage} script failed: {source}")]
    Script {
        /// Stage whose script failed.
        stage: Stage,
        /// Underlying script failure.
        source: ScriptError,
    },

    /// A measurement never reached a valid contact state.
    #[error("probing failed during {stage}: {source}")]
    Probing {
        /// Stage whose probing move failed.
        stage: Stage,
        /// Underlying probing failure.
        source: ProbeError,
    },

    /// Required site/offset values could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolveError),

    /// Toolhead or probe subsystem access failed.
    #[error(transparent)]
    Motion(#[from] MotionError),
}
