//! Automatic probe Z-offset calibration.
//!
//! Derives the probe's effective height offset from the reference nozzle
//! by probing two sites and composing the measured zero points with the
//! configured switch offset, then stages the result into the `probe`
//! configuration section. Two entry points:
//!
//! - [`commands::cmd_probe_autocalibrate`]: the staged measurement
//!   sequence, with a guaranteed end-script cleanup on every exit path.
//! - [`commands::cmd_apply_probe_offset`]: stateless arithmetic that
//!   corrects the current Z position immediately.
//!
//! All machine access goes through the collaborator traits in the
//! [`machine`] crate, injected at construction time.

pub mod applicator;
pub mod commands;
pub mod error;
pub mod helper;
pub mod sequencer;

pub use applicator::apply_probe_offset;
pub use commands::{
    cmd_apply_probe_offset, cmd_probe_autocalibrate, APPLY_PROBE_OFFSET_HELP,
    PROBE_AUTOCALIBRATE_HELP,
};
pub use error::CalibrationError;
pub use helper::CalibrationHelper;
pub use sequencer::{ProbeCalibration, Stage};
