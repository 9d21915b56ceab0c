//! Collaborator interfaces consumed by the calibration procedures.
//!
//! These traits abstract the printer for testability: the simulator backs
//! them in tests and demos, real drivers in production. All calls are
//! blocking; a calibration run occupies the machine's single active
//! command context.

use crate::command::GcodeCommand;
use crate::error::{MotionError, ProbeError, ResolveError, ScriptError};
use crate::site::{Endstop, ProbeOptions, Site};

/// Low-level probing primitive.
pub trait ProbingHandler {
    /// Drive the Z axis at `site` until `endstop` triggers and return the
    /// trigger height in mm.
    ///
    /// Blocks until contact or failure; a single attempt per call. The
    /// `options` flags are forwarded to the underlying probing move
    /// unaltered.
    fn probe_on_site(
        &mut self,
        endstop: Endstop,
        site: Site,
        options: ProbeOptions,
    ) -> Result<f64, ProbeError>;
}

/// A named, operator-configured script action.
pub trait GcodeScript {
    /// Name used in logs and operator-facing reports.
    fn name(&self) -> &str;

    /// Execute the script to completion.
    fn run(&mut self) -> Result<(), ScriptError>;
}

/// Motion state access for the active toolhead.
pub trait Toolhead {
    /// Current Z position in mm.
    fn z_position(&self) -> Result<f64, MotionError>;

    /// Override the kinematic Z position without physical motion.
    fn force_z_position(&mut self, z: f64) -> Result<(), MotionError>;
}

/// The probe subsystem's configured offsets.
pub trait ProbeSubsystem {
    /// Configured (x, y, z) offsets in mm.
    fn offsets(&self) -> Result<[f64; 3], MotionError>;
}

/// Staged configuration writes.
///
/// Values are staged, not applied live; an explicit save-and-restart by
/// the operator makes them effective. At most one writer is active at a
/// time, so the last staged value wins.
pub trait ConfigWriter {
    /// Stage `value` under `option` in `section`.
    fn set(&mut self, section: &str, option: &str, value: &str);
}

/// Operator console output.
pub trait Console {
    /// Emit an informational line to the operator.
    fn respond_info(&self, msg: &str);
}

/// Resolves measurement sites and the switch offset for one command.
///
/// Values may come from command parameters or configured defaults; which
/// wins is this collaborator's business.
pub trait SiteResolver {
    /// Site where the nozzle is probed against the reference endstop.
    fn nozzle_site(&self, cmd: &GcodeCommand) -> Result<Site, ResolveError>;

    /// Site where the switch body is probed. May be derived from the
    /// nozzle site when not given explicitly.
    fn switch_site(&self, cmd: &GcodeCommand, nozzle: &Site) -> Result<Site, ResolveError>;

    /// Configured distance between the switch feature and the true
    /// trigger point, in mm.
    fn switch_offset(&self, cmd: &GcodeCommand) -> Result<f64, ResolveError>;
}
