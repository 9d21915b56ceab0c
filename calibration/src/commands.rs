//! Console command entry points.
//!
//! The textual command transport is a collaborator; these functions are
//! what it dispatches to. Both resolve their inputs through the injected
//! [`SiteResolver`], execute, and surface any failure on the operator
//! console as well as to the caller.

use machine::{ConfigWriter, Console, GcodeCommand, ProbeSubsystem, SiteResolver, Toolhead};
use tracing::info;

use crate::applicator::apply_probe_offset;
use crate::error::CalibrationError;
use crate::helper::CalibrationHelper;
use crate::sequencer::ProbeCalibration;

/// Help text for `PROBE_AUTOCALIBRATE`.
pub const PROBE_AUTOCALIBRATE_HELP: &str = "Calibrate the probe's z_offset automatically";

/// Help text for `APPLY_PROBE_OFFSET`.
pub const APPLY_PROBE_OFFSET_HELP: &str = "Apply the probe z-offset to the current Z position";

/// Entry point for `PROBE_AUTOCALIBRATE`.
///
/// Resolves the two measurement sites and the switch offset, then runs
/// the staged calibration sequence. Returns the derived `z_offset`.
pub fn cmd_probe_autocalibrate(
    cmd: &GcodeCommand,
    resolver: &dyn SiteResolver,
    helper: &mut CalibrationHelper<'_>,
    console: &dyn Console,
    config: &mut dyn ConfigWriter,
) -> Result<f64, CalibrationError> {
    info!("{} issued", cmd.name());
    let result = (|| {
        let nozzle_site = resolver.nozzle_site(cmd)?;
        let switch_site = resolver.switch_site(cmd, &nozzle_site)?;
        let switch_offset = resolver.switch_offset(cmd)?;

        let mut run = ProbeCalibration::new(helper, console, config);
        run.probe_autocalibrate(nozzle_site, switch_site, switch_offset)
    })();

    if let Err(e) = &result {
        console.respond_info(&format!("PROBE_AUTOCALIBRATE failed: {e}"));
    }
    result
}

/// Entry point for `APPLY_PROBE_OFFSET`.
///
/// Resolves the switch offset and immediately corrects the current Z
/// position. Returns the new Z.
pub fn cmd_apply_probe_offset(
    cmd: &GcodeCommand,
    resolver: &dyn SiteResolver,
    toolhead: &mut dyn Toolhead,
    probe: &dyn ProbeSubsystem,
    console: &dyn Console,
) -> Result<f64, CalibrationError> {
    info!("{} issued", cmd.name());
    let result = (|| {
        let switch_offset = resolver.switch_offset(cmd)?;
        apply_probe_offset(toolhead, probe, console, switch_offset)
    })();

    if let Err(e) = &result {
        console.respond_info(&format!("APPLY_PROBE_OFFSET failed: {e}"));
    }
    result
}
