//! Immediate probe-offset application to the current Z position.

use machine::{Console, MotionError, ProbeSubsystem, Toolhead};
use tracing::info;

use crate::error::CalibrationError;

/// Correct the current Z position by the known probe offset.
///
/// Reads the toolhead Z and the probe's configured Z offset, computes
/// `new_z = current_z + probe_z_offset - switch_offset` (exact, no
/// rounding), reports the arithmetic to the operator and issues a
/// kinematic position override to `new_z`. Returns `new_z`.
///
/// Stateless: nothing persists across invocations. If any collaborator
/// fails or any input is non-finite, the error propagates and no side
/// effect is performed.
pub fn apply_probe_offset(
    toolhead: &mut dyn Toolhead,
    probe: &dyn ProbeSubsystem,
    console: &dyn Console,
    switch_offset: f64,
) -> Result<f64, CalibrationError> {
    let current_z = toolhead.z_position()?;
    let probe_z_offset = probe.offsets()?[2];

    for (name, value) in [
        ("current Z", current_z),
        ("probe z_offset", probe_z_offset),
        ("switch offset", switch_offset),
    ] {
        if !value.is_finite() {
            return Err(MotionError::InvalidValue(format!("{name} is {value}")).into());
        }
    }

    let new_z = current_z + probe_z_offset - switch_offset;
    console.respond_info(&format!(
        "Current Z: {current_z} + probe z_offset: {probe_z_offset} \
         - switch offset: {switch_offset} = new Z: {new_z}"
    ));
    info!("overriding kinematic Z position to {new_z:.6}");
    toolhead.force_z_position(new_z)?;

    Ok(new_z)
}
