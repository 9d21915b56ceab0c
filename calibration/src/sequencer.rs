//! The staged probe auto-calibration sequence.
//!
//! One run measures two zero points against the reference endstop,
//! composes them with the configured switch offset and stages the derived
//! `z_offset` into the `probe` configuration section:
//!
//! 1. run the `start` script (homing, heating-off, ...)
//! 2. probe the nozzle site -> `nozzle_zero`
//! 3. run the `switch` script (engages the switch body)
//! 4. probe the switch site -> `switch_zero`
//! 5. `z_offset = switch_zero + switch_offset - nozzle_zero`, report and
//!    stage it
//! 6. run the `end` script (cool-down, retraction, parking)
//!
//! Step 6 runs on every exit path, success or failure, exactly once per
//! run. It is expressed as a scope guard armed before step 1.

use std::fmt;

use machine::{ConfigWriter, Console, GcodeScript, ProbeOptions, Site};
use tracing::{debug, info, warn};

use crate::error::CalibrationError;
use crate::helper::CalibrationHelper;

/// Stages of one calibration run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Run the `start` script.
    Start,
    /// Probe the nozzle site against the reference endstop.
    ProbeNozzle,
    /// Run the `switch` script.
    SwitchTransition,
    /// Probe the switch site.
    ProbeSwitch,
    /// Derive, report and stage the offset.
    ComputeAndPersist,
    /// Run the `end` script. Reached on every exit path.
    End,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::ProbeNozzle => "probe-nozzle",
            Stage::SwitchTransition => "switch-transition",
            Stage::ProbeSwitch => "probe-switch",
            Stage::ComputeAndPersist => "compute-and-persist",
            Stage::End => "end",
        };
        write!(f, "{name}")
    }
}

/// One probe auto-calibration run.
///
/// Ephemeral: holds the injected collaborators for a single invocation of
/// [`probe_autocalibrate`](Self::probe_autocalibrate) and is discarded
/// afterwards. The only state that outlives the run is the staged
/// configuration write.
pub struct ProbeCalibration<'run, 'h> {
    helper: &'run mut CalibrationHelper<'h>,
    console: &'run dyn Console,
    config: &'run mut dyn ConfigWriter,
}

/// Runs the `end` script when dropped, so cleanup fires on every exit
/// path of the measurement sequence. Best-effort: a failure is reported,
/// never propagated over the run's own result.
struct EndScriptGuard<'g> {
    script: &'g mut dyn GcodeScript,
    console: &'g dyn Console,
}

impl Drop for EndScriptGuard<'_> {
    fn drop(&mut self) {
        debug!("running {} script '{}'", Stage::End, self.script.name());
        if let Err(e) = self.script.run() {
            warn!("{} script failed: {e}", Stage::End);
            self.console
                .respond_info(&format!("warning: {} script failed: {e}", Stage::End));
        }
    }
}

impl<'run, 'h> ProbeCalibration<'run, 'h> {
    /// Prepare a run over the given collaborators.
    pub fn new(
        helper: &'run mut CalibrationHelper<'h>,
        console: &'run dyn Console,
        config: &'run mut dyn ConfigWriter,
    ) -> Self {
        Self {
            helper,
            console,
            config,
        }
    }

    /// Execute the full calibration sequence and return the derived
    /// `z_offset` in mm.
    ///
    /// A failure at any stage aborts the remaining measurement and
    /// persist steps; the `end` script still runs. No retries: one
    /// probing attempt per site per run.
    pub fn probe_autocalibrate(
        &mut self,
        nozzle_site: Site,
        switch_site: Site,
        switch_offset: f64,
    ) -> Result<f64, CalibrationError> {
        let console = self.console;
        let config = &mut *self.config;
        let CalibrationHelper {
            ref mut probing,
            z_endstop,
            ref mut start_script,
            ref mut switch_script,
            ref mut end_script,
        } = *self.helper;

        info!(
            "probe_autocalibrate: nozzle at {nozzle_site}, switch at {switch_site}, \
             switch offset {switch_offset:.3}"
        );

        // Armed before the start script: the end script fires no matter
        // where the run exits.
        let _end = EndScriptGuard {
            script: &mut **end_script,
            console,
        };

        run_script(Stage::Start, &mut **start_script)?;

        info!("{}: probing nozzle at {nozzle_site}", Stage::ProbeNozzle);
        let nozzle_zero = probing
            .probe_on_site(z_endstop, nozzle_site, ProbeOptions::nozzle())
            .map_err(|source| CalibrationError::Probing {
                stage: Stage::ProbeNozzle,
                source,
            })?;
        info!("{}: nozzle zero {nozzle_zero:.6}", Stage::ProbeNozzle);

        run_script(Stage::SwitchTransition, &mut **switch_script)?;

        info!("{}: probing switch at {switch_site}", Stage::ProbeSwitch);
        let switch_zero = probing
            .probe_on_site(z_endstop, switch_site, ProbeOptions::switch())
            .map_err(|source| CalibrationError::Probing {
                stage: Stage::ProbeSwitch,
                source,
            })?;
        info!("{}: switch zero {switch_zero:.6}", Stage::ProbeSwitch);

        let z_offset = switch_zero + switch_offset - nozzle_zero;
        console.respond_info(&format!(
            "Switch zero: {switch_zero} + switch offset: {switch_offset} \
             - nozzle zero: {nozzle_zero} = probe z_offset: {z_offset}"
        ));
        console.respond_info(&format!(
            "probe_autocalibrate: z_offset: {z_offset:.3}\n\
             The value has been staged in the [probe] configuration section; \
             save the configuration and restart for it to take effect."
        ));
        info!("{}: staging probe z_offset = {z_offset:.3}", Stage::ComputeAndPersist);
        config.set("probe", "z_offset", &format!("{z_offset:.3}"));

        Ok(z_offset)
    }
}

fn run_script(stage: Stage, script: &mut dyn GcodeScript) -> Result<(), CalibrationError> {
    info!("{stage}: running script '{}'", script.name());
    script
        .run()
        .map_err(|source| CalibrationError::Script { stage, source })
}

#[cfg(test)]
mod tests {
    use machine::sim::{SimScenario, SimulatedPrinter};
    use machine::Endstop;

    use super::*;

    fn run(scenario: SimScenario) -> (Result<f64, CalibrationError>, machine::sim::RunRecord) {
        let printer = SimulatedPrinter::new(scenario.clone());
        let mut probing = printer.probing();
        let (mut start, mut switch, mut end) = printer.scripts();
        let console = printer.console();
        let mut config = printer.config();

        let mut helper = CalibrationHelper::new(
            &mut probing,
            Endstop::Z,
            &mut start,
            &mut switch,
            &mut end,
        );
        let mut cal = ProbeCalibration::new(&mut helper, &console, &mut config);
        let result =
            cal.probe_autocalibrate(scenario.nozzle_site, scenario.switch_site, scenario.switch_offset);
        (result, printer.record())
    }

    #[test]
    fn test_offset_arithmetic_is_exact() {
        let scenario = SimScenario {
            nozzle_trigger_z: 0.12,
            switch_trigger_z: 2.34,
            switch_offset: 0.5,
            ..Default::default()
        };
        let (result, _) = run(scenario);
        assert_eq!(result.unwrap(), 2.34 + 0.5 - 0.12);
    }

    #[test]
    fn test_staged_value_has_three_decimals() {
        let scenario = SimScenario {
            nozzle_trigger_z: 0.0,
            switch_trigger_z: 1.23456,
            switch_offset: 0.0,
            ..Default::default()
        };
        let (result, record) = run(scenario);
        assert!(result.is_ok());
        assert_eq!(
            record.config_writes,
            vec![(
                "probe".to_string(),
                "z_offset".to_string(),
                "1.235".to_string()
            )]
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Start.to_string(), "start");
        assert_eq!(Stage::SwitchTransition.to_string(), "switch-transition");
        assert_eq!(Stage::End.to_string(), "end");
    }
}
