//! Common fixtures for calibration integration tests.

use calibration::{CalibrationError, CalibrationHelper, ProbeCalibration};
use machine::sim::{RunRecord, SimScenario, SimulatedPrinter};
use machine::Endstop;

/// Run one full auto-calibration over a simulated printer and return the
/// run result together with everything the simulator recorded.
pub fn run_autocalibrate(scenario: SimScenario) -> (Result<f64, CalibrationError>, RunRecord) {
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
    let mut run = ProbeCalibration::new(&mut helper, &console, &mut config);
    let result = run.probe_autocalibrate(
        scenario.nozzle_site,
        scenario.switch_site,
        scenario.switch_offset,
    );

    (result, printer.record())
}

/// Number of times the named script ran.
pub fn script_runs(record: &RunRecord, name: &str) -> usize {
    record.script_runs.iter().filter(|n| *n == name).count()
}
