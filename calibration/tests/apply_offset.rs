//! Tests for the offset applicator and the two command entry points.

use calibration::{
    cmd_apply_probe_offset, cmd_probe_autocalibrate, CalibrationError, CalibrationHelper,
};
use machine::sim::{SimScenario, SimulatedPrinter};
use machine::{Endstop, GcodeCommand, Site};

#[test]
fn test_apply_probe_offset_worked_example() {
    let scenario = SimScenario {
        start_z: 10.0,
        probe_offsets: [0.0, 25.0, -1.2],
        switch_offset: 0.5,
        ..Default::default()
    };
    let printer = SimulatedPrinter::new(scenario);
    let mut toolhead = printer.toolhead();
    let probe = printer.probe();
    let console = printer.console();
    let resolver = printer.resolver();

    let cmd = GcodeCommand::new("APPLY_PROBE_OFFSET");
    let new_z =
        cmd_apply_probe_offset(&cmd, &resolver, &mut toolhead, &probe, &console).unwrap();

    assert_eq!(new_z, 10.0 + (-1.2) - 0.5);
    let record = printer.record();
    assert_eq!(record.forced_z, vec![new_z]);
    assert!(record
        .console
        .iter()
        .any(|line| line.contains("Current Z: 10") && line.contains("new Z: 8.3")));
}

#[test]
fn test_apply_probe_offset_takes_switch_offset_from_command() {
    let printer = SimulatedPrinter::new(SimScenario::default());
    let mut toolhead = printer.toolhead();
    let probe = printer.probe();
    let console = printer.console();
    let resolver = printer.resolver();

    let cmd = GcodeCommand::new("APPLY_PROBE_OFFSET").with_param("SWITCH_OFFSET", 0.7);
    let new_z =
        cmd_apply_probe_offset(&cmd, &resolver, &mut toolhead, &probe, &console).unwrap();

    assert_eq!(new_z, 10.0 + (-1.2) - 0.7);
}

#[test]
fn test_apply_probe_offset_reports_resolution_failure() {
    let printer = SimulatedPrinter::new(SimScenario::default());
    let mut toolhead = printer.toolhead();
    let probe = printer.probe();
    let console = printer.console();
    let resolver = printer.resolver();

    let cmd = GcodeCommand::new("APPLY_PROBE_OFFSET").with_param("SWITCH_OFFSET", "garbage");
    let result = cmd_apply_probe_offset(&cmd, &resolver, &mut toolhead, &probe, &console);

    assert!(matches!(result, Err(CalibrationError::Resolution(_))));
    let record = printer.record();
    assert!(record.forced_z.is_empty());
    assert!(record
        .console
        .iter()
        .any(|line| line.contains("APPLY_PROBE_OFFSET failed")));
}

#[test]
fn test_autocalibrate_command_resolves_sites_from_parameters() {
    let printer = SimulatedPrinter::new(SimScenario::default());
    let mut probing = printer.probing();
    let (mut start, mut switch, mut end) = printer.scripts();
    let console = printer.console();
    let mut config = printer.config();
    let resolver = printer.resolver();

    let mut helper =
        CalibrationHelper::new(&mut probing, Endstop::Z, &mut start, &mut switch, &mut end);
    let cmd = GcodeCommand::new("PROBE_AUTOCALIBRATE")
        .with_param("SWITCH_XPOS", 42.0)
        .with_param("SWITCH_YPOS", 24.0)
        .with_param("SWITCH_OFFSET", 0.25);
    let result = cmd_probe_autocalibrate(&cmd, &resolver, &mut helper, &console, &mut config);

    assert_eq!(result.unwrap(), 2.34 + 0.25 - 0.12);
    let record = printer.record();
    assert_eq!(record.probe_calls[1].site, Site::new(42.0, 24.0));
}

#[test]
fn test_autocalibrate_command_reports_failures_to_operator() {
    let scenario = SimScenario {
        fail_switch_probe: true,
        ..Default::default()
    };
    let printer = SimulatedPrinter::new(scenario);
    let mut probing = printer.probing();
    let (mut start, mut switch, mut end) = printer.scripts();
    let console = printer.console();
    let mut config = printer.config();
    let resolver = printer.resolver();

    let mut helper =
        CalibrationHelper::new(&mut probing, Endstop::Z, &mut start, &mut switch, &mut end);
    let cmd = GcodeCommand::new("PROBE_AUTOCALIBRATE");
    let result = cmd_probe_autocalibrate(&cmd, &resolver, &mut helper, &console, &mut config);

    assert!(result.is_err());
    let record = printer.record();
    assert!(record
        .console
        .iter()
        .any(|line| line.contains("PROBE_AUTOCALIBRATE failed")));
    // The end script already ran by the time the failure is reported.
    assert_eq!(record.script_runs.last().map(String::as_str), Some("end"));
}
