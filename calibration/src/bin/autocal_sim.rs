//! Dry-run the probe auto-calibration sequence against the simulated
//! printer and print everything the operator would see, including the
//! staged configuration write.

use anyhow::Result;
use calibration::{cmd_probe_autocalibrate, CalibrationHelper};
use clap::Parser;
use machine::sim::{SimScenario, SimulatedPrinter};
use machine::{Endstop, GcodeCommand};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "autocal_sim")]
#[command(about = "Probe auto-calibration dry run against a simulated printer")]
struct Args {
    /// Height at which the nozzle probe triggers (mm)
    #[arg(long, default_value = "0.12")]
    nozzle_trigger_z: f64,

    /// Height at which the switch probe triggers (mm)
    #[arg(long, default_value = "2.34")]
    switch_trigger_z: f64,

    /// Configured switch offset (mm)
    #[arg(long, default_value = "0.5")]
    switch_offset: f64,

    /// Inject a nozzle probing failure to exercise cleanup
    #[arg(long)]
    fail_nozzle_probe: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let scenario = SimScenario {
        nozzle_trigger_z: args.nozzle_trigger_z,
        switch_trigger_z: args.switch_trigger_z,
        switch_offset: args.switch_offset,
        fail_nozzle_probe: args.fail_nozzle_probe,
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

    let record = printer.record();
    for line in &record.console {
        println!("{line}");
    }
    for (section, option, value) in &record.config_writes {
        println!("staged: [{section}] {option} = {value}");
    }

    let z_offset = result?;
    info!("derived z_offset: {z_offset:.3}");
    Ok(())
}
