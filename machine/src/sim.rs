//! Simulated printer for tests and demos.
//!
//! [`SimulatedPrinter`] plays back a [`SimScenario`] through the same
//! collaborator traits real drivers implement, and records every probing
//! call, script run, staged configuration write and console line so tests
//! can assert the full interaction contract.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::GcodeCommand;
use crate::error::{MotionError, ProbeError, ResolveError, ScriptError};
use crate::interface::{
    ConfigWriter, Console, GcodeScript, ProbeSubsystem, ProbingHandler, SiteResolver, Toolhead,
};
use crate::site::{Endstop, ProbeOptions, Site};

/// Scenario played back by [`SimulatedPrinter`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimScenario {
    /// Default site for the nozzle probe.
    pub nozzle_site: Site,
    /// Default site for the switch probe.
    pub switch_site: Site,
    /// Height at which probing the nozzle site triggers, in mm.
    pub nozzle_trigger_z: f64,
    /// Height at which probing the switch site triggers, in mm.
    pub switch_trigger_z: f64,
    /// Configured (x, y, z) probe offsets.
    pub probe_offsets: [f64; 3],
    /// Toolhead Z position at scenario start.
    pub start_z: f64,
    /// Default switch offset in mm.
    pub switch_offset: f64,
    /// Whether the secondary probe reports its safe/attached state.
    pub probe_attached: bool,
    /// Fail the probing move at the nozzle site.
    pub fail_nozzle_probe: bool,
    /// Fail the probing move at the switch site.
    pub fail_switch_probe: bool,
    /// Fail the `start` script.
    pub fail_start_script: bool,
    /// Fail the `switch` script.
    pub fail_switch_script: bool,
    /// Fail the `end` script.
    pub fail_end_script: bool,
}

impl Default for SimScenario {
    fn default() -> Self {
        Self {
            nozzle_site: Site::new(100.0, 100.0),
            switch_site: Site::new(80.0, 80.0),
            nozzle_trigger_z: 0.12,
            switch_trigger_z: 2.34,
            probe_offsets: [0.0, 25.0, -1.2],
            start_z: 10.0,
            switch_offset: 0.5,
            probe_attached: true,
            fail_nozzle_probe: false,
            fail_switch_probe: false,
            fail_start_script: false,
            fail_switch_script: false,
            fail_end_script: false,
        }
    }
}

/// One recorded call into the probing primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeCall {
    /// Endstop the move was terminated by.
    pub endstop: Endstop,
    /// Site that was probed.
    pub site: Site,
    /// Options forwarded to the move.
    pub options: ProbeOptions,
}

/// Everything the simulated printer observed during a run.
#[derive(Debug, Clone, Default)]
pub struct RunRecord {
    /// Probing calls in order.
    pub probe_calls: Vec<ProbeCall>,
    /// Script actions in run order, by name (attempted runs included).
    pub script_runs: Vec<String>,
    /// Staged configuration writes as (section, option, value).
    pub config_writes: Vec<(String, String, String)>,
    /// Operator console lines.
    pub console: Vec<String>,
    /// Z position overrides issued to the toolhead.
    pub forced_z: Vec<f64>,
}

/// Factory for collaborator handles that all share one interaction record.
///
/// Handles are owned values, so a test can hold mutable borrows of several
/// of them at once, exactly as the real machine exposes separate objects.
pub struct SimulatedPrinter {
    scenario: SimScenario,
    record: Arc<Mutex<RunRecord>>,
    z: Arc<Mutex<f64>>,
}

impl SimulatedPrinter {
    /// Create a printer that plays back `scenario`.
    pub fn new(scenario: SimScenario) -> Self {
        let z = Arc::new(Mutex::new(scenario.start_z));
        Self {
            scenario,
            record: Arc::new(Mutex::new(RunRecord::default())),
            z,
        }
    }

    /// Snapshot of everything observed so far.
    pub fn record(&self) -> RunRecord {
        self.record.lock().unwrap().clone()
    }

    /// Handle implementing the probing primitive.
    pub fn probing(&self) -> SimProbing {
        SimProbing {
            scenario: self.scenario.clone(),
            record: Arc::clone(&self.record),
        }
    }

    /// Script action by name; failure injection per the scenario.
    pub fn script(&self, name: &str) -> SimScript {
        let fail = match name {
            "start" => self.scenario.fail_start_script,
            "switch" => self.scenario.fail_switch_script,
            "end" => self.scenario.fail_end_script,
            _ => false,
        };
        SimScript {
            name: name.to_string(),
            fail,
            record: Arc::clone(&self.record),
        }
    }

    /// The (start, switch, end) script actions.
    pub fn scripts(&self) -> (SimScript, SimScript, SimScript) {
        (self.script("start"), self.script("switch"), self.script("end"))
    }

    /// Toolhead handle.
    pub fn toolhead(&self) -> SimToolhead {
        SimToolhead {
            z: Arc::clone(&self.z),
            record: Arc::clone(&self.record),
        }
    }

    /// Probe subsystem handle.
    pub fn probe(&self) -> SimProbe {
        SimProbe {
            offsets: self.scenario.probe_offsets,
        }
    }

    /// Configuration writer handle.
    pub fn config(&self) -> SimConfig {
        SimConfig {
            record: Arc::clone(&self.record),
        }
    }

    /// Operator console handle.
    pub fn console(&self) -> SimConsole {
        SimConsole {
            record: Arc::clone(&self.record),
        }
    }

    /// Site resolver handle backed by scenario defaults.
    pub fn resolver(&self) -> SimResolver {
        SimResolver {
            scenario: self.scenario.clone(),
        }
    }
}

/// Probing primitive backed by scenario trigger heights.
pub struct SimProbing {
    scenario: SimScenario,
    record: Arc<Mutex<RunRecord>>,
}

impl ProbingHandler for SimProbing {
    fn probe_on_site(
        &mut self,
        endstop: Endstop,
        site: Site,
        options: ProbeOptions,
    ) -> Result<f64, ProbeError> {
        self.record.lock().unwrap().probe_calls.push(ProbeCall {
            endstop,
            site,
            options,
        });

        if options.check_probe && !self.scenario.probe_attached {
            return Err(ProbeError::ProbeNotReady);
        }

        let at_nozzle = site == self.scenario.nozzle_site;
        if at_nozzle && self.scenario.fail_nozzle_probe {
            return Err(ProbeError::NoTrigger { site });
        }
        if !at_nozzle && self.scenario.fail_switch_probe {
            return Err(ProbeError::NoTrigger { site });
        }

        let zero = if at_nozzle {
            self.scenario.nozzle_trigger_z
        } else {
            self.scenario.switch_trigger_z
        };
        debug!("sim probe at {site} via {endstop} triggered at {zero:.3}");
        Ok(zero)
    }
}

/// Script action that records its run and optionally fails.
pub struct SimScript {
    name: String,
    fail: bool,
    record: Arc<Mutex<RunRecord>>,
}

impl GcodeScript for SimScript {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> Result<(), ScriptError> {
        self.record.lock().unwrap().script_runs.push(self.name.clone());
        if self.fail {
            return Err(ScriptError {
                name: self.name.clone(),
                reason: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Toolhead with a shared Z position.
pub struct SimToolhead {
    z: Arc<Mutex<f64>>,
    record: Arc<Mutex<RunRecord>>,
}

impl Toolhead for SimToolhead {
    fn z_position(&self) -> Result<f64, MotionError> {
        Ok(*self.z.lock().unwrap())
    }

    fn force_z_position(&mut self, z: f64) -> Result<(), MotionError> {
        *self.z.lock().unwrap() = z;
        self.record.lock().unwrap().forced_z.push(z);
        Ok(())
    }
}

/// Probe subsystem with fixed configured offsets.
pub struct SimProbe {
    offsets: [f64; 3],
}

impl SimProbe {
    /// Replace the configured offsets, e.g. with non-finite values.
    pub fn set_offsets(&mut self, offsets: [f64; 3]) {
        self.offsets = offsets;
    }
}

impl ProbeSubsystem for SimProbe {
    fn offsets(&self) -> Result<[f64; 3], MotionError> {
        Ok(self.offsets)
    }
}

/// Configuration writer that stages values into the record.
pub struct SimConfig {
    record: Arc<Mutex<RunRecord>>,
}

impl ConfigWriter for SimConfig {
    fn set(&mut self, section: &str, option: &str, value: &str) {
        self.record.lock().unwrap().config_writes.push((
            section.to_string(),
            option.to_string(),
            value.to_string(),
        ));
    }
}

/// Console that collects operator lines.
pub struct SimConsole {
    record: Arc<Mutex<RunRecord>>,
}

impl Console for SimConsole {
    fn respond_info(&self, msg: &str) {
        debug!("console: {msg}");
        self.record.lock().unwrap().console.push(msg.to_string());
    }
}

/// Resolver answering from command parameters with scenario fallbacks.
pub struct SimResolver {
    scenario: SimScenario,
}

impl SiteResolver for SimResolver {
    fn nozzle_site(&self, cmd: &GcodeCommand) -> Result<Site, ResolveError> {
        Ok(Site::new(
            cmd.get_f64_or("NOZZLE_XPOS", self.scenario.nozzle_site.x)?,
            cmd.get_f64_or("NOZZLE_YPOS", self.scenario.nozzle_site.y)?,
        ))
    }

    fn switch_site(&self, cmd: &GcodeCommand, _nozzle: &Site) -> Result<Site, ResolveError> {
        Ok(Site::new(
            cmd.get_f64_or("SWITCH_XPOS", self.scenario.switch_site.x)?,
            cmd.get_f64_or("SWITCH_YPOS", self.scenario.switch_site.y)?,
        ))
    }

    fn switch_offset(&self, cmd: &GcodeCommand) -> Result<f64, ResolveError> {
        cmd.get_f64_or("SWITCH_OFFSET", self.scenario.switch_offset)
    }
}
