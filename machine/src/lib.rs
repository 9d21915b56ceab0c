//! Printer-side abstractions for probe calibration workflows.
//!
//! This crate defines the value types and collaborator interfaces the
//! calibration logic is written against: the low-level probing primitive,
//! operator-configured script actions, toolhead motion state, the probe
//! subsystem, staged configuration writes and the operator console. A
//! [`sim::SimulatedPrinter`] backs every interface for tests and demos;
//! real drivers live behind the same traits.

pub mod command;
pub mod error;
pub mod interface;
pub mod sim;
pub mod site;

pub use command::GcodeCommand;
pub use error::{MotionError, ProbeError, ResolveError, ScriptError};
pub use interface::{
    ConfigWriter, Console, GcodeScript, ProbeSubsystem, ProbingHandler, SiteResolver, Toolhead,
};
pub use site::{Endstop, ProbeOptions, Site};
