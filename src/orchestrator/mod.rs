//! Application-level orchestration.
//!
//! `workflow` holds the selection/result state and the stage transitions;
//! `controller` drives it from UI commands and reports back through events.
//! UI/CLI layers call into this module to keep responsibilities separated.

mod controller;
mod workflow;

#[cfg_attr(not(feature = "tui"), allow(unused_imports))]
pub(crate) use controller::{run_controller, UiCommand};
pub(crate) use workflow::{IntakeLimits, Workflow};
