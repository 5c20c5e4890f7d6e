//! Terminal front end for the GA monitor: argument parsing, configuration,
//! logging setup and the message loop that drives `ga_monitor_core::update`.
pub mod cli;
pub mod platform;
