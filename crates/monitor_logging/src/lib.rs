#![deny(missing_docs)]
//! Shared logging utilities for the GA monitor workspace.
//!
//! This crate provides the `monitor_*` logging macros used across the codebase,
//! a per-thread poll tick that the macros prefix onto every message while a
//! job is being polled, and a minimal test initializer for the global logger.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Thread-local storage for the poll tick of the job currently being polled.
    static POLL_TICK: Cell<u64> = const { Cell::new(0) };
}

/// Sets the poll tick for the current thread.
/// 0 clears the prefix. Prefer [`with_poll_tick`] on threads shared by several tasks.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.with(|v| v.set(tick));
}

/// Retrieves the poll tick for the current thread.
/// Returns 0 when no job is being polled.
pub fn poll_tick() -> u64 {
    POLL_TICK.with(|v| v.get())
}

/// Runs `f` with the poll tick set to `tick`, then restores the previous tick.
/// Tasks sharing the thread never observe the tick outside `f`.
pub fn with_poll_tick<R>(tick: u64, f: impl FnOnce() -> R) -> R {
    let previous = POLL_TICK.with(|v| v.replace(tick));
    let result = f();
    set_poll_tick(previous);
    result
}

#[doc(hidden)]
#[macro_export]
macro_rules! __monitor_log {
    ($level:expr, $($arg:tt)*) => {{
        let tick = $crate::poll_tick();
        if tick == 0 {
            $crate::log::log!($level, $($arg)*);
        } else {
            $crate::log::log!($level, "[tick {}] {}", tick, format_args!($($arg)*));
        }
    }};
}

/// Logs a trace-level message, prefixed with the poll tick when one is set.
#[macro_export]
macro_rules! monitor_trace {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Trace, $($arg)*);
    }};
}

/// Logs a debug-level message, prefixed with the poll tick when one is set.
#[macro_export]
macro_rules! monitor_debug {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Debug, $($arg)*);
    }};
}

/// Logs an info-level message, prefixed with the poll tick when one is set.
#[macro_export]
macro_rules! monitor_info {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Info, $($arg)*);
    }};
}

/// Logs a warn-level message, prefixed with the poll tick when one is set.
#[macro_export]
macro_rules! monitor_warn {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Warn, $($arg)*);
    }};
}

/// Logs an error-level message, prefixed with the poll tick when one is set.
#[macro_export]
macro_rules! monitor_error {
    ($($arg:tt)*) => {{
        $crate::__monitor_log!($crate::log::Level::Error, $($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test binary thread may have won the race.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_tick_is_per_thread() {
        set_poll_tick(7);
        assert_eq!(poll_tick(), 7);

        let other = std::thread::spawn(poll_tick).join().unwrap();
        assert_eq!(other, 0);

        set_poll_tick(0);
        assert_eq!(poll_tick(), 0);
    }

    #[test]
    fn scoped_tick_is_restored() {
        let seen = with_poll_tick(4, || {
            monitor_debug!("inside tick scope");
            poll_tick()
        });
        assert_eq!(seen, 4);
        assert_eq!(poll_tick(), 0);
    }

    #[test]
    fn macros_expand_with_and_without_tick() {
        initialize_for_tests();
        monitor_info!("no tick {}", 1);
        set_poll_tick(3);
        monitor_debug!("with tick {}", 2);
        monitor_warn!("plain");
        set_poll_tick(0);
    }
}
