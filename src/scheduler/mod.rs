//! Daily reminder scheduling.
//!
//! A fixed daily tick (09:00 Bangkok by default) drives one reminder pass
//! over the task store: tasks due within the configured window and tasks
//! already past their deadline each trigger a one-time fan-out to the
//! task's audience, latched per condition so re-runs stay quiet.

pub mod cron;
mod reminder;

pub use reminder::{ReminderConfig, ReminderRunReport, ReminderScheduler, ScanReport};

#[cfg(test)]
mod tests;
