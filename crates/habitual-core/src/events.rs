//! Core events emitted by the tracker

use chrono::{DateTime, Local};
use habitual_api::NotificationInterval;
use habitual_util::HabitId;

/// Events emitted by the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// A habit is due for a reminder
    ReminderDue {
        habit_id: HabitId,
        name: String,
        interval: NotificationInterval,
        message: String,
        at: DateTime<Local>,
    },
}
