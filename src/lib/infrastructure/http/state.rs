//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::reminders::ReminderService;

/// Global application state
#[derive(Clone)]
pub struct AppState<R: ReminderService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// Reminder service
    pub reminders: Arc<R>,
}

impl<R> AppState<R>
where
    R: ReminderService,
{
    /// Create a new application state
    pub fn new(reminders: R) -> Self {
        Self {
            start_time: Utc::now(),
            reminders: Arc::new(reminders),
        }
    }
}

impl<R> fmt::Debug for AppState<R>
where
    R: ReminderService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("reminders", &"ReminderService")
            .finish()
    }
}

#[cfg(test)]
use crate::domain::reminders::MockReminderService;

/// State backed by a mocked reminder service
#[cfg(test)]
pub fn test_state(reminders: Option<MockReminderService>) -> AppState<MockReminderService> {
    AppState::new(reminders.unwrap_or_default())
}
