//! Medication reminders and their alarm times.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid alarm time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlarmTimeError {
    #[error("Hour out of range (0-23): {0}")]
    Hour(u32),

    #[error("Minute out of range (0-59): {0}")]
    Minute(u32),

    #[error("Expected HH:MM, got {0:?}")]
    Format(String),
}

/// A clock time of day at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AlarmTime {
    hour: u8,
    minute: u8,
}

impl AlarmTime {
    /// Default slot used when nothing better is known.
    pub const MORNING: AlarmTime = AlarmTime::at(8, 0);

    pub fn new(hour: u32, minute: u32) -> Result<Self, AlarmTimeError> {
        if hour > 23 {
            return Err(AlarmTimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(AlarmTimeError::Minute(minute));
        }
        Ok(Self::at(hour as u8, minute as u8))
    }

    /// Unchecked constructor for the fixed schedule tables.
    pub(crate) const fn at(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }
}

impl fmt::Display for AlarmTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for AlarmTime {
    type Err = AlarmTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour, minute) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| AlarmTimeError::Format(s.to_string()))?;
        let hour = hour
            .parse::<u32>()
            .map_err(|_| AlarmTimeError::Format(s.to_string()))?;
        let minute = minute
            .parse::<u32>()
            .map_err(|_| AlarmTimeError::Format(s.to_string()))?;
        AlarmTime::new(hour, minute)
    }
}

impl TryFrom<String> for AlarmTime {
    type Error = AlarmTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AlarmTime> for String {
    fn from(time: AlarmTime) -> Self {
        time.to_string()
    }
}

/// A reminder the user is about to add, before it gets an identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderDraft {
    pub medicine_name: String,
    pub times: Vec<AlarmTime>,
    pub note: String,
}

/// An active medication reminder, held for the session only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reminder {
    /// Local UUID
    pub id: String,
    pub medicine_name: String,
    /// One to four daily alarm times
    pub times: Vec<AlarmTime>,
    /// Free-text note, usually the start of the instructions
    pub note: String,
    pub created_at: String,
}

impl Reminder {
    /// Give a draft an id and timestamp.
    pub fn from_draft(draft: ReminderDraft) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            medicine_name: draft.medicine_name,
            times: draft.times,
            note: draft.note,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether the draft describes exactly this reminder.
    pub fn matches(&self, draft: &ReminderDraft) -> bool {
        self.medicine_name == draft.medicine_name
            && self.times == draft.times
            && self.note == draft.note
    }

    /// One-line summary: `name | 08:00, 20:00 | note`.
    pub fn summary(&self) -> String {
        let times: Vec<String> = self.times.iter().map(|t| t.to_string()).collect();
        format!("{} | {} | {}", self.medicine_name, times.join(", "), self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alarm_time_parse_and_display() {
        let time: AlarmTime = "8:05".parse().unwrap();
        assert_eq!(time.hour(), 8);
        assert_eq!(time.minute(), 5);
        assert_eq!(time.to_string(), "08:05");
    }

    #[test]
    fn test_alarm_time_rejects_out_of_range() {
        assert_eq!("24:00".parse::<AlarmTime>(), Err(AlarmTimeError::Hour(24)));
        assert_eq!("07:60".parse::<AlarmTime>(), Err(AlarmTimeError::Minute(60)));
        assert!(matches!("noon".parse::<AlarmTime>(), Err(AlarmTimeError::Format(_))));
    }

    #[test]
    fn test_alarm_time_serde_as_string() {
        let json = serde_json::to_string(&AlarmTime::at(21, 0)).unwrap();
        assert_eq!(json, "\"21:00\"");
        let back: AlarmTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AlarmTime::at(21, 0));
    }

    #[test]
    fn test_reminder_summary() {
        let reminder = Reminder::from_draft(ReminderDraft {
            medicine_name: "Augmentin 625mg".into(),
            times: vec![AlarmTime::at(8, 0), AlarmTime::at(20, 0)],
            note: "After food".into(),
        });
        assert_eq!(reminder.summary(), "Augmentin 625mg | 08:00, 20:00 | After food");
        assert_eq!(reminder.id.len(), 36);
    }
}
