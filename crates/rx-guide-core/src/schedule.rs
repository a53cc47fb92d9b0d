//! Suggested alarm times from free-text dosing instructions.
//!
//! Rules are checked in order and the first match wins:
//!
//! | Instructions mention            | Times                       |
//! |---------------------------------|-----------------------------|
//! | "morning" and "evening"         | 08:00, 20:00                |
//! | "three times" / "3 times"       | 08:00, 14:00, 20:00         |
//! | "four times" / "4 times"        | 08:00, 12:00, 16:00, 20:00  |
//! | "twice" / "two times"           | 08:00, 20:00                |
//! | "night" / "bedtime"             | 21:00                       |
//! | "morning"                       | 08:00                       |
//! | anything else                   | 08:00                       |

use crate::models::AlarmTime;

/// Most alarms a single reminder can carry.
pub const MAX_ALARMS: usize = 4;

const MORNING_AND_EVENING: &[AlarmTime] = &[AlarmTime::at(8, 0), AlarmTime::at(20, 0)];
const THREE_TIMES: &[AlarmTime] = &[AlarmTime::at(8, 0), AlarmTime::at(14, 0), AlarmTime::at(20, 0)];
const FOUR_TIMES: &[AlarmTime] = &[
    AlarmTime::at(8, 0),
    AlarmTime::at(12, 0),
    AlarmTime::at(16, 0),
    AlarmTime::at(20, 0),
];
const BEDTIME: &[AlarmTime] = &[AlarmTime::at(21, 0)];
const MORNING: &[AlarmTime] = &[AlarmTime::MORNING];

/// A keyword rule: all of `all` must appear, or any of `any`.
struct Rule {
    all: &'static [&'static str],
    any: &'static [&'static str],
    times: &'static [AlarmTime],
}

const RULES: &[Rule] = &[
    Rule { all: &["morning", "evening"], any: &[], times: MORNING_AND_EVENING },
    Rule { all: &[], any: &["three times", "3 times"], times: THREE_TIMES },
    Rule { all: &[], any: &["four times", "4 times"], times: FOUR_TIMES },
    Rule { all: &[], any: &["twice", "two times"], times: MORNING_AND_EVENING },
    Rule { all: &[], any: &["night", "bedtime"], times: BEDTIME },
    Rule { all: &[], any: &["morning"], times: MORNING },
];

impl Rule {
    fn matches(&self, text: &str) -> bool {
        if !self.all.is_empty() {
            return self.all.iter().all(|k| text.contains(k));
        }
        self.any.iter().any(|k| text.contains(k))
    }
}

/// Suggest daily alarm times for the given instructions.
///
/// Never fails and always returns between one and four times.
pub fn suggest_times(instructions: &str) -> Vec<AlarmTime> {
    let lower = instructions.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.times)
        .unwrap_or(MORNING)
        .to_vec()
}

/// Alarm slots for a reminder with `count` alarms (clamped to 1-4).
///
/// Slot `i` takes the `i`-th suggestion, or 08:00 once the suggestions run out.
pub fn alarm_plan(instructions: &str, count: usize) -> Vec<AlarmTime> {
    let suggested = suggest_times(instructions);
    (0..count.clamp(1, MAX_ALARMS))
        .map(|slot| suggested.get(slot).copied().unwrap_or(AlarmTime::MORNING))
        .collect()
}
