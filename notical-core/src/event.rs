//! Calendar event types and upcoming-event ordering.
//!
//! Events live in a single shared calendar document. They have no stable
//! identifier; deletion matches on the (title, start) pair, and every match
//! is removed.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

/// Reminder lead times attached to every event with a known start:
/// one hour, one day, and one week before.
pub const REMINDER_OFFSETS_MINUTES: [i64; 3] = [60, 1440, 10080];

/// A reminder/alarm for an event
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    /// Minutes before the event start to trigger
    pub minutes: i64,
}

/// An event in the shared calendar document.
///
/// `start` and `end` can be absent when the model could not extract usable
/// timestamps; such events are stored but never listed and carry no
/// reminders.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub title: String,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub location: String,
    pub description: String,
    pub reminders: Vec<Reminder>,
}

impl Event {
    /// Build an event, applying the creation invariants: a missing end
    /// defaults to start + 1h, and the fixed reminder set is attached
    /// whenever the start is known.
    pub fn new(
        title: String,
        start: Option<DateTime<Tz>>,
        end: Option<DateTime<Tz>>,
        location: String,
        description: String,
    ) -> Self {
        let end = end.or_else(|| start.map(|s| s + Duration::hours(1)));
        let reminders = if start.is_some() {
            REMINDER_OFFSETS_MINUTES
                .iter()
                .map(|&minutes| Reminder { minutes })
                .collect()
        } else {
            Vec::new()
        };

        Event {
            title,
            start,
            end,
            location,
            description,
            reminders,
        }
    }

    /// Deletion identity: exact title plus the same start instant.
    /// Timestamps carrying different offsets match if they name the same
    /// instant.
    pub fn matches(&self, title: &str, start: DateTime<Tz>) -> bool {
        self.title == title && self.start.is_some_and(|s| s == start)
    }

    /// Time remaining until this event, or `None` if it is over (or has no
    /// usable timestamps). An event already in progress counts down to its
    /// end, not its start.
    pub fn remaining(&self, now: DateTime<Tz>) -> Option<Duration> {
        let start = self.start?;
        let end = self.end?;
        if end <= now {
            return None;
        }
        Some(if start <= now { end - now } else { start - now })
    }
}

/// Filter out finished events and order the rest by soonest-remaining-first.
pub fn upcoming(events: &[Event], now: DateTime<Tz>) -> Vec<Event> {
    let mut keyed: Vec<(Duration, &Event)> = events
        .iter()
        .filter_map(|e| e.remaining(now).map(|r| (r, e)))
        .collect();
    keyed.sort_by_key(|(remaining, _)| *remaining);
    keyed.into_iter().map(|(_, e)| e.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        Shanghai.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn missing_end_defaults_to_start_plus_one_hour() {
        let start = at(2025, 10, 3, 9, 0);
        let event = Event::new("Standup".into(), Some(start), None, String::new(), String::new());
        assert_eq!(event.end, Some(at(2025, 10, 3, 10, 0)));
    }

    #[test]
    fn known_start_gets_three_fixed_reminders() {
        let event = Event::new(
            "Review".into(),
            Some(at(2025, 10, 3, 9, 0)),
            None,
            String::new(),
            String::new(),
        );
        let minutes: Vec<i64> = event.reminders.iter().map(|r| r.minutes).collect();
        assert_eq!(minutes, vec![60, 1440, 10080]);
    }

    #[test]
    fn event_without_start_gets_no_end_and_no_reminders() {
        let event = Event::new("Someday".into(), None, None, String::new(), String::new());
        assert_eq!(event.end, None);
        assert!(event.reminders.is_empty());
    }

    #[test]
    fn upcoming_excludes_finished_events() {
        let now = at(2025, 10, 3, 12, 0);
        let past = Event::new(
            "Done".into(),
            Some(at(2025, 10, 3, 9, 0)),
            Some(at(2025, 10, 3, 10, 0)),
            String::new(),
            String::new(),
        );
        // end exactly at now is also excluded (strictly-after filter)
        let ending_now = Event::new(
            "Ending".into(),
            Some(at(2025, 10, 3, 11, 0)),
            Some(now),
            String::new(),
            String::new(),
        );
        let future = Event::new(
            "Later".into(),
            Some(at(2025, 10, 3, 14, 0)),
            None,
            String::new(),
            String::new(),
        );
        let listed = upcoming(&[past, ending_now, future], now);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Later");
    }

    #[test]
    fn in_progress_event_ranked_by_time_until_end() {
        let now = at(2025, 10, 3, 12, 0);
        // In progress, ends in 30 minutes
        let in_progress = Event::new(
            "Ongoing".into(),
            Some(at(2025, 10, 3, 11, 0)),
            Some(at(2025, 10, 3, 12, 30)),
            String::new(),
            String::new(),
        );
        // Starts in 2 hours
        let later = Event::new(
            "Later".into(),
            Some(at(2025, 10, 3, 14, 0)),
            None,
            String::new(),
            String::new(),
        );
        // Starts in 1 hour
        let soon = Event::new(
            "Soon".into(),
            Some(at(2025, 10, 3, 13, 0)),
            None,
            String::new(),
            String::new(),
        );
        let listed = upcoming(&[later.clone(), in_progress.clone(), soon.clone()], now);
        let titles: Vec<&str> = listed.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Ongoing", "Soon", "Later"]);
    }

    #[test]
    fn matches_compares_instants_not_offsets() {
        let start = at(2025, 10, 3, 9, 0);
        let event = Event::new("Standup".into(), Some(start), None, String::new(), String::new());
        // 09:00 Shanghai is 01:00 UTC
        let same_instant = chrono::Utc
            .with_ymd_and_hms(2025, 10, 3, 1, 0, 0)
            .unwrap()
            .with_timezone(&Shanghai);
        assert!(event.matches("Standup", same_instant));
        assert!(!event.matches("Standup", at(2025, 10, 3, 10, 0)));
        assert!(!event.matches("Other", start));
    }
}
