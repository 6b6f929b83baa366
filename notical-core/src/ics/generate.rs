//! Calendar document generation.

use crate::error::NoticalResult;
use crate::event::Event;
use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};

/// Generate the full .ics document for the given event set.
///
/// Timestamps are written in UTC form; the store converts back into the
/// configured timezone on load. RFC 5545 requires a UID per VEVENT even
/// though events here have no stable identity, so a fresh one is written on
/// every save and ignored on parse.
pub fn generate_calendar(events: &[Event]) -> NoticalResult<String> {
    let mut cal = Calendar::new();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}@notical", uuid::Uuid::new_v4()));
        ics_event.summary(&event.title);

        // DTSTAMP - required by RFC 5545
        let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        ics_event.add_property("DTSTAMP", &dtstamp);

        if let Some(start) = event.start {
            ics_event.add_property(
                "DTSTART",
                start
                    .with_timezone(&chrono::Utc)
                    .format("%Y%m%dT%H%M%SZ")
                    .to_string(),
            );
        }
        if let Some(end) = event.end {
            ics_event.add_property(
                "DTEND",
                end.with_timezone(&chrono::Utc)
                    .format("%Y%m%dT%H%M%SZ")
                    .to_string(),
            );
        }

        if !event.location.is_empty() {
            ics_event.location(&event.location);
        }
        if !event.description.is_empty() {
            ics_event.description(&event.description);
        }

        // Reminders as VALARM components - minimal per RFC 5545
        for reminder in &event.reminders {
            let trigger = Trigger::before_start(chrono::Duration::minutes(reminder.minutes));
            let alarm = Alarm::display("Reminder", trigger);
            ics_event.alarm(alarm);
        }

        cal.push(ics_event.done());
    }

    let cal = cal.done();

    Ok(tidy_output(&cal.to_string()))
}

/// Clean up the icalendar crate's output into the document format the store
/// persists:
/// - our own PRODID instead of the crate's
/// - no CALSCALE:GREGORIAN (it's the default)
/// - no DTSTAMP/UID inside VALARM sections (not required by RFC 5545)
/// - blank lines removed, single trailing newline
///
/// Non-empty lines are kept byte-for-byte: a folded line can legitimately
/// end in a space, so right-trimming would corrupt long descriptions.
fn tidy_output(ics: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if line.starts_with("PRODID:") {
            lines.push("PRODID:NOTICAL");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        lines.push(line);
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Shanghai;

    fn make_test_event() -> Event {
        Event::new(
            "Test Event".to_string(),
            Some(Shanghai.with_ymd_and_hms(2025, 10, 3, 9, 0, 0).unwrap()),
            None,
            "Room 4".to_string(),
            "Agenda".to_string(),
        )
    }

    #[test]
    fn test_generate_empty_document_is_well_formed() {
        let ics = generate_calendar(&[]).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR\n"));
        assert!(ics.ends_with("END:VCALENDAR\n"));
        assert!(ics.contains("PRODID:NOTICAL"));
        assert!(!ics.contains("\n\n"), "No blank lines. Got:\n{}", ics);
    }

    #[test]
    fn test_generate_writes_timestamps_as_utc() {
        let ics = generate_calendar(&[make_test_event()]).unwrap();

        // 09:00 Shanghai is 01:00 UTC; default end is one hour later
        assert!(
            ics.contains("DTSTART:20251003T010000Z"),
            "DTSTART should be in UTC. ICS:\n{}",
            ics
        );
        assert!(
            ics.contains("DTEND:20251003T020000Z"),
            "DTEND should be start + 1h in UTC. ICS:\n{}",
            ics
        );
    }

    #[test]
    fn test_generate_attaches_one_valarm_per_reminder() {
        let ics = generate_calendar(&[make_test_event()]).unwrap();

        let alarm_count = ics.lines().filter(|l| *l == "BEGIN:VALARM").count();
        assert_eq!(alarm_count, 3, "Expected 3 VALARMs. ICS:\n{}", ics);
        assert!(ics.contains("ACTION:DISPLAY"));

        // VALARMs are minimal: no UID or DTSTAMP inside them
        let valarm_section: String = ics
            .split("BEGIN:VALARM")
            .nth(1)
            .unwrap()
            .split("END:VALARM")
            .next()
            .unwrap()
            .to_string();
        assert!(!valarm_section.contains("UID:"));
        assert!(!valarm_section.contains("DTSTAMP:"));
    }

    #[test]
    fn test_generate_skips_absent_fields() {
        let event = Event::new(
            "Bare".to_string(),
            None,
            None,
            String::new(),
            String::new(),
        );
        let ics = generate_calendar(&[event]).unwrap();
        assert!(!ics.contains("DTSTART"));
        assert!(!ics.contains("DTEND"));
        assert!(!ics.contains("LOCATION"));
        assert!(!ics.contains("BEGIN:VALARM"));
    }
}
