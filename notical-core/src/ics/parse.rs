//! Calendar document parsing using the icalendar crate's parser.

use crate::error::{NoticalError, NoticalResult};
use crate::event::{Event, Reminder};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use icalendar::{
    DatePerhapsTime,
    parser::{read_calendar, unfold},
};

/// Parse a whole calendar document into its events, converting every
/// timestamp into `tz`.
pub fn parse_calendar(content: &str, tz: Tz) -> NoticalResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| NoticalError::IcsParse(e.to_string()))?;

    let mut events = Vec::new();
    for vevent in calendar.components.iter().filter(|c| c.name == "VEVENT") {
        let title = vevent
            .find_prop("SUMMARY")
            .map(|p| p.val.to_string())
            .unwrap_or_else(|| "Untitled event".to_string());

        let start = vevent
            .find_prop("DTSTART")
            .and_then(|p| DatePerhapsTime::try_from(p).ok())
            .and_then(|dpt| to_zoned(dpt, tz));
        let end = vevent
            .find_prop("DTEND")
            .and_then(|p| DatePerhapsTime::try_from(p).ok())
            .and_then(|dpt| to_zoned(dpt, tz));

        let location = vevent
            .find_prop("LOCATION")
            .map(|p| p.val.to_string())
            .unwrap_or_default();
        let description = vevent
            .find_prop("DESCRIPTION")
            .map(|p| p.val.to_string())
            .unwrap_or_default();

        // Reminders from VALARM components
        let reminders: Vec<Reminder> = vevent
            .components
            .iter()
            .filter(|c| c.name == "VALARM")
            .filter_map(|alarm| {
                let trigger = alarm.find_prop("TRIGGER")?.val.to_string();
                let minutes = parse_trigger_minutes(&trigger)?;
                Some(Reminder { minutes })
            })
            .collect();

        events.push(Event {
            title,
            start,
            end,
            location,
            description,
            reminders,
        });
    }

    Ok(events)
}

/// Convert icalendar's DatePerhapsTime into the configured timezone.
/// Floating datetimes are taken as local to `tz`; all-day dates become
/// local midnight. Unresolvable local times (DST gaps) yield `None`.
fn to_zoned(dpt: DatePerhapsTime, tz: Tz) -> Option<DateTime<Tz>> {
    match dpt {
        DatePerhapsTime::Date(d) => tz.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).single(),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => Some(dt.with_timezone(&tz)),
            icalendar::CalendarDateTime::Floating(naive) => {
                tz.from_local_datetime(&naive).single()
            }
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                let source: Tz = tzid.parse().ok()?;
                source
                    .from_local_datetime(&date_time)
                    .single()
                    .map(|dt| dt.with_timezone(&tz))
            }
        },
    }
}

/// Parse a TRIGGER value to minutes before the event (-PT1H, -P1D, etc.)
fn parse_trigger_minutes(value: &str) -> Option<i64> {
    let is_before = value.starts_with('-');
    let duration_str = value.trim_start_matches('-');

    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let minutes = (std_duration.as_secs() / 60) as i64;

    Some(if is_before { minutes } else { -minutes })
}
