//! ICS feed parsing using the icalendar crate's parser.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::debug;

use crate::error::{RoomcalError, RoomcalResult};
use crate::event::CalendarEvent;

/// Result of parsing a whole feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedCalendar {
    /// `None` when the document has no VCALENDAR container at all.
    /// An existing container without VEVENTs gives `Some(vec![])`.
    pub events: Option<Vec<CalendarEvent>>,
}

/// Parse a feed into its events.
///
/// Floating and all-day times are read in `default_tz`, as is any TZID
/// that chrono-tz doesn't know.
pub fn parse_calendar(content: &str, default_tz: Tz) -> RoomcalResult<ParsedCalendar> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let unfolded = unfold(content);

    if !has_calendar_container(&unfolded) {
        return Ok(ParsedCalendar { events: None });
    }

    let calendar = read_calendar(&unfolded).map_err(|e| RoomcalError::IcsParse(e.to_string()))?;

    let mut vevents = Vec::new();
    collect_vevents(&calendar.components, &mut vevents);

    let events: Vec<CalendarEvent> = vevents
        .into_iter()
        .map(|vevent| parse_vevent(vevent, default_tz))
        .collect();

    debug!(count = events.len(), "parsed VEVENTs");

    Ok(ParsedCalendar {
        events: Some(events),
    })
}

fn has_calendar_container(content: &str) -> bool {
    content
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
}

/// VEVENTs may sit at the top level or inside the VCALENDAR component,
/// depending on how the parser unwrapped the root.
fn collect_vevents<'c, 'a>(components: &'c [Component<'a>], out: &mut Vec<&'c Component<'a>>) {
    for component in components {
        if component.name == "VEVENT" {
            out.push(component);
        } else if component.name == "VCALENDAR" {
            collect_vevents(&component.components, out);
        }
    }
}

fn parse_vevent(vevent: &Component<'_>, default_tz: Tz) -> CalendarEvent {
    // The parser has already undone TEXT escaping
    let text = |name: &str| vevent.find_prop(name).map(|p| p.val.to_string());

    let uid = text("UID").unwrap_or_default();
    let summary = text("SUMMARY").unwrap_or_default();
    let description = text("DESCRIPTION");
    let location = text("LOCATION");

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| to_instant(p, default_tz));
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| to_instant(p, default_tz));

    CalendarEvent {
        uid,
        summary,
        description,
        start,
        end,
        location,
    }
}

/// Resolve a DTSTART/DTEND property to a UTC instant.
fn to_instant(prop: &Property<'_>, default_tz: Tz) -> Option<DateTime<Utc>> {
    let dpt = DatePerhapsTime::try_from(prop).ok()?;

    match dpt {
        DatePerhapsTime::Date(date) => local_midnight(date, default_tz),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => Some(dt),
            CalendarDateTime::Floating(naive) => resolve_local(&naive, default_tz),
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                let tz = Tz::from_str(&tzid).unwrap_or_else(|_| {
                    debug!(%tzid, "unknown TZID, using default timezone");
                    default_tz
                });
                resolve_local(&date_time, tz)
            }
        },
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Utc>> {
    resolve_local(&date.and_hms_opt(0, 0, 0)?, tz)
}

/// Map a wall-clock time to UTC. Ambiguous times take the earlier instant,
/// times inside a DST gap take the later one.
pub(crate) fn resolve_local(naive: &NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(naive)
        .earliest()
        // Inside a DST gap: the wall clock jumped forward an hour
        .or_else(|| tz.from_local_datetime(&(*naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}
