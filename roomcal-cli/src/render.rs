//! Terminal rendering of the weekly view, with the labels the public
//! site uses.

use chrono::{DateTime, Datelike};
use chrono_tz::Tz;
use owo_colors::OwoColorize;
use roomcal_core::EventRecord;
use roomcal_core::week::{DAYS_IN_WEEK, WeekView};

pub const WEEKDAYS: [&str; DAYS_IN_WEEK] = [
    "Maanantai",
    "Tiistai",
    "Keskiviikko",
    "Torstai",
    "Perjantai",
    "Lauantai",
    "Sunnuntai",
];
pub const WEEKDAYS_SHORT: [&str; DAYS_IN_WEEK] = ["Ma", "Ti", "Ke", "To", "Pe", "La", "Su"];

const NO_EVENTS: &str = "Ei tapahtumia.";
const LATER: &str = "Myöhemmin";

/// `hakutuloksia: 12`, or `hakutuloksia: yli 1000` when the cap was hit.
pub fn result_counter(view: &WeekView) -> String {
    let over = if view.too_many_events { "yli " } else { "" };
    format!("hakutuloksia: {}{}", over, view.total)
}

pub fn truncation_notice(shown: usize) -> String {
    format!("Vain {} ensimmäistä tulosta näytettiin. Tarkenna hakua.", shown)
}

/// `17.3.2025`
pub fn date(at: DateTime<Tz>) -> String {
    format!("{}.{}.{}", at.day(), at.month(), at.year())
}

/// One result line: weekday, date, time span, place, summary.
pub fn row(record: &EventRecord, tz: Tz) -> String {
    let start = record.start().with_timezone(&tz);
    let end = record
        .end()
        .map(|end| end.with_timezone(&tz).format("%H:%M").to_string())
        .unwrap_or_default();
    let weekday = WEEKDAYS_SHORT[start.weekday().num_days_from_monday() as usize];

    format!(
        "{}  {:<10}  {} - {:<5}  {} {}  {}",
        weekday,
        date(start),
        start.format("%H:%M"),
        end,
        record.location.building,
        record.location.room,
        record.event.summary
    )
}

pub fn week(view: &WeekView, tz: Tz) -> String {
    let mut lines = vec![result_counter(view).dimmed().to_string()];

    for (day, records) in WEEKDAYS.iter().zip(&view.days) {
        lines.push(String::new());
        lines.push(day.bold().to_string());
        if records.is_empty() {
            lines.push(format!("   {}", NO_EVENTS.dimmed()));
        }
        lines.extend(records.iter().map(|r| format!("   {}", row(r, tz))));
    }

    lines.push(String::new());
    lines.push(LATER.bold().to_string());
    lines.extend(view.later.iter().map(|r| format!("   {}", row(r, tz))));

    if view.too_many_events {
        lines.push(String::new());
        lines.push(truncation_notice(view.total).yellow().to_string());
    }

    lines.join("\n")
}
