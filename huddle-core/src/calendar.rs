//! iCalendar (RFC 5545) export of a confirmed gathering.

use crate::orchestrator::ConfirmationDetail;
use std::fmt::Write;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// `20260307T180000`
const ICS_DATETIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year][month][day]T[hour][minute][second]");

/// Length assumed for a time slot without an explicit end.
const DEFAULT_DURATION: time::Duration = time::Duration::hours(2);

/// Content lines longer than this many octets are folded.
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),

    #[error("failed to write calendar: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Render a VCALENDAR holding one VEVENT for a confirmed gathering.
///
/// Times are written as floating local times, the way hosts entered them.
/// `DTSTAMP` is `now` in UTC.
pub fn render_ics(
    detail: &ConfirmationDetail,
    now: time::PrimitiveDateTime,
) -> Result<String, CalendarError> {
    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".into(),
        "VERSION:2.0".into(),
        "PRODID:-//Huddle//Huddle//EN".into(),
        "CALSCALE:GREGORIAN".into(),
        "METHOD:PUBLISH".into(),
        "BEGIN:VEVENT".into(),
        format!(
            "UID:{}-{}@huddle",
            detail.gathering.share_code, detail.result.id
        ),
        format!("DTSTAMP:{}Z", now.format(ICS_DATETIME)?),
        format!("SUMMARY:{}", escape_text(&detail.gathering.title)),
    ];

    if let Some(slot) = &detail.time {
        let start = time::PrimitiveDateTime::new(slot.candidate_date, slot.start_time);
        let end = match slot.end_time {
            // An end at or before the start runs past midnight.
            Some(end) if end > slot.start_time => {
                time::PrimitiveDateTime::new(slot.candidate_date, end)
            }
            Some(end) => time::PrimitiveDateTime::new(slot.candidate_date, end)
                .saturating_add(time::Duration::DAY),
            None => start.saturating_add(DEFAULT_DURATION),
        };
        lines.push(format!("DTSTART:{}", start.format(ICS_DATETIME)?));
        lines.push(format!("DTEND:{}", end.format(ICS_DATETIME)?));
    }

    if let Some(place) = &detail.place {
        lines.push(format!("LOCATION:{}", escape_text(&place.name)));
        if let Some(link) = &place.map_link {
            lines.push(format!("DESCRIPTION:{}", escape_text(&format!("Map: {link}"))));
        }
    }

    lines.push("END:VEVENT".into());
    lines.push("END:VCALENDAR".into());

    let mut out = String::new();
    for line in &lines {
        write_folded(&mut out, line)?;
    }
    Ok(out)
}

/// Escape a TEXT value.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// Write one content line, folding at 75 octets without splitting a character.
fn write_folded(out: &mut String, line: &str) -> Result<(), std::fmt::Error> {
    let mut budget = MAX_LINE_OCTETS;
    let mut used = 0;
    for c in line.chars() {
        if used + c.len_utf8() > budget {
            out.write_str("\r\n ")?;
            // The leading space of a continuation line counts against it.
            budget = MAX_LINE_OCTETS - 1;
            used = 0;
        }
        out.write_char(c)?;
        used += c.len_utf8();
    }
    out.write_str("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ConfirmType;
    use crate::entities::candidates::{PlaceCandidate, TimeCandidate};
    use crate::entities::confirmed_result::ConfirmedResult;
    use crate::entities::{GatheringKind, GatheringStatus};
    use crate::store::memory::gathering;
    use time::macros::{date, datetime, time};

    fn detail() -> ConfirmationDetail {
        let mut g = gathering(1, "abcd1234", GatheringKind::Both, GatheringStatus::Confirmed);
        g.title = "Dinner; friends, again".to_string();
        ConfirmationDetail {
            gathering: g,
            result: ConfirmedResult {
                id: 42,
                gathering_id: 1,
                time_candidate_id: Some(10),
                place_candidate_id: Some(20),
                confirmed_at: datetime!(2026-01-10 12:01),
                confirmed_by: ConfirmType::Auto,
            },
            time: Some(TimeCandidate {
                id: 10,
                gathering_id: 1,
                candidate_date: date!(2026 - 03 - 07),
                start_time: time!(18:00),
                end_time: None,
                display_order: 0,
            }),
            place: Some(PlaceCandidate {
                id: 20,
                gathering_id: 1,
                name: "Cafe\\Bar".to_string(),
                map_link: Some("https://maps.example/x".to_string()),
                display_order: 0,
            }),
            time_voters: vec![1],
            place_voters: vec![1],
        }
    }

    #[test]
    fn test_render_ics() {
        let ics = render_ics(&detail(), datetime!(2026-01-11 08:30)).unwrap();
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert_eq!(lines.first(), Some(&"BEGIN:VCALENDAR"));
        assert!(ics.ends_with("END:VEVENT\r\nEND:VCALENDAR\r\n"));
        assert!(lines.contains(&"UID:abcd1234-42@huddle"));
        assert!(lines.contains(&"DTSTAMP:20260111T083000Z"));
        assert!(lines.contains(&"SUMMARY:Dinner\\; friends\\, again"));
        assert!(lines.contains(&"DTSTART:20260307T180000"));
        assert!(lines.contains(&"DTEND:20260307T200000"));
        assert!(lines.contains(&"LOCATION:Cafe\\\\Bar"));
        assert!(lines.contains(&"DESCRIPTION:Map: https://maps.example/x"));
    }

    #[test]
    fn test_end_time_past_midnight() {
        let mut detail = detail();
        if let Some(slot) = detail.time.as_mut() {
            slot.start_time = time!(22:00);
            slot.end_time = Some(time!(01:00));
        }
        let ics = render_ics(&detail, datetime!(2026-01-11 08:30)).unwrap();
        assert!(ics.contains("DTEND:20260308T010000\r\n"));
    }

    #[test]
    fn test_place_only_has_no_times() {
        let mut detail = detail();
        detail.time = None;
        detail.place.as_mut().unwrap().map_link = None;
        let ics = render_ics(&detail, datetime!(2026-01-11 08:30)).unwrap();
        assert!(!ics.contains("DTSTART"));
        assert!(!ics.contains("DESCRIPTION"));
        assert!(ics.contains("LOCATION:"));
    }

    #[test]
    fn test_long_lines_are_folded() {
        let mut detail = detail();
        detail.gathering.title = "가".repeat(40);
        let ics = render_ics(&detail, datetime!(2026-01-11 08:30)).unwrap();
        for line in ics.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "{line:?} is too long");
        }
        let unfolded = ics.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("SUMMARY:{}", "가".repeat(40))));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a\\b;c,d\ne"), "a\\\\b\\;c\\,d\\ne");
    }
}
