//! Date, date-time and duration sub-scanners.
//!
//! The scanner hands over once a number run ends in `:` (duration) or `/`
//! (date). Both functions re-read from the literal's first byte and return
//! the decoded value plus the offset just past the literal.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::error::{ErrorKind, ParseError};
use crate::find::find_any;
use crate::span::Span;
use crate::value::TimeSpan;

/// Bytes that may legally follow a literal.
#[inline]
pub(crate) fn is_literal_end(b: Option<u8>) -> bool {
    matches!(b, None | Some(b' ' | b'\t' | b'\r' | b'\n' | b';'))
}

/// Length of the ASCII digit run at `bytes[at..]`.
#[inline]
fn digit_run(bytes: &[u8], at: usize) -> usize {
    bytes
        .get(at..)
        .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count())
}

/// Parse the digit run at `at` as an `i32`, returning it and the run's end.
fn number_at(bytes: &[u8], at: usize) -> Option<(i32, usize)> {
    let len = digit_run(bytes, at);
    if len == 0 {
        return None;
    }
    // Digits are ASCII, so the slice is valid UTF-8.
    let text = std::str::from_utf8(&bytes[at..at + len]).ok()?;
    text.parse().ok().map(|n| (n, at + len))
}

// ============================================================================
// Durations: [-][Nd:]hh:mm:ss[.ms]
// ============================================================================

pub(crate) fn scan_duration(bytes: &[u8], start: usize) -> Result<(TimeSpan, usize), ParseError> {
    let fail = |component: &'static str, at: usize| {
        ParseError::new(ErrorKind::MalformedDuration(component), Span::new(start, at))
    };
    let expect = |at: usize, byte: u8, component: &'static str| {
        if bytes.get(at) == Some(&byte) {
            Ok(at + 1)
        } else {
            Err(fail(component, at))
        }
    };

    let negative = bytes.get(start) == Some(&b'-');
    let mut at = start + usize::from(negative);

    let (first, next) = number_at(bytes, at).ok_or_else(|| fail("hours", at))?;
    at = next;

    let (days, hours) = if matches!(bytes.get(at), Some(b'd' | b'D')) {
        at = expect(at + 1, b':', "days")?;
        let (hours, next) = number_at(bytes, at).ok_or_else(|| fail("hours", at))?;
        at = next;
        (first, hours)
    } else {
        (0, first)
    };

    at = expect(at, b':', "minutes")?;
    let (minutes, next) = number_at(bytes, at).ok_or_else(|| fail("minutes", at))?;
    at = expect(next, b':', "seconds")?;
    let (seconds, next) = number_at(bytes, at).ok_or_else(|| fail("seconds", at))?;
    at = next;

    let mut millis = 0;
    let mut last = "seconds";
    if bytes.get(at) == Some(&b'.') {
        let (ms, next) = number_at(bytes, at + 1).ok_or_else(|| fail("milliseconds", at + 1))?;
        millis = ms;
        at = next;
        last = "milliseconds";
    }

    if !is_literal_end(bytes.get(at).copied()) {
        return Err(fail(last, at));
    }

    let span = TimeSpan::new(days, hours, minutes, seconds, millis);
    Ok((if negative { span.negate() } else { span }, at))
}

// ============================================================================
// Dates: yyyy/mm/dd[ hh:mm[:ss[.fff]][-GMT[+|-]hh[:mm]]]
// ============================================================================

/// A scanned date literal. `has_time` is false for a bare date.
#[derive(Debug)]
pub(crate) struct ScannedDate {
    pub value: DateTime<FixedOffset>,
    pub has_time: bool,
    pub end: usize,
}

fn text(bytes: &[u8], start: usize, end: usize) -> String {
    String::from_utf8_lossy(&bytes[start..end.min(bytes.len())]).into_owned()
}

pub(crate) fn scan_date(bytes: &[u8], start: usize) -> Result<ScannedDate, ParseError> {
    let date_end = start + 10;
    let malformed_date = |end: usize| {
        ParseError::new(ErrorKind::MalformedDate(text(bytes, start, end)), Span::new(start, end))
    };

    let shape_ok = bytes.len() >= date_end
        && digit_run(bytes, start) == 4
        && bytes[start + 4] == b'/'
        && digit_run(bytes, start + 5) == 2
        && bytes[start + 7] == b'/'
        && digit_run(bytes, start + 8) == 2
        && is_literal_end(bytes.get(date_end).copied());
    if !shape_ok {
        let end = start + find_any(&bytes[start..], b" \t\r\n;");
        return Err(malformed_date(end));
    }

    let field = |at: usize, len: usize| -> u32 {
        bytes[at..at + len]
            .iter()
            .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
    };
    let date = NaiveDate::from_ymd_opt(field(start, 4) as i32, field(start + 5, 2), field(start + 8, 2))
        .ok_or_else(|| malformed_date(date_end))?;

    // A following run that starts with a digit and contains ':' is the time.
    let mut time_start = date_end;
    while matches!(bytes.get(time_start), Some(b' ' | b'\t')) {
        time_start += 1;
    }
    let time_end = time_start + find_any(&bytes[time_start..], b" \t\r\n;");
    let run = &bytes[time_start..time_end];
    let is_time = run.first().is_some_and(u8::is_ascii_digit) && run.contains(&b':');

    let utc = FixedOffset::east_opt(0).ok_or_else(|| malformed_date(date_end))?;
    if !is_time {
        let value = utc
            .from_local_datetime(&date.and_time(NaiveTime::default()))
            .single()
            .ok_or_else(|| malformed_date(date_end))?;
        return Ok(ScannedDate {
            value,
            has_time: false,
            end: date_end,
        });
    }

    let zone_at = run.iter().position(|&b| b == b'-').map(|i| time_start + i);
    let clock_end = zone_at.unwrap_or(time_end);
    let time = scan_time(bytes, time_start, clock_end).ok_or_else(|| malformed_date(time_end))?;

    let offset = match zone_at {
        Some(dash) => scan_zone(bytes, dash + 1, time_end)?,
        None => utc,
    };

    let value = offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| malformed_date(time_end))?;
    Ok(ScannedDate {
        value,
        has_time: true,
        end: time_end,
    })
}

/// `hh:mm[:ss[.fraction]]` filling exactly `bytes[start..end]`.
fn scan_time(bytes: &[u8], start: usize, end: usize) -> Option<NaiveTime> {
    let two_digits = |at: usize| {
        let len = digit_run(&bytes[..end], at);
        (1..=2).contains(&len).then(|| number_at(bytes, at)).flatten()
    };

    let (hour, at) = two_digits(start)?;
    if bytes.get(at) != Some(&b':') {
        return None;
    }
    let (minute, mut at) = two_digits(at + 1)?;

    let mut second = 0;
    let mut millis = 0;
    if at < end && bytes[at] == b':' {
        let (s, next) = two_digits(at + 1)?;
        second = s;
        at = next;
        if at < end && bytes[at] == b'.' {
            let len = digit_run(&bytes[..end], at + 1);
            if len == 0 {
                return None;
            }
            // Decimal seconds, truncated to milliseconds.
            millis = bytes[at + 1..at + 1 + len]
                .iter()
                .chain(std::iter::repeat(&b'0'))
                .take(3)
                .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
            at += 1 + len;
        }
    }
    if at != end {
        return None;
    }

    NaiveTime::from_hms_milli_opt(
        u32::try_from(hour).ok()?,
        u32::try_from(minute).ok()?,
        u32::try_from(second).ok()?,
        millis,
    )
}

/// `GMT[+|-]hh[:mm]` filling exactly `bytes[start..end]`.
fn scan_zone(bytes: &[u8], start: usize, end: usize) -> Result<FixedOffset, ParseError> {
    let invalid = || {
        ParseError::new(
            ErrorKind::InvalidTimezone(text(bytes, start, end)),
            Span::new(start, end),
        )
    };

    let zone = &bytes[start..end];
    let rest = zone.strip_prefix(b"GMT").ok_or_else(invalid)?;
    if rest.is_empty() {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let sign = match rest[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(invalid()),
    };
    let digits = &rest[1..];
    if digits.is_empty() {
        return Err(invalid());
    }

    let (hours, minutes) = match digits.iter().position(|&b| b == b':') {
        Some(colon) => (&digits[..colon], &digits[colon + 1..]),
        None => (digits, &b""[..]),
    };
    let part = |p: &[u8], required: bool| -> Option<i32> {
        if p.is_empty() && !required {
            return Some(0);
        }
        if p.is_empty() || p.len() > 2 || !p.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(p.iter().fold(0, |acc, b| acc * 10 + i32::from(b - b'0')))
    };
    let hours = part(hours, true).ok_or_else(invalid)?;
    let minutes = part(minutes, digits.contains(&b':')).ok_or_else(invalid)?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
