//! Materialized SDLang values.
//!
//! Values are typed by syntax: the literal form picks the variant, never
//! the content. Accessors enforce the active variant and report a
//! [`ValueError::TypeMismatch`] instead of converting.
//!
//! Ordering is only defined between numeric variants. `Integer` and
//! `Floating` compare with each other, but are never *equal* to each other.

use std::cmp::Ordering;
use std::fmt;

use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, Timelike};

use crate::error::ValueError;

// ============================================================================
// TimeSpan
// ============================================================================

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Signed duration with millisecond resolution.
///
/// Component accessors truncate toward zero, so every nonzero component of
/// a negative span is negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan(TimeDelta);

impl TimeSpan {
    /// Build from components. `i32` components cannot overflow the span.
    pub fn new(days: i32, hours: i32, minutes: i32, seconds: i32, millis: i32) -> Self {
        let total = i64::from(days) * MS_PER_DAY
            + i64::from(hours) * MS_PER_HOUR
            + i64::from(minutes) * MS_PER_MINUTE
            + i64::from(seconds) * MS_PER_SECOND
            + i64::from(millis);
        TimeSpan(TimeDelta::milliseconds(total))
    }

    #[inline]
    pub fn from_delta(delta: TimeDelta) -> Self {
        TimeSpan(delta)
    }

    #[inline]
    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    #[inline]
    pub fn total_milliseconds(&self) -> i64 {
        self.0.num_milliseconds()
    }

    pub fn days(&self) -> i64 {
        self.total_milliseconds() / MS_PER_DAY
    }

    pub fn hours(&self) -> i64 {
        (self.total_milliseconds() / MS_PER_HOUR) % 24
    }

    pub fn minutes(&self) -> i64 {
        (self.total_milliseconds() / MS_PER_MINUTE) % 60
    }

    pub fn seconds(&self) -> i64 {
        (self.total_milliseconds() / MS_PER_SECOND) % 60
    }

    pub fn milliseconds(&self) -> i64 {
        self.total_milliseconds() % MS_PER_SECOND
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.total_milliseconds() < 0
    }

    #[must_use]
    pub fn negate(self) -> Self {
        TimeSpan(-self.0)
    }
}

impl From<TimeDelta> for TimeSpan {
    fn from(delta: TimeDelta) -> Self {
        TimeSpan(delta)
    }
}

/// `[-][Nd:]hh:mm:ss[.fff]`, components printed as absolute values.
impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        let days = self.days().abs();
        if days != 0 {
            write!(f, "{}d:", days)?;
        }
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours().abs(),
            self.minutes().abs(),
            self.seconds().abs()
        )?;
        let ms = self.milliseconds().abs();
        if ms != 0 {
            write!(f, ".{:03}", ms)?;
        }
        Ok(())
    }
}

// ============================================================================
// Value
// ============================================================================

/// Which variant a [`Value`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Integer,
    Floating,
    Boolean,
    Null,
    Binary,
    String,
    DateTime,
    TimeSpan,
}

impl ValueKind {
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Floating)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Integer => "integer",
            ValueKind::Floating => "floating",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
            ValueKind::Binary => "binary",
            ValueKind::String => "string",
            ValueKind::DateTime => "date-time",
            ValueKind::TimeSpan => "time span",
        })
    }
}

/// A tag value or attribute value.
#[derive(Debug, Clone)]
pub enum Value {
    /// `42`, `42L`: both widths are held as `i64`.
    Integer(i64),

    /// `1.5f`, `1.5d`: both widths are held as `f64`.
    Floating(f64),

    /// `true`/`on`, `false`/`off`
    Boolean(bool),

    /// `null`
    Null,

    /// `[base64]`, decoded
    Binary(Vec<u8>),

    /// `"escaped"` (decoded) or `` `verbatim` ``
    String(String),

    /// `2021/03/27`, `2005/11/23 10:14:23.253-GMT+01:00`
    DateTime(DateTime<FixedOffset>),

    /// `12:34:56`, `-10d:12:34:56.789`
    TimeSpan(TimeSpan),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Floating(_) => ValueKind::Floating,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Null => ValueKind::Null,
            Value::Binary(_) => ValueKind::Binary,
            Value::String(_) => ValueKind::String,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::TimeSpan(_) => ValueKind::TimeSpan,
        }
    }

    #[inline]
    fn mismatch(&self, expected: ValueKind) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn as_integer(&self) -> Result<i64, ValueError> {
        match self {
            Value::Integer(i) => Ok(*i),
            _ => Err(self.mismatch(ValueKind::Integer)),
        }
    }

    #[inline]
    pub fn as_floating(&self) -> Result<f64, ValueError> {
        match self {
            Value::Floating(x) => Ok(*x),
            _ => Err(self.mismatch(ValueKind::Floating)),
        }
    }

    #[inline]
    pub fn as_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.mismatch(ValueKind::Boolean)),
        }
    }

    #[inline]
    pub fn as_binary(&self) -> Result<&[u8], ValueError> {
        match self {
            Value::Binary(bytes) => Ok(bytes),
            _ => Err(self.mismatch(ValueKind::Binary)),
        }
    }

    #[inline]
    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch(ValueKind::String)),
        }
    }

    #[inline]
    pub fn as_date_time(&self) -> Result<DateTime<FixedOffset>, ValueError> {
        match self {
            Value::DateTime(dt) => Ok(*dt),
            _ => Err(self.mismatch(ValueKind::DateTime)),
        }
    }

    #[inline]
    pub fn as_time_span(&self) -> Result<TimeSpan, ValueError> {
        match self {
            Value::TimeSpan(ts) => Ok(*ts),
            _ => Err(self.mismatch(ValueKind::TimeSpan)),
        }
    }

    /// Numeric comparison. Any non-numeric operand, or a NaN, fails.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering, ValueError> {
        let ordering = match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Floating(b)) => (*a as f64).partial_cmp(b),
            (Value::Floating(a), Value::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Floating(a), Value::Floating(b)) => a.partial_cmp(b),
            _ => None,
        };
        ordering.ok_or(ValueError::NotComparable {
            left: self.kind(),
            right: other.kind(),
        })
    }

    pub fn try_cmp_i64(&self, other: i64) -> Result<Ordering, ValueError> {
        self.try_cmp(&Value::Integer(other))
    }

    pub fn try_cmp_f64(&self, other: f64) -> Result<Ordering, ValueError> {
        self.try_cmp(&Value::Floating(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Floating(a), Value::Floating(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            // chrono compares instants only; the offset is part of the payload.
            (Value::DateTime(a), Value::DateTime(b)) => a == b && a.offset() == b.offset(),
            (Value::TimeSpan(a), Value::TimeSpan(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Floating(x)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Floating(f64::from(x))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(bytes)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<TimeSpan> for Value {
    fn from(ts: TimeSpan) -> Self {
        Value::TimeSpan(ts)
    }
}

// ============================================================================
// Literal rendering
// ============================================================================

/// Renders SDLang literal syntax that scans back to an equal value.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => {
                if i32::try_from(*i).is_ok() {
                    write!(f, "{}", i)
                } else {
                    write!(f, "{}L", i)
                }
            }
            Value::Floating(x) => write!(f, "{}d", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::Binary(bytes) => write!(f, "[{}]", B64.encode(bytes)),
            Value::String(s) => write_quoted(f, s),
            Value::DateTime(dt) => write_date_time(f, dt),
            Value::TimeSpan(ts) => write!(f, "{}", ts),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        let escaped = match c {
            '\\' => "\\\\",
            '"' => "\\\"",
            '\n' => "\\n",
            '\t' => "\\t",
            '\r' => "\\r",
            _ => continue,
        };
        f.write_str(&s[start..i])?;
        f.write_str(escaped)?;
        start = i + c.len_utf8();
    }
    f.write_str(&s[start..])?;
    f.write_str("\"")
}

fn write_date_time(f: &mut fmt::Formatter<'_>, dt: &DateTime<FixedOffset>) -> fmt::Result {
    write!(
        f,
        "{:04}/{:02}/{:02} {:02}:{:02}:{:02}.{:03}",
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.nanosecond() / 1_000_000
    )?;
    let offset = dt.offset().local_minus_utc();
    let sign = if offset < 0 { '-' } else { '+' };
    let offset = offset.abs();
    write!(f, "-GMT{}{:02}:{:02}", sign, offset / 3600, (offset % 3600) / 60)
}

// ============================================================================
// Tests
// ============================================================================
