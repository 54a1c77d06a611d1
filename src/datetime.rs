use std::fmt;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{Error, Result};

/// Date format accepted in commands.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format used in listings and the save file, e.g. `Dec 01 2024`.
pub const DISPLAY_DATE_FORMAT: &str = "%b %d %Y";
/// Time format used in listings and the save file, e.g. `18:00`.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M";

/// Which date field is being validated. Picks the field name in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Due,
    Start,
    End,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Context::Due => "Due",
            Context::Start => "Start",
            Context::End => "End",
        };
        f.write_str(name)
    }
}

/// A validated calendar date with an optional clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl Moment {
    pub fn new(date: NaiveDate, time: Option<NaiveTime>) -> Self {
        Self { date, time }
    }

    /// Renders `Dec 01 2024` or `Dec 01 2024, 18:00`.
    pub fn display(&self) -> String {
        let date = self.date.format(DISPLAY_DATE_FORMAT);
        match self.time {
            Some(time) => format!("{}, {}", date, time.format(DISPLAY_TIME_FORMAT)),
            None => date.to_string(),
        }
    }
}

/// Validates a whitespace-separated `<date> [<time>]` field.
///
/// One token is a date only, two tokens are a date followed by a time.
pub fn parse_field(field: &str, context: Context) -> Result<Moment> {
    let tokens: Vec<&str> = field.split_whitespace().collect();
    match tokens.as_slice() {
        [] => Err(Error::invalid(format!("{} date string is not valid!", context))),
        [date] => Ok(Moment::new(parse_date(date, context)?, None)),
        [date, time] => {
            let date = parse_date(date, context)?;
            let time = parse_time(time)?;
            Ok(Moment::new(date, Some(time)))
        }
        _ => Err(Error::invalid(format!(
            "Too many values for the {} date! Use <date> [<time>]",
            context.to_string().to_lowercase()
        ))),
    }
}

/// Parses an ISO `YYYY-MM-DD` date. Unpadded fields and signs are rejected.
pub fn parse_date(token: &str, context: Context) -> Result<NaiveDate> {
    let invalid = || Error::invalid(format!("{} date string is not valid!", context));

    let bytes = token.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(token, INPUT_DATE_FORMAT).map_err(|_| invalid())
}

/// Parses a date in the listing format (`Dec 01 2024`).
pub fn parse_display_date(text: &str, context: Context) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DISPLAY_DATE_FORMAT)
        .map_err(|_| Error::invalid(format!("{} date string is not valid!", context)))
}

/// Parses a four digit `HHMM` time. No separator is accepted.
pub fn parse_time(token: &str) -> Result<NaiveTime> {
    let invalid = || Error::invalid("Time string is not valid! Use the HHMM format, e.g. 0930");

    if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let (hours, minutes) = token.split_at(2);
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}
