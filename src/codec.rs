//! Save file encoding.
//!
//! Each task is stored as its numbered listing line:
//!
//! ```text
//! 1. [T][ ] buy milk
//! 2. [D][X] submit report (by: Dec 01 2024, 18:00)
//! 3. [E][ ] conference (from: Dec 01 2024, 09:00 | to: Dec 02 2024, 17:00)
//! ```
//!
//! Decoding rebuilds every task through the same validator and constructors
//! a live command uses, so a damaged file fails with the usual messages.

use crate::datetime::{self, Context, Moment};
use crate::error::{Error, Result};
use crate::models::{Origin, Task};
use crate::task_list::{numbered_line, TaskList};

/// The whole list, ready to be written after a truncate.
pub fn encode(tasks: &TaskList) -> String {
    tasks.render_all()
}

/// A single line, ready to be appended for the task at `number`.
pub fn encode_line(number: usize, task: &Task) -> String {
    numbered_line(number, task)
}

/// Decodes a whole save file. The first malformed line aborts the load.
///
/// Blank lines are skipped.
pub fn decode(text: &str) -> Result<TaskList> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            decode_line(line).map_err(|e| Error::Corrupt {
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

/// Decodes one `N. [T][S] body` line.
pub fn decode_line(line: &str) -> Result<Task> {
    let (ordinal, rest) = line
        .trim()
        .split_once(". ")
        .ok_or_else(|| Error::invalid("Invalid entry - missing task number!"))?;
    if ordinal.parse::<usize>().is_err() {
        return Err(Error::invalid("Invalid entry - missing task number!"));
    }

    let (tag, status, body) = split_brackets(rest)?;
    let done = match status {
        'X' => true,
        ' ' => false,
        other => {
            return Err(Error::invalid(format!(
                "Invalid entry - unknown task status '{}'!",
                other
            )))
        }
    };

    let mut task = match tag {
        'T' => Task::todo(body)?,
        'D' => decode_deadline(body)?,
        'E' => decode_event(body)?,
        other => {
            return Err(Error::invalid(format!(
                "Invalid entry - unknown task type '{}'!",
                other
            )))
        }
    };
    if done {
        task.mark();
    }
    Ok(task)
}

/// Splits `[T][X] rest` into the tag, the status and the trimmed rest.
fn split_brackets(text: &str) -> Result<(char, char, &str)> {
    let mut chars = text.chars();
    let mut bracketed = |what: &str| -> Result<char> {
        let missing = || Error::invalid(format!("Invalid entry - missing task {}!", what));
        if chars.next() != Some('[') {
            return Err(missing());
        }
        let value = chars.next().ok_or_else(missing)?;
        if chars.next() != Some(']') {
            return Err(missing());
        }
        Ok(value)
    };
    let tag = bracketed("type")?;
    let status = bracketed("status")?;
    Ok((tag, status, chars.as_str().trim()))
}

fn decode_deadline(body: &str) -> Result<Task> {
    let (description, due) = body
        .rsplit_once("(by: ")
        .ok_or_else(|| Error::invalid("Invalid deadline entry - missing due date!"))?;
    let due = strip_close_bracket(due, "deadline")?;
    let due = decode_moment(due, Context::Due)?;
    Task::deadline(description, due, Origin::Restored)
}

fn decode_event(body: &str) -> Result<Task> {
    let (description, span) = body
        .rsplit_once("(from: ")
        .ok_or_else(|| Error::invalid("Invalid event entry - missing start date!"))?;
    let (start, end) = span.split_once(" | ").ok_or_else(|| {
        Error::invalid("Invalid event entry - missing start end date separator!")
    })?;
    let end = end
        .strip_prefix("to: ")
        .ok_or_else(|| Error::invalid("Invalid event entry - missing 'to: ' before end date!"))?;
    let end = strip_close_bracket(end, "event")?;

    let start = decode_moment(start, Context::Start)?;
    let end = decode_moment(end, Context::End)?;
    Task::event(description, start, end, Origin::Restored)
}

fn strip_close_bracket<'a>(text: &'a str, kind: &str) -> Result<&'a str> {
    text.strip_suffix(')').ok_or_else(|| {
        Error::invalid(format!("Invalid {} entry - missing closing bracket!", kind))
    })
}

/// `Dec 01 2024` or `Dec 01 2024, 18:00`.
fn decode_moment(text: &str, context: Context) -> Result<Moment> {
    let mut parts = text.split(", ");
    let date = parts.next().unwrap_or_default();
    let time = parts.next();
    if parts.next().is_some() {
        return Err(Error::invalid(format!("{} date string is not valid!", context)));
    }

    let date = datetime::parse_display_date(date, context)?;
    let time = match time {
        Some(time) => Some(datetime::parse_time(&time.replace(':', ""))?),
        None => None,
    };
    Ok(Moment::new(date, time))
}
