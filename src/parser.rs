use chrono::NaiveDate;

use crate::datetime::{self, Context};
use crate::error::{Error, Result};
use crate::models::{Origin, Task};

/// A validated request against the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Task),
    Mark(usize),
    Unmark(usize),
    Delete(usize),
    List,
    Bye,
}

/// Parses a whitespace-normalized command line.
///
/// `task_count` bounds the task numbers accepted by mark/unmark/delete and
/// `today` is the earliest date a new deadline or event may use.
pub fn parse(line: &str, task_count: usize, today: NaiveDate) -> Result<Command> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((keyword, rest)) = tokens.split_first() else {
        return Err(Error::invalid("Please enter a command!"));
    };

    match keyword.to_lowercase().as_str() {
        "todo" => Ok(Command::Add(Task::todo(&rest.join(" "))?)),
        "deadline" => parse_deadline(rest, today).map(Command::Add),
        "event" => parse_event(rest, today).map(Command::Add),
        "mark" => parse_task_number("mark", rest, task_count).map(Command::Mark),
        "unmark" => parse_task_number("unmark", rest, task_count).map(Command::Unmark),
        "delete" => parse_task_number("delete", rest, task_count).map(Command::Delete),
        "list" => Ok(Command::List),
        "bye" => Ok(Command::Bye),
        other => Err(Error::invalid(format!(
            "Unknown command '{}'! Try todo, deadline, event, mark, unmark, delete, list or bye.",
            other
        ))),
    }
}

/// Splits `tokens` around the first case-insensitive occurrence of `keyword`.
///
/// Returns the tokens before the keyword and, if the keyword was found, the
/// tokens after it.
fn split_at_keyword<'a, 'b>(tokens: &'a [&'b str], keyword: &str) -> (&'a [&'b str], Option<&'a [&'b str]>) {
    match tokens.iter().position(|t| t.eq_ignore_ascii_case(keyword)) {
        Some(pos) => (&tokens[..pos], Some(&tokens[pos + 1..])),
        None => (tokens, None),
    }
}

fn require_description(tokens: &[&str]) -> Result<String> {
    if tokens.is_empty() {
        return Err(Error::invalid("Description is missing!"));
    }
    Ok(tokens.join(" "))
}

fn parse_deadline(rest: &[&str], today: NaiveDate) -> Result<Task> {
    let (description, due) = split_at_keyword(rest, "/by");
    let description = require_description(description)?;

    let due = match due {
        Some(due) if !due.is_empty() => due,
        _ => {
            return Err(Error::invalid(
                "Missing due date! Remember it is specified after /by!",
            ))
        }
    };

    let due = datetime::parse_field(&due.join(" "), Context::Due)?;
    Task::deadline(&description, due, Origin::Fresh(today))
}

fn parse_event(rest: &[&str], today: NaiveDate) -> Result<Task> {
    let missing_start = || Error::invalid("Missing start date! Remember it is specified after /from!");
    let missing_end = || Error::invalid("Missing end date! Remember it is specified after /to!");

    let (description, after_from) = split_at_keyword(rest, "/from");
    let description = require_description(description)?;

    let after_from = after_from.ok_or_else(missing_start)?;
    let (start, end) = split_at_keyword(after_from, "/to");
    if start.is_empty() {
        return Err(missing_start());
    }
    let end = match end {
        Some(end) if !end.is_empty() => end,
        _ => return Err(missing_end()),
    };
    if start.len() != end.len() {
        return Err(Error::invalid(
            "Both start and end dates must either include or exclude a time!",
        ));
    }

    // Start is validated first so a bad end date is only blamed once start passed.
    let start = datetime::parse_field(&start.join(" "), Context::Start)?;
    let end = datetime::parse_field(&end.join(" "), Context::End)?;
    Task::event(&description, start, end, Origin::Fresh(today))
}

fn parse_task_number(verb: &str, rest: &[&str], task_count: usize) -> Result<usize> {
    let wrong_format = || {
        let mut name = verb.to_string();
        name[..1].make_ascii_uppercase();
        Error::invalid(format!(
            "{} command is in the form {} <task-number>!",
            name, verb
        ))
    };

    let token = match rest {
        [] => return Err(Error::invalid("Missing task number!")),
        [token] => token,
        _ => return Err(wrong_format()),
    };
    let number: i64 = token.parse().map_err(|_| wrong_format())?;

    if number < 1 {
        return Err(Error::invalid("Task numbers start from 1!"));
    }
    if number as u64 > task_count as u64 {
        return Err(if task_count == 0 {
            Error::invalid("Task number does not exist! You have no tasks yet!")
        } else {
            Error::invalid(format!(
                "Task number does not exist! You have {} task(s).",
                task_count
            ))
        });
    }
    Ok(number as usize)
}
