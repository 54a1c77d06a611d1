use chrono::{NaiveDate, NaiveTime};

use crate::datetime::Moment;
use crate::error::{Error, Result};

/// Where a task is being built from. The non-past rule only applies to fresh tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Created by a command today.
    Fresh(NaiveDate),
    /// Rebuilt from the save file.
    Restored,
}

/// The kind-specific part of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    ToDo,
    Deadline {
        due: Moment,
    },
    Event {
        start: NaiveDate,
        end: NaiveDate,
        /// Start and end time. Either both are given or neither is.
        times: Option<(NaiveTime, NaiveTime)>,
    },
}

/// Represents a single task in the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// What the task is about. Never blank.
    description: String,
    /// Whether the task has been completed.
    done: bool,
    kind: TaskKind,
}

impl Task {
    pub fn todo(description: &str) -> Result<Task> {
        Task::new(description, TaskKind::ToDo)
    }

    /// Builds a deadline. A fresh deadline may not be due before `today`.
    pub fn deadline(description: &str, due: Moment, origin: Origin) -> Result<Task> {
        if let Origin::Fresh(today) = origin {
            if due.date < today {
                return Err(Error::invalid("Due date cannot be earlier than today!"));
            }
        }
        Task::new(description, TaskKind::Deadline { due })
    }

    /// Builds an event spanning `start` to `end`.
    ///
    /// Without times the event must end on a later day than it starts. With
    /// times on the same day, the end time must come after the start time.
    pub fn event(description: &str, start: Moment, end: Moment, origin: Origin) -> Result<Task> {
        let times = match (start.time, end.time) {
            (Some(s), Some(e)) => Some((s, e)),
            (None, None) => None,
            _ => {
                return Err(Error::invalid(
                    "Both start and end dates must either include or exclude a time!",
                ))
            }
        };

        if let Origin::Fresh(today) = origin {
            if start.date < today {
                return Err(Error::invalid("Start date cannot be earlier than today!"));
            }
            if end.date < today {
                return Err(Error::invalid("End date cannot be earlier than today!"));
            }
        }
        if end.date < start.date {
            return Err(Error::invalid("End date cannot be earlier than start date!"));
        }
        match times {
            None if end.date == start.date => {
                return Err(Error::invalid(
                    "Without time specified, end date must be after start date!",
                ));
            }
            Some((s, e)) if end.date == start.date && e <= s => {
                return Err(Error::invalid("End time must be after start time!"));
            }
            _ => {}
        }

        Task::new(
            description,
            TaskKind::Event {
                start: start.date,
                end: end.date,
                times,
            },
        )
    }

    fn new(description: &str, kind: TaskKind) -> Result<Task> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::invalid("Description is missing!"));
        }
        Ok(Task {
            description: description.to_string(),
            done: false,
            kind,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// Single letter used in listings and in the save file.
    pub fn type_tag(&self) -> char {
        match self.kind {
            TaskKind::ToDo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }

    /// Marks the task as done. Returns false if it already was.
    pub fn mark(&mut self) -> bool {
        let changed = !self.done;
        self.done = true;
        changed
    }

    /// Marks the task as not done. Returns false if it already was not done.
    pub fn unmark(&mut self) -> bool {
        let changed = self.done;
        self.done = false;
        changed
    }

    /// The parenthesized suffix, empty for to-dos.
    pub fn extra_info(&self) -> String {
        match &self.kind {
            TaskKind::ToDo => String::new(),
            TaskKind::Deadline { due } => format!("(by: {})", due.display()),
            TaskKind::Event { start, end, times } => {
                let start = Moment::new(*start, times.map(|(s, _)| s));
                let end = Moment::new(*end, times.map(|(_, e)| e));
                format!("(from: {} | to: {})", start.display(), end.display())
            }
        }
    }

    /// One-line rendering, e.g. `[D][X] submit report (by: Dec 01 2024, 18:00)`.
    pub fn details(&self) -> String {
        let status = if self.done { 'X' } else { ' ' };
        let extra = self.extra_info();
        if extra.is_empty() {
            format!("[{}][{}] {}", self.type_tag(), status, self.description)
        } else {
            format!("[{}][{}] {} {}", self.type_tag(), status, self.description, extra)
        }
    }
}
