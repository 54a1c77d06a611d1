use chrono::{Local, NaiveDate};

use crate::codec;
use crate::error::{Error, Result};
use crate::models::Task;
use crate::parser::{self, Command};
use crate::storage::Storage;
use crate::task_list::TaskList;

/// What the assistant says back, and whether the conversation is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub exit: bool,
}

impl Response {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }

    fn farewell() -> Self {
        Self {
            text: "Bye. Hope to see you again soon!".to_string(),
            exit: true,
        }
    }
}

/// Holds the task list for one session and keeps the save file in step with it.
pub struct Assistant {
    tasks: TaskList,
    storage: Storage,
    clock: fn() -> NaiveDate,
    greeting: String,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Assistant {
    /// Loads the save file behind `storage`, using the local date as today.
    pub fn open(storage: Storage) -> Result<Self> {
        Self::with_clock(storage, local_today)
    }

    /// Like [`Assistant::open`] but with a fixed source for today's date.
    ///
    /// A save file that fails to decode is moved aside and the session starts
    /// empty. Only I/O failures are returned.
    pub fn with_clock(storage: Storage, clock: fn() -> NaiveDate) -> Result<Self> {
        let text = storage.read_all()?;
        let (tasks, report) = match codec::decode(&text) {
            Ok(tasks) => {
                log::info!(
                    "Loaded {} task(s) from {}",
                    tasks.len(),
                    storage.path().display()
                );
                let report = match tasks.len() {
                    0 => "Your task list is empty.".to_string(),
                    1 => "I found 1 task from last time.".to_string(),
                    n => format!("I found {} tasks from last time.", n),
                };
                (tasks, report)
            }
            Err(e @ Error::Corrupt { .. }) => {
                log::error!("Failed to load {}: {}", storage.path().display(), e);
                let moved = storage.quarantine()?;
                let report = format!(
                    "{}\nI moved the unreadable file to {} and started a new list.",
                    e,
                    moved.display()
                );
                (TaskList::new(), report)
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            tasks,
            storage,
            clock,
            greeting: format!("Hello! I'm Brock\nWhat can I do for you?\n{}", report),
        })
    }

    /// The opening message, including how the save file was loaded.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    /// Handles one line of user input.
    ///
    /// Errors never end the conversation; they come back as the response text.
    pub fn respond(&mut self, raw: &str) -> Response {
        let line = normalize(raw);
        match self.execute(&line) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Rejected '{}': {}", line, e);
                Response::reply(e.to_string())
            }
        }
    }

    fn execute(&mut self, line: &str) -> Result<Response> {
        let today = (self.clock)();
        let command = parser::parse(line, self.tasks.len(), today)?;
        log::debug!("Parsed {:?}", command);

        let response = match command {
            Command::Add(task) => self.add(task)?,
            Command::Delete(number) => {
                let mut updated = self.tasks.clone();
                let removed = updated.remove_at(number)?;
                self.commit(updated)?;
                Response::reply(format!(
                    "Noted. I've removed this task:\n  {}\n{}",
                    removed.details(),
                    self.tasks.summary()
                ))
            }
            Command::Mark(number) => {
                let mut updated = self.tasks.clone();
                if !updated.mark_at(number)? {
                    return Ok(Response::reply("Task has been marked already!"));
                }
                self.commit(updated)?;
                Response::reply(format!(
                    "Nice! I've marked this task as done:\n  {}",
                    self.tasks.details_at(number)?
                ))
            }
            Command::Unmark(number) => {
                let mut updated = self.tasks.clone();
                if !updated.unmark_at(number)? {
                    return Ok(Response::reply("Task has not been marked yet!"));
                }
                self.commit(updated)?;
                Response::reply(format!(
                    "OK, I've marked this task as not done yet:\n  {}",
                    self.tasks.details_at(number)?
                ))
            }
            Command::List => {
                if self.tasks.is_empty() {
                    Response::reply("There are no tasks in your list yet!")
                } else {
                    Response::reply(format!(
                        "Here are the tasks in your list:\n{}",
                        self.tasks.render_all().trim_end()
                    ))
                }
            }
            Command::Bye => {
                log::info!("Conversation ended");
                Response::farewell()
            }
        };
        Ok(response)
    }

    /// Appends the new task's line, then adds it to the list.
    fn add(&mut self, task: Task) -> Result<Response> {
        let line = codec::encode_line(self.tasks.len() + 1, &task);
        self.storage.append(&line)?;
        log::info!("Saved new task: {}", line.trim_end());

        let details = task.details();
        self.tasks.add(task);
        Ok(Response::reply(format!(
            "Got it. I've added this task:\n  {}\n{}",
            details,
            self.tasks.summary()
        )))
    }

    /// Rewrites the save file with `updated`, then adopts it.
    ///
    /// On a failed write the list in memory is left as it was.
    fn commit(&mut self, updated: TaskList) -> Result<()> {
        self.storage.rewrite(&codec::encode(&updated))?;
        log::info!(
            "Rewrote {} with {} task(s)",
            self.storage.path().display(),
            updated.len()
        );
        self.tasks = updated;
        Ok(())
    }
}

/// Trims the input and collapses runs of whitespace to single spaces.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
