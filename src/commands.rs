use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::assistant::Assistant;
use crate::codec;
use crate::models::{Task, TaskKind};
use crate::storage::Storage;
use crate::task_list::TaskList;

/// Runs a single command from the shell and prints the response.
///
/// The words are joined back into one line, so
/// `brock run deadline pay rent /by 2030-01-01` works without quoting.
pub fn cmd_run(storage: Storage, words: Vec<String>) -> Result<()> {
    let mut brock = Assistant::open(storage).context("Failed to open save file")?;
    let response = brock.respond(&words.join(" "));
    println!("{}", response.text);
    Ok(())
}

/// Line-based conversation on stdin/stdout. Ends on `bye` or end of input.
pub fn cmd_console(storage: Storage) -> Result<()> {
    let mut brock = Assistant::open(storage).context("Failed to open save file")?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    converse(&mut brock, stdin.lock(), stdout.lock())
}

/// Drives `brock` with lines from `input`, writing each response to `output`.
pub fn converse<R: BufRead, W: Write>(brock: &mut Assistant, input: R, mut output: W) -> Result<()> {
    writeln!(output, "{}", brock.greeting())?;
    for line in input.lines() {
        let line = line?;
        let response = brock.respond(&line);
        writeln!(output, "{}", response.text)?;
        if response.exit {
            break;
        }
    }
    output.flush()?;
    Ok(())
}

/// Prints the saved tasks as a table.
///
/// Reads the save file without repairing it: a corrupt file is reported, not moved.
pub fn cmd_list(storage: Storage) -> Result<()> {
    let text = storage.read_all()?;
    let tasks = codec::decode(&text)
        .with_context(|| format!("Failed to read tasks from {}", storage.path().display()))?;
    if tasks.is_empty() {
        println!("There are no tasks in your list yet!");
        return Ok(());
    }
    println!("{}", task_table(&tasks));
    Ok(())
}

pub fn task_table(tasks: &TaskList) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Type").add_attribute(Attribute::Bold),
            Cell::new("Done").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("When").add_attribute(Attribute::Bold),
        ]);

    for (i, t) in tasks.iter().enumerate() {
        let (status, status_color) = if t.is_done() {
            ("Done", Color::Green)
        } else {
            ("Pending", Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(kind_name(t)),
            Cell::new(status).fg(status_color),
            Cell::new(t.description()),
            Cell::new(when(t)),
        ]);
    }
    table
}

fn kind_name(task: &Task) -> &'static str {
    match task.kind() {
        TaskKind::ToDo => "Todo",
        TaskKind::Deadline { .. } => "Deadline",
        TaskKind::Event { .. } => "Event",
    }
}

/// The task's dates without the surrounding brackets.
fn when(task: &Task) -> String {
    let extra = task.extra_info();
    extra
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(&extra)
        .to_string()
}
