use brock::assistant::Assistant;
use brock::commands::converse;
use brock::storage::Storage;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 1).unwrap()
}

fn with_test_file<F>(f: F)
where
    F: FnOnce(PathBuf),
{
    let dir = tempfile::tempdir().unwrap();
    f(dir.path().join("tasks.txt"));
}

fn open(path: &PathBuf) -> Assistant {
    Assistant::with_clock(Storage::new(path), fixed_today).unwrap()
}

#[test]
fn test_end_to_end_session() {
    with_test_file(|path| {
        let mut brock = open(&path);
        brock.respond("todo read book");
        brock.respond("deadline return book /by 2024-12-01");

        assert_eq!(
            brock.respond("list").text,
            "Here are the tasks in your list:\n\
             1. [T][ ] read book\n\
             2. [D][ ] return book (by: Dec 01 2024)"
        );
        assert_eq!(
            brock.respond("mark 1").text,
            "Nice! I've marked this task as done:\n  [T][X] read book"
        );

        let saved = fs::read_to_string(&path).unwrap();
        assert_eq!(
            saved,
            "1. [T][X] read book\n2. [D][ ] return book (by: Dec 01 2024)\n"
        );
        assert_eq!(saved, brock.tasks().render_all());
    });
}

#[test]
fn test_session_survives_restart() {
    with_test_file(|path| {
        let mut brock = open(&path);
        brock.respond("event conference /from 2024-12-01 0900 /to 2024-12-02 1700");
        brock.respond("todo buy milk");
        brock.respond("mark 2");
        let before = brock.tasks().clone();
        drop(brock);

        let brock = open(&path);
        assert_eq!(brock.tasks(), &before);
        assert!(brock.greeting().ends_with("I found 2 tasks from last time."));
    });
}

#[test]
fn test_old_deadlines_still_load() {
    with_test_file(|path| {
        fs::write(&path, "1. [D][ ] pay rent (by: Jan 01 2020, 09:00)\n").unwrap();
        let mut brock = open(&path);
        assert_eq!(brock.tasks().len(), 1);
        // But a new one in the past is refused.
        assert_eq!(
            brock.respond("deadline pay rent /by 2020-01-01").text,
            "Due date cannot be earlier than today!"
        );
    });
}

#[test]
fn test_mark_and_unmark_are_idempotent() {
    with_test_file(|path| {
        let mut brock = open(&path);
        brock.respond("todo a");
        assert_eq!(brock.respond("unmark 1").text, "Task has not been marked yet!");
        brock.respond("mark 1");
        assert_eq!(brock.respond("mark 1").text, "Task has been marked already!");
        assert_eq!(
            brock.respond("unmark 1").text,
            "OK, I've marked this task as not done yet:\n  [T][ ] a"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "1. [T][ ] a\n");
    });
}

#[test]
fn test_delete_rewrites_file() {
    with_test_file(|path| {
        let mut brock = open(&path);
        brock.respond("todo a");
        brock.respond("todo b");
        brock.respond("todo c");
        assert_eq!(
            brock.respond("delete 2").text,
            "Noted. I've removed this task:\n  [T][ ] b\nNow you have 2 tasks in the list."
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "1. [T][ ] a\n2. [T][ ] c\n");
    });
}

#[test]
fn test_task_number_bounds() {
    with_test_file(|path| {
        let mut brock = open(&path);
        assert_eq!(
            brock.respond("delete 1").text,
            "Task number does not exist! You have no tasks yet!"
        );
        brock.respond("todo a");
        assert_eq!(
            brock.respond("mark 2").text,
            "Task number does not exist! You have 1 task(s)."
        );
        assert_eq!(brock.respond("mark 0").text, "Task numbers start from 1!");
        assert_eq!(brock.tasks().len(), 1);
    });
}

#[test]
fn test_corrupt_file_is_moved_aside() {
    with_test_file(|path| {
        fs::write(&path, "1. [T][ ] fine\n2. [D][ ] broken (by: someday)\n").unwrap();
        let mut brock = open(&path);

        assert!(brock.tasks().is_empty());
        assert!(brock
            .greeting()
            .contains("Save file line 2: Due date string is not valid!"));

        let moved = path.with_file_name("tasks.txt.corrupt");
        assert_eq!(
            fs::read_to_string(&moved).unwrap(),
            "1. [T][ ] fine\n2. [D][ ] broken (by: someday)\n"
        );

        brock.respond("todo start over");
        assert_eq!(fs::read_to_string(&path).unwrap(), "1. [T][ ] start over\n");
    });
}

#[test]
fn test_console_conversation() {
    with_test_file(|path| {
        let mut brock = open(&path);
        let input = "todo read book\n\n   list  \nbye\ntodo never\n";
        let mut output = Vec::new();
        converse(&mut brock, input.as_bytes(), &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Hello! I'm Brock"));
        assert!(output.contains("Please enter a command!"));
        assert!(output.contains("Here are the tasks in your list:\n1. [T][ ] read book"));
        assert!(output.ends_with("Bye. Hope to see you again soon!\n"));
        assert_eq!(brock.tasks().len(), 1);
    });
}

#[test]
fn test_failed_save_leaves_list_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store");
    let path = store.join("tasks.txt");
    let mut brock = open(&path);
    brock.respond("todo a");
    brock.respond("todo b");

    fs::remove_dir_all(&store).unwrap();
    assert!(brock
        .respond("mark 1")
        .text
        .starts_with("Save file could not be accessed"));
    assert!(brock.respond("delete 1").text.starts_with("Save file could not be accessed"));
    assert_eq!(brock.tasks().len(), 2);
    assert!(!brock.tasks().get(1).unwrap().is_done());

    // Once the file is back, the same command goes through and is saved.
    fs::create_dir_all(&store).unwrap();
    fs::write(&path, "1. [T][ ] a\n2. [T][ ] b\n").unwrap();
    assert_eq!(
        brock.respond("mark 1").text,
        "Nice! I've marked this task as done:\n  [T][X] a"
    );
    assert_eq!(fs::read_to_string(&path).unwrap(), "1. [T][X] a\n2. [T][ ] b\n");
}

#[test]
fn test_add_after_unterminated_last_line() {
    with_test_file(|path| {
        fs::write(&path, "1. [T][ ] a").unwrap();
        let mut brock = open(&path);
        brock.respond("todo b");
        drop(brock);

        let brock = open(&path);
        assert_eq!(brock.tasks().render_all(), "1. [T][ ] a\n2. [T][ ] b\n");
    });
}
