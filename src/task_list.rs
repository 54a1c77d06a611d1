use crate::error::{Error, Result};
use crate::models::Task;

/// Ordered list of tasks. Insertion order is display order and save order.
///
/// Positions are 1-based everywhere in the public API. Out-of-range
/// positions are rejected here as well as in the command parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn add(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn get(&self, number: usize) -> Result<&Task> {
        let index = self.index_of(number)?;
        Ok(&self.tasks[index])
    }

    /// Removes and returns the task at `number`.
    pub fn remove_at(&mut self, number: usize) -> Result<Task> {
        let index = self.index_of(number)?;
        Ok(self.tasks.remove(index))
    }

    /// Returns whether the task changed state.
    pub fn mark_at(&mut self, number: usize) -> Result<bool> {
        let index = self.index_of(number)?;
        Ok(self.tasks[index].mark())
    }

    /// Returns whether the task changed state.
    pub fn unmark_at(&mut self, number: usize) -> Result<bool> {
        let index = self.index_of(number)?;
        Ok(self.tasks[index].unmark())
    }

    pub fn details_at(&self, number: usize) -> Result<String> {
        Ok(self.get(number)?.details())
    }

    /// Full numbered listing, one newline-terminated line per task.
    /// This is also the save file contents.
    pub fn render_all(&self) -> String {
        self.tasks
            .iter()
            .enumerate()
            .map(|(i, task)| numbered_line(i + 1, task))
            .collect()
    }

    pub fn summary(&self) -> String {
        let count = self.tasks.len();
        let noun = if count == 1 { "task" } else { "tasks" };
        format!("Now you have {} {} in the list.", count, noun)
    }

    fn index_of(&self, number: usize) -> Result<usize> {
        if number == 0 || number > self.tasks.len() {
            return Err(Error::invalid("Task number does not exist!"));
        }
        Ok(number - 1)
    }
}

/// `N. <details>` followed by a newline.
pub fn numbered_line(number: usize, task: &Task) -> String {
    format!("{}. {}\n", number, task.details())
}

impl FromIterator<Task> for TaskList {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskList {
        ["read book", "buy milk"]
            .iter()
            .map(|d| Task::todo(d).unwrap())
            .collect()
    }

    #[test]
    fn test_render_all_numbers_lines() {
        let list = sample();
        assert_eq!(list.render_all(), "1. [T][ ] read book\n2. [T][ ] buy milk\n");
        assert_eq!(TaskList::new().render_all(), "");
    }

    #[test]
    fn test_mark_unmark_signals() {
        let mut list = sample();
        assert!(list.mark_at(2).unwrap());
        assert!(!list.mark_at(2).unwrap());
        assert!(list.unmark_at(2).unwrap());
        assert!(!list.unmark_at(2).unwrap());
    }

    #[test]
    fn test_remove_at() {
        let mut list = sample();
        let removed = list.remove_at(1).unwrap();
        assert_eq!(removed.description(), "read book");
        assert_eq!(list.details_at(1).unwrap(), "[T][ ] buy milk");
        assert_eq!(list.summary(), "Now you have 1 task in the list.");
    }

    #[test]
    fn test_out_of_range() {
        let mut list = sample();
        assert!(list.remove_at(0).is_err());
        assert!(list.mark_at(3).is_err());
        assert!(list.details_at(3).is_err());
        assert_eq!(list.len(), 2);
    }
}
