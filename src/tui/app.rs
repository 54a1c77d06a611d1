use std::time::{Duration, Instant};

use crate::assistant::Assistant;

/// How long the farewell stays on screen after `bye`.
pub const FAREWELL_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Brock,
}

pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

pub struct App {
    pub assistant: Assistant,
    pub messages: Vec<Message>,
    pub input_buffer: String,
    /// Lines scrolled back from the bottom of the conversation.
    pub scroll_back: u16,
    /// Set once `bye` has been answered.
    pub farewell_at: Option<Instant>,
}

impl App {
    /// Starts the conversation with the assistant's greeting.
    pub fn new(assistant: Assistant) -> App {
        let greeting = Message {
            speaker: Speaker::Brock,
            text: assistant.greeting().to_string(),
        };
        App {
            assistant,
            messages: vec![greeting],
            input_buffer: String::new(),
            scroll_back: 0,
            farewell_at: None,
        }
    }

    /// Sends the input box contents to the assistant.
    pub fn submit(&mut self) {
        if self.farewell_at.is_some() {
            return;
        }
        let input = std::mem::take(&mut self.input_buffer);
        if input.trim().is_empty() {
            return;
        }

        let response = self.assistant.respond(&input);
        self.messages.push(Message {
            speaker: Speaker::User,
            text: input,
        });
        self.messages.push(Message {
            speaker: Speaker::Brock,
            text: response.text,
        });
        self.scroll_back = 0;
        if response.exit {
            self.farewell_at = Some(Instant::now());
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// True once the farewell has been shown long enough.
    pub fn should_quit(&self) -> bool {
        self.farewell_at
            .is_some_and(|at| at.elapsed() >= FAREWELL_DELAY)
    }
}
