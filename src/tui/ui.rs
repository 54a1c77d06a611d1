use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, Speaker};

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Conversation
            Constraint::Length(3), // Input
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let conversation = chunks[0];
    let inner_width = conversation.width.saturating_sub(2) as usize;
    let inner_height = conversation.height.saturating_sub(2) as usize;

    let lines = conversation_lines(app, inner_width);
    let end = lines.len().saturating_sub(app.scroll_back as usize);
    let start = end.saturating_sub(inner_height);
    let visible: Vec<Line> = lines[start..end].to_vec();

    let history = Paragraph::new(visible)
        .block(Block::default().borders(Borders::ALL).title("Brock"));
    f.render_widget(history, conversation);

    let input_title = if app.farewell_at.is_some() {
        "Goodbye"
    } else {
        "Message"
    };
    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[1]);

    if app.farewell_at.is_none() {
        let cursor_x = chunks[1].x + 1 + app.input_buffer.chars().count() as u16;
        f.set_cursor_position((cursor_x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
    }

    let help = Paragraph::new(
        "Enter: Send | Up/Down/PgUp/PgDn: Scroll | Esc: Quit | todo, deadline, event, mark, unmark, delete, list, bye",
    )
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Every message, speaker first, hard-wrapped to `width` columns.
fn conversation_lines(app: &App, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in &app.messages {
        let (name, color) = match message.speaker {
            Speaker::User => ("You", Color::Cyan),
            Speaker::Brock => ("Brock", Color::Green),
        };
        lines.push(Line::from(Span::styled(
            name,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for text_line in message.text.lines() {
            for chunk in wrap(text_line, width) {
                lines.push(Line::from(chunk));
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
