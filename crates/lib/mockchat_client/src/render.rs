//! Terminal rendering of messages, tables and session lists.

use prettytable::{Cell, Row, Table, format};

use mockchat_core::models::{Message, MessageKind, Session, TablePayload};
use mockchat_core::table;

/// Render a table payload as a bordered grid.
///
/// Returns `None`, and renders nothing, when the payload fails validation.
pub fn render_table(payload: &TablePayload) -> Option<String> {
    if let Err(e) = table::validate(payload) {
        log::debug!("not rendering table: {e}");
        return None;
    }

    let mut grid = Table::new();
    grid.set_format(*format::consts::FORMAT_BOX_CHARS);
    grid.set_titles(Row::new(
        payload.headers.iter().map(|h| Cell::new(h)).collect(),
    ));
    for row in &payload.rows {
        grid.add_row(Row::new(
            row.iter().map(|c| Cell::new(&c.to_string())).collect(),
        ));
    }
    Some(grid.to_string())
}

fn speaker(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::User => "You",
        MessageKind::Ai => "AI",
    }
}

/// One transcript entry: speaker label, text, then the table if it is valid.
pub fn render_message(message: &Message) -> String {
    let mut out = format!("{}: {}", speaker(message.kind), message.text);
    if let Some(grid) = message.table().and_then(render_table) {
        out.push('\n');
        out.push_str(&grid);
    }
    out
}

/// The whole transcript, one blank line between entries.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Sessions as an id/title/created table.
pub fn render_sessions(sessions: &[Session]) -> String {
    let mut grid = Table::new();
    grid.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    grid.set_titles(Row::new(vec![
        Cell::new("ID"),
        Cell::new("Title"),
        Cell::new("Created"),
    ]));
    for session in sessions {
        grid.add_row(Row::new(vec![
            Cell::new(&session.id),
            Cell::new(&session.title),
            Cell::new(&session.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }
    grid.to_string()
}
