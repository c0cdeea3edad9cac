use crate::keyboard::history::HistoryEntry;
use crate::tui::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

const LOG_LINES: usize = 8;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),                      // Text buffer
            Constraint::Min(0),                         // Bindings and history
            Constraint::Length(LOG_LINES as u16 + 2),   // Log
            Constraint::Length(3),                      // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);
    draw_body(frame, chunks[1], app);
    draw_log(frame, chunks[2], app);
    draw_footer(frame, chunks[3], app);

    if app.help_mode {
        draw_help_window(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.keyboard.state();
    let header = Paragraph::new(format!("{}█", state.text))
        .block(Block::default().borders(Borders::ALL).title("Text"))
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(header, area);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    draw_bindings(frame, columns[0], app);
    let history = app.keyboard.history();
    draw_history(frame, columns[1], "Undo", &history.back);
    draw_history(frame, columns[2], "Redo", &history.forward);
}

fn draw_bindings(frame: &mut Frame, area: Rect, app: &App) {
    let state = app.keyboard.state();
    let media = if state.media_player { "playing" } else { "off" };
    let mut items = vec![
        ListItem::new(Line::from(vec![
            Span::styled("volume ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}%", state.volume), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  media ", Style::default().fg(Color::DarkGray)),
            Span::styled(media, Style::default().add_modifier(Modifier::BOLD)),
        ])),
        ListItem::new(""),
    ];

    items.extend(app.keyboard.bindings().iter().map(|(key, command)| {
        let (label, style) = match command {
            Some(command) => (command.to_string(), Style::default().fg(Color::White)),
            None => ("(disabled)".to_string(), Style::default().fg(Color::DarkGray)),
        };
        ListItem::new(Line::from(vec![
            Span::styled(format!("{:<10}", key), Style::default().fg(Color::Yellow)),
            Span::styled(label, style),
        ]))
    }));

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Bindings"));
    frame.render_widget(list, area);
}

fn draw_history(frame: &mut Frame, area: Rect, title: &str, entries: &[HistoryEntry]) {
    // Top of stack first.
    let items: Vec<ListItem> = entries
        .iter()
        .rev()
        .map(|entry| ListItem::new(format!("{:<10}{}", entry.key, entry.command)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("{} ({})", title, entries.len())),
    );
    frame.render_widget(list, area);
}

fn draw_log(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .recent_log(LOG_LINES)
        .into_iter()
        .map(|line| {
            let style = if line.starts_with("ERROR") {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(line, style))
        })
        .collect();

    let log = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(log, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let (footer_text, color) = match &app.last_error {
        Some(err) => (err.to_string(), Color::Red),
        None => (
            "type to press keys | Ctrl+Z: undo | Ctrl+Y: redo | F1: help | Esc: save and quit".to_string(),
            Color::Yellow,
        ),
    };

    let footer = Paragraph::new(footer_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(color));

    frame.render_widget(footer, area);
}

fn draw_help_window(frame: &mut Frame) {
    let help_text = vec![
        "Keybind - Keyboard Commands",
        "",
        "KEYS:",
        "  any character     Type it (bound on first use)",
        "  Ctrl+<key>        Press ctrl+<key> (e.g. ctrl+p)",
        "  Alt+<key>         Press alt+<key>",
        "  F2..F12           Press f2..f12",
        "",
        "HISTORY:",
        "  Ctrl+Z            Undo last command",
        "  Ctrl+Y            Redo last undone command",
        "",
        "OTHER:",
        "  F1                Show this help (press F1 or Esc to close)",
        "  Esc / Ctrl+C      Save state and quit",
        "",
        "Unbound multi-key presses are reported in the log and change nothing.",
    ];

    let help_paragraph = Paragraph::new(help_text.join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help - Keyboard Commands ")
                .style(Style::default().fg(Color::Yellow))
        )
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    let area = centered_rect(80, 70, frame.size());

    frame.render_widget(Clear, area);
    frame.render_widget(help_paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
