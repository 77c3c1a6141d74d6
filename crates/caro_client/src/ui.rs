//! Stateless UI rendering for the caro client.

use crate::app::App;
use caro_game::{Board, Cell, CellMark, Coord, GameMode, Phase, Symbol};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use strum::IntoEnumIterator;

const CELL_WIDTH: u16 = 3;

/// Renders the screen for the current phase.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(17),   // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Caro - Five in a Row")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match (app.session().phase(), app.session().board()) {
        (Phase::Menu, _) | (_, None) => draw_menu(frame, chunks[1]),
        (_, Some(board)) => draw_board(frame, chunks[1], board, app.cursor()),
    }

    draw_status(frame, chunks[2], app);
    draw_help(frame, chunks[3], app.session().phase());

    if let Some(text) = app.view().dialog() {
        draw_dialog(frame, area, text);
    }
}

fn draw_menu(frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from("Choose a game mode"), Line::from("")];
    lines.extend(
        GameMode::iter()
            .enumerate()
            .map(|(i, mode)| Line::from(format!("{}) {}", i + 1, mode.label()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from("q) Quit"));
    let menu = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Menu"));
    frame.render_widget(menu, center_rect(area, 30, 8));
}

fn draw_board(frame: &mut Frame, area: Rect, board: &Board, cursor: Coord) {
    let size = board.size() as u16;
    let board_area = center_rect(area, size * CELL_WIDTH + 2, size + 2);

    let lines: Vec<Line> = (0..board.size())
        .map(|row| {
            let spans: Vec<Span> = (0..board.size())
                .map(|col| cell_span(board, Coord::new(row, col), cursor))
                .collect();
            Line::from(spans)
        })
        .collect();

    let grid = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(grid, board_area);
}

fn cell_span(board: &Board, at: Coord, cursor: Coord) -> Span<'static> {
    let (text, base) = match board.get(at) {
        Some(Cell::Occupied(Symbol::X)) => (
            " X ",
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Some(Cell::Occupied(Symbol::O)) => (
            " O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        _ => (" · ", Style::default().fg(Color::DarkGray)),
    };

    let style = match board.cell_mark(at) {
        CellMark::Winning => base.bg(Color::Green),
        CellMark::LastMove => base.bg(Color::Yellow),
        CellMark::Plain => base,
    };
    let style = if at == cursor {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    };

    Span::styled(text, style)
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let mut parts = Vec::new();
    if !app.view().status().is_empty() {
        parts.push(app.view().status().clone());
    }
    if let Some(me) = session.local_identity() {
        parts.push(format!("You: {}", me));
    }
    if let Some(turn) = session.active_player() {
        let whose = if session.is_my_turn() { "your move" } else { "waiting" };
        parts.push(format!("Turn: {} ({})", turn, whose));
    }
    if !app.view().notice().is_empty() {
        parts.push(app.view().notice().clone());
    }

    let style = if session.connection().is_lost() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let status = Paragraph::new(parts.join(" | "))
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_help(frame: &mut Frame, area: Rect, phase: Phase) {
    let text = match phase {
        Phase::Menu => "1/2 select mode | q quit",
        _ => "arrows move | enter place | r new game | m menu | q quit",
    };
    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, area);
}

fn draw_dialog(frame: &mut Frame, area: Rect, text: &str) {
    let popup = center_rect(area, 36, 7);
    let lines = vec![
        Line::from(Span::styled(
            text.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("r) Play again"),
        Line::from("enter) Close"),
    ];
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Game over"));
    frame.render_widget(Clear, popup);
    frame.render_widget(dialog, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
