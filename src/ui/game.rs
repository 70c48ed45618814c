use ratatui::prelude::*;
use ratatui::widgets::*;

use hexcade::{GameKind, Outcome, Session, Side};

use super::field;

const BG: Color = Color::Rgb(15, 15, 25);

fn accent(kind: GameKind) -> Color {
    match kind {
        GameKind::Snake => Color::Rgb(80, 220, 80),
        GameKind::Tetris => Color::Rgb(0, 240, 240),
        GameKind::Pong => Color::Rgb(230, 230, 230),
        GameKind::Breakout => Color::Rgb(220, 80, 80),
        GameKind::SpaceInvaders => Color::Rgb(255, 80, 255),
        GameKind::Pacman => Color::Rgb(255, 255, 0),
    }
}

fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Won => "🏆 YOU WIN!",
        Outcome::Lost => "💀 GAME OVER",
        Outcome::Winner(Side::Left) => "🏆 PLAYER 1 WINS!",
        Outcome::Winner(Side::Right) => "🏆 PLAYER 2 WINS!",
    }
}

pub fn render_game(frame: &mut Frame, area: Rect, kind: GameKind, session: &Session, status: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent(kind)))
        .title(format!(" {kind} "))
        .title_style(Style::default().fg(accent(kind)).add_modifier(Modifier::BOLD));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    // Status bar
    let state = if session.is_over() {
        Span::styled("Over", Style::default().fg(Color::Red))
    } else if session.is_paused() {
        Span::styled("Paused", Style::default().fg(Color::Yellow))
    } else if session.is_running() {
        Span::styled("Running", Style::default().fg(Color::Green))
    } else {
        Span::styled("Ready", Style::default().fg(Color::Cyan))
    };
    let mut status_line = vec![
        Span::styled(
            format!(" Score: {} ", session.score()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
        state,
    ];
    if let Some(msg) = status {
        status_line.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        status_line.push(Span::styled(msg.to_string(), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(status_line)), chunks[0]);

    // Game field, centered
    let field_area = chunks[1];
    if let Some(scene) = session.scene() {
        let (lines, w, h) = field::render_field(&scene, field_area.width as usize, field_area.height as usize);
        let x = field_area.x + (field_area.width.saturating_sub(w as u16)) / 2;
        let y = field_area.y + (field_area.height.saturating_sub(h as u16)) / 2;
        frame.render_widget(Paragraph::new(lines), Rect::new(x, y, w as u16, h as u16));
    }

    // Help bar
    let help = if session.is_over() {
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" play again  ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" menu", Style::default().fg(Color::Gray)),
        ])
    } else if !session.is_started() {
        Line::from(vec![
            Span::styled(" Enter", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" start  ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" menu", Style::default().fg(Color::Gray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" P", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" pause  ", Style::default().fg(Color::Gray)),
            Span::styled("R", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" restart  ", Style::default().fg(Color::Gray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" menu", Style::default().fg(Color::Gray)),
        ])
    };
    frame.render_widget(Paragraph::new(help), chunks[2]);

    if let Some(outcome) = session.outcome() {
        render_game_over(frame, field_area, outcome, session.score());
    }
}

fn render_game_over(frame: &mut Frame, area: Rect, outcome: Outcome, score: u32) {
    let overlay_w = 32u16.min(area.width.saturating_sub(2));
    let overlay_h = 7u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    // Clear background
    frame.render_widget(Clear, overlay_area);

    let color = if outcome.is_win() { Color::Rgb(255, 220, 80) } else { Color::Rgb(255, 90, 90) };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(BG));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(outcome_text(outcome), Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("Final score: {score}"),
            Style::default().fg(Color::Rgb(255, 215, 0)),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).style(Style::default().bg(BG));
    frame.render_widget(p, inner);
}
