use ratatui::prelude::*;
use ratatui::widgets::*;

use hexcade::Session;

use crate::app::{App, Tab};

const ACTIVE: Color = Color::Rgb(255, 220, 80);
const IDLE: Color = Color::Rgb(120, 120, 140);

/// Marker for the tab that owns the session.
fn state_marker(session: &Session) -> &'static str {
    if session.is_over() {
        "■"
    } else if session.is_paused() {
        "⏸"
    } else if session.is_running() {
        "▶"
    } else {
        "·"
    }
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            if *t != app.current_tab {
                return Line::from(Span::styled(t.title(), Style::default().fg(IDLE)));
            }
            let style = Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD);
            match t {
                Tab::Home => Line::from(Span::styled(t.title(), style)),
                Tab::Game(_) => Line::from(vec![
                    Span::styled(state_marker(&app.session), Style::default().fg(Color::Rgb(80, 200, 255))),
                    Span::styled(t.title(), style),
                ]),
            }
        })
        .collect();

    let score = match app.current_tab {
        Tab::Home => String::new(),
        Tab::Game(_) => format!(" Score {} ", app.session.score()),
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
                .border_type(BorderType::Rounded)
                .title(" 🕹 Hexcade ")
                .title_style(
                    Style::default()
                        .fg(Color::Rgb(200, 120, 255))
                        .add_modifier(Modifier::BOLD),
                )
                .title_top(Line::from(Span::styled(score, Style::default().fg(ACTIVE))).right_aligned()),
        )
        .select(app.current_tab.index())
        .highlight_style(Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD))
        .divider(Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}
