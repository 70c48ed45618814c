use ratatui::prelude::*;
use ratatui::widgets::*;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║  ██╗  ██╗███████╗██╗  ██╗ ██████╗ █████╗ ██████╗ ███████╗     ║
 ║  ██║  ██║██╔════╝╚██╗██╔╝██╔════╝██╔══██╗██╔══██╗██╔════╝     ║
 ║  ███████║█████╗   ╚███╔╝ ██║     ███████║██║  ██║█████╗       ║
 ║  ██╔══██║██╔══╝   ██╔██╗ ██║     ██╔══██║██║  ██║██╔══╝       ║
 ║  ██║  ██║███████╗██╔╝ ██╗╚██████╗██║  ██║██████╔╝███████╗     ║
 ║  ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝     ║
 ╚═══════════════════════════════════════════════════════════════╝"#;

const KEY: Color = Color::Rgb(80, 200, 255);
const TEXT: Color = Color::Rgb(140, 140, 140);
const DIM: Color = Color::Rgb(100, 100, 120);
const HEADING: Color = Color::Rgb(255, 220, 80);

struct GameTile {
    key: &'static str,
    icon: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
    /// (keys, action)
    controls: &'static [(&'static str, &'static str)],
    /// Rules and scoring
    notes: &'static [&'static str],
}

const GAME_TILES: [GameTile; 6] = [
    GameTile {
        key: "1",
        icon: "🐍",
        name: "Snake",
        desc: "Eat, grow,\ndon't bite!",
        color: Color::Rgb(80, 220, 80),
        border_color: Color::Rgb(40, 120, 40),
        controls: &[("↑ ↓ ← →", "Change direction")],
        notes: &[
            "Eat the food to grow longer.",
            "Avoid hitting the walls or yourself.",
            "Each food eaten is worth 10 points.",
        ],
    },
    GameTile {
        key: "2",
        icon: "🧩",
        name: "Tetris",
        desc: "Stack pieces,\nclear lines!",
        color: Color::Rgb(0, 240, 240),
        border_color: Color::Rgb(0, 120, 120),
        controls: &[
            ("← / →", "Move piece"),
            ("↑", "Rotate piece"),
            ("↓", "Move down faster"),
            ("Space", "Drop instantly"),
        ],
        notes: &["Complete lines to score and clear space.", "100 points per line."],
    },
    GameTile {
        key: "3",
        icon: "🏓",
        name: "Pong",
        desc: "Two players,\none ball!",
        color: Color::Rgb(230, 230, 230),
        border_color: Color::Rgb(110, 110, 110),
        controls: &[("W / S", "Player 1 paddle"), ("↑ / ↓", "Player 2 paddle")],
        notes: &["First player to reach 5 points wins!"],
    },
    GameTile {
        key: "4",
        icon: "🧱",
        name: "Breakout",
        desc: "Smash bricks\nwith the ball!",
        color: Color::Rgb(220, 80, 80),
        border_color: Color::Rgb(120, 40, 40),
        controls: &[("← / →", "Move paddle")],
        notes: &[
            "Break all bricks to win.",
            "Don't let the ball fall below the paddle.",
            "Each brick is worth 10 points.",
        ],
    },
    GameTile {
        key: "5",
        icon: "👾",
        name: "Invaders",
        desc: "Defend Earth\nfrom aliens!",
        color: Color::Rgb(255, 80, 255),
        border_color: Color::Rgb(140, 40, 140),
        controls: &[("← / →", "Move ship"), ("Space", "Shoot")],
        notes: &[
            "Destroy all aliens to win.",
            "Avoid enemy bullets.",
            "Each alien is worth 100 points.",
        ],
    },
    GameTile {
        key: "6",
        icon: "🟡",
        name: "Pac-Man",
        desc: "Eat the dots,\ndodge ghosts!",
        color: Color::Rgb(255, 255, 0),
        border_color: Color::Rgb(140, 140, 0),
        controls: &[("↑ ↓ ← →", "Move Pac-Man")],
        notes: &[
            "Eat all dots to win. Avoid ghosts.",
            "Power dots make ghosts vulnerable.",
            "Dot 10, power dot 50, ghost 200.",
        ],
    },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { HEADING } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(HEADING).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];

    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(desc_line, Style::default().fg(desc_color))));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(HEADING).add_modifier(Modifier::BOLD),
        )));
    }

    let p = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(p, inner);
}

fn key_line(keys: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {keys:<17}"), Style::default().fg(KEY)),
        Span::styled(action.to_string(), Style::default().fg(TEXT)),
    ])
}

fn game_instructions(tile: &GameTile) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.name),
            Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(tile.controls.iter().map(|(keys, action)| key_line(keys, action)));
    lines.push(key_line("Enter", "Start"));
    lines.push(Line::from(""));
    lines.extend(
        tile.notes
            .iter()
            .map(|note| Line::from(Span::styled(format!("  {note}"), Style::default().fg(DIM)))),
    );
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, selected_game: usize) {
    let selected = selected_game.min(GAME_TILES.len() - 1);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(12), // Game tiles (2 rows)
            Constraint::Min(10),   // Controls area
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(KEY))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Six Classics, One Terminal ⚡  ",
        Style::default().fg(HEADING).add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" 🎮 Games · ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    // 2 rows of 3 tiles
    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);

    for (row, row_area) in tile_rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(*row_area);
        for (col, tile_area) in cols.iter().enumerate() {
            let i = row * 3 + col;
            render_game_tile(frame, *tile_area, &GAME_TILES[i], selected == i);
        }
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let navigation = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("  🔧 Navigation", Style::default().fg(HEADING).add_modifier(Modifier::BOLD))),
        key_line("Tab / Shift+Tab", "Switch tabs"),
        key_line("1-6", "Open game"),
        key_line("↑ ↓ ← →", "Select game"),
        key_line("Enter", "Open selected"),
        key_line("Esc", "Return to Home"),
        key_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  🎮 In game", Style::default().fg(HEADING).add_modifier(Modifier::BOLD))),
        key_line("Enter", "Start / play again"),
        key_line("P", "Pause / Resume"),
        key_line("R", "Restart game"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(navigation, ctrl_cols[0]);

    let tile = &GAME_TILES[selected];
    let instructions = Paragraph::new(game_instructions(tile))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
                .title(format!(" 🎮 {} Instructions ", tile.name))
                .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
        );
    frame.render_widget(instructions, ctrl_cols[1]);
}
