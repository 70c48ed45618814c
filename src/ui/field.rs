use ratatui::prelude::*;

use hexcade::{Rgb, Scene, Shape};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Character grid for `scene`, scaled to fit `width` x `height` with its
/// aspect ratio kept. Returns the grid and its size.
pub fn render_field(scene: &Scene, width: usize, height: usize) -> (Vec<Line<'static>>, usize, usize) {
    if scene.width <= 0.0 || scene.height <= 0.0 || width == 0 || height == 0 {
        return (Vec::new(), 0, 0);
    }

    // Scale factors
    let scale = (width as f32 / (scene.width * CELL_ASPECT)).min(height as f32 / scene.height);
    let sx = scale * CELL_ASPECT;
    let sy = scale;
    let w = ((scene.width * sx) as usize).clamp(1, width);
    let h = ((scene.height * sy) as usize).clamp(1, height);

    let bg = color(scene.background);
    let mut grid: Vec<Vec<(char, Style)>> = vec![vec![(' ', Style::default().bg(bg)); w]; h];

    // Column/row span of a world interval, at least one cell wide
    let span = |start: f32, len: f32, s: f32, max: usize| -> (usize, usize) {
        let a = (start * s).floor().max(0.0) as usize;
        let b = ((start + len) * s).ceil().max(0.0) as usize;
        (a.min(max), b.max(a + 1).min(max))
    };

    for shape in &scene.shapes {
        match shape {
            Shape::Rect { rect, color: c } => {
                let (x0, x1) = span(rect.x, rect.w, sx, w);
                let (y0, y1) = span(rect.y, rect.h, sy, h);
                for row in &mut grid[y0..y1] {
                    for cell in &mut row[x0..x1] {
                        *cell = ('█', Style::default().fg(color(*c)).bg(bg));
                    }
                }
            }
            Shape::Circle { center, radius, color: c } => {
                let (x0, x1) = span(center.x - radius, radius * 2.0, sx, w);
                let (y0, y1) = span(center.y - radius, radius * 2.0, sy, h);
                let ch = if radius * sy >= 1.0 { '█' } else { '•' };
                for y in y0..y1 {
                    for x in x0..x1 {
                        // Cell center back in world units
                        let dx = (x as f32 + 0.5) / sx - center.x;
                        let dy = (y as f32 + 0.5) / sy - center.y;
                        if dx * dx + dy * dy <= radius * radius {
                            grid[y][x] = (ch, Style::default().fg(color(*c)).bg(bg));
                        }
                    }
                }
                // Small dots still show up
                let cx = (center.x * sx) as usize;
                let cy = (center.y * sy) as usize;
                if cx < w && cy < h && grid[cy][cx].0 == ' ' {
                    grid[cy][cx] = (ch, Style::default().fg(color(*c)).bg(bg));
                }
            }
            Shape::Text { pos, text, color: c } => {
                let x0 = (pos.x * sx) as usize;
                let y = (pos.y * sy) as usize;
                if y >= h {
                    continue;
                }
                for (i, ch) in text.chars().enumerate() {
                    let x = x0 + i;
                    if x >= w {
                        break;
                    }
                    grid[y][x] = (ch, Style::default().fg(color(*c)).bg(bg).add_modifier(Modifier::BOLD));
                }
            }
        }
    }

    let lines = grid
        .into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|(ch, style)| Span::styled(String::from(ch), style))
                .collect();
            Line::from(spans)
        })
        .collect();
    (lines, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use hexcade::geometry::Rect as WorldRect;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_grid_keeps_aspect() {
        let scene = Scene::new(20.0, 20.0);
        let (lines, w, h) = render_field(&scene, 100, 40);
        assert_eq!((w, h), (80, 40));
        assert_eq!(lines.len(), 40);
    }

    #[test]
    fn test_rect_fills_its_cells() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.rect(WorldRect::new(0.0, 0.0, 1.0, 1.0), Rgb::RED);
        let (lines, _, _) = render_field(&scene, 20, 10);
        assert_eq!(&text_of(&lines[0])[..], "██                  ");
        assert!(text_of(&lines[1]).trim().is_empty());
    }

    #[test]
    fn test_tiny_circle_still_drawn() {
        let mut scene = Scene::new(800.0, 400.0);
        scene.circle(Vec2::new(400.0, 200.0), 2.0, Rgb::WHITE);
        let (lines, _, _) = render_field(&scene, 80, 20);
        assert!(lines.iter().any(|l| text_of(l).contains('•')));
    }

    #[test]
    fn test_text_clipped_to_width() {
        let mut scene = Scene::new(4.0, 2.0);
        scene.text(Vec2::new(3.0, 0.0), "Lives: 3", Rgb::WHITE);
        let (lines, w, _) = render_field(&scene, 8, 2);
        assert_eq!(text_of(&lines[0]).chars().count(), w);
        assert!(text_of(&lines[0]).ends_with("Li"));
    }
}
