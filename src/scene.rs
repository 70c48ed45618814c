//! Read-only draw list handed from an engine to a renderer
//!
//! Coordinates are in the engine's own court units, y pointing down.

use glam::Vec2;

use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const RED: Rgb = Rgb(255, 0, 0);
    pub const GREEN: Rgb = Rgb(0, 255, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const YELLOW: Rgb = Rgb(255, 255, 0);
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);

    /// `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Rgb {
        Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, color: Rgb },
    Circle { center: Vec2, radius: f32, color: Rgb },
    Text { pos: Vec2, text: String, color: Rgb },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
    pub shapes: Vec<Shape>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: Rgb::BLACK,
            shapes: Vec::new(),
        }
    }

    pub fn rect(&mut self, rect: Rect, color: Rgb) {
        self.shapes.push(Shape::Rect { rect, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.shapes.push(Shape::Circle { center, radius, color });
    }

    pub fn text(&mut self, pos: Vec2, text: impl Into<String>, color: Rgb) {
        self.shapes.push(Shape::Text {
            pos,
            text: text.into(),
            color,
        });
    }

    pub fn rect_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { .. }))
            .count()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(Rgb::hex(0x00f0f0), Rgb(0, 240, 240));
        assert_eq!(Rgb::hex(0xffb852), Rgb(255, 184, 82));
    }

    #[test]
    fn test_scene_builders() {
        let mut scene = Scene::new(100.0, 50.0);
        scene.rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgb::WHITE);
        scene.circle(Vec2::new(5.0, 5.0), 2.0, Rgb::RED);
        scene.text(Vec2::ZERO, "Lives: 3", Rgb::WHITE);
        assert_eq!(scene.rect_count(), 1);
        assert_eq!(scene.texts().collect::<Vec<_>>(), vec!["Lives: 3"]);
    }
}
