//! The single screen's layout: title, prompt line, drawing canvas, overlay
//! box, and one action button, stacked top to bottom and recomputed on
//! resize.

use glam::{vec2, Vec2};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { min: vec2(x, y), max: vec2(x + width, y + height) }
    }

    pub fn from_corners(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self { min: vec2(min_x, min_y), max: vec2(max_x, max_y) }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// The one button on screen. Its label and action flip between
/// "Start Game" and "Clear" depending on whether a round is in progress.
#[derive(Debug, Copy, Clone)]
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    pub fn hit(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }
}

pub const TITLE_SIZE: f32 = 32.0;
pub const PROMPT_SIZE: f32 = 24.0;
pub const BUTTON_LABEL_SIZE: f32 = 22.0;
pub const CANVAS_BORDER: f32 = 2.0;

const MARGIN: f32 = 20.0;
const TITLE_BAND: f32 = 48.0;
const PROMPT_BAND: f32 = 36.0;
const OVERLAY_SIZE: f32 = 100.0;
const BUTTON_HEIGHT: f32 = 44.0;
const BUTTON_WIDTH: f32 = 160.0;

/// Pixel rectangles for everything on the screen, derived purely from the
/// window size.
#[derive(Debug, Copy, Clone)]
pub struct ScreenLayout {
    pub title_baseline: Vec2,
    pub prompt_baseline: Vec2,
    pub overlay: Rect,
    pub canvas: Rect,
    pub button: Rect,
}

impl ScreenLayout {
    pub fn compute(width: u32, height: u32) -> Self {
        let width = width as f32;
        let height = height as f32;

        let title_baseline = vec2(width / 2.0, MARGIN);
        let overlay_top = MARGIN + TITLE_BAND;
        let overlay = Rect::new((width - OVERLAY_SIZE) / 2.0, overlay_top, OVERLAY_SIZE, OVERLAY_SIZE);
        let prompt_top = overlay_top + OVERLAY_SIZE + 8.0;
        let prompt_baseline = vec2(width / 2.0, prompt_top);

        let canvas_top = prompt_top + PROMPT_BAND;
        let canvas_bottom = (height - MARGIN - BUTTON_HEIGHT - MARGIN).max(canvas_top + 1.0);
        let canvas = Rect::from_corners(
            MARGIN,
            canvas_top,
            (width - MARGIN).max(MARGIN + 1.0),
            canvas_bottom,
        );

        let button = Rect::new(
            (width - BUTTON_WIDTH) / 2.0,
            canvas_bottom + MARGIN,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        );

        Self { title_baseline, prompt_baseline, overlay, canvas, button }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_its_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        assert!(rect.contains(vec2(10.0, 10.0)));
        assert!(rect.contains(vec2(30.0, 30.0)));
        assert!(rect.contains(vec2(20.0, 20.0)));
        assert!(!rect.contains(vec2(9.9, 10.0)));
        assert!(!rect.contains(vec2(30.1, 30.0)));
    }

    #[test]
    fn rect_dimensions() {
        let rect = Rect::new(5.0, 10.0, 30.0, 40.0);

        assert_eq!(rect.width(), 30.0);
        assert_eq!(rect.height(), 40.0);
        assert_eq!(rect.center(), vec2(20.0, 30.0));
    }

    #[test]
    fn layout_keeps_canvas_and_button_inside_the_window() {
        let window = Rect::new(0.0, 0.0, 390.0, 700.0);
        let layout = ScreenLayout::compute(390, 700);

        for rect in [layout.canvas, layout.button, layout.overlay] {
            assert!(window.contains(rect.min), "{rect:?} escapes the window");
            assert!(window.contains(rect.max), "{rect:?} escapes the window");
        }
    }

    #[test]
    fn layout_canvas_and_button_do_not_overlap() {
        let layout = ScreenLayout::compute(390, 700);

        assert!(!layout.canvas.intersects(&layout.button));
    }

    #[test]
    fn layout_survives_tiny_windows() {
        // Degenerate sizes must not produce inverted rects.
        let layout = ScreenLayout::compute(50, 50);

        assert!(layout.canvas.width() > 0.0);
        assert!(layout.canvas.height() > 0.0);
    }

    #[test]
    fn button_hit_test() {
        let layout = ScreenLayout::compute(390, 700);
        let button = Button { rect: layout.button, label: "Start Game" };

        assert!(button.hit(layout.button.center()));
        assert!(!button.hit(layout.canvas.center()));
    }
}
