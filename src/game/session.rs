use crate::game::prompt;
use crate::graphics::Color;
use glam::Vec2;

/// Color every stroke is drawn with.
pub const STROKE_COLOR: Color = Color::new(0x06, 0xd6, 0xa0, 0xff);

/// Stroke width in pixels.
pub const STROKE_WIDTH: f32 = 5.0;

/// One continuous freehand line. A stroke only grows while it is the active
/// stroke; once the next stroke starts (or the canvas is cleared) it is
/// immutable. There is no explicit "close" operation.
#[derive(Debug, Clone)]
pub struct Stroke {
    points: Vec<Vec2>,
    color: Color,
}

impl Stroke {
    fn new(start: Vec2, color: Color) -> Self {
        Self { points: vec![start], color }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Holder of all round state: the current prompt, whether the overlay
/// animation is shown, and the strokes drawn so far. Stroke accumulation is
/// orthogonal to the prompt/overlay transition; only `start_game` and
/// `clear` reset it.
#[derive(Debug, Default)]
pub struct Session {
    prompt: Option<&'static str>,
    overlay_visible: bool,
    strokes: Vec<Stroke>,
    // Recorded when a stroke starts rather than recomputed from
    // `strokes.len() - 1` on every update, so points can never be
    // misattributed to a stroke that was started later.
    active_stroke: Option<usize>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a round: picks a random prompt, shows the overlay, and wipes
    /// the canvas.
    pub fn start_game(&mut self) {
        let prompt = prompt::random_prompt();
        tracing::info!(prompt, "starting round");

        self.prompt = Some(prompt);
        self.overlay_visible = true;
        self.strokes.clear();
        self.active_stroke = None;
    }

    /// Resets everything back to the idle state. Idempotent.
    pub fn clear(&mut self) {
        self.prompt = None;
        self.overlay_visible = false;
        self.strokes.clear();
        self.active_stroke = None;
    }

    /// Begins a new stroke at `start` and makes it the active stroke. Any
    /// previously active stroke is implicitly closed.
    pub fn begin_stroke(&mut self, start: Vec2) {
        self.strokes.push(Stroke::new(start, STROKE_COLOR));
        self.active_stroke = Some(self.strokes.len() - 1);
    }

    /// Appends a point to the active stroke. A no-op when no stroke is
    /// active.
    pub fn extend_stroke(&mut self, point: Vec2) {
        if let Some(index) = self.active_stroke {
            self.strokes[index].points.push(point);
        }
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.prompt
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn active_stroke(&self) -> Option<&Stroke> {
        self.active_stroke.map(|index| &self.strokes[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::prompt::PROMPTS;
    use glam::vec2;

    #[test]
    fn new_session_is_idle() {
        let session = Session::new();

        assert_eq!(session.prompt(), None);
        assert!(!session.overlay_visible());
        assert!(session.strokes().is_empty());
        assert!(session.active_stroke().is_none());
    }

    #[test]
    fn start_game_picks_a_prompt_and_shows_the_overlay() {
        let mut session = Session::new();
        session.begin_stroke(vec2(1.0, 1.0));

        session.start_game();

        assert!(PROMPTS.contains(&session.prompt().unwrap()));
        assert!(session.overlay_visible());
        assert!(session.strokes().is_empty());
        assert!(session.active_stroke().is_none());
    }

    #[test]
    fn clear_resets_all_state() {
        let mut session = Session::new();
        session.start_game();
        session.begin_stroke(vec2(1.0, 1.0));
        session.extend_stroke(vec2(5.0, 5.0));

        session.clear();

        assert_eq!(session.prompt(), None);
        assert!(!session.overlay_visible());
        assert!(session.strokes().is_empty());
        assert!(session.active_stroke().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut session = Session::new();
        session.start_game();
        session.begin_stroke(vec2(1.0, 1.0));

        session.clear();
        session.clear();

        assert_eq!(session.prompt(), None);
        assert!(!session.overlay_visible());
        assert!(session.strokes().is_empty());
    }

    #[test]
    fn begin_stroke_records_exactly_one_point() {
        let mut session = Session::new();

        session.begin_stroke(vec2(10.0, 10.0));

        assert_eq!(session.strokes().len(), 1);
        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0)]);
        assert_eq!(session.strokes()[0].color(), STROKE_COLOR);
    }

    #[test]
    fn extend_stroke_appends_to_the_active_stroke() {
        let mut session = Session::new();
        session.begin_stroke(vec2(10.0, 10.0));

        session.extend_stroke(vec2(15.0, 10.0));

        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0), vec2(15.0, 10.0)]);
    }

    #[test]
    fn extend_stroke_without_an_active_stroke_is_a_no_op() {
        let mut session = Session::new();

        session.extend_stroke(vec2(1.0, 2.0));

        assert!(session.strokes().is_empty());
    }

    #[test]
    fn a_new_stroke_freezes_the_previous_one() {
        let mut session = Session::new();
        session.begin_stroke(vec2(0.0, 0.0));
        session.extend_stroke(vec2(1.0, 0.0));

        session.begin_stroke(vec2(50.0, 50.0));
        session.extend_stroke(vec2(51.0, 50.0));

        assert_eq!(session.strokes().len(), 2);
        assert_eq!(session.strokes()[0].points().len(), 2);
        assert_eq!(session.strokes()[1].points(), &[vec2(50.0, 50.0), vec2(51.0, 50.0)]);
    }

    #[test]
    fn start_game_then_draw_then_clear_round_trip() {
        let mut session = Session::new();

        session.start_game();
        assert!(PROMPTS.contains(&session.prompt().unwrap()));
        assert!(session.strokes().is_empty());
        assert!(session.overlay_visible());

        session.begin_stroke(vec2(10.0, 10.0));
        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0)]);

        session.extend_stroke(vec2(15.0, 10.0));
        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0), vec2(15.0, 10.0)]);

        session.clear();
        assert_eq!(session.prompt(), None);
        assert!(session.strokes().is_empty());
        assert!(!session.overlay_visible());
    }
}
