use crate::game::Session;
use crate::ui::Rect;
use glam::Vec2;

/// Pointer movement below this distance (in pixels) from the last recorded
/// point is dropped, so a resting finger doesn't pile up zero-length
/// segments.
pub const MIN_POINT_DISTANCE: f32 = 1.0;

/// Translates a three-phase pan gesture (begin / update / finish) into
/// stroke mutations on a [`Session`].
///
/// A pan only begins inside the canvas bounds, but once started it keeps
/// recording even if the pointer leaves them; the renderer clips instead.
/// There is nothing to do on finish besides forgetting the pan: the stroke
/// is left exactly as accumulated.
#[derive(Debug)]
pub struct PanGesture {
    bounds: Rect,
    last_point: Option<Vec2>,
}

impl PanGesture {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds, last_point: None }
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Whether a pan is currently in progress.
    pub fn panning(&self) -> bool {
        self.last_point.is_some()
    }

    pub fn begin(&mut self, session: &mut Session, at: Vec2) {
        if !self.bounds.contains(at) {
            return;
        }

        tracing::debug!(x = at.x, y = at.y, "stroke started");
        session.begin_stroke(at);
        self.last_point = Some(at);
    }

    pub fn update(&mut self, session: &mut Session, to: Vec2) {
        let Some(last) = self.last_point else {
            return;
        };

        if last.distance(to) < MIN_POINT_DISTANCE {
            return;
        }

        session.extend_stroke(to);
        self.last_point = Some(to);
    }

    pub fn finish(&mut self) {
        self.last_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn canvas() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn begin_inside_bounds_starts_a_one_point_stroke() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());

        gesture.begin(&mut session, vec2(10.0, 10.0));

        assert!(gesture.panning());
        assert_eq!(session.strokes().len(), 1);
        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0)]);
    }

    #[test]
    fn begin_outside_bounds_is_a_no_op() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());

        gesture.begin(&mut session, vec2(150.0, 10.0));

        assert!(!gesture.panning());
        assert!(session.strokes().is_empty());
    }

    #[test]
    fn update_past_the_threshold_appends_a_point() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());
        gesture.begin(&mut session, vec2(10.0, 10.0));

        gesture.update(&mut session, vec2(15.0, 10.0));

        assert_eq!(session.strokes()[0].points(), &[vec2(10.0, 10.0), vec2(15.0, 10.0)]);
    }

    #[test]
    fn update_below_the_threshold_is_dropped() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());
        gesture.begin(&mut session, vec2(10.0, 10.0));

        gesture.update(&mut session, vec2(10.5, 10.0));

        assert_eq!(session.strokes()[0].points().len(), 1);
    }

    #[test]
    fn threshold_measures_from_the_last_recorded_point() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());
        gesture.begin(&mut session, vec2(10.0, 10.0));

        // Two sub-threshold nudges never add up to a recorded point.
        gesture.update(&mut session, vec2(10.6, 10.0));
        gesture.update(&mut session, vec2(10.9, 10.0));

        assert_eq!(session.strokes()[0].points().len(), 1);

        gesture.update(&mut session, vec2(12.0, 10.0));

        assert_eq!(session.strokes()[0].points().len(), 2);
    }

    #[test]
    fn update_without_begin_is_a_no_op() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());

        gesture.update(&mut session, vec2(10.0, 10.0));

        assert!(session.strokes().is_empty());
    }

    #[test]
    fn update_after_finish_is_a_no_op() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());
        gesture.begin(&mut session, vec2(10.0, 10.0));
        gesture.finish();

        gesture.update(&mut session, vec2(50.0, 50.0));

        assert_eq!(session.strokes()[0].points().len(), 1);
    }

    #[test]
    fn update_may_leave_the_canvas_bounds() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());
        gesture.begin(&mut session, vec2(99.0, 50.0));

        gesture.update(&mut session, vec2(120.0, 50.0));

        assert_eq!(session.strokes()[0].points().len(), 2);
    }

    #[test]
    fn each_pan_gets_its_own_stroke() {
        let mut session = Session::new();
        let mut gesture = PanGesture::new(canvas());

        gesture.begin(&mut session, vec2(10.0, 10.0));
        gesture.update(&mut session, vec2(20.0, 10.0));
        gesture.finish();

        gesture.begin(&mut session, vec2(50.0, 50.0));
        gesture.update(&mut session, vec2(60.0, 50.0));

        assert_eq!(session.strokes().len(), 2);
        assert_eq!(session.strokes()[0].points().len(), 2);
        assert_eq!(session.strokes()[1].points().len(), 2);
    }
}
