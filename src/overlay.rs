//! The prompt's vector animation overlay. Each prompt name selects a
//! pre-authored line-art asset: a handful of polylines in a unit square,
//! plus one looping motion applied when sampling. Assets are contain-fit
//! and centered in the destination rect.

use crate::ui::Rect;
use glam::{vec2, Vec2};

/// Line width of overlay art, in unit-square units (scaled with the asset).
const ART_LINE_WIDTH: f32 = 0.035;

/// One polyline of an asset, in unit-square coordinates with (0, 0) at the
/// top left.
#[derive(Debug, Clone)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    pub width: f32,
}

/// The looping motion an asset plays. Phase runs 0..1 over one period.
#[derive(Debug, Copy, Clone)]
enum Motion {
    /// Uniform scale oscillating around 1 by `amount`.
    Pulse { amount: f32, period: f32 },
    /// Rotation around the center oscillating by `radians`.
    Sway { radians: f32, period: f32 },
    /// Continuous rotation around the center.
    Spin { period: f32 },
    /// Vertical offset oscillating by `amount` (unit-square units).
    Bob { amount: f32, period: f32 },
}

#[derive(Debug, Clone)]
pub struct AnimationAsset {
    name: &'static str,
    shapes: Vec<Polyline>,
    motion: Motion,
}

impl AnimationAsset {
    /// Looks up the bundled asset for a prompt name. Unknown names resolve
    /// to `None` and the overlay simply shows nothing.
    pub fn for_prompt(name: &'static str) -> Option<Self> {
        let (shapes, motion) = match name {
            "Cat" => (cat_shapes(), Motion::Sway { radians: 0.12, period: 2.0 }),
            "House" => (house_shapes(), Motion::Bob { amount: 0.03, period: 2.5 }),
            "Tree" => (tree_shapes(), Motion::Sway { radians: 0.08, period: 3.0 }),
            "Car" => (car_shapes(), Motion::Bob { amount: 0.02, period: 0.8 }),
            "Sun" => (sun_shapes(), Motion::Spin { period: 8.0 }),
            _ => return None,
        };

        Some(Self { name, shapes, motion })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Samples the asset at time `t` (seconds since the animation started),
    /// mapped into `dst` with contain fit and center alignment.
    pub fn sample(&self, t: f32, dst: Rect) -> Vec<Polyline> {
        let scale = dst.width().min(dst.height());
        let center = dst.center();

        let (rotation, extra_scale, offset) = match self.motion {
            Motion::Pulse { amount, period } => {
                (0.0, 1.0 + amount * phase_wave(t, period), Vec2::ZERO)
            },
            Motion::Sway { radians, period } => (radians * phase_wave(t, period), 1.0, Vec2::ZERO),
            Motion::Spin { period } => {
                (std::f32::consts::TAU * (t / period).fract(), 1.0, Vec2::ZERO)
            },
            Motion::Bob { amount, period } => {
                (0.0, 1.0, vec2(0.0, amount * phase_wave(t, period)))
            },
        };

        let (sin, cos) = rotation.sin_cos();

        self.shapes
            .iter()
            .map(|shape| {
                let points = shape
                    .points
                    .iter()
                    .map(|&p| {
                        // Unit square -> centered local space -> motion ->
                        // destination pixels.
                        let local = (p + offset - vec2(0.5, 0.5)) * extra_scale;
                        let rotated = vec2(
                            local.x * cos - local.y * sin,
                            local.x * sin + local.y * cos,
                        );
                        center + rotated * scale
                    })
                    .collect();

                Polyline { points, width: shape.width * scale }
            })
            .collect()
    }
}

/// A sine wave in [-1, 1] with the given period in seconds.
fn phase_wave(t: f32, period: f32) -> f32 {
    (std::f32::consts::TAU * (t / period).fract()).sin()
}

/// Plays the overlay animation for the current prompt. Shown and hidden by
/// the session transitions, advanced by the frame tick.
#[derive(Debug, Default)]
pub struct OverlayPlayer {
    asset: Option<AnimationAsset>,
    elapsed: f32,
}

impl OverlayPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, prompt: &'static str) {
        self.asset = AnimationAsset::for_prompt(prompt);
        self.elapsed = 0.0;

        match &self.asset {
            Some(asset) => tracing::debug!(name = asset.name(), "overlay animation selected"),
            None => tracing::warn!(prompt, "no overlay animation for prompt"),
        }
    }

    pub fn hide(&mut self) {
        self.asset = None;
        self.elapsed = 0.0;
    }

    pub fn visible(&self) -> bool {
        self.asset.is_some()
    }

    pub fn tick(&mut self, dt: f32) {
        if self.asset.is_some() {
            self.elapsed += dt;
        }
    }

    /// Current frame of the animation, fit into `dst`. Empty when hidden.
    pub fn sample(&self, dst: Rect) -> Vec<Polyline> {
        match &self.asset {
            Some(asset) => asset.sample(self.elapsed, dst),
            None => Vec::new(),
        }
    }
}

fn polyline(points: &[(f32, f32)]) -> Polyline {
    Polyline { points: points.iter().map(|&(x, y)| vec2(x, y)).collect(), width: ART_LINE_WIDTH }
}

fn circle(cx: f32, cy: f32, radius: f32, segments: usize) -> Polyline {
    let points = (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
            vec2(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();

    Polyline { points, width: ART_LINE_WIDTH }
}

fn cat_shapes() -> Vec<Polyline> {
    vec![
        // Head.
        circle(0.5, 0.55, 0.28, 24),
        // Ears.
        polyline(&[(0.28, 0.42), (0.30, 0.18), (0.48, 0.30)]),
        polyline(&[(0.72, 0.42), (0.70, 0.18), (0.52, 0.30)]),
        // Whiskers.
        polyline(&[(0.30, 0.60), (0.10, 0.55)]),
        polyline(&[(0.30, 0.66), (0.10, 0.68)]),
        polyline(&[(0.70, 0.60), (0.90, 0.55)]),
        polyline(&[(0.70, 0.66), (0.90, 0.68)]),
        // Eyes.
        polyline(&[(0.40, 0.50), (0.40, 0.56)]),
        polyline(&[(0.60, 0.50), (0.60, 0.56)]),
        // Nose and mouth.
        polyline(&[(0.47, 0.64), (0.53, 0.64), (0.50, 0.69), (0.47, 0.64)]),
    ]
}

fn house_shapes() -> Vec<Polyline> {
    vec![
        // Walls.
        polyline(&[(0.20, 0.45), (0.20, 0.85), (0.80, 0.85), (0.80, 0.45), (0.20, 0.45)]),
        // Roof.
        polyline(&[(0.15, 0.45), (0.50, 0.15), (0.85, 0.45)]),
        // Door.
        polyline(&[(0.44, 0.85), (0.44, 0.62), (0.56, 0.62), (0.56, 0.85)]),
        // Window.
        polyline(&[(0.26, 0.55), (0.38, 0.55), (0.38, 0.67), (0.26, 0.67), (0.26, 0.55)]),
    ]
}

fn tree_shapes() -> Vec<Polyline> {
    vec![
        // Trunk.
        polyline(&[(0.46, 0.90), (0.46, 0.55), (0.54, 0.55), (0.54, 0.90)]),
        // Crown, drawn as two stacked lobes.
        circle(0.5, 0.40, 0.24, 20),
        circle(0.5, 0.28, 0.16, 16),
    ]
}

fn car_shapes() -> Vec<Polyline> {
    vec![
        // Body and cabin.
        polyline(&[
            (0.10, 0.65),
            (0.10, 0.50),
            (0.30, 0.50),
            (0.38, 0.35),
            (0.66, 0.35),
            (0.74, 0.50),
            (0.90, 0.50),
            (0.90, 0.65),
            (0.10, 0.65),
        ]),
        // Wheels.
        circle(0.30, 0.68, 0.09, 16),
        circle(0.70, 0.68, 0.09, 16),
    ]
}

fn sun_shapes() -> Vec<Polyline> {
    let mut shapes = vec![circle(0.5, 0.5, 0.20, 24)];

    // Eight rays.
    for i in 0..8 {
        let angle = (i as f32 / 8.0) * std::f32::consts::TAU;
        let dir = vec2(angle.cos(), angle.sin());
        let inner = vec2(0.5, 0.5) + dir * 0.27;
        let outer = vec2(0.5, 0.5) + dir * 0.42;
        shapes.push(Polyline { points: vec![inner, outer], width: ART_LINE_WIDTH });
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PROMPTS;
    use approx::assert_relative_eq;

    #[test]
    fn every_prompt_has_an_asset() {
        for prompt in PROMPTS {
            let asset = AnimationAsset::for_prompt(prompt);
            assert!(asset.is_some(), "no asset for {prompt}");
            assert!(!asset.unwrap().shapes.is_empty());
        }
    }

    #[test]
    fn unknown_prompt_has_no_asset() {
        assert!(AnimationAsset::for_prompt("Spaceship").is_none());
    }

    #[test]
    fn sample_stays_near_the_destination_rect() {
        let dst = Rect::new(100.0, 200.0, 100.0, 100.0);

        for prompt in PROMPTS {
            let asset = AnimationAsset::for_prompt(prompt).unwrap();

            for shape in asset.sample(0.3, dst) {
                for point in shape.points {
                    // Motion can push art slightly past the contain box, but
                    // never anywhere near a different screen region.
                    assert!(point.x > dst.min.x - 20.0 && point.x < dst.max.x + 20.0);
                    assert!(point.y > dst.min.y - 20.0 && point.y < dst.max.y + 20.0);
                }
            }
        }
    }

    #[test]
    fn spin_loops_back_to_the_start_after_one_period() {
        let dst = Rect::new(0.0, 0.0, 100.0, 100.0);
        let sun = AnimationAsset::for_prompt("Sun").unwrap();

        let start = sun.sample(0.0, dst);
        let looped = sun.sample(8.0, dst);

        for (a, b) in start.iter().zip(looped.iter()) {
            for (pa, pb) in a.points.iter().zip(b.points.iter()) {
                assert_relative_eq!(pa.x, pb.x, epsilon = 1e-3);
                assert_relative_eq!(pa.y, pb.y, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn player_is_empty_until_shown() {
        let dst = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut player = OverlayPlayer::new();

        assert!(!player.visible());
        assert!(player.sample(dst).is_empty());

        player.show("Tree");
        assert!(player.visible());
        assert!(!player.sample(dst).is_empty());

        player.hide();
        assert!(!player.visible());
        assert!(player.sample(dst).is_empty());
    }

    #[test]
    fn player_shows_the_prompt_picked_by_the_session() {
        let dst = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut session = crate::game::Session::new();
        session.start_game();

        let mut player = OverlayPlayer::new();
        player.show(session.prompt().unwrap());

        assert!(player.visible());
        assert!(!player.sample(dst).is_empty());
    }

    #[test]
    fn player_ignores_ticks_while_hidden() {
        let mut player = OverlayPlayer::new();
        player.tick(1.0);

        player.show("Car");
        assert_eq!(player.elapsed, 0.0);

        player.tick(0.5);
        assert_eq!(player.elapsed, 0.5);
    }

    #[test]
    fn show_with_unknown_prompt_renders_nothing() {
        let dst = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut player = OverlayPlayer::new();

        player.show("Dinosaur");

        assert!(!player.visible());
        assert!(player.sample(dst).is_empty());
    }
}
