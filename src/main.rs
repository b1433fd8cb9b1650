use glam::{vec2, Vec2};
use scribble::{
    game::{session, PanGesture, Session},
    graphics::{
        text::{AxisAlign, StyledText, TextAlignment, TextSystem},
        Color, FrameEncoder, GraphicsDevice, PanelRenderer, StrokePoint, StrokeRenderer,
    },
    overlay::OverlayPlayer,
    ui::{self, Button, ScreenLayout},
    winit::{
        event::{ElementState, MouseButton, Touch, TouchPhase, WindowEvent},
        event_loop::EventLoopWindowTarget,
    },
    GameApp, WindowDimensions,
};

const SCREEN_BACKGROUND: Color = Color::white();
const CANVAS_BACKGROUND: Color = Color::new(0x02, 0x02, 0x02, 0xff);
const CANVAS_BORDER_COLOR: Color = Color::new(0xcc, 0xcc, 0xcc, 0xff);
const BUTTON_COLOR: Color = Color::new(0x21, 0x96, 0xf3, 0xff);
const TEXT_COLOR: Color = Color::black();
const OVERLAY_ART_COLOR: Color = Color::new(0xef, 0x47, 0x6f, 0xff);

struct ScribbleGame {
    session: Session,
    gesture: PanGesture,
    overlay: OverlayPlayer,
    layout: ScreenLayout,

    stroke_renderer: StrokeRenderer,
    panel_renderer: PanelRenderer,
    text_system: TextSystem,

    // Mouse state; `MouseInput` events don't carry a position.
    cursor: Vec2,
    mouse_drawing: bool,
}

impl ScribbleGame {
    fn button(&self) -> Button {
        let label = if self.session.overlay_visible() { "Clear" } else { "Start Game" };

        Button { rect: self.layout.button, label }
    }

    fn pointer_down(&mut self, at: Vec2) -> bool {
        if self.button().hit(at) {
            self.press_button();
            return false;
        }

        self.gesture.begin(&mut self.session, at);
        self.gesture.panning()
    }

    fn press_button(&mut self) {
        if self.session.overlay_visible() {
            self.session.clear();
            self.overlay.hide();
        } else {
            self.session.start_game();
            if let Some(prompt) = self.session.prompt() {
                self.overlay.show(prompt);
            }
        }
    }

    fn handle_touch(&mut self, touch: &Touch) {
        let at = vec2(touch.location.x as f32, touch.location.y as f32);

        match touch.phase {
            TouchPhase::Started => {
                self.pointer_down(at);
            },
            TouchPhase::Moved => self.gesture.update(&mut self.session, at),
            TouchPhase::Ended | TouchPhase::Cancelled => self.gesture.finish(),
        }
    }
}

impl GameApp for ScribbleGame {
    fn window_title() -> &'static str {
        "Scribble"
    }

    fn window_dimensions() -> WindowDimensions {
        // Portrait, roughly a phone screen.
        WindowDimensions::Windowed(390, 700)
    }

    fn init(graphics_device: &mut GraphicsDevice) -> Self {
        let (width, height) = graphics_device.surface_dimensions();
        let layout = ScreenLayout::compute(width, height);

        Self {
            session: Session::new(),
            gesture: PanGesture::new(layout.canvas),
            overlay: OverlayPlayer::new(),
            layout,
            stroke_renderer: StrokeRenderer::new(graphics_device),
            panel_renderer: PanelRenderer::new(graphics_device),
            text_system: TextSystem::new(graphics_device),
            cursor: Vec2::ZERO,
            mouse_drawing: false,
        }
    }

    fn resize(&mut self, _graphics_device: &mut GraphicsDevice, width: u32, height: u32) {
        self.layout = ScreenLayout::compute(width, height);
        self.gesture.set_bounds(self.layout.canvas);
        self.text_system.resize(width, height);
    }

    fn handle_window_event(&mut self, event: &WindowEvent, event_loop: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = vec2(position.x as f32, position.y as f32);
                if self.mouse_drawing {
                    self.gesture.update(&mut self.session, self.cursor);
                }
            },
            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => match state {
                ElementState::Pressed => {
                    self.mouse_drawing = self.pointer_down(self.cursor);
                },
                ElementState::Released => {
                    self.mouse_drawing = false;
                    self.gesture.finish();
                },
            },
            WindowEvent::Touch(touch) => self.handle_touch(touch),
            _ => (),
        }
    }

    fn tick(&mut self, dt: f32) {
        self.overlay.tick(dt);
    }

    fn render(&mut self, frame_encoder: &mut FrameEncoder) {
        frame_encoder.clear_screen(SCREEN_BACKGROUND);

        let mut panels = self.panel_renderer.begin();
        panels.draw_panel(self.layout.canvas, CANVAS_BACKGROUND);
        panels.draw_border(self.layout.canvas, ui::CANVAS_BORDER, CANVAS_BORDER_COLOR);
        panels.draw_panel(self.layout.button, BUTTON_COLOR);
        panels.end(frame_encoder);

        // User strokes never paint outside the canvas rect.
        let mut strokes = self.stroke_renderer.begin();
        for stroke in self.session.strokes() {
            let points: Vec<StrokePoint> = stroke
                .points()
                .iter()
                .map(|&p| StrokePoint::new(p, session::STROKE_WIDTH, stroke.color()))
                .collect();
            strokes.draw_round_line_strip(&points);
        }
        let canvas = self.layout.canvas;
        strokes.end(
            frame_encoder,
            Some((
                canvas.min.x.max(0.0) as u32,
                canvas.min.y.max(0.0) as u32,
                canvas.width() as u32,
                canvas.height() as u32,
            )),
        );

        if self.session.overlay_visible() {
            let mut art = self.stroke_renderer.begin();
            for shape in self.overlay.sample(self.layout.overlay) {
                let points: Vec<StrokePoint> = shape
                    .points
                    .iter()
                    .map(|&p| StrokePoint::new(p, shape.width, OVERLAY_ART_COLOR))
                    .collect();
                art.draw_round_line_strip(&points);
            }
            art.end(frame_encoder, None);
        }

        let button = self.button();
        let prompt_line = match self.session.prompt() {
            Some(prompt) => format!("Draw: {prompt}"),
            None => "Press Start to get a prompt!".to_string(),
        };

        let mut text = self.text_system.begin();
        text.draw(
            TextAlignment {
                x: AxisAlign::CenteredAt(self.layout.title_baseline.x),
                y: AxisAlign::Start(self.layout.title_baseline.y),
            },
            &StyledText::new("Pictionary Game", ui::TITLE_SIZE, TEXT_COLOR),
        );
        text.draw(
            TextAlignment {
                x: AxisAlign::CenteredAt(self.layout.prompt_baseline.x),
                y: AxisAlign::Start(self.layout.prompt_baseline.y),
            },
            &StyledText::new(&prompt_line, ui::PROMPT_SIZE, TEXT_COLOR),
        );
        text.draw(
            TextAlignment {
                x: AxisAlign::CenteredAt(button.rect.center().x),
                y: AxisAlign::CenteredAt(button.rect.center().y),
            },
            &StyledText::new(button.label, ui::BUTTON_LABEL_SIZE, Color::white()),
        );
        text.end(frame_encoder);
    }
}

fn main() -> Result<(), scribble::Error> {
    tracing_subscriber::fmt::init();

    scribble::run_game_app::<ScribbleGame>()
}
