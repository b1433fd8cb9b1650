//! The game's state: the drawing session, the pan-gesture-to-stroke
//! translator, and the prompt list. Everything here is plain data mutated
//! synchronously on the event thread; nothing touches the GPU.

pub mod gesture;
pub mod prompt;
pub mod session;

pub use gesture::PanGesture;
pub use prompt::{random_prompt, PROMPTS};
pub use session::{Session, Stroke};
