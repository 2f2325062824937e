//! Pointer input consumed by the orbit camera control.

/// Platform-agnostic input events.
pub mod event;

pub use event::{InputEvent, MouseButton};
