//! Full-screen terminal dashboard.
//!
//! Draws the host table with ratatui on the alternate screen and reads
//! single keystrokes without blocking the render loop.

mod app;
mod event;
mod input;
mod render;
mod style;

pub use app::FullScreenRenderer;
pub use input::{KeyAction, handle_key};
