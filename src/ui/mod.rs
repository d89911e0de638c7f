//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`layout`]: Screen geometry and mouse hit-testing
//! - [`style`]: Theming and colors

pub mod layout;
pub mod style;

mod overlays;
mod render;
mod status;

pub use layout::{Hit, hit_test, max_scroll, screen_area, scroll_to_focus};
pub use render::render;
