//! Line rendering for reconlog
//!
//! This crate turns parsed records into one colorized display line each.

mod renderer;
mod theme;

pub use renderer::Renderer;
pub use theme::Theme;
