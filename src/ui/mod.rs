//! Terminal UI components
//!
//! Built with ratatui. Keyboard-only: Esc goes back, r reloads.

pub mod detail;
pub mod theme;

pub use theme::Theme;
