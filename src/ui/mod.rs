//! Terminal UI components.
//!
//! - [`wrap`]: soft wrapping and screen/document position mapping
//! - [`style`]: mark, selection and toolbar styling

pub mod style;
pub mod wrap;

mod overlays;
mod render;
mod status;
mod toolbar;

pub use render::{AppLayout, layout, render};
pub use toolbar::{toolbar_button_at, toolbar_segments};

/// Share of the screen height given to the plain-text preview.
pub const PREVIEW_HEIGHT_PERCENT: u16 = 30;
