// src/chart/mod.rs

pub mod canvas;
pub mod font;
pub mod render;
pub mod summary;

pub use render::{RenderOutcome, Renderer, draw_chart};
pub use summary::{TrendSummary, tick_indices};
