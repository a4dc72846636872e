//! The render core: ring-slotted geometry storage, one-time pipeline/state
//! construction, and the per-frame draw-data → command-stream translator.

mod config;
mod context;
mod pipeline;
mod ring;
mod translate;

pub use config::{RenderConfig, SharedPipelineState};
pub use context::{CreateInfo, UiContext};
pub use ring::{GeometryRing, RingOffsets, UNIFORM_BLOCK_SIZE};
