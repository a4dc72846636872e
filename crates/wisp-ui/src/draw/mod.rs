//! Renderer-agnostic draw-data model.
//!
//! A host GUI finalizes one [`DrawData`] per frame: command lists of packed
//! vertices, 16-bit indices, and draw commands carrying clip rects, texture
//! ids, and optional user callbacks. The frame translator consumes it
//! read-only.

mod data;
mod textures;
mod vertex;

pub use data::{DrawCallback, DrawCallbackFn, DrawCommand, DrawData, DrawList};
pub use textures::{TexturePair, TextureRegistry, UiTextureId};
pub use vertex::{UiIndex, UiVertex};
