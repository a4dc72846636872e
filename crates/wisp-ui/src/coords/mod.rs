//! Small 2D value types shared by IO state, clip rects, and hit tests.

mod vec2;
mod rect;

pub use rect::Rect;
pub use vec2::Vec2;
