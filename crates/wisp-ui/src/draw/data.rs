use std::fmt;
use std::rc::Rc;

use crate::coords::Vec2;

use super::textures::UiTextureId;
use super::vertex::{UiIndex, UiVertex};

/// User callback invoked mid-stream with the list it came from and an adjusted
/// copy of its command (offsets biased into the shared ring-slot buffers).
pub type DrawCallbackFn = Rc<dyn Fn(&DrawList, &DrawCommand)>;

/// Optional per-command callback.
#[derive(Clone)]
pub enum DrawCallback {
    /// Sentinel: external code already reset GPU state; the translator must
    /// re-bind pipeline and descriptors before the next draw. Not invoked.
    ResetRenderState,
    /// Host callback. Assumed to clobber bound state, so the translator
    /// re-binds after it regardless of what it did.
    Custom(DrawCallbackFn),
}

impl fmt::Debug for DrawCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCallback::ResetRenderState => f.write_str("ResetRenderState"),
            DrawCallback::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One draw command within a list.
///
/// `index_offset`/`vertex_offset` are list-local element offsets; the
/// translator biases them by the cumulative counts of prior lists.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Clip rectangle in logical pixels: `[x0, y0, x1, y1]`.
    pub clip_rect: [f32; 4],
    pub texture: UiTextureId,
    pub index_offset: u32,
    pub vertex_offset: u32,
    pub elem_count: u32,
    pub callback: Option<DrawCallback>,
}

impl DrawCommand {
    /// A plain textured draw covering `elem_count` indices.
    pub fn draw(texture: UiTextureId, elem_count: u32, clip_rect: [f32; 4]) -> Self {
        Self {
            clip_rect,
            texture,
            index_offset: 0,
            vertex_offset: 0,
            elem_count,
            callback: None,
        }
    }

    /// A callback command; carries no geometry of its own.
    pub fn callback(cb: DrawCallback) -> Self {
        Self {
            clip_rect: [0.0; 4],
            texture: UiTextureId(0),
            index_offset: 0,
            vertex_offset: 0,
            elem_count: 0,
            callback: Some(cb),
        }
    }
}

/// One command list: a vertex array, an index array, and the commands that
/// consume them in order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vertices: Vec<UiVertex>,
    pub indices: Vec<UiIndex>,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }
}

/// The GUI's finalized, immutable per-frame output.
#[derive(Debug, Clone, Default)]
pub struct DrawData {
    pub lists: Vec<DrawList>,
    /// Top-left of the logical display rectangle.
    pub display_pos: Vec2,
    /// Logical display extent; the projection maps
    /// `[display_pos, display_pos + display_size]` to clip space.
    pub display_size: Vec2,
    /// DPI multiplier from logical units to physical pixels.
    pub framebuffer_scale: Vec2,
}

impl DrawData {
    pub fn total_vertex_count(&self) -> usize {
        self.lists.iter().map(|l| l.vertices.len()).sum()
    }

    pub fn total_index_count(&self) -> usize {
        self.lists.iter().map(|l| l.indices.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_sum_across_lists() {
        let mut data = DrawData::default();
        let mut a = DrawList::new();
        a.vertices.resize(3, UiVertex::default());
        a.indices.extend([0, 1, 2]);
        let mut b = DrawList::new();
        b.vertices.resize(4, UiVertex::default());
        b.indices.extend([0, 1, 2, 2, 3, 0]);
        data.lists = vec![a, b];

        assert_eq!(data.total_vertex_count(), 7);
        assert_eq!(data.total_index_count(), 9);
    }
}
