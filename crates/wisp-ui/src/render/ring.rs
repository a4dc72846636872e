use crate::draw::UiVertex;

use super::RenderConfig;

/// Byte size of one uniform ring slot. Large enough for the 4×4 projection
/// matrix and aligned for uniform-offset requirements on every backend.
pub const UNIFORM_BLOCK_SIZE: u64 = 256;

/// Byte base offsets of the current ring slot in each buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RingOffsets {
    pub vertex_base: u64,
    pub index_base: u64,
    pub uniform_base: u64,
}

/// Fixed-capacity, multi-frame-slotted window arithmetic over the three ring
/// buffers.
///
/// Each buffer holds `ring_depth` equal slots; slot `i` and slot `j` never
/// overlap for `i ≠ j`. The ring performs no synchronization — reuse safety
/// is the caller's ring-depth choice (see [`RenderConfig::ring_depth`]).
#[derive(Debug, Clone)]
pub struct GeometryRing {
    depth: u32,
    current: u32,
    vertex_window: u64,
    index_window: u64,
}

impl GeometryRing {
    pub fn new(cfg: &RenderConfig) -> Self {
        // The index window rounds up to a 4-byte multiple: index uploads are
        // padded the same way, and slot bases must stay update-aligned.
        let index_window = (u64::from(cfg.max_indices_per_frame)
            * std::mem::size_of::<crate::draw::UiIndex>() as u64)
            .next_multiple_of(4);
        Self {
            depth: cfg.ring_depth.max(1),
            current: 0,
            vertex_window: u64::from(cfg.max_vertices_per_frame) * u64::from(UiVertex::STRIDE),
            index_window,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn current_slot(&self) -> u32 {
        self.current
    }

    /// Base byte offsets for the current slot.
    pub fn offsets(&self) -> RingOffsets {
        let slot = u64::from(self.current);
        RingOffsets {
            vertex_base: slot * self.vertex_window,
            index_base: slot * self.index_window,
            uniform_base: slot * UNIFORM_BLOCK_SIZE,
        }
    }

    /// Total vertex buffer size covering all slots.
    pub fn vertex_buffer_size(&self) -> u64 {
        self.vertex_window * u64::from(self.depth)
    }

    pub fn index_buffer_size(&self) -> u64 {
        self.index_window * u64::from(self.depth)
    }

    pub fn uniform_buffer_size(&self) -> u64 {
        UNIFORM_BLOCK_SIZE * u64::from(self.depth)
    }

    /// Returns the slot just written and steps to the next one.
    pub fn advance(&mut self) -> u32 {
        let written = self.current;
        self.current = (self.current + 1) % self.depth;
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(depth: u32, verts: u32, indices: u32) -> GeometryRing {
        GeometryRing::new(&RenderConfig {
            ring_depth: depth,
            max_vertices_per_frame: verts,
            max_indices_per_frame: indices,
            ..RenderConfig::default()
        })
    }

    #[test]
    fn slots_never_overlap() {
        let mut r = ring(3, 100, 300);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let o = r.offsets();
            // Window extents in bytes.
            let vtx = (o.vertex_base, o.vertex_base + 100 * u64::from(UiVertex::STRIDE));
            let idx = (o.index_base, o.index_base + 300 * 2);
            for (pv, pi) in &seen {
                let (a0, a1): &(u64, u64) = pv;
                assert!(vtx.1 <= *a0 || vtx.0 >= *a1, "vertex windows overlap");
                let (b0, b1): &(u64, u64) = pi;
                assert!(idx.1 <= *b0 || idx.0 >= *b1, "index windows overlap");
            }
            seen.push((vtx, idx));
            r.advance();
        }
    }

    #[test]
    fn offsets_repeat_every_depth_frames() {
        let mut r = ring(3, 64, 128);
        let mut history = Vec::new();
        for _ in 0..7 {
            history.push(r.offsets());
            r.advance();
        }
        for k in 0..4 {
            assert_eq!(history[k], history[k + 3]);
        }
        assert_ne!(history[0], history[1]);
    }

    #[test]
    fn advance_returns_slot_written() {
        let mut r = ring(2, 8, 8);
        assert_eq!(r.advance(), 0);
        assert_eq!(r.advance(), 1);
        assert_eq!(r.advance(), 0);
    }

    #[test]
    fn buffer_sizes_cover_all_slots() {
        let r = ring(4, 10, 20);
        assert_eq!(r.vertex_buffer_size(), 4 * 10 * u64::from(UiVertex::STRIDE));
        assert_eq!(r.index_buffer_size(), 4 * 20 * 2);
        assert_eq!(r.uniform_buffer_size(), 4 * UNIFORM_BLOCK_SIZE);
    }

    #[test]
    fn zero_depth_is_clamped() {
        let r = ring(0, 8, 8);
        assert_eq!(r.depth(), 1);
    }

    #[test]
    fn odd_index_capacity_aligns_slot_windows() {
        // 3 indices are 6 bytes; the window rounds up to 8 so every slot
        // base stays on a 4-byte boundary and a padded full-slot write fits.
        let mut r = ring(2, 8, 3);
        assert_eq!(r.index_buffer_size(), 2 * 8);
        assert_eq!(r.offsets().index_base, 0);
        r.advance();
        assert_eq!(r.offsets().index_base, 8);
    }
}
