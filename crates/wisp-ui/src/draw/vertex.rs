use bytemuck::{Pod, Zeroable};

use crate::gpu::{VertexAttribute, VertexFormat, VertexLayout};

/// Packed UI vertex: 2D position, UV, and an sRGB color as 4 normalized bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Index element type. 16 bits is enough because draws carry a base-vertex
/// offset; each command list stays under 64k vertices.
pub type UiIndex = u16;

impl UiVertex {
    pub const STRIDE: u32 = std::mem::size_of::<UiVertex>() as u32;

    /// The vertex layout every UI pipeline uses.
    pub fn layout() -> VertexLayout {
        VertexLayout {
            stride: Self::STRIDE,
            attributes: vec![
                VertexAttribute {
                    semantic: "POSITION",
                    format: VertexFormat::Float32x2,
                    offset: 0,
                    location: 0,
                },
                VertexAttribute {
                    semantic: "TEXCOORD",
                    format: VertexFormat::Float32x2,
                    offset: 8,
                    location: 1,
                },
                VertexAttribute {
                    semantic: "COLOR",
                    format: VertexFormat::Unorm8x4,
                    offset: 16,
                    location: 2,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_matches_packed_fields() {
        assert_eq!(UiVertex::STRIDE, 20);
    }

    #[test]
    fn layout_offsets_are_contiguous() {
        let layout = UiVertex::layout();
        let mut expected = 0;
        for attr in &layout.attributes {
            assert_eq!(attr.offset, expected);
            expected += attr.format.byte_size();
        }
        assert_eq!(expected, layout.stride);
    }
}
