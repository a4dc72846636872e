use crate::gpu::{BlendDesc, DepthDesc, RasterDesc, SamplerId, TextureFormat, VertexLayout};

/// Context configuration.
///
/// One configuration-driven context covers both historical binding shapes:
/// fixed-format contexts leave `depth_format` empty and own their state;
/// shared-state contexts pass a [`SharedPipelineState`] at creation.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Number of in-flight frames the geometry ring covers.
    ///
    /// No fence is taken inside the bindings: the host's frame pacing must
    /// guarantee that a slot written `ring_depth` frames ago has retired on
    /// the device before it is written again.
    pub ring_depth: u32,

    /// Vertex capacity of one ring slot. Geometry beyond this is silently
    /// dropped for the frame (see [`super::UiContext::overflow_events`]).
    pub max_vertices_per_frame: u32,

    /// Index capacity of one ring slot.
    pub max_indices_per_frame: u32,

    /// Descriptor-binder pool size: the largest number of distinct per-draw
    /// binding updates (in practice, distinct textures) within one ring cycle.
    pub max_dynamic_updates_per_batch: u32,

    /// Color target format of the pass the UI renders into.
    pub color_format: TextureFormat,

    /// Optional depth target the pass carries. The UI neither tests nor
    /// writes depth; this only keeps the pipeline pass-compatible.
    pub depth_format: Option<TextureFormat>,

    /// Promote the color format to its sRGB variant.
    pub srgb: bool,

    /// MSAA sample count/quality of the target.
    pub sample_count: u32,
    pub sample_quality: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ring_depth: 3,
            max_vertices_per_frame: 64 * 1024,
            max_indices_per_frame: 128 * 1024,
            max_dynamic_updates_per_batch: 32,
            color_format: TextureFormat::Bgra8Unorm,
            depth_format: None,
            srgb: false,
            sample_count: 1,
            sample_quality: 0,
        }
    }
}

/// Caller-supplied state group shared across contexts.
///
/// A context either owns this whole group or borrows this whole group — never
/// a mix per member. Borrowed members are not destroyed at teardown, and must
/// outlive every context referencing them.
///
/// Blend/depth/raster state and the vertex layout are plain data in modern
/// APIs; only the sampler is a live GPU object.
#[derive(Debug, Clone)]
pub struct SharedPipelineState {
    pub sampler: SamplerId,
    pub blend: BlendDesc,
    pub depth: DepthDesc,
    pub raster: RasterDesc,
    pub vertex_layout: VertexLayout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_triple_buffered() {
        let cfg = RenderConfig::default();
        assert_eq!(cfg.ring_depth, 3);
        assert!(cfg.max_vertices_per_frame > 0);
        assert!(cfg.max_indices_per_frame > 0);
        assert!(cfg.depth_format.is_none());
    }
}
