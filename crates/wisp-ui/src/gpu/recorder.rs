use super::types::{
    BinderId, BindingLayoutId, BufferBarrier, BufferId, PipelineId, TextureId,
};

/// One entry of a per-draw descriptor update.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DescriptorParam<'a> {
    UniformBlock {
        name: &'a str,
        buffer: BufferId,
        offset: u64,
    },
    Texture {
        name: &'a str,
        texture: TextureId,
    },
}

/// An already-open command recording context for one frame.
///
/// The recorder is owned by the caller; the bindings only append commands to
/// it and never submit or synchronize. Everything here executes later on the
/// device — see the ring-depth contract on
/// [`crate::render::RenderConfig::ring_depth`].
pub trait CommandRecorder {
    /// Transitions buffers into the given resource states before use.
    ///
    /// Backends whose API tracks hazards internally may treat this as a no-op.
    fn resource_barrier(&mut self, barriers: &[BufferBarrier]);

    fn bind_pipeline(&mut self, pipeline: PipelineId);

    /// Allocates a binding update from `binder` and binds `params` against
    /// `layout`.
    fn bind_descriptors(
        &mut self,
        binder: BinderId,
        layout: BindingLayoutId,
        params: &[DescriptorParam<'_>],
    );

    /// Binds the index buffer starting at `offset` bytes (16-bit indices).
    fn bind_index_buffer(&mut self, buffer: BufferId, offset: u64);

    /// Binds the vertex buffer starting at `offset` bytes.
    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64);

    fn set_viewport(&mut self, x: f32, y: f32, w: f32, h: f32, min_depth: f32, max_depth: f32);

    fn set_scissor(&mut self, x: u32, y: u32, w: u32, h: u32);

    /// Indexed draw: `count` indices starting at `first_index`, vertex fetch
    /// biased by `base_vertex`. Offsets are relative to the currently bound
    /// index/vertex buffer base offsets.
    fn draw_indexed(&mut self, count: u32, first_index: u32, base_vertex: u32);
}
