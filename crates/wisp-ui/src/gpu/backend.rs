use super::types::{
    BinderDesc, BinderId, BindingLayoutDesc, BindingLayoutId, BufferDesc, BufferId, PipelineDesc,
    PipelineId, RawImage, SamplerDesc, SamplerId, ShaderDesc, ShaderId, TextureId,
};

/// Resource creation/destruction plus buffer writes.
///
/// Every `create_*` returns `None` for an invalid handle; the caller treats
/// that as a setup failure and unwinds. `destroy_*` must tolerate handles the
/// backend has never seen (teardown runs member by member over whatever subset
/// of objects exists).
///
/// All methods take `&self`: the model is single-threaded and implementations
/// are free to use interior mutability for their handle tables.
pub trait RenderBackend {
    fn create_sampler(&self, desc: &SamplerDesc) -> Option<SamplerId>;
    fn create_shader(&self, desc: &ShaderDesc<'_>) -> Option<ShaderId>;
    fn create_binding_layout(&self, desc: &BindingLayoutDesc<'_>) -> Option<BindingLayoutId>;
    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Option<PipelineId>;
    fn create_binder(&self, desc: &BinderDesc) -> Option<BinderId>;
    fn create_buffer(&self, desc: &BufferDesc) -> Option<BufferId>;

    /// Uploads raw pixels once and returns the resulting texture.
    ///
    /// This is the image-layer collaborator; the bindings call it exactly once
    /// at initialization for the font atlas, plus once per host-registered
    /// texture.
    fn upload_texture(&self, image: &RawImage<'_>) -> Option<TextureId>;

    /// Writes `data` into `buffer` at `offset` bytes.
    ///
    /// The target buffers are host-visible with persistent-map semantics, so
    /// this is a direct CPU write; no per-update map/unmap is implied.
    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]);

    fn destroy_sampler(&self, id: SamplerId);
    fn destroy_shader(&self, id: ShaderId);
    fn destroy_binding_layout(&self, id: BindingLayoutId);
    fn destroy_pipeline(&self, id: PipelineId);
    fn destroy_binder(&self, id: BinderId);
    fn destroy_buffer(&self, id: BufferId);
    fn destroy_texture(&self, id: TextureId);
}
