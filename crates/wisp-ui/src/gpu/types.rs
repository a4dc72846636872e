//! Handle newtypes and plain-data descriptors for the GPU seam.
//!
//! Handles are opaque `u64` ids minted by a [`super::RenderBackend`]; the core
//! stores them in `Option` fields so teardown can skip anything that was never
//! created.

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub u64);
    };
}

handle!(
    /// GPU buffer (vertex, index, or uniform).
    BufferId
);
handle!(
    /// GPU texture object.
    TextureId
);
handle!(
    /// Immutable sampler object.
    SamplerId
);
handle!(
    /// Compiled shader program (vertex + fragment stages).
    ShaderId
);
handle!(
    /// Resource-binding signature: uniform block + texture + static sampler.
    BindingLayoutId
);
handle!(
    /// Graphics pipeline object.
    PipelineId
);
handle!(
    /// Descriptor binder: pool for per-draw binding updates.
    BinderId
);

// ── formats ────────────────────────────────────────────────────────────────

/// Render-target and texture formats the bindings care about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Depth32Float,
}

impl TextureFormat {
    /// Returns the sRGB variant of a color format, or the format unchanged.
    pub fn with_srgb(self, srgb: bool) -> TextureFormat {
        match (self, srgb) {
            (TextureFormat::Rgba8Unorm, true) => TextureFormat::Rgba8UnormSrgb,
            (TextureFormat::Bgra8Unorm, true) => TextureFormat::Bgra8UnormSrgb,
            (other, _) => other,
        }
    }
}

/// CPU-side pixel format for [`RawImage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageFormat {
    Rgba8Unorm,
}

/// Raw pixels handed to the image-upload collaborator.
#[derive(Debug, Copy, Clone)]
pub struct RawImage<'a> {
    pub pixels: &'a [u8],
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

/// CPU-side image metadata retained alongside the GPU texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

// ── fixed-function state ───────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mip_filter: Filter,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
}

impl SamplerDesc {
    /// Bilinear clamp-to-edge, the sampler UI rendering wants.
    pub const fn bilinear_clamp() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            mip_filter: Filter::Linear,
            address_u: AddressMode::ClampToEdge,
            address_v: AddressMode::ClampToEdge,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendDesc {
    pub src_color: BlendFactor,
    pub dst_color: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl BlendDesc {
    /// Straight-alpha blending: src-alpha / one-minus-src-alpha.
    pub const fn straight_alpha() -> Self {
        Self {
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareOp {
    Always,
    Less,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DepthDesc {
    pub test: bool,
    pub write: bool,
    pub compare: CompareOp,
}

impl DepthDesc {
    /// Depth ignored: always passes, never writes.
    pub const fn ignore() -> Self {
        Self {
            test: false,
            write: false,
            compare: CompareOp::Always,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CullMode {
    None,
    Back,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillMode {
    Solid,
    Wireframe,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RasterDesc {
    pub cull: CullMode,
    pub fill: FillMode,
    pub scissor_enable: bool,
}

impl RasterDesc {
    /// Solid fill, no culling, scissor driven per draw.
    pub const fn solid_no_cull() -> Self {
        Self {
            cull: CullMode::None,
            fill: FillMode::Solid,
            scissor_enable: true,
        }
    }
}

// ── vertex layout ──────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Unorm8x4,
}

impl VertexFormat {
    pub const fn byte_size(self) -> u32 {
        match self {
            VertexFormat::Float32x2 => 8,
            VertexFormat::Unorm8x4 => 4,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub semantic: &'static str,
    pub format: VertexFormat,
    pub offset: u32,
    pub location: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u32,
    pub attributes: Vec<VertexAttribute>,
}

// ── buffers ────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferKind {
    Vertex,
    Index,
    Uniform,
}

/// Buffer creation parameters.
///
/// Ring buffers are created host-visible with persistent-map semantics:
/// [`super::RenderBackend::write_buffer`] must not require an explicit
/// map/unmap round trip per update.
#[derive(Debug, Clone)]
pub struct BufferDesc {
    pub label: &'static str,
    pub size: u64,
    pub kind: BufferKind,
    /// Element stride in bytes (vertex stride or index width); 0 if unused.
    pub stride: u32,
    pub persistent_map: bool,
}

// ── shaders / pipeline / binding ───────────────────────────────────────────

/// Bytecode for both stages of the UI shader program.
#[derive(Debug, Copy, Clone)]
pub struct ShaderDesc<'a> {
    pub label: &'a str,
    pub vertex_bytecode: &'a [u8],
    pub vertex_entry: &'a str,
    pub fragment_bytecode: &'a [u8],
    pub fragment_entry: &'a str,
}

/// Binding signature: one uniform block, one per-draw texture, one sampler
/// baked statically into the signature.
#[derive(Debug, Copy, Clone)]
pub struct BindingLayoutDesc<'a> {
    pub label: &'a str,
    pub uniform_block: &'a str,
    pub texture: &'a str,
    pub static_sampler_name: &'a str,
    pub static_sampler: SamplerId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
}

#[derive(Debug, Clone)]
pub struct PipelineDesc<'a> {
    pub label: &'a str,
    pub shader: ShaderId,
    pub layout: BindingLayoutId,
    pub vertex_layout: &'a VertexLayout,
    pub blend: BlendDesc,
    pub depth: DepthDesc,
    pub raster: RasterDesc,
    pub color_format: TextureFormat,
    pub depth_format: Option<TextureFormat>,
    pub sample_count: u32,
    pub sample_quality: u32,
    pub topology: PrimitiveTopology,
}

/// Descriptor-binder sizing: the pool must cover the largest number of
/// distinct per-draw binding updates issued within one ring cycle.
#[derive(Debug, Copy, Clone)]
pub struct BinderDesc {
    pub layout: BindingLayoutId,
    pub max_updates_per_batch: u32,
}

// ── barriers ───────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceState {
    VertexAndConstantBuffer,
    IndexBuffer,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferBarrier {
    pub buffer: BufferId,
    pub state: ResourceState,
}
