//! wgpu implementation of the GPU seam.
//!
//! Handle tables live behind `RefCell`: the seam is `&self` and the model is
//! single-threaded. wgpu tracks buffer hazards itself, so resource barriers
//! are a no-op here; the recorder wraps an open render pass and resolves
//! handles against the backend's tables as commands are appended.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::num::NonZeroU64;

use anyhow::{Context as _, Result};

use super::backend::RenderBackend;
use super::recorder::{CommandRecorder, DescriptorParam};
use super::types::{
    AddressMode, BinderDesc, BinderId, BindingLayoutDesc, BindingLayoutId, BlendFactor,
    BufferBarrier, BufferDesc, BufferId, BufferKind, CompareOp, CullMode, FillMode, Filter,
    ImageFormat, PipelineDesc, PipelineId, PrimitiveTopology, RawImage, SamplerDesc, SamplerId,
    ShaderDesc, ShaderId, TextureFormat, TextureId, VertexFormat,
};

struct ShaderEntry {
    module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
}

struct LayoutEntry {
    layout: wgpu::BindGroupLayout,
    static_sampler: SamplerId,
}

struct TextureEntry {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Production backend over a wgpu device/queue pair.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,

    next_id: Cell<u64>,
    samplers: RefCell<HashMap<u64, wgpu::Sampler>>,
    shaders: RefCell<HashMap<u64, ShaderEntry>>,
    layouts: RefCell<HashMap<u64, LayoutEntry>>,
    pipelines: RefCell<HashMap<u64, wgpu::RenderPipeline>>,
    binders: RefCell<HashMap<u64, BinderDesc>>,
    buffers: RefCell<HashMap<u64, wgpu::Buffer>>,
    textures: RefCell<HashMap<u64, TextureEntry>>,
}

impl WgpuBackend {
    /// Wraps a device/queue pair the host already owns.
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            next_id: Cell::new(0),
            samplers: RefCell::new(HashMap::new()),
            shaders: RefCell::new(HashMap::new()),
            layouts: RefCell::new(HashMap::new()),
            pipelines: RefCell::new(HashMap::new()),
            binders: RefCell::new(HashMap::new()),
            buffers: RefCell::new(HashMap::new()),
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// Creates a backend on a headless device.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; this blocks on
    /// it, which is fine at startup.
    pub fn new_headless() -> Result<Self> {
        pollster::block_on(Self::new_headless_async())
    }

    async fn new_headless_async() -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("wisp-ui device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        Ok(Self::from_device(device, queue))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Opens a recorder over an already-begun render pass.
    ///
    /// The pass must target the color/depth formats the pipeline was created
    /// with.
    pub fn recorder<'b>(&'b self, pass: wgpu::RenderPass<'static>) -> WgpuRecorder<'b> {
        WgpuRecorder {
            backend: self,
            pass,
            bind_groups: HashMap::new(),
        }
    }

    fn mint(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl RenderBackend for WgpuBackend {
    fn create_sampler(&self, desc: &SamplerDesc) -> Option<SamplerId> {
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("wisp ui sampler"),
            address_mode_u: address_mode(desc.address_u),
            address_mode_v: address_mode(desc.address_v),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter(desc.mag_filter),
            min_filter: filter(desc.min_filter),
            mipmap_filter: mipmap_filter(desc.mip_filter),
            ..Default::default()
        });
        let id = self.mint();
        self.samplers.borrow_mut().insert(id, sampler);
        Some(SamplerId(id))
    }

    fn create_shader(&self, desc: &ShaderDesc<'_>) -> Option<ShaderId> {
        // Both stages compile from the same WGSL source; one module carries
        // both entry points.
        let source = match std::str::from_utf8(desc.vertex_bytecode) {
            Ok(s) => s,
            Err(err) => {
                log::error!("shader bytecode is not WGSL text: {err}");
                return None;
            }
        };
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wisp ui shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let id = self.mint();
        self.shaders.borrow_mut().insert(
            id,
            ShaderEntry {
                module,
                vertex_entry: desc.vertex_entry.to_owned(),
                fragment_entry: desc.fragment_entry.to_owned(),
            },
        );
        Some(ShaderId(id))
    }

    fn create_binding_layout(&self, desc: &BindingLayoutDesc<'_>) -> Option<BindingLayoutId> {
        if !self.samplers.borrow().contains_key(&desc.static_sampler.0) {
            log::error!("binding layout references unknown sampler");
            return None;
        }

        let layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("wisp ui bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: NonZeroU64::new(64),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let id = self.mint();
        self.layouts.borrow_mut().insert(
            id,
            LayoutEntry {
                layout,
                static_sampler: desc.static_sampler,
            },
        );
        Some(BindingLayoutId(id))
    }

    fn create_pipeline(&self, desc: &PipelineDesc<'_>) -> Option<PipelineId> {
        let shaders = self.shaders.borrow();
        let shader = shaders.get(&desc.shader.0)?;
        let layouts = self.layouts.borrow();
        let layout = layouts.get(&desc.layout.0)?;

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("wisp ui pipeline layout"),
                bind_group_layouts: &[&layout.layout],
                immediate_size: 0,
            });

        let attributes: Vec<wgpu::VertexAttribute> = desc
            .vertex_layout
            .attributes
            .iter()
            .map(|a| wgpu::VertexAttribute {
                format: vertex_format(a.format),
                offset: u64::from(a.offset),
                shader_location: a.location,
            })
            .collect();
        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: u64::from(desc.vertex_layout.stride),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("wisp ui pipeline"),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader.module,
                    entry_point: Some(&shader.vertex_entry),
                    compilation_options: Default::default(),
                    buffers: &vertex_buffers,
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader.module,
                    entry_point: Some(&shader.fragment_entry),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: texture_format(desc.color_format),
                        blend: Some(blend_state(&desc.blend)),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: match desc.topology {
                        PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
                    },
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: cull_mode(desc.raster.cull),
                    polygon_mode: polygon_mode(desc.raster.fill),
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: desc.depth_format.map(|format| wgpu::DepthStencilState {
                    format: texture_format(format),
                    depth_write_enabled: desc.depth.write,
                    depth_compare: match desc.depth.compare {
                        CompareOp::Always => wgpu::CompareFunction::Always,
                        CompareOp::Less => wgpu::CompareFunction::Less,
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: desc.sample_count.max(1),
                    ..Default::default()
                },

                multiview_mask: None,
                cache: None,
            });

        let id = self.mint();
        self.pipelines.borrow_mut().insert(id, pipeline);
        Some(PipelineId(id))
    }

    fn create_binder(&self, desc: &BinderDesc) -> Option<BinderId> {
        // Bind groups are built per update; the binder only carries sizing.
        let id = self.mint();
        self.binders.borrow_mut().insert(id, *desc);
        Some(BinderId(id))
    }

    fn create_buffer(&self, desc: &BufferDesc) -> Option<BufferId> {
        let usage = match desc.kind {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX,
            BufferKind::Index => wgpu::BufferUsages::INDEX,
            BufferKind::Uniform => wgpu::BufferUsages::UNIFORM,
        } | wgpu::BufferUsages::COPY_DST;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(desc.label),
            size: desc.size,
            usage,
            mapped_at_creation: false,
        });
        let id = self.mint();
        self.buffers.borrow_mut().insert(id, buffer);
        Some(BufferId(id))
    }

    fn upload_texture(&self, image: &RawImage<'_>) -> Option<TextureId> {
        let format = match image.format {
            ImageFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        };
        let size = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("wisp ui texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let id = self.mint();
        self.textures.borrow_mut().insert(
            id,
            TextureEntry {
                _texture: texture,
                view,
            },
        );
        Some(TextureId(id))
    }

    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]) {
        if let Some(b) = self.buffers.borrow().get(&buffer.0) {
            self.queue.write_buffer(b, offset, data);
        }
    }

    fn destroy_sampler(&self, id: SamplerId) {
        self.samplers.borrow_mut().remove(&id.0);
    }

    fn destroy_shader(&self, id: ShaderId) {
        self.shaders.borrow_mut().remove(&id.0);
    }

    fn destroy_binding_layout(&self, id: BindingLayoutId) {
        self.layouts.borrow_mut().remove(&id.0);
    }

    fn destroy_pipeline(&self, id: PipelineId) {
        self.pipelines.borrow_mut().remove(&id.0);
    }

    fn destroy_binder(&self, id: BinderId) {
        self.binders.borrow_mut().remove(&id.0);
    }

    fn destroy_buffer(&self, id: BufferId) {
        self.buffers.borrow_mut().remove(&id.0);
    }

    fn destroy_texture(&self, id: TextureId) {
        self.textures.borrow_mut().remove(&id.0);
    }
}

/// Recorder over an open render pass.
///
/// Descriptor updates materialize as bind groups, cached by uniform offset and
/// texture so re-binding the same pair across frames reuses one group.
pub struct WgpuRecorder<'b> {
    backend: &'b WgpuBackend,
    pass: wgpu::RenderPass<'static>,
    bind_groups: HashMap<(u64, u64), wgpu::BindGroup>,
}

impl CommandRecorder for WgpuRecorder<'_> {
    fn resource_barrier(&mut self, _barriers: &[BufferBarrier]) {
        // wgpu tracks buffer hazards internally.
    }

    fn bind_pipeline(&mut self, pipeline: PipelineId) {
        if let Some(p) = self.backend.pipelines.borrow().get(&pipeline.0) {
            self.pass.set_pipeline(p);
        }
    }

    fn bind_descriptors(
        &mut self,
        _binder: BinderId,
        layout: BindingLayoutId,
        params: &[DescriptorParam<'_>],
    ) {
        let layouts = self.backend.layouts.borrow();
        let Some(entry) = layouts.get(&layout.0) else {
            return;
        };

        let mut uniform = None;
        let mut texture = None;
        for p in params {
            match p {
                DescriptorParam::UniformBlock { buffer, offset, .. } => {
                    uniform = Some((*buffer, *offset));
                }
                DescriptorParam::Texture { texture: t, .. } => texture = Some(*t),
            }
        }

        let buffers = self.backend.buffers.borrow();
        let textures = self.backend.textures.borrow();
        let Some((ubo_id, offset)) = uniform else {
            return;
        };
        let Some(texture_id) = texture else {
            return;
        };

        let key = (offset, texture_id.0);
        if !self.bind_groups.contains_key(&key) {
            let Some(ubo) = buffers.get(&ubo_id.0) else {
                return;
            };
            let Some(view) = textures.get(&texture_id.0).map(|t| &t.view) else {
                return;
            };
            let samplers = self.backend.samplers.borrow();
            let Some(sampler) = samplers.get(&entry.static_sampler.0) else {
                return;
            };

            let group = self.backend.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("wisp ui bind group"),
                layout: &entry.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                            buffer: ubo,
                            offset,
                            size: NonZeroU64::new(64),
                        }),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            });
            self.bind_groups.insert(key, group);
        }
        if let Some(group) = self.bind_groups.get(&key) {
            self.pass.set_bind_group(0, group, &[]);
        }
    }

    fn bind_index_buffer(&mut self, buffer: BufferId, offset: u64) {
        if let Some(b) = self.backend.buffers.borrow().get(&buffer.0) {
            self.pass
                .set_index_buffer(b.slice(offset..), wgpu::IndexFormat::Uint16);
        }
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64) {
        if let Some(b) = self.backend.buffers.borrow().get(&buffer.0) {
            self.pass.set_vertex_buffer(0, b.slice(offset..));
        }
    }

    fn set_viewport(&mut self, x: f32, y: f32, w: f32, h: f32, min_depth: f32, max_depth: f32) {
        self.pass.set_viewport(x, y, w, h, min_depth, max_depth);
    }

    fn set_scissor(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.pass.set_scissor_rect(x, y, w, h);
    }

    fn draw_indexed(&mut self, count: u32, first_index: u32, base_vertex: u32) {
        self.pass
            .draw_indexed(first_index..first_index + count, base_vertex as i32, 0..1);
    }
}

// ── enum mapping ───────────────────────────────────────────────────────────

fn filter(f: Filter) -> wgpu::FilterMode {
    match f {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

fn mipmap_filter(f: Filter) -> wgpu::MipmapFilterMode {
    match f {
        Filter::Nearest => wgpu::MipmapFilterMode::Nearest,
        Filter::Linear => wgpu::MipmapFilterMode::Linear,
    }
}

fn address_mode(m: AddressMode) -> wgpu::AddressMode {
    match m {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
    }
}

fn vertex_format(f: VertexFormat) -> wgpu::VertexFormat {
    match f {
        VertexFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
        VertexFormat::Unorm8x4 => wgpu::VertexFormat::Unorm8x4,
    }
}

fn texture_format(f: TextureFormat) -> wgpu::TextureFormat {
    match f {
        TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        TextureFormat::Rgba8UnormSrgb => wgpu::TextureFormat::Rgba8UnormSrgb,
        TextureFormat::Bgra8Unorm => wgpu::TextureFormat::Bgra8Unorm,
        TextureFormat::Bgra8UnormSrgb => wgpu::TextureFormat::Bgra8UnormSrgb,
        TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
    }
}

fn blend_factor(f: BlendFactor) -> wgpu::BlendFactor {
    match f {
        BlendFactor::Zero => wgpu::BlendFactor::Zero,
        BlendFactor::One => wgpu::BlendFactor::One,
        BlendFactor::SrcAlpha => wgpu::BlendFactor::SrcAlpha,
        BlendFactor::OneMinusSrcAlpha => wgpu::BlendFactor::OneMinusSrcAlpha,
    }
}

fn blend_state(b: &super::types::BlendDesc) -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: blend_factor(b.src_color),
            dst_factor: blend_factor(b.dst_color),
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: blend_factor(b.src_alpha),
            dst_factor: blend_factor(b.dst_alpha),
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn cull_mode(c: CullMode) -> Option<wgpu::Face> {
    match c {
        CullMode::None => None,
        CullMode::Back => Some(wgpu::Face::Back),
    }
}

fn polygon_mode(f: FillMode) -> wgpu::PolygonMode {
    match f {
        FillMode::Solid => wgpu::PolygonMode::Fill,
        FillMode::Wireframe => wgpu::PolygonMode::Line,
    }
}
