//! Context lifecycle: creation, per-frame entry points, teardown.

use std::rc::Rc;

use anyhow::Result;

use crate::draw::{TexturePair, TextureRegistry, UiTextureId, UiVertex};
use crate::gpu::{
    BinderId, BindingLayoutId, BlendDesc, BufferId, CommandRecorder, DepthDesc, ImageInfo,
    PipelineId, RasterDesc, RawImage, RenderBackend, SamplerId, ShaderCompiler, ShaderId,
    VertexLayout,
};
use crate::input::{InputSource, PointerBridge};
use crate::session::Session;

use super::config::{RenderConfig, SharedPipelineState};
use super::pipeline::create_render_things;
use super::ring::GeometryRing;
use super::translate::render_draw_data;

/// Everything a context needs at creation.
pub struct CreateInfo<'a> {
    pub backend: Rc<dyn RenderBackend>,
    pub compiler: Rc<dyn ShaderCompiler>,
    pub input: Rc<dyn InputSource>,
    pub config: RenderConfig,
    /// TTF/OTF bytes for the font atlas; `None` uses the plain white atlas.
    pub font_bytes: Option<&'a [u8]>,
    /// Borrow this state group instead of creating one. Borrowed members are
    /// left alive at teardown.
    pub shared_state: Option<&'a SharedPipelineState>,
}

/// One GUI rendering context: session, pipeline objects, geometry ring, and
/// the input bridge, torn down member by member on drop.
pub struct UiContext {
    pub(crate) backend: Rc<dyn RenderBackend>,
    pub(crate) compiler: Rc<dyn ShaderCompiler>,
    input: Rc<dyn InputSource>,

    pub(crate) config: RenderConfig,
    pub(crate) ring: GeometryRing,
    pub(crate) session: Session,
    bridge: PointerBridge,

    // Fixed-function state, owned or borrowed as one group.
    pub(crate) shared_state: bool,
    pub(crate) sampler: Option<SamplerId>,
    pub(crate) blend: BlendDesc,
    pub(crate) depth: DepthDesc,
    pub(crate) raster: RasterDesc,
    pub(crate) vertex_layout: VertexLayout,

    // Created objects; `None` means "never created" and is skipped at teardown.
    pub(crate) shader: Option<ShaderId>,
    pub(crate) binding_layout: Option<BindingLayoutId>,
    pub(crate) pipeline: Option<PipelineId>,
    pub(crate) binder: Option<BinderId>,
    pub(crate) vertex_buffer: Option<BufferId>,
    pub(crate) index_buffer: Option<BufferId>,
    pub(crate) uniform_buffer: Option<BufferId>,

    pub(crate) textures: TextureRegistry,
    pub(crate) font_texture: Option<UiTextureId>,

    pub(crate) scale_offset: [f32; 16],
    pub(crate) overflow_events: u64,
    pub(crate) index_scratch: Vec<u8>,
    pub(crate) warned_missing_texture: bool,
}

impl UiContext {
    /// Builds a context and all of its GPU objects.
    ///
    /// On failure the partially built context is dropped; teardown destroys
    /// exactly the objects that were created before the failing step.
    pub fn new(info: CreateInfo<'_>) -> Result<Self> {
        crate::logging::init_logging(crate::logging::LoggingConfig::default());

        let ring = GeometryRing::new(&info.config);
        let session = Session::new(info.font_bytes);
        let bridge = PointerBridge::new(info.input.as_ref());

        let mut ctx = Self {
            backend: info.backend,
            compiler: info.compiler,
            input: info.input,
            config: info.config,
            ring,
            session,
            bridge,
            shared_state: false,
            sampler: None,
            blend: BlendDesc::straight_alpha(),
            depth: DepthDesc::ignore(),
            raster: RasterDesc::solid_no_cull(),
            vertex_layout: UiVertex::layout(),
            shader: None,
            binding_layout: None,
            pipeline: None,
            binder: None,
            vertex_buffer: None,
            index_buffer: None,
            uniform_buffer: None,
            textures: TextureRegistry::new(),
            font_texture: None,
            scale_offset: [0.0; 16],
            overflow_events: 0,
            index_scratch: Vec::new(),
            warned_missing_texture: false,
        };

        create_render_things(&mut ctx, info.shared_state)?;

        log::debug!(
            "ui context ready: ring depth {}, {} vertices / {} indices per slot",
            ctx.ring.depth(),
            ctx.config.max_vertices_per_frame,
            ctx.config.max_indices_per_frame
        );
        Ok(ctx)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Records the logical display size and DPI scale for subsequent frames.
    pub fn set_window_size(&mut self, width: f32, height: f32, scale_x: f32, scale_y: f32) {
        let io = self.session.io_mut();
        io.display_size = crate::coords::Vec2::new(width, height);
        io.framebuffer_scale = crate::coords::Vec2::new(scale_x, scale_y);
    }

    /// Starts a frame: pulls pointer state through the bridge and refreshes
    /// the capture flag against the registered hover regions.
    ///
    /// Returns whether the GUI wants to capture the pointer this frame.
    pub fn update_input(&mut self, delta_time_ms: f64) -> bool {
        self.bridge
            .update(self.input.as_ref(), self.session.io_mut(), delta_time_ms);
        self.session.update_capture();
        self.session.io().want_capture_mouse
    }

    /// Translates the session's submitted draw data into `rec`.
    ///
    /// Returns the ring slot the frame's geometry was written to; the slot is
    /// reused `ring_depth` frames later.
    pub fn render(&mut self, rec: &mut dyn CommandRecorder) -> u32 {
        render_draw_data(self, rec)
    }

    /// Uploads `image` and registers it for use in draw commands.
    pub fn register_texture(&mut self, image: &RawImage<'_>) -> Option<UiTextureId> {
        let gpu = self.backend.upload_texture(image)?;
        Some(self.textures.insert(TexturePair {
            cpu: ImageInfo {
                width: image.width,
                height: image.height,
                format: image.format,
            },
            gpu,
        }))
    }

    /// Destroys a registered texture. Draw commands still naming the id fall
    /// back to the font atlas.
    pub fn unregister_texture(&mut self, id: UiTextureId) {
        if Some(id) == self.font_texture {
            log::warn!("refusing to unregister the font atlas texture");
            return;
        }
        if let Some(pair) = self.textures.remove(id) {
            self.backend.destroy_texture(pair.gpu);
        }
    }

    /// Texture id of the built-in font atlas, for stamping into draw commands.
    pub fn font_texture(&self) -> Option<UiTextureId> {
        self.font_texture
    }

    /// Frames on which at least one draw list was dropped for exceeding the
    /// per-slot geometry capacity.
    pub fn overflow_events(&self) -> u64 {
        self.overflow_events
    }

    /// Projection matrix written for the most recent frame (column-major).
    pub fn scale_offset_matrix(&self) -> &[f32; 16] {
        &self.scale_offset
    }

    /// The context's own state group, for sharing with further contexts.
    ///
    /// Returns `None` when this context itself borrows shared state; chaining
    /// borrows would leave the lifetime of the sampler unclear.
    pub fn pipeline_state(&self) -> Option<SharedPipelineState> {
        if self.shared_state {
            return None;
        }
        Some(SharedPipelineState {
            sampler: self.sampler?,
            blend: self.blend,
            depth: self.depth,
            raster: self.raster,
            vertex_layout: self.vertex_layout.clone(),
        })
    }
}

impl Drop for UiContext {
    fn drop(&mut self) {
        // Member by member over whatever subset exists; order mirrors
        // creation in reverse within each group.
        for pair in self.textures.drain() {
            self.backend.destroy_texture(pair.gpu);
        }
        self.font_texture = None;

        if let Some(id) = self.uniform_buffer.take() {
            self.backend.destroy_buffer(id);
        }
        if let Some(id) = self.vertex_buffer.take() {
            self.backend.destroy_buffer(id);
        }
        if let Some(id) = self.index_buffer.take() {
            self.backend.destroy_buffer(id);
        }
        if let Some(id) = self.binder.take() {
            self.backend.destroy_binder(id);
        }
        if let Some(id) = self.pipeline.take() {
            self.backend.destroy_pipeline(id);
        }
        if let Some(id) = self.binding_layout.take() {
            self.backend.destroy_binding_layout(id);
        }
        // Borrowed state is the sharer's to destroy.
        if !self.shared_state {
            if let Some(id) = self.sampler.take() {
                self.backend.destroy_sampler(id);
            }
        } else {
            self.sampler = None;
        }
        if let Some(id) = self.shader.take() {
            self.backend.destroy_shader(id);
        }
    }
}
