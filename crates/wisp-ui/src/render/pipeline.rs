//! One-time pipeline/state construction.
//!
//! Builds (or borrows) every GPU object a context needs, in a fixed order:
//! shader program, font texture, fixed-function state, binding layout,
//! pipeline, descriptor binder, ring buffers. Any sub-step returning an
//! invalid handle aborts the sequence; the partially built context unwinds
//! through its guarded teardown.

use anyhow::{Context as _, Result};

use crate::draw::{TexturePair, UiVertex};
use crate::gpu::{
    BinderDesc, BindingLayoutDesc, BlendDesc, BufferDesc, BufferKind, DepthDesc, ImageInfo,
    PipelineDesc, PrimitiveTopology, RasterDesc, SamplerDesc, ShaderDesc, ShaderStage,
};

use super::config::SharedPipelineState;
use super::context::UiContext;

pub(crate) const SHADER_SOURCE: &str = include_str!("shaders/ui.wgsl");
pub(crate) const VERTEX_ENTRY: &str = "vs_main";
pub(crate) const FRAGMENT_ENTRY: &str = "fs_main";

// Binding names shared between the shader source and descriptor updates.
pub(crate) const UNIFORM_BLOCK: &str = "uniform_block";
pub(crate) const COLOR_TEXTURE: &str = "color_texture";
pub(crate) const BILINEAR_SAMPLER: &str = "bilinear_sampler";

pub(crate) fn create_render_things(
    ctx: &mut UiContext,
    shared: Option<&SharedPipelineState>,
) -> Result<()> {
    create_shader(ctx)?;
    create_font_texture(ctx)?;

    // Fixed-function state: own the whole group or borrow the whole group.
    match shared {
        Some(state) => {
            ctx.sampler = Some(state.sampler);
            ctx.blend = state.blend;
            ctx.depth = state.depth;
            ctx.raster = state.raster;
            ctx.vertex_layout = state.vertex_layout.clone();
            ctx.shared_state = true;
        }
        None => {
            let sampler = ctx
                .backend
                .create_sampler(&SamplerDesc::bilinear_clamp())
                .context("failed to create bilinear sampler")?;
            ctx.sampler = Some(sampler);
            ctx.blend = BlendDesc::straight_alpha();
            ctx.depth = DepthDesc::ignore();
            ctx.raster = RasterDesc::solid_no_cull();
            ctx.vertex_layout = UiVertex::layout();
            ctx.shared_state = false;
        }
    }

    let sampler = ctx.sampler.context("missing sampler")?;
    let shader = ctx.shader.context("missing shader")?;

    let binding_layout = ctx
        .backend
        .create_binding_layout(&BindingLayoutDesc {
            label: "wisp ui binding layout",
            uniform_block: UNIFORM_BLOCK,
            texture: COLOR_TEXTURE,
            static_sampler_name: BILINEAR_SAMPLER,
            static_sampler: sampler,
        })
        .context("failed to create binding layout")?;
    ctx.binding_layout = Some(binding_layout);

    let pipeline = ctx
        .backend
        .create_pipeline(&PipelineDesc {
            label: "wisp ui pipeline",
            shader,
            layout: binding_layout,
            vertex_layout: &ctx.vertex_layout,
            blend: ctx.blend,
            depth: ctx.depth,
            raster: ctx.raster,
            color_format: ctx.config.color_format.with_srgb(ctx.config.srgb),
            depth_format: ctx.config.depth_format,
            sample_count: ctx.config.sample_count,
            sample_quality: ctx.config.sample_quality,
            topology: PrimitiveTopology::TriangleList,
        })
        .context("failed to create pipeline")?;
    ctx.pipeline = Some(pipeline);

    let binder = ctx
        .backend
        .create_binder(&BinderDesc {
            layout: binding_layout,
            max_updates_per_batch: ctx.config.max_dynamic_updates_per_batch,
        })
        .context("failed to create descriptor binder")?;
    ctx.binder = Some(binder);

    create_ring_buffers(ctx)?;

    Ok(())
}

fn create_shader(ctx: &mut UiContext) -> Result<()> {
    let vertex = ctx
        .compiler
        .compile(ShaderStage::Vertex, "wisp_ui_vertex", VERTEX_ENTRY, SHADER_SOURCE)
        .context("vertex shader compile failed")?;
    if let Some(log) = &vertex.log {
        log::warn!("vertex shader compile warnings: {log}");
    }

    let fragment = ctx
        .compiler
        .compile(ShaderStage::Fragment, "wisp_ui_fragment", FRAGMENT_ENTRY, SHADER_SOURCE)
        .context("fragment shader compile failed")?;
    if let Some(log) = &fragment.log {
        log::warn!("fragment shader compile warnings: {log}");
    }

    let shader = ctx
        .backend
        .create_shader(&ShaderDesc {
            label: "wisp ui shader",
            vertex_bytecode: &vertex.bytecode,
            vertex_entry: VERTEX_ENTRY,
            fragment_bytecode: &fragment.bytecode,
            fragment_entry: FRAGMENT_ENTRY,
        })
        .context("failed to create shader object")?;
    ctx.shader = Some(shader);
    Ok(())
}

fn create_font_texture(ctx: &mut UiContext) -> Result<()> {
    let image = ctx.session.atlas().raw_image();
    let gpu = ctx
        .backend
        .upload_texture(&image)
        .context("failed to upload font atlas")?;

    let id = ctx.textures.insert(TexturePair {
        cpu: ImageInfo {
            width: image.width,
            height: image.height,
            format: image.format,
        },
        gpu,
    });
    ctx.font_texture = Some(id);
    Ok(())
}

fn create_ring_buffers(ctx: &mut UiContext) -> Result<()> {
    let vertex_buffer = ctx
        .backend
        .create_buffer(&BufferDesc {
            label: "wisp ui vertex ring",
            size: ctx.ring.vertex_buffer_size(),
            kind: BufferKind::Vertex,
            stride: UiVertex::STRIDE,
            persistent_map: true,
        })
        .context("failed to create vertex ring buffer")?;
    ctx.vertex_buffer = Some(vertex_buffer);

    let index_buffer = ctx
        .backend
        .create_buffer(&BufferDesc {
            label: "wisp ui index ring",
            size: ctx.ring.index_buffer_size(),
            kind: BufferKind::Index,
            stride: std::mem::size_of::<crate::draw::UiIndex>() as u32,
            persistent_map: true,
        })
        .context("failed to create index ring buffer")?;
    ctx.index_buffer = Some(index_buffer);

    let uniform_buffer = ctx
        .backend
        .create_buffer(&BufferDesc {
            label: "wisp ui uniform ring",
            size: ctx.ring.uniform_buffer_size(),
            kind: BufferKind::Uniform,
            stride: 0,
            persistent_map: true,
        })
        .context("failed to create uniform ring buffer")?;
    ctx.uniform_buffer = Some(uniform_buffer);

    Ok(())
}
