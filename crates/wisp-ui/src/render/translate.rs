//! Per-frame draw-data translation.
//!
//! Converts the session's finalized [`DrawData`](crate::draw::DrawData) into
//! buffer uploads and recorded commands: geometry lands in the current ring
//! slot, a barrier pair transitions the geometry buffers, then the command
//! walk batches draws on texture identity and biases per-list offsets into
//! the shared slot-wide buffers.

use crate::coords::Vec2;
use crate::draw::{DrawCallback, DrawData};
use crate::gpu::{
    BufferBarrier, CommandRecorder, DescriptorParam, ResourceState, TextureId,
};

use super::context::UiContext;
use super::pipeline::{COLOR_TEXTURE, UNIFORM_BLOCK};

/// Screen-space → clip-space orthographic projection, column-major.
///
/// Maps `[pos, pos + size]` to `x, y ∈ [-1, 1]` with `z` fixed at `0.5`; the
/// Y axis flips so screen-down becomes clip-down.
pub(crate) fn scale_offset_matrix(pos: Vec2, size: Vec2) -> [f32; 16] {
    let left = pos.x;
    let right = pos.x + size.x;
    let top = pos.y;
    let bottom = pos.y + size.y;

    let width = right - left;
    let height = top - bottom;
    let off_x = (right + left) / (left - right);
    let off_y = (top + bottom) / (bottom - top);

    [
        2.0 / width, 0.0, 0.0, 0.0,
        0.0, 2.0 / height, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.0,
        off_x, off_y, 0.5, 1.0,
    ]
}

/// Renders the session's draw data into `rec` and returns the ring slot the
/// frame's geometry was written to.
pub(crate) fn render_draw_data(ctx: &mut UiContext, rec: &mut dyn CommandRecorder) -> u32 {
    // Move the data out so the walk below can borrow the context freely.
    let data = ctx.session.take_draw_data();
    let slot = translate_frame(ctx, rec, &data);
    ctx.session.restore_draw_data(data);
    slot
}

fn translate_frame(ctx: &mut UiContext, rec: &mut dyn CommandRecorder, data: &DrawData) -> u32 {
    let (Some(pipeline), Some(binder), Some(layout), Some(vb), Some(ib), Some(ub)) = (
        ctx.pipeline,
        ctx.binder,
        ctx.binding_layout,
        ctx.vertex_buffer,
        ctx.index_buffer,
        ctx.uniform_buffer,
    ) else {
        log::error!("render called on a partially initialized context");
        return ctx.ring.current_slot();
    };

    let offsets = ctx.ring.offsets();

    // ── geometry upload ────────────────────────────────────────────────────
    // Append each list at the running cursors. A list that would push either
    // cursor past the slot capacity stops the upload: the remaining geometry
    // is dropped for this frame (soft limit, counted but not an error).
    let mut vertex_count: u32 = 0;
    let mut index_count: u32 = 0;
    let mut uploaded_lists = 0usize;
    ctx.index_scratch.clear();

    for list in &data.lists {
        let list_vertices = list.vertices.len() as u32;
        let list_indices = list.indices.len() as u32;

        if vertex_count + list_vertices > ctx.config.max_vertices_per_frame
            || index_count + list_indices > ctx.config.max_indices_per_frame
        {
            ctx.overflow_events += 1;
            log::debug!(
                "geometry overflow: dropped {} of {} lists this frame",
                data.lists.len() - uploaded_lists,
                data.lists.len()
            );
            break;
        }

        ctx.backend.write_buffer(
            vb,
            offsets.vertex_base + u64::from(vertex_count) * u64::from(crate::draw::UiVertex::STRIDE),
            bytemuck::cast_slice(&list.vertices),
        );

        // Indices accumulate contiguously and flush as one write below; an
        // odd-length list would otherwise leave the next write offset on a
        // 2-byte boundary, which buffer updates do not allow.
        ctx.index_scratch
            .extend_from_slice(bytemuck::cast_slice(&list.indices));

        vertex_count += list_vertices;
        index_count += list_indices;
        uploaded_lists += 1;
    }

    if !ctx.index_scratch.is_empty() {
        // The byte count rounds up to a 4-byte boundary; the pad bytes are
        // zero and never indexed. The slot window is rounded the same way,
        // so a full slot still fits.
        let padded = ctx.index_scratch.len().next_multiple_of(4);
        ctx.index_scratch.resize(padded, 0);
        ctx.backend
            .write_buffer(ib, offsets.index_base, &ctx.index_scratch);
    }

    // ── barriers ───────────────────────────────────────────────────────────
    rec.resource_barrier(&[
        BufferBarrier {
            buffer: vb,
            state: ResourceState::VertexAndConstantBuffer,
        },
        BufferBarrier {
            buffer: ib,
            state: ResourceState::IndexBuffer,
        },
    ]);

    // ── projection ─────────────────────────────────────────────────────────
    let matrix = scale_offset_matrix(data.display_pos, data.display_size);
    ctx.scale_offset = matrix;
    ctx.backend
        .write_buffer(ub, offsets.uniform_base, bytemuck::cast_slice(&matrix));

    // ── viewport / scissor basis ───────────────────────────────────────────
    let fb = data.framebuffer_scale;
    rec.set_viewport(
        0.0,
        0.0,
        data.display_size.x * fb.x,
        data.display_size.y * fb.y,
        0.0,
        1.0,
    );

    // Display position in physical pixels; subtracted from every clip rect.
    let origin = data.display_pos.scaled_by(fb);

    // ── command walk ───────────────────────────────────────────────────────
    let mut last_vertex_offset: u32 = 0;
    let mut last_index_offset: u32 = 0;
    let mut reset_pipeline = true;
    let mut last_texture: Option<crate::draw::UiTextureId> = None;

    for list in &data.lists[..uploaded_lists] {
        for cmd in &list.commands {
            if let Some(callback) = &cmd.callback {
                // The callback sees absolute offsets into the slot-wide
                // buffers, not list-local ones.
                let mut adjusted = cmd.clone();
                adjusted.index_offset = last_index_offset + cmd.index_offset;
                adjusted.vertex_offset = last_vertex_offset + cmd.vertex_offset;

                match callback {
                    DrawCallback::ResetRenderState => {}
                    DrawCallback::Custom(f) => f(list, &adjusted),
                }
                // Any callback invalidates bound state.
                reset_pipeline = true;
                continue;
            }

            if reset_pipeline {
                rec.bind_pipeline(pipeline);
                rec.bind_descriptors(
                    binder,
                    layout,
                    &[DescriptorParam::UniformBlock {
                        name: UNIFORM_BLOCK,
                        buffer: ub,
                        offset: offsets.uniform_base,
                    }],
                );
                rec.bind_index_buffer(ib, offsets.index_base);
                rec.bind_vertex_buffer(vb, offsets.vertex_base);
                reset_pipeline = false;
                // Force a fresh texture bind after any state reset.
                last_texture = None;
            }

            let clip_x = cmd.clip_rect[0] * fb.x;
            let clip_y = cmd.clip_rect[1] * fb.y;
            let clip_z = cmd.clip_rect[2] * fb.x;
            let clip_w = cmd.clip_rect[3] * fb.y;
            rec.set_scissor(
                (clip_x - origin.x) as u32,
                (clip_y - origin.y) as u32,
                (clip_z - clip_x) as u32,
                (clip_w - clip_y) as u32,
            );

            if last_texture != Some(cmd.texture) {
                if let Some(gpu) = resolve_texture(ctx, cmd.texture) {
                    rec.bind_descriptors(
                        binder,
                        layout,
                        &[
                            DescriptorParam::UniformBlock {
                                name: UNIFORM_BLOCK,
                                buffer: ub,
                                offset: offsets.uniform_base,
                            },
                            DescriptorParam::Texture {
                                name: COLOR_TEXTURE,
                                texture: gpu,
                            },
                        ],
                    );
                }
                last_texture = Some(cmd.texture);
            }

            rec.draw_indexed(
                cmd.elem_count,
                last_index_offset + cmd.index_offset,
                last_vertex_offset + cmd.vertex_offset,
            );
        }

        last_index_offset += list.indices.len() as u32;
        last_vertex_offset += list.vertices.len() as u32;
    }

    ctx.ring.advance()
}

/// Resolves a draw command's texture id, falling back to the font atlas for
/// ids no longer in the registry.
fn resolve_texture(ctx: &mut UiContext, id: crate::draw::UiTextureId) -> Option<TextureId> {
    if let Some(pair) = ctx.textures.get(id) {
        return Some(pair.gpu);
    }

    if !ctx.warned_missing_texture {
        log::warn!("draw command references unknown texture {id:?}; using font atlas");
        ctx.warned_missing_texture = true;
    }
    ctx.font_texture
        .and_then(|font| ctx.textures.get(font))
        .map(|pair| pair.gpu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mul(m: &[f32; 16], v: [f32; 4]) -> [f32; 4] {
        // Column-major: out = M * v.
        let mut out = [0.0f32; 4];
        for row in 0..4 {
            out[row] = (0..4).map(|col| m[col * 4 + row] * v[col]).sum();
        }
        out
    }

    #[test]
    fn projection_maps_display_corners_to_clip_corners() {
        let m = scale_offset_matrix(Vec2::zero(), Vec2::new(800.0, 600.0));

        let top_left = mul(&m, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(&top_left[..2], &[-1.0, 1.0]);

        let bottom_right = mul(&m, [800.0, 600.0, 0.0, 1.0]);
        assert_eq!(&bottom_right[..2], &[1.0, -1.0]);
    }

    #[test]
    fn projection_scalar_entries() {
        let m = scale_offset_matrix(Vec2::zero(), Vec2::new(800.0, 600.0));
        assert_eq!(m[0], 2.0 / 800.0);
        assert_eq!(m[5], -2.0 / 600.0);
        assert_eq!(m[10], 0.5);
        assert_eq!(m[12], -1.0);
        assert_eq!(m[13], 1.0);
        assert_eq!(m[14], 0.5);
    }

    #[test]
    fn projection_z_is_constant() {
        let m = scale_offset_matrix(Vec2::zero(), Vec2::new(100.0, 100.0));
        for p in [[0.0, 0.0], [50.0, 25.0], [100.0, 100.0]] {
            let out = mul(&m, [p[0], p[1], 0.0, 1.0]);
            assert_eq!(out[2], 0.5);
        }
    }

    #[test]
    fn projection_honors_display_position() {
        // A viewport whose logical origin is offset still maps its own
        // top-left corner to (-1, 1).
        let m = scale_offset_matrix(Vec2::new(100.0, 50.0), Vec2::new(200.0, 100.0));
        let top_left = mul(&m, [100.0, 50.0, 0.0, 1.0]);
        assert_eq!(&top_left[..2], &[-1.0, 1.0]);
        let bottom_right = mul(&m, [300.0, 150.0, 0.0, 1.0]);
        assert_eq!(&bottom_right[..2], &[1.0, -1.0]);
    }
}
