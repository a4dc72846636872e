//! Recording test doubles for the GPU and input seams.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::input::{InputSource, PointerAxis, PointerButton};

use super::backend::RenderBackend;
use super::recorder::{CommandRecorder, DescriptorParam};
use super::types::{
    BinderDesc, BinderId, BindingLayoutDesc, BindingLayoutId, BufferBarrier, BufferDesc, BufferId,
    PipelineDesc, PipelineId, RawImage, SamplerDesc, SamplerId, ShaderDesc, ShaderId, TextureId,
};

/// One recorded `write_buffer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub buffer: BufferId,
    pub offset: u64,
    pub len: usize,
}

/// Backend double that mints handles from one counter and records every
/// creation, destruction, and buffer write.
#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: Cell<u64>,
    live: RefCell<HashSet<u64>>,
    writes: RefCell<Vec<WriteRecord>>,
    destroyed_samplers: Cell<usize>,
    destroyed_textures: Cell<usize>,
    fail_pipelines: Cell<bool>,
    fail_buffers: Cell<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_pipelines(&self, fail: bool) {
        self.fail_pipelines.set(fail);
    }

    pub fn fail_buffers(&self, fail: bool) {
        self.fail_buffers.set(fail);
    }

    /// Objects created and not yet destroyed.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn destroyed_samplers(&self) -> usize {
        self.destroyed_samplers.get()
    }

    pub fn destroyed_textures(&self) -> usize {
        self.destroyed_textures.get()
    }

    pub fn writes(&self) -> Vec<WriteRecord> {
        self.writes.borrow().clone()
    }

    fn mint(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id);
        id
    }

    fn release(&self, id: u64) -> bool {
        self.live.borrow_mut().remove(&id)
    }
}

impl RenderBackend for MockBackend {
    fn create_sampler(&self, _desc: &SamplerDesc) -> Option<SamplerId> {
        Some(SamplerId(self.mint()))
    }

    fn create_shader(&self, _desc: &ShaderDesc<'_>) -> Option<ShaderId> {
        Some(ShaderId(self.mint()))
    }

    fn create_binding_layout(&self, _desc: &BindingLayoutDesc<'_>) -> Option<BindingLayoutId> {
        Some(BindingLayoutId(self.mint()))
    }

    fn create_pipeline(&self, _desc: &PipelineDesc<'_>) -> Option<PipelineId> {
        if self.fail_pipelines.get() {
            return None;
        }
        Some(PipelineId(self.mint()))
    }

    fn create_binder(&self, _desc: &BinderDesc) -> Option<BinderId> {
        Some(BinderId(self.mint()))
    }

    fn create_buffer(&self, _desc: &BufferDesc) -> Option<BufferId> {
        if self.fail_buffers.get() {
            return None;
        }
        Some(BufferId(self.mint()))
    }

    fn upload_texture(&self, _image: &RawImage<'_>) -> Option<TextureId> {
        Some(TextureId(self.mint()))
    }

    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]) {
        self.writes.borrow_mut().push(WriteRecord {
            buffer,
            offset,
            len: data.len(),
        });
    }

    fn destroy_sampler(&self, id: SamplerId) {
        if self.release(id.0) {
            self.destroyed_samplers.set(self.destroyed_samplers.get() + 1);
        }
    }

    fn destroy_shader(&self, id: ShaderId) {
        self.release(id.0);
    }

    fn destroy_binding_layout(&self, id: BindingLayoutId) {
        self.release(id.0);
    }

    fn destroy_pipeline(&self, id: PipelineId) {
        self.release(id.0);
    }

    fn destroy_binder(&self, id: BinderId) {
        self.release(id.0);
    }

    fn destroy_buffer(&self, id: BufferId) {
        self.release(id.0);
    }

    fn destroy_texture(&self, id: TextureId) {
        if self.release(id.0) {
            self.destroyed_textures.set(self.destroyed_textures.get() + 1);
        }
    }
}

/// One command appended to a [`MockRecorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecEvent {
    Barrier(usize),
    BindPipeline(PipelineId),
    /// Texture named in the descriptor update, when one was.
    BindDescriptors(Option<TextureId>),
    BindIndexBuffer(BufferId, u64),
    BindVertexBuffer(BufferId, u64),
    Viewport(f32, f32),
    Scissor(u32, u32, u32, u32),
    Draw(u32, u32, u32),
}

#[derive(Debug, Default)]
pub struct MockRecorder {
    events: Vec<RecEvent>,
}

impl MockRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RecEvent] {
        &self.events
    }

    /// `(count, first_index, base_vertex)` per draw, in order.
    pub fn draw_calls(&self) -> Vec<(u32, u32, u32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RecEvent::Draw(count, first, base) => Some((*count, *first, *base)),
                _ => None,
            })
            .collect()
    }

    /// Descriptor updates that carried a texture.
    pub fn texture_binds(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, RecEvent::BindDescriptors(Some(_))))
            .count()
    }
}

impl CommandRecorder for MockRecorder {
    fn resource_barrier(&mut self, barriers: &[BufferBarrier]) {
        self.events.push(RecEvent::Barrier(barriers.len()));
    }

    fn bind_pipeline(&mut self, pipeline: PipelineId) {
        self.events.push(RecEvent::BindPipeline(pipeline));
    }

    fn bind_descriptors(
        &mut self,
        _binder: BinderId,
        _layout: BindingLayoutId,
        params: &[DescriptorParam<'_>],
    ) {
        let texture = params.iter().find_map(|p| match p {
            DescriptorParam::Texture { texture, .. } => Some(*texture),
            _ => None,
        });
        self.events.push(RecEvent::BindDescriptors(texture));
    }

    fn bind_index_buffer(&mut self, buffer: BufferId, offset: u64) {
        self.events.push(RecEvent::BindIndexBuffer(buffer, offset));
    }

    fn bind_vertex_buffer(&mut self, buffer: BufferId, offset: u64) {
        self.events.push(RecEvent::BindVertexBuffer(buffer, offset));
    }

    fn set_viewport(&mut self, _x: f32, _y: f32, w: f32, h: f32, _min: f32, _max: f32) {
        self.events.push(RecEvent::Viewport(w, h));
    }

    fn set_scissor(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.events.push(RecEvent::Scissor(x, y, w, h));
    }

    fn draw_indexed(&mut self, count: u32, first_index: u32, base_vertex: u32) {
        self.events.push(RecEvent::Draw(count, first_index, base_vertex));
    }
}

/// Input double with a fixed pointer snapshot.
#[derive(Debug)]
pub struct MockInput {
    has_pointer: bool,
    x: f32,
    y: f32,
    buttons: [bool; 2],
    next_id: Cell<u32>,
    axis_ids: RefCell<Vec<(u32, PointerAxis)>>,
    button_ids: RefCell<Vec<(u32, PointerButton)>>,
}

impl MockInput {
    pub fn with_pointer(x: f32, y: f32, buttons: [bool; 2]) -> Self {
        Self {
            has_pointer: true,
            x,
            y,
            buttons,
            next_id: Cell::new(0),
            axis_ids: RefCell::new(Vec::new()),
            button_ids: RefCell::new(Vec::new()),
        }
    }

    pub fn without_pointer() -> Self {
        Self {
            has_pointer: false,
            ..Self::with_pointer(0.0, 0.0, [false, false])
        }
    }

    pub fn mapped_axes(&self) -> usize {
        self.axis_ids.borrow().len()
    }

    pub fn mapped_buttons(&self) -> usize {
        self.button_ids.borrow().len()
    }
}

impl InputSource for MockInput {
    fn has_pointer(&self) -> bool {
        self.has_pointer
    }

    fn allocate_id_block(&self, count: u32) -> u32 {
        let base = self.next_id.get();
        self.next_id.set(base + count);
        base
    }

    fn map_pointer_axis(&self, id: u32, axis: PointerAxis) {
        self.axis_ids.borrow_mut().push((id, axis));
    }

    fn map_pointer_button(&self, id: u32, button: PointerButton) {
        self.button_ids.borrow_mut().push((id, button));
    }

    fn axis_value(&self, id: u32) -> f32 {
        match self.axis_ids.borrow().iter().find(|(i, _)| *i == id) {
            Some((_, PointerAxis::X)) => self.x,
            Some((_, PointerAxis::Y)) => self.y,
            None => 0.0,
        }
    }

    fn button_value(&self, id: u32) -> bool {
        match self.button_ids.borrow().iter().find(|(i, _)| *i == id) {
            Some((_, PointerButton::Primary)) => self.buttons[0],
            Some((_, PointerButton::Secondary)) => self.buttons[1],
            None => false,
        }
    }
}
