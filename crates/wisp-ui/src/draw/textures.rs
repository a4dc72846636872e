use std::collections::HashMap;

use crate::gpu::{ImageInfo, TextureId};

/// Stable integer id carried by draw commands in place of a raw texture
/// pointer. Resolved through the [`TextureRegistry`] at translation time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UiTextureId(pub u32);

/// CPU-side image metadata coupled with the owning GPU texture.
#[derive(Debug, Copy, Clone)]
pub struct TexturePair {
    pub cpu: ImageInfo,
    pub gpu: TextureId,
}

/// Maps [`UiTextureId`]s to their texture pairs.
///
/// Ids are never reused within a registry's lifetime, so a stale id in a
/// recorded draw list resolves to `None` instead of a dangling object.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    next: u32,
    entries: HashMap<u32, TexturePair>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: TexturePair) -> UiTextureId {
        let id = UiTextureId(self.next);
        self.next += 1;
        self.entries.insert(id.0, pair);
        id
    }

    pub fn get(&self, id: UiTextureId) -> Option<&TexturePair> {
        self.entries.get(&id.0)
    }

    pub fn remove(&mut self, id: UiTextureId) -> Option<TexturePair> {
        self.entries.remove(&id.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drains every pair for teardown.
    pub fn drain(&mut self) -> impl Iterator<Item = TexturePair> + '_ {
        self.entries.drain().map(|(_, pair)| pair)
    }
}
