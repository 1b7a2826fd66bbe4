//! Texture slots and pixel uploads

use crate::{RenderError, RenderResult};
use dear_imgui_rs::TextureId;
use std::borrow::Cow;
use std::collections::HashMap;

/// RGBA8 pixels ready to hand to a device
#[derive(Debug, Clone, PartialEq)]
pub struct TextureUpload<'a> {
    pub width: u32,
    pub height: u32,
    pub rgba: Cow<'a, [u8]>,
}

impl<'a> TextureUpload<'a> {
    /// Borrow tightly packed RGBA8 pixels
    pub fn rgba(width: u32, height: u32, pixels: &'a [u8]) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{width}x{height} RGBA texture needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba: Cow::Borrowed(pixels),
        })
    }

    /// Expand single-channel coverage into white RGBA8 pixels
    pub fn alpha8(width: u32, height: u32, pixels: &[u8]) -> RenderResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{width}x{height} alpha texture needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        let rgba = pixels
            .iter()
            .flat_map(|&alpha| [255, 255, 255, alpha])
            .collect::<Vec<u8>>();
        Ok(Self {
            width,
            height,
            rgba: Cow::Owned(rgba),
        })
    }
}

/// What a [`TextureId`] stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot<T> {
    /// A texture Dear ImGui asked the renderer to create (the font atlas and
    /// other library-managed textures). The renderer owns it.
    FontAtlas(T),
    /// A texture registered by the application. The application owns it.
    External(T),
}

impl<T: Copy> TextureSlot<T> {
    pub fn texture(&self) -> T {
        match *self {
            TextureSlot::FontAtlas(texture) | TextureSlot::External(texture) => texture,
        }
    }

    pub fn is_font_atlas(&self) -> bool {
        matches!(self, TextureSlot::FontAtlas(_))
    }
}

/// Maps Dear ImGui texture ids to device textures
#[derive(Debug)]
pub struct TextureRegistry<T> {
    slots: HashMap<u64, TextureSlot<T>>,
    next_id: u64,
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            // 0 is the null texture id
            next_id: 1,
        }
    }
}

impl<T: Copy> TextureRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a slot under a fresh id
    pub fn insert(&mut self, slot: TextureSlot<T>) -> TextureId {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.insert(id, slot);
        TextureId::new(id as _)
    }

    pub fn get(&self, id: TextureId) -> Option<&TextureSlot<T>> {
        self.slots.get(&Self::key(id))
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.slots.contains_key(&Self::key(id))
    }

    pub fn remove(&mut self, id: TextureId) -> Option<TextureSlot<T>> {
        self.slots.remove(&Self::key(id))
    }

    /// Texture to bind for `id`, or `fallback` for null and unknown ids
    pub fn resolve(&self, id: TextureId, fallback: T) -> T {
        self.get(id).map_or(fallback, TextureSlot::texture)
    }

    /// Remove every slot the renderer owns
    pub fn drain_font_atlases(&mut self) -> Vec<T> {
        let owned: Vec<u64> = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_font_atlas())
            .map(|(&id, _)| id)
            .collect();
        owned
            .into_iter()
            .filter_map(|id| self.slots.remove(&id))
            .map(|slot| slot.texture())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn key(id: TextureId) -> u64 {
        id.id() as u64
    }
}
