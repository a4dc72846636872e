use std::collections::HashMap;

use crate::gpu::{ImageFormat, RawImage};

// Fixed atlas width; height grows shelf by shelf to fit the glyph set.
const ATLAS_WIDTH: u32 = 512;
const PADDING: u32 = 1;
// A small solid block at the atlas origin so untextured quads can sample it.
const WHITE_BLOCK: u32 = 4;

// Printable ASCII.
const FIRST_CHAR: char = ' ';
const LAST_CHAR: char = '~';

/// Placement and metrics for one rasterized glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphInfo {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Bitmap extent in pixels.
    pub size: [f32; 2],
    /// Offset from the pen position to the bitmap's top-left.
    pub offset: [f32; 2],
    pub advance: f32,
}

/// RGBA8 font atlas built once at initialization and uploaded through the
/// image collaborator. Pixels are white with coverage in alpha, so the UI
/// shader's `texture * vertex color` works for both glyphs and solid fills.
///
/// Shaping and layout are the host's concern; the atlas only exposes raw
/// pixels and per-glyph placement.
#[derive(Debug)]
pub struct FontAtlas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    glyphs: HashMap<char, GlyphInfo>,
    white_uv: [f32; 2],
}

impl FontAtlas {
    /// Pixel size glyphs are rasterized at.
    pub const DEFAULT_PX: f32 = 13.0;

    /// Minimal all-white atlas used when no font is supplied.
    pub fn white() -> Self {
        let width = WHITE_BLOCK;
        let height = WHITE_BLOCK;
        Self {
            width,
            height,
            pixels: vec![0xFF; (width * height * 4) as usize],
            glyphs: HashMap::new(),
            white_uv: [0.5, 0.5],
        }
    }

    /// Rasterizes printable ASCII from a TrueType/OpenType font at `px`.
    pub fn from_font_bytes(bytes: &[u8], px: f32) -> Result<Self, &'static str> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())?;

        // Pass 1: rasterize everything and shelf-pack placements.
        let mut rasterized = Vec::new();
        let mut cursor_x = WHITE_BLOCK + PADDING;
        let mut cursor_y = PADDING;
        let mut row_height = WHITE_BLOCK;

        for ch in FIRST_CHAR..=LAST_CHAR {
            let (metrics, bitmap) = font.rasterize(ch, px);
            let w = metrics.width as u32;
            let h = metrics.height as u32;

            if cursor_x + w + PADDING > ATLAS_WIDTH {
                cursor_x = PADDING;
                cursor_y += row_height + PADDING;
                row_height = 0;
            }

            rasterized.push((ch, metrics, bitmap, cursor_x, cursor_y));
            cursor_x += w + PADDING;
            row_height = row_height.max(h);
        }

        let width = ATLAS_WIDTH;
        let height = (cursor_y + row_height + PADDING).next_multiple_of(4);
        let mut pixels = vec![0u8; (width * height * 4) as usize];

        // Solid block at the origin.
        for y in 0..WHITE_BLOCK {
            for x in 0..WHITE_BLOCK {
                let at = ((y * width + x) * 4) as usize;
                pixels[at..at + 4].copy_from_slice(&[0xFF; 4]);
            }
        }

        // Pass 2: blit coverage as alpha over white.
        let mut glyphs = HashMap::new();
        let wf = width as f32;
        let hf = height as f32;
        for (ch, metrics, bitmap, gx, gy) in rasterized {
            let gw = metrics.width as u32;
            let gh = metrics.height as u32;
            for y in 0..gh {
                for x in 0..gw {
                    let coverage = bitmap[(y * gw + x) as usize];
                    let at = (((gy + y) * width + gx + x) * 4) as usize;
                    pixels[at..at + 4].copy_from_slice(&[0xFF, 0xFF, 0xFF, coverage]);
                }
            }
            glyphs.insert(
                ch,
                GlyphInfo {
                    uv_min: [gx as f32 / wf, gy as f32 / hf],
                    uv_max: [(gx + gw) as f32 / wf, (gy + gh) as f32 / hf],
                    size: [metrics.width as f32, metrics.height as f32],
                    offset: [metrics.xmin as f32, metrics.ymin as f32],
                    advance: metrics.advance_width,
                },
            );
        }

        Ok(Self {
            width,
            height,
            pixels,
            glyphs,
            white_uv: [
                WHITE_BLOCK as f32 * 0.5 / wf,
                WHITE_BLOCK as f32 * 0.5 / hf,
            ],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphInfo> {
        self.glyphs.get(&ch)
    }

    /// UV of a guaranteed-opaque white texel, for untextured fills.
    pub fn white_uv(&self) -> [f32; 2] {
        self.white_uv
    }

    /// The pixels handed to the image-upload collaborator.
    pub fn raw_image(&self) -> RawImage<'_> {
        RawImage {
            pixels: &self.pixels,
            format: ImageFormat::Rgba8Unorm,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_atlas_is_fully_opaque() {
        let atlas = FontAtlas::white();
        assert!(atlas.pixels.iter().all(|&b| b == 0xFF));
        assert_eq!(
            atlas.pixels.len(),
            (atlas.width() * atlas.height() * 4) as usize
        );
    }

    #[test]
    fn raw_image_dimensions_match() {
        let atlas = FontAtlas::white();
        let img = atlas.raw_image();
        assert_eq!(img.width, atlas.width());
        assert_eq!(img.height, atlas.height());
        assert_eq!(img.pixels.len(), (img.width * img.height * 4) as usize);
    }

    #[test]
    fn bad_font_bytes_are_rejected() {
        assert!(FontAtlas::from_font_bytes(&[0, 1, 2, 3], 13.0).is_err());
    }
}
