//! Per-context GUI session state.
//!
//! Each [`crate::render::UiContext`] owns exactly one [`Session`]; there is no
//! process-wide "current session" global. The session holds the per-frame IO
//! snapshot the input bridge writes into, the hover regions the host's widget
//! layer registers for pointer-capture hit tests, the finalized draw data for
//! the frame, and the font atlas built once at startup.

mod atlas;
mod io;

pub use atlas::{FontAtlas, GlyphInfo};
pub use io::SessionIo;

use crate::coords::Rect;
use crate::draw::{DrawData, DrawList};

/// GUI session state owned by one context.
#[derive(Debug)]
pub struct Session {
    io: SessionIo,
    hover_regions: Vec<Rect>,
    draw_data: DrawData,
    atlas: FontAtlas,
}

impl Session {
    /// Builds a session, rasterizing a font atlas from `font_bytes` when
    /// given. Unparseable font data degrades to the plain white atlas rather
    /// than failing creation.
    pub(crate) fn new(font_bytes: Option<&[u8]>) -> Self {
        let atlas = match font_bytes {
            Some(bytes) => match FontAtlas::from_font_bytes(bytes, FontAtlas::DEFAULT_PX) {
                Ok(atlas) => atlas,
                Err(err) => {
                    log::warn!("font atlas build failed ({err}); using white atlas");
                    FontAtlas::white()
                }
            },
            None => FontAtlas::white(),
        };

        Self {
            io: SessionIo::default(),
            hover_regions: Vec::new(),
            draw_data: DrawData::default(),
            atlas,
        }
    }

    pub fn io(&self) -> &SessionIo {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut SessionIo {
        &mut self.io
    }

    pub fn atlas(&self) -> &FontAtlas {
        &self.atlas
    }

    /// Replaces the widget hit-test regions used for pointer capture.
    ///
    /// The host's widget layer refreshes these as layout changes; capture is
    /// evaluated against the regions last registered here.
    pub fn set_hover_regions(&mut self, regions: &[Rect]) {
        self.hover_regions.clear();
        self.hover_regions.extend_from_slice(regions);
    }

    /// Recomputes `want_capture_mouse` from the current pointer position.
    pub(crate) fn update_capture(&mut self) {
        let pos = self.io.mouse_pos;
        self.io.want_capture_mouse = self.hover_regions.iter().any(|r| r.contains(pos));
    }

    /// Stores the finalized draw data for this frame as-is.
    pub fn submit_draw_data(&mut self, data: DrawData) {
        self.draw_data = data;
    }

    /// Convenience: wraps `lists` in a [`DrawData`] stamped with the current
    /// display rectangle and framebuffer scale.
    pub fn submit_frame(&mut self, lists: Vec<DrawList>) {
        let data = DrawData {
            lists,
            display_pos: crate::coords::Vec2::zero(),
            display_size: self.io.display_size,
            framebuffer_scale: self.io.framebuffer_scale,
        };
        self.draw_data = data;
    }

    pub fn draw_data(&self) -> &DrawData {
        &self.draw_data
    }

    /// Moves the frame's draw data out so the translator can walk it while the
    /// context stays mutably borrowed. Paired with [`Session::restore_draw_data`].
    pub(crate) fn take_draw_data(&mut self) -> DrawData {
        std::mem::take(&mut self.draw_data)
    }

    pub(crate) fn restore_draw_data(&mut self, data: DrawData) {
        self.draw_data = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn capture_follows_hover_regions() {
        let mut session = Session::new(None);
        session.set_hover_regions(&[Rect::new(10.0, 10.0, 100.0, 20.0)]);

        session.io_mut().mouse_pos = Vec2::new(50.0, 15.0);
        session.update_capture();
        assert!(session.io().want_capture_mouse);

        session.io_mut().mouse_pos = Vec2::new(5.0, 5.0);
        session.update_capture();
        assert!(!session.io().want_capture_mouse);
    }

    #[test]
    fn capture_false_with_no_regions() {
        let mut session = Session::new(None);
        session.io_mut().mouse_pos = Vec2::new(1.0, 1.0);
        session.update_capture();
        assert!(!session.io().want_capture_mouse);
    }

    #[test]
    fn submit_frame_stamps_display_state() {
        let mut session = Session::new(None);
        session.io_mut().display_size = Vec2::new(800.0, 600.0);
        session.io_mut().framebuffer_scale = Vec2::new(2.0, 2.0);

        session.submit_frame(vec![DrawList::new()]);

        let data = session.draw_data();
        assert_eq!(data.display_size, Vec2::new(800.0, 600.0));
        assert_eq!(data.framebuffer_scale, Vec2::new(2.0, 2.0));
        assert_eq!(data.lists.len(), 1);
    }
}
