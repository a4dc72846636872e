use crate::coords::Vec2;

/// Per-frame GUI input/output snapshot.
///
/// Written by the pointer bridge and [`crate::render::UiContext::set_window_size`];
/// read by the frame translator for display geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionIo {
    /// Logical display size in pixels.
    pub display_size: Vec2,
    /// DPI multiplier from logical units to physical pixels.
    pub framebuffer_scale: Vec2,
    /// Pointer position in display space (logical pixels).
    pub mouse_pos: Vec2,
    /// Primary / secondary button state.
    pub mouse_down: [bool; 2],
    /// Frame delta time, forwarded as provided by the host.
    pub delta_time_ms: f32,
    /// Whether the GUI claims pointer focus this frame.
    pub want_capture_mouse: bool,
}

impl Default for SessionIo {
    fn default() -> Self {
        Self {
            display_size: Vec2::zero(),
            framebuffer_scale: Vec2::splat(1.0),
            mouse_pos: Vec2::zero(),
            mouse_down: [false; 2],
            delta_time_ms: 0.0,
            want_capture_mouse: false,
        }
    }
}
