//! Input-system seam and the pointer bridge.
//!
//! The external input system exposes scalar readers keyed by a contiguous id
//! block; the bridge allocates that block once, maps the two pointer axes and
//! the primary/secondary buttons into it, and copies resolved values into the
//! session IO each frame.

use crate::coords::Vec2;
use crate::session::SessionIo;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerAxis {
    X,
    Y,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// External input system.
///
/// Axis values are normalized to `[0, 1]` over the pointer's surface; the
/// bridge scales them into display space.
pub trait InputSource {
    /// Whether a pointer device is present at all.
    fn has_pointer(&self) -> bool;

    /// Reserves `count` consecutive ids and returns the first.
    fn allocate_id_block(&self, count: u32) -> u32;

    fn map_pointer_axis(&self, id: u32, axis: PointerAxis);
    fn map_pointer_button(&self, id: u32, button: PointerButton);

    fn axis_value(&self, id: u32) -> f32;
    fn button_value(&self, id: u32) -> bool;
}

// Slot layout within the allocated id block.
const POINTER_X: u32 = 0;
const POINTER_Y: u32 = 1;
const BUTTON_PRIMARY: u32 = 2;
const BUTTON_SECONDARY: u32 = 3;
const ID_COUNT: u32 = 4;

/// Maps pointer state from an [`InputSource`] into [`SessionIo`].
#[derive(Debug)]
pub struct PointerBridge {
    base_id: u32,
    mapped: bool,
}

impl PointerBridge {
    /// Allocates the id block and installs the axis/button mappings.
    ///
    /// Without a pointer device the bridge stays inert and `update` only
    /// forwards delta time.
    pub fn new(input: &dyn InputSource) -> Self {
        let base_id = input.allocate_id_block(ID_COUNT);
        let mapped = input.has_pointer();

        if mapped {
            input.map_pointer_axis(base_id + POINTER_X, PointerAxis::X);
            input.map_pointer_axis(base_id + POINTER_Y, PointerAxis::Y);
            input.map_pointer_button(base_id + BUTTON_PRIMARY, PointerButton::Primary);
            input.map_pointer_button(base_id + BUTTON_SECONDARY, PointerButton::Secondary);
        } else {
            log::debug!("no pointer device; input bridge inert");
        }

        Self { base_id, mapped }
    }

    /// Reads the resolved pointer state into `io`.
    ///
    /// Position is scaled from normalized device range into display space by
    /// the current display size; delta time is forwarded as provided.
    pub fn update(&self, input: &dyn InputSource, io: &mut SessionIo, delta_time_ms: f64) {
        io.delta_time_ms = delta_time_ms as f32;

        if !self.mapped {
            return;
        }

        io.mouse_pos = Vec2::new(
            input.axis_value(self.base_id + POINTER_X) * io.display_size.x,
            input.axis_value(self.base_id + POINTER_Y) * io.display_size.y,
        );
        io.mouse_down = [
            input.button_value(self.base_id + BUTTON_PRIMARY),
            input.button_value(self.base_id + BUTTON_SECONDARY),
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::mock::MockInput;

    #[test]
    fn update_scales_position_by_display_size() {
        let input = MockInput::with_pointer(0.5, 0.25, [true, false]);
        let bridge = PointerBridge::new(&input);

        let mut io = SessionIo::default();
        io.display_size = Vec2::new(800.0, 600.0);
        bridge.update(&input, &mut io, 16.0);

        assert_eq!(io.mouse_pos, Vec2::new(400.0, 150.0));
        assert_eq!(io.mouse_down, [true, false]);
        assert_eq!(io.delta_time_ms, 16.0);
    }

    #[test]
    fn update_without_pointer_only_forwards_delta_time() {
        let input = MockInput::without_pointer();
        let bridge = PointerBridge::new(&input);

        let mut io = SessionIo::default();
        io.display_size = Vec2::new(800.0, 600.0);
        bridge.update(&input, &mut io, 8.0);

        assert_eq!(io.mouse_pos, Vec2::zero());
        assert_eq!(io.delta_time_ms, 8.0);
    }

    #[test]
    fn mappings_land_in_allocated_block() {
        let input = MockInput::with_pointer(0.0, 0.0, [false, false]);
        let _bridge = PointerBridge::new(&input);
        assert_eq!(input.mapped_axes(), 2);
        assert_eq!(input.mapped_buttons(), 2);
    }
}
