//! Wisp UI render bindings.
//!
//! This crate translates an immediate-mode GUI's finalized per-frame draw data
//! into GPU command-buffer operations, with a multi-frame ring of geometry
//! buffers so the CPU never overwrites data the device may still be reading.
//! The GPU itself is reached through the trait seams in [`gpu`]; a wgpu-backed
//! implementation ships in [`gpu::wgpu_backend`].

pub mod logging;
pub mod coords;
pub mod gpu;
pub mod draw;
pub mod session;
pub mod input;
pub mod render;
