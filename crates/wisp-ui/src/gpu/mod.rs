//! GPU abstraction seam.
//!
//! The render core never talks to a graphics API directly; it issues calls
//! against the traits in this module. [`RenderBackend`] covers resource
//! creation/destruction and buffer writes, [`CommandRecorder`] covers the
//! per-frame command stream, and [`ShaderCompiler`] is the opaque source →
//! bytecode collaborator. `wgpu_backend` provides the production
//! implementation; tests substitute recording mocks.

mod backend;
mod recorder;
mod shader;
mod types;

pub mod wgpu_backend;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::RenderBackend;
pub use recorder::{CommandRecorder, DescriptorParam};
pub use shader::{CompileError, CompiledShader, ShaderCompiler, ShaderStage, WgslCompiler};
pub use types::*;
