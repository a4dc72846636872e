use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Result of a successful compile.
///
/// `log` may carry non-fatal diagnostics; the caller logs them as warnings and
/// proceeds.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub bytecode: Vec<u8>,
    pub log: Option<String>,
}

/// Compile failure, with whatever diagnostics the compiler produced.
#[derive(Debug, Clone)]
pub struct CompileError {
    pub log: String,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader compile error: {}", self.log)
    }
}

impl std::error::Error for CompileError {}

/// Opaque source-text → bytecode collaborator.
pub trait ShaderCompiler {
    fn compile(
        &self,
        stage: ShaderStage,
        name: &str,
        entry_point: &str,
        source: &str,
    ) -> Result<CompiledShader, CompileError>;
}

/// Pass-through compiler for backends that consume WGSL directly.
///
/// The "bytecode" is the UTF-8 source; compilation proper happens inside the
/// backend's shader-module creation. Only cheap structural checks run here so
/// a missing entry point fails at create time rather than at first draw.
#[derive(Debug, Default)]
pub struct WgslCompiler;

impl WgslCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl ShaderCompiler for WgslCompiler {
    fn compile(
        &self,
        stage: ShaderStage,
        name: &str,
        entry_point: &str,
        source: &str,
    ) -> Result<CompiledShader, CompileError> {
        if source.trim().is_empty() {
            return Err(CompileError {
                log: format!("{name}: empty shader source"),
            });
        }

        let needle = format!("fn {entry_point}");
        if !source.contains(&needle) {
            return Err(CompileError {
                log: format!("{name}: entry point `{entry_point}` not found ({stage:?})"),
            });
        }

        Ok(CompiledShader {
            bytecode: source.as_bytes().to_vec(),
            log: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = "fn vs_main() {}\nfn fs_main() {}";

    #[test]
    fn passthrough_accepts_known_entry_point() {
        let out = WgslCompiler::new()
            .compile(ShaderStage::Vertex, "ui", "vs_main", SRC)
            .unwrap();
        assert_eq!(out.bytecode, SRC.as_bytes());
        assert!(out.log.is_none());
    }

    #[test]
    fn passthrough_rejects_missing_entry_point() {
        let err = WgslCompiler::new()
            .compile(ShaderStage::Fragment, "ui", "fs_other", SRC)
            .unwrap_err();
        assert!(err.log.contains("fs_other"));
    }

    #[test]
    fn passthrough_rejects_empty_source() {
        assert!(
            WgslCompiler::new()
                .compile(ShaderStage::Vertex, "ui", "vs_main", "  ")
                .is_err()
        );
    }
}
