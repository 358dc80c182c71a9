/// Setup-time failures
use thiserror::Error;

use crate::solids::SolidKind;

/// Shader stage reported in compile diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Every error here is fatal: it is raised during setup and rendering must not start.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no graphics context available: {0}")]
    ContextUnavailable(String),

    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("shader program failed to link: {0}")]
    ShaderLink(String),

    #[error("could not allocate {0} buffer")]
    BufferAllocation(&'static str),

    #[error("invalid {kind:?} geometry: {reason}")]
    InvalidGeometry { kind: SolidKind, reason: String },

    #[error("invalid scene configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_error_carries_log() {
        let err = Error::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: 'vColor' : undeclared identifier".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("fragment shader failed to compile"));
        assert!(msg.contains("undeclared identifier"));
    }
}
