//! Render error taxonomy
//!
//! Every variant is fatal for the session: the pipeline degrades to a
//! black-screen no-op and reports the message once. There is no transient
//! class; draw calls on an initialized pipeline are assumed to succeed.

/// Errors raised while bringing up the render pipeline.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RenderError {
    /// The GPU driver does not support runtime shader compilation.
    #[error("this device does not support runtime shader compilation")]
    CapabilityUnavailable,

    /// A shader stage failed to compile; `log` is the driver's diagnostic.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    /// Program linking failed.
    #[error("shader program failed to link: {0}")]
    ShaderLink(String),

    /// A requested attribute or uniform is absent from the linked program.
    #[error("unknown shader symbol '{0}'")]
    UnknownSymbol(String),

    /// A GL object could not be allocated or assembled.
    #[error("GL resource creation failed: {0}")]
    GlCreate(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let err = RenderError::ShaderCompile {
            stage: "vertex",
            log: "0:3: syntax error".into(),
        };
        assert!(err.to_string().contains("vertex"));
        assert!(err.to_string().contains("syntax error"));

        let err = RenderError::UnknownSymbol("uColor".into());
        assert!(err.to_string().contains("uColor"));
    }
}
