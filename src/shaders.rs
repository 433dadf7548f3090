//! Shader source text for the two render passes
//!
//! The pipeline compiles whatever the host hands it; these are the stock
//! sources. The blob program must expose `aPosition`, `uModelViewM` and
//! `uColor`; the copy program must expose `aPosition` and sample `sTexture`
//! on unit 0.

/// One vertex+fragment source pair
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vert: &'static str,
    pub frag: &'static str,
}

/// The two programs a surface needs: blob accumulation and fullscreen copy
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub blob: ShaderSource,
    pub copy: ShaderSource,
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self {
            blob: ShaderSource {
                vert: BLOB_VERT,
                frag: BLOB_FRAG,
            },
            copy: ShaderSource {
                vert: COPY_VERT,
                frag: COPY_FRAG,
            },
        }
    }
}

pub const BLOB_VERT: &str = r#"#version 330 core
in vec2 aPosition;
uniform mat3 uModelViewM;
out vec2 vPosition;
void main() {
    vPosition = aPosition;
    vec3 pos = uModelViewM * vec3(aPosition, 1.0);
    gl_Position = vec4(pos.xy, 0.0, 1.0);
}
"#;

pub const BLOB_FRAG: &str = r#"#version 330 core
in vec2 vPosition;
uniform vec3 uColor;
out vec4 FragColor;
void main() {
    float fade = 1.0 - smoothstep(0.0, 1.0, length(vPosition));
    FragColor = vec4(uColor, fade);
}
"#;

pub const COPY_VERT: &str = r#"#version 330 core
in vec2 aPosition;
out vec2 vTexCoord;
void main() {
    vTexCoord = aPosition * 0.5 + 0.5;
    gl_Position = vec4(aPosition, 0.0, 1.0);
}
"#;

pub const COPY_FRAG: &str = r#"#version 330 core
in vec2 vTexCoord;
uniform sampler2D sTexture;
out vec4 FragColor;
void main() {
    FragColor = texture(sTexture, vTexCoord);
}
"#;
