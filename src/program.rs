//! Shader program compilation and symbol lookup
//!
//! All methods taking a `&glow::Context` require that context to be current
//! on the calling thread.

use glow::HasContext;
use std::collections::HashMap;

use crate::error::RenderError;

/// A linked vertex+fragment program with cached symbol locations.
///
/// Attribute and uniform slots are resolved on first request and remembered
/// until the next `build`, so per-frame lookups cost a map probe rather than
/// a driver round-trip. Driver-assigned slots are never hardcoded.
pub struct ShaderProgram {
    program: Option<glow::NativeProgram>,
    attribs: HashMap<String, u32>,
    uniforms: HashMap<String, glow::NativeUniformLocation>,
}

impl Default for ShaderProgram {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderProgram {
    pub fn new() -> Self {
        Self {
            program: None,
            attribs: HashMap::new(),
            uniforms: HashMap::new(),
        }
    }

    /// Compile both stages and link them, replacing any previous program.
    ///
    /// Captures the driver's info log into the returned error on failure.
    /// Success invalidates every cached location.
    pub unsafe fn build(
        &mut self,
        gl: &glow::Context,
        vert_src: &str,
        frag_src: &str,
    ) -> Result<(), RenderError> {
        let vs = compile_stage(gl, glow::VERTEX_SHADER, "vertex", vert_src)?;
        let fs = match compile_stage(gl, glow::FRAGMENT_SHADER, "fragment", frag_src) {
            Ok(fs) => fs,
            Err(err) => {
                gl.delete_shader(vs);
                return Err(err);
            }
        };

        let program = match gl.create_program() {
            Ok(program) => program,
            Err(e) => {
                gl.delete_shader(vs);
                gl.delete_shader(fs);
                return Err(RenderError::GlCreate(format!("create_program: {e}")));
            }
        };
        gl.attach_shader(program, vs);
        gl.attach_shader(program, fs);
        gl.link_program(program);

        gl.detach_shader(program, vs);
        gl.detach_shader(program, fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(RenderError::ShaderLink(log));
        }

        if let Some(old) = self.program.take() {
            gl.delete_program(old);
        }
        self.program = Some(program);
        self.attribs.clear();
        self.uniforms.clear();
        Ok(())
    }

    /// Slot of a vertex attribute, cached per name.
    pub unsafe fn attrib(&mut self, gl: &glow::Context, name: &str) -> Result<u32, RenderError> {
        if let Some(&loc) = self.attribs.get(name) {
            return Ok(loc);
        }
        let loc = gl
            .get_attrib_location(self.handle(), name)
            .ok_or_else(|| RenderError::UnknownSymbol(name.to_string()))?;
        self.attribs.insert(name.to_string(), loc);
        Ok(loc)
    }

    /// Location of a uniform, cached per name.
    ///
    /// A name the linker discarded (or that never existed) yields
    /// `UnknownSymbol`.
    pub unsafe fn uniform(
        &mut self,
        gl: &glow::Context,
        name: &str,
    ) -> Result<glow::NativeUniformLocation, RenderError> {
        if let Some(&loc) = self.uniforms.get(name) {
            return Ok(loc);
        }
        let loc = gl
            .get_uniform_location(self.handle(), name)
            .ok_or_else(|| RenderError::UnknownSymbol(name.to_string()))?;
        self.uniforms.insert(name.to_string(), loc);
        Ok(loc)
    }

    /// Make this the active program for subsequent draws.
    ///
    /// Global GL state: exactly one program is active at a time, so callers
    /// activate right before the draws that depend on it. Repeat activation
    /// is harmless.
    pub unsafe fn activate(&self, gl: &glow::Context) {
        gl.use_program(Some(self.handle()));
    }

    fn handle(&self) -> glow::NativeProgram {
        self.program.expect("shader program used before build")
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    kind: u32,
    stage: &'static str,
    src: &str,
) -> Result<glow::NativeShader, RenderError> {
    let shader = gl
        .create_shader(kind)
        .map_err(|e| RenderError::GlCreate(format!("create_shader({stage}): {e}")))?;
    gl.shader_source(shader, src);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}
