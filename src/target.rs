//! Offscreen accumulation target (FBO + color texture)
//!
//! All methods taking a `&glow::Context` require that context to be current
//! on the calling thread.

use glow::HasContext;

use crate::error::RenderError;

/// A color buffer sized exactly to the visible surface.
///
/// Blobs are accumulated here before the copy pass samples the texture back
/// onto the screen. A size change discards the whole target and allocates a
/// fresh one; storage is never resized in place.
pub struct RenderTarget {
    fbo: glow::NativeFramebuffer,
    tex: glow::NativeTexture,
    width: i32,
    height: i32,
}

impl RenderTarget {
    /// Allocate an RGBA8 texture and framebuffer at the given pixel size.
    pub unsafe fn new(gl: &glow::Context, width: i32, height: i32) -> Result<Self, RenderError> {
        let width = width.max(1);
        let height = height.max(1);

        let fbo = gl
            .create_framebuffer()
            .map_err(|e| RenderError::GlCreate(format!("create_framebuffer: {e}")))?;
        let tex = match gl.create_texture() {
            Ok(tex) => tex,
            Err(e) => {
                gl.delete_framebuffer(fbo);
                return Err(RenderError::GlCreate(format!("create_texture: {e}")));
            }
        };

        gl.bind_texture(glow::TEXTURE_2D, Some(tex));
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            width,
            height,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );

        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
        gl.framebuffer_texture_2d(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::TEXTURE_2D,
            Some(tex),
            0,
        );

        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        if status != glow::FRAMEBUFFER_COMPLETE {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.delete_framebuffer(fbo);
            gl.delete_texture(tex);
            return Err(RenderError::GlCreate(format!(
                "framebuffer incomplete: 0x{status:x}"
            )));
        }

        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.bind_texture(glow::TEXTURE_2D, None);

        Ok(Self {
            fbo,
            tex,
            width,
            height,
        })
    }

    /// Route subsequent draws into this target, viewport included.
    pub unsafe fn bind_for_write(&self, gl: &glow::Context) {
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.fbo));
        gl.viewport(0, 0, self.width, self.height);
    }

    /// Texture holding the most recently rendered contents.
    ///
    /// Valid for sampling once the framebuffer has been unbound.
    pub fn color_texture(&self) -> glow::NativeTexture {
        self.tex
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Release the GL objects. The target is unusable afterwards.
    pub unsafe fn destroy(self, gl: &glow::Context) {
        gl.delete_framebuffer(self.fbo);
        gl.delete_texture(self.tex);
    }
}
