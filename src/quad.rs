//! The shared unit quad
//!
//! Both passes draw the same four-vertex triangle strip spanning [-1,1]².
//! The position attribute is re-pointed per pass at whatever slot the active
//! program reports, since the two programs need not agree on it.

use glow::HasContext;

use crate::error::RenderError;

/// Unit square in NDC, triangle-strip order
const QUAD: [f32; 8] = [-1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0, -1.0];

pub struct QuadGeometry {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl QuadGeometry {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, RenderError> {
        let vao = gl
            .create_vertex_array()
            .map_err(|e| RenderError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = match gl.create_buffer() {
            Ok(vbo) => vbo,
            Err(e) => {
                gl.delete_vertex_array(vao);
                return Err(RenderError::GlCreate(format!("create_buffer: {e}")));
            }
        };

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        let bytes = core::slice::from_raw_parts(
            QUAD.as_ptr() as *const u8,
            QUAD.len() * core::mem::size_of::<f32>(),
        );
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytes, glow::STATIC_DRAW);
        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(Self { vao, vbo })
    }

    /// Bind the quad and point the given attribute slot at its vertices.
    pub unsafe fn bind(&self, gl: &glow::Context, position_attrib: u32) {
        gl.bind_vertex_array(Some(self.vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
        gl.enable_vertex_attrib_array(position_attrib);
        gl.vertex_attrib_pointer_f32(position_attrib, 2, glow::FLOAT, false, 0, 0);
    }

    /// Issue the strip. Call `bind` for the active program first.
    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
    }

    pub unsafe fn destroy(&self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}
