//! Frame orchestration
//!
//! One `Pipeline` instance owns everything a surface needs: the blob set, the
//! two shader programs, the shared quad and the offscreen accumulation
//! target. The host drives it through three entry points (created, resized,
//! frame) serially on the rendering thread.
//!
//! Setup failures are permanent for the session: the pipeline reports once
//! through the error sink and every later frame clears to black.

use glow::HasContext;
use std::sync::mpsc::Sender;

use crate::blobs::BlobSet;
use crate::error::RenderError;
use crate::program::ShaderProgram;
use crate::quad::QuadGeometry;
use crate::settings::Settings;
use crate::shaders::ShaderSources;
use crate::target::RenderTarget;
use crate::util::Rng;

enum State {
    Uninitialized,
    Ready(Passes),
    Degraded,
}

/// GPU resources that exist only while the pipeline is ready
struct Passes {
    blob: ShaderProgram,
    copy: ShaderProgram,
    quad: QuadGeometry,
}

pub struct Pipeline {
    state: State,
    blobs: BlobSet,
    offscreen: Option<RenderTarget>,
    width: i32,
    height: i32,
    aspect: [f32; 2],
    errors: Sender<String>,
}

impl Pipeline {
    /// Build a pipeline for `settings`, with motion seeded by `seed`.
    ///
    /// Fatal setup failures are reported through `errors`, at most once per
    /// session.
    pub fn new(settings: &Settings, seed: u64, errors: Sender<String>) -> Self {
        Self {
            state: State::Uninitialized,
            blobs: BlobSet::new(
                settings.blob_count(),
                settings.travel_range(),
                Rng::new(seed),
            ),
            offscreen: None,
            width: 0,
            height: 0,
            aspect: [1.0, 1.0],
            errors,
        }
    }

    /// Bring up GPU state once the surface exists.
    ///
    /// Degrades permanently if the driver cannot compile shaders at runtime
    /// or either host-supplied program fails to build.
    pub unsafe fn on_surface_created(&mut self, gl: &glow::Context, sources: &ShaderSources) {
        if gl.get_parameter_i32(glow::SHADER_COMPILER) == 0 {
            self.degrade(RenderError::CapabilityUnavailable);
            return;
        }

        match build_passes(gl, sources) {
            Ok(passes) => {
                self.state = State::Ready(passes);
                log::info!("render pipeline ready");
            }
            Err(err) => self.degrade(err),
        }
    }

    /// Track the surface size: viewport, aspect correction, and a fresh
    /// offscreen target at the new dimensions (the old one is discarded).
    pub unsafe fn on_surface_resized(&mut self, gl: &glow::Context, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
        gl.viewport(0, 0, self.width, self.height);
        self.aspect = aspect_ratio(self.width, self.height);

        if let Some(old) = self.offscreen.take() {
            old.destroy(gl);
        }
        match RenderTarget::new(gl, self.width, self.height) {
            Ok(target) => self.offscreen = Some(target),
            Err(err) => self.degrade(err),
        }
        log::debug!("surface resized to {}x{}", self.width, self.height);
    }

    /// Render one frame at timestamp `now` (milliseconds, monotonic).
    ///
    /// Outside the ready state this only clears the screen to opaque black.
    pub unsafe fn on_frame(&mut self, gl: &glow::Context, now: i64) {
        let result = match &mut self.state {
            State::Ready(passes) => {
                self.blobs.update(now);
                let target = self
                    .offscreen
                    .as_ref()
                    .expect("on_surface_resized must run before on_frame");
                render_frame(
                    gl,
                    passes,
                    &self.blobs,
                    target,
                    self.aspect,
                    (self.width, self.height),
                )
            }
            _ => {
                clear_black(gl);
                return;
            }
        };

        if let Err(err) = result {
            self.degrade(err);
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.state, State::Degraded)
    }

    /// Enter the permanent degraded state and emit the one session error.
    fn degrade(&mut self, err: RenderError) {
        if self.is_degraded() {
            return;
        }
        log::debug!("pipeline degrading: {err}");
        let _ = self.errors.send(err.to_string());
        self.state = State::Degraded;
    }
}

unsafe fn build_passes(
    gl: &glow::Context,
    sources: &ShaderSources,
) -> Result<Passes, RenderError> {
    let mut blob = ShaderProgram::new();
    blob.build(gl, sources.blob.vert, sources.blob.frag)?;
    let mut copy = ShaderProgram::new();
    copy.build(gl, sources.copy.vert, sources.copy.frag)?;
    let quad = QuadGeometry::new(gl)?;
    Ok(Passes { blob, copy, quad })
}

unsafe fn render_frame(
    gl: &glow::Context,
    passes: &mut Passes,
    blobs: &BlobSet,
    target: &RenderTarget,
    aspect: [f32; 2],
    surface: (i32, i32),
) -> Result<(), RenderError> {
    gl.disable(glow::DEPTH_TEST);
    gl.disable(glow::CULL_FACE);

    // Accumulation pass: every blob into the offscreen buffer.
    passes.blob.activate(gl);
    let u_model = passes.blob.uniform(gl, "uModelViewM")?;
    let u_color = passes.blob.uniform(gl, "uColor")?;
    let a_position = passes.blob.attrib(gl, "aPosition")?;

    target.bind_for_write(gl);
    clear_black(gl);

    // srcAlpha x dstAlpha: layering saturates toward the destination alpha
    // instead of brightening additively. Keep as-is; see DESIGN.md.
    gl.enable(glow::BLEND);
    gl.blend_func(glow::SRC_ALPHA, glow::DST_ALPHA);

    passes.quad.bind(gl, a_position);
    for blob in blobs.blobs() {
        let m = scale_translate(
            aspect[0] * 0.5,
            aspect[1] * 0.5,
            blob.position[0],
            blob.position[1],
        );
        gl.uniform_matrix_3_f32_slice(Some(&u_model), false, &m);
        gl.uniform_3_f32(Some(&u_color), blob.color[0], blob.color[1], blob.color[2]);
        passes.quad.draw(gl);
    }
    gl.disable(glow::BLEND);

    // Copy pass: present the accumulated buffer on the visible surface.
    gl.bind_framebuffer(glow::FRAMEBUFFER, None);
    gl.viewport(0, 0, surface.0, surface.1);

    passes.copy.activate(gl);
    let a_position = passes.copy.attrib(gl, "aPosition")?;
    let s_texture = passes.copy.uniform(gl, "sTexture")?;

    gl.active_texture(glow::TEXTURE0);
    gl.bind_texture(glow::TEXTURE_2D, Some(target.color_texture()));
    gl.uniform_1_i32(Some(&s_texture), 0);

    passes.quad.bind(gl, a_position);
    passes.quad.draw(gl);

    Ok(())
}

unsafe fn clear_black(gl: &glow::Context) {
    gl.clear_color(0.0, 0.0, 0.0, 1.0);
    gl.clear(glow::COLOR_BUFFER_BIT);
}

/// Anisotropic aspect pair `(rx, ry)`.
///
/// The longer surface axis keeps the full [-1,1] extent and the shorter one
/// is compressed proportionally, so a unit-radius quad renders as a circle on
/// any surface.
pub fn aspect_ratio(width: i32, height: i32) -> [f32; 2] {
    let longest = width.max(height) as f32;
    [height as f32 / longest, width as f32 / longest]
}

/// Column-major 3×3 transform: uniform-axis scale about the origin, then
/// translate.
fn scale_translate(sx: f32, sy: f32, tx: f32, ty: f32) -> [f32; 9] {
    [sx, 0.0, 0.0, 0.0, sy, 0.0, tx, ty, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_aspect_longer_axis_gets_full_extent() {
        let [rx, ry] = aspect_ratio(1080, 1920);
        assert_eq!(ry, 1080.0 / 1920.0);
        assert_eq!(rx, 1.0);

        let [rx, ry] = aspect_ratio(1920, 1080);
        assert_eq!(rx, 1080.0 / 1920.0);
        assert_eq!(ry, 1.0);

        assert_eq!(aspect_ratio(512, 512), [1.0, 1.0]);
    }

    #[test]
    fn test_aspect_is_proportional_to_dimensions() {
        for (w, h) in [(1080, 1920), (1920, 1080), (640, 480), (3, 7)] {
            let [rx, ry] = aspect_ratio(w, h);
            assert!((rx * w as f32 - ry * h as f32).abs() < 1e-3);
            assert_eq!(rx.max(ry), 1.0);
        }
    }

    #[test]
    fn test_scale_translate_maps_unit_corners() {
        // Column-major: m * (x, y, 1)
        let m = scale_translate(0.5, 0.25, 0.1, -0.2);
        let apply = |x: f32, y: f32| {
            (
                m[0] * x + m[3] * y + m[6],
                m[1] * x + m[4] * y + m[7],
            )
        };
        let close = |(x, y): (f32, f32), (ex, ey): (f32, f32)| {
            assert!((x - ex).abs() < 1e-6 && (y - ey).abs() < 1e-6);
        };
        close(apply(0.0, 0.0), (0.1, -0.2));
        close(apply(1.0, 1.0), (0.6, 0.05));
        close(apply(-1.0, -1.0), (-0.4, -0.45));
    }

    #[test]
    fn test_degrade_emits_exactly_one_message() {
        let (tx, rx) = mpsc::channel();
        let mut pipeline = Pipeline::new(&Settings::default(), 1, tx);
        assert!(!pipeline.is_degraded());

        pipeline.degrade(RenderError::CapabilityUnavailable);
        assert!(pipeline.is_degraded());
        let msg = rx.try_recv().unwrap();
        assert!(msg.contains("shader compilation"));

        // Further failures stay silent; the state is permanent.
        pipeline.degrade(RenderError::ShaderLink("late failure".into()));
        assert!(rx.try_recv().is_err());
        assert!(pipeline.is_degraded());
    }

    #[test]
    fn test_degraded_sink_may_disappear() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut pipeline = Pipeline::new(&Settings::default(), 1, tx);
        pipeline.degrade(RenderError::CapabilityUnavailable);
        assert!(pipeline.is_degraded());
    }
}
