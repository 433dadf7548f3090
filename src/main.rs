// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod blobs;
mod error;
mod pipeline;
mod program;
mod quad;
mod settings;
mod shaders;
mod target;
mod util;

use std::sync::mpsc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use pipeline::Pipeline;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::video::{GLProfile, SwapInterval};
use settings::Settings;
use shaders::ShaderSources;
use util::FpsCounter;

const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;
const SETTINGS_PATH: &str = "blobwall.json";

/// Parse command line arguments and return (width, height, vsync)
fn parse_args() -> (u32, u32, bool) {
    let args: Vec<String> = std::env::args().collect();
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut vsync = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            width = w;
                            height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: blobwall [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (width, height, vsync)
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (width, height, vsync) = parse_args();

    let settings = Settings::load(SETTINGS_PATH).unwrap_or_else(|e| {
        log::debug!("no settings file ({e}), using defaults");
        Settings::default()
    });

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let gl_attr = video_subsystem.gl_attr();
    gl_attr.set_context_profile(GLProfile::Core);
    gl_attr.set_context_version(3, 3);

    let mut window = video_subsystem
        .window("blobwall", width, height)
        .opengl()
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let _gl_context = window.gl_create_context()?;
    let gl = unsafe {
        glow::Context::from_loader_function(|name| {
            video_subsystem.gl_get_proc_address(name) as *const _
        })
    };

    let interval = if vsync {
        SwapInterval::VSync
    } else {
        SwapInterval::Immediate
    };
    if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
        log::warn!("could not set swap interval: {e}");
    }

    // Fresh motion each start unless the settings pin a seed.
    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0xB10B_5EED, |d| d.as_nanos() as u64)
    });

    let (error_tx, error_rx) = mpsc::channel();
    let mut pipeline = Pipeline::new(&settings, seed, error_tx);

    unsafe {
        pipeline.on_surface_created(&gl, &ShaderSources::default());
        let (dw, dh) = window.drawable_size();
        pipeline.on_surface_resized(&gl, dw as i32, dh as i32);
    }

    let mut event_pump = sdl_context.event_pump()?;
    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let start = Instant::now();

    println!("=== blobwall ===");
    println!("Resolution: {}x{}", width, height);
    if vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  F          - Toggle FPS in window title");
    println!("  Escape     - Quit");

    'main: loop {
        let (_dt, avg_fps) = fps_counter.tick();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(Keycode::F),
                    ..
                } => {
                    show_fps = !show_fps;
                    if !show_fps {
                        let _ = window.set_title("blobwall");
                    }
                },
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (dw, dh) = window.drawable_size();
                    unsafe {
                        pipeline.on_surface_resized(&gl, dw as i32, dh as i32);
                    }
                },
                _ => {},
            }
        }

        let now_ms = start.elapsed().as_millis() as i64;
        unsafe {
            pipeline.on_frame(&gl, now_ms);
        }
        window.gl_swap_window();

        // Fatal renderer errors surface here, on the UI thread.
        while let Ok(msg) = error_rx.try_recv() {
            log::error!("renderer error: {msg}");
        }

        if show_fps {
            let title = format!(
                "blobwall - {:.0} fps ({:.1} ms)",
                avg_fps,
                fps_counter.avg_frame_time_ms()
            );
            let _ = window.set_title(&title);
        }
    }

    Ok(())
}
