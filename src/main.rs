use anyhow::{anyhow, Context as _, Result};
use glam::{Vec2, Vec3};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, sync::Arc, time::Instant};
use winit::{
    dpi::LogicalSize,
    event::{DeviceEvent, ElementState, Event, KeyEvent, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowBuilder},
};

use meshview::{
    Camera, InputState, Mesh, MeshData, Model, PolygonMode, SceneRenderer, ShaderProgram, Texture,
    TextureKind, ViewerConfig,
};

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    renderer: SceneRenderer,
    camera: Camera,
    input: InputState,
    polygon_mode: PolygonMode,
    aspect_ratio: f32,
    last_frame: Instant,
}

impl App {
    fn new(config: ViewerConfig) -> Result<(Self, EventLoop<()>)> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(&config.window_title)
            .with_inner_size(LogicalSize::new(config.window_width, config.window_height));

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("at least one GL config matches the template")
            })
            .map_err(|err| anyhow!("failed to create window: {err}"))?;
        let window = window.ok_or_else(|| anyhow!("display builder produced no window"))?;

        let raw_window_handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("failed to create OpenGL context")?
        };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .context("failed to create GL surface")?
        };

        let gl_context = gl_context
            .make_current(&gl_surface)
            .context("failed to make context current")?;

        if config.vsync {
            if let Err(err) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("failed to enable vsync: {err}");
            }
        }

        // Load OpenGL functions
        gl::load_with(|symbol| {
            let symbol = CString::new(symbol).expect("GL symbol names contain no NUL bytes");
            gl_display.get_proc_address(symbol.as_c_str()) as *const _
        });

        let size = window.inner_size();
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
            gl::Enable(gl::DEPTH_TEST);
        }

        if window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
            .is_err()
        {
            warn!("cursor grab is not supported here; mouse look may drift");
        }
        window.set_cursor_visible(false);

        let shader = ShaderProgram::from_files(&config.vertex_shader, &config.fragment_shader)
            .context("failed to build shader program")?;

        let model = match &config.model_path {
            Some(path) => Model::from_file(path)
                .with_context(|| format!("failed to load model {}", path.display()))?,
            None => {
                info!("no model configured, showing the built-in cube");
                let checkerboard = Arc::new(Texture::checkerboard(TextureKind::Diffuse));
                Model::from_meshes(vec![Mesh::new(MeshData::cube(vec![checkerboard]))])
            }
        };

        let renderer = SceneRenderer::new(
            shader,
            model,
            config.clear_color,
            config.near_plane,
            config.far_plane,
        );
        let camera = Camera::with_settings(
            Vec3::new(0.0, 0.0, 3.0),
            config.move_speed,
            config.mouse_sensitivity,
        );

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                renderer,
                camera,
                input: InputState::new(),
                polygon_mode: PolygonMode::Fill,
                aspect_ratio: size.width as f32 / size.height as f32,
                last_frame: Instant::now(),
            },
            event_loop,
        ))
    }

    fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, width, height);
                    unsafe {
                        gl::Viewport(0, 0, size.width as i32, size.height as i32);
                    }
                    self.aspect_ratio = size.width as f32 / size.height as f32;
                }
                false
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                self.input.handle_key(code, state == ElementState::Pressed);
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.handle_scroll(delta);
                false
            }
            _ => false,
        }
    }

    /// Runs one frame; returns true when the application should exit.
    fn update(&mut self) -> bool {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.camera.apply_input(&self.input, dt);
        if self.input.polygon_mode != self.polygon_mode {
            self.polygon_mode = self.input.polygon_mode;
            self.renderer.set_polygon_mode(self.polygon_mode);
        }
        let exit = self.input.exit_requested;
        self.input.reset();

        self.renderer.render_frame(&self.camera, self.aspect_ratio);

        if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
            log::error!("failed to swap buffers: {err}");
        }

        exit
    }
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Info).init()?;
    info!("initializing meshview...");

    let config = ViewerConfig::load_or_default("meshview.toml");
    let (mut app, event_loop) = App::new(config)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            ..
        } => {
            if app.update() {
                elwt.exit();
            }
        }
        Event::WindowEvent { event, .. } => {
            if app.handle_window_event(event) {
                elwt.exit();
            }
        }
        Event::DeviceEvent {
            event: DeviceEvent::MouseMotion { delta },
            ..
        } => {
            app.input
                .handle_mouse_move(Vec2::new(delta.0 as f32, delta.1 as f32));
        }
        Event::AboutToWait => app.window.request_redraw(),
        _ => (),
    })?;

    Ok(())
}
