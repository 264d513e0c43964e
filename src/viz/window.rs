use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use glam::DVec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{PendulumMode, SimConfig};
use crate::control::{CommandQueue, CommandSender, SimCommand};
use crate::simulation::{DoublePendulumSim, SinglePendulumSim};
use crate::viz::renderer::{DiscInstance, LineVertex, Renderer};

const BOB_RADIUS: f32 = 5.0;
const TRAIL_RADIUS: f32 = 1.5;
const RED: [f32; 3] = [1.0, 0.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

enum Sim {
    Single(SinglePendulumSim),
    Double(DoublePendulumSim),
}

struct App {
    config: SimConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    sim: Sim,
    commands: CommandQueue,
    sender: CommandSender,

    /// Cursor position in logical pixels, the coordinate space the scene is
    /// laid out in.
    cursor: Option<DVec2>,
    mouse_pressed: bool,

    discs: Vec<DiscInstance>,
    lines: Vec<LineVertex>,
}

impl App {
    fn new(config: SimConfig) -> Result<Self> {
        let sim = match config.mode {
            PendulumMode::Single => Sim::Single(SinglePendulumSim::from_config(&config)?),
            PendulumMode::Double => Sim::Double(DoublePendulumSim::from_config(&config)?),
        };
        let (commands, sender) = CommandQueue::new();
        Ok(Self {
            config,
            window: None,
            renderer: None,
            sim,
            commands,
            sender,
            cursor: None,
            mouse_pressed: false,
            discs: Vec::new(),
            lines: Vec::new(),
        })
    }

    fn title(&self) -> &'static str {
        match self.config.mode {
            PendulumMode::Single => "Pendulum",
            PendulumMode::Double => "Double Pendulum",
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        match code {
            KeyCode::Space => self.sender.send(SimCommand::Toggle),
            KeyCode::KeyR => self.sender.send(SimCommand::Reset),
            KeyCode::KeyS => self.sender.send(SimCommand::Step(1)),
            KeyCode::KeyQ | KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }

    /// Drains pending commands, advances the driver by one frame and
    /// rebuilds the disc/line geometry.
    fn tick(&mut self) {
        self.discs.clear();
        self.lines.clear();

        match &mut self.sim {
            Sim::Single(sim) => {
                while let Some(cmd) = self.commands.try_recv() {
                    sim.apply(cmd);
                }
                // Holding the left button engages manual override.
                let pointer = if self.mouse_pressed { self.cursor } else { None };
                let frame = sim.advance(pointer);

                for (point, fade) in sim.trail().snapshot() {
                    self.discs.push(DiscInstance::new(
                        point.as_vec2(),
                        TRAIL_RADIUS,
                        scaled(RED, fade),
                    ));
                }
                let pivot = sim.pivot().as_vec2();
                let bob = frame.bob.as_vec2();
                self.discs.push(DiscInstance::new(bob, BOB_RADIUS, RED));
                self.lines.push(LineVertex::new(pivot, WHITE));
                self.lines.push(LineVertex::new(bob, WHITE));
            }
            Sim::Double(sim) => {
                while let Some(cmd) = self.commands.try_recv() {
                    sim.apply(cmd);
                }
                let frame = sim.advance();

                let (inner, outer) = sim.trails();
                for (point, fade) in inner.snapshot() {
                    self.discs.push(DiscInstance::new(
                        point.as_vec2(),
                        TRAIL_RADIUS,
                        scaled(RED, fade),
                    ));
                }
                for (point, fade) in outer.snapshot() {
                    self.discs.push(DiscInstance::new(
                        point.as_vec2(),
                        TRAIL_RADIUS,
                        scaled(BLUE, fade),
                    ));
                }

                let pivot = sim.pivot().as_vec2();
                let bob1 = frame.bob1.as_vec2();
                let bob2 = frame.bob2.as_vec2();
                self.discs.push(DiscInstance::new(bob1, BOB_RADIUS, RED));
                self.discs.push(DiscInstance::new(bob2, BOB_RADIUS, BLUE));
                self.lines.push(LineVertex::new(pivot, WHITE));
                self.lines.push(LineVertex::new(bob1, WHITE));
                self.lines.push(LineVertex::new(bob1, WHITE));
                self.lines.push(LineVertex::new(bob2, WHITE));
            }
        }
    }
}

fn scaled(color: [f32; 3], factor: f32) -> [f32; 3] {
    [color[0] * factor, color[1] * factor, color[2] * factor]
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width as f64,
                self.config.window.height as f64,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                tracing::error!(%err, "failed to create window");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(Renderer::new(window.clone())) {
            Ok(mut renderer) => {
                renderer.update_camera_screen(
                    self.config.window.width as f32,
                    self.config.window.height as f32,
                );
                tracing::info!("renderer initialized");
                self.renderer = Some(renderer);
            }
            Err(err) => {
                tracing::error!(%err, "failed to initialize renderer");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let window = match self.window.as_ref() {
            Some(window) => window.clone(),
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window close requested");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(physical_size);
                    let logical: winit::dpi::LogicalSize<f64> =
                        physical_size.to_logical(window.scale_factor());
                    renderer.update_camera_screen(logical.width as f32, logical.height as f32);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical: winit::dpi::LogicalPosition<f64> =
                    position.to_logical(window.scale_factor());
                self.cursor = Some(DVec2::new(logical.x, logical.y));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                }
            }
            WindowEvent::RedrawRequested => {
                self.tick();
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.update_discs(&self.discs);
                    renderer.update_lines(&self.lines);
                    match renderer.render() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            renderer.resize(window.inner_size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("GPU out of memory, shutting down");
                            event_loop.exit();
                        }
                        Err(err) => {
                            tracing::warn!(?err, "surface error, retrying next frame");
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Redraw continuously; vsync paces the loop, one simulation step per
        // rendered frame while running.
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

pub fn run(config: SimConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).map_err(|err| anyhow!(err))?;
    Ok(())
}
