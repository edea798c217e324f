use std::time::Instant;

use log::error;
use log::info;
use winit::dpi::PhysicalSize;
use winit::event::ElementState;
use winit::event::KeyEvent;
use winit::event::MouseScrollDelta;
use winit::event::WindowEvent;
use winit::event_loop::ControlFlow;
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::Fullscreen;
use winit::window::WindowBuilder;

use crate::config::AppConfig;
use crate::config::ControlFlowMode;
use crate::input::KeyCode;
use crate::input::MouseButton;
use crate::systems;
use crate::time::Clock;
use crate::Error;
use crate::Input;
use crate::Result;
use crate::Scene;
use crate::Time;

/// Pixel scroll deltas (touchpads) are reported in lines of this height.
const PIXELS_PER_LINE: f32 = 20.0;

/// # Application
///
/// Entry-point for building a Pulse application.
pub trait Application: Sized {
    /// Returns the title to be displayed in the application window.
    fn title(&self) -> &str;

    /// Returns the current state of the application. The application will exit if this returns
    /// [ApplicationState::Finished] after [Application::handle_event] or [Application::update] is
    /// called.
    fn state(&self) -> ApplicationState;

    /// Handles the incoming event. [Frame::input] already reflects the event by the time
    /// [Application::update] is called.
    fn handle_event(&mut self, event: Event);

    /// Updates the application for the current frame. The built-in systems run on the scene
    /// right after this returns.
    fn update(&mut self, frame: &Frame);

    /// Returns a reference to the application's scene.
    fn scene(&self) -> &Scene;

    /// Runs the application with the default config.
    fn run(self) -> Result<()> {
        self.run_with_config(AppConfig::default())
    }

    /// Runs the application with the given config.
    fn run_with_config(self, config: AppConfig) -> Result<()> {
        run_application(self, config)
    }
}

/// # Application State
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ApplicationState {
    /// Application is running.
    Running,
    /// Application has finished running.
    Finished,
}

/// # Event
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Event {
    /// Application window requested to close.
    CloseRequested,
    /// Window was resized, in physical pixels.
    Resized {
        /// New inner width.
        width: u32,
        /// New inner height.
        height: u32,
    },
    /// Window gained or lost focus.
    Focused(bool),
    /// Key went down. Repeats aren't reported.
    KeyPressed(KeyCode),
    /// Key went up.
    KeyReleased(KeyCode),
    /// Cursor moved inside the window, in physical pixels.
    CursorMoved {
        /// Horizontal position from the left edge.
        x: f32,
        /// Vertical position from the top edge.
        y: f32,
    },
    /// Cursor left the window.
    CursorLeft,
    /// Mouse button went down.
    MouseButtonPressed(MouseButton),
    /// Mouse button went up.
    MouseButtonReleased(MouseButton),
    /// Mouse wheel or touchpad scrolled, in lines.
    MouseWheel {
        /// Horizontal scroll.
        delta_x: f32,
        /// Vertical scroll.
        delta_y: f32,
    },
}

/// # Frame
///
/// State of the current frame.
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    /// Frame timing.
    pub time: &'a Time,
    /// Keyboard and mouse state.
    pub input: &'a Input,
}

fn map_window_event(event: &WindowEvent) -> Option<Event> {
    let event = match event {
        WindowEvent::CloseRequested => Event::CloseRequested,
        WindowEvent::Resized(size) => Event::Resized {
            width: size.width,
            height: size.height,
        },
        WindowEvent::Focused(focused) => Event::Focused(*focused),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state,
                    repeat,
                    ..
                },
            ..
        } => return map_key(*key, *state, *repeat),
        WindowEvent::CursorMoved { position, .. } => Event::CursorMoved {
            x: position.x as f32,
            y: position.y as f32,
        },
        WindowEvent::CursorLeft { .. } => Event::CursorLeft,
        WindowEvent::MouseInput { state, button, .. } => match state {
            ElementState::Pressed => Event::MouseButtonPressed(*button),
            ElementState::Released => Event::MouseButtonReleased(*button),
        },
        WindowEvent::MouseWheel { delta, .. } => {
            let (delta_x, delta_y) = scroll_lines(*delta);
            Event::MouseWheel { delta_x, delta_y }
        }
        _ => return None,
    };

    Some(event)
}

fn map_key(key: KeyCode, state: ElementState, repeat: bool) -> Option<Event> {
    match state {
        ElementState::Pressed if repeat => None,
        ElementState::Pressed => Some(Event::KeyPressed(key)),
        ElementState::Released => Some(Event::KeyReleased(key)),
    }
}

fn scroll_lines(delta: MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(position) => (
            position.x as f32 / PIXELS_PER_LINE,
            position.y as f32 / PIXELS_PER_LINE,
        ),
    }
}

/// Drives an application independently of the window: events in, frames out.
struct Runner<A> {
    app: A,
    input: Input,
    clock: Clock,
    time: Time,
}

impl<A: Application> Runner<A> {
    fn new(app: A, clock: Clock) -> Self {
        Self {
            app,
            input: Input::new(),
            clock,
            time: Time::default(),
        }
    }

    fn dispatch(&mut self, event: Event) {
        self.input.handle(&event);
        self.app.handle_event(event);
    }

    fn update(&mut self, now: Instant) {
        self.time = self.clock.tick(now);

        let frame = Frame {
            time: &self.time,
            input: &self.input,
        };
        self.app.update(&frame);

        // Scene events live from one run of the systems to the end of the next update.
        let scene = self.app.scene();
        scene.clear_events();
        systems::run(scene);
        self.input.end_frame();
    }

    fn is_finished(&self) -> bool {
        self.app.state() == ApplicationState::Finished
    }
}

fn run_application(app: impl Application, config: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut window_title = app.title().to_string();

    let size = PhysicalSize::new(config.window.width.max(1), config.window.height.max(1));
    let window = WindowBuilder::new()
        .with_title(window_title.clone())
        .with_inner_size(size)
        .with_resizable(config.window.resizable)
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
        .build(&event_loop)?;
    info!(
        "created window \"{window_title}\" ({}x{}, fullscreen: {})",
        size.width, size.height, config.window.fullscreen
    );

    event_loop.set_control_flow(match config.frame.control_flow {
        ControlFlowMode::Poll => ControlFlow::Poll,
        ControlFlowMode::Wait => ControlFlow::Wait,
    });

    let mut runner = Runner::new(app, Clock::new(Instant::now(), config.frame.max_delta()));
    event_loop
        .run(|event, event_loop_window_target| {
            match event {
                winit::event::Event::WindowEvent { event, .. } => {
                    if let Some(event) = map_window_event(&event) {
                        runner.dispatch(event);
                    }
                }
                winit::event::Event::AboutToWait => {
                    runner.update(Instant::now());

                    let title = runner.app.title();
                    if title != window_title {
                        window_title = title.to_string();
                        window.set_title(&window_title);
                    }
                }
                winit::event::Event::LoopExiting => {
                    let frames = runner.time.frame();
                    info!("exiting after {frames} frames");
                }
                _ => {}
            }

            if runner.is_finished() {
                event_loop_window_target.exit();
            }
        })
        .map_err(|err| {
            error!("event loop failed: {err}");
            Error::from(err)
        })
}
