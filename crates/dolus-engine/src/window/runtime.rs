use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, StopSignal};
use crate::device::{Gpu, GpuInit};
use crate::program::{Program, ProgramConfig};
use crate::render::FrameOutcome;
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub program: ProgramConfig,
    /// Stop the loop when Escape is pressed.
    pub exit_on_escape: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "dolus".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            program: ProgramConfig::default(),
            exit_on_escape: true,
        }
    }
}

/// Owns the event loop and a single window, and drives the render loop.
///
/// The loop redraws continuously (paced by the present mode) until the stop
/// signal is raised, the window is closed, or the app returns `Exit`.
pub struct Runtime {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    stop: StopSignal,
}

impl Runtime {
    pub fn new(config: RuntimeConfig, gpu_init: GpuInit) -> Self {
        Self {
            config,
            gpu_init,
            stop: StopSignal::new(),
        }
    }

    /// Signal that stops the loop before its next frame. Safe to use from any thread.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs until stopped. Setup and initialization errors are returned.
    pub fn run<A>(self, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(self, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[not_covariant]
    program: Program<Gpu<'this>>,
}

struct AppState<A>
where
    A: App + 'static,
{
    runtime: Runtime,
    app: A,

    entry: Option<WindowEntry>,
    error: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: App + 'static,
{
    fn new(runtime: Runtime, app: A) -> Self {
        Self {
            runtime,
            app,
            entry: None,
            error: None,
            exit_requested: false,
        }
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let config = &self.runtime.config;
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        let id = window.id();

        let program_config = config.program.clone();
        let gpu_init = self.runtime.gpu_init.clone();
        let app = &mut self.app;

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            program_builder: |window| {
                let mut program = Program::new(program_config);
                pollster::block_on(program.init(window, gpu_init))
                    .context("GPU initialization failed")?;
                app.setup(&mut program).context("application setup failed")?;
                Ok::<_, anyhow::Error>(program)
            },
        }
        .try_build()?;

        self.entry = Some(entry);
        Ok(id)
    }

    /// Stops the loop; the first error wins.
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.exit_requested = true;
        if let Some(mut entry) = self.entry.take() {
            let frames = entry.with_clock(|clock| clock.frames());
            entry.with_mut(|fields| fields.program.release());
            log::info!("render loop stopped after {frames} frames");
        }
        event_loop.exit();
    }

    fn should_stop(&self) -> bool {
        self.exit_requested || self.runtime.stop.is_stopped()
    }

    fn redraw(&mut self) -> Result<AppControl> {
        let Some(entry) = self.entry.as_mut() else {
            return Ok(AppControl::Continue);
        };
        let app = &mut self.app;
        let stop = &self.runtime.stop;

        entry.with_mut(|fields| -> Result<AppControl> {
            let time = fields.clock.tick();

            let mut ctx = FrameCtx {
                window: fields.window,
                program: &mut *fields.program,
                time,
                stop,
            };
            if app.on_frame(&mut ctx) == AppControl::Exit {
                return Ok(AppControl::Exit);
            }

            fields.window.pre_present_notify();
            match fields.program.render_frame()? {
                FrameOutcome::Presented { draw_calls } => {
                    log::trace!("frame {}: {draw_calls} draws", time.frame_index);
                }
                FrameOutcome::Skipped => {
                    log::debug!("frame {} skipped", time.frame_index);
                }
            }
            Ok(AppControl::Continue)
        })
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() || self.exit_requested {
            return;
        }

        match self.create_window_entry(event_loop) {
            Ok(id) => {
                log::info!("window {id:?} ready");
                if let Some(entry) = self.entry.as_ref() {
                    entry.with_window(|w| w.request_redraw());
                }
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_stop() {
            self.shutdown(event_loop);
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; FIFO presentation paces it to the display.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.should_stop() {
            self.shutdown(event_loop);
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if self.runtime.config.exit_on_escape => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_program_mut(|program| program.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_program_mut(|program| program.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => match self.redraw() {
                Ok(AppControl::Continue) => {}
                Ok(AppControl::Exit) => self.shutdown(event_loop),
                Err(err) => self.fail(event_loop, err),
            },

            _ => {}
        }
    }
}
