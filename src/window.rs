//! Host window and frame loop.
//!
//! Drawing belongs to an external renderer, so the window here is the input
//! surface and pacing source: it turns winit events into simulation calls
//! and steps one frame per redraw.

use crate::config::FrameMode;
use crate::error::SimulationError;
use crate::input::{Input, KeyCode, TouchEvent};
use crate::pool::PoolKind;
use crate::simulation::{FrameOutput, Simulation};
use crate::time::FrameClock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Redraw interval when pacing to the display.
const VSYNC_INTERVAL: Duration = Duration::from_micros(16_667);

/// Run `sim` in a window until it is closed.
pub(crate) fn run(sim: Simulation) -> Result<(), SimulationError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(sim);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    sim: Simulation,
    window: Option<Arc<Window>>,
    input: Input,
    clock: FrameClock,
    next_frame: Instant,
    error: Option<SimulationError>,
}

impl App {
    fn new(sim: Simulation) -> Self {
        Self::with_clock(sim, FrameClock::new())
    }

    fn with_clock(sim: Simulation, clock: FrameClock) -> Self {
        Self {
            sim,
            window: None,
            input: Input::new(),
            clock,
            next_frame: Instant::now(),
            error: None,
        }
    }

    /// Apply this frame's input, then step the simulation.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.handle_keys() == HostAction::Exit {
            event_loop.exit();
            return;
        }

        if let Some(out) = self.step() {
            if !out.events.is_empty() {
                if let Some(window) = &self.window {
                    window.set_title(&format!("Ornament Burst - {}", out.state));
                }
                tracing::debug!(events = ?out.events, "frame events");
            }
        }
        if self.clock.frame() % 300 == 0 {
            tracing::debug!(fps = self.clock.fps(), particles = self.sim.pools().len(), "stats");
        }

        self.input.begin_frame();
    }

    fn handle_keys(&mut self) -> HostAction {
        if self.input.key_pressed(KeyCode::Escape) {
            return HostAction::Exit;
        }
        if self.input.key_pressed(KeyCode::T) {
            self.sim.toggle_tree_visible();
        }
        if self.input.key_pressed(KeyCode::R) {
            self.sim.rebuild(PoolKind::Tree);
        }
        if self.input.key_pressed(KeyCode::C) {
            self.sim.clear_test();
        }
        if self.input.key_pressed(KeyCode::O) {
            let enabled = !self.sim.config().parallax.orientation.enabled;
            self.sim.set_orientation_enabled(enabled);
        }
        if self.input.key_pressed(KeyCode::P) {
            self.clock.toggle_pause();
            tracing::info!(paused = self.clock.is_paused(), "clock");
        }
        HostAction::Continue
    }

    /// Tick the clock and advance the simulation one frame.
    ///
    /// Touch and pointer state is still tracked while paused, but triggers
    /// are dropped and nothing moves; returns `None` in that case.
    fn step(&mut self) -> Option<FrameOutput> {
        let now = self.clock.tick();

        for event in self.input.touch_events() {
            match *event {
                TouchEvent::Start(ndc) => self.sim.touch_start(ndc),
                TouchEvent::Move(ndc) => self.sim.touch_move(ndc),
                TouchEvent::End => self.sim.touch_end(),
            }
        }
        if self.input.cursor_moved() {
            self.sim.pointer_moved(self.input.mouse_ndc(), now);
        }

        if self.clock.is_paused() {
            return None;
        }
        if self.input.trigger_requested() {
            let outcome = self.sim.trigger_explosion(now);
            tracing::debug!(?outcome, "trigger");
        }
        Some(self.sim.frame(now))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostAction {
    Continue,
    Exit,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(format!("Ornament Burst - {}", self.sim.state()))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                let size = window.inner_size();
                self.input.set_window_size(size.width, size.height);
                tracing::info!(width = size.width, height = size.height, "window created");
                window.request_redraw();
                self.window = Some(Arc::new(window));
            }
            Err(err) => {
                tracing::error!(%err, "failed to create window");
                self.error = Some(err.into());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if self.sim.config().frame_mode == FrameMode::Uncapped {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        match self.sim.config().frame_mode {
            FrameMode::Uncapped => {
                event_loop.set_control_flow(ControlFlow::Poll);
            }
            FrameMode::Vsync => {
                let now = Instant::now();
                if now >= self.next_frame {
                    window.request_redraw();
                    self.next_frame = now + VSYNC_INTERVAL;
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationState;
    use crate::config::SceneConfig;
    use crate::particle::{ObjectDefinition, OrnamentShape};
    use glam::Vec3;
    use winit::event::{ElementState, MouseButton as WinitMouseButton};

    fn app() -> App {
        let config = SceneConfig {
            tree_objects: vec![ObjectDefinition::new("bauble", OrnamentShape::Sphere, 20)],
            ..Default::default()
        };
        let sim = Simulation::with_seed(config, 11).unwrap();
        App::with_clock(sim, FrameClock::manual())
    }

    fn positions(app: &App) -> Vec<Vec3> {
        app.sim.pools().tree.particles().iter().map(|p| p.position).collect()
    }

    fn click(app: &mut App) {
        app.input.handle_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        app.input.handle_mouse_button(WinitMouseButton::Left, ElementState::Released);
    }

    #[test]
    fn test_paused_host_freezes_simulation() {
        let mut app = app();
        app.clock.pause();
        let before = positions(&app);

        click(&mut app);
        assert!(app.step().is_none());
        assert_eq!(app.sim.state(), AnimationState::Idle);
        assert_eq!(positions(&app), before);
        app.input.begin_frame();

        app.clock.resume();
        click(&mut app);
        let out = app.step().unwrap();
        assert_eq!(out.state, AnimationState::Exploding);
        app.input.begin_frame();

        app.step().unwrap();
        assert_ne!(positions(&app), before);
    }

    #[test]
    fn test_pause_mid_explosion_holds_positions() {
        let mut app = app();
        click(&mut app);
        app.step().unwrap();
        app.input.begin_frame();
        app.step().unwrap();

        app.clock.pause();
        let frozen = positions(&app);
        for _ in 0..10 {
            assert!(app.step().is_none());
        }
        assert_eq!(positions(&app), frozen);
        assert_eq!(app.sim.state(), AnimationState::Exploding);
    }
}
