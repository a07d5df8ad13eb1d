//! Window input for the display host.
//!
//! The `Input` struct folds raw winit window events into the handful of
//! signals the display cares about: the cursor position in normalized
//! device coordinates, clicks, a few keys, and a single primary touch.
//! Per-frame events (pressed this frame, tapped this frame) are cleared by
//! [`Input::begin_frame`]; continuous state (held, cursor position) persists.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// NDC distance a touch may travel and still count as a tap.
const TAP_SLOP: f32 = 0.03;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(id) => MouseButton::Other(id),
        }
    }
}

/// Keys the host binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Enter,
    Escape,
    /// Rebuild the tree pool.
    R,
    /// Toggle tree visibility.
    T,
    /// Clear the test pool.
    C,
    /// Toggle device-orientation input.
    O,
    /// Pause/resume the clock.
    P,
    Other(u32),
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Enter | WinitKeyCode::NumpadEnter => KeyCode::Enter,
            WinitKeyCode::Escape => KeyCode::Escape,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::KeyT => KeyCode::T,
            WinitKeyCode::KeyC => KeyCode::C,
            WinitKeyCode::KeyO => KeyCode::O,
            WinitKeyCode::KeyP => KeyCode::P,
            _ => KeyCode::Other(key as u32),
        }
    }
}

/// Touch phase change seen this frame, in NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Start(Vec2),
    Move(Vec2),
    End,
}

/// The primary touch being tracked.
#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    id: u64,
    start: Vec2,
    travelled: f32,
    last: Vec2,
}

/// Input state tracking for keyboard, mouse and touch.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    mouse_held: HashSet<MouseButton>,
    mouse_pressed: HashSet<MouseButton>,

    mouse_ndc: Vec2,
    cursor_moved: bool,

    touch: Option<ActiveTouch>,
    touch_events: Vec<TouchEvent>,
    tapped: bool,

    window_size: (u32, u32),
}

impl Input {
    pub fn new() -> Self {
        Self {
            window_size: (800, 600),
            ..Default::default()
        }
    }

    // ========== Queries ==========

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_pressed.contains(&button)
    }

    /// Check if a mouse button is currently held down.
    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.mouse_held.contains(&button)
    }

    /// Cursor position in normalized device coordinates (-1 to 1, Y up).
    pub fn mouse_ndc(&self) -> Vec2 {
        self.mouse_ndc
    }

    /// Whether the cursor moved this frame.
    pub fn cursor_moved(&self) -> bool {
        self.cursor_moved
    }

    /// Touch phase changes this frame, in arrival order.
    pub fn touch_events(&self) -> &[TouchEvent] {
        &self.touch_events
    }

    /// Whether a short touch without much travel ended this frame.
    pub fn tapped(&self) -> bool {
        self.tapped
    }

    /// Whether this frame carries an explosion trigger (click, Space, Enter or tap).
    pub fn trigger_requested(&self) -> bool {
        self.mouse_pressed(MouseButton::Left)
            || self.key_pressed(KeyCode::Space)
            || self.key_pressed(KeyCode::Enter)
            || self.tapped
    }

    // ========== Frame plumbing ==========

    /// Clear per-frame state. Call after the frame consumed it.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.mouse_pressed.clear();
        self.cursor_moved = false;
        self.touch_events.clear();
        self.tapped = false;
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Convert a physical pixel position to NDC, Y flipped.
    pub fn to_ndc(&self, x: f64, y: f64) -> Option<Vec2> {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Vec2::new(
            (x as f32 / w as f32) * 2.0 - 1.0,
            1.0 - (y as f32 / h as f32) * 2.0,
        ))
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    let key = KeyCode::from(keycode);
                    match event.state {
                        ElementState::Pressed => {
                            // Ignore key repeat.
                            if !self.keys_held.contains(&key) {
                                self.keys_pressed.insert(key);
                            }
                            self.keys_held.insert(key);
                        }
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state);
            }

            WindowEvent::CursorMoved { position, .. } => {
                if let Some(ndc) = self.to_ndc(position.x, position.y) {
                    self.mouse_ndc = ndc;
                    self.cursor_moved = true;
                }
            }

            WindowEvent::Resized(size) => {
                self.set_window_size(size.width, size.height);
            }

            WindowEvent::Touch(touch) => {
                let Some(ndc) = self.to_ndc(touch.location.x, touch.location.y) else {
                    return;
                };
                self.handle_touch(touch.id, touch.phase, ndc);
            }

            _ => {}
        }
    }

    pub(crate) fn handle_mouse_button(&mut self, button: WinitMouseButton, state: ElementState) {
        let btn = MouseButton::from(button);
        match state {
            ElementState::Pressed => {
                self.mouse_pressed.insert(btn);
                self.mouse_held.insert(btn);
            }
            ElementState::Released => {
                self.mouse_held.remove(&btn);
            }
        }
    }

    fn handle_touch(&mut self, id: u64, phase: TouchPhase, ndc: Vec2) {
        match phase {
            TouchPhase::Started => {
                if self.touch.is_none() {
                    self.touch = Some(ActiveTouch {
                        id,
                        start: ndc,
                        travelled: 0.0,
                        last: ndc,
                    });
                    self.touch_events.push(TouchEvent::Start(ndc));
                }
            }
            TouchPhase::Moved => {
                if let Some(active) = self.touch.as_mut().filter(|t| t.id == id) {
                    active.travelled += ndc.distance(active.last);
                    active.last = ndc;
                    self.touch_events.push(TouchEvent::Move(ndc));
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if let Some(active) = self.touch.filter(|t| t.id == id) {
                    self.touch = None;
                    self.touch_events.push(TouchEvent::End);
                    let drifted = active.start.distance(ndc);
                    if phase == TouchPhase::Ended && active.travelled.max(drifted) < TAP_SLOP {
                        self.tapped = true;
                    }
                }
            }
        }
    }
}
