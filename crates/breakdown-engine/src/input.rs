//! Window and input interface.
//!
//! Paddle control polls held keys every frame; menus and bindings react to
//! discrete [`InputEvent`]s drained once per frame by the game loop.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the game binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Space,
    P,
    M,
    Escape,
    F12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Discrete window event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPressed(Key),
    /// `position` is in window coordinates.
    MousePressed { button: MouseButton, position: Vec2 },
    Closed,
}

/// Window plus input state.
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;

    /// Mouse position in window coordinates.
    fn mouse_position(&self) -> Vec2;

    fn window_size(&self) -> Vec2;

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<InputEvent>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

// ---------------------------------------------------------------------------
// HeadlessInput
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct HeadlessState {
    keys_down: HashSet<Key>,
    mouse: Vec2,
    size: Vec2,
    events: VecDeque<InputEvent>,
    open: bool,
}

/// Scripted input for tests and the headless demo.
///
/// Clones share state, so a driver can keep a clone and feed input while
/// the context owns the other.
#[derive(Debug, Clone)]
pub struct HeadlessInput {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessInput {
    pub fn new(window_size: Vec2) -> Self {
        Self {
            state: Rc::new(RefCell::new(HeadlessState {
                keys_down: HashSet::new(),
                mouse: Vec2::ZERO,
                size: window_size,
                events: VecDeque::new(),
                open: true,
            })),
        }
    }

    /// Hold `key` down until [`release`](Self::release).
    pub fn hold(&self, key: Key) {
        self.state.borrow_mut().keys_down.insert(key);
    }

    pub fn release(&self, key: Key) {
        self.state.borrow_mut().keys_down.remove(&key);
    }

    /// Queue a key-press event.
    pub fn tap(&self, key: Key) {
        self.push_event(InputEvent::KeyPressed(key));
    }

    pub fn move_mouse(&self, position: Vec2) {
        self.state.borrow_mut().mouse = position;
    }

    /// Move the mouse to `position` and queue a left click there.
    pub fn click(&self, position: Vec2) {
        self.move_mouse(position);
        self.push_event(InputEvent::MousePressed {
            button: MouseButton::Left,
            position,
        });
    }

    pub fn push_event(&self, event: InputEvent) {
        self.state.borrow_mut().events.push_back(event);
    }

    pub fn pending_events(&self) -> usize {
        self.state.borrow().events.len()
    }
}

impl Default for HeadlessInput {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0))
    }
}

impl InputSource for HeadlessInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.state.borrow().keys_down.contains(&key)
    }

    fn mouse_position(&self) -> Vec2 {
        self.state.borrow().mouse
    }

    fn window_size(&self) -> Vec2 {
        self.state.borrow().size
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.state.borrow_mut().events.pop_front()
    }

    fn close(&mut self) {
        self.state.borrow_mut().open = false;
    }

    fn is_open(&self) -> bool {
        self.state.borrow().open
    }
}
