// Input module - Event dispatch from keyboard, gamepad and window
//
// Input sources turn device events into `InputEvent`s and hand them to an
// `InputDispatcher`. The dispatcher runs a chain of handlers ordered by
// priority; each handler either passes the event on or consumes it.
//
// The dispatcher is shared between the window thread and the gamepad watcher
// thread, so the handler chain lives behind a mutex.

pub mod cancel;
pub mod gamepad;
pub mod keyboard;

pub use cancel::{CancelFlag, CancelListener, CANCEL_PRIORITY};
pub use gamepad::{string_to_button, GamepadWatcher};
pub use keyboard::{key_event, keycode_to_string, string_to_keycode};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use winit::keyboard::KeyCode;

/// Kind of device an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventClass {
    /// Keyboard key
    Key,
    /// Gamepad button
    Button,
    /// Window manager request
    Window,
}

/// Identity of the key, button or request behind an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCode {
    /// Physical keyboard key
    Key(KeyCode),
    /// Gamepad button
    Button(gilrs::Button),
    /// The window was asked to close
    CloseRequested,
}

impl InputCode {
    /// Event class of this code
    pub fn class(&self) -> EventClass {
        match self {
            InputCode::Key(_) => EventClass::Key,
            InputCode::Button(_) => EventClass::Button,
            InputCode::CloseRequested => EventClass::Window,
        }
    }
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub class: EventClass,
    pub code: InputCode,
    /// Press (true) or release (false)
    pub pressed: bool,
}

impl InputEvent {
    /// Create an event for `code`
    pub fn new(code: InputCode, pressed: bool) -> Self {
        Self {
            class: code.class(),
            code,
            pressed,
        }
    }

    /// Keyboard event
    pub fn key(key: KeyCode, pressed: bool) -> Self {
        Self::new(InputCode::Key(key), pressed)
    }

    /// Gamepad button event
    pub fn button(button: gilrs::Button, pressed: bool) -> Self {
        Self::new(InputCode::Button(button), pressed)
    }

    /// Window close request
    pub fn close_requested() -> Self {
        Self::new(InputCode::CloseRequested, true)
    }
}

/// Event handler: returns the event to pass it on, or `None` to consume it
pub type InputHandler = Box<dyn FnMut(InputEvent) -> Option<InputEvent> + Send>;

/// Handle returned by `register_handler`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration {
    id: HandlerId,
    priority: i32,
    handler: InputHandler,
}

#[derive(Default)]
struct HandlerChain {
    next_id: u64,
    /// Highest priority first; equal priorities keep registration order
    handlers: Vec<Registration>,
}

/// Priority-ordered chain of input handlers
#[derive(Clone, Default)]
pub struct InputDispatcher {
    chain: Arc<Mutex<HandlerChain>>,
}

impl InputDispatcher {
    /// Create a dispatcher with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HandlerChain> {
        self.chain.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a handler to the chain
    ///
    /// # Arguments
    /// * `priority` - Higher priorities see events first
    /// * `handler` - Event handler
    pub fn register_handler(&self, priority: i32, handler: InputHandler) -> HandlerId {
        let mut chain = self.lock();
        let id = HandlerId(chain.next_id);
        chain.next_id += 1;

        let index = chain
            .handlers
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(chain.handlers.len());
        chain.handlers.insert(
            index,
            Registration {
                id,
                priority,
                handler,
            },
        );
        id
    }

    /// Remove a handler from the chain
    ///
    /// # Returns
    /// Whether the handler was registered
    pub fn unregister_handler(&self, id: HandlerId) -> bool {
        let mut chain = self.lock();
        let before = chain.handlers.len();
        chain.handlers.retain(|r| r.id != id);
        chain.handlers.len() != before
    }

    /// Run `event` through the chain
    ///
    /// # Returns
    /// The event left after every handler ran, or `None` if one consumed it
    pub fn dispatch(&self, event: InputEvent) -> Option<InputEvent> {
        let mut chain = self.lock();
        chain
            .handlers
            .iter_mut()
            .try_fold(event, |event, registration| (registration.handler)(event))
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.lock().handlers.len()
    }
}
