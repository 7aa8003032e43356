// Cancel signal - Shared exit flag raised from input handlers
//
// The listener sits in the input dispatcher and may run on any thread that
// dispatches events. The main loop only ever polls the flag.

use super::{HandlerId, InputCode, InputDispatcher, InputEvent};
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Priority of the cancel listener in the handler chain
pub const CANCEL_PRIORITY: i32 = 100;

/// Exit flag shared between the listener and the main loop
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a lowered flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether the flag has been raised
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Input handler that raises a `CancelFlag` on any of its codes
#[derive(Debug, Clone)]
pub struct CancelListener {
    flag: CancelFlag,
    codes: Vec<InputCode>,
}

impl CancelListener {
    /// Create a listener raising `flag` on a press of any of `codes`
    pub fn new(flag: CancelFlag, codes: Vec<InputCode>) -> Self {
        Self { flag, codes }
    }

    /// Handle one event
    ///
    /// Cancel presses raise the flag and are consumed. Everything else,
    /// including releases of cancel codes, passes through unchanged.
    pub fn handle(&self, event: InputEvent) -> Option<InputEvent> {
        if event.pressed && self.codes.contains(&event.code) {
            if !self.flag.is_raised() {
                info!("Cancel requested by {:?}", event.code);
            }
            self.flag.raise();
            None
        } else {
            Some(event)
        }
    }

    /// Register the listener with `dispatcher`
    pub fn install(self, dispatcher: &InputDispatcher) -> HandlerId {
        dispatcher.register_handler(CANCEL_PRIORITY, Box::new(move |event| self.handle(event)))
    }
}
