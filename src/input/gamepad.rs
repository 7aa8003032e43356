// Gamepad input - Background watcher feeding gilrs events to the dispatcher
//
// gilrs is polled on its own thread so button presses reach the handler chain
// even while the main loop is blocked waiting for the next frame.

use super::{InputDispatcher, InputEvent};
use gilrs::{Button, Event, EventType, Gilrs};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Delay between gilrs polls
const POLL_INTERVAL: Duration = Duration::from_millis(4);

/// Thread dispatching gamepad button events
pub struct GamepadWatcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GamepadWatcher {
    /// Start watching gamepads
    ///
    /// If no gamepad backend is available the thread exits right away and
    /// the watcher does nothing.
    pub fn spawn(dispatcher: InputDispatcher) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("gamepad".to_string())
            .spawn(move || watch(dispatcher, thread_stop))
            .map_err(|e| warn!("Failed to start gamepad thread: {}", e))
            .ok();

        Self { stop, handle }
    }

    /// Whether the watcher thread is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the thread and wait for it
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Gamepad thread panicked");
            }
        }
    }
}

impl Drop for GamepadWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watch(dispatcher: InputDispatcher, stop: Arc<AtomicBool>) {
    let mut gilrs = match Gilrs::new() {
        Ok(gilrs) => gilrs,
        Err(e) => {
            warn!("Gamepad support unavailable: {}", e);
            return;
        }
    };

    for (id, gamepad) in gilrs.gamepads() {
        info!("Gamepad {} connected: {}", id, gamepad.name());
    }

    while !stop.load(Ordering::Acquire) {
        while let Some(Event { id, event, .. }) = gilrs.next_event() {
            let input = match event {
                EventType::ButtonPressed(button, _) => InputEvent::button(button, true),
                EventType::ButtonReleased(button, _) => InputEvent::button(button, false),
                EventType::Connected => {
                    info!("Gamepad {} connected", id);
                    continue;
                }
                EventType::Disconnected => {
                    info!("Gamepad {} disconnected", id);
                    continue;
                }
                _ => continue,
            };
            debug!("Gamepad {} event {:?}", id, input.code);
            dispatcher.dispatch(input);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Convert string to gilrs::Button
pub fn string_to_button(s: &str) -> Result<Button, String> {
    match s {
        "South" => Ok(Button::South),
        "East" => Ok(Button::East),
        "North" => Ok(Button::North),
        "West" => Ok(Button::West),
        "C" => Ok(Button::C),
        "Z" => Ok(Button::Z),
        "LeftTrigger" => Ok(Button::LeftTrigger),
        "LeftTrigger2" => Ok(Button::LeftTrigger2),
        "RightTrigger" => Ok(Button::RightTrigger),
        "RightTrigger2" => Ok(Button::RightTrigger2),
        "Select" => Ok(Button::Select),
        "Start" => Ok(Button::Start),
        "Mode" => Ok(Button::Mode),
        "LeftThumb" => Ok(Button::LeftThumb),
        "RightThumb" => Ok(Button::RightThumb),
        "DPadUp" => Ok(Button::DPadUp),
        "DPadDown" => Ok(Button::DPadDown),
        "DPadLeft" => Ok(Button::DPadLeft),
        "DPadRight" => Ok(Button::DPadRight),
        _ => Err(format!("Unknown gamepad button: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_conversion() {
        assert_eq!(string_to_button("Start"), Ok(Button::Start));
        assert_eq!(string_to_button("DPadLeft"), Ok(Button::DPadLeft));
        assert!(string_to_button("Turbo").is_err());
    }

    #[test]
    fn test_stop_joins_thread() {
        let mut watcher = GamepadWatcher::spawn(InputDispatcher::new());
        watcher.stop();
        assert!(!watcher.is_running());
    }
}
