// Keyboard input - winit key events and key names
//
// Key names follow winit's `KeyCode` variant names ("Escape", "KeyQ", "F12"),
// which is also how they are written in the configuration file.

use super::InputEvent;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Convert a winit keyboard event into an `InputEvent`
///
/// # Returns
/// `None` for keys winit could not identify
pub fn key_event(physical_key: PhysicalKey, state: ElementState) -> Option<InputEvent> {
    match physical_key {
        PhysicalKey::Code(code) => Some(InputEvent::key(code, state == ElementState::Pressed)),
        PhysicalKey::Unidentified(_) => None,
    }
}

/// Convert KeyCode to string representation
pub fn keycode_to_string(key: KeyCode) -> String {
    format!("{:?}", key)
}

/// Convert string to KeyCode
pub fn string_to_keycode(s: &str) -> Result<KeyCode, String> {
    match s {
        "KeyA" => Ok(KeyCode::KeyA),
        "KeyB" => Ok(KeyCode::KeyB),
        "KeyC" => Ok(KeyCode::KeyC),
        "KeyD" => Ok(KeyCode::KeyD),
        "KeyE" => Ok(KeyCode::KeyE),
        "KeyF" => Ok(KeyCode::KeyF),
        "KeyG" => Ok(KeyCode::KeyG),
        "KeyH" => Ok(KeyCode::KeyH),
        "KeyI" => Ok(KeyCode::KeyI),
        "KeyJ" => Ok(KeyCode::KeyJ),
        "KeyK" => Ok(KeyCode::KeyK),
        "KeyL" => Ok(KeyCode::KeyL),
        "KeyM" => Ok(KeyCode::KeyM),
        "KeyN" => Ok(KeyCode::KeyN),
        "KeyO" => Ok(KeyCode::KeyO),
        "KeyP" => Ok(KeyCode::KeyP),
        "KeyQ" => Ok(KeyCode::KeyQ),
        "KeyR" => Ok(KeyCode::KeyR),
        "KeyS" => Ok(KeyCode::KeyS),
        "KeyT" => Ok(KeyCode::KeyT),
        "KeyU" => Ok(KeyCode::KeyU),
        "KeyV" => Ok(KeyCode::KeyV),
        "KeyW" => Ok(KeyCode::KeyW),
        "KeyX" => Ok(KeyCode::KeyX),
        "KeyY" => Ok(KeyCode::KeyY),
        "KeyZ" => Ok(KeyCode::KeyZ),
        "Digit0" => Ok(KeyCode::Digit0),
        "Digit1" => Ok(KeyCode::Digit1),
        "Digit2" => Ok(KeyCode::Digit2),
        "Digit3" => Ok(KeyCode::Digit3),
        "Digit4" => Ok(KeyCode::Digit4),
        "Digit5" => Ok(KeyCode::Digit5),
        "Digit6" => Ok(KeyCode::Digit6),
        "Digit7" => Ok(KeyCode::Digit7),
        "Digit8" => Ok(KeyCode::Digit8),
        "Digit9" => Ok(KeyCode::Digit9),
        "F1" => Ok(KeyCode::F1),
        "F2" => Ok(KeyCode::F2),
        "F3" => Ok(KeyCode::F3),
        "F4" => Ok(KeyCode::F4),
        "F5" => Ok(KeyCode::F5),
        "F6" => Ok(KeyCode::F6),
        "F7" => Ok(KeyCode::F7),
        "F8" => Ok(KeyCode::F8),
        "F9" => Ok(KeyCode::F9),
        "F10" => Ok(KeyCode::F10),
        "F11" => Ok(KeyCode::F11),
        "F12" => Ok(KeyCode::F12),
        "ArrowUp" => Ok(KeyCode::ArrowUp),
        "ArrowDown" => Ok(KeyCode::ArrowDown),
        "ArrowLeft" => Ok(KeyCode::ArrowLeft),
        "ArrowRight" => Ok(KeyCode::ArrowRight),
        "Enter" => Ok(KeyCode::Enter),
        "Space" => Ok(KeyCode::Space),
        "Escape" => Ok(KeyCode::Escape),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Pause" => Ok(KeyCode::Pause),
        "PrintScreen" => Ok(KeyCode::PrintScreen),
        "ShiftLeft" => Ok(KeyCode::ShiftLeft),
        "ShiftRight" => Ok(KeyCode::ShiftRight),
        "ControlLeft" => Ok(KeyCode::ControlLeft),
        "ControlRight" => Ok(KeyCode::ControlRight),
        "AltLeft" => Ok(KeyCode::AltLeft),
        "AltRight" => Ok(KeyCode::AltRight),
        _ => Err(format!("Unknown key code: {}", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputCode;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_keycode_conversion() {
        assert_eq!(keycode_to_string(KeyCode::Escape), "Escape");
        assert_eq!(string_to_keycode("Escape"), Ok(KeyCode::Escape));
        assert_eq!(string_to_keycode("F12"), Ok(KeyCode::F12));
        assert!(string_to_keycode("Hyper").is_err());
    }

    #[test]
    fn test_names_round_trip() {
        for name in ["KeyQ", "Digit7", "F5", "ArrowLeft", "PrintScreen", "AltRight"] {
            let key = string_to_keycode(name).expect("known key");
            assert_eq!(keycode_to_string(key), name);
        }
    }

    #[test]
    fn test_key_event() {
        let event = key_event(PhysicalKey::Code(KeyCode::Escape), ElementState::Pressed)
            .expect("identified key");
        assert_eq!(event.code, InputCode::Key(KeyCode::Escape));
        assert!(event.pressed);

        let release = key_event(PhysicalKey::Code(KeyCode::KeyA), ElementState::Released)
            .expect("identified key");
        assert!(!release.pressed);

        assert_eq!(
            key_event(
                PhysicalKey::Unidentified(NativeKeyCode::Unidentified),
                ElementState::Pressed
            ),
            None
        );
    }
}
