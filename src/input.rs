//! Keyboard and mouse bindings for the weapon
//!
//! | Input            | Command        |
//! |------------------|----------------|
//! | `1` .. `9`       | switch weapon  |
//! | `Space`, LMB     | shoot          |
//! | `R`              | reload         |
//! | `F`              | inspect        |
//!
//! Only presses produce commands; releases and key repeats are ignored.

use winit::{
    event::{ElementState, KeyEvent, MouseButton},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::gfx::scene::Scene;
use crate::gun::GunManager;

/// Weapon action requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GunCommand {
    /// Select weapon by index; out-of-range values are clamped by the manager
    Switch(i64),
    Shoot,
    Reload,
    Inspect,
}

impl GunCommand {
    /// Runs the command against `guns`
    pub fn apply(self, guns: &mut GunManager, scene: &mut Scene) {
        match self {
            GunCommand::Switch(index) => guns.switch_gun(index),
            GunCommand::Shoot => guns.shoot(),
            GunCommand::Reload => guns.reload(),
            GunCommand::Inspect => guns.inspect(scene),
        }
    }
}

/// Maps a physical key press to a command
pub fn command_for_key(key: KeyCode, state: ElementState) -> Option<GunCommand> {
    if state != ElementState::Pressed {
        return None;
    }

    let command = match key {
        KeyCode::Digit1 => GunCommand::Switch(0),
        KeyCode::Digit2 => GunCommand::Switch(1),
        KeyCode::Digit3 => GunCommand::Switch(2),
        KeyCode::Digit4 => GunCommand::Switch(3),
        KeyCode::Digit5 => GunCommand::Switch(4),
        KeyCode::Digit6 => GunCommand::Switch(5),
        KeyCode::Digit7 => GunCommand::Switch(6),
        KeyCode::Digit8 => GunCommand::Switch(7),
        KeyCode::Digit9 => GunCommand::Switch(8),
        KeyCode::Space => GunCommand::Shoot,
        KeyCode::KeyR => GunCommand::Reload,
        KeyCode::KeyF => GunCommand::Inspect,
        _ => return None,
    };
    Some(command)
}

/// Maps a mouse button press to a command
pub fn command_for_mouse(button: MouseButton, state: ElementState) -> Option<GunCommand> {
    match (button, state) {
        (MouseButton::Left, ElementState::Pressed) => Some(GunCommand::Shoot),
        _ => None,
    }
}

/// Maps a window keyboard event to a command
pub fn command_for_key_event(event: &KeyEvent) -> Option<GunCommand> {
    match event {
        KeyEvent {
            physical_key: PhysicalKey::Code(key),
            state,
            repeat: false,
            ..
        } => command_for_key(*key, *state),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_switch() {
        assert_eq!(
            command_for_key(KeyCode::Digit1, ElementState::Pressed),
            Some(GunCommand::Switch(0))
        );
        assert_eq!(
            command_for_key(KeyCode::Digit9, ElementState::Pressed),
            Some(GunCommand::Switch(8))
        );
        assert_eq!(command_for_key(KeyCode::Digit0, ElementState::Pressed), None);
    }

    #[test]
    fn test_actions() {
        assert_eq!(
            command_for_key(KeyCode::KeyR, ElementState::Pressed),
            Some(GunCommand::Reload)
        );
        assert_eq!(
            command_for_key(KeyCode::KeyF, ElementState::Pressed),
            Some(GunCommand::Inspect)
        );
        assert_eq!(
            command_for_key(KeyCode::Space, ElementState::Pressed),
            Some(GunCommand::Shoot)
        );
        assert_eq!(
            command_for_mouse(MouseButton::Left, ElementState::Pressed),
            Some(GunCommand::Shoot)
        );
        assert_eq!(command_for_mouse(MouseButton::Right, ElementState::Pressed), None);
    }

    #[test]
    fn test_releases_are_ignored() {
        assert_eq!(command_for_key(KeyCode::Space, ElementState::Released), None);
        assert_eq!(command_for_mouse(MouseButton::Left, ElementState::Released), None);
    }
}
