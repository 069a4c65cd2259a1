// Game action definitions

use glam::Vec2;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement axes
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,

    // Locomotion
    Jump,
    Crouch,
    Crawl,
    Run,
    Vault,
}

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 9] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveForward,
        Action::MoveBack,
        Action::Jump,
        Action::Crouch,
        Action::Crawl,
        Action::Run,
        Action::Vault,
    ];

    /// Name used by input maps and scripted timelines
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveLeft => "move_left",
            Self::MoveRight => "move_right",
            Self::MoveForward => "move_up",
            Self::MoveBack => "move_down",
            Self::Jump => "jump",
            Self::Crouch => "crouch",
            Self::Crawl => "crawl",
            Self::Run => "run",
            Self::Vault => "vault",
        }
    }

    /// Look an action up by its input-map name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

/// Raw input delivered by the host during the unhandled-input phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Pressed(Action),
    Released(Action),
    /// Relative mouse movement in pixels
    MouseMotion { relative: Vec2 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_equality() {
        assert_eq!(Action::Jump, Action::Jump);
        assert_ne!(Action::Jump, Action::Crouch);
    }

    #[test]
    fn test_names_round_trip_through_lookup() {
        for action in Action::ALL {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("fly"), None);
    }

    #[test]
    fn test_no_duplicate_names() {
        let mut seen = std::collections::HashSet::new();
        for action in Action::ALL {
            assert!(seen.insert(action.name()), "Duplicate action name found");
        }
    }
}
