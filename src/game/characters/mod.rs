// Character system
//
// This module contains everything related to the playable character:
// - The first-person controller the locomotion states drive
// - Ability toggles, camera and body settings
// - Camera rig, detectors, stance animations and footsteps
// - The player, which ticks actor, input and state machine together

pub mod animation;
pub mod camera;
pub mod controller;
pub mod debug_overlay;
pub mod detectors;
pub mod footsteps;
pub mod player;
pub mod settings;

// Re-export commonly used types
pub use animation::{AnimationClip, AnimationPlayer, PlaybackDirection};
pub use camera::CameraRig;
pub use controller::FirstPersonController;
pub use debug_overlay::DebugOverlay;
pub use detectors::Detectors;
pub use footsteps::{Footstep, Footsteps};
pub use player::Player;
pub use settings::{Abilities, BodySettings, CameraSettings, Stance};
