// Input handling system
//
// Input is polled, not pushed: the host feeds raw `InputEvent`s into a
// `PlayerInput`, and locomotion states query it once per physics tick.
//
// ## Architecture
//
// - `action`: Defines game actions and raw input events
// - `player`: Per-player pressed / just-pressed / just-released tracking
//
// ## Usage Example
//
// ```rust
// use parkour::engine::input::{Action, InputEvent, PlayerInput};
//
// let mut input = PlayerInput::new();
// input.apply(&InputEvent::Pressed(Action::Jump));
//
// if input.just_pressed(Action::Jump) {
//     // Jump was pressed this physics frame
// }
//
// // At the end of each physics frame
// input.update();
// ```

pub mod action;
pub mod player;

// Re-export commonly used types
pub use action::{Action, InputEvent};
pub use player::PlayerInput;
