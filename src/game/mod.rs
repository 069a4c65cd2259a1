// Game logic: the locomotion state machine and the character it drives

pub mod characters;
pub mod fsm;
pub mod movement;
