// First-person locomotion: a finite state machine driving walk, run, jump,
// fall, crouch, crawl, slide, vault and wall-run on a kinematic body.

pub mod core;
pub mod engine;
pub mod game;

#[cfg(test)]
pub(crate) mod testing;
