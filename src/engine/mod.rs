// Engine modules: game loop, input, physics collaborators

pub mod game_loop;
pub mod input;
pub mod physics;
