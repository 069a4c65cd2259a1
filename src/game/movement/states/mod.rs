// Concrete locomotion states

mod crawl;
mod crouch;
mod fall;
mod idle;
mod jump;
mod run;
mod slide;
mod vault;
mod walk;
mod wall_run;

pub use crawl::Crawl;
pub use crouch::Crouch;
pub use fall::Fall;
pub use idle::Idle;
pub use jump::Jump;
pub use run::Run;
pub use slide::Slide;
pub use vault::Vault;
pub use walk::Walk;
pub use wall_run::WallRun;
