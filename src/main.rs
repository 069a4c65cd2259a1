use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec3;
use log::info;

use parkour::engine::game_loop::GameLoop;
use parkour::engine::input::{Action, InputEvent};
use parkour::engine::physics::{ColliderBuilder, PhysicsWorld};
use parkour::game::characters::{Abilities, BodySettings, DebugOverlay, FirstPersonController, Player};
use parkour::game::fsm::{FsmConfig, FsmEvent};
use parkour::game::movement::LocomotionConfig;

/// Host frame length; deliberately not a multiple of the physics step
const FRAME_TIME: f32 = 1.0 / 75.0;

/// Headless parkour run through a small level
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Simulated seconds
    #[arg(short, long, default_value_t = 9.0)]
    seconds: f32,

    /// Seed for the cosmetic random choices
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Allow running along walls
    #[arg(long)]
    wall_run: bool,
}

/// A floor, a crate to vault, and a long wall on the right further ahead
fn build_level() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();

    world.add_collider(
        ColliderBuilder::cuboid(Vec3::new(60.0, 1.0, 200.0))
            .resting_on(0.0, 0.0, -80.0)
            .name("floor")
            .group("concrete"),
    );
    world.add_collider(
        ColliderBuilder::cuboid(Vec3::new(3.0, 1.0, 0.8))
            .resting_on(0.0, 1.0, -12.0)
            .name("crate")
            .group("wood"),
    );
    world.add_collider(
        ColliderBuilder::cuboid(Vec3::new(1.0, 6.0, 30.0))
            .resting_on(1.2, 6.0, -40.0)
            .name("wall"),
    );

    world
}

/// Input to replay, as (seconds, event), in time order
fn timeline() -> Vec<(f32, InputEvent)> {
    use InputEvent::{Pressed, Released};

    vec![
        (0.2, Pressed(Action::MoveForward)),
        (1.0, Pressed(Action::Run)),
        // Tap vault while closing in on the crate
        (2.0, Pressed(Action::Vault)),
        (2.05, Released(Action::Vault)),
        (2.2, Pressed(Action::Vault)),
        (2.25, Released(Action::Vault)),
        (2.4, Pressed(Action::Vault)),
        (2.45, Released(Action::Vault)),
        (4.0, Pressed(Action::Crouch)),
        (4.6, Released(Action::Crouch)),
        (5.2, Pressed(Action::Run)),
        (5.6, Pressed(Action::Jump)),
        (5.7, Released(Action::Jump)),
        (7.5, Released(Action::Run)),
        (8.0, Released(Action::MoveForward)),
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Starting parkour demo: {:?}", args);

    let world = build_level();
    info!("Level built with {} colliders", world.len());

    let abilities = Abilities {
        wall_run: args.wall_run,
        wall_jump: args.wall_run,
        slide: true,
        ..Abilities::default()
    };
    let actor = FirstPersonController::with_settings(BodySettings::default(), Vec3::ZERO, args.seed)
        .abilities(abilities);

    let mut player = Player::spawn(actor, FsmConfig::default(), &LocomotionConfig::default(), &world)
        .context("failed to spawn the player")?;

    let overlay = DebugOverlay::new();
    player.subscribe(overlay.listener());
    player.subscribe(|event| {
        if let FsmEvent::StateChanged { from, to, transition } = event {
            info!("{} -> {} ({})", from, to, transition);
        }
    });

    let mut game_loop = GameLoop::new();
    let mut script = timeline().into_iter().peekable();

    while game_loop.elapsed_secs() < args.seconds {
        let steps = game_loop.advance(FRAME_TIME);
        let now = game_loop.elapsed_secs();

        while let Some((_, event)) = script.next_if(|(at, _)| *at <= now) {
            player.handle_input(&event, &world);
        }

        for _ in 0..steps.physics_steps {
            player.physics_process(game_loop.fixed_timestep(), &world);
        }
        player.process(steps.frame_delta, &world);
    }

    info!("{}", overlay.render(player.actor.body.velocity));
    info!(
        "Finished after {:.2}s and {} physics steps at {:?}, {} footsteps",
        game_loop.elapsed_secs(),
        game_loop.update_count(),
        player.actor.body.position,
        player.actor.footsteps.steps()
    );

    Ok(())
}
