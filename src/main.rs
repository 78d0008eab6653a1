//! Lanternvale headless runner.
//!
//! Builds the intro scene and plays it with scripted input, logging what
//! happens: the player walks to the talking cube, reads its dialogue, picks
//! up the lantern and stashes it.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults when missing, written back with
//!    `--write-config`) and the dialogue script
//! 2. Spawn the scene and lock the cursor for mouse look
//! 3. Each tick: autopilot writes raw input, then the gameplay schedule runs
//!    with a fixed `dt` derived from `target_fps`
//! 4. Stop after `--ticks` ticks or when escape raises the quit flag
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --ticks 2000
//! ```

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};

use lanternvale::autopilot::{Autopilot, autopilot_system};
use lanternvale::components::player::Player;
use lanternvale::components::transform::Transform3D;
use lanternvale::dialoguescript::DialogueScript;
use lanternvale::game;
use lanternvale::resources::gameconfig::GameConfig;
use lanternvale::resources::worldsignals::WorldSignals;
use lanternvale::resources::worldtime::WorldTime;
use lanternvale::systems::input::{QUIT_FLAG, update_input_state};

/// Lanternvale, headless.
#[derive(Parser)]
#[command(version, about = "Runs the Lanternvale intro scene with scripted input.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON dialogue script for the talking cube.
    #[arg(long, value_name = "PATH", default_value = "assets/dialogue/intro.json")]
    dialogue: PathBuf,

    /// Stop after this many ticks.
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Write the effective configuration back to the config file.
    #[arg(long)]
    write_config: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}; using defaults", e);
    }
    if cli.write_config
        && let Err(e) = config.save_to_file()
    {
        warn!("{}", e);
    }
    let dt = config.tick_delta();

    // --------------- ECS world + scene ---------------
    let mut world = World::new();
    game::insert_resources(&mut world, config);

    let root = match DialogueScript::load_from_file(&cli.dialogue) {
        Ok(script) => match game::load_dialogue(&mut world, &script) {
            Ok(loaded) => loaded.root,
            Err(e) => {
                eprintln!("Error in {}: {e}", cli.dialogue.display());
                std::process::exit(1);
            }
        },
        Err(e) => {
            warn!("{}: {}; using the built-in dialogue", cli.dialogue.display(), e);
            game::intro_dialogue(&mut world)
        }
    };

    let scene = match game::spawn_intro(&mut world, root) {
        Ok(scene) => scene,
        Err(e) => {
            eprintln!("Error spawning scene: {e}");
            std::process::exit(1);
        }
    };
    game::start(&mut world, scene.player);

    world.insert_resource(Autopilot::walk_and_talk());
    let mut update = game::update_schedule();
    update.add_systems(autopilot_system.before(update_input_state));

    // --------------- Main loop ---------------
    while world.resource::<WorldTime>().frame_count < cli.ticks
        && !world.resource::<WorldSignals>().has_flag(QUIT_FLAG)
    {
        game::step(&mut world, &mut update, dt);
    }

    // --------------- Summary ---------------
    let ticks = world.resource::<WorldTime>().frame_count;
    if let Some(position) = world.get::<Transform3D>(scene.player).map(|t| t.position) {
        info!("player ended at {:?} after {} ticks", position, ticks);
    }
    if let Some(player) = world.get::<Player>(scene.player) {
        info!(
            "holding {:?}, {} of {} inventory slots used",
            player.held.get(),
            player.inventory.len(),
            player.inventory.size()
        );
    }
    let mut flags: Vec<&String> = world.resource::<WorldSignals>().get_flags().iter().collect();
    flags.sort();
    info!("flags: {:?}", flags);
}
