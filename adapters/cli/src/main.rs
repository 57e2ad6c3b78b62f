#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Path Defence simulation headlessly.
//!
//! The adapter owns the fixed-timestep loop: each iteration applies a tick to
//! the world, feeds the broadcast events and snapshot views to the pure
//! systems, and applies the commands they emit. HUD lines are printed straight
//! from the event stream.

mod level_transfer;

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::{
    Command as SimCommand, Event, LevelBlueprint, Position, SimulationConfig,
};
use path_defence_rendering::{
    health_percent, preview, Scene, SceneEnemy, SceneProjectile, SceneTower, TurretHeadings,
};
use path_defence_system_spawning::{Config as SpawnConfig, Spawning};
use path_defence_system_tower_combat::emit_fire_commands;
use path_defence_system_tower_targeting::TowerTargeting;
use path_defence_world::{apply, query, World};

const TICK: Duration = Duration::from_millis(16);

/// Command-line arguments accepted by the Path Defence driver.
#[derive(Debug, Parser)]
#[command(name = "path-defence", about = "Headless Path Defence simulation driver")]
struct Args {
    /// Level to load: a JSON blueprint file or a `level:v1:` transfer string.
    #[arg(long)]
    level: Option<String>,
    /// TOML file overriding the simulation tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed used for the rare-enemy rolls.
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Maximum number of 16 ms ticks to simulate.
    #[arg(long, default_value_t = 37_500)]
    ticks: u64,
    /// Do not start waves automatically when the director is ready.
    #[arg(long)]
    no_auto_start: bool,
    /// Print the canonical transfer string for the loaded level and exit.
    #[arg(long)]
    print_transfer: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    let blueprint = load_blueprint(args.level.as_deref())?;

    if args.print_transfer {
        println!("{}", level_transfer::encode(&blueprint));
        return Ok(());
    }

    let spawn_interval = config.spawn_interval;
    let mut world = World::with_config(config, args.seed);
    let mut spawning = Spawning::new(SpawnConfig::new(spawn_interval));
    let mut targeting = TowerTargeting::new();
    let mut headings = TurretHeadings::new();

    let mut events = Vec::new();
    apply(&mut world, SimCommand::LoadLevel { blueprint }, &mut events);
    report_events(&events);

    let mut targets = Vec::new();
    let mut commands = Vec::new();
    let mut start_pending = !args.no_auto_start;
    let mut game_over = false;

    for _ in 0..args.ticks {
        events.clear();

        if start_pending {
            apply(&mut world, SimCommand::StartWave, &mut events);
            start_pending = false;
        }
        apply(&mut world, SimCommand::Tick { dt: TICK }, &mut events);

        spawning.handle(&events, query::wave_progress(&world), &mut commands);
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        let towers = query::tower_view(&world);
        targeting.handle(
            query::play_mode(&world),
            &towers,
            &query::enemy_view(&world),
            &mut targets,
        );
        headings.update(&targets);
        emit_fire_commands(query::play_mode(&world), &towers, &targets, &mut commands);
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        report_events(&events);
        for event in &events {
            match event {
                Event::WaveReady => start_pending = !args.no_auto_start,
                Event::GameOver { .. } => game_over = true,
                _ => {}
            }
        }
        if game_over {
            break;
        }
    }

    let scene = assemble_scene(&world, &headings);
    let hud = &scene.hud;
    println!(
        "final: money {} | score {} | lives {} | wave {} | {}",
        hud.money,
        hud.score,
        hud.lives,
        hud.wave.get(),
        hud.status
    );
    println!(
        "scene: {} towers, {} enemies, {} projectiles, {} path dots",
        scene.towers.len(),
        scene.enemies.len(),
        scene.projectiles.len(),
        scene.path_dots.len()
    );

    Ok(())
}

fn load_config(path: &PathBuf) -> Result<SimulationConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn load_blueprint(level: Option<&str>) -> Result<LevelBlueprint> {
    let Some(level) = level else {
        return Ok(demo_level());
    };

    if level.starts_with(level_transfer::TRANSFER_HEADER) {
        return level_transfer::decode(level).context("failed to decode level transfer string");
    }

    let raw = fs::read_to_string(level)
        .with_context(|| format!("failed to read level file {level}"))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse level file {level}"))
}

/// Built-in level used when no blueprint is supplied.
fn demo_level() -> LevelBlueprint {
    LevelBlueprint {
        path: vec![
            Position::new(0.0, 100.0),
            Position::new(300.0, 100.0),
            Position::new(300.0, 400.0),
            Position::new(600.0, 400.0),
        ],
        start: Position::new(0.0, 100.0),
        end: Position::new(600.0, 400.0),
        towers: vec![Position::new(200.0, 200.0), Position::new(400.0, 300.0)],
    }
}

fn report_events(events: &[Event]) {
    for event in events {
        match event {
            Event::LevelLoaded => println!("level loaded"),
            Event::WaveStarted { wave } => println!("wave {} started", wave.get()),
            Event::WaveStartRejected { reason } => println!("wave start refused: {reason}"),
            Event::EnemySpawned { enemy, rare } => {
                if *rare {
                    println!("rare enemy {} spawned", enemy.get());
                }
            }
            Event::EnemyKilled {
                enemy,
                money_reward,
                score_reward,
            } => println!(
                "enemy {} destroyed (+{money_reward} money, +{score_reward} score)",
                enemy.get()
            ),
            Event::EnemyReachedEnd {
                enemy,
                lives_remaining,
            } => println!(
                "enemy {} escaped ({lives_remaining} lives remaining)",
                enemy.get()
            ),
            Event::WaveCompleted { wave, bonus } => {
                println!("wave complete (+{bonus} bonus), wave {} is next", wave.get());
            }
            Event::WaveReady => println!("next wave ready"),
            Event::GameOver { score } => println!("game over with score {score}"),
            _ => {}
        }
    }
}

/// Assembles the presentation snapshot a rendering backend would consume.
fn assemble_scene(world: &World, headings: &TurretHeadings) -> Scene {
    let path = query::path_model(world);
    let towers = query::tower_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| SceneTower {
            id: snapshot.id,
            position: snapshot.position,
            level: snapshot.level,
            turret_angle: headings.heading_of(snapshot.id),
        })
        .collect();
    let enemies = query::enemy_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| SceneEnemy {
            id: snapshot.id,
            position: snapshot.position,
            health_percent: health_percent(&snapshot),
            size_multiplier: snapshot.size_multiplier,
            rare: snapshot.rare,
        })
        .collect();
    let projectiles = query::projectile_view(world)
        .into_vec()
        .into_iter()
        .map(|snapshot| SceneProjectile {
            id: snapshot.id,
            position: snapshot.position,
        })
        .collect();

    Scene {
        path_dots: preview::sample_dots(path),
        path_arrow: preview::sample_arrow(path, 0.0),
        towers,
        enemies,
        projectiles,
        play_mode: query::play_mode(world),
        hud: query::hud_status(world),
    }
}
