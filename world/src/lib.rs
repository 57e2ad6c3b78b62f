#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Path Defence.

use std::time::Duration;

use path_defence_core::{
    Command, EnemyId, Event, Health, LevelBlueprint, PathModel, PlacementError, PlayMode, Position,
    ProjectileId, SimulationConfig, TowerId, UpgradeError, WaveNumber, WaveStartError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_RNG_SEED: u64 = 0x7d3a_91cf_0b42_6e15;

/// Lifecycle phase of the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WavePhase {
    /// Waiting for an explicit start command.
    Idle,
    /// Spawning or fighting the active wave.
    InProgress,
    /// Counting down toward readiness for the next wave.
    Cooldown { remaining: Duration },
    /// Terminal state entered when the last life was lost.
    GameOver,
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    position: Position,
    health: Health,
    spawn_health: Health,
    speed: f32,
    size_multiplier: f32,
    rare: bool,
    /// Index into the path waypoints; past the end means the enemy heads for
    /// the level exit.
    target_index: usize,
    reached_end: bool,
}

impl Enemy {
    /// Moves the enemy one step along the path. Within a step the enemy
    /// either snaps exactly onto its target waypoint and advances the index,
    /// or covers `speed` units toward it. The snap never overshoots the
    /// recorded waypoint coordinate.
    fn step(&mut self, path: &PathModel, end: Position) {
        let waypoints = path.waypoints();
        if self.target_index < waypoints.len() {
            let target = waypoints[self.target_index];
            let distance = self.position.distance_to(target);
            if distance <= self.speed {
                self.position = target;
                self.target_index += 1;
            } else {
                self.position = advance_toward(self.position, target, self.speed);
            }
        } else {
            let distance = self.position.distance_to(end);
            if distance <= self.speed {
                self.reached_end = true;
            } else {
                self.position = advance_toward(self.position, end, self.speed);
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Tower {
    id: TowerId,
    position: Position,
    level: u32,
    damage: u32,
    range: f32,
    ready_in: Duration,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Position,
    target: EnemyId,
    /// Damage captured from the firing tower at launch.
    damage: u32,
}

fn advance_toward(from: Position, to: Position, distance: f32) -> Position {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return from;
    }
    Position::new(
        from.x + dx / length * distance,
        from.y + dy / length * distance,
    )
}

/// Represents the authoritative Path Defence world state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    path: PathModel,
    start: Position,
    end: Position,
    towers: Vec<Tower>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    money: u32,
    score: u32,
    lives: u32,
    wave: WaveNumber,
    wave_quota: u32,
    wave_spawned: u32,
    wave_defeated: u32,
    phase: WavePhase,
    play_mode: PlayMode,
    paused: bool,
    next_enemy_id: u32,
    next_tower_id: u32,
    next_projectile_id: u32,
    rng: ChaCha8Rng,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new world with the reference balance and a fixed seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default(), DEFAULT_RNG_SEED)
    }

    /// Creates a new world with explicit tunables and rare-roll seed.
    #[must_use]
    pub fn with_config(config: SimulationConfig, seed: u64) -> Self {
        let wave_quota = config.enemies_per_wave;
        let money = config.starting_money;
        let lives = config.starting_lives;
        Self {
            config,
            path: PathModel::new(Vec::new()),
            start: Position::ORIGIN,
            end: Position::ORIGIN,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            money,
            score: 0,
            lives,
            wave: WaveNumber::FIRST,
            wave_quota,
            wave_spawned: 0,
            wave_defeated: 0,
            phase: WavePhase::Idle,
            play_mode: PlayMode::Combat,
            paused: false,
            next_enemy_id: 0,
            next_tower_id: 0,
            next_projectile_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn snap_to_grid(&self, position: Position) -> Position {
        let grid = self.config.tower_grid;
        Position::new(
            (position.x / grid).round() * grid,
            (position.y / grid).round() * grid,
        )
    }

    fn tower_at(&self, position: Position) -> bool {
        self.towers.iter().any(|tower| tower.position == position)
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);
        id
    }

    fn allocate_tower_id(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        id
    }

    fn install_tower(&mut self, position: Position) -> (TowerId, Position) {
        let snapped = self.snap_to_grid(position);
        let id = self.allocate_tower_id();
        self.towers.push(Tower {
            id,
            position: snapped,
            level: 1,
            damage: self.config.tower_base_damage,
            range: self.config.tower_base_range,
            ready_in: Duration::ZERO,
        });
        (id, snapped)
    }

    fn reset_wave_state(&mut self) {
        self.wave = WaveNumber::FIRST;
        self.wave_quota = self.config.enemies_per_wave;
        self.wave_spawned = 0;
        self.wave_defeated = 0;
        self.phase = WavePhase::Idle;
    }

    fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != WavePhase::InProgress || self.wave_spawned >= self.wave_quota {
            return;
        }

        let wave_index = self.wave.get().saturating_sub(1);
        let rare = self.wave.get() > self.config.rare_wave_threshold
            && self.rng.gen_bool(self.config.rare_chance);

        let base_health = if rare {
            (self.config.enemy_base_health as f32 * self.config.rare_health_multiplier).round()
                as i32
        } else {
            self.config.enemy_base_health
        };
        let health = Health::new(
            base_health.saturating_add(wave_index as i32 * self.config.enemy_health_increase),
        );
        let speed =
            self.config.enemy_base_speed + wave_index as f32 * self.config.enemy_speed_increase;
        let size_multiplier = if rare {
            self.config.rare_size_multiplier
        } else {
            1.0
        };

        let id = self.allocate_enemy_id();
        self.enemies.push(Enemy {
            id,
            position: self.start,
            health,
            spawn_health: health,
            speed,
            size_multiplier,
            rare,
            target_index: 0,
            reached_end: false,
        });
        self.wave_spawned += 1;
        out_events.push(Event::EnemySpawned { enemy: id, rare });
    }

    fn validate_wave_start(&self) -> Result<(), WaveStartError> {
        match self.phase {
            WavePhase::GameOver => return Err(WaveStartError::GameOver),
            WavePhase::InProgress => return Err(WaveStartError::AlreadyInProgress),
            WavePhase::Cooldown { .. } => return Err(WaveStartError::CoolingDown),
            WavePhase::Idle => {}
        }
        if self.paused {
            return Err(WaveStartError::Paused);
        }
        if self.play_mode == PlayMode::Editor {
            return Err(WaveStartError::EditorActive);
        }
        Ok(())
    }

    fn step_enemies(&mut self, out_events: &mut Vec<Event>) {
        for enemy in self.enemies.iter_mut() {
            enemy.step(&self.path, self.end);
        }

        let escaped: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| enemy.reached_end)
            .map(|enemy| enemy.id)
            .collect();
        for enemy_id in escaped {
            self.enemies.retain(|enemy| enemy.id != enemy_id);
            self.lives = self.lives.saturating_sub(1);
            out_events.push(Event::EnemyReachedEnd {
                enemy: enemy_id,
                lives_remaining: self.lives,
            });
            if self.lives == 0 {
                self.phase = WavePhase::GameOver;
                out_events.push(Event::GameOver { score: self.score });
                return;
            }
        }
    }

    fn step_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let speed = self.config.projectile_speed;
        let impact_radius = self.config.impact_radius;
        let mut retired: Vec<ProjectileId> = Vec::new();
        let mut hits: Vec<(ProjectileId, EnemyId, u32)> = Vec::new();

        for projectile in self.projectiles.iter_mut() {
            let Some(target) = self
                .enemies
                .iter()
                .find(|enemy| enemy.id == projectile.target)
            else {
                retired.push(projectile.id);
                continue;
            };

            let distance = projectile.position.distance_to(target.position);
            if distance < impact_radius {
                hits.push((projectile.id, target.id, projectile.damage));
            } else {
                projectile.position = advance_toward(projectile.position, target.position, speed);
            }
        }

        for projectile_id in retired {
            self.projectiles
                .retain(|projectile| projectile.id != projectile_id);
            out_events.push(Event::ProjectileRetired {
                projectile: projectile_id,
            });
        }

        for (projectile_id, enemy_id, damage) in hits {
            self.projectiles
                .retain(|projectile| projectile.id != projectile_id);
            out_events.push(Event::ProjectileHit {
                projectile: projectile_id,
                target: enemy_id,
                damage,
            });

            let Some(enemy) = self.enemies.iter_mut().find(|enemy| enemy.id == enemy_id) else {
                continue;
            };
            enemy.health = enemy.health.damaged_by(damage);
            if enemy.health.is_depleted() {
                self.enemies.retain(|enemy| enemy.id != enemy_id);
                self.money = self.money.saturating_add(self.config.kill_money);
                self.score = self.score.saturating_add(self.config.kill_score);
                self.wave_defeated += 1;
                out_events.push(Event::EnemyKilled {
                    enemy: enemy_id,
                    money_reward: self.config.kill_money,
                    score_reward: self.config.kill_score,
                });
            }
        }
    }

    fn step_wave_lifecycle(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        match self.phase {
            WavePhase::InProgress => {
                if self.wave_spawned >= self.wave_quota && self.enemies.is_empty() {
                    self.wave = self.wave.next();
                    self.wave_quota = self
                        .wave_quota
                        .saturating_add(self.config.enemies_per_wave_increase);
                    let bonus = 100u32.saturating_mul(self.wave.get());
                    self.money = self.money.saturating_add(bonus);
                    self.score = self.score.saturating_add(bonus);
                    self.phase = WavePhase::Cooldown {
                        remaining: self.config.wave_cooldown,
                    };
                    out_events.push(Event::WaveCompleted {
                        wave: self.wave,
                        bonus,
                    });
                }
            }
            WavePhase::Cooldown { remaining } => {
                let remaining = remaining.saturating_sub(dt);
                if remaining.is_zero() {
                    self.phase = WavePhase::Idle;
                    out_events.push(Event::WaveReady);
                } else {
                    self.phase = WavePhase::Cooldown { remaining };
                }
            }
            WavePhase::Idle | WavePhase::GameOver => {}
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.paused || self.play_mode == PlayMode::Editor || self.phase == WavePhase::GameOver {
            return;
        }

        out_events.push(Event::TimeAdvanced { dt });

        for tower in self.towers.iter_mut() {
            tower.ready_in = tower.ready_in.saturating_sub(dt);
        }

        self.step_enemies(out_events);
        if self.phase == WavePhase::GameOver {
            return;
        }
        self.step_projectiles(out_events);
        self.step_wave_lifecycle(dt, out_events);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel { blueprint } => {
            let LevelBlueprint {
                path,
                start,
                end,
                towers,
            } = blueprint;
            world.path = PathModel::new(path);
            world.start = start;
            world.end = end;
            world.towers.clear();
            world.enemies.clear();
            world.projectiles.clear();
            world.money = world.config.starting_money;
            world.score = 0;
            world.lives = world.config.starting_lives;
            world.reset_wave_state();
            out_events.push(Event::LevelLoaded);
            for position in towers {
                let (tower, snapped) = world.install_tower(position);
                out_events.push(Event::TowerPlaced {
                    tower,
                    position: snapped,
                });
            }
        }
        Command::ClearLevel => {
            world.path = PathModel::new(Vec::new());
            world.start = Position::ORIGIN;
            world.end = Position::ORIGIN;
            world.towers.clear();
            world.enemies.clear();
            world.projectiles.clear();
            world.reset_wave_state();
            out_events.push(Event::LevelCleared);
        }
        Command::Tick { dt } => {
            world.tick(dt, out_events);
        }
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseChanged {
                paused: world.paused,
            });
        }
        Command::StartWave => match world.validate_wave_start() {
            Ok(()) => {
                world.phase = WavePhase::InProgress;
                world.wave_spawned = 0;
                world.wave_defeated = 0;
                out_events.push(Event::WaveStarted { wave: world.wave });
            }
            Err(reason) => {
                out_events.push(Event::WaveStartRejected { reason });
            }
        },
        Command::SpawnEnemy => {
            world.spawn_enemy(out_events);
        }
        Command::PlaceTower { position } => {
            let snapped = world.snap_to_grid(position);
            if world.money < world.config.tower_cost {
                out_events.push(Event::TowerPlacementRejected {
                    position: snapped,
                    reason: PlacementError::InsufficientFunds,
                });
                return;
            }
            if world.tower_at(snapped) {
                out_events.push(Event::TowerPlacementRejected {
                    position: snapped,
                    reason: PlacementError::DuplicateLocation,
                });
                return;
            }
            world.money -= world.config.tower_cost;
            let (tower, snapped) = world.install_tower(snapped);
            out_events.push(Event::TowerPlaced {
                tower,
                position: snapped,
            });
        }
        Command::UpgradeTower { tower } => {
            if !world.towers.iter().any(|candidate| candidate.id == tower) {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::UnknownTower,
                });
                return;
            }
            if world.money < world.config.upgrade_cost {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientFunds,
                });
                return;
            }
            world.money -= world.config.upgrade_cost;
            let range_bonus = world.config.upgrade_range_bonus;
            let damage_bonus = world.config.upgrade_damage_bonus;
            if let Some(upgraded) = world
                .towers
                .iter_mut()
                .find(|candidate| candidate.id == tower)
            {
                upgraded.level = upgraded.level.saturating_add(1);
                upgraded.damage = upgraded.damage.saturating_add(damage_bonus);
                upgraded.range += range_bonus;
                out_events.push(Event::TowerUpgraded {
                    tower,
                    level: upgraded.level,
                    damage: upgraded.damage,
                    range: upgraded.range,
                });
            }
        }
        Command::FireProjectile { tower, target } => {
            let Some(index) = world
                .towers
                .iter()
                .position(|candidate| candidate.id == tower)
            else {
                return;
            };
            if !world.towers[index].ready_in.is_zero() {
                return;
            }
            if !world.enemies.iter().any(|enemy| enemy.id == target) {
                return;
            }

            let position = world.towers[index].position;
            let damage = world.towers[index].damage;
            world.towers[index].ready_in = world.config.tower_fire_interval;

            let projectile = world.allocate_projectile_id();
            world.projectiles.push(Projectile {
                id: projectile,
                position,
                target,
                damage,
            });
            out_events.push(Event::ProjectileFired {
                projectile,
                tower,
                target,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{WavePhase, World};
    use path_defence_core::{
        EnemySnapshot, EnemyView, HudStatus, PathModel, PlayMode, ProjectileSnapshot,
        ProjectileView, TowerSnapshot, TowerView, WaveProgress, WaveStatus,
    };

    /// Captures a read-only view of the living enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    position: enemy.position,
                    health: enemy.health,
                    spawn_health: enemy.spawn_health,
                    speed: enemy.speed,
                    size_multiplier: enemy.size_multiplier,
                    rare: enemy.rare,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| TowerSnapshot {
                    id: tower.id,
                    position: tower.position,
                    level: tower.level,
                    damage: tower.damage,
                    range: tower.range,
                    ready_in: tower.ready_in,
                })
                .collect(),
        )
    }

    /// Captures a read-only view of the airborne projectiles.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id,
                    position: projectile.position,
                    target: projectile.target,
                })
                .collect(),
        )
    }

    /// Summarises the economy and wave lifecycle for HUD presentation.
    #[must_use]
    pub fn hud_status(world: &World) -> HudStatus {
        let status = match world.phase {
            WavePhase::Idle => WaveStatus::Ready,
            WavePhase::InProgress => WaveStatus::InProgress {
                spawned: world.wave_spawned,
                defeated: world.wave_defeated,
                total: world.wave_quota,
            },
            WavePhase::Cooldown { remaining } => WaveStatus::Cooldown { remaining },
            WavePhase::GameOver => WaveStatus::GameOver,
        };
        HudStatus {
            money: world.money,
            score: world.score,
            lives: world.lives,
            wave: world.wave,
            status,
            game_over: world.phase == WavePhase::GameOver,
        }
    }

    /// Exposes spawn bookkeeping for the spawning system.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            in_progress: world.phase == WavePhase::InProgress,
            spawned: world.wave_spawned,
            quota: world.wave_quota,
        }
    }

    /// Provides read-only access to the arc-length path model.
    #[must_use]
    pub fn path_model(world: &World) -> &PathModel {
        &world.path
    }

    /// Reports the active play mode.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Reports whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }
}
