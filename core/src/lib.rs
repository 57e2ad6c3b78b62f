#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A 2D point expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate in world units.
    pub x: f32,
    /// Vertical coordinate in world units.
    pub y: f32,
}

impl Position {
    /// Origin of the world coordinate system.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Creates a new position from explicit coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Unique identifier assigned to an enemy in spawn order.
///
/// Identifiers are allocated monotonically, so ordering by id is ordering by
/// spawn sequence. Ids are never reused within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based wave counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// The first wave of a level.
    pub const FIRST: Self = Self::new(1);

    /// Creates a new wave counter with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric wave number.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// The wave that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Signed enemy health; an enemy dies when its health drops to zero or below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(i32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the signed health value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the health remaining after absorbing the provided damage.
    #[must_use]
    pub const fn damaged_by(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage as i32))
    }

    /// Reports whether this health value means the enemy is dead.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }
}

/// Describes the active gameplay mode for the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Standard combat mode where waves advance and towers fire.
    Combat,
    /// Editor mode that suspends combat while the level is being authored.
    Editor,
}

/// Immutable level description supplied by the external editor or
/// persistence layer before a level begins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelBlueprint {
    /// Ordered waypoints the enemies walk between `start` and `end`.
    pub path: Vec<Position>,
    /// Point where enemies enter the level.
    pub start: Position,
    /// Point enemies must be prevented from reaching.
    pub end: Position,
    /// Positions of towers pre-placed by the level author, installed free of
    /// charge when the level loads.
    pub towers: Vec<Position>,
}

/// Arc-length parameterised view of the waypoint polyline.
///
/// Enemy locomotion never consults this model; it exists for rendering
/// previews that need a smooth point along the whole path. Segment lengths
/// are computed once at construction so repeated sampling stays cheap.
#[derive(Clone, Debug, PartialEq)]
pub struct PathModel {
    waypoints: Vec<Position>,
    segment_lengths: Vec<f32>,
    total_length: f32,
}

impl PathModel {
    /// Builds a path model from the provided waypoint sequence.
    #[must_use]
    pub fn new(waypoints: Vec<Position>) -> Self {
        let mut segment_lengths = Vec::new();
        let mut total_length = 0.0;
        for pair in waypoints.windows(2) {
            let length = pair[0].distance_to(pair[1]);
            segment_lengths.push(length);
            total_length += length;
        }
        Self {
            waypoints,
            segment_lengths,
            total_length,
        }
    }

    /// Waypoints composing the polyline in walk order.
    #[must_use]
    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    /// Total arc length of the polyline in world units.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Samples the point at normalised arc-length parameter `t` in `[0, 1]`.
    ///
    /// Fewer than two waypoints is a defined fallback, not an error: the sole
    /// waypoint is returned, or the origin when the sequence is empty. The
    /// parameter is not clamped; callers own the domain.
    #[must_use]
    pub fn interpolate(&self, t: f32) -> Position {
        match self.waypoints.as_slice() {
            [] => Position::ORIGIN,
            [only] => *only,
            waypoints => {
                if self.total_length <= f32::EPSILON {
                    return waypoints[0];
                }

                let target_length = t * self.total_length;
                let mut accumulated = 0.0;
                for (index, segment_length) in self.segment_lengths.iter().enumerate() {
                    if accumulated + segment_length >= target_length {
                        if *segment_length <= f32::EPSILON {
                            return waypoints[index];
                        }
                        let segment_t = (target_length - accumulated) / segment_length;
                        let from = waypoints[index];
                        let to = waypoints[index + 1];
                        return Position::new(
                            from.x + (to.x - from.x) * segment_t,
                            from.y + (to.y - from.y) * segment_t,
                        );
                    }
                    accumulated += segment_length;
                }

                waypoints[waypoints.len() - 1]
            }
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a level blueprint, replacing path, towers and entities.
    LoadLevel {
        /// Blueprint describing the level layout.
        blueprint: LevelBlueprint,
    },
    /// Removes the path, towers, enemies and projectiles while keeping the
    /// economy intact.
    ClearLevel,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Toggles the pause flag that suspends simulation ticking.
    TogglePause,
    /// Requests the start of the next wave.
    StartWave,
    /// Requests that the active wave spawn one enemy at the level start.
    SpawnEnemy,
    /// Requests placement of a tower near the provided position. The world
    /// snaps the position to the tower grid before validating it.
    PlaceTower {
        /// Desired tower location in world units.
        position: Position,
    },
    /// Requests an upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests that a tower fire a projectile at the given enemy.
    FireProjectile {
        /// Identifier of the firing tower.
        tower: TowerId,
        /// Identifier of the enemy targeted by the projectile.
        target: EnemyId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a level blueprint was installed.
    LevelLoaded,
    /// Confirms that the level layout was cleared.
    LevelCleared,
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Announces that the pause flag changed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
    /// Confirms that a wave started spawning.
    WaveStarted {
        /// The wave that began.
        wave: WaveNumber,
    },
    /// Reports that a wave start request was refused.
    WaveStartRejected {
        /// Specific reason the request was refused.
        reason: WaveStartError,
    },
    /// Announces that the inter-wave cooldown elapsed and the next wave may
    /// be started manually.
    WaveReady,
    /// Confirms that an enemy entered the level.
    EnemySpawned {
        /// Identifier assigned to the spawned enemy.
        enemy: EnemyId,
        /// Whether the enemy rolled the rare variant.
        rare: bool,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Money credited for the kill.
        money_reward: u32,
        /// Score credited for the kill.
        score_reward: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyReachedEnd {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
        /// Lives remaining after the escape.
        lives_remaining: u32,
    },
    /// Announces that the active wave finished and the cooldown began.
    WaveCompleted {
        /// The wave counter after completion (already incremented).
        wave: WaveNumber,
        /// Bonus credited to both money and score.
        bonus: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Grid-snapped location of the tower.
        position: Position,
    },
    /// Reports that a tower placement request was refused.
    TowerPlacementRejected {
        /// Grid-snapped location derived from the placement request.
        position: Position,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the upgrade.
        level: u32,
        /// Damage after the upgrade.
        damage: u32,
        /// Range after the upgrade.
        range: f32,
    },
    /// Reports that a tower upgrade request was refused.
    TowerUpgradeRejected {
        /// Identifier of the tower named in the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a projectile left a tower.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired the projectile.
        tower: TowerId,
        /// Enemy the projectile homes toward.
        target: EnemyId,
    },
    /// Reports that a projectile reached its target and applied damage.
    ProjectileHit {
        /// Identifier of the impacting projectile.
        projectile: ProjectileId,
        /// Enemy that absorbed the damage.
        target: EnemyId,
        /// Damage applied on impact.
        damage: u32,
    },
    /// Reports that a projectile was retired because its target no longer
    /// exists.
    ProjectileRetired {
        /// Identifier of the retired projectile.
        projectile: ProjectileId,
    },
    /// Announces the terminal game-over state.
    GameOver {
        /// Final score at the moment the last life was lost.
        score: u32,
    },
}

/// Reasons a tower placement request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The player cannot afford the tower cost.
    #[error("not enough money to place a tower")]
    InsufficientFunds,
    /// A tower already occupies the snapped grid cell.
    #[error("a tower already occupies this location")]
    DuplicateLocation,
}

/// Reasons a tower upgrade request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum UpgradeError {
    /// The player cannot afford the upgrade cost.
    #[error("not enough money to upgrade the tower")]
    InsufficientFunds,
    /// No tower with the provided identifier exists.
    #[error("no tower with the requested identifier exists")]
    UnknownTower,
}

/// Reasons a wave start request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum WaveStartError {
    /// A wave is already spawning or has live enemies.
    #[error("a wave is already in progress")]
    AlreadyInProgress,
    /// The inter-wave cooldown has not elapsed yet.
    #[error("the inter-wave cooldown has not elapsed")]
    CoolingDown,
    /// The simulation is paused.
    #[error("the simulation is paused")]
    Paused,
    /// The simulation is in editor mode.
    #[error("the editor is active")]
    EditorActive,
    /// The game already ended.
    #[error("the game is over")]
    GameOver,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Current position in world units.
    pub position: Position,
    /// Remaining health.
    pub health: Health,
    /// Health the enemy spawned with, for health-bar presentation.
    pub spawn_health: Health,
    /// Movement speed in world units per tick.
    pub speed: f32,
    /// Visual scale; 1.0 for normal enemies, 1.5 for rare ones.
    pub size_multiplier: f32,
    /// Whether the enemy rolled the rare variant at spawn.
    pub rare: bool,
}

/// Read-only snapshot describing all living enemies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether no enemies are alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of living enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Grid-snapped location of the tower.
    pub position: Position,
    /// Upgrade level, starting at 1.
    pub level: u32,
    /// Damage applied per projectile.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Time remaining until the tower may fire again; zero means ready.
    pub ready_in: Duration,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: Position,
    /// Enemy the projectile homes toward.
    pub target: EnemyId,
}

/// Read-only snapshot describing all airborne projectiles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Target assignment produced by the targeting system for one tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that should track the enemy.
    pub tower: TowerId,
    /// Enemy selected as the nearest candidate in range.
    pub enemy: EnemyId,
    /// Location of the tower, for aim-line presentation.
    pub tower_position: Position,
    /// Location of the enemy at selection time.
    pub enemy_position: Position,
}

/// Spawn bookkeeping exposed to the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveProgress {
    /// Whether a wave is currently spawning or has live enemies.
    pub in_progress: bool,
    /// Enemies spawned so far in the active wave.
    pub spawned: u32,
    /// Total enemies the active wave will spawn.
    pub quota: u32,
}

impl WaveProgress {
    /// Enemies the active wave has yet to spawn.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.quota.saturating_sub(self.spawned)
    }
}

/// Lifecycle phase of the wave director, with HUD-facing progress data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveStatus {
    /// Waiting for an explicit start command.
    Ready,
    /// Spawning or fighting the active wave.
    InProgress {
        /// Enemies spawned so far.
        spawned: u32,
        /// Enemies defeated so far.
        defeated: u32,
        /// Total enemies in the wave.
        total: u32,
    },
    /// Counting down toward readiness for the next wave.
    Cooldown {
        /// Time remaining until the next wave can be started.
        remaining: Duration,
    },
    /// Terminal state entered when the last life was lost.
    GameOver,
}

impl fmt::Display for WaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready to start"),
            Self::InProgress {
                spawned,
                defeated,
                total,
            } => write!(f, "Wave in progress ({defeated}/{total}, {spawned} spawned)"),
            Self::Cooldown { remaining } => {
                write!(f, "Next wave in {:.1}s", remaining.as_secs_f32())
            }
            Self::GameOver => write!(f, "Game over"),
        }
    }
}

/// Per-tick status feed consumed by HUD presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudStatus {
    /// Money available for purchases.
    pub money: u32,
    /// Accumulated score.
    pub score: u32,
    /// Lives remaining before game over.
    pub lives: u32,
    /// Current wave counter.
    pub wave: WaveNumber,
    /// Lifecycle phase with progress data.
    pub status: WaveStatus,
    /// Whether the game reached its terminal state.
    pub game_over: bool,
}

/// Tunable parameters governing the simulation.
///
/// Defaults reproduce the reference balance; the CLI adapter can override
/// them from a TOML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Money the player starts a level with.
    pub starting_money: u32,
    /// Lives the player starts a level with.
    pub starting_lives: u32,
    /// Cost of placing a tower.
    pub tower_cost: u32,
    /// Cost of upgrading a tower.
    pub upgrade_cost: u32,
    /// Side length of the grid cells tower placement snaps to.
    pub tower_grid: f32,
    /// Initial tower targeting radius in world units.
    pub tower_base_range: f32,
    /// Initial tower damage per projectile.
    pub tower_base_damage: u32,
    /// Minimum time between shots from one tower.
    pub tower_fire_interval: Duration,
    /// Range added per upgrade level.
    pub upgrade_range_bonus: f32,
    /// Damage added per upgrade level.
    pub upgrade_damage_bonus: u32,
    /// Enemy health at wave 1 before modifiers.
    pub enemy_base_health: i32,
    /// Enemy speed at wave 1 in world units per tick.
    pub enemy_base_speed: f32,
    /// Additive health granted per completed wave.
    pub enemy_health_increase: i32,
    /// Additive speed granted per completed wave.
    pub enemy_speed_increase: f32,
    /// Chance of a rare enemy per spawn once `rare_wave_threshold` is passed.
    pub rare_chance: f64,
    /// Waves numbered above this value may spawn rare enemies.
    pub rare_wave_threshold: u32,
    /// Multiplier applied to base health for rare enemies.
    pub rare_health_multiplier: f32,
    /// Visual scale of rare enemies.
    pub rare_size_multiplier: f32,
    /// Projectile travel speed in world units per tick.
    pub projectile_speed: f32,
    /// Distance below which a projectile registers a hit.
    pub impact_radius: f32,
    /// Money credited per enemy kill.
    pub kill_money: u32,
    /// Score credited per enemy kill.
    pub kill_score: u32,
    /// Enemies in the first wave.
    pub enemies_per_wave: u32,
    /// Enemies added to the quota after each completed wave.
    pub enemies_per_wave_increase: u32,
    /// Minimum time between enemy spawns within a wave.
    pub spawn_interval: Duration,
    /// Cooldown between a wave's completion and readiness for the next.
    pub wave_cooldown: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            starting_money: 500,
            starting_lives: 10,
            tower_cost: 100,
            upgrade_cost: 150,
            tower_grid: 50.0,
            tower_base_range: 150.0,
            tower_base_damage: 10,
            tower_fire_interval: Duration::from_secs(1),
            upgrade_range_bonus: 25.0,
            upgrade_damage_bonus: 5,
            enemy_base_health: 100,
            enemy_base_speed: 2.0,
            enemy_health_increase: 20,
            enemy_speed_increase: 0.2,
            rare_chance: 0.1,
            rare_wave_threshold: 4,
            rare_health_multiplier: 1.25,
            rare_size_multiplier: 1.5,
            projectile_speed: 10.0,
            impact_radius: 15.0,
            kill_money: 25,
            kill_score: 100,
            enemies_per_wave: 5,
            enemies_per_wave_increase: 2,
            spawn_interval: Duration::from_millis(2000),
            wave_cooldown: Duration::from_millis(10_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Health, LevelBlueprint, PathModel, Position, SimulationConfig, TowerId, WaveNumber,
    };
    use serde::{de::DeserializeOwned, Serialize};

    const TOLERANCE: f32 = 1e-4;

    fn assert_close(actual: Position, expected: Position) {
        assert!(
            (actual.x - expected.x).abs() < TOLERANCE
                && (actual.y - expected.y).abs() < TOLERANCE,
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn interpolate_endpoints_match_first_and_last_waypoints() {
        let path = PathModel::new(vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(100.0, 50.0),
        ]);

        assert_close(path.interpolate(0.0), Position::new(0.0, 0.0));
        assert_close(path.interpolate(1.0), Position::new(100.0, 50.0));
    }

    #[test]
    fn interpolate_walks_cumulative_segment_lengths() {
        let path = PathModel::new(vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(100.0, 100.0),
        ]);

        // Halfway along the 200-unit polyline is the corner.
        assert_close(path.interpolate(0.5), Position::new(100.0, 0.0));
        assert_close(path.interpolate(0.25), Position::new(50.0, 0.0));
        assert_close(path.interpolate(0.75), Position::new(100.0, 50.0));
    }

    #[test]
    fn interpolate_degenerate_paths_fall_back_without_error() {
        let empty = PathModel::new(Vec::new());
        assert_eq!(empty.interpolate(0.5), Position::ORIGIN);

        let single = PathModel::new(vec![Position::new(7.0, 9.0)]);
        assert_eq!(single.interpolate(0.5), Position::new(7.0, 9.0));
    }

    #[test]
    fn interpolate_zero_length_polyline_returns_first_waypoint() {
        let collapsed = PathModel::new(vec![Position::new(3.0, 3.0), Position::new(3.0, 3.0)]);
        assert_eq!(collapsed.interpolate(0.7), Position::new(3.0, 3.0));
    }

    #[test]
    fn health_damage_saturates_and_reports_depletion() {
        let health = Health::new(10);
        assert!(!health.is_depleted());
        assert!(health.damaged_by(10).is_depleted());
        assert_eq!(Health::new(5).damaged_by(25).get(), -20);
    }

    #[test]
    fn wave_number_advances_monotonically() {
        assert_eq!(WaveNumber::FIRST.next(), WaveNumber::new(2));
        assert_eq!(WaveNumber::new(u32::MAX).next(), WaveNumber::new(u32::MAX));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn level_blueprint_round_trips_through_bincode() {
        let blueprint = LevelBlueprint {
            path: vec![Position::new(0.0, 0.0), Position::new(120.0, 40.0)],
            start: Position::new(-10.0, 0.0),
            end: Position::new(400.0, 300.0),
            towers: vec![Position::new(150.0, 100.0)],
        };
        assert_round_trip(&blueprint);
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn default_config_matches_reference_balance() {
        let config = SimulationConfig::default();
        assert_eq!(config.starting_money, 500);
        assert_eq!(config.starting_lives, 10);
        assert_eq!(config.tower_cost, 100);
        assert_eq!(config.upgrade_cost, 150);
        assert_eq!(config.enemies_per_wave, 5);
        assert_eq!(config.spawn_interval.as_millis(), 2000);
        assert_eq!(config.wave_cooldown.as_millis(), 10_000);
    }
}
