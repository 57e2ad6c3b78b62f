#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Path Defence adapters.
//!
//! Nothing in this crate draws. It defines the scene snapshots a backend
//! consumes, the backend trait itself, and the pure sampling helpers used to
//! present the enemy path and tower turrets.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use path_defence_core::{
    EnemyId, EnemySnapshot, HudStatus, PlayMode, Position, ProjectileId, TowerId, TowerTarget,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Immutable snapshot describing a tower placed within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Grid-snapped location of the tower.
    pub position: Position,
    /// Upgrade level displayed beside the tower.
    pub level: u32,
    /// Heading of the turret in radians.
    pub turret_angle: f32,
}

/// Enemy rendered as a filled circle scaled by its size multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Identifier assigned to the enemy by the world.
    pub id: EnemyId,
    /// Current position of the enemy.
    pub position: Position,
    /// Fraction of the enemy's spawn health remaining, in 0.0..=1.0.
    pub health_percent: f32,
    /// Visual scale applied to the enemy's body.
    pub size_multiplier: f32,
    /// Whether the enemy uses the rare variant styling.
    pub rare: bool,
}

/// Projectile rendered as a small dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Identifier assigned to the projectile by the world.
    pub id: ProjectileId,
    /// Current position of the projectile.
    pub position: Position,
}

/// Dot marking a sampled point of the enemy path preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathDot {
    /// Location of the dot in world units.
    pub position: Position,
}

/// Animated direction arrow travelling along the path preview.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathArrow {
    /// Location of the arrow in world units.
    pub position: Position,
    /// Heading of the arrow in radians.
    pub angle: f32,
}

/// Scene description combining level geometry, inhabitants and the HUD feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Dots sampled along the enemy path.
    pub path_dots: Vec<PathDot>,
    /// Animated arrow indicating the direction of travel, if a path exists.
    pub path_arrow: Option<PathArrow>,
    /// Towers currently placed in the level.
    pub towers: Vec<SceneTower>,
    /// Enemies currently alive.
    pub enemies: Vec<SceneEnemy>,
    /// Projectiles currently airborne.
    pub projectiles: Vec<SceneProjectile>,
    /// Active play mode for the simulation.
    pub play_mode: PlayMode,
    /// Economy and wave status presented by the HUD.
    pub hud: HudStatus,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Path Defence scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and may mutate the scene before it is rendered, allowing adapters to
    /// animate world snapshots deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, &mut Scene) + 'static;
}

/// Derives the fraction of spawn health an enemy has remaining.
#[must_use]
pub fn health_percent(snapshot: &EnemySnapshot) -> f32 {
    let spawn = snapshot.spawn_health.get();
    if spawn <= 0 {
        return 0.0;
    }
    (snapshot.health.get() as f32 / spawn as f32).clamp(0.0, 1.0)
}

/// Per-tower turret heading memory.
///
/// Towers without a target this frame keep the heading they last aimed with,
/// so turrets hold their bearing between engagements instead of snapping back
/// to a rest pose.
#[derive(Debug, Default)]
pub struct TurretHeadings {
    headings: HashMap<TowerId, f32>,
}

impl TurretHeadings {
    /// Creates an empty heading memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates headings from the latest targeting assignments.
    pub fn update(&mut self, targets: &[TowerTarget]) {
        for target in targets {
            let from = Vec2::new(target.tower_position.x, target.tower_position.y);
            let to = Vec2::new(target.enemy_position.x, target.enemy_position.y);
            let line = to - from;
            if line.length_squared() <= f32::EPSILON {
                continue;
            }
            let _ = self.headings.insert(target.tower, line.y.atan2(line.x));
        }
    }

    /// Heading last recorded for the tower, facing right when none exists.
    #[must_use]
    pub fn heading_of(&self, tower: TowerId) -> f32 {
        self.headings.get(&tower).copied().unwrap_or(0.0)
    }

    /// Discards headings for towers no longer present in the scene.
    pub fn retain_towers(&mut self, towers: &[TowerId]) {
        self.headings.retain(|tower, _| towers.contains(tower));
    }
}

/// Path preview sampling shared by editor-style presentations.
pub mod preview {
    use super::{PathArrow, PathDot};
    use path_defence_core::PathModel;

    /// Spacing between sampled preview dots in world units.
    pub const DOT_SPACING: f32 = 40.0;

    /// Arc-length offset used to derive the preview arrow heading.
    const ARROW_PROBE_OFFSET: f32 = 0.01;

    /// Samples preview dots along the path at [`DOT_SPACING`] intervals.
    ///
    /// Both endpoints are always included so short paths still present.
    #[must_use]
    pub fn sample_dots(path: &PathModel) -> Vec<PathDot> {
        let total = path.total_length();
        if path.waypoints().len() < 2 || total <= f32::EPSILON {
            return Vec::new();
        }

        let steps = (total / DOT_SPACING).floor() as u32;
        let mut dots = Vec::with_capacity(steps as usize + 2);
        for step in 0..=steps {
            let t = (step as f32 * DOT_SPACING / total).min(1.0);
            dots.push(PathDot {
                position: path.interpolate(t),
            });
        }
        if (steps as f32 * DOT_SPACING) < total {
            dots.push(PathDot {
                position: path.interpolate(1.0),
            });
        }
        dots
    }

    /// Samples the animated direction arrow at normalised parameter `t`.
    ///
    /// The heading probe at `t + 0.01` is clamped to the path domain, so the
    /// arrow keeps the final segment's direction at the end of its sweep
    /// instead of extrapolating past the last waypoint.
    #[must_use]
    pub fn sample_arrow(path: &PathModel, t: f32) -> Option<PathArrow> {
        if path.waypoints().len() < 2 || path.total_length() <= f32::EPSILON {
            return None;
        }

        let t = t.clamp(0.0, 1.0);
        let position = path.interpolate(t);
        let probe = path.interpolate((t + ARROW_PROBE_OFFSET).min(1.0));

        let dx = probe.x - position.x;
        let dy = probe.y - position.y;
        let angle = if dx.abs() <= f32::EPSILON && dy.abs() <= f32::EPSILON {
            // At the very end of the sweep, probe backwards to keep the
            // final segment's heading.
            let behind = path.interpolate((t - ARROW_PROBE_OFFSET).max(0.0));
            (position.y - behind.y).atan2(position.x - behind.x)
        } else {
            dy.atan2(dx)
        };

        Some(PathArrow { position, angle })
    }
}

#[cfg(test)]
mod tests {
    use super::{health_percent, preview, TurretHeadings};
    use path_defence_core::{
        EnemyId, EnemySnapshot, Health, PathModel, Position, TowerId, TowerTarget,
    };

    fn enemy(health: i32, spawn_health: i32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            position: Position::ORIGIN,
            health: Health::new(health),
            spawn_health: Health::new(spawn_health),
            speed: 2.0,
            size_multiplier: 1.0,
            rare: false,
        }
    }

    #[test]
    fn health_percent_is_clamped_to_unit_range() {
        assert!((health_percent(&enemy(50, 100)) - 0.5).abs() < 1e-6);
        assert_eq!(health_percent(&enemy(-20, 100)), 0.0);
        assert_eq!(health_percent(&enemy(100, 0)), 0.0);
    }

    #[test]
    fn dots_are_spaced_along_the_path_and_include_the_endpoint() {
        let path = PathModel::new(vec![Position::new(0.0, 0.0), Position::new(100.0, 0.0)]);
        let dots = preview::sample_dots(&path);

        // 0, 40, 80 plus the appended endpoint.
        assert_eq!(dots.len(), 4);
        assert!((dots[1].position.x - 40.0).abs() < 1e-3);
        assert!((dots[3].position.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn degenerate_paths_produce_no_preview() {
        assert!(preview::sample_dots(&PathModel::new(Vec::new())).is_empty());
        assert!(preview::sample_arrow(&PathModel::new(vec![Position::ORIGIN]), 0.5).is_none());
    }

    #[test]
    fn arrow_heading_follows_the_containing_segment() {
        let path = PathModel::new(vec![
            Position::new(0.0, 0.0),
            Position::new(100.0, 0.0),
            Position::new(100.0, 100.0),
        ]);

        let arrow = preview::sample_arrow(&path, 0.25).expect("arrow on first segment");
        assert!(arrow.angle.abs() < 1e-3);

        let arrow = preview::sample_arrow(&path, 0.75).expect("arrow on second segment");
        assert!((arrow.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn arrow_at_the_end_of_the_sweep_keeps_the_final_heading() {
        let path = PathModel::new(vec![Position::new(0.0, 0.0), Position::new(0.0, 100.0)]);
        let arrow = preview::sample_arrow(&path, 1.0).expect("arrow at endpoint");

        assert_eq!(arrow.position, Position::new(0.0, 100.0));
        assert!((arrow.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn turret_headings_persist_between_engagements() {
        let mut headings = TurretHeadings::new();
        headings.update(&[TowerTarget {
            tower: TowerId::new(1),
            enemy: EnemyId::new(5),
            tower_position: Position::new(0.0, 0.0),
            enemy_position: Position::new(0.0, 50.0),
        }]);

        let aimed = headings.heading_of(TowerId::new(1));
        assert!((aimed - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        // No assignments this frame; the heading is retained.
        headings.update(&[]);
        assert_eq!(headings.heading_of(TowerId::new(1)), aimed);

        headings.retain_towers(&[]);
        assert_eq!(headings.heading_of(TowerId::new(1)), 0.0);
    }
}
