#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.

use path_defence_core::{
    EnemyId, EnemyView, PlayMode, Position, TowerId, TowerTarget, TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// Each tower selects the strictly nearest enemy within its range; equal
    /// distances resolve to the enemy spawned earliest. The output buffer is
    /// cleared before populating it with the latest assignments.
    pub fn handle(
        &mut self,
        play_mode: PlayMode,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if play_mode != PlayMode::Combat {
            return;
        }

        self.prepare_tower_workspace(towers);
        if self.tower_workspace.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let max_distance_sq = tower.range * tower.range;
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                let dx = candidate.position.x - tower.position.x;
                let dy = candidate.position.y - tower.position.y;
                let distance_sq = dx * dx + dy * dy;

                if distance_sq > max_distance_sq {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    enemy: candidate.id,
                    enemy_position: candidate.position,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    tower_position: tower.position,
                    enemy_position: best_candidate.enemy_position,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        let (lower, _) = enemies.iter().size_hint();
        self.enemy_workspace.reserve(lower);

        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: Position,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Position,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    enemy_position: Position,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::TowerTargeting;
    use path_defence_core::{
        EnemyId, EnemySnapshot, EnemyView, Health, PlayMode, Position, TowerId, TowerSnapshot,
        TowerView,
    };
    use std::time::Duration;

    fn tower_snapshot(id: u32, position: Position, range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            position,
            level: 1,
            damage: 10,
            range,
            ready_in: Duration::ZERO,
        }
    }

    fn enemy_snapshot(id: u32, position: Position) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position,
            health: Health::new(100),
            spawn_health: Health::new(100),
            speed: 2.0,
            size_multiplier: 1.0,
            rare: false,
        }
    }

    #[test]
    fn targets_nearest_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Position::new(0.0, 0.0),
            150.0,
        )]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(1, Position::new(120.0, 0.0)),
            enemy_snapshot(2, Position::new(40.0, 30.0)),
        ]);

        let mut out = Vec::new();
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tower, TowerId::new(1));
        assert_eq!(out[0].enemy, EnemyId::new(2));
        assert_eq!(out[0].enemy_position, Position::new(40.0, 30.0));
    }

    #[test]
    fn enemy_outside_range_is_never_selected() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Position::new(0.0, 0.0),
            150.0,
        )]);
        let enemies =
            EnemyView::from_snapshots(vec![enemy_snapshot(1, Position::new(150.1, 0.0))]);

        let mut out = Vec::new();
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Position::new(0.0, 0.0),
            150.0,
        )]);
        let enemies =
            EnemyView::from_snapshots(vec![enemy_snapshot(1, Position::new(150.0, 0.0))]);

        let mut out = Vec::new();
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
    }

    #[test]
    fn earlier_spawn_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Position::new(0.0, 0.0),
            150.0,
        )]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(7, Position::new(100.0, 0.0)),
            enemy_snapshot(3, Position::new(0.0, 100.0)),
        ]);

        let mut out = Vec::new();
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(3));
    }

    #[test]
    fn every_tower_receives_its_own_assignment() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![
            tower_snapshot(1, Position::new(0.0, 0.0), 150.0),
            tower_snapshot(2, Position::new(400.0, 0.0), 150.0),
        ]);
        let enemies = EnemyView::from_snapshots(vec![
            enemy_snapshot(1, Position::new(50.0, 0.0)),
            enemy_snapshot(2, Position::new(380.0, 0.0)),
        ]);

        let mut out = Vec::new();
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].enemy, EnemyId::new(1));
        assert_eq!(out[1].enemy, EnemyId::new(2));
    }

    #[test]
    fn editor_mode_clears_output() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower_snapshot(
            1,
            Position::new(0.0, 0.0),
            150.0,
        )]);
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(1, Position::new(10.0, 0.0))]);

        let mut out = vec![path_defence_core::TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            tower_position: Position::ORIGIN,
            enemy_position: Position::ORIGIN,
        }];
        system.handle(PlayMode::Editor, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        let towers = TowerView::from_snapshots(Vec::new());
        let enemies = EnemyView::from_snapshots(vec![enemy_snapshot(1, Position::ORIGIN)]);
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);
        assert!(out.is_empty());

        let towers = TowerView::from_snapshots(vec![tower_snapshot(1, Position::ORIGIN, 150.0)]);
        let enemies = EnemyView::from_snapshots(Vec::new());
        system.handle(PlayMode::Combat, &towers, &enemies, &mut out);
        assert!(out.is_empty());
    }
}
