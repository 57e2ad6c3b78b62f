#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns targeting assignments into projectile fire commands.

use path_defence_core::{Command, PlayMode, TowerTarget, TowerView};

/// Emits a `Command::FireProjectile` for every assignment whose tower is
/// ready to shoot.
///
/// Readiness comes straight from the tower snapshots: `ready_in` must have
/// reached zero. Assignments naming a tower absent from the view are stale
/// and are skipped. Aiming is continuous and lives entirely in the targeting
/// data; nothing here re-checks range.
pub fn emit_fire_commands(
    play_mode: PlayMode,
    towers: &TowerView,
    targets: &[TowerTarget],
    out: &mut Vec<Command>,
) {
    if play_mode != PlayMode::Combat {
        return;
    }

    for target in targets {
        let ready = towers
            .iter()
            .any(|tower| tower.id == target.tower && tower.ready_in.is_zero());
        if !ready {
            continue;
        }
        out.push(Command::FireProjectile {
            tower: target.tower,
            target: target.enemy,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::emit_fire_commands;
    use path_defence_core::{
        Command, EnemyId, PlayMode, Position, TowerId, TowerSnapshot, TowerTarget, TowerView,
    };
    use std::time::Duration;

    fn tower(id: u32, ready_in: Duration) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            position: Position::new(100.0, 100.0),
            level: 1,
            damage: 10,
            range: 150.0,
            ready_in,
        }
    }

    fn assignment(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_position: Position::new(100.0, 100.0),
            enemy_position: Position::new(140.0, 100.0),
        }
    }

    #[test]
    fn only_ready_towers_fire_at_their_assigned_enemies() {
        let towers = TowerView::from_snapshots(vec![
            tower(0, Duration::ZERO),
            tower(1, Duration::from_millis(640)),
        ]);
        let targets = vec![assignment(0, 6), assignment(1, 6)];
        let mut out = Vec::new();

        emit_fire_commands(PlayMode::Combat, &towers, &targets, &mut out);

        assert_eq!(
            out,
            vec![Command::FireProjectile {
                tower: TowerId::new(0),
                target: EnemyId::new(6),
            }],
        );
    }

    #[test]
    fn stale_assignments_for_removed_towers_are_skipped() {
        let towers = TowerView::from_snapshots(vec![tower(0, Duration::ZERO)]);
        let targets = vec![assignment(7, 2)];
        let mut out = Vec::new();

        emit_fire_commands(PlayMode::Combat, &towers, &targets, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn editor_mode_emits_nothing() {
        let towers = TowerView::from_snapshots(vec![tower(0, Duration::ZERO)]);
        let targets = vec![assignment(0, 1)];
        let mut out = Vec::new();

        emit_fire_commands(PlayMode::Editor, &towers, &targets, &mut out);

        assert!(out.is_empty());
    }
}
