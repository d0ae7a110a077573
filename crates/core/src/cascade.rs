//! Cascade resolution - clear, gravity collapse, refill
//!
//! Pure planning functions for the three phases of a move, plus the explicit
//! apply functions the scheduler uses to commit a plan to the grid. Keeping
//! planning separate from mutation makes each phase independently testable.

use tui_blast_types::{EngineConfig, GridPos, Tile, TileKind, Vec2};

use crate::grid::Grid;
use crate::group::Group;
use crate::rng::{SimpleRng, TileIds};

/// A move is valid iff the group reaches the configured minimum size
///
/// Groups below threshold are rejected without mutating state or consuming
/// a move.
pub fn validate(group: &Group, min_group_size: usize) -> bool {
    group.size() >= min_group_size
}

/// Cells emptied by a clear, with the tiles they held
#[derive(Debug, Clone, PartialEq)]
pub struct ClearPlan {
    pub cleared: Vec<(GridPos, Tile)>,
}

impl ClearPlan {
    pub fn cleared_count(&self) -> u32 {
        self.cleared.len() as u32
    }
}

/// One tile shifting down within its column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMove {
    pub tile: Tile,
    pub from: GridPos,
    pub to: GridPos,
}

/// Collapse transitions for the whole grid
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollapsePlan {
    pub moves: Vec<TileMove>,
}

/// A freshly created tile entering from above the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpawn {
    pub tile: Tile,
    pub spawn: Vec2,
    pub target: GridPos,
}

/// Refill assignments for every still-empty cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefillPlan {
    pub spawns: Vec<TileSpawn>,
}

/// Plan the clear for a validated group
///
/// Records which cells become empty and the tile each one held, so the
/// scheduler can both empty the grid and destroy the matching visuals.
pub fn plan_clear(grid: &Grid, group: &Group) -> ClearPlan {
    let cleared = group
        .cells
        .iter()
        .filter_map(|&pos| grid.at(pos).map(|tile| (pos, tile)))
        .collect();
    ClearPlan { cleared }
}

/// Empty every cell named by the plan
pub fn apply_clear(grid: &mut Grid, plan: &ClearPlan) {
    for &(pos, _) in &plan.cleared {
        grid.put(pos, None);
    }
}

/// Plan the per-column gravity compaction
///
/// Each column is scanned bottom-to-top with a write cursor starting at row
/// 0. Every occupied cell moves to the cursor's row; the cursor advances.
/// This is a stable compaction: surviving tiles keep their relative vertical
/// order, and all gaps end up above all tiles in the column. Columns are
/// independent; order between columns does not matter.
pub fn plan_collapse(grid: &Grid) -> CollapsePlan {
    let mut moves = Vec::new();
    for x in 0..grid.width() {
        let mut write_y = 0u8;
        for y in 0..grid.height() {
            let from = GridPos::new(x, y);
            let Some(tile) = grid.at(from) else {
                continue;
            };
            if write_y != y {
                moves.push(TileMove {
                    tile,
                    from,
                    to: GridPos::new(x, write_y),
                });
            }
            write_y += 1;
        }
    }
    CollapsePlan { moves }
}

/// Commit collapse moves to the grid
///
/// Within a column the plan lists moves bottom-first and every destination
/// is strictly below its source, so writing the destination before emptying
/// the source never clobbers a surviving tile.
pub fn apply_collapse(grid: &mut Grid, plan: &CollapsePlan) {
    for mv in &plan.moves {
        grid.put(mv.to, Some(mv.tile));
        grid.put(mv.from, None);
    }
}

/// Plan refill for every cell still empty after collapse
///
/// Kinds are drawn uniformly from the configured palette via the provided
/// random source; tile ids come from the allocator. Spawn positions sit
/// `refill_spawn_offset` above the topmost row of the spawn column.
pub fn plan_refill(
    grid: &Grid,
    config: &EngineConfig,
    rng: &mut SimpleRng,
    ids: &mut TileIds,
) -> RefillPlan {
    let palette = config.effective_palette() as u32;
    let spawn_y = (grid.height() as f32 - 1.0) + config.refill_spawn_offset;

    let mut spawns = Vec::new();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let target = GridPos::new(x, y);
            if grid.at(target).is_some() {
                continue;
            }
            let kind = TileKind::from_index(rng.next_range(palette) as u8)
                .unwrap_or(TileKind::Red);
            spawns.push(TileSpawn {
                tile: Tile {
                    id: ids.next(),
                    kind,
                },
                spawn: Vec2::new(x as f32, spawn_y),
                target,
            });
        }
    }
    RefillPlan { spawns }
}

/// Commit refill spawns to the grid
pub fn apply_refill(grid: &mut Grid, plan: &RefillPlan) {
    for spawn in &plan.spawns {
        grid.put(spawn.target, Some(spawn.tile));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_blast_types::TileId;

    fn tile(id: u32, kind: TileKind) -> Tile {
        Tile {
            id: TileId(id),
            kind,
        }
    }

    /// 1-column grid with the given cells listed bottom-first.
    fn column(cells: &[Option<Tile>]) -> Grid {
        let mut grid = Grid::new(1, cells.len() as u8);
        for (y, cell) in cells.iter().enumerate() {
            grid.set(0, y as i16, *cell).unwrap();
        }
        grid
    }

    #[test]
    fn test_validate_threshold() {
        let group = Group {
            kind: TileKind::Red,
            cells: vec![GridPos::new(0, 0)],
        };
        assert!(!validate(&group, 2));
        assert!(validate(&group, 1));
    }

    #[test]
    fn test_clear_plan_records_tiles_and_apply_empties_cells() {
        let mut grid = Grid::new(2, 1);
        let a = tile(1, TileKind::Red);
        let b = tile(2, TileKind::Red);
        grid.set(0, 0, Some(a)).unwrap();
        grid.set(1, 0, Some(b)).unwrap();

        let group = Group {
            kind: TileKind::Red,
            cells: vec![GridPos::new(0, 0), GridPos::new(1, 0)],
        };
        let plan = plan_clear(&grid, &group);
        assert_eq!(plan.cleared_count(), 2);
        assert!(plan.cleared.contains(&(GridPos::new(0, 0), a)));

        // Planning did not touch the grid.
        assert_eq!(grid.occupied_count(), 2);

        apply_clear(&mut grid, &plan);
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_collapse_preserves_column_order() {
        // Bottom-first: gap, A, gap, B, C, gap.
        let a = tile(1, TileKind::Red);
        let b = tile(2, TileKind::Blue);
        let c = tile(3, TileKind::Green);
        let mut grid = column(&[None, Some(a), None, Some(b), Some(c), None]);

        let plan = plan_collapse(&grid);
        apply_collapse(&mut grid, &plan);

        // Survivors keep their relative order: A below B below C.
        assert_eq!(grid.get(0, 0).unwrap(), Some(a));
        assert_eq!(grid.get(0, 1).unwrap(), Some(b));
        assert_eq!(grid.get(0, 2).unwrap(), Some(c));
        // All gaps end up above all tiles.
        assert_eq!(grid.get(0, 3).unwrap(), None);
        assert_eq!(grid.get(0, 4).unwrap(), None);
        assert_eq!(grid.get(0, 5).unwrap(), None);
    }

    #[test]
    fn test_collapse_reports_only_tiles_that_move() {
        let a = tile(1, TileKind::Red);
        let b = tile(2, TileKind::Blue);
        let mut grid = column(&[Some(a), None, Some(b)]);

        let plan = plan_collapse(&grid);
        // A is already settled; only B moves.
        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].tile, b);
        assert_eq!(plan.moves[0].from, GridPos::new(0, 2));
        assert_eq!(plan.moves[0].to, GridPos::new(0, 1));

        apply_collapse(&mut grid, &plan);
        assert_eq!(grid.get(0, 0).unwrap(), Some(a));
        assert_eq!(grid.get(0, 1).unwrap(), Some(b));
    }

    #[test]
    fn test_collapse_is_a_noop_on_settled_grid() {
        let mut grid = Grid::new(3, 1);
        for x in 0..3 {
            grid.set(x, 0, Some(tile(x as u32, TileKind::Red))).unwrap();
        }
        assert!(plan_collapse(&grid).moves.is_empty());
    }

    #[test]
    fn test_columns_collapse_independently() {
        let mut grid = Grid::new(2, 3);
        let a = tile(1, TileKind::Red);
        let b = tile(2, TileKind::Blue);
        // Column 0: tile floating at the top. Column 1: tile at the bottom.
        grid.set(0, 2, Some(a)).unwrap();
        grid.set(1, 0, Some(b)).unwrap();

        let plan = plan_collapse(&grid);
        apply_collapse(&mut grid, &plan);

        assert_eq!(grid.get(0, 0).unwrap(), Some(a));
        assert_eq!(grid.get(1, 0).unwrap(), Some(b));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_refill_fills_every_gap_and_spawns_above_top_row() {
        let config = EngineConfig {
            width: 2,
            height: 3,
            ..EngineConfig::default()
        };
        let mut grid = Grid::new(2, 3);
        grid.set(0, 0, Some(tile(1, TileKind::Red))).unwrap();

        let mut rng = SimpleRng::new(42);
        let mut ids = TileIds::new();
        // Reserve the id the pre-placed tile would have used.
        let _ = ids.next();

        let plan = plan_refill(&grid, &config, &mut rng, &mut ids);
        assert_eq!(plan.spawns.len(), 5);
        for spawn in &plan.spawns {
            assert_eq!(spawn.spawn.x, spawn.target.x as f32);
            assert_eq!(spawn.spawn.y, 2.0 + config.refill_spawn_offset);
        }

        apply_refill(&mut grid, &plan);
        assert_eq!(grid.occupied_count(), config.cell_count());
    }

    #[test]
    fn test_refill_is_deterministic_for_a_fixed_seed() {
        let config = EngineConfig::default();
        let grid = Grid::new(config.width, config.height);

        let mut rng1 = SimpleRng::new(99);
        let mut rng2 = SimpleRng::new(99);
        let mut ids1 = TileIds::new();
        let mut ids2 = TileIds::new();

        let plan1 = plan_refill(&grid, &config, &mut rng1, &mut ids1);
        let plan2 = plan_refill(&grid, &config, &mut rng2, &mut ids2);
        assert_eq!(plan1, plan2);
    }

    #[test]
    fn test_refill_respects_palette_size() {
        let config = EngineConfig {
            palette_size: 2,
            ..EngineConfig::default()
        };
        let grid = Grid::new(config.width, config.height);
        let mut rng = SimpleRng::new(5);
        let mut ids = TileIds::new();

        let plan = plan_refill(&grid, &config, &mut rng, &mut ids);
        for spawn in &plan.spawns {
            assert!(spawn.tile.kind.as_index() < 2);
        }
    }

    #[test]
    fn test_clear_collapse_refill_leaves_grid_full() {
        let config = EngineConfig {
            width: 3,
            height: 3,
            ..EngineConfig::default()
        };
        let mut grid = Grid::new(3, 3);
        let mut ids = TileIds::new();
        for y in 0..3 {
            for x in 0..3 {
                let kind = if y == 1 { TileKind::Red } else { TileKind::Blue };
                grid.set(x, y, Some(Tile {
                    id: ids.next(),
                    kind,
                }))
                .unwrap();
            }
        }

        // Clear the middle row.
        let group = Group {
            kind: TileKind::Red,
            cells: (0..3).map(|x| GridPos::new(x, 1)).collect(),
        };
        let clear = plan_clear(&grid, &group);
        apply_clear(&mut grid, &clear);
        assert_eq!(grid.occupied_count(), 6);

        let collapse = plan_collapse(&grid);
        apply_collapse(&mut grid, &collapse);
        // No gap below any occupied cell.
        for x in 0..3 {
            assert!(grid.is_occupied(x, 0));
            assert!(grid.is_occupied(x, 1));
            assert!(!grid.is_occupied(x, 2));
        }

        let mut rng = SimpleRng::new(1);
        let refill = plan_refill(&grid, &config, &mut rng, &mut ids);
        apply_refill(&mut grid, &refill);
        assert_eq!(grid.occupied_count(), 9);
    }
}
