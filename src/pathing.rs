//! Route finding over a carved maze: flood fill distances from a start cell
//! and shortest/longest path extraction.
//!
//! Travel is weave aware. Stepping in some direction lands on the adjacent
//! cell when that cell answers with the opposite passage bit; when the
//! adjacent cell is an under-crossing of the travel axis the step tunnels
//! straight through it to the far side.

use crate::compass::{Cartesian2DCoordinate, CompassPrimary, PLANAR_BITS};
use crate::maze::Maze;

use fnv::FnvHasher;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;

type FnvHashMap<K, V> = HashMap<K, V, BuildHasherDefault<FnvHasher>>;

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

/// The cell reached by walking one passage from `from` towards `dir`, if the
/// passage exists. Tunnels under any chain of perpendicular crossings.
pub fn passage_target(
    maze: &Maze,
    from: Cartesian2DCoordinate,
    dir: CompassPrimary,
) -> Option<Cartesian2DCoordinate> {
    if maze.at(from) & dir.bit() == 0 {
        return None;
    }
    let mut next = dir.offset_coordinate(from)?;
    loop {
        if !maze.is_valid(next) {
            return None;
        }
        if maze.at(next) & dir.opposite().bit() != 0 {
            return Some(next);
        }
        if maze.is_under(next) && maze.at(next) & PLANAR_BITS == dir.cross_bits() {
            next = dir.offset_coordinate(next)?;
            continue;
        }
        return None;
    }
}

/// All cells reachable from `coord` by walking one passage.
pub fn passage_exits(maze: &Maze, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
    CompassPrimary::ALL
        .iter()
        .cloned()
        .filter_map(|dir| passage_target(maze, coord, dir))
        .collect()
}

/// Passage-step distances from one start cell to every reachable cell.
#[derive(Debug, Clone)]
pub struct Distances {
    start_coordinate: Cartesian2DCoordinate,
    distances: FnvHashMap<Cartesian2DCoordinate, u32>,
    max_distance: u32,
}

impl Distances {
    /// Flood fill the maze from `start_coordinate`. Returns None for an
    /// out-of-grid start.
    pub fn new(maze: &Maze, start_coordinate: Cartesian2DCoordinate) -> Option<Distances> {
        if !maze.is_valid(start_coordinate) {
            return None;
        }

        let cells_count = maze.width() as usize * maze.height() as usize;
        let fnv = BuildHasherDefault::<FnvHasher>::default();
        let mut distances = FnvHashMap::with_capacity_and_hasher(cells_count, fnv);
        distances.insert(start_coordinate, 0);
        let mut max = 0;

        // Unweighted breadth first wave: the distances map doubles as the
        // visited set, so the frontier never needs deduplicating.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for exit_coordinate in passage_exits(maze, *cell_coord).iter() {
                    if !distances.contains_key(exit_coordinate) {
                        distances.insert(*exit_coordinate, distance_to_cell + 1);
                        new_frontier.push(*exit_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance: max,
        })
    }

    #[inline]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start_coordinate
    }

    #[inline]
    pub fn max(&self) -> u32 {
        self.max_distance
    }

    /// None when the cell was never reached from the start.
    #[inline]
    pub fn distance_from_start_to(&self, coord: Cartesian2DCoordinate) -> Option<u32> {
        self.distances.get(&coord).cloned()
    }

    /// The reached cells at the maximum distance from the start.
    pub fn furthest_points_on_grid(&self) -> SmallVec<[Cartesian2DCoordinate; 8]> {
        let mut furthest = SmallVec::<[Cartesian2DCoordinate; 8]>::new();
        for (coord, distance) in &self.distances {
            if *distance == self.max_distance {
                furthest.push(*coord);
            }
        }
        furthest
    }
}

/// The shortest path from the distances' start cell to `end`, inclusive of
/// both endpoints. None when `end` was never reached.
pub fn shortest_path(
    maze: &Maze,
    distances: &Distances,
    end: Cartesian2DCoordinate,
) -> Option<Vec<Cartesian2DCoordinate>> {
    let mut remaining = distances.distance_from_start_to(end)?;
    let mut current = end;
    let mut path = vec![end];

    // Walk downhill: some neighbour is always one step closer to the start.
    while remaining > 0 {
        let closer = passage_exits(maze, current)
            .iter()
            .cloned()
            .find(|&exit| distances.distance_from_start_to(exit) == Some(remaining - 1))?;
        path.push(closer);
        current = closer;
        remaining -= 1;
    }

    path.reverse();
    Some(path)
}

/// A longest shortest-path in the maze, found by the classic double flood
/// fill. Exact on perfect mazes (trees).
pub fn longest_path(maze: &Maze) -> Option<Vec<Cartesian2DCoordinate>> {
    let from_origin = Distances::new(maze, Cartesian2DCoordinate::new(0, 0))?;
    let far_start = from_origin.furthest_points_on_grid()[0];
    let from_far_start = Distances::new(maze, far_start)?;
    let far_end = from_far_start.furthest_points_on_grid()[0];
    shortest_path(maze, &from_far_start, far_end)
}
