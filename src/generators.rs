//! Stepwise maze generation strategies.
//!
//! Every strategy implements one pull-based protocol: `step` performs the next
//! unit of work (typically one cell or edge decision, occasionally a whole
//! weave tunnel) and returns false exactly when generation is complete. Once
//! false, always false. Each true-returning step leaves the bidirectional
//! passage invariant intact.

use crate::compass::{Cartesian2DCoordinate, CompassPrimary};
use crate::maze::MazeCore;

use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// The supported generation strategies, fixed at maze construction time.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorKind {
    BinaryTree,
    Sidewinder,
    RecursiveBacktracker,
    Kruskal,
}

pub(crate) enum Generator {
    BinaryTree(BinaryTree),
    Sidewinder(Sidewinder),
    RecursiveBacktracker(RecursiveBacktracker),
    Kruskal(Kruskal),
}

impl Generator {
    pub(crate) fn new(kind: GeneratorKind, core: &mut MazeCore) -> Generator {
        match kind {
            GeneratorKind::BinaryTree => Generator::BinaryTree(BinaryTree::new(core)),
            GeneratorKind::Sidewinder => Generator::Sidewinder(Sidewinder::new()),
            GeneratorKind::RecursiveBacktracker => {
                Generator::RecursiveBacktracker(RecursiveBacktracker::new(core))
            }
            GeneratorKind::Kruskal => Generator::Kruskal(Kruskal::new(core)),
        }
    }

    pub(crate) fn step(&mut self, core: &mut MazeCore) -> bool {
        match *self {
            Generator::BinaryTree(ref mut g) => g.step(core),
            Generator::Sidewinder(ref mut g) => g.step(core),
            Generator::RecursiveBacktracker(ref mut g) => g.step(core),
            Generator::Kruskal(ref mut g) => g.step(core),
        }
    }
}

/// The binary tree algorithm: visit each cell once and carve a passage in one
/// of two perpendicular directions. The two directions are chosen at
/// construction and stay constant for the whole run, otherwise we would carve
/// closed-off areas and lose the perfect maze property.
pub(crate) struct BinaryTree {
    cursor: usize,
    vertical: CompassPrimary,
    horizontal: CompassPrimary,
}

impl BinaryTree {
    fn new(core: &mut MazeCore) -> BinaryTree {
        let rng = core.rng_mut();
        let vertical = if rng.next_bool() {
            CompassPrimary::North
        } else {
            CompassPrimary::South
        };
        let horizontal = if rng.next_bool() {
            CompassPrimary::East
        } else {
            CompassPrimary::West
        };
        BinaryTree {
            cursor: 0,
            vertical,
            horizontal,
        }
    }

    fn step(&mut self, core: &mut MazeCore) -> bool {
        let cells = core.width() as usize * core.height() as usize;
        if self.cursor >= cells {
            return false;
        }

        let coord = Cartesian2DCoordinate::new(
            (self.cursor as u32) % core.width(),
            (self.cursor as u32) / core.width(),
        );

        // The neighbours perpendicular to this cell, minus any off the grid.
        let candidates: SmallVec<[CompassPrimary; 2]> = [self.vertical, self.horizontal]
            .iter()
            .cloned()
            .filter(|dir| {
                dir.offset_coordinate(coord)
                    .map_or(false, |n| core.is_valid(n))
            })
            .collect();

        match candidates.len() {
            0 => {}
            1 => core.carve_passage(coord, candidates[0]),
            _ => {
                let pick = core.rng_mut().next_below(2) as usize;
                core.carve_passage(coord, candidates[pick]);
            }
        }

        self.cursor += 1;
        self.cursor < cells
    }
}

/// The sidewinder algorithm: walk each row eastwards accumulating a run of
/// cells, and on a coin flip (or at the east boundary) close the run out by
/// carving north from a random run member. The top row cannot close out and
/// becomes one long east-west corridor.
pub(crate) struct Sidewinder {
    x: u32,
    y: u32,
    run: Vec<Cartesian2DCoordinate>,
}

impl Sidewinder {
    fn new() -> Sidewinder {
        Sidewinder {
            x: 0,
            y: 0,
            run: vec![],
        }
    }

    fn step(&mut self, core: &mut MazeCore) -> bool {
        if self.y >= core.height() {
            return false;
        }

        let coord = Cartesian2DCoordinate::new(self.x, self.y);
        self.run.push(coord);

        let at_east_boundary = self.x + 1 == core.width();
        let at_north_boundary = self.y == 0;
        let should_close_out =
            at_east_boundary || (!at_north_boundary && core.rng_mut().next_bool());

        if should_close_out {
            if !at_north_boundary {
                let sample = core.rng_mut().next_below(self.run.len() as u32) as usize;
                let run_member = self.run[sample];
                core.carve_passage(run_member, CompassPrimary::North);
            }
            self.run.clear();
        } else {
            core.carve_passage(coord, CompassPrimary::East);
        }

        self.x += 1;
        if self.x == core.width() {
            self.x = 0;
            self.y += 1;
        }
        self.y < core.height()
    }
}

/// Depth first carving with backtracking. The weave-capable strategy: where a
/// neighbour is already carved but carries exactly the perpendicular passage,
/// it may tunnel through to the blank cell beyond instead of turning away.
/// Fires an event at each dead end before backtracking.
pub(crate) struct RecursiveBacktracker {
    stack: Vec<Cartesian2DCoordinate>,
}

impl RecursiveBacktracker {
    fn new(core: &mut MazeCore) -> RecursiveBacktracker {
        let (width, height) = (core.width(), core.height());
        let rng = core.rng_mut();
        let start = Cartesian2DCoordinate::new(rng.next_below(width), rng.next_below(height));
        RecursiveBacktracker { stack: vec![start] }
    }

    fn step(&mut self, core: &mut MazeCore) -> bool {
        let current = match self.stack.last() {
            Some(&coord) => coord,
            None => return false,
        };

        for dir in core.rng_mut().random_directions().iter().cloned() {
            let next = match dir.offset_coordinate(current) {
                Some(next) if core.is_valid(next) => next,
                _ => continue,
            };

            if core.is_blank(next) {
                core.carve_passage(current, dir);
                self.stack.push(next);
                return true;
            }

            if core.can_weave(dir, next) {
                let stack = &mut self.stack;
                core.perform_weave(dir, current, Some(&mut |dest| stack.push(dest)));
                return true;
            }
        }

        // Dead end: nowhere left to carve from here.
        core.event_at(current);
        self.stack.pop();
        !self.stack.is_empty()
    }
}

/// Randomised Kruskal: pull grid edges in random order and carve each one that
/// joins two previously unconnected components. Redundant edges are skipped
/// with an event signal.
pub(crate) struct Kruskal {
    edges: Vec<(Cartesian2DCoordinate, CompassPrimary)>,
    components: UnionFind<u32>,
}

impl Kruskal {
    fn new(core: &mut MazeCore) -> Kruskal {
        let (width, height) = (core.width(), core.height());
        let mut edges = Vec::with_capacity(2 * width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let coord = Cartesian2DCoordinate::new(x, y);
                if x + 1 < width {
                    edges.push((coord, CompassPrimary::East));
                }
                if y + 1 < height {
                    edges.push((coord, CompassPrimary::South));
                }
            }
        }
        Kruskal {
            edges,
            components: UnionFind::new(width as usize * height as usize),
        }
    }

    fn step(&mut self, core: &mut MazeCore) -> bool {
        let (coord, dir) = match core.rng_mut().remove_random_element(&mut self.edges) {
            Some(edge) => edge,
            None => return false,
        };

        let to = dir
            .offset_coordinate(coord)
            .expect("the edge list only holds in-grid targets");
        let a = coord.y * core.width() + coord.x;
        let b = to.y * core.width() + to.x;

        if self.components.union(a, b) {
            core.carve_passage(coord, dir);
        } else {
            core.event_at(coord);
        }

        !self.edges.is_empty()
    }
}
