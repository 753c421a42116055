//! The maze aggregate: a wall grid, a deterministic random source, a weave
//! flag and one active generation strategy, driven to completion by repeated
//! `step` calls.

use crate::compass::{Cartesian2DCoordinate, CompassPrimary, PASSAGE_BITS, UNDER};
use crate::generators::{Generator, GeneratorKind};
use crate::grid::WallGrid;
use crate::twister::MersenneTwister;

use std::error::Error;
use std::fmt;

/// A cell mutation/event observer. Observers receive the touched coordinate
/// only and re-query wall state through the maze predicates; they run
/// synchronously inside `step` and must not drive the maze themselves.
pub type CellObserver = Box<dyn FnMut(Cartesian2DCoordinate)>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeCreationError {
    ZeroWidth,
    ZeroHeight,
}

impl fmt::Display for MazeCreationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeCreationError::ZeroWidth => write!(f, "maze width must be at least 1"),
            MazeCreationError::ZeroHeight => write!(f, "maze height must be at least 1"),
        }
    }
}
impl Error for MazeCreationError {
    fn description(&self) -> &str {
        "maze creation error"
    }
}

/// Construction options for a `Maze`.
///
/// `rng` wins over `seed` when both are given. When neither is given the
/// generator is seeded from OS entropy and the run is not reproducible.
#[derive(Debug, Default)]
pub struct MazeOptions {
    pub seed: Option<u32>,
    pub rng: Option<MersenneTwister>,
    pub weave: bool,
}

/// The carving and query surface shared by the maze and its generation
/// strategy. Strategies mutate the grid exclusively through this type.
pub struct MazeCore {
    width: u32,
    height: u32,
    grid: WallGrid,
    rng: MersenneTwister,
    weave: bool,
    update_observers: Vec<CellObserver>,
    event_observers: Vec<CellObserver>,
}

impl fmt::Debug for MazeCore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "MazeCore :: width: {}, height: {}, weave: {}",
            self.width, self.height, self.weave
        )
    }
}

impl MazeCore {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_weave(&self) -> bool {
        self.weave
    }

    #[inline]
    pub fn is_valid(&self, coord: Cartesian2DCoordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    #[inline]
    pub fn rng_mut(&mut self) -> &mut MersenneTwister {
        &mut self.rng
    }

    /// Raw bitmask of a cell, for rendering and diagnostics.
    #[inline]
    pub fn at(&self, coord: Cartesian2DCoordinate) -> u8 {
        self.grid.at(coord)
    }

    /// Set passage bits on one cell. Coordinates must already be validated.
    #[inline]
    pub fn carve(&mut self, coord: Cartesian2DCoordinate, bits: u8) {
        self.grid.mark(coord, bits);
    }

    /// Clear passage bits on one cell. Coordinates must already be validated.
    #[inline]
    pub fn uncarve(&mut self, coord: Cartesian2DCoordinate, bits: u8) {
        self.grid.clear(coord, bits);
    }

    #[inline]
    pub fn is_set(&self, coord: Cartesian2DCoordinate, bits: u8) -> bool {
        self.grid.is_marked(coord, bits)
    }

    #[inline]
    pub fn is_blank(&self, coord: Cartesian2DCoordinate) -> bool {
        self.grid.at(coord) == 0
    }

    #[inline]
    pub fn is_north(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_set(coord, CompassPrimary::North.bit())
    }

    #[inline]
    pub fn is_south(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_set(coord, CompassPrimary::South.bit())
    }

    #[inline]
    pub fn is_east(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_set(coord, CompassPrimary::East.bit())
    }

    #[inline]
    pub fn is_west(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_set(coord, CompassPrimary::West.bit())
    }

    #[inline]
    pub fn is_under(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_set(coord, UNDER)
    }

    /// True iff the cell carries exactly the passage crossing `dir`'s axis -
    /// the precondition for weaving through it.
    #[inline]
    pub fn is_perpendicular(&self, coord: Cartesian2DCoordinate, dir: CompassPrimary) -> bool {
        self.grid.at(coord) & PASSAGE_BITS == dir.cross_bits()
    }

    /// Carve a bidirectional passage from `from` towards `dir`, notifying both
    /// touched cells. The target must be a valid grid cell.
    pub fn carve_passage(&mut self, from: Cartesian2DCoordinate, dir: CompassPrimary) {
        let to = dir
            .offset_coordinate(from)
            .expect("carve_passage target must be representable");
        self.carve(from, dir.bit());
        self.carve(to, dir.opposite().bit());
        self.update_at(from);
        self.update_at(to);
    }

    /// Whether a strategy may tunnel along `dir` through the already carved
    /// cell at `thru` instead of treating it as a wall. Requires weaving to be
    /// enabled, the through cell to be purely perpendicular to `dir`, and the
    /// cell beyond it to be a valid blank cell. A false result is the normal
    /// "no weave possible here" signal, not an error.
    pub fn can_weave(&self, dir: CompassPrimary, thru: Cartesian2DCoordinate) -> bool {
        if !self.weave || !self.is_perpendicular(thru, dir) {
            return false;
        }
        match dir.offset_coordinate(thru) {
            Some(beyond) => self.is_valid(beyond) && self.is_blank(beyond),
            None => false,
        }
    }

    /// Construct a three cell tunnel from `from` along `dir`, crossing the
    /// perpendicular passage one step away. Callers must have checked
    /// `can_weave` for the through cell first.
    ///
    /// `record` is invoked with the destination coordinate before any update
    /// observer fires, letting a strategy note the new cell in its own
    /// progress state first. Updates then fire for the origin, through and
    /// destination cells in that order.
    pub fn perform_weave(
        &mut self,
        dir: CompassPrimary,
        from: Cartesian2DCoordinate,
        record: Option<&mut dyn FnMut(Cartesian2DCoordinate)>,
    ) {
        let thru = dir
            .offset_coordinate(from)
            .expect("weave through cell must be representable");
        let to = dir
            .offset_coordinate(thru)
            .expect("weave destination must be representable");

        self.carve(from, dir.bit());
        self.carve(to, dir.opposite().bit());

        self.perform_thru_weave(thru);

        if let Some(callback) = record {
            callback(to);
        }

        self.update_at(from);
        self.update_at(thru);
        self.update_at(to);
    }

    /// Resolve the through cell of a weave: a coin flip either dives the new
    /// passage under the existing one, or flips the existing passage under and
    /// routes the new one over. The non-random branches depend on the cell's
    /// *existing* orientation, not the direction of travel.
    fn perform_thru_weave(&mut self, thru: Cartesian2DCoordinate) {
        let north_south = CompassPrimary::North.bit() | CompassPrimary::South.bit();
        let east_west = CompassPrimary::East.bit() | CompassPrimary::West.bit();

        if self.rng.next_bool() {
            self.carve(thru, UNDER);
        } else if self.is_north(thru) {
            self.uncarve(thru, north_south);
            self.carve(thru, east_west | UNDER);
        } else {
            self.uncarve(thru, east_west);
            self.carve(thru, north_south | UNDER);
        }
    }

    /// Notify update observers of a cell mutation.
    pub fn update_at(&mut self, coord: Cartesian2DCoordinate) {
        for observer in &mut self.update_observers {
            observer(coord);
        }
    }

    /// Notify event observers of an algorithm signalled event at a cell.
    pub fn event_at(&mut self, coord: Cartesian2DCoordinate) {
        for observer in &mut self.event_observers {
            observer(coord);
        }
    }
}

pub struct Maze {
    pub(crate) core: MazeCore,
    generator: Generator,
    done: bool,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Maze :: {:?}, done: {}", self.core, self.done)
    }
}

impl Maze {
    /// Build a maze of `width` x `height` cells driven by the given generation
    /// strategy. The grid starts fully blank; drive carving with `step` or
    /// `generate`.
    pub fn new(
        width: u32,
        height: u32,
        kind: GeneratorKind,
        options: MazeOptions,
    ) -> Result<Maze, MazeCreationError> {
        if width == 0 {
            return Err(MazeCreationError::ZeroWidth);
        }
        if height == 0 {
            return Err(MazeCreationError::ZeroHeight);
        }

        let rng = match options.rng {
            Some(rng) => rng,
            None => MersenneTwister::new(options.seed),
        };
        let mut core = MazeCore {
            width,
            height,
            grid: WallGrid::new(width, height),
            rng,
            weave: options.weave,
            update_observers: Vec::new(),
            event_observers: Vec::new(),
        };
        let generator = Generator::new(kind, &mut core);

        Ok(Maze {
            core,
            generator,
            done: false,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.core.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.core.height()
    }

    #[inline]
    pub fn is_weave(&self) -> bool {
        self.core.is_weave()
    }

    #[inline]
    pub fn is_valid(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_valid(coord)
    }

    /// Raw bitmask of a cell, for external rendering.
    #[inline]
    pub fn at(&self, coord: Cartesian2DCoordinate) -> u8 {
        self.core.at(coord)
    }

    #[inline]
    pub fn is_north(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_north(coord)
    }

    #[inline]
    pub fn is_south(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_south(coord)
    }

    #[inline]
    pub fn is_east(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_east(coord)
    }

    #[inline]
    pub fn is_west(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_west(coord)
    }

    #[inline]
    pub fn is_under(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_under(coord)
    }

    #[inline]
    pub fn is_blank(&self, coord: Cartesian2DCoordinate) -> bool {
        self.core.is_blank(coord)
    }

    /// Perform the strategy's next unit of work. Returns false exactly when
    /// generation is complete; further calls keep returning false.
    pub fn step(&mut self) -> bool {
        if self.done {
            return false;
        }
        let more = self.generator.step(&mut self.core);
        if !more {
            self.done = true;
        }
        more
    }

    /// Drive `step` until the maze is fully generated.
    pub fn generate(&mut self) {
        while self.step() {}
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Register an observer for cell mutations. Observers accumulate; each
    /// registered callback fires for every carved or uncarved cell.
    pub fn on_update<F>(&mut self, observer: F)
    where
        F: FnMut(Cartesian2DCoordinate) + 'static,
    {
        self.core.update_observers.push(Box::new(observer));
    }

    /// Register an observer for strategy signalled events (e.g. reaching a
    /// dead end). Observers accumulate.
    pub fn on_event<F>(&mut self, observer: F)
    where
        F: FnMut(Cartesian2DCoordinate) + 'static,
    {
        self.core.event_observers.push(Box::new(observer));
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::compass::PLANAR_BITS;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    // Sidewinder draws nothing from the rng at construction time, so these
    // fixtures leave the seeded stream untouched for the weave coin flip.
    fn blank_maze(width: u32, height: u32, weave: bool, seed: u32) -> Maze {
        Maze::new(
            width,
            height,
            GeneratorKind::Sidewinder,
            MazeOptions {
                seed: Some(seed),
                rng: None,
                weave,
            },
        )
        .expect("test maze dimensions are valid")
    }

    // A vertical corridor through the middle column: the centre cell carries
    // exactly the passage perpendicular to east/west travel.
    fn carve_middle_column(maze: &mut Maze) {
        maze.core.carve_passage(gc(1, 0), CompassPrimary::South);
        maze.core.carve_passage(gc(1, 1), CompassPrimary::South);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let result = Maze::new(0, 5, GeneratorKind::Sidewinder, MazeOptions::default());
        assert_eq!(result.err(), Some(MazeCreationError::ZeroWidth));
        let result = Maze::new(5, 0, GeneratorKind::Sidewinder, MazeOptions::default());
        assert_eq!(result.err(), Some(MazeCreationError::ZeroHeight));
    }

    #[test]
    fn is_valid_bounds() {
        let maze = blank_maze(3, 2, false, 1);
        assert!(maze.is_valid(gc(0, 0)));
        assert!(maze.is_valid(gc(2, 1)));
        assert!(!maze.is_valid(gc(3, 0)));
        assert!(!maze.is_valid(gc(0, 2)));
    }

    #[test]
    fn wall_queries_reflect_carved_bits() {
        let mut maze = blank_maze(2, 2, false, 1);
        assert!(maze.is_blank(gc(0, 0)));

        maze.core.carve_passage(gc(0, 0), CompassPrimary::East);
        assert!(maze.is_east(gc(0, 0)));
        assert!(maze.is_west(gc(1, 0)));
        assert!(!maze.is_north(gc(0, 0)));
        assert!(!maze.is_south(gc(0, 0)));
        assert!(!maze.is_under(gc(0, 0)));
        assert!(!maze.is_blank(gc(0, 0)));
        assert_eq!(maze.at(gc(0, 0)), CompassPrimary::East.bit());

        maze.core.uncarve(gc(0, 0), CompassPrimary::East.bit());
        assert!(maze.is_blank(gc(0, 0)));
    }

    #[test]
    fn carve_passage_sets_both_sides() {
        let mut maze = blank_maze(2, 2, false, 1);
        maze.core.carve_passage(gc(0, 1), CompassPrimary::North);
        assert!(maze.is_north(gc(0, 1)));
        assert!(maze.is_south(gc(0, 0)));
    }

    #[test]
    fn update_observers_accumulate() {
        let mut maze = blank_maze(2, 1, false, 1);
        let first: Rc<RefCell<Vec<Cartesian2DCoordinate>>> = Rc::new(RefCell::new(vec![]));
        let second: Rc<RefCell<Vec<Cartesian2DCoordinate>>> = Rc::new(RefCell::new(vec![]));

        let sink = first.clone();
        maze.on_update(move |coord| sink.borrow_mut().push(coord));
        let sink = second.clone();
        maze.on_update(move |coord| sink.borrow_mut().push(coord));

        maze.core.carve_passage(gc(0, 0), CompassPrimary::East);
        assert_eq!(&*first.borrow(), &[gc(0, 0), gc(1, 0)]);
        assert_eq!(&*second.borrow(), &[gc(0, 0), gc(1, 0)]);
    }

    #[test]
    fn completion_is_idempotent() {
        let mut maze = blank_maze(4, 4, false, 77);
        maze.generate();
        assert!(maze.is_done());
        for _ in 0..10 {
            assert!(!maze.step());
        }
    }

    #[test]
    fn is_perpendicular_requires_the_exact_cross_pair() {
        let mut maze = blank_maze(3, 3, true, 12345);
        carve_middle_column(&mut maze);

        assert!(maze.core.is_perpendicular(gc(1, 1), CompassPrimary::East));
        assert!(maze.core.is_perpendicular(gc(1, 1), CompassPrimary::West));
        assert!(!maze.core.is_perpendicular(gc(1, 1), CompassPrimary::North));
        // A dead-end stub (single bit) is not a full perpendicular passage.
        assert!(!maze.core.is_perpendicular(gc(1, 0), CompassPrimary::East));
        // An extra planar bit disqualifies the cell.
        maze.core.carve(gc(1, 1), CompassPrimary::East.bit());
        assert!(!maze.core.is_perpendicular(gc(1, 1), CompassPrimary::East));
    }

    #[test]
    fn can_weave_requires_the_weave_flag() {
        let mut maze = blank_maze(3, 3, false, 12345);
        carve_middle_column(&mut maze);
        assert!(!maze.core.can_weave(CompassPrimary::East, gc(1, 1)));
    }

    #[test]
    fn can_weave_through_a_perpendicular_passage() {
        let mut maze = blank_maze(3, 3, true, 12345);
        carve_middle_column(&mut maze);
        assert!(maze.core.can_weave(CompassPrimary::East, gc(1, 1)));
        assert!(maze.core.can_weave(CompassPrimary::West, gc(1, 1)));
        assert!(!maze.core.can_weave(CompassPrimary::North, gc(1, 1)));
    }

    #[test]
    fn can_weave_needs_a_blank_in_bounds_destination() {
        let mut maze = blank_maze(3, 3, true, 12345);
        carve_middle_column(&mut maze);

        // Destination already carved.
        maze.core.carve(gc(2, 1), CompassPrimary::East.bit());
        assert!(!maze.core.can_weave(CompassPrimary::East, gc(1, 1)));
        maze.core.uncarve(gc(2, 1), CompassPrimary::East.bit());

        // Destination off the grid: carve a perpendicular passage hugging the
        // east edge, then try to tunnel out through it.
        maze.core.carve_passage(gc(2, 0), CompassPrimary::South);
        maze.core.carve_passage(gc(2, 1), CompassPrimary::South);
        assert!(!maze.core.can_weave(CompassPrimary::East, gc(2, 1)));
    }

    // Seed 12345: the first word of the stream is even, so the coin flip in
    // the through-cell resolution comes up true (dive under, leave the
    // existing passage bits alone).
    #[test]
    fn perform_weave_under_branch() {
        let mut maze = blank_maze(3, 3, true, 12345);
        carve_middle_column(&mut maze);

        assert!(maze.core.can_weave(CompassPrimary::East, gc(1, 1)));
        maze.core.perform_weave(CompassPrimary::East, gc(0, 1), None);

        assert_eq!(maze.at(gc(0, 1)), CompassPrimary::East.bit());
        assert_eq!(maze.at(gc(2, 1)), CompassPrimary::West.bit());
        let north_south = CompassPrimary::North.bit() | CompassPrimary::South.bit();
        assert_eq!(maze.at(gc(1, 1)), north_south | UNDER);
    }

    // Seed 1: the first word is odd, so the through cell is rewritten - the
    // old north/south passage dives under and the new passage runs over.
    #[test]
    fn perform_weave_rewrite_branch() {
        let mut maze = blank_maze(3, 3, true, 1);
        carve_middle_column(&mut maze);

        maze.core.perform_weave(CompassPrimary::East, gc(0, 1), None);

        assert_eq!(maze.at(gc(0, 1)), CompassPrimary::East.bit());
        assert_eq!(maze.at(gc(2, 1)), CompassPrimary::West.bit());
        let east_west = CompassPrimary::East.bit() | CompassPrimary::West.bit();
        assert_eq!(maze.at(gc(1, 1)), east_west | UNDER);
        // The corridor neighbours keep pointing at the now-underground passage.
        assert!(maze.is_south(gc(1, 0)));
        assert!(maze.is_north(gc(1, 2)));
    }

    #[test]
    fn perform_weave_notifies_record_then_updates_in_order() {
        let mut maze = blank_maze(3, 3, true, 12345);
        carve_middle_column(&mut maze);

        let log: Rc<RefCell<Vec<(&'static str, Cartesian2DCoordinate)>>> =
            Rc::new(RefCell::new(vec![]));
        let sink = log.clone();
        maze.on_update(move |coord| sink.borrow_mut().push(("update", coord)));

        let record_log = log.clone();
        maze.core.perform_weave(
            CompassPrimary::East,
            gc(0, 1),
            Some(&mut |dest| record_log.borrow_mut().push(("record", dest))),
        );

        assert_eq!(
            &*log.borrow(),
            &[
                ("record", gc(2, 1)),
                ("update", gc(0, 1)),
                ("update", gc(1, 1)),
                ("update", gc(2, 1)),
            ]
        );
    }

    // The passage invariant with the weave reading: a planar bit toward a
    // neighbour is answered by the opposite bit, or by the neighbour being an
    // under-crossing of the travel axis.
    fn assert_passages_bidirectional(maze: &Maze) {
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let coord = gc(x, y);
                for dir in CompassPrimary::ALL.iter().cloned() {
                    if maze.at(coord) & dir.bit() == 0 {
                        continue;
                    }
                    let neighbour = dir
                        .offset_coordinate(coord)
                        .filter(|&n| maze.is_valid(n))
                        .expect("carved passages stay on the grid");
                    let answered = maze.at(neighbour) & dir.opposite().bit() != 0;
                    let tunnelled = maze.is_under(neighbour)
                        && maze.at(neighbour) & PLANAR_BITS == dir.cross_bits();
                    assert!(
                        answered || tunnelled,
                        "passage at {} towards {:?} is one-way",
                        coord,
                        dir
                    );
                }
            }
        }
    }

    #[test]
    fn weave_restores_the_passage_invariant() {
        for seed in &[12345u32, 1] {
            let mut maze = blank_maze(3, 3, true, *seed);
            carve_middle_column(&mut maze);
            maze.core.perform_weave(CompassPrimary::East, gc(0, 1), None);
            assert_passages_bidirectional(&maze);
        }
    }
}
