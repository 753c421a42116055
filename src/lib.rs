//! **weavemaze** is a deterministic, seedable maze generation library supporting
//! over/under "weave" passages that cross without intersecting.

pub mod compass;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod twister;
