//! Plain text rendering of mazes: bare walls, flood fill distances, or a
//! marked path. Cell bodies are three characters wide; an under-crossing cell
//! is marked `~` on the passage running over it.

use crate::compass::Cartesian2DCoordinate;
use crate::maze::Maze;
use crate::pathing::Distances;

use std::fmt;

fn render<F>(maze: &Maze, cell_body: F) -> String
where
    F: Fn(Cartesian2DCoordinate) -> String,
{
    let (width, height) = (maze.width(), maze.height());
    let mut output = String::new();

    for y in 0..height {
        // Wall line above this row. By the bidirectional passage invariant it
        // agrees with the south bits of the row above.
        output.push('+');
        for x in 0..width {
            let open = maze.is_north(Cartesian2DCoordinate::new(x, y));
            output.push_str(if open { "   " } else { "---" });
            output.push('+');
        }
        output.push('\n');

        for x in 0..width {
            let coord = Cartesian2DCoordinate::new(x, y);
            output.push(if maze.is_west(coord) { ' ' } else { '|' });
            output.push_str(&cell_body(coord));
        }
        let east_edge = Cartesian2DCoordinate::new(width - 1, y);
        output.push(if maze.is_east(east_edge) { ' ' } else { '|' });
        output.push('\n');
    }

    output.push('+');
    for x in 0..width {
        let open = maze.is_south(Cartesian2DCoordinate::new(x, height - 1));
        output.push_str(if open { "   " } else { "---" });
        output.push('+');
    }
    output.push('\n');

    output
}

pub fn render_plain(maze: &Maze) -> String {
    render(maze, |coord| {
        if maze.is_under(coord) {
            String::from(" ~ ")
        } else {
            String::from("   ")
        }
    })
}

/// Each reached cell shows its distance from the flood fill start as
/// centre-aligned lowercase hexadecimal.
pub fn render_distances(maze: &Maze, distances: &Distances) -> String {
    render(maze, |coord| {
        match distances.distance_from_start_to(coord) {
            Some(distance) => format!("{:^3x}", distance),
            None => String::from("   "),
        }
    })
}

/// Cells on the path are starred; everything else renders as in `render_plain`.
pub fn render_path(maze: &Maze, path: &[Cartesian2DCoordinate]) -> String {
    render(maze, |coord| {
        if path.contains(&coord) {
            String::from(" * ")
        } else if maze.is_under(coord) {
            String::from(" ~ ")
        } else {
            String::from("   ")
        }
    })
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_plain(self))
    }
}
