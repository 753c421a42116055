use docopt::Docopt;
use serde_derive::Deserialize;
use weavemaze::{
    compass::Cartesian2DCoordinate,
    generators::GeneratorKind,
    grid_displays,
    maze::{Maze, MazeOptions},
    pathing,
};
use std::{fs::File, io, io::prelude::*};

const USAGE: &str = "Weavemaze

Usage:
    weavemaze_driver -h | --help
    weavemaze_driver [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--weave] [--text-out=<path>]
    weavemaze_driver render (binary|sidewinder|backtracker|kruskal) [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--seed=<s>] [--weave] [--text-out=<path>] [(--show-distances --start-point-x=<x> --start-point-y=<y>|--show-path)]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --seed=<s>             Seed for the random sequence. The same seed always regenerates the same maze; omitting it seeds from OS entropy and is not reproducible.
    --weave                Allow passages to tunnel under perpendicular passages (supported by the backtracker strategy).
    --text-out=<path>      Output file path for the textual rendering of the maze.
    --show-distances       Show the distance from the start point to all other points on the grid, in hexadecimal.
    --start-point-x=<x>    x coordinate of the distances start point.
    --start-point-y=<y>    y coordinate of the distances start point.
    --show-path            Mark the cells of the longest path through the maze.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<u32>,
    flag_grid_width: u32,
    flag_grid_height: u32,
    cmd_render: bool,
    cmd_binary: bool,
    cmd_sidewinder: bool,
    cmd_backtracker: bool,
    cmd_kruskal: bool,
    flag_seed: Option<u32>,
    flag_weave: bool,
    flag_text_out: String,
    flag_show_distances: bool,
    flag_start_point_x: Option<u32>,
    flag_start_point_y: Option<u32>,
    flag_show_path: bool,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let kind = generator_kind(&args);
    let options = MazeOptions {
        seed: args.flag_seed,
        rng: None,
        weave: args.flag_weave,
    };
    let mut maze =
        Maze::new(width, height, kind, options).map_err(|e| Error::from(e.to_string()))?;
    maze.generate();

    let rendered = if args.flag_show_distances {
        let start = Cartesian2DCoordinate::new(
            args.flag_start_point_x.unwrap_or(0),
            args.flag_start_point_y.unwrap_or(0),
        );
        let distances = pathing::Distances::new(&maze, start)
            .ok_or("Provided invalid start coordinate from which to show distances.")?;
        grid_displays::render_distances(&maze, &distances)
    } else if args.flag_show_path {
        let path = pathing::longest_path(&maze)
            .ok_or("The maze has no path to show - generation left the grid disconnected.")?;
        grid_displays::render_path(&maze, &path)
    } else {
        grid_displays::render_plain(&maze)
    };

    if args.flag_text_out.is_empty() {
        println!("{}", rendered);
    } else {
        write_text_to_file(&rendered, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn generator_kind(args: &MazeArgs) -> GeneratorKind {
    if args.cmd_render {
        if args.cmd_binary {
            GeneratorKind::BinaryTree
        } else if args.cmd_backtracker {
            GeneratorKind::RecursiveBacktracker
        } else if args.cmd_kruskal {
            GeneratorKind::Kruskal
        } else {
            GeneratorKind::Sidewinder
        }
    } else {
        GeneratorKind::Sidewinder
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
