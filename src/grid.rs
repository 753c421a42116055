use crate::compass::Cartesian2DCoordinate;

use std::fmt;

/// A width x height table of per-cell passage bitmasks, stored as one flat
/// buffer in row major order. A cell whose mask is zero is blank (uncarved).
///
/// The grid knows nothing of direction semantics - bits are opaque here. All
/// access is bounds checked and fails fast: silently reading or writing out of
/// range is never acceptable.
#[derive(Clone, Eq, PartialEq)]
pub struct WallGrid {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl fmt::Debug for WallGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WallGrid :: width: {}, height: {}", self.width, self.height)
    }
}

impl WallGrid {
    pub fn new(width: u32, height: u32) -> WallGrid {
        WallGrid {
            width,
            height,
            cells: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn at(&self, coord: Cartesian2DCoordinate) -> u8 {
        self.cells[self.cell_index(coord)]
    }

    /// OR the given bits into a cell.
    #[inline]
    pub fn mark(&mut self, coord: Cartesian2DCoordinate, bits: u8) {
        let index = self.cell_index(coord);
        self.cells[index] |= bits;
    }

    /// Clear the given bits from a cell.
    #[inline]
    pub fn clear(&mut self, coord: Cartesian2DCoordinate, bits: u8) {
        let index = self.cell_index(coord);
        self.cells[index] &= !bits;
    }

    /// True iff *all* of the given bits are set on a cell.
    #[inline]
    pub fn is_marked(&self, coord: Cartesian2DCoordinate, bits: u8) -> bool {
        self.at(coord) & bits == bits
    }

    #[inline]
    fn cell_index(&self, coord: Cartesian2DCoordinate) -> usize {
        assert!(
            coord.x < self.width && coord.y < self.height,
            "coordinate {} out of bounds of {}x{} grid",
            coord,
            self.width,
            self.height
        );
        coord.y as usize * self.width as usize + coord.x as usize
    }
}
