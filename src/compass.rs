use std::fmt;

/// Bit set on a cell when a passage dives under the passage carried by the
/// cell's planar bits.
pub const UNDER: u8 = 0x10;

/// All planar direction bits.
pub const PLANAR_BITS: u8 = 0x0f;

/// Every bit a cell may legally carry.
pub const PASSAGE_BITS: u8 = 0x1f;

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}
impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}
impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from((x, y): (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }
}
impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [
        CompassPrimary::North,
        CompassPrimary::South,
        CompassPrimary::East,
        CompassPrimary::West,
    ];

    /// The bit this direction occupies in a cell bitmask.
    pub fn bit(self) -> u8 {
        match self {
            CompassPrimary::North => 0x01,
            CompassPrimary::South => 0x02,
            CompassPrimary::East => 0x04,
            CompassPrimary::West => 0x08,
        }
    }

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The bit pair a cell must carry, exactly, to count as a passage running
    /// perpendicular to this direction. A cell matching the cross bits of the
    /// travel direction is a candidate for weaving under or over.
    pub fn cross_bits(self) -> u8 {
        match self {
            CompassPrimary::North | CompassPrimary::South => {
                CompassPrimary::East.bit() | CompassPrimary::West.bit()
            }
            CompassPrimary::East | CompassPrimary::West => {
                CompassPrimary::North.bit() | CompassPrimary::South.bit()
            }
        }
    }

    /// Creates a new `Cartesian2DCoordinate` offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable (off the zero edge).
    /// The upper grid bounds are not known at this layer.
    pub fn offset_coordinate(self, coord: Cartesian2DCoordinate) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (coord.x, coord.y);
        match self {
            CompassPrimary::North => {
                if y > 0 {
                    Some(Cartesian2DCoordinate { x, y: y - 1 })
                } else {
                    None
                }
            }
            CompassPrimary::South => Some(Cartesian2DCoordinate { x, y: y + 1 }),
            CompassPrimary::East => Some(Cartesian2DCoordinate { x: x + 1, y }),
            CompassPrimary::West => {
                if x > 0 {
                    Some(Cartesian2DCoordinate { x: x - 1, y })
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn direction_bits_are_distinct_and_in_mask() {
        let mut seen = 0u8;
        for dir in CompassPrimary::ALL.iter() {
            assert_eq!(seen & dir.bit(), 0);
            seen |= dir.bit();
        }
        assert_eq!(seen, PLANAR_BITS);
        assert_eq!(seen | UNDER, PASSAGE_BITS);
    }

    #[test]
    fn opposites() {
        for dir in CompassPrimary::ALL.iter() {
            assert_eq!(dir.opposite().opposite(), *dir);
            assert_ne!(dir.opposite(), *dir);
        }
        assert_eq!(CompassPrimary::North.opposite(), CompassPrimary::South);
        assert_eq!(CompassPrimary::East.opposite(), CompassPrimary::West);
    }

    #[test]
    fn cross_bits_swap_axes() {
        assert_eq!(CompassPrimary::North.cross_bits(), 0b1100);
        assert_eq!(CompassPrimary::South.cross_bits(), 0b1100);
        assert_eq!(CompassPrimary::East.cross_bits(), 0b0011);
        assert_eq!(CompassPrimary::West.cross_bits(), 0b0011);
    }

    #[test]
    fn offsets() {
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        assert_eq!(CompassPrimary::North.offset_coordinate(gc(1, 1)), Some(gc(1, 0)));
        assert_eq!(CompassPrimary::South.offset_coordinate(gc(1, 1)), Some(gc(1, 2)));
        assert_eq!(CompassPrimary::East.offset_coordinate(gc(1, 1)), Some(gc(2, 1)));
        assert_eq!(CompassPrimary::West.offset_coordinate(gc(1, 1)), Some(gc(0, 1)));

        // Not representable off the zero edges
        assert_eq!(CompassPrimary::North.offset_coordinate(gc(3, 0)), None);
        assert_eq!(CompassPrimary::West.offset_coordinate(gc(0, 3)), None);
    }
}
