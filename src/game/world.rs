//! # World Module
//!
//! The static tile grid the village is built on.
//!
//! The grid is constructed once at start-up and never mutated. Every query is
//! total: coordinates outside the grid resolve to [`TileType::Wall`], which
//! gives the map a virtual border without storing one.

use crate::config::{MAP_HEIGHT, MAP_WIDTH, TILE_SIZE};
use crate::game::Position;
use crate::{HamletError, HamletResult};
use serde::{Deserialize, Serialize};

/// Classification of a single map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Open ground
    Empty,
    /// Building wall or map edge
    Wall,
    /// Pond or stream
    Water,
    /// Tree or hedge
    Tree,
}

impl TileType {
    /// Decodes a numeric map code.
    pub fn from_code(code: u8) -> Option<TileType> {
        match code {
            0 => Some(TileType::Empty),
            1 => Some(TileType::Wall),
            2 => Some(TileType::Water),
            3 => Some(TileType::Tree),
            _ => None,
        }
    }

    /// Returns the numeric map code of this tile type.
    pub fn code(self) -> u8 {
        match self {
            TileType::Empty => 0,
            TileType::Wall => 1,
            TileType::Water => 2,
            TileType::Tree => 3,
        }
    }

    /// Only empty ground can be walked on. Decorations block like walls.
    pub fn is_walkable(self) -> bool {
        self == TileType::Empty
    }
}

/// The reference village, one row per line, row 0 first.
#[rustfmt::skip]
const VILLAGE_MAP: [[u8; MAP_WIDTH as usize]; MAP_HEIGHT as usize] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 0, 3, 3, 0, 0, 3, 0, 1, 0, 0, 1, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 0, 3, 3, 0, 0, 3, 0, 1, 0, 0, 1, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 3, 0, 0, 0, 2, 0, 0, 2, 0, 0, 0, 0, 3, 0, 0, 0, 1],
    [1, 0, 0, 3, 0, 0, 0, 2, 0, 0, 2, 0, 0, 0, 0, 3, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable grid of tiles with a fixed cell size.
///
/// Tiles are addressed as `(x, y)` with `y` selecting the row. World
/// coordinates map onto tiles by dividing by [`TileGrid::tile_size`].
///
/// # Examples
///
/// ```
/// use hamlet::{TileGrid, TileType};
///
/// let grid = TileGrid::village();
/// assert!(grid.is_walkable(5, 7));
/// assert_eq!(grid.tile_at(-1, 3), TileType::Wall);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tile_size: f32,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// Builds a grid from row-major tile codes.
    ///
    /// Fails if the dimensions are not positive, the code count does not match
    /// `width * height`, or any code is unknown.
    pub fn from_codes(width: i32, height: i32, tile_size: f32, codes: &[u8]) -> HamletResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(HamletError::InvalidMap(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if tile_size.is_nan() || tile_size <= 0.0 {
            return Err(HamletError::InvalidMap(format!(
                "tile size must be positive, got {}",
                tile_size
            )));
        }

        let expected = width.checked_mul(height).ok_or_else(|| {
            HamletError::InvalidMap(format!("{}x{} map is too large", width, height))
        })? as usize;
        if codes.len() != expected {
            return Err(HamletError::InvalidMap(format!(
                "expected {} tile codes for a {}x{} map, got {}",
                expected,
                width,
                height,
                codes.len()
            )));
        }

        let tiles = codes
            .iter()
            .enumerate()
            .map(|(i, &code)| {
                TileType::from_code(code).ok_or_else(|| {
                    HamletError::InvalidMap(format!(
                        "unknown tile code {} at ({}, {})",
                        code,
                        i as i32 % width,
                        i as i32 / width
                    ))
                })
            })
            .collect::<HamletResult<Vec<_>>>()?;

        Ok(Self {
            width,
            height,
            tile_size,
            tiles,
        })
    }

    /// Builds the reference 20x15 village map.
    pub fn village() -> Self {
        let tiles = VILLAGE_MAP
            .iter()
            .flat_map(|row| row.iter())
            .map(|&code| TileType::from_code(code).unwrap_or(TileType::Wall))
            .collect();

        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            tile_size: TILE_SIZE,
            tiles,
        }
    }

    /// Width of the grid in tiles.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height of the grid in tiles.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Edge length of one tile in world units.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width of the grid in world units.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Height of the grid in world units.
    pub fn pixel_height(&self) -> f32 {
        self.height as f32 * self.tile_size
    }

    /// Checks whether a tile coordinate lies inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Returns the tile at the given coordinate, or `Wall` outside the grid.
    pub fn tile_at(&self, x: i32, y: i32) -> TileType {
        if !self.in_bounds(x, y) {
            return TileType::Wall;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    /// Checks whether an entity may stand on the given tile.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_walkable()
    }

    /// Checks whether the tile under a world position is walkable.
    pub fn is_walkable_world(&self, pos: Position) -> bool {
        let (x, y) = self.world_to_tile(pos.x, pos.y);
        self.is_walkable(x, y)
    }

    /// Converts world coordinates to the tile containing them.
    ///
    /// Uses floor division so negative coordinates land on negative tiles
    /// (and therefore on the virtual wall border) instead of tile 0.
    pub fn world_to_tile(&self, world_x: f32, world_y: f32) -> (i32, i32) {
        (
            (world_x / self.tile_size).floor() as i32,
            (world_y / self.tile_size).floor() as i32,
        )
    }

    /// Converts a tile coordinate to the world position of its origin corner.
    pub fn tile_to_world(&self, x: i32, y: i32) -> (f32, f32) {
        (x as f32 * self.tile_size, y as f32 * self.tile_size)
    }

    /// Returns the world position of a tile's centre.
    pub fn tile_center(&self, x: i32, y: i32) -> Position {
        let (wx, wy) = self.tile_to_world(x, y);
        let half = self.tile_size / 2.0;
        Position::new(wx + half, wy + half)
    }

    /// Iterates over every in-bounds tile as `(x, y, tile)`.
    pub fn tiles(&self) -> impl Iterator<Item = (i32, i32, TileType)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, &tile)| (i as i32 % self.width, i as i32 / self.width, tile))
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::village()
    }
}
