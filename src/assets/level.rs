// Level map - Grid of tile indices
//
// Indices are 1-based: `n` refers to tile `n - 1` of the tile sheet and 0
// marks an empty cell.

use super::AssetError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// On-disk level layout
#[derive(Debug, Serialize, Deserialize)]
struct LevelFile {
    width: usize,
    height: usize,
    tiles: Vec<u16>,
}

/// Level map loaded from the asset store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    width: usize,
    height: usize,
    tiles: Vec<u16>,
}

impl LevelMap {
    /// Create a level map from row-major tile indices
    pub fn new(width: usize, height: usize, tiles: Vec<u16>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Format(format!(
                "level size {}x{} is empty",
                width, height
            )));
        }
        let cells = width.checked_mul(height).ok_or_else(|| {
            AssetError::Format(format!("level size {}x{} is too large", width, height))
        })?;
        if tiles.len() != cells {
            return Err(AssetError::Format(format!(
                "level is {}x{} but holds {} tiles",
                width,
                height,
                tiles.len()
            )));
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Load a level map from a JSON file
    ///
    /// The file holds `width`, `height` and a flat `tiles` array.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AssetError> {
        let file = File::open(path)?;
        let level: LevelFile = serde_json::from_reader(BufReader::new(file))?;
        Self::new(level.width, level.height, level.tiles)
    }

    /// Save the level map as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AssetError> {
        let file = File::create(path)?;
        let level = LevelFile {
            width: self.width,
            height: self.height,
            tiles: self.tiles.clone(),
        };
        serde_json::to_writer(BufWriter::new(file), &level)?;
        Ok(())
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile indices of one level row
    pub fn row(&self, row: usize) -> Option<&[u16]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.tiles[start..start + self.width])
    }

    /// Tile index at `(row, column)`
    pub fn tile(&self, row: usize, column: usize) -> Option<u16> {
        if column >= self.width {
            return None;
        }
        self.row(row).map(|tiles| tiles[column])
    }

    /// First cell whose index exceeds `num_tiles`, as `(row, column, index)`
    pub fn find_index_above(&self, num_tiles: usize) -> Option<(usize, usize, u16)> {
        self.tiles
            .iter()
            .position(|&index| index as usize > num_tiles)
            .map(|i| (i / self.width, i % self.width, self.tiles[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_access() {
        let level = LevelMap::new(3, 2, vec![1, 2, 3, 4, 5, 6]).expect("valid level");
        assert_eq!(level.row(0), Some(&[1, 2, 3][..]));
        assert_eq!(level.row(1), Some(&[4, 5, 6][..]));
        assert_eq!(level.row(2), None);
        assert_eq!(level.tile(1, 2), Some(6));
        assert_eq!(level.tile(0, 3), None);
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let result = LevelMap::new(3, 2, vec![1, 2, 3]);
        assert!(matches!(result, Err(AssetError::Format(_))));
    }

    #[test]
    fn test_rejects_size_overflow() {
        let result = LevelMap::new(1 << (usize::BITS - 1), 2, vec![]);
        match result {
            Err(AssetError::Format(msg)) => assert!(msg.contains("too large"), "{}", msg),
            other => panic!("expected a format error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_oversized_level() {
        let path = std::env::temp_dir().join(format!("tile_scroll_huge_{}.json", std::process::id()));
        let json = format!(
            r#"{{"width": {}, "height": 4, "tiles": []}}"#,
            usize::MAX / 2
        );
        std::fs::write(&path, json).expect("write level");
        let result = LevelMap::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(AssetError::Format(_))));
    }

    #[test]
    fn test_find_index_above() {
        let level = LevelMap::new(2, 2, vec![0, 4, 9, 1]).expect("valid level");
        assert_eq!(level.find_index_above(4), Some((1, 0, 9)));
        assert_eq!(level.find_index_above(9), None);
    }

    #[test]
    fn test_load_from_json() {
        let path = std::env::temp_dir().join(format!("tile_scroll_level_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"width": 2, "height": 2, "tiles": [1, 0, 3, 2]}"#)
            .expect("write level");
        let level = LevelMap::load(&path).expect("load level");
        let _ = std::fs::remove_file(&path);

        assert_eq!(level.width(), 2);
        assert_eq!(level.height(), 2);
        assert_eq!(level.tile(1, 0), Some(3));
    }

    #[test]
    fn test_load_corrupt_json() {
        let path = std::env::temp_dir().join(format!("tile_scroll_corrupt_{}.json", std::process::id()));
        std::fs::write(&path, "{ width: ").expect("write level");
        let result = LevelMap::load(&path);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(AssetError::Json(_))));
    }
}
