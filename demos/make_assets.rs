// Asset generator
//
// Writes a 32-tile sheet (`assets/tiles.png`) and a 20x72 level
// (`assets/level.json`) matching the default configuration.
//
// Run with: cargo run --example make_assets [output_dir]

use std::path::PathBuf;
use tile_scroll::{LevelMap, Palette, TileSheet};

const TILE: usize = 16;
const SHEET_COLUMNS: usize = 8;
const SHEET_ROWS: usize = 4;
const LEVEL_WIDTH: usize = 20;
const LEVEL_HEIGHT: usize = 72;

/// 16-color palette as 12-bit 0x0RGB values
const PALETTE: [u16; 16] = [
    0x000, 0x111, 0x333, 0x555, 0x777, 0x999, 0xBBB, 0xFFF, 0x420, 0x741, 0xA62, 0xD94, 0x036,
    0x269, 0x49C, 0x8CF,
];

/// Palette index of pixel `(x, y)` of tile `tile`
fn tile_pixel(tile: usize, x: usize, y: usize) -> u8 {
    let edge = x == 0 || y == 0 || x == TILE - 1 || y == TILE - 1;
    match tile / 8 {
        // Bricks
        0 => {
            let shift = if y < 8 { 0 } else { 8 };
            let mortar = y % 8 == 0 || (x + shift + tile) % 16 == 0;
            if mortar {
                2
            } else {
                8 + (tile % 4) as u8
            }
        }
        // Stone blocks
        1 => {
            if edge {
                1
            } else {
                3 + ((x * y + tile) % 4) as u8
            }
        }
        // Water stripes
        2 => 12 + ((x / 2 + y + tile) % 4) as u8,
        // Sky with stars
        _ => {
            if (x * 7 + y * 13 + tile * 5) % 61 == 0 {
                7
            } else {
                0
            }
        }
    }
}

fn build_sheet() -> TileSheet {
    let width = TILE * SHEET_COLUMNS;
    let height = TILE * SHEET_ROWS;
    let mut pixels = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let tile = (y / TILE) * SHEET_COLUMNS + x / TILE;
            pixels[y * width + x] = tile_pixel(tile, x % TILE, y % TILE);
        }
    }
    TileSheet::from_indexed(
        width,
        height,
        &pixels,
        Palette::from_rgb4(&PALETTE),
        TILE,
        TILE,
    )
    .expect("generated sheet is valid")
}

fn build_level() -> LevelMap {
    // Small linear congruential generator keeps the level reproducible
    let mut seed: u32 = 0x1234_5678;
    let mut next = move || {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (seed >> 16) as usize
    };

    let mut tiles = Vec::with_capacity(LEVEL_WIDTH * LEVEL_HEIGHT);
    for row in 0..LEVEL_HEIGHT {
        let platform = row % 6 == 5;
        let gap = next() % LEVEL_WIDTH;
        for column in 0..LEVEL_WIDTH {
            let index = if column == 0 || column == LEVEL_WIDTH - 1 {
                // Walls: stone blocks
                9 + (row % 8)
            } else if platform && column.abs_diff(gap) > 1 {
                // Platforms: bricks
                1 + next() % 8
            } else if row % 12 == 0 && next() % 3 == 0 {
                // Water
                17 + next() % 8
            } else if next() % 5 == 0 {
                // Stars
                25 + next() % 8
            } else {
                0
            };
            tiles.push(index as u16);
        }
    }
    LevelMap::new(LEVEL_WIDTH, LEVEL_HEIGHT, tiles).expect("generated level is valid")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"));
    std::fs::create_dir_all(&dir)?;

    let sheet = build_sheet();
    let sheet_path = dir.join("tiles.png");
    sheet.save_png(&sheet_path)?;
    println!(
        "Wrote {} ({} tiles, {} planes)",
        sheet_path.display(),
        sheet.num_tiles(),
        sheet.depth()
    );

    let level = build_level();
    let level_path = dir.join("level.json");
    level.save(&level_path)?;
    println!(
        "Wrote {} ({}x{} tiles)",
        level_path.display(),
        level.width(),
        level.height()
    );
    Ok(())
}
