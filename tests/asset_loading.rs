// Asset loading and session startup tests
// These tests write assets to a temporary directory and start sessions from
// a configuration, checking both the working path and the failure diagnostics.

mod common;

use common::{test_level, test_sheet, RecordingDevice};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tile_scroll::app::{load_assets, AppConfig, AppError};
use tile_scroll::display::DisplayMode;
use tile_scroll::{AssetError, ScrollError, Session, TileSheet};

/// Fresh per-test directory under the system temp dir
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tile_scroll_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn config_for(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.assets.tile_sheet = dir.join("tiles.png");
    config.assets.level = dir.join("level.json");
    config
}

fn write_assets(dir: &Path, level_height: usize) {
    let sheet = test_sheet(8, 4);
    sheet.save_png(dir.join("tiles.png")).expect("save sheet");
    test_level(20, level_height, sheet.num_tiles())
        .save(dir.join("level.json"))
        .expect("save level");
}

#[test]
fn test_session_starts_from_config() {
    let dir = scratch_dir("start");
    write_assets(&dir, 70);
    let mut config = config_for(&dir);
    config.display.mode = DisplayMode::Ntsc;

    let device = RecordingDevice::new();
    let log = device.log.clone();
    let mut session = Session::start(&config, device).expect("session starts");

    assert_eq!(session.scroller().visible_lines(), 192);
    assert_eq!(session.scroller().sheet().num_tiles(), 32);
    {
        let log = log.lock().unwrap();
        assert_eq!(log.configured, Some(DisplayMode::Ntsc));
        assert_eq!(log.committed_colors, Some(16));
        assert_eq!(log.published.len(), 4);
    }

    session.shutdown();
    assert_eq!(log.lock().unwrap().resets, 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_missing_tile_sheet_names_the_file() {
    let dir = scratch_dir("missing");
    let config = config_for(&dir);

    let device = RecordingDevice::new();
    let log = device.log.clone();
    let err = Session::start(&config, device)
        .err()
        .expect("startup fails");
    // Assets load before the device is touched
    assert_eq!(log.lock().unwrap().configured, None);
    assert_eq!(log.lock().unwrap().resets, 0);
    match &err {
        AppError::Asset { path, source } => {
            assert_eq!(path, &dir.join("tiles.png"));
            assert!(matches!(source, AssetError::Io(_)));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("tiles.png"));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_corrupt_png_is_a_decoding_error() {
    let dir = scratch_dir("corrupt");
    let path = dir.join("tiles.png");
    fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").expect("write file");

    let result = TileSheet::load(&path, 16, 16);
    assert!(matches!(result, Err(AssetError::PngDecoding(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_truecolor_png_is_rejected() {
    let dir = scratch_dir("truecolor");
    let path = dir.join("tiles.png");
    {
        let file = fs::File::create(&path).expect("create file");
        let mut encoder = png::Encoder::new(BufWriter::new(file), 16, 16);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("header");
        writer
            .write_image_data(&vec![0u8; 16 * 16 * 3])
            .expect("image data");
    }

    let result = TileSheet::load(&path, 16, 16);
    assert!(matches!(result, Err(AssetError::Format(_))));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_corrupt_level_is_a_json_error() {
    let dir = scratch_dir("level");
    write_assets(&dir, 70);
    fs::write(dir.join("level.json"), r#"{"width": 20}"#).expect("write level");

    let err = load_assets(&config_for(&dir).assets)
        .err()
        .expect("load fails");
    assert!(matches!(
        err,
        AppError::Asset {
            source: AssetError::Json(_),
            ..
        }
    ));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_short_level_fails_startup() {
    let dir = scratch_dir("short");
    write_assets(&dir, 40);

    let device = RecordingDevice::new();
    let log = device.log.clone();
    let err = Session::start(&config_for(&dir), device)
        .err()
        .expect("startup fails");
    assert!(matches!(
        err,
        AppError::Scroll(ScrollError::LevelTooShort {
            height: 40,
            required: 68
        })
    ));

    // The configured device is released again
    let log = log.lock().unwrap();
    assert_eq!(log.configured, Some(DisplayMode::Pal));
    assert_eq!(log.committed_colors, None);
    assert_eq!(log.resets, 1);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_unknown_cancel_key_fails_startup() {
    let dir = scratch_dir("badkey");
    write_assets(&dir, 70);
    let mut config = config_for(&dir);
    config.input.cancel_key = "Hyper".to_string();

    let err = Session::start(&config, RecordingDevice::new())
        .err()
        .expect("startup fails");
    assert!(matches!(err, AppError::Config(_)));
    let _ = fs::remove_dir_all(&dir);
}
