//! Binary tests for `slide-rois`

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use slide_rois::{RegionPatches, Roi};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 512x512 raster with a stained square on black
fn write_slide(dir: &Path) -> PathBuf {
    let path = dir.join("slide.png");
    let image = RgbImage::from_fn(512, 512, |x, y| {
        if (128..384).contains(&x) && (128..384).contains(&y) {
            Rgb([190, 110, 150])
        } else {
            Rgb([0, 0, 0])
        }
    });
    image.save(&path).unwrap();
    path
}

fn slide_rois() -> Command {
    Command::cargo_bin("slide-rois").unwrap()
}

const SMALL_SLIDE_ARGS: [&str; 8] = [
    "--levels",
    "4",
    "--overview-level",
    "3",
    "--sampling-level",
    "1",
    "--hole-size",
    "50",
];

#[test]
fn test_default_config_prints_toml() {
    slide_rois()
        .arg("default-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[overview]"))
        .stdout(predicate::str::contains("hole_size = 3000"))
        .stdout(predicate::str::contains("[sampling]"));
}

#[test]
fn test_missing_input_exit_code() {
    let dir = TempDir::new().unwrap();
    slide_rois()
        .arg("overview")
        .arg(dir.path().join("absent.png"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_overview_to_stdout() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let output = slide_rois()
        .arg("overview")
        .arg(&slide)
        .args(SMALL_SLIDE_ARGS)
        .output()
        .unwrap();

    assert!(output.status.success());
    let regions: Vec<Roi> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(regions.len(), 1);
    let region = regions[0];
    assert!((region.row_min - 128).abs() <= 32, "{:?}", region);
    assert!((region.col_max - 384).abs() <= 32, "{:?}", region);
}

#[test]
fn test_overview_to_file() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let out = dir.path().join("regions.json");
    slide_rois()
        .arg("overview")
        .arg(&slide)
        .args(SMALL_SLIDE_ARGS)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let text = std::fs::read_to_string(&out).unwrap();
    let regions: Vec<Roi> = serde_json::from_str(&text).unwrap();
    assert_eq!(regions.len(), 1);
}

#[test]
fn test_patches_pipeline() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let output = slide_rois()
        .arg("patches")
        .arg(&slide)
        .args(SMALL_SLIDE_ARGS)
        .args(["--patch-size", "64"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let results: Vec<RegionPatches> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert!(!results[0].patches.is_empty());
    for patch in &results[0].patches {
        assert_eq!(patch.height(), 64);
        assert!(results[0].region.contains(patch));
    }
}

#[test]
fn test_patches_single_region() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let output = slide_rois()
        .arg("patches")
        .arg(&slide)
        .args(SMALL_SLIDE_ARGS)
        .args(["--patch-size", "64", "--region", "0,512,0,512"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let patches: Vec<Roi> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!patches.is_empty());
    assert!(patches.iter().all(|p| Roi::new(0, 512, 0, 512).contains(p)));
}

#[test]
fn test_sampling_level_not_finer_is_invalid_config() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    slide_rois()
        .arg("overview")
        .arg(&slide)
        .args(["--overview-level", "2", "--sampling-level", "2"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_inverted_tolerances_are_invalid_config() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    slide_rois()
        .arg("overview")
        .arg(&slide)
        .args(["--black-tol", "240"])
        .assert()
        .code(2);
}

#[test]
fn test_bad_config_file() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[overview\nlevel = 3").unwrap();

    slide_rois()
        .arg("overview")
        .arg(&slide)
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn test_config_file_values_apply() {
    let dir = TempDir::new().unwrap();
    let slide = write_slide(dir.path());
    let config = dir.path().join("small.toml");
    std::fs::write(
        &config,
        "[overview]\nlevel = 3\nhole_size = 50\n\n[sampling]\nlevel = 1\n",
    )
    .unwrap();

    slide_rois()
        .arg("overview")
        .arg(&slide)
        .args(["--levels", "4", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("row_min"));
}
