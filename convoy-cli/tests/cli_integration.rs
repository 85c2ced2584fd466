use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

fn convoy_cmd() -> Command {
    Command::cargo_bin("convoy").expect("Failed to find convoy binary")
}

#[test]
fn test_formats_lists_every_kind() -> Result<(), Box<dyn Error>> {
    convoy_cmd()
        .arg("formats")
        .assert()
        .success()
        .stdout(contains("mp4"))
        .stdout(contains("libx264 (default)"))
        .stdout(contains("flac"))
        .stdout(contains("webp"));
    Ok(())
}

#[test]
fn test_formats_kind_filter() -> Result<(), Box<dyn Error>> {
    convoy_cmd()
        .args(["formats", "--kind", "image"])
        .assert()
        .success()
        .stdout(contains("jpeg"))
        .stdout(contains("mp4").not());
    Ok(())
}

#[test]
fn test_unknown_format_is_fatal() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input = input_dir.path().join("clip.avi");
    std::fs::write(&input, "dummy content")?;

    convoy_cmd()
        .args(["convert", "--format", "xyz"])
        .arg(&input)
        .env_remove("CONVOY_NTFY_TOPIC")
        .assert()
        .code(1)
        .stderr(contains("Invalid parameter"));

    assert!(!input_dir.path().join("clip.xyz").exists());
    Ok(())
}

#[test]
fn test_codec_not_allowed_for_format_is_fatal() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let input = input_dir.path().join("clip.avi");
    std::fs::write(&input, "dummy content")?;

    convoy_cmd()
        .args(["convert", "--format", "mp4", "--codec", "libvorbis"])
        .arg(&input)
        .env_remove("CONVOY_NTFY_TOPIC")
        .assert()
        .code(1)
        .stderr(contains("libvorbis"));
    Ok(())
}

#[test]
fn test_bad_fps_is_fatal() -> Result<(), Box<dyn Error>> {
    convoy_cmd()
        .args(["convert", "--format", "mp4", "--fps", "fast", "clip.avi"])
        .assert()
        .code(1)
        .stderr(contains("fps"));
    Ok(())
}

#[test]
fn test_missing_format_is_fatal() -> Result<(), Box<dyn Error>> {
    convoy_cmd().args(["convert", "clip.avi"]).assert().code(1);
    Ok(())
}

#[test]
fn test_directory_without_sources_is_fatal() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let log_dir = tempdir()?;
    std::fs::write(input_dir.path().join("notes.txt"), "not media")?;

    convoy_cmd()
        .args(["convert", "--format", "png", "--log-dir"])
        .arg(log_dir.path())
        .arg(input_dir.path())
        .env_remove("CONVOY_NTFY_TOPIC")
        .assert()
        .code(1)
        .stderr(contains("No convertible files found"));
    Ok(())
}

#[test]
fn test_image_batch_with_one_bad_file_is_partial_failure() -> Result<(), Box<dyn Error>> {
    let input_dir = tempdir()?;
    let output_dir = tempdir()?;
    let good = input_dir.path().join("good.png");
    image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10])).save(&good)?;
    let bad = input_dir.path().join("bad.png");
    std::fs::write(&bad, "not an image")?;

    convoy_cmd()
        .args(["convert", "--format", "jpeg", "--quality", "low", "--json", "--output-dir"])
        .arg(output_dir.path())
        .arg(&bad)
        .arg(&good)
        .env_remove("CONVOY_NTFY_TOPIC")
        .assert()
        .code(2)
        .stdout(contains("\"type\":\"job_failed\""))
        .stdout(contains("\"type\":\"batch_finished\""));

    assert!(output_dir.path().join("good.jpeg").exists());
    assert!(!output_dir.path().join("bad.jpeg").exists());
    assert!(output_dir.path().join("logs").is_dir());
    Ok(())
}

#[test]
fn test_help_exits_cleanly() -> Result<(), Box<dyn Error>> {
    convoy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("convert"))
        .stdout(contains("formats"));
    Ok(())
}
