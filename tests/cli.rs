use assert_cmd::Command;
use image::{ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Runs the binary with an empty config home so user settings never leak in.
fn captionboard_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("captionboard").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", home.join("config"))
        .env("HOME", home)
        .env("RUST_LOG", "error");
    cmd
}

fn write_photo(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("photo.png");
    RgbaImage::from_pixel(width, height, Rgba([20, 40, 200, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    captionboard_cmd(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Add captions and shapes to a photo",
        ))
        .stdout(predicate::str::contains("--print-layers"));
}

#[test]
fn missing_image_fails_without_output() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.png");
    captionboard_cmd(temp.path())
        .args(["--add", "rectangle", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no image URL supplied"));
    assert!(!output.exists());
}

#[test]
fn unknown_tool_is_rejected() {
    let temp = TempDir::new().unwrap();
    captionboard_cmd(temp.path())
        .args(["--image", "photo.png", "--add", "ellipse"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown tool 'ellipse'"));
}

#[test]
fn local_photo_is_annotated_and_exported() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(temp.path(), 1600, 900);
    let output = temp.path().join("exports").join("result.png");

    captionboard_cmd(temp.path())
        .arg("--image")
        .arg(&photo)
        .args(["--add", "rectangle", "--add", "text:Hello", "--add", "polygon"])
        .arg("--print-layers")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "backgroundImage""#))
        .stdout(predicate::str::contains(r#""scaledWidth": 800.0"#))
        .stdout(predicate::str::contains(r#""scaledHeight": 450.0"#))
        .stdout(predicate::str::contains(r#""fill": "rgba(255, 0, 0, 0.5)""#))
        .stdout(predicate::str::contains(r#""text": "Hello""#))
        .stdout(predicate::str::contains("Saved"));

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..8], &PNG_SIGNATURE);
    let exported = image::load_from_memory(&bytes).unwrap();
    assert_eq!((exported.width(), exported.height()), (800, 600));
}

#[test]
fn layers_are_printed_in_stacking_order() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(temp.path(), 400, 300);

    let assert = captionboard_cmd(temp.path())
        .arg("--image")
        .arg(&photo)
        .args(["--add", "circle", "--add", "triangle", "--print-layers"])
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();

    let background = stdout.find("backgroundImage").unwrap();
    let circle = stdout.find(r#""type": "circle""#).unwrap();
    let triangle = stdout.find(r#""type": "triangle""#).unwrap();
    assert!(background < circle && circle < triangle);
}

#[test]
fn config_controls_export_format_and_location() {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(temp.path(), 200, 200);
    let out_dir = temp.path().join("jpegs");
    let config_path = temp.path().join("custom.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
            [canvas]
            width = 320
            height = 240

            [export]
            format = "jpeg"
            quality = 0.7
            directory = "{}"
            file_name = "poster"
            "#,
            out_dir.display()
        ),
    )
    .unwrap();

    captionboard_cmd(temp.path())
        .arg("--image")
        .arg(&photo)
        .arg("--config")
        .arg(&config_path)
        .args(["--add", "text"])
        .assert()
        .success();

    let bytes = std::fs::read(out_dir.join("poster.jpg")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let exported = image::load_from_memory(&bytes).unwrap();
    assert_eq!((exported.width(), exported.height()), (320, 240));
}

#[test]
fn unreadable_background_still_exports_shapes() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out.png");

    captionboard_cmd(temp.path())
        .arg("--image")
        .arg(temp.path().join("does-not-exist.png"))
        .args(["--add", "rectangle", "--print-layers", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("failed to load background image"))
        .stdout(predicate::str::contains("backgroundImage").not());

    assert!(output.exists());
}

#[test]
fn print_layers_explains_an_empty_canvas() {
    let temp = TempDir::new().unwrap();

    captionboard_cmd(temp.path())
        .arg("--image")
        .arg(temp.path().join("does-not-exist.png"))
        .args(["--print-layers", "--output"])
        .arg(temp.path().join("out.png"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No layers yet. Add shapes or text!"));
}

#[test]
fn init_config_writes_example_once() {
    let temp = TempDir::new().unwrap();
    let config_file = temp
        .path()
        .join("config")
        .join("captionboard")
        .join("config.toml");

    captionboard_cmd(temp.path())
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
    let contents = std::fs::read_to_string(&config_file).unwrap();
    assert!(contents.contains("[canvas]"));

    captionboard_cmd(temp.path())
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn dump_config_schema_prints_json() {
    Command::cargo_bin("dump_config_schema")
        .expect("binary exists")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"canvas\""))
        .stdout(predicate::str::contains("\"cors_mode\""));
}
