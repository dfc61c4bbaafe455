use std::path::{Path, PathBuf};

use image::{Frame, Rgba, RgbaImage, codecs::gif::GifEncoder};

fn bin_path() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_scanimate")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "scanimate.exe"
            } else {
                "scanimate"
            });
            p
        })
}

fn write_gif(path: &Path, frames: Vec<RgbaImage>) {
    let file = std::fs::File::create(path).unwrap();
    let mut enc = GifEncoder::new(file);
    enc.encode_frames(frames.into_iter().map(Frame::new))
        .unwrap();
}

#[test]
fn cli_frames_writes_pngs() {
    let dir = PathBuf::from("target").join("cli_smoke_frames");
    std::fs::create_dir_all(&dir).unwrap();

    let gif_path = dir.join("anim.gif");
    write_gif(
        &gif_path,
        vec![
            RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])),
            RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])),
        ],
    );

    let frames_dir = dir.join("frames");
    let status = std::process::Command::new(bin_path())
        .args(["frames", "--in"])
        .arg(&gif_path)
        .arg("--out")
        .arg(&frames_dir)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(frames_dir.join("frame-0.png").exists());
    assert!(frames_dir.join("frame-1.png").exists());
}

#[test]
fn cli_compose_runs_a_job_json() {
    let dir = PathBuf::from("target").join("cli_smoke_compose");
    std::fs::create_dir_all(&dir).unwrap();

    let anim_path = dir.join("anim.gif");
    let mask_path = dir.join("mask.gif");
    write_gif(
        &anim_path,
        vec![RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))],
    );
    write_gif(
        &mask_path,
        vec![RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]))],
    );

    let mut job = scanimate::Job::new(&anim_path, &mask_path, dir.join("out"));
    job.resolution = scanimate::Resolution::square(4);
    let job_path = dir.join("job.json");
    let f = std::fs::File::create(&job_path).unwrap();
    serde_json::to_writer_pretty(f, &job).unwrap();

    let _ = std::fs::remove_file(job.back_path());
    let _ = std::fs::remove_file(job.front_path());

    let status = std::process::Command::new(bin_path())
        .args(["compose", "--job"])
        .arg(&job_path)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(job.back_path().exists());
    assert!(job.front_path().exists());
}
