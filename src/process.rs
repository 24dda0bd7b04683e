//! Batch framing.
//!
//! Walks the input (a single file or a directory tree), frames every JPEG it
//! finds and writes the result next to the others in the output directory.
//!
//! ## Per-file pipeline
//!
//! ```text
//! read bytes → decode → caption text → resolve thickness → compose
//!            → caption (if non-empty) → encode JPEG → write
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! photos/                        out/
//! ├── dawn.jpg          →        ├── dawn_framed.jpg
//! ├── trip/                      ├── dusk_framed.jpg
//! │   └── dusk.JPEG     →        │
//! └── notes.txt   (skipped)      │
//! ```
//!
//! The output directory is flat: nested inputs are written next to the
//! others under their own stem. When two inputs map to the same output name
//! (`a/x.jpg` and `b/x.jpg`), the first in sorted order is framed and the
//! rest are reported as failures without touching the output.
//!
//! ## Failure Policy
//!
//! | Failure | Effect |
//! |---|---|
//! | directory walk error | batch aborts |
//! | output directory cannot be created | batch aborts |
//! | read / decode / encode / write of one file | logged, file skipped |
//! | output name already taken by an earlier file | logged, file skipped |
//! | font cannot be loaded or drawn | fallback caption renderer |
//! | EXIF missing or unreadable | placeholder caption |
//!
//! ## Parallel Processing
//!
//! Each file's pipeline is self-contained, so files are processed in parallel
//! using [rayon](https://docs.rs/rayon). Progress is reported through an
//! optional channel of [`ProcessEvent`]s in completion order.

use crate::config::Settings;
use crate::imaging::calculations::{Dimensions, derive_font_size, resolve_thickness};
use crate::imaging::{CaptionSpec, FontRegistry, FontSize, FrameParams, compose, draw_caption};
use crate::metadata::resolve_caption;
use crate::naming::{is_jpeg, output_path};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("{output} is already written by {first}")]
    DuplicateOutput { output: PathBuf, first: PathBuf },
    #[error("cannot access {path}: {source}")]
    PathAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk input: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Progress report for one file.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Processed { source: PathBuf, output: PathBuf },
    Failed { source: PathBuf, error: String },
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Find the files to frame under `input`.
///
/// A file given directly is always taken, whatever its extension. Inside a
/// directory only `.jpg`/`.jpeg` files qualify, at any depth. Results are
/// sorted by path so runs are reproducible. Symlinks to files are taken;
/// symlinked directories are not descended into.
pub fn discover(input: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        if entry.depth() == 0 || is_jpeg(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Frame every JPEG under `input` into `output_dir`.
///
/// Per-file failures are reported and counted; only walk and output directory
/// errors end the batch early.
pub fn run_batch(
    input: &Path,
    output_dir: &Path,
    settings: &Settings,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<BatchSummary, ProcessError> {
    let files = discover(input)?;
    fs::create_dir_all(output_dir).map_err(|source| ProcessError::PathAccess {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let (jobs, duplicates) = assign_outputs(files, output_dir, settings);
    for (source, e) in &duplicates {
        report(progress.as_ref(), source, Err(e));
    }

    let processed = jobs
        .par_iter()
        .map_with(progress, |progress, (source, out_path)| {
            let result = frame_file(source, out_path, settings);
            report(progress.as_ref(), source, result.as_ref().map(|_| out_path));
            result.is_ok()
        })
        .filter(|ok| *ok)
        .count();

    Ok(BatchSummary {
        processed,
        failed: jobs.len() - processed + duplicates.len(),
    })
}

type Job = (PathBuf, PathBuf);

/// Pair each source with its output path. A source whose output path was
/// already claimed by an earlier source is returned as a duplicate instead.
fn assign_outputs(
    files: Vec<PathBuf>,
    output_dir: &Path,
    settings: &Settings,
) -> (Vec<Job>, Vec<(PathBuf, ProcessError)>) {
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();
    let mut jobs: Vec<Job> = Vec::new();
    let mut duplicates = Vec::new();
    for source in files {
        let out_path = output_path(&source, output_dir, settings.style);
        match claimed.entry(out_path) {
            Entry::Occupied(slot) => {
                let e = ProcessError::DuplicateOutput {
                    output: slot.key().clone(),
                    first: jobs[*slot.get()].0.clone(),
                };
                duplicates.push((source, e));
            }
            Entry::Vacant(slot) => {
                jobs.push((source, slot.key().clone()));
                slot.insert(jobs.len() - 1);
            }
        }
    }
    (jobs, duplicates)
}

fn report(
    progress: Option<&Sender<ProcessEvent>>,
    source: &Path,
    result: Result<&PathBuf, &ProcessError>,
) {
    let event = match result {
        Ok(output) => ProcessEvent::Processed {
            source: source.to_path_buf(),
            output: output.clone(),
        },
        Err(e) => {
            tracing::warn!("Skipping {}: {e}", source.display());
            ProcessEvent::Failed {
                source: source.to_path_buf(),
                error: e.to_string(),
            }
        }
    };
    if let Some(tx) = progress {
        tx.send(event).ok();
    }
}

/// Frame a single image and write it into `output_dir`.
///
/// Returns the path written.
pub fn process_file(
    source: &Path,
    settings: &Settings,
    output_dir: &Path,
) -> Result<PathBuf, ProcessError> {
    let out_path = output_path(source, output_dir, settings.style);
    frame_file(source, &out_path, settings)?;
    Ok(out_path)
}

fn frame_file(source: &Path, out_path: &Path, settings: &Settings) -> Result<(), ProcessError> {
    let bytes = fs::read(source).map_err(|e| ProcessError::PathAccess {
        path: source.to_path_buf(),
        source: e,
    })?;
    let framed = frame_bytes(&bytes, settings).map_err(|e| ProcessError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;

    write_jpeg(framed, out_path, settings)?;
    tracing::debug!("{} -> {}", source.display(), out_path.display());
    Ok(())
}

/// Decode `bytes` and return the framed, captioned canvas.
///
/// Only decoding can fail here; compositing and captioning always succeed.
pub fn frame_bytes(bytes: &[u8], settings: &Settings) -> Result<RgbaImage, image::ImageError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?.to_rgba8();
    let caption = resolve_caption(settings.caption.as_deref(), bytes);
    Ok(frame_image(&image, &caption, settings, FontRegistry::global()))
}

/// Compose `image` and draw `caption` on it.
pub fn frame_image(
    image: &RgbaImage,
    caption: &str,
    settings: &Settings,
    registry: &FontRegistry,
) -> RgbaImage {
    let (width, height) = image.dimensions();
    let thickness = resolve_thickness(settings.thickness, Dimensions::new(width, height));

    let params = FrameParams {
        style: settings.style,
        thickness,
        color: settings.border_color,
        padding: settings.padding,
        instagram_max_size: settings.instagram_max_size,
    };
    let mut composition = compose(image, &params);

    if !caption.is_empty() {
        let font_size = match settings.font_size {
            FontSize::Pixels(px) => px,
            FontSize::Auto => derive_font_size(thickness),
        };
        let spec = CaptionSpec {
            text: caption,
            font_size,
            color: settings.font_color,
            font_name: &settings.font_name,
        };
        let placement = composition.caption_placement();
        draw_caption(&mut composition.canvas, &spec, &placement, registry);
    }
    composition.canvas
}

fn write_jpeg(canvas: RgbaImage, path: &Path, settings: &Settings) -> Result<(), ProcessError> {
    let file = fs::File::create(path).map_err(|source| ProcessError::PathAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = image::DynamicImage::ImageRgba8(canvas).to_rgb8();
    JpegEncoder::new_with_quality(BufWriter::new(file), settings.quality.value())
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|source| ProcessError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FramerConfig, Scalar, resolve};
    use crate::imaging::Thickness;
    use crate::test_helpers::{count_non_background, write_jpeg as write_fixture};
    use image::Rgba;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn settings(config: FramerConfig) -> Settings {
        resolve(config).unwrap()
    }

    fn output_dims(path: &Path) -> (u32, u32) {
        image::image_dimensions(path).unwrap()
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    #[test]
    fn discovers_jpegs_case_insensitively() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp.path().join("a.jpg"), 8, 8);
        write_fixture(&tmp.path().join("b.JPEG"), 8, 8);
        fs::write(tmp.path().join("c.png"), b"png").unwrap();

        let files = discover(tmp.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.JPEG"]);
    }

    #[test]
    fn discovery_recurses_into_subdirectories() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("trip").join("day1");
        fs::create_dir_all(&nested).unwrap();
        write_fixture(&nested.join("dusk.jpeg"), 8, 8);
        write_fixture(&tmp.path().join("dawn.jpg"), 8, 8);

        let files = discover(tmp.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("trip/day1/dusk.jpeg")));
    }

    #[test]
    fn single_file_input_is_taken_regardless_of_extension() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.bin");
        write_fixture(&path, 8, 8);
        assert_eq!(discover(&path).unwrap(), vec![path]);
    }

    #[cfg(unix)]
    #[test]
    fn discovery_follows_symlinked_files() {
        let tmp = TempDir::new().unwrap();
        let library = tmp.path().join("library");
        let input = tmp.path().join("in");
        fs::create_dir_all(&library).unwrap();
        fs::create_dir_all(&input).unwrap();
        write_fixture(&library.join("real.jpg"), 8, 8);
        std::os::unix::fs::symlink(library.join("real.jpg"), input.join("linked.jpg")).unwrap();

        assert_eq!(discover(&input).unwrap(), vec![input.join("linked.jpg")]);
    }

    #[test]
    fn missing_input_is_walk_error() {
        let tmp = TempDir::new().unwrap();
        let result = discover(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ProcessError::Walk(_))));
    }

    // =========================================================================
    // Single file
    // =========================================================================

    #[test]
    fn solid_percentage_border_with_padding() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("square.jpg");
        write_fixture(&src, 1000, 1000);
        let out_dir = tmp.path().join("out");
        fs::create_dir(&out_dir).unwrap();

        let s = settings(FramerConfig {
            border_thickness: Some(Scalar::Text("10%".into())),
            padding: Some(50),
            ..Default::default()
        });
        let out = process_file(&src, &s, &out_dir).unwrap();

        assert_eq!(out, out_dir.join("square_framed.jpg"));
        assert_eq!(output_dims(&out), (1300, 1300));
    }

    #[test]
    fn instagram_output_is_fixed_canvas() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("wide.jpeg");
        write_fixture(&src, 400, 200);

        let s = settings(FramerConfig {
            border_style: Some("instagram".into()),
            ..Default::default()
        });
        let out = process_file(&src, &s, tmp.path()).unwrap();

        assert_eq!(out, tmp.path().join("wide_instagram.jpg"));
        assert_eq!(output_dims(&out), (1080, 1350));
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("broken.jpg");
        fs::write(&src, b"definitely not a jpeg").unwrap();

        let result = process_file(&src, &settings(FramerConfig::default()), tmp.path());
        let err = result.unwrap_err();
        assert!(matches!(err, ProcessError::Decode { .. }));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!tmp.path().join("broken_framed.jpg").exists());
    }

    #[test]
    fn frame_bytes_keeps_the_image_error() {
        let s = settings(FramerConfig::default());
        let err = frame_bytes(b"definitely not a jpeg", &s).unwrap_err();
        assert!(matches!(err, image::ImageError::Decoding(_)), "{err:?}");
    }

    #[test]
    fn unwritable_output_is_path_error() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.jpg");
        write_fixture(&src, 8, 8);

        let result = process_file(
            &src,
            &settings(FramerConfig::default()),
            &tmp.path().join("missing-dir"),
        );
        assert!(matches!(result, Err(ProcessError::PathAccess { .. })));
    }

    // =========================================================================
    // Framing without I/O
    // =========================================================================

    #[test]
    fn empty_caption_draws_nothing_below_photo() {
        let image = RgbaImage::from_pixel(100, 60, Rgba([10, 10, 10, 255]));
        let s = settings(FramerConfig {
            border_thickness: Some(Scalar::Int(10)),
            padding: Some(40),
            ..Default::default()
        });
        let canvas = frame_image(&image, "", &s, &FontRegistry::default());

        // Everything outside the bordered photo is padding.
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(canvas.dimensions(), (200, 160));
        assert_eq!(count_non_background(&canvas, white), 120 * 80);
    }

    #[test]
    fn caption_is_drawn_into_bottom_padding() {
        let image = RgbaImage::from_pixel(100, 60, Rgba([10, 10, 10, 255]));
        let s = settings(FramerConfig {
            border_thickness: Some(Scalar::Int(10)),
            padding: Some(40),
            font_size: Some(Scalar::Int(20)),
            font_color: Some("#ff0000".into()),
            ..Default::default()
        });
        let canvas = frame_image(&image, "AB", &s, &FontRegistry::default());

        let red = Rgba([255, 0, 0, 255]);
        assert!(canvas.pixels().any(|px| *px == red));
        // Caption lives below the bordered photo (which ends at y = 40 + 80).
        for (_, y, px) in canvas.enumerate_pixels() {
            if *px == red {
                assert!(y >= 120, "caption pixel at y={y}");
            }
        }
    }

    #[test]
    fn auto_font_size_follows_thickness() {
        let image = RgbaImage::from_pixel(100, 60, Rgba([10, 10, 10, 255]));
        let small = settings(FramerConfig {
            border_thickness: Some(Scalar::Int(10)),
            font_size: Some(Scalar::Text("auto".into())),
            font_color: Some("#ff0000".into()),
            ..Default::default()
        });
        let large = Settings {
            thickness: Thickness::Pixels(100),
            ..small.clone()
        };

        let red = Rgba([255, 0, 0, 255]);
        let count = |s: &Settings| {
            let canvas = frame_image(&image, "X", s, &FontRegistry::default());
            canvas.pixels().filter(|px| **px == red).count()
        };
        assert!(count(&large) > count(&small));
    }

    // =========================================================================
    // Batch
    // =========================================================================

    #[test]
    fn batch_processes_only_jpegs() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fs::create_dir(&input).unwrap();
        write_fixture(&input.join("a.jpg"), 16, 12);
        write_fixture(&input.join("b.JPEG"), 16, 12);
        fs::write(input.join("c.png"), b"png").unwrap();
        let out_dir = tmp.path().join("out");

        let summary = run_batch(&input, &out_dir, &settings(FramerConfig::default()), None).unwrap();

        assert_eq!(summary, BatchSummary { processed: 2, failed: 0 });
        let mut outputs: Vec<_> = fs::read_dir(&out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        outputs.sort();
        assert_eq!(outputs, vec!["a_framed.jpg", "b_framed.jpg"]);
    }

    #[test]
    fn batch_skips_failures_and_continues() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fs::create_dir(&input).unwrap();
        write_fixture(&input.join("good.jpg"), 16, 12);
        fs::write(input.join("bad.jpg"), b"garbage").unwrap();
        let out_dir = tmp.path().join("out");

        let (tx, rx) = mpsc::channel();
        let summary =
            run_batch(&input, &out_dir, &settings(FramerConfig::default()), Some(tx)).unwrap();

        assert_eq!(summary, BatchSummary { processed: 1, failed: 1 });
        assert!(out_dir.join("good_framed.jpg").exists());

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| matches!(
            e,
            ProcessEvent::Failed { source, .. } if source.ends_with("bad.jpg")
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            ProcessEvent::Processed { output, .. } if output.ends_with("good_framed.jpg")
        )));
    }

    #[test]
    fn batch_reports_colliding_output_names() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fs::create_dir_all(input.join("a")).unwrap();
        fs::create_dir_all(input.join("b")).unwrap();
        write_fixture(&input.join("a").join("x.jpg"), 16, 12);
        write_fixture(&input.join("b").join("x.jpeg"), 24, 12);
        let out_dir = tmp.path().join("out");

        let (tx, rx) = mpsc::channel();
        let summary =
            run_batch(&input, &out_dir, &settings(FramerConfig::default()), Some(tx)).unwrap();
        assert_eq!(summary, BatchSummary { processed: 1, failed: 1 });

        // The first file in sorted order owns the output.
        let s = settings(FramerConfig::default());
        let expected_width = 16 + 2 * (s.padding + 20);
        assert_eq!(output_dims(&out_dir.join("x_framed.jpg")).0, expected_width);

        let events: Vec<_> = rx.iter().collect();
        assert_eq!(events.len(), 2);
        let failed = events
            .iter()
            .find_map(|e| match e {
                ProcessEvent::Failed { source, error } => Some((source, error)),
                ProcessEvent::Processed { .. } => None,
            })
            .unwrap();
        assert!(failed.0.ends_with("b/x.jpeg"));
        assert!(failed.1.contains("a/x.jpg"), "{}", failed.1);
    }

    #[test]
    fn assign_outputs_keeps_distinct_names() {
        let out = Path::new("out");
        let files = vec![PathBuf::from("a/x.jpg"), PathBuf::from("a/y.jpg")];
        let (jobs, duplicates) = assign_outputs(files, out, &settings(FramerConfig::default()));
        assert!(duplicates.is_empty());
        assert_eq!(
            jobs,
            vec![
                (PathBuf::from("a/x.jpg"), out.join("x_framed.jpg")),
                (PathBuf::from("a/y.jpg"), out.join("y_framed.jpg")),
            ]
        );
    }

    #[test]
    fn batch_fails_when_output_dir_cannot_be_created() {
        let tmp = TempDir::new().unwrap();
        write_fixture(&tmp.path().join("a.jpg"), 8, 8);
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"file").unwrap();

        let result = run_batch(
            tmp.path(),
            &blocker.join("out"),
            &settings(FramerConfig::default()),
            None,
        );
        assert!(matches!(result, Err(ProcessError::PathAccess { .. })));
    }
}
