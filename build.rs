use std::fmt::Write as _;
use std::path::Path;

fn main() {
    // Re-run if git HEAD changes (new commits, checkouts, etc.)
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-changed=assets/fonts");

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    let on_tag = std::process::Command::new("git")
        .args(["describe", "--exact-match", "--tags", "HEAD"])
        .output()
        .ok()
        .is_some_and(|o| o.status.success());

    println!("cargo:rustc-env=GIT_HASH={hash}");
    println!("cargo:rustc-env=ON_RELEASE_TAG={on_tag}");

    write_font_table();
}

/// Generate `$OUT_DIR/embedded_fonts.rs`: one `(stem, extension, bytes)` entry
/// per `.ttf`/`.ttc` file found in `assets/fonts/`.
///
/// Missing directory or no font files produces an empty table; the caption
/// engine then always takes the fallback path.
fn write_font_table() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_default();
    let fonts_dir = Path::new(&manifest_dir).join("assets").join("fonts");

    let mut entries: Vec<(String, String, String)> = std::fs::read_dir(&fonts_dir)
        .into_iter()
        .flatten()
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter_map(|path| {
            let ext = path.extension()?.to_str()?.to_ascii_lowercase();
            if ext != "ttf" && ext != "ttc" {
                return None;
            }
            let stem = path.file_stem()?.to_str()?.to_string();
            let abs = path.canonicalize().ok()?.to_str()?.to_string();
            Some((stem, ext, abs))
        })
        .collect();
    entries.sort();

    let mut table = String::from("&[\n");
    for (stem, ext, abs) in &entries {
        println!("cargo:rerun-if-changed={abs}");
        let _ = writeln!(
            table,
            "    ({stem:?}, {ext:?}, include_bytes!({abs:?}) as &[u8]),"
        );
    }
    table.push(']');

    let out_dir = std::env::var("OUT_DIR").unwrap_or_default();
    let out_path = Path::new(&out_dir).join("embedded_fonts.rs");
    std::fs::write(out_path, table).expect("failed to write embedded font table");
}
