use clap::Parser;
use framer::config::{self, FramerConfig, Scalar};
use framer::imaging::FontRegistry;
use framer::{output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "framer")]
#[command(about = "Frame and caption JPEG photographs")]
#[command(long_about = "\
Frame and caption JPEG photographs

Takes a JPEG file or a folder of JPEGs (searched recursively) and writes a
framed copy of each into the output folder.

Border styles:

  solid      border + white padding around the untouched photo
             → <name>_framed.jpg
  instagram  photo scaled onto a 1080x1350 white canvas, bordered
             → <name>_instagram.jpg

Caption (first available wins):
  --caption text → EXIF capture date (\" - JUN '23 -\") → \" - --- -\"

Settings are layered: command-line flags > --config file > style defaults.
Run 'framer --gen-config' to print a documented framer.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Path to a JPEG file or a folder containing JPEG files
    #[arg(short, long, required_unless_present_any = ["list_fonts", "gen_config"])]
    input: Option<PathBuf>,

    /// Output folder where processed images will be saved
    #[arg(short, long, required_unless_present_any = ["list_fonts", "gen_config"])]
    output: Option<PathBuf>,

    /// Border thickness in pixels or as a percentage of the shorter side (e.g. '10%')
    #[arg(short = 't', long)]
    border_thickness: Option<String>,

    /// Border style: 'solid' or 'instagram' (4:5 ratio, 1080x1350px)
    #[arg(short = 's', long)]
    border_style: Option<String>,

    /// Border color in hex
    #[arg(long)]
    border_color: Option<String>,

    /// Caption text (if empty, the EXIF date is used)
    #[arg(long)]
    caption: Option<String>,

    /// Name of the font to use for captions
    #[arg(long)]
    font_name: Option<String>,

    /// Font size in pixels, or 'auto' to derive it from the border thickness
    #[arg(long)]
    font_size: Option<String>,

    /// Font color in hex
    #[arg(long)]
    font_color: Option<String>,

    /// Maximum width/height of the photo in the instagram style
    #[arg(long)]
    instagram_max_size: Option<u32>,

    /// White padding around the image in pixels
    #[arg(long)]
    padding: Option<u32>,

    /// JPEG output quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Maximum parallel workers (default: one per CPU core)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Read settings from a TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// List available fonts and exit
    #[arg(long)]
    list_fonts: bool,

    /// Print a stock framer.toml with all options documented and exit
    #[arg(long)]
    gen_config: bool,

    /// Log per-file detail to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// The settings given on the command line, as a config layer.
    fn config_layer(&self) -> FramerConfig {
        FramerConfig {
            border_style: self.border_style.clone(),
            border_thickness: self.border_thickness.clone().map(Scalar::Text),
            border_color: self.border_color.clone(),
            padding: self.padding,
            caption: self.caption.clone(),
            font_name: self.font_name.clone(),
            font_size: self.font_size.clone().map(Scalar::Text),
            font_color: self.font_color.clone(),
            instagram_max_size: self.instagram_max_size,
            quality: self.quality,
            max_processes: self.jobs,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_fonts {
        for line in output::format_font_list(FontRegistry::global()) {
            println!("{}", line);
        }
        return Ok(());
    }
    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let (Some(input), Some(output_dir)) = (cli.input.clone(), cli.output.clone()) else {
        return Err("input and output paths are required".into());
    };

    let file_layer = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => FramerConfig::default(),
    };
    let settings = config::resolve(file_layer.merge(cli.config_layer()))?;

    init_thread_pool(settings.max_processes);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_process_event(&event));
        }
    });
    let result = process::run_batch(&input, &output_dir, &settings, Some(tx));
    printer.join().ok();

    let summary = result?;
    println!();
    println!("{}", output::format_summary(&summary));
    Ok(())
}

/// Send tracing output to stderr. `RUST_LOG` wins; otherwise warnings only,
/// or debug detail with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,framer=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(max_processes: Option<usize>) {
    let threads = config::effective_threads(max_processes);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
