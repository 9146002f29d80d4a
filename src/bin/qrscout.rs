use clap::{Parser, Subcommand};
use qrscout::tools::{
    bench_limit_from_env, dataset_iter, dataset_root_from_env, expects_qr, grayscale_stats, load_rgba,
    smoke_from_env,
};
use qrscout::utils::grayscale::grayscale;
use qrscout::{AcquireConfig, Report, RqrrDecoder, Scanner, SearchConfig, preprocess_image};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrscout", version, about = "Find QR codes in difficult photographs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search one image (file or URL) for a QR code
    Scan {
        /// Image file to scan
        #[arg(long, conflicts_with = "url", required_unless_present = "url")]
        image: Option<PathBuf>,
        /// Image URL to download and scan
        #[arg(long)]
        url: Option<String>,
    },
    /// Write the four enhancement recipe outputs of an image as PNGs
    Enhance {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Compute the reading rate over a labelled dataset
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let scanner = Scanner::from_env().with_decoder(RqrrDecoder::new());

    match cli.command {
        Command::Scan { image, url } => scan_cmd(&scanner, image, url).await,
        Command::Enhance { image, out_dir } => enhance_cmd(&image, &out_dir),
        Command::ReadingRate { root, limit, smoke } => reading_rate_cmd(&scanner, root, limit, smoke),
    }
}

async fn scan_cmd(scanner: &Scanner, image: Option<PathBuf>, url: Option<String>) -> ExitCode {
    let start = Instant::now();
    let result = match (image, url) {
        (Some(path), _) => scanner.scan_path(&path).await,
        (None, Some(url)) => scanner.scan_url(&url).await,
        (None, None) => {
            eprintln!("error: pass --image or --url");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(outcome) => {
            println!("{}", Report::new(&outcome));
            println!(
                "({} decode attempts in {:.1} ms)",
                outcome.attempts,
                start.elapsed().as_secs_f64() * 1000.0
            );
            if outcome.is_found() { ExitCode::SUCCESS } else { ExitCode::from(1) }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn enhance_cmd(image: &Path, out_dir: &Path) -> ExitCode {
    let max_dim = Some(AcquireConfig::from_env().max_dimension).filter(|&d| d > 0);
    let buffer = match load_rgba(image, max_dim) {
        Ok(buffer) => buffer,
        Err(err) => {
            eprintln!("error: failed to load {}: {err}", image.display());
            return ExitCode::from(2);
        }
    };

    let gray = grayscale(&buffer);
    let stats = grayscale_stats(&gray.data);
    println!(
        "Image: {} ({}x{}) gray min={} max={} avg={}",
        image.display(),
        buffer.width(),
        buffer.height(),
        stats.min,
        stats.max,
        stats.avg
    );

    if let Err(err) = std::fs::create_dir_all(out_dir) {
        eprintln!("error: cannot create {}: {err}", out_dir.display());
        return ExitCode::from(2);
    }

    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    for (enhanced, recipe) in preprocess_image(&buffer) {
        let path = out_dir.join(format!("{stem}_{}.png", recipe.name()));
        let stats = grayscale_stats(&grayscale(&enhanced).data);
        let saved = image::save_buffer(
            &path,
            enhanced.data(),
            enhanced.width() as u32,
            enhanced.height() as u32,
            image::ColorType::Rgba8,
        );
        match saved {
            Ok(()) => println!(
                "  {} ({}): {} black={:.1}%",
                recipe.name(),
                recipe.description(),
                path.display(),
                stats.black_permille as f64 / 10.0
            ),
            Err(err) => {
                eprintln!("error: failed to write {}: {err}", path.display());
                return ExitCode::from(2);
            }
        }
    }

    ExitCode::SUCCESS
}

fn reading_rate_cmd(scanner: &Scanner, root: Option<PathBuf>, limit: Option<usize>, smoke: bool) -> ExitCode {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();

    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return ExitCode::from(2);
    }

    let max_dim = Some(AcquireConfig::from_env().max_dimension).filter(|&d| d > 0);
    let config: &SearchConfig = scanner.search_config();
    println!("qrscout reading rate");
    println!("====================");
    println!("root: {} scales: {:?}\n", root.display(), config.scales);

    let mut labelled = 0usize;
    let mut found = 0usize;
    let mut false_positives = 0usize;
    let mut failed_loads = 0usize;
    let start = Instant::now();

    for path in dataset_iter(&root, limit, smoke) {
        let image = match load_rgba(&path, max_dim) {
            Ok(image) => image,
            Err(err) => {
                eprintln!("  skip {}: {err}", path.display());
                failed_loads += 1;
                continue;
            }
        };

        let positive = expects_qr(&path);
        let hit = match scanner.scan(&image) {
            Ok(outcome) => outcome.is_found(),
            Err(err) => {
                eprintln!("  skip {}: {err}", path.display());
                failed_loads += 1;
                continue;
            }
        };

        if positive {
            labelled += 1;
            found += hit as usize;
        } else if hit {
            false_positives += 1;
        }
    }

    if labelled == 0 {
        println!("No labelled images found under {}", root.display());
        return ExitCode::from(1);
    }

    let rate = found as f64 / labelled as f64 * 100.0;
    println!("found:           {found}/{labelled} = {rate:.2}%");
    println!("false positives: {false_positives}");
    println!("load failures:   {failed_loads}");
    println!("elapsed:         {:.2}s", start.elapsed().as_secs_f64());
    ExitCode::SUCCESS
}
