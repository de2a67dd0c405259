use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use tools::{decode_capture_json, format_decode_pretty, inspect_capture, InspectReport};
use wire::BlockKind;

#[derive(Parser)]
#[command(
    name = "vantage-tools",
    version,
    about = "vantage capture inspection and decoding tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect capture structure and sizes.
    Inspect {
        /// Path to a capture file or a directory of captures.
        capture_path: PathBuf,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Sort inspected captures.
        #[arg(long, value_enum)]
        sort: Option<InspectSort>,
        /// Limit the number of inspected captures (after sorting).
        #[arg(long)]
        limit: Option<usize>,
        /// Print one line per frame.
        #[arg(long)]
        frames: bool,
    },
    /// Decode a capture into structured output.
    Decode {
        /// Path to the capture file.
        capture_file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DecodeFormat::Json)]
        format: DecodeFormat,
        /// Only print this frame.
        #[arg(long)]
        frame: Option<usize>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InspectSort {
    Size,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DecodeFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let limits = wire::Limits::default();
    match cli.command {
        Command::Inspect {
            capture_path,
            glob,
            sort,
            limit,
            frames,
        } => {
            if capture_path.is_dir() {
                let entries = collect_capture_entries(&capture_path, glob.as_deref())?;
                let mut entries = maybe_sort_entries(entries, sort);
                let limit = limit.or(sort.map(|InspectSort::Size| 10));
                if let Some(limit) = limit {
                    entries.truncate(limit);
                }
                for entry in entries {
                    let report = inspect_file(&entry.path, &limits)?;
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    print_inspect_report(&report, frames);
                }
            } else {
                let report = inspect_file(&capture_path, &limits)?;
                print_inspect_report(&report, frames);
            }
        }
        Command::Decode {
            capture_file,
            format,
            frame,
        } => {
            let bytes = fs::read(&capture_file)
                .with_context(|| format!("read capture {}", capture_file.display()))?;
            let mut output = decode_capture_json(&bytes, &limits)
                .with_context(|| format!("decode capture {}", capture_file.display()))?;
            if let Some(index) = frame {
                output.frames.retain(|frame| frame.index == index);
                if output.frames.is_empty() {
                    anyhow::bail!("capture has no frame {index}");
                }
            }
            match format {
                DecodeFormat::Json => {
                    let json = serde_json::to_string_pretty(&output).context("serialize json")?;
                    println!("{json}");
                }
                DecodeFormat::Pretty => {
                    print!("{}", format_decode_pretty(&output));
                }
            }
        }
    }
    Ok(())
}

fn inspect_file(path: &Path, limits: &wire::Limits) -> Result<InspectReport> {
    let bytes = fs::read(path).with_context(|| format!("read capture {}", path.display()))?;
    inspect_capture(&bytes, limits).with_context(|| format!("inspect capture {}", path.display()))
}

struct CaptureEntry {
    path: PathBuf,
    size: u64,
}

fn collect_capture_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<CaptureEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(CaptureEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn maybe_sort_entries(
    mut entries: Vec<CaptureEntry>,
    sort: Option<InspectSort>,
) -> Vec<CaptureEntry> {
    match sort {
        Some(InspectSort::Size) => {
            entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        }
        None => {}
    }
    entries
}

fn print_inspect_report(report: &InspectReport, frames: bool) {
    let totals = &report.totals;
    println!("observer: 0x{:016X}", report.observer);
    println!(
        "frames: {} bytes: {} largest frame: {} bytes",
        report.frames.len(),
        totals.bytes,
        report.largest_frame
    );
    println!("blocks:");
    for kind in BlockKind::ALL {
        let entry = totals.kind(kind);
        if entry.blocks > 0 {
            println!("  {}: {} ({} bytes)", kind.name(), entry.blocks, entry.bytes);
        }
    }
    println!("attribute words: {}", totals.values);
    println!("out of range: {}", totals.out_of_range);
    if frames {
        println!("per frame:");
        for (index, frame) in report.frames.iter().enumerate() {
            println!(
                "  {index}: {} bytes, {} blocks, {} words",
                frame.bytes,
                frame.block_count(),
                frame.values
            );
        }
    }
}
