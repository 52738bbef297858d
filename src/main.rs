//! rosekit CLI - Command-line tool for inspecting legacy game asset files.
//!
//! This is the main entry point for the rosekit command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use rosekit::ifo::IfoFile;
use rosekit::prelude::*;

/// rosekit - legacy game asset inspection tool
#[derive(Parser)]
#[command(name = "rosekit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum number of assets kept in memory while resolving references
    #[arg(long, env = "ROSEKIT_CACHE_CAPACITY", default_value_t = 256, global = true)]
    cache_capacity: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of an asset file
    Info {
        /// Input file
        #[arg(env = "ROSEKIT_INPUT")]
        input: PathBuf,

        /// Data root used to resolve paths referenced by the file
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Dump an asset file as JSON
    Dump {
        /// Input file
        #[arg(env = "ROSEKIT_INPUT")]
        input: PathBuf,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the bone hierarchy of a skeleton
    Skeleton {
        /// Input ZMD file
        #[arg(env = "ROSEKIT_INPUT")]
        input: PathBuf,
    },

    /// Print the keyframe curves of a motion
    Clip {
        /// Input ZMO file
        #[arg(env = "ROSEKIT_INPUT")]
        input: PathBuf,

        /// Print every key instead of a per-curve summary
        #[arg(short, long)]
        keys: bool,
    },

    /// Check that files survive a load, save and reload unchanged
    Verify {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only check files whose path matches this glob pattern
        #[arg(short, long)]
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Info { input, root } => {
            let cache = AssetCache::new(cli.cache_capacity);
            cmd_info(&input, root.as_deref(), &cache)?;
        }
        Commands::Dump { input, output } => {
            cmd_dump(&input, output.as_deref())?;
        }
        Commands::Skeleton { input } => {
            cmd_skeleton(&input)?;
        }
        Commands::Clip { input, keys } => {
            cmd_clip(&input, keys)?;
        }
        Commands::Verify { paths, filter } => {
            cmd_verify(&paths, filter.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Asset> {
    Asset::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn cmd_info(input: &Path, root: Option<&Path>, cache: &AssetCache<Asset>) -> Result<()> {
    let kind = AssetKind::from_path(input)
        .with_context(|| format!("Unrecognized file type: {}", input.display()))?;
    let data = fs::read(input).context("Failed to read input file")?;
    let asset = Asset::parse(kind, &data).with_context(|| format!("Failed to parse {kind} file"))?;

    println!("{}: {} ({} bytes)", input.display(), kind, data.len());

    match &asset {
        Asset::Skeleton(zmd) => {
            println!("Version: {:?}", zmd.version());
            println!("Bones: {}", zmd.bones().len());
            println!("Dummies: {} ({} stored)", zmd.dummies().len(), zmd.file_dummies().len());
        }
        Asset::Motion(zmo) => {
            println!("FPS: {}", zmo.fps);
            println!("Frames: {}", zmo.frame_count);
            if let Some(duration) = zmo.duration() {
                println!("Duration: {duration:.3}s");
            }
            println!("Channels: {}", zmo.channels.len());
            for channel in &zmo.channels {
                println!("  bone {:>3}: {}", channel.bone, channel.channel_type());
            }
        }
        Asset::SceneObjects(zsc) => {
            let parts: usize = zsc.objects.iter().map(|o| o.parts.len()).sum();
            let empty = zsc.objects.iter().filter(|o| o.is_empty()).count();
            println!("Meshes: {}", zsc.meshes.len());
            println!("Materials: {}", zsc.materials.len());
            println!("Effects: {}", zsc.effects.len());
            println!("Objects: {} ({} empty, {} parts)", zsc.objects.len(), empty, parts);
        }
        Asset::Characters(chr) => {
            let enabled = chr.enabled_characters().count();
            println!("Skeletons: {}", chr.skeletons.len());
            println!("Motions: {}", chr.motions.len());
            println!("Effects: {}", chr.effects.len());
            println!("Characters: {} ({} enabled)", chr.characters.len(), enabled);
            println!("Distinct models: {}", chr.model_groups().len());

            if let Some(root) = root {
                print_character_skeletons(chr, root, cache);
            }
        }
        Asset::Map(ifo) => {
            let mut reader = BinaryReader::new(&data);
            let directory = IfoFile::read_directory(&mut reader).context("Failed to read block directory")?;
            println!("Blocks: {}", directory.len());
            for entry in &directory {
                let name = BlockType::try_from(entry.block_type)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|_| format!("unknown ({})", entry.block_type));
                println!("  {:>8} {}", entry.offset, name);
            }
            println!("Placed objects: {}", ifo.placed_objects().count());
            println!("Monster spawns: {}", ifo.monster_spawns.len());
            if let Some(grid) = &ifo.water_grid {
                let wet = grid.cells.iter().filter(|c| c.has_water).count();
                println!("Water grid: {}x{} ({} wet cells)", grid.width, grid.height, wet);
            }
        }
    }

    Ok(())
}

fn print_character_skeletons(chr: &ChrFile, root: &Path, cache: &AssetCache<Asset>) {
    for (id, character) in chr.enabled_characters() {
        let path = match chr.skeleton_path(character) {
            Ok(path) => path,
            Err(e) => {
                println!("  {:>5} {}: {}", id, character.name, e);
                continue;
            }
        };

        let full_path = root.join(path.replace('\\', "/"));
        let loaded = cache.get_or_load(path, |_| Asset::load(&full_path));
        match loaded.as_deref() {
            Ok(Asset::Skeleton(zmd)) => {
                println!("  {:>5} {}: {} ({} bones)", id, character.name, path, zmd.bones().len());
            }
            Ok(other) => {
                println!("  {:>5} {}: {} is a {} file", id, character.name, path, other.kind());
            }
            Err(e) => {
                println!("  {:>5} {}: {}", id, character.name, e);
            }
        }
    }
    tracing::debug!(cached = cache.len(), "resolved character skeletons");
}

fn cmd_dump(input: &Path, output: Option<&Path>) -> Result<()> {
    let asset = load(input)?;
    let json = serde_json::to_string_pretty(&asset).context("Failed to serialize asset")?;

    match output {
        Some(path) => {
            fs::write(path, json).context("Failed to write output file")?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_skeleton(input: &Path) -> Result<()> {
    let Asset::Skeleton(zmd) = load(input)? else {
        bail!("{} is not a skeleton file", input.display());
    };
    let skeleton = zmd.skeleton().context("Failed to build skeleton")?;

    for (index, node) in skeleton.nodes().iter().enumerate() {
        let position = node.absolute_position();
        println!(
            "{:>4} {} {} ({:.3}, {:.3}, {:.3})",
            index,
            if node.is_dummy { "D" } else { "B" },
            node.path,
            position.x,
            position.y,
            position.z
        );
    }

    println!(
        "\nTotal: {} bones, {} dummies",
        skeleton.bones().len(),
        skeleton.dummies().len()
    );

    Ok(())
}

fn cmd_clip(input: &Path, keys: bool) -> Result<()> {
    let Asset::Motion(zmo) = load(input)? else {
        bail!("{} is not a motion file", input.display());
    };
    let clip = zmo.build_clip().context("Failed to build animation clip")?;

    println!("FPS: {}, duration: {:.3}s", clip.fps, clip.duration);

    for curve in &clip.curves {
        let (min, max) = curve
            .keys
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), k| {
                (lo.min(k.value), hi.max(k.value))
            });
        println!(
            "bone {:>3} {}.{}: {} keys [{:.4}, {:.4}]",
            curve.bone,
            curve.channel,
            curve.component.name(),
            curve.keys.len(),
            min,
            max
        );
        if keys {
            for key in &curve.keys {
                println!("    {:>8.4}s {:.6}", key.time, key.value);
            }
        }
    }

    println!("\nTotal: {} curves", clip.curves.len());

    Ok(())
}

/// Result of re-encoding a single file.
enum Outcome {
    /// Re-encoded bytes equal the input.
    Identical,
    /// Bytes differ but decode to the same asset.
    Equivalent,
    /// The reloaded asset differs.
    Mismatch,
}

fn verify_file(path: &Path) -> Result<Outcome> {
    let kind = AssetKind::from_path(path).context("Unrecognized file type")?;
    let data = fs::read(path)?;
    let asset = Asset::parse(kind, &data)?;
    let bytes = asset.to_bytes()?;
    if bytes == data {
        return Ok(Outcome::Identical);
    }

    let reloaded = Asset::parse(kind, &bytes)?;
    Ok(if reloaded == asset {
        Outcome::Equivalent
    } else {
        Outcome::Mismatch
    })
}

fn collect_files(paths: &[PathBuf], filter: Option<&glob::Pattern>) -> Vec<PathBuf> {
    let options = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let entries = WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| AssetKind::from_path(p).is_some());
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }

    if let Some(pattern) = filter {
        files.retain(|p| pattern.matches_path_with(p, options));
    }
    files
}

fn cmd_verify(paths: &[PathBuf], filter: Option<&str>) -> Result<()> {
    let pattern = filter
        .map(glob::Pattern::new)
        .transpose()
        .context("Invalid filter pattern")?;
    let files = collect_files(paths, pattern.as_ref());

    if files.is_empty() {
        bail!("No asset files found");
    }

    println!("Verifying {} files...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let identical = AtomicUsize::new(0);
    let equivalent = AtomicUsize::new(0);

    let failures: Vec<(PathBuf, String)> = files
        .par_iter()
        .filter_map(|path| {
            let result = verify_file(path);
            pb.inc(1);
            match result {
                Ok(Outcome::Identical) => {
                    identical.fetch_add(1, Ordering::Relaxed);
                    None
                }
                Ok(Outcome::Equivalent) => {
                    equivalent.fetch_add(1, Ordering::Relaxed);
                    None
                }
                Ok(Outcome::Mismatch) => Some((path.clone(), "reloaded asset differs".to_string())),
                Err(e) => Some((path.clone(), format!("{e:#}"))),
            }
        })
        .collect();

    pb.finish_with_message("Done");

    for (path, reason) in &failures {
        eprintln!("FAIL {}: {}", path.display(), reason);
    }

    println!(
        "Verified {} files in {:?}: {} identical, {} equivalent, {} failed",
        files.len(),
        start.elapsed(),
        identical.load(Ordering::Relaxed),
        equivalent.load(Ordering::Relaxed),
        failures.len()
    );

    if !failures.is_empty() {
        bail!("{} files failed verification", failures.len());
    }

    Ok(())
}
