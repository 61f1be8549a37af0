use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use rpa_artifacts::{
    compressed_path, decompress, identify, read_performance_file, read_rewards_file,
    ArtifactConfig, ArtifactWriter, SavedArtifacts,
};
use rpa_cid::ContentId;
use rpa_types::{PerformanceFile, Serializable};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Save(args) => cmd_save(args, cli.format),
        Command::Cid(args) => cmd_cid(args, cli.format),
        Command::Verify(args) => cmd_verify(args, cli.format),
    }
}

fn cmd_save(args: SaveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut config = ArtifactConfig::load(&args.config)?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if let Some(network) = args.network {
        config = ArtifactConfig::new(config.output_dir, network)?;
    }
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;

    let mut rewards = read_rewards_file(&args.rewards)?.into_payload();
    let performance = read_performance_file(&args.performance)?.into_payload();

    let writer = ArtifactWriter::new(config);
    let saved = writer.save(&mut rewards, &performance, args.trusted)?;
    print_saved(&saved, rewards.index(), args.trusted, format)
}

fn print_saved(
    saved: &SavedArtifacts,
    index: u64,
    trusted: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(saved)?),
        OutputFormat::Text => {
            let mode = if trusted { "trusted" } else { "untrusted" };
            println!(
                "{} Saved interval {} ({})",
                "✓".green().bold(),
                index.to_string().bold(),
                mode
            );
            println!("  Primary: {}", saved.primary_cid.to_string().cyan());
            for (name, cid) in &saved.cids {
                println!("  {} {}", cid.to_string().dimmed(), name);
            }
        }
    }
    Ok(())
}

fn cmd_cid(args: CidArgs, format: OutputFormat) -> anyhow::Result<()> {
    let data = std::fs::read(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let name = match args.name {
        Some(name) => name,
        None => file_name(&args.file)?,
    };
    let cid = identify(&data, &name)?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "name": name, "cid": cid }))?
        ),
        OutputFormat::Text => println!("{}  {}", cid.to_string().cyan(), name),
    }
    Ok(())
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<()> {
    let rewards = read_rewards_file(&args.rewards)?.into_payload();
    if rewards.has_performance_cid_sentinel() {
        match format {
            OutputFormat::Json => println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "index": rewards.index(),
                    "verified": false,
                    "reason": "no performance CID recorded",
                }))?
            ),
            OutputFormat::Text => println!(
                "{} Interval {} has no performance CID recorded (untrusted run).",
                "!".yellow().bold(),
                rewards.index()
            ),
        }
        return Ok(());
    }

    let recorded: ContentId = rewards
        .minipool_performance_file_cid()
        .parse()
        .with_context(|| {
            format!(
                "invalid performance CID {:?} in {}",
                rewards.minipool_performance_file_cid(),
                args.rewards.display()
            )
        })?;

    let dir = args.rewards.parent().unwrap_or(Path::new("."));
    let config = ArtifactConfig::new(dir, rewards.header().network.clone())?;
    let path = compressed_path(&config.performance_path(rewards.index()));
    let compressed =
        std::fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let actual = identify(&compressed, &file_name(&path)?)?;
    debug!(path = %path.display(), recorded = %recorded, actual = %actual, "checking performance CID");

    if actual != recorded {
        bail!(
            "performance CID mismatch for {}: header records {}, file hashes to {}",
            path.display(),
            recorded,
            actual
        );
    }
    let performance = PerformanceFile::from_bytes(&decompress(&compressed)?)?;
    if performance.index() != rewards.index() {
        bail!(
            "{} is for interval {}, expected {}",
            path.display(),
            performance.index(),
            rewards.index()
        );
    }

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "index": rewards.index(),
                "verified": true,
                "cid": actual,
            }))?
        ),
        OutputFormat::Text => {
            println!(
                "{} Interval {} performance file matches {}",
                "✓".green().bold(),
                rewards.index(),
                actual.short().cyan()
            );
            println!("  Minipools: {}", performance.minipool_performance.len());
        }
    }
    Ok(())
}

fn file_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no UTF-8 file name", path.display()))
}
