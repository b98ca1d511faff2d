//! Tifo CLI - Command-line tool for inspecting FIFA asset containers.
//!
//! This is the main entry point for the Tifo command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

use tifo::audio::ContextDataFile;
use tifo::prelude::*;

/// Tifo - FIFA asset container inspection tool
#[derive(Parser)]
#[command(name = "tifo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the contents of an audio bin
    AudioInfo {
        /// Input audio bin
        #[arg(short, long, env = "INPUT_FILE")]
        input: PathBuf,

        /// Print the decoded document as JSON
        #[arg(long)]
        json: bool,

        /// Repetition pools used to name sentence references
        #[arg(long)]
        pools: Option<PathBuf>,

        /// Event system used to name sentence references
        #[arg(long)]
        events: Option<PathBuf>,
    },

    /// Decode every audio bin matching a pattern
    AudioBatch {
        /// Glob pattern, e.g. "data/audio/**/*.bin"
        #[arg(short, long)]
        pattern: String,
    },

    /// Show a crowd seat file
    CrowdInfo {
        /// Input crowd file
        #[arg(short, long, env = "INPUT_FILE")]
        input: PathBuf,

        /// Re-encode the file to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show an RX3 bone name section
    BoneName {
        /// Input section
        #[arg(short, long, env = "INPUT_FILE")]
        input: PathBuf,

        /// Re-encode the section to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    match cli.command {
        Commands::AudioInfo {
            input,
            json,
            pools,
            events,
        } => {
            cmd_audio_info(&input, json, pools.as_deref(), events.as_deref())?;
        }
        Commands::AudioBatch { pattern } => {
            cmd_audio_batch(&pattern)?;
        }
        Commands::CrowdInfo { input, output } => {
            cmd_crowd_info(&input, output.as_deref())?;
        }
        Commands::BoneName { input, output } => {
            cmd_bone_name(&input, output.as_deref())?;
        }
    }

    Ok(())
}

fn load_audio_bin(path: &Path) -> Result<AudioBinFile> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    AudioBinFile::parse(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Load an optional sibling document and check its kind.
fn load_sibling(path: Option<&Path>, expected: ContainerTag) -> Result<Option<AudioBinFile>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let file = load_audio_bin(path)?;
    if file.tag != expected {
        bail!("{} is a {} bin, expected {}", path.display(), file.tag, expected);
    }
    Ok(Some(file))
}

fn cmd_audio_info(input: &Path, json: bool, pools: Option<&Path>, events: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let file = load_audio_bin(input)?;
    debug!(elapsed = ?start.elapsed(), "decoded {}", input.display());

    if json {
        println!("{}", serde_json::to_string_pretty(&file)?);
        return Ok(());
    }

    let file_name = input.to_string_lossy();
    let module = file.module_info(&file_name);

    println!("File:   {}", input.display());
    println!("Tag:    {}", file.tag);
    if module.is_known() {
        println!("Module: {} ({})", module.name, module.module_type);
    }

    match &file.document {
        AudioDocument::EventSystem(doc) => print_event_system(doc),
        AudioDocument::Sentences(doc) => {
            let pools = load_sibling(pools, ContainerTag::RepetitionPools)?;
            let events = load_sibling(events, ContainerTag::EventSystem)?;
            let siblings = Siblings::new(
                pools.as_ref().and_then(|f| f.document.as_repetition_pools()),
                events.as_ref().and_then(|f| f.document.as_event_system()),
            );
            print_sentences(doc, siblings);
        }
        AudioDocument::GraffitiRuntime(doc) => print_graffiti(doc),
        AudioDocument::RepetitionPools(doc) => print_repetition_pools(doc),
        AudioDocument::ContextData(doc) => print_context_data(doc),
        AudioDocument::Unrecognized => {
            warn!("{} is not a supported audio bin", input.display());
        }
    }

    Ok(())
}

fn print_event_system(doc: &EventSystemFile) {
    println!("System CRC: {:#010x}", doc.system_crc);
    println!("Parameters: {}", doc.num_parameters());
    for parameter in doc.sorted_parameters() {
        println!(
            "  {:>6} {:<40} {:?} ({} values)",
            parameter.id,
            parameter.name,
            parameter.kind,
            parameter.num_values()
        );
        for value in &parameter.values {
            println!("         {:>6} {}", value.value, value.name);
        }
    }

    println!("Events: {}", doc.num_events());
    for event in &doc.events {
        let names: Vec<&str> = doc.event_parameters(event).map(|p| p.name.as_str()).collect();
        println!("  {:<40} [{}]", event.name, names.join(", "));
    }
}

fn print_sentences(doc: &SentencesFile, siblings: Siblings<'_>) {
    let sentences = doc.sentences_by_id();
    println!("Sentences: {}", sentences.len());

    for (section, sentence) in sentences {
        println!(
            "  {:>6} {:<32} priority {} ({} phrases)",
            sentence.id,
            section.trigger_name,
            sentence.priority,
            sentence.phrases.len()
        );
        for phrase in &sentence.phrases {
            let references: Vec<String> = phrase
                .cross_references()
                .into_iter()
                .map(|r| format!("{} = {:?}", r, siblings.resolve(r)))
                .collect();
            println!("         {}", references.join(", "));
        }
    }
}

fn print_graffiti(doc: &GraffitiRuntimeFile) {
    println!("Tables:  {}", doc.num_tables());
    println!("Samples: {}", doc.num_samples());
    for (name, table) in doc.named_tables() {
        println!(
            "  {:>6} {:>6} {:<32} {} refs",
            table.tag_id,
            table.tag_value,
            name,
            table.num_refs()
        );
    }
}

fn print_repetition_pools(doc: &RepetitionPoolsFile) {
    println!("Pools: {}", doc.num_pools());
    for pool in doc.sorted_pools() {
        let kind = pool.kind().map_or_else(|| "Unknown".to_string(), |k| k.to_string());
        match pool.repeat_time() {
            Some(time) => println!("  {:>6} {:<10} {:<32} repeat {}s", pool.id, kind, pool.name, time),
            None => println!("  {:>6} {:<10} {}", pool.id, kind, pool.name),
        }
    }
}

fn print_context_data(doc: &ContextDataFile) {
    println!("System CRC: {:#010x}", doc.system_crc);
    println!("Events:     {}", doc.num_events);
    println!("Ids:        {}", doc.ids.len());
    println!("Parameters: {}", doc.parameters.len());
    for parameter in &doc.parameters {
        println!("  {:>6} {:<40} {:?}", parameter.id, parameter.name, parameter.kind);
    }
}

fn cmd_audio_batch(pattern: &str) -> Result<()> {
    let paths: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid pattern: {pattern}"))?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!("Skipping {}: {}", e.path().display(), e.error());
                None
            }
        })
        .collect();

    if paths.is_empty() {
        bail!("No files match {pattern}");
    }

    println!("Reading {} files...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let reads: Vec<std::io::Result<Vec<u8>>> = paths
        .par_iter()
        .map(|path| {
            let data = fs::read(path);
            pb.inc(1);
            data
        })
        .collect();
    pb.finish_with_message("Done");

    let mut inputs = Vec::with_capacity(reads.len());
    let mut decodable = Vec::with_capacity(reads.len());
    let mut failed = 0usize;
    for (path, read) in paths.iter().zip(reads) {
        match read {
            Ok(data) => {
                inputs.push(data);
                decodable.push(path);
            }
            Err(e) => {
                println!("FAIL {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    let results = parse_many(&inputs);

    let mut decoded = 0usize;
    let mut unrecognized = 0usize;
    for (path, result) in decodable.iter().zip(&results) {
        match result {
            Ok(file) if file.document.is_recognized() => {
                info!("{} -> {}", path.display(), file.tag);
                decoded += 1;
            }
            Ok(file) => {
                println!("SKIP {}: unrecognized tag {}", path.display(), file.tag);
                unrecognized += 1;
            }
            Err(e) => {
                println!("FAIL {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    println!(
        "Decoded {} files, {} unrecognized, {} failed in {:?}",
        decoded,
        unrecognized,
        failed,
        start.elapsed()
    );

    Ok(())
}

fn cmd_crowd_info(input: &Path, output: Option<&Path>) -> Result<()> {
    let crowd = CrowdFile::load(input).context("Failed to load crowd file")?;

    println!("File:    {}", input.display());
    println!("Version: {}", crowd.version());
    println!("Seats:   {}", crowd.num_seats());
    if let Some(size) = crowd.version().seat_size() {
        println!("Seat size: {} bytes", size);
    }

    if let CrowdSeats::Unknown(raw) = crowd.seats {
        warn!("Unsupported crowd version {:#06x}, seats were not decoded", raw);
    }

    if let Some(output) = output {
        crowd.save(output).context("Failed to write crowd file")?;
        println!("Wrote {}", output.display());
    }

    Ok(())
}

fn cmd_bone_name(input: &Path, output: Option<&Path>) -> Result<()> {
    let bone = BoneName::load(input).context("Failed to load bone name section")?;

    println!("File:       {}", input.display());
    println!("Total size: {}", bone.total_size);
    println!("Payload:    {} bytes", bone.data.len());
    println!(
        "Unknown:    {:#x} {:#x} {:#x}",
        bone.unknown_1, bone.unknown_2, bone.unknown_3
    );

    if let Some(output) = output {
        let total_size = bone.save(output).context("Failed to write bone name section")?;
        println!("Wrote {} ({} bytes)", output.display(), total_size);
    }

    Ok(())
}
