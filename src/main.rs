use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rustc_hash::FxHashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use carddb_import::builder::CardBuilder;
use carddb_import::merge::{merge_cards, ConflictResolver, ConsoleResolver, PreferNew};
use carddb_import::models::{CanonicalCard, RawCard};
use carddb_import::writer::{group_set_files, read_set_file, write_set_files};

#[derive(Parser)]
#[command(name = "carddb-import")]
#[command(about = "Convert pio-format card data into canonical card-database set files")]
struct Args {
    /// pio JSON files to import
    #[arg(long = "pio")]
    pio: Vec<PathBuf>,

    /// Previously exported YAML set files to load as the existing side of merges
    #[arg(long = "yaml")]
    yaml: Vec<PathBuf>,

    /// Write YAML set files to the output directory
    #[arg(long)]
    export_yaml: bool,

    /// Output directory for exported set files
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Resolve merge conflicts by always keeping the freshly imported value
    /// instead of prompting
    #[arg(long)]
    prefer_new: bool,
}

fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );
    pb.set_message(msg.to_string());
    pb
}

fn print_usage() {
    println!(
        "This tool loads and converts pio format card data into the canonical \
         card-database format.\n\
         Load pio files by;\n\
         \t'--pio sm9.json' '--pio det1.json' and so on. Multiple files can be loaded this way.\n\
         and/or load previously exported yaml files directly by;\n\
         \t'--yaml 101-base_set.yaml' and so on. Multiple files can be loaded this way.\n\
         then, export to yaml;\n\
         \t--export-yaml\n\
         Merge conflicts prompt on the console unless --prefer-new is given."
    );
}

/// Read and canonicalize every pio file, in argument order.
fn import_pio_files(builder: &mut CardBuilder, files: &[PathBuf]) -> Result<Vec<CanonicalCard>> {
    let pb = create_progress_bar(files.len() as u64, "Phase 1: Importing pio files");
    let mut cards = Vec::new();
    for path in files {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let raws: Vec<RawCard> = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        cards.extend(
            builder
                .build_all(&raws)
                .with_context(|| format!("while importing {}", path.display()))?,
        );
        pb.inc(1);
    }
    pb.finish_with_message(format!("Phase 1: Imported {} cards", cards.len()));
    Ok(cards)
}

/// Load previously exported set files, in argument order.
fn load_yaml_files(files: &[PathBuf]) -> Result<Vec<CanonicalCard>> {
    let pb = create_progress_bar(files.len() as u64, "Phase 2: Loading yaml files");
    let mut cards = Vec::new();
    for path in files {
        let set_file = read_set_file(path)?;
        cards.extend(set_file.cards);
        pb.inc(1);
    }
    pb.finish_with_message(format!("Phase 2: Loaded {} existing cards", cards.len()));
    Ok(cards)
}

/// Unify freshly imported cards with previously canonicalized ones.
/// Imported cards keep their order; existing cards that were not
/// re-imported follow, in load order.
fn reconcile(
    imported: Vec<CanonicalCard>,
    existing: Vec<CanonicalCard>,
    resolver: &mut dyn ConflictResolver,
) -> Vec<CanonicalCard> {
    let mut by_id: FxHashMap<String, usize> = FxHashMap::default();
    let mut existing: Vec<Option<CanonicalCard>> = existing.into_iter().map(Some).collect();
    for (i, card) in existing.iter().enumerate() {
        if let Some(card) = card {
            by_id.insert(card.id.clone(), i);
        }
    }

    let mut unified = Vec::with_capacity(imported.len() + existing.len());
    for card in imported {
        match by_id.get(&card.id).and_then(|&i| existing[i].take()) {
            Some(old) => unified.push(merge_cards(card, old, resolver)),
            None => unified.push(card),
        }
    }
    unified.extend(existing.into_iter().flatten());
    unified
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.pio.is_empty() && args.yaml.is_empty() {
        print_usage();
        return Ok(());
    }
    if !args.export_yaml {
        print_usage();
        return Ok(());
    }

    let start = Instant::now();

    let mut builder = CardBuilder::new();
    let imported = import_pio_files(&mut builder, &args.pio)?;
    let existing = load_yaml_files(&args.yaml)?;

    let mut resolver: Box<dyn ConflictResolver> = if args.prefer_new {
        Box::new(PreferNew)
    } else {
        Box::new(ConsoleResolver::stdio())
    };
    let unified = reconcile(imported, existing, resolver.as_mut());

    let set_files = group_set_files(unified)?;
    write_set_files(&set_files, &args.out)?;

    let card_count: usize = set_files.iter().map(|f| f.cards.len()).sum();
    println!("\n{:=<60}", "");
    println!("Import complete!");
    println!("  Sets: {}", set_files.len());
    println!("  Cards: {}", card_count);
    println!("  Output: {}", args.out.display());
    println!("  Elapsed: {:.2}s", start.elapsed().as_secs_f64());
    println!("{:=<60}", "");

    Ok(())
}
