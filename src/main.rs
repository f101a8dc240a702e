use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use payor_mess::{generate, load_families, write_files, GeneratorConfig, SourceSystem};

/// Generate messy multi-source payor records for MDM matching tests
#[derive(Parser, Debug)]
#[command(name = "payor-mess", version, about)]
struct Args {
    /// JSON config file (every field optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Family definition document
    #[arg(short, long)]
    families: Option<PathBuf>,

    /// Output directory for the CSV files
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Random seed (same seed + same families = identical output)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Also write canonical_payors.csv
    #[arg(long)]
    ground_truth: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    run(&config)
}

/// Config file first, then CLI flags on top
fn resolve_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(families) = &args.families {
        config.families_path = families.clone();
    }
    if let Some(out) = &args.out {
        config.output_dir = out.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.ground_truth {
        config.emit_ground_truth = true;
    }

    config.validate()?;
    Ok(config)
}

fn run(config: &GeneratorConfig) -> Result<()> {
    println!("🏥 Payor MDM Fixture Generator v{}", payor_mess::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load family definitions
    println!("\n📂 Loading families...");
    let families = load_families(&config.families_path)?;
    let entity_count: usize = families.iter().map(|f| f.entity_count()).sum();
    println!(
        "✓ Loaded {} families ({} entities) from {}",
        families.len(),
        entity_count,
        config.families_path.display()
    );

    // 2. Build + check + synthesize, all in memory
    println!("\n🎲 Generating with seed {}...", config.seed);
    let generation = generate(&families, config)?;
    println!("✓ {}", generation.integrity.summary());
    println!("✓ {}", generation.corpus.stats.summary());

    // 3. Write files
    println!("\n💾 Writing CSV files to {}...", config.output_dir.display());
    let written = write_files(&config.output_dir, &generation.files)?;
    for file in &written {
        println!("✓ {} ({} rows)", file.path.display(), file.rows);
    }

    // 4. Summary
    let stats = &generation.corpus.stats;
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📊 Source Summary");
    for source in SourceSystem::ALL {
        println!("   {:<14} {:>5}", source.name(), stats.count(source));
    }
    println!("   {:<14} {:>5}", "Duplicates", stats.duplicates);
    println!("   {:<14} {:>5}", "Orphans", stats.orphans);
    println!("   {:<14} {:>5}", "Confusions", stats.confusions);
    println!("   {:<14} {:>5}", "Parent links", stats.parent_links);
    println!("\n🔑 Fingerprint: {}", generation.fingerprint);
    println!("🎉 Generated {} records", stats.total());

    Ok(())
}
