// ☁️ Phrasecloud CLI - CSV → Phrase Cloud PNG
// Load, normalize, reshape, lay out, save (and optionally show)

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

use phrasecloud::{
    load_font, load_headings, normalize_headings, parse_color, parse_palette, Cloud, CloudConfig,
    DuplicatePolicy, FrequencyTable, DEFAULT_HEADING_COLUMN, VIVID,
};

/// Render a phrase cloud PNG from a CSV of subject headings
#[derive(Parser, Debug)]
#[command(name = "phrasecloud", version, about)]
struct Cli {
    /// Input CSV with a heading column and a count column
    #[arg(value_name = "CSV", default_value = "ce_headings.csv")]
    input: PathBuf,

    /// Output image path (always overwritten)
    #[arg(short, long, default_value = "first_attempt.png")]
    output: PathBuf,

    /// Column holding the headings
    #[arg(long, value_name = "NAME", default_value = DEFAULT_HEADING_COLUMN)]
    heading_column: String,

    /// Column holding the counts (default: first column that is not the heading)
    #[arg(long, value_name = "NAME")]
    count_column: Option<String>,

    /// How to resolve rows that normalize to the same heading
    #[arg(long, value_enum, default_value = "last")]
    on_duplicate: OnDuplicate,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 1500)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// Keep only the N most frequent headings
    #[arg(long, default_value_t = 200)]
    max_words: usize,

    /// 0 sizes phrases by rank only, 1 proportionally to frequency
    #[arg(long, default_value_t = 0.75)]
    relative_scaling: f64,

    /// Chance a phrase is laid out horizontally
    #[arg(long, default_value_t = 0.9)]
    prefer_horizontal: f64,

    /// Stop placing phrases once they would drop below this size
    #[arg(long, default_value_t = 10)]
    min_font_size: u32,

    /// Fixed starting font size (default: estimated from the two largest phrases)
    #[arg(long)]
    max_font_size: Option<u32>,

    /// Canvas background: 'white', 'black', or '#RRGGBB'
    #[arg(long, default_value = "white")]
    background: String,

    /// Comma-separated colors cycled across phrases (default: the Vivid palette)
    #[arg(long, value_name = "COLORS")]
    palette: Option<String>,

    /// Fold plural headings into their singular form
    #[arg(long)]
    normalize_plurals: bool,

    /// Fix the layout RNG for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// TTF/OTF font file (default: probe well-known system fonts)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Label printed when showing the result
    #[arg(long)]
    title: Option<String>,

    /// Open the saved image in the system viewer
    #[arg(long)]
    show: bool,

    /// Print the frequency table as JSON and exit without rendering
    #[arg(long)]
    dump: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OnDuplicate {
    /// Keep the last occurrence's count
    Last,
    /// Add the counts together
    Sum,
}

impl From<OnDuplicate> for DuplicatePolicy {
    fn from(choice: OnDuplicate) -> Self {
        match choice {
            OnDuplicate::Last => DuplicatePolicy::LastWins,
            OnDuplicate::Sum => DuplicatePolicy::Sum,
        }
    }
}

#[derive(Serialize)]
struct DumpRow<'a> {
    heading: &'a str,
    count: u64,
}

fn main() -> Result<()> {
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    println!("☁️  Phrasecloud v{}", phrasecloud::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load
    println!("\n📂 Loading headings from {}...", cli.input.display());
    let mut records = load_headings(&cli.input, &cli.heading_column, cli.count_column.as_deref())?;
    println!("✓ Loaded {} rows", records.len());

    // 2. Normalize
    println!("\n🔤 Normalizing headings to title case...");
    normalize_headings(&mut records);

    // 3. Reshape
    let policy: DuplicatePolicy = cli.on_duplicate.into();
    let table = FrequencyTable::from_records(&records, policy);
    let collapsed = records.len() - table.len();
    if collapsed > 0 {
        println!(
            "✓ {} distinct headings ({} duplicate rows collapsed, {})",
            table.len(),
            collapsed,
            policy.describe()
        );
    } else {
        println!("✓ {} distinct headings", table.len());
    }

    if cli.dump {
        let rows: Vec<DumpRow> = table
            .iter()
            .map(|(heading, count)| DumpRow { heading, count })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if table.is_empty() {
        bail!(
            "{} has a header row but no data rows; nothing to lay out",
            cli.input.display()
        );
    }

    // 4. Generate
    let config = CloudConfig {
        width: cli.width,
        height: cli.height,
        max_words: cli.max_words,
        relative_scaling: cli.relative_scaling,
        prefer_horizontal: cli.prefer_horizontal,
        min_font_size: cli.min_font_size,
        max_font_size: cli.max_font_size,
        normalize_plurals: cli.normalize_plurals,
        background: parse_color(&cli.background)?,
        palette: match cli.palette.as_deref() {
            Some(list) => parse_palette(list)?,
            None => VIVID.to_vec(),
        },
        seed: cli.seed,
        ..CloudConfig::default()
    };
    // Surface configuration mistakes before touching fonts
    config.validate()?;

    let face = load_font(cli.font.as_deref())?;
    println!("\n🔠 Using font {}", face.source().display());

    println!(
        "☁️  Laying out up to {} phrases on a {}x{} canvas...",
        config.max_words, config.width, config.height
    );
    let kept = table.len().min(config.max_words);
    let cloud = Cloud::generate(&table, &face, &config)?;
    println!("✓ Placed {} of {} phrases", cloud.words.len(), kept);

    // 5. Save
    println!("\n💾 Saving image...");
    cloud.to_file(&cli.output)?;
    println!("✓ Saved {}", cli.output.display());

    // Success summary
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if cloud.words.len() == kept {
        println!("🎉 Cloud complete!");
        println!("✅ All {} phrases placed", kept);
    } else {
        println!("✅ Cloud complete!");
        println!("✓ Phrases placed: {}", cloud.words.len());
        println!("✓ Not placed: {}", kept - cloud.words.len());
    }

    if cli.show {
        show_cloud(&cli.output, cli.title.as_deref())?;
    }

    Ok(())
}

#[cfg(feature = "viewer")]
fn show_cloud(path: &Path, title: Option<&str>) -> Result<()> {
    phrasecloud::present::show(path, title)
}

#[cfg(not(feature = "viewer"))]
fn show_cloud(_path: &Path, _title: Option<&str>) -> Result<()> {
    eprintln!("❌ Viewer support not built in!");
    eprintln!("   Rebuild with: cargo build --features viewer");
    std::process::exit(1);
}
