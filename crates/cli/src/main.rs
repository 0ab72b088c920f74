//! CLI tool for turning model-generated slide text into structured slides.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{
    DeckRequest, DeckResponse, Fallback, OutlineFormatter, ParserConfig, PromptBuilder, Slide,
    SplitMode, StrayBullets,
};
use deck_markdown::SlideTextParser;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Parse "Slide N: Title" formatted model replies into slide records.
#[derive(Parser, Debug)]
#[command(name = "deck-parse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input text file(s); reads stdin when omitted or "-"
    input: Vec<PathBuf>,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Wrap JSON output in a {success, slides} response envelope
    #[arg(long)]
    envelope: bool,

    /// Parser configuration file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Section split mode: "line-scan" or "regex"
    #[arg(long)]
    split: Option<SplitMode>,

    /// Treat text without slide markers as a single slide
    #[arg(long)]
    lenient: bool,

    /// Ignore ```chart blocks
    #[arg(long)]
    no_charts: bool,

    /// Ignore markdown tables
    #[arg(long)]
    no_tables: bool,

    /// Ignore multi-column layouts
    #[arg(long)]
    no_columns: bool,

    /// Ignore shape hints and ```shapes blocks
    #[arg(long)]
    no_shapes: bool,

    /// Drop bullets on slides that have tables or columns
    #[arg(long)]
    drop_stray_bullets: bool,

    /// Skip text normalization before parsing
    #[arg(long)]
    raw: bool,

    /// Print the generation prompt for TOPIC instead of parsing
    #[arg(long, value_name = "TOPIC")]
    prompt: Option<String>,

    /// Number of slides to request with --prompt
    #[arg(long, default_value = "5")]
    slides: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Outline,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Outline => "txt",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = build_config(&args)?;

    if let Some(topic) = &args.prompt {
        let request = DeckRequest::new(topic.as_str(), args.slides);
        request.validate()?;
        let prompt = PromptBuilder::new().with_blocks(config.blocks).build(&request);
        println!("{}", prompt);
        return Ok(());
    }

    let parser = SlideTextParser::new(config);
    let inputs = if args.input.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.input.clone()
    };

    for input_path in &inputs {
        log::info!("Processing: {}", input_path.display());

        match process_input(input_path, &args, &parser) {
            Ok(output) => match &args.output {
                Some(dir) => {
                    let output_path = get_output_path(input_path, dir, args.format)?;
                    write_output(&output_path, &output)?;
                    log::info!("Written to: {}", output_path.display());
                }
                None => print!("{}", output),
            },
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Combine the optional config file with command-line flags.
fn build_config(args: &Args) -> Result<ParserConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ParserConfig::from_json(&json)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => ParserConfig::new(),
    };

    if let Some(mode) = args.split {
        config = config.with_split_mode(mode);
    }
    if args.lenient {
        config = config.with_fallback(Fallback::Lenient);
    }
    if args.drop_stray_bullets {
        config = config.with_stray_bullets(StrayBullets::DropWithBlocks);
    }
    if args.raw {
        config = config.with_normalize(false);
    }

    let mut blocks = config.blocks;
    blocks.charts &= !args.no_charts;
    blocks.tables &= !args.no_tables;
    blocks.columns &= !args.no_columns;
    blocks.shapes &= !args.no_shapes;

    Ok(config.with_blocks(blocks))
}

/// Parse one input and render it in the requested format.
fn process_input(input_path: &Path, args: &Args, parser: &SlideTextParser) -> Result<String> {
    let text = read_input(input_path)?;
    let slides = parser.parse(&text);

    log::info!("  Found {} slides", slides.len());

    render(&slides, args)
}

fn read_input(input_path: &Path) -> Result<String> {
    let mut text = String::new();

    if input_path.as_os_str() == "-" {
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
    } else {
        File::open(input_path)
            .with_context(|| format!("Failed to open {}", input_path.display()))?
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read {}", input_path.display()))?;
    }

    Ok(text)
}

fn render(slides: &[Slide], args: &Args) -> Result<String> {
    let output = match args.format {
        Format::Outline => OutlineFormatter::new().format_with_newline(slides),
        Format::Json => {
            let json = if args.envelope {
                let response = DeckResponse::success(slides.to_vec());
                to_json(&response, args.pretty)?
            } else {
                to_json(&slides, args.pretty)?
            };
            format!("{}\n", json)
        }
    };

    Ok(output)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Determine the output path for a processed input.
fn get_output_path(input_path: &Path, output_dir: &Path, format: Format) -> Result<PathBuf> {
    let stem = match input_path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if stem != "-" => stem,
        _ => "stdin",
    };

    let output_filename = format!("{}.{}", stem, format.extension());

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    Ok(output_dir.join(output_filename))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
