//! Seabreak CLI - South-East-Asian word segmentation
//!
//! Command-line interface for converting, inspecting and running the
//! per-script BiLSTM models.

use clap::{Parser, Subcommand};
use log::error;
use seabreak::{import_weights, ModelFormat, ModelPaths, Registry, Result, Script};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seabreak")]
#[command(author = "Seabreak Contributors")]
#[command(version)]
#[command(about = "South-East-Asian word segmentation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an ICU weights.json file to the binary model format
    Convert {
        /// Input weights.json file
        #[arg(short, long)]
        input: PathBuf,

        /// Output .seab model file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show a model's dimensions and mapping coverage
    Info {
        /// Model file to inspect (.seab)
        model: PathBuf,
    },

    /// Find word boundaries in text
    Segment {
        /// Directory holding thai.seab, lao.seab, burmese.seab, khmer.seab
        #[arg(short, long, default_value = "models")]
        models: PathBuf,

        /// Text to segment (reads --input when omitted)
        text: Option<String>,

        /// Input text file
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print break positions instead of separated text
        #[arg(short, long)]
        positions: bool,

        /// Separator inserted at each break
        #[arg(short, long, default_value = "|")]
        separator: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Convert { input, output } => {
            let model = import_weights(&input)?;
            ModelFormat::write(&output, &model)?;
            println!(
                "{} -> {} ({} classes, E={}, H={})",
                input.display(),
                output.display(),
                model.num_index(),
                model.embedding_size(),
                model.hunits()
            );
        }

        Commands::Info { model } => {
            let model = ModelFormat::read(&model)?;
            println!("name:            {}", model.name());
            println!("classes:         {}", model.num_index());
            println!("embedding size:  {}", model.embedding_size());
            println!("hidden units:    {}", model.hunits());
            println!("mapped points:   {}", model.mapping().coverage());
            println!("mapping ranges:  {}", model.mapping().ranges().len());
        }

        Commands::Segment {
            models,
            text,
            input,
            positions,
            separator,
        } => {
            let text = match (text, input) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(path)?,
                (None, None) => {
                    return Err(seabreak::SeabreakError::EmptyInput(
                        "pass TEXT or --input".to_string(),
                    ))
                }
            };

            let registry = Registry::from_paths(&ModelPaths::from_dir(&models))?;
            for script in Script::ALL {
                log::debug!(
                    "{}: {}",
                    script.name(),
                    registry.model(script).name()
                );
            }

            let chars: Vec<char> = text.chars().collect();
            let breaks = registry.breaks(&chars, 0, chars.len())?;

            if positions {
                for pos in breaks {
                    println!("{pos}");
                }
            } else {
                let mut out = String::with_capacity(text.len() + breaks.len());
                let mut next_break = breaks.iter().peekable();
                for (i, ch) in chars.iter().enumerate() {
                    if next_break.peek() == Some(&&i) {
                        out.push_str(&separator);
                        next_break.next();
                    }
                    out.push(*ch);
                }
                println!("{out}");
            }
        }
    }
    Ok(())
}
