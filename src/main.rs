use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{error::ErrorKind, CommandFactory, Parser};

use moxforge::{config::Config, error::ConvertError};

const EXAMPLES: &str = "\
Examples:
  moxforge input.txt output.dck
  moxforge --input moxfield_deck.txt --output forge_deck.dck
  moxforge -i deck.json -o converted.dck --name \"My Awesome Deck\"
  moxforge --demo  # Run with sample deck";

#[derive(Parser)]
#[command(name = "moxforge", version, about = "Convert Moxfield deck files to Forge format", after_help = EXAMPLES)]
struct Cli {
    /// Input Moxfield deck file (.txt or .json)
    input_file: Option<PathBuf>,
    /// Output Forge deck file (.dck)
    output_file: Option<PathBuf>,
    /// Input Moxfield deck file (.txt or .json)
    #[arg(short = 'i', long = "input")]
    input: Option<PathBuf>,
    /// Output Forge deck file (.dck)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,
    /// Override deck name in the output file
    #[arg(short, long)]
    name: Option<String>,
    /// Run with sample deck data and display output
    #[arg(long)]
    demo: bool,
    /// TOML file with default deck name and output extension
    #[arg(short, long, env = "MOXFORGE_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ConvertError>() {
                Some(ConvertError::FileNotFound(path)) => {
                    eprintln!("Error: Input file '{}' not found", path.display())
                }
                _ => eprintln!("Error during conversion: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.demo {
        println!("Running demo with sample Moxfield deck...");
        let conversion = moxforge::convert_demo(cli.name);
        println!("\nConverted deck:");
        println!("{}", conversion.forge);
        return Ok(());
    }

    let Some(input) = cli.input_file.or(cli.input) else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "Input file is required. Use -h for help.")
            .exit();
    };
    let config = Config::load_or_default(cli.config.as_deref()).context("loading config")?;
    let output = match cli.output_file.or(cli.output) {
        Some(output) => output,
        None => {
            let output = moxforge::default_output_path(&input, &config.output_extension);
            println!("No output file specified, using: {}", output.display());
            output
        }
    };

    let conversion = moxforge::convert_file(&input, &output, cli.name, &config)?;

    println!("Successfully converted '{}' to '{}'", input.display(), output.display());
    conversion.stats().print();
    Ok(())
}
