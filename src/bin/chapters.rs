use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use podstatic::chapters::{chapters_from_yaml, chapters_to_yaml};

/// Convert chapter marks between the text and YAML formats
#[derive(Parser, Debug)]
#[command(name = "podstatic-chapters")]
#[command(about = "Convert chapter marks between plain text and YAML")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read `HH:MM:SS.mmm Title <link>` lines, print a YAML chapter list
    ToYaml {
        /// Input file, standard input when omitted
        file: Option<PathBuf>,
    },
    /// Read a YAML chapter list, print one text line per chapter
    ToText {
        /// Input file, standard input when omitted
        file: Option<PathBuf>,
    },
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read standard input")?;
            Ok(input)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::ToYaml { file } => {
            let input = read_input(file.as_ref())?;
            let yaml = chapters_to_yaml(&input).context("Failed to convert chapter text")?;
            print!("{yaml}");
        }
        Command::ToText { file } => {
            let input = read_input(file.as_ref())?;
            let text = chapters_from_yaml(&input).context("Failed to convert chapter YAML")?;
            print!("{text}");
        }
    }

    Ok(())
}
