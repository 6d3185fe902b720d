use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;

use mado::{ConvertError, docx};

#[derive(Parser)]
#[command(name = "mado", version, about = "Convert Markdown into a styled DOCX document")]
struct Cli {
    /// Markdown file to convert.
    input: PathBuf,

    /// Output path; defaults to the input with a .docx extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with style overrides, deep-merged over the defaults.
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Document title; defaults to the input file stem.
    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    author: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("wrote {}", output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf, ConvertError> {
    let overrides = match &cli.styles {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|source| ConvertError::ReadInput {
                path: path.clone(),
                source,
            })?;
            Some(
                serde_json::from_str(&raw).map_err(|source| ConvertError::StyleConfig {
                    path: path.clone(),
                    source,
                })?,
            )
        }
        None => None,
    };

    let mut model = mado::convert_file(&cli.input, overrides.as_ref())?;

    let now = Utc::now();
    model.metadata.created = Some(now);
    model.metadata.modified = Some(now);
    model.metadata.title = cli.title.unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    model.metadata.author = cli.author.unwrap_or_default();

    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("docx"));
    docx::write_docx(&output, &model)?;
    Ok(output)
}
