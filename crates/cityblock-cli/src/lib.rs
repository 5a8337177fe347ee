//! CLI logic for the `cityblock` tool.

mod args;

pub use args::{Args, Command};

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use cityblock_assembler::{AssembleError, Assembler};
use cityblock_core::{BlueprintString, CodecError, codec};
use cityblock_data::{DataLoadError, TemplateLibrary, load_recipe};
use log::info;

/// Errors reported by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid blueprint JSON in {file}")]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read standard input")]
    Stdin(#[source] io::Error),
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// The exchange string named by a `decode` argument: `-` reads stdin, an
/// existing path reads that file, anything else is the string itself.
fn exchange_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(CliError::Stdin)?;
        return Ok(buffer);
    }
    let path = Path::new(input);
    if path.is_file() {
        return read_file(path);
    }
    Ok(input.to_string())
}

/// Execute `command` and return what should be printed.
pub fn execute(command: &Command) -> Result<String, CliError> {
    match command {
        Command::Assemble {
            recipe,
            templates,
            output,
        } => {
            let library = match templates {
                Some(dir) => TemplateLibrary::load_dir(dir)?,
                None => TemplateLibrary::builtin()?,
            };
            let recipe = load_recipe(recipe)?;
            let assembly = Assembler::new(&library).assemble_blueprint(&recipe)?;
            let exchange = assembly.encode()?;
            info!(
                "assembled {} slots, {} entities",
                assembly.stats.slots,
                assembly.blueprint.len()
            );

            match output {
                Some(path) => {
                    fs::write(path, &exchange).map_err(|source| CliError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    info!("wrote {}", path.display());
                    Ok(String::new())
                }
                None => Ok(exchange),
            }
        }
        Command::Decode { input } => {
            let doc = codec::decode(&exchange_input(input)?)?;
            Ok(codec::to_json_pretty(&doc)?)
        }
        Command::Encode { json } => {
            let text = read_file(json)?;
            let doc: BlueprintString =
                serde_json::from_str(&text).map_err(|source| CliError::Json {
                    file: json.clone(),
                    source,
                })?;
            Ok(codec::encode(&doc)?)
        }
    }
}

/// Run the CLI: execute the command and print its result.
/// An error and its chain of causes, one cause per line.
pub fn error_report(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    message
}

pub fn run(args: &Args) -> Result<(), CliError> {
    let printed = execute(&args.command)?;
    if !printed.is_empty() {
        println!("{printed}");
    }
    Ok(())
}
