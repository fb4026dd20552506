//! Command-line parsing for the `bizfin` binary.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use bizfin_core::Direction;

pub const USAGE: &str = "\
BizFinance - invoice bookkeeping for small businesses

Usage: bizfin <COMMAND> [OPTIONS]

Commands:
  summary                 Revenue, cost, VAT and profit figures
  list                    Invoices, newest first
  report                  AI-written financial report
  extract-text <TEXT>     Invoice draft from a free-text description
  extract-image <PATH>    Invoice draft from an invoice photo

Options:
  -f, --file <PATH>       Invoice JSON file (default: built-in sample data)
  -d, --direction <DIR>   list: only sale or purchase invoices
                          extract-*: side being entered (default: sale)
  -s, --search <TERM>     list: match counterparty or description
  -c, --config <PATH>     AI config file (default: platform config dir)
  -h, --help              Show this help message";

/// What to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Summary,
    List {
        direction: Option<Direction>,
        search: String,
    },
    Report,
    ExtractText {
        text: String,
        direction: Direction,
    },
    ExtractImage {
        path: PathBuf,
        direction: Direction,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub file: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Parses arguments, program name excluded.
pub fn parse_args(args: &[String]) -> Result<Cli> {
    let mut file = None;
    let mut config = None;
    let mut direction = None;
    let mut search = String::new();
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => {
                return Ok(Cli {
                    command: Command::Help,
                    file,
                    config,
                })
            }
            "--file" | "-f" | "--config" | "-c" | "--direction" | "-d" | "--search" | "-s" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("{} requires a value", arg))?;
                match arg {
                    "--file" | "-f" => file = Some(PathBuf::from(value)),
                    "--config" | "-c" => config = Some(PathBuf::from(value)),
                    "--direction" | "-d" => direction = Some(value.parse::<Direction>()?),
                    _ => search = value.clone(),
                }
                i += 1;
            }
            other if other.starts_with('-') => bail!("unknown option: {}", other),
            other => positional.push(other),
        }
        i += 1;
    }

    let (name, rest) = match positional.split_first() {
        Some((name, rest)) => (*name, rest),
        None => {
            return Ok(Cli {
                command: Command::Help,
                file,
                config,
            })
        }
    };

    let command = match name {
        "summary" => Command::Summary,
        "list" => Command::List { direction, search },
        "report" => Command::Report,
        "extract-text" => {
            if rest.is_empty() {
                bail!("extract-text requires a description");
            }
            Command::ExtractText {
                text: rest.join(" "),
                direction: direction.unwrap_or_default(),
            }
        }
        "extract-image" => match rest {
            [path] => Command::ExtractImage {
                path: PathBuf::from(path),
                direction: direction.unwrap_or_default(),
            },
            _ => bail!("extract-image requires exactly one image path"),
        },
        "help" => Command::Help,
        other => bail!("unknown command: {}", other),
    };

    Ok(Cli {
        command,
        file,
        config,
    })
}

/// Guesses an image MIME type from the file extension.
pub fn image_mime_type(path: &std::path::Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}
