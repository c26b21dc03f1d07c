use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn JSON row payloads into xlsx reports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the workbook for a payload and print its path
    Render(RenderArgs),
    /// Show how a payload lands in the worksheet
    Preview(PreviewArgs),
    /// Print the column letters for zero-based column indices
    Address(AddressArgs),
    /// Render a payload, spool it for its recipients, and remove the workbook
    Deliver(DeliverArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Request payload JSON file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Directory for the generated workbook
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,
    /// Character encoding of the payload (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Keep default column widths instead of fitting them to content
    #[arg(long = "no-autofit")]
    pub no_autofit: bool,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Request payload JSON file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of data rows to display (0 means all)
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Annotate each data cell with its inferred type
    #[arg(long)]
    pub kinds: bool,
    /// Character encoding of the payload (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddressArgs {
    /// Zero-based column indices
    #[arg(required = true)]
    pub indices: Vec<usize>,
}

#[derive(Debug, Args)]
pub struct DeliverArgs {
    /// Request payload JSON file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// YAML settings file with output, outbox, and mail settings
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Override the directory for the temporary workbook
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Override the outbox directory
    #[arg(long)]
    pub outbox: Option<PathBuf>,
    /// Character encoding of the payload (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
