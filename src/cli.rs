use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chapsplit")]
#[command(about = "Split a PDF into per-chapter files using a YAML manifest")]
#[command(version)]
pub struct Cli {
    /// Manifest YAML file (or a PDF when using --generate-config)
    pub input: PathBuf,

    /// Read the PDF's bookmarks and print a manifest to stdout
    #[arg(
        long,
        alias = "generate-manifest",
        conflicts_with_all = ["dry_run", "chapters", "output_dir"]
    )]
    pub generate_config: bool,

    /// Preview what would be written without creating files
    #[arg(long)]
    pub dry_run: bool,

    /// Only split these chapters (e.g. "--chapters 3 5" or "--chapters 1-4,7")
    #[arg(long, value_name = "N", num_args = 1..)]
    pub chapters: Vec<String>,

    /// Override the output directory from the manifest
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Project root the manifest's paths are relative to [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
