// CLI configuration
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// tagbridge - copy audio tag metadata across tagging schemas
#[derive(Parser, Debug)]
#[command(name = "tagbridge")]
#[command(about = "Copy audio tag metadata across the ID3 and MP4 tagging schemas", long_about = None)]
#[command(version)]
pub struct Config {
    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (repeat for more detail)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Cache file for the label/format mapping matrix
    #[arg(long, global = true, value_name = "FILE")]
    pub mappings_cache: Option<PathBuf>,

    /// Override the mapping matrix URL
    #[arg(long, global = true, value_name = "URL")]
    pub mappings_url: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy tags from one dump onto another, translating between schemas
    Copy {
        /// Source tag dump
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Target tag dump (created if missing; schema inferred from the
        /// dumped file's audio extension)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Display a dump's tags with classified keys
    View {
        /// Tag dump path
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Show raw keys instead of display forms
        #[arg(short, long)]
        raw: bool,

        /// Also show keys that are hidden by default
        #[arg(short = 's', long)]
        show_skipped: bool,

        /// Include replaygain keys
        #[arg(long)]
        include_replaygain: bool,
    },

    /// Delete one tag from a dump; without --tag, show the raw dump
    Del {
        /// Tag dump path
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Native key to delete
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Transcode a file to .m4a with the external encoder, then copy tags
    Convert {
        /// Input audio file
        #[arg(value_name = "INPUT_FILE")]
        input: PathBuf,

        /// Output path (defaults to the input with an .m4a extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tag dump to copy metadata from (defaults to the input sidecar)
        #[arg(short, long)]
        metadata_source: Option<PathBuf>,

        /// Keep input file instead of deleting it
        #[arg(short, long)]
        keep_input: bool,

        /// Don't copy tags after conversion
        #[arg(long = "no-metacopy", action = ArgAction::SetFalse)]
        run_metacopy: bool,
    },

    /// Build the mapping table and print it
    Mappings,
}
