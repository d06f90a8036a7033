#![forbid(unsafe_code)]

mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use vpsp::psp::{self, EncodeOptions, SourceOptions};

#[derive(Debug, Parser)]
#[command(name = "vpsp", version, about = "Pack data files into a V4PSP container")]
struct Cli {
    /// Log every entry as it is processed.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive wizard (terminal).
    Ui,

    /// Convert a data zip into a .psp container.
    Repack {
        /// Input zip archive.
        input: PathBuf,
        /// Output .psp file.
        output: PathBuf,
        /// Optional prefix for every path inside the container.
        #[arg(long, default_value = "")]
        prefix: String,
        /// Skip paths containing this substring (repeatable).
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Build a .psp from an input directory.
    Build {
        /// Input directory.
        #[arg(long)]
        input: PathBuf,
        /// Output .psp file.
        #[arg(long)]
        output: PathBuf,
        /// Optional prefix for every path inside the container.
        #[arg(long, default_value = "")]
        prefix: String,
        /// Skip paths containing this substring (repeatable).
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// List entries in a container.
    List {
        #[arg(long)]
        psp: PathBuf,
        /// Print offsets, sizes and payload digests too.
        #[arg(long, default_value_t = false)]
        long: bool,
    },

    /// Extract a container to an output directory.
    Extract {
        #[arg(long)]
        psp: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Only extract entries that contain this substring (repeatable).
        #[arg(long)]
        filter: Vec<String>,
    },

    /// Verify container structure and loader limits.
    Verify {
        #[arg(long)]
        psp: PathBuf,
        /// Fail if any entry exceeds the loader limits.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let res = match cli.cmd {
        Command::Ui => ui::run(),
        Command::Repack {
            input,
            output,
            prefix,
            exclude,
        } => {
            let source = SourceOptions {
                prefix,
                excludes: exclude,
            };
            psp::repack(&input, &output, &source, EncodeOptions::default()).map(|_| ())
        }
        Command::Build {
            input,
            output,
            prefix,
            exclude,
        } => {
            let source = SourceOptions {
                prefix,
                excludes: exclude,
            };
            psp::build(&input, &output, &source, EncodeOptions::default()).map(|_| ())
        }
        Command::List { psp: file, long } => psp::list(&file, long),
        Command::Extract {
            psp: file,
            output,
            filter,
        } => psp::extract(&file, &output, &filter).map(|_| ()),
        Command::Verify { psp: file, strict } => psp::verify(&file, strict).map(|_| ()),
    };

    if let Err(e) = res {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
