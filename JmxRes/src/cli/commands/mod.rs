use clap::Subcommand;
use std::path::PathBuf;

pub mod import;
pub mod inspect;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the header and sections of a BSR, BMT, BMS or BSK file
    Inspect {
        /// File to inspect
        file: PathBuf,

        /// Data root for resolving stored paths (defaults to the file's directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Decode a resource and everything it references
    Import {
        /// Resource (.bsr) file
        file: PathBuf,

        /// Client data root that stored paths are relative to
        #[arg(long)]
        root: Option<PathBuf>,

        /// Import options file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip meshes that fail to decode instead of aborting
        #[arg(long)]
        skip_bad_meshes: bool,

        /// Decode referenced files on the current thread
        #[arg(long)]
        serial: bool,

        /// Write the decoded scene as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Inspect { file, root } => inspect::execute(file, root.as_deref()),
            Commands::Import {
                file,
                root,
                config,
                skip_bad_meshes,
                serial,
                output,
            } => import::execute(
                file,
                &import::ImportArgs {
                    root: root.clone(),
                    config: config.clone(),
                    skip_bad_meshes: *skip_bad_meshes,
                    serial: *serial,
                    output: output.clone(),
                },
            ),
        }
    }
}
