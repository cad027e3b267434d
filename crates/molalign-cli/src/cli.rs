use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "molalign - Superpose molecular geometries and report their RMSD using the Kabsch algorithm.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the RMSD between two structure files after optimal superposition.
    Compare(CompareArgs),
    /// Compute the RMSD between two stored geometries of a molecule.
    Rmsd(RmsdArgs),
    /// Compute the pairwise RMSD matrix across all stored geometries of a molecule.
    Matrix(MatrixArgs),
    /// Manage the location of the local structure store.
    Store(StoreArgs),
}

/// Options shared by every command that runs an alignment.
#[derive(Args, Debug, Clone, Default)]
pub struct AlignmentArgs {
    /// Ignore hydrogens and align heavy atoms only.
    #[arg(long)]
    pub heavy_atoms_only: bool,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of decimal places used when printing RMSD values.
    #[arg(long, value_name = "INT")]
    pub precision: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S alignment.svd-max-iterations=500
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Structure that stays fixed (.cjson, .json or .xyz).
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Structure that is moved onto the reference (.cjson, .json or .xyz).
    #[arg(value_name = "MOBILE")]
    pub mobile: PathBuf,

    /// Write the mobile structure, superposed onto the reference, to this path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub alignment: AlignmentArgs,
}

/// Arguments for the `rmsd` subcommand.
#[derive(Args, Debug)]
pub struct RmsdArgs {
    /// Identifier of the molecule in the store.
    #[arg(short, long, value_name = "ID")]
    pub molecule: String,

    /// First geometry; the molecule's default structure when omitted.
    #[arg(long, value_name = "ID")]
    pub geometry_a: Option<String>,

    /// Second geometry; the molecule's default structure when omitted.
    #[arg(long, value_name = "ID")]
    pub geometry_b: Option<String>,

    /// Root directory of the structure store, overriding every other setting.
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    #[command(flatten)]
    pub alignment: AlignmentArgs,
}

/// Arguments for the `matrix` subcommand.
#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Identifier of the molecule in the store.
    #[arg(short, long, value_name = "ID")]
    pub molecule: String,

    /// Write the matrix as CSV to this path instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Root directory of the structure store, overriding every other setting.
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    #[command(flatten)]
    pub alignment: AlignmentArgs,
}

/// Arguments for the `store` subcommand.
#[derive(Args, Debug)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommands,
}

/// Available commands for store management.
#[derive(Subcommand, Debug)]
pub enum StoreCommands {
    /// Show the absolute path to the structure store.
    Path,
    /// Set a custom path for the structure store.
    SetPath {
        /// The directory holding one sub-directory per molecule.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the store path to its default, OS-specific location.
    ResetPath,
}
