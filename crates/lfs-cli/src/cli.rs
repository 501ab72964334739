use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lfs-meta",
    about = "Inspect and administer an LFS metadata store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store file; overrides the path from --config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage user credentials
    User(UserArgs),
    /// Inspect or register object records
    Object(ObjectArgs),
}

#[derive(Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a user, replacing any existing credential
    Add { name: String, password: String },
    /// Remove a user
    Delete { name: String },
    /// List all users
    List,
    /// Check a password against the stored credential
    Verify { name: String, password: String },
}

#[derive(Args)]
pub struct ObjectArgs {
    #[command(subcommand)]
    pub action: ObjectAction,
}

#[derive(Subcommand)]
pub enum ObjectAction {
    /// Show one object record
    Get { oid: String },
    /// Register an object unless it already exists
    Put { oid: String, size: u64 },
    /// List all object records
    List,
}
