use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Maintain a persistent mapping of UUIDs to script names")]
pub struct Cli {
    /// Path to the mappings file (defaults to UUID_MAPPER_FILE, the settings
    /// file, then ./uuid_mappings.json)
    #[clap(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Enable debug logging
    #[clap(long, short = 'v')]
    pub verbose: bool,

    /// Subcommand to run; starts the interactive menu when omitted
    #[clap(subcommand)]
    pub command: Option<Command>,
}

/// Selects a mapping either by UUID or by name
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// UUID of the mapping
    #[clap(long, short = 'u')]
    pub uuid: Option<String>,

    /// Name of the mapping (the first match is used)
    #[clap(long, short = 'n')]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all mappings
    List,

    /// Add a mapping
    Add {
        /// Name to map
        name: String,

        /// UUID to use (generated when omitted or blank)
        #[clap(long, short = 'u')]
        uuid: Option<String>,
    },

    /// Print the name mapped to a UUID
    Get {
        /// UUID to look up
        uuid: String,
    },

    /// Print the first mapping with the given name
    Find {
        /// Name to look up
        name: String,
    },

    /// Rename a mapping
    Edit {
        #[clap(flatten)]
        target: Target,

        /// New name for the mapping
        new_name: String,
    },

    /// Delete a mapping
    #[clap(alias = "del")]
    Delete {
        #[clap(flatten)]
        target: Target,
    },

    /// Assign a fresh UUID to the first mapping with the given name
    Reset {
        /// Name of the mapping
        name: String,
    },

    /// Start the interactive menu
    Shell,
}
