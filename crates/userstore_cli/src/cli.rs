//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use userstore_core::service::user_service::{
    DEFAULT_DELETE_EMAIL, DEFAULT_EMAIL_UPDATES, DEFAULT_RENAMED_NAME, DEFAULT_USER_AGE,
    DEFAULT_USER_EMAIL, DEFAULT_USER_NAME,
};

/// Run one user record operation against a SQLite store.
#[derive(Debug, Parser)]
#[command(name = "userstore", version)]
pub struct Cli {
    /// SQLite database file; created with its schema when missing.
    #[arg(long, env = "USERSTORE_DB", default_value = "userstore.sqlite3")]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error). Defaults by build mode.
    #[arg(long, requires = "log_dir")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "USERSTORE_LOG_DIR")]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print all users.
    List,
    /// Create a user with a nested preference.
    Create {
        #[arg(long, default_value = DEFAULT_USER_NAME)]
        name: String,
        #[arg(long, default_value_t = DEFAULT_USER_AGE, allow_negative_numbers = true)]
        age: i32,
        #[arg(long, default_value = DEFAULT_USER_EMAIL)]
        email: String,
        #[arg(long, default_value_t = DEFAULT_EMAIL_UPDATES, action = clap::ArgAction::Set)]
        email_updates: bool,
    },
    /// Print the user with the given email.
    Find {
        #[arg(default_value = DEFAULT_USER_EMAIL)]
        email: String,
    },
    /// Rename the user with the given email.
    Update {
        #[arg(default_value = DEFAULT_USER_EMAIL)]
        email: String,
        #[arg(long, default_value = DEFAULT_RENAMED_NAME)]
        name: String,
    },
    /// Delete the user with the given email.
    Delete {
        #[arg(default_value = DEFAULT_DELETE_EMAIL)]
        email: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create { .. } => "create",
            Self::Find { .. } => "find",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}
