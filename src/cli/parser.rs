use crate::export::ExportFormat;
use crate::models::hrp_entry::HrpEventType;
use clap::{Parser, Subcommand};

/// Command-line interface definition for B-Side Nexus
#[derive(Parser)]
#[command(
    name = "bsnexus",
    version = env!("CARGO_PKG_VERSION"),
    about = "B-Side Nexus: key issuance tracking and HRP work-time logging over SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Signed-in user id as resolved by the identity provider
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Role held by the signed-in user (repeatable or comma separated)
    #[arg(global = true, long = "role", value_delimiter = ',')]
    pub roles: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the active configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal operations log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage user profiles
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },

    /// Key issuance, return, loss and reactivation
    Key {
        #[command(subcommand)]
        action: KeyCommand,
    },

    /// HRP work-time logging
    Hrp {
        #[command(subcommand)]
        action: HrpCommand,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Create or update a profile
    Add {
        id: String,

        #[arg(long = "name", default_value = "")]
        name: String,

        #[arg(long = "contract", help = "Contract type: fixed_salary or hourly")]
        contract: String,
    },

    /// List all profiles
    List,
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Register a new key item
    Add {
        id: String,

        #[arg(long = "label", default_value = "")]
        label: String,
    },

    /// List key items and their status
    List,

    /// List assignments
    Assignments {
        #[arg(long = "holder", help = "Only assignments of this profile")]
        holder: Option<String>,

        #[arg(long = "active", help = "Only assignments still active")]
        active: bool,
    },

    /// Show protocol entries, optionally for one key
    History {
        #[arg(long = "item")]
        item: Option<String>,
    },

    /// Issue one or more keys to a profile (all or nothing)
    Issue {
        #[arg(long = "profile", help = "Profile receiving the keys")]
        profile: String,

        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Return keys by assignment id
    Return {
        #[arg(required = true, num_args = 1..)]
        assignments: Vec<i64>,
    },

    /// Mark an active assignment as lost
    Lost { assignment: i64 },

    /// Put a found key back into circulation
    Reactivate { item: String },

    /// Show one protocol entry with its related records
    Protocol {
        id: i64,

        #[arg(long = "json", help = "Print as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum HrpCommand {
    /// Log a clock event (now, or at --at)
    Log {
        #[arg(value_enum)]
        event: HrpEventType,

        #[arg(long = "at", help = "Timestamp (RFC 3339 or YYYY-MM-DD HH:MM[:SS])")]
        at: Option<String>,

        #[arg(long = "comment")]
        comment: Option<String>,

        #[arg(long = "ip", help = "Client address recorded with the entry")]
        ip: Option<String>,
    },

    /// Supersede an entry with a corrected one
    Correct {
        entry: i64,

        #[arg(long = "at", help = "Corrected timestamp")]
        at: String,

        #[arg(long = "event", value_enum)]
        event: Option<HrpEventType>,

        #[arg(long = "comment")]
        comment: Option<String>,
    },

    /// Days of a month with at least one entry
    Dates { year: i32, month: u32 },

    /// Entries of one day, in chronological order
    Day {
        year: i32,
        month: u32,
        day: u32,

        #[arg(long = "details", help = "Include address and comment")]
        details: bool,
    },

    /// Export a month of entries
    Export {
        year: i32,
        month: u32,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },
}
