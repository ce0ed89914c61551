use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "warden - version-aware SQL script runner and blocking session explorer")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses RUST_LOG, then the config file value
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ./warden.toml, then ~/.config/warden/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Script store root (overrides config file)
    #[arg(long, global = true)]
    pub scripts_root: Option<PathBuf>,
}

impl Cli {
    /// Level requested on the command line, if any
    pub fn requested_level(&self) -> Option<LevelFilter> {
        match (self.log_level, self.verbose) {
            (Some(level), _) => Some(level.into()),
            (None, true) => Some(LevelFilter::DEBUG),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which file a script identifier resolves to
    Resolve {
        /// Script identifier, e.g. `performance/top_sql.sql`
        identifier: String,

        /// Engine version used to pick the script tier (e.g. 19.3.0.0)
        #[arg(long)]
        engine_version: Option<String>,
    },

    /// Run a stored script or inline SQL against a SQLite database
    Run {
        /// Script identifier to resolve and run
        #[arg(required_unless_present = "sql", conflicts_with = "sql")]
        identifier: Option<String>,

        /// Inline SQL to run instead of a stored script
        #[arg(long)]
        sql: Option<String>,

        /// Database file to run against
        #[arg(long)]
        db: PathBuf,

        /// Script variables (can be repeated)
        /// Format: KEY=VALUE
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_variable)]
        variables: Vec<(String, String)>,

        /// Commit once all statements have run
        #[arg(long)]
        commit: bool,

        /// Engine version used to pick the script tier
        #[arg(long)]
        engine_version: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Browse the script store
    #[command(subcommand)]
    Scripts(ScriptsCommands),

    /// Build blocking chains from a session snapshot
    Blocking {
        /// JSON file holding an array of session rows
        #[arg(short, long)]
        input: PathBuf,

        /// Only show chains that involve this node
        #[arg(long)]
        node: Option<i64>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Run a stored script through an external command line tool
    Tool {
        /// Tool name (sqlcl, sqlplus, rman, dgmgrl, sqlldr, or a program name)
        tool: String,

        /// Script identifier to resolve
        identifier: String,

        /// Connect string handed to the tool
        #[arg(long)]
        connect: String,

        /// Engine version used to pick the script tier
        #[arg(long)]
        engine_version: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
pub enum ScriptsCommands {
    /// List every script in the store
    List,

    /// Find scripts whose text contains a string (case-insensitive)
    Search {
        /// Text to look for
        needle: String,
    },
}

/// Parse a `KEY=VALUE` pair
pub fn parse_variable(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing variable name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_split_on_first_equals() {
        assert_eq!(
            parse_variable("filter=a=b").unwrap(),
            ("filter".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_variable("empty=").unwrap().1, "");
        assert!(parse_variable("novalue").is_err());
        assert!(parse_variable("=1").is_err());
    }

    #[test]
    fn verbose_means_debug_unless_level_given() {
        let cli = Cli::parse_from(["warden", "-v", "scripts", "list"]);
        assert_eq!(cli.requested_level(), Some(LevelFilter::DEBUG));

        let cli = Cli::parse_from(["warden", "-v", "-l", "warn", "scripts", "list"]);
        assert_eq!(cli.requested_level(), Some(LevelFilter::WARN));

        let cli = Cli::parse_from(["warden", "scripts", "list"]);
        assert_eq!(cli.requested_level(), None);
    }

    #[test]
    fn run_needs_identifier_or_sql() {
        assert!(Cli::try_parse_from(["warden", "run", "--db", "x.db"]).is_err());
        assert!(Cli::try_parse_from(["warden", "run", "a.sql", "--sql", "SELECT 1", "--db", "x.db"]).is_err());

        let cli = Cli::try_parse_from([
            "warden", "run", "--sql", "SELECT 1", "--db", "x.db", "--var", "a=1", "--var", "b=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Run { variables, format, commit, .. } => {
                assert_eq!(variables.len(), 2);
                assert_eq!(format, OutputFormat::Table);
                assert!(!commit);
            }
            _ => panic!("expected run"),
        }
    }
}
