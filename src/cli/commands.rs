use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "smartdo", about = concat!("smartdo v", env!("CARGO_PKG_VERSION"), " - a small, synced to-do list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "smartdo=trace" (overrides config)
    #[arg(long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Launch the TUI with an in-memory list instead of the synced one
    #[arg(long)]
    pub local: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// Sign in as a user
    Signin(SigninArgs),
    /// Sign out
    Signout,
    /// Show the signed-in user
    Whoami,
    /// List your tasks (newest first)
    List,
    /// Add a task
    Add(AddArgs),
    /// Change a task's text
    Edit(EditArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Show the sample feed
    Feed,
    /// Get or set a config value
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct SigninArgs {
    /// User name (letters, digits, '-', '_', '.')
    pub name: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID, or a unique prefix of one
    pub id: String,
    /// New task text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID, or a unique prefix of one
    pub id: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Dotted key, e.g. log.level or ui.colors.background
    pub key: String,
    /// New value (omit to print the current one)
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_words() {
        let cli = Cli::parse_from(["smartdo", "add", "Buy", "oat", "milk"]);
        match cli.command {
            Some(Commands::Add(args)) => assert_eq!(args.text.join(" "), "Buy oat milk"),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["smartdo", "list", "--json", "-D", "/tmp/x"]);
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
