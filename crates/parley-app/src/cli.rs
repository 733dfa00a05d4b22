use clap::{Parser, Subcommand};

/// parley: chat with a hosted Gemini model from the terminal.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start an interactive chat (the default).
    Chat,
    /// Store a name and API token, replacing the token if the name exists.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        token: String,
    },
    /// Print the effective configuration as JSON.
    Config,
    /// Print the name of the resolved user.
    Whoami,
}

impl Args {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Chat)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
