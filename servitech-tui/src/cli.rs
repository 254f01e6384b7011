use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "servitech-tui")]
#[command(about = "Terminal client for ServiTech technicians")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the ServiTech API
    Run,
    /// Run in dev mode with local in-memory incidents
    Dev,
    /// Sign in with email and password
    Login,
    /// Remove the saved session
    Logout,
    /// Print config path and create default file if missing
    ConfigPath,
}
