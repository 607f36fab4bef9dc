pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "attendance-api")]
#[command(about = "Attendance tracking REST API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the HTTP server")]
    Serve {
        #[arg(long, help = "Listen port (overrides SERVER_PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Apply pending migrations before listening")]
        migrate: bool,
    },

    #[command(about = "Apply pending database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = crate::config::config();

    match cli.command {
        Commands::Serve { port, migrate } => commands::serve::handle(config, port, migrate).await,
        Commands::Migrate => commands::migrate::handle(config).await,
    }
}
