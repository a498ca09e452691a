use clap::{Args, Parser, Subcommand};
use groupbuy_app::{
    context::{AppContext, AppInitError},
    database::DEFAULT_MAX_CONNECTIONS,
};

mod campaigns;
mod db;

#[derive(Debug, Parser)]
#[command(name = "groupbuy-app", about = "Group buy operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Campaigns(campaigns::CampaignsCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Campaigns(command) => campaigns::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub database_max_connections: u32,
}

impl DatabaseArgs {
    pub(crate) async fn context(&self) -> Result<AppContext, String> {
        AppContext::from_database_url(&self.database_url, self.database_max_connections)
            .await
            .map_err(|AppInitError::Database(source)| {
                format!("failed to connect to database: {source}")
            })
    }
}
