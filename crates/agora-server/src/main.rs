//! Agora administration CLI.
//!
//! Applies schema migrations and drives community creation and repair
//! against a SurrealDB instance.

mod config;

use std::path::PathBuf;

use agora_core::models::community::CreateCommunity;
use agora_core::repository::Pagination;
use agora_db::DbManager;
use agora_provision::CommunityService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use config::{AppConfig, LogConfig};

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Community access-control provisioning for Agora")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Create a community with its roles, grants and OAI set
    CreateCommunity {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        logo: Option<String>,
        /// Publication workflow (defaults to the configured one)
        #[arg(long)]
        workflow: Option<String>,
        /// Only members may submit deposits
        #[arg(long)]
        restricted: bool,
    },
    /// Add any missing roles, grants or OAI set for a community
    RepairCommunity { id: Uuid },
    /// Show a community and its roles
    ShowCommunity { id: Uuid },
    /// List communities
    ListCommunities {
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long, default_value_t = 50)]
        limit: u64,
        #[arg(long)]
        include_deleted: bool,
    },
    /// Mark a community as deleted
    DeleteCommunity { id: Uuid },
}

fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    init_logging(&config.log)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given, see --help");
    };

    let db = DbManager::connect(&config.database)
        .await
        .context("failed to connect to SurrealDB")?;

    let service = CommunityService::new(
        db.store(),
        db.communities(),
        db.roles(),
        config.community.clone(),
    );

    match command {
        Commands::Migrate => {
            agora_db::run_migrations(db.client()).await?;
            info!("Migrations applied");
        }
        Commands::CreateCommunity {
            name,
            description,
            logo,
            workflow,
            restricted,
        } => {
            let community = service
                .create(CreateCommunity {
                    name,
                    description,
                    logo,
                    publication_workflow: workflow,
                    restricted_submission: Some(restricted),
                })
                .await?;
            println!("{}", community.id);
        }
        Commands::RepairCommunity { id } => {
            let report = service.repair(id).await?;
            if report.is_noop() {
                println!("community {id} is fully provisioned");
            } else {
                println!(
                    "community {id}: {} role(s), {} grant(s) added, OAI set {}",
                    report.roles.roles_created,
                    report.roles.grants_created,
                    if report.oai_set_created { "added" } else { "present" },
                );
            }
        }
        Commands::ShowCommunity { id } => {
            let community = service.get(id).await?;
            let roles = service.roles(id).await?;
            println!("id:          {}", community.id);
            println!("name:        {}", community.name);
            println!("description: {}", community.description);
            println!("workflow:    {}", community.publication_workflow);
            println!("restricted:  {}", community.restricted_submission);
            println!("deleted:     {}", community.deleted);
            println!("admin role:  {}", roles.admin.name);
            println!("member role: {}", roles.member.name);
        }
        Commands::ListCommunities {
            offset,
            limit,
            include_deleted,
        } => {
            let page = service
                .list(Pagination { offset, limit }, include_deleted)
                .await?;
            for community in &page.items {
                println!("{}  {}", community.id, community.name);
            }
            println!("{} of {} communities", page.items.len(), page.total);
        }
        Commands::DeleteCommunity { id } => {
            service.delete(id).await?;
            println!("community {id} marked as deleted");
        }
    }

    Ok(())
}
