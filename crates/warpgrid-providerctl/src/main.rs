use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "providerctl",
    about = "WarpGrid — query a configured cloud provider",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Provider config file (TOML with a [global] table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Registered provider name
    #[arg(short, long, default_value = "http", global = true)]
    provider: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which capabilities the provider offers
    Capabilities,
    /// List instances, optionally narrowed by a provider-side filter
    List {
        #[arg(default_value = "")]
        filter: String,
    },
    /// Show the addresses of an instance
    Addresses { instance: String },
    /// Show the resources of an instance
    Resources { instance: String },
    /// Show the provider ID of an instance
    ExternalId { instance: String },
    /// Ask the provider which nodes may run a pod
    Filter {
        /// Pod JSON file
        #[arg(long)]
        pod: PathBuf,
        /// Node list JSON file
        #[arg(long)]
        nodes: PathBuf,
    },
    /// Ask the provider to score nodes for a pod
    Prioritize {
        #[arg(long)]
        pod: PathBuf,
        #[arg(long)]
        nodes: PathBuf,
    },
    /// Reserve resources for a pod on a host
    Bind {
        #[arg(long)]
        pod: PathBuf,
        #[arg(long)]
        host: String,
    },
    /// Release resources reserved for a pod
    Unbind {
        #[arg(long)]
        pod: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,warpgrid=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let registry = commands::registry()?;
    let provider = registry
        .init_provider(&cli.provider, cli.config.as_deref())?
        .context("no cloud provider selected")?;
    let provider = provider.as_ref();

    let output = match cli.command {
        Commands::Capabilities => commands::capabilities(provider),
        Commands::List { filter } => commands::inventory::list(provider, &filter).await?,
        Commands::Addresses { instance } => {
            commands::inventory::addresses(provider, &instance).await?
        }
        Commands::Resources { instance } => {
            commands::inventory::resources(provider, &instance).await?
        }
        Commands::ExternalId { instance } => commands::inventory::external_id(provider, &instance)?,
        Commands::Filter { pod, nodes } => commands::scheduler::filter(provider, &pod, &nodes).await?,
        Commands::Prioritize { pod, nodes } => {
            commands::scheduler::prioritize(provider, &pod, &nodes).await?
        }
        Commands::Bind { pod, host } => commands::scheduler::bind(provider, &pod, &host).await?,
        Commands::Unbind { pod } => commands::scheduler::unbind(provider, &pod).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
