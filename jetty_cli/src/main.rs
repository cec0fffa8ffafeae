//! Jetty JD Edwards CLI
//!

#![deny(missing_docs)]

use std::{path::PathBuf, time::Instant};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use jetty_core::{
    connectors::ConnectorClient,
    fetch_credentials,
    jetty::{default_credentials_path, ConnectorNamespace, JettyConfig},
    logging::{self, info, LevelFilter},
    Connector,
};
use jetty_jde::JdeConnector;

/// Jetty JD Edwards CLI: sync users and roles out of EnterpriseOne
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: JettyCommand,
    #[clap(short, long)]
    log_level: Option<LevelFilter>,
    /// Project config file.
    #[clap(short, long, default_value = "jetty_config.yaml")]
    config: PathBuf,
    /// Connector credentials file. Defaults to ~/.jetty/connectors.yaml.
    #[clap(long)]
    credentials: Option<PathBuf>,
    /// Namespace of the JD Edwards connector in the config files.
    #[clap(short, long, default_value = "jde")]
    namespace: String,
}

#[derive(Subcommand, Debug)]
enum JettyCommand {
    /// Make sure the AIS server is reachable and the login works.
    Check,
    /// Fetch users and roles.
    Fetch {
        /// Write the fetched data to this file as JSON.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::setup(args.log_level);

    let mut jde = connect(&args).await?;

    match &args.command {
        JettyCommand::Check => {
            jde.check().await?;
            info!("{} is set up correctly", jde.metadata().display_name);
        }
        JettyCommand::Fetch { output } => {
            let now = Instant::now();
            let data = jde.get_data().await?;
            info!(
                "fetched {} resources and {} grants in {:.2} seconds",
                data.resources.len(),
                data.grants.len(),
                now.elapsed().as_secs_f32()
            );

            let json = serde_json::to_string_pretty(&data)?;
            match output {
                Some(path) => std::fs::write(path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

async fn connect(args: &Args) -> Result<Box<JdeConnector>> {
    let config = JettyConfig::read_from_file(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let namespace = ConnectorNamespace(args.namespace.to_owned());
    let connector_config = config.connector(&namespace)?;

    let credentials_path = args
        .credentials
        .to_owned()
        .unwrap_or_else(default_credentials_path);
    let creds = fetch_credentials(&credentials_path)?;
    let connector_creds = creds.get(&args.namespace).ok_or_else(|| {
        anyhow!(
            "no credentials for {namespace} in {}",
            credentials_path.display()
        )
    })?;

    info!("initializing JD Edwards connector for {}", config.get_name());
    let now = Instant::now();
    let jde = JdeConnector::new(connector_config, connector_creds, Some(ConnectorClient::Core))
        .await?;
    info!(
        "JD Edwards connector took {:.2} seconds",
        now.elapsed().as_secs_f32()
    );
    Ok(jde)
}
