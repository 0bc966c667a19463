use crate::{logging, server};
use clap::{Args, Parser, Subcommand};
use productsapp::config::ServiceConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "products", bin_name = "products", version)]
#[command(about = "Product catalogue served over HTTP from a JSON file", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ConfigArgs),

    /// Print the resolved configuration as TOML
    Config(ConfigArgs),
}

/// Flags shared by every subcommand. Anything given here wins over files and
/// environment variables.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Path to a products.toml file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file holding the product collection
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    #[arg(long)]
    pub host: Option<String>,

    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ConfigArgs {
    pub fn resolve(&self) -> productsapp::error::Result<ServiceConfig> {
        Ok(self.apply(ServiceConfig::load(self.config.as_deref())?))
    }

    fn apply(&self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(data_file) = &self.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = args.resolve()?;
            logging::init_logging(&config)?;
            tracing::info!(data_file = %config.data_file.display(), "Starting product service");
            server::serve(config).await
        }
        Commands::Config(args) => {
            let config = args.resolve()?;
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from([
            "products",
            "serve",
            "--data-file",
            "/tmp/p.json",
            "--port",
            "9001",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.data_file, Some(PathBuf::from("/tmp/p.json")));
                assert_eq!(args.port, Some(9001));
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["products"]).is_err());
    }

    #[test]
    fn flags_override_loaded_values() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("products.toml");
        std::fs::write(&file, "port = 7000\nhost = \"0.0.0.0\"\n").unwrap();

        let args = ConfigArgs {
            config: Some(file),
            port: Some(7100),
            ..Default::default()
        };
        let loaded = ServiceConfig::load_from(args.config.as_deref(), None).unwrap();
        let config = args.apply(loaded);

        assert_eq!(config.port, 7100);
    }
}
