//! Sofodata CLI - Command-line interface for publishing CSV files to sofodata

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod logging;
mod publish;
mod schema;

#[derive(Parser)]
#[command(name = "sofodata")]
#[command(version = sofodata_core::VERSION)]
#[command(about = "Publish tabular data as sofodata datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a CSV file and register it as a dataset
    ///
    /// Credentials are read from SOFODATA_CLIENT_ID and SOFODATA_CLIENT_SECRET.
    Publish {
        /// Path to the CSV file (comma-delimited, with a header row)
        file: PathBuf,

        /// Dataset name (defaults to the file name without extension)
        #[arg(long)]
        name: Option<String>,

        /// Dataset description
        #[arg(long, default_value = "")]
        description: String,

        /// Log every response status and body
        #[arg(long)]
        debug: bool,
    },

    /// Print the column headers that would be registered for a CSV file
    Schema {
        /// Path to the CSV file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            file,
            name,
            description,
            debug,
        } => {
            logging::init(debug)?;
            let options = publish::PublishOptions {
                file,
                name,
                description,
                debug,
            };
            publish::publish_file(options)?;
        }

        Commands::Schema { file } => {
            logging::init(false)?;
            schema::print_schema(&file)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_publish() {
        let cli = Cli::try_parse_from([
            "sofodata",
            "publish",
            "sales.csv",
            "--name",
            "sales",
            "--debug",
        ])
        .unwrap();
        match cli.command {
            Commands::Publish {
                file,
                name,
                description,
                debug,
            } => {
                assert_eq!(file, PathBuf::from("sales.csv"));
                assert_eq!(name.as_deref(), Some("sales"));
                assert_eq!(description, "");
                assert!(debug);
            }
            Commands::Schema { .. } => panic!("expected publish"),
        }
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["sofodata"]).is_err());
    }
}
