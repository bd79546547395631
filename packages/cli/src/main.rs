//! `fedora-deposit`: command-line front end for the Fedora deposit connector.
//!
//! - **`metadata`**: print the Turtle metadata a plan would be deposited with.
//! - **`deposit`**: deposit a plan and print the repository identifier.
//! - **`config`**: print the deposit configuration as JSON.
//! - **`logo`**: print the configured logo as base64.
//!
//! Settings come from `FEDORA_*` environment variables (see
//! `FedoraSettings::from_env`). Plan input is a JSON file, or stdin with `-`.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fedora_deposit::Plan;
use fedora_deposit_api::PlanDepositModel;
use fedora_deposit_connector::{FedoraConnector, FedoraSettings, LocalFileStorage};

/// fedora-deposit: deposit data-management plans into Fedora
#[derive(Parser)]
#[command(name = "fedora-deposit", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the Turtle metadata document for a plan.
    ///
    /// Pass `-` as FILE to read from stdin.
    Metadata {
        /// Path to a plan JSON file, or `-` for stdin.
        file: PathBuf,
    },

    /// Deposit a plan and print the repository identifier.
    ///
    /// Without --username/--password the default credentials from
    /// FEDORA_USERNAME and FEDORA_PASSWORD are used.
    Deposit {
        /// Path to a plan JSON file, or `-` for stdin.
        file: PathBuf,

        #[arg(long, env = "FEDORA_DEPOSIT_USERNAME", requires = "password")]
        username: Option<String>,

        #[arg(long, env = "FEDORA_DEPOSIT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print the deposit configuration as JSON.
    Config,

    /// Print the configured logo as base64.
    Logo,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fedora_deposit_connector=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let connector = connector();

    match cli.command {
        Command::Metadata { file } => {
            let plan = parse_plan(&read_input(&file));
            let turtle = connector
                .metadata_builder()
                .build(&plan)
                .unwrap_or_else(|e| fatal(&e.to_string()));
            print!("{turtle}");
        }

        Command::Deposit {
            file,
            username,
            password,
        } => {
            let plan = parse_plan(&read_input(&file));
            let mut model = PlanDepositModel::new(plan);
            if let (Some(username), Some(password)) = (username, password) {
                model = model.with_credentials(username, password);
            }

            match connector.deposit(&model).await {
                Ok(Some(id)) => println!("{id}"),
                Ok(None) => fatal("no deposit configuration; set FEDORA_REPOSITORY_URL"),
                Err(e) => fatal(&format!("deposit failed: {e}")),
            }
        }

        Command::Config => match connector.configuration() {
            Some(cfg) => match serde_json::to_string_pretty(cfg) {
                Ok(json) => println!("{json}"),
                Err(e) => fatal(&e.to_string()),
            },
            None => fatal("no deposit configuration; set FEDORA_REPOSITORY_URL"),
        },

        Command::Logo => match connector.logo().await {
            Ok(Some(logo)) => println!("{logo}"),
            Ok(None) => fatal("no readable logo configured"),
            Err(e) => fatal(&e.to_string()),
        },
    }
}

fn connector() -> FedoraConnector {
    let settings = FedoraSettings::from_env()
        .unwrap_or_else(|e| fatal(&format!("invalid configuration: {e}")));
    let storage = Arc::new(LocalFileStorage::new(settings.storage_dir.clone()));
    FedoraConnector::new(settings, storage).unwrap_or_else(|e| fatal(&e.to_string()))
}

/// Read the full contents of a file, or stdin when the path is `"-"`.
fn read_input(path: &PathBuf) -> String {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .unwrap_or_else(|e| fatal(&format!("failed to read stdin: {e}")));
        buf
    } else {
        fs::read_to_string(path)
            .unwrap_or_else(|e| fatal(&format!("failed to read {}: {e}", path.display())))
    }
}

fn parse_plan(json: &str) -> Plan {
    serde_json::from_str(json).unwrap_or_else(|e| fatal(&format!("failed to parse plan: {e}")))
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("fedora-deposit: {msg}");
    process::exit(2);
}
