//! `cloudmersive-scan` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`      : execute a job file against the API.
//! - `describe` : print the requests a job file would send, without sending.
//! - `validate` : validate a job file and its parameters.
//! - `scan-file`: scan local files.
//! - `status`   : fetch the status of a cloud storage batch job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use engine::{ExecutorConfig, ItemExecutor, JobDefinition};
use nodes::cloudmersive::{
    CloudmersiveCredentials, CloudmersiveVirusScanNode, Environment, HttpTransport,
    ScanParameters, TransportConfig, NODE_TYPE,
};
use nodes::{BinaryData, ExecutionContext, Item};

#[derive(Parser)]
#[command(
    name = "cloudmersive-scan",
    about = "Scan files, websites and cloud storage for malware via Cloudmersive",
    version
)]
struct Cli {
    #[command(flatten)]
    api: ApiArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ApiArgs {
    /// Cloudmersive API key.
    #[arg(long, global = true, env = "CLOUDMERSIVE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// API environment: `test` or `prod`.
    #[arg(long, global = true, env = "CLOUDMERSIVE_ENVIRONMENT", default_value = "test")]
    environment: Environment,
    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = 120)]
    timeout_secs: u64,
}

impl ApiArgs {
    fn credentials(&self) -> anyhow::Result<CloudmersiveCredentials> {
        match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => Ok(CloudmersiveCredentials::new(key, self.environment)),
            None => bail!("no API key: pass --api-key or set CLOUDMERSIVE_API_KEY"),
        }
    }

    fn transport(&self) -> anyhow::Result<HttpTransport> {
        let config = TransportConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..TransportConfig::default()
        };
        Ok(HttpTransport::new(config)?)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Execute a job definition JSON file.
    Run {
        /// Path to the job JSON file.
        path: PathBuf,
        /// Record failed items in the output instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Print the resolved requests of a job file without sending them.
    Describe {
        /// Path to the job JSON file.
        path: PathBuf,
    },
    /// Validate a job definition JSON file.
    Validate {
        /// Path to the job JSON file.
        path: PathBuf,
    },
    /// Scan one or more local files.
    ScanFile {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Use the advanced scan endpoint.
        #[arg(long)]
        advanced: bool,
        /// Comma-separated extension allowlist (advanced scan only).
        #[arg(long, requires = "advanced")]
        restrict_file_types: Option<String>,
        /// Record failed files in the output instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// Get the status of an asynchronous cloud storage batch job.
    Status {
        /// The `AsyncJobID` returned when the job was submitted.
        job_id: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_job(path: &Path) -> anyhow::Result<JobDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    Ok(JobDefinition::from_json(&content)?)
}

async fn execute(
    api: &ApiArgs,
    parameters: Value,
    items: Vec<Item>,
    continue_on_fail: bool,
) -> anyhow::Result<()> {
    let ctx = ExecutionContext::new(api.credentials()?);
    let transport = Arc::new(api.transport()?);
    let node = CloudmersiveVirusScanNode::from_config(parameters, transport)?;
    let executor = ItemExecutor::new(ExecutorConfig { continue_on_fail });

    info!(
        "Running {} on {} item(s) against {} ({})",
        NODE_TYPE,
        items.len(),
        ctx.credentials.base_url(),
        ctx.credentials.environment
    );
    let result = executor.run(&node, &items, &ctx).await?;

    println!("{}", serde_json::to_string_pretty(&result.items)?);
    if result.failed > 0 {
        info!("{} of {} item(s) failed", result.failed, result.items.len());
    }
    Ok(())
}

async fn read_file_items(paths: &[PathBuf]) -> anyhow::Result<Vec<Item>> {
    let mut items = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("cannot read file {}", path.display()))?;
        let mut data = BinaryData::new(bytes);
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            data = data.with_file_name(name);
        }
        let item = Item {
            json: json!({ "path": path.display().to_string() }),
            ..Item::default()
        };
        items.push(item.with_binary("data", data));
    }
    Ok(items)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { path, continue_on_fail } => {
            let job = load_job(&path)?;
            let items = job.effective_items();
            execute(&cli.api, job.parameters, items, continue_on_fail || job.continue_on_fail)
                .await
        }
        Command::Describe { path } => {
            let job = load_job(&path)?;
            let transport = Arc::new(cli.api.transport()?);
            let node = CloudmersiveVirusScanNode::from_config(job.parameters.clone(), transport)?;

            let described: Vec<Value> = job
                .effective_items()
                .iter()
                .enumerate()
                .map(|(index, item)| match node.describe(item) {
                    Ok(request) => json!({
                        "pairedItem": index,
                        "request": request.to_redacted_json(),
                    }),
                    Err(e) => json!({ "pairedItem": index, "error": e.to_string() }),
                })
                .collect();

            println!("{}", serde_json::to_string_pretty(&described)?);
            Ok(())
        }
        Command::Validate { path } => {
            let job = load_job(&path)?;
            match ScanParameters::from_value(job.parameters.clone()) {
                Ok(params) => {
                    let tag = serde_json::to_value(&params)?;
                    println!(
                        "Job is valid: resource '{}', operation '{}', {} item(s)",
                        tag["resource"].as_str().unwrap_or("?"),
                        tag["operation"].as_str().unwrap_or("?"),
                        job.effective_items().len()
                    );
                    Ok(())
                }
                Err(e) => bail!("validation failed: {e}"),
            }
        }
        Command::ScanFile { paths, advanced, restrict_file_types, continue_on_fail } => {
            let items = read_file_items(&paths).await?;
            let parameters = if advanced {
                json!({
                    "resource": "file",
                    "operation": "scanAdvanced",
                    "advancedControls": { "restrictFileTypes": restrict_file_types },
                })
            } else {
                json!({ "resource": "file", "operation": "scan" })
            };
            execute(&cli.api, parameters, items, continue_on_fail).await
        }
        Command::Status { job_id } => {
            let parameters = json!({
                "resource": "batchJob",
                "operation": "getStatus",
                "asyncJobID": job_id,
            });
            execute(&cli.api, parameters, vec![Item::empty()], false).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn api_options_are_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "cloudmersive-scan",
            "status",
            "J-1",
            "--api-key",
            "K",
            "--environment",
            "prod",
            "--timeout-secs",
            "30",
        ])
        .expect("global options should parse after the subcommand");

        assert_eq!(cli.api.api_key.as_deref(), Some("K"));
        assert_eq!(cli.api.environment, Environment::Prod);
        assert_eq!(cli.api.timeout_secs, 30);
        assert!(matches!(cli.command, Command::Status { job_id } if job_id == "J-1"));
    }
}
