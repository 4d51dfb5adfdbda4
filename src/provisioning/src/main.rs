// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use sdrs_client::transfer::DEFAULT_TRANSFER_ENDPOINT;
use sdrs_client::{SdrsClient, TransferClient};
use sdrs_provisioning::config::PoolConfig;
use sdrs_provisioning::plan::PoolPlan;
use sdrs_provisioning::saga::{ClientBackend, provision_pools};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DESCRIPTION: &str = concat!(
    "Creates, lists and deletes the pools of storage transfer jobs used by",
    " the Storage Data Retention Service."
);

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// The policy API endpoint.
    #[arg(long, env = "endpoint")]
    endpoint: String,

    /// The service account that signs the bearer tokens for the policy API.
    #[arg(long, env = "FUNCTION_IDENTITY")]
    identity: Option<String>,

    /// Sign the policy API tokens locally with this service account key file.
    #[arg(long)]
    key_file: Option<PathBuf>,

    /// The storage transfer service endpoint.
    #[arg(long, default_value = DEFAULT_TRANSFER_ENDPOINT)]
    transfer_endpoint: String,

    /// The timeout for each request, in seconds.
    #[arg(long, env = "requestTimeoutSecs", default_value_t = 30)]
    timeout_secs: u64,

    /// The log filter, e.g. `info` or `sdrs_provisioning=debug`.
    #[arg(long, env = "logLevel")]
    log_level: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Creates and registers the pools described in a configuration file.
    Create {
        #[arg(long, default_value = "config.json")]
        config: PathBuf,
    },
    /// Lists the pooled jobs of a bucket.
    List {
        #[arg(long)]
        source_bucket: String,
        #[arg(long)]
        source_project: String,
    },
    /// Unregisters the pooled jobs of a bucket.
    Delete {
        #[arg(long)]
        source_bucket: String,
        #[arg(long)]
        source_project: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    enable_tracing(args.log_level.as_deref());
    tracing::debug!("Configuration: {args:?}");

    let timeout = Duration::from_secs(args.timeout_secs);
    let mut auth = sdrs_auth::Builder::default()
        .set_identity(args.identity.clone())
        .with_timeout(timeout);
    if let Some(path) = &args.key_file {
        auth = auth.with_key_file(path);
    }
    let access_tokens = sdrs_auth::TokenCache::new(auth.metadata_server());
    let policy = SdrsClient::builder()
        .with_endpoint(&args.endpoint)
        .with_timeout(timeout)
        .with_authorization(auth.build().await?)
        .build()?;

    match args.command {
        Command::Create { config } => {
            let config = PoolConfig::from_file(&config).await?;
            let transfer = TransferClient::new(access_tokens)
                .with_endpoint(&args.transfer_endpoint)
                .with_timeout(timeout);
            let backend = ClientBackend::new(transfer, policy);
            let start_date = time::OffsetDateTime::now_utc().date();
            let shadow = &config.shadow_bucket_ext;
            let plans = config
                .pool
                .iter()
                .flat_map(|project| {
                    project.buckets.iter().map(move |bucket| {
                        let sink = shadow.sink_bucket(bucket);
                        PoolPlan::new(&project.project_id, bucket, sink, start_date)
                    })
                })
                .collect::<Vec<_>>();
            for report in provision_pools(&backend, &plans).await? {
                tracing::info!(
                    source_bucket = %report.source_bucket,
                    jobs = report.job_names.len(),
                    "pool created"
                );
            }
        }
        Command::List {
            source_bucket,
            source_project,
        } => {
            let jobs = policy.get_job_pool(&source_bucket, &source_project).await?;
            for job in jobs {
                println!("{}", serde_json::to_string(&job)?);
            }
        }
        Command::Delete {
            source_bucket,
            source_project,
        } => {
            let response = policy
                .delete_job_pool(&source_bucket, &source_project)
                .await?;
            tracing::info!(?response, %source_bucket, "pool deleted");
        }
    }
    Ok(())
}

fn enable_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}
