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

//! Runs one SDRS handler invocation.
//!
//! The event payload is read from a file, or from stdin by default. The
//! configuration comes from the environment, see [sdrs_functions::config].

use clap::{Parser, Subcommand};
use sdrs_client::SdrsClient;
use sdrs_functions::config::FunctionConfig;
use sdrs_functions::event::{InboundEvent, ObjectKeyMatcher};
use sdrs_functions::handlers::Handlers;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

const DESCRIPTION: &str = concat!(
    "Handles storage notifications and scheduler ticks for the",
    " Storage Data Retention Service."
);

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = DESCRIPTION)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// The file with the event payload, `-` reads from stdin.
    #[arg(long, global = true, default_value = "-")]
    event: PathBuf,

    /// Sign the bearer tokens locally with this service account key file.
    ///
    /// Meant for development, deployed functions sign through IAM.
    #[arg(long, global = true)]
    key_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// An object was finalized.
    GcsCreate,
    /// An object was deleted.
    GcsDelete,
    /// A scheduler tick.
    Scheduler,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = FunctionConfig::from_env()?;
    enable_tracing(config.log_level.as_deref());
    tracing::debug!("Configuration: {config:?}");

    let payload = read_event(&args.event).await?;
    let event = InboundEvent::from_json(&payload)?;

    let mut auth = sdrs_auth::Builder::default()
        .set_identity(config.identity.clone())
        .with_timeout(config.request_timeout);
    if let Some(path) = &args.key_file {
        auth = auth.with_key_file(path);
    }
    let auth = auth.build().await?;

    let client = SdrsClient::builder()
        .with_endpoint(config.policy_api_url())
        .with_audience(&config.endpoint)
        .with_timeout(config.request_timeout)
        .with_authorization(auth)
        .build()?;
    let matcher = ObjectKeyMatcher::from_config(&config)?;
    let handlers = Handlers::new(matcher, client, &config.project_id);

    match args.command {
        Command::GcsCreate => handlers.gcs_create(&event).await?,
        Command::GcsDelete => handlers.gcs_delete(&event).await?,
        Command::Scheduler => handlers.scheduler(&event).await?,
    }
    Ok(())
}

async fn read_event(path: &PathBuf) -> anyhow::Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut payload = Vec::new();
        tokio::io::stdin().read_to_end(&mut payload).await?;
        return Ok(payload);
    }
    Ok(tokio::fs::read(path).await?)
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
