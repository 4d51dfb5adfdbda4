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

//! Clients for the Storage Data Retention Service (SDRS) policy API and for
//! the subset of the Storage Transfer Service API used to provision job
//! pools.
//!
//! Every request carries an `Authorization:` header from a
//! [sdrs_auth::AuthorizationProvider] and a bounded timeout. The clients
//! never retry: callers decide what to do with each [Error].
//!
//! ```no_run
//! # async fn sample() -> anyhow::Result<()> {
//! use sdrs_client::model::RetentionRuleType;
//! let auth = sdrs_auth::Builder::default().build().await?;
//! let client = sdrs_client::SdrsClient::builder()
//!     .with_endpoint("http://sdrs-api.endpoints.my-project.cloud.goog:80")
//!     .with_authorization(auth)
//!     .build()?;
//! let rule = client
//!     .get_retention_rule("my-project", "gs://my-bucket/dataset/", RetentionRuleType::Dataset)
//!     .await?;
//! println!("{rule:?}");
//! # Ok(()) }
//! ```

mod client;
pub mod error;
mod http;
pub mod model;
pub mod transfer;

pub use client::{ClientBuilder, DeleteOutcome, SdrsClient};
pub use error::Error;
pub use transfer::TransferClient;

/// A `Result` alias where the `Err` case is [Error].
pub type Result<T> = std::result::Result<T, Error>;
