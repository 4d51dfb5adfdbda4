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

//! Bearer tokens for the Storage Data Retention Service (SDRS) policy API.
//!
//! The policy API sits behind Cloud Endpoints, which accepts JSON Web Tokens
//! signed by a Google service account. This crate builds the claims for such
//! a token, signs them (either through the IAM credentials API or locally
//! with a service account key), and caches the result until it expires.
//!
//! Most applications only need the [Builder]:
//!
//! ```no_run
//! # async fn sample() -> sdrs_auth::Result<()> {
//! use sdrs_auth::AuthorizationProvider;
//! let auth = sdrs_auth::Builder::default().build().await?;
//! let header = auth
//!     .authorization_header("https://sdrs-api.endpoints.my-project.cloud.goog")
//!     .await?;
//! # Ok(()) }
//! ```

pub mod errors;

/// Claims for the self-signed JWTs accepted by the policy API.
pub mod jwt;

/// Access tokens and the service account email from the metadata server.
pub mod mds;

/// Signers that turn [jwt::JwtClaims] into signed tokens.
pub mod signer;

/// Types and functions to work with auth tokens.
pub mod token;

/// The token cache.
pub mod token_cache;

mod builder;

pub use builder::Builder;
pub use token_cache::{AuthorizationProvider, TokenCache};

/// A `Result` alias where the `Err` case is `sdrs_auth::errors::Error`.
pub type Result<T> = std::result::Result<T, crate::errors::Error>;
