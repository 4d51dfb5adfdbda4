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

//! Cloud Functions (and any other Google Cloud compute environment) expose
//! the credentials of the attached service account through the metadata
//! server. We use it for two things: the email of the function identity,
//! and OAuth2 access tokens to call the IAM and storage transfer APIs.

use crate::Result;
use crate::errors::Error;
use crate::token::{Clock, SystemClock, Token, TokenProvider};
use http::HeaderValue;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const METADATA_ROOT: &str = "http://metadata.google.internal";
const METADATA_FLAVOR: &str = "metadata-flavor";
const METADATA_FLAVOR_VALUE: &str = "Google";
const DEFAULT_SERVICE_ACCOUNT: &str = "/computeMetadata/v1/instance/service-accounts/default";

// The metadata server does not always report `expires_in`.
const DEFAULT_ACCESS_TOKEN_LIFETIME: i64 = 300;

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
struct MDSTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    token_type: String,
}

/// A client for the metadata server.
#[derive(Clone, Debug)]
pub struct MetadataServer {
    endpoint: String,
    client: Client,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl Default for MetadataServer {
    fn default() -> Self {
        Self {
            endpoint: METADATA_ROOT.to_string(),
            client: Client::new(),
            clock: Arc::new(SystemClock),
            timeout: Duration::from_secs(10),
        }
    }
}

impl MetadataServer {
    /// Sets the metadata server endpoint, mostly for tests.
    ///
    /// If not set, the client uses `http://metadata.google.internal`.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = v.into();
        self
    }

    pub fn with_clock(mut self, v: Arc<dyn Clock>) -> Self {
        self.clock = v;
        self
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    fn get(&self, suffix: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{DEFAULT_SERVICE_ACCOUNT}{suffix}", self.endpoint))
            .header(
                METADATA_FLAVOR,
                HeaderValue::from_static(METADATA_FLAVOR_VALUE),
            )
            .timeout(self.timeout)
    }

    /// The email of the default service account.
    pub async fn email(&self) -> Result<String> {
        let response = self.get("/email").send().await.map_err(Error::send)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.map_err(Error::send)?;
            return Err(Error::parsing(format!(
                "cannot fetch service account email, status {status}: {body}"
            )));
        }
        let email = response.text().await.map_err(Error::send)?;
        Ok(email.trim().to_string())
    }
}

#[async_trait::async_trait]
impl TokenProvider for MetadataServer {
    // Access tokens are not bound to an audience, the argument only selects
    // the cache entry.
    async fn token(&self, _audience: &str) -> Result<Token> {
        let now = self.clock.now();
        let response = self.get("/token").send().await.map_err(Error::send)?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.map_err(Error::send)?;
            return Err(Error::signing(format!(
                "failed to fetch access token, status {status}: {body}"
            )));
        }
        let response = response
            .json::<MDSTokenResponse>()
            .await
            .map_err(Error::parsing)?;
        let lifetime = response
            .expires_in
            .and_then(|s| i64::try_from(s).ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_LIFETIME);
        Ok(Token {
            token: response.access_token,
            token_type: response.token_type,
            expires_at: now + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tests::FakeClock;
    use httptest::matchers::{all_of, contains, request};
    use httptest::responders::{json_encoded, status_code};
    use httptest::{Expectation, Server};
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    const MDS_TOKEN_URI: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
    const MDS_EMAIL_URI: &str = "/computeMetadata/v1/instance/service-accounts/default/email";

    fn mds(server: &Server) -> MetadataServer {
        MetadataServer::default()
            .with_endpoint(format!("http://{}", server.addr()))
            .with_clock(Arc::new(FakeClock::new(1_000)))
    }

    #[tokio::test]
    async fn token_success() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", MDS_TOKEN_URI),
                request::headers(contains(("metadata-flavor", "Google"))),
            ])
            .respond_with(json_encoded(json!({
                "access_token": "test-access-token",
                "expires_in": 3599,
                "token_type": "Bearer",
            }))),
        );

        let token = mds(&server).token("ignored").await?;
        assert_eq!(token.token, "test-access-token");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_at, 1_000 + 3599);
        Ok(())
    }

    #[tokio::test]
    async fn token_without_expiration() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", MDS_TOKEN_URI)).respond_with(
                json_encoded(json!({
                    "access_token": "test-access-token",
                    "token_type": "Bearer",
                })),
            ),
        );

        let token = mds(&server).token("ignored").await?;
        assert_eq!(token.expires_at, 1_000 + DEFAULT_ACCESS_TOKEN_LIFETIME);
        Ok(())
    }

    #[tokio::test]
    async fn token_failure() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", MDS_TOKEN_URI))
                .respond_with(status_code(503).body("try again")),
        );

        let err = mds(&server).token("ignored").await.unwrap_err();
        assert!(err.to_string().contains("try again"), "{err}");
        Ok(())
    }

    #[tokio::test]
    async fn email_success() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("GET", MDS_EMAIL_URI),
                request::headers(contains(("metadata-flavor", "Google"))),
            ])
            .respond_with(
                status_code(200).body("sdrs-function@test-project.iam.gserviceaccount.com\n"),
            ),
        );

        let email = mds(&server).email().await?;
        assert_eq!(email, "sdrs-function@test-project.iam.gserviceaccount.com");
        Ok(())
    }
}
