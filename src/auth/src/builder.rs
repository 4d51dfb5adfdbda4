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

use crate::Result;
use crate::mds::MetadataServer;
use crate::signer::{IamSigner, ServiceAccountKeySigner, SignedJwtProvider};
use crate::token::{Clock, SystemClock};
use crate::token_cache::TokenCache;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Creates the token cache used to call the policy API.
///
/// By default the JWTs are signed through the IAM credentials API, using the
/// service account of the running function. With a key file the JWTs are
/// signed locally instead, which is handy on development machines.
///
/// # Example
/// ```no_run
/// # async fn sample() -> sdrs_auth::Result<()> {
/// let auth = sdrs_auth::Builder::default()
///     .with_identity("sdrs-function@my-project.iam.gserviceaccount.com")
///     .build()
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Builder {
    identity: Option<String>,
    key_file: Option<PathBuf>,
    metadata_endpoint: Option<String>,
    iam_endpoint: Option<String>,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            identity: None,
            key_file: None,
            metadata_endpoint: None,
            iam_endpoint: None,
            timeout: Duration::from_secs(30),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Builder {
    /// The service account that signs the tokens.
    ///
    /// If not set, the builder asks the metadata server for the email of the
    /// default service account.
    pub fn with_identity<V: Into<String>>(mut self, v: V) -> Self {
        self.identity = Some(v.into());
        self
    }

    /// Sets an optional identity.
    pub fn set_identity<V: Into<String>>(mut self, v: Option<V>) -> Self {
        self.identity = v.map(Into::into);
        self
    }

    /// Sign locally with the key in this service account key file.
    pub fn with_key_file<V: Into<PathBuf>>(mut self, v: V) -> Self {
        self.key_file = Some(v.into());
        self
    }

    pub fn with_metadata_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.metadata_endpoint = Some(v.into());
        self
    }

    pub fn with_iam_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.iam_endpoint = Some(v.into());
        self
    }

    /// The timeout for each call to the metadata server and IAM.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    pub fn with_clock(mut self, v: Arc<dyn Clock>) -> Self {
        self.clock = v;
        self
    }

    /// The metadata server client configured by this builder.
    pub fn metadata_server(&self) -> MetadataServer {
        let mds = MetadataServer::default()
            .with_clock(self.clock.clone())
            .with_timeout(self.timeout);
        match &self.metadata_endpoint {
            Some(endpoint) => mds.with_endpoint(endpoint.clone()),
            None => mds,
        }
    }

    pub async fn build(self) -> Result<TokenCache<SignedJwtProvider>> {
        if let Some(path) = &self.key_file {
            let signer = ServiceAccountKeySigner::from_file(path).await?;
            tracing::info!(key_file = %path.display(), "signing tokens with a local key");
            let provider = SignedJwtProvider::with_clock(signer, self.clock.clone());
            return Ok(TokenCache::with_clock(provider, self.clock));
        }

        let mds = self.metadata_server();
        let identity = match self.identity {
            Some(identity) => identity,
            None => mds.email().await?,
        };
        tracing::info!(%identity, "signing tokens through IAM");
        let source = TokenCache::with_clock(mds, self.clock.clone());
        let mut signer = IamSigner::new(identity, Arc::new(source)).with_timeout(self.timeout);
        if let Some(endpoint) = self.iam_endpoint {
            signer = signer.with_endpoint(endpoint);
        }
        let provider = SignedJwtProvider::with_clock(signer, self.clock.clone());
        Ok(TokenCache::with_clock(provider, self.clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tests::FakeClock;
    use crate::token_cache::AuthorizationProvider;
    use base64::Engine;
    use httptest::matchers::{all_of, contains, request};
    use httptest::responders::{json_encoded, status_code};
    use httptest::{Expectation, Server};
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    const AUDIENCE: &str = "https://sdrs-api.endpoints.test-project.cloud.goog";

    #[tokio::test]
    async fn iam_flow_end_to_end() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/computeMetadata/v1/instance/service-accounts/default/email",
            ))
            .respond_with(status_code(200).body("fn@test-project.iam.gserviceaccount.com")),
        );
        server.expect(
            Expectation::matching(request::method_path(
                "GET",
                "/computeMetadata/v1/instance/service-accounts/default/token",
            ))
            .times(1)
            .respond_with(json_encoded(json!({
                "access_token": "mds-access-token",
                "expires_in": 3599,
                "token_type": "Bearer",
            }))),
        );
        server.expect(
            Expectation::matching(all_of![
                request::method_path(
                    "POST",
                    "/v1/projects/-/serviceAccounts/fn@test-project.iam.gserviceaccount.com:signJwt"
                ),
                request::headers(contains(("authorization", "Bearer mds-access-token"))),
            ])
            .times(1)
            .respond_with(json_encoded(json!({
                "keyId": "k1",
                "signedJwt": "signed.jwt.value",
            }))),
        );

        let endpoint = format!("http://{}", server.addr());
        let auth = Builder::default()
            .with_metadata_endpoint(endpoint.clone())
            .with_iam_endpoint(endpoint)
            .with_clock(Arc::new(FakeClock::new(1_700_000_000)))
            .build()
            .await?;

        let header = auth.authorization_header(AUDIENCE).await?;
        assert_eq!(header.to_str()?, "Bearer signed.jwt.value");
        // The second call is served from the cache.
        let header = auth.authorization_header(AUDIENCE).await?;
        assert_eq!(header.to_str()?, "Bearer signed.jwt.value");
        Ok(())
    }

    #[tokio::test]
    async fn key_file_flow() -> TestResult {
        let key_file = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/service_account.json");
        let auth = Builder::default()
            .with_key_file(key_file)
            .with_clock(Arc::new(FakeClock::new(1_700_000_000)))
            .build()
            .await?;
        let header = auth.authorization_header(AUDIENCE).await?;
        let header = header.to_str()?;
        let jwt = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| anyhow::anyhow!("not a bearer token: {header}"))?;
        // header.payload.signature
        let parts = jwt.split('.').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3, "{jwt}");

        let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.decode(parts[1])?;
        let claims = serde_json::from_slice::<serde_json::Value>(&payload)?;
        let email = "sdrs-function@test-project.iam.gserviceaccount.com";
        assert_eq!(
            claims,
            json!({
                "iat": 1_700_000_000,
                "exp": 1_700_003_600,
                "iss": email,
                "sub": email,
                "email": email,
                "aud": AUDIENCE,
            })
        );
        Ok(())
    }
}
