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

use super::JwtSigner;
use crate::Result;
use crate::errors::Error;
use crate::jwt::JwtClaims;
use crate::token_cache::AuthorizationProvider;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const DEFAULT_IAM_ENDPOINT: &str = "https://iamcredentials.googleapis.com";

// Implements JwtSigner using the IAM signJwt API, authenticating to IAM with
// the access tokens from `source`.
#[derive(Debug)]
pub struct IamSigner {
    client_email: String,
    source: Arc<dyn AuthorizationProvider>,
    endpoint: String,
    client: Client,
    timeout: Duration,
}

#[derive(Debug, serde::Serialize)]
struct SignJwtRequest {
    payload: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignJwtResponse {
    #[serde(default)]
    key_id: Option<String>,
    signed_jwt: String,
}

impl IamSigner {
    pub fn new(client_email: String, source: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            client_email,
            source,
            endpoint: DEFAULT_IAM_ENDPOINT.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = v.into();
        self
    }

    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }
}

#[async_trait::async_trait]
impl JwtSigner for IamSigner {
    async fn client_email(&self) -> Result<String> {
        Ok(self.client_email.clone())
    }

    async fn sign_jwt(&self, claims: &JwtClaims) -> Result<String> {
        let body = SignJwtRequest {
            payload: claims.to_json()?,
        };
        let url = format!(
            "{}/v1/projects/-/serviceAccounts/{}:signJwt",
            self.endpoint, self.client_email
        );
        let source_header = self.source.authorization_header(&self.endpoint).await?;

        tracing::debug!(%url, "signing JWT");
        let response = self
            .client
            .post(url)
            .header(http::header::AUTHORIZATION, source_header)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(Error::send)?;

        if !response.status().is_success() {
            let status = response.status();
            let err_text = response.text().await.map_err(Error::send)?;
            return Err(Error::signing(format!(
                "signJwt returned {status}: {err_text}"
            )));
        }

        let response = response
            .json::<SignJwtResponse>()
            .await
            .map_err(Error::parsing)?;
        tracing::debug!(key_id = ?response.key_id, "JWT signed");
        Ok(response.signed_jwt)
    }
}
