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
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use std::path::Path;

/// The fields we need from a service account key file.
#[derive(Clone, serde::Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key_id: String,
    pub private_key: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"[censored]")
            .finish()
    }
}

// Implements a local JwtSigner using a service account private key. Meant for
// development machines, deployed functions sign through IAM.
pub struct ServiceAccountKeySigner {
    client_email: String,
    key_id: String,
    key: EncodingKey,
}

impl std::fmt::Debug for ServiceAccountKeySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKeySigner")
            .field("client_email", &self.client_email)
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKeySigner {
    pub fn new(service_account_key: ServiceAccountKey) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(service_account_key.private_key.as_bytes())
            .map_err(Error::invalid_key)?;
        Ok(Self {
            client_email: service_account_key.client_email,
            key_id: service_account_key.private_key_id,
            key,
        })
    }

    /// Loads the signer from a JSON key file.
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = tokio::fs::read(path.as_ref())
            .await
            .map_err(Error::invalid_key)?;
        let key = serde_json::from_slice::<ServiceAccountKey>(&contents)
            .map_err(Error::invalid_key)?;
        Self::new(key)
    }
}

#[async_trait::async_trait]
impl JwtSigner for ServiceAccountKeySigner {
    async fn client_email(&self) -> Result<String> {
        Ok(self.client_email.clone())
    }

    async fn sign_jwt(&self, claims: &JwtClaims) -> Result<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.key_id.clone());
        jsonwebtoken::encode(&header, claims, &self.key).map_err(Error::signing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Clock, SystemClock};
    use jsonwebtoken::{DecodingKey, Validation};

    type TestResult = anyhow::Result<()>;

    const KEY_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/service_account.json");
    const PUBLIC_KEY: &str = include_str!("../../tests/data/public_key.pem");
    const AUDIENCE: &str = "https://sdrs-api.endpoints.test-project.cloud.goog";

    #[tokio::test]
    async fn sign_and_verify() -> TestResult {
        let signer = ServiceAccountKeySigner::from_file(KEY_FILE).await?;
        let email = signer.client_email().await?;
        assert_eq!(email, "sdrs-function@test-project.iam.gserviceaccount.com");

        let claims = JwtClaims::new(&email, AUDIENCE, SystemClock.now());
        let jwt = signer.sign_jwt(&claims).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[email.as_str()]);
        let decoded = jsonwebtoken::decode::<JwtClaims>(
            &jwt,
            &DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes())?,
            &validation,
        )?;
        assert_eq!(decoded.claims, claims);
        assert_eq!(decoded.header.kid.as_deref(), Some("test-key-id"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_file() {
        let err = ServiceAccountKeySigner::from_file("/does/not/exist.json")
            .await
            .unwrap_err();
        assert!(err.is_invalid_key(), "{err:?}");
    }

    #[test]
    fn invalid_pem() {
        let key = ServiceAccountKey {
            client_email: "a@b.com".into(),
            private_key_id: "kid".into(),
            private_key: "not a pem".into(),
        };
        let err = ServiceAccountKeySigner::new(key).unwrap_err();
        assert!(err.is_invalid_key(), "{err:?}");
    }

    #[test]
    fn debug_hides_private_key() {
        let key = ServiceAccountKey {
            client_email: "a@b.com".into(),
            private_key_id: "kid".into(),
            private_key: "super-secret".into(),
        };
        let got = format!("{key:?}");
        assert!(!got.contains("super-secret"), "{got}");
    }
}
