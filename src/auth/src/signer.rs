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
use crate::jwt::JwtClaims;
use crate::token::{Clock, SystemClock, Token, TokenProvider};
use std::sync::Arc;
use tokio::sync::OnceCell;

pub mod iam;
pub mod service_account;

pub use iam::IamSigner;
pub use service_account::ServiceAccountKeySigner;

/// Signs JWT claims on behalf of a service account.
#[async_trait::async_trait]
pub trait JwtSigner: Send + Sync + std::fmt::Debug {
    /// The email of the service account that signs, used as `iss`, `sub` and
    /// `email` claims.
    async fn client_email(&self) -> Result<String>;

    /// Returns the signed, serialized JWT.
    async fn sign_jwt(&self, claims: &JwtClaims) -> Result<String>;
}

/// A [TokenProvider] that signs a fresh JWT for each request.
///
/// Wrap it in a [TokenCache][crate::TokenCache] to avoid one signing call per
/// outbound request.
#[derive(Debug)]
pub struct SignedJwtProvider {
    signer: Arc<dyn JwtSigner>,
    clock: Arc<dyn Clock>,
    identity: OnceCell<String>,
}

impl SignedJwtProvider {
    pub fn new<S>(signer: S) -> Self
    where
        S: JwtSigner + 'static,
    {
        Self::with_clock(signer, Arc::new(SystemClock))
    }

    pub fn with_clock<S>(signer: S, clock: Arc<dyn Clock>) -> Self
    where
        S: JwtSigner + 'static,
    {
        Self {
            signer: Arc::new(signer),
            clock,
            identity: OnceCell::new(),
        }
    }

    async fn identity(&self) -> Result<&str> {
        let email = self
            .identity
            .get_or_try_init(|| self.signer.client_email())
            .await?;
        Ok(email.as_str())
    }
}

#[async_trait::async_trait]
impl TokenProvider for SignedJwtProvider {
    async fn token(&self, audience: &str) -> Result<Token> {
        let identity = self.identity().await?;
        let claims = JwtClaims::new(identity, audience, self.clock.now());
        let token = self.signer.sign_jwt(&claims).await?;
        Ok(Token {
            token,
            token_type: "Bearer".to_string(),
            expires_at: claims.exp,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::token::tests::FakeClock;

    type TestResult = anyhow::Result<()>;

    mockall::mock! {
        #[derive(Debug)]
        pub JwtSigner { }

        #[async_trait::async_trait]
        impl JwtSigner for JwtSigner {
            async fn client_email(&self) -> Result<String>;
            async fn sign_jwt(&self, claims: &JwtClaims) -> Result<String>;
        }
    }

    const EMAIL: &str = "sdrs-function@test-project.iam.gserviceaccount.com";
    const AUDIENCE: &str = "https://sdrs-api.endpoints.test-project.cloud.goog";

    #[tokio::test]
    async fn signs_fixed_claim_set() -> TestResult {
        let mut signer = MockJwtSigner::new();
        signer
            .expect_client_email()
            .times(1)
            .returning(|| Ok(EMAIL.to_string()));
        signer
            .expect_sign_jwt()
            .withf(|c| {
                c == &JwtClaims {
                    iat: 1_000,
                    exp: 4_600,
                    iss: EMAIL.to_string(),
                    sub: EMAIL.to_string(),
                    email: EMAIL.to_string(),
                    aud: AUDIENCE.to_string(),
                }
            })
            .times(1)
            .returning(|_| Ok("header.payload.signature".to_string()));

        let provider = SignedJwtProvider::with_clock(signer, Arc::new(FakeClock::new(1_000)));
        let token = provider.token(AUDIENCE).await?;
        assert_eq!(token.token, "header.payload.signature");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_at, 4_600);
        Ok(())
    }

    #[tokio::test]
    async fn client_email_is_fetched_once() -> TestResult {
        let mut signer = MockJwtSigner::new();
        signer
            .expect_client_email()
            .times(1)
            .returning(|| Ok(EMAIL.to_string()));
        signer
            .expect_sign_jwt()
            .times(2)
            .returning(|c| Ok(format!("signed-{}", c.iat)));

        let clock = Arc::new(FakeClock::new(1_000));
        let provider = SignedJwtProvider::with_clock(signer, clock.clone());
        assert_eq!(provider.token(AUDIENCE).await?.token, "signed-1000");
        clock.advance(10);
        assert_eq!(provider.token(AUDIENCE).await?.token, "signed-1010");
        Ok(())
    }

    #[tokio::test]
    async fn signing_failure_propagates() {
        let mut signer = MockJwtSigner::new();
        signer
            .expect_client_email()
            .returning(|| Ok(EMAIL.to_string()));
        signer
            .expect_sign_jwt()
            .times(1)
            .returning(|_| Err(Error::signing("permission denied")));

        let provider = SignedJwtProvider::with_clock(signer, Arc::new(FakeClock::new(1_000)));
        let err = provider.token(AUDIENCE).await.unwrap_err();
        assert!(err.is_signing(), "{err:?}");
    }
}
