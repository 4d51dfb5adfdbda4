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
use crate::errors::Error;
use crate::token::{Clock, SystemClock, Token, TokenProvider};
use http::HeaderValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Produces the `Authorization:` header for calls to an audience.
///
/// This is the seam between the HTTP clients and the token machinery. Tests
/// in downstream crates implement it with fixed headers.
#[async_trait::async_trait]
pub trait AuthorizationProvider: std::fmt::Debug + Send + Sync {
    async fn authorization_header(&self, audience: &str) -> Result<HeaderValue>;
}

type Slot = Arc<Mutex<Option<Token>>>;

/// Caches at most one token per audience.
///
/// A token is reused while the clock says it has not expired, then replaced
/// wholesale by a new token from the inner provider. Each audience has its
/// own async mutex, held across the refresh: concurrent callers wait for the
/// refresh in flight instead of starting their own. Errors are not cached,
/// the next call asks the inner provider again.
#[derive(Debug)]
pub struct TokenCache<P>
where
    P: TokenProvider,
{
    slots: Arc<std::sync::Mutex<HashMap<String, Slot>>>,
    clock: Arc<dyn Clock>,
    inner: Arc<P>,
}

// We manually implement the `Clone` trait because the compiler wants
// `P: Clone` with a derive, even though we only hold an `Arc<P>`.
impl<P: TokenProvider> Clone for TokenCache<P> {
    fn clone(&self) -> TokenCache<P> {
        TokenCache {
            slots: self.slots.clone(),
            clock: self.clock.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<P: TokenProvider> TokenCache<P> {
    pub fn new(inner: P) -> TokenCache<P> {
        Self::with_clock(inner, Arc::new(SystemClock))
    }

    pub fn with_clock(inner: P, clock: Arc<dyn Clock>) -> TokenCache<P> {
        TokenCache {
            slots: Arc::new(std::sync::Mutex::new(HashMap::new())),
            clock,
            inner: Arc::new(inner),
        }
    }

    fn slot(&self, audience: &str) -> Slot {
        // The map is only touched under this lock and never across an await,
        // a poisoned lock still holds a consistent map.
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots.entry(audience.to_string()).or_default().clone()
    }

    /// Returns the cached token for `audience`, refreshing it if needed.
    pub async fn token(&self, audience: &str) -> Result<Token> {
        let slot = self.slot(audience);
        let mut current = slot.lock().await;
        let now = self.clock.now();
        if let Some(token) = current.as_ref().filter(|t| t.is_valid_at(now)) {
            return Ok(token.clone());
        }

        tracing::debug!(audience, "refreshing token");
        let fresh = self.inner.token(audience).await?;
        *current = Some(fresh.clone());
        Ok(fresh)
    }
}

#[async_trait::async_trait]
impl<P: TokenProvider + 'static> AuthorizationProvider for TokenCache<P> {
    async fn authorization_header(&self, audience: &str) -> Result<HeaderValue> {
        let token = self.token(audience).await?;
        let mut value = HeaderValue::from_str(&token.header_value()).map_err(Error::parsing)?;
        value.set_sensitive(true);
        Ok(value)
    }
}
