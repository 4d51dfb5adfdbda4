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

/// Represents an auth token.
#[derive(Clone, PartialEq)]
pub struct Token {
    /// The actual token string.
    ///
    /// This is the value used in `Authorization:` header.
    pub token: String,

    /// The type of the token, `"Bearer"` for all the tokens in this crate.
    pub token_type: String,

    /// The expiration time, in seconds since the Unix epoch.
    ///
    /// The token is usable while the current time is strictly before this
    /// value.
    pub expires_at: i64,
}

impl Token {
    /// Returns true if the token can still be used at `now` (seconds since
    /// the epoch).
    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }

    /// The value for an `Authorization:` header.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.token)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("token", &"[censored]")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Fetches a new token for an audience.
///
/// Implementations always go to their backing service, caching is the job of
/// [TokenCache][crate::TokenCache].
#[async_trait::async_trait]
pub trait TokenProvider: std::fmt::Debug + Send + Sync {
    async fn token(&self, audience: &str) -> Result<Token>;
}

/// The source of the current time, in seconds since the Unix epoch.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> i64;
}

/// A [Clock] backed by the system time.
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        time::OffsetDateTime::now_utc().unix_timestamp()
    }
}
