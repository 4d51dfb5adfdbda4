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

use serde::{Deserialize, Serialize};

/// The lifetime of the tokens we sign, in seconds.
pub const DEFAULT_TOKEN_LIFETIME: i64 = 3600;

/// The claim set of a self-signed JWT.
///
/// Cloud Endpoints requires `iss` and `sub` to be the email of the signing
/// service account, and `aud` to match the audience configured for the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub sub: String,
    pub email: String,
    pub aud: String,
}

impl JwtClaims {
    /// Claims for `identity` calling `audience`, issued at `now` and valid
    /// for [DEFAULT_TOKEN_LIFETIME] seconds.
    pub fn new(identity: &str, audience: &str, now: i64) -> Self {
        Self {
            iat: now,
            exp: now + DEFAULT_TOKEN_LIFETIME,
            iss: identity.to_string(),
            sub: identity.to_string(),
            email: identity.to_string(),
            aud: audience.to_string(),
        }
    }

    /// The payload expected by the IAM `signJwt` API.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(crate::errors::Error::parsing)
    }
}
