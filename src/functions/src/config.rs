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

//! The function configuration, read from environment variables.
//!
//! | Variable               | Default                   |
//! |------------------------|---------------------------|
//! | `endpoint`             | required                  |
//! | `projectId`            | required                  |
//! | `FUNCTION_IDENTITY`    | the metadata server email |
//! | `rpoPattern`           | [DEFAULT_RPO_PATTERN]     |
//! | `deleteMarkerPattern`  | [DEFAULT_DELETE_MARKER_PATTERN] |
//! | `successMarkerPattern` | [DEFAULT_SUCCESS_MARKER_PATTERN] |
//! | `logLevel`             | `RUST_LOG`, then `info`   |
//! | `requestTimeoutSecs`   | 30                        |

use std::time::Duration;

pub const DEFAULT_RPO_PATTERN: &str = r"\.rpo/[^/]*_[0-9]+$";
pub const DEFAULT_DELETE_MARKER_PATTERN: &str = r"\.delete_this_folder$";
pub const DEFAULT_SUCCESS_MARKER_PATTERN: &str = r"_SUCCESS$";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// The policy API is served on port 80 unless the endpoint says otherwise.
const DEFAULT_API_PORT: u16 = 80;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("the `{0}` environment variable is required")]
    Missing(&'static str),
    #[error("invalid value for `requestTimeoutSecs` ({value}): {source}")]
    InvalidTimeout {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionConfig {
    /// The policy API endpoint, also the audience of the bearer tokens.
    pub endpoint: String,
    pub project_id: String,
    /// The service account that signs the bearer tokens.
    pub identity: Option<String>,
    pub rpo_pattern: String,
    pub delete_marker_pattern: String,
    pub success_marker_pattern: String,
    pub log_level: Option<String>,
    pub request_timeout: Duration,
}

impl FunctionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let endpoint = get("endpoint").ok_or(ConfigError::Missing("endpoint"))?;
        let project_id = get("projectId").ok_or(ConfigError::Missing("projectId"))?;
        let request_timeout = match get("requestTimeoutSecs") {
            None => DEFAULT_REQUEST_TIMEOUT,
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|source| ConfigError::InvalidTimeout { value, source })?,
        };
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            identity: get("FUNCTION_IDENTITY"),
            rpo_pattern: get("rpoPattern").unwrap_or_else(|| DEFAULT_RPO_PATTERN.to_string()),
            delete_marker_pattern: get("deleteMarkerPattern")
                .unwrap_or_else(|| DEFAULT_DELETE_MARKER_PATTERN.to_string()),
            success_marker_pattern: get("successMarkerPattern")
                .unwrap_or_else(|| DEFAULT_SUCCESS_MARKER_PATTERN.to_string()),
            log_level: get("logLevel"),
            request_timeout,
        })
    }

    /// The base URL for the policy API requests.
    ///
    /// Appends the default port when the endpoint has none.
    pub fn policy_api_url(&self) -> String {
        let authority = self
            .endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, rest)| rest);
        let authority = authority.split('/').next().unwrap_or_default();
        if authority.contains(':') {
            return self.endpoint.clone();
        }
        format!("{}:{DEFAULT_API_PORT}", self.endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        let config = FunctionConfig::from_lookup(lookup(&[
            ("endpoint", "http://sdrs.example.com/"),
            ("projectId", "test-project"),
        ]))?;
        assert_eq!(config.endpoint, "http://sdrs.example.com");
        assert_eq!(config.project_id, "test-project");
        assert_eq!(config.identity, None);
        assert_eq!(config.rpo_pattern, DEFAULT_RPO_PATTERN);
        assert_eq!(config.delete_marker_pattern, DEFAULT_DELETE_MARKER_PATTERN);
        assert_eq!(config.success_marker_pattern, DEFAULT_SUCCESS_MARKER_PATTERN);
        assert_eq!(config.log_level, None);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        Ok(())
    }

    #[test]
    fn overrides() -> anyhow::Result<()> {
        let config = FunctionConfig::from_lookup(lookup(&[
            ("endpoint", "http://sdrs.example.com"),
            ("projectId", "test-project"),
            ("FUNCTION_IDENTITY", "fn@test-project.iam.gserviceaccount.com"),
            ("rpoPattern", "rpo_[0-9]+$"),
            ("logLevel", "debug"),
            ("requestTimeoutSecs", "5"),
        ]))?;
        assert_eq!(
            config.identity.as_deref(),
            Some("fn@test-project.iam.gserviceaccount.com")
        );
        assert_eq!(config.rpo_pattern, "rpo_[0-9]+$");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        Ok(())
    }

    #[test_case(&[("projectId", "p")], "endpoint")]
    #[test_case(&[("endpoint", "http://e")], "projectId")]
    #[test_case(&[("endpoint", "http://e"), ("projectId", "")], "projectId")]
    fn missing(vars: &[(&str, &str)], name: &str) {
        let err = FunctionConfig::from_lookup(lookup(vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(n) if n == name), "{err:?}");
    }

    #[test]
    fn invalid_timeout() {
        let err = FunctionConfig::from_lookup(lookup(&[
            ("endpoint", "http://e"),
            ("projectId", "p"),
            ("requestTimeoutSecs", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }), "{err:?}");
    }

    #[test_case("http://sdrs.example.com", "http://sdrs.example.com:80")]
    #[test_case("http://sdrs.example.com:8080", "http://sdrs.example.com:8080")]
    #[test_case("http://127.0.0.1:1234", "http://127.0.0.1:1234")]
    #[test_case("sdrs.example.com", "sdrs.example.com:80")]
    fn policy_api_url(endpoint: &str, want: &str) -> anyhow::Result<()> {
        let config = FunctionConfig::from_lookup(lookup(&[
            ("endpoint", endpoint),
            ("projectId", "p"),
        ]))?;
        assert_eq!(config.policy_api_url(), want);
        Ok(())
    }
}
