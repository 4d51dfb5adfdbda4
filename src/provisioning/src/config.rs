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

//! The pool configuration file.
//!
//! ```json
//! {
//!   "pool": [
//!     { "project_id": "my-project", "buckets": ["bucket-a", "bucket-b"] }
//!   ],
//!   "shadow_bucket_ext": { "ext": "-shadow", "suffix": true }
//! }
//! ```
//!
//! The camelCase spellings (`projectId`, `shadowBucketExt`) are accepted too.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read the pool configuration from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse the pool configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the shadow bucket extension must not be empty")]
    EmptyExtension,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PoolConfig {
    pub pool: Vec<ProjectPool>,
    #[serde(alias = "shadowBucketExt")]
    pub shadow_bucket_ext: ShadowBucketExt,
}

/// The buckets of one project.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProjectPool {
    #[serde(alias = "projectId")]
    pub project_id: String,
    pub buckets: Vec<String>,
}

/// How to name the shadow bucket that receives the transferred objects.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ShadowBucketExt {
    pub ext: String,
    /// Append the extension when `true`, prepend it otherwise.
    #[serde(default = "default_suffix")]
    pub suffix: bool,
}

fn default_suffix() -> bool {
    true
}

impl ShadowBucketExt {
    pub fn sink_bucket(&self, source_bucket: &str) -> String {
        if self.suffix {
            format!("{source_bucket}{}", self.ext)
        } else {
            format!("{}{source_bucket}", self.ext)
        }
    }
}

impl PoolConfig {
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(contents)?;
        if config.shadow_bucket_ext.ext.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }
        Ok(config)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&contents)
    }
}
