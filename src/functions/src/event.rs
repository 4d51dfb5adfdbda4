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

//! Inbound events and the object name patterns.

use crate::config::FunctionConfig;
use crate::error::EventError;
use base64::Engine;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;

/// An event as delivered to the handlers.
///
/// Storage notifications arrive either as pub/sub messages, with the object
/// details in the attributes, or as the object resource itself.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InboundEvent {
    StorageObject(StorageObject),
    PubSub(PubSubMessage),
}

/// A pub/sub message.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PubSubMessage {
    /// The payload, base64 encoded.
    pub data: Option<String>,
    pub attributes: HashMap<String, String>,
}

/// The object resource, as sent by the legacy storage triggers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageObject {
    pub name: String,
    pub bucket: String,
    #[serde(default)]
    pub time_created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
}

/// The notification fields the handlers use.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectNotification {
    pub bucket: String,
    pub object_id: String,
    pub event_time: Option<String>,
}

impl ObjectNotification {
    /// The full URL of the object.
    pub fn object_url(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object_id)
    }
}

impl InboundEvent {
    pub fn from_json(payload: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(payload).map_err(EventError::malformed)
    }

    /// Extracts the object details of a storage notification.
    pub fn object_notification(&self) -> Result<ObjectNotification, EventError> {
        match self {
            Self::StorageObject(o) => Ok(ObjectNotification {
                bucket: o.bucket.clone(),
                object_id: o.name.clone(),
                event_time: o.updated.clone().or_else(|| o.time_created.clone()),
            }),
            Self::PubSub(m) => {
                let attribute = |name: &'static str| {
                    m.attributes
                        .get(name)
                        .cloned()
                        .ok_or_else(|| EventError::missing_attribute(name))
                };
                Ok(ObjectNotification {
                    object_id: attribute("objectId")?,
                    bucket: attribute("bucketId")?,
                    event_time: m.attributes.get("eventTime").cloned(),
                })
            }
        }
    }

    /// Decodes the payload of a scheduler message.
    pub fn message_data(&self) -> Result<String, EventError> {
        let data = match self {
            Self::PubSub(PubSubMessage {
                data: Some(data), ..
            }) => data,
            _ => return Err(EventError::missing_attribute("data")),
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .map_err(EventError::base64)?;
        String::from_utf8(bytes).map_err(EventError::utf8)
    }
}

/// The kind of a retention event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetentionEventKind {
    RpoSet,
    DeleteMarker,
    SuccessMarker,
}

/// The intent expressed by the name of an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetentionEvent {
    /// `gs://<bucket>/<prefix>`, the prefix keeps its trailing separator.
    pub storage_path: String,
    pub project_id: String,
    /// The retention period in days, only for [RetentionEventKind::RpoSet].
    ///
    /// `None` for an RPO object whose period does not fit in a `u64`. Such
    /// events still remove the rule when the object is deleted.
    pub retention_period: Option<u64>,
    pub kind: RetentionEventKind,
}

/// Classifies object names.
///
/// The patterns are tried in order: delete marker, RPO, success marker. The
/// first match wins.
#[derive(Clone, Debug)]
pub struct ObjectKeyMatcher {
    delete_marker: Regex,
    rpo: Regex,
    success_marker: Regex,
}

impl ObjectKeyMatcher {
    pub fn new(rpo: &str, delete_marker: &str, success_marker: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            delete_marker: Regex::new(delete_marker)?,
            rpo: Regex::new(rpo)?,
            success_marker: Regex::new(success_marker)?,
        })
    }

    pub fn from_config(config: &FunctionConfig) -> Result<Self, regex::Error> {
        Self::new(
            &config.rpo_pattern,
            &config.delete_marker_pattern,
            &config.success_marker_pattern,
        )
    }

    /// Derives the retention event for an object, if any.
    ///
    /// Returns `None` for objects that match no pattern.
    pub fn parse(&self, bucket: &str, object_id: &str, project_id: &str) -> Option<RetentionEvent> {
        let event = |start: usize, kind, retention_period| RetentionEvent {
            storage_path: format!("gs://{bucket}/{}", &object_id[..start]),
            project_id: project_id.to_string(),
            retention_period,
            kind,
        };
        if let Some(m) = self.delete_marker.find(object_id) {
            return Some(event(m.start(), RetentionEventKind::DeleteMarker, None));
        }
        if let Some(m) = self.rpo.find(object_id) {
            let period = retention_period(object_id);
            if period.is_none() {
                tracing::warn!(object_id, "RPO object without a valid retention period");
            }
            return Some(event(m.start(), RetentionEventKind::RpoSet, period));
        }
        if let Some(m) = self.success_marker.find(object_id) {
            return Some(event(m.start(), RetentionEventKind::SuccessMarker, None));
        }
        tracing::debug!(object_id, "object matches no pattern");
        None
    }
}

// The digits after the last underscore.
fn retention_period(object_id: &str) -> Option<u64> {
    let (_, digits) = object_id.rsplit_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
