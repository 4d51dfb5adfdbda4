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

//! The wire types of the SDRS policy API.
//!
//! Responses tolerate missing fields, the service omits nulls.

use serde::{Deserialize, Serialize};

/// The scope of a retention rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionRuleType {
    /// Applies to every dataset in a project.
    Global,
    /// Applies to a single dataset, keyed by its storage path.
    #[default]
    Dataset,
}

impl RetentionRuleType {
    /// The value used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Dataset => "DATASET",
        }
    }
}

/// A retention rule, as returned by the lookup API.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetentionRule {
    pub rule_id: Option<i64>,
    pub dataset_name: Option<String>,
    pub retention_period: Option<u64>,
    pub data_storage_name: Option<String>,
    pub project_id: Option<String>,
    #[serde(rename = "type")]
    pub rule_type: Option<RetentionRuleType>,
}

/// The body of `POST /retentionrules`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRuleCreateRequest {
    pub data_storage_name: String,
    pub project_id: String,
    pub retention_period: u64,
    #[serde(rename = "type")]
    pub rule_type: RetentionRuleType,
}

/// The body of `PUT /retentionrules/{ruleId}`.
///
/// Only the period changes, the rule keeps its key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRuleUpdateRequest {
    pub retention_period: u64,
}

/// The response of the retention rule mutations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetentionRuleResponse {
    pub rule_id: Option<i64>,
    pub request_uuid: Option<String>,
    pub message: Option<String>,
}

/// What an execution event runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionEventType {
    /// Apply every retention rule.
    Policy,
    /// Delete a dataset on behalf of a user, right away.
    User,
    /// Apply the rules of a single dataset.
    Dataset,
}

/// The body of `POST /events/execution`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionEventRequest {
    #[serde(rename = "type")]
    pub event_type: ExecutionEventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

impl ExecutionEventRequest {
    /// Runs all the retention policies.
    pub fn policy() -> Self {
        Self {
            event_type: ExecutionEventType::Policy,
            target: None,
            project_id: None,
        }
    }

    /// Deletes `target` right away.
    pub fn user<T, P>(target: T, project_id: P) -> Self
    where
        T: Into<String>,
        P: Into<String>,
    {
        Self {
            event_type: ExecutionEventType::User,
            target: Some(target.into()),
            project_id: Some(project_id.into()),
        }
    }
}

/// The body of `POST /events/notification`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEventRequest {
    pub deleted_object: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

/// The response of the event endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventResponse {
    pub message: Option<String>,
    pub request_uuid: Option<String>,
}

/// One entry in the body of `POST /stsjobpool`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PooledJobCreateRequest {
    /// The storage transfer job name, `transferJobs/...`.
    pub name: String,
    pub project_id: String,
    /// The time of day, `HH:MM:SS`.
    pub schedule: String,
    /// Either `dataset` or `default`.
    #[serde(rename = "type")]
    pub job_type: String,
    pub source_bucket: String,
    pub source_project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project: Option<String>,
}

/// A pooled job, as returned by `GET /stsjobpool`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PooledJob {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub schedule: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    pub source_bucket: Option<String>,
    pub source_project: Option<String>,
    pub target_bucket: Option<String>,
    pub target_project: Option<String>,
    pub status: Option<String>,
}

/// The response of the pool mutations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolResponse {
    pub success: Option<bool>,
    pub request_uuid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    #[test]
    fn retention_rule_from_lookup() -> TestResult {
        let rule = serde_json::from_value::<RetentionRule>(json!({
            "ruleId": 7,
            "retentionPeriod": 30,
            "dataStorageName": "gs://bucket/dataset/",
            "projectId": "test-project",
            "type": "DATASET",
            "unknownField": true,
        }))?;
        assert_eq!(rule.rule_id, Some(7));
        assert_eq!(rule.retention_period, Some(30));
        assert_eq!(rule.rule_type, Some(RetentionRuleType::Dataset));
        assert_eq!(rule.dataset_name, None);
        Ok(())
    }

    #[test]
    fn create_request_wire_format() -> TestResult {
        let request = RetentionRuleCreateRequest {
            data_storage_name: "gs://bucket/dataset/".to_string(),
            project_id: "test-project".to_string(),
            retention_period: 30,
            rule_type: RetentionRuleType::Dataset,
        };
        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "dataStorageName": "gs://bucket/dataset/",
                "projectId": "test-project",
                "retentionPeriod": 30,
                "type": "DATASET",
            })
        );
        Ok(())
    }

    #[test]
    fn execution_events() -> TestResult {
        assert_eq!(
            serde_json::to_value(ExecutionEventRequest::policy())?,
            json!({"type": "POLICY"})
        );
        assert_eq!(
            serde_json::to_value(ExecutionEventRequest::user("gs://b/p/", "test-project"))?,
            json!({"type": "USER", "target": "gs://b/p/", "projectId": "test-project"})
        );
        Ok(())
    }

    #[test]
    fn pooled_job_request_omits_target() -> TestResult {
        let request = PooledJobCreateRequest {
            name: "transferJobs/123".to_string(),
            project_id: "test-project".to_string(),
            schedule: "01:00:00".to_string(),
            job_type: "dataset".to_string(),
            source_bucket: "bucket".to_string(),
            source_project: "test-project".to_string(),
            target_bucket: None,
            target_project: None,
        };
        let value = serde_json::to_value(&request)?;
        assert_eq!(value["type"], "dataset");
        assert!(value.get("targetBucket").is_none(), "{value}");
        Ok(())
    }
}
