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

//! Brings the retention rules in the policy API in line with the events.
//!
//! The lookup-then-create-or-update sequence is not atomic. Two concurrent
//! reconciliations for the same key may both create a rule, the policy API
//! is expected to treat creates as upserts.

use crate::event::{RetentionEvent, RetentionEventKind};
use sdrs_client::model::{
    ExecutionEventRequest, RetentionRuleCreateRequest, RetentionRuleType,
    RetentionRuleUpdateRequest,
};
use sdrs_client::{DeleteOutcome, SdrsClient};

/// What [RuleReconciler::reconcile] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Created,
    Updated { rule_id: i64 },
    Deleted,
    /// The rule did not exist.
    AlreadyAbsent,
    /// The service returned an unexpected status, nothing changed.
    Skipped,
}

#[derive(Clone, Debug)]
pub struct RuleReconciler {
    client: SdrsClient,
}

impl RuleReconciler {
    pub fn new(client: SdrsClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SdrsClient {
        &self.client
    }

    /// Applies the event to the policy API.
    ///
    /// RPO events create or update the rule, marker events delete it.
    pub async fn reconcile(&self, event: &RetentionEvent) -> sdrs_client::Result<ReconcileOutcome> {
        match (event.kind, event.retention_period) {
            (RetentionEventKind::RpoSet, Some(period)) => self.upsert_rule(event, period).await,
            (RetentionEventKind::RpoSet, None) => {
                tracing::warn!(
                    storage_path = %event.storage_path,
                    "RPO event without a retention period"
                );
                Ok(ReconcileOutcome::Skipped)
            }
            (RetentionEventKind::DeleteMarker | RetentionEventKind::SuccessMarker, _) => {
                self.remove_rule(event).await
            }
        }
    }

    async fn upsert_rule(
        &self,
        event: &RetentionEvent,
        retention_period: u64,
    ) -> sdrs_client::Result<ReconcileOutcome> {
        let existing = self
            .client
            .get_retention_rule(
                &event.project_id,
                &event.storage_path,
                RetentionRuleType::Dataset,
            )
            .await;
        let existing = match skip_unexpected_status(existing, "lookup")? {
            None => return Ok(ReconcileOutcome::Skipped),
            Some(existing) => existing,
        };

        match existing {
            Some(rule) => {
                let Some(rule_id) = rule.rule_id else {
                    tracing::error!(
                        storage_path = %event.storage_path,
                        "the retention rule has no ruleId"
                    );
                    return Ok(ReconcileOutcome::Skipped);
                };
                tracing::info!(
                    rule_id,
                    retention_period,
                    storage_path = %event.storage_path,
                    "updating retention rule"
                );
                let request = RetentionRuleUpdateRequest { retention_period };
                let response = self.client.update_retention_rule(rule_id, &request).await;
                Ok(skip_unexpected_status(response, "update")?
                    .map_or(ReconcileOutcome::Skipped, |_| ReconcileOutcome::Updated { rule_id }))
            }
            None => {
                tracing::info!(
                    retention_period,
                    storage_path = %event.storage_path,
                    "creating retention rule"
                );
                let request = RetentionRuleCreateRequest {
                    data_storage_name: event.storage_path.clone(),
                    project_id: event.project_id.clone(),
                    retention_period,
                    rule_type: RetentionRuleType::Dataset,
                };
                let response = self.client.create_retention_rule(&request).await;
                Ok(skip_unexpected_status(response, "create")?
                    .map_or(ReconcileOutcome::Skipped, |_| ReconcileOutcome::Created))
            }
        }
    }

    /// Deletes the rule for the event's storage path.
    ///
    /// Does not check if the rule exists, a missing rule is not an error.
    pub async fn remove_rule(
        &self,
        event: &RetentionEvent,
    ) -> sdrs_client::Result<ReconcileOutcome> {
        tracing::info!(storage_path = %event.storage_path, "deleting retention rule");
        let response = self
            .client
            .delete_retention_rule(
                &event.project_id,
                &event.storage_path,
                RetentionRuleType::Dataset,
            )
            .await;
        Ok(match skip_unexpected_status(response, "delete")? {
            Some(DeleteOutcome::Deleted) => ReconcileOutcome::Deleted,
            Some(DeleteOutcome::NotFound) => ReconcileOutcome::AlreadyAbsent,
            None => ReconcileOutcome::Skipped,
        })
    }

    /// Asks the policy API to delete the event's storage path right away.
    pub async fn request_user_execution(&self, event: &RetentionEvent) -> sdrs_client::Result<()> {
        tracing::info!(storage_path = %event.storage_path, "requesting immediate deletion");
        let request = ExecutionEventRequest::user(&event.storage_path, &event.project_id);
        let response = self.client.execute_event(&request).await;
        skip_unexpected_status(response, "user execution")?;
        Ok(())
    }
}

/// Logs and swallows unexpected HTTP statuses, other errors propagate.
pub(crate) fn skip_unexpected_status<T>(
    result: sdrs_client::Result<T>,
    operation: &str,
) -> sdrs_client::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) => match e.http_status_code() {
            Some(status) => {
                tracing::error!(
                    operation,
                    status,
                    body = e.http_payload().unwrap_or_default(),
                    "unexpected response from the policy API"
                );
                Ok(None)
            }
            None => Err(e),
        },
    }
}
