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
use crate::event::{InboundEvent, ObjectKeyMatcher, ObjectNotification, RetentionEventKind};
use crate::reconciler::{RuleReconciler, skip_unexpected_status};
use sdrs_client::SdrsClient;
use sdrs_client::model::{ExecutionEventRequest, NotificationEventRequest};

const EXECUTOR_MESSAGE: &str = "executor";
const VALIDATOR_MESSAGE: &str = "validator";

/// The entry points for the storage notifications and scheduler ticks.
#[derive(Clone, Debug)]
pub struct Handlers {
    matcher: ObjectKeyMatcher,
    reconciler: RuleReconciler,
    project_id: String,
}

impl Handlers {
    pub fn new<P>(matcher: ObjectKeyMatcher, client: SdrsClient, project_id: P) -> Self
    where
        P: Into<String>,
    {
        Self {
            matcher,
            reconciler: RuleReconciler::new(client),
            project_id: project_id.into(),
        }
    }

    /// Handles an object finalized notification.
    ///
    /// A delete marker requests an immediate deletion, an RPO object creates
    /// or updates the retention rule.
    pub async fn gcs_create(&self, event: &InboundEvent) -> Result<()> {
        let notification = event.object_notification()?;
        let Some(retention) = self.parse(&notification) else {
            return Ok(());
        };
        match retention.kind {
            RetentionEventKind::DeleteMarker => {
                self.reconciler.request_user_execution(&retention).await?;
            }
            RetentionEventKind::RpoSet => {
                let outcome = self.reconciler.reconcile(&retention).await?;
                tracing::info!(?outcome, storage_path = %retention.storage_path, "reconciled");
            }
            RetentionEventKind::SuccessMarker => {
                tracing::debug!(
                    object_id = %notification.object_id,
                    "success marker created, nothing to do"
                );
            }
        }
        Ok(())
    }

    /// Handles an object deleted notification.
    ///
    /// Removing a marker deletes the rule and reports the deletion. Removing
    /// an RPO object deletes the rule.
    pub async fn gcs_delete(&self, event: &InboundEvent) -> Result<()> {
        let notification = event.object_notification()?;
        let Some(retention) = self.parse(&notification) else {
            return Ok(());
        };
        let outcome = self.reconciler.remove_rule(&retention).await?;
        tracing::info!(?outcome, storage_path = %retention.storage_path, "reconciled");
        if retention.kind == RetentionEventKind::RpoSet {
            return Ok(());
        }
        let request = NotificationEventRequest {
            deleted_object: notification.object_url(),
            project_id: self.project_id.clone(),
            deleted_at: notification.event_time.clone(),
        };
        tracing::info!(deleted_object = %request.deleted_object, "reporting marker deletion");
        let response = self.reconciler.client().notify_deletion(&request).await;
        skip_unexpected_status(response, "notification")?;
        Ok(())
    }

    /// Handles a scheduler tick.
    pub async fn scheduler(&self, event: &InboundEvent) -> Result<()> {
        let message = event.message_data()?;
        let client = self.reconciler.client();
        match message.trim() {
            EXECUTOR_MESSAGE => {
                tracing::info!("invoking the executor");
                let response = client.execute_event(&ExecutionEventRequest::policy()).await;
                if let Some(r) = skip_unexpected_status(response, "executor")? {
                    tracing::info!(
                        message = ?r.message,
                        request_uuid = ?r.request_uuid,
                        "executor started"
                    );
                }
            }
            VALIDATOR_MESSAGE => {
                tracing::info!("invoking the validator");
                let response = client.validation_event().await;
                if let Some(r) = skip_unexpected_status(response, "validator")? {
                    tracing::info!(
                        message = ?r.message,
                        request_uuid = ?r.request_uuid,
                        "validator started"
                    );
                }
            }
            other => tracing::warn!(message = other, "nothing to schedule"),
        }
        Ok(())
    }

    fn parse(&self, n: &ObjectNotification) -> Option<crate::event::RetentionEvent> {
        self.matcher.parse(&n.bucket, &n.object_id, &self.project_id)
    }
}
