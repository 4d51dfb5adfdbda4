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
use crate::error::Error;
use crate::http::ReqwestClient;
use crate::model::*;
use reqwest::Method;
use sdrs_auth::AuthorizationProvider;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The result of a best-effort delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The resource existed and was removed.
    Deleted,
    /// There was nothing to remove.
    NotFound,
}

/// Configures a [SdrsClient].
#[derive(Debug)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    audience: Option<String>,
    timeout: Duration,
    auth: Option<Arc<dyn AuthorizationProvider>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            endpoint: None,
            audience: None,
            timeout: DEFAULT_TIMEOUT,
            auth: None,
        }
    }
}

impl ClientBuilder {
    /// The base URL of the policy API, including the port if any.
    pub fn with_endpoint<V: Into<String>>(mut self, v: V) -> Self {
        self.endpoint = Some(v.into());
        self
    }

    /// The `aud` claim of the bearer tokens.
    ///
    /// Defaults to the endpoint.
    pub fn with_audience<V: Into<String>>(mut self, v: V) -> Self {
        self.audience = Some(v.into());
        self
    }

    /// The timeout for each request, 30 seconds by default.
    pub fn with_timeout(mut self, v: Duration) -> Self {
        self.timeout = v;
        self
    }

    /// The source of the `Authorization:` header.
    pub fn with_authorization<A>(mut self, v: A) -> Self
    where
        A: AuthorizationProvider + 'static,
    {
        self.auth = Some(Arc::new(v));
        self
    }

    pub fn build(self) -> Result<SdrsClient> {
        let endpoint = self
            .endpoint
            .ok_or_else(|| Error::configuration("the policy API endpoint is required"))?;
        let auth = self
            .auth
            .ok_or_else(|| Error::configuration("an authorization provider is required"))?;
        let audience = self.audience.unwrap_or_else(|| endpoint.clone());
        Ok(SdrsClient {
            inner: ReqwestClient::new(endpoint, audience, auth, self.timeout),
        })
    }
}

/// A client for the SDRS policy API.
///
/// The client never retries. Each method documents which statuses it treats
/// as success.
#[derive(Clone, Debug)]
pub struct SdrsClient {
    inner: ReqwestClient,
}

impl SdrsClient {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    fn rule_query<'a>(
        project_id: &'a str,
        data_storage_name: &'a str,
        rule_type: RetentionRuleType,
    ) -> [(&'static str, &'a str); 3] {
        [
            ("projectId", project_id),
            ("dataStorageName", data_storage_name),
            ("type", rule_type.as_str()),
        ]
    }

    /// Looks up the rule for a (project, storage path, type) key.
    ///
    /// Returns `None` when the service responds with 404.
    pub async fn get_retention_rule(
        &self,
        project_id: &str,
        data_storage_name: &str,
        rule_type: RetentionRuleType,
    ) -> Result<Option<RetentionRule>> {
        let builder = self
            .inner
            .builder(Method::GET, "/retentionrules")
            .query(&Self::rule_query(project_id, data_storage_name, rule_type));
        let response = self.inner.execute(builder, None::<()>).await?;
        if response.status == 404 {
            return Ok(None);
        }
        response.ensure_success()?.into_json().map(Some)
    }

    pub async fn create_retention_rule(
        &self,
        request: &RetentionRuleCreateRequest,
    ) -> Result<RetentionRuleResponse> {
        let builder = self.inner.builder(Method::POST, "/retentionrules");
        self.inner
            .execute(builder, Some(request))
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Changes the retention period of an existing rule.
    pub async fn update_retention_rule(
        &self,
        rule_id: i64,
        request: &RetentionRuleUpdateRequest,
    ) -> Result<RetentionRuleResponse> {
        let builder = self
            .inner
            .builder(Method::PUT, &format!("/retentionrules/{rule_id}"));
        self.inner
            .execute(builder, Some(request))
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Deletes the rule for a key, without checking if it exists first.
    pub async fn delete_retention_rule(
        &self,
        project_id: &str,
        data_storage_name: &str,
        rule_type: RetentionRuleType,
    ) -> Result<DeleteOutcome> {
        let builder = self
            .inner
            .builder(Method::DELETE, "/retentionrules")
            .query(&Self::rule_query(project_id, data_storage_name, rule_type));
        let response = self.inner.execute(builder, None::<()>).await?;
        if response.status == 404 {
            return Ok(DeleteOutcome::NotFound);
        }
        response.ensure_success()?;
        Ok(DeleteOutcome::Deleted)
    }

    pub async fn execute_event(&self, request: &ExecutionEventRequest) -> Result<EventResponse> {
        let builder = self.inner.builder(Method::POST, "/events/execution");
        self.inner
            .execute(builder, Some(request))
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Asks the service to validate the status of the pending jobs.
    pub async fn validation_event(&self) -> Result<EventResponse> {
        let builder = self.inner.builder(Method::POST, "/events/validation");
        self.inner
            .execute(builder, None::<()>)
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Reports that a marker object was deleted.
    pub async fn notify_deletion(
        &self,
        request: &NotificationEventRequest,
    ) -> Result<EventResponse> {
        let builder = self.inner.builder(Method::POST, "/events/notification");
        self.inner
            .execute(builder, Some(request))
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Registers a batch of pooled transfer jobs.
    pub async fn create_job_pool(&self, jobs: &[PooledJobCreateRequest]) -> Result<PoolResponse> {
        let builder = self.inner.builder(Method::POST, "/stsjobpool");
        self.inner
            .execute(builder, Some(jobs))
            .await?
            .ensure_success()?
            .into_json()
    }

    pub async fn get_job_pool(
        &self,
        source_bucket: &str,
        source_project: &str,
    ) -> Result<Vec<PooledJob>> {
        let builder = self
            .inner
            .builder(Method::GET, "/stsjobpool")
            .query(&[
                ("sourceBucket", source_bucket),
                ("sourceProject", source_project),
            ]);
        self.inner
            .execute(builder, None::<()>)
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Unregisters all the pooled jobs of a bucket.
    pub async fn delete_job_pool(
        &self,
        source_bucket: &str,
        source_project: &str,
    ) -> Result<PoolResponse> {
        let builder = self
            .inner
            .builder(Method::DELETE, "/stsjobpool")
            .query(&[
                ("sourceBucket", source_bucket),
                ("sourceProject", source_project),
            ]);
        self.inner
            .execute(builder, None::<()>)
            .await?
            .ensure_success()?
            .into_json()
    }
}
