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

//! A minimal client for the Storage Transfer Service.
//!
//! Only the two calls needed to provision a job pool are supported: create a
//! job and mark a job as deleted.

use crate::Result;
use crate::http::ReqwestClient;
use reqwest::Method;
use sdrs_auth::AuthorizationProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TRANSFER_ENDPOINT: &str = "https://storagetransfer.googleapis.com";

/// The lifecycle status of a transfer job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferJobStatus {
    #[default]
    StatusUnspecified,
    Enabled,
    Disabled,
    Deleted,
}

/// A calendar date, as used by the transfer schedule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
}

impl From<time::Date> for Date {
    fn from(value: time::Date) -> Self {
        Self {
            year: value.year(),
            month: u8::from(value.month()),
            day: value.day(),
        }
    }
}

/// A time of day, in UTC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeOfDay {
    /// Formats as `HH:MM:SS`.
    pub fn to_hms(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schedule {
    pub schedule_start_date: Date,
    pub start_time_of_day: TimeOfDay,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GcsData {
    pub bucket_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferSpec {
    pub gcs_data_source: GcsData,
    pub gcs_data_sink: GcsData,
}

/// A transfer job.
///
/// The service assigns the `name` when the job is created.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransferJob {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub description: String,
    pub status: TransferJobStatus,
    pub project_id: String,
    pub schedule: Schedule,
    pub transfer_spec: TransferSpec,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobStatusPatch {
    status: TransferJobStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTransferJobRequest<'a> {
    project_id: &'a str,
    transfer_job: JobStatusPatch,
    update_transfer_job_field_mask: &'static str,
}

/// A client for the Storage Transfer Service.
///
/// The calls must be authenticated with an OAuth2 access token, for example
/// from a [sdrs_auth::TokenCache] over a [sdrs_auth::mds::MetadataServer].
#[derive(Clone, Debug)]
pub struct TransferClient {
    inner: ReqwestClient,
}

impl TransferClient {
    pub fn new<A>(auth: A) -> Self
    where
        A: AuthorizationProvider + 'static,
    {
        let inner = ReqwestClient::new(
            DEFAULT_TRANSFER_ENDPOINT.to_string(),
            DEFAULT_TRANSFER_ENDPOINT.to_string(),
            Arc::new(auth),
            Duration::from_secs(30),
        );
        Self { inner }
    }

    pub fn with_endpoint<V: AsRef<str>>(self, v: V) -> Self {
        Self {
            inner: self.inner.with_endpoint(v.as_ref()),
        }
    }

    pub fn with_timeout(self, v: Duration) -> Self {
        Self {
            inner: self.inner.with_timeout(v),
        }
    }

    /// Creates a transfer job, returning the job with its assigned name.
    pub async fn create_transfer_job(&self, job: &TransferJob) -> Result<TransferJob> {
        let builder = self.inner.builder(Method::POST, "/v1/transferJobs");
        self.inner
            .execute(builder, Some(job))
            .await?
            .ensure_success()?
            .into_json()
    }

    /// Marks a transfer job as deleted.
    ///
    /// The service garbage collects deleted jobs, there is no other way to
    /// remove them.
    pub async fn delete_transfer_job(&self, name: &str, project_id: &str) -> Result<TransferJob> {
        let builder = self.inner.builder(Method::PATCH, &format!("/v1/{name}"));
        let request = UpdateTransferJobRequest {
            project_id,
            transfer_job: JobStatusPatch {
                status: TransferJobStatus::Deleted,
            },
            update_transfer_job_field_mask: "status",
        };
        self.inner
            .execute(builder, Some(&request))
            .await?
            .ensure_success()?
            .into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::FixedAuthorization;
    use httptest::matchers::{all_of, contains, eq, json_decoded, request};
    use httptest::responders::{json_encoded, status_code};
    use httptest::{Expectation, Server};
    use serde_json::json;

    type TestResult = anyhow::Result<()>;

    fn client(server: &Server) -> TransferClient {
        TransferClient::new(FixedAuthorization(Some("Bearer access-token")))
            .with_endpoint(format!("http://{}", server.addr()))
            .with_timeout(Duration::from_secs(5))
    }

    fn job() -> TransferJob {
        TransferJob {
            description: "test-bucket 01:00:00".to_string(),
            status: TransferJobStatus::Disabled,
            project_id: "test-project".to_string(),
            schedule: Schedule {
                schedule_start_date: Date {
                    year: 2026,
                    month: 1,
                    day: 2,
                },
                start_time_of_day: TimeOfDay {
                    hours: 1,
                    minutes: 0,
                    seconds: 0,
                },
            },
            transfer_spec: TransferSpec {
                gcs_data_source: GcsData {
                    bucket_name: "test-bucket".to_string(),
                },
                gcs_data_sink: GcsData {
                    bucket_name: "test-bucket-shadow".to_string(),
                },
            },
            ..Default::default()
        }
    }

    #[test]
    fn date_from_time() {
        let date = time::Date::from_calendar_date(2026, time::Month::March, 9);
        let date = Date::from(date.expect("valid date"));
        assert_eq!(
            date,
            Date {
                year: 2026,
                month: 3,
                day: 9
            }
        );
        let tod = TimeOfDay {
            hours: 23,
            minutes: 59,
            seconds: 59,
        };
        assert_eq!(tod.to_hms(), "23:59:59");
    }

    #[tokio::test]
    async fn create_transfer_job() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("POST", "/v1/transferJobs"),
                request::headers(contains(("authorization", "Bearer access-token"))),
                request::body(json_decoded(eq(json!({
                    "description": "test-bucket 01:00:00",
                    "status": "DISABLED",
                    "projectId": "test-project",
                    "schedule": {
                        "scheduleStartDate": {"year": 2026, "month": 1, "day": 2},
                        "startTimeOfDay": {"hours": 1, "minutes": 0, "seconds": 0},
                    },
                    "transferSpec": {
                        "gcsDataSource": {"bucketName": "test-bucket"},
                        "gcsDataSink": {"bucketName": "test-bucket-shadow"},
                    },
                })))),
            ])
            .respond_with(json_encoded(json!({
                "name": "transferJobs/123",
                "status": "DISABLED",
                "projectId": "test-project",
            }))),
        );

        let created = client(&server).create_transfer_job(&job()).await?;
        assert_eq!(created.name, "transferJobs/123");
        assert_eq!(created.status, TransferJobStatus::Disabled);
        Ok(())
    }

    #[tokio::test]
    async fn create_transfer_job_error() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("POST", "/v1/transferJobs"))
                .respond_with(status_code(403).body("permission denied")),
        );

        let err = client(&server)
            .create_transfer_job(&job())
            .await
            .unwrap_err();
        assert_eq!(err.http_status_code(), Some(403), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn delete_transfer_job() -> TestResult {
        let server = Server::run();
        server.expect(
            Expectation::matching(all_of![
                request::method_path("PATCH", "/v1/transferJobs/123"),
                request::body(json_decoded(eq(json!({
                    "projectId": "test-project",
                    "transferJob": {"status": "DELETED"},
                    "updateTransferJobFieldMask": "status",
                })))),
            ])
            .respond_with(json_encoded(json!({
                "name": "transferJobs/123",
                "status": "DELETED",
            }))),
        );

        let deleted = client(&server)
            .delete_transfer_job("transferJobs/123", "test-project")
            .await?;
        assert_eq!(deleted.status, TransferJobStatus::Deleted);
        Ok(())
    }
}
