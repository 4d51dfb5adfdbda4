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

//! The transfer jobs in the pool of a bucket.
//!
//! Each bucket gets one dataset job per hour of the day, plus one default
//! job that runs at the end of the day. The jobs are created disabled, the
//! policy engine enables them as needed.

use sdrs_client::model::PooledJobCreateRequest;
use sdrs_client::transfer::{
    Date, GcsData, Schedule, TimeOfDay, TransferJob, TransferJobStatus, TransferSpec,
};

pub const DATASET_JOBS_PER_BUCKET: u8 = 24;
const DEFAULT_JOB_TIME: TimeOfDay = TimeOfDay {
    hours: 23,
    minutes: 59,
    seconds: 59,
};

/// The role of a pooled job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PooledJobType {
    Dataset,
    Default,
}

impl PooledJobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Default => "default",
        }
    }
}

/// One transfer job to create.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedJob {
    pub job_type: PooledJobType,
    pub transfer_job: TransferJob,
}

impl PlannedJob {
    /// The pool registration for this job, once the service assigned a name.
    pub fn registration(&self, name: &str) -> PooledJobCreateRequest {
        let job = &self.transfer_job;
        PooledJobCreateRequest {
            name: name.to_string(),
            project_id: job.project_id.clone(),
            schedule: job.schedule.start_time_of_day.to_hms(),
            job_type: self.job_type.as_str().to_string(),
            source_bucket: job.transfer_spec.gcs_data_source.bucket_name.clone(),
            source_project: job.project_id.clone(),
            target_bucket: None,
            target_project: None,
        }
    }
}

/// The full pool for one source bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct PoolPlan {
    pub project_id: String,
    pub source_bucket: String,
    pub sink_bucket: String,
    pub jobs: Vec<PlannedJob>,
}

impl PoolPlan {
    pub fn new<P, S, K>(
        project_id: P,
        source_bucket: S,
        sink_bucket: K,
        start_date: time::Date,
    ) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        K: Into<String>,
    {
        let project_id = project_id.into();
        let source_bucket = source_bucket.into();
        let sink_bucket = sink_bucket.into();
        let job = |job_type, start_time_of_day: TimeOfDay| PlannedJob {
            job_type,
            transfer_job: TransferJob {
                description: format!("{source_bucket} {}", start_time_of_day.to_hms()),
                status: TransferJobStatus::Disabled,
                project_id: project_id.clone(),
                schedule: Schedule {
                    schedule_start_date: Date::from(start_date),
                    start_time_of_day,
                },
                transfer_spec: TransferSpec {
                    gcs_data_source: GcsData {
                        bucket_name: source_bucket.clone(),
                    },
                    gcs_data_sink: GcsData {
                        bucket_name: sink_bucket.clone(),
                    },
                },
                ..Default::default()
            },
        };
        let jobs = (0..DATASET_JOBS_PER_BUCKET)
            .map(|hours| {
                let at = TimeOfDay {
                    hours,
                    minutes: 0,
                    seconds: 0,
                };
                job(PooledJobType::Dataset, at)
            })
            .chain(std::iter::once(job(PooledJobType::Default, DEFAULT_JOB_TIME)))
            .collect();
        Self {
            project_id,
            source_bucket,
            sink_bucket,
            jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn plan() -> PoolPlan {
        let start = time::Date::from_calendar_date(2026, Month::October, 19).expect("valid date");
        PoolPlan::new("test-project", "bucket", "bucket-shadow", start)
    }

    #[test]
    fn job_count_and_types() {
        let plan = plan();
        assert_eq!(plan.jobs.len(), 25);
        let dataset = plan
            .jobs
            .iter()
            .filter(|j| j.job_type == PooledJobType::Dataset)
            .count();
        assert_eq!(dataset, 24);
        assert_eq!(plan.jobs[24].job_type, PooledJobType::Default);
    }

    #[test]
    fn schedules() {
        let plan = plan();
        let schedules = plan
            .jobs
            .iter()
            .map(|j| j.transfer_job.schedule.start_time_of_day.to_hms())
            .collect::<Vec<_>>();
        assert_eq!(schedules[0], "00:00:00");
        assert_eq!(schedules[9], "09:00:00");
        assert_eq!(schedules[23], "23:00:00");
        assert_eq!(schedules[24], "23:59:59");
    }

    #[test]
    fn transfer_job_fields() {
        let plan = plan();
        let job = &plan.jobs[1].transfer_job;
        assert_eq!(job.description, "bucket 01:00:00");
        assert_eq!(job.status, TransferJobStatus::Disabled);
        assert_eq!(job.project_id, "test-project");
        assert_eq!(job.name, "");
        assert_eq!(
            job.schedule.schedule_start_date,
            Date {
                year: 2026,
                month: 10,
                day: 19
            }
        );
        assert_eq!(job.transfer_spec.gcs_data_source.bucket_name, "bucket");
        assert_eq!(job.transfer_spec.gcs_data_sink.bucket_name, "bucket-shadow");
    }

    #[test]
    fn registration() {
        let plan = plan();
        let got = plan.jobs[24].registration("transferJobs/42");
        assert_eq!(
            got,
            PooledJobCreateRequest {
                name: "transferJobs/42".to_string(),
                project_id: "test-project".to_string(),
                schedule: "23:59:59".to_string(),
                job_type: "default".to_string(),
                source_bucket: "bucket".to_string(),
                source_project: "test-project".to_string(),
                target_bucket: None,
                target_project: None,
            }
        );
    }
}
