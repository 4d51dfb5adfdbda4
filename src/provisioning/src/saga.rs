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

//! Provisions a job pool, undoing the completed steps on failure.
//!
//! Every successful step records the action that reverts it. On the first
//! failure the recorded actions run in reverse order. Compensation failures
//! are logged and do not stop the remaining compensations.

use crate::plan::PoolPlan;
use sdrs_client::model::PooledJobCreateRequest;
use sdrs_client::transfer::TransferJob;
use sdrs_client::{SdrsClient, TransferClient};

/// The remote calls made by the saga.
#[async_trait::async_trait]
pub trait PoolBackend: std::fmt::Debug + Send + Sync {
    /// Creates a transfer job and returns the name assigned by the service.
    async fn create_transfer_job(&self, job: &TransferJob) -> sdrs_client::Result<String>;

    async fn delete_transfer_job(&self, name: &str, project_id: &str) -> sdrs_client::Result<()>;

    async fn register_pool(&self, jobs: &[PooledJobCreateRequest]) -> sdrs_client::Result<()>;

    async fn unregister_pool(
        &self,
        source_bucket: &str,
        source_project: &str,
    ) -> sdrs_client::Result<()>;
}

/// The [PoolBackend] for the real services.
#[derive(Clone, Debug)]
pub struct ClientBackend {
    transfer: TransferClient,
    policy: SdrsClient,
}

impl ClientBackend {
    pub fn new(transfer: TransferClient, policy: SdrsClient) -> Self {
        Self { transfer, policy }
    }
}

#[async_trait::async_trait]
impl PoolBackend for ClientBackend {
    async fn create_transfer_job(&self, job: &TransferJob) -> sdrs_client::Result<String> {
        let created = self.transfer.create_transfer_job(job).await?;
        if created.name.is_empty() {
            return Err(sdrs_client::Error::deser(
                "the created transfer job has no name",
            ));
        }
        Ok(created.name)
    }

    async fn delete_transfer_job(&self, name: &str, project_id: &str) -> sdrs_client::Result<()> {
        self.transfer.delete_transfer_job(name, project_id).await?;
        Ok(())
    }

    async fn register_pool(&self, jobs: &[PooledJobCreateRequest]) -> sdrs_client::Result<()> {
        let response = self.policy.create_job_pool(jobs).await?;
        if response.success == Some(false) {
            return Err(sdrs_client::Error::http(
                200,
                "the policy API did not register the pool".to_string(),
            ));
        }
        Ok(())
    }

    async fn unregister_pool(
        &self,
        source_bucket: &str,
        source_project: &str,
    ) -> sdrs_client::Result<()> {
        self.policy
            .delete_job_pool(source_bucket, source_project)
            .await?;
        Ok(())
    }
}

/// The action that reverts a completed step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compensation {
    DeleteTransferJob {
        name: String,
        project_id: String,
    },
    DeletePoolRegistration {
        source_bucket: String,
        source_project: String,
    },
}

impl Compensation {
    async fn run(&self, backend: &dyn PoolBackend) -> sdrs_client::Result<()> {
        match self {
            Self::DeleteTransferJob { name, project_id } => {
                backend.delete_transfer_job(name, project_id).await
            }
            Self::DeletePoolRegistration {
                source_bucket,
                source_project,
            } => backend.unregister_pool(source_bucket, source_project).await,
        }
    }
}

/// A failed provisioning.
#[derive(thiserror::Error, Debug)]
#[error(
    "provisioning failed at step {step} ({compensated} steps compensated, \
     {failed_compensations} compensations failed): {source}"
)]
pub struct SagaError {
    /// The failed step, starting at 1.
    pub step: usize,
    /// The number of compensations attempted.
    pub compensated: usize,
    pub failed_compensations: usize,
    #[source]
    pub source: sdrs_client::Error,
}

/// The result of a successful provisioning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolReport {
    pub source_bucket: String,
    pub job_names: Vec<String>,
}

/// Records the compensations of the completed steps.
#[derive(Debug, Default)]
pub struct Saga {
    compensations: Vec<Compensation>,
}

impl Saga {
    pub fn record(&mut self, compensation: Compensation) {
        self.compensations.push(compensation);
    }

    pub fn compensations(&self) -> &[Compensation] {
        &self.compensations
    }

    /// Runs the recorded compensations, most recent first.
    ///
    /// Returns the number of compensations that failed.
    pub async fn compensate(self, backend: &dyn PoolBackend) -> usize {
        let mut failures = 0;
        for compensation in self.compensations.into_iter().rev() {
            if let Err(e) = compensation.run(backend).await {
                failures += 1;
                tracing::error!(?compensation, "compensation failed: {e}");
            } else {
                tracing::info!(?compensation, "compensated");
            }
        }
        failures
    }
}

/// Creates the transfer jobs of the plan, then registers them as a pool.
pub async fn provision_pool(
    backend: &dyn PoolBackend,
    plan: &PoolPlan,
) -> Result<PoolReport, SagaError> {
    let mut reports = provision_pools(backend, std::slice::from_ref(plan)).await?;
    Ok(reports.remove(0))
}

/// Provisions the pools of all the plans as a single saga.
///
/// A failure in any plan also undoes the plans completed before it, their
/// pool registrations included. Steps are numbered across all the plans,
/// starting at 1.
pub async fn provision_pools(
    backend: &dyn PoolBackend,
    plans: &[PoolPlan],
) -> Result<Vec<PoolReport>, SagaError> {
    let mut saga = Saga::default();
    let mut reports = Vec::with_capacity(plans.len());
    let mut step = 0;

    let mut result = Ok(());
    for plan in plans {
        match provision_plan(backend, plan, &mut saga, &mut step).await {
            Ok(report) => reports.push(report),
            Err(e) => {
                tracing::error!(
                    step,
                    source_bucket = %plan.source_bucket,
                    "provisioning failed: {e}"
                );
                result = Err(e);
                break;
            }
        }
    }

    match result {
        Ok(()) => Ok(reports),
        Err(source) => {
            let compensated = saga.compensations().len();
            let failed_compensations = saga.compensate(backend).await;
            Err(SagaError {
                step,
                compensated,
                failed_compensations,
                source,
            })
        }
    }
}

async fn provision_plan(
    backend: &dyn PoolBackend,
    plan: &PoolPlan,
    saga: &mut Saga,
    step: &mut usize,
) -> sdrs_client::Result<PoolReport> {
    let mut registrations = Vec::with_capacity(plan.jobs.len());
    for planned in &plan.jobs {
        *step += 1;
        let name = backend.create_transfer_job(&planned.transfer_job).await?;
        tracing::info!(
            step = *step,
            %name,
            description = %planned.transfer_job.description,
            "created transfer job"
        );
        saga.record(Compensation::DeleteTransferJob {
            name: name.clone(),
            project_id: plan.project_id.clone(),
        });
        registrations.push(planned.registration(&name));
    }
    *step += 1;
    backend.register_pool(&registrations).await?;
    tracing::info!(
        source_bucket = %plan.source_bucket,
        jobs = registrations.len(),
        "registered pool"
    );
    // Runs only if a later plan in the same saga fails.
    saga.record(Compensation::DeletePoolRegistration {
        source_bucket: plan.source_bucket.clone(),
        source_project: plan.project_id.clone(),
    });
    Ok(PoolReport {
        source_bucket: plan.source_bucket.clone(),
        job_names: registrations.into_iter().map(|r| r.name).collect(),
    })
}
