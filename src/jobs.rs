use crate::lifecycle::ProvisionOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobOperation {
    Create,
    Delete,
}

/// One tracked provisioning run. Held in memory only; restarting the server
/// forgets all jobs while the scripts keep running or not on their own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub job_id: Uuid,
    pub name: String,
    pub operation: JobOperation,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

const DEFAULT_CAPACITY: usize = 1024;

/// Polling handle over in-flight create/delete runs, so a caller is not
/// blocked on the full provisioning window. The subprocess timeout stays the
/// only cancellation primitive; jobs cannot be aborted through here.
///
/// History is bounded: once the registry reaches capacity, the
/// oldest-finished jobs are evicted to make room. Pending jobs are never
/// evicted.
#[derive(Clone)]
pub struct JobRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Job>>>,
    capacity: usize,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub async fn get(&self, job_id: Uuid) -> Option<Job> {
        self.inner.read().await.get(&job_id).cloned()
    }

    /// Register a pending job and spawn the work behind it. The returned id
    /// is immediately pollable.
    pub async fn submit<F>(&self, operation: JobOperation, name: &str, work: F) -> Uuid
    where
        F: Future<Output = ProvisionOutcome> + Send + 'static,
    {
        let job_id = Uuid::new_v4();
        let job = Job {
            job_id,
            name: name.to_string(),
            operation,
            state: JobState::Pending,
            message: None,
            raw_output: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        {
            let mut jobs = self.inner.write().await;
            if jobs.len() >= self.capacity {
                evict_oldest_finished(&mut jobs, self.capacity);
            }
            jobs.insert(job_id, job);
        }

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let outcome = work.await;
            let state = if outcome.success {
                JobState::Succeeded
            } else {
                JobState::Failed
            };

            match state {
                JobState::Succeeded => info!("✅ Job {job_id} finished: {}", outcome.message),
                _ => error!("❌ Job {job_id} failed: {}", outcome.message),
            }

            let mut jobs = inner.write().await;
            if let Some(job) = jobs.get_mut(&job_id) {
                job.state = state;
                job.message = Some(outcome.message);
                job.raw_output = Some(outcome.raw_output);
                job.finished_at = Some(Utc::now());
            }
        });

        job_id
    }
}

/// Drop finished jobs, oldest first, until the map is back under capacity.
fn evict_oldest_finished(jobs: &mut HashMap<Uuid, Job>, capacity: usize) {
    let mut finished: Vec<(Uuid, DateTime<Utc>)> = jobs
        .values()
        .filter_map(|job| job.finished_at.map(|at| (job.job_id, at)))
        .collect();
    finished.sort_by_key(|&(_, at)| at);

    for (evict_id, _) in finished {
        if jobs.len() < capacity {
            break;
        }
        jobs.remove(&evict_id);
    }
}
