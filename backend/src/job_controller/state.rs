//! Manages the state of background import jobs.
//!
//! Uploads are imported outside the request/response cycle (see
//! `services/imports/upload.rs`); clients poll
//! `/api/imports/status/{job_id}` for the outcome.
//!
//! The main components are:
//! - `JobsState`: A clonable, thread-safe struct that holds the shared state of all jobs.
//!   It is injected into the Actix application state in `main.rs`.
//! - `JobUpdate`: A message sent by a running job to report a status change.
//! - `start_job_updater`: A long-running task that applies `JobUpdate` messages
//!   received on an MPSC channel to the shared `JobsState`.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

/// A thread-safe, shareable container for the state of all background jobs.
#[derive(Clone)]
pub struct JobsState {
    /// Job ID to its latest `JobStatus`. Read by the status endpoint, written
    /// by the upload handler (registration) and `start_job_updater`.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Sender used by running jobs to report progress without holding the
    /// `jobs` lock themselves.
    pub tx: mpsc::Sender<JobUpdate>,
}

/// A status update for one background job.
#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// Applies job updates until every sender is dropped.
///
/// Spawned once from `main.rs`. A `Completed` or `Failed` status is final:
/// updates arriving after it for the same job are ignored.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        let finished = matches!(
            jobs.get(&update.job_id),
            Some(JobStatus::Completed(_) | JobStatus::Failed(_))
        );
        if !finished {
            jobs.insert(update.job_id, update.status);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn final_status_is_not_overwritten() {
        let (tx, rx) = mpsc::channel(8);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx: tx.clone(),
        };

        for status in [
            JobStatus::InProgress(0),
            JobStatus::Failed("boom".to_string()),
            JobStatus::InProgress(50),
        ] {
            tx.send(JobUpdate {
                job_id: "job".to_string(),
                status,
            })
            .await
            .unwrap();
        }
        drop(tx);
        // `state` holds a sender too, so the updater never finishes on its own.
        let handle = tokio::spawn(start_job_updater(state.clone(), rx));
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        handle.abort();

        assert_eq!(
            state.jobs.read().await.get("job"),
            Some(&JobStatus::Failed("boom".to_string()))
        );
    }
}
