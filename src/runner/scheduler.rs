//! Bounded worker pool for unit pipelines
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - FIFO admission of domains as permits free up
//! - Delivering outcomes in completion order over a bounded channel
//! - Turning a panicked unit into an error outcome

use crate::model::UnitOutcome;
use crate::runner::pipeline::Unit;
use crate::SurveyError;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

/// Completed outcomes, yielded in the order units finish
pub struct OutcomeStream {
    rx: mpsc::Receiver<UnitOutcome>,
    expected: usize,
    received: usize,
}

impl OutcomeStream {
    /// Waits for the next completed outcome
    ///
    /// Returns `None` once every submitted unit has been delivered.
    pub async fn next(&mut self) -> Option<UnitOutcome> {
        let outcome = self.rx.recv().await?;
        self.received += 1;
        Some(outcome)
    }

    /// Number of units submitted
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of outcomes delivered so far
    pub fn received(&self) -> usize {
        self.received
    }
}

/// Scheduler runs units with at most `concurrency` in flight
///
/// Each unit holds a semaphore permit from admission until its outcome is
/// produced, so the permit count is the hard limit on concurrent units.
/// Tokio's semaphore is fair, which gives FIFO admission in submission order.
pub struct Scheduler<U> {
    unit: Arc<U>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl<U: Unit + 'static> Scheduler<U> {
    /// Creates a scheduler with `concurrency` slots
    pub fn new(unit: Arc<U>, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        Self {
            unit,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        }
    }

    /// Maximum number of units in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of units currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.concurrency - self.semaphore.available_permits()
    }

    /// Submits one unit per domain and returns the stream of their outcomes
    ///
    /// Submission happens on a background task that blocks while all slots
    /// are busy. The returned stream ends after exactly `domains.len()`
    /// outcomes.
    pub fn submit_all(&self, domains: Vec<String>) -> OutcomeStream {
        let expected = domains.len();
        let (tx, rx) = mpsc::channel(self.concurrency);
        let semaphore = self.semaphore.clone();
        let unit = self.unit.clone();

        tokio::spawn(async move {
            for domain in domains {
                let permit = match semaphore.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        tracing::error!(%domain, "Worker pool closed before admission");
                        let outcome = UnitOutcome::errored(domain, None, "worker pool closed");
                        if tx.send(outcome).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                tracing::trace!(
                    %domain,
                    available = semaphore.available_permits(),
                    "Unit admitted"
                );
                spawn_unit(unit.clone(), domain, permit, tx.clone());
            }
            tracing::debug!("All units submitted");
        });

        OutcomeStream {
            rx,
            expected,
            received: 0,
        }
    }
}

/// Runs one unit on its own task and forwards its outcome
///
/// The permit lives inside the unit task and is released when the unit ends,
/// including by panic. A panicked unit still yields an outcome.
fn spawn_unit<U: Unit + 'static>(
    unit: Arc<U>,
    domain: String,
    permit: OwnedSemaphorePermit,
    tx: mpsc::Sender<UnitOutcome>,
) {
    let name = domain.clone();
    let task = tokio::spawn(async move {
        let _permit = permit;
        unit.run(&domain).await
    });

    tokio::spawn(async move {
        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = SurveyError::Task(e.to_string());
                tracing::error!(domain = %name, error = %err, "Unit task failed");
                UnitOutcome::errored(name, None, err.to_string())
            }
        };

        if tx.send(outcome).await.is_err() {
            tracing::debug!("Outcome receiver dropped");
        }
    });
}
