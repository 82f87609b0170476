use crate::data::{Problem, SolveResponse};
use crate::error::{PlannerError, Result};
use log::{info, warn};
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Client for the remote timetabling service.
///
/// Submissions are serialized per client: while one request is outstanding, a
/// second [`solve`](Self::solve) fails with [`PlannerError::SubmissionInFlight`]
/// without touching the network.
#[derive(Debug)]
pub struct SolverClient {
    client: Client,
    endpoint: String,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SolverClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/solve", base_url.trim_end_matches('/')),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Posts the problem and decodes the solver's answer.
    ///
    /// A non-success status yields [`PlannerError::Server`] carrying the response
    /// text verbatim. Nothing is retried.
    pub async fn solve(&self, problem: &Problem) -> Result<SolveResponse> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("rejected solve submission: previous request still outstanding");
            return Err(PlannerError::SubmissionInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let start_time = Instant::now();
        info!(
            "Submitting problem with {} courses, {} rooms, and {} time slots to {}",
            problem.courses.len(),
            problem.rooms.len(),
            problem.time_slots.len(),
            self.endpoint
        );
        let response = self.client.post(&self.endpoint).json(problem).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            warn!("solver answered {status}");
            return Err(PlannerError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let result: SolveResponse = response.json().await?;
        info!(
            "Solution received in {:.2?}: {} assignments, cost {}",
            start_time.elapsed(),
            result.schedule.assignments.len(),
            result.cost
        );
        Ok(result)
    }
}
