//! The event loop: read an event, act on it, repeat until `NONE`.

use std::io::{Read, Write};

use anyhow::Context;
use ds_core::{ClientConfig, Dominance};
use ds_placement::{Algorithm, PlacementEngine};
use ds_session::{Event, Session, SessionResult};
use tracing::{error, warn};

/// How a run ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Termination {
    /// The simulator sent `NONE`.
    #[default]
    NoMoreEvents,
    /// The simulator sent `ERR`; the payload is the rest of that line.
    SimulatorError(String),
}

/// What happened during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub scheduled: usize,
    /// Jobs the algorithm found no server for.
    pub skipped: usize,
    pub completed: usize,
    pub unrecognized: usize,
    pub ended_by: Termination,
}

/// Connect, run the simulation to completion, and disconnect.
pub fn run(config: &ClientConfig, algorithm: Algorithm) -> anyhow::Result<RunReport> {
    let mut session = Session::connect(config.address(), &config.username)
        .with_context(|| format!("connecting to simulator at {}", config.address()))?;
    Ok(drive(&mut session, algorithm, config.fit_now)?)
}

/// Drive an established session until the simulator sends `NONE` or `ERR`.
///
/// The session is closed on either, and the report says which one ended
/// the run. Any other failure leaves the session as is and returns
/// immediately.
pub fn drive<S: Read + Write>(
    session: &mut Session<S>,
    algorithm: Algorithm,
    fit_now: Dominance,
) -> SessionResult<RunReport> {
    let mut engine = PlacementEngine::new(algorithm, session.catalog()).with_dominance(fit_now);
    let mut report = RunReport::default();

    loop {
        match session.next_event()? {
            Event::JobArrival(job) => {
                let id = job.id;
                session.submit_job(job)?;
                let choice = session
                    .job(id)
                    .and_then(|job| engine.place(job, session.catalog()));
                match choice {
                    Some(server) => {
                        session.schedule_job(id, server)?;
                        report.scheduled += 1;
                    }
                    None => report.skipped += 1,
                }
            }
            Event::JobCompleted { job, .. } => {
                if session.complete_job(job)?.is_some() {
                    report.completed += 1;
                }
            }
            Event::NoMoreEvents => break,
            Event::SimulatorError(message) => {
                error!(%message, "simulator reported an error");
                if let Err(e) = session.close() {
                    warn!(error = %e, "failed to close session after simulator error");
                }
                report.ended_by = Termination::SimulatorError(message);
                return Ok(report);
            }
            Event::Unrecognized(line) => {
                warn!(%line, "unexpected command");
                report.unrecognized += 1;
            }
        }
    }

    session.close()?;
    Ok(report)
}
