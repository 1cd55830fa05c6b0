//! Placement engine, one per session.
//!
//! Holds the chosen [`Algorithm`] together with the state that outlives a
//! single decision (the round-robin cursor). The engine reads the catalog
//! but never mutates it.

use ds_core::{Catalog, Dominance, Job};
use tracing::{debug, warn};

use crate::algorithm::Algorithm;
use crate::policy;
use crate::round_robin::LargestRoundRobin;

#[derive(Debug, Clone)]
pub struct PlacementEngine {
    algorithm: Algorithm,
    /// Ordering used for every "fits now" test.
    fit_now: Dominance,
    lrr: LargestRoundRobin,
}

impl PlacementEngine {
    /// Build the engine for a session whose catalog has just been fetched.
    pub fn new(algorithm: Algorithm, catalog: &Catalog) -> Self {
        let lrr = LargestRoundRobin::new(catalog);
        if algorithm == Algorithm::LargestRoundRobin {
            debug!(servers = lrr.servers().len(), "largest-type rotation prepared");
        }
        Self {
            algorithm,
            fit_now: Dominance::Weak,
            lrr,
        }
    }

    pub fn with_dominance(mut self, fit_now: Dominance) -> Self {
        self.fit_now = fit_now;
        self
    }

    pub fn dominance(&self) -> Dominance {
        self.fit_now
    }

    /// Choose a server for `job`, returning its catalog position.
    ///
    /// `None` means no server was selected and the job should be left
    /// unplaced.
    pub fn place(&mut self, job: &Job, catalog: &Catalog) -> Option<usize> {
        let mode = self.fit_now;
        let chosen = match self.algorithm {
            Algorithm::FairFirstFit => policy::fair_first_fit(job, catalog, mode),
            Algorithm::FirstFit => policy::first_fit(job, catalog, mode),
            Algorithm::FirstCapable => policy::first_capable(job, catalog),
            Algorithm::BestFit => policy::best_fit(job, catalog, mode),
            Algorithm::WorstFit => policy::worst_fit(job, catalog, mode),
            Algorithm::LargestRoundRobin => self.lrr.next(),
        };

        match chosen.and_then(|pos| catalog.get(pos)) {
            Some(server) => debug!(
                job = job.id,
                server = %server.id(),
                algorithm = %self.algorithm,
                "placement chosen"
            ),
            None => warn!(
                job = job.id,
                requirement = %job.requirement,
                algorithm = %self.algorithm,
                "no server selected"
            ),
        }
        chosen
    }
}
