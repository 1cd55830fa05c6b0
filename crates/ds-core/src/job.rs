//! Local job records.

use crate::resources::ResourceVector;
use crate::server::ServerId;

/// Job identifier, assigned by the simulator.
pub type JobId = u32;

/// How a job reached the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalKind {
    /// First submission (`JOBN`).
    New,
    /// Re-queued by the simulator (`JOBP`).
    Resubmitted,
}

/// A job as last described by the simulator, plus where it runs locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    /// Simulation time at which the job was submitted.
    pub submit_time: u64,
    /// Runtime estimate from the submission line, when the simulator sends one.
    pub estimated_runtime: Option<u64>,
    pub requirement: ResourceVector,
    pub kind: ArrivalKind,
    /// The server this job is assigned to, if any.
    server: Option<ServerId>,
}

impl Job {
    pub fn new(id: JobId, submit_time: u64, requirement: ResourceVector) -> Self {
        Self {
            id,
            submit_time,
            estimated_runtime: None,
            requirement,
            kind: ArrivalKind::New,
            server: None,
        }
    }

    pub fn with_estimated_runtime(mut self, runtime: u64) -> Self {
        self.estimated_runtime = Some(runtime);
        self
    }

    pub fn with_kind(mut self, kind: ArrivalKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn server(&self) -> Option<&ServerId> {
        self.server.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.server.is_some()
    }

    /// Only [`Server::assign`](crate::Server::assign) and
    /// [`Server::release`](crate::Server::release) move the binding, so the
    /// two sides cannot disagree.
    pub(crate) fn bind(&mut self, server: ServerId) {
        self.server = Some(server);
    }

    pub(crate) fn unbind(&mut self) {
        self.server = None;
    }
}
