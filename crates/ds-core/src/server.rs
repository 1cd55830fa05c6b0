//! Local server records and capacity accounting.
//!
//! A [`Server`] owns the requirement vectors of the jobs assigned to it and
//! recomputes its free vector from scratch after every change, so `free`
//! always equals `total` minus the sum of those requirements.

use std::collections::BTreeMap;
use std::fmt;

use crate::job::{Job, JobId};
use crate::resources::{Dominance, ResourceVector};

/// A server's identity: its type name plus its index within that type.
///
/// Displays as `"<type> <index>"`, which is also how the wire protocol
/// names a server in `SCHD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServerId {
    pub kind: String,
    pub index: u32,
}

impl ServerId {
    pub fn new(kind: impl Into<String>, index: u32) -> Self {
        Self {
            kind: kind.into(),
            index,
        }
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.index)
    }
}

#[derive(Debug, Clone)]
pub struct Server {
    id: ServerId,
    total: ResourceVector,
    free: ResourceVector,
    /// Informational state string reported by the simulator (`inactive`, `idle`, ...).
    pub status: String,
    /// Boot/start time reported by the simulator; `-1` when not booted.
    pub boot_time: i64,
    jobs: BTreeMap<JobId, ResourceVector>,
}

impl Server {
    pub fn new(id: ServerId, total: ResourceVector) -> Self {
        Self {
            id,
            total,
            free: total,
            status: String::new(),
            boot_time: -1,
            jobs: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_boot_time(mut self, boot_time: i64) -> Self {
        self.boot_time = boot_time;
        self
    }

    pub fn id(&self) -> &ServerId {
        &self.id
    }

    pub fn kind(&self) -> &str {
        &self.id.kind
    }

    pub fn index(&self) -> u32 {
        self.id.index
    }

    pub fn display_name(&self) -> String {
        self.id.to_string()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn total(&self) -> ResourceVector {
        self.total
    }

    pub fn free(&self) -> ResourceVector {
        self.free
    }

    /// Sum of the requirements of the jobs currently assigned here.
    pub fn used(&self) -> ResourceVector {
        let used: ResourceVector = self.jobs.values().copied().sum();
        debug_assert_eq!(used, self.total - self.free);
        used
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn has_job(&self, id: JobId) -> bool {
        self.jobs.contains_key(&id)
    }

    /// Could this server host `job` if it were otherwise empty?
    pub fn can_accept_eventually(&self, job: &Job) -> bool {
        self.total.dominates_weak(&job.requirement)
    }

    /// Does this server have room for `job` right now (weak dominance)?
    pub fn can_accept_now(&self, job: &Job) -> bool {
        self.can_accept_now_with(job, Dominance::Weak)
    }

    pub fn can_accept_now_with(&self, job: &Job, mode: Dominance) -> bool {
        mode.holds(&self.free, &job.requirement)
    }

    /// Bind `job` to this server and recompute free capacity.
    ///
    /// Feasibility is the caller's responsibility. An oversized job drives
    /// `free` negative.
    pub fn assign(&mut self, job: &mut Job) {
        self.jobs.insert(job.id, job.requirement);
        job.bind(self.id.clone());
        self.recompute();
    }

    /// Unbind `job` from this server and recompute free capacity.
    ///
    /// Returns `false` and leaves both sides untouched if the job was not
    /// assigned here.
    pub fn release(&mut self, job: &mut Job) -> bool {
        if self.jobs.remove(&job.id).is_none() {
            return false;
        }
        job.unbind();
        self.recompute();
        true
    }

    fn recompute(&mut self) {
        let used: ResourceVector = self.jobs.values().copied().sum();
        self.free = self.total - used;
    }
}
