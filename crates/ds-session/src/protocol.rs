//! ds-sim line protocol.
//!
//! One ASCII message per line, fields separated by spaces. Requests are
//! rendered with [`Request`]'s `Display`; replies are parsed by the free
//! functions below.

use std::fmt;
use std::str::FromStr;

use ds_core::{ArrivalKind, Job, JobId, ResourceVector, Server, ServerId};

use crate::error::ProtocolError;

// ── Requests ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Helo,
    Auth(String),
    Redy,
    GetsAll,
    Ok,
    Schd { job: JobId, server: ServerId },
    Quit,
}

impl Request {
    /// Short name used in diagnostics when no reply arrives.
    pub fn keyword(&self) -> &'static str {
        match self {
            Request::Helo => "HELO",
            Request::Auth(_) => "AUTH",
            Request::Redy => "REDY",
            Request::GetsAll => "GETS",
            Request::Ok => "OK",
            Request::Schd { .. } => "SCHD",
            Request::Quit => "QUIT",
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Auth(user) => write!(f, "AUTH {user}"),
            Request::GetsAll => f.write_str("GETS All"),
            Request::Schd { job, server } => write!(f, "SCHD {job} {server}"),
            other => f.write_str(other.keyword()),
        }
    }
}

// ── Events ─────────────────────────────────────────────────────────

/// One reply to `REDY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `JOBN` / `JOBP`: a job needs a server.
    JobArrival(Job),
    /// `JCPL`: a job finished on the named server.
    JobCompleted {
        time: u64,
        job: JobId,
        server: ServerId,
    },
    /// `NONE`: the simulation is over.
    NoMoreEvents,
    /// `ERR ...`: the simulator gave up.
    SimulatorError(String),
    /// Any other keyword. Carries the whole line.
    Unrecognized(String),
}

/// Parse a reply to `REDY`.
///
/// Unknown keywords are not an error; a known keyword with missing or
/// non-numeric fields is.
pub fn parse_event(line: &str) -> Result<Event, ProtocolError> {
    let fields = Fields::new(line);
    match fields.keyword() {
        "JOBN" => parse_job(&fields, ArrivalKind::New).map(Event::JobArrival),
        "JOBP" => parse_job(&fields, ArrivalKind::Resubmitted).map(Event::JobArrival),
        "JCPL" => Ok(Event::JobCompleted {
            time: fields.int(1, "endTime")?,
            job: fields.int(2, "jobID")?,
            server: ServerId::new(fields.text(3, "serverType")?, fields.int(4, "serverID")?),
        }),
        "NONE" => Ok(Event::NoMoreEvents),
        "ERR" => Ok(Event::SimulatorError(
            line.trim().strip_prefix("ERR").unwrap_or_default().trim().to_string(),
        )),
        _ => Ok(Event::Unrecognized(line.to_string())),
    }
}

/// `JOBN submitTime jobID estRuntime core memory disk`
fn parse_job(fields: &Fields<'_>, kind: ArrivalKind) -> Result<Job, ProtocolError> {
    let job = Job::new(
        fields.int(2, "jobID")?,
        fields.int(1, "submitTime")?,
        fields.resources(4)?,
    )
    .with_kind(kind);

    // The runtime estimate is informational only.
    Ok(match fields.get(3).and_then(|v| v.parse().ok()) {
        Some(runtime) => job.with_estimated_runtime(runtime),
        None => job,
    })
}

/// Parse the `DATA nRecs recLen` header of a bulk reply, returning `nRecs`.
pub fn parse_data_header(line: &str) -> Result<usize, ProtocolError> {
    let fields = Fields::new(line);
    if fields.keyword() != "DATA" {
        return Err(ProtocolError::UnexpectedReply {
            expected: "DATA header",
            line: line.to_string(),
        });
    }
    fields.int(1, "nRecs")
}

/// Parse one `GETS` record: `type id state curStartTime core memory disk ...`.
pub fn parse_server_record(line: &str) -> Result<Server, ProtocolError> {
    let fields = Fields::new(line);
    let id = ServerId::new(fields.text(0, "serverType")?, fields.int(1, "serverID")?);
    let status = fields.text(2, "state")?;
    let boot_time = fields.get(3).and_then(|v| v.parse().ok()).unwrap_or(-1);

    Ok(Server::new(id, fields.resources(4)?)
        .with_status(status)
        .with_boot_time(boot_time))
}

// ── Field access ───────────────────────────────────────────────────

struct Fields<'a> {
    line: &'a str,
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            parts: line.split_whitespace().collect(),
        }
    }

    fn keyword(&self) -> &'a str {
        self.parts.first().copied().unwrap_or_default()
    }

    fn get(&self, position: usize) -> Option<&'a str> {
        self.parts.get(position).copied()
    }

    fn text(&self, position: usize, field: &'static str) -> Result<&'a str, ProtocolError> {
        self.get(position).ok_or_else(|| ProtocolError::MissingField {
            line: self.line.to_string(),
            field,
            position,
        })
    }

    fn int<T: FromStr>(&self, position: usize, field: &'static str) -> Result<T, ProtocolError> {
        let value = self.text(position, field)?;
        value.parse().map_err(|_| ProtocolError::InvalidInteger {
            line: self.line.to_string(),
            field,
            value: value.to_string(),
        })
    }

    /// Three consecutive fields starting at `start`: cores, memory, disk.
    fn resources(&self, start: usize) -> Result<ResourceVector, ProtocolError> {
        Ok(ResourceVector::new(
            self.int(start, "core")?,
            self.int(start + 1, "memory")?,
            self.int(start + 2, "disk")?,
        ))
    }
}
