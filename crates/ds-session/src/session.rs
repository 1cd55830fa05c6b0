//! The session state machine.
//!
//! Every exchange is a blocking write of one request line followed by a
//! blocking read of one reply line. There is no timeout, retry or
//! reconnect: any failure is returned to the caller and ends the run.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use ds_core::{Catalog, Job, JobId};
use tracing::{debug, info, trace, warn};

use crate::error::{SessionError, SessionResult};
use crate::protocol::{self, Event, Request};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// `HELO` / `AUTH` / first `REDY` in progress.
    Handshaking,
    /// `GETS All` done, catalog populated.
    CatalogFetched,
    /// Idle between events.
    Ready,
    /// A `REDY` has been sent and its reply not yet read.
    AwaitingEvent,
    /// `QUIT` sent; the connection is gone.
    Closed,
}

pub struct Session<S: Read + Write = TcpStream> {
    /// `None` once the session is closed.
    conn: Option<BufReader<S>>,
    state: SessionState,
    /// The reply to the handshake's `REDY`, handed out by the first
    /// [`next_event`](Self::next_event) call.
    pending: Option<String>,
    jobs: HashMap<JobId, Job>,
    catalog: Catalog,
}

impl Session<TcpStream> {
    /// Connect to a simulator and run the handshake.
    pub fn connect(addr: impl ToSocketAddrs, username: &str) -> SessionResult<Self> {
        let stream = TcpStream::connect(addr)?;
        let _ = stream.set_nodelay(true);
        debug!(peer = ?stream.peer_addr().ok(), "connected to simulator");
        Session::handshake(stream, username)
    }
}

impl<S: Read + Write> Session<S> {
    /// Run the handshake over an established stream.
    ///
    /// Sends `HELO` and `AUTH`, both of which must be acknowledged with
    /// `OK`; sends `REDY` and holds its reply back as the first event; then
    /// fetches the server catalog with `GETS All`.
    pub fn handshake(stream: S, username: &str) -> SessionResult<Self> {
        let mut session = Session {
            conn: Some(BufReader::new(stream)),
            state: SessionState::Handshaking,
            pending: None,
            jobs: HashMap::new(),
            catalog: Catalog::default(),
        };

        session.expect_ok(Request::Helo)?;
        session.expect_ok(Request::Auth(username.to_string()))?;
        session.pending = Some(session.exchange(&Request::Redy)?);

        session.fetch_servers()?;
        session.state = SessionState::Ready;

        info!(
            user = username,
            servers = session.catalog.len(),
            "session established"
        );
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.get(&id)
    }

    /// Number of jobs the session currently tracks.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    // ── Verbs ──────────────────────────────────────────────────────

    /// Ask for the next simulation event (`REDY`).
    ///
    /// The first call after the handshake returns the held-back reply
    /// without touching the wire.
    pub fn next_event(&mut self) -> SessionResult<Event> {
        self.require_ready("request next event")?;

        let line = match self.pending.take() {
            Some(line) => line,
            None => {
                self.state = SessionState::AwaitingEvent;
                let line = self.exchange(&Request::Redy)?;
                self.state = SessionState::Ready;
                line
            }
        };
        Ok(protocol::parse_event(&line)?)
    }

    /// Record an arriving job in the local table.
    ///
    /// A resubmitted job that is still bound to a server is released from
    /// it first, so the server's free capacity stays exact.
    pub fn submit_job(&mut self, job: Job) -> SessionResult<()> {
        self.require_ready("submit job")?;
        if let Some(mut previous) = self.jobs.remove(&job.id) {
            detach(&mut self.catalog, &mut previous);
        }
        debug!(job = job.id, kind = ?job.kind, requirement = %job.requirement, "job registered");
        self.jobs.insert(job.id, job);
        Ok(())
    }

    /// Commit a placement: send `SCHD` and, once acknowledged, assign the
    /// job to the server at catalog position `server`.
    pub fn schedule_job(&mut self, job_id: JobId, server: usize) -> SessionResult<()> {
        self.require_ready("schedule job")?;

        let server_id = self
            .catalog
            .get(server)
            .ok_or(SessionError::UnknownServer(server))?
            .id()
            .clone();
        if !self.jobs.contains_key(&job_id) {
            return Err(SessionError::UnknownJob(job_id));
        }

        self.expect_ok(Request::Schd {
            job: job_id,
            server: server_id.clone(),
        })?;

        if let Some(job) = self.jobs.get_mut(&job_id) {
            detach(&mut self.catalog, job);
            if let Some(target) = self.catalog.get_mut(server) {
                target.assign(job);
            }
        }
        debug!(job = job_id, server = %server_id, "job scheduled");
        Ok(())
    }

    /// Handle a completion: release the job from its server and forget it.
    ///
    /// Returns the completed job, or `None` if the id was never registered
    /// (e.g. a job that was left unplaced).
    pub fn complete_job(&mut self, job_id: JobId) -> SessionResult<Option<Job>> {
        self.require_ready("complete job")?;
        let Some(mut job) = self.jobs.remove(&job_id) else {
            warn!(job = job_id, "completion for unknown job ignored");
            return Ok(None);
        };
        detach(&mut self.catalog, &mut job);
        debug!(job = job_id, "job completed");
        Ok(Some(job))
    }

    /// Send `QUIT` and drop the connection.
    ///
    /// The reply is read but not checked; a simulator that hangs up first
    /// is not an error.
    pub fn close(&mut self) -> SessionResult<()> {
        if self.state == SessionState::Closed {
            return Err(SessionError::InvalidState {
                operation: "close",
                state: self.state,
            });
        }

        match self.exchange(&Request::Quit) {
            Ok(_) | Err(SessionError::ConnectionClosed { .. }) => {}
            Err(e) => return Err(e),
        }
        self.conn = None;
        self.state = SessionState::Closed;
        info!(jobs_outstanding = self.jobs.len(), "session closed");
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    /// `GETS All`, then `OK`, then `nRecs` records, then a final `OK`.
    fn fetch_servers(&mut self) -> SessionResult<()> {
        let header = self.exchange(&Request::GetsAll)?;
        let count = protocol::parse_data_header(&header)?;

        self.send(&Request::Ok)?;
        let mut servers = Vec::with_capacity(count);
        for _ in 0..count {
            let line = self.receive("server record")?;
            servers.push(protocol::parse_server_record(&line)?);
        }
        self.exchange(&Request::Ok)?;

        self.catalog = Catalog::new(servers);
        self.state = SessionState::CatalogFetched;
        debug!(servers = self.catalog.len(), "server catalog fetched");
        Ok(())
    }

    fn require_ready(&self, operation: &'static str) -> SessionResult<()> {
        if self.state == SessionState::Ready {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn expect_ok(&mut self, request: Request) -> SessionResult<()> {
        let response = self.exchange(&request)?;
        if response != "OK" {
            return Err(SessionError::Rejected {
                request: request.to_string(),
                response,
            });
        }
        Ok(())
    }

    fn exchange(&mut self, request: &Request) -> SessionResult<String> {
        self.send(request)?;
        self.receive(request.keyword())
    }

    fn send(&mut self, request: &Request) -> SessionResult<()> {
        let stream = self.stream()?.get_mut();
        stream.write_all(format!("{request}\n").as_bytes())?;
        stream.flush()?;
        trace!(message = %request, "sent");
        Ok(())
    }

    /// Read one reply line, without trailing whitespace.
    fn receive(&mut self, expecting: &'static str) -> SessionResult<String> {
        let mut line = String::new();
        if self.stream()?.read_line(&mut line)? == 0 {
            return Err(SessionError::ConnectionClosed { expecting });
        }
        let line = line.trim_end().to_string();
        trace!(message = %line, "received");
        Ok(line)
    }

    fn stream(&mut self) -> SessionResult<&mut BufReader<S>> {
        let state = self.state;
        self.conn.as_mut().ok_or(SessionError::InvalidState {
            operation: "use connection",
            state,
        })
    }
}

/// Release `job` from whichever server it is bound to, if any.
fn detach(catalog: &mut Catalog, job: &mut Job) {
    let Some(server_id) = job.server().cloned() else {
        return;
    };
    match catalog.find_mut(&server_id) {
        Some(server) => {
            server.release(job);
        }
        None => warn!(job = job.id, server = %server_id, "job bound to unknown server"),
    }
}

