//! ds-session: one synchronous conversation with a ds-sim server.
//!
//! The session owns the TCP connection, speaks the line protocol, and keeps
//! the local job table and server catalog consistent with what the
//! simulator has been told.
//!
//! # Lifecycle
//!
//! ```text
//! connect
//!   └── HANDSHAKING     HELO / AUTH / REDY (reply held back)
//!       └── CATALOG_FETCHED   GETS All
//!           └── READY ⇄ AWAITING_EVENT   REDY, SCHD
//!               └── CLOSED    QUIT
//! ```

pub mod error;
pub mod protocol;
pub mod session;

pub use error::{ProtocolError, SessionError, SessionResult};
pub use protocol::{Event, Request};
pub use session::{Session, SessionState};
