//! Per-connection protocol state machine.
//!
//! `Handshake -> Serving -> Closed`. The greeting is sent without reading
//! anything; afterwards each request frame gets exactly one reply, except a
//! frame with bad magic, which closes the session silently.


use std::io::{ErrorKind, Read, Write};

use tracing::{debug, warn};

use crate::error::NbdError;
use crate::nbd::wire::{self, Command, REQUEST_LEN, Reply, Request};
use crate::retention::volume::Volume;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    Handshake,
    Serving,
    Closed,
}

/// SessionStats counts what one session did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SessionStats {
    pub requests: u64,
    pub reads: u64,
    pub failed_reads: u64,
    pub rejected: u64,
    pub bytes_sent: u64,
}

/// Session serves one client over `stream` from its own [`Volume`].
pub struct Session<S> {
    stream: S,
    volume: Volume,
    export_size: u64,
    state: State,
    stats: SessionStats,
}

impl<S: Read + Write> Session<S> {
    pub fn new(stream: S, volume: Volume, export_size: u64) -> Self {
        Self {
            stream,
            volume,
            export_size,
            state: State::Handshake,
            stats: SessionStats::default(),
        }
    }

    pub const fn state(&self) -> State {
        self.state
    }

    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    pub const fn volume(&self) -> &Volume {
        &self.volume
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Runs the session until the peer goes away or a frame is invalid.
    ///
    /// A clean end of stream between or inside frames is a normal close.
    /// The session is `Closed` afterwards whatever the outcome.
    ///
    /// # Errors
    /// [`NbdError::BadMagic`] when a request carries the wrong magic, or
    /// [`NbdError::Io`] when the transport fails.
    pub fn run(&mut self) -> Result<(), NbdError> {
        let res = self.drive();
        self.state = State::Closed;
        res
    }

    fn drive(&mut self) -> Result<(), NbdError> {
        loop {
            match self.state {
                State::Handshake => {
                    self.stream.write_all(&wire::handshake(self.export_size))?;
                    self.stream.flush()?;
                    self.state = State::Serving;
                }
                State::Serving => match self.next_request()? {
                    Some(req) => self.dispatch(&req)?,
                    None => self.state = State::Closed,
                },
                State::Closed => return Ok(()),
            }
        }
    }

    fn next_request(&mut self) -> Result<Option<Request>, NbdError> {
        let mut buf = [0u8; REQUEST_LEN];
        match self.stream.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let req = Request::decode(&buf);
        if !req.has_valid_magic() {
            warn!("invalid request magic {:#010x}, dropping connection", req.magic);
            return Err(NbdError::BadMagic(req.magic));
        }
        Ok(Some(req))
    }

    fn dispatch(&mut self, req: &Request) -> Result<(), NbdError> {
        self.stats.requests += 1;
        if req.command == Command::Read {
            return self.serve_read(req);
        }

        self.stats.rejected += 1;
        debug!(command = ?req.command, "rejecting command on read-only export");
        send(
            &mut self.stream,
            Reply::error(wire::STATUS_EPERM, req.handle),
            &[],
        )
    }

    fn serve_read(&mut self, req: &Request) -> Result<(), NbdError> {
        self.stats.reads += 1;
        let len = usize::try_from(req.length).unwrap_or(usize::MAX);

        match self.volume.read_range(req.offset, len) {
            Ok(data) => {
                self.stats.bytes_sent += data.len() as u64;
                send(&mut self.stream, Reply::ok(req.handle), data)
            }
            Err(err) => {
                self.stats.failed_reads += 1;
                warn!(offset = req.offset, length = req.length, %err, "read failed");
                send(
                    &mut self.stream,
                    Reply::error(wire::STATUS_EINVAL, req.handle),
                    &[],
                )
            }
        }
    }
}

fn send<W: Write>(w: &mut W, reply: Reply, payload: &[u8]) -> Result<(), NbdError> {
    w.write_all(&reply.encode())?;
    if !payload.is_empty() {
        w.write_all(payload)?;
    }
    w.flush()?;
    Ok(())
}
