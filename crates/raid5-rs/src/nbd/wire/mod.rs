//! Byte-exact frames of the old-style NBD handshake and transmission phase.
//!
//! Every integer is big-endian. The request handle is opaque and copied
//! through untouched.

#[cfg(test)]
mod wire_tests;

/// Leading 8 bytes of the handshake.
pub const INIT_PASSWD: [u8; 8] = *b"NBDMAGIC";
/// Old-style negotiation magic.
pub const INIT_MAGIC: u64 = 0x0042_0281_8612_53;
pub const REQUEST_MAGIC: u32 = 0x2560_9513;
pub const REPLY_MAGIC: u32 = 0x6744_6698;

pub const HANDSHAKE_LEN: usize = 152;
pub const REQUEST_LEN: usize = 28;
pub const REPLY_LEN: usize = 16;

/// Status codes carried in replies.
pub const STATUS_OK: u32 = 0;
pub const STATUS_EPERM: u32 = libc::EPERM.unsigned_abs();
pub const STATUS_EINVAL: u32 = libc::EINVAL.unsigned_abs();

/// `handshake` encodes the server greeting announcing `export_size` bytes.
///
/// Layout: passwd(8) ‖ magic(8) ‖ size(8) ‖ flags(4, zero) ‖ reserved(124, zero).
#[must_use]
pub fn handshake(export_size: u64) -> [u8; HANDSHAKE_LEN] {
    let mut out = [0u8; HANDSHAKE_LEN];
    out[0..8].copy_from_slice(&INIT_PASSWD);
    out[8..16].copy_from_slice(&INIT_MAGIC.to_be_bytes());
    out[16..24].copy_from_slice(&export_size.to_be_bytes());
    // Flags and the reserved tail stay zero.
    out
}

/// Command is the request type field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Read,
    Write,
    Disconnect,
    Flush,
    Trim,
    Unknown(u32),
}

impl From<u32> for Command {
    fn from(v: u32) -> Self {
        match v {
            0 => Self::Read,
            1 => Self::Write,
            2 => Self::Disconnect,
            3 => Self::Flush,
            4 => Self::Trim,
            other => Self::Unknown(other),
        }
    }
}

impl From<Command> for u32 {
    fn from(c: Command) -> Self {
        match c {
            Command::Read => 0,
            Command::Write => 1,
            Command::Disconnect => 2,
            Command::Flush => 3,
            Command::Trim => 4,
            Command::Unknown(other) => other,
        }
    }
}

/// Request is one decoded 28-byte request frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Request {
    pub magic: u32,
    pub command: Command,
    pub handle: [u8; 8],
    pub offset: u64,
    pub length: u32,
}

impl Request {
    /// Decodes a frame without validating the magic.
    #[must_use]
    pub fn decode(buf: &[u8; REQUEST_LEN]) -> Self {
        let mut handle = [0u8; 8];
        handle.copy_from_slice(&buf[8..16]);
        Self {
            magic: u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
            command: Command::from(u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]])),
            handle,
            offset: u64::from_be_bytes([
                buf[16], buf[17], buf[18], buf[19], buf[20], buf[21], buf[22], buf[23],
            ]),
            length: u32::from_be_bytes([buf[24], buf[25], buf[26], buf[27]]),
        }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; REQUEST_LEN] {
        let mut out = [0u8; REQUEST_LEN];
        out[0..4].copy_from_slice(&self.magic.to_be_bytes());
        out[4..8].copy_from_slice(&u32::from(self.command).to_be_bytes());
        out[8..16].copy_from_slice(&self.handle);
        out[16..24].copy_from_slice(&self.offset.to_be_bytes());
        out[24..28].copy_from_slice(&self.length.to_be_bytes());
        out
    }

    #[must_use]
    pub const fn has_valid_magic(&self) -> bool {
        self.magic == REQUEST_MAGIC
    }
}

/// Reply is the 16-byte header sent back for every served request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reply {
    pub status: u32,
    pub handle: [u8; 8],
}

impl Reply {
    #[must_use]
    pub const fn ok(handle: [u8; 8]) -> Self {
        Self {
            status: STATUS_OK,
            handle,
        }
    }

    #[must_use]
    pub const fn error(status: u32, handle: [u8; 8]) -> Self {
        Self { status, handle }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; REPLY_LEN] {
        let mut out = [0u8; REPLY_LEN];
        out[0..4].copy_from_slice(&REPLY_MAGIC.to_be_bytes());
        out[4..8].copy_from_slice(&self.status.to_be_bytes());
        out[8..16].copy_from_slice(&self.handle);
        out
    }

    /// Decodes a reply header, returning `None` if the magic is wrong.
    #[must_use]
    pub fn decode(buf: &[u8; REPLY_LEN]) -> Option<Self> {
        if u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) != REPLY_MAGIC {
            return None;
        }
        let mut handle = [0u8; 8];
        handle.copy_from_slice(&buf[8..16]);
        Some(Self {
            status: u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
            handle,
        })
    }
}
