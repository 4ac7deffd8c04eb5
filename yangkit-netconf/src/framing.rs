//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;

// End-of-message marker (RFC 6242, section 4.3).
pub const EOM_MARKER: &[u8] = b"]]>]]>";

// Largest chunk size allowed by RFC 6242.
const CHUNK_SIZE_MAX: u64 = 4294967295;
const CHUNK_SIZE_DIGITS_MAX: usize = 10;

// Message delimiting mechanism.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Serialize)]
pub enum Framing {
    // base:1.0 (and every hello message).
    EndOfMessage,
    // base:1.1.
    Chunked,
}

// Incremental message decoder.
#[derive(Debug)]
pub struct FrameDecoder {
    framing: Framing,
    buf: BytesMut,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FramingError {
    InvalidChunkHeader,
    InvalidChunkSize,
    EmptyMessage,
}

// ===== impl Framing =====

impl Framing {
    // Frames a complete message.
    pub fn encode(&self, msg: &[u8]) -> Bytes {
        let mut buf = BytesMut::with_capacity(msg.len() + 16);
        match self {
            Framing::EndOfMessage => {
                buf.put_slice(msg);
                buf.put_slice(EOM_MARKER);
            }
            Framing::Chunked => {
                // Large messages are split so every chunk size stays within
                // the allowed range.
                for chunk in msg.chunks(CHUNK_SIZE_MAX as usize) {
                    buf.put_slice(format!("\n#{}\n", chunk.len()).as_bytes());
                    buf.put_slice(chunk);
                }
                buf.put_slice(b"\n##\n");
            }
        }
        buf.freeze()
    }
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Framing::EndOfMessage => write!(f, "end-of-message"),
            Framing::Chunked => write!(f, "chunked"),
        }
    }
}

// ===== impl FrameDecoder =====

impl FrameDecoder {
    pub fn new(framing: Framing) -> FrameDecoder {
        FrameDecoder {
            framing,
            buf: BytesMut::with_capacity(8192),
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    // Switches the framing mode. Bytes already buffered are decoded using
    // the new mode.
    pub fn set_framing(&mut self, framing: Framing) {
        self.framing = framing;
    }

    pub fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }

    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    // Returns the next complete message, or `None` if more input is needed.
    // Incomplete frames are left in the buffer untouched.
    pub fn decode(&mut self) -> Result<Option<Bytes>, FramingError> {
        match self.framing {
            Framing::EndOfMessage => Ok(self.decode_eom()),
            Framing::Chunked => self.decode_chunked(),
        }
    }

    fn decode_eom(&mut self) -> Option<Bytes> {
        let pos = self
            .buf
            .windows(EOM_MARKER.len())
            .position(|window| window == EOM_MARKER)?;
        let msg = self.buf.split_to(pos).freeze();
        self.buf.advance(EOM_MARKER.len());
        Some(msg)
    }

    fn decode_chunked(&mut self) -> Result<Option<Bytes>, FramingError> {
        match parse_chunks(&self.buf)? {
            Some((consumed, msg)) => {
                self.buf.advance(consumed);
                Ok(Some(msg))
            }
            None => Ok(None),
        }
    }
}

// ===== impl FramingError =====

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FramingError::InvalidChunkHeader => {
                write!(f, "invalid chunk header")
            }
            FramingError::InvalidChunkSize => {
                write!(f, "invalid chunk size")
            }
            FramingError::EmptyMessage => {
                write!(f, "end-of-chunks marker without any chunk")
            }
        }
    }
}

impl std::error::Error for FramingError {}

// ===== helper functions =====

// Parses one chunked message from the start of `buf`.
//
// Returns the number of bytes consumed and the reassembled message, or
// `None` when the message isn't complete yet.
fn parse_chunks(buf: &[u8]) -> Result<Option<(usize, Bytes)>, FramingError> {
    let mut msg = BytesMut::new();
    let mut pos = 0;

    loop {
        // Every chunk and the end-of-chunks marker start with LF HASH.
        match buf.get(pos..pos + 2) {
            None => {
                if buf[pos..].iter().any(|b| *b != b'\n') {
                    return Err(FramingError::InvalidChunkHeader);
                }
                return Ok(None);
            }
            Some(b"\n#") => pos += 2,
            Some(_) => return Err(FramingError::InvalidChunkHeader),
        }

        // End-of-chunks: LF HASH HASH LF.
        match buf.get(pos) {
            None => return Ok(None),
            Some(b'#') => match buf.get(pos + 1) {
                None => return Ok(None),
                Some(b'\n') => {
                    if msg.is_empty() {
                        return Err(FramingError::EmptyMessage);
                    }
                    return Ok(Some((pos + 2, msg.freeze())));
                }
                Some(_) => return Err(FramingError::InvalidChunkHeader),
            },
            Some(_) => (),
        }

        // Chunk size: 1 to 4294967295, no leading zeros, followed by LF.
        let digits = buf[pos..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits > CHUNK_SIZE_DIGITS_MAX {
            return Err(FramingError::InvalidChunkSize);
        }
        match buf.get(pos + digits) {
            None => return Ok(None),
            Some(b'\n') => (),
            Some(_) => return Err(FramingError::InvalidChunkHeader),
        }
        let size_str = &buf[pos..pos + digits];
        if size_str.is_empty() || size_str[0] == b'0' {
            return Err(FramingError::InvalidChunkSize);
        }
        let size = std::str::from_utf8(size_str)
            .ok()
            .and_then(|size| size.parse::<u64>().ok())
            .filter(|size| *size <= CHUNK_SIZE_MAX)
            .ok_or(FramingError::InvalidChunkSize)?;
        pos += digits + 1;

        let size = size as usize;
        if buf.len() < pos + size {
            return Ok(None);
        }
        msg.put_slice(&buf[pos..pos + size]);
        pos += size;
    }
}

// ===== unit tests =====
