//! Message envelope: a 5-byte header followed by the payload.
//!
//! ```text
//! [message_id: u8][payload_size: u32 LE][payload ...]
//! ```
//!
//! Frames are written and parsed in place; parsing borrows the payload from
//! the input buffer.

use messgen_buffers::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::codec::{Decode, Encode};
use crate::error::CodecError;
use crate::protocol::{Dispatch, DispatchIn, Protocol};

pub const HEADER_SIZE: usize = 5;

/// Largest payload the `u32` size field can describe.
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    pub message_id: u8,
    pub payload_size: u32,
}

impl Encode for MessageHeader {
    #[inline]
    fn serialized_size(&self) -> usize {
        HEADER_SIZE
    }

    fn encode(&self, w: &mut Writer<'_>) {
        w.u8(self.message_id);
        w.u32(self.payload_size);
    }
}

impl<'de> Decode<'de> for MessageHeader {
    fn decode(r: &mut Reader<'de>) -> Result<Self, CodecError> {
        Ok(Self {
            message_id: r.u8()?,
            payload_size: r.u32()?,
        })
    }
}

/// Limits applied when parsing frames from untrusted input.
///
/// Deserializable so it can sit in a service's config file; missing fields
/// take their defaults.
///
/// ```
/// use messgen::envelope::FrameLimits;
///
/// let limits: FrameLimits = serde_json::from_str(r#"{"max_payload_size": 4096}"#).unwrap();
/// assert_eq!(limits.max_payload_size, 4096);
/// let defaults: FrameLimits = serde_json::from_str("{}").unwrap();
/// assert_eq!(defaults, FrameLimits::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLimits {
    /// Frames announcing a larger payload are rejected before the payload
    /// is read.
    pub max_payload_size: usize,
}

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
        }
    }
}

impl FrameLimits {
    pub fn check(&self, size: usize) -> Result<(), CodecError> {
        let limit = self.max_payload_size.min(MAX_PAYLOAD_SIZE);
        if size > limit {
            return Err(CodecError::PayloadTooLarge { size, limit });
        }
        Ok(())
    }
}

/// One parsed frame, borrowing its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub header: MessageHeader,
    pub payload: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Parses the frame at the front of `buf`, returning it with the total
    /// number of bytes it occupies.
    pub fn parse(buf: &'a [u8], limits: &FrameLimits) -> Result<(Self, usize), CodecError> {
        let mut r = Reader::new(buf);
        let header = MessageHeader::decode(&mut r)?;
        limits.check(header.payload_size as usize)?;
        let payload = r.buf(header.payload_size as usize)?;
        Ok((Self { header, payload }, r.position()))
    }

    #[inline]
    pub fn message_id(&self) -> u8 {
        self.header.message_id
    }

    pub fn decode<P: Dispatch<'a>>(&self) -> Result<Option<P>, CodecError> {
        P::decode_message(self.header.message_id, self.payload)
    }

    pub fn decode_in<'b, P: DispatchIn<'b>>(
        &self,
        arena: &'b Arena,
    ) -> Result<Option<P>, CodecError> {
        P::decode_message_in(self.header.message_id, self.payload, arena)
    }

    pub fn dispatch<P: Dispatch<'a>, H: FnOnce(P)>(&self, handler: H) -> Result<bool, CodecError> {
        P::dispatch_message(self.header.message_id, self.payload, handler)
    }
}

/// Total frame size for `payload`.
pub fn frame_size(payload: &dyn Encode) -> usize {
    HEADER_SIZE + payload.serialized_size()
}

/// Writes header and payload into `buf`, returning the frame length.
pub fn write_frame(message_id: u8, payload: &dyn Encode, buf: &mut [u8]) -> Result<usize, CodecError> {
    let size = payload.serialized_size();
    let payload_size = u32::try_from(size).map_err(|_| CodecError::PayloadTooLarge {
        size,
        limit: MAX_PAYLOAD_SIZE,
    })?;
    let total = HEADER_SIZE + size;
    if buf.len() < total {
        return Err(CodecError::BufferTooShort {
            needed: total,
            remaining: buf.len(),
        });
    }
    let header = MessageHeader {
        message_id,
        payload_size,
    };
    header.serialize(&mut buf[..HEADER_SIZE])?;
    payload.serialize(&mut buf[HEADER_SIZE..total])?;
    Ok(total)
}

/// Frames a protocol message into `buf`.
pub fn write_message<P: Protocol>(message: &P, buf: &mut [u8]) -> Result<usize, CodecError> {
    write_frame(message.message_id(), message.payload(), buf)
}

/// Frames a protocol message into a new vector.
pub fn encode_message<P: Protocol>(message: &P) -> Result<Vec<u8>, CodecError> {
    let mut out = vec![0u8; frame_size(message.payload())];
    write_message(message, &mut out)?;
    Ok(out)
}

/// Parses the frame at the front of `buf` and dispatches it. Returns
/// whether the id was known and the number of bytes consumed.
pub fn dispatch_frame<'a, P, H>(
    buf: &'a [u8],
    limits: &FrameLimits,
    handler: H,
) -> Result<(bool, usize), CodecError>
where
    P: Dispatch<'a>,
    H: FnOnce(P),
{
    let (frame, used) = Frame::parse(buf, limits)?;
    let known = frame.dispatch(handler)?;
    Ok((known, used))
}

/// Iterates over back-to-back frames.
///
/// Stops at the end of the buffer. A malformed or truncated frame yields
/// one error, after which the iterator is exhausted.
pub struct FrameReader<'a> {
    buf: &'a [u8],
    pos: usize,
    limits: FrameLimits,
    failed: bool,
}

impl<'a> FrameReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, FrameLimits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: FrameLimits) -> Self {
        Self {
            buf,
            pos: 0,
            limits,
            failed: false,
        }
    }

    /// Bytes consumed by the frames yielded so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Result<Frame<'a>, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        match Frame::parse(&self.buf[self.pos..], &self.limits) {
            Ok((frame, used)) => {
                self.pos += used;
                Some(Ok(frame))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = MessageHeader {
            message_id: 7,
            payload_size: 0x0102,
        };
        assert_eq!(header.to_vec().unwrap(), [7, 0x02, 0x01, 0, 0]);
    }

    #[test]
    fn test_write_and_parse_frame() {
        let mut buf = [0u8; 16];
        let written = write_frame(3, &0xaabbu16, &mut buf).unwrap();
        assert_eq!(written, 7);
        assert_eq!(&buf[..7], &[3, 2, 0, 0, 0, 0xbb, 0xaa]);

        let (frame, used) = Frame::parse(&buf[..written], &FrameLimits::default()).unwrap();
        assert_eq!(used, 7);
        assert_eq!(frame.message_id(), 3);
        assert_eq!(frame.payload, &[0xbb, 0xaa]);
    }

    #[test]
    fn test_write_frame_small_buffer() {
        let mut buf = [0u8; 6];
        assert_eq!(
            write_frame(1, &0u16, &mut buf),
            Err(CodecError::BufferTooShort {
                needed: 7,
                remaining: 6
            })
        );
    }

    #[test]
    fn test_parse_enforces_limits() {
        let frame = [1, 9, 0, 0, 0];
        let limits = FrameLimits {
            max_payload_size: 8,
        };
        assert_eq!(
            Frame::parse(&frame, &limits),
            Err(CodecError::PayloadTooLarge { size: 9, limit: 8 })
        );
        assert!(matches!(
            Frame::parse(&frame, &FrameLimits::default()),
            Err(CodecError::BufferTooShort { .. })
        ));
        assert!(matches!(
            Frame::parse(&frame[..3], &FrameLimits::default()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_frame_reader_stops_after_error() {
        let mut buf = vec![0u8; 32];
        let mut pos = write_frame(1, &1u8, &mut buf).unwrap();
        pos += write_frame(2, &String::from("hi"), &mut buf[pos..]).unwrap();
        buf.truncate(pos);
        buf.extend_from_slice(&[9, 100, 0]);

        let mut frames = FrameReader::new(&buf);
        assert_eq!(frames.next().unwrap().unwrap().payload, &[1]);
        assert_eq!(frames.next().unwrap().unwrap().message_id(), 2);
        assert_eq!(frames.position(), pos);
        assert!(frames.next().unwrap().is_err());
        assert!(frames.next().is_none());
        assert_eq!(frames.rest(), &[9, 100, 0]);
    }
}
