//! Protocols: numbered message sets and payload dispatch.
//!
//! A generated protocol is an enum with one variant per message, each
//! wrapping the message's data type. [`Protocol`] carries the static
//! message table; [`Dispatch`] / [`DispatchIn`] route a wire message id and
//! payload to the right variant, in view or arena mode.

use crate::arena::Arena;
use crate::codec::{Decode, DecodeIn, Encode};
use crate::error::CodecError;
use crate::hash;
use crate::types::TypeRef;

/// Static description of one protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageInfo {
    pub proto_id: u16,
    pub message_id: u8,
    pub name: &'static str,
    /// Type of the message payload.
    pub data: &'static TypeRef,
    /// Message signature hash combined with the payload type hash.
    pub hash: u64,
}

impl MessageInfo {
    pub const fn new(
        proto_id: u16,
        message_id: u8,
        name: &'static str,
        data: &'static TypeRef,
    ) -> Self {
        Self {
            proto_id,
            message_id,
            name,
            data,
            hash: hash::message_hash(name, proto_id, message_id) ^ hash::type_hash(data),
        }
    }
}

/// A set of messages sharing a protocol id.
pub trait Protocol: Sized {
    const PROTO_ID: u16;
    const NAME: &'static str;

    /// Every message, in declaration order.
    const MESSAGES: &'static [MessageInfo];

    /// XOR of all message hashes. Peers compare it to detect schema drift.
    const HASH: u64 = hash::protocol_hash(Self::MESSAGES);

    fn message_id(&self) -> u8;

    /// The message data, ready to be framed.
    fn payload(&self) -> &dyn Encode;

    fn message_info(message_id: u8) -> Option<&'static MessageInfo> {
        Self::MESSAGES.iter().find(|m| m.message_id == message_id)
    }

    fn info(&self) -> Option<&'static MessageInfo> {
        Self::message_info(self.message_id())
    }
}

/// View-mode dispatch: decoded messages may borrow the payload buffer.
pub trait Dispatch<'a>: Protocol {
    /// Decodes `payload` as message `message_id`; `Ok(None)` when the id is
    /// not part of the protocol.
    fn decode_message(message_id: u8, payload: &'a [u8]) -> Result<Option<Self>, CodecError>;

    /// Decodes and hands the message to `handler`. Returns `Ok(false)`
    /// without calling it when the id is unknown.
    fn dispatch_message<H: FnOnce(Self)>(
        message_id: u8,
        payload: &'a [u8],
        handler: H,
    ) -> Result<bool, CodecError> {
        match Self::decode_message(message_id, payload)? {
            Some(message) => {
                handler(message);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Arena-mode dispatch: decoded messages borrow the arena only.
pub trait DispatchIn<'a>: Protocol {
    fn decode_message_in(
        message_id: u8,
        payload: &[u8],
        arena: &'a Arena,
    ) -> Result<Option<Self>, CodecError>;

    fn dispatch_message_in<H: FnOnce(Self)>(
        message_id: u8,
        payload: &[u8],
        arena: &'a Arena,
        handler: H,
    ) -> Result<bool, CodecError> {
        match Self::decode_message_in(message_id, payload, arena)? {
            Some(message) => {
                handler(message);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// `true` when no message id repeats.
pub const fn unique_ids(ids: &[u8]) -> bool {
    let mut seen = [false; 256];
    let mut i = 0;
    while i < ids.len() {
        let id = ids[i] as usize;
        if seen[id] {
            return false;
        }
        seen[id] = true;
        i += 1;
    }
    true
}

/// Decodes a whole message payload; leftover bytes are an error.
pub fn decode_payload<'a, T: Decode<'a>>(message_id: u8, payload: &'a [u8]) -> Result<T, CodecError> {
    let (value, used) = T::deserialize(payload)?;
    check_consumed(message_id, payload.len(), used)?;
    Ok(value)
}

pub fn decode_payload_in<'a, T: DecodeIn<'a>>(
    message_id: u8,
    payload: &[u8],
    arena: &'a Arena,
) -> Result<T, CodecError> {
    let (value, used) = T::deserialize_in(payload, arena)?;
    check_consumed(message_id, payload.len(), used)?;
    Ok(value)
}

fn check_consumed(message_id: u8, len: usize, used: usize) -> Result<(), CodecError> {
    if used != len {
        return Err(CodecError::TrailingBytes {
            message_id,
            remaining: len - used,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    #[test]
    fn test_message_info_hash() {
        let a = MessageInfo::new(1, 0, "ping", <u32 as Type>::TYPE);
        let b = MessageInfo::new(1, 0, "ping", <u64 as Type>::TYPE);
        let c = MessageInfo::new(1, 1, "ping", <u32 as Type>::TYPE);
        assert_ne!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
        assert_eq!(a.hash, hash::message_hash("ping", 1, 0) ^ <u32 as Type>::HASH);
    }

    #[test]
    fn test_unique_ids() {
        assert!(unique_ids(&[0, 1, 255]));
        assert!(!unique_ids(&[3, 1, 3]));
        assert!(unique_ids(&[]));
    }

    #[test]
    fn test_decode_payload_requires_exact_length() {
        assert_eq!(decode_payload::<u16>(3, &[1, 0]), Ok(1));
        assert_eq!(
            decode_payload::<u16>(3, &[1, 0, 0]),
            Err(CodecError::TrailingBytes {
                message_id: 3,
                remaining: 1
            })
        );
        let arena = Arena::with_capacity(8);
        assert_eq!(decode_payload_in::<&str>(4, &[1, 0, 0, 0, b'x'], &arena), Ok("x"));
    }
}
