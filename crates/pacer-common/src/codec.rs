//! Wire codec: fixed-layout header plus optional payload.
//!
//! Layout (all multi-byte fields big-endian / network byte order):
//!   Common header: 1 byte type, 3 bytes reserved, 4 bytes id.
//!   Data:          header + 8-byte byte_count + byte_count payload bytes.
//!   Ack:           header only.

use crate::packet::{Packet, PacketType};
use std::error::Error;
use std::fmt;

pub const MAX_PAYLOAD: usize = 2048;
const HEADER_LEN: usize = 8;
const BYTE_COUNT_LEN: usize = 8;
const MIN_DATA_LEN: usize = HEADER_LEN + BYTE_COUNT_LEN;
const ACK_LEN: usize = HEADER_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    TooShort,
    UnknownType(u8),
    PayloadTooLarge(u64),
    LengthMismatch,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TooShort => write!(f, "datagram shorter than minimum header"),
            CodecError::UnknownType(t) => write!(f, "unknown packet type {t}"),
            CodecError::PayloadTooLarge(n) => {
                write!(f, "byte_count {n} exceeds MAX_PAYLOAD ({MAX_PAYLOAD})")
            }
            CodecError::LengthMismatch => write!(f, "datagram truncated before byte_count bytes"),
        }
    }
}

impl Error for CodecError {}

fn write_header(buf: &mut Vec<u8>, ty: PacketType, id: u32) {
    buf.push(ty as u8);
    buf.extend_from_slice(&[0u8; 3]);
    buf.extend_from_slice(&id.to_be_bytes());
}

/// Decodes a datagram into the sealed `Packet` variant the type byte names.
/// Dispatch is total: every successfully-read type byte maps to exactly one
/// arm, and anything else is an error rather than falling through silently.
pub fn decode(bytes: &[u8]) -> Result<Packet, CodecError> {
    if bytes.len() < HEADER_LEN {
        return Err(CodecError::TooShort);
    }
    match bytes[0] {
        0 => decode_data(bytes),
        1 => decode_ack(bytes),
        other => Err(CodecError::UnknownType(other)),
    }
}

pub fn decode_data(bytes: &[u8]) -> Result<Packet, CodecError> {
    if bytes.len() < MIN_DATA_LEN {
        return Err(CodecError::TooShort);
    }
    let id = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    let byte_count = u64::from_be_bytes(bytes[8..16].try_into().unwrap());
    if byte_count > MAX_PAYLOAD as u64 {
        return Err(CodecError::PayloadTooLarge(byte_count));
    }
    let byte_count = byte_count as usize;
    if bytes.len() < MIN_DATA_LEN + byte_count {
        return Err(CodecError::LengthMismatch);
    }
    let payload = bytes[MIN_DATA_LEN..MIN_DATA_LEN + byte_count].to_vec();
    Ok(Packet::Data { id, payload })
}

pub fn decode_ack(bytes: &[u8]) -> Result<Packet, CodecError> {
    if bytes.len() < ACK_LEN {
        return Err(CodecError::TooShort);
    }
    let id = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
    Ok(Packet::Ack { id })
}

/// Encodes a `Packet::Data`. Panics if called on a non-Data packet or a
/// payload larger than `MAX_PAYLOAD`; callers are expected to build packets
/// through the window/payload-synthesis helpers, which uphold both.
pub fn encode_data(id: u32, payload: &[u8]) -> Vec<u8> {
    assert!(payload.len() <= MAX_PAYLOAD, "payload exceeds MAX_PAYLOAD");
    let mut buf = Vec::with_capacity(MIN_DATA_LEN + payload.len());
    write_header(&mut buf, PacketType::Data, id);
    buf.extend_from_slice(&(payload.len() as u64).to_be_bytes());
    buf.extend_from_slice(payload);
    buf
}

pub fn encode_ack(id: u32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(ACK_LEN);
    write_header(&mut buf, PacketType::Ack, id);
    buf
}

pub fn encode(packet: &Packet) -> Vec<u8> {
    match packet {
        Packet::Data { id, payload } => encode_data(*id, payload),
        Packet::Ack { id } => encode_ack(*id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_round_trip() {
        let original = Packet::Data {
            id: 42,
            payload: vec![7u8; 8],
        };
        let encoded = encode(&original);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn ack_round_trip() {
        let original = Packet::Ack { id: 9001 };
        let encoded = encode(&original);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn empty_payload_round_trips() {
        let original = Packet::Data {
            id: 0,
            payload: Vec::new(),
        };
        let encoded = encode(&original);
        assert_eq!(decode(&encoded).unwrap(), original);
    }

    #[test]
    fn rejects_oversized_byte_count() {
        let mut buf = Vec::new();
        write_header(&mut buf, PacketType::Data, 1);
        buf.extend_from_slice(&((MAX_PAYLOAD as u64) + 1).to_be_bytes());
        assert_eq!(decode_data(&buf), Err(CodecError::PayloadTooLarge((MAX_PAYLOAD as u64) + 1)));
    }

    #[test]
    fn rejects_short_datagram() {
        assert_eq!(decode(&[0u8; 3]), Err(CodecError::TooShort));
    }

    #[test]
    fn rejects_unknown_type() {
        let mut buf = vec![0u8; 8];
        buf[0] = 9;
        assert_eq!(decode(&buf), Err(CodecError::UnknownType(9)));
    }
}
