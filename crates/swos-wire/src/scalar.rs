//! Scalar codecs for the field primitives the switch uses.
//!
//! Every function here is pure and works on a single scalar. Integers are
//! treated as unsigned 32-bit unless the caller asks for the signed 16-bit
//! rollover form. Byte order for IPv4 is never implied: each direction and
//! order has its own function, and the caller picks per field.

use std::net::Ipv4Addr;

use crate::error::WireError;
use crate::mac::{MacAddress, hex_pair};

/// Largest port count a single bitmask can describe.
pub const MAX_MASK_BITS: usize = 32;

// ── Hex integers ────────────────────────────────────────────────────

/// Decode a hex integer, with or without a `0x` prefix in either case.
pub fn decode_hex_int(text: &str) -> Result<u32, WireError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(WireError::numeric(text));
    }
    u32::from_str_radix(digits, 16).map_err(|_| WireError::numeric(text))
}

/// Encode as `0x` followed by uppercase hex digits, no padding.
pub fn encode_hex_int(value: u32) -> String {
    format!("0x{value:X}")
}

/// Decode a 16-bit field that carries a two's complement value.
pub fn decode_hex_i16(text: &str) -> Result<i16, WireError> {
    let raw = decode_hex_int(text)?;
    let raw = u16::try_from(raw).map_err(|_| WireError::numeric(text))?;
    Ok(i16::from_be_bytes(raw.to_be_bytes()))
}

/// Inverse of [`decode_hex_i16`]: the 16-bit two's complement pattern.
pub fn i16_bits(value: i16) -> u32 {
    u32::from(u16::from_be_bytes(value.to_be_bytes()))
}

// ── Bitmasks ───────────────────────────────────────────────────────

/// Decode a port mask into exactly `port_count` booleans, LSB first.
///
/// Bits at or beyond `port_count` are ignored. Ports past
/// [`MAX_MASK_BITS`] always read as `false`.
pub fn decode_bitmask(text: &str, port_count: usize) -> Result<Vec<bool>, WireError> {
    let value = decode_hex_int(text)?;
    Ok(mask_bits(value, port_count))
}

/// Expand an already decoded mask into `port_count` booleans.
pub fn mask_bits(value: u32, port_count: usize) -> Vec<bool> {
    (0..port_count)
        .map(|i| i < MAX_MASK_BITS && (value >> i) & 1 == 1)
        .collect()
}

/// Fold booleans into a mask; bit `i` is set iff `bits[i]` is `true`.
pub fn bitmask_value(bits: &[bool]) -> u32 {
    bits.iter()
        .take(MAX_MASK_BITS)
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0, |mask, (i, _)| mask | (1 << i))
}

/// Encode booleans as a hex mask.
pub fn encode_bitmask(bits: &[bool]) -> String {
    encode_hex_int(bitmask_value(bits))
}

// ── Hex-encoded text ────────────────────────────────────────────────

/// Decode consecutive hex byte pairs as UTF-8 text.
///
/// Nothing is trimmed: a trailing newline byte survives decoding.
pub fn decode_hex_ascii(text: &str) -> Result<String, WireError> {
    if text.len() % 2 != 0 {
        return Err(WireError::format(text, "hex-encoded text"));
    }
    let bytes = text
        .as_bytes()
        .chunks(2)
        .map(|pair| hex_pair(pair).ok_or_else(|| WireError::numeric(text)))
        .collect::<Result<Vec<u8>, _>>()?;
    String::from_utf8(bytes).map_err(|_| WireError::format(text, "UTF-8 text"))
}

/// Encode text as lowercase hex byte pairs.
pub fn encode_hex_ascii(text: &str) -> String {
    text.bytes().fold(String::with_capacity(text.len() * 2), |mut out, b| {
        out.push(hex_digit(b >> 4));
        out.push(hex_digit(b & 0x0f));
        out
    })
}

fn hex_digit(nibble: u8) -> char {
    char::from_digit(u32::from(nibble), 16).unwrap_or('0')
}

// ── MAC addresses ───────────────────────────────────────────────────

/// Decode twelve bare hex digits.
pub fn decode_mac(text: &str) -> Result<MacAddress, WireError> {
    MacAddress::from_wire(text)
}

pub fn encode_mac(mac: &MacAddress) -> String {
    mac.to_wire()
}

// ── IPv4 ────────────────────────────────────────────────────────────

/// Little-endian: byte 0 of the address sits in bits 0-7.
pub fn decode_ip_le(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value.to_le_bytes())
}

pub fn encode_ip_le(addr: Ipv4Addr) -> u32 {
    u32::from_le_bytes(addr.octets())
}

/// Network order: byte 0 of the address sits in bits 24-31.
pub fn decode_ip_be(value: u32) -> Ipv4Addr {
    Ipv4Addr::from(value)
}

pub fn encode_ip_be(addr: Ipv4Addr) -> u32 {
    u32::from(addr)
}
