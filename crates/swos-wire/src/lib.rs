//! Codec for the text dialect spoken by MikroTik SwOS switches.
//!
//! The switch answers with something that looks like JSON but is not:
//! bare keys, bare hex literals, single-quoted strings and empty value
//! holes. Updates must be sent back in the same dialect. This crate covers
//! both directions and knows nothing about endpoints:
//!
//! - **[`repair`]** turns a raw response into strict JSON.
//! - **[`RawValue`]** is the parsed tree: scalars stay text, records keep
//!   their key order.
//! - **[`scalar`]** holds the per-primitive codecs: hex integers, port
//!   bitmasks, hex-encoded text, MAC addresses, IPv4 in both byte orders and
//!   signed 16-bit rollovers.
//! - **[`to_string`]** is a serde serializer for the write syntax;
//!   [`WireValue`] is the tree `swos-core` feeds it.

pub mod error;
pub mod mac;
pub mod raw;
pub mod repair;
pub mod scalar;
pub mod ser;
pub mod value;

pub use error::WireError;
pub use mac::MacAddress;
pub use raw::RawValue;
pub use repair::repair;
pub use ser::to_string;
pub use value::WireValue;
