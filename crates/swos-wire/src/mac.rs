// ── MacAddress ──────────────────────────────────────────────────────

use std::fmt::{self, Write as _};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::WireError;

/// MAC address as six raw octets.
///
/// Displays as lowercase colon-separated pairs (aa:bb:cc:dd:ee:ff). On the
/// wire it is twelve bare hex digits with no separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }

    /// Decode the wire form: exactly twelve hex digits.
    pub fn from_wire(text: &str) -> Result<Self, WireError> {
        const EXPECTED: &str = "MAC address (12 hex digits)";

        if text.len() != 12 {
            return Err(WireError::format(text, EXPECTED));
        }
        let mut octets = [0u8; 6];
        for (slot, pair) in octets.iter_mut().zip(text.as_bytes().chunks(2)) {
            *slot = hex_pair(pair).ok_or_else(|| WireError::format(text, EXPECTED))?;
        }
        Ok(Self(octets))
    }

    /// Encode as twelve lowercase hex digits.
    pub fn to_wire(&self) -> String {
        self.0.iter().fold(String::with_capacity(12), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
    }
}

/// Two ASCII hex digits to one byte.
pub(crate) fn hex_pair(pair: &[u8]) -> Option<u8> {
    let [hi, lo] = pair else {
        return None;
    };
    let hi = char::from(*hi).to_digit(16)?;
    let lo = char::from(*lo).to_digit(16)?;
    u8::try_from((hi << 4) | lo).ok()
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = WireError;

    /// Accepts colon-separated, dash-separated, or bare hex, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare: String = s.chars().filter(|c| !matches!(c, ':' | '-')).collect();
        Self::from_wire(&bare).map_err(|_| WireError::format(s, "MAC address"))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_wire_form() {
        let mac = MacAddress::from_wire("085531001b19").unwrap();
        assert_eq!(mac.octets(), [0x08, 0x55, 0x31, 0x00, 0x1b, 0x19]);
        assert_eq!(mac.to_string(), "08:55:31:00:1b:19");
    }

    #[test]
    fn encodes_wire_form_lowercase() {
        let mac = MacAddress::new([0xAA, 0xBB, 0xCC, 0x00, 0x01, 0xFF]);
        assert_eq!(mac.to_wire(), "aabbcc0001ff");
    }

    #[test]
    fn rejects_odd_and_wrong_lengths() {
        assert!(matches!(
            MacAddress::from_wire("085531001b1"),
            Err(WireError::InvalidFormat { .. })
        ));
        assert!(matches!(
            MacAddress::from_wire("0855"),
            Err(WireError::InvalidFormat { .. })
        ));
        assert!(matches!(
            MacAddress::from_wire("08553100zz19"),
            Err(WireError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn from_str_normalizes_separators_and_case() {
        let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
        let mac: MacAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(mac.to_wire(), "aabbccddeeff");
    }

    #[test]
    fn serializes_as_display_string() {
        let mac = MacAddress::new([0, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"00:11:22:33:44:55\"");
        let back: MacAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mac);
    }
}
