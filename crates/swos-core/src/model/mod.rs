//! Typed per-feature records.
//!
//! One module per endpoint. Each holds the record types, the endpoint's
//! field table (`FIELDS`) and the [`Feature`](crate::Feature) impl that reads
//! the record through that table. Writable endpoints also implement
//! [`Writable`](crate::Writable).

pub mod codes;
pub mod fwd;
pub mod host;
pub mod igmp;
pub mod lag;
pub mod link;
pub mod rstp;
pub mod sfp;
pub mod snmp;
pub mod stats;
pub mod sys;
pub mod vlan;

/// Collect an optional per-port attribute only when every port carries it,
/// so a partially reported field is never written back half-filled.
pub(crate) fn every<T, U>(items: &[T], f: impl FnMut(&T) -> Option<U>) -> Option<Vec<U>> {
    if items.is_empty() {
        return None;
    }
    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_requires_all_present() {
        assert_eq!(every(&[Some(1), Some(2)], |v| *v), Some(vec![1, 2]));
        assert_eq!(every(&[Some(1), None], |v| *v), None);
        assert_eq!(every::<Option<u8>, u8>(&[], |v| *v), None);
    }
}
