//! Conversion between the logical nonce (plain bytes) and the DER `INTEGER`
//! carried on the wire.
//!
//! Nonce bytes are read as a big-endian two's-complement integer. The
//! canonical form is the shortest such encoding of the same value, which is
//! exactly the content of a DER `INTEGER`: a leading `0x00` survives only when
//! the next byte has its high bit set, a leading `0xFF` only when it does not.
//! An empty nonce is the integer zero.

use der::asn1::Int;
use rand::Rng;

use crate::errors::{TsReqError, TsReqErrorKind, TsReqResult};

/// Random nonce length in bytes, before sign padding.
pub const RANDOM_NONCE_LEN: usize = 8;

/// Strips sign-redundant leading bytes.
pub fn canonical_nonce(bytes: &[u8]) -> Vec<u8> {
    if bytes.is_empty() {
        return vec![0x00];
    }

    let mut start = 0;
    while start + 1 < bytes.len() {
        let (lead, next) = (bytes[start], bytes[start + 1]);
        let redundant = (lead == 0x00 && next & 0x80 == 0) || (lead == 0xff && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }

    bytes[start..].to_vec()
}

pub fn nonce_to_int(bytes: &[u8]) -> Result<Int, TsReqError> {
    Int::new(&canonical_nonce(bytes)).map_app_err(TsReqErrorKind::EncodeError)
}

pub fn int_to_nonce(value: &Int) -> Vec<u8> {
    canonical_nonce(value.as_bytes())
}

/// Random positive nonce in canonical form.
///
/// A `0x00` byte is prepended when the high bit is set so the value never
/// reads as negative.
pub fn random_nonce() -> Vec<u8> {
    let mut rng = rand::rng();
    let random: [u8; RANDOM_NONCE_LEN] = rng.random();

    let mut bytes = Vec::with_capacity(RANDOM_NONCE_LEN + 1);
    if random[0] & 0x80 != 0 {
        bytes.push(0x00);
    }
    bytes.extend_from_slice(&random);

    canonical_nonce(&bytes)
}

#[cfg(test)]
mod tests {
    use der::{Decode, Encode};

    use super::*;

    #[test]
    fn canonical_keeps_minimal_values() {
        assert_eq!(canonical_nonce(&[0x01]), vec![0x01]);
        assert_eq!(canonical_nonce(&[0x7f, 0x00]), vec![0x7f, 0x00]);
        assert_eq!(canonical_nonce(&[0x00, 0x80]), vec![0x00, 0x80]);
        assert_eq!(canonical_nonce(&[0x80]), vec![0x80]);
        assert_eq!(canonical_nonce(&[0xff, 0x7f]), vec![0xff, 0x7f]);
    }

    #[test]
    fn canonical_strips_redundant_sign_bytes() {
        assert_eq!(canonical_nonce(&[0x00, 0x00, 0x01]), vec![0x01]);
        assert_eq!(canonical_nonce(&[0x00, 0x00, 0x80]), vec![0x00, 0x80]);
        assert_eq!(canonical_nonce(&[0xff, 0xff, 0x80]), vec![0x80]);
    }

    #[test]
    fn all_zero_and_empty_are_zero() {
        assert_eq!(canonical_nonce(&[0x00, 0x00, 0x00]), vec![0x00]);
        assert_eq!(canonical_nonce(&[]), vec![0x00]);
    }

    #[test]
    fn int_round_trip() {
        for nonce in [
            vec![0x01, 0x02, 0x03],
            vec![0x00, 0xe0, 0x26, 0x61, 0x30, 0x95, 0x8b, 0xeb, 0x35],
            vec![0x80, 0x00],
            vec![0x00],
        ] {
            let int = nonce_to_int(&nonce).unwrap();
            assert_eq!(int_to_nonce(&int), nonce);
        }
    }

    #[test]
    fn int_encodes_as_der_integer() {
        let int = nonce_to_int(&[0x00, 0x00, 0x2a]).unwrap();
        assert_eq!(int.to_der().unwrap(), vec![0x02, 0x01, 0x2a]);

        let int = nonce_to_int(&[0x00, 0x80]).unwrap();
        let der = int.to_der().unwrap();
        assert_eq!(der, vec![0x02, 0x02, 0x00, 0x80]);
        assert_eq!(int_to_nonce(&Int::from_der(&der).unwrap()), vec![0x00, 0x80]);
    }

    #[test]
    fn random_nonce_is_positive_and_canonical() {
        for _ in 0..100 {
            let nonce = random_nonce();

            assert!(!nonce.is_empty() && nonce.len() <= RANDOM_NONCE_LEN + 1);
            assert_eq!(canonical_nonce(&nonce), nonce);
            if nonce.len() == RANDOM_NONCE_LEN + 1 {
                assert_eq!(nonce[0], 0x00);
                assert!(nonce[1] & 0x80 != 0);
            } else {
                assert!(nonce[0] & 0x80 == 0);
            }
        }
    }
}
