//! Content-hash ids for resources without a natural provider id (records, metrics).

use std::fmt::{Display, Write};

const ADLER_MOD: u32 = 65521;
// Largest block for which the sums cannot overflow before reduction.
const ADLER_NMAX: usize = 5552;

/// Adler-32 checksum of `data`.
pub fn adler32(data: &[u8]) -> u32 {
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for chunk in data.chunks(ADLER_NMAX) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= ADLER_MOD;
        b %= ADLER_MOD;
    }
    (b << 16) | a
}

/// `"awls-" + hex(adler32(concat(fields)))`, fields stringified in order.
pub fn hash_id<I>(fields: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut buf = String::new();
    for field in fields {
        let _ = write!(buf, "{}", field);
    }
    format!("awls-{}", hex::encode(adler32(buf.as_bytes()).to_be_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_adler32_known_values() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"Wikipedia"), 0x11e6_0398);
    }

    #[test]
    fn test_record_and_metric_hashes() {
        assert_eq!(hash_id(["subdomain1.my.first.domain", "A"]), "awls-91fa0a45");
        assert_eq!(hash_id(["subdomain2.my.first.domain", "A"]), "awls-920c0a46");
        assert_eq!(hash_id(["namespace_1", "metric_1"]), "awls-4ba90752");
        assert_eq!(hash_id(["namespace_2", "metric_2"]), "awls-4bb30754");
    }

    #[test]
    fn test_hash_is_over_the_concatenation() {
        assert_eq!(hash_id(["ab", "c"]), hash_id(["a", "bc"]));
        assert_eq!(hash_id(["namespace_1", "metric_1", ""]), "awls-4ba90752");
    }

    proptest! {
        #[test]
        fn test_hash_id_is_stable_and_well_formed(fields in proptest::collection::vec("[a-z0-9._-]{0,24}", 0..5)) {
            let first = hash_id(&fields);
            let second = hash_id(&fields);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.starts_with("awls-"));
            prop_assert_eq!(first.len(), 13);
        }

        #[test]
        fn test_chunked_adler_matches_naive(data in proptest::collection::vec(any::<u8>(), 0..12000)) {
            let (mut a, mut b) = (1u32, 0u32);
            for byte in &data {
                a = (a + u32::from(*byte)) % ADLER_MOD;
                b = (b + a) % ADLER_MOD;
            }
            prop_assert_eq!(adler32(&data), (b << 16) | a);
        }
    }
}
