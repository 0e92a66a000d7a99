//! Fragment reassembly
//!
//! Accepts fragments in any completion order and concatenates them strictly
//! by index. All indices 0..n−1 must be present exactly once.

use std::cmp::Ordering;

use fragvault_core::{Fragment, VaultError, VaultResult};

/// Reassemble decrypted fragments into the original byte stream.
///
/// Fails with `MissingFragment` naming the first absent index, or `Format`
/// on a duplicate index. Zero fragments merge to an empty stream.
pub fn merge(mut fragments: Vec<Fragment>) -> VaultResult<Vec<u8>> {
    fragments.sort_by_key(|f| f.index);

    let total: usize = fragments.iter().map(|f| f.bytes.len()).sum();
    let mut output = Vec::with_capacity(total);

    for (expected, fragment) in fragments.iter().enumerate() {
        let expected = expected as u64;
        match fragment.index.cmp(&expected) {
            Ordering::Equal => output.extend_from_slice(&fragment.bytes),
            Ordering::Greater => return Err(VaultError::MissingFragment(expected)),
            Ordering::Less => {
                return Err(VaultError::Format(format!(
                    "duplicate fragment index {}",
                    fragment.index
                )))
            }
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split;
    use proptest::prelude::*;

    fn fragment(index: u64, bytes: &[u8]) -> Fragment {
        Fragment {
            index,
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_merge_in_order() {
        let merged = merge(vec![
            fragment(0, b"hell"),
            fragment(1, b"o wo"),
            fragment(2, b"rld"),
        ])
        .unwrap();
        assert_eq!(merged, b"hello world");
    }

    #[test]
    fn test_merge_is_order_invariant() {
        let merged = merge(vec![
            fragment(2, b"rld"),
            fragment(0, b"hell"),
            fragment(1, b"o wo"),
        ])
        .unwrap();
        assert_eq!(merged, b"hello world");
    }

    #[test]
    fn test_missing_fragment_named() {
        let result = merge(vec![fragment(0, b"a"), fragment(2, b"c")]);
        assert!(matches!(result, Err(VaultError::MissingFragment(1))));
    }

    #[test]
    fn test_missing_first_fragment() {
        let result = merge(vec![fragment(1, b"b")]);
        assert!(matches!(result, Err(VaultError::MissingFragment(0))));
    }

    #[test]
    fn test_duplicate_fragment_rejected() {
        let result = merge(vec![fragment(0, b"a"), fragment(0, b"a"), fragment(1, b"b")]);
        assert!(matches!(result, Err(VaultError::Format(_))));
    }

    #[test]
    fn test_zero_fragments_merge_to_empty() {
        assert!(merge(Vec::new()).unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn prop_split_then_merge_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            fragment_size in 1u32..512,
        ) {
            let fragments = split(&data, fragment_size).unwrap();
            prop_assert_eq!(merge(fragments).unwrap(), data);
        }

        #[test]
        fn prop_merge_ignores_completion_order(
            data in proptest::collection::vec(any::<u8>(), 1..2048),
            fragment_size in 1u32..128,
            seed in any::<u64>(),
        ) {
            let mut fragments = split(&data, fragment_size).unwrap();
            // Cheap deterministic shuffle standing in for arbitrary
            // completion order of parallel fragment operations.
            let n = fragments.len();
            for i in (1..n).rev() {
                let j = (seed as usize).wrapping_mul(i ^ 0x9e37_79b9) % (i + 1);
                fragments.swap(i, j);
            }
            prop_assert_eq!(merge(fragments).unwrap(), data);
        }
    }
}
