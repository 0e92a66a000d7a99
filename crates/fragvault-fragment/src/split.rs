//! Fixed-size fragmentation
//!
//! Splits a byte stream into consecutive, non-overlapping fragments of at
//! most `fragment_size` bytes; the final fragment may be shorter. Fragment
//! count = ceil(len / fragment_size); empty input yields zero fragments.

use std::io::Read;

use fragvault_core::{Fragment, VaultError, VaultResult};

/// Split a slice into ordered fragments of at most `fragment_size` bytes.
pub fn split(data: &[u8], fragment_size: u32) -> VaultResult<Vec<Fragment>> {
    if fragment_size == 0 {
        return Err(VaultError::Validation(
            "fragment size must be positive".into(),
        ));
    }

    Ok(data
        .chunks(fragment_size as usize)
        .enumerate()
        .map(|(index, chunk)| Fragment {
            index: index as u64,
            bytes: chunk.to_vec(),
        })
        .collect())
}

/// Split a reader into ordered fragments, consuming it to EOF.
///
/// Read failures surface as I/O errors; a partially consumed source never
/// produces a fragment list.
pub fn split_reader<R: Read>(mut source: R, fragment_size: u32) -> VaultResult<Vec<Fragment>> {
    if fragment_size == 0 {
        return Err(VaultError::Validation(
            "fragment size must be positive".into(),
        ));
    }

    let size = fragment_size as usize;
    let mut fragments = Vec::new();
    let mut index = 0u64;

    loop {
        let mut buf = vec![0u8; size];
        let mut filled = 0;
        while filled < size {
            match source.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        if filled == 0 {
            break;
        }
        buf.truncate(filled);
        fragments.push(Fragment { index, bytes: buf });
        index += 1;
        if filled < size {
            break;
        }
    }

    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input_yields_no_fragments() {
        assert!(split(&[], 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_fragment_size_rejected() {
        let result = split(b"data", 0);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_hello_world_boundaries() {
        // 11 bytes at size 4 → "hell", "o wo", "rld"
        let fragments = split(b"hello world", 4).unwrap();
        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[0].bytes, b"hell");
        assert_eq!(fragments[1].bytes, b"o wo");
        assert_eq!(fragments[2].bytes, b"rld");
        assert_eq!(
            fragments.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_exact_multiple_has_no_empty_tail() {
        let fragments = split(&[0u8; 12], 4).unwrap();
        assert_eq!(fragments.len(), 3);
        assert!(fragments.iter().all(|f| f.bytes.len() == 4));
    }

    #[test]
    fn test_smaller_than_fragment_size_is_one_fragment() {
        let fragments = split(b"abc", 1024).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].bytes, b"abc");
    }

    #[test]
    fn test_reader_matches_slice() {
        let data = (0..10_000u32).flat_map(|n| n.to_le_bytes()).collect::<Vec<_>>();
        let from_slice = split(&data, 4096).unwrap();
        let from_reader = split_reader(std::io::Cursor::new(&data), 4096).unwrap();
        assert_eq!(from_slice, from_reader);
    }

    #[test]
    fn test_reader_error_propagates() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk gone"))
            }
        }
        assert!(matches!(split_reader(Broken, 4), Err(VaultError::Io(_))));
    }

    proptest! {
        #[test]
        fn prop_fragment_count_and_coverage(
            data in proptest::collection::vec(any::<u8>(), 0..4096),
            fragment_size in 1u32..512,
        ) {
            let fragments = split(&data, fragment_size).unwrap();
            let expected = data.len().div_ceil(fragment_size as usize);
            prop_assert_eq!(fragments.len(), expected);

            // Contiguous indices, bounded sizes, full coverage in order.
            let mut rebuilt = Vec::new();
            for (i, fragment) in fragments.iter().enumerate() {
                prop_assert_eq!(fragment.index, i as u64);
                prop_assert!(fragment.bytes.len() <= fragment_size as usize);
                prop_assert!(!fragment.bytes.is_empty());
                rebuilt.extend_from_slice(&fragment.bytes);
            }
            prop_assert_eq!(rebuilt, data);
        }
    }
}
