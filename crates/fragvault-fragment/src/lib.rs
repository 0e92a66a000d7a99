//! fragvault-fragment: fixed-size file fragmentation and reassembly
//!
//! - `split`: byte stream → ordered, size-bounded fragments
//! - `merge`: decrypted fragments → byte-exact original stream
//!
//! Both operations are pure; the crypto and storage layers never change
//! fragment boundaries.

pub mod merge;
pub mod split;

pub use merge::merge;
pub use split::{split, split_reader};
