//! Wire format shared with the introspection program.
//!
//! The introspection program writes exactly one encoded [`Package`] to its
//! standard output. The encoding is bincode 1.x with default options:
//!
//! - integers are fixed-width little-endian
//! - strings and sequences carry a `u64` length prefix
//! - `Option` is a one-byte tag followed by the value
//! - enums carry a `u32` variant index, followed by that variant's fields
//!
//! The variant index is the per-node kind discriminator that lets a
//! [`Type`](super::Type) nest other kinds. Field and variant order in the
//! model types is therefore part of the contract; there is no version header.

use bincode::Options;

use super::Package;

/// Encode a package.
pub fn encode(pkg: &Package) -> bincode::Result<Vec<u8>> {
    bincode::serialize(pkg)
}

/// Decode a package, rejecting trailing bytes.
pub fn decode(bytes: &[u8]) -> bincode::Result<Package> {
    // Same layout as `bincode::deserialize`, minus the tolerance for garbage
    // after the payload.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
        .deserialize(bytes)
}
