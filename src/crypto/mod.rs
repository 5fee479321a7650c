//! Algorithms, digests, and keys.
//!
//! This crate never signs or verifies anything. These types only describe
//! what was or will be used and compute the digests that go into the
//! signed attributes.

pub use self::algorithm::AlgorithmIdentifier;
pub use self::digest::{Digest, DigestAlgorithm};
pub use self::keys::{KeyIdentifier, PublicKey};
pub use self::signature::SignatureAlgorithm;

pub mod algorithm;
pub mod digest;
pub mod keys;
pub mod signature;
