//! Digest algorithm and operations.

use std::{fmt, io};
use bcder::{decode, encode};
use bcder::{ConstOid, Oid};
use bcder::decode::DecodeError;
use bcder::encode::PrimitiveContent;
use ring::digest;
use crate::oid;
use super::algorithm::AlgorithmIdentifier;

// Re-export the things from ring for actual digest generation.
pub use ring::digest::Digest;


//------------ DigestAlgorithm -----------------------------------------------

/// The digest algorithms supported for signing.
///
/// These are used both for the message digest of the signed content and
/// for the certificate hashes of the signing certificate attributes.
/// SHA-1 is only here because the version 1 signing certificate attribute
/// of [RFC 2634] is defined in terms of it.
///
/// [RFC 2634]: https://tools.ietf.org/html/rfc2634
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum DigestAlgorithm {
    Sha1,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}


/// # Creating Digest Values
///
impl DigestAlgorithm {
    /// Returns the digest of `data` using this algorithm.
    pub fn digest(self, data: &[u8]) -> Digest {
        digest::digest(self.ring_algorithm(), data)
    }

    /// Returns a digest context for multi-step calculation of the digest.
    pub fn start(self) -> Context {
        Context(digest::Context::new(self.ring_algorithm()))
    }

    /// Returns the length of a digest value in octets.
    pub fn digest_len(self) -> usize {
        self.ring_algorithm().output_len()
    }

    fn ring_algorithm(self) -> &'static digest::Algorithm {
        match self {
            DigestAlgorithm::Sha1 => &digest::SHA1_FOR_LEGACY_USE_ONLY,
            DigestAlgorithm::Sha256 => &digest::SHA256,
            DigestAlgorithm::Sha384 => &digest::SHA384,
            DigestAlgorithm::Sha512 => &digest::SHA512,
        }
    }
}


/// # Object Identifiers
///
impl DigestAlgorithm {
    /// Returns the object identifier of the algorithm.
    pub fn oid(self) -> ConstOid {
        match self {
            DigestAlgorithm::Sha1 => oid::SHA1,
            DigestAlgorithm::Sha256 => oid::SHA256,
            DigestAlgorithm::Sha384 => oid::SHA384,
            DigestAlgorithm::Sha512 => oid::SHA512,
        }
    }

    /// Returns the algorithm for an object identifier if we support it.
    pub fn from_oid<T: AsRef<[u8]>>(oid: &Oid<T>) -> Option<Self> {
        [
            DigestAlgorithm::Sha1, DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384, DigestAlgorithm::Sha512,
        ].into_iter().find(|alg| alg.oid() == *oid)
    }

    /// Returns the algorithm identifier for the algorithm.
    ///
    /// The parameters are encoded as `NULL`.
    pub fn identifier(self) -> AlgorithmIdentifier {
        AlgorithmIdentifier::with_null_parameters(&self.oid())
    }
}


/// # ASN.1 Values
///
/// Digest algorithms appear in CMS either alone or in sets with the following
/// syntax:
///
/// ```txt
/// DigestAlgorithmIdentifiers ::= SET OF DigestAlgorithmIdentifier
/// DigestAlgorithmIdentifier  ::= AlgorithmIdentifier
/// ```
///
/// The _parameters_ field may either be absent or `NULL`.
impl DigestAlgorithm {
    /// Takes and returns a single digest algorithm identifier.
    ///
    /// Returns a malformed error if the algorithm isn’t one of the supported
    /// algorithms or if the value isn’t correctly encoded.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let oid = Oid::take_from(cons)?;
            let res = Self::from_oid(&oid).ok_or_else(|| {
                cons.content_err("unsupported digest algorithm")
            })?;
            cons.take_opt_null()?;
            Ok(res)
        })
    }

    /// Provides an encoder for a single algorithm identifier.
    pub fn encode(self) -> impl encode::Values {
        encode::sequence((
            self.oid().encode(),
            ().encode(),
        ))
    }
}

impl TryFrom<&AlgorithmIdentifier> for DigestAlgorithm {
    type Error = UnsupportedDigestAlgorithm;

    fn try_from(
        alg: &AlgorithmIdentifier
    ) -> Result<Self, UnsupportedDigestAlgorithm> {
        Self::from_oid(alg.algorithm()).ok_or(UnsupportedDigestAlgorithm)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        })
    }
}


//------------ Context -------------------------------------------------------

#[derive(Clone)]
pub struct Context(digest::Context);

impl Context {
    pub fn update(&mut self, data: &[u8]) {
        self.0.update(data)
    }

    pub fn finish(self) -> Digest {
        self.0.finish()
    }
}

impl io::Write for Context {
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}


//------------ UnsupportedDigestAlgorithm ------------------------------------

/// An algorithm identifier did not name a supported digest algorithm.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnsupportedDigestAlgorithm;

impl fmt::Display for UnsupportedDigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unsupported digest algorithm")
    }
}

impl std::error::Error for UnsupportedDigestAlgorithm { }


//============ Tests =========================================================
