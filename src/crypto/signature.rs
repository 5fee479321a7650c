//! Signature algorithms.

use std::fmt;
use crate::oid;
use super::algorithm::AlgorithmIdentifier;
use super::digest::DigestAlgorithm;


//------------ SignatureAlgorithm --------------------------------------------

/// The signature algorithms we know by name.
///
/// Signer infos can carry any algorithm identifier. This type only serves
/// to create the identifiers for the common algorithms and to recognize
/// them again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignatureAlgorithm {
    /// RSASSA-PKCS1-v1_5 with the given digest.
    RsaPkcs1(DigestAlgorithm),

    /// Plain `rsaEncryption` as used by some older signers.
    RsaEncryption,

    /// ECDSA with the given digest.
    Ecdsa(DigestAlgorithm),

    Ed25519,
}

impl SignatureAlgorithm {
    /// Returns the algorithm identifier.
    ///
    /// RSA identifiers carry a `NULL` parameter, all others none.
    pub fn identifier(self) -> AlgorithmIdentifier {
        match self {
            SignatureAlgorithm::RsaPkcs1(digest) => {
                AlgorithmIdentifier::with_null_parameters(&match digest {
                    DigestAlgorithm::Sha1 => oid::SHA1_WITH_RSA_ENCRYPTION,
                    DigestAlgorithm::Sha256 => oid::SHA256_WITH_RSA_ENCRYPTION,
                    DigestAlgorithm::Sha384 => oid::SHA384_WITH_RSA_ENCRYPTION,
                    DigestAlgorithm::Sha512 => oid::SHA512_WITH_RSA_ENCRYPTION,
                })
            }
            SignatureAlgorithm::RsaEncryption => {
                AlgorithmIdentifier::with_null_parameters(&oid::RSA_ENCRYPTION)
            }
            SignatureAlgorithm::Ecdsa(digest) => {
                AlgorithmIdentifier::without_parameters(&match digest {
                    DigestAlgorithm::Sha1 => oid::ECDSA_WITH_SHA1,
                    DigestAlgorithm::Sha256 => oid::ECDSA_WITH_SHA256,
                    DigestAlgorithm::Sha384 => oid::ECDSA_WITH_SHA384,
                    DigestAlgorithm::Sha512 => oid::ECDSA_WITH_SHA512,
                })
            }
            SignatureAlgorithm::Ed25519 => {
                AlgorithmIdentifier::without_parameters(&oid::ED25519)
            }
        }
    }

    /// Recognizes an algorithm identifier.
    pub fn from_identifier(alg: &AlgorithmIdentifier) -> Option<Self> {
        let algorithm = alg.algorithm();
        let res = if *algorithm == oid::SHA1_WITH_RSA_ENCRYPTION {
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha1)
        }
        else if *algorithm == oid::SHA256_WITH_RSA_ENCRYPTION {
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha256)
        }
        else if *algorithm == oid::SHA384_WITH_RSA_ENCRYPTION {
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha384)
        }
        else if *algorithm == oid::SHA512_WITH_RSA_ENCRYPTION {
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha512)
        }
        else if *algorithm == oid::RSA_ENCRYPTION {
            SignatureAlgorithm::RsaEncryption
        }
        else if *algorithm == oid::ECDSA_WITH_SHA1 {
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha1)
        }
        else if *algorithm == oid::ECDSA_WITH_SHA256 {
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha256)
        }
        else if *algorithm == oid::ECDSA_WITH_SHA384 {
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha384)
        }
        else if *algorithm == oid::ECDSA_WITH_SHA512 {
            SignatureAlgorithm::Ecdsa(DigestAlgorithm::Sha512)
        }
        else if *algorithm == oid::ED25519 {
            SignatureAlgorithm::Ed25519
        }
        else {
            return None
        };
        Some(res)
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            SignatureAlgorithm::RsaPkcs1(digest) => {
                write!(f, "RSA PKCS#1 v1.5 with {}", digest)
            }
            SignatureAlgorithm::RsaEncryption => f.write_str("RSA"),
            SignatureAlgorithm::Ecdsa(digest) => {
                write!(f, "ECDSA with {}", digest)
            }
            SignatureAlgorithm::Ed25519 => f.write_str("Ed25519"),
        }
    }
}


//============ Tests =========================================================
