//! CMS signed data containers for document signatures.
//!
//! Signed documents such as PDF files carry their signature as a CMS
//! _SignedData_ structure defined in RFC 5652. Besides the signature value
//! itself, the structure contains the signer’s certificate chain,
//! revocation information for it, and a set of signed attributes that bind
//! the document digest and the signing certificate into the signature.
//!
//! This crate builds and parses these containers. It supports exactly one
//! signer per container. It does not create signatures and doesn’t verify
//! them, nor does it validate certificates. The typical flow for signing a
//! document is:
//!
//! * create a [`SignerInfo`], set its algorithms and signing certificate,
//!   and add the signed attributes, most importantly the message digest of
//!   the document,
//! * serialize the signed attributes via
//!   [`SignerInfo::serialize_signed_attrs`] and sign the result, which
//!   freezes the attributes,
//! * add the signature via [`SignerInfo::set_signature`],
//! * place the signer info into a [`CmsContainer`] together with the
//!   certificates and revocation information, and serialize it.
//!
//! Since the space for the container has to be reserved in the document
//! before the signature is known, both types can estimate their final
//! size.
//!
//! Decoding a container via [`CmsContainer::decode`] checks that it has
//! the single-signer shape described above.

pub use self::attr::{Attribute, AttributeSet};
pub use self::cert::Cert;
pub use self::container::CmsContainer;
pub use self::content::EncapsulatedContentInfo;
pub use self::crl::Crl;
pub use self::error::{CmsError, ErrorKind};
pub use self::ocsp::OcspResponse;
pub use self::revocation::RevocationInfo;
pub use self::signer::{SidKind, SignerIdentifier, SignerInfo};

pub mod attr;
pub mod cert;
pub mod container;
pub mod content;
pub mod crl;
pub mod crypto;
pub mod error;
pub mod ocsp;
pub mod oid;
pub mod revocation;
pub mod signer;
pub mod util;
pub mod x509;
