//! Error handling.

use std::{error, fmt};
use std::convert::Infallible;
use bcder::decode::DecodeError;


//------------ ErrorKind -----------------------------------------------------

/// The kind of a [`CmsError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The data is not a container or signer info of a recognized shape.
    InvalidStructure,

    /// More than one digest algorithm is declared.
    MultipleDigestAlgorithms,

    /// No digest algorithm is declared or set.
    MissingDigestAlgorithm,

    /// The certificate set is absent or empty.
    MissingCertificates,

    /// More than one signer info is present.
    MultipleSignerInfos,

    /// No signer info is present.
    MissingSignerInfo,

    /// The signer identifier matches none of the available certificates.
    CertificateNotFound,

    /// A signed attribute was to be changed after the freeze.
    SignedAttrsFrozen,

    /// No signing certificate has been set.
    MissingSigningCertificate,

    /// No signature algorithm has been set.
    MissingSignatureAlgorithm,

    /// The signing certificate has no subject key identifier.
    MissingSubjectKeyIdentifier,

    /// A digest is to be computed with an algorithm we don’t support.
    UnsupportedAlgorithm,
}

impl ErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidStructure => "invalid container structure",
            ErrorKind::MultipleDigestAlgorithms => {
                "multiple digest algorithms are not supported"
            }
            ErrorKind::MissingDigestAlgorithm => "missing digest algorithm",
            ErrorKind::MissingCertificates => "missing certificates",
            ErrorKind::MultipleSignerInfos => {
                "multiple signer infos are not supported"
            }
            ErrorKind::MissingSignerInfo => "missing signer info",
            ErrorKind::CertificateNotFound => {
                "signer certificate not found in the certificate set"
            }
            ErrorKind::SignedAttrsFrozen => {
                "signed attributes are already serialized"
            }
            ErrorKind::MissingSigningCertificate => {
                "missing signing certificate"
            }
            ErrorKind::MissingSignatureAlgorithm => {
                "missing signature algorithm"
            }
            ErrorKind::MissingSubjectKeyIdentifier => {
                "signing certificate has no subject key identifier"
            }
            ErrorKind::UnsupportedAlgorithm => "unsupported algorithm",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ CmsError ------------------------------------------------------

/// An error happened while building, encoding, or decoding a container.
#[derive(Debug)]
pub struct CmsError {
    kind: ErrorKind,

    /// The operation that caused the error, if known.
    context: Option<&'static str>,

    /// The decoding error that caused an invalid structure.
    inner: Option<DecodeError<Infallible>>,
}

impl CmsError {
    pub fn new(kind: ErrorKind) -> Self {
        CmsError { kind, context: None, inner: None }
    }

    pub(crate) fn with_context(kind: ErrorKind, context: &'static str) -> Self {
        CmsError { kind, context: Some(context), inner: None }
    }

    /// Creates the error for a mutation after the freeze.
    pub(crate) fn frozen(operation: &'static str) -> Self {
        Self::with_context(ErrorKind::SignedAttrsFrozen, operation)
    }

    /// Creates an invalid structure error from a decoding error.
    pub fn invalid_structure(err: DecodeError<Infallible>) -> Self {
        CmsError {
            kind: ErrorKind::InvalidStructure,
            context: None,
            inner: Some(err),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the operation that caused the error if it was recorded.
    pub fn context(&self) -> Option<&'static str> {
        self.context
    }
}

impl From<ErrorKind> for CmsError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<DecodeError<Infallible>> for CmsError {
    fn from(err: DecodeError<Infallible>) -> Self {
        Self::invalid_structure(err)
    }
}

impl fmt::Display for CmsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(context) = self.context {
            write!(f, " (in {})", context)?;
        }
        if let Some(inner) = self.inner.as_ref() {
            write!(f, ": {}", inner)?;
        }
        Ok(())
    }
}

impl error::Error for CmsError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.inner.as_ref().map(|err| err as &(dyn error::Error + 'static))
    }
}


//============ Tests =========================================================
