//! Certificate Revocation Lists.
//!
//! CRLs end up in a container in two places: the `crls` field of the
//! signed data and the revocation archival attribute of the signer. In
//! both cases they are embedded as they are, so a [`Crl`] keeps its
//! encoding and only parses what is needed to tell CRLs apart.
//!
//! [`Crl`]: struct.Crl.html

use std::convert::Infallible;
use std::fmt;
use bcder::{decode, encode};
use bcder::{BitString, Captured, Mode, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;
use crate::crypto::AlgorithmIdentifier;
use crate::util::der::Raw;
use crate::x509::{Name, Serial, Time};


//------------ Crl -----------------------------------------------------------

/// A certificate revocation list.
///
/// ```txt
/// CertificateList  ::=  SEQUENCE  {
///     tbsCertList          TBSCertList,
///     signatureAlgorithm   AlgorithmIdentifier,
///     signatureValue       BIT STRING  }
///
/// TBSCertList  ::=  SEQUENCE  {
///     version                 Version OPTIONAL,
///     signature               AlgorithmIdentifier,
///     issuer                  Name,
///     thisUpdate              Time,
///     nextUpdate              Time OPTIONAL,
///     revokedCertificates     SEQUENCE OF SEQUENCE  {
///          userCertificate         CertificateSerialNumber,
///          revocationDate          Time,
///          crlEntryExtensions      Extensions OPTIONAL
///                                   -- if present, version MUST be v2
///                               }  OPTIONAL,
///     crlExtensions           [0]  EXPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug)]
pub struct Crl {
    /// The complete encoded CRL.
    bytes: Bytes,

    issuer: Name,
    this_update: Time,
    next_update: Option<Time>,

    /// The serial numbers of the revoked certificates.
    revoked: Vec<Serial>,
}

impl Crl {
    /// Decodes a source as a CRL.
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    /// Takes an encoded CRL from the beginning of a constructed value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let captured = cons.capture(|cons| {
            cons.take_sequence(|cons| cons.skip_all())
        })?;
        Self::from_captured(captured).map_err(DecodeError::convert)
    }

    /// Takes an optional CRL from the beginning of a constructed value.
    ///
    /// Returns `Ok(None)` if the next value isn’t a sequence.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let mut found = false;
        let captured = cons.capture(|cons| {
            found = cons.take_opt_sequence(|cons| cons.skip_all())?.is_some();
            Ok(())
        })?;
        if !found {
            return Ok(None)
        }
        Self::from_captured(captured).map(Some).map_err(DecodeError::convert)
    }

    /// Parses a captured CRL.
    pub fn from_captured(
        captured: Captured
    ) -> Result<Self, DecodeError<Infallible>> {
        let bytes = captured.clone().into_bytes();
        captured.decode(|cons| {
            cons.take_sequence(|cons| {
                let res = cons.take_sequence(|cons| {
                    cons.take_opt_u8()?;
                    AlgorithmIdentifier::take_from(cons)?;
                    let issuer = Name::take_from(cons)?;
                    let this_update = Time::take_from(cons)?;
                    let next_update = Time::take_opt_from(cons)?;
                    let mut revoked = Vec::new();
                    cons.take_opt_sequence(|cons| {
                        while let Some(serial) = cons.take_opt_sequence(
                            |cons| {
                                let serial = Serial::take_from(cons)?;
                                Time::take_from(cons)?;
                                cons.skip_all()?;
                                Ok(serial)
                            }
                        )? {
                            revoked.push(serial)
                        }
                        Ok(())
                    })?;
                    cons.take_opt_constructed_if(
                        Tag::CTX_0, |cons| cons.skip_all()
                    )?;
                    Ok(Crl {
                        bytes: bytes.clone(),
                        issuer, this_update, next_update, revoked
                    })
                })?;
                AlgorithmIdentifier::take_from(cons)?;
                BitString::take_from(cons)?;
                Ok(res)
            })
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        Raw(self.bytes.clone())
    }

    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    pub fn this_update(&self) -> Time {
        self.this_update
    }

    pub fn next_update(&self) -> Option<Time> {
        self.next_update
    }

    /// Returns the serial numbers of the revoked certificates.
    pub fn revoked(&self) -> &[Serial] {
        &self.revoked
    }

    /// Returns whether the certificate with the given serial is revoked.
    pub fn contains(&self, serial: &Serial) -> bool {
        self.revoked.iter().any(|item| item == serial)
    }
}


//--- PartialEq and Eq

impl PartialEq for Crl {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Crl { }


//--- Display

impl fmt::Display for Crl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.issuer.common_name() {
            Some(name) => write!(f, "CRL by {} of {}", name, self.this_update),
            None => write!(f, "CRL of {}", self.this_update),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::test;

    #[test]
    fn decode_generated() {
        let bytes = test::make_crl_bytes("Test CA", &[3, 0x81]);
        let crl = Crl::decode(bytes.as_ref()).unwrap();
        assert_eq!(crl.as_slice(), bytes.as_ref());
        assert_eq!(crl.issuer(), &Name::from_common_name("Test CA"));
        assert_eq!(crl.this_update(), test::this_update());
        assert_eq!(crl.next_update(), Some(test::next_update()));
        assert_eq!(crl.revoked().len(), 2);
        assert!(crl.contains(&Serial::from(3)));
        assert!(crl.contains(&Serial::from(0x81)));
        assert!(!crl.contains(&Serial::from(4)));
    }

    #[test]
    fn empty_crl() {
        let crl = test::make_crl("Test CA", &[]);
        assert!(crl.revoked().is_empty());
        assert_eq!(crl.to_string(), format!(
            "CRL by Test CA of {}", test::this_update()
        ));
    }

    #[test]
    fn equality_by_bytes() {
        assert_eq!(test::make_crl("A", &[1]), test::make_crl("A", &[1]));
        assert_ne!(test::make_crl("A", &[1]), test::make_crl("A", &[2]));
    }

    #[test]
    fn reject_certificate() {
        let cert = test::make_cert(1, "Signer", "Test CA");
        assert!(Crl::decode(cert.as_slice()).is_err());
    }
}
