//! X.509 certificates.
//!
//! Certificates are carried in a container but never validated by this
//! crate. We only need to find the signer’s certificate, identify it in the
//! signer identifier and the signing certificate attribute, and learn how
//! large its signatures are.

use std::convert::Infallible;
use std::fmt;
use bcder::{decode, encode};
use bcder::{BitString, Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;
use crate::oid;
use crate::crypto::{AlgorithmIdentifier, KeyIdentifier, PublicKey};
use crate::util::der::Raw;
use crate::x509::{Name, Serial};


//------------ Cert ----------------------------------------------------------

/// An X.509 certificate.
///
/// The certificate keeps its encoded form and encodes to exactly the octets
/// it was decoded from. The fields needed for building a container are
/// parsed out of it.
///
/// ```txt
/// Certificate  ::=  SEQUENCE  {
///      tbsCertificate       TBSCertificate,
///      signatureAlgorithm   AlgorithmIdentifier,
///      signatureValue       BIT STRING  }
///
/// TBSCertificate  ::=  SEQUENCE  {
///      version         [0]  EXPLICIT Version DEFAULT v1,
///      serialNumber         CertificateSerialNumber,
///      signature            AlgorithmIdentifier,
///      issuer               Name,
///      validity             Validity,
///      subject              Name,
///      subjectPublicKeyInfo SubjectPublicKeyInfo,
///      issuerUniqueID  [1]  IMPLICIT UniqueIdentifier OPTIONAL,
///      subjectUniqueID [2]  IMPLICIT UniqueIdentifier OPTIONAL,
///      extensions      [3]  EXPLICIT Extensions OPTIONAL }
/// ```
#[derive(Clone, Debug)]
pub struct Cert {
    /// The complete encoded certificate.
    bytes: Bytes,

    serial_number: Serial,
    issuer: Name,
    subject: Name,
    subject_public_key_info: PublicKey,

    /// The content of the subject key identifier extension if present.
    subject_key_identifier: Option<KeyIdentifier>,
}

/// # Decoding and Encoding
///
impl Cert {
    /// Decodes a source as a certificate.
    pub fn decode<S: IntoSource>(
        source: S,
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    /// Takes an encoded certificate from the beginning of a value.
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let captured = cons.capture(|cons| {
            cons.take_sequence(|cons| cons.skip_all())
        })?;
        Self::from_captured(captured).map_err(DecodeError::convert)
    }

    /// Takes an optional certificate from the beginning of a value.
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

    /// Parses a captured certificate.
    pub fn from_captured(
        captured: Captured
    ) -> Result<Self, DecodeError<Infallible>> {
        let bytes = captured.clone().into_bytes();
        captured.decode(|cons| {
            cons.take_sequence(|cons| {
                let res = cons.take_sequence(|cons| {
                    Self::from_tbs(bytes.clone(), cons)
                })?;
                AlgorithmIdentifier::take_from(cons)?;
                BitString::take_from(cons)?;
                Ok(res)
            })
        })
    }

    /// Parses the content of the TBSCertificate sequence.
    fn from_tbs<S: decode::Source>(
        bytes: Bytes,
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_opt_constructed_if(Tag::CTX_0, |cons| cons.take_u8())?;
        let serial_number = Serial::take_from(cons)?;
        AlgorithmIdentifier::take_from(cons)?;
        let issuer = Name::take_from(cons)?;
        cons.take_sequence(|cons| cons.skip_all())?; // validity
        let subject = Name::take_from(cons)?;
        let subject_public_key_info = PublicKey::take_from(cons)?;
        cons.take_opt_value_if(Tag::CTX_1, BitString::from_content)?;
        cons.take_opt_value_if(Tag::CTX_2, BitString::from_content)?;

        let mut subject_key_identifier = None;
        cons.take_opt_constructed_if(Tag::CTX_3, |cons| {
            cons.take_sequence(|cons| {
                while let Some(()) = cons.take_opt_sequence(|cons| {
                    let id = Oid::take_from(cons)?;
                    cons.take_opt_bool()?;
                    let value = OctetString::take_from(cons)?;
                    if id == oid::CE_SUBJECT_KEY_IDENTIFIER {
                        if subject_key_identifier.is_some() {
                            return Err(cons.content_err(
                                "duplicate subject key identifier"
                            ))
                        }
                        subject_key_identifier = Some(
                            Mode::Der.decode(value, KeyIdentifier::take_from)
                                .map_err(DecodeError::convert)?
                        );
                    }
                    Ok(())
                })? { }
                Ok(())
            })
        })?;

        Ok(Cert {
            bytes,
            serial_number,
            issuer,
            subject,
            subject_public_key_info,
            subject_key_identifier,
        })
    }

    /// Returns a value encoder for a reference to the certificate.
    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        Raw(self.bytes.clone())
    }

    /// Returns a captured encoding of the certificate.
    pub fn to_captured(&self) -> Captured {
        Captured::from_values(Mode::Der, self.encode_ref())
    }
}


/// # Data Access
///
impl Cert {
    /// Returns the encoded certificate.
    pub fn as_slice(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Returns the encoded certificate.
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    pub fn serial_number(&self) -> &Serial {
        &self.serial_number
    }

    pub fn issuer(&self) -> &Name {
        &self.issuer
    }

    pub fn subject(&self) -> &Name {
        &self.subject
    }

    pub fn subject_public_key_info(&self) -> &PublicKey {
        &self.subject_public_key_info
    }

    pub fn subject_key_identifier(&self) -> Option<&KeyIdentifier> {
        self.subject_key_identifier.as_ref()
    }

    /// Returns the algorithm of the subject public key.
    pub fn key_algorithm(&self) -> &AlgorithmIdentifier {
        self.subject_public_key_info.algorithm()
    }

    /// Returns the size of the subject public key in bits if known.
    pub fn key_len(&self) -> Option<usize> {
        self.subject_public_key_info.key_len()
    }

    /// Returns whether the two certificates have the same issuer and serial.
    ///
    /// Since an issuer never uses a serial number twice, this identifies a
    /// certificate.
    pub fn same_identity(&self, other: &Cert) -> bool {
        self.serial_number == other.serial_number
        && self.issuer == other.issuer
    }
}


//--- PartialEq and Eq

impl PartialEq for Cert {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Cert { }


//--- Display

impl fmt::Display for Cert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.subject.common_name() {
            Some(name) => write!(f, "{} ({})", name, self.serial_number),
            None => write!(f, "serial {}", self.serial_number),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bcder::encode::Values;
    use crate::test;

    #[test]
    fn decode_generated() {
        let cert = test::make_cert(0x1234, "Signer", "Test CA");
        assert_eq!(cert.serial_number(), &Serial::from(0x1234));
        assert_eq!(cert.issuer(), &Name::from_common_name("Test CA"));
        assert_eq!(cert.subject(), &Name::from_common_name("Signer"));
        assert_eq!(
            cert.subject_key_identifier(),
            Some(&cert.subject_public_key_info().key_identifier())
        );
        assert_eq!(cert.key_algorithm().algorithm(), &oid::RSA_ENCRYPTION);
        assert_eq!(cert.key_len(), Some(2048));
        assert_eq!(cert.to_string(), "Signer (1234)");
    }

    #[test]
    fn encodes_verbatim() {
        let bytes = test::make_cert_bytes(&test::CertParams::new(7));
        let cert = Cert::decode(bytes.as_ref()).unwrap();
        assert_eq!(cert.as_slice(), bytes.as_ref());
        assert_eq!(cert.to_captured().as_slice(), bytes.as_ref());
        assert_eq!(
            cert.encode_ref().encoded_len(Mode::Der), bytes.len()
        );
    }

    #[test]
    fn without_key_identifier() {
        let mut params = test::CertParams::new(8);
        params.subject_key_identifier = false;
        let cert = Cert::decode(test::make_cert_bytes(&params)).unwrap();
        assert!(cert.subject_key_identifier().is_none());
    }

    #[test]
    fn identity() {
        let first = test::make_cert(1, "Signer", "Test CA");
        let mut params = test::CertParams::new(1);
        params.key_seed = 99;
        let second = Cert::decode(test::make_cert_bytes(&params)).unwrap();
        let third = test::make_cert(2, "Signer", "Test CA");
        assert!(first.same_identity(&second));
        assert_ne!(first, second);
        assert!(!first.same_identity(&third));
    }

    #[test]
    fn take_opt_from() {
        let cert = test::make_cert(3, "Signer", "Test CA");
        let mut data = cert.to_bytes().to_vec();
        data.extend_from_slice(b"\x05\x00");
        let (some, none) = Mode::Der.decode(data.as_slice(), |cons| {
            let some = Cert::take_opt_from(cons)?;
            let none = Cert::take_opt_from(cons)?;
            cons.take_opt_null()?;
            Ok((some, none))
        }).unwrap();
        assert_eq!(some, Some(cert));
        assert!(none.is_none());
    }

    #[test]
    fn reject_garbage() {
        assert!(Cert::decode(b"\x30\x03\x02\x01\x01".as_ref()).is_err());
        assert!(Cert::decode(b"\x04\x00".as_ref()).is_err());
    }
}
