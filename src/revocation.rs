//! Revocation information.
//!
//! Revocation information appears in two places of a container. The
//! `crls` field of the signed data holds a SET of entries which can be
//! CRLs or anything else wrapped into an `OtherRevocationInfoFormat`. OCSP
//! responses use the latter. In addition, document signatures embed CRLs
//! and OCSP responses in the signed `adbe-revocationInfoArchival`
//! attribute so that they are covered by the signature.

use std::convert::Infallible;
use bcder::{decode, encode};
use bcder::{Captured, Mode, Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use log::{debug, warn};
use crate::attr::{Attribute, AttributeSet};
use crate::crl::Crl;
use crate::ocsp::OcspResponse;
use crate::oid;
use crate::util::der::{self, Raw};


//------------ RevocationInfo ------------------------------------------------

/// A single entry of the `crls` field of signed data.
///
/// ```txt
/// RevocationInfoChoice ::= CHOICE {
///     crl CertificateList,
///     other [1] IMPLICIT OtherRevocationInfoFormat }
///
/// OtherRevocationInfoFormat ::= SEQUENCE {
///     otherRevInfoFormat OBJECT IDENTIFIER,
///     otherRevInfo ANY DEFINED BY otherRevInfoFormat }
/// ```
#[derive(Clone, Debug)]
pub enum RevocationInfo {
    /// A certificate revocation list.
    Crl(Crl),

    /// An OCSP response in the `id-ri-ocsp-response` format.
    Ocsp(OcspResponse),

    /// Anything else, kept as it was encoded.
    Other(Captured),
}

impl RevocationInfo {
    /// Takes an entry from the beginning of a constructed value.
    ///
    /// Only fails if there isn’t a value at all. Anything that can’t be
    /// recognized becomes an `Other` entry.
    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        Ok(der::take_opt_captured(cons)?.map(Self::from_captured))
    }

    /// Classifies an encoded entry.
    pub fn from_captured(captured: Captured) -> Self {
        let crl_err = match Crl::from_captured(captured.clone()) {
            Ok(crl) => return RevocationInfo::Crl(crl),
            Err(err) => err
        };
        match Self::take_other_format(&captured) {
            Ok(Some(ocsp)) => RevocationInfo::Ocsp(ocsp),
            Ok(None) => {
                debug!("Keeping revocation info of unknown format.");
                RevocationInfo::Other(captured)
            }
            Err(err) => {
                warn!(
                    "Keeping unrecognized revocation info. \
                     Not a CRL: {}. Not an OCSP response: {}.",
                    crl_err, err
                );
                RevocationInfo::Other(captured)
            }
        }
    }

    /// Decodes an `OtherRevocationInfoFormat`.
    ///
    /// Returns `Ok(None)` if the format isn’t an OCSP response.
    fn take_other_format(
        captured: &Captured
    ) -> Result<Option<OcspResponse>, DecodeError<Infallible>> {
        captured.clone().decode(|cons| {
            cons.take_constructed_if(Tag::CTX_1, |cons| {
                let format = Oid::take_from(cons)?;
                if format != oid::RI_OCSP_RESPONSE {
                    cons.skip_all()?;
                    return Ok(None)
                }
                OcspResponse::take_from(cons).map(Some)
            })
        })
    }

    /// Returns whether this entry is of the `other` choice.
    pub fn is_other_format(&self) -> bool {
        !matches!(*self, RevocationInfo::Crl(_))
    }

    /// Returns the encoded entry.
    pub fn to_bytes(&self) -> Bytes {
        match *self {
            RevocationInfo::Crl(ref crl) => crl.to_bytes(),
            RevocationInfo::Ocsp(ref ocsp) => {
                encode_ocsp(ocsp).to_captured(Mode::Der).into_bytes()
            }
            RevocationInfo::Other(ref captured) => {
                captured.clone().into_bytes()
            }
        }
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        Raw(self.to_bytes())
    }
}

/// Returns the value encoder for an OCSP response as other revocation info.
pub fn encode_ocsp(ocsp: &OcspResponse) -> impl encode::Values + '_ {
    encode::sequence_as(Tag::CTX_1, (
        oid::RI_OCSP_RESPONSE.encode(),
        ocsp.encode_ref(),
    ))
}


//------------ RevocationArchival --------------------------------------------

/// The value of the `adbe-revocationInfoArchival` attribute.
///
/// ```txt
/// RevocationInfoArchival ::= SEQUENCE {
///     crl [0] EXPLICIT SEQUENCE of CRLs OPTIONAL,
///     ocsp [1] EXPLICIT SEQUENCE of OCSP Responses OPTIONAL,
///     otherRevInfo [2] EXPLICIT SEQUENCE of OtherRevInfo OPTIONAL }
/// ```
///
/// Other revocation info is skipped when decoding.
#[derive(Clone, Debug, Default)]
pub struct RevocationArchival {
    pub crls: Vec<Crl>,
    pub ocsp_responses: Vec<OcspResponse>,
}

impl RevocationArchival {
    pub fn new(crls: Vec<Crl>, ocsp_responses: Vec<OcspResponse>) -> Self {
        RevocationArchival { crls, ocsp_responses }
    }

    pub fn is_empty(&self) -> bool {
        self.crls.is_empty() && self.ocsp_responses.is_empty()
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            let crls = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
                cons.take_sequence(|cons| {
                    let mut res = Vec::new();
                    while let Some(crl) = Crl::take_opt_from(cons)? {
                        res.push(crl)
                    }
                    Ok(res)
                })
            })?.unwrap_or_default();
            let ocsp_responses = cons.take_opt_constructed_if(
                Tag::CTX_1, |cons| {
                    cons.take_sequence(|cons| {
                        let mut res = Vec::new();
                        while let Some(item) = OcspResponse::take_opt_from(
                            cons
                        )? {
                            res.push(item)
                        }
                        Ok(res)
                    })
                }
            )?.unwrap_or_default();
            cons.take_opt_constructed_if(Tag::CTX_2, |cons| cons.skip_all())?;
            Ok(RevocationArchival { crls, ocsp_responses })
        })
    }

    /// Decodes the value of an attribute.
    pub fn from_attribute(
        attr: &Attribute
    ) -> Result<Self, DecodeError<Infallible>> {
        attr.decode_values(|cons| Self::take_from(cons))
    }

    /// Returns the archived revocation info of a set of signed attributes.
    ///
    /// A malformed attribute is treated as if it was missing.
    pub fn from_signed_attrs(attrs: &AttributeSet) -> Self {
        let attr = match attrs.get(&oid::ADBE_REVOCATION_INFO_ARCHIVAL) {
            Some(attr) => attr,
            None => return Self::default()
        };
        Self::from_attribute(attr).unwrap_or_else(|err| {
            warn!("Ignoring malformed revocation archival attribute: {}", err);
            Self::default()
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            (!self.crls.is_empty()).then(|| {
                encode::sequence_as(Tag::CTX_0,
                    encode::sequence(
                        encode::iter(self.crls.iter().map(Crl::encode_ref))
                    )
                )
            }),
            (!self.ocsp_responses.is_empty()).then(|| {
                encode::sequence_as(Tag::CTX_1,
                    encode::sequence(
                        encode::iter(
                            self.ocsp_responses.iter().map(
                                OcspResponse::encode_ref
                            )
                        )
                    )
                )
            }),
        ))
    }

    /// Returns the attribute or `None` if there is nothing to archive.
    pub fn to_attribute(&self) -> Option<Attribute> {
        if self.is_empty() {
            None
        }
        else {
            Some(Attribute::new(
                &oid::ADBE_REVOCATION_INFO_ARCHIVAL, self.encode_ref()
            ))
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::test;

    fn capture(data: &[u8]) -> Captured {
        Mode::Ber.decode(data, |cons| cons.capture_one()).unwrap()
    }

    #[test]
    fn classify_crl() {
        let crl = test::make_crl("Test CA", &[1]);
        match RevocationInfo::from_captured(capture(crl.as_slice())) {
            RevocationInfo::Crl(decoded) => assert_eq!(decoded, crl),
            other => panic!("expected CRL, got {:?}", other),
        }
    }

    #[test]
    fn classify_ocsp() {
        let ocsp = test::make_ocsp(200, 1);
        let info = RevocationInfo::Ocsp(ocsp.clone());
        let encoded = info.to_bytes();
        assert_eq!(encoded[0], 0xA1);
        let decoded = RevocationInfo::from_captured(capture(&encoded));
        assert!(decoded.is_other_format());
        match decoded {
            RevocationInfo::Ocsp(ref decoded) => assert_eq!(*decoded, ocsp),
            ref other => panic!("expected OCSP, got {:?}", other),
        }
        assert_eq!(decoded.to_bytes(), encoded);
    }

    #[test]
    fn classify_other() {
        // Unknown format.
        let unknown = b"\xa1\x07\x06\x03\x2a\x03\x04\x05\x00";
        // OCSP format with a broken response.
        let broken = b"\xa1\x0e\x06\x08\x2b\x06\x01\x05\x05\x07\x10\x02\
                       \x30\x02\x05\x00";
        // A sequence that isn’t a CRL.
        let seq = b"\x30\x03\x02\x01\x00";
        for data in [unknown.as_ref(), broken.as_ref(), seq.as_ref()] {
            let info = RevocationInfo::from_captured(capture(data));
            assert!(matches!(info, RevocationInfo::Other(_)));
            assert!(info.is_other_format());
            assert_eq!(info.to_bytes().as_ref(), data);
        }
    }

    #[test]
    fn archival_round_trip() {
        let archival = RevocationArchival::new(
            vec![test::make_crl("Test CA", &[1]), test::make_crl("Root", &[])],
            vec![test::make_ocsp(150, 3)],
        );
        let attr = archival.to_attribute().unwrap();
        assert!(*attr.attr_type() == oid::ADBE_REVOCATION_INFO_ARCHIVAL);
        let decoded = RevocationArchival::from_attribute(&attr).unwrap();
        assert_eq!(decoded.crls, archival.crls);
        assert_eq!(decoded.ocsp_responses, archival.ocsp_responses);
    }

    #[test]
    fn archival_omits_empty_lists() {
        assert!(RevocationArchival::default().to_attribute().is_none());

        let archival = RevocationArchival::new(
            Vec::new(), vec![test::make_ocsp(100, 4)]
        );
        let value = archival.encode_ref().to_captured(Mode::Der);
        let content = Mode::Der.decode(value.as_slice(), |cons| {
            cons.take_sequence(|cons| cons.capture_all())
        }).unwrap();
        assert_eq!(content.as_slice()[0], 0xA1);
        let decoded = RevocationArchival::from_attribute(
            &archival.to_attribute().unwrap()
        ).unwrap();
        assert!(decoded.crls.is_empty());
        assert_eq!(decoded.ocsp_responses.len(), 1);
    }
}
