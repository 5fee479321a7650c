//! OCSP responses.
//!
//! Like CRLs, OCSP responses are only ever embedded into a container. The
//! [`OcspResponse`] type therefore keeps the encoded response and checks
//! its outer structure.
//!
//! [`OcspResponse`]: struct.OcspResponse.html

use std::convert::Infallible;
use std::fmt;
use bcder::{decode, encode};
use bcder::{Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::oid;
use crate::util::der::Raw;


//------------ OcspResponse --------------------------------------------------

/// An OCSP response.
///
/// ```txt
/// OCSPResponse ::= SEQUENCE {
///    responseStatus         OCSPResponseStatus,
///    responseBytes          [0] EXPLICIT ResponseBytes OPTIONAL }
///
/// ResponseBytes ::=       SEQUENCE {
///    responseType   OBJECT IDENTIFIER,
///    response       OCTET STRING }
/// ```
#[derive(Clone, Debug)]
pub struct OcspResponse {
    /// The complete encoded response.
    bytes: Bytes,

    status: OcspResponseStatus,

    /// The response type and the content of the response octet string.
    response: Option<(Oid<Bytes>, Bytes)>,
}

impl OcspResponse {
    /// Creates a successful response wrapping a basic OCSP response.
    ///
    /// The `basic` octets are the encoded BasicOCSPResponse. They are not
    /// checked.
    pub fn from_basic_response(basic: Bytes) -> Self {
        let bytes = encode::sequence((
            OcspResponseStatus::SUCCESSFUL.0.encode_as(Tag::ENUMERATED),
            encode::sequence_as(Tag::CTX_0,
                encode::sequence((
                    oid::PKIX_OCSP_BASIC.encode(),
                    OctetString::encode_slice(basic.as_ref()),
                ))
            )
        )).to_captured(Mode::Der).into_bytes();
        OcspResponse {
            bytes,
            status: OcspResponseStatus::SUCCESSFUL,
            response: Some((
                Oid(Bytes::from_static(oid::PKIX_OCSP_BASIC.0)), basic
            )),
        }
    }

    /// Decodes a source as an OCSP response.
    pub fn decode<S: IntoSource>(
        source: S
    ) -> Result<Self, DecodeError<<S::Source as Source>::Error>> {
        Mode::Der.decode(source, Self::take_from)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let captured = cons.capture(|cons| {
            cons.take_sequence(|cons| cons.skip_all())
        })?;
        Self::from_captured(captured).map_err(DecodeError::convert)
    }

    /// Takes an optional OCSP response from the beginning of a constructed value.
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

    /// Parses a captured OCSP response.
    pub fn from_captured(
        captured: Captured
    ) -> Result<Self, DecodeError<Infallible>> {
        let bytes = captured.clone().into_bytes();
        let (status, response) = captured.decode(|cons| {
            cons.take_sequence(|cons| {
                let status = cons.take_primitive_if(
                    Tag::ENUMERATED, |prim| prim.take_u8()
                )?;
                let response = cons.take_opt_constructed_if(
                    Tag::CTX_0, |cons| {
                        cons.take_sequence(|cons| {
                            Ok((
                                Oid::take_from(cons)?,
                                OctetString::take_from(cons)?.into_bytes()
                            ))
                        })
                    }
                )?;
                Ok((OcspResponseStatus(status), response))
            })
        })?;
        Ok(OcspResponse { bytes, status, response })
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

    pub fn status(&self) -> OcspResponseStatus {
        self.status
    }

    /// Returns the response type if the response has response bytes.
    pub fn response_type(&self) -> Option<&Oid<Bytes>> {
        self.response.as_ref().map(|item| &item.0)
    }

    /// Returns the encoded basic response if this is one.
    pub fn basic_response(&self) -> Option<Bytes> {
        match self.response {
            Some((ref kind, ref response))
                if *kind == oid::PKIX_OCSP_BASIC => Some(response.clone()),
            _ => None
        }
    }
}


//--- PartialEq and Eq

impl PartialEq for OcspResponse {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for OcspResponse { }


//------------ OcspResponseStatus --------------------------------------------

/// The status of an OCSP response.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OcspResponseStatus(u8);

impl OcspResponseStatus {
    pub const SUCCESSFUL: Self = OcspResponseStatus(0);
    pub const MALFORMED_REQUEST: Self = OcspResponseStatus(1);
    pub const INTERNAL_ERROR: Self = OcspResponseStatus(2);
    pub const TRY_LATER: Self = OcspResponseStatus(3);
    pub const SIG_REQUIRED: Self = OcspResponseStatus(5);
    pub const UNAUTHORIZED: Self = OcspResponseStatus(6);

    pub fn to_u8(self) -> u8 {
        self.0
    }

    pub fn is_successful(self) -> bool {
        self == Self::SUCCESSFUL
    }
}

impl From<u8> for OcspResponseStatus {
    fn from(value: u8) -> Self {
        OcspResponseStatus(value)
    }
}

impl fmt::Display for OcspResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            0 => f.write_str("successful"),
            1 => f.write_str("malformedRequest"),
            2 => f.write_str("internalError"),
            3 => f.write_str("tryLater"),
            5 => f.write_str("sigRequired"),
            6 => f.write_str("unauthorized"),
            other => write!(f, "unknown status {}", other),
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::test;

    #[test]
    fn basic_response() {
        let basic = Bytes::from_static(b"\x30\x03\x02\x01\x00");
        let resp = OcspResponse::from_basic_response(basic.clone());
        assert!(resp.status().is_successful());
        assert!(
            resp.response_type().map(|kind| *kind == oid::PKIX_OCSP_BASIC)
                .unwrap_or(false)
        );
        assert_eq!(resp.basic_response(), Some(basic));

        let decoded = OcspResponse::decode(resp.as_slice()).unwrap();
        assert_eq!(decoded, resp);
        assert_eq!(decoded.status(), resp.status());
        assert_eq!(decoded.basic_response(), resp.basic_response());
    }

    #[test]
    fn unsuccessful_response() {
        let resp = OcspResponse::decode(
            b"\x30\x03\x0a\x01\x03".as_ref()
        ).unwrap();
        assert_eq!(resp.status(), OcspResponseStatus::TRY_LATER);
        assert_eq!(resp.status().to_string(), "tryLater");
        assert!(resp.response_type().is_none());
        assert!(resp.basic_response().is_none());
    }

    #[test]
    fn generated_response() {
        let resp = test::make_ocsp(300, 1);
        assert!(resp.status().is_successful());
        assert!(resp.as_slice().len() >= 300);
        assert_ne!(resp, test::make_ocsp(300, 2));
    }

    #[test]
    fn reject_other_structures() {
        // INTEGER instead of ENUMERATED.
        assert!(OcspResponse::decode(b"\x30\x03\x02\x01\x00".as_ref()).is_err());
        let crl = test::make_crl("Test CA", &[]);
        assert!(OcspResponse::decode(crl.as_slice()).is_err());
    }
}
