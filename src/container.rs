//! The CMS signed data container.
//!
//! This is the top-level structure embedded into a document as its
//! signature. It wraps signed data with exactly one signer into a content
//! info value:
//!
//! ```txt
//! ContentInfo ::= SEQUENCE {
//!     contentType ContentType,
//!     content [0] EXPLICIT ANY DEFINED BY contentType }
//!
//! SignedData ::= SEQUENCE {
//!     version CMSVersion,
//!     digestAlgorithms DigestAlgorithmIdentifiers,
//!     encapContentInfo EncapsulatedContentInfo,
//!     certificates [0] IMPLICIT CertificateSet OPTIONAL,
//!     crls [1] IMPLICIT RevocationInfoChoices OPTIONAL,
//!     signerInfos SignerInfos }
//! ```

use std::convert::Infallible;
use bcder::{decode, encode};
use bcder::{Captured, Mode, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use log::debug;
use crate::oid;
use crate::cert::Cert;
use crate::content::EncapsulatedContentInfo;
use crate::crl::Crl;
use crate::crypto::AlgorithmIdentifier;
use crate::error::{CmsError, ErrorKind};
use crate::ocsp::OcspResponse;
use crate::revocation::{self, RevocationInfo};
use crate::signer::{RawSignerInfo, SidKind, SignerInfo};
use crate::util::der::{self, Raw, SetOf};


//------------ CmsContainer --------------------------------------------------

/// A signed data container with a single signer.
///
/// A container is either decoded from its encoding via [`decode`] or
/// built up from scratch by adding certificates, revocation information,
/// and finally the signer info, and then [serialized].
///
/// [`decode`]: #method.decode
/// [serialized]: #method.serialize
#[derive(Clone, Debug, Default)]
pub struct CmsContainer {
    /// The certificates in the order they were added.
    certificates: Vec<Cert>,

    /// The entries of the `crls` field.
    revocation_info: Vec<RevocationInfo>,

    encapsulated_content: EncapsulatedContentInfo,

    signer_info: Option<SignerInfo>,
}

/// # Building
///
impl CmsContainer {
    /// Creates an empty container with detached `id-data` content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds certificates.
    ///
    /// Certificates with the issuer and serial number of a certificate
    /// already present are skipped.
    pub fn add_certificates(&mut self, certs: impl IntoIterator<Item = Cert>) {
        for cert in certs {
            if self.certificates.iter().any(|item| item.same_identity(&cert)) {
                debug!("Skipping duplicate certificate {}.", cert);
                continue
            }
            self.certificates.push(cert)
        }
    }

    /// Adds a CRL unless the very same CRL is present already.
    pub fn add_crl(&mut self, crl: Crl) {
        let present = self.crls().any(|item| *item == crl);
        if !present {
            self.revocation_info.push(RevocationInfo::Crl(crl))
        }
    }

    /// Adds an OCSP response unless the very same response is present.
    pub fn add_ocsp(&mut self, response: OcspResponse) {
        let present = self.ocsp_responses().any(|item| *item == response);
        if !present {
            self.revocation_info.push(RevocationInfo::Ocsp(response))
        }
    }

    /// Adds an already encoded `RevocationInfoChoice` of unknown format.
    pub fn add_other_revocation_info(&mut self, info: Captured) {
        let present = self.other_revocation_info().any(|item| {
            item.as_slice() == info.as_slice()
        });
        if !present {
            self.revocation_info.push(RevocationInfo::Other(info))
        }
    }

    /// Installs the signer info, replacing any previous one.
    pub fn set_signer_info(&mut self, signer_info: SignerInfo) {
        self.signer_info = Some(signer_info)
    }

    pub fn set_encapsulated_content(
        &mut self, content: EncapsulatedContentInfo
    ) {
        self.encapsulated_content = content
    }
}


/// # Data Access
///
impl CmsContainer {
    /// Returns the digest algorithm of the signer.
    pub fn digest_algorithm(&self) -> Option<&AlgorithmIdentifier> {
        self.signer_info.as_ref()?.digest_algorithm()
    }

    pub fn certificates(&self) -> &[Cert] {
        &self.certificates
    }

    /// Returns all entries of the `crls` field.
    pub fn revocation_info(&self) -> &[RevocationInfo] {
        &self.revocation_info
    }

    pub fn crls(&self) -> impl Iterator<Item = &Crl> + '_ {
        self.revocation_info.iter().filter_map(|item| match *item {
            RevocationInfo::Crl(ref crl) => Some(crl),
            _ => None
        })
    }

    pub fn ocsp_responses(&self) -> impl Iterator<Item = &OcspResponse> + '_ {
        self.revocation_info.iter().filter_map(|item| match *item {
            RevocationInfo::Ocsp(ref ocsp) => Some(ocsp),
            _ => None
        })
    }

    /// Returns the revocation entries that are neither CRL nor OCSP.
    pub fn other_revocation_info(
        &self
    ) -> impl Iterator<Item = &Captured> + '_ {
        self.revocation_info.iter().filter_map(|item| match *item {
            RevocationInfo::Other(ref other) => Some(other),
            _ => None
        })
    }

    pub fn encapsulated_content(&self) -> &EncapsulatedContentInfo {
        &self.encapsulated_content
    }

    pub fn signer_info(&self) -> Option<&SignerInfo> {
        self.signer_info.as_ref()
    }

    pub fn signer_info_mut(&mut self) -> Option<&mut SignerInfo> {
        self.signer_info.as_mut()
    }

    /// Returns the signed data version.
    ///
    /// This follows section 5.1 of RFC 5652: 5 if there is revocation
    /// information of the other format, 3 if the signer is identified by
    /// key identifier or the content isn’t `id-data`, and 1 otherwise.
    pub fn version(&self) -> u8 {
        let key_id = self.signer_info.as_ref().map(|signer| {
            signer.sid_kind() == SidKind::SubjectKeyIdentifier
        }).unwrap_or(false);
        if self.revocation_info.iter().any(RevocationInfo::is_other_format) {
            5
        }
        else if key_id || !self.encapsulated_content.is_data() {
            3
        }
        else {
            1
        }
    }
}


/// # Decoding
///
impl CmsContainer {
    /// Decodes a container.
    ///
    /// Only containers with a single digest algorithm, at least one
    /// certificate, and a single signer info whose certificate is
    /// included are accepted. The source must end with the container.
    pub fn decode<S: IntoSource>(source: S) -> Result<Self, CmsError>
    where S::Source: Source<Error = Infallible> {
        der::decode_all(Mode::Ber, source, |cons| RawSignedData::take_from(cons))
            .map_err(CmsError::invalid_structure)?
            .into_container()
    }

    /// Decodes a container that may be followed by padding.
    ///
    /// Documents reserve space for the container and fill whatever isn’t
    /// used with zeros. Only the first value is decoded. Padding after a
    /// container in indefinite length form isn’t removed.
    pub fn decode_padded(data: &[u8]) -> Result<Self, CmsError> {
        let len = der::first_value_len(data).unwrap_or(data.len());
        Self::decode(data.get(..len).unwrap_or(data))
    }
}


/// # Encoding
///
impl CmsContainer {
    /// Returns a value encoder for the container.
    pub fn encode_ref(
        &self
    ) -> Result<impl encode::Values + '_, CmsError> {
        if self.certificates.is_empty() {
            return Err(ErrorKind::MissingCertificates.into())
        }
        let signer = self.signer_info.as_ref().ok_or(
            ErrorKind::MissingSignerInfo
        )?;
        let digest_algorithm = signer.digest_algorithm().ok_or(
            ErrorKind::MissingDigestAlgorithm
        )?;
        let signer = signer.encode_ref(true)?;
        let revocation_info = self.revocation_info_set();
        Ok(encode::sequence((
            oid::SIGNED_DATA.encode(),
            encode::sequence_as(Tag::CTX_0,
                encode::sequence((
                    self.version().encode(),
                    encode::set(digest_algorithm.encode_ref()),
                    self.encapsulated_content.encode_ref(),
                    encode::sequence_as(Tag::CTX_0, self.certificate_set()),
                    (!revocation_info.is_empty()).then(|| {
                        encode::sequence_as(Tag::CTX_1, revocation_info)
                    }),
                    encode::set(signer),
                ))
            )
        )))
    }

    /// Returns the DER encoded container.
    pub fn serialize(&self) -> Result<Bytes, CmsError> {
        Ok(self.encode_ref()?.to_captured(Mode::Der).into_bytes())
    }

    /// Returns an upper bound for the length of the encoded container.
    ///
    /// If the signer info doesn’t have a signature yet, its estimated size
    /// is used. The estimate holds for any signature not longer than the
    /// signer’s signature size hint.
    pub fn size_estimation(&self) -> Result<usize, CmsError> {
        if self.certificates.is_empty() {
            return Err(ErrorKind::MissingCertificates.into())
        }
        let signer = self.signer_info.as_ref().ok_or(
            ErrorKind::MissingSignerInfo
        )?;
        let digest_algorithm = signer.digest_algorithm().ok_or(
            ErrorKind::MissingDigestAlgorithm
        )?;
        let revocation_info = self.revocation_info_set();
        let signed_data = der::tlv_len(
            3 // version
            + der::tlv_len(digest_algorithm.encoded_len())
            + self.encapsulated_content.encoded_len()
            + der::tlv_len(self.certificate_set().content_len())
            + if revocation_info.is_empty() {
                0
            }
            else {
                der::tlv_len(revocation_info.content_len())
            }
            + der::tlv_len(signer.estimated_size()?)
        );
        let res = der::tlv_len(
            oid::SIGNED_DATA.encode().encoded_len(Mode::Der)
            + der::tlv_len(signed_data)
        );
        debug!(
            "Estimated container size: {} octets with {} certificates \
             and {} revocation entries.",
            res, self.certificates.len(), self.revocation_info.len()
        );
        Ok(res)
    }

    fn certificate_set(&self) -> SetOf {
        self.certificates.iter().map(Cert::encode_ref).collect()
    }

    fn revocation_info_set(&self) -> SetOf {
        let mut res = SetOf::new();
        for item in &self.revocation_info {
            match *item {
                RevocationInfo::Crl(ref crl) => res.push(crl.encode_ref()),
                RevocationInfo::Ocsp(ref ocsp) => {
                    res.push(revocation::encode_ocsp(ocsp))
                }
                RevocationInfo::Other(ref other) => res.push(Raw::from(other)),
            }
        }
        res
    }
}


//------------ RawSignedData -------------------------------------------------

/// Decoded signed data before its invariants have been checked.
struct RawSignedData {
    digest_algorithms: Vec<AlgorithmIdentifier>,
    encapsulated_content: EncapsulatedContentInfo,
    certificates: Option<Vec<Cert>>,
    revocation_info: Vec<RevocationInfo>,
    signer_infos: Vec<RawSignerInfo>,
}

impl RawSignedData {
    fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| { // ContentInfo
            oid::SIGNED_DATA.skip_if(cons)?; // contentType
            cons.take_constructed_if(Tag::CTX_0, |cons| { // content
                cons.take_sequence(Self::from_constructed)
            })
        })
    }

    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_u8()?; // version
        let digest_algorithms = cons.take_set(|cons| {
            let mut res = Vec::new();
            while let Some(alg) = AlgorithmIdentifier::take_opt_from(cons)? {
                res.push(alg)
            }
            Ok(res)
        })?;
        let encapsulated_content = EncapsulatedContentInfo::take_from(cons)?;
        let certificates = cons.take_opt_constructed_if(Tag::CTX_0, |cons| {
            let mut res = Vec::new();
            while let Some(cert) = Cert::take_opt_from(cons)? {
                res.push(cert)
            }
            Ok(res)
        })?;
        let revocation_info = cons.take_opt_constructed_if(Tag::CTX_1, |cons| {
            let mut res = Vec::new();
            while let Some(item) = RevocationInfo::take_opt_from(cons)? {
                res.push(item)
            }
            Ok(res)
        })?.unwrap_or_default();
        let signer_infos = cons.take_set(|cons| {
            let mut res = Vec::new();
            while let Some(item) = RawSignerInfo::take_opt_from(cons)? {
                res.push(item)
            }
            Ok(res)
        })?;
        Ok(RawSignedData {
            digest_algorithms, encapsulated_content, certificates,
            revocation_info, signer_infos
        })
    }

    /// Checks the invariants and resolves the signer’s certificate.
    fn into_container(self) -> Result<CmsContainer, CmsError> {
        let digest_algorithm = match self.digest_algorithms.split_first() {
            Some((first, rest)) => {
                if rest.iter().any(|alg| alg != first) {
                    return Err(ErrorKind::MultipleDigestAlgorithms.into())
                }
                first
            }
            None => return Err(ErrorKind::MissingDigestAlgorithm.into())
        };
        let certificates = match self.certificates {
            Some(certs) if !certs.is_empty() => certs,
            _ => return Err(ErrorKind::MissingCertificates.into())
        };
        let mut signer_infos = self.signer_infos.into_iter();
        let signer_info = signer_infos.next().ok_or(
            ErrorKind::MissingSignerInfo
        )?;
        if signer_infos.next().is_some() {
            return Err(ErrorKind::MultipleSignerInfos.into())
        }
        if signer_info.digest_algorithm() != digest_algorithm {
            debug!(
                "Signed data declares digest algorithm {} but the signer \
                 uses {}.",
                digest_algorithm, signer_info.digest_algorithm()
            );
            return Err(ErrorKind::InvalidStructure.into())
        }
        let signer_info = signer_info.resolve(&certificates)?;
        Ok(CmsContainer {
            certificates,
            revocation_info: self.revocation_info,
            encapsulated_content: self.encapsulated_content,
            signer_info: Some(signer_info),
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bcder::OctetString;
    use crate::crypto::{DigestAlgorithm, SignatureAlgorithm};
    use crate::test;

    fn make_signer(cert: &Cert, digest: DigestAlgorithm) -> SignerInfo {
        let mut res = SignerInfo::new();
        res.set_digest_algorithm(digest.identifier());
        res.set_signature_algorithm(
            SignatureAlgorithm::RsaPkcs1(digest).identifier()
        );
        res.set_signing_certificate_and_add_to_signed_attrs(
            cert.clone(), digest
        ).unwrap();
        res.set_content_type(&oid::DATA).unwrap();
        res.set_message_digest_of(b"document").unwrap();
        res.serialize_signed_attrs();
        res.set_signature(Bytes::from(vec![0x33; 256]));
        res
    }

    fn make_container() -> CmsContainer {
        let signer = test::make_cert(1, "Signer", "Test CA");
        let mut res = CmsContainer::new();
        res.add_certificates([
            signer.clone(),
            test::make_cert(2, "Test CA", "Root"),
        ]);
        res.set_signer_info(make_signer(&signer, DigestAlgorithm::Sha256));
        res
    }

    /// Encodes signed data from its parts.
    fn signed_data(
        digest_algorithms: &[AlgorithmIdentifier],
        certificates: Option<&[Cert]>,
        signer_infos: &[Captured],
    ) -> Bytes {
        encode::sequence((
            oid::SIGNED_DATA.encode(),
            encode::sequence_as(Tag::CTX_0,
                encode::sequence((
                    1u8.encode(),
                    encode::set(encode::iter(
                        digest_algorithms.iter().map(
                            AlgorithmIdentifier::encode_ref
                        )
                    )),
                    EncapsulatedContentInfo::data().encode_ref(),
                    certificates.map(|certs| {
                        encode::sequence_as(Tag::CTX_0, encode::iter(
                            certs.iter().map(Cert::encode_ref)
                        ))
                    }),
                    encode::set(encode::iter(
                        signer_infos.iter().map(Raw::from)
                    )),
                ))
            )
        )).to_captured(Mode::Der).into_bytes()
    }

    #[test]
    fn round_trip() {
        let mut container = make_container();
        container.add_crl(test::make_crl("Test CA", &[7]));
        container.add_ocsp(test::make_ocsp(250, 1));
        let encoded = container.serialize().unwrap();

        let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
        assert_eq!(decoded.digest_algorithm(), container.digest_algorithm());
        assert_eq!(decoded.certificates().len(), 2);
        assert_eq!(decoded.crls().count(), 1);
        assert_eq!(decoded.ocsp_responses().count(), 1);
        assert_eq!(decoded.other_revocation_info().count(), 0);
        assert_eq!(
            decoded.signer_info().unwrap().signing_certificate().unwrap()
                .serial_number(),
            container.certificates()[0].serial_number()
        );
        assert!(decoded.signer_info().unwrap().is_frozen());
        assert_eq!(decoded.serialize().unwrap(), encoded);
    }

    #[test]
    fn deduplicate() {
        let mut container = make_container();
        let mut params = test::CertParams::new(1);
        params.key_seed = 12;
        container.add_certificates(vec![
            Cert::decode(test::make_cert_bytes(&params)).unwrap(),
            test::make_cert(2, "Test CA", "Root"),
            test::make_cert(3, "Root", "Root"),
        ]);
        assert_eq!(container.certificates().len(), 3);
        assert_eq!(
            container.certificates()[0], test::make_cert(1, "Signer", "Test CA")
        );

        container.add_crl(test::make_crl("Test CA", &[1]));
        container.add_crl(test::make_crl("Test CA", &[1]));
        container.add_crl(test::make_crl("Test CA", &[2]));
        container.add_ocsp(test::make_ocsp(100, 1));
        container.add_ocsp(test::make_ocsp(100, 1));
        assert_eq!(container.crls().count(), 2);
        assert_eq!(container.ocsp_responses().count(), 1);
        assert_eq!(container.revocation_info().len(), 3);
    }

    #[test]
    fn version() {
        let mut container = make_container();
        assert_eq!(container.version(), 1);
        container.add_crl(test::make_crl("Test CA", &[]));
        assert_eq!(container.version(), 1);

        container.signer_info_mut().unwrap().set_sid_kind(
            SidKind::SubjectKeyIdentifier
        );
        assert_eq!(container.version(), 3);
        container.signer_info_mut().unwrap().set_sid_kind(
            SidKind::IssuerAndSerialNumber
        );
        container.set_encapsulated_content(
            EncapsulatedContentInfo::detached(oid::SIGNED_DATA)
        );
        assert_eq!(container.version(), 3);

        container.set_encapsulated_content(EncapsulatedContentInfo::data());
        container.add_ocsp(test::make_ocsp(100, 1));
        assert_eq!(container.version(), 5);

        let mut container = make_container();
        container.add_other_revocation_info(
            Mode::Der.decode(
                b"\xa1\x07\x06\x03\x2a\x03\x04\x05\x00".as_ref(),
                |cons| cons.capture_one()
            ).unwrap()
        );
        assert_eq!(container.version(), 5);
        let encoded = container.serialize().unwrap();
        let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
        assert_eq!(decoded.version(), 5);
        assert_eq!(decoded.other_revocation_info().count(), 1);
        assert_eq!(decoded.serialize().unwrap(), encoded);
    }

    #[test]
    fn serialize_errors() {
        let container = CmsContainer::new();
        assert_eq!(
            container.serialize().unwrap_err().kind(),
            ErrorKind::MissingCertificates
        );
        let mut container = CmsContainer::new();
        container.add_certificates([test::make_cert(1, "Signer", "Test CA")]);
        assert_eq!(
            container.serialize().unwrap_err().kind(),
            ErrorKind::MissingSignerInfo
        );
        assert_eq!(
            container.size_estimation().unwrap_err().kind(),
            ErrorKind::MissingSignerInfo
        );
        container.set_signer_info(SignerInfo::new());
        assert_eq!(
            container.serialize().unwrap_err().kind(),
            ErrorKind::MissingDigestAlgorithm
        );
    }

    #[test]
    fn size_estimation() {
        let mut container = make_container();
        container.add_crl(test::make_crl("Test CA", &[1, 2, 3]));
        container.add_ocsp(test::make_ocsp(250, 2));
        let len = container.serialize().unwrap().len();
        assert_eq!(container.size_estimation().unwrap(), len);

        // Without signature, the estimate uses the 256 octets of the key.
        let mut signer = make_signer(
            &container.certificates()[0], DigestAlgorithm::Sha256
        );
        let mut unsigned = SignerInfo::new();
        unsigned.set_serialized_signed_attrs(
            signer.serialize_signed_attrs()
        ).unwrap();
        unsigned.set_signing_certificate(container.certificates()[0].clone());
        unsigned.set_digest_algorithm(DigestAlgorithm::Sha256.identifier());
        unsigned.set_signature_algorithm(
            SignatureAlgorithm::RsaPkcs1(DigestAlgorithm::Sha256).identifier()
        );
        container.set_signer_info(unsigned);
        let estimate = container.size_estimation().unwrap();
        assert!(estimate >= len);
        container.signer_info_mut().unwrap().set_signature(
            Bytes::from(vec![0x44; 256])
        );
        assert_eq!(estimate, container.serialize().unwrap().len());
    }

    #[test]
    fn padded() {
        let container = make_container();
        let mut data = container.serialize().unwrap().to_vec();
        let len = data.len();
        data.resize(len + 1000, 0);
        let decoded = CmsContainer::decode_padded(&data).unwrap();
        assert_eq!(decoded.serialize().unwrap().len(), len);
        assert_eq!(
            CmsContainer::decode(data.as_slice()).unwrap_err().kind(),
            ErrorKind::InvalidStructure
        );

        let mut data = container.serialize().unwrap().to_vec();
        data.extend_from_slice(b"\x02\x01\x05garbage");
        assert_eq!(
            CmsContainer::decode(data.as_slice()).unwrap_err().kind(),
            ErrorKind::InvalidStructure
        );
        assert!(CmsContainer::decode_padded(&data).is_ok());
    }

    #[test]
    fn unparseable_revocation_info() {
        let broken = Mode::Der.decode(
            b"\x30\x03\x02\x01\x00".as_ref(), |cons| cons.capture_one()
        ).unwrap();
        let mut container = make_container();
        container.add_crl(test::make_crl("Test CA", &[7]));
        container.add_other_revocation_info(broken.clone());
        let encoded = container.serialize().unwrap();
        assert!(
            encoded.windows(5).any(|item| item == broken.as_slice())
        );

        let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
        assert_eq!(decoded.crls().count(), 1);
        assert_eq!(decoded.ocsp_responses().count(), 0);
        let other: Vec<_> = decoded.other_revocation_info().collect();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].as_slice(), broken.as_slice());
        assert_eq!(decoded.version(), 5);
        assert_eq!(decoded.serialize().unwrap(), encoded);
    }

    #[test]
    fn cardinality() {
        let cert = test::make_cert(1, "Signer", "Test CA");
        let signer = make_signer(&cert, DigestAlgorithm::Sha256)
            .to_captured(true).unwrap();
        let other = make_signer(&cert, DigestAlgorithm::Sha512)
            .to_captured(true).unwrap();
        let sha256 = DigestAlgorithm::Sha256.identifier();
        let sha512 = DigestAlgorithm::Sha512.identifier();
        let certs = [cert.clone()];

        let good = signed_data(
            &[sha256.clone()], Some(&certs[..]), &[signer.clone()]
        );
        assert!(CmsContainer::decode(good.as_ref()).is_ok());

        let cases = [
            (
                signed_data(
                    &[sha256.clone(), sha512.clone()], Some(&certs[..]),
                    &[signer.clone()]
                ),
                ErrorKind::MultipleDigestAlgorithms
            ),
            (
                signed_data(&[], Some(&certs[..]), &[signer.clone()]),
                ErrorKind::MissingDigestAlgorithm
            ),
            (
                signed_data(
                    &[sha512.clone()], Some(&certs[..]), &[signer.clone()]
                ),
                ErrorKind::InvalidStructure
            ),
            (
                signed_data(&[sha256.clone()], None, &[signer.clone()]),
                ErrorKind::MissingCertificates
            ),
            (
                signed_data(
                    &[sha256.clone()], Some(&[] as &[Cert]), &[signer.clone()]
                ),
                ErrorKind::MissingCertificates
            ),
            (
                signed_data(
                    &[sha256.clone()], Some(&certs[..]),
                    &[signer.clone(), other]
                ),
                ErrorKind::MultipleSignerInfos
            ),
            (
                signed_data(&[sha256.clone()], Some(&certs[..]), &[]),
                ErrorKind::MissingSignerInfo
            ),
            (
                signed_data(
                    &[sha256],
                    Some(&[test::make_cert(5, "Other", "Test CA")][..]),
                    &[signer]
                ),
                ErrorKind::CertificateNotFound
            ),
        ];
        for (data, kind) in cases {
            assert_eq!(
                CmsContainer::decode(data.as_ref()).unwrap_err().kind(),
                kind
            );
        }
    }

    #[test]
    fn missing_sid_tag() {
        let cert = test::make_cert(1, "Signer", "Test CA");
        let key_id = cert.subject_key_identifier().unwrap().clone();
        let signer = encode::sequence((
            3u8.encode(),
            OctetString::encode_slice(key_id.as_slice()), // not [0]
            DigestAlgorithm::Sha256.identifier().encode_ref(),
            SignatureAlgorithm::RsaPkcs1(
                DigestAlgorithm::Sha256
            ).identifier().encode_ref(),
            OctetString::encode_slice(b"signature"),
        )).to_captured(Mode::Der);
        let data = signed_data(
            &[DigestAlgorithm::Sha256.identifier()],
            Some(&[cert][..]),
            &[signer]
        );
        let err = CmsContainer::decode(data.as_ref()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidStructure);
        assert_eq!(
            err.to_string().split(':').next(),
            Some("invalid container structure")
        );
    }

    #[test]
    fn not_signed_data() {
        assert_eq!(
            CmsContainer::decode(b"\x30\x03\x02\x01\x01".as_ref())
                .unwrap_err().kind(),
            ErrorKind::InvalidStructure
        );
        assert_eq!(
            CmsContainer::decode(b"".as_ref()).unwrap_err().kind(),
            ErrorKind::InvalidStructure
        );
    }
}
