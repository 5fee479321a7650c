//! Signer information.
//!
//! A container holds exactly one [`SignerInfo`]. It is assembled step by
//! step while a document is signed: first the signed attributes are
//! collected, then they are serialized and handed to the actual signer,
//! and finally the signature is added. Once the signed attributes have been
//! serialized, they are frozen since any change would invalidate the
//! signature.
//!
//! [`SignerInfo`]: struct.SignerInfo.html

use std::convert::Infallible;
use bcder::{decode, encode};
use bcder::{Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::{DecodeError, IntoSource, Source};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use log::debug;
use crate::oid;
use crate::attr::{Attribute, AttributeSet};
use crate::cert::Cert;
use crate::crl::Crl;
use crate::crypto::{AlgorithmIdentifier, DigestAlgorithm, KeyIdentifier};
use crate::error::{CmsError, ErrorKind};
use crate::ocsp::OcspResponse;
use crate::revocation::RevocationArchival;
use crate::util::der::{self, Raw};
use crate::x509::{Name, Serial};


/// The signature size assumed if nothing better is known.
pub const DEFAULT_SIGNATURE_SIZE: usize = 1024;


//------------ SidKind -------------------------------------------------------

/// The form of signer identifier to use.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SidKind {
    /// Identify the certificate by issuer and serial number.
    #[default]
    IssuerAndSerialNumber,

    /// Identify the certificate by its subject key identifier.
    SubjectKeyIdentifier,
}

impl SidKind {
    /// Returns the signer info version that goes with this kind.
    pub fn version(self) -> u8 {
        match self {
            SidKind::IssuerAndSerialNumber => 1,
            SidKind::SubjectKeyIdentifier => 3,
        }
    }
}


//------------ SignerIdentifier ----------------------------------------------

/// The identifier of the signing certificate.
///
/// ```txt
/// SignerIdentifier ::= CHOICE {
///     issuerAndSerialNumber IssuerAndSerialNumber,
///     subjectKeyIdentifier [0] SubjectKeyIdentifier }
///
/// IssuerAndSerialNumber ::= SEQUENCE {
///     issuer Name,
///     serialNumber CertificateSerialNumber }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignerIdentifier {
    IssuerAndSerialNumber {
        issuer: Name,
        serial_number: Serial,
    },
    SubjectKeyIdentifier(KeyIdentifier),
}

impl SignerIdentifier {
    /// Creates the identifier of the given kind for a certificate.
    pub fn from_cert(cert: &Cert, kind: SidKind) -> Result<Self, CmsError> {
        match kind {
            SidKind::IssuerAndSerialNumber => {
                Ok(SignerIdentifier::IssuerAndSerialNumber {
                    issuer: cert.issuer().clone(),
                    serial_number: cert.serial_number().clone(),
                })
            }
            SidKind::SubjectKeyIdentifier => {
                cert.subject_key_identifier().cloned()
                    .map(SignerIdentifier::SubjectKeyIdentifier)
                    .ok_or_else(|| {
                        ErrorKind::MissingSubjectKeyIdentifier.into()
                    })
            }
        }
    }

    pub fn kind(&self) -> SidKind {
        match *self {
            SignerIdentifier::IssuerAndSerialNumber { .. } => {
                SidKind::IssuerAndSerialNumber
            }
            SignerIdentifier::SubjectKeyIdentifier(_) => {
                SidKind::SubjectKeyIdentifier
            }
        }
    }

    pub fn version(&self) -> u8 {
        self.kind().version()
    }

    /// Returns whether the identifier identifies the certificate.
    pub fn matches(&self, cert: &Cert) -> bool {
        match *self {
            SignerIdentifier::IssuerAndSerialNumber {
                ref issuer, ref serial_number
            } => {
                cert.issuer() == issuer
                && cert.serial_number() == serial_number
            }
            SignerIdentifier::SubjectKeyIdentifier(ref id) => {
                cert.subject_key_identifier() == Some(id)
            }
        }
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        if let Some(id) = cons.take_opt_value_if(
            Tag::CTX_0, KeyIdentifier::from_content
        )? {
            return Ok(SignerIdentifier::SubjectKeyIdentifier(id))
        }
        cons.take_sequence(|cons| {
            Ok(SignerIdentifier::IssuerAndSerialNumber {
                issuer: Name::take_from(cons)?,
                serial_number: Serial::take_from(cons)?,
            })
        })
    }

    pub fn encode(self) -> impl encode::Values {
        match self {
            SignerIdentifier::IssuerAndSerialNumber {
                issuer, serial_number
            } => {
                encode::Choice2::One(encode::sequence((
                    Raw::from_slice(issuer.as_slice()),
                    serial_number.encode(),
                )))
            }
            SignerIdentifier::SubjectKeyIdentifier(id) => {
                encode::Choice2::Two(id.encode_as(Tag::CTX_0))
            }
        }
    }
}


//------------ SignerInfo ----------------------------------------------------

/// The signer information of a container.
///
/// ```txt
/// SignerInfo ::= SEQUENCE {
///     version CMSVersion,
///     sid SignerIdentifier,
///     digestAlgorithm DigestAlgorithmIdentifier,
///     signedAttrs [0] IMPLICIT SignedAttributes OPTIONAL,
///     signatureAlgorithm SignatureAlgorithmIdentifier,
///     signature SignatureValue,
///     unsignedAttrs [1] IMPLICIT UnsignedAttributes OPTIONAL }
/// ```
///
/// The signed attributes can be changed until they are serialized via
/// [`serialize_signed_attrs`] or replaced via
/// [`set_serialized_signed_attrs`]. Afterwards, all methods changing them
/// fail with [`ErrorKind::SignedAttrsFrozen`]. The signing certificate,
/// the algorithms, the signature, and the unsigned attributes can always
/// be changed.
///
/// [`serialize_signed_attrs`]: #method.serialize_signed_attrs
/// [`set_serialized_signed_attrs`]: #method.set_serialized_signed_attrs
/// [`ErrorKind::SignedAttrsFrozen`]: ../error/enum.ErrorKind.html
#[derive(Clone, Debug, Default)]
pub struct SignerInfo {
    sid_kind: SidKind,
    signing_certificate: Option<Cert>,
    digest_algorithm: Option<AlgorithmIdentifier>,
    signature_algorithm: Option<AlgorithmIdentifier>,
    signed_attrs: SignedAttrs,
    unsigned_attrs: AttributeSet,
    signature: Option<Bytes>,

    /// An explicitly set size of the future signature.
    signature_size_hint: Option<usize>,

    /// The revocation information in the archival attribute.
    crl_responses: Vec<Crl>,
    ocsp_responses: Vec<OcspResponse>,
}

/// # Creation and Configuration
///
impl SignerInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new signer info using the given signer identifier kind.
    pub fn with_sid_kind(sid_kind: SidKind) -> Self {
        SignerInfo { sid_kind, .. Self::default() }
    }

    pub fn set_sid_kind(&mut self, sid_kind: SidKind) {
        self.sid_kind = sid_kind
    }

    /// Sets the size of the signature assumed by the size estimate.
    ///
    /// If this is never called, the size is derived from the public key
    /// of the signing certificate.
    pub fn set_signature_size_hint(&mut self, size: usize) {
        self.signature_size_hint = Some(size)
    }
}


/// # Building
///
impl SignerInfo {
    pub fn set_signing_certificate(&mut self, cert: Cert) {
        self.signing_certificate = Some(cert)
    }

    /// Sets the signing certificate and adds the signing certificate
    /// attribute for it.
    pub fn set_signing_certificate_and_add_to_signed_attrs(
        &mut self, cert: Cert, digest: DigestAlgorithm
    ) -> Result<(), CmsError> {
        self.add_signer_certificate_to_signed_attrs(&cert, digest)?;
        self.signing_certificate = Some(cert);
        Ok(())
    }

    /// Adds the signing certificate attribute for `cert`.
    ///
    /// For SHA-1, the `id-aa-signingCertificate` attribute of RFC 2634 is
    /// used, for all other algorithms `id-aa-signingCertificateV2` of
    /// RFC 5035. An existing attribute of either type is replaced.
    pub fn add_signer_certificate_to_signed_attrs(
        &mut self, cert: &Cert, digest: DigestAlgorithm
    ) -> Result<(), CmsError> {
        let attr = signing_certificate_attr(cert, digest);
        let attrs = self.building_mut(
            "add_signer_certificate_to_signed_attrs"
        )?;
        if attr.attr_type() == &oid::AA_SIGNING_CERTIFICATE {
            attrs.remove_type(&oid::AA_SIGNING_CERTIFICATE_V2);
        }
        else {
            attrs.remove_type(&oid::AA_SIGNING_CERTIFICATE);
        }
        attrs.replace(attr);
        Ok(())
    }

    pub fn set_digest_algorithm(&mut self, algorithm: AlgorithmIdentifier) {
        self.digest_algorithm = Some(algorithm)
    }

    pub fn set_signature_algorithm(
        &mut self, algorithm: AlgorithmIdentifier
    ) {
        self.signature_algorithm = Some(algorithm)
    }

    /// Sets the message digest attribute.
    pub fn set_message_digest(
        &mut self, digest: &[u8]
    ) -> Result<(), CmsError> {
        self.building_mut("set_message_digest")?.replace(Attribute::new(
            &oid::MESSAGE_DIGEST, OctetString::encode_slice(digest)
        ));
        Ok(())
    }

    /// Sets the message digest attribute to the digest of `document`.
    ///
    /// The digest is calculated using the digest algorithm of the signer
    /// info which therefore needs to be set and supported.
    pub fn set_message_digest_of(
        &mut self, document: &[u8]
    ) -> Result<(), CmsError> {
        let alg = self.digest_algorithm_kind()?;
        self.set_message_digest(alg.digest(document).as_ref())
    }

    /// Sets the content type attribute.
    pub fn set_content_type<T: AsRef<[u8]>>(
        &mut self, content_type: &Oid<T>
    ) -> Result<(), CmsError> {
        self.building_mut("set_content_type")?.replace(Attribute::new(
            &oid::CONTENT_TYPE, content_type.encode_ref()
        ));
        Ok(())
    }

    /// Sets the CRLs of the revocation archival attribute.
    pub fn set_crl_responses(
        &mut self, crls: Vec<Crl>
    ) -> Result<(), CmsError> {
        let ocsp = self.ocsp_responses.clone();
        self.update_revocation_archival(crls, ocsp, "set_crl_responses")
    }

    /// Sets the OCSP responses of the revocation archival attribute.
    pub fn set_ocsp_responses(
        &mut self, ocsp: Vec<OcspResponse>
    ) -> Result<(), CmsError> {
        let crls = self.crl_responses.clone();
        self.update_revocation_archival(crls, ocsp, "set_ocsp_responses")
    }

    /// Rebuilds the revocation archival attribute.
    ///
    /// The attribute is removed if there are neither CRLs nor OCSP
    /// responses.
    fn update_revocation_archival(
        &mut self,
        crls: Vec<Crl>,
        ocsp: Vec<OcspResponse>,
        operation: &'static str,
    ) -> Result<(), CmsError> {
        let archival = RevocationArchival::new(crls, ocsp);
        let attrs = self.building_mut(operation)?;
        match archival.to_attribute() {
            Some(attr) => attrs.replace(attr),
            None => {
                attrs.remove_type(&oid::ADBE_REVOCATION_INFO_ARCHIVAL);
            }
        }
        self.crl_responses = archival.crls;
        self.ocsp_responses = archival.ocsp_responses;
        Ok(())
    }

    pub fn add_signed_attr(&mut self, attr: Attribute) -> Result<(), CmsError> {
        self.building_mut("add_signed_attr")?.push(attr);
        Ok(())
    }

    pub fn add_unsigned_attr(&mut self, attr: Attribute) {
        self.unsigned_attrs.push(attr)
    }

    /// Returns the DER encoded signed attributes and freezes them.
    ///
    /// The returned value is the SET OF Attribute that is to be signed.
    /// Calling the method again returns the same octets. An empty SET is
    /// not encoded into the signer info since the field must have at least
    /// one attribute if present.
    pub fn serialize_signed_attrs(&mut self) -> Bytes {
        let attrs = match self.signed_attrs {
            SignedAttrs::Sealed { ref encoded, .. } => return encoded.clone(),
            SignedAttrs::Building(ref mut attrs) => std::mem::take(attrs),
        };
        let content = attrs.to_set_of().to_captured(Mode::Der).into_bytes();
        debug!(
            "Freezing {} signed attributes ({} octets).",
            attrs.len(), content.len()
        );
        let encoded = encode::set(
            Raw(content.clone())
        ).to_captured(Mode::Der).into_bytes();
        self.signed_attrs = SignedAttrs::Sealed {
            attrs, encoded: encoded.clone(), content
        };
        encoded
    }

    /// Replaces the signed attributes with already serialized ones.
    ///
    /// The octets must be a DER encoded SET OF Attribute. They are kept as
    /// they are and the signed attributes are frozen.
    pub fn set_serialized_signed_attrs(
        &mut self, encoded: Bytes
    ) -> Result<(), CmsError> {
        self.building_mut("set_serialized_signed_attrs")?;
        let content = der::decode_all(
            Mode::Der, encoded.clone(),
            |cons| cons.take_set(|cons| cons.capture_all())
        ).map_err(CmsError::invalid_structure)?.into_bytes();
        let attrs = AttributeSet::decode_content(
            content.clone(), Mode::Der
        ).map_err(CmsError::invalid_structure)?;
        if attrs.is_empty() {
            return Err(ErrorKind::InvalidStructure.into())
        }
        let archival = RevocationArchival::from_signed_attrs(&attrs);
        debug!("Freezing {} given signed attributes.", attrs.len());
        self.signed_attrs = SignedAttrs::Sealed { attrs, encoded, content };
        self.crl_responses = archival.crls;
        self.ocsp_responses = archival.ocsp_responses;
        Ok(())
    }

    pub fn set_signature(&mut self, signature: Bytes) {
        self.signature = Some(signature)
    }

    /// Returns the signed attributes for change if they aren’t frozen yet.
    fn building_mut(
        &mut self, operation: &'static str
    ) -> Result<&mut AttributeSet, CmsError> {
        match self.signed_attrs {
            SignedAttrs::Building(ref mut attrs) => Ok(attrs),
            SignedAttrs::Sealed { .. } => Err(CmsError::frozen(operation)),
        }
    }
}


/// # Data Access
///
impl SignerInfo {
    /// Returns the signer info version.
    ///
    /// This is 1 if the signer is identified by issuer and serial number
    /// and 3 if it is identified by subject key identifier.
    pub fn version(&self) -> u8 {
        self.sid_kind.version()
    }

    pub fn sid_kind(&self) -> SidKind {
        self.sid_kind
    }

    /// Returns the signer identifier.
    ///
    /// This fails if there is no signing certificate or if it can’t be
    /// identified in the requested form.
    pub fn sid(&self) -> Result<SignerIdentifier, CmsError> {
        let cert = self.signing_certificate.as_ref().ok_or(
            ErrorKind::MissingSigningCertificate
        )?;
        SignerIdentifier::from_cert(cert, self.sid_kind)
    }

    pub fn signing_certificate(&self) -> Option<&Cert> {
        self.signing_certificate.as_ref()
    }

    pub fn digest_algorithm(&self) -> Option<&AlgorithmIdentifier> {
        self.digest_algorithm.as_ref()
    }

    /// Returns the digest algorithm if it is one we can calculate.
    pub fn digest_algorithm_kind(&self) -> Result<DigestAlgorithm, CmsError> {
        let alg = self.digest_algorithm.as_ref().ok_or(
            ErrorKind::MissingDigestAlgorithm
        )?;
        DigestAlgorithm::try_from(alg).map_err(|_| {
            ErrorKind::UnsupportedAlgorithm.into()
        })
    }

    pub fn signature_algorithm(&self) -> Option<&AlgorithmIdentifier> {
        self.signature_algorithm.as_ref()
    }

    pub fn signed_attrs(&self) -> &AttributeSet {
        match self.signed_attrs {
            SignedAttrs::Building(ref attrs) => attrs,
            SignedAttrs::Sealed { ref attrs, .. } => attrs,
        }
    }

    /// Returns the encoded signed attributes if they are frozen.
    pub fn encoded_signed_attrs(&self) -> Option<Bytes> {
        match self.signed_attrs {
            SignedAttrs::Building(_) => None,
            SignedAttrs::Sealed { ref encoded, .. } => Some(encoded.clone()),
        }
    }

    pub fn unsigned_attrs(&self) -> &AttributeSet {
        &self.unsigned_attrs
    }

    pub fn signature(&self) -> Option<&Bytes> {
        self.signature.as_ref()
    }

    /// Returns the content of the message digest attribute.
    pub fn message_digest(&self) -> Option<Bytes> {
        self.signed_attrs().get(&oid::MESSAGE_DIGEST)?.decode_values(
            |cons| OctetString::take_from(cons)
        ).ok().map(OctetString::into_bytes)
    }

    pub fn crl_responses(&self) -> &[Crl] {
        &self.crl_responses
    }

    pub fn ocsp_responses(&self) -> &[OcspResponse] {
        &self.ocsp_responses
    }

    /// Returns whether the signed attributes can’t be changed anymore.
    pub fn is_frozen(&self) -> bool {
        matches!(self.signed_attrs, SignedAttrs::Sealed { .. })
    }

    /// Returns the signature size used for the size estimate.
    pub fn signature_size_hint(&self) -> usize {
        self.signature_size_hint.or_else(|| {
            self.signing_certificate.as_ref().and_then(|cert| {
                cert.subject_public_key_info().signature_len_hint()
            })
        }).unwrap_or(DEFAULT_SIGNATURE_SIZE)
    }
}


/// # Decoding and Encoding
///
impl SignerInfo {
    /// Decodes a signer info.
    ///
    /// The signing certificate is picked from `certs`.
    pub fn decode<S: IntoSource>(
        source: S, certs: &[Cert]
    ) -> Result<Self, CmsError>
    where S::Source: Source<Error = Infallible> {
        der::decode_all(Mode::Ber, source, |cons| RawSignerInfo::take_from(cons))
            .map_err(CmsError::invalid_structure)?
            .resolve(certs)
    }

    /// Returns a value encoder for the signer info.
    ///
    /// If there is no signature or `include_signature` is `false`, an
    /// empty signature is encoded.
    pub fn encode_ref(
        &self, include_signature: bool
    ) -> Result<impl encode::Values + '_, CmsError> {
        let sid = self.sid()?;
        let (digest_algorithm, signature_algorithm) = self.algorithms()?;
        let signature = match self.signature {
            Some(ref signature) if include_signature => signature.clone(),
            _ => Bytes::new(),
        };
        Ok(encode::sequence((
            sid.version().encode(),
            sid.encode(),
            digest_algorithm.encode_ref(),
            self.signed_attrs_content().map(|content| {
                encode::sequence_as(Tag::CTX_0, Raw(content))
            }),
            signature_algorithm.encode_ref(),
            OctetString::encode_slice(signature),
            (!self.unsigned_attrs.is_empty()).then(|| {
                self.unsigned_attrs.encode_as(Tag::CTX_1)
            }),
        )))
    }

    /// Returns the encoded signer info.
    pub fn to_captured(
        &self, include_signature: bool
    ) -> Result<Captured, CmsError> {
        Ok(self.encode_ref(include_signature)?.to_captured(Mode::Der))
    }

    /// Returns an estimate for the size of the encoded signer info.
    ///
    /// If the signature is missing, the size of the future signature is
    /// taken from [`signature_size_hint`]. The estimate is never smaller
    /// than the encoding once a signature of at most that size is added.
    ///
    /// [`signature_size_hint`]: #method.signature_size_hint
    pub fn estimated_size(&self) -> Result<usize, CmsError> {
        let sid = self.sid()?;
        let (digest_algorithm, signature_algorithm) = self.algorithms()?;
        let signature_len = match self.signature {
            Some(ref signature) => signature.len(),
            None => self.signature_size_hint(),
        };
        let signed_len = self.signed_attrs_content().map(|content| {
            der::tlv_len(content.len())
        }).unwrap_or(0);
        let unsigned_len = if self.unsigned_attrs.is_empty() {
            0
        }
        else {
            der::tlv_len(self.unsigned_attrs.to_set_of().content_len())
        };
        let res = der::tlv_len(
            3 // version
            + sid.encode().encoded_len(Mode::Der)
            + digest_algorithm.encoded_len()
            + signed_len
            + signature_algorithm.encoded_len()
            + der::tlv_len(signature_len)
            + unsigned_len
        );
        debug!(
            "Estimated signer info size: {} octets for a signature of {}.",
            res, signature_len
        );
        Ok(res)
    }

    fn algorithms(
        &self
    ) -> Result<(&AlgorithmIdentifier, &AlgorithmIdentifier), CmsError> {
        Ok((
            self.digest_algorithm.as_ref().ok_or(
                ErrorKind::MissingDigestAlgorithm
            )?,
            self.signature_algorithm.as_ref().ok_or(
                ErrorKind::MissingSignatureAlgorithm
            )?,
        ))
    }

    /// Returns the content of the signed attributes SET if there is one.
    ///
    /// Empty signed attributes are left out.
    fn signed_attrs_content(&self) -> Option<Bytes> {
        match self.signed_attrs {
            SignedAttrs::Building(ref attrs) => {
                if attrs.is_empty() {
                    None
                }
                else {
                    Some(attrs.to_set_of().to_captured(Mode::Der).into_bytes())
                }
            }
            SignedAttrs::Sealed { ref content, .. } => {
                if content.is_empty() {
                    None
                }
                else {
                    Some(content.clone())
                }
            }
        }
    }
}


//------------ SignedAttrs ---------------------------------------------------

/// The signed attributes and whether they are frozen.
#[derive(Clone, Debug)]
enum SignedAttrs {
    /// The attributes can still be changed.
    Building(AttributeSet),

    /// The attributes have been serialized.
    Sealed {
        attrs: AttributeSet,

        /// The complete SET that is signed.
        encoded: Bytes,

        /// The content of the SET.
        content: Bytes,
    },
}

impl SignedAttrs {
    fn sealed(attrs: AttributeSet, content: Bytes) -> Self {
        let encoded = encode::set(
            Raw(content.clone())
        ).to_captured(Mode::Der).into_bytes();
        SignedAttrs::Sealed { attrs, encoded, content }
    }
}

impl Default for SignedAttrs {
    fn default() -> Self {
        SignedAttrs::Building(AttributeSet::new())
    }
}


//------------ RawSignerInfo -------------------------------------------------

/// A decoded signer info before its certificate has been found.
#[derive(Clone, Debug)]
pub(crate) struct RawSignerInfo {
    sid: SignerIdentifier,
    digest_algorithm: AlgorithmIdentifier,

    /// The signed attributes and the content of their SET.
    signed_attrs: Option<(AttributeSet, Bytes)>,

    signature_algorithm: AlgorithmIdentifier,
    signature: Bytes,
    unsigned_attrs: Option<AttributeSet>,
}

impl RawSignerInfo {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(Self::from_constructed)
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_sequence(Self::from_constructed)
    }

    fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let version = cons.take_u8()?;
        let sid = SignerIdentifier::take_from(cons)?;
        if version != sid.version() {
            return Err(cons.content_err(
                "signer info version doesn’t match signer identifier"
            ))
        }
        let digest_algorithm = AlgorithmIdentifier::take_from(cons)?;
        let mode = cons.mode();
        let signed_attrs = match cons.take_opt_constructed_if(
            Tag::CTX_0, |cons| cons.capture_all()
        )? {
            Some(content) => {
                let content = content.into_bytes();
                let attrs = AttributeSet::decode_content(
                    content.clone(), mode
                ).map_err(DecodeError::convert)?;
                if attrs.is_empty() {
                    return Err(cons.content_err("empty signed attributes"))
                }
                Some((attrs, content))
            }
            None => None
        };
        let signature_algorithm = AlgorithmIdentifier::take_from(cons)?;
        let signature = OctetString::take_from(cons)?.into_bytes();
        let unsigned_attrs = AttributeSet::take_opt_from_tagged(
            Tag::CTX_1, cons
        )?;
        Ok(RawSignerInfo {
            sid, digest_algorithm, signed_attrs, signature_algorithm,
            signature, unsigned_attrs
        })
    }

    /// Returns the digest algorithm declared by the signer.
    pub fn digest_algorithm(&self) -> &AlgorithmIdentifier {
        &self.digest_algorithm
    }

    /// Completes the signer info with its certificate.
    pub fn resolve(self, certs: &[Cert]) -> Result<SignerInfo, CmsError> {
        let cert = certs.iter().find(|cert| self.sid.matches(cert)).ok_or(
            ErrorKind::CertificateNotFound
        )?;

        let archival = self.signed_attrs.as_ref().map(|(attrs, _)| {
            RevocationArchival::from_signed_attrs(attrs)
        }).unwrap_or_default();

        Ok(SignerInfo {
            sid_kind: self.sid.kind(),
            signing_certificate: Some(cert.clone()),
            digest_algorithm: Some(self.digest_algorithm),
            signature_algorithm: Some(self.signature_algorithm),
            signed_attrs: match self.signed_attrs {
                Some((attrs, content)) => SignedAttrs::sealed(attrs, content),
                None => SignedAttrs::default(),
            },
            unsigned_attrs: self.unsigned_attrs.unwrap_or_default(),
            signature: if self.signature.is_empty() {
                None
            }
            else {
                Some(self.signature)
            },
            signature_size_hint: None,
            crl_responses: archival.crls,
            ocsp_responses: archival.ocsp_responses,
        })
    }
}


//------------ Signing Certificate Attribute ---------------------------------

/// Creates the signing certificate attribute for a certificate.
///
/// ```txt
/// SigningCertificate ::=  SEQUENCE {
///     certs        SEQUENCE OF ESSCertID,
///     policies     SEQUENCE OF PolicyInformation OPTIONAL }
///
/// ESSCertID ::=  SEQUENCE {
///      certHash                 Hash,
///      issuerSerial             IssuerSerial OPTIONAL }
///
/// SigningCertificateV2 ::=  SEQUENCE {
///     certs        SEQUENCE OF ESSCertIDv2,
///     policies     SEQUENCE OF PolicyInformation OPTIONAL }
///
/// ESSCertIDv2 ::=  SEQUENCE {
///     hashAlgorithm           AlgorithmIdentifier
///                    DEFAULT {algorithm id-sha256},
///     certHash                 Hash,
///     issuerSerial             IssuerSerial OPTIONAL }
///
/// IssuerSerial ::= SEQUENCE {
///     issuer                   GeneralNames,
///     serialNumber             CertificateSerialNumber }
/// ```
fn signing_certificate_attr(cert: &Cert, digest: DigestAlgorithm) -> Attribute {
    let hash = digest.digest(cert.as_slice());
    let issuer_serial = encode::sequence((
        encode::sequence( // GeneralNames
            encode::sequence_as(Tag::CTX_4, cert.issuer().encode_ref())
        ),
        cert.serial_number().encode_ref(),
    ));
    if digest == DigestAlgorithm::Sha1 {
        Attribute::new(
            &oid::AA_SIGNING_CERTIFICATE,
            encode::sequence(
                encode::sequence(
                    encode::sequence((
                        OctetString::encode_slice(hash.as_ref()),
                        issuer_serial,
                    ))
                )
            )
        )
    }
    else {
        let hash_algorithm = digest.identifier();
        Attribute::new(
            &oid::AA_SIGNING_CERTIFICATE_V2,
            encode::sequence(
                encode::sequence(
                    encode::sequence((
                        (digest != DigestAlgorithm::Sha256).then(|| {
                            hash_algorithm.encode_ref()
                        }),
                        OctetString::encode_slice(hash.as_ref()),
                        issuer_serial,
                    ))
                )
            )
        )
    }
}


//============ Tests =========================================================
