//! Building and re-reading complete containers.
#![cfg(feature = "test-data")]

use bcder::Mode;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use cms_container::{
    Attribute, CmsContainer, EncapsulatedContentInfo, ErrorKind, SidKind,
    SignerInfo,
};
use cms_container::crypto::{DigestAlgorithm, SignatureAlgorithm};
use cms_container::oid;
use cms_container::test;

const UNKNOWN_SIGNED: bcder::ConstOid = bcder::Oid(&[42, 3, 4, 5]);
const UNKNOWN_UNSIGNED: bcder::ConstOid = bcder::Oid(&[42, 3, 4, 6]);

/// Creates a certificate chain of signer, intermediate, and root.
fn chain() -> Vec<cms_container::Cert> {
    vec![
        test::make_cert(11, "Signer", "Intermediate CA"),
        test::make_cert(12, "Intermediate CA", "Root CA"),
        test::make_cert(13, "Root CA", "Root CA"),
    ]
}

fn signer(
    chain: &[cms_container::Cert], digest: DigestAlgorithm
) -> SignerInfo {
    let mut signer = SignerInfo::new();
    signer.set_digest_algorithm(digest.identifier());
    signer.set_signature_algorithm(
        SignatureAlgorithm::RsaPkcs1(digest).identifier()
    );
    signer.set_signing_certificate_and_add_to_signed_attrs(
        chain[0].clone(), digest
    ).unwrap();
    signer.set_content_type(&oid::DATA).unwrap();
    signer.set_message_digest(&[0u8; 256]).unwrap();
    signer
}

#[test]
fn top_level_revocation_info() {
    let chain = chain();
    let mut signer = signer(&chain, DigestAlgorithm::Sha512);
    signer.serialize_signed_attrs();
    signer.set_signature(Bytes::from(vec![0u8; 256]));

    let mut container = CmsContainer::new();
    container.add_certificates(chain.clone());
    container.add_ocsp(test::make_ocsp(250, 1));
    container.add_crl(test::make_crl("Intermediate CA", &[99]));
    container.set_signer_info(signer);
    let encoded = container.serialize().unwrap();
    assert!(container.size_estimation().unwrap() >= encoded.len());

    let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
    assert_eq!(
        decoded.digest_algorithm().unwrap().algorithm(),
        &oid::SHA512
    );
    assert_eq!(decoded.certificates().len(), 3);
    assert_eq!(decoded.crls().count(), 1);
    assert_eq!(decoded.ocsp_responses().count(), 1);
    assert_eq!(decoded.version(), 5);
    let signer = decoded.signer_info().unwrap();
    assert_eq!(signer.signing_certificate(), Some(&chain[0]));
    assert_eq!(signer.message_digest().unwrap().as_ref(), &[0u8; 256][..]);
    assert_eq!(signer.signature().unwrap().as_ref(), &[0u8; 256][..]);
}

#[test]
fn archived_revocation_info() {
    let chain = chain();
    let crl = test::make_crl("Intermediate CA", &[99]);
    let ocsp = test::make_ocsp(250, 1);
    let mut signer = signer(&chain, DigestAlgorithm::Sha512);
    signer.set_crl_responses(vec![crl.clone()]).unwrap();
    signer.set_ocsp_responses(vec![ocsp.clone()]).unwrap();
    let estimate = {
        let mut container = CmsContainer::new();
        container.add_certificates(chain.clone());
        container.set_signer_info(signer.clone());
        container.size_estimation().unwrap()
    };
    signer.serialize_signed_attrs();
    signer.set_signature(Bytes::from(vec![0u8; 256]));

    let mut container = CmsContainer::new();
    container.add_certificates(chain.clone());
    container.set_signer_info(signer);
    let encoded = container.serialize().unwrap();
    assert!(estimate >= encoded.len());

    let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
    assert_eq!(decoded.certificates().len(), 3);
    assert_eq!(decoded.crls().count(), 0);
    assert_eq!(decoded.version(), 1);
    let signer = decoded.signer_info().unwrap();
    assert_eq!(signer.crl_responses(), [crl]);
    assert_eq!(signer.ocsp_responses(), [ocsp]);
    assert_eq!(signer.signing_certificate(), Some(&chain[0]));
}

#[test]
fn attribute_order_independence() {
    let chain = chain();
    let attrs = [
        Attribute::new(
            &oid::SIGNING_TIME, test::this_update().encode_utc_time()
        ),
        Attribute::new(&UNKNOWN_SIGNED, 5u8.encode()),
        Attribute::new(&oid::CONTENT_TYPE, oid::DATA.encode()),
    ];
    let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [1, 0, 2]];
    let mut encodings = orders.iter().map(|order| {
        let mut signer = SignerInfo::new();
        signer.set_message_digest(b"digest").unwrap();
        for &idx in order {
            signer.add_signed_attr(attrs[idx].clone()).unwrap();
        }
        signer.add_signer_certificate_to_signed_attrs(
            &chain[0], DigestAlgorithm::Sha256
        ).unwrap();
        signer.serialize_signed_attrs()
    });
    let first = encodings.next().unwrap();
    for other in encodings {
        assert_eq!(first, other);
    }
}

#[test]
fn unknown_attribute_round_trip() {
    let chain = chain();
    let mut signer = signer(&chain, DigestAlgorithm::Sha256);
    let value = bcder::OctetString::encode_slice(b"opaque");
    signer.add_signed_attr(
        Attribute::new(&UNKNOWN_SIGNED, value)
    ).unwrap();
    signer.add_unsigned_attr(
        Attribute::new(&UNKNOWN_UNSIGNED, 1u8.encode())
    );
    signer.set_signature(Bytes::from_static(b"signature"));

    let mut container = CmsContainer::new();
    container.add_certificates(chain);
    container.set_signer_info(signer);
    let encoded = container.serialize().unwrap();
    let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
    let signer = decoded.signer_info().unwrap();
    let attr = signer.signed_attrs().get(&UNKNOWN_SIGNED).unwrap();
    assert_eq!(
        attr.raw_values().as_ref(),
        bcder::OctetString::encode_slice(b"opaque")
            .to_captured(Mode::Der).as_slice()
    );
    assert!(signer.unsigned_attrs().contains(&UNKNOWN_UNSIGNED));
    assert_eq!(decoded.serialize().unwrap(), encoded);
}

#[test]
fn subject_key_identifier_signer() {
    let chain = chain();
    let mut signer = signer(&chain, DigestAlgorithm::Sha256);
    signer.set_sid_kind(SidKind::SubjectKeyIdentifier);
    signer.set_signature(Bytes::from(vec![1u8; 256]));
    let mut container = CmsContainer::new();
    container.add_certificates(chain.iter().rev().cloned());
    container.set_signer_info(signer);
    assert_eq!(container.version(), 3);
    let encoded = container.serialize().unwrap();
    assert_eq!(container.size_estimation().unwrap(), encoded.len());

    let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
    let signer = decoded.signer_info().unwrap();
    assert_eq!(signer.version(), 3);
    assert_eq!(signer.signing_certificate(), Some(&chain[0]));
    assert_eq!(decoded.serialize().unwrap(), encoded);
}

#[test]
fn attached_content() {
    let chain = chain();
    let mut signer = signer(&chain, DigestAlgorithm::Sha256);
    signer.set_signature(Bytes::from(vec![1u8; 256]));
    let mut container = CmsContainer::new();
    container.add_certificates(chain);
    container.set_encapsulated_content(EncapsulatedContentInfo::new(
        bcder::Oid(Bytes::from_static(b"\x2a\x03\x04")),
        Some(Bytes::from_static(b"content")),
    ));
    container.set_signer_info(signer);
    let encoded = container.serialize().unwrap();
    assert_eq!(container.size_estimation().unwrap(), encoded.len());

    let decoded = CmsContainer::decode(encoded.as_ref()).unwrap();
    assert_eq!(decoded.version(), 3);
    assert_eq!(
        decoded.encapsulated_content().content().unwrap().as_ref(),
        b"content"
    );
}

#[test]
fn signer_without_certificate() {
    let chain = chain();
    let mut signer = signer(&chain, DigestAlgorithm::Sha256);
    signer.set_signature(Bytes::from(vec![1u8; 256]));
    let mut container = CmsContainer::new();
    container.add_certificates(chain[1..].iter().cloned());
    container.set_signer_info(signer);
    let encoded = container.serialize().unwrap();
    assert_eq!(
        CmsContainer::decode(encoded.as_ref()).unwrap_err().kind(),
        ErrorKind::CertificateNotFound
    );
}
