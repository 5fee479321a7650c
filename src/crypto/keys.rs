//! Public keys and key identifiers.

use std::{fmt, io};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use bcder::{decode, encode};
use bcder::{BitString, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::PrimitiveContent;
use bytes::Bytes;
use crate::oid;
use crate::util::hex;
use super::algorithm::AlgorithmIdentifier;
use super::digest::DigestAlgorithm;


//------------ PublicKey -----------------------------------------------------

/// A public key as it appears in a certificate.
///
/// ```txt
/// SubjectPublicKeyInfo  ::=  SEQUENCE  {
///      algorithm            AlgorithmIdentifier,
///      subjectPublicKey     BIT STRING  }
/// ```
///
/// Nothing is ever done with the key itself. It is only inspected to learn
/// how large signatures made with it will be.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    algorithm: AlgorithmIdentifier,
    bits: BitString,
}

impl PublicKey {
    pub fn new(algorithm: AlgorithmIdentifier, bits: Bytes) -> Self {
        PublicKey { algorithm, bits: BitString::new(0, bits) }
    }

    pub fn algorithm(&self) -> &AlgorithmIdentifier {
        &self.algorithm
    }

    /// Returns the content of the subject public key bit string.
    pub fn bits(&self) -> Bytes {
        self.bits.octet_bytes()
    }

    /// Returns the key identifier of the key.
    ///
    /// This is the SHA-1 hash over the public key bits as described in
    /// method 1 of section 4.2.1.2 of RFC 5280.
    pub fn key_identifier(&self) -> KeyIdentifier {
        KeyIdentifier::from_public_key(self)
    }

    /// Returns the size of the key in bits if it can be determined.
    pub fn key_len(&self) -> Option<usize> {
        if self.is_rsa() {
            self.rsa_modulus_len().map(|len| len * 8)
        }
        else if *self.algorithm.algorithm() == oid::EC_PUBLIC_KEY {
            self.ec_field_len().map(|len| match len {
                66 => 521,
                len => len * 8
            })
        }
        else if *self.algorithm.algorithm() == oid::ED25519 {
            Some(256)
        }
        else if *self.algorithm.algorithm() == oid::ED448 {
            Some(456)
        }
        else {
            None
        }
    }

    /// Returns the maximum length of an encoded signature with this key.
    ///
    /// For RSA keys, this is the length of the modulus. ECDSA signatures
    /// are a DER encoded sequence of two integers, each as long as the
    /// field size plus a possible leading zero. Returns `None` for unknown
    /// key types.
    pub fn signature_len_hint(&self) -> Option<usize> {
        if self.is_rsa() {
            self.rsa_modulus_len()
        }
        else if *self.algorithm.algorithm() == oid::EC_PUBLIC_KEY {
            self.ec_field_len().map(|len| 2 * (len + 3) + 3)
        }
        else if *self.algorithm.algorithm() == oid::ED25519 {
            Some(64)
        }
        else if *self.algorithm.algorithm() == oid::ED448 {
            Some(114)
        }
        else {
            None
        }
    }

    fn is_rsa(&self) -> bool {
        *self.algorithm.algorithm() == oid::RSA_ENCRYPTION
        || *self.algorithm.algorithm() == oid::RSASSA_PSS
    }

    /// Returns the length of the RSA modulus in octets.
    fn rsa_modulus_len(&self) -> Option<usize> {
        let bits = self.bits.octet_bytes();
        let modulus = Mode::Ber.decode(bits.as_ref(), |cons| {
            cons.take_sequence(|cons| {
                let modulus = cons.take_primitive_if(
                    Tag::INTEGER, |prim| prim.take_all()
                )?;
                cons.skip_all()?;
                Ok(modulus)
            })
        }).ok()?;
        let len = modulus.iter().skip_while(|&&ch| ch == 0).count();
        if len == 0 { None } else { Some(len) }
    }

    /// Returns the length of a field element of an EC key in octets.
    fn ec_field_len(&self) -> Option<usize> {
        let curve = self.algorithm.parameters().and_then(|params| {
            Mode::Ber.decode(params, Oid::take_from).ok()
        });
        if let Some(curve) = curve {
            if curve == oid::SECP256R1 {
                return Some(32)
            }
            else if curve == oid::SECP384R1 {
                return Some(48)
            }
            else if curve == oid::SECP521R1 {
                return Some(66)
            }
        }

        // Unknown curve: look at the uncompressed point.
        let point = self.bits.octet_bytes();
        match point.first() {
            Some(4) if point.len() > 1 => Some((point.len() - 1) / 2),
            _ => None
        }
    }
}


/// # Decoding and Encoding
///
impl PublicKey {
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            Ok(PublicKey {
                algorithm: AlgorithmIdentifier::take_from(cons)?,
                bits: BitString::take_from(cons)?
            })
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            self.algorithm.encode_ref(),
            self.bits.encode_ref()
        ))
    }
}


//------------ KeyIdentifier -------------------------------------------------

/// A key identifier.
///
/// This is the content of the subject key identifier extension of a
/// certificate and the subject key identifier form of a signer identifier.
/// While most identifiers are a 20 octet SHA-1 hash, any length is
/// accepted.
#[derive(Clone)]
pub struct KeyIdentifier(Bytes);

impl KeyIdentifier {
    /// Creates a new identifier for the given key.
    pub fn from_public_key(key: &PublicKey) -> Self {
        KeyIdentifier(Bytes::copy_from_slice(
            DigestAlgorithm::Sha1.digest(key.bits().as_ref()).as_ref()
        ))
    }

    /// Returns an octet slice of the key identifer’s value.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Takes an encoded key identifier from a constructed value.
    ///
    /// ```text
    /// KeyIdentifier ::= OCTET STRING
    /// ```
    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_value_if(Tag::OCTET_STRING, Self::from_content)
    }

    /// Parses an encoded key identifer from a encoded content.
    pub fn from_content<S: decode::Source>(
        content: &mut decode::Content<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        Ok(KeyIdentifier(OctetString::from_content(content)?.into_bytes()))
    }
}


//--- From, TryFrom and FromStr

impl From<Bytes> for KeyIdentifier {
    fn from(bytes: Bytes) -> Self {
        KeyIdentifier(bytes)
    }
}

impl<'a> TryFrom<&'a [u8]> for KeyIdentifier {
    type Error = RepresentationError;

    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(RepresentationError)
        }
        else {
            Ok(KeyIdentifier(Bytes::copy_from_slice(value)))
        }
    }
}

impl FromStr for KeyIdentifier {
    type Err = RepresentationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = hex::decode(value).ok_or(RepresentationError)?;
        Self::try_from(value.as_slice())
    }
}


//--- AsRef

impl AsRef<[u8]> for KeyIdentifier {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}


//--- PartialEq, Eq, and Hash

impl<T: AsRef<[u8]>> PartialEq<T> for KeyIdentifier {
    fn eq(&self, other: &T) -> bool {
        self.0.as_ref().eq(other.as_ref())
    }
}

impl Eq for KeyIdentifier { }

impl Hash for KeyIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.as_ref().hash(state)
    }
}


//--- Display and Debug

impl fmt::Display for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hex::fmt(self.as_slice(), f)
    }
}

impl fmt::Debug for KeyIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "KeyIdentifier({})", self)
    }
}


//--- PrimitiveContent

impl PrimitiveContent for KeyIdentifier {
    const TAG: Tag = Tag::OCTET_STRING;

    fn encoded_len(&self, _mode: Mode) -> usize {
        self.0.len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        _mode: Mode,
        target: &mut W
    ) -> Result<(), io::Error> {
        target.write_all(self.0.as_ref())
    }
}


//--- Deserialize and Serialize

#[cfg(feature = "serde")]
impl serde::Serialize for KeyIdentifier {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S
    ) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&hex::encode(self.as_slice()), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for KeyIdentifier {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D
    ) -> Result<Self, D::Error> {
        let value = <String as serde::Deserialize>::deserialize(
            deserializer
        )?;
        KeyIdentifier::from_str(&value).map_err(serde::de::Error::custom)
    }
}


//------------ RepresentationError -------------------------------------------

/// A key identifier was given in the wrong format.
#[derive(Clone, Copy, Debug)]
pub struct RepresentationError;

impl fmt::Display for RepresentationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid key identifier representation")
    }
}

impl std::error::Error for RepresentationError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use bcder::encode::Values;

    fn rsa_key(modulus_len: usize) -> PublicKey {
        let mut modulus = vec![0u8; modulus_len + 1];
        modulus[1] = 0xC1;
        let bits = encode::sequence((
            OctetString::encode_slice_as(modulus.as_slice(), Tag::INTEGER),
            OctetString::encode_slice_as(b"\x01\x00\x01".as_ref(), Tag::INTEGER),
        )).to_captured(Mode::Der).into_bytes();
        PublicKey::new(
            AlgorithmIdentifier::with_null_parameters(&oid::RSA_ENCRYPTION),
            bits
        )
    }

    fn ec_key(curve: bcder::ConstOid, field_len: usize) -> PublicKey {
        let mut point = vec![0x11u8; 2 * field_len + 1];
        point[0] = 4;
        PublicKey::new(
            AlgorithmIdentifier::with_parameters(
                &oid::EC_PUBLIC_KEY, curve.encode()
            ),
            point.into()
        )
    }

    #[test]
    fn rsa_signature_len() {
        assert_eq!(rsa_key(256).signature_len_hint(), Some(256));
        assert_eq!(rsa_key(256).key_len(), Some(2048));
        assert_eq!(rsa_key(512).signature_len_hint(), Some(512));
    }

    #[test]
    fn ec_signature_len() {
        let key = ec_key(oid::SECP256R1, 32);
        assert_eq!(key.signature_len_hint(), Some(73));
        assert_eq!(key.key_len(), Some(256));
        let key = ec_key(oid::SECP521R1, 66);
        assert_eq!(key.signature_len_hint(), Some(141));
        assert_eq!(key.key_len(), Some(521));
    }

    #[test]
    fn unknown_key_type() {
        let key = PublicKey::new(
            AlgorithmIdentifier::without_parameters(&oid::SHA256),
            Bytes::from_static(b"foo")
        );
        assert_eq!(key.signature_len_hint(), None);
        assert_eq!(key.key_len(), None);
    }

    #[test]
    fn public_key_round_trip() {
        let key = ec_key(oid::SECP384R1, 48);
        let encoded = key.encode_ref().to_captured(Mode::Der);
        let decoded = Mode::Der.decode(
            encoded.as_slice(), PublicKey::take_from
        ).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn key_identifier() {
        let key = rsa_key(128);
        let ki = key.key_identifier();
        assert_eq!(ki.as_slice().len(), 20);
        assert_eq!(
            ki,
            DigestAlgorithm::Sha1.digest(key.bits().as_ref()).as_ref()
        );
        let shown = ki.to_string();
        assert_eq!(shown.len(), 40);
        assert_eq!(KeyIdentifier::from_str(&shown).unwrap(), ki);
    }

    #[test]
    fn key_identifier_any_length() {
        let encoded = b"\x04\x04\xde\xad\xbe\xef";
        let ki = Mode::Der.decode(
            encoded.as_ref(), KeyIdentifier::take_from
        ).unwrap();
        assert_eq!(ki.to_string(), "DEADBEEF");
        assert_eq!(
            ki.encode_ref().to_captured(Mode::Der).as_slice(),
            encoded.as_ref()
        );
        assert!(KeyIdentifier::from_str("").is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_key_identifier() {
        use serde_test::{Token, assert_tokens};

        let ki = KeyIdentifier::from_str("0102FE").unwrap();
        assert_tokens(&ki, &[Token::Str("0102FE")]);
    }
}
