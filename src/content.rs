//! The content carried by a container.

use bcder::{decode, encode};
use bcder::{ConstOid, Mode, OctetString, Oid, Tag};
use bcder::decode::DecodeError;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::oid;


//------------ EncapsulatedContentInfo ---------------------------------------

/// The encapsulated content of signed data.
///
/// ```txt
/// EncapsulatedContentInfo ::= SEQUENCE {
///     eContentType ContentType,
///     eContent [0] EXPLICIT OCTET STRING OPTIONAL }
/// ```
///
/// Document signatures are detached: the signed document lives outside of
/// the container and `eContent` is missing. This is what [`data`] creates.
///
/// [`data`]: #method.data
#[derive(Clone, Debug)]
pub struct EncapsulatedContentInfo {
    content_type: Oid<Bytes>,
    content: Option<OctetString>,
}

impl EncapsulatedContentInfo {
    pub fn new(content_type: Oid<Bytes>, content: Option<Bytes>) -> Self {
        EncapsulatedContentInfo {
            content_type,
            content: content.map(OctetString::new),
        }
    }

    /// Creates detached content of the given type.
    pub fn detached(content_type: ConstOid) -> Self {
        Self::new(Oid(Bytes::from_static(content_type.0)), None)
    }

    /// Creates detached content of type `id-data`.
    pub fn data() -> Self {
        Self::detached(oid::DATA)
    }

    pub fn content_type(&self) -> &Oid<Bytes> {
        &self.content_type
    }

    /// Returns whether the content type is `id-data`.
    pub fn is_data(&self) -> bool {
        self.content_type == oid::DATA
    }

    /// Returns the content if it is present.
    pub fn content(&self) -> Option<Bytes> {
        self.content.as_ref().map(OctetString::to_bytes)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_sequence(|cons| {
            Ok(EncapsulatedContentInfo {
                content_type: Oid::take_from(cons)?,
                content: cons.take_opt_constructed_if(
                    Tag::CTX_0, OctetString::take_from
                )?,
            })
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            self.content_type.encode_ref(),
            self.content.as_ref().map(|content| {
                encode::sequence_as(Tag::CTX_0, content.encode_ref())
            })
        ))
    }

    /// Returns the length of the encoded value.
    pub fn encoded_len(&self) -> usize {
        self.encode_ref().encoded_len(Mode::Der)
    }
}

impl Default for EncapsulatedContentInfo {
    fn default() -> Self {
        Self::data()
    }
}


//============ Tests =========================================================
