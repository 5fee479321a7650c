//! Signed and unsigned attributes.

use std::convert::Infallible;
use std::slice;
use bcder::{decode, encode};
use bcder::{Captured, Mode, Oid, Tag};
use bcder::decode::{BytesSource, DecodeError};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::util::der::{self, Raw, SetOf};


//------------ Attribute -----------------------------------------------------

/// A single attribute of a signer info.
///
/// ```txt
/// Attribute ::= SEQUENCE {
///     attrType OBJECT IDENTIFIER,
///     attrValues SET OF AttributeValue }
///
/// AttributeValue ::= ANY
/// ```
///
/// The values are kept as the encoded content of the SET. Attributes of
/// types we don’t know are thus kept unchanged.
///
/// Two attributes are equal if they are of the same type, no matter their
/// values.
#[derive(Clone, Debug)]
pub struct Attribute {
    attr_type: Oid<Bytes>,
    values: Bytes,
}

impl Attribute {
    /// Creates an attribute with a single value.
    pub fn new<T: AsRef<[u8]>, V: encode::Values>(
        attr_type: &Oid<T>, value: V
    ) -> Self {
        Self::from_values(
            to_oid(attr_type), value.to_captured(Mode::Der).into_bytes()
        )
    }

    /// Creates an attribute with a single, already encoded value.
    pub fn from_captured<T: AsRef<[u8]>>(
        attr_type: &Oid<T>, value: &Captured
    ) -> Self {
        Self::from_values(to_oid(attr_type), value.clone().into_bytes())
    }

    /// Creates an attribute with a number of values.
    ///
    /// The values are sorted as required for DER.
    pub fn with_values<T, I, V>(attr_type: &Oid<T>, values: I) -> Self
    where T: AsRef<[u8]>, I: IntoIterator<Item = V>, V: encode::Values {
        let values: SetOf = values.into_iter().collect();
        Self::from_values(
            to_oid(attr_type), values.to_captured(Mode::Der).into_bytes()
        )
    }

    /// Creates an attribute from the encoded content of the values SET.
    pub fn from_values(attr_type: Oid<Bytes>, values: Bytes) -> Self {
        Attribute { attr_type, values }
    }

    pub fn attr_type(&self) -> &Oid<Bytes> {
        &self.attr_type
    }

    /// Returns the encoded content of the values SET.
    pub fn raw_values(&self) -> &Bytes {
        &self.values
    }

    /// Decodes the values.
    ///
    /// The closure receives the content of the values SET and has to take
    /// all of it.
    pub fn decode_values<F, T>(
        &self, op: F
    ) -> Result<T, DecodeError<Infallible>>
    where
        F: FnOnce(
            &mut decode::Constructed<&mut BytesSource>
        ) -> Result<T, DecodeError<Infallible>>
    {
        der::decode_all(Mode::Ber, BytesSource::new(self.values.clone()), op)
    }

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
        let attr_type = Oid::take_from(cons)?;
        let values = cons.take_set(|cons| cons.capture_all())?;
        Ok(Attribute { attr_type, values: values.into_bytes() })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            self.attr_type.encode_ref(),
            encode::set(Raw(self.values.clone())),
        ))
    }

    /// Returns the length of the encoded attribute.
    pub fn encoded_len(&self) -> usize {
        self.encode_ref().encoded_len(Mode::Der)
    }
}

fn to_oid<T: AsRef<[u8]>>(oid: &Oid<T>) -> Oid<Bytes> {
    Oid(Bytes::copy_from_slice(oid.0.as_ref()))
}


//--- PartialEq and Eq

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.attr_type == other.attr_type
    }
}

impl Eq for Attribute { }


//------------ AttributeSet --------------------------------------------------

/// An ordered collection of attributes.
///
/// The attributes keep the order they were added in. When encoded, they
/// are sorted as DER demands for a SET OF.
#[derive(Clone, Debug, Default)]
pub struct AttributeSet(Vec<Attribute>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute.
    pub fn push(&mut self, attr: Attribute) {
        self.0.push(attr)
    }

    /// Replaces all attributes of the type of `attr` with `attr`.
    ///
    /// If there was an attribute of the type, the new one takes the place
    /// of the first one. Otherwise it is appended.
    pub fn replace(&mut self, attr: Attribute) {
        match self.0.iter().position(|item| *item == attr) {
            Some(pos) => {
                let mut idx = 0;
                self.0.retain(|item| {
                    let keep = idx == pos || *item != attr;
                    idx += 1;
                    keep
                });
                self.0[pos] = attr;
            }
            None => self.0.push(attr)
        }
    }

    /// Removes all attributes of the given type.
    ///
    /// Returns whether there were any.
    pub fn remove_type<T: AsRef<[u8]>>(&mut self, attr_type: &Oid<T>) -> bool {
        let len = self.0.len();
        self.0.retain(|item| item.attr_type != *attr_type);
        self.0.len() != len
    }

    /// Returns the first attribute of the given type.
    pub fn get<T: AsRef<[u8]>>(&self, attr_type: &Oid<T>) -> Option<&Attribute> {
        self.0.iter().find(|item| item.attr_type == *attr_type)
    }

    pub fn contains<T: AsRef<[u8]>>(&self, attr_type: &Oid<T>) -> bool {
        self.get(attr_type).is_some()
    }

    pub fn iter(&self) -> slice::Iter<Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Takes the attributes from the content of a SET.
    pub fn from_constructed<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let mut res = Vec::new();
        while let Some(attr) = Attribute::take_opt_from(cons)? {
            res.push(attr)
        }
        Ok(AttributeSet(res))
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_set(Self::from_constructed)
    }

    /// Decodes the content octets of a SET OF Attribute.
    ///
    /// Fails unless every value of the content is an attribute.
    pub fn decode_content(
        content: Bytes, mode: Mode
    ) -> Result<Self, DecodeError<Infallible>> {
        der::decode_all(mode, content, |cons| Self::from_constructed(cons))
    }

    /// Takes an implicitly tagged attribute set if present.
    pub fn take_opt_from_tagged<S: decode::Source>(
        tag: Tag,
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        cons.take_opt_constructed_if(tag, Self::from_constructed)
    }

    /// Returns the sorted content of the SET.
    pub fn to_set_of(&self) -> SetOf {
        self.0.iter().map(Attribute::encode_ref).collect()
    }

    /// Returns a value encoder for the attributes as a SET.
    pub fn encode(&self) -> impl encode::Values {
        encode::set(self.to_set_of())
    }

    /// Returns a value encoder for the attributes with an implicit tag.
    pub fn encode_as(&self, tag: Tag) -> impl encode::Values {
        encode::sequence_as(tag, self.to_set_of())
    }
}


//--- IntoIterator and FromIterator

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        AttributeSet(iter.into_iter().collect())
    }
}


//============ Tests =========================================================
