//! Helpers for DER encoding.
//!
//! This module contains the pieces shared by all the types that need to
//! produce canonical DER beyond what bcder does for us: the ordering of SET
//! OF values, the re-emission of captured values, and length arithmetic for
//! size estimates.

use std::{io, mem};
use std::convert::Infallible;
use bcder::{decode, encode};
use bcder::{Captured, Mode};
use bcder::decode::{DecodeError, IntoSource, Source};
use bytes::Bytes;


//------------ Length Arithmetic ---------------------------------------------

/// Returns the number of octets of the length octets for `len`.
///
/// Always uses the definite form as required by DER.
pub fn length_len(len: usize) -> usize {
    if len < 0x80 {
        1
    }
    else {
        1 + ((usize::BITS - len.leading_zeros() + 7) / 8) as usize
    }
}

/// Returns the number of octets of tag and length for a value.
///
/// The value has `len` content octets. Only single-octet tags are
/// considered since those are the only ones used here.
pub fn tlv_overhead(len: usize) -> usize {
    1 + length_len(len)
}

/// Returns the full length of a value with `len` content octets.
pub fn tlv_len(len: usize) -> usize {
    len + tlv_overhead(len)
}

/// Returns the length of the first value in `data`.
///
/// Returns `None` if the data is too short for the header, if the value
/// uses the indefinite length form, or if the length overflows.
pub fn first_value_len(data: &[u8]) -> Option<usize> {
    let mut pos = 1;
    if *data.first()? & 0x1F == 0x1F {
        loop {
            let octet = *data.get(pos)?;
            pos += 1;
            if octet & 0x80 == 0 {
                break
            }
        }
    }
    let len = *data.get(pos)?;
    pos += 1;
    let content = if len < 0x80 {
        usize::from(len)
    }
    else if len == 0x80 {
        return None
    }
    else {
        let count = usize::from(len & 0x7F);
        if count > mem::size_of::<usize>() {
            return None
        }
        let mut res = 0usize;
        for _ in 0..count {
            res = (res << 8) | usize::from(*data.get(pos)?);
            pos += 1;
        }
        res
    };
    pos.checked_add(content)
}


//------------ Decoding ------------------------------------------------------

/// Decodes a source that must contain nothing but what `op` takes.
///
/// A plain `Mode::decode` stops once `op` is done and leaves whatever
/// follows alone.
pub fn decode_all<I, F, T>(
    mode: Mode, source: I, op: F
) -> Result<T, DecodeError<Infallible>>
where
    I: IntoSource,
    I::Source: Source<Error = Infallible>,
    F: FnOnce(
        &mut decode::Constructed<&mut I::Source>
    ) -> Result<T, DecodeError<Infallible>>
{
    let mut source = source.into_source();
    let res = mode.decode(&mut source, op)?;
    match source.request(1) {
        Ok(0) => Ok(res),
        _ => Err(DecodeError::content("trailing data", source.pos()))
    }
}

/// Captures the next value if there is one.
pub fn take_opt_captured<S: decode::Source>(
    cons: &mut decode::Constructed<S>
) -> Result<Option<Captured>, DecodeError<S::Error>> {
    let mut found = false;
    let captured = cons.capture(|cons| {
        found = cons.skip_one()?.is_some();
        Ok(())
    })?;
    Ok(if found { Some(captured) } else { None })
}


//------------ Raw -----------------------------------------------------------

/// Already encoded values that are written out as they are.
///
/// Captured data may have been decoded in BER mode. This type writes the
/// octets unchanged no matter which mode is requested.
#[derive(Clone, Debug)]
pub struct Raw(pub Bytes);

impl Raw {
    pub fn from_slice(slice: &[u8]) -> Self {
        Raw(Bytes::copy_from_slice(slice))
    }
}

impl From<&Captured> for Raw {
    fn from(captured: &Captured) -> Self {
        Raw(captured.clone().into_bytes())
    }
}

impl encode::Values for Raw {
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


//------------ SetOf ---------------------------------------------------------

/// The content of a DER SET OF value.
///
/// DER requires the members of a SET OF to appear in ascending order of
/// their encodings. Members are therefore encoded when they are added and
/// kept sorted. Encoding the value only produces the content. Wrap it in
/// `encode::set` or an implicitly tagged `encode::sequence_as`.
#[derive(Clone, Debug, Default)]
pub struct SetOf {
    members: Vec<Bytes>,
}

impl SetOf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member.
    pub fn push<V: encode::Values>(&mut self, value: V) {
        let value = value.to_captured(Mode::Der).into_bytes();
        let pos = match self.members.binary_search(&value) {
            Ok(pos) | Err(pos) => pos
        };
        self.members.insert(pos, value);
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the length of the content of the set.
    pub fn content_len(&self) -> usize {
        self.members.iter().map(Bytes::len).sum()
    }

    /// Returns an iterator over the encoded members in DER order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.members.iter().map(AsRef::as_ref)
    }
}

impl<V: encode::Values> FromIterator<V> for SetOf {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut res = Self::new();
        for item in iter {
            res.push(item)
        }
        res
    }
}

impl encode::Values for SetOf {
    fn encoded_len(&self, _mode: Mode) -> usize {
        self.content_len()
    }

    fn write_encoded<W: io::Write>(
        &self,
        _mode: Mode,
        target: &mut W
    ) -> Result<(), io::Error> {
        for member in &self.members {
            target.write_all(member.as_ref())?;
        }
        Ok(())
    }
}


//============ Tests =========================================================
