//! Types common to all things X.509.

use std::{error, fmt, io};
use std::str::FromStr;
use bcder::{decode, encode};
use bcder::{Captured, Mode, OctetString, Oid, Tag};
use bcder::decode::{ContentError, DecodeError, Source};
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use chrono::{Datelike, DateTime, LocalResult, Timelike, TimeZone, Utc};
use crate::oid;
use crate::util::der::Raw;
use crate::util::hex;


//------------ Name ----------------------------------------------------------

/// A distinguished name.
///
/// The name is kept in its encoded form. Two names are equal if their
/// encodings are equal, which is how certificates are matched against
/// signer identifiers.
#[derive(Clone, Debug)]
pub struct Name(Captured);

impl Name {
    /// Creates a name consisting of a single common name.
    pub fn from_common_name(common_name: &str) -> Self {
        Name(encode::sequence(
            encode::set(
                encode::sequence((
                    oid::AT_COMMON_NAME.encode(),
                    OctetString::encode_slice_as(
                        common_name.as_bytes(), Tag::UTF8_STRING
                    ),
                ))
            )
        ).to_captured(Mode::Der))
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.capture(|cons| {
            cons.take_sequence(|cons| { // RDNSequence
                while let Some(()) = cons.take_opt_set(|cons| {
                    let mut empty_set = true;
                    while let Some(()) = cons.take_opt_sequence(|cons| {
                        empty_set = false;
                        Oid::skip_in(cons)?;
                        if cons.skip_one()?.is_none() {
                            return Err(cons.content_err(
                                "invalid name"
                            ))
                        }
                        Ok(())
                    })? { }
                    if empty_set {
                        return Err(cons.content_err(
                            "empty relative distinguished name"
                        ));
                    }
                    Ok(())
                })? { }
                Ok(())
            })
        }).map(Name)
    }

    /// Returns the first common name in the name if there is one.
    ///
    /// Whatever string type is used, the content is interpreted as UTF-8.
    pub fn common_name(&self) -> Option<String> {
        self.0.clone().decode(|cons| {
            cons.take_sequence(|cons| {
                let mut res = None;
                while let Some(()) = cons.take_opt_set(|cons| {
                    while let Some(()) = cons.take_opt_sequence(|cons| {
                        let attr_type = Oid::take_from(cons)?;
                        let value = cons.take_value(|_, content| {
                            content.as_primitive()?.take_all()
                        })?;
                        if res.is_none() && attr_type == oid::AT_COMMON_NAME {
                            res = Some(
                                String::from_utf8_lossy(&value).into_owned()
                            );
                        }
                        Ok(())
                    })? { }
                    Ok(())
                })? { }
                Ok(res)
            })
        }).ok().flatten()
    }

    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        Raw::from(&self.0)
    }
}


//--- PartialEq and Eq

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_slice() == other.0.as_slice()
    }
}

impl Eq for Name {}


//------------ Serial --------------------------------------------------------

/// A certificate serial number.
///
/// The serial number is kept as the content octets of its INTEGER
/// encoding. This preserves serial numbers of any length and even negative
/// ones which, while forbidden, do appear in the wild.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Serial(Bytes);

impl Serial {
    /// Returns the content octets of the serial number.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_ref()
    }

    /// Returns whether the encoded integer is negative.
    pub fn is_negative(&self) -> bool {
        self.0.first().map(|first| first & 0x80 != 0).unwrap_or(false)
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive_if(Tag::INTEGER, |prim| {
            let res = prim.take_all()?;
            if res.is_empty() {
                return Err(prim.content_err("empty serial number"))
            }
            Ok(Serial(res))
        })
    }
}


//--- From and FromStr

impl From<u64> for Serial {
    fn from(value: u64) -> Self {
        let bytes = value.to_be_bytes();
        let start = bytes.iter().position(|&ch| ch != 0).unwrap_or(7);
        let mut res = Vec::with_capacity(9);
        if bytes[start] & 0x80 != 0 {
            res.push(0);
        }
        res.extend_from_slice(&bytes[start..]);
        Serial(res.into())
    }
}

impl FromStr for Serial {
    type Err = SerialSliceError;

    /// Parses a serial number from the hex representation of its octets.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = hex::decode(value).ok_or(SerialSliceError)?;
        if value.is_empty() {
            return Err(SerialSliceError)
        }
        Ok(Serial(value.into()))
    }
}


//--- Display and Debug

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hex::fmt(self.as_slice(), f)
    }
}

impl fmt::Debug for Serial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Serial({self})")
    }
}


//--- PrimitiveContent

impl PrimitiveContent for Serial {
    const TAG: Tag = Tag::INTEGER;

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
impl serde::Serialize for Serial {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Serial {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D
    ) -> Result<Self, D::Error> {
        let value = <String as serde::Deserialize>::deserialize(
            deserializer
        )?;
        Serial::from_str(&value).map_err(serde::de::Error::custom)
    }
}


//------------ Time ----------------------------------------------------------

/// A point in time as used in certificates, CRLs, and attributes.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Time(DateTime<Utc>);

impl Time {
    pub fn new(dt: DateTime<Utc>) -> Self {
        Time(dt)
    }

    /// Creates a time value from its components.
    ///
    /// Returns `None` if the components don’t form a valid time.
    pub fn utc(
        year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32
    ) -> Option<Self> {
        Self::from_parts((year, month, day, hour, min, sec)).ok()
    }

    pub fn timestamp(self) -> i64 {
        self.0.timestamp()
    }

    pub fn take_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        cons.take_primitive(|tag, prim| {
            match tag {
                Tag::UTC_TIME => Self::from_utc_time(prim),
                Tag::GENERALIZED_TIME => Self::from_generalized_time(prim),
                _ => {
                    Err(prim.content_err(
                        "malformed time value"
                    ))
                }
            }
        })
    }

    pub fn take_opt_from<S: decode::Source>(
        cons: &mut decode::Constructed<S>
    ) -> Result<Option<Self>, DecodeError<S::Error>> {
        let res = cons.take_opt_primitive_if(
            Tag::UTC_TIME, Self::from_utc_time
        )?;
        if let Some(res) = res {
            return Ok(Some(res))
        }
        cons.take_opt_primitive_if(
            Tag::GENERALIZED_TIME, Self::from_generalized_time
        )
    }

    /// Parses the content of a UTCTime.
    ///
    /// RFC 5280 requires the format YYMMDDHHMMSSZ.
    fn from_utc_time<S: decode::Source>(
        prim: &mut decode::Primitive<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let year = read_two_char(prim)? as i32;
        let year = if year >= 50 { year + 1900 }
                   else { year + 2000 };
        let res = (
            year,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
        );
        if prim.take_u8()? != b'Z' {
            return Err(prim.content_err(
                "malformed time value"
            ))
        }
        Self::from_parts(res).map_err(|err| prim.content_err(err))
    }

    /// Parses the content of a GeneralizedTime.
    ///
    /// RFC 5280 requires the format YYYYMMDDHHMMSSZ.
    fn from_generalized_time<S: decode::Source>(
        prim: &mut decode::Primitive<S>
    ) -> Result<Self, DecodeError<S::Error>> {
        let res = (
            read_four_char(prim)? as i32,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
            read_two_char(prim)?,
        );
        if prim.take_u8()? != b'Z' {
            return Err(prim.content_err(
                "malformed time value"
            ))
        }
        Self::from_parts(res).map_err(|err| prim.content_err(err))
    }

    fn from_parts(
        parts: (i32, u32, u32, u32, u32, u32)
    ) -> Result<Self, ContentError> {
        match Utc.with_ymd_and_hms(
            parts.0, parts.1, parts.2, parts.3, parts.4, parts.5
        ) {
            LocalResult::Single(dt) => Ok(Time(dt)),
            _ => Err(ContentError::from_static("malformed time value"))
        }
    }

    pub fn encode_utc_time(self) -> impl encode::Values {
        UtcTime(self).encode()
    }

    pub fn encode_generalized_time(self) -> impl encode::Values {
        GeneralizedTime(self).encode()
    }

    /// Encodes the time the way RFC 5280 wants it.
    ///
    /// Times from 1950 through 2049 are encoded as UTCTime, all others as
    /// GeneralizedTime.
    pub fn encode_varied(self) -> impl encode::Values {
        if self.0.year() < 1950 || self.0.year() > 2049 {
            (None, Some(self.encode_generalized_time()))
        }
        else {
            (Some(self.encode_utc_time()), None)
        }
    }
}


//--- Display

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.0.year(), self.0.month(), self.0.day(),
            self.0.hour(), self.0.minute(), self.0.second()
        )
    }
}


fn read_two_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 2];
    s[0] = source.take_u8()?;
    s[1] = source.take_u8()?;
    read_digits(source, &s)
}

fn read_four_char<S: decode::Source>(
    source: &mut S
) -> Result<u32, DecodeError<S::Error>> {
    let mut s = [0u8; 4];
    for ch in &mut s {
        *ch = source.take_u8()?;
    }
    read_digits(source, &s)
}

fn read_digits<S: decode::Source>(
    source: &mut S, digits: &[u8]
) -> Result<u32, DecodeError<S::Error>> {
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(source.content_err("malformed time value"))
    }
    Ok(digits.iter().fold(0, |res, ch| res * 10 + u32::from(ch - b'0')))
}


//------------ UtcTime and GeneralizedTime -----------------------------------

pub struct UtcTime(Time);

impl PrimitiveContent for UtcTime {
    const TAG: Tag = Tag::UTC_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        13 // yyMMddhhmmssZ
    }

    fn write_encoded<W: io::Write>(
        &self, _: Mode, target: &mut W
    ) -> Result<(), io::Error> {
        write!(
            target, "{:02}{:02}{:02}{:02}{:02}{:02}Z",
            self.0.0.year() % 100, self.0.0.month(), self.0.0.day(),
            self.0.0.hour(), self.0.0.minute(), self.0.0.second()
        )
    }
}

pub struct GeneralizedTime(Time);

impl PrimitiveContent for GeneralizedTime {
    const TAG: Tag = Tag::GENERALIZED_TIME;

    fn encoded_len(&self, _: Mode) -> usize {
        15 // yyyyMMddhhmmssZ
    }

    fn write_encoded<W: io::Write>(
        &self, _: Mode, target: &mut W
    ) -> Result<(), io::Error> {
        write!(
            target, "{:04}{:02}{:02}{:02}{:02}{:02}Z",
            self.0.0.year(), self.0.0.month(), self.0.0.day(),
            self.0.0.hour(), self.0.0.minute(), self.0.0.second()
        )
    }
}


//------------ SerialSliceError ----------------------------------------------

/// A serial number was given in an invalid form.
#[derive(Clone, Copy, Debug)]
pub struct SerialSliceError;

impl fmt::Display for SerialSliceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid serial number")
    }
}

impl error::Error for SerialSliceError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn name_from_common_name() {
        let name = Name::from_common_name("Test Signer");
        assert_eq!(name.common_name().as_deref(), Some("Test Signer"));
        let decoded = Mode::Der.decode(
            name.as_slice(), Name::take_from
        ).unwrap();
        assert_eq!(decoded, name);
        assert_ne!(name, Name::from_common_name("Other Signer"));
    }

    #[test]
    fn name_rejects_empty_rdn() {
        assert!(
            Mode::Der.decode(b"\x30\x02\x31\x00".as_ref(), Name::take_from)
                .is_err()
        );
    }

    #[test]
    fn serial_from_u64() {
        assert_eq!(Serial::from(0).as_slice(), b"\x00");
        assert_eq!(Serial::from(0x7f).as_slice(), b"\x7f");
        assert_eq!(Serial::from(0x80).as_slice(), b"\x00\x80");
        assert_eq!(Serial::from(0x1234).as_slice(), b"\x12\x34");
        assert_eq!(
            Serial::from(u64::MAX).as_slice(),
            b"\x00\xff\xff\xff\xff\xff\xff\xff\xff"
        );
    }

    #[test]
    fn serial_keeps_octets() {
        // A 21 octet serial and a negative one.
        let mut long = vec![0x02, 21, 0x01];
        long.extend_from_slice(&[0xAA; 20]);
        let serial = Mode::Der.decode(
            long.as_slice(), Serial::take_from
        ).unwrap();
        assert_eq!(serial.as_slice().len(), 21);
        assert_eq!(
            serial.encode_ref().to_captured(Mode::Der).as_slice(),
            long.as_slice()
        );

        let negative = Mode::Der.decode(
            b"\x02\x01\xfe".as_ref(), Serial::take_from
        ).unwrap();
        assert!(negative.is_negative());
        assert_eq!(negative.to_string(), "FE");

        assert!(
            Mode::Der.decode(b"\x02\x00".as_ref(), Serial::take_from).is_err()
        );
    }

    #[test]
    fn serial_from_str() {
        let serial = Serial::from_str("00A1").unwrap();
        assert_eq!(serial.as_slice(), b"\x00\xa1");
        assert_eq!(serial.to_string(), "00A1");
        assert!(Serial::from_str("").is_err());
        assert!(Serial::from_str("xyz").is_err());
    }

    #[test]
    fn time_encoding() {
        let time = Time::utc(2024, 2, 29, 13, 5, 59).unwrap();
        assert_eq!(
            time.encode_varied().to_captured(Mode::Der).as_slice(),
            b"\x17\x0d240229130559Z".as_ref()
        );
        assert_eq!(
            time.encode_generalized_time().to_captured(Mode::Der).as_slice(),
            b"\x18\x0f20240229130559Z".as_ref()
        );
        let late = Time::utc(2050, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            late.encode_varied().to_captured(Mode::Der).as_slice(),
            b"\x18\x0f20500101000000Z".as_ref()
        );
        assert!(Time::utc(2023, 2, 29, 0, 0, 0).is_none());
    }

    #[test]
    fn time_decoding() {
        let time = Mode::Der.decode(
            b"\x17\x0d491231235959Z".as_ref(), Time::take_from
        ).unwrap();
        assert_eq!(time, Time::utc(2049, 12, 31, 23, 59, 59).unwrap());
        let time = Mode::Der.decode(
            b"\x17\x0d500101000000Z".as_ref(), Time::take_from
        ).unwrap();
        assert_eq!(time, Time::utc(1950, 1, 1, 0, 0, 0).unwrap());
        let time = Mode::Der.decode(
            b"\x18\x0f21060207062815Z".as_ref(), Time::take_from
        ).unwrap();
        assert_eq!(time.to_string(), "2106-02-07T06:28:15Z");
        assert!(
            Mode::Der.decode(
                b"\x17\x0d24022913055aZ".as_ref(), Time::take_from
            ).is_err()
        );
        let none = Mode::Der.decode(b"\x05\x00".as_ref(), |cons| {
            let res = Time::take_opt_from(cons)?;
            cons.take_opt_null()?;
            Ok(res)
        }).unwrap();
        assert!(none.is_none());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_serial() {
        use serde_test::{Token, assert_tokens};

        assert_tokens(&Serial::from(0xA1), &[Token::Str("00A1")]);
        assert!(
            serde_json::from_str::<Serial>("\"A1x\"").is_err()
        );
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_time() {
        let time = Time::utc(2024, 3, 1, 12, 0, 0).unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(serde_json::from_str::<Time>(&json).unwrap(), time);
    }
}
