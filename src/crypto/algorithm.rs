//! Generic algorithm identifiers.

use std::fmt;
use bcder::{decode, encode};
use bcder::{Captured, Mode, Oid};
use bcder::decode::DecodeError;
use bcder::encode::{PrimitiveContent, Values};
use bytes::Bytes;
use crate::util::der::Raw;


//------------ AlgorithmIdentifier -------------------------------------------

/// An algorithm identifier with its optional parameters.
///
/// ```txt
/// AlgorithmIdentifier  ::=  SEQUENCE  {
///      algorithm               OBJECT IDENTIFIER,
///      parameters              ANY DEFINED BY algorithm OPTIONAL  }
/// ```
///
/// The parameters are kept as they were encoded, so identifiers for
/// algorithms unknown to this crate survive decoding and encoding
/// unchanged. An absent parameter and a `NULL` parameter are different
/// values.
#[derive(Clone, Debug)]
pub struct AlgorithmIdentifier {
    algorithm: Oid<Bytes>,
    parameters: Option<Bytes>,
}

impl AlgorithmIdentifier {
    /// Creates a new identifier from the algorithm and encoded parameters.
    pub fn new(algorithm: Oid<Bytes>, parameters: Option<Captured>) -> Self {
        AlgorithmIdentifier {
            algorithm,
            parameters: parameters.map(Captured::into_bytes),
        }
    }

    /// Creates an identifier without parameters.
    pub fn without_parameters<T: AsRef<[u8]>>(algorithm: &Oid<T>) -> Self {
        AlgorithmIdentifier {
            algorithm: Oid(Bytes::copy_from_slice(algorithm.0.as_ref())),
            parameters: None,
        }
    }

    /// Creates an identifier with a `NULL` parameter.
    pub fn with_null_parameters<T: AsRef<[u8]>>(algorithm: &Oid<T>) -> Self {
        AlgorithmIdentifier {
            algorithm: Oid(Bytes::copy_from_slice(algorithm.0.as_ref())),
            parameters: Some(
                ().encode().to_captured(Mode::Der).into_bytes()
            ),
        }
    }

    /// Creates an identifier with the given parameters.
    pub fn with_parameters<T: AsRef<[u8]>>(
        algorithm: &Oid<T>, parameters: impl encode::Values
    ) -> Self {
        AlgorithmIdentifier {
            algorithm: Oid(Bytes::copy_from_slice(algorithm.0.as_ref())),
            parameters: Some(
                parameters.to_captured(Mode::Der).into_bytes()
            ),
        }
    }

    pub fn algorithm(&self) -> &Oid<Bytes> {
        &self.algorithm
    }

    /// Returns the encoded parameters if there are any.
    pub fn parameters(&self) -> Option<&[u8]> {
        self.parameters.as_ref().map(AsRef::as_ref)
    }

    /// Returns whether the parameters are present and a `NULL`.
    pub fn has_null_parameters(&self) -> bool {
        self.parameters() == Some(b"\x05\x00".as_ref())
    }
}


/// # Decoding and Encoding
///
impl AlgorithmIdentifier {
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
        let algorithm = Oid::take_from(cons)?;
        let parameters = cons.capture_all()?;
        Ok(AlgorithmIdentifier {
            algorithm,
            parameters: if parameters.as_slice().is_empty() {
                None
            }
            else {
                Some(parameters.into_bytes())
            }
        })
    }

    pub fn encode_ref(&self) -> impl encode::Values + '_ {
        encode::sequence((
            self.algorithm.encode_ref(),
            self.parameters.clone().map(Raw),
        ))
    }

    /// Returns the length of the encoded identifier.
    pub fn encoded_len(&self) -> usize {
        self.encode_ref().encoded_len(Mode::Der)
    }
}


//--- PartialEq and Eq

impl PartialEq for AlgorithmIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm
        && self.parameters == other.parameters
    }
}

impl Eq for AlgorithmIdentifier { }


//--- Display

impl fmt::Display for AlgorithmIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.algorithm, f)
    }
}


//============ Tests =========================================================
