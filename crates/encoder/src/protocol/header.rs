//! Header fields as the application hands them to the encoder.
//!
//! Unlike `http::HeaderMap`, a list of [`HeaderField`] keeps the original name casing,
//! allows duplicates and preserves insertion order, which is exactly what ends up
//! on the wire. Names and values are arbitrary bytes until the validator checks them
//! against the RFC 9110 grammar.

use bytes::Bytes;

use crate::ensure;
use crate::protocol::EncodeError;

/// A single `name: value` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    name: Bytes,
    value: Bytes,
}

impl HeaderField {
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<Bytes>,
        V: Into<Bytes>,
    {
        Self { name: name.into(), value: value.into() }
    }

    /// Creates a field from static strings, handy for fixed header tables.
    pub const fn from_static(name: &'static str, value: &'static str) -> Self {
        Self { name: Bytes::from_static(name.as_bytes()), value: Bytes::from_static(value.as_bytes()) }
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns true if the field name equals `name`, ignoring ASCII case.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }

    /// Checks the name against the token grammar and the value against the field-value grammar.
    pub fn validate(&self) -> Result<(), EncodeError> {
        self.validate_name()?;
        self.validate_value()
    }

    pub(crate) fn validate_name(&self) -> Result<(), EncodeError> {
        ensure!(is_token(&self.name), EncodeError::invalid_header_name(&self.name));
        Ok(())
    }

    pub(crate) fn validate_value(&self) -> Result<(), EncodeError> {
        ensure!(
            is_field_value(&self.value),
            EncodeError::invalid_header_value(format!(
                "value of {} contains CR, LF or another control character",
                String::from_utf8_lossy(&self.name)
            ))
        );
        Ok(())
    }

    /// Length of this field once rendered as `name: value\r\n`.
    #[inline]
    pub(crate) fn encoded_len(&self) -> usize {
        self.name.len() + 2 + self.value.len() + 2
    }
}

impl<N, V> From<(N, V)> for HeaderField
where
    N: Into<Bytes>,
    V: Into<Bytes>,
{
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// tchar per RFC 9110 section 5.6.2
#[inline]
pub(crate) fn is_tchar(b: u8) -> bool {
    matches!(b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~' | b'0'..=b'9' | b'A'..=b'Z' | b'a'..=b'z'
    )
}

/// `token = 1*tchar`
pub(crate) fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|b| is_tchar(*b))
}

/// field-value: visible chars, SP, HTAB and obs-text. CR, LF, NUL, DEL and the
/// other control characters are rejected, so a value can never fold or inject a line.
pub(crate) fn is_field_value(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == b'\t' || (b >= 0x20 && b != 0x7f))
}

/// request-target restricted to visible ASCII: no whitespace, controls or raw non-ASCII.
pub(crate) fn is_request_target(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(|b| (0x21..=0x7e).contains(b))
}

/// Splits a comma separated list value into its trimmed, non-empty elements.
pub(crate) fn list_elements(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value.split(|b| *b == b',').map(<[u8]>::trim_ascii).filter(|e| !e.is_empty())
}
