//! Request validation and framing selection.
//!
//! [`build_plan`] inspects an [`OutgoingRequest`] and either produces an [`EncodePlan`]
//! or fails before a single byte is emitted. Checks run in a fixed order so the
//! reported error is deterministic:
//!
//! 1. method is a token
//! 2. request-target is visible ASCII only
//! 3. header count limit
//! 4. every header name is a token
//! 5. every header value is free of CR, LF and other control characters
//! 6. `Transfer-Encoding` coding list, with `chunked` as the final coding
//! 7. `Transfer-Encoding: chunked` together with `Content-Length` is rejected
//! 8. `Content-Length` value, or the body source length
//! 9. `Connection: close`
//! 10. rendered head size limit
//!
//! Repeated `Transfer-Encoding` fields are treated as one field holding their values
//! joined with commas in header order (RFC 9110 section 5.3).

use bytes::{Bytes, BytesMut};
use http::header::{CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING};
use tokio_util::codec::Encoder;
use tracing::{debug, warn};

use crate::codec::header::{HeaderEncoder, RequestHead};
use crate::codec::{EncodePlan, EncoderConfig};
use crate::ensure;
use crate::protocol::{is_request_target, is_token, list_elements, EncodeError, HeaderField, OutgoingRequest};

const CHUNKED: &[u8] = b"chunked";
const CLOSE: &[u8] = b"close";

/// Validates `request` with the default [`EncoderConfig`] and builds its encode plan.
///
/// # Errors
///
/// - [`EncodeError::InvalidMethod`]: method missing or not a token
/// - [`EncodeError::InvalidPath`]: request-target missing or containing whitespace/control bytes
/// - [`EncodeError::InvalidHeaderName`]: a header name is not a token
/// - [`EncodeError::InvalidHeaderValue`]: a header value contains CR/LF/controls, a bad
///   `Transfer-Encoding` coding list or a malformed `Content-Length`
/// - [`EncodeError::InvalidHeaderField`]: `Transfer-Encoding: chunked` combined with `Content-Length`
/// - [`EncodeError::TooManyHeaders`] / [`EncodeError::TooLargeHeader`]: configured limits exceeded
pub fn build_plan(request: &OutgoingRequest) -> Result<EncodePlan, EncodeError> {
    build_plan_with(request, &EncoderConfig::default())
}

/// Same as [`build_plan`] with explicit limits.
pub fn build_plan_with(request: &OutgoingRequest, config: &EncoderConfig) -> Result<EncodePlan, EncodeError> {
    let method = request.method().filter(|method| is_token(method)).ok_or(EncodeError::InvalidMethod)?;
    let target = request.target().filter(|target| is_request_target(target)).ok_or(EncodeError::InvalidPath)?;

    let headers = request.headers();
    let max_header_num = config.get_max_header_num();
    ensure!(headers.len() <= max_header_num, EncodeError::too_many_headers(max_header_num));

    for field in headers {
        field.validate_name()?;
    }
    for field in headers {
        field.validate_value()?;
    }

    let framing = FramingHeaders::scan(headers);
    let has_chunked_encoding = framing.parse_transfer_encoding()?;

    let (content_length, derived_length) = if has_chunked_encoding {
        ensure!(
            framing.content_lengths.is_empty(),
            EncodeError::invalid_header_field("transfer-encoding chunked must not be combined with content-length")
        );
        if request.body().is_some() {
            warn!("chunked request ignores its body source, chunks are taken from the chunk queue");
        }
        (0, None)
    } else {
        match framing.parse_content_length()? {
            Some(length) => (length, None),
            None => match request.body().map(|body| body.known_length()) {
                Some(Some(length)) => (length, (length > 0).then_some(length)),
                Some(None) => {
                    warn!("body source has unknown length and no content-length header, body will not be sent");
                    (0, None)
                }
                None => (0, None),
            },
        }
    };

    let head = RequestHead { method, target, headers, content_length: derived_length };
    let encoded_len = head.encoded_len();
    let max_header_bytes = config.get_max_header_bytes();
    ensure!(encoded_len <= max_header_bytes, EncodeError::too_large_header(encoded_len, max_header_bytes));

    let mut header_block = BytesMut::with_capacity(encoded_len);
    HeaderEncoder.encode(head, &mut header_block)?;

    debug!(
        method = %String::from_utf8_lossy(method),
        chunked = has_chunked_encoding,
        content_length,
        connection_close = framing.connection_close,
        header_bytes = header_block.len(),
        "built encode plan"
    );

    Ok(EncodePlan {
        method: Bytes::copy_from_slice(method),
        target: Bytes::copy_from_slice(target),
        has_chunked_encoding,
        has_connection_close: framing.connection_close,
        content_length,
        header_block: header_block.freeze(),
    })
}

/// The framing related header values of one request, gathered in a single pass.
#[derive(Debug, Default)]
struct FramingHeaders<'a> {
    has_transfer_encoding: bool,
    has_empty_coding: bool,
    transfer_codings: Vec<&'a [u8]>,
    content_lengths: Vec<&'a [u8]>,
    connection_close: bool,
}

impl<'a> FramingHeaders<'a> {
    fn scan(headers: &'a [HeaderField]) -> Self {
        let mut framing = Self::default();
        for field in headers {
            if field.is(TRANSFER_ENCODING.as_str()) {
                framing.has_transfer_encoding = true;
                framing.has_empty_coding |= field.value().split(|b| *b == b',').any(|e| e.trim_ascii().is_empty());
                framing.transfer_codings.extend(list_elements(field.value()));
            } else if field.is(CONTENT_LENGTH.as_str()) {
                framing.content_lengths.push(field.value());
            } else if field.is(CONNECTION.as_str()) {
                framing.connection_close |= list_elements(field.value()).any(|option| option.eq_ignore_ascii_case(CLOSE));
            }
        }
        framing
    }

    /// Returns whether chunked framing is requested.
    ///
    /// A `Transfer-Encoding` field with an empty value or an empty list element is
    /// rejected, it would otherwise go on the wire next to a `Content-Length`.
    ///
    /// refer: <https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding>
    fn parse_transfer_encoding(&self) -> Result<bool, EncodeError> {
        if !self.has_transfer_encoding {
            return Ok(false);
        }
        ensure!(
            !self.has_empty_coding,
            EncodeError::invalid_header_value("transfer-encoding has an empty transfer coding")
        );

        let Some((last, rest)) = self.transfer_codings.split_last() else {
            return Err(EncodeError::invalid_header_value("transfer-encoding has an empty coding list"));
        };

        ensure!(
            !rest.iter().any(|coding| coding.eq_ignore_ascii_case(CHUNKED)),
            EncodeError::invalid_header_value("chunked must be the final transfer coding")
        );
        ensure!(
            last.eq_ignore_ascii_case(CHUNKED),
            EncodeError::invalid_header_value(format!(
                "transfer-encoding must end with chunked, found {}",
                String::from_utf8_lossy(last)
            ))
        );
        Ok(true)
    }

    /// Returns the declared content length; repeated fields must agree.
    fn parse_content_length(&self) -> Result<Option<u64>, EncodeError> {
        let mut length = None;
        for value in &self.content_lengths {
            let parsed = parse_decimal(value.trim_ascii()).ok_or_else(|| {
                EncodeError::invalid_header_value(format!(
                    "content-length {:?} is not a non-negative decimal",
                    String::from_utf8_lossy(value)
                ))
            })?;

            if let Some(previous) = length {
                ensure!(previous == parsed, EncodeError::invalid_header_value("conflicting content-length values"));
            }
            length = Some(parsed);
        }
        Ok(length)
    }
}

/// `1*DIGIT` without sign, rejecting overflow.
fn parse_decimal(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    bytes.iter().try_fold(0u64, |acc, b| {
        if !b.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
    })
}
