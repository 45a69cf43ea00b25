//! The logical request handed to the encoder.
//!
//! [`OutgoingRequest`] is a plain description of what the application wants to send:
//! method, request-target, ordered header fields and an optional body source. Nothing
//! is validated here; method and target may even be missing, so that the validator can
//! report precisely what is wrong before any byte is produced.

use std::fmt;

use bytes::Bytes;
use http::request::Parts;
use http::{Method, Request};

use crate::protocol::body::{BodySource, BoxBody};
use crate::protocol::HeaderField;

#[derive(Default)]
pub struct OutgoingRequest {
    method: Option<Bytes>,
    target: Option<Bytes>,
    headers: Vec<HeaderField>,
    body: Option<BoxBody>,
}

impl OutgoingRequest {
    /// Creates a request with the given method and request-target and no headers.
    pub fn new<M, T>(method: M, target: T) -> Self
    where
        M: Into<Bytes>,
        T: Into<Bytes>,
    {
        Self { method: Some(method.into()), target: Some(target.into()), headers: Vec::new(), body: None }
    }

    pub fn method(&self) -> Option<&[u8]> {
        self.method.as_deref()
    }

    pub fn target(&self) -> Option<&[u8]> {
        self.target.as_deref()
    }

    pub fn headers(&self) -> &[HeaderField] {
        &self.headers
    }

    pub fn body(&self) -> Option<&(dyn BodySource + Send)> {
        self.body.as_deref()
    }

    pub fn set_method<M: Into<Bytes>>(&mut self, method: M) -> &mut Self {
        self.method = Some(method.into());
        self
    }

    pub fn set_target<T: Into<Bytes>>(&mut self, target: T) -> &mut Self {
        self.target = Some(target.into());
        self
    }

    /// Appends a header field, keeping any earlier field with the same name.
    pub fn add_header<H: Into<HeaderField>>(&mut self, header: H) -> &mut Self {
        self.headers.push(header.into());
        self
    }

    pub fn add_headers<I>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<HeaderField>,
    {
        self.headers.extend(headers.into_iter().map(Into::into));
        self
    }

    pub fn set_body<B: BodySource + Send + 'static>(&mut self, body: B) -> &mut Self {
        self.body = Some(Box::new(body));
        self
    }

    /// Removes the body source so it can be moved into an encoder.
    pub fn take_body(&mut self) -> Option<BoxBody> {
        self.body.take()
    }
}

impl fmt::Debug for OutgoingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutgoingRequest")
            .field("method", &self.method)
            .field("target", &self.target)
            .field("headers", &self.headers)
            .field("body_length", &self.body.as_ref().map(|body| body.known_length()))
            .finish()
    }
}

/// Converts request parts into an outgoing request without a body.
///
/// The request-target is the origin form (path and query) of the URI, or the authority
/// for `CONNECT`. Header names come out of `http::HeaderMap` lowercased and grouped by
/// name, so the original insertion order across different names is not preserved.
impl From<Parts> for OutgoingRequest {
    fn from(parts: Parts) -> Self {
        let target = if parts.method == Method::CONNECT {
            parts.uri.authority().map_or("", |authority| authority.as_str())
        } else {
            parts.uri.path_and_query().map_or("/", |path_and_query| path_and_query.as_str())
        };

        let mut request = OutgoingRequest::new(
            Bytes::copy_from_slice(parts.method.as_str().as_bytes()),
            Bytes::copy_from_slice(target.as_bytes()),
        );

        request.headers.reserve(parts.headers.len());
        for (name, value) in &parts.headers {
            request.headers.push(HeaderField::new(
                Bytes::copy_from_slice(name.as_str().as_bytes()),
                Bytes::copy_from_slice(value.as_bytes()),
            ));
        }

        request
    }
}

/// Converts an `http::Request` whose body is a [`BodySource`].
impl<B> From<Request<B>> for OutgoingRequest
where
    B: BodySource + Send + 'static,
{
    fn from(request: Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        let mut request = OutgoingRequest::from(parts);
        request.set_body(body);
        request
    }
}
