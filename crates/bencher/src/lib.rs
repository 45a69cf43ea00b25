//! Request fixtures shared by the encoder benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    request: TestRequest,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, request: TestRequest) -> Self {
        Self { name, group, request }
    }

    pub fn small(name: &'static str, request: TestRequest) -> Self {
        Self::new(name, TestGroup::Small, request)
    }

    pub fn normal(name: &'static str, request: TestRequest) -> Self {
        Self::new(name, TestGroup::Normal, request)
    }

    pub fn large(name: &'static str, request: TestRequest) -> Self {
        Self::new(name, TestGroup::Large, request)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn request(&self) -> &TestRequest {
        &self.request
    }
}

/// A request shape: head fields plus how the body is framed.
#[derive(Debug, Copy, Clone)]
pub struct TestRequest {
    method: &'static str,
    target: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: TestBody,
}

impl TestRequest {
    pub const fn new(
        method: &'static str,
        target: &'static str,
        headers: &'static [(&'static str, &'static str)],
        body: TestBody,
    ) -> Self {
        Self { method, target, headers, body }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn headers(&self) -> &'static [(&'static str, &'static str)] {
        self.headers
    }

    pub fn body(&self) -> TestBody {
        self.body
    }

    /// Number of payload bytes, excluding framing.
    pub fn payload_len(&self) -> usize {
        match self.body {
            TestBody::Empty => 0,
            TestBody::Fixed(len) => len,
            TestBody::Chunked { chunk_size, chunks } => chunk_size * chunks,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub enum TestBody {
    Empty,
    /// `Content-Length` body of the given size
    Fixed(usize),
    /// `chunks` chunks of `chunk_size` bytes each
    Chunked { chunk_size: usize, chunks: usize },
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
