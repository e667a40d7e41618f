use bytes::Bytes;

/// What the fetch collaborator hands back for a url.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body:   Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Anything from 400 upwards is treated as a failed fetch.
    #[inline]
    pub fn is_failure(&self) -> bool {
        self.status >= 400
    }
}

/// A decoded value paired with the scale factor it was requested at.
#[derive(Debug, Clone, PartialEq)]
pub struct Scaled<T> {
    pub value: T,
    pub scale: f64,
}

impl<T> Scaled<T> {
    pub fn new(value: T, scale: f64) -> Self {
        Self { value, scale }
    }
}
