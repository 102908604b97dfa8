use std::collections::HashMap;

use bytes::Bytes;
use tonic::metadata::MetadataMap;

/// Content type the SDK assigns to string and byte responses.
pub const DEFAULT_JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A service invocation forwarded by the sidecar.
#[derive(Debug, Clone, Default)]
pub struct InvokeMethodRequest {
    pub data: Bytes,
    pub content_type: String,
    /// Invocation metadata (gRPC headers) sent along with the call.
    pub metadata: MetadataMap,
}

impl InvokeMethodRequest {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: MetadataMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// The payload as UTF-8 text, if it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// The reply a method handler hands back to the sidecar.
#[derive(Debug, Clone, Default)]
pub struct InvokeMethodResponse {
    pub data: Bytes,
    pub content_type: String,
    /// Headers sent back as initial metadata.
    pub headers: MetadataMap,
}

impl InvokeMethodResponse {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            headers: MetadataMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: MetadataMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    fn json(data: Bytes) -> Self {
        Self::new(data, DEFAULT_JSON_CONTENT_TYPE)
    }
}

impl From<()> for InvokeMethodResponse {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

impl From<String> for InvokeMethodResponse {
    fn from(data: String) -> Self {
        Self::json(Bytes::from(data))
    }
}

impl From<&'static str> for InvokeMethodResponse {
    fn from(data: &'static str) -> Self {
        Self::json(Bytes::from_static(data.as_bytes()))
    }
}

impl From<Vec<u8>> for InvokeMethodResponse {
    fn from(data: Vec<u8>) -> Self {
        Self::json(Bytes::from(data))
    }
}

impl From<Bytes> for InvokeMethodResponse {
    fn from(data: Bytes) -> Self {
        Self::json(data)
    }
}

/// An input binding trigger forwarded by the sidecar.
#[derive(Debug, Clone, Default)]
pub struct BindingRequest {
    pub name: String,
    pub data: Bytes,
    pub metadata: HashMap<String, String>,
}

impl BindingRequest {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}
