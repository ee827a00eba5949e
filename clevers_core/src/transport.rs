use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;

/// Status code and fully collected body of one GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues a single HTTP GET.
///
/// Implementations return every received response, whatever its status;
/// only failures to obtain a response at all are `TransportError`s.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        (**self).get(url).await
    }
}
