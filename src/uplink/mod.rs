// Accelink - Telemetry Uploader
//
// Delivers full batches to the collector over HTTP. A failed send means the
// batch is lost; there is no retry queue.

pub mod payload;

#[cfg(target_os = "espidf")]
pub mod esp;

use crate::error::NetworkError;

/// Response of a plain GET exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Blocking HTTP request/response transport.
///
/// Implementations must release their connection on every return path.
pub trait Transport {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> Result<u16, NetworkError>;

    fn get(&mut self, url: &str) -> Result<Response, NetworkError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> Result<u16, NetworkError> {
        (**self).post(url, headers, body)
    }

    fn get(&mut self, url: &str) -> Result<Response, NetworkError> {
        (**self).get(url)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub struct TelemetryUploader<T> {
    transport: T,
    base_url: String,
    upload_path: String,
}

impl<T: Transport> TelemetryUploader<T> {
    pub fn new(transport: T, base_url: impl Into<String>, upload_path: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            upload_path: upload_path.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a batch as `{"data":[...]}` and return the 2xx status code.
    pub fn send(&mut self, batch: &[f32]) -> Result<u16, NetworkError> {
        let body = payload::encode_batch(batch)?;
        let url = self.url(&self.upload_path);

        let status = self
            .transport
            .post(&url, &[("Content-Type", "application/json")], body.as_bytes())?;

        if !is_success(status) {
            return Err(NetworkError::Status(status));
        }

        log::debug!("Sent {} values to {} (HTTP {})", batch.len(), url, status);
        Ok(status)
    }

    /// GET a small numeric endpoint whose body is a bare decimal integer.
    pub fn fetch_scalar(&mut self, path: &str) -> Result<i32, NetworkError> {
        let response = self.transport.get(&self.url(path))?;
        if !is_success(response.status) {
            return Err(NetworkError::Status(response.status));
        }
        payload::parse_scalar(&response.body)
    }

    /// One-shot GET used at boot to check the collector is reachable.
    pub fn probe(&mut self, path: &str) -> Result<u16, NetworkError> {
        Ok(self.transport.get(&self.url(path))?.status)
    }
}
