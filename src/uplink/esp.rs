// Accelink - ESP-IDF HTTP Transport
//
// A fresh `EspHttpConnection` per request; it is dropped (and the underlying
// esp_http_client cleaned up) on every return path, including errors.

use std::time::Duration;

use embedded_svc::http::client::Client;
use embedded_svc::http::Method;
use embedded_svc::io::{Read, Write};
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
use esp_idf_sys::{esp_err_t, EspError, ESP_ERR_HTTP_CONNECT, ESP_ERR_HTTP_EAGAIN, ESP_ERR_TIMEOUT};

use super::payload::{read_limited, MAX_SCALAR_BODY_LEN};
use super::{Response, Transport};
use crate::error::NetworkError;

pub struct EspHttpTransport {
    timeout: Duration,
}

impl EspHttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn client(&self) -> Result<Client<EspHttpConnection>, NetworkError> {
        let conn = EspHttpConnection::new(&Configuration {
            timeout: Some(self.timeout),
            ..Default::default()
        })
        .map_err(network_error)?;
        Ok(Client::wrap(conn))
    }
}

impl Transport for EspHttpTransport {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> Result<u16, NetworkError> {
        let mut client = self.client()?;

        let content_length = body.len().to_string();
        let mut all_headers: Vec<(&str, &str)> = headers.to_vec();
        all_headers.push(("Content-Length", &content_length));

        let mut request = client
            .request(Method::Post, url, &all_headers)
            .map_err(network_error)?;
        request.write_all(body).map_err(network_error)?;
        request.flush().map_err(network_error)?;

        let response = request.submit().map_err(network_error)?;
        Ok(response.status())
    }

    fn get(&mut self, url: &str) -> Result<Response, NetworkError> {
        let mut client = self.client()?;
        let mut response = client
            .get(url)
            .map_err(network_error)?
            .submit()
            .map_err(network_error)?;

        let status = response.status();
        let body = read_limited(MAX_SCALAR_BODY_LEN, |buf| response.read(buf).map_err(network_error))?;

        Ok(Response { status, body })
    }
}

fn network_error(err: EspError) -> NetworkError {
    match err.code() {
        code if code == ESP_ERR_HTTP_CONNECT as esp_err_t => NetworkError::ConnectFailed,
        code if code == ESP_ERR_HTTP_EAGAIN as esp_err_t || code == ESP_ERR_TIMEOUT as esp_err_t => {
            NetworkError::Timeout
        }
        code => NetworkError::Other(code),
    }
}
