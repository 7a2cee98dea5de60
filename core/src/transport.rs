//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the one seam between the pure client and real I/O. The
//! ureq implementation keeps a cookie jar on its agent so the backend's
//! refresh-token cookie rides along on every credentialed request, and it
//! returns 4xx/5xx responses as data so status interpretation stays with
//! `HouseholdClient`.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip. Implementations must not retry.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// Clones share the agent, and with it the cookie jar. Requests with
/// `include_credentials` set go through that agent; the rest use a fresh
/// agent whose jar starts empty and is discarded afterwards.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self { agent: new_agent() }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = if request.include_credentials {
            self.agent.clone()
        } else {
            new_agent()
        };
        let url = request.url.as_str();
        let body = request.body.as_deref();
        let result = match request.method {
            HttpMethod::Get => with_headers(agent.get(url), &request.headers).call(),
            HttpMethod::Delete => {
                let builder = with_headers(agent.delete(url), &request.headers);
                match body {
                    Some(body) => builder.force_send_body().send(body.as_bytes()),
                    None => builder.call(),
                }
            }
            HttpMethod::Post => send(with_headers(agent.post(url), &request.headers), body),
            HttpMethod::Patch => send(with_headers(agent.patch(url), &request.headers), body),
        };
        let mut response = result.map_err(network_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(network_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn new_agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn network_error(err: ureq::Error) -> ApiError {
    ApiError::Network {
        cause: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::{SocketAddr, TcpListener};
    use std::thread::JoinHandle;

    use super::*;
    use crate::error::CONNECTION_FAILED;

    const SET_COOKIE_RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
        set-cookie: refreshToken=abc; Path=/\r\n\
        content-length: 0\r\n\
        connection: close\r\n\r\n";

    /// Answer `count` connections with `response`, returning each raw request.
    fn record_requests(
        count: usize,
        response: &'static str,
    ) -> (SocketAddr, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = std::thread::spawn(move || {
            (0..count)
                .map(|_| {
                    let (mut stream, _) = listener.accept().unwrap();
                    let raw = read_request(&mut stream);
                    stream.write_all(response.as_bytes()).unwrap();
                    raw
                })
                .collect()
        });
        (addr, handle)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = stream.read(&mut buf).unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .map(|(_, value)| value.trim().parse::<usize>().unwrap())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length || n == 0 {
                    return text;
                }
            } else if n == 0 {
                return text;
            }
        }
    }

    fn request(
        method: HttpMethod,
        addr: SocketAddr,
        body: Option<&str>,
        include_credentials: bool,
    ) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("http://{addr}/house-hold/member/7"),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.map(str::to_string),
            include_credentials,
        }
    }

    #[test]
    fn delete_body_reaches_the_wire() {
        let (addr, server) = record_requests(1, SET_COOKIE_RESPONSE);
        let sent = request(HttpMethod::Delete, addr, Some(r#"{"reason":"moved"}"#), true);
        let response = UreqTransport::new().execute(&sent).unwrap();
        assert_eq!(response.status, 200);

        let raw = server.join().unwrap().remove(0);
        assert!(raw.starts_with("DELETE /house-hold/member/7 HTTP/1.1"));
        assert!(raw.ends_with(r#"{"reason":"moved"}"#), "body missing: {raw}");
    }

    #[test]
    fn cookie_jar_only_follows_credentialed_requests() {
        let (addr, server) = record_requests(3, SET_COOKIE_RESPONSE);
        let transport = UreqTransport::new();
        transport.execute(&request(HttpMethod::Get, addr, None, true)).unwrap();
        transport.execute(&request(HttpMethod::Get, addr, None, false)).unwrap();
        transport.execute(&request(HttpMethod::Get, addr, None, true)).unwrap();

        let raw: Vec<String> = server
            .join()
            .unwrap()
            .into_iter()
            .map(|r| r.to_ascii_lowercase())
            .collect();
        assert!(!raw[1].contains("refreshtoken=abc"), "anonymous request carried the cookie");
        assert!(raw[2].contains("refreshtoken=abc"), "credentialed request lost the cookie");
    }

    #[test]
    fn refused_connection_is_a_network_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("http://{addr}/house-hold"),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: None,
            include_credentials: true,
        };
        let err = UreqTransport::new().execute(&request).unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
        assert_eq!(err.to_string(), CONNECTION_FAILED);
    }
}
