//! Request execution over a persistent agent.

use std::io::Write;
use std::path::Path;

use tracing::debug;
use ureq::Agent;
use ureq::http::Request;

use crate::error::{HttpError, Result};
use crate::pagination::parse_link_header;

/// Extracts a human-readable diagnostic from an API error body.
///
/// Each forge names its error field differently; the backend passes its
/// extractor along with every request.
pub type ApiErrorFn = fn(&str) -> Option<String>;

/// Everything the engine needs to know about one request target.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    pub url: &'a str,
    /// Complete `Authorization` header value, or `None` for backends that
    /// authenticate through the URL (Bugzilla).
    pub auth: Option<&'a str>,
    pub api_error: ApiErrorFn,
}

/// A captured response body plus the pagination successor, if any.
#[derive(Debug)]
pub struct Response {
    pub body: String,
    /// URL of the next page, from the `link:` header's `rel="next"`.
    pub next: Option<String>,
}

/// The persistent HTTP client owned by a context.
///
/// Non-2xx statuses are delivered as responses (not transport errors) so
/// the backend's API-error extractor can read the body.
pub struct Client {
    agent: Agent,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .user_agent("fcli")
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// GET returning the body and the pagination successor.
    pub fn get(&self, ep: &Endpoint<'_>) -> Result<Response> {
        self.send("GET", ep, None)
    }

    /// Executes `method` with an optional JSON payload.
    pub fn send(&self, method: &str, ep: &Endpoint<'_>, payload: Option<&str>) -> Result<Response> {
        debug!(method, url = ep.url, "forge api request");

        let mut builder = Request::builder()
            .method(method)
            .uri(ep.url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Content-Type", "application/json");
        if let Some(auth) = ep.auth {
            builder = builder.header("Authorization", auth);
        }
        let request = builder
            .body(payload.unwrap_or(""))
            .map_err(|e| transport(ep.url, e))?;

        let mut response = self.agent.run(request).map_err(|e| transport(ep.url, e))?;

        let status = response.status().as_u16();
        let next = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_link_header);
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| transport(ep.url, e))?;

        if status >= 300 {
            return Err(api_error(ep, status, &body));
        }

        Ok(Response { body, next })
    }

    /// GET streaming the body straight into `out` (diffs, patches,
    /// attachment content). No in-memory buffering of successful bodies.
    pub fn download(
        &self,
        ep: &Endpoint<'_>,
        content_type: Option<&str>,
        out: &mut dyn Write,
    ) -> Result<()> {
        debug!(url = ep.url, "forge api download");

        let mut builder = Request::builder().method("GET").uri(ep.url);
        if let Some(accept) = content_type {
            builder = builder.header("Accept", accept);
        }
        if let Some(auth) = ep.auth {
            builder = builder.header("Authorization", auth);
        }
        let request = builder.body("").map_err(|e| transport(ep.url, e))?;

        let mut response = self.agent.run(request).map_err(|e| transport(ep.url, e))?;

        let status = response.status().as_u16();
        if status >= 300 {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(api_error(ep, status, &body));
        }

        let mut reader = response.body_mut().as_reader();
        std::io::copy(&mut reader, out).map_err(|e| transport(ep.url, e))?;
        Ok(())
    }

    /// POST with a raw body (release asset uploads).
    pub fn upload(&self, ep: &Endpoint<'_>, content_type: &str, data: &[u8]) -> Result<String> {
        debug!(url = ep.url, bytes = data.len(), "forge api upload");

        let mut builder = Request::builder()
            .method("POST")
            .uri(ep.url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("Content-Type", content_type);
        if let Some(auth) = ep.auth {
            builder = builder.header("Authorization", auth);
        }
        let request = builder.body(data).map_err(|e| transport(ep.url, e))?;

        let mut response = self.agent.run(request).map_err(|e| transport(ep.url, e))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| transport(ep.url, e))?;
        if status >= 300 {
            return Err(api_error(ep, status, &body));
        }
        Ok(body)
    }

    /// POST a file as a `multipart/form-data` form (Gitea attachment
    /// uploads). The file is read at call time.
    pub fn upload_multipart(&self, ep: &Endpoint<'_>, field: &str, path: &Path) -> Result<String> {
        let data = std::fs::read(path).map_err(|e| HttpError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        let boundary = "----fcli-multipart-2c97f7d4868f13a1";
        let mut body: Vec<u8> = Vec::with_capacity(data.len() + 512);
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(&data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        debug!(url = ep.url, file = %path.display(), "forge api multipart upload");

        let mut builder = Request::builder()
            .method("POST")
            .uri(ep.url)
            .header("Accept", "application/json")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            );
        if let Some(auth) = ep.auth {
            builder = builder.header("Authorization", auth);
        }
        let request = builder
            .body(&body[..])
            .map_err(|e| transport(ep.url, e))?;

        let mut response = self.agent.run(request).map_err(|e| transport(ep.url, e))?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| transport(ep.url, e))?;
        if status >= 300 {
            return Err(api_error(ep, status, &text));
        }
        Ok(text)
    }

    /// GET classifying by status only. Used for existence probes; any
    /// transport failure counts as "no".
    pub fn probe(&self, url: &str) -> bool {
        match self.agent.get(url).call() {
            Ok(response) => response.status().as_u16() < 300,
            Err(_) => false,
        }
    }

    /// Pagination-aware list accumulator.
    ///
    /// Fetches `url`, hands each page body to `parse` (which appends
    /// into the growing list), applies the optional in-place `filter`,
    /// then follows `rel="next"` links until the cap is reached, the
    /// pages run out, or a fetch/parse fails. With `max = Some(n)` the
    /// result never exceeds `n` items; `None` accumulates every page.
    pub fn fetch_list<T, E>(
        &self,
        url: String,
        auth: Option<&str>,
        api_error: ApiErrorFn,
        max: Option<usize>,
        mut parse: impl FnMut(&str, &mut Vec<T>) -> std::result::Result<(), E>,
        filter: Option<&dyn Fn(&mut Vec<T>)>,
    ) -> std::result::Result<Vec<T>, E>
    where
        E: From<HttpError>,
    {
        let mut items = Vec::new();
        let mut url = url;
        loop {
            let page = self
                .get(&Endpoint {
                    url: &url,
                    auth,
                    api_error,
                })
                .map_err(E::from)?;
            parse(&page.body, &mut items)?;
            if let Some(filter) = filter {
                filter(&mut items);
            }
            match page.next {
                Some(next) if max.is_none_or(|m| items.len() < m) => url = next,
                _ => break,
            }
        }
        if let Some(max) = max {
            items.truncate(max);
        }
        Ok(items)
    }
}

fn transport(url: &str, reason: impl std::fmt::Display) -> HttpError {
    HttpError::Transport {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

fn api_error(ep: &Endpoint<'_>, status: u16, body: &str) -> HttpError {
    let message = (ep.api_error)(body)
        .unwrap_or_else(|| body.trim().to_string());
    let message = if message.is_empty() {
        "<empty response>".to_string()
    } else {
        message
    };
    HttpError::Api {
        url: ep.url.to_string(),
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_error(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        let ep = Endpoint {
            url: "https://x/y",
            auth: None,
            api_error: no_error,
        };
        let err = api_error(&ep, 404, "  not found  ");
        assert_eq!(
            err.to_string(),
            "request to https://x/y failed with code 404: API error: not found"
        );
    }

    #[test]
    fn api_error_empty_body() {
        let ep = Endpoint {
            url: "https://x/y",
            auth: None,
            api_error: no_error,
        };
        let err = api_error(&ep, 500, "");
        assert!(err.to_string().ends_with("API error: <empty response>"));
    }

    #[test]
    fn transport_message_format() {
        let err = transport("https://x/y", "connection refused");
        assert_eq!(
            err.to_string(),
            "request to https://x/y failed: transport error: connection refused"
        );
    }
}
