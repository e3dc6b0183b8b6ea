//! Per-operation request helper shared by the backend adapters.
//!
//! A `Session` bundles what every request needs: the persistent client,
//! the resolved API base, the forge's auth header, its API-error
//! extractor and its user-object key. Backends construct one at the top
//! of each operation and compose URLs against `base()`.

use std::io::Write;
use std::path::Path;

use forge_http::{ApiErrorFn, Client, Endpoint, Response};
use forge_json::Stream;

use crate::context::Context;
use crate::error::Result;

pub(crate) struct Session<'a> {
    http: &'a Client,
    base: String,
    auth: Option<String>,
    api_error: ApiErrorFn,
    user_key: &'static str,
}

impl<'a> Session<'a> {
    pub fn new(
        ctx: &'a Context,
        api_error: ApiErrorFn,
        user_key: &'static str,
        auth: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: ctx.http(),
            base: ctx.api_base()?,
            auth,
            api_error,
            user_key,
        })
    }

    /// The API root, without a trailing slash.
    pub fn base(&self) -> &str {
        self.base.trim_end_matches('/')
    }

    /// JSON key of the user identifier in this forge's user objects.
    pub fn user_key(&self) -> &'static str {
        self.user_key
    }

    fn endpoint<'u>(&'u self, url: &'u str) -> Endpoint<'u> {
        Endpoint {
            url,
            auth: self.auth.as_deref(),
            api_error: self.api_error,
        }
    }

    pub fn get(&self, url: &str) -> Result<Response> {
        Ok(self.http.get(&self.endpoint(url))?)
    }

    pub fn send(&self, method: &str, url: &str, payload: Option<&str>) -> Result<Response> {
        Ok(self.http.send(method, &self.endpoint(url), payload)?)
    }

    pub fn download(&self, url: &str, accept: Option<&str>, out: &mut dyn Write) -> Result<()> {
        Ok(self.http.download(&self.endpoint(url), accept, out)?)
    }

    pub fn upload(&self, url: &str, content_type: &str, data: &[u8]) -> Result<String> {
        Ok(self.http.upload(&self.endpoint(url), content_type, data)?)
    }

    pub fn upload_multipart(&self, url: &str, field: &str, path: &Path) -> Result<String> {
        Ok(self.http.upload_multipart(&self.endpoint(url), field, path)?)
    }

    /// Status-only existence probe.
    pub fn probe(&self, url: &str) -> bool {
        self.http.probe(url)
    }

    /// Paginated list accumulation; each page body is wrapped in a
    /// decode stream and handed to `parse`.
    pub fn list<T>(
        &self,
        url: String,
        max: Option<usize>,
        mut parse: impl FnMut(&mut Stream<'_>, &mut Vec<T>) -> Result<()>,
        filter: Option<&dyn Fn(&mut Vec<T>)>,
    ) -> Result<Vec<T>> {
        self.http.fetch_list(
            url,
            self.auth.as_deref(),
            self.api_error,
            max,
            |body, items| {
                let mut stream = Stream::new(body);
                parse(&mut stream, items)
            },
            filter,
        )
    }

    /// GET followed by a single-value parse.
    pub fn get_parsed<T>(
        &self,
        url: &str,
        parse: impl FnOnce(&mut Stream<'_>) -> Result<T>,
    ) -> Result<T> {
        let response = self.get(url)?;
        let mut stream = Stream::new(&response.body);
        parse(&mut stream)
    }
}
