//! Read-only view of the parts of an HTTP request that routing inspects.

use http::Method;

/// What a route may look at on an incoming request.
///
/// `path` is the raw, still percent-encoded URI path.
pub trait RequestView {
    fn method(&self) -> &str;
    fn path(&self) -> &str;
    fn scheme(&self) -> Option<&str>;
    fn host(&self) -> Option<&str>;
    fn query(&self) -> Option<&str> {
        None
    }
}

/// Owned request view, handy when the host pipeline does not use `http`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    scheme: Option<String>,
    host: Option<String>,
    path: String,
    query: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            scheme: None,
            host: None,
            path: path.into(),
            query: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Build a view from an absolute URL such as `https://example.com/a?b=c`.
    pub fn from_url(method: Method, url: &str) -> Result<Self, url::ParseError> {
        let parsed = url::Url::parse(url)?;
        Ok(Self {
            method,
            scheme: Some(parsed.scheme().to_string()),
            host: parsed.host_str().map(str::to_string),
            path: parsed.path().to_string(),
            query: parsed.query().map(str::to_string),
        })
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl RequestView for Request {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Strip a trailing `:port` from a `Host` header value.
fn host_without_port(value: &str) -> &str {
    match value.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => host,
        _ => value,
    }
}

impl<B> RequestView for http::Request<B> {
    fn method(&self) -> &str {
        http::Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }

    fn scheme(&self) -> Option<&str> {
        self.uri().scheme_str()
    }

    fn host(&self) -> Option<&str> {
        self.uri().host().or_else(|| {
            self.headers()
                .get(http::header::HOST)
                .and_then(|value| value.to_str().ok())
                .map(host_without_port)
        })
    }

    fn query(&self) -> Option<&str> {
        self.uri().query()
    }
}
