//! Request descriptions handed to a [`BoxService`](crate::service::BoxService).
//!
//! A `BoxRequest` is plain data: method, endpoint, query parameters in
//! insertion order, and extra headers. Nothing here performs I/O.

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// Query parameter names used by the events endpoint.
pub mod params {
    pub const STREAM_POSITION: &str = "stream_position";
    pub const STREAM_TYPE: &str = "stream_type";
    pub const STREAM_LIMIT: &str = "limit";
    /// Literal `stream_position` value asking for the current head.
    pub const NOW_STREAM_POSITION: &str = "now";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRequest {
    pub method: RequestMethod,
    pub host: Url,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl BoxRequest {
    /// A GET against `host` with no parameters.
    pub fn new(host: Url) -> Self {
        Self {
            method: RequestMethod::Get,
            host,
            params: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn method(mut self, method: RequestMethod) -> Self {
        self.method = method;
        self
    }

    /// Set a query parameter, replacing any earlier value under the same name.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Set a header, replacing any earlier value under the same name
    /// (compared case-insensitively).
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((name, value)),
        }
        self
    }

    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Full URI with the query string applied.
    pub fn uri(&self) -> Url {
        let mut uri = self.host.clone();
        if !self.params.is_empty() {
            uri.query_pairs_mut()
                .extend_pairs(self.params.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        }
        uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Url {
        Url::parse("https://api.box.com/2.0/events").unwrap()
    }

    #[test]
    fn new_request_is_bare_get() {
        let req = BoxRequest::new(events());
        assert_eq!(req.method, RequestMethod::Get);
        assert!(req.params.is_empty());
        assert_eq!(req.uri().as_str(), "https://api.box.com/2.0/events");
    }

    #[test]
    fn params_keep_insertion_order_in_uri() {
        let req = BoxRequest::new(events())
            .param(params::STREAM_POSITION, "42")
            .param(params::STREAM_TYPE, "sync")
            .param(params::STREAM_LIMIT, "10");
        assert_eq!(
            req.uri().as_str(),
            "https://api.box.com/2.0/events?stream_position=42&stream_type=sync&limit=10"
        );
    }

    #[test]
    fn param_replaces_existing_value() {
        let req = BoxRequest::new(events())
            .param(params::STREAM_POSITION, "1")
            .param(params::STREAM_POSITION, "now");
        assert_eq!(req.params.len(), 1);
        assert_eq!(req.get_param(params::STREAM_POSITION), Some("now"));
    }

    #[test]
    fn headers_compare_case_insensitively() {
        let req = BoxRequest::new(events())
            .header("As-User", "1")
            .header("as-user", "2");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.get_header("AS-USER"), Some("2"));
    }
}
