//! Outbound call descriptions with the token-placeholder convention.

// self
use crate::{_prelude::*, error::ConfigError};

/// Reserved marker character in URL templates that the executor rewrites with the live token
/// immediately before dispatch.
pub const TOKEN_PLACEHOLDER: char = '#';

/// Kind of outbound call, mapped onto the transport's GET/POST semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MethodKind {
	/// Read-style call dispatched as a GET.
	Read,
	/// Write-style call dispatched as a POST with a body.
	Write,
}
impl MethodKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			MethodKind::Read => "GET",
			MethodKind::Write => "POST",
		}
	}
}
impl Display for MethodKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// One outbound call: method kind, URL template with the token placeholder, optional body and
/// headers. Created per call and discarded after completion.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	method: MethodKind,
	url_template: String,
	body: Option<String>,
	headers: Vec<(String, String)>,
}
impl ApiRequest {
	/// Describes a read-style call against the templated URL.
	pub fn get(url_template: impl Into<String>) -> Self {
		Self {
			method: MethodKind::Read,
			url_template: url_template.into(),
			body: None,
			headers: Vec::new(),
		}
	}

	/// Describes a write-style call carrying the provided body.
	pub fn post(url_template: impl Into<String>, body: impl Into<String>) -> Self {
		Self {
			method: MethodKind::Write,
			url_template: url_template.into(),
			body: Some(body.into()),
			headers: Vec::new(),
		}
	}

	/// Attaches a header forwarded verbatim to the transport.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Returns the method kind.
	pub fn method(&self) -> MethodKind {
		self.method
	}

	/// Returns the body for write-style calls.
	pub fn body(&self) -> Option<&str> {
		self.body.as_deref()
	}

	/// Returns the headers forwarded to the transport.
	pub fn headers(&self) -> &[(String, String)] {
		&self.headers
	}

	/// Rejects requests that cannot possibly dispatch; surfaced before the first transport
	/// call as a programming error rather than entering the retry cycle.
	pub(crate) fn validate(&self) -> Result<(), ConfigError> {
		if self.url_template.is_empty() {
			return Err(ConfigError::EmptyUrl);
		}

		Ok(())
	}

	/// Substitutes the live token for every placeholder occurrence and parses the result.
	/// Templates without a placeholder dispatch unchanged.
	pub(crate) fn fill(&self, token: &str) -> Result<Url, ConfigError> {
		let rendered = self.url_template.replace(TOKEN_PLACEHOLDER, token);

		Url::parse(&rendered).map_err(|source| ConfigError::InvalidUrl { source })
	}
}
