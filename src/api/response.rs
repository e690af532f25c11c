//! Responses handed back to endpoint callers, with the expiry-sentinel extraction.

// self
use crate::{_prelude::*, transport::RawResponse};

/// Error code the remote service uses to report that the bearer token is no longer valid.
///
/// Executors compare against this by default; see
/// [`Executor::with_expiry_code`](crate::flows::Executor::with_expiry_code) for remotes that
/// renumber the condition.
pub const CREDENTIAL_EXPIRED_CODE: i64 = 42001;

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
	errcode: Option<i64>,
	errmsg: Option<String>,
}

/// One transport exchange as seen by endpoint callers: HTTP status, raw body, and the error
/// code/message extracted from the remote's JSON envelope when one is present.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code of the exchange.
	pub status: u16,
	/// Raw response body; deserializing endpoint-specific payloads is the caller's concern.
	pub body: String,
	/// Remote error code, when the body carried the JSON error envelope.
	pub error_code: Option<i64>,
	/// Remote error message, when the body carried the JSON error envelope.
	pub error_message: Option<String>,
}
impl ApiResponse {
	/// Extracts the error envelope from a raw transport response.
	///
	/// Bodies that are not JSON, or JSON without the envelope fields, simply yield no error
	/// code; the remote signals success for many endpoints with a plain payload.
	pub(crate) fn from_raw(raw: RawResponse) -> Self {
		let envelope =
			serde_json::from_str::<ErrorEnvelope>(&raw.body).unwrap_or_default();

		Self {
			status: raw.status,
			body: raw.body,
			error_code: envelope.errcode,
			error_message: envelope.errmsg,
		}
	}

	/// Returns `true` when the remote reported the given error code.
	pub fn has_error_code(&self, code: i64) -> bool {
		self.error_code == Some(code)
	}

	/// Returns `true` when the remote reported the well-known expired-credential code.
	pub fn credential_expired(&self) -> bool {
		self.has_error_code(CREDENTIAL_EXPIRED_CODE)
	}

	/// Returns `true` for a 2xx exchange whose envelope carries no error (or the zero code the
	/// remote uses for "ok").
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status) && matches!(self.error_code, None | Some(0))
	}
}
