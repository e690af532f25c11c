//! Strongly typed application identifiers and the immutable credential pair.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

const APP_ID_MAX_LEN: usize = 128;

/// Error returned when application identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum AppIdError {
	/// The identifier was empty.
	#[error("App identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("App identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed character count.
	#[error("App identifier exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Unique identifier for one application integration with the remote service.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);
impl AppId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, AppIdError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for AppId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for AppId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for AppId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<AppId> for String {
	fn from(value: AppId) -> Self {
		value.0
	}
}
impl TryFrom<String> for AppId {
	type Error = AppIdError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for AppId {
	type Err = AppIdError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AppId({})", self.0)
	}
}
impl Display for AppId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate_view(view: &str) -> Result<(), AppIdError> {
	if view.is_empty() {
		return Err(AppIdError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(AppIdError::ContainsWhitespace);
	}
	if view.len() > APP_ID_MAX_LEN {
		return Err(AppIdError::TooLong { max: APP_ID_MAX_LEN });
	}

	Ok(())
}

/// Immutable application identifier + secret + base service URL triple.
///
/// Owned by the configuration layer and read-only to the executor. The base URL is validated
/// at construction so endpoint-path building can never fail later.
#[derive(Clone)]
pub struct CredentialPair {
	app_id: AppId,
	secret: Secret,
	base_url: Url,
}
impl CredentialPair {
	/// Builds a credential pair, rejecting base URLs that cannot carry path segments.
	pub fn new(
		app_id: AppId,
		secret: impl Into<String>,
		base_url: Url,
	) -> Result<Self, ConfigError> {
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::OpaqueBaseUrl);
		}

		Ok(Self { app_id, secret: Secret::new(secret), base_url })
	}

	/// Returns the application identifier.
	pub fn app_id(&self) -> &AppId {
		&self.app_id
	}

	/// Returns the base service URL.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Builds the token-issuing endpoint URL for this pair:
	/// `{base}/token?grant_type=client_credential&appid={id}&secret={secret}`.
	pub fn token_endpoint(&self) -> Url {
		let mut url = self.base_url.clone();

		// Validated in `new`, so the base always accepts segments.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push("token");
		}

		url.query_pairs_mut()
			.append_pair("grant_type", "client_credential")
			.append_pair("appid", self.app_id.as_ref())
			.append_pair("secret", self.secret.expose());

		url
	}
}
impl Debug for CredentialPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialPair")
			.field("app_id", &self.app_id)
			.field("secret", &self.secret)
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}
