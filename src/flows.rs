//! High-level execute/refresh flows coordinated around one credential pair.

pub mod execute;
pub mod refresh;

pub use refresh::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	api::CREDENTIAL_EXPIRED_CODE,
	auth::{CredentialPair, CredentialState},
	transport::ApiTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Executor specialized for the crate's default reqwest transport.
pub type ReqwestExecutor = Executor<ReqwestTransport>;

/// Coordinates token-guarded request execution for a single credential pair.
///
/// The executor owns the transport handle, the immutable credential pair, and the shared
/// [`CredentialState`] so the flow implementations can focus on dispatch and refresh logic.
/// Clones share the same state: every concurrent caller of one pair reads the same token and
/// participates in the same single-flight refresh episodes.
pub struct Executor<C>
where
	C: ?Sized + ApiTransport,
{
	/// Transport used for every outbound call, the token endpoint included.
	pub transport: Arc<C>,
	/// Credential pair this executor serves.
	pub pair: CredentialPair,
	/// Shared token slot + single-flight flag.
	pub state: Arc<CredentialState>,
	/// In-process counters for refresh activity.
	pub refresh_metrics: Arc<RefreshMetrics>,
	retry_pause: Duration,
	expiry_code: i64,
}
impl<C> Executor<C>
where
	C: ?Sized + ApiTransport,
{
	/// Pause between a committed refresh and the retry dispatch, giving the remote side time
	/// to propagate the fresh token.
	pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(1);

	/// Creates an executor that reuses the caller-provided transport.
	pub fn with_transport(pair: CredentialPair, transport: impl Into<Arc<C>>) -> Self {
		Self {
			transport: transport.into(),
			pair,
			state: Arc::new(CredentialState::new()),
			refresh_metrics: Default::default(),
			retry_pause: Self::DEFAULT_RETRY_PAUSE,
			expiry_code: CREDENTIAL_EXPIRED_CODE,
		}
	}

	/// Replaces the shared state, e.g. with one seeded via
	/// [`CredentialState::with_token`].
	pub fn with_state(mut self, state: Arc<CredentialState>) -> Self {
		self.state = state;

		self
	}

	/// Overrides the fixed pause between refresh and retry (defaults to one second).
	pub fn with_retry_pause(mut self, pause: Duration) -> Self {
		self.retry_pause = pause;

		self
	}

	/// Overrides the error code treated as the expiry sentinel, for remotes that renumber the
	/// condition.
	pub fn with_expiry_code(mut self, code: i64) -> Self {
		self.expiry_code = code;

		self
	}

	pub(crate) fn retry_pause(&self) -> Duration {
		self.retry_pause
	}

	pub(crate) fn expiry_code(&self) -> i64 {
		self.expiry_code
	}
}
#[cfg(feature = "reqwest")]
impl Executor<ReqwestTransport> {
	/// Creates an executor with its own reqwest-backed transport.
	pub fn new(pair: CredentialPair) -> Self {
		Self::with_transport(pair, ReqwestTransport::default())
	}
}
impl<C> Clone for Executor<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			pair: self.pair.clone(),
			state: self.state.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			retry_pause: self.retry_pause,
			expiry_code: self.expiry_code,
		}
	}
}
impl<C> Debug for Executor<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Executor")
			.field("pair", &self.pair)
			.field("retry_pause", &self.retry_pause)
			.field("expiry_code", &self.expiry_code)
			.finish()
	}
}
