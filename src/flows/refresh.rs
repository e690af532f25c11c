//! Single-flight credential refresh against the token-issuing endpoint.
//!
//! The executor exposes [`Executor::refresh_credential`] so callers can force a fresh token
//! without worrying about concurrent episodes. The atomic claim on
//! [`CredentialState`](crate::auth::CredentialState) decides the single winner; everyone else
//! serializes behind the winner's exclusive access and returns without a second network call.
//! A failed refresh is reported but never clobbers the stored token.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::Secret,
	error::RefreshError,
	flows::Executor,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::{ApiTransport, RawResponse},
};

/// Successful answer from the token-issuing endpoint.
#[derive(Debug)]
pub(crate) struct TokenGrant {
	pub access_token: String,
	/// Advisory lifetime; the remote expires tokens server-side regardless, so this is logged
	/// and otherwise ignored.
	#[allow(dead_code)]
	pub expires_in: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct TokenGrantPayload {
	access_token: Option<String>,
	expires_in: Option<i64>,
	errcode: Option<i64>,
	errmsg: Option<String>,
}

fn parse_grant(raw: RawResponse) -> Result<TokenGrant, RefreshError> {
	let mut de = serde_json::Deserializer::from_str(&raw.body);
	let payload: TokenGrantPayload = serde_path_to_error::deserialize(&mut de)
		.map_err(|source| RefreshError::ResponseParse { source, status: raw.status })?;

	match payload.access_token {
		Some(access_token) => Ok(TokenGrant { access_token, expires_in: payload.expires_in }),
		None => Err(RefreshError::Denied {
			code: payload.errcode.unwrap_or_default(),
			message: payload
				.errmsg
				.unwrap_or_else(|| format!("status {} without an access_token", raw.status)),
		}),
	}
}

impl<C> Executor<C>
where
	C: ?Sized + ApiTransport,
{
	/// Refreshes the shared credential, collapsing concurrent callers into a single flight.
	///
	/// The winner of the atomic claim holds exclusive access for the duration of the
	/// token-endpoint call and the commit, so no dispatch ever reads a half-written token. A
	/// caller that loses the claim performs no network call of its own, but still waits behind
	/// that exclusive access and so never returns before the winning refresh has committed.
	///
	/// On failure the previous (possibly stale) token is retained and the error is surfaced;
	/// [`Executor::execute`] masks it and lets the retry fail naturally instead.
	pub async fn refresh_credential(&self) -> Result<()> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_credential");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				if !self.state.try_begin_refresh() {
					// Lost the claim: park on the write lock until the winner has committed
					// and cleared the flag, then report success without dialing the endpoint
					// again. The flag recheck covers the window where this caller reaches
					// the lock queue ahead of the winner.
					while self.state.refresh_in_flight() {
						drop(self.state.write().await);
					}

					self.refresh_metrics.record_coalesced();

					return Ok(());
				}

				let mut slot = self.state.write().await;
				let result = match self.fetch_grant().await {
					Ok(grant) => {
						#[cfg(feature = "tracing")]
						tracing::debug!(
							expires_in = grant.expires_in,
							"fresh credential token installed"
						);

						*slot = Secret::new(grant.access_token);
						self.refresh_metrics.record_success();

						Ok(())
					},
					Err(err) => {
						#[cfg(feature = "tracing")]
						tracing::warn!(
							error = %err,
							"credential refresh failed; previous token retained"
						);

						self.refresh_metrics.record_failure();

						Err(Error::from(err))
					},
				};

				// Clear the flag before releasing exclusive access so the flag is only ever
				// observed true while a refresh is genuinely outstanding.
				self.state.end_refresh();
				drop(slot);

				result
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn fetch_grant(&self) -> Result<TokenGrant, RefreshError> {
		let url = self.pair.token_endpoint();
		let raw = self.transport.get(&url, &[]).await?;

		parse_grant(raw)
	}
}
