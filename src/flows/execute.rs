//! Request execution with expiry detection and the single bounded retry.
//!
//! The executor exposes [`Executor::execute`] as the one entry point for endpoint
//! implementations: substitute the live token under shared access, dispatch, and (when the
//! remote reports the credential expired or is unreachable) refresh once and retry once.
//! There is deliberately no third attempt and no backoff; a caller that needs more runs its
//! own retry cycle on top.

// self
use crate::{
	_prelude::*,
	api::{ApiRequest, ApiResponse, MethodKind},
	flows::Executor,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	transport::ApiTransport,
};

impl<C> Executor<C>
where
	C: ?Sized + ApiTransport,
{
	/// Executes one outbound call, refreshing the credential and retrying exactly once when
	/// the first dispatch hits the expiry sentinel or fails at the transport level.
	///
	/// Expiry never surfaces as `Err`: the second outcome is returned as-is, which may still
	/// be an error response if the refresh failed or the remote stayed unreachable. Only
	/// request-construction misuse and final-attempt transport failures propagate as errors.
	pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::Execute;

		let span = FlowSpan::new(KIND, "execute");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				request.validate()?;

				let first = self.dispatch(&request).await;

				if !self.expiry_event(&first) {
					return first;
				}

				obs::record_flow_outcome(KIND, FlowOutcome::Retried);

				#[cfg(feature = "tracing")]
				tracing::debug!(method = %request.method(), "credential expired; retrying once");

				if !self.state.refresh_in_flight() {
					if let Err(_err) = self.refresh_credential().await {
						// Previous token stays in place; the retry below fails naturally and
						// the caller's next cycle triggers another refresh.
						#[cfg(feature = "tracing")]
						tracing::warn!(
							error = %_err,
							"credential refresh failed; retrying with the previous token"
						);
					}
				}

				// The remote needs a moment before it honors a freshly issued token.
				tokio::time::sleep(self.retry_pause()).await;

				self.dispatch(&request).await
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// An unreachable service is treated the same as an expired token for retry purposes;
	/// construction errors are not expiry events and surface immediately.
	fn expiry_event(&self, outcome: &Result<ApiResponse>) -> bool {
		match outcome {
			Ok(response) => response.has_error_code(self.expiry_code()),
			Err(Error::Transport(_)) => true,
			Err(_) => false,
		}
	}

	/// Dispatches once with the token substituted under shared access, so a concurrent
	/// refresh cannot swap the token mid-substitution. The guard is held until the transport
	/// answers; a retry therefore also waits out any in-flight refresh before it reads.
	async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let token = self.state.read().await;
		let url = request.fill(token.expose())?;
		let raw = match request.method() {
			MethodKind::Read => self.transport.get(&url, request.headers()).await?,
			MethodKind::Write =>
				self.transport
					.post(&url, request.headers(), request.body().unwrap_or_default())
					.await?,
		};

		Ok(ApiResponse::from_raw(raw))
	}
}
