//! Credential-guarded request execution: share one short-lived bearer token across concurrent
//! callers, collapse token refreshes into a single flight, and retry expired calls exactly once.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod error;
pub mod flows;
pub mod obs;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AppId, CredentialPair},
		flows::{Executor, ReqwestExecutor},
		transport::ReqwestTransport,
	};

	/// Builds a reqwest-backed executor pointed at a mock server, with a retry pause short
	/// enough to keep test wall-clock time reasonable.
	pub fn build_reqwest_test_executor(
		base_url: &str,
		app_id: &str,
		secret: &str,
	) -> ReqwestExecutor {
		let app_id = AppId::new(app_id).expect("Failed to build app identifier for tests.");
		let base = Url::parse(base_url).expect("Failed to parse mock server base URL.");
		let pair = CredentialPair::new(app_id, secret, base)
			.expect("Failed to build credential pair for tests.");

		Executor::with_transport(pair, ReqwestTransport::default())
			.with_retry_pause(Duration::from_millis(20))
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::{
			Arc,
			atomic::{AtomicBool, Ordering},
		},
		time::Duration,
	};

	pub use async_lock::RwLock as AsyncRwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokengate as _, tokio as _};
