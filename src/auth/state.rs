//! Shared mutable token state: one instance per credential pair, shared by every caller.

// crates.io
use async_lock::{RwLockReadGuard, RwLockWriteGuard};
// self
use crate::{_prelude::*, auth::Secret};

/// Current bearer token plus the single-flight refresh flag for one credential pair.
///
/// The token slot sits behind a readers-writer lock: ordinary dispatches hold the read half
/// across the transport call so a concurrent refresh can never swap the token mid-substitution,
/// while a refresh holds the write half for the duration of the network call and the commit.
/// The atomic flag is what collapses many concurrent expiry discoveries into one actual
/// token-endpoint call; the lock alone cannot do that.
///
/// Lives for the process lifetime of its credential pair. Created empty: the first dispatch
/// goes out with no token, the remote rejects it, and the normal expiry cycle fetches one.
#[derive(Debug, Default)]
pub struct CredentialState {
	token: AsyncRwLock<Secret>,
	refreshing: AtomicBool,
}
impl CredentialState {
	/// Creates state with no token issued yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates state seeded with a previously issued token, skipping the first-call refresh
	/// round-trip.
	pub fn with_token(token: impl Into<String>) -> Self {
		Self { token: AsyncRwLock::new(Secret::new(token)), refreshing: AtomicBool::new(false) }
	}

	/// Acquires shared access to the token slot.
	///
	/// Dispatches hold this guard across the transport call; it blocks while a refresh holds
	/// the write half, which is how a retry waits out an in-flight refresh.
	pub async fn read(&self) -> RwLockReadGuard<'_, Secret> {
		self.token.read().await
	}

	/// Acquires exclusive access to the token slot.
	///
	/// Only the refresh flow writes through this guard; a losing refresh caller acquires and
	/// drops it purely to serialize behind the winner's commit.
	pub async fn write(&self) -> RwLockWriteGuard<'_, Secret> {
		self.token.write().await
	}

	/// Returns a clone of the current token value.
	pub async fn current(&self) -> Secret {
		self.token.read().await.clone()
	}

	/// Atomically claims the in-flight refresh slot; returns whether this call won the race.
	pub fn try_begin_refresh(&self) -> bool {
		self.refreshing.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
	}

	/// Releases the in-flight refresh slot so a future episode can claim it.
	pub fn end_refresh(&self) {
		self.refreshing.store(false, Ordering::Release);
	}

	/// Returns `true` while a refresh is outstanding.
	pub fn refresh_in_flight(&self) -> bool {
		self.refreshing.load(Ordering::Acquire)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_slot_is_won_exactly_once() {
		let state = CredentialState::new();

		assert!(!state.refresh_in_flight());
		assert!(state.try_begin_refresh());
		assert!(state.refresh_in_flight());
		assert!(!state.try_begin_refresh());

		state.end_refresh();

		assert!(!state.refresh_in_flight());
		assert!(state.try_begin_refresh());
	}

	#[tokio::test]
	async fn token_commits_through_the_write_guard() {
		let state = CredentialState::new();

		assert!(state.current().await.is_empty());

		*state.write().await = Secret::new("T2");

		assert_eq!(state.current().await.expose(), "T2");
	}

	#[tokio::test]
	async fn readers_are_concurrent_among_themselves() {
		let state = CredentialState::with_token("T1");
		let first = state.read().await;
		let second = state.read().await;

		assert_eq!(first.expose(), "T1");
		assert_eq!(second.expose(), "T1");
	}

	#[tokio::test]
	async fn writer_waits_for_readers_to_drain() {
		let state = Arc::new(CredentialState::with_token("T1"));
		let reader = state.read().await;
		let writer_state = state.clone();
		let writer = tokio::spawn(async move {
			*writer_state.write().await = Secret::new("T2");
		});

		// The writer cannot make progress while the read guard is alive.
		tokio::task::yield_now().await;
		assert_eq!(reader.expose(), "T1");

		drop(reader);
		writer.await.expect("Writer task should complete once readers drain.");

		assert_eq!(state.current().await.expose(), "T2");
	}
}
