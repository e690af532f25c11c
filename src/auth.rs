//! Auth-domain credential identifiers, redacted secrets, and shared token state.

pub mod credential;
pub mod secret;
pub mod state;

pub use credential::*;
pub use secret::*;
pub use state::*;
