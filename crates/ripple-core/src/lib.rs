//! Domain service layer: user directory, post store, engagement engine
//! and alarm feed, plus the credential store and token issuer they use.
//! All invariants (ownership, duplicate likes, username uniqueness,
//! credential verification) live here; HTTP and storage are adapters.

pub mod credential;
pub mod engagement;
pub mod error;
pub mod posts;
pub mod token;
pub mod users;

mod map;

pub use error::ServiceError;
