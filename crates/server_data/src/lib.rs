#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Profile data storage.

use std::future::Future;

use error_stack::Result;
use model::{AccountId, Profile, ProfileUpdateValidated};

pub mod cache;

pub use cache::InMemoryProfileStore;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataError {
    #[error("Not found")]
    NotFound,
    #[error("Already exists")]
    AlreadyExists,
}

/// Profile storage used by the API handlers.
///
/// Updates must be atomic for one account: profile reads never see
/// only some of the fields of an update.
pub trait ProfileStore: Send + Sync + 'static {
    fn profile(&self, id: &AccountId) -> impl Future<Output = Result<Profile, DataError>> + Send;

    /// Apply fields which are `Some` to the current profile and return the
    /// updated profile.
    fn update_profile(
        &self,
        id: &AccountId,
        update: ProfileUpdateValidated,
    ) -> impl Future<Output = Result<Profile, DataError>> + Send;
}
