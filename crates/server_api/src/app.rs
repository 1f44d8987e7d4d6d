use std::future::Future;

use model::{AccessToken, AccountId};
use server_data::ProfileStore;

pub trait GetProfileStore {
    type Store: ProfileStore;

    fn profile_store(&self) -> &Self::Store;
}

/// Finds out which account made the request.
///
/// Authentication is not implemented in this server, so this only maps
/// the optional access token header value to an account.
pub trait AuthResolver {
    fn resolve_account(
        &self,
        token: Option<&AccessToken>,
    ) -> impl Future<Output = Option<AccountId>> + Send;
}

pub trait StateBase: Send + Sync + Clone + 'static {}
