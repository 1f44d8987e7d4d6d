use std::sync::Arc;

use axum::{Router, middleware};
use model::{AccessToken, AccountId};
use server_api::{
    app::{AuthResolver, GetProfileStore, StateBase},
    utils::authenticate_with_access_token,
};
use server_data::InMemoryProfileStore;

use crate::auth::MockAccessTokenResolver;

#[derive(Clone, Default)]
pub struct AppState {
    profiles: Arc<InMemoryProfileStore>,
    auth: Arc<MockAccessTokenResolver>,
}

impl AppState {
    pub fn new(profiles: Arc<InMemoryProfileStore>, auth: MockAccessTokenResolver) -> Self {
        Self {
            profiles,
            auth: auth.into(),
        }
    }
}

impl StateBase for AppState {}

impl GetProfileStore for AppState {
    type Store = InMemoryProfileStore;

    fn profile_store(&self) -> &Self::Store {
        &self.profiles
    }
}

impl AuthResolver for AppState {
    async fn resolve_account(&self, token: Option<&AccessToken>) -> Option<AccountId> {
        self.auth.resolve_account(token).await
    }
}

pub struct App;

impl App {
    /// Router for the public API. Every route requires an account.
    pub fn create_profile_server_router(state: AppState) -> Router {
        let (router, _) = server_api::profile::profile_router(state.clone()).split_for_parts();
        router.route_layer(middleware::from_fn_with_state(
            state,
            authenticate_with_access_token::<AppState>,
        ))
    }
}
