#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

pub mod api_doc;
pub mod app;
pub mod auth;

use std::sync::Arc;

use api_doc::ApiDoc;
use app::{App, AppState};
use auth::MockAccessTokenResolver;
use axum::Router;
use config::Config;
use error_stack::Result;
use server_data::InMemoryProfileStore;
use simple_backend::{BusinessLogic, SimpleBackend, SimpleBackendError};
use tracing::{error, info, warn};
use utoipa_swagger_ui::SwaggerUi;

pub struct ProfileServer {
    config: Arc<Config>,
}

impl ProfileServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: config.into(),
        }
    }

    pub async fn run(self) -> Result<(), SimpleBackendError> {
        let logic = ProfileBusinessLogic::new(self.config.clone());
        SimpleBackend::new(logic, self.config).run().await
    }
}

pub struct ProfileBusinessLogic {
    config: Arc<Config>,
    profiles: Option<Arc<InMemoryProfileStore>>,
}

impl ProfileBusinessLogic {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            config,
            profiles: None,
        }
    }

    async fn load_seed_profiles(&self, store: &InMemoryProfileStore) {
        for seed in self.config.seed_profiles() {
            if let Err(e) = store
                .insert_profile_if_not_exists(seed.account_id.clone(), seed.profile())
                .await
            {
                error!("Adding seed profile failed. Error: {:?}", e);
            }
        }

        let ids = store.account_ids().await;
        info!("Profiles loaded: {}", ids.len());
        for id in &ids {
            info!("Profile available, account: {id}");
        }

        if let Some(default_account) = self.config.default_account() {
            if ids.contains(default_account) {
                info!("Requests without access token use account {default_account}");
            } else {
                warn!("Default account {default_account} does not have a profile");
            }
        }
    }
}

impl BusinessLogic for ProfileBusinessLogic {
    type AppState = AppState;

    fn public_api_router(&self, state: &Self::AppState) -> Router {
        App::create_profile_server_router(state.clone())
    }

    fn create_swagger_ui(&self, _state: &Self::AppState) -> Option<SwaggerUi> {
        let swagger = SwaggerUi::new("/swagger-ui");
        Some(swagger.url("/api-doc/profile_api.json", ApiDoc::all()))
    }

    async fn on_before_server_start(&mut self) -> Self::AppState {
        let store = Arc::new(InMemoryProfileStore::new());
        self.load_seed_profiles(&store).await;
        self.profiles = Some(store.clone());
        let auth = MockAccessTokenResolver::from_config(&self.config);
        AppState::new(store, auth)
    }

    async fn on_after_server_quit(self) {
        // Profiles are only in RAM
        if let Some(store) = self.profiles {
            info!("Profiles discarded: {}", store.account_ids().await.len());
        }
    }
}
