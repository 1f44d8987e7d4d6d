#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! Generic HTTP server runner. Server specific logic is provided
//! with [BusinessLogic] trait.

use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use config::Config;
use error_stack::{Result, ResultExt};
use tokio::{
    net::TcpListener,
    signal::{
        self,
        unix::{Signal, SignalKind},
    },
    sync::broadcast,
    task::JoinHandle,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use utoipa_swagger_ui::SwaggerUi;

/// Drop this when quit starts
pub type ServerQuitHandle = broadcast::Sender<()>;

/// Use resubscribe() for cloning.
pub type ServerQuitWatcher = broadcast::Receiver<()>;

#[derive(thiserror::Error, Debug)]
pub enum SimpleBackendError {
    #[error("Quit signal handler creation failed")]
    SignalHandler,
    #[error("Public API socket binding failed")]
    SocketBind,
    #[error("Server task panicked")]
    ServerTaskPanic,
}

pub trait BusinessLogic: Sized + Send + Sync + 'static {
    type AppState: Clone + Send + Sync + 'static;

    /// Create router for public API
    fn public_api_router(&self, state: &Self::AppState) -> Router;

    /// Swagger UI which is added to the public API router
    /// only if debug mode is enabled.
    fn create_swagger_ui(&self, _state: &Self::AppState) -> Option<SwaggerUi> {
        None
    }

    /// Callback for doing something before server start
    ///
    /// For example data storage can be initialized here.
    fn on_before_server_start(&mut self) -> impl Future<Output = Self::AppState> + Send;

    /// Callback for doing something after server has quit
    fn on_after_server_quit(self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

pub struct SimpleBackend<T: BusinessLogic> {
    logic: T,
    config: Arc<Config>,
}

impl<T: BusinessLogic> SimpleBackend<T> {
    pub fn new(logic: T, config: Arc<Config>) -> Self {
        Self { logic, config }
    }

    pub async fn run(mut self) -> Result<(), SimpleBackendError> {
        init_logging(&self.config);

        info!("Backend version: {}", env!("CARGO_PKG_VERSION"));

        if self.config.debug_mode() {
            warn!("Debug mode is enabled");
        }

        let mut terminate_signal = signal::unix::signal(SignalKind::terminate())
            .change_context(SimpleBackendError::SignalHandler)?;

        let (server_quit_handle, server_quit_watcher) = broadcast::channel(1);

        let state = self.logic.on_before_server_start().await;

        let server_task = self
            .create_public_api_server_task(server_quit_watcher, &state)
            .await?;

        Self::wait_quit_signal(&mut terminate_signal).await;
        info!("Server quit signal received");

        info!("Server quit started");

        drop(server_quit_handle);

        // Wait until all tasks quit
        server_task
            .await
            .change_context(SimpleBackendError::ServerTaskPanic)?;

        drop(state);
        self.logic.on_after_server_quit().await;

        info!("Server quit done");

        Ok(())
    }

    pub async fn wait_quit_signal(terminate_signal: &mut Signal) {
        tokio::select! {
            _ = terminate_signal.recv() => {}
            result = signal::ctrl_c() => {
                match result {
                    Ok(()) => (),
                    Err(e) => error!("Failed to listen CTRL+C. Error: {}", e),
                }
            }
        }
    }

    /// Public API. This can have WAN access.
    pub async fn create_public_api_server_task(
        &self,
        quit_notification: ServerQuitWatcher,
        state: &T::AppState,
    ) -> Result<JoinHandle<()>, SimpleBackendError> {
        let router = {
            let router = self.logic.public_api_router(state);
            if self.config.debug_mode() {
                let router = if let Some(swagger) = self.logic.create_swagger_ui(state) {
                    router.merge(swagger)
                } else {
                    router
                };
                router.layer(TraceLayer::new_for_http())
            } else {
                router
            }
        };

        let addr = self.config.public_api();
        let listener = TcpListener::bind(addr)
            .await
            .change_context(SimpleBackendError::SocketBind)
            .attach_printable_lazy(|| format!("Address: {addr}"))?;
        info!("Public API is available on {}", addr);

        Ok(Self::create_server_task(
            listener,
            router,
            "Public API",
            quit_notification,
        ))
    }

    pub fn create_server_task(
        listener: TcpListener,
        router: Router,
        name_for_log_message: &'static str,
        mut quit_notification: ServerQuitWatcher,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let server = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                let _ = quit_notification.recv().await;
            });

            match server.await {
                Ok(()) => {
                    info!("{name_for_log_message} server future returned Ok()");
                }
                Err(e) => {
                    error!("{name_for_log_message} server future returned error: {}", e);
                }
            }
        })
    }
}

/// Log filter is read from `RUST_LOG` environment variable.
/// Log level `info` is used if the variable is not set.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_timestamp() {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
