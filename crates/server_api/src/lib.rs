#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(unused_features)]
#![warn(unused_crate_dependencies)]

//! HTTP API types and request handlers.

use utoipa::OpenApi;

use self::utils::SecurityApiAccessTokenDefault;

// Routes
pub mod profile;

pub mod app;
pub mod utils;

pub use server_data::DataError;

// API docs

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        model::Profile,
        model::ProfileUpdate,
        model::FieldError,
        model::ValidationErrors,
    )),
    modifiers(&SecurityApiAccessTokenDefault),
)]
pub struct ApiDocProfile;

#[macro_export]
macro_rules! create_open_api_router {
    (
        $state_instance:ident,
        $(
            $path:ident::<$state_type:ty>,
        )*
    ) => {
        {
            $(
                let $path = $path::<$state_type>;
            )*
            utoipa_axum::router::OpenApiRouter::new()
            $(
                .merge(utoipa_axum::router::OpenApiRouter::new().routes(utoipa_axum::routes!($path)))
            )*
            .with_state($state_instance)
        }
    };
}
