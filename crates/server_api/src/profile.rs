use axum::{Extension, extract::State};
use model::{AccountId, Profile, ProfileUpdate, ProfileUpdateJson, ValidationErrors};
use server_data::ProfileStore;
use tracing::debug;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app::{AuthResolver, GetProfileStore, StateBase},
    create_open_api_router,
    utils::{Json, RouteError, StatusCode},
};

pub const PATH_PROFILE: &str = "/user/profile";

/// Get current account's profile.
#[utoipa::path(
    get,
    path = "/user/profile",
    responses(
        (status = 200, description = "Successful.", body = Profile),
        (status = 401, description = "Unauthorized."),
        (status = 404, description = "Profile for the current account does not exist."),
        (status = 500, description = "Internal server error."),
    ),
    security(("access_token" = [])),
)]
pub async fn get_profile<S: GetProfileStore>(
    State(state): State<S>,
    Extension(account_id): Extension<AccountId>,
) -> Result<Json<Profile>, StatusCode> {
    debug!("Get profile, account: {account_id}");
    let profile = state.profile_store().profile(&account_id).await?;
    Ok(profile.into())
}

/// Update current account's profile.
///
/// Only fields which are in the request body are changed. Missing and
/// `null` fields keep their current values. Unknown fields are ignored.
///
/// # Requirements
/// - Email must have format `local-part@domain` and the domain must
///   contain at least one dot.
/// - Age must be an integer between 18 and 120.
/// - Name and bio must be strings.
///
/// If some field is invalid, the profile is not changed and every invalid
/// field is listed in the response.
#[utoipa::path(
    put,
    path = "/user/profile",
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Successful. Returns the updated profile.", body = Profile),
        (status = 400, description = "Request body is not valid JSON.", body = ValidationErrors),
        (status = 401, description = "Unauthorized."),
        (status = 404, description = "Profile for the current account does not exist."),
        (status = 415, description = "Content type is not JSON.", body = ValidationErrors),
        (status = 422, description = "Some profile field is invalid.", body = ValidationErrors),
        (status = 500, description = "Internal server error."),
    ),
    security(("access_token" = [])),
)]
pub async fn put_profile<S: GetProfileStore>(
    State(state): State<S>,
    Extension(account_id): Extension<AccountId>,
    Json(update): Json<ProfileUpdateJson>,
) -> Result<Json<Profile>, RouteError> {
    for field in update.unknown_fields() {
        debug!("Ignoring unknown profile field {field:?}, account: {account_id}");
    }

    let update = match update.validate() {
        Ok(update) => update,
        Err(errors) => {
            debug!(
                "Profile update rejected, account: {account_id}, invalid fields: {:?}",
                errors.fields().collect::<Vec<_>>(),
            );
            return Err(errors.into());
        }
    };

    debug!("Update profile, account: {account_id}");
    let profile = state
        .profile_store()
        .update_profile(&account_id, update)
        .await?;
    Ok(profile.into())
}

pub fn profile_router<S: StateBase + GetProfileStore + AuthResolver>(s: S) -> OpenApiRouter {
    create_open_api_router!(s, get_profile::<S>, put_profile::<S>,)
}
