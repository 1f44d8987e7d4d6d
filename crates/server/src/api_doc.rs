use server_api::ApiDocProfile;
use utoipa::OpenApi;

use crate::app::AppState;

#[derive(OpenApi)]
#[openapi(info(
    title = "profile-backend",
    description = "User profile API",
    version = "0.1.0",
))]
pub struct ApiDoc;

impl ApiDoc {
    pub fn all() -> utoipa::openapi::OpenApi {
        let mut doc = ApiDoc::openapi();
        doc.merge(ApiDocProfile::openapi());
        doc.merge(
            server_api::profile::profile_router(AppState::default())
                .into_openapi()
                .tag_routes("profile"),
        );
        doc
    }

    pub fn open_api_json_string() -> Result<String, serde_json::Error> {
        Self::all().to_pretty_json()
    }
}

trait OpenApiExtensions: Sized {
    fn tag_routes(self, tag: &str) -> Self;
}

impl OpenApiExtensions for utoipa::openapi::OpenApi {
    fn tag_routes(mut self, tag: &str) -> Self {
        let handle_operation = |operation: Option<&mut utoipa::openapi::path::Operation>| {
            if let Some(operation) = operation {
                operation.tags = Some(vec![tag.to_string()]);
            }
        };

        for (_, item) in self.paths.paths.iter_mut() {
            handle_operation(item.get.as_mut());
            handle_operation(item.put.as_mut());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::ApiDoc;

    #[test]
    fn api_doc_contains_profile_routes_and_security() {
        let json = ApiDoc::open_api_json_string().unwrap();
        let json: Value = serde_json::from_str(&json).unwrap();
        let path = &json["paths"]["/user/profile"];
        assert!(path.get("get").is_some());
        assert!(path.get("put").is_some());
        assert_eq!(path["put"]["tags"][0], "profile");
        let components = &json["components"];
        assert!(components["schemas"].get("ValidationErrors").is_some());
        assert!(components["securitySchemes"].get("access_token").is_some());
    }
}
