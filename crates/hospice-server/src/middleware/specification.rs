//! OpenAPI document and Scalar UI.
//!
//! The document is generated from the [`ApiRouter`] routes and their
//! `*_docs` functions, then served as JSON next to the Scalar reference UI.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, OpenApi, Tag};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Where the OpenAPI document and the Scalar UI are served.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path of the OpenAPI JSON document.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/api/openapi.json")
    )]
    pub open_api_json: String,

    /// Path of the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/api/scalar")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/api/openapi.json".to_owned(),
            scalar_ui: "/api/scalar".to_owned(),
        }
    }
}

impl OpenApiConfig {
    /// Checks that both paths are absolute and distinct.
    pub fn validate(&self) -> anyhow::Result<()> {
        for path in [&self.open_api_json, &self.scalar_ui] {
            if !path.starts_with('/') {
                anyhow::bail!("documentation path '{path}' must start with '/'");
            }
        }

        if self.open_api_json == self.scalar_ui {
            anyhow::bail!("OpenAPI JSON and Scalar UI paths must differ");
        }

        Ok(())
    }
}

/// Tags in display order, with their descriptions.
const TAGS: &[(&str, &str)] = &[
    ("Authentication", "Sign-in, sign-out and the post-login redirect"),
    ("Invitations", "Facility, team and family invitations"),
    ("Accounts", "The caller's account and password"),
    ("Onboarding", "First-login facility setup"),
    ("Admin", "Platform administration for super admins"),
    ("Agencies", "Agency profiles"),
    ("Members", "Agency staff and admins"),
    ("Patients", "Patients and their family links"),
    ("Messages", "Direct messages about a patient"),
    ("Threads", "Multi-participant conversations"),
    ("Visits", "Scheduled care visits"),
    ("Supplies", "Supply catalog and requests"),
    ("Deliveries", "Tracked supply deliveries"),
    ("Notifications", "The caller's notification inbox"),
    ("Dashboards", "Compliance and analytics reports"),
    ("Audit Logs", "Administrative actions per agency"),
    ("Webhooks", "Inbound event notifications"),
    ("Health", "Service health"),
];

fn api_info() -> Info {
    Info {
        title: "Hospice Portal API".to_owned(),
        summary: Some("Family communication portal for hospice agencies".to_owned()),
        description: Some(
            "Connects hospice staff with the families of their patients: invitations, \
             messaging, visit schedules, supply requests, tracked deliveries and \
             notifications, isolated per agency."
                .to_owned(),
        ),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        ..Info::default()
    }
}

/// Extension trait for [`ApiRouter`] to serve its OpenAPI document.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    /// Finishes the document and adds the JSON and Scalar routes.
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info: api_info(),
            tags: TAGS
                .iter()
                .map(|(name, description)| Tag {
                    name: (*name).to_owned(),
                    description: Some((*description).to_owned()),
                    ..Tag::default()
                })
                .collect(),
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}

#[cfg(test)]
mod tests {
    use aide::axum::routing::get_with;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use super::*;

    async fn ping() -> &'static str {
        "pong"
    }

    #[tokio::test]
    async fn serves_generated_document() -> anyhow::Result<()> {
        let router: Router = ApiRouter::new()
            .api_route("/ping", get_with(ping, |op| op.summary("Ping")))
            .with_open_api(&OpenApiConfig::default());
        let server = TestServer::new(router)?;

        let response = server.get("/api/openapi.json").await;
        response.assert_status(StatusCode::OK);

        let document: serde_json::Value = response.json();
        assert_eq!(document["info"]["title"], "Hospice Portal API");
        assert!(document["paths"]["/ping"].is_object());
        Ok(())
    }

    #[test]
    fn paths_must_differ() {
        let config = OpenApiConfig {
            open_api_json: "/api/docs".to_owned(),
            scalar_ui: "/api/docs".to_owned(),
        };
        assert!(config.validate().is_err());
    }
}
