//! OpenAPI document for the back-office API

use axum::Json;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::common::{ApiResponse, EmptyData};
use super::modules::admin::{self, mccs, nodes, substations, users};
use super::modules::{auth, health};

pub const OPENAPI_PATH: &str = "/admin/api-doc/openapi.json";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token from /admin/api/v1/auth/login; the sessionid cookie is accepted too",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        substations::list_substations,
        substations::get_substation,
        substations::create_substation,
        substations::update_substation,
        substations::delete_substation,
        mccs::list_mccs,
        mccs::get_mcc,
        mccs::create_mcc,
        mccs::update_mcc,
        mccs::delete_mcc,
        nodes::list_nodes,
        nodes::get_node,
        nodes::create_node,
        nodes::update_node,
        nodes::delete_node,
        nodes::upload_label,
        nodes::clear_label,
        users::list_users,
        users::create_user,
        users::set_permissions,
    ),
    components(
        schemas(
            ApiResponse<String>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            admin::SubstationDto,
            admin::SubstationRequest,
            admin::MccDto,
            admin::MccRequest,
            admin::NodeDto,
            admin::NodeRequest,
            admin::CreateUserRequest,
            admin::PermissionsRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Back-office token login"),
        (name = "Substations", description = "Distributive substations"),
        (name = "Motor Control Centers", description = "MCC rooms fed by a substation"),
        (name = "Nodes", description = "Equipment units and their label images"),
        (name = "Users", description = "Accounts and model permissions"),
    ),
    info(
        title = "Equipment Locator Back Office API",
        version = "1.0.0",
        description = "Maintenance API for the substation / MCC / node registry"
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
