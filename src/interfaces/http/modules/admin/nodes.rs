//! Node administration and label image upload

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::IntoParams;

use super::dto::{NodeDto, NodeRequest};
use crate::application::forms::node_form::INVALID_IMAGE;
use crate::domain::node::NodeFilter;
use crate::domain::DomainError;
use crate::infrastructure::MediaStore;
use crate::interfaces::http::common::{
    api_error, domain_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::state::AppState;
use crate::shared::FieldErrors;

/// Multipart field carrying the image
pub const LABEL_FIELD: &str = "label";

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct NodeListQuery {
    /// Case-insensitive substring of the slug
    pub slug: Option<String>,
}

fn invalid(errors: FieldErrors) -> ApiError {
    domain_error(DomainError::Invalid(errors))
}

/// Drop a just-stored upload that no node ended up pointing at.
async fn discard_upload(media: &MediaStore, label: &str) {
    if let Err(e) = media.remove_label(label).await {
        warn!("Failed to remove label image {}: {}", label, e);
    }
}

#[utoipa::path(
    get,
    path = "/admin/api/v1/nodes",
    tag = "Nodes",
    params(NodeListQuery),
    responses((status = 200, description = "Nodes ordered by slug", body = ApiResponse<Vec<NodeDto>>)),
    security(("bearer_auth" = []))
)]
pub async fn list_nodes(
    State(state): State<AppState>,
    Query(query): Query<NodeListQuery>,
) -> ApiResult<Vec<NodeDto>> {
    let nodes = state
        .locator
        .search_nodes(NodeFilter::from_slug_param(query.slug.as_deref()))
        .await
        .map_err(domain_error)?;
    let media_url = state.media.url_prefix();
    Ok(Json(ApiResponse::success(
        nodes.iter().map(|n| NodeDto::new(n, media_url)).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/admin/api/v1/nodes/{slug}",
    tag = "Nodes",
    params(("slug" = String, Path, description = "Node slug")),
    responses(
        (status = 200, description = "Node", body = ApiResponse<NodeDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_node(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<NodeDto> {
    let node = state.locator.node(&slug).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(NodeDto::new(
        &node,
        state.media.url_prefix(),
    ))))
}

#[utoipa::path(
    post,
    path = "/admin/api/v1/nodes",
    tag = "Nodes",
    request_body = NodeRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<NodeDto>),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_node(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<NodeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<NodeDto>>), ApiError> {
    let data = request.into_data().map_err(invalid)?;
    let node = state.locator.insert_node(data).await.map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(NodeDto::new(&node, state.media.url_prefix()))),
    ))
}

/// Full update. An omitted `label` keeps the current image.
#[utoipa::path(
    put,
    path = "/admin/api/v1/nodes/{slug}",
    tag = "Nodes",
    params(("slug" = String, Path, description = "Node slug")),
    request_body = NodeRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<NodeDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_node(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ValidatedJson(request): ValidatedJson<NodeRequest>,
) -> ApiResult<NodeDto> {
    let existing = state.locator.node(&slug).await.map_err(domain_error)?;
    let previous = existing.label.clone();
    let mut data = request.into_data().map_err(invalid)?;
    if data.label.is_none() {
        data.label = previous.clone();
    }
    let node = state
        .locator
        .replace_node(existing, data)
        .await
        .map_err(domain_error)?;
    if previous != node.label {
        state.release_label(previous.as_deref()).await;
    }
    Ok(Json(ApiResponse::success(NodeDto::new(
        &node,
        state.media.url_prefix(),
    ))))
}

#[utoipa::path(
    delete,
    path = "/admin/api/v1/nodes/{slug}",
    tag = "Nodes",
    params(("slug" = String, Path, description = "Node slug")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_node(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<EmptyData> {
    let node = state.locator.delete_node(&slug).await.map_err(domain_error)?;
    state.release_label(node.label.as_deref()).await;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Upload a label image as multipart field `label`. The previous image is
/// removed once no node points at it.
#[utoipa::path(
    post,
    path = "/admin/api/v1/nodes/{slug}/label",
    tag = "Nodes",
    params(("slug" = String, Path, description = "Node slug")),
    request_body(content_type = "multipart/form-data", description = "Image file in field `label`"),
    responses(
        (status = 200, description = "Label stored", body = ApiResponse<NodeDto>),
        (status = 404, description = "Not found"),
        (status = 413, description = "Image too large"),
        (status = 422, description = "Missing or unsupported image")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_label(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<NodeDto> {
    let node = state.locator.node(&slug).await.map_err(domain_error)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(e.status(), e.body_text()))?
    {
        if field.name() != Some(LABEL_FIELD) {
            continue;
        }
        let extension = field.file_name().and_then(MediaStore::image_extension);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| api_error(e.status(), e.body_text()))?;
        upload = Some((extension, bytes));
        break;
    }

    let (extension, bytes) = match upload {
        Some((Some(ext), bytes)) if !bytes.is_empty() => (ext, bytes),
        _ => return Err(invalid(FieldErrors::single(LABEL_FIELD, INVALID_IMAGE))),
    };

    let relative = state
        .media
        .save_label(&extension, &bytes)
        .await
        .map_err(|e| domain_error(DomainError::Storage(e.to_string())))?;

    let updated = match state.locator.set_node_label(&slug, Some(relative.clone())).await {
        Ok(node) => node,
        Err(e) => {
            discard_upload(&state.media, &relative).await;
            return Err(domain_error(e));
        }
    };
    state.release_label(node.label.as_deref()).await;
    info!(slug = %updated.slug, label = %relative, "Node label replaced");

    Ok(Json(ApiResponse::success(NodeDto::new(
        &updated,
        state.media.url_prefix(),
    ))))
}

#[utoipa::path(
    delete,
    path = "/admin/api/v1/nodes/{slug}/label",
    tag = "Nodes",
    params(("slug" = String, Path, description = "Node slug")),
    responses(
        (status = 200, description = "Label cleared", body = ApiResponse<NodeDto>),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_label(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<NodeDto> {
    let node = state.locator.node(&slug).await.map_err(domain_error)?;
    let updated = state
        .locator
        .set_node_label(&slug, None)
        .await
        .map_err(domain_error)?;
    state.release_label(node.label.as_deref()).await;
    Ok(Json(ApiResponse::success(NodeDto::new(
        &updated,
        state.media.url_prefix(),
    ))))
}
