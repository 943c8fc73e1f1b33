//! Screen handlers
//!
//! Each handler resolves its data through [`LocatorService`] or
//! [`AccountService`] and renders a [`Page`]. Gated screens answer 403 to
//! anonymous visitors and to users without the model permission.
//!
//! [`LocatorService`]: crate::application::LocatorService
//! [`AccountService`]: crate::application::AccountService

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::submission::{LabelUpload, NodeSubmission};
use crate::application::forms::node_form::INVALID_IMAGE;
use crate::application::{LoginForm, NodeForm};
use crate::domain::node::{Node, NodeFilter};
use crate::domain::user::Permission;
use crate::domain::DomainError;
use crate::interfaces::http::middleware::{CurrentUser, SESSION_COOKIE};
use crate::infrastructure::MediaStore;
use crate::interfaces::http::state::AppState;
use crate::interfaces::http::views::{
    templates, Chrome, NodeItem, Page, RoomItem, ScreenError, ScreenResult, SubstationItem,
};
use crate::shared::FieldErrors;

pub const HOME_TITLE: &str = "Гoлoвна";
pub const ADD_NODE_TITLE: &str = "Сторінка форми";
pub const EDIT_NODE_TITLE: &str = "Сторінка редагування";
pub const SEARCH_TITLE: &str = "Сторінка пошуку";
pub const LOGIN_TITLE: &str = "Вхід у застосунок";
pub const DELETE_CONFIRM_TITLE: &str = "Обладнання видалено";

pub const DELETE_CONFIRM_PATH: &str = "/node_delete_confirm/";
pub const LOGIN_PATH: &str = "/login/";

/// Bound values plus messages, as a form appears in page contexts
#[derive(Serialize)]
struct FormContext<'a, T: Serialize> {
    values: &'a T,
    errors: &'a FieldErrors,
}

/// `302 Found` to a local path
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

async fn chrome(state: &AppState, current: &CurrentUser) -> ScreenResult<Chrome> {
    let menu = state
        .locator
        .substations()
        .await?
        .iter()
        .map(SubstationItem::from)
        .collect();
    Ok(Chrome {
        menu,
        username: current.username(),
    })
}

// ── Browsing ────────────────────────────────────────────────────

pub async fn home(State(state): State<AppState>, current: CurrentUser) -> ScreenResult<Page> {
    let chrome = chrome(&state, &current).await?;
    let substations = chrome.menu.clone();
    let body = templates::substations(&substations);
    Ok(Page::new("locator/base.html", HOME_TITLE, chrome)
        .with("substations", substations)
        .body(body))
}

pub async fn substation_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> ScreenResult<Page> {
    let id: i32 = id.parse().map_err(|_| ScreenError::NotFound)?;
    let (substation, rooms) = state.locator.substation_rooms(id).await?;
    let rooms: Vec<RoomItem> = rooms.iter().map(RoomItem::from).collect();

    let body = templates::rooms(&rooms);
    Ok(
        Page::new("locator/mcc.html", substation.to_string(), chrome(&state, &current).await?)
            .with("rooms", rooms)
            .body(body),
    )
}

pub async fn mcc_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ScreenResult<Page> {
    let (mcc, nodes) = state.locator.mcc_nodes(&slug).await?;
    let nodes = NodeItem::list(&nodes, state.media.url_prefix());

    let body = templates::nodes(&nodes);
    Ok(
        Page::new("locator/nodes.html", mcc.screen_title(), chrome(&state, &current).await?)
            .with("nodes", nodes)
            .body(body),
    )
}

pub async fn node_detail(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ScreenResult<Page> {
    let node = state.locator.node(&slug).await?;
    let item = NodeItem::new(&node, state.media.url_prefix());

    let body = templates::node(&item);
    Ok(
        Page::new("locator/node.html", node.to_string(), chrome(&state, &current).await?)
            .with("node", item)
            .body(body),
    )
}

// ── Node maintenance ────────────────────────────────────────────

async fn node_form_page(
    state: &AppState,
    current: &CurrentUser,
    title: &str,
    action: &str,
    form: &NodeForm,
    errors: &FieldErrors,
) -> ScreenResult<Page> {
    let mccs: Vec<RoomItem> = state.locator.mccs().await?.iter().map(RoomItem::from).collect();
    let body = templates::node_form(action, form, errors, &mccs);
    Ok(Page::new("locator/add_node.html", title, chrome(state, current).await?)
        .with("form", FormContext { values: form, errors })
        .with("mccs", mccs)
        .body(body))
}

pub async fn add_node_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ScreenResult<Page> {
    current.require(Permission::ADD_NODE)?;
    node_form_page(
        &state,
        &current,
        ADD_NODE_TITLE,
        "/add_node/",
        &NodeForm::default(),
        &FieldErrors::new(),
    )
    .await
}

pub async fn add_node_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    submission: NodeSubmission,
) -> ScreenResult<Response> {
    current.require(Permission::ADD_NODE)?;
    save_node_form(&state, &current, ADD_NODE_TITLE, "/add_node/", None, submission).await
}

pub async fn edit_node_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ScreenResult<Page> {
    current.require(Permission::CHANGE_NODE)?;
    let node = state.locator.node(&slug).await?;
    let action = format!("/edit/{}/", node.slug);
    node_form_page(
        &state,
        &current,
        EDIT_NODE_TITLE,
        &action,
        &NodeForm::from_node(&node),
        &FieldErrors::new(),
    )
    .await
}

pub async fn edit_node_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
    submission: NodeSubmission,
) -> ScreenResult<Response> {
    current.require(Permission::CHANGE_NODE)?;
    let node = state.locator.node(&slug).await?;
    let action = format!("/edit/{}/", node.slug);
    save_node_form(&state, &current, EDIT_NODE_TITLE, &action, Some(node), submission).await
}

/// Write an uploaded image under `photos/`. `None` when the file is not an
/// accepted image.
async fn store_upload(state: &AppState, upload: &LabelUpload) -> ScreenResult<Option<String>> {
    let extension = match MediaStore::image_extension(&upload.file_name) {
        Some(ext) if !upload.bytes.is_empty() => ext,
        _ => return Ok(None),
    };
    let path = state
        .media
        .save_label(&extension, &upload.bytes)
        .await
        .map_err(|e| ScreenError::Internal(e.to_string()))?;
    Ok(Some(path))
}

/// Create (`existing == None`) or update a node from a submission. Field
/// problems re-render the form; an image that no node ends up showing is
/// removed.
async fn save_node_form(
    state: &AppState,
    current: &CurrentUser,
    title: &str,
    action: &str,
    existing: Option<Node>,
    submission: NodeSubmission,
) -> ScreenResult<Response> {
    let NodeSubmission { mut form, upload } = submission;
    let previous = existing.as_ref().and_then(|n| n.label.clone());

    // re-rendered forms show the image the node currently has
    let redisplay = |form: &NodeForm| NodeForm {
        label: previous.clone().unwrap_or_default(),
        ..form.clone()
    };

    let stored = match &upload {
        None => None,
        Some(upload) => match store_upload(state, upload).await? {
            Some(path) => Some(path),
            None => {
                let mut errors = form.clean().err().unwrap_or_default();
                errors.add("label", INVALID_IMAGE);
                return Ok(node_form_page(state, current, title, action, &redisplay(&form), &errors)
                    .await?
                    .into_response());
            }
        },
    };
    form.label = stored.clone().unwrap_or_default();

    let result = match &existing {
        Some(node) => state.locator.update_node(&node.slug, &form).await,
        None => state.locator.create_node(&form).await,
    };
    match result {
        Ok(node) => {
            if previous != node.label {
                state.release_label(previous.as_deref()).await;
            }
            Ok(found("/"))
        }
        Err(e) => {
            state.release_label(stored.as_deref()).await;
            match e {
                DomainError::Invalid(errors) => Ok(node_form_page(
                    state,
                    current,
                    title,
                    action,
                    &redisplay(&form),
                    &errors,
                )
                .await?
                .into_response()),
                e => Err(e.into()),
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SearchParams {
    #[serde(default)]
    pub slug: Option<String>,
}

pub async fn search_nodes(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<SearchParams>,
) -> ScreenResult<Page> {
    current.require(Permission::VIEW_NODE)?;
    let filter = NodeFilter::from_slug_param(params.slug.as_deref());
    let nodes = state.locator.search_nodes(filter).await?;
    let items = NodeItem::list(&nodes, state.media.url_prefix());

    let slug = params.slug.clone().unwrap_or_default();
    let body = templates::search(&slug, &items);
    Ok(Page::new("locator/search_node.html", SEARCH_TITLE, chrome(&state, &current).await?)
        .with("node", items)
        .with("form", SearchParams { slug: Some(slug) })
        .body(body))
}

pub async fn delete_node_page(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(slug): Path<String>,
) -> ScreenResult<Page> {
    let node = state.locator.node(&slug).await?;
    let item = NodeItem::new(&node, state.media.url_prefix());

    let body = templates::delete_node(&item);
    Ok(
        Page::new("locator/delete_node.html", node.to_string(), chrome(&state, &current).await?)
            .with("node_instance", item)
            .body(body),
    )
}

pub async fn delete_node_submit(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ScreenResult<Response> {
    let node = state.locator.delete_node(&slug).await?;
    state.release_label(node.label.as_deref()).await;
    Ok(found(DELETE_CONFIRM_PATH))
}

pub async fn node_delete_confirm(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ScreenResult<Page> {
    Ok(
        Page::new(
            "locator/node_confirm_delete.html",
            DELETE_CONFIRM_TITLE,
            chrome(&state, &current).await?,
        )
        .body(templates::node_deleted()),
    )
}

// ── Sign in / out ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

async fn login_page(
    state: &AppState,
    current: &CurrentUser,
    form: &LoginForm,
    errors: &FieldErrors,
) -> ScreenResult<Page> {
    let body = templates::login(form, errors);
    Ok(Page::new("locator/login.html", LOGIN_TITLE, chrome(state, current).await?)
        .with("form", FormContext { values: form, errors })
        .body(body))
}

pub async fn login_form(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<LoginQuery>,
) -> ScreenResult<Page> {
    let form = LoginForm {
        next: query.next,
        ..Default::default()
    };
    login_page(&state, &current, &form, &FieldErrors::new()).await
}

pub async fn login_submit(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ScreenResult<Response> {
    let (username, password) = match form.clean() {
        Ok(creds) => creds,
        Err(errors) => {
            return Ok(login_page(&state, &current, &form, &errors)
                .await?
                .into_response())
        }
    };

    match state.accounts.login(username, password).await {
        Ok(session) => {
            let cookie = Cookie::build((SESSION_COOKIE, session.token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.settings.cookie_secure);
            Ok((jar.add(cookie), found(&form.redirect_target())).into_response())
        }
        Err(DomainError::Invalid(errors)) => {
            info!(username, "Rejected sign-in");
            Ok(login_page(&state, &current, &form, &errors)
                .await?
                .into_response())
        }
        Err(e) => Err(ScreenError::from(e)),
    }
}

/// Expires the session cookie. The JWT itself stays valid until its expiry.
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/"));
    (jar, found(LOGIN_PATH)).into_response()
}
