//! Shared harness for HTTP integration tests: an in-memory database, a
//! temporary media root and helpers for driving the router.

#![allow(dead_code)]

use std::collections::BTreeSet;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use locator::config::AppConfig;
use locator::domain::choices::{Level, MccName, SubstationName};
use locator::domain::user::Permission;
use locator::domain::{
    MotorControlCenter, NewMotorControlCenter, NewSubstation, Node, NodeData, Substation,
};
use locator::interfaces::http::views::RenderedPage;
use locator::server::build_state;
use locator::{create_router, init_database, run_migrations, AppState, DatabaseConfig};

pub const PASSWORD: &str = "password";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: TempDir,
}

pub struct Seeded {
    pub substation: Substation,
    pub mcc: MotorControlCenter,
    pub node: Node,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();

        let media = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 4;
        config.security.jwt_secret = "test-secret".into();
        config.media.root = media.path().to_path_buf();

        let state = build_state(db, &config);
        let router = create_router(state.clone(), None);
        Self {
            router,
            state,
            media,
        }
    }

    /// `РП-4` (4.8) → `MCC-1` → node `1_1`.
    pub async fn seed(&self) -> Seeded {
        let locator = &self.state.locator;
        let substation = locator
            .create_substation(NewSubstation {
                name: SubstationName::Rp4,
                slug: "rp-4".into(),
                level: Level::L48,
            })
            .await
            .unwrap();
        let mcc = locator
            .create_mcc(NewMotorControlCenter {
                name: MccName::Mcc1,
                substation_id: substation.id,
            })
            .await
            .unwrap();
        let node = self.add_node(&mcc, "Node 1", "1_1").await;
        Seeded {
            substation,
            mcc,
            node,
        }
    }

    pub async fn add_node(&self, mcc: &MotorControlCenter, title: &str, slug: &str) -> Node {
        self.add_node_with_label(mcc, title, slug, None).await
    }

    pub async fn add_node_with_label(
        &self,
        mcc: &MotorControlCenter,
        title: &str,
        slug: &str,
        label: Option<&str>,
    ) -> Node {
        self.state
            .locator
            .insert_node(NodeData {
                title: title.into(),
                slug: slug.into(),
                label: label.map(str::to_string),
                level: Level::L48,
                round_per_minute: 1000,
                power: Decimal::new(75, 1),
                mcc_id: mcc.id,
            })
            .await
            .unwrap()
    }

    /// Create an account and return a session token for it.
    pub async fn login_as(
        &self,
        username: &str,
        permissions: &[Permission],
        is_staff: bool,
        is_superuser: bool,
    ) -> String {
        self.state
            .accounts
            .create_user(
                username,
                PASSWORD,
                is_staff,
                is_superuser,
                permissions.iter().copied().collect::<BTreeSet<_>>(),
            )
            .await
            .unwrap();
        self.state
            .accounts
            .login(username, PASSWORD)
            .await
            .unwrap()
            .token
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Screen request; the session travels in the cookie.
    pub async fn get(&self, uri: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("sessionid={}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, session: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("sessionid={}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// `fields` plus an optional `(field, filename, bytes)` file part.
    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
        session: Option<&str>,
    ) -> Response<Body> {
        let (content_type, body) = multipart_body(fields, file);
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("sessionid={}", token));
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// Write a file under the media root, e.g. `photos/pump.png`.
    pub fn write_media(&self, relative: &str, bytes: &[u8]) {
        let path = self.media.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, bytes).unwrap();
    }

    pub fn media_exists(&self, relative: &str) -> bool {
        self.media.path().join(relative).exists()
    }

    /// API request; the session travels as a bearer token.
    pub async fn api(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).unwrap())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }
}

/// Returns the Content-Type header value and the encoded body.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> (String, Vec<u8>) {
    let boundary = "locator-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                boundary, name, filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}

pub fn page(response: &Response<Body>) -> RenderedPage {
    response
        .extensions()
        .get::<RenderedPage>()
        .cloned()
        .expect("response carries a rendered page")
}

pub fn location(response: &Response<Body>) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status");
}
