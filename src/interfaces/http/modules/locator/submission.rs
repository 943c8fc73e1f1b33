//! Node form submissions
//!
//! The add/edit screens post `multipart/form-data` so the label image
//! travels with the other fields. Urlencoded posts are accepted as well and
//! carry no image.

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Form;

use crate::application::NodeForm;

/// File input of the node form
pub const LABEL_FILE_FIELD: &str = "label";

#[derive(Debug)]
pub struct LabelUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Bound node form plus the image, if one was chosen.
#[derive(Debug)]
pub struct NodeSubmission {
    pub form: NodeForm,
    pub upload: Option<LabelUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for NodeSubmission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Form(form) = Form::<NodeForm>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self { form, upload: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let mut form = NodeForm::default();
        let mut upload = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == LABEL_FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                // an empty part means no file was chosen
                if !file_name.is_empty() || !bytes.is_empty() {
                    upload = Some(LabelUpload { file_name, bytes });
                }
                continue;
            }
            let value = field.text().await.map_err(IntoResponse::into_response)?;
            form.set(&name, value);
        }

        Ok(Self { form, upload })
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    use super::*;

    const BOUNDARY: &str = "node-form";

    fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> Request {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            let disposition = match file_name {
                Some(f) => format!("form-data; name=\"{}\"; filename=\"{}\"", name, f),
                None => format!("form-data; name=\"{}\"", name),
            };
            body.extend_from_slice(
                format!("--{}\r\nContent-Disposition: {}\r\n\r\n", BOUNDARY, disposition)
                    .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        HttpRequest::builder()
            .method("POST")
            .uri("/add_node/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn multipart_binds_fields_and_image() {
        let req = multipart(&[
            ("title", None, b"Pump"),
            ("round_per_minute", None, b"1000"),
            ("label", Some("pump.png"), b"img"),
        ]);
        let submission = NodeSubmission::from_request(req, &()).await.unwrap();
        assert_eq!(submission.form.title, "Pump");
        assert_eq!(submission.form.round_per_minute, "1000");
        let upload = submission.upload.unwrap();
        assert_eq!(upload.file_name, "pump.png");
        assert_eq!(&upload.bytes[..], b"img");
    }

    #[tokio::test]
    async fn empty_file_part_is_no_upload() {
        let req = multipart(&[("title", None, b"Pump"), ("label", Some(""), b"")]);
        let submission = NodeSubmission::from_request(req, &()).await.unwrap();
        assert!(submission.upload.is_none());
    }

    #[tokio::test]
    async fn urlencoded_ignores_label_path() {
        let req = HttpRequest::builder()
            .method("POST")
            .uri("/add_node/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Pump&label=photos%2Fother.png"))
            .unwrap();
        let submission = NodeSubmission::from_request(req, &()).await.unwrap();
        assert_eq!(submission.form.title, "Pump");
        assert!(submission.form.label.is_empty());
        assert!(submission.upload.is_none());
    }
}
