use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Extension, Path,
        multipart::{Multipart, MultipartRejection},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use headers::{ContentType, HeaderMapExt};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::errors::ApiError;
use crate::storage::{FileData, Storage, StorageError};

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone)]
pub struct PublicLinks {
    base: Arc<str>,
}

impl PublicLinks {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').into(),
        }
    }

    pub fn upload_url(&self, name: &str) -> String {
        format!("{}/uploads/{name}", self.base)
    }
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    msg: &'static str,
    total: usize,
    images: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ImageList {
    total: usize,
    images: Vec<String>,
}

pub fn router(storage: Arc<dyn Storage>, links: PublicLinks, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(storage.root());

    Router::new()
        .route("/", get(hello))
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/image/{filename}", get(get_image))
        .route("/images", get(list_images))
        .nest_service("/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(storage))
                .layer(Extension(links)),
        )
}

async fn hello() -> &'static str {
    "Hello World!"
}

async fn upload(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(links): Extension<PublicLinks>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // A body that is not multipart at all carries no files.
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "Upload without a multipart body");
        ApiError::NoFileUploaded
    })?;

    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        // Plain form fields are not files.
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let size = data.len();

        let name = storage
            .save(FileData {
                bytes: data.to_vec(),
                filename,
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to store upload");
                ApiError::BadRequest(e.to_string())
            })?;

        tracing::info!(name = %name, size, "Stored upload");
        images.push(links.upload_url(&name));
    }

    if images.is_empty() {
        return Err(ApiError::NoFileUploaded);
    }

    Ok(Json(UploadResponse {
        msg: "File(s) uploaded successfully",
        total: images.len(),
        images,
    }))
}

async fn get_image(
    Path(filename): Path<String>,
    Extension(storage): Extension<Arc<dyn Storage>>,
) -> Result<Response, ApiError> {
    let file = match storage.get(&filename).await {
        Ok(file) => file,
        Err(StorageError::NotFound | StorageError::InvalidName(_)) => {
            return Err(ApiError::ImageNotFound);
        }
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "Failed to read stored file");
            return Err(ApiError::Internal);
        }
    };

    let mut response = Bytes::from(file.bytes).into_response();
    response
        .headers_mut()
        .typed_insert(ContentType::from(file.content_type));

    Ok(response)
}

async fn list_images(
    Extension(storage): Extension<Arc<dyn Storage>>,
    Extension(links): Extension<PublicLinks>,
) -> Result<Json<ImageList>, ApiError> {
    let names = storage.list().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to scan upload directory");
        ApiError::ScanFailed
    })?;

    let images: Vec<String> = names
        .iter()
        .filter(|name| is_image_name(name))
        .map(|name| links.upload_url(name))
        .collect();

    Ok(Json(ImageList {
        total: images.len(),
        images,
    }))
}

fn is_image_name(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}
