use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Summary returned after storing a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocInfo {
    pub id: Uuid,
    pub content_type: String,
    pub length: usize,
}

#[derive(Clone, Debug)]
pub struct Doc {
    pub content_type: String,
    pub content: Bytes,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Doc>>>;

const OCTET_STREAM: &str = "application/octet-stream";

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route(
            "/status",
            get(status).options(|| async { allow("GET, HEAD, OPTIONS") }),
        )
        .route(
            "/echo",
            post(echo)
                .put(echo)
                .options(|| async { allow("POST, PUT, OPTIONS") }),
        )
        .route(
            "/docs",
            post(create_doc).options(|| async { allow("POST, OPTIONS") }),
        )
        .route(
            "/docs/{id}",
            get(get_doc)
                .put(replace_doc)
                .delete(delete_doc)
                .options(|| async { allow("GET, HEAD, PUT, DELETE, OPTIONS") }),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn allow(methods: &'static str) -> (StatusCode, [(header::HeaderName, &'static str); 1]) {
    (StatusCode::NO_CONTENT, [(header::ALLOW, methods)])
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

// `get` also answers HEAD; axum drops the body and keeps the headers.
async fn status() -> &'static str {
    "ok"
}

async fn echo(headers: HeaderMap, body: Bytes) -> ([(header::HeaderName, HeaderValue); 1], Bytes) {
    let ct = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));
    ([(header::CONTENT_TYPE, ct)], body)
}

async fn create_doc(
    State(db): State<Db>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<DocInfo>) {
    let info = DocInfo {
        id: Uuid::new_v4(),
        content_type: content_type(&headers),
        length: body.len(),
    };
    debug!("storing doc {} ({} bytes)", info.id, info.length);
    db.write().await.insert(
        info.id,
        Doc {
            content_type: info.content_type.clone(),
            content: body,
        },
    );
    (StatusCode::CREATED, Json(info))
}

async fn get_doc(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<([(header::HeaderName, String); 1], Bytes), StatusCode> {
    let docs = db.read().await;
    let doc = docs.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, doc.content_type.clone())], doc.content.clone()))
}

async fn replace_doc(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DocInfo>, StatusCode> {
    let mut docs = db.write().await;
    let doc = docs.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    doc.content_type = content_type(&headers);
    doc.content = body;
    Ok(Json(DocInfo {
        id,
        content_type: doc.content_type.clone(),
        length: doc.content.len(),
    }))
}

async fn delete_doc(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut docs = db.write().await;
    debug!("deleting doc {id}");
    docs.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_info_serializes_to_json() {
        let info = DocInfo {
            id: Uuid::nil(),
            content_type: "text/plain".to_string(),
            length: 3,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["content_type"], "text/plain");
        assert_eq!(json["length"], 3);
    }

    #[test]
    fn content_type_defaults_to_octet_stream() {
        assert_eq!(content_type(&HeaderMap::new()), OCTET_STREAM);
    }

    #[test]
    fn content_type_is_read_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"));
        assert_eq!(content_type(&headers), "text/csv");
    }
}
