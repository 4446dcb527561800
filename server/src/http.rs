use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::io;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use url::form_urlencoded;

use crate::board::categories;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::task::{Category, NewTask, Status, TaskPatch};

#[derive(Debug, Deserialize)]
struct MoveTask {
    status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self> {
        Ok(Self {
            status,
            body: serde_json::to_string(value)?,
        })
    }

    fn no_content() -> Self {
        Self {
            status: StatusCode(204),
            body: String::new(),
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            body: serde_json::json!({ "error": err.to_string() }).to_string(),
        }
    }

    fn into_response(self) -> Response<io::Cursor<Vec<u8>>> {
        let response = Response::from_string(self.body).with_status_code(self.status);
        match Header::from_bytes("Content-Type", "application/json") {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

/// Routes one API request. Failures become a JSON `{"error": ...}` body
/// with the status matching the error kind.
pub fn handle(store: &TaskStore, method: &Method, url: &str, body: &str) -> ApiResponse {
    match route(store, method, url, body) {
        Ok(response) => response,
        Err(err) => {
            match &err {
                Error::Io(_) => tracing::error!(%method, url, error = %err, "request failed"),
                _ => tracing::debug!(%method, url, error = %err, "request rejected"),
            }
            ApiResponse::error(&err)
        }
    }
}

fn route(store: &TaskStore, method: &Method, url: &str, body: &str) -> Result<ApiResponse> {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    match (method, path) {
        (Method::Get, "/api/tasks") => {
            let category = category_param(query)?;
            ApiResponse::json(StatusCode(200), &store.list_by_category(category))
        }
        (Method::Post, "/api/tasks") => {
            let new_task: NewTask = serde_json::from_str(body)?;
            ApiResponse::json(StatusCode(201), &store.create(new_task)?)
        }
        (Method::Get, "/api/board") => {
            let category = category_param(query)?;
            let payload = serde_json::json!({ "columns": store.board(category) });
            ApiResponse::json(StatusCode(200), &payload)
        }
        (Method::Get, "/api/categories") => ApiResponse::json(StatusCode(200), &categories()),
        _ => {
            let Some(rest) = path.strip_prefix("/api/tasks/") else {
                return Err(Error::NotFound(path.to_string()));
            };
            let parts: Vec<&str> = rest.split('/').collect();
            let id = decode_segment(parts.first().copied().unwrap_or(""));
            if id.is_empty() {
                return Err(Error::NotFound(path.to_string()));
            }
            match (method, parts.as_slice()) {
                (Method::Get, [_]) => ApiResponse::json(StatusCode(200), &store.get(&id)?),
                (Method::Put, [_]) | (Method::Patch, [_]) => {
                    let patch: TaskPatch = serde_json::from_str(body)?;
                    ApiResponse::json(StatusCode(200), &store.update(&id, patch)?)
                }
                (Method::Delete, [_]) => {
                    store.delete(&id)?;
                    Ok(ApiResponse::no_content())
                }
                (Method::Post, [_, "move"]) => {
                    let move_req: MoveTask = serde_json::from_str(body)?;
                    ApiResponse::json(StatusCode(200), &store.move_task(&id, move_req.status)?)
                }
                _ => Err(Error::NotFound(path.to_string())),
            }
        }
    }
}

fn category_param(query: &str) -> Result<Option<Category>> {
    let Some((_, value)) = form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == "category")
    else {
        return Ok(None);
    };
    if value.is_empty() || value == "all" {
        return Ok(None);
    }
    value.parse().map(Some)
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}

/// Blocking accept loop; requests are handled one at a time.
pub fn serve(config: &Config) -> io::Result<()> {
    let store = TaskStore::new(config.tasks_path.clone(), config.utc_offset);
    let server = Server::http((config.host.as_str(), config.port))
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    tracing::info!(
        url = %config.url(),
        tasks_file = %config.tasks_path.display(),
        "kanban server running"
    );

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = if url.starts_with("/api/") {
            let mut body = String::new();
            match request.as_reader().read_to_string(&mut body) {
                Ok(_) => handle(&store, &method, &url, &body),
                Err(err) => ApiResponse::error(&Error::Io(err)),
            }
        } else {
            ApiResponse::error(&Error::NotFound(url.clone()))
        };

        tracing::info!(%method, url = %url, status = response.status.0, "request");
        if let Err(err) = request.respond(response.into_response()) {
            tracing::warn!(error = %err, "failed to send response");
        }
    }

    Ok(())
}
