// ABOUTME: HTTP boundary for the finance-deck application
// ABOUTME: Accepts topic requests as JSON, produces decks and serves the generated files

use crate::errors::{DeckError, ErrorKind, Result};
use crate::model::TopicRequest;
use crate::pipeline::DeckPipeline;
use log::{debug, error, info};
use serde::Serialize;
use std::fs;
use std::io::Read;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

const MAX_BODY_BYTES: u64 = 64 * 1024;
const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// A response ready to be sent, kept independent of the socket so routing can
/// be exercised directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub attachment: Option<String>,
}

impl ApiResponse {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{}".to_vec());
        Self {
            status,
            content_type: "application/json",
            body,
            attachment: None,
        }
    }

    fn text(status: u16, text: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: text.as_bytes().to_vec(),
            attachment: None,
        }
    }

    fn error(err: &DeckError) -> Self {
        Self::json(
            status_for(err.kind()),
            &ErrorBody {
                kind: err.kind().as_str(),
                message: err.to_string(),
            },
        )
    }

    fn not_found() -> Self {
        Self::json(
            404,
            &ErrorBody {
                kind: "not_found",
                message: "404 Not Found".to_string(),
            },
        )
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'a str,
    message: String,
}

#[derive(Serialize)]
struct CreatedBody {
    path: String,
    file: String,
}

/// HTTP status for an error class.
pub fn status_for(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::InvalidRequest => 400,
        ErrorKind::Configuration => 422,
        ErrorKind::Generation | ErrorKind::MediaLookup => 502,
        ErrorKind::Render => 500,
    }
}

/// Route one request.
pub fn handle_request(pipeline: &DeckPipeline, method: &Method, url: &str, body: &str) -> ApiResponse {
    let path = url.split('?').next().unwrap_or("");
    debug!("{} {}", method, path);

    match (method, path) {
        (Method::Get, "/health") => ApiResponse::text(200, "ok"),
        (Method::Post, "/decks") => create_deck(pipeline, body),
        (Method::Get, p) if p.starts_with("/decks/") => {
            download_deck(pipeline, p.trim_start_matches("/decks/"))
        }
        _ => ApiResponse::not_found(),
    }
}

fn create_deck(pipeline: &DeckPipeline, body: &str) -> ApiResponse {
    let request: TopicRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            return ApiResponse::error(&DeckError::ValidationError(format!(
                "invalid request body: {}",
                e
            )))
        }
    };

    match pipeline.produce(&request) {
        Ok(path) => {
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default();
            ApiResponse::json(
                201,
                &CreatedBody {
                    path: path.to_string_lossy().to_string(),
                    file,
                },
            )
        }
        Err(e) => ApiResponse::error(&e),
    }
}

fn download_deck(pipeline: &DeckPipeline, raw_name: &str) -> ApiResponse {
    let name = match urlencoding::decode(raw_name) {
        Ok(name) => name,
        Err(_) => {
            return ApiResponse::error(&DeckError::ValidationError(format!(
                "file name is not valid UTF-8: {}",
                raw_name
            )))
        }
    };
    let name = name.as_ref();

    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return ApiResponse::error(&DeckError::ValidationError(format!(
            "invalid file name: {}",
            name
        )));
    }
    if !name.ends_with(".pptx") {
        return ApiResponse::not_found();
    }

    let file_path = pipeline.output_dir().join(name);
    if !file_path.is_file() {
        return ApiResponse::not_found();
    }

    match fs::read(&file_path) {
        Ok(content) => ApiResponse {
            status: 200,
            content_type: PPTX_CONTENT_TYPE,
            body: content,
            attachment: Some(name.to_string()),
        },
        Err(e) => {
            error!("Failed to read file {:?}: {}", file_path, e);
            ApiResponse::error(&DeckError::IoError(e))
        }
    }
}

fn respond(request: Request, api: ApiResponse) {
    let mut response = Response::from_data(api.body).with_status_code(StatusCode(api.status));
    if let Ok(header) = Header::from_bytes("Content-Type", api.content_type) {
        response = response.with_header(header);
    }
    if let Some(name) = api.attachment {
        let disposition = format!(
            "attachment; filename*=UTF-8''{}",
            urlencoding::encode(&name)
        );
        if let Ok(header) = Header::from_bytes("Content-Disposition", disposition.as_bytes()) {
            response = response.with_header(header);
        }
    }
    if let Err(e) = request.respond(response) {
        error!("Failed to send response: {}", e);
    }
}

/// Serve requests on `host:port` until the process exits. Requests are
/// handled one at a time.
pub fn serve(pipeline: DeckPipeline, host: &str, port: u16) -> Result<()> {
    let server = Server::http(format!("{}:{}", host, port))
        .map_err(|e| DeckError::ConfigError(format!("Failed to start HTTP server: {}", e)))?;

    info!("HTTP server listening on http://{}:{}", host, port);

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if let Err(e) = request
            .as_reader()
            .take(MAX_BODY_BYTES)
            .read_to_string(&mut body)
        {
            let api = ApiResponse::error(&DeckError::ValidationError(format!(
                "unreadable request body: {}",
                e
            )));
            respond(request, api);
            continue;
        }

        let method = request.method().clone();
        let url = request.url().to_string();
        let api = handle_request(&pipeline, &method, &url, &body);
        info!("{} {} -> {}", method, url, api.status);
        respond(request, api);
    }

    Ok(())
}
