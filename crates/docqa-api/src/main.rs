//! docqa-api - HTTP API server for the document Q&A service

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use uuid::Uuid;

use docqa_api::cors::parse_allowed_origins;
use docqa_api::responses::{ListResponse, PaginationMeta};
use docqa_core::defaults::{MAX_UPLOAD_BYTES, PAGE_LIMIT, PAGE_LIMIT_MAX, PAGE_OFFSET};
use docqa_core::{
    CreateDocumentRequest, CreateQuestionRequest, Document, DocumentFormat, DocumentRepository,
    Question, QuestionRepository, QuestionStatus,
};
use docqa_db::Database;
use docqa_extract::ExtractorRegistry;
use docqa_tasks::{LifecycleConfig, QuestionLifecycle};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation when tracing a request into its background unit.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Global rate limiter type (direct quota, no keyed bucketing).
type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    /// Lifecycle manager owning the in-flight unit registry.
    lifecycle: QuestionLifecycle,
    /// Extraction registry for file uploads.
    extractors: Arc<ExtractorRegistry>,
    /// Global rate limiter (None if rate limiting is disabled).
    rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

// =============================================================================
// OPENAPI
// =============================================================================

/// OpenAPI documentation, served at `/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Document Q&A API",
        version = "0.3.1",
        description = "Upload documents, submit questions, and poll for asynchronously generated answers"
    ),
    paths(
        create_document,
        upload_document_file,
        list_documents,
        get_document,
        delete_document,
        submit_question,
        list_document_questions,
        get_question,
        delete_question,
        health_check,
        get_metrics
    ),
    components(schemas(Document, Question, QuestionStatus, CreateQuestionRequest)),
    tags(
        (name = "Documents", description = "Document CRUD and file upload"),
        (name = "Questions", description = "Question submission and polling"),
        (name = "System", description = "Health checks and metrics")
    )
)]
struct ApiDoc;

async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "docqa_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "docqa_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("docqa-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/docqa".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse()
        .unwrap_or(8000);

    let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(MAX_UPLOAD_BYTES);

    // Rate limiting configuration
    // RATE_LIMIT_REQUESTS: requests per period (default: 100)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60)
    let rate_limit_requests: u32 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| "100".to_string())
        .parse()
        .unwrap_or(100);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .unwrap_or(60);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        "Rate limiting: {} ({} requests per {} seconds)",
        if rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // File extraction registry
    let extractors = Arc::new(ExtractorRegistry::with_defaults());
    info!(
        formats = extractors.available_formats().len(),
        "Extraction registry initialized"
    );

    // Lifecycle manager: owns the in-flight unit registry for this process.
    let lifecycle = QuestionLifecycle::new(
        Arc::new(db.documents.clone()),
        Arc::new(db.questions.clone()),
        LifecycleConfig::from_env(),
    );

    // Create rate limiter if enabled
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .expect("Rate limit period must be non-zero")
            .allow_burst(NonZeroU32::new(rate_limit_requests).expect("Rate limit must be non-zero"));
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    // CORS whitelist
    let allowed_origins =
        parse_allowed_origins(&std::env::var("ALLOWED_ORIGINS").unwrap_or_default());
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // Create app state
    let state = AppState {
        db,
        lifecycle: lifecycle.clone(),
        extractors,
        rate_limiter,
    };

    // Build router
    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .route("/openapi.json", get(openapi_json))
        // Documents
        .route("/documents", get(list_documents).post(create_document))
        .route("/documents/upload-file", post(upload_document_file))
        .route(
            "/documents/:id",
            get(get_document).delete(delete_document),
        )
        .route("/documents/:id/question", post(submit_question))
        .route("/documents/:id/questions", get(list_document_questions))
        // Questions
        .route(
            "/questions/:id",
            get(get_question).delete(delete_question),
        )
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("docqa-api listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Registry lifecycle: cleared at shutdown; in-flight questions stay
    // pending (lost, by design).
    lifecycle.shutdown();
    info!("docqa-api stopped");

    Ok(())
}

/// Resolve on SIGINT (ctrl-c) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received");
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Global rate limiting: 429 once the quota is exhausted.
async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({"error": "Rate limit exceeded"})),
            )
                .into_response();
        }
    }
    next.run(request).await
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Document Q&A Service is running."
    }))
}

/// Liveness plus datastore connectivity and in-flight unit count.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Datastore unreachable")
    )
)]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "service": "docqa-api",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "connected",
                "background_tasks": state.lifecycle.in_flight(),
                "timestamp": chrono::Utc::now(),
            })),
        ),
        Err(e) => {
            error!(
                subsystem = "api",
                component = "health",
                error = %e,
                "Health check failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "service": "docqa-api",
                    "error": "Database connection failed",
                })),
            )
        }
    }
}

/// Service totals and active background units.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "System",
    responses((status = 200, description = "Service metrics"))
)]
async fn get_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let total_documents = state.db.documents.count().await?;
    let total_questions = state.db.questions.count().await?;

    Ok(Json(serde_json::json!({
        "metrics": {
            "total_documents": total_documents,
            "total_questions": total_questions,
            "background_tasks_active": state.lifecycle.in_flight(),
        },
        "background_task_ids": state.lifecycle.in_flight_ids(),
    })))
}

// =============================================================================
// DOCUMENT HANDLERS
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateDocumentForm {
    title: String,
    content: String,
}

/// Upload a new document from raw form fields.
#[utoipa::path(
    post,
    path = "/documents",
    tag = "Documents",
    responses(
        (status = 201, description = "Document created", body = Document),
        (status = 400, description = "Validation failed")
    )
)]
async fn create_document(
    State(state): State<AppState>,
    Form(form): Form<CreateDocumentForm>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state
        .db
        .documents
        .insert(CreateDocumentRequest {
            title: form.title,
            content: form.content,
        })
        .await?;

    info!(
        subsystem = "api",
        op = "create_document",
        document_id = document.id,
        "Document created"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

/// Upload a PDF, DOCX, or TXT file and extract its text as a new document.
#[utoipa::path(
    post,
    path = "/documents/upload-file",
    tag = "Documents",
    responses(
        (status = 201, description = "Document created from file", body = Document),
        (status = 400, description = "Unsupported file type or no extractable text")
    )
)]
async fn upload_document_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut title: Option<String> = None;
    let mut filename: Option<String> = None;
    let mut data: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some("title") => {
                title = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid title field: {}", e))
                })?);
            }
            Some("file") => {
                filename = field.file_name().map(String::from);
                data = Some(field.bytes().await.map_err(|e| {
                    ApiError::BadRequest(format!("Invalid file field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let title = title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("title form field is required".to_string()))?;
    let data =
        data.ok_or_else(|| ApiError::BadRequest("file form field is required".to_string()))?;
    let filename = filename.unwrap_or_default();

    let format = DocumentFormat::from_filename(&filename).ok_or_else(|| {
        ApiError::BadRequest("Unsupported file type. Use PDF, DOCX, or TXT files.".to_string())
    })?;

    let text = state.extractors.extract(format, &data, &filename).await?;
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Could not extract text from the uploaded file".to_string(),
        ));
    }

    let document = state
        .db
        .documents
        .insert(CreateDocumentRequest {
            title,
            content: text.trim().to_string(),
        })
        .await?;

    info!(
        subsystem = "api",
        op = "upload_file",
        document_id = document.id,
        format = format.as_str(),
        "Document created from file"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// List documents, newest first.
#[utoipa::path(
    get,
    path = "/documents",
    tag = "Documents",
    responses((status = 200, description = "Paginated document list"))
)]
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(PAGE_LIMIT).clamp(1, PAGE_LIMIT_MAX);
    let offset = query.offset.unwrap_or(PAGE_OFFSET).max(0);

    let data = state.db.documents.list(limit, offset).await?;
    let total = state.db.documents.count().await?;

    Ok(Json(ListResponse {
        data,
        pagination: PaginationMeta::new(total, limit, offset),
    }))
}

/// Retrieve a document by id.
#[utoipa::path(
    get,
    path = "/documents/{id}",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document", body = Document),
        (status = 404, description = "Document not found")
    )
)]
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.db.documents.fetch(id).await?;
    Ok(Json(document))
}

/// Delete a document and (via cascade) all its questions.
#[utoipa::path(
    delete,
    path = "/documents/{id}",
    tag = "Documents",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found")
    )
)]
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.lifecycle.delete_document(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// QUESTION HANDLERS
// =============================================================================

/// Submit a question for async processing; returns immediately with the
/// pending question.
#[utoipa::path(
    post,
    path = "/documents/{id}/question",
    tag = "Questions",
    params(("id" = i64, Path, description = "Document id")),
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, description = "Question accepted", body = Question),
        (status = 404, description = "Document not found")
    )
)]
async fn submit_question(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
    Json(req): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = state.lifecycle.submit(document_id, req).await?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// List a document's questions, newest first.
#[utoipa::path(
    get,
    path = "/documents/{id}/questions",
    tag = "Questions",
    params(("id" = i64, Path, description = "Document id")),
    responses(
        (status = 200, description = "The document's questions", body = [Question]),
        (status = 404, description = "Document not found")
    )
)]
async fn list_document_questions(
    State(state): State<AppState>,
    Path(document_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let questions = state.lifecycle.list_for_document(document_id).await?;
    Ok(Json(questions))
}

/// Get question status and answer (if available).
#[utoipa::path(
    get,
    path = "/questions/{id}",
    tag = "Questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, description = "The question", body = Question),
        (status = 404, description = "Question not found")
    )
)]
async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let question = state.lifecycle.get(id).await?;
    Ok(Json(question))
}

/// Delete a question, cancelling its background unit if still pending.
#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "Questions",
    params(("id" = i64, Path, description = "Question id")),
    responses(
        (status = 204, description = "Question deleted"),
        (status = 404, description = "Question not found")
    )
)]
async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    state.lifecycle.cancel_and_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    /// Unexpected failure; logged with context, surfaced generically.
    Internal(docqa_core::Error),
    NotFound(String),
    BadRequest(String),
}

impl From<docqa_core::Error> for ApiError {
    fn from(err: docqa_core::Error) -> Self {
        use docqa_core::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::DocumentNotFound(id) => {
                ApiError::NotFound(format!("Document with id {} not found", id))
            }
            Error::QuestionNotFound(id) => {
                ApiError::NotFound(format!("Question with id {} not found", id))
            }
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::UnsupportedFormat(name) => ApiError::BadRequest(format!(
                "Unsupported file type: {}. Use PDF, DOCX, or TXT files.",
                name
            )),
            Error::Extraction(msg) => {
                ApiError::BadRequest(format!("Could not extract text from the uploaded file: {}", msg))
            }
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(
                    subsystem = "api",
                    error = %err,
                    "Request failed with internal error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
