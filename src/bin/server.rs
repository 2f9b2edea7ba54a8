use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use imposition::candidates::{CandidateParentSheet, standard_candidates};
use imposition::error::QuoteError;
use imposition::estimator::{Estimator, Quote};
use imposition::types::{
    LayoutResult, PrintingMethod, ProductionParams, SheetConstraints, Size,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct ImposeRequest {
    sheet: Size,
    item: Size,
    #[serde(default)]
    constraints: SheetConstraints,
}

#[derive(Deserialize, Serialize)]
struct QuoteRequest {
    method: PrintingMethod,
    sheet: Size,
    item: Size,
    params: ProductionParams,
    #[serde(default)]
    constraints: SheetConstraints,
    /// Candidate table override; the builtin table applies when omitted.
    #[serde(default)]
    candidates: Option<Vec<CandidateParentSheet>>,
    #[serde(default)]
    pinned_parent: Option<Size>,
    paper_cost: f64,
    #[serde(default)]
    manual_paper_cost: Option<f64>,
}

fn validate_size(name: &str, size: &Size) -> Result<(), (StatusCode, String)> {
    if !size.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("{name} dimensions must be positive"),
        ));
    }
    Ok(())
}

fn validate_constraints(c: &SheetConstraints) -> Result<(), (StatusCode, String)> {
    if !c.is_valid() {
        return Err((
            StatusCode::BAD_REQUEST,
            "constraints must be non-negative".to_string(),
        ));
    }
    Ok(())
}

async fn impose(
    Json(req): Json<ImposeRequest>,
) -> Result<Json<LayoutResult>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /impose"
    );
    validate_size("sheet", &req.sheet)?;
    validate_constraints(&req.constraints)?;

    let estimator = Estimator {
        constraints: req.constraints,
        ..Estimator::default()
    };
    // Degenerate items come back as a zero-yield layout, not an error.
    Ok(Json(estimator.impose(req.sheet, req.item)))
}

async fn quote(Json(req): Json<QuoteRequest>) -> Result<Json<Quote>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /quote"
    );
    validate_size("sheet", &req.sheet)?;
    validate_size("item", &req.item)?;
    validate_constraints(&req.constraints)?;
    if req.params.color_count == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "color_count must be at least 1".to_string(),
        ));
    }

    let estimator = Estimator {
        constraints: req.constraints,
        ..Estimator::default()
    };
    let table = req.candidates.unwrap_or_else(standard_candidates);
    let pinned = req.pinned_parent.map(|s| (s.width, s.height));

    estimator
        .quote(
            req.method,
            req.item,
            req.sheet,
            &req.params,
            &table,
            pinned,
            req.paper_cost,
            req.manual_paper_cost,
        )
        .map(Json)
        .map_err(|e: QuoteError| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/impose", post(impose))
        .route("/quote", post(quote))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
