use std::net::SocketAddr;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use keto_core::plan::render::render_value;
use keto_core::plan::{ProblemKind, ValidationReport, validate_value};
use keto_core::target::TargetProfile;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub plan: Value,
    #[serde(default)]
    pub target: Option<TargetProfile>,
}

#[derive(Debug, Serialize)]
pub struct ProblemResponse {
    pub kind: ProblemKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub passed: bool,
    pub problems: Vec<ProblemResponse>,
}

impl From<ValidationReport> for ValidateResponse {
    fn from(report: ValidationReport) -> Self {
        Self {
            passed: report.passed(),
            problems: report
                .problems
                .iter()
                .map(|p| ProblemResponse {
                    kind: p.kind(),
                    message: p.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    #[serde(flatten)]
    pub validation: ValidateResponse,
    pub markdown: String,
    /// The submitted plan, unmodified, for download.
    pub plan: Value,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/validate", post(validate_handler))
        .route("/api/render", post(render_handler))
        .route("/api/check", post(check_handler))
        .layer(CorsLayer::permissive())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(bind: &str, port: u16) -> Result<()> {
    let app = build_router();
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("keto-plan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("keto-plan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html><head><title>keto-plan</title></head><body>
<h1>keto-plan</h1>
<p>Paste a plan JSON and check it against your targets.</p>
<form id="check">
<p>
<label>Budget (£) <input name="budget" type="number" step="0.01" value="60"></label>
<label>Protein (g) <input name="protein" type="number" value="165"></label>
<label>Calories (kcal) <input name="kcal" type="number" value="2200"></label>
<label><input name="strict" type="checkbox" checked> Strict keto (20–30 g net carbs)</label>
</p>
<textarea name="plan" rows="20" cols="100">{}</textarea>
<p><button type="submit">Check plan</button></p>
</form>
<ul id="problems"></ul>
<pre id="report"></pre>
<script>
document.getElementById("check").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const f = ev.target;
  let plan;
  try { plan = JSON.parse(f.plan.value); } catch (e) { alert("Plan is not valid JSON: " + e); return; }
  const target = {
    budget: Number(f.budget.value),
    protein_target_g: Number(f.protein.value),
    kcal_target: Number(f.kcal.value),
    keto_strict: f.strict.checked,
  };
  const resp = await fetch("/api/check", {
    method: "POST",
    headers: {"content-type": "application/json"},
    body: JSON.stringify({plan, target}),
  });
  const body = await resp.json();
  const list = document.getElementById("problems");
  list.innerHTML = "";
  if (body.error) { list.textContent = body.error; return; }
  if (body.passed) { list.textContent = "All checks passed."; }
  for (const p of body.problems) {
    const li = document.createElement("li");
    li.textContent = p.message;
    list.appendChild(li);
  }
  document.getElementById("report").textContent = body.markdown;
});
</script>
</body></html>"#;

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

fn target_or_default(req: &PlanRequest) -> Result<TargetProfile, AppError> {
    let target = req.target.unwrap_or_default();
    if target.budget < 0.0 || target.protein_target_g <= 0.0 || target.kcal_target <= 0.0 {
        return Err(AppError::bad_request(
            "target budget must be non-negative and macro targets positive",
        ));
    }
    Ok(target)
}

async fn validate_handler(
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let Json(req) = body?;
    let target = target_or_default(&req)?;
    let report = validate_value(&req.plan, &target);
    Ok(Json(report.into()))
}

async fn render_handler(
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<RenderResponse>, AppError> {
    let Json(req) = body?;
    Ok(Json(RenderResponse {
        markdown: render_value(&req.plan),
    }))
}

async fn check_handler(
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>, AppError> {
    let Json(req) = body?;
    let target = target_or_default(&req)?;
    let report = validate_value(&req.plan, &target);
    let markdown = render_value(&req.plan);
    Ok(Json(CheckResponse {
        validation: report.into(),
        markdown,
        plan: req.plan,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
