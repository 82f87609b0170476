use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::data::{EntityKind, Problem};
use crate::error::PlannerError;
use crate::grid::{Grid, build_grid};
use crate::problem;
use crate::report::SolveReport;
use crate::solver::SolverClient;
use crate::store::{Draft, EntityStore};

/// The store is not thread-safe on its own; handlers share it behind a mutex.
#[derive(Debug)]
pub struct AppState {
    pub store: Mutex<EntityStore>,
    pub solver: SolverClient,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(store: EntityStore, solver: SolverClient) -> SharedState {
        Arc::new(Self {
            store: Mutex::new(store),
            solver,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SolveOutcome {
    pub report: SolveReport,
    pub grid: Grid,
}

impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlannerError::Validation { .. } | PlannerError::Format { .. } => StatusCode::BAD_REQUEST,
            PlannerError::Index { .. } => StatusCode::NOT_FOUND,
            PlannerError::SubmissionInFlight | PlannerError::SlotIdsExhausted => StatusCode::CONFLICT,
            PlannerError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PlannerError::Network(_) | PlannerError::Server { .. } => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

async fn status() -> Json<Value> {
    Json(json!({"ok": true, "message": "Timetable planner running."}))
}

async fn get_problem(State(state): State<SharedState>) -> Json<Problem> {
    let store = state.store.lock().await;
    Json(problem::serialize(&store))
}

async fn put_problem(State(state): State<SharedState>, body: String) -> Result<Json<Problem>, PlannerError> {
    let mut store = state.store.lock().await;
    store.replace_all_json(&body)?;
    Ok(Json(problem::serialize(&store)))
}

async fn list(
    State(state): State<SharedState>,
    Path(kind): Path<EntityKind>,
) -> Result<Json<Value>, PlannerError> {
    let store = state.store.lock().await;
    Ok(Json(store.export(kind)?))
}

async fn add(
    State(state): State<SharedState>,
    Path(kind): Path<EntityKind>,
    Json(form): Json<Value>,
) -> Result<(StatusCode, Json<Value>), PlannerError> {
    let draft = Draft::from_value(kind, form)?;
    let mut store = state.store.lock().await;
    let index = store.add(draft)?;
    let listing = store.export(kind)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"index": index, "entity": listing[index]})),
    ))
}

async fn merge_import(
    State(state): State<SharedState>,
    Path(kind): Path<EntityKind>,
    body: String,
) -> Result<Json<Value>, PlannerError> {
    let mut store = state.store.lock().await;
    let added = store.merge_import_json(kind, &body)?;
    Ok(Json(json!({"added": added, "total": store.len(kind)})))
}

async fn delete_entity(
    State(state): State<SharedState>,
    Path((kind, index)): Path<(EntityKind, usize)>,
) -> Result<StatusCode, PlannerError> {
    let mut store = state.store.lock().await;
    store.delete(kind, index)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn professor_names(State(state): State<SharedState>) -> Json<Vec<String>> {
    let store = state.store.lock().await;
    Json(store.professor_names().into_iter().map(str::to_string).collect())
}

// The store lock is released while the solver works; the grid is built against
// whatever rooms and slots exist once the answer arrives.
async fn solve_handler(State(state): State<SharedState>) -> Result<Json<SolveOutcome>, PlannerError> {
    let payload = {
        let store = state.store.lock().await;
        problem::serialize(&store)
    };

    let response = state.solver.solve(&payload).await.inspect_err(|e| {
        error!("solve failed: {e}");
    })?;

    let store = state.store.lock().await;
    let grid = build_grid(store.time_slots(), store.rooms(), &response.schedule.assignments);
    Ok(Json(SolveOutcome {
        report: SolveReport::from(&response),
        grid,
    }))
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/problem", get(get_problem).put(put_problem))
        .route("/professor-names", get(professor_names))
        .route("/entities/:kind", get(list).post(add))
        .route("/entities/:kind/:index", delete(delete_entity))
        .route("/import/:kind", post(merge_import))
        .route("/solve", post(solve_handler))
        .with_state(state)
}

pub async fn run_server(config: &Config) -> std::io::Result<()> {
    let state = AppState::new(EntityStore::new(), SolverClient::new(&config.solver_url));
    info!("Forwarding solve requests to {}", state.solver.endpoint());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;

    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
