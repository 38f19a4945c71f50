use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    routing::{get, post},
};
use validator::Validate;

use crate::data::models::{
    ApiResponse, CreateTrainingRequest, ItemId, Training, TrainingAnswer, TrainingId, TrainingItem,
};
use crate::features::training::{Result, TrainingError, TrainingInteractor};
use crate::utils::CurrentUser;

type SharedInteractor = Arc<TrainingInteractor>;
type PathParam<T> = std::result::Result<Path<T>, PathRejection>;

/// Unwraps a path parameter, reporting bad ones in the usual error body.
fn path_param<T>(param: PathParam<T>) -> Result<T> {
    param
        .map(|Path(value)| value)
        .map_err(|e| TrainingError::InvalidRequest(e.body_text()))
}

/// Runs a synchronous interactor call on the blocking pool.
async fn run_blocking<T, F>(interactor: SharedInteractor, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&TrainingInteractor) -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&interactor)).await?
}

pub async fn list_trainings(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<Training>>> {
    let trainings = run_blocking(interactor, move |i| i.list(user_id)).await?;
    Ok(Json(trainings))
}

pub async fn create_training(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    payload: std::result::Result<Json<CreateTrainingRequest>, JsonRejection>,
) -> Result<Json<Training>> {
    let Json(payload) = payload.map_err(|e| TrainingError::InvalidRequest(e.body_text()))?;
    payload.validate()?;

    let training = run_blocking(interactor, move |i| {
        i.create(user_id, payload.kind, &payload.scope, payload.transcription_type)
    })
    .await?;

    Ok(Json(training))
}

pub async fn get_training(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    training_id: PathParam<TrainingId>,
) -> Result<Json<Training>> {
    let training_id = path_param(training_id)?;
    let training = run_blocking(interactor, move |i| i.get(user_id, training_id)).await?;
    Ok(Json(training))
}

pub async fn next_item(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    training_id: PathParam<TrainingId>,
) -> Result<Json<TrainingItem>> {
    let training_id = path_param(training_id)?;
    let item = run_blocking(interactor, move |i| i.next(user_id, training_id)).await?;
    Ok(Json(item))
}

pub async fn reset_training(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    training_id: PathParam<TrainingId>,
) -> Result<Json<ApiResponse>> {
    let training_id = path_param(training_id)?;
    run_blocking(interactor, move |i| i.reset(user_id, training_id)).await?;
    Ok(Json(ApiResponse::ok("Training reset")))
}

pub async fn get_item(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    item_id: PathParam<ItemId>,
) -> Result<Json<TrainingItem>> {
    let item_id = path_param(item_id)?;
    let item = run_blocking(interactor, move |i| i.item(user_id, item_id)).await?;
    Ok(Json(item))
}

pub async fn item_answers(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    item_id: PathParam<ItemId>,
) -> Result<Json<Vec<TrainingAnswer>>> {
    let item_id = path_param(item_id)?;
    let answers = run_blocking(interactor, move |i| i.item_answers(user_id, item_id)).await?;
    Ok(Json(answers))
}

pub async fn complete_item(
    State(interactor): State<SharedInteractor>,
    CurrentUser(user_id): CurrentUser,
    item_id: PathParam<ItemId>,
) -> Result<Json<ApiResponse>> {
    let item_id = path_param(item_id)?;
    run_blocking(interactor, move |i| i.mark_complete(user_id, item_id)).await?;
    Ok(Json(ApiResponse::ok("Item completed")))
}

async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::ok("ok"))
}

pub fn training_router(interactor: SharedInteractor) -> Router {
    let me_router = Router::new()
        .route("/trainings", get(list_trainings).post(create_training))
        .route("/trainings/{training_id}", get(get_training))
        .route("/trainings/{training_id}/next", get(next_item))
        .route("/trainings/{training_id}/reset", post(reset_training))
        .route("/training-items/{item_id}", get(get_item))
        .route("/training-items/{item_id}/answers", get(item_answers))
        .route("/training-items/{item_id}/complete", post(complete_item));

    Router::new()
        .nest("/me", me_router)
        .route("/health", get(health))
        .with_state(interactor)
}
