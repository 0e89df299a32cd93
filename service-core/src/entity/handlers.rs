//! Generic axum handlers for entity collections.
//!
//! Routers mount these with a concrete entity, e.g.
//! `get(list_records::<User>)`. The router state must provide the matching
//! [`EntityService`] through `FromRef`.

use super::{Entity, EntityService};
use crate::error::AppError;
use crate::extract::{ValidatedJson, ValidatedPath};
use axum::{Json, extract::State};

pub async fn list_records<E: Entity>(State(service): State<EntityService<E>>) -> Json<Vec<E>> {
    Json(service.list_records())
}

pub async fn get_record<E: Entity>(
    State(service): State<EntityService<E>>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<E>, AppError> {
    Ok(Json(service.get_record(id)?))
}

pub async fn create_record<E: Entity>(
    State(service): State<EntityService<E>>,
    ValidatedJson(input): ValidatedJson<E::Create>,
) -> Json<E> {
    Json(service.create_record(input))
}
