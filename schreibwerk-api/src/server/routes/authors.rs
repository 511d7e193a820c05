use crate::server::{
    Result, ServerError, ServerRouter,
    json::Json,
    serialize::{AuthorResponse, CreatedAuthorResponse, UpdatedAuthorResponse},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use schreibwerk_common::model::{
    Id,
    author::{AuthorMarker, CreateAuthor, CreateAuthorRequest, UpdateAuthorFields, UpdateAuthorRequest},
};
use schreibwerk_db::store::BlogStore;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_authors)
        .typed_post(create_author)
        .typed_put(update_author)
        .typed_delete(delete_author)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/authors", rejection(ServerError))]
pub(crate) struct AuthorsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/authors/{id}", rejection(ServerError))]
pub(crate) struct AuthorPath {
    pub id: Id<AuthorMarker>,
}

pub(crate) async fn list_authors(
    AuthorsPath(): AuthorsPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<Json<Vec<AuthorResponse>>> {
    let authors = store.list_authors().await?;

    Ok(Json(
        authors.into_iter().map(AuthorResponse::from).collect(),
    ))
}

pub(crate) async fn create_author(
    AuthorsPath(): AuthorsPath,
    State(store): State<Arc<dyn BlogStore>>,
    Json(body): Json<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<CreatedAuthorResponse>)> {
    let fields = CreateAuthor::try_from(body)?;

    if store
        .fetch_author_by_user_name(&fields.user_name)
        .await?
        .is_some()
    {
        return Err(ServerError::DuplicateUserName);
    }

    let author = store.create_author(&fields).await?;
    Ok((StatusCode::CREATED, Json(author.into())))
}

pub(crate) async fn update_author(
    AuthorPath { id }: AuthorPath,
    State(store): State<Arc<dyn BlogStore>>,
    Json(body): Json<UpdateAuthorRequest>,
) -> Result<Json<UpdatedAuthorResponse>> {
    if body.id != Some(id) {
        return Err(ServerError::id_mismatch(id, body.id));
    }

    let updated = store
        .update_author(id, &UpdateAuthorFields::from(body))
        .await?
        .ok_or(ServerError::AuthorByIdNotFound(id))?;

    Ok(Json(updated.into()))
}

/// Cascades before removing the author: two sequential store operations,
/// not a transaction. A crash in between leaves dangling references, which
/// read paths resolve to an authorless post.
pub(crate) async fn delete_author(
    AuthorPath { id }: AuthorPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<StatusCode> {
    store.delete_blogposts_by_author(id).await?;
    store.delete_author(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
