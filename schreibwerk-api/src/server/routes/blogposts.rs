use crate::server::{
    Result, ServerError, ServerRouter,
    json::Json,
    serialize::{BlogPostResponse, CreatedBlogPostResponse},
};
use axum::{extract::State, http::StatusCode};
use axum_extra::routing::{RouterExt, TypedPath};
use schreibwerk_common::model::{
    Id,
    blogpost::{
        BlogPostMarker, CreateBlogPost, CreateBlogPostRequest, UpdateBlogPostFields,
        UpdateBlogPostRequest,
    },
};
use schreibwerk_db::store::BlogStore;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_blogposts)
        .typed_get(get_blogpost)
        .typed_post(create_blogpost)
        .typed_put(update_blogpost)
        .typed_delete(delete_blogpost)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/blogposts", rejection(ServerError))]
pub(crate) struct BlogPostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/blogposts/{id}", rejection(ServerError))]
pub(crate) struct BlogPostPath {
    pub id: Id<BlogPostMarker>,
}

pub(crate) async fn list_blogposts(
    BlogPostsPath(): BlogPostsPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<Json<Vec<BlogPostResponse>>> {
    let posts = store.list_blogposts().await?;

    Ok(Json(
        posts.into_iter().map(BlogPostResponse::from).collect(),
    ))
}

pub(crate) async fn get_blogpost(
    BlogPostPath { id }: BlogPostPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<Json<BlogPostResponse>> {
    let post = store
        .fetch_blogpost(id)
        .await?
        .ok_or(ServerError::BlogPostByIdNotFound(id))?;

    Ok(Json(post.into()))
}

pub(crate) async fn create_blogpost(
    BlogPostsPath(): BlogPostsPath,
    State(store): State<Arc<dyn BlogStore>>,
    Json(body): Json<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<CreatedBlogPostResponse>)> {
    let fields = CreateBlogPost::try_from(body)?;

    // The single author-existence check of this write; nothing is persisted
    // when the reference does not resolve.
    let author = store
        .fetch_author(fields.author_id)
        .await?
        .ok_or(ServerError::AuthorNotFound(fields.author_id))?;

    let post = store.create_blogpost(&fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedBlogPostResponse::new(post, &author)),
    ))
}

pub(crate) async fn update_blogpost(
    BlogPostPath { id }: BlogPostPath,
    State(store): State<Arc<dyn BlogStore>>,
    Json(body): Json<UpdateBlogPostRequest>,
) -> Result<StatusCode> {
    if body.id != Some(id) {
        return Err(ServerError::id_mismatch(id, body.id));
    }

    store
        .update_blogpost(id, &UpdateBlogPostFields::from(body))
        .await?
        .ok_or(ServerError::BlogPostByIdNotFound(id))?;

    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn delete_blogpost(
    BlogPostPath { id }: BlogPostPath,
    State(store): State<Arc<dyn BlogStore>>,
) -> Result<StatusCode> {
    store.delete_blogpost(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
