use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use json::Json;
use schreibwerk_common::{
    model::{Id, author::AuthorMarker, blogpost::BlogPostMarker},
    validate::MissingFieldError,
};
use schreibwerk_db::store::{BlogStore, DbError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod json;
mod routes;
mod serialize;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, FromRef)]
pub struct ServerState {
    pub store: Arc<dyn BlogStore>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    MissingField(#[from] MissingFieldError),
    #[error("Username is already in use")]
    DuplicateUserName,
    #[error("Request path id ({path}) and request body id ({body}) must match")]
    IdMismatch { path: String, body: String },
    /// A write referenced an author that does not exist. Client error, not a
    /// missing resource: the path was fine, the body was not.
    #[error("Author {0} not found")]
    AuthorNotFound(Id<AuthorMarker>),
    #[error("Author with id {0} was not found.")]
    AuthorByIdNotFound(Id<AuthorMarker>),
    #[error("Blog post with id {0} was not found.")]
    BlogPostByIdNotFound(Id<BlogPostMarker>),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl ServerError {
    pub fn id_mismatch<Marker>(path: Id<Marker>, body: Option<Id<Marker>>) -> Self {
        Self::IdMismatch {
            path: path.to_string(),
            body: body.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::AuthorByIdNotFound(_)
            | ServerError::BlogPostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::JsonRejection(_)
            | ServerError::MissingField(_)
            | ServerError::DuplicateUserName
            | ServerError::IdMismatch { .. }
            | ServerError::AuthorNotFound(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
struct ErrorResponse {
    status: u16,
    message: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let error_response = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::server::ServerError;
    use axum::http::StatusCode;
    use bson::oid::ObjectId;
    use schreibwerk_common::{model::Id, validate::MissingFieldError};

    #[test]
    fn status_mapping_follows_the_handler_table() {
        assert_eq!(
            ServerError::MissingField(MissingFieldError("title")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::DuplicateUserName.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::AuthorNotFound(Id::new(ObjectId::new())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServerError::BlogPostByIdNotFound(Id::new(ObjectId::new())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn id_mismatch_names_both_ids() {
        let path = Id::<schreibwerk_common::model::author::AuthorMarker>::new(ObjectId::new());
        let body = Id::new(ObjectId::new());

        let error = ServerError::id_mismatch(path, Some(body));
        let message = error.to_string();
        assert!(message.contains(&path.to_string()));
        assert!(message.contains(&body.to_string()));
    }

    #[test]
    fn missing_field_message_names_the_field() {
        let error = ServerError::MissingField(MissingFieldError("userName"));
        assert_eq!(error.to_string(), "Missing `userName` in request body");
    }
}
