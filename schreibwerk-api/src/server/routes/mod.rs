use crate::server::ServerRouter;
use axum::Router;

mod authors;
mod blogposts;

pub fn routes() -> ServerRouter {
    Router::new()
        .merge(authors::routes())
        .merge(blogposts::routes())
}
