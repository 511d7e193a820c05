use crate::document::DocumentError;
use async_trait::async_trait;
use schreibwerk_common::model::{
    Id,
    author::{Author, AuthorMarker, CreateAuthor, UpdateAuthorFields},
    blogpost::{BlogPost, BlogPostMarker, CreateBlogPost, PartialBlogPost, UpdateBlogPostFields},
};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

/// A store fault. "Not found" is never an error: absent records surface as
/// `Ok(None)` (or an empty list) so callers can tell the two apart.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("A document in the database was invalid: {0}")]
    Data(#[from] DocumentError),
    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),
}

/// Access to the two persisted collections.
///
/// Read operations that feed the HTTP surface return [`BlogPost`] with the
/// author reference already resolved; the stored, unresolved form is
/// [`PartialBlogPost`]. Deletes are idempotent. Cascading an author delete
/// is the caller's job: `delete_blogposts_by_author` followed by
/// `delete_author`, two sequential operations with no transaction between
/// them.
#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list_authors(&self) -> Result<Vec<Author>>;

    async fn fetch_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>>;

    async fn fetch_author_by_user_name(&self, user_name: &str) -> Result<Option<Author>>;

    async fn create_author(&self, fields: &CreateAuthor) -> Result<Author>;

    /// Partial merge: only the present fields overwrite the stored record.
    /// Returns the updated record, or `None` when the id is unknown.
    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        fields: &UpdateAuthorFields,
    ) -> Result<Option<Author>>;

    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<()>;

    /// Removes every blog post referencing the author. Returns the number of
    /// posts removed.
    async fn delete_blogposts_by_author(&self, author_id: Id<AuthorMarker>) -> Result<u64>;

    async fn list_blogposts(&self) -> Result<Vec<BlogPost>>;

    async fn fetch_blogpost(&self, id: Id<BlogPostMarker>) -> Result<Option<BlogPost>>;

    async fn create_blogpost(&self, fields: &CreateBlogPost) -> Result<PartialBlogPost>;

    /// Partial merge restricted to `title` and `content`.
    async fn update_blogpost(
        &self,
        id: Id<BlogPostMarker>,
        fields: &UpdateBlogPostFields,
    ) -> Result<Option<PartialBlogPost>>;

    async fn delete_blogpost(&self, id: Id<BlogPostMarker>) -> Result<()>;
}
