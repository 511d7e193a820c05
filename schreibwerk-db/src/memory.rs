use crate::store::{BlogStore, Result};
use async_trait::async_trait;
use bson::oid::ObjectId;
use schreibwerk_common::model::{
    Id,
    author::{Author, AuthorMarker, CreateAuthor, UpdateAuthorFields},
    blogpost::{BlogPost, BlogPostMarker, CreateBlogPost, PartialBlogPost, UpdateBlogPostFields},
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use time::UtcDateTime;

/// In-memory [`BlogStore`] backend.
///
/// Holds both collections behind one mutex and preserves insertion order on
/// list reads. This is the store the handler tests run against, since the
/// mongo client needs a reachable server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    authors: Vec<Author>,
    blogposts: Vec<PartialBlogPost>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    /// Same contract as the mongo client's batch resolution: a reference to
    /// a missing author resolves to an authorless post, never an error.
    fn resolve(&self, post: PartialBlogPost) -> BlogPost {
        let author = post
            .author_id
            .and_then(|id| self.authors.iter().find(|author| author.id == id).cloned());
        post.resolve(author)
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_authors(&self) -> Result<Vec<Author>> {
        Ok(self.lock().authors.clone())
    }

    async fn fetch_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>> {
        Ok(self
            .lock()
            .authors
            .iter()
            .find(|author| author.id == id)
            .cloned())
    }

    async fn fetch_author_by_user_name(&self, user_name: &str) -> Result<Option<Author>> {
        Ok(self
            .lock()
            .authors
            .iter()
            .find(|author| author.user_name == user_name)
            .cloned())
    }

    async fn create_author(&self, fields: &CreateAuthor) -> Result<Author> {
        let author = Author {
            id: Id::new(ObjectId::new()),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            user_name: fields.user_name.clone(),
        };

        self.lock().authors.push(author.clone());
        Ok(author)
    }

    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        fields: &UpdateAuthorFields,
    ) -> Result<Option<Author>> {
        let mut inner = self.lock();
        let Some(author) = inner.authors.iter_mut().find(|author| author.id == id) else {
            return Ok(None);
        };

        if let Some(first_name) = &fields.first_name {
            author.first_name = first_name.clone();
        }
        if let Some(last_name) = &fields.last_name {
            author.last_name = last_name.clone();
        }
        if let Some(user_name) = &fields.user_name {
            author.user_name = user_name.clone();
        }

        Ok(Some(author.clone()))
    }

    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<()> {
        self.lock().authors.retain(|author| author.id != id);
        Ok(())
    }

    async fn delete_blogposts_by_author(&self, author_id: Id<AuthorMarker>) -> Result<u64> {
        let mut inner = self.lock();
        let before = inner.blogposts.len();
        inner
            .blogposts
            .retain(|post| post.author_id != Some(author_id));

        Ok((before - inner.blogposts.len()) as u64)
    }

    async fn list_blogposts(&self) -> Result<Vec<BlogPost>> {
        let inner = self.lock();
        Ok(inner
            .blogposts
            .iter()
            .cloned()
            .map(|post| inner.resolve(post))
            .collect())
    }

    async fn fetch_blogpost(&self, id: Id<BlogPostMarker>) -> Result<Option<BlogPost>> {
        let inner = self.lock();
        Ok(inner
            .blogposts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .map(|post| inner.resolve(post)))
    }

    async fn create_blogpost(&self, fields: &CreateBlogPost) -> Result<PartialBlogPost> {
        let post = PartialBlogPost {
            id: Id::new(ObjectId::new()),
            author_id: Some(fields.author_id),
            title: fields.title.clone(),
            content: fields.content.clone(),
            created: UtcDateTime::now(),
            comments: Vec::new(),
        };

        self.lock().blogposts.push(post.clone());
        Ok(post)
    }

    async fn update_blogpost(
        &self,
        id: Id<BlogPostMarker>,
        fields: &UpdateBlogPostFields,
    ) -> Result<Option<PartialBlogPost>> {
        let mut inner = self.lock();
        let Some(post) = inner.blogposts.iter_mut().find(|post| post.id == id) else {
            return Ok(None);
        };

        if let Some(title) = &fields.title {
            post.title = title.clone();
        }
        if let Some(content) = &fields.content {
            post.content = content.clone();
        }

        Ok(Some(post.clone()))
    }

    async fn delete_blogpost(&self, id: Id<BlogPostMarker>) -> Result<()> {
        self.lock().blogposts.retain(|post| post.id != id);
        Ok(())
    }
}
