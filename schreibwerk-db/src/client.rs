use crate::{
    document::{AUTHOR_COLLECTION, AuthorDoc, BLOGPOST_COLLECTION, BlogPostDoc, DocumentError},
    store::{BlogStore, Result},
};
use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    options::{IndexOptions, ReturnDocument},
};
use schreibwerk_common::model::{
    Id,
    author::{Author, AuthorMarker, CreateAuthor, UpdateAuthorFields},
    blogpost::{BlogPost, BlogPostMarker, CreateBlogPost, PartialBlogPost, UpdateBlogPostFields},
};
use std::collections::HashMap;
use time::UtcDateTime;
use tracing::info;

/// MongoDB-backed [`BlogStore`].
pub struct DbClient {
    authors: Collection<AuthorDoc>,
    blogposts: Collection<BlogPostDoc>,
}

impl DbClient {
    /// Connects, verifies the connection with a ping and ensures the unique
    /// `userName` index exists.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        // Bound server selection so an unreachable store fails the request
        // instead of hanging it.
        let uri = if uri.contains('?') {
            format!("{uri}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        } else {
            format!("{uri}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        };

        let client = Client::with_uri_str(&uri).await?;
        let database = client.database(db_name);
        database.run_command(doc! { "ping": 1 }).await?;

        let authors = database.collection::<AuthorDoc>(AUTHOR_COLLECTION);
        let blogposts = database.collection::<BlogPostDoc>(BLOGPOST_COLLECTION);

        let user_name_index = IndexModel::builder()
            .keys(doc! { "userName": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        authors.create_index(user_name_index).await?;

        info!(database = db_name, "Connected to document store");

        Ok(Self { authors, blogposts })
    }

    /// Resolves the author references of a batch of stored posts with a
    /// single `$in` fetch. Both single-item and list reads come through
    /// here, so they cannot diverge.
    async fn resolve_authors(&self, posts: Vec<PartialBlogPost>) -> Result<Vec<BlogPost>> {
        let referenced: Vec<ObjectId> = posts
            .iter()
            .filter_map(|post| post.author_id)
            .map(Id::object_id)
            .collect();

        let authors: HashMap<ObjectId, Author> = if referenced.is_empty() {
            HashMap::new()
        } else {
            self.authors
                .find(doc! { "_id": { "$in": referenced } })
                .await?
                .try_collect::<Vec<_>>()
                .await?
                .into_iter()
                .map(|doc| Author::try_from(doc).map(|author| (author.id.object_id(), author)))
                .collect::<Result<_, DocumentError>>()?
        };

        Ok(posts
            .into_iter()
            .map(|post| {
                let author = post
                    .author_id
                    .and_then(|id| authors.get(&id.object_id()).cloned());
                post.resolve(author)
            })
            .collect())
    }
}

#[async_trait]
impl BlogStore for DbClient {
    async fn list_authors(&self) -> Result<Vec<Author>> {
        let docs: Vec<AuthorDoc> = self.authors.find(doc! {}).await?.try_collect().await?;

        let authors = docs
            .into_iter()
            .map(Author::try_from)
            .collect::<Result<_, DocumentError>>()?;
        Ok(authors)
    }

    async fn fetch_author(&self, id: Id<AuthorMarker>) -> Result<Option<Author>> {
        let doc = self
            .authors
            .find_one(doc! { "_id": id.object_id() })
            .await?;

        let author = doc.map(Author::try_from).transpose()?;
        Ok(author)
    }

    async fn fetch_author_by_user_name(&self, user_name: &str) -> Result<Option<Author>> {
        let doc = self
            .authors
            .find_one(doc! { "userName": user_name })
            .await?;

        let author = doc.map(Author::try_from).transpose()?;
        Ok(author)
    }

    async fn create_author(&self, fields: &CreateAuthor) -> Result<Author> {
        let result = self.authors.insert_one(AuthorDoc::new(fields)).await?;
        let id = result.inserted_id.as_object_id().ok_or(DocumentError)?;

        Ok(Author {
            id: id.into(),
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            user_name: fields.user_name.clone(),
        })
    }

    async fn update_author(
        &self,
        id: Id<AuthorMarker>,
        fields: &UpdateAuthorFields,
    ) -> Result<Option<Author>> {
        let mut set = Document::new();
        if let Some(first_name) = &fields.first_name {
            set.insert("firstName", first_name.clone());
        }
        if let Some(last_name) = &fields.last_name {
            set.insert("lastName", last_name.clone());
        }
        if let Some(user_name) = &fields.user_name {
            set.insert("userName", user_name.clone());
        }

        // A body with no updatable fields still has to observe the record.
        if set.is_empty() {
            return self.fetch_author(id).await;
        }

        let updated = self
            .authors
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        let author = updated.map(Author::try_from).transpose()?;
        Ok(author)
    }

    async fn delete_author(&self, id: Id<AuthorMarker>) -> Result<()> {
        self.authors
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(())
    }

    async fn delete_blogposts_by_author(&self, author_id: Id<AuthorMarker>) -> Result<u64> {
        let result = self
            .blogposts
            .delete_many(doc! { "author": author_id.object_id() })
            .await?;
        Ok(result.deleted_count)
    }

    async fn list_blogposts(&self) -> Result<Vec<BlogPost>> {
        let docs: Vec<BlogPostDoc> = self.blogposts.find(doc! {}).await?.try_collect().await?;

        let posts = docs
            .into_iter()
            .map(PartialBlogPost::try_from)
            .collect::<Result<_, DocumentError>>()?;
        self.resolve_authors(posts).await
    }

    async fn fetch_blogpost(&self, id: Id<BlogPostMarker>) -> Result<Option<BlogPost>> {
        let Some(doc) = self
            .blogposts
            .find_one(doc! { "_id": id.object_id() })
            .await?
        else {
            return Ok(None);
        };

        let partial = PartialBlogPost::try_from(doc)?;
        let mut resolved = self.resolve_authors(vec![partial]).await?;
        Ok(resolved.pop())
    }

    async fn create_blogpost(&self, fields: &CreateBlogPost) -> Result<PartialBlogPost> {
        let document = BlogPostDoc::new(fields);
        let created = UtcDateTime::from(document.created.to_time_0_3());

        let result = self.blogposts.insert_one(document).await?;
        let id = result.inserted_id.as_object_id().ok_or(DocumentError)?;

        Ok(PartialBlogPost {
            id: id.into(),
            author_id: Some(fields.author_id),
            title: fields.title.clone(),
            content: fields.content.clone(),
            created,
            comments: Vec::new(),
        })
    }

    async fn update_blogpost(
        &self,
        id: Id<BlogPostMarker>,
        fields: &UpdateBlogPostFields,
    ) -> Result<Option<PartialBlogPost>> {
        let mut set = Document::new();
        if let Some(title) = &fields.title {
            set.insert("title", title.clone());
        }
        if let Some(content) = &fields.content {
            set.insert("content", content.clone());
        }

        if set.is_empty() {
            let doc = self
                .blogposts
                .find_one(doc! { "_id": id.object_id() })
                .await?;
            let post = doc.map(PartialBlogPost::try_from).transpose()?;
            return Ok(post);
        }

        let updated = self
            .blogposts
            .find_one_and_update(doc! { "_id": id.object_id() }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        let post = updated.map(PartialBlogPost::try_from).transpose()?;
        Ok(post)
    }

    async fn delete_blogpost(&self, id: Id<BlogPostMarker>) -> Result<()> {
        self.blogposts
            .delete_one(doc! { "_id": id.object_id() })
            .await?;
        Ok(())
    }
}
