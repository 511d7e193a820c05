use crate::{
    model::{
        Id,
        author::{Author, AuthorMarker},
    },
    validate::MissingFieldError,
};
use serde::Deserialize;
use time::UtcDateTime;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct BlogPostMarker;

/// A comment owned by its blog post. Comments have no lifecycle of their
/// own; they live and die with the post, in insertion order.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct Comment {
    pub content: String,
}

/// A blog post with its author reference resolved for reading.
///
/// `author` is `None` both when the post never had an author and when the
/// reference dangles (the author was deleted and the cascade did not reach
/// this post). Neither case is an error.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct BlogPost {
    pub id: Id<BlogPostMarker>,
    pub author: Option<Author>,
    pub title: String,
    pub content: String,
    pub created: UtcDateTime,
    pub comments: Vec<Comment>,
}

/// A blog post as stored: the author is a reference, not an embedded record.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct PartialBlogPost {
    pub id: Id<BlogPostMarker>,
    pub author_id: Option<Id<AuthorMarker>>,
    pub title: String,
    pub content: String,
    pub created: UtcDateTime,
    pub comments: Vec<Comment>,
}

impl PartialBlogPost {
    /// Embeds the looked-up author record, or marks the post authorless when
    /// the reference did not resolve.
    ///
    /// Every read path, single and list, resolves through this method, so
    /// the two cannot produce differently-shaped author data for the same
    /// stored post.
    #[must_use]
    pub fn resolve(self, author: Option<Author>) -> BlogPost {
        BlogPost {
            id: self.id,
            author,
            title: self.title,
            content: self.content,
            created: self.created,
            comments: self.comments,
        }
    }
}

/// A fully validated blog post create request.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreateBlogPost {
    pub title: String,
    pub content: String,
    pub author_id: Id<AuthorMarker>,
}

/// Raw `POST /blogposts` body.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct CreateBlogPostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<Id<AuthorMarker>>,
}

impl TryFrom<CreateBlogPostRequest> for CreateBlogPost {
    type Error = MissingFieldError;

    fn try_from(value: CreateBlogPostRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title.ok_or(MissingFieldError("title"))?,
            content: value.content.ok_or(MissingFieldError("content"))?,
            author_id: value.author_id.ok_or(MissingFieldError("author_id"))?,
        })
    }
}

/// Raw `PUT /blogposts/{id}` body. Only `title` and `content` are
/// updatable through this surface; the author reference, comments and
/// creation time are not.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
pub struct UpdateBlogPostRequest {
    pub id: Option<Id<BlogPostMarker>>,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// The partial-merge field set for a blog post update.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct UpdateBlogPostFields {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateBlogPostRequest> for UpdateBlogPostFields {
    fn from(value: UpdateBlogPostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        author::Author,
        blogpost::{CreateBlogPost, CreateBlogPostRequest, PartialBlogPost},
    };
    use bson::oid::ObjectId;
    use time::UtcDateTime;

    fn partial_post(author_id: Option<Id<crate::model::author::AuthorMarker>>) -> PartialBlogPost {
        PartialBlogPost {
            id: Id::new(ObjectId::new()),
            author_id,
            title: "Notes".to_string(),
            content: "On engines".to_string(),
            created: UtcDateTime::now(),
            comments: Vec::new(),
        }
    }

    #[test]
    fn resolve_embeds_the_author() {
        let author = Author {
            id: Id::new(ObjectId::new()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_name: "ada".to_string(),
        };

        let resolved = partial_post(Some(author.id)).resolve(Some(author.clone()));
        assert_eq!(resolved.author, Some(author));
    }

    #[test]
    fn resolve_leaves_dangling_references_authorless() {
        let resolved = partial_post(Some(Id::new(ObjectId::new()))).resolve(None);
        assert_eq!(resolved.author, None);
    }

    #[test]
    fn resolve_preserves_post_fields() {
        let partial = partial_post(None);
        let (id, created) = (partial.id, partial.created);

        let resolved = partial.resolve(None);
        assert_eq!(resolved.id, id);
        assert_eq!(resolved.title, "Notes");
        assert_eq!(resolved.content, "On engines");
        assert_eq!(resolved.created, created);
        assert!(resolved.comments.is_empty());
    }

    #[test]
    fn create_request_reports_first_missing_field_in_order() {
        let empty = CreateBlogPostRequest::default();
        assert_eq!(CreateBlogPost::try_from(empty).unwrap_err().field(), "title");

        let title_only = CreateBlogPostRequest {
            title: Some("Notes".to_string()),
            ..CreateBlogPostRequest::default()
        };
        assert_eq!(
            CreateBlogPost::try_from(title_only).unwrap_err().field(),
            "content"
        );

        let no_author = CreateBlogPostRequest {
            title: Some("Notes".to_string()),
            content: Some("On engines".to_string()),
            ..CreateBlogPostRequest::default()
        };
        assert_eq!(
            CreateBlogPost::try_from(no_author).unwrap_err().field(),
            "author_id"
        );
    }
}
