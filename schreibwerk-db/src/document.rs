use bson::{DateTime, oid::ObjectId};
use schreibwerk_common::model::{
    author::{Author, CreateAuthor},
    blogpost::{Comment, CreateBlogPost, PartialBlogPost},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::UtcDateTime;

pub const AUTHOR_COLLECTION: &str = "authors";
pub const BLOGPOST_COLLECTION: &str = "blogposts";

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("Database had an invalid document")]
pub struct DocumentError;

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub(crate) struct AuthorDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub(crate) struct CommentDoc {
    pub content: String,
}

/// Stored blog post. `author` references a document in the author
/// collection and may dangle after a partially-completed cascade delete.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub(crate) struct BlogPostDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<ObjectId>,
    #[serde(default)]
    pub comments: Vec<CommentDoc>,
    pub created: DateTime,
}

impl AuthorDoc {
    pub fn new(fields: &CreateAuthor) -> Self {
        Self {
            id: None,
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            user_name: fields.user_name.clone(),
        }
    }
}

impl BlogPostDoc {
    /// `created` is stamped here, once; it is immutable afterwards.
    pub fn new(fields: &CreateBlogPost) -> Self {
        Self {
            id: None,
            title: fields.title.clone(),
            content: fields.content.clone(),
            author: Some(fields.author_id.object_id()),
            comments: Vec::new(),
            created: DateTime::now(),
        }
    }
}

impl TryFrom<AuthorDoc> for Author {
    type Error = DocumentError;

    fn try_from(value: AuthorDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.ok_or(DocumentError)?.into(),
            first_name: value.first_name,
            last_name: value.last_name,
            user_name: value.user_name,
        })
    }
}

impl From<CommentDoc> for Comment {
    fn from(value: CommentDoc) -> Self {
        Self {
            content: value.content,
        }
    }
}

impl TryFrom<BlogPostDoc> for PartialBlogPost {
    type Error = DocumentError;

    fn try_from(value: BlogPostDoc) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.ok_or(DocumentError)?.into(),
            author_id: value.author.map(Into::into),
            title: value.title,
            content: value.content,
            created: UtcDateTime::from(value.created.to_time_0_3()),
            comments: value.comments.into_iter().map(Comment::from).collect(),
        })
    }
}
