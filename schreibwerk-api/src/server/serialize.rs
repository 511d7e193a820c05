//! Wire representations of the stored records.
//!
//! Blog post responses flatten the resolved author into a display name; the
//! empty string means the reference did not resolve, which is exactly the
//! state an interrupted cascade delete leaves behind.

use schreibwerk_common::model::{
    Id,
    author::{Author, AuthorMarker},
    blogpost::{BlogPost, BlogPostMarker, Comment, PartialBlogPost},
};
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorResponse {
    pub id: Id<AuthorMarker>,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
}

impl From<Author> for AuthorResponse {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            user_name: author.user_name,
        }
    }
}

/// `POST /authors` response. The `_id` key (where every other response says
/// `id`) is part of the published wire contract and kept as-is.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CreatedAuthorResponse {
    #[serde(rename = "_id")]
    pub id: Id<AuthorMarker>,
    pub name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl From<Author> for CreatedAuthorResponse {
    fn from(author: Author) -> Self {
        let name = author.display_name();
        Self {
            id: author.id,
            name,
            user_name: author.user_name,
        }
    }
}

/// `PUT /authors/{id}` response.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct UpdatedAuthorResponse {
    pub id: Id<AuthorMarker>,
    pub name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
}

impl From<Author> for UpdatedAuthorResponse {
    fn from(author: Author) -> Self {
        let name = author.display_name();
        Self {
            id: author.id,
            name,
            user_name: author.user_name,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct BlogPostResponse {
    pub id: Id<BlogPostMarker>,
    pub author: String,
    pub content: String,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub comments: Vec<String>,
}

impl From<BlogPost> for BlogPostResponse {
    fn from(post: BlogPost) -> Self {
        Self {
            id: post.id,
            author: display_name_or_empty(post.author.as_ref()),
            content: post.content,
            title: post.title,
            created: post.created.into(),
            comments: comment_contents(post.comments),
        }
    }
}

/// `POST /blogposts` response; has no `created` field.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CreatedBlogPostResponse {
    pub id: Id<BlogPostMarker>,
    pub author: String,
    pub content: String,
    pub title: String,
    pub comments: Vec<String>,
}

impl CreatedBlogPostResponse {
    pub fn new(post: PartialBlogPost, author: &Author) -> Self {
        Self {
            id: post.id,
            author: author.display_name(),
            content: post.content,
            title: post.title,
            comments: comment_contents(post.comments),
        }
    }
}

fn display_name_or_empty(author: Option<&Author>) -> String {
    author.map(Author::display_name).unwrap_or_default()
}

fn comment_contents(comments: Vec<Comment>) -> Vec<String> {
    comments.into_iter().map(|comment| comment.content).collect()
}

#[cfg(test)]
mod tests {
    use crate::server::serialize::{BlogPostResponse, CreatedAuthorResponse};
    use bson::oid::ObjectId;
    use schreibwerk_common::model::{
        Id,
        author::Author,
        blogpost::{BlogPost, Comment},
    };
    use time::UtcDateTime;

    fn ada() -> Author {
        Author {
            id: Id::new(ObjectId::new()),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_name: "ada".to_string(),
        }
    }

    fn post(author: Option<Author>) -> BlogPost {
        BlogPost {
            id: Id::new(ObjectId::new()),
            author,
            title: "Notes".to_string(),
            content: "On engines".to_string(),
            created: UtcDateTime::now(),
            comments: vec![
                Comment {
                    content: "first".to_string(),
                },
                Comment {
                    content: "second".to_string(),
                },
            ],
        }
    }

    #[test]
    fn resolved_author_becomes_the_display_name() {
        let response = BlogPostResponse::from(post(Some(ada())));
        assert_eq!(response.author, "Ada Lovelace");
    }

    #[test]
    fn unresolved_author_becomes_the_empty_string() {
        let response = BlogPostResponse::from(post(None));
        assert_eq!(response.author, "");
    }

    #[test]
    fn nameless_author_is_not_the_fallback() {
        let mut author = ada();
        author.first_name = String::new();
        author.last_name = String::new();

        // Same rendered value as the fallback, but through the display-name
        // path: trim("" + " " + "") rather than the no-author branch.
        let response = BlogPostResponse::from(post(Some(author)));
        assert_eq!(response.author, "");
    }

    #[test]
    fn comments_serialize_as_ordered_contents() {
        let response = BlogPostResponse::from(post(Some(ada())));
        assert_eq!(response.comments, ["first", "second"]);
    }

    #[test]
    fn blogpost_response_uses_the_published_keys() {
        let json = serde_json::to_value(BlogPostResponse::from(post(Some(ada())))).unwrap();
        let object = json.as_object().unwrap();

        for key in ["id", "author", "content", "title", "created", "comments"] {
            assert!(object.contains_key(key), "missing key {key}");
        }
        assert!(object["created"].is_string());
    }

    #[test]
    fn created_author_response_uses_underscore_id_and_joined_name() {
        let author = ada();
        let id_hex = author.id.to_string();

        let json = serde_json::to_value(CreatedAuthorResponse::from(author)).unwrap();
        assert_eq!(json["_id"], serde_json::Value::String(id_hex));
        assert_eq!(json["name"], "Ada Lovelace");
        assert_eq!(json["userName"], "ada");
    }
}
