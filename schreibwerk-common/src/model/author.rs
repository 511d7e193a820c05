use crate::{model::Id, validate::MissingFieldError};
use serde::Deserialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct AuthorMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Author {
    pub id: Id<AuthorMarker>,
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
}

impl Author {
    /// The name shown on serialized blog posts: first and last name joined,
    /// trimmed so an empty half does not leave stray whitespace.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A fully validated author create request.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct CreateAuthor {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
}

/// Raw `POST /authors` body. All fields optional so that presence can be
/// checked in declared order instead of failing on whichever field serde
/// happens to reach first.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl TryFrom<CreateAuthorRequest> for CreateAuthor {
    type Error = MissingFieldError;

    fn try_from(value: CreateAuthorRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            first_name: value.first_name.ok_or(MissingFieldError("firstName"))?,
            last_name: value.last_name.ok_or(MissingFieldError("lastName"))?,
            user_name: value.user_name.ok_or(MissingFieldError("userName"))?,
        })
    }
}

/// Raw `PUT /authors/{id}` body. The `id` must match the path id; the
/// remaining fields are merged into the stored record where present.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthorRequest {
    pub id: Option<Id<AuthorMarker>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

/// The partial-merge field set for an author update.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash)]
pub struct UpdateAuthorFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_name: Option<String>,
}

impl From<UpdateAuthorRequest> for UpdateAuthorFields {
    fn from(value: UpdateAuthorRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            user_name: value.user_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        Id,
        author::{Author, CreateAuthor, CreateAuthorRequest},
    };
    use bson::oid::ObjectId;

    fn author(first_name: &str, last_name: &str) -> Author {
        Author {
            id: Id::new(ObjectId::new()),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            user_name: "someone".to_string(),
        }
    }

    #[test]
    fn display_name_joins_first_and_last() {
        assert_eq!(author("Ada", "Lovelace").display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_trims_missing_halves() {
        assert_eq!(author("Ada", "").display_name(), "Ada");
        assert_eq!(author("", "Lovelace").display_name(), "Lovelace");
        assert_eq!(author("", "").display_name(), "");
    }

    #[test]
    fn create_request_reports_first_missing_field_in_order() {
        let empty = CreateAuthorRequest::default();
        assert_eq!(
            CreateAuthor::try_from(empty).unwrap_err().field(),
            "firstName"
        );

        let first_only = CreateAuthorRequest {
            first_name: Some("Ada".to_string()),
            ..CreateAuthorRequest::default()
        };
        assert_eq!(
            CreateAuthor::try_from(first_only).unwrap_err().field(),
            "lastName"
        );

        let no_user_name = CreateAuthorRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            ..CreateAuthorRequest::default()
        };
        assert_eq!(
            CreateAuthor::try_from(no_user_name).unwrap_err().field(),
            "userName"
        );
    }

    #[test]
    fn complete_create_request_converts() {
        let request = CreateAuthorRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            user_name: Some("ada".to_string()),
        };

        let fields = CreateAuthor::try_from(request).unwrap();
        assert_eq!(fields.first_name, "Ada");
        assert_eq!(fields.last_name, "Lovelace");
        assert_eq!(fields.user_name, "ada");
    }

    #[test]
    fn create_request_uses_wire_field_names() {
        let request: CreateAuthorRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "userName": "ada",
        }))
        .unwrap();

        assert_eq!(request.first_name.as_deref(), Some("Ada"));
        assert_eq!(request.user_name.as_deref(), Some("ada"));
    }
}
