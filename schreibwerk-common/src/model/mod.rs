pub mod author;
pub mod blogpost;

use bson::oid::ObjectId;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error, Unexpected},
};
use std::{fmt::Display, marker::PhantomData, str::FromStr};

/// Opaque document id, typed by the collection it belongs to.
///
/// Wraps the store-allocated [`ObjectId`] and appears on the wire (bodies
/// and paths) as its 24-character hex form.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct Id<Marker>(ObjectId, PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(object_id: ObjectId) -> Self {
        Self(object_id, PhantomData)
    }

    #[must_use]
    pub fn object_id(self) -> ObjectId {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> FromStr for Id<Marker> {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self::new)
    }
}

impl<Marker> From<ObjectId> for Id<Marker> {
    fn from(value: ObjectId) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<Id<Marker>> for ObjectId {
    fn from(value: Id<Marker>) -> Self {
        value.0
    }
}

impl<Marker> Serialize for Id<Marker> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de, Marker> Deserialize<'de> for Id<Marker> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex)
            .map(Self::new)
            .map_err(|_| Error::invalid_value(Unexpected::Str(&hex), &"a hex document id"))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Id, author::AuthorMarker};
    use bson::oid::ObjectId;

    #[test]
    fn serializes_as_hex_string() {
        let object_id = ObjectId::new();
        let id = Id::<AuthorMarker>::new(object_id);

        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(object_id.to_hex()));
    }

    #[test]
    fn deserializes_from_hex_string() {
        let object_id = ObjectId::new();
        let json = serde_json::Value::String(object_id.to_hex());

        let id: Id<AuthorMarker> = serde_json::from_value(json).unwrap();
        assert_eq!(id.object_id(), object_id);
    }

    #[test]
    fn rejects_malformed_hex() {
        let result =
            serde_json::from_value::<Id<AuthorMarker>>(serde_json::Value::String("nope".into()));
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_display() {
        let id = Id::<AuthorMarker>::new(ObjectId::new());
        let parsed: Id<AuthorMarker> = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
