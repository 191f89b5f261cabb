use std::{borrow::Cow, fmt, hash, marker::PhantomData, str::FromStr};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

/// Implemented by every entity that is addressed by an id in the document
/// store. The id type is chosen by the entity.
pub trait HasId {
    type IdType;
}

/// A typed id. `Id<Trip>` and `Id<User>` are different types even though both
/// wrap a `String`, so they can not be mixed up by accident.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }

    pub fn into_inner(self) -> T::IdType {
        self.0
    }

    /// Reinterprets the id as the id of another entity with the same id type.
    pub fn cast<U>(self) -> Id<U>
    where
        U: HasId<IdType = T::IdType>,
    {
        Id::new(self.0)
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: Clone,
{
    pub fn raw(&self) -> T::IdType {
        self.0.clone()
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: AsRef<str>,
{
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }
}

impl<T: HasId> FromStr for Id<T>
where
    T::IdType: FromStr,
{
    type Err = <T::IdType as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: HasId> hash::Hash for Id<T>
where
    T::IdType: hash::Hash,
{
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T: HasId> Eq for Id<T> where T::IdType: Eq {}

// serde and schemars can not derive through the phantom type parameter, so the
// id is (de)serialized as its bare inner value.

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::IdType::deserialize(deserializer).map(Id::new)
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: HasId + JsonSchema> JsonSchema for Id<T> {
    fn schema_name() -> String {
        format!("{}Id", T::schema_name())
    }

    fn schema_id() -> Cow<'static, str> {
        Cow::Borrowed(concat!(module_path!(), "::Id"))
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::String.into()),
            format: Some("id".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Driver;

    impl HasId for Driver {
        type IdType = String;
    }

    struct Passenger;

    impl HasId for Passenger {
        type IdType = String;
    }

    #[test]
    fn serializes_as_inner_value() {
        let id: Id<Driver> = Id::new("u-42".to_owned());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"u-42\"");

        let parsed: Id<Driver> = serde_json::from_str("\"u-42\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn cast_keeps_inner_value() {
        let driver: Id<Driver> = "u-7".parse().unwrap();
        let passenger: Id<Passenger> = driver.clone().cast();
        assert_eq!(passenger.as_str(), driver.as_str());
        assert_eq!(format!("{passenger}"), "u-7");
    }
}
