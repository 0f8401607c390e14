//! ID newtypes and lookup helpers shared across the model.
use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::collections::HashSet;

/// A trait alias covering the operations every ID type supports
pub trait IDLike:
    Eq + std::hash::Hash + std::borrow::Borrow<str> + Clone + std::fmt::Display + From<String>
{
}
impl<T> IDLike for T where
    T: Eq + std::hash::Hash + std::borrow::Borrow<str> + Clone + std::fmt::Display + From<String>
{
}

macro_rules! define_id_type {
    ($name:ident) => {
        /// An identifier backed by a shared string
        #[derive(
            Clone, Debug, PartialEq, Eq, std::hash::Hash, serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub std::rc::Rc<str>);

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }
    };
}
pub(crate) use define_id_type;

#[cfg(test)]
define_id_type!(GenericID);

/// Indicates that the struct has an ID field
pub trait HasID<ID: IDLike> {
    /// Get the struct's ID
    fn get_id(&self) -> &ID;
}

/// Implement [`HasID`] for a type whose ID lives in a field called `id`
macro_rules! define_id_getter {
    ($t:ty, $id_ty:ty) => {
        impl crate::id::HasID<$id_ty> for $t {
            fn get_id(&self) -> &$id_ty {
                &self.id
            }
        }
    };
}
pub(crate) use define_id_getter;

/// A set of known IDs against which input files are validated
pub trait IDCollection<ID: IDLike> {
    /// Look up the ID matching `id`, returning a cheap copy of the stored value.
    ///
    /// Input readers call this so that every struct holding the ID shares one allocation.
    fn get_id_by_str(&self, id: &str) -> Result<ID>;
}

fn lookup_id<ID: IDLike>(found: Option<&ID>, id: &str) -> Result<ID> {
    let found = found.with_context(|| format!("Unknown ID {id} found"))?;
    Ok(found.clone())
}

impl<ID: IDLike> IDCollection<ID> for HashSet<ID> {
    fn get_id_by_str(&self, id: &str) -> Result<ID> {
        lookup_id(self.get(id), id)
    }
}

impl<ID: IDLike> IDCollection<ID> for IndexSet<ID> {
    fn get_id_by_str(&self, id: &str) -> Result<ID> {
        lookup_id(self.get(id), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;

    #[test]
    fn test_get_id_by_str_hash_set() {
        let ids: HashSet<GenericID> = ["A".into(), "B".into()].into_iter().collect();
        assert_eq!(ids.get_id_by_str("A").unwrap(), GenericID::new("A"));
        assert_error!(ids.get_id_by_str("C"), "Unknown ID C found");
    }

    #[test]
    fn test_get_id_by_str_index_set() {
        let ids: IndexSet<GenericID> = ["A".into()].into_iter().collect();
        assert_eq!(ids.get_id_by_str("A").unwrap(), GenericID::new("A"));
        assert_error!(ids.get_id_by_str("B"), "Unknown ID B found");
    }
}
