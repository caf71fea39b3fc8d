//! Identifier types.
//!
//! Links, nodes, stops and travellers are opaque strings in the host
//! simulation. Each gets its own newtype so a stop id can never be passed
//! where a link id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// A link (directed edge) of the road network.
    LinkId
);

string_id!(
    /// A node (junction) of the road network.
    NodeId
);

string_id!(
    /// A designated boarding/alighting point of the service.
    StopId
);

string_id!(
    /// The traveller a trip is planned for. Only used in diagnostics.
    TravellerId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let link = LinkId::new("L7");
        assert_eq!(link.to_string(), "L7");
        assert_eq!(format!("{link:?}"), "LinkId(L7)");

        let stop = StopId::from("S1");
        assert_eq!(format!("{stop:?}"), "StopId(S1)");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut ids = vec![StopId::from("b"), StopId::from("a"), StopId::from("c")];
        ids.sort();
        assert_eq!(
            ids.iter().map(StopId::as_str).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn serde_is_transparent() {
        let link: LinkId = serde_json::from_str("\"L1\"").unwrap();
        assert_eq!(link, LinkId::from("L1"));
        assert_eq!(serde_json::to_string(&link).unwrap(), "\"L1\"");
    }
}
