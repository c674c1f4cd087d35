//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The ByteMe backend
//! issues opaque object-ID strings, so the wrappers are `String`-backed.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use byteme_core::define_id;
/// define_id!(AdminId);
/// define_id!(VendorId);
///
/// let admin_id = AdminId::new("66f1a2b3c4d5e6f7a8b9c0d1");
/// let vendor_id = VendorId::new("66f1a2b3c4d5e6f7a8b9c0d2");
///
/// // These are different types, so this won't compile:
/// // let _: AdminId = vendor_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(AdminId);
define_id!(VendorId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(GrantId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let id = AdminId::new("66f1a2b3c4d5e6f7a8b9c0d1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"66f1a2b3c4d5e6f7a8b9c0d1\"");

        let parsed: AdminId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display() {
        let id = OrderId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
    }

    #[test]
    fn test_conversions() {
        let id: VendorId = "v1".into();
        assert_eq!(id.as_str(), "v1");
        let s: String = id.into();
        assert_eq!(s, "v1");
    }
}
