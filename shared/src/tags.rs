//! Enum tags persisted as text
//!
//! Every enumeration that is written to the database or exchanged over JSON
//! carries a fixed SCREAMING_SNAKE_CASE tag. `tagged_enum!` generates the
//! enum together with `as_str`, `Display`, `FromStr` and an `ALL` table so the
//! tag spelling lives in exactly one place.

macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $tag)] $variant ),+
        }

        impl $name {
            /// Every variant in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored tag for this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::errors::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($tag => Ok($name::$variant),)+
                    _ => Err($crate::errors::ParseEnumError::new($kind, s)),
                }
            }
        }
    };
}

pub(crate) use tagged_enum;
