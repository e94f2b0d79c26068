//! `Display`/`FromStr` for wire-level status enums
//!
//! Dashboard status strings are lowercase on the wire (`online`,
//! `completed`, `claim`). The macro below keeps the enum, its `Display`
//! form and its case-insensitive parser in one table.
//!
//! ```rust
//! use dashops_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Uplink {
//!     Wan1,
//!     Wan2,
//! }
//!
//! impl_domain_status_conversions!(Uplink {
//!     Wan1 => "wan1",
//!     Wan2 => "wan2",
//! });
//!
//! assert_eq!(Uplink::Wan2.to_string(), "wan2");
//! assert_eq!("WAN1".parse::<Uplink>(), Ok(Uplink::Wan1));
//! ```

/// Implements `Display` (lowercase wire form) and case-insensitive `FromStr`.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
