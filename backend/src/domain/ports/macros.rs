//! Helper macro generating port error enums.
//!
//! Each variant gets a snake_case constructor taking `impl Into<_>` fields,
//! and the trailing `domain` block maps variants onto [`crate::domain::Error`]
//! constructors so services and handlers can use `?` on port results.

macro_rules! define_port_error {
    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[allow(dead_code, reason = "not every port constructs every variant")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
        domain {
            $($mapped:ident => $ctor:ident),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant { $($field : $ty),* });
            )*
        }

        impl From<$name> for $crate::domain::Error {
            fn from(error: $name) -> Self {
                let message = error.to_string();
                match error {
                    $( $name::$mapped { .. } => $crate::domain::Error::$ctor(message), )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;
