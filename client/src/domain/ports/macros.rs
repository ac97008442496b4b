//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message and a snake-case constructor whose
//! parameters accept anything convertible into the field type, so adapters
//! can write `VehicleSourceError::decode("bad body")`.

macro_rules! define_port_error {
    // Unit variant: `Offline => "..."` becomes `fn offline() -> Self`.
    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    // Struct variant: one `impl Into<_>` parameter per field, in order.
    (@constructor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            #[must_use]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant {
                    $($field: $field.into()),*
                }
            }
        }
    };

    (
        $(#[$enum_attr:meta])*
        pub enum $error:ident {
            $(
                $(#[$attr:meta])*
                $variant:ident $({ $($field:ident : $ty:ty),* $(,)? })? => $display:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $error {
            $(
                $(#[$attr])*
                #[error($display)]
                $variant $({ $($field: $ty),* })?,
            )+
        }

        impl $error {
            $(define_port_error!(@constructor $variant $({ $($field : $ty),* })?);)+
        }
    };
}

pub(crate) use define_port_error;
