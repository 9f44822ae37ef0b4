//! Helper macro for generating domain port error enums.
//!
//! Port errors are plain `thiserror` enums with snake_case constructor
//! functions so call sites can write `Error::query("...")` instead of
//! spelling out struct variants.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
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

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Construct [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Example error for macro coverage.
        pub enum ExamplePortError {
            Conflict { code: String } => "conflict on {code}",
            Query { message: String, attempts: u32 } => "query failed: {message} ({attempts})",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::conflict("W01");
        assert_eq!(err.to_string(), "conflict on W01");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::query("timeout", 3_u32);
        assert_eq!(err.to_string(), "query failed: timeout (3)");
    }
}
