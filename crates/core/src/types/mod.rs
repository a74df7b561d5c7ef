//! Core types for the customer registry.
//!
//! This module provides type-safe wrappers for every field of a registration.
//! Each wrapper can only be constructed through its `parse` function, so a
//! value of the type is proof that the input passed validation.

pub mod color;
pub mod customer;
pub mod email;
pub mod id;
pub mod tax_id;
pub mod text;

pub use color::{ColorError, FavoriteColor};
pub use customer::{CustomerData, NormalizedCustomer, StoredCustomer};
pub use email::{Email, EmailError};
pub use id::*;
pub use tax_id::{TaxId, TaxIdError};
pub use text::{FullName, Notes, TextError};

/// Implements `sqlx` `Type`, `Encode` and `Decode` for a `String` newtype.
///
/// Database values are assumed valid: decoding skips validation, the same way
/// rows written by this crate were validated before insertion.
macro_rules! impl_text_sqlx {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(s))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

pub(crate) use impl_text_sqlx;
