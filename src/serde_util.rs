//! Deserialization helpers for the stringly-typed scalars the Zabbix API
//! returns: integers, booleans and enum codes all arrive as JSON strings,
//! numbers or null depending on the server version.

use serde::{Deserialize, Deserializer};

pub(crate) fn deserialize_i64<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeI64 {
        Int(i64),
        Str(String),
        Null,
    }

    match MaybeI64::deserialize(de)? {
        MaybeI64::Int(value) => Ok(value),
        MaybeI64::Str(value) => value.parse::<i64>().map_err(serde::de::Error::custom),
        MaybeI64::Null => Ok(0),
    }
}

pub(crate) fn deserialize_u64<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeU64 {
        Int(u64),
        Str(String),
        Null,
    }

    match MaybeU64::deserialize(de)? {
        MaybeU64::Int(value) => Ok(value),
        MaybeU64::Str(value) => value.parse::<u64>().map_err(serde::de::Error::custom),
        MaybeU64::Null => Ok(0),
    }
}

pub(crate) fn deserialize_bool<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Boolish {
        Bool(bool),
        Int(i64),
        Str(String),
        Null,
    }

    Ok(match Boolish::deserialize(de)? {
        Boolish::Bool(value) => value,
        Boolish::Int(value) => value != 0,
        Boolish::Str(value) => matches!(value.as_str(), "1" | "true" | "TRUE"),
        Boolish::Null => false,
    })
}

/// `skip_serializing_if` helper matching the wire convention that a
/// zero-valued coded field is simply left out of create payloads.
pub(crate) fn is_zero(value: &i64) -> bool {
    *value == 0
}

pub(crate) fn is_default<T>(value: &T) -> bool
where
    T: Default + PartialEq,
{
    *value == T::default()
}

/// Declares an integer-coded API enum: named variants for the documented
/// codes plus an `Unknown(code)` escape for anything newer servers add.
/// Serializes as the integer code; deserializes from an integer or its
/// string form.
macro_rules! zbx_code_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($(#[$vmeta:meta])* $variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        $vis enum $name {
            $($(#[$vmeta])* $variant,)+
            Unknown(i64),
        }

        impl $name {
            #[must_use]
            $vis fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code,)+
                    Self::Unknown(code) => code,
                }
            }

            #[must_use]
            $vis fn from_code(code: i64) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Unknown(other),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_code(0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_i64(self.code())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                crate::serde_util::deserialize_i64(deserializer).map(Self::from_code)
            }
        }
    };
}

pub(crate) use zbx_code_enum;
