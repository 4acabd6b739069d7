//! Field mapping between two versions of the same type.
//!
//! [`MapFrom`] is implemented for all leaf types which look the same in every version, and
//! element-wise for [`Vec`], [`Option`] and [`BTreeMap`]. Versioned structs implement it
//! with [`map_fields!`](crate::map_fields), listing the fields both versions share.
use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::{ObjectReference, SecretReference, TypedLocalObjectReference},
    apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time},
};
use snafu::Snafu;

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum MappingError {
    #[snafu(display("value {value:?} of field {field:?} is not supported by {api_version}"))]
    UnsupportedValue {
        field: String,
        value: String,
        api_version: String,
    },
}

/// Fallible conversion of a value into its counterpart in another version.
pub trait MapFrom<T>: Sized {
    fn map_from(value: T) -> Result<Self, MappingError>;
}

/// The reciprocal of [`MapFrom`], implemented for every type `MapFrom` is implemented for.
pub trait MapInto<T> {
    fn map_into(self) -> Result<T, MappingError>;
}

impl<T, U> MapInto<U> for T
where
    U: MapFrom<T>,
{
    fn map_into(self) -> Result<U, MappingError> {
        U::map_from(self)
    }
}

impl<T, U> MapFrom<Vec<T>> for Vec<U>
where
    U: MapFrom<T>,
{
    fn map_from(value: Vec<T>) -> Result<Self, MappingError> {
        value.into_iter().map(U::map_from).collect()
    }
}

impl<T, U> MapFrom<Option<T>> for Option<U>
where
    U: MapFrom<T>,
{
    fn map_from(value: Option<T>) -> Result<Self, MappingError> {
        value.map(U::map_from).transpose()
    }
}

impl<K, T, U> MapFrom<BTreeMap<K, T>> for BTreeMap<K, U>
where
    K: Ord,
    U: MapFrom<T>,
{
    fn map_from(value: BTreeMap<K, T>) -> Result<Self, MappingError> {
        value
            .into_iter()
            .map(|(key, value)| Ok((key, U::map_from(value)?)))
            .collect()
    }
}

macro_rules! identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MapFrom<$ty> for $ty {
                fn map_from(value: $ty) -> Result<Self, MappingError> {
                    Ok(value)
                }
            }
        )*
    };
}

identity!(
    bool,
    i32,
    i64,
    u32,
    String,
    ObjectMeta,
    ObjectReference,
    SecretReference,
    Time,
    TypedLocalObjectReference,
);

/// Implements [`MapFrom`] for a pair of structs by mapping every listed field.
///
/// Fields listed under `defaults` only exist in the target and are initialized with their
/// [`Default`] value. Fields of the source which are not listed are dropped.
///
/// ```
/// use metal3_versioned::{map_fields, mapping::MapInto};
///
/// mod v1 {
///     pub struct Link { pub id: String, pub mtu: i32 }
/// }
///
/// mod v2 {
///     pub struct Link { pub id: String, pub mtu: i32, pub policy: Option<String> }
/// }
///
/// map_fields!(v1::Link => v2::Link { id, mtu }, defaults { policy });
/// map_fields!(v2::Link => v1::Link { id, mtu });
///
/// let upgraded: v2::Link = v1::Link { id: "eth0".to_owned(), mtu: 9000 }.map_into().unwrap();
/// assert_eq!(upgraded.policy, None);
/// ```
#[macro_export]
macro_rules! map_fields {
    (
        $from:ty => $to:ty { $($field:ident),* $(,)? }
        $(, defaults { $($default:ident),* $(,)? })?
    ) => {
        impl $crate::mapping::MapFrom<$from> for $to {
            #[allow(unused_variables)]
            fn map_from(
                value: $from,
            ) -> ::std::result::Result<Self, $crate::mapping::MappingError> {
                ::std::result::Result::Ok(Self {
                    $($field: $crate::mapping::MapFrom::map_from(value.$field)?,)*
                    $($($default: ::std::default::Default::default(),)*)?
                })
            }
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Policy {
        Layer2,
    }

    impl MapFrom<String> for Policy {
        fn map_from(value: String) -> Result<Self, MappingError> {
            match value.as_str() {
                "layer2" => Ok(Self::Layer2),
                _ => UnsupportedValueSnafu {
                    field: "policy",
                    value,
                    api_version: "v2",
                }
                .fail(),
            }
        }
    }

    #[test]
    fn collections_map_element_wise() {
        let mapped: Vec<Option<Policy>> =
            vec![Some("layer2".to_owned()), None].map_into().unwrap();

        assert_eq!(mapped, vec![Some(Policy::Layer2), None]);
    }

    #[test]
    fn first_failure_is_reported() {
        let err = BTreeMap::<String, Policy>::map_from(BTreeMap::from([
            ("bond0".to_owned(), "layer2".to_owned()),
            ("bond1".to_owned(), "layer5".to_owned()),
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            MappingError::UnsupportedValue {
                field: "policy".to_owned(),
                value: "layer5".to_owned(),
                api_version: "v2".to_owned(),
            }
        );
    }
}
