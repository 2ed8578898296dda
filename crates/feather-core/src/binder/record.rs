//! Structured types: member tables and the `json_record!` macro.
//!
//! A record is visited through a static table of [`Member`] descriptors, one
//! per listed field, in the order the fields were listed. That order is the
//! key order of the encoded object. Only listed fields exist as far as the
//! binder is concerned, so a record that embeds another struct does not
//! expose the embedded struct's members.

use super::{mismatch, Bind, Binder};
use crate::error::Result;
use crate::options::CodecOptions;
use crate::types::{JsonValue, Map};

/// Descriptor for one member of a record type `T`.
pub struct Member<T> {
    pub name: &'static str,
    /// Never written on encode, never read on decode.
    pub excluded: bool,
    /// False for members without a setter; decode leaves them untouched.
    pub writable: bool,
    /// Declared type of the member, reported in member errors.
    pub type_name: fn(&T) -> &'static str,
    /// `Ok(None)` when the member currently holds no value.
    pub encode: fn(&T, &mut Binder) -> Result<Option<JsonValue>>,
    pub decode: fn(&mut T, &JsonValue, &CodecOptions) -> Result<()>,
    /// Reset the member to its empty value.
    pub clear: fn(&mut T) -> Result<()>,
}

impl<T> std::fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("excluded", &self.excluded)
            .field("writable", &self.writable)
            .finish_non_exhaustive()
    }
}

/// A structured type with a fixed member table.
pub trait Record: Sized + 'static {
    const NAME: &'static str;

    fn members() -> &'static [Member<Self>];

    /// Build the instance that decoding fills in.
    fn instantiate() -> Result<Self>;
}

pub fn encode_member<F: Bind>(value: &F, binder: &mut Binder) -> Result<Option<JsonValue>> {
    if value.is_absent() {
        return Ok(None);
    }
    binder.bind(value).map(Some)
}

pub fn decode_member<F: Bind>(slot: &mut F, tree: &JsonValue, options: &CodecOptions) -> Result<()> {
    *slot = F::from_tree(tree, options)?;
    Ok(())
}

pub fn clear_member<F: Bind>(slot: &mut F) -> Result<()> {
    *slot = F::empty()?;
    Ok(())
}

pub fn type_name_of<F>(_: &F) -> &'static str {
    std::any::type_name::<F>()
}

/// Accessor used for excluded members, which are never encoded.
#[doc(hidden)]
pub fn skip_encode<T>(_: &T, _: &mut Binder) -> Result<Option<JsonValue>> {
    Ok(None)
}

/// Accessor used for excluded members, which are never decoded.
#[doc(hidden)]
pub fn skip_decode<T>(_: &mut T, _: &JsonValue, _: &CodecOptions) -> Result<()> {
    Ok(())
}

#[doc(hidden)]
pub fn skip_clear<T>(_: &mut T) -> Result<()> {
    Ok(())
}

/// Build an object from a record's members, in table order.
pub fn record_to_tree<T: Record>(record: &T, binder: &mut Binder) -> Result<JsonValue> {
    let omit = binder.options().omit_null_or_undefined;
    let mut map = Map::with_capacity(T::members().len());
    for member in T::members() {
        if member.excluded {
            tracing::trace!(record = T::NAME, member = member.name, "skipping excluded member");
            continue;
        }
        let value = (member.encode)(record, binder)
            .map_err(|err| err.in_member(member.name, (member.type_name)(record)))?;
        match value {
            Some(value) if !(omit && value.is_null_like()) => {
                map.insert(member.name.to_string(), value);
            }
            _ if omit => {
                tracing::trace!(record = T::NAME, member = member.name, "omitting null member");
            }
            _ => {
                map.insert(member.name.to_string(), JsonValue::Null);
            }
        }
    }
    Ok(JsonValue::Object(map))
}

/// Fill a fresh instance from an object. Members missing from the object
/// keep the value the instance was created with.
pub fn record_from_tree<T: Record>(tree: &JsonValue, options: &CodecOptions) -> Result<T> {
    let map = tree.as_object().ok_or_else(|| mismatch("object", tree))?;
    let mut record = T::instantiate()?;
    for member in T::members() {
        let Some(value) = map.get(member.name) else {
            continue;
        };
        if !member.writable {
            tracing::trace!(record = T::NAME, member = member.name, "skipping read-only member");
            continue;
        }
        if member.excluded {
            tracing::trace!(record = T::NAME, member = member.name, "skipping excluded member");
            continue;
        }
        let applied = if value.is_null_like() {
            if options.omit_null_or_undefined {
                tracing::trace!(record = T::NAME, member = member.name, "ignoring null member");
                continue;
            }
            (member.clear)(&mut record)
        } else {
            (member.decode)(&mut record, value, options)
        };
        applied.map_err(|err| err.in_member(member.name, (member.type_name)(&record)))?;
    }
    Ok(record)
}

/// Implement [`Record`] and [`Bind`](crate::binder::Bind) for a struct from
/// the list of its bound fields.
///
/// Fields are visited in the order listed. `#[skip]` excludes a field in both
/// directions and `#[readonly]` keeps it out of decoding. The plain form
/// builds decode targets with `Default::default()`; the
/// `as uninstantiable` form is for encode-only types and fails every decode
/// with [`FeatherError::Uninstantiable`](crate::FeatherError::Uninstantiable).
///
/// ```
/// use feather_core::{from_str, json_record, to_string, CodecOptions};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Account {
///     id: u32,
///     session: Option<String>,
///     owner: String,
/// }
/// json_record!(Account { id, #[skip] session, owner });
///
/// let account = Account { id: 7, session: Some("s".into()), owner: "ana".into() };
/// let text = to_string(&account, &CodecOptions::compact()).unwrap();
/// assert_eq!(text, r#"{"id":7,"owner":"ana"}"#);
/// let back: Account = from_str(&text, &CodecOptions::compact()).unwrap();
/// assert_eq!(back.session, None);
/// ```
#[macro_export]
macro_rules! json_record {
    (@impl $ty:ty, $instantiate:expr, { $( [$($flag:ident)*] $field:ident ),* }) => {
        impl $crate::binder::Record for $ty {
            const NAME: &'static str = stringify!($ty);

            fn members() -> &'static [$crate::binder::Member<Self>] {
                static MEMBERS: &[$crate::binder::Member<$ty>] = &[
                    $( $crate::__json_member!($ty, $field, [$($flag)*], true) ),*
                ];
                MEMBERS
            }

            fn instantiate() -> $crate::Result<Self> {
                $instantiate
            }
        }

        impl $crate::binder::Bind for $ty {
            fn to_tree(
                &self,
                binder: &mut $crate::binder::Binder,
            ) -> $crate::Result<$crate::JsonValue> {
                $crate::binder::record_to_tree(self, binder)
            }

            fn from_tree(
                tree: &$crate::JsonValue,
                options: &$crate::CodecOptions,
            ) -> $crate::Result<Self> {
                $crate::binder::record_from_tree(tree, options)
            }

            fn empty() -> $crate::Result<Self> {
                <Self as $crate::binder::Record>::instantiate()
            }
        }
    };
    ($ty:ty as uninstantiable { $( $(#[$flag:ident])* $field:ident ),* $(,)? }) => {
        $crate::json_record!(@impl $ty,
            Err($crate::FeatherError::Uninstantiable { type_name: stringify!($ty) }),
            { $( [$($flag)*] $field ),* });
    };
    ($ty:ty { $( $(#[$flag:ident])* $field:ident ),* $(,)? }) => {
        $crate::json_record!(@impl $ty,
            Ok(<$ty as ::core::default::Default>::default()),
            { $( [$($flag)*] $field ),* });
    };
}

/// One member-table entry; flags are consumed left to right.
#[doc(hidden)]
#[macro_export]
macro_rules! __json_member {
    ($ty:ty, $field:ident, [], $writable:tt) => {
        $crate::binder::Member::<$ty> {
            name: stringify!($field),
            excluded: false,
            writable: $writable,
            type_name: |record| $crate::binder::type_name_of(&record.$field),
            encode: |record, binder| $crate::binder::encode_member(&record.$field, binder),
            decode: |record, tree, options| {
                $crate::binder::decode_member(&mut record.$field, tree, options)
            },
            clear: |record| $crate::binder::clear_member(&mut record.$field),
        }
    };
    ($ty:ty, $field:ident, [skip $($rest:ident)*], $writable:tt) => {
        $crate::binder::Member::<$ty> {
            name: stringify!($field),
            excluded: true,
            writable: false,
            type_name: |record| $crate::binder::type_name_of(&record.$field),
            encode: $crate::binder::skip_encode,
            decode: $crate::binder::skip_decode,
            clear: $crate::binder::skip_clear,
        }
    };
    ($ty:ty, $field:ident, [readonly $($rest:ident)*], $writable:tt) => {
        $crate::__json_member!($ty, $field, [$($rest)*], false)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{from_tree, to_tree};
    use crate::error::FeatherError;
    use crate::parser::parse;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        name: String,
        note: Option<String>,
        hidden: u8,
        fixed: i32,
    }
    crate::json_record!(Sample { name, note, #[skip] hidden, #[readonly] fixed });

    fn tree(text: &str) -> JsonValue {
        parse(text).unwrap().unwrap()
    }

    #[test]
    fn test_member_table() {
        let members = Sample::members();
        let names: Vec<&str> = members.iter().map(|m| m.name).collect();
        assert_eq!(names, ["name", "note", "hidden", "fixed"]);
        assert!(members[2].excluded);
        assert!(!members[3].writable);
        assert!((members[1].type_name)(&Sample::default()).contains("Option"));
    }

    #[test]
    fn test_readonly_member_is_encoded_not_decoded() {
        let sample = Sample { fixed: 9, ..Sample::default() };
        let encoded = to_tree(&sample, &CodecOptions::default()).unwrap();
        assert_eq!(encoded.get("fixed"), Some(&JsonValue::Number(9.0)));

        let back: Sample = from_tree(&tree(r#"{"fixed":3}"#), &CodecOptions::default()).unwrap();
        assert_eq!(back.fixed, 0);
    }

    #[test]
    fn test_null_like_clears_or_is_ignored() {
        let input = tree(r#"{"name":"undefined","note":null}"#);
        let back: Sample = from_tree(&input, &CodecOptions::default()).unwrap();
        assert_eq!(back.name, "");
        assert_eq!(back.note, None);
    }

    #[test]
    fn test_member_error_names_the_member() {
        let err = from_tree::<Sample>(&tree(r#"{"name":5}"#), &CodecOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            FeatherError::Member { member: "name", declared, .. } if declared.ends_with("String")
        ));
        assert!(matches!(err.root_cause(), FeatherError::TypeMismatch { expected: "string", .. }));
    }

    #[test]
    fn test_non_object_tree_rejected() {
        let err = from_tree::<Sample>(&tree("[]"), &CodecOptions::default()).unwrap_err();
        assert_eq!(
            err,
            FeatherError::TypeMismatch {
                expected: "object",
                found: "array"
            }
        );
    }
}
