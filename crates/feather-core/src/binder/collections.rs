//! Containers, maps and pointer types.
//!
//! Sequences become arrays and maps become objects; every element goes back
//! through [`Binder::bind`] / [`Bind::from_tree`], so nested records expand
//! to nested objects. Decoding always builds a fresh container.
//!
//! Map and sequence entries are decoded with the element type's own codec,
//! so a `null` entry only fits an element type that accepts null. Declare
//! `HashMap<String, Option<String>>` (or a [`JsonValue`] value type) when a
//! document may carry `{"k": null}`; `HashMap<String, String>` rejects it
//! with [`FeatherError::TypeMismatch`].
//!
//! `Rc` and `Arc` take part in the cycle guard: while one is being encoded
//! its pointer identity sits on the binder's active path, and meeting the
//! same allocation again fails with [`FeatherError::CyclicReference`].

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use super::{mismatch, Bind, Binder};
use crate::error::{FeatherError, Result};
use crate::options::CodecOptions;
use crate::types::{JsonValue, Map};

/// Map keys are JSON object keys, so they must round-trip through text.
pub trait MapKey: Sized {
    fn to_key(&self) -> String;
    fn from_key(key: &str) -> Result<Self>;
}

impl MapKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Result<Self> {
        Ok(key.to_string())
    }
}

macro_rules! integer_key {
    ($($t:ty),* $(,)?) => {$(
        impl MapKey for $t {
            fn to_key(&self) -> String {
                self.to_string()
            }

            fn from_key(key: &str) -> Result<Self> {
                key.parse().map_err(|_| {
                    FeatherError::scalar(
                        "map key",
                        format!("{:?} is not a valid {}", key, stringify!($t)),
                    )
                })
            }
        }
    )*};
}

integer_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn encode_items<'a, T, I>(items: I, binder: &mut Binder) -> Result<JsonValue>
where
    T: Bind + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .map(|item| binder.bind(item))
        .collect::<Result<Vec<_>>>()
        .map(JsonValue::Array)
}

fn decode_items<T: Bind, C: FromIterator<T>>(tree: &JsonValue, options: &CodecOptions) -> Result<C> {
    tree.as_array()
        .ok_or_else(|| mismatch("array", tree))?
        .iter()
        .map(|item| T::from_tree(item, options))
        .collect()
}

fn encode_entries<'a, K, V, I>(entries: I, binder: &mut Binder) -> Result<JsonValue>
where
    K: MapKey + 'a,
    V: Bind + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.to_key(), binder.bind(value)?);
    }
    Ok(JsonValue::Object(map))
}

fn decode_entries<K, V, C>(tree: &JsonValue, options: &CodecOptions) -> Result<C>
where
    K: MapKey,
    V: Bind,
    C: FromIterator<(K, V)>,
{
    tree.as_object()
        .ok_or_else(|| mismatch("object", tree))?
        .iter()
        .map(|(key, value)| Ok((K::from_key(key)?, V::from_tree(value, options)?)))
        .collect()
}

impl<T: Bind> Bind for Option<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        match self {
            Some(value) => binder.bind(value),
            None => Ok(JsonValue::Null),
        }
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        if tree.is_null() {
            Ok(None)
        } else {
            T::from_tree(tree, options).map(Some)
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn empty() -> Result<Self> {
        Ok(None)
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_items(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_items(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(Vec::new())
    }
}

impl<T: Bind> Bind for VecDeque<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_items(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_items(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(VecDeque::new())
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_items(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_items(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(BTreeSet::new())
    }
}

impl<T, S> Bind for HashSet<T, S>
where
    T: Bind + Eq + Hash,
    S: BuildHasher + Default,
{
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_items(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_items(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(HashSet::default())
    }
}

impl<K, V, S> Bind for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_entries(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_entries(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(IndexMap::default())
    }
}

impl<K: MapKey + Ord, V: Bind> Bind for BTreeMap<K, V> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_entries(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_entries(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(BTreeMap::new())
    }
}

impl<K, V, S> Bind for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Bind,
    S: BuildHasher + Default,
{
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        encode_entries(self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        decode_entries(tree, options)
    }

    fn empty() -> Result<Self> {
        Ok(HashMap::default())
    }
}

impl<T: Bind> Bind for Box<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        binder.bind(&**self)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        T::from_tree(tree, options).map(Box::new)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn empty() -> Result<Self> {
        T::empty().map(Box::new)
    }
}

/// Encode a shared node with its allocation on the active path.
fn bind_shared<T: Bind>(value: &T, binder: &mut Binder) -> Result<JsonValue> {
    let identity = value as *const T as usize;
    binder.enter(identity, std::any::type_name::<T>())?;
    let tree = binder.bind(value);
    binder.leave();
    tree
}

impl<T: Bind> Bind for Rc<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        bind_shared(&**self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        T::from_tree(tree, options).map(Rc::new)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn empty() -> Result<Self> {
        T::empty().map(Rc::new)
    }
}

impl<T: Bind> Bind for Arc<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        bind_shared(&**self, binder)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        T::from_tree(tree, options).map(Arc::new)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }

    fn empty() -> Result<Self> {
        T::empty().map(Arc::new)
    }
}

impl<T: Bind> Bind for RefCell<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        let inner = self.try_borrow().map_err(|_| {
            FeatherError::Encode(format!(
                "`{}` is mutably borrowed",
                std::any::type_name::<T>()
            ))
        })?;
        binder.bind(&*inner)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        T::from_tree(tree, options).map(RefCell::new)
    }

    fn is_absent(&self) -> bool {
        self.try_borrow().is_ok_and(|inner| inner.is_absent())
    }

    fn empty() -> Result<Self> {
        T::empty().map(RefCell::new)
    }
}

impl<T: Bind> Bind for Mutex<T> {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        let inner = self.try_lock().map_err(|e| {
            FeatherError::Encode(format!(
                "`{}` cannot be locked: {e}",
                std::any::type_name::<T>()
            ))
        })?;
        binder.bind(&*inner)
    }

    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        T::from_tree(tree, options).map(Mutex::new)
    }

    fn is_absent(&self) -> bool {
        self.try_lock().is_ok_and(|inner| inner.is_absent())
    }

    fn empty() -> Result<Self> {
        T::empty().map(Mutex::new)
    }
}

/// A dynamic member: the tree is taken as-is. With `omit_null_or_undefined`
/// set, null-like object entries are dropped at every level.
impl Bind for JsonValue {
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue> {
        if binder.options().omit_null_or_undefined {
            Ok(strip_null_like(self))
        } else {
            Ok(self.clone())
        }
    }

    fn from_tree(tree: &JsonValue, _options: &CodecOptions) -> Result<Self> {
        Ok(tree.clone())
    }

    fn is_absent(&self) -> bool {
        self.is_null()
    }

    fn empty() -> Result<Self> {
        Ok(JsonValue::Null)
    }
}

fn strip_null_like(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => map
            .iter()
            .filter(|(_, v)| !v.is_null_like())
            .map(|(k, v)| (k.clone(), strip_null_like(v)))
            .collect(),
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(strip_null_like).collect()),
        other => other.clone(),
    }
}
