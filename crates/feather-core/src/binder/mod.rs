//! Object-graph binder: converts typed values to and from [`JsonValue`]
//! trees.
//!
//! Every bindable type implements [`Bind`]. Scalars and standard containers
//! are covered here; structured types get their impl from
//! [`json_record!`](crate::json_record) and C-like enums from
//! [`json_enum!`](crate::json_enum).
//!
//! ```
//! use feather_core::{binder, json_record, CodecOptions, JsonValue};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     label: Option<String>,
//! }
//! json_record!(Point { x, label });
//!
//! let options = CodecOptions::compact();
//! let tree = binder::to_tree(&Point { x: 3, label: None }, &options).unwrap();
//! assert_eq!(tree.get("label"), Some(&JsonValue::Null));
//! let back: Point = binder::from_tree(&tree, &options).unwrap();
//! assert_eq!(back, Point { x: 3, label: None });
//! ```

mod collections;
mod enums;
mod record;
mod scalars;

pub use collections::MapKey;
pub use record::{
    clear_member, decode_member, encode_member, record_from_tree, record_to_tree, type_name_of,
    Member, Record,
};
#[doc(hidden)]
pub use record::{skip_clear, skip_decode, skip_encode};
pub use scalars::{Bytes, MAX_SAFE_INTEGER};

use crate::error::{FeatherError, Result};
use crate::options::CodecOptions;
use crate::types::JsonValue;

/// Conversion between a typed value and a [`JsonValue`] tree.
pub trait Bind: Sized {
    /// Convert `self` into a tree. Nested values go through
    /// [`Binder::bind`] so options and the cycle guard carry through.
    fn to_tree(&self, binder: &mut Binder) -> Result<JsonValue>;

    /// Rebuild a value from a tree. Types without a decode rule keep the
    /// default, which fails with [`FeatherError::UnsupportedType`].
    fn from_tree(tree: &JsonValue, options: &CodecOptions) -> Result<Self> {
        let _ = (tree, options);
        Err(FeatherError::UnsupportedType {
            type_name: std::any::type_name::<Self>(),
        })
    }

    /// True when the value means "no value present" (`None`, a null tree).
    fn is_absent(&self) -> bool {
        false
    }

    /// The value a record member takes when its document entry is null.
    fn empty() -> Result<Self> {
        Err(FeatherError::UnsupportedType {
            type_name: std::any::type_name::<Self>(),
        })
    }
}

/// Per-call encode state: the options plus the identities of shared nodes
/// on the path currently being walked.
#[derive(Debug)]
pub struct Binder {
    options: CodecOptions,
    active: Vec<usize>,
}

impl Binder {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            active: Vec::new(),
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Convert a nested value.
    pub fn bind<T: Bind>(&mut self, value: &T) -> Result<JsonValue> {
        value.to_tree(self)
    }

    /// Push a shared node onto the active path, failing if it is already
    /// there.
    pub(crate) fn enter(&mut self, identity: usize, type_name: &'static str) -> Result<()> {
        if self.active.contains(&identity) {
            return Err(FeatherError::CyclicReference { type_name });
        }
        self.active.push(identity);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.active.pop();
    }
}

/// Convert a typed value into a tree.
pub fn to_tree<T: Bind>(value: &T, options: &CodecOptions) -> Result<JsonValue> {
    let result = Binder::new(*options).bind(value);
    if let Err(err) = &result {
        tracing::debug!(
            error = %err,
            target_type = std::any::type_name::<T>(),
            "binding to tree failed"
        );
    }
    result
}

/// Rebuild a typed value from a tree.
pub fn from_tree<T: Bind>(tree: &JsonValue, options: &CodecOptions) -> Result<T> {
    let result = T::from_tree(tree, options);
    if let Err(err) = &result {
        tracing::debug!(
            error = %err,
            target_type = std::any::type_name::<T>(),
            "binding from tree failed"
        );
    }
    result
}

/// Error for a tree whose variant the declared type cannot accept.
pub(crate) fn mismatch(expected: &'static str, tree: &JsonValue) -> FeatherError {
    FeatherError::TypeMismatch {
        expected,
        found: tree.kind(),
    }
}
