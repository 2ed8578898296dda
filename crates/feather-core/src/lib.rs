//! # feather-core
//!
//! A self-contained JSON codec: a hand-written lexer and recursive-descent
//! parser, an encoder with optional pretty-printing, and an object-graph
//! binder that maps typed values to and from a generic [`JsonValue`] tree.
//!
//! ## Quick start
//!
//! ```rust
//! use feather_core::{from_str, json_record, to_string, Bytes, CodecOptions};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Upload {
//!     name: String,
//!     payload: Bytes,
//!     tags: Vec<String>,
//! }
//! json_record!(Upload { name, payload, tags });
//!
//! let upload = Upload {
//!     name: "a.bin".into(),
//!     payload: Bytes(vec![0x41, 0x42]),
//!     tags: vec!["x".into()],
//! };
//! let options = CodecOptions::compact();
//! let text = to_string(&upload, &options).unwrap();
//! assert_eq!(text, r#"{"name":"a.bin","payload":"QUI=","tags":["x"]}"#);
//! assert_eq!(from_str::<Upload>(&text, &options).unwrap(), upload);
//! ```
//!
//! ## Modules
//!
//! - [`lexer`] -- token classification over a byte cursor
//! - [`parser`] -- JSON text to [`JsonValue`]
//! - [`encoder`] -- [`JsonValue`] to JSON text, compact or pretty
//! - [`binder`] -- typed values to and from [`JsonValue`] ([`Bind`], [`json_record!`], [`json_enum!`])
//! - [`codec`] -- one-call `to_string` / `from_str`
//! - [`options`] -- [`CodecOptions`]
//! - [`error`] -- [`FeatherError`]

pub mod binder;
pub mod codec;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod types;

pub use binder::{from_tree, to_tree, Bind, Binder, Bytes, MapKey, Member, Record};
pub use codec::{from_str, to_string};
pub use encoder::encode;
pub use error::{FeatherError, Result};
pub use options::CodecOptions;
pub use parser::parse;
pub use types::{JsonValue, Map};
