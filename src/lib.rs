//! Static extraction of tagged literal values and function names from Go
//! source files.
//!
//! A spec inside a `var ( ... )` or `const ( ... )` group opts in with a doc
//! comment naming a tag:
//!
//! ```
//! use goscan::{GoSource, TagSet};
//!
//! let src = GoSource::parse("package demo\n\nvar (\n\t// config\n\tretries = 3\n)\n").unwrap();
//! let found = src.scalar_values::<i64>(&TagSet::from(["config"]));
//! assert_eq!(found[0].name, "retries");
//! assert_eq!(found[0].value, 3);
//! ```
//!
//! Nothing is evaluated: only initializers written as literals are read.

pub mod collection;
pub mod error;
pub mod extract;
pub mod funcs;
pub mod literal;
pub mod source;
pub mod value;

pub use error::{Error, Result};
pub use extract::{Record, TagSet};
pub use goscan_syntax::ParseOptions;
pub use indexmap::IndexMap;
pub use literal::decode_literal;
pub use source::GoSource;
pub use value::{Primitive, PrimitiveKind, Value};
