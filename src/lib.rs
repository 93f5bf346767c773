//! Compiles delimited boolean filter expressions into search-engine query trees.
//!
//! ```text
//! "{||__||a=1||__||and||__||(||__||b>2||__||or||__||c~[x,y]||__||)||__||}"
//!   └─ lexer      → tokens
//!   └─ validator  → brackets balanced?
//!   └─ postfix    → a=1 b>2 c~[x,y] or and
//!   └─ builder    → And([Match(a,1), Or([Range(b,gt,2), Terms(c,[x,y])])])
//!   └─ es_query   → {"bool": {"must": [...]}}
//! ```

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod error;
pub mod es_query;
pub mod handlers;
pub mod lexer;
pub mod postfix;
pub mod token;
pub mod validator;

pub use ast::{QueryNode, RangeKind};
pub use compiler::{compile_key_value, compile_value_only, FilterCompiler};
pub use config::{CompilerConfig, ConfigError};
pub use error::CompileError;
pub use es_query::RenderError;
pub use lexer::{tokenize, DEFAULT_DELIMITER};
