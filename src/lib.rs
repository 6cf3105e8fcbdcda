pub mod ast;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod convert;
pub mod evaluator;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod registry;
pub mod value;

pub use ast::{Expr, F, KeyPath, KeySegment, LookupKind, Token};
pub use config::{ConfigError, ConstraintConfig};
pub use constraint::{
    CheckConstraint, DeclarationError, ModelConstraints, ValidationError, Violation,
};
pub use evaluator::{BoundExpr, Truth, evaluate};
pub use lexer::{LexError, Lexer};
pub use model::{FieldType, Model, Record, RecordError};
pub use parser::{ParseError, Parser, parse_constraint};
pub use value::{FieldValue, Value};
