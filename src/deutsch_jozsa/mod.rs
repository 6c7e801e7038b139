//! Deutsch-Jozsa: decide whether an oracle is constant or balanced with a
//! single (ideal) oracle query.
//!
//! [`oracle`] turns an [`OracleSpec`] into gates and checks specs offline;
//! [`engine`] assembles the algorithm circuit and reads the answer back from
//! measurement counts.

pub mod engine;
pub mod oracle;

pub use engine::{Classification, DeutschJozsa, classify, interpret};
pub use oracle::{
    OracleCategory, OracleKind, OracleSpec, TruthTable, synthesize, validate_oracle,
};
