// Mapping DSL and lenient cell parsing

pub mod ast;
pub mod lexer;
pub mod number;
pub mod pipeline;

// Public API re-exports
pub use ast::{Command, GridSpec, MappingSpec};
pub use number::{parse_cell, parse_float};
pub use pipeline::parse_mapping_spec;

/// Parse a mapping pipeline, rejecting any unparsed input
pub fn parse_mapping(input: &str) -> anyhow::Result<MappingSpec> {
    match parse_mapping_spec(input) {
        Ok((_, spec)) => Ok(spec),
        Err(e) => Err(anyhow::anyhow!("Parse error in mapping '{}': {:?}", input, e)),
    }
}
