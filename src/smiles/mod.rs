mod builder;
pub mod error;
mod parse_tree;
mod tokenizer;
mod writer;

use crate::mol::Mol;
pub use error::SmilesError;
pub use writer::to_smiles;

/// Parses a SMILES string into a molecular graph.
///
/// Aromatic bonds stay aromatic (no kekulization), implicit hydrogen
/// counts are filled in from default valences, and stereo annotations
/// are resolved onto atoms and bonds.
pub fn parse_smiles(s: &str) -> Result<Mol, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tree = parse_tree::build_parse_tree(&tokens)?;
    Ok(builder::build_mol(&tree))
}
