pub mod error;
mod expand;
mod structural;

pub use error::ParseError;

use crate::Script;
use crate::template::TemplateRegistry;

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse the source text into a complete Script. Macro expansion
    /// consults the given template registry. On success the non-fatal
    /// diagnostics gathered along the way come back as warnings; on
    /// failure every error found in the pass is returned.
    pub fn parse(
        &self,
        templates: &TemplateRegistry,
    ) -> Result<(Script, Vec<ParseError>), Vec<ParseError>> {
        let (blocks, warnings) = structural::parse_blocks(&self.source, self.file_id, templates)?;
        Ok((
            Script {
                blocks,
                source_id: self.file_id,
            },
            warnings,
        ))
    }
}
