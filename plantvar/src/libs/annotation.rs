use std::collections::HashMap;
use std::io::{self, BufRead};
use std::path::Path;

use color_eyre::Result;
use itertools::Itertools;

use crate::io::{get_input, read_lossy_line};

/// Joins the description columns of an annotation row
pub const FIELD_DELIMITER: &str = "_%_";

/// Written for genes without a description
pub const NOT_AVAILABLE: &str = "n/a";

/// Functional description per gene ID, loaded once and only read afterwards.
#[derive(Debug, Default, Clone)]
pub struct AnnotationLookup {
    descriptions: HashMap<String, String>,
}

impl AnnotationLookup {
    /// No path means no enrichment, not an error
    pub fn from_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let input = get_input(Some(path.to_path_buf()))?;
                let lookup = Self::from_reader(io::BufReader::new(input))?;
                tracing::info!("Loaded {} gene annotations from {path:?}", lookup.len());
                Ok(lookup)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut descriptions = HashMap::new();
        let mut buf = Vec::new();

        while let Some(line) = read_lossy_line(&mut reader, &mut buf)? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split('\t');
            if let Some(gene_id) = fields.next() {
                let description = fields.join(FIELD_DELIMITER);
                descriptions.insert(gene_id.to_string(), description);
            }
        }

        Ok(Self { descriptions })
    }

    pub fn get(&self, gene_id: &str) -> Option<&str> {
        self.descriptions.get(gene_id).map(String::as_str)
    }

    pub fn describe(&self, gene_id: &str) -> &str {
        self.get(gene_id).unwrap_or(NOT_AVAILABLE)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}
