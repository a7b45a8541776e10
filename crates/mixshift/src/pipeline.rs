//! Main Decomposition struct and public API.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::decomposition::{
    aggregate, decompose, track_combinations, validate, ColumnRoles, CombinationSummary,
    Reconciliation, ResultTable,
};
use crate::error::{MixshiftError, Result};
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::transform::{apply_mapping, MappingRules};

/// Remapping of one dimension column before grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Dimension column whose values are remapped.
    pub column: String,
    /// Group label to member values.
    #[serde(default)]
    pub groups: MappingRules,
}

/// Configuration for a decomposition run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Dimension columns to group by. Empty means every non-numeric column.
    pub dimensions: Vec<String>,
    /// Optional remapping of one dimension column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<MappingConfig>,
    /// Classify groups as new, vanished or present in both periods.
    pub track_combinations: bool,
}

impl DecompositionConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MixshiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| {
            MixshiftError::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}

/// Result of a decomposition run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionResult {
    /// Metadata about the source file, when the run started from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Column classification and measure binding.
    pub roles: ColumnRoles,
    /// The dimension columns actually grouped by.
    pub dimensions: Vec<String>,
    /// Group rows plus the total row.
    pub table: ResultTable,
    /// Status counts, when combination tracking ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combinations: Option<CombinationSummary>,
    /// Check that the group effects add up to the overall rate change.
    pub reconciliation: Reconciliation,
}

/// The decomposition pipeline.
pub struct Decomposition {
    config: DecompositionConfig,
    parser: Parser,
}

impl Decomposition {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(DecompositionConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: DecompositionConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    pub fn config(&self) -> &DecompositionConfig {
        &self.config
    }

    /// Group by these dimension columns instead of every non-numeric column.
    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Remap values of `column` using `rules` before grouping.
    pub fn with_mapping(mut self, column: impl Into<String>, rules: MappingRules) -> Self {
        self.config.mapping = Some(MappingConfig {
            column: column.into(),
            groups: rules,
        });
        self
    }

    /// Enable or disable combination tracking.
    pub fn with_combinations(mut self, enabled: bool) -> Self {
        self.config.track_combinations = enabled;
        self
    }

    /// Parse a data file and decompose it.
    pub fn analyze(&self, path: impl AsRef<Path>) -> Result<DecompositionResult> {
        let (table, source) = self.parser.parse_file(path)?;
        let dataset = Dataset::from_table(&table)?;

        let mut result = self.run(&dataset)?;
        result.source = Some(source);
        Ok(result)
    }

    /// Decompose an in-memory dataset.
    pub fn run(&self, dataset: &Dataset) -> Result<DecompositionResult> {
        let roles = validate(dataset)?;
        info!(
            "Measures: base_pop='{}', curr_pop='{}', base_sub='{}', curr_sub='{}'",
            roles.measures.base_pop,
            roles.measures.curr_pop,
            roles.measures.base_sub,
            roles.measures.curr_sub
        );

        let dimensions = if self.config.dimensions.is_empty() {
            roles.all_dimensions()?
        } else {
            roles.select_dimensions(&self.config.dimensions)?
        };
        info!("Grouping by {:?}", dimensions);

        // Only a selected dimension can be remapped
        let mapped = match &self.config.mapping {
            Some(mapping) => {
                if !dimensions.contains(&mapping.column) {
                    return Err(MixshiftError::Config(format!(
                        "mapping column '{}' is not among the selected dimensions",
                        mapping.column
                    )));
                }
                Some(apply_mapping(dataset, &mapping.groups.to_mapping(&mapping.column))?)
            }
            None => None,
        };
        let working = mapped.as_ref().unwrap_or(dataset);

        let aggregation = aggregate(working, &roles.measures, &dimensions)?;

        let statuses = if self.config.track_combinations {
            Some(track_combinations(working, &roles.measures, &aggregation)?)
        } else {
            None
        };
        let combinations = statuses
            .as_ref()
            .map(|s| CombinationSummary::from_statuses(s.values()));

        let table = decompose(&aggregation, &roles.measures, statuses.as_ref());
        let reconciliation = table.reconciliation();
        info!(
            "Decomposed {} groups; total effect {:?} pp",
            aggregation.len(),
            reconciliation.actual
        );

        Ok(DecompositionResult {
            source: None,
            roles,
            dimensions,
            table,
            combinations,
            reconciliation,
        })
    }
}

impl Default for Decomposition {
    fn default() -> Self {
        Self::new()
    }
}
