//! Configuration for a reconciliation run.

use serde::{Deserialize, Serialize};

/// Engine-level configuration: which columns form the join key and where the
/// header row sits. Input/output locations are caller concerns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Ordered key column labels; must exist in both tables.
    pub key_columns: Vec<String>,
    /// Zero-based index of the header row in the raw grid.
    pub header_row: u32,
}

impl ReconConfig {
    pub fn builder() -> ReconConfigBuilder {
        ReconConfigBuilder {
            inner: ReconConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReconConfigBuilder {
    inner: ReconConfig,
}

impl ReconConfigBuilder {
    pub fn key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.key_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn header_row(mut self, row: u32) -> Self {
        self.inner.header_row = row;
        self
    }

    pub fn build(self) -> ReconConfig {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_keys_and_header_row() {
        let config = ReconConfig::builder()
            .key_columns(["ID", "Note"])
            .header_row(3)
            .build();
        assert_eq!(config.key_columns, vec!["ID", "Note"]);
        assert_eq!(config.header_row, 3);
    }

    #[test]
    fn config_round_trips_through_serde() {
        let config = ReconConfig::builder().key_columns(["ID"]).build();
        let json = serde_json::to_string(&config).unwrap();
        let back: ReconConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
