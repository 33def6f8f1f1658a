use serde::{Deserialize, Serialize};
use tabula_model::{DEFAULT_COLUMN_WIDTH, DEFAULT_ROW_HEIGHT};

/// Per-session table settings supplied by the host.
///
/// No global configuration exists; every [`crate::Session`] carries its own
/// copy so two open documents can disagree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Width for newly created columns, and the assumed width when splitting a
    /// column that has none configured.
    #[serde(default = "default_min_column_width")]
    pub min_column_width: u32,

    /// Height for newly created rows.
    #[serde(default = "default_min_row_height")]
    pub min_row_height: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_column_width: DEFAULT_COLUMN_WIDTH,
            min_row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}

fn default_min_column_width() -> u32 {
    DEFAULT_COLUMN_WIDTH
}

fn default_min_row_height() -> u32 {
    DEFAULT_ROW_HEIGHT
}
