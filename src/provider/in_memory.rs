use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SheetRowProvider;
use crate::error::InternalResult;
use crate::language::ClientLanguage;
use crate::sheets::{ColumnValue, SheetRow};

type Sheet = BTreeMap<u32, Vec<ColumnValue>>;

/// Sheet storage backed by plain maps, loadable from a JSON fixture:
///
/// ```json
/// {
///   "shared": { "Map": { "1": [100, 0, 0, 2] } },
///   "languages": {
///     "en": { "Addon": { "6": ["<color(0xFFFFFFFF)>"] } }
///   }
/// }
/// ```
///
/// Localized sheets live under `languages`; `shared` holds sheets that are
/// the same in every language and is consulted when the language has no sheet
/// of that name. Text cells use macro-string notation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemorySheets {
    #[serde(default)]
    shared: HashMap<String, Sheet>,
    #[serde(default)]
    languages: HashMap<ClientLanguage, HashMap<String, Sheet>>,
}

impl InMemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> InternalResult<Self> {
        let sheets: Self = serde_json::from_str(content)?;
        debug!(
            "Loaded sheet fixture: {} shared sheets, {} languages",
            sheets.shared.len(),
            sheets.languages.len()
        );
        Ok(sheets)
    }

    pub fn insert_row(
        &mut self,
        language: ClientLanguage,
        sheet: &str,
        row_id: u32,
        columns: Vec<ColumnValue>,
    ) -> &mut Self {
        self.languages
            .entry(language)
            .or_default()
            .entry(sheet.to_string())
            .or_default()
            .insert(row_id, columns);
        self
    }

    /// Inserts a row visible from every language.
    pub fn insert_shared_row(
        &mut self,
        sheet: &str,
        row_id: u32,
        columns: Vec<ColumnValue>,
    ) -> &mut Self {
        self.shared
            .entry(sheet.to_string())
            .or_default()
            .insert(row_id, columns);
        self
    }

    pub fn with_row(
        mut self,
        language: ClientLanguage,
        sheet: &str,
        row_id: u32,
        columns: Vec<ColumnValue>,
    ) -> Self {
        self.insert_row(language, sheet, row_id, columns);
        self
    }

    pub fn with_shared_row(mut self, sheet: &str, row_id: u32, columns: Vec<ColumnValue>) -> Self {
        self.insert_shared_row(sheet, row_id, columns);
        self
    }

    fn sheet(&self, sheet: &str, language: ClientLanguage) -> Option<&Sheet> {
        self.languages
            .get(&language)
            .and_then(|sheets| sheets.get(sheet))
            .or_else(|| self.shared.get(sheet))
    }
}

impl SheetRowProvider for InMemorySheets {
    fn has_sheet(&self, sheet: &str) -> bool {
        self.shared.contains_key(sheet)
            || self
                .languages
                .values()
                .any(|sheets| sheets.contains_key(sheet))
    }

    fn get_row(&self, sheet: &str, row_id: u32, language: ClientLanguage) -> Option<SheetRow> {
        self.sheet(sheet, language)
            .and_then(|rows| rows.get(&row_id))
            .map(|columns| SheetRow::new(row_id, columns.clone()))
    }

    fn row_ids(&self, sheet: &str, language: ClientLanguage) -> Vec<u32> {
        self.sheet(sheet, language)
            .map(|rows| rows.keys().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "shared": { "Map": { "1": [100, 0, 0, 2] } },
        "languages": {
            "en": { "PlaceName": { "2": ["Limsa Lominsa"], "5": ["Ul'dah"] } },
            "de": { "PlaceName": { "2": ["Limsa Lominsa (DE)"] } }
        }
    }"#;

    #[test]
    fn test_fixture_lookup_by_language() {
        let sheets = InMemorySheets::from_str(FIXTURE).unwrap();
        let row = sheets.get_row("PlaceName", 2, ClientLanguage::German).unwrap();
        assert_eq!(row.read_text(0).extract_text(), "Limsa Lominsa (DE)");
        assert!(sheets.get_row("PlaceName", 5, ClientLanguage::German).is_none());
        assert!(sheets.get_row("PlaceName", 2, ClientLanguage::French).is_none());
    }

    #[test]
    fn test_shared_sheets_visible_from_all_languages() {
        let sheets = InMemorySheets::from_str(FIXTURE).unwrap();
        let row = sheets.get_row("Map", 1, ClientLanguage::Japanese).unwrap();
        assert_eq!(row.read_i64(0), Some(100));
        assert!(sheets.has_sheet("Map"));
        assert!(sheets.has_sheet("PlaceName"));
        assert!(!sheets.has_sheet("Nope"));
    }

    #[test]
    fn test_row_ids_sorted() {
        let sheets = InMemorySheets::new()
            .with_row(ClientLanguage::English, "Addon", 9, vec!["b".into()])
            .with_row(ClientLanguage::English, "Addon", 3, vec!["a".into()]);
        assert_eq!(sheets.row_ids("Addon", ClientLanguage::English), vec![3, 9]);
        assert!(sheets.row_ids("Addon", ClientLanguage::German).is_empty());
    }

    #[test]
    fn test_malformed_fixture_is_an_error() {
        assert!(InMemorySheets::from_str("{ \"languages\": 3 }").is_err());
    }
}
