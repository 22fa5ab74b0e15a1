//! Pending genotype edits
//!
//! Edits are keyed by (CHROM, POS, sample) and stay in the ledger after they
//! are applied, so re-applying an unchanged ledger is a no-op.

use crate::core::table::VariantTable;
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one sample cell
///
/// `pos` keeps the POS text as written in the file; matching is by string
/// equality, so `100` and `0100` are different loci.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub chrom: String,
    pub pos: String,
    pub sample: String,
}

impl CellKey {
    pub fn new(chrom: impl Into<String>, pos: impl ToString, sample: impl Into<String>) -> Self {
        Self {
            chrom: chrom.into(),
            pos: pos.to_string(),
            sample: sample.into(),
        }
    }
}

/// True when `value` can be written into a cell without changing the row's field count
pub fn is_valid_cell_value(value: &str) -> bool {
    !value.contains(&['\t', '\n', '\r'][..])
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} [{}]", self.chrom, self.pos, self.sample)
    }
}

/// Why an edit could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No row has this CHROM and POS
    NoMatchingRow,
    /// The sample is not a column of the table
    UnknownSample,
    /// The value would split the row (tab or line break)
    InvalidValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatchingRow => write!(f, "no matching row"),
            SkipReason::UnknownSample => write!(f, "unknown sample"),
            SkipReason::InvalidValue => write!(f, "value contains a tab or line break"),
        }
    }
}

/// Outcome of [`EditLedger::apply_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Entries that matched at least one row
    pub applied: usize,
    /// Cells whose value actually changed
    pub cells_changed: usize,
    /// Entries that matched nothing
    pub skipped: Vec<(CellKey, SkipReason)>,
}

impl ApplyReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Accumulated cell edits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditLedger {
    entries: BTreeMap<CellKey, String>,
}

impl EditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending value if present, else the table's current value
    pub fn get<'a>(&'a self, table: &'a VariantTable, key: &CellKey) -> Option<&'a str> {
        if let Some(value) = self.entries.get(key) {
            return Some(value.as_str());
        }
        let row = table.rows_at(&key.chrom, &key.pos).next()?;
        table.cell(row, &key.sample)
    }

    /// Pending value only
    pub fn pending(&self, key: &CellKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Upsert a pending value, returning the previous one
    pub fn set(&mut self, key: CellKey, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key, value.into())
    }

    pub fn remove(&mut self, key: &CellKey) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Write every entry into every row matching its (CHROM, POS)
    pub fn apply_all(&self, table: &mut VariantTable) -> ApplyReport {
        let mut report = ApplyReport::default();

        for (key, value) in &self.entries {
            if !is_valid_cell_value(value) {
                report.skipped.push((key.clone(), SkipReason::InvalidValue));
                continue;
            }
            let Some(column) = table.column_index(&key.sample).filter(|_| table.is_sample(&key.sample)) else {
                report.skipped.push((key.clone(), SkipReason::UnknownSample));
                continue;
            };
            let rows: Vec<usize> = table.rows_at(&key.chrom, &key.pos).collect();
            if rows.is_empty() {
                report.skipped.push((key.clone(), SkipReason::NoMatchingRow));
                continue;
            }
            if rows.len() > 1 {
                log::debug!("Edit {} matches {} rows", key, rows.len());
            }
            report.applied += 1;
            for row in rows {
                if table.set_cell(row, column, value) {
                    report.cells_changed += 1;
                }
            }
        }

        for (key, reason) in &report.skipped {
            log::warn!("Skipped edit {}: {}", key, reason);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::vcf::parse_text;

    const TEXT: &str = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\n\
1\t100\t.\tA\tT\t.\t.\t.\tGT\t0/1\t0/0\n\
1\t100\t.\tA\tG\t.\t.\t.\tGT\t0/0\t0/0\n\
2\t300\t.\tC\tG\t.\t.\t.\tGT\t1/1\t0/1\n";

    fn table() -> VariantTable {
        parse_text(TEXT).unwrap().1
    }

    #[test]
    fn test_get_falls_back_to_table() {
        let t = table();
        let ledger = EditLedger::new();
        assert_eq!(ledger.get(&t, &CellKey::new("2", 300, "S1")), Some("1/1"));
        assert_eq!(ledger.get(&t, &CellKey::new("2", 301, "S1")), None);
        assert_eq!(ledger.get(&t, &CellKey::new("2", 300, "S9")), None);
    }

    #[test]
    fn test_set_overrides_get() {
        let t = table();
        let mut ledger = EditLedger::new();
        let key = CellKey::new("2", "300", "S1");
        assert_eq!(ledger.set(key.clone(), "0/0"), None);
        assert_eq!(ledger.set(key.clone(), "0/1"), Some("0/0".to_string()));
        assert_eq!(ledger.get(&t, &key), Some("0/1"));
        assert_eq!(ledger.pending(&key), Some("0/1"));
        // table untouched
        assert_eq!(t.cell(2, "S1"), Some("1/1"));
    }

    #[test]
    fn test_keys_with_delimiters_stay_distinct() {
        let mut ledger = EditLedger::new();
        ledger.set(CellKey::new("chr1:5", "10", "S_1"), "0/1");
        ledger.set(CellKey::new("chr1", "5:10", "S_1"), "1/1");
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_apply_all_duplicates_and_skips() {
        let mut t = table();
        let mut ledger = EditLedger::new();
        ledger.set(CellKey::new("1", 100, "S1"), "1/1");
        ledger.set(CellKey::new("1", 999, "S1"), "1/1");
        ledger.set(CellKey::new("1", 100, "INFO"), "X");

        let report = ledger.apply_all(&mut t);
        assert_eq!(report.applied, 1);
        assert_eq!(report.cells_changed, 2);
        assert_eq!(report.skipped_count(), 2);
        assert!(report
            .skipped
            .contains(&(CellKey::new("1", 999, "S1"), SkipReason::NoMatchingRow)));
        assert!(report
            .skipped
            .contains(&(CellKey::new("1", 100, "INFO"), SkipReason::UnknownSample)));
        assert_eq!(t.cell(0, "S1"), Some("1/1"));
        assert_eq!(t.cell(1, "S1"), Some("1/1"));
        assert_eq!(t.cell(0, "INFO"), Some("."));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_apply_all_idempotent() {
        let mut t = table();
        let mut ledger = EditLedger::new();
        ledger.set(CellKey::new("2", 300, "S2"), "1/1");

        let first = ledger.apply_all(&mut t);
        let snapshot = t.clone();
        let second = ledger.apply_all(&mut t);

        assert_eq!(first.cells_changed, 1);
        assert_eq!(second.cells_changed, 0);
        assert_eq!(second.applied, 1);
        assert_eq!(t, snapshot);
    }

    #[test]
    fn test_apply_all_skips_values_with_separators() {
        let mut t = table();
        let mut ledger = EditLedger::new();
        ledger.set(CellKey::new("2", 300, "S1"), "1/1\textra");
        ledger.set(CellKey::new("2", 300, "S2"), "0/0\n");
        ledger.set(CellKey::new("1", 100, "S2"), "0/1");

        let report = ledger.apply_all(&mut t);
        assert_eq!(report.applied, 1);
        assert_eq!(report.skipped_count(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|(key, reason)| key.chrom == "2" && *reason == SkipReason::InvalidValue));
        assert_eq!(t.cell(2, "S1"), Some("1/1"));
        assert_eq!(t.cell(2, "S2"), Some("0/1"));
        assert!(t.rows().iter().all(|row| row.fields().len() == 11));
    }

    #[test]
    fn test_is_valid_cell_value() {
        assert!(is_valid_cell_value("0|1:35"));
        assert!(is_valid_cell_value(""));
        assert!(!is_valid_cell_value("0/1\t."));
        assert!(!is_valid_cell_value("0/1\r"));
    }

    #[test]
    fn test_remove() {
        let mut ledger = EditLedger::new();
        let key = CellKey::new("1", 1, "S1");
        ledger.set(key.clone(), "0/1");
        assert_eq!(ledger.remove(&key), Some("0/1".to_string()));
        assert!(ledger.is_empty());
    }
}
