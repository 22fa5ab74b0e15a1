//! Tab-delimited edit lists
//!
//! One edit per line: `CHROM<TAB>POS<TAB>SAMPLE<TAB>VALUE`. Blank lines and
//! lines starting with `#` are ignored.

use crate::core::EditListError;
use crate::core::ledger::CellKey;
use crate::formats::vcf::split_fields;

/// Parse an edit list into (key, value) pairs in file order
pub fn parse_edit_list(text: &str) -> Result<Vec<(CellKey, String)>, EditListError> {
    let mut edits = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match split_fields(line).as_slice() {
            [chrom, pos, sample, value] => {
                if chrom.is_empty() || pos.is_empty() || sample.is_empty() {
                    return Err(EditListError {
                        line: i + 1,
                        message: "CHROM, POS and SAMPLE must not be empty".to_string(),
                    });
                }
                edits.push((CellKey::new(*chrom, pos, *sample), value.to_string()));
            }
            fields => {
                return Err(EditListError {
                    line: i + 1,
                    message: format!("expected 4 tab-separated fields, found {}", fields.len()),
                });
            }
        }
    }

    Ok(edits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_list() {
        let text = "# chrom\tpos\tsample\tvalue\n1\t100\tS1\t1/1\n\nX\t5\tS:2\t0|1\n";
        let edits = parse_edit_list(text).unwrap();
        assert_eq!(
            edits,
            vec![
                (CellKey::new("1", "100", "S1"), "1/1".to_string()),
                (CellKey::new("X", "5", "S:2"), "0|1".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_edit_list_wrong_width() {
        let err = parse_edit_list("1\t100\tS1\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("found 3"));
    }

    #[test]
    fn test_parse_edit_list_empty_key() {
        let err = parse_edit_list("1\t100\tS1\t0/1\n\t100\tS1\t0/1\n").unwrap_err();
        assert_eq!(err.line, 2);
    }
}
