//! Edit ledger property tests
//!
//! Applying a ledger is idempotent, and a pending value always wins over the
//! table value until it is replaced.

use proptest::prelude::*;
use vcf_editor::core::{CellKey, EditLedger, VariantTable};
use vcf_editor::formats::vcf::parse_text;

const SAMPLES: [&str; 3] = ["S1", "S2", "S3"];

fn arb_genotype() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("0/0".to_string()),
        Just("0/1".to_string()),
        Just("1/1".to_string()),
        Just("./.".to_string()),
    ]
}

/// Rows on chromosome 1 at positions drawn from a small range, so duplicates occur
fn arb_table() -> impl Strategy<Value = VariantTable> {
    prop::collection::vec((1u64..20, prop::collection::vec(arb_genotype(), 3)), 1..40).prop_map(
        |rows| {
            let mut text =
                String::from("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\tS2\tS3\n");
            for (pos, gts) in rows {
                text.push_str(&format!("1\t{}\t.\tA\tT\t.\t.\t.\tGT\t{}\n", pos, gts.join("\t")));
            }
            parse_text(&text).unwrap().1
        },
    )
}

fn arb_edit() -> impl Strategy<Value = (CellKey, String)> {
    (1u64..25, 0usize..SAMPLES.len(), arb_genotype())
        .prop_map(|(pos, s, gt)| (CellKey::new("1", pos, SAMPLES[s]), gt))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: applying the same ledger twice equals applying it once
    #[test]
    fn prop_apply_idempotent(table in arb_table(), edits in prop::collection::vec(arb_edit(), 0..20)) {
        let mut ledger = EditLedger::new();
        for (key, value) in edits {
            ledger.set(key, value);
        }

        let mut once = table.clone();
        ledger.apply_all(&mut once);
        let mut twice = once.clone();
        let second = ledger.apply_all(&mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(second.cells_changed, 0);
    }

    /// Property: after apply, every matching cell holds the ledger value
    #[test]
    fn prop_apply_writes_every_match(table in arb_table(), edits in prop::collection::vec(arb_edit(), 0..20)) {
        let mut ledger = EditLedger::new();
        for (key, value) in edits {
            ledger.set(key, value);
        }

        let mut applied = table.clone();
        let report = ledger.apply_all(&mut applied);
        prop_assert_eq!(report.applied + report.skipped_count(), ledger.len());

        for (key, value) in ledger.iter() {
            let rows: Vec<usize> = applied.rows_at(&key.chrom, &key.pos).collect();
            for row in rows {
                prop_assert_eq!(applied.cell(row, &key.sample), Some(value));
            }
        }
    }

    /// Property: get returns the last set value, never the stale original
    #[test]
    fn prop_edit_precedence(table in arb_table(), edits in prop::collection::vec(arb_edit(), 1..20)) {
        let mut ledger = EditLedger::new();
        for (key, value) in &edits {
            ledger.set(key.clone(), value.clone());
        }

        for (key, _) in &edits {
            let last = edits.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
            prop_assert_eq!(ledger.get(&table, key), last);
        }
    }

    /// Property: apply leaves non-sample columns and row order untouched
    #[test]
    fn prop_apply_only_touches_samples(table in arb_table(), edits in prop::collection::vec(arb_edit(), 0..20)) {
        let mut ledger = EditLedger::new();
        for (key, value) in edits {
            ledger.set(key, value);
        }

        let mut applied = table.clone();
        ledger.apply_all(&mut applied);

        prop_assert_eq!(applied.len(), table.len());
        for (before, after) in table.rows().iter().zip(applied.rows()) {
            prop_assert_eq!(&before.fields()[..9], &after.fields()[..9]);
        }
    }
}
