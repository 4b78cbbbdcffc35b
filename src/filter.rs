//! De novo predicate and the streaming filter pass.
//!
//! A record is kept when it passed all upstream filters, both parents are
//! called homozygous reference and the proband is called heterozygous (or
//! haploid alternate) at the same site.

use std::io::{BufRead, Write};

use log::trace;

use crate::error::Result;
use crate::genotype::AlleleSets;
use crate::header::SampleColumnIndex;
use crate::row::VcfRow;

/// Marker that starts every meta and header line.
pub const META_PREFIX: char = '#';

/// Line counts of one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Meta and header lines copied to the output.
    pub meta_lines: usize,
    /// Data records evaluated.
    pub records: usize,
    /// Data records written to the output.
    pub retained: usize,
}

/// Evaluate the de novo predicate on a parsed row.
///
/// All three genotype calls are extracted before anything is compared, so a
/// row missing a trio column fails even when its FILTER is not `PASS`.
pub fn is_denovo(row: &VcfRow<'_>, columns: &SampleColumnIndex) -> Result<bool> {
    let father = row.genotype_call(columns.father)?;
    let mother = row.genotype_call(columns.mother)?;
    let proband = row.genotype_call(columns.proband)?;

    let sets = AlleleSets::new(row.reference(), row.alternate());

    Ok(row.is_pass()
        && sets.is_hom_ref(father)
        && sets.is_hom_ref(mother)
        && sets.is_het(proband))
}

/// Stream a VCF from `reader` to `writer`, keeping meta lines and de novo
/// records.
///
/// Every written line is trimmed of surrounding whitespace and terminated by
/// a single `\n`. Order is preserved. Every line not starting with `#` is a
/// data record, so a blank line is a row error unless it is the last line.
///
/// # Arguments
///
/// * `reader` - The VCF source, positioned at its first line
/// * `writer` - The output sink
/// * `columns` - Trio sample columns resolved from the same VCF
///
/// # Errors
///
/// Fails on the first structurally invalid data row or I/O error.
pub fn filter_records<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    columns: &SampleColumnIndex,
) -> Result<FilterStats> {
    let mut stats = FilterStats::default();
    let mut line = String::new();
    let mut line_no = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        line_no += 1;
        let text = line.trim();

        if line.starts_with(META_PREFIX) {
            writeln!(writer, "{}", text)?;
            stats.meta_lines += 1;
            continue;
        }
        if text.is_empty() && reader.fill_buf()?.is_empty() {
            // a single blank line before EOF terminates the file
            break;
        }

        let row = VcfRow::parse(line_no, text)?;
        stats.records += 1;
        if is_denovo(&row, columns)? {
            writeln!(writer, "{}", text)?;
            stats.retained += 1;
        } else {
            trace!("dropping {}:{} (line {})", row.chrom(), row.pos(), line_no);
        }
    }

    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DenovoFilterError;
    use crate::header::resolve_sample_columns;
    use crate::pedigree::TrioRoles;
    use pretty_assertions::assert_eq;

    const META: &str = "##fileformat=VCFv4.2
##FILTER=<ID=PASS,Description=\"All filters passed\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tCHILD\tDAD\tMOM";

    fn columns() -> SampleColumnIndex {
        SampleColumnIndex {
            father: 10,
            mother: 11,
            proband: 9,
        }
    }

    fn record(pos: u32, filter: &str, child: &str, dad: &str, mom: &str) -> String {
        format!("chr1\t{pos}\t.\tA\tG\t50\t{filter}\t.\tGT:DP\t{child}:20\t{dad}:30\t{mom}:25")
    }

    fn run_filter(vcf: &str) -> Result<(String, FilterStats)> {
        let mut out = Vec::new();
        let stats = filter_records(vcf.as_bytes(), &mut out, &columns())?;
        Ok((String::from_utf8(out).unwrap(), stats))
    }

    fn evaluate(line: &str) -> bool {
        let row = VcfRow::parse(1, line).unwrap();
        is_denovo(&row, &columns()).unwrap()
    }

    #[test]
    fn test_denovo_het_is_kept() {
        assert!(evaluate(&record(100, "PASS", "A/G", "A/A", "A/A")));
    }

    #[test]
    fn test_hom_ref_child_is_dropped() {
        assert!(!evaluate(&record(100, "PASS", "A/A", "A/A", "A/A")));
    }

    #[rstest::rstest]
    #[case("q10")]
    #[case("LowQual")]
    #[case(".")]
    fn test_non_pass_is_dropped(#[case] filter: &str) {
        assert!(!evaluate(&record(100, filter, "A/G", "A/A", "A/A")));
    }

    #[test]
    fn test_low_qual_with_other_alleles_is_dropped() {
        let line = "chr2\t5\t.\tA\tT\t50\tLowQual\t.\tGT\tA/T\tA/A\tA/A";
        assert!(!evaluate(line));
    }

    #[rstest::rstest]
    #[case("A/G", "A/A")]
    #[case("A/A", "A/G")]
    #[case("./.", "A/A")]
    #[case("A/A", "G/G")]
    fn test_non_hom_ref_parent_is_dropped(#[case] dad: &str, #[case] mom: &str) {
        assert!(!evaluate(&record(100, "PASS", "A/G", dad, mom)));
    }

    #[test]
    fn test_haploid_calls() {
        assert!(evaluate(&record(100, "PASS", "G", "A", "A")));
        assert!(evaluate(&record(100, "PASS", "G", "A/A", "A")));
        assert!(!evaluate(&record(100, "PASS", "A", "A", "A")));
    }

    #[test]
    fn test_alleles_come_from_each_record() {
        let line = "chr3\t7\t.\tCT\tC\t50\tPASS\t.\tGT\tCT/C\tCT/CT\tCT";
        assert!(evaluate(line));
    }

    #[test]
    fn test_missing_trio_column_is_fatal_even_when_not_pass() {
        let row = VcfRow::parse(5, "chr1\t1\t.\tA\tG\t50\tq10\t.\tGT\tA/G\tA/A").unwrap();
        assert!(matches!(
            is_denovo(&row, &columns()),
            Err(DenovoFilterError::RowParseError { line: 5, .. })
        ));
    }

    #[test]
    fn test_filter_stream() {
        let vcf = [
            META.to_string(),
            record(100, "PASS", "A/G", "A/A", "A/A"),
            record(200, "PASS", "A/A", "A/A", "A/A"),
            record(300, "q10", "A/G", "A/A", "A/A"),
            record(400, "PASS", "G", "A", "A"),
        ]
        .join("\n");

        let (out, stats) = run_filter(&vcf).unwrap();

        let expected = [
            META.to_string(),
            record(100, "PASS", "A/G", "A/A", "A/A"),
            record(400, "PASS", "G", "A", "A"),
        ]
        .join("\n")
            + "\n";
        assert_eq!(out, expected);
        assert_eq!(
            stats,
            FilterStats {
                meta_lines: 4,
                records: 4,
                retained: 2,
            }
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let positions = [900, 100, 500, 300];
        let mut lines = vec![META.to_string()];
        for pos in positions {
            lines.push(record(pos, "PASS", "A/G", "A/A", "A/A"));
            lines.push(record(pos + 1, "PASS", "A/A", "A/A", "A/A"));
        }

        let (out, _) = run_filter(&lines.join("\n")).unwrap();

        let kept: Vec<&str> = out
            .lines()
            .filter(|l| !l.starts_with('#'))
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(kept, vec!["900", "100", "500", "300"]);
    }

    #[test]
    fn test_idempotent() {
        let vcf = [
            META.to_string(),
            record(100, "PASS", "A/G", "A/A", "A/A"),
            record(200, "PASS", "G/G", "A/A", "A/A"),
            record(300, "PASS", "G", "A", "A"),
        ]
        .join("\n");

        let (once, _) = run_filter(&vcf).unwrap();
        let (twice, stats) = run_filter(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(stats.records, stats.retained);
    }

    #[test]
    fn test_header_lines_are_preserved() {
        let vcf = format!(
            "{}\n{}\n##late_meta=1\n",
            META,
            record(100, "PASS", "A/A", "A/A", "A/A")
        );
        let (out, _) = run_filter(&vcf).unwrap();
        let meta: Vec<&str> = out.lines().filter(|l| l.starts_with('#')).collect();
        let mut expected: Vec<&str> = META.lines().collect();
        expected.push("##late_meta=1");
        assert_eq!(meta, expected);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        let vcf = format!(
            "{}\r\n{}  \r\n\r\n",
            META,
            record(100, "PASS", "A/G", "A/A", "A/A")
        );
        let (out, stats) = run_filter(&vcf).unwrap();
        assert!(out.ends_with("A/A:25\n"));
        assert!(!out.contains('\r'));
        assert_eq!(stats.records, 1);
    }

    #[rstest::rstest]
    #[case::between_records("\n\nchr1\t200\t.\tA\tG\t50\tPASS\t.\tGT\tA/G\tA/A\tA/A\n")]
    #[case::whitespace_only("\n \t\nchr1\t200\t.\tA\tG\t50\tPASS\t.\tGT\tA/G\tA/A\tA/A\n")]
    #[case::two_trailing("\n\n\n")]
    fn test_blank_data_line_is_fatal(#[case] tail: &str) {
        let vcf = format!(
            "{}\n{}{}",
            META,
            record(100, "PASS", "A/G", "A/A", "A/A"),
            tail
        );
        match run_filter(&vcf) {
            Err(DenovoFilterError::RowParseError { line, .. }) => assert_eq!(line, 6),
            other => panic!("Expected RowParseError, got {:?}", other),
        }
    }

    #[rstest::rstest]
    #[case("\n\n")]
    #[case("\n")]
    #[case("")]
    fn test_single_trailing_blank_line_is_accepted(#[case] tail: &str) {
        let vcf = format!("{}\n{}{}", META, record(100, "PASS", "A/G", "A/A", "A/A"), tail);
        let (_, stats) = run_filter(&vcf).unwrap();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.retained, 1);
    }

    #[test]
    fn test_malformed_format_is_fatal() {
        let bad = record(200, "PASS", "A/G", "A/A", "A/A").replace("GT:DP", "DP:GT");
        let vcf = format!(
            "{}\n{}\n{}",
            META,
            record(100, "PASS", "A/G", "A/A", "A/A"),
            bad
        );
        match run_filter(&vcf) {
            Err(DenovoFilterError::MalformedFormatField { line, found }) => {
                assert_eq!(line, 6);
                assert_eq!(found, "DP:GT");
            }
            other => panic!("Expected MalformedFormatField, got {:?}", other),
        }
    }

    #[test]
    fn test_columns_from_header_drive_the_pass() {
        // Samples in a different order than the other tests.
        let vcf = "##fileformat=VCFv4.2
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tMOM\tCHILD\tDAD
chr1\t100\t.\tC\tT\t50\tPASS\t.\tGT\tC/C\tC/T\tC/C
chr1\t200\t.\tC\tT\t50\tPASS\t.\tGT\tC/T\tC/C\tC/C
";
        let trio = TrioRoles::new("DAD", "MOM", "CHILD").unwrap();
        let columns = resolve_sample_columns(vcf.as_bytes(), &trio).unwrap();

        let mut out = Vec::new();
        let stats = filter_records(vcf.as_bytes(), &mut out, &columns).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("chr1\t100\t"));
        assert!(!out.contains("chr1\t200\t"));
        assert_eq!(stats.retained, 1);
    }
}
