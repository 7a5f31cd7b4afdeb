use rsgsea::io::{parse_correlation_table, parse_genes, parse_gmt, TSV_HEADER};
use rsgsea::prelude::*;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

#[test]
fn test_parse_genes_splits_on_any_whitespace() {
    let genes = parse_genes(Cursor::new("STAT1  IRF1\tCXCL10\n\nGBP1\n  ")).unwrap();
    assert_eq!(genes, vec!["STAT1", "IRF1", "CXCL10", "GBP1"]);
}

#[test]
fn test_parse_correlation_table() {
    let input = "STAT1\t-13\nIRF1\t4\t9\nBLANK\n\nCXCL10   2\nIRF1\t-1\n";
    let table = parse_correlation_table(Cursor::new(input)).unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(table.first_value("STAT1"), Some(-13));
    // last line for a gene wins
    assert_eq!(table.get("IRF1"), Some(&[-1][..]));
    assert_eq!(table.get("BLANK"), Some(&[][..]));
    assert_eq!(table.first_value("BLANK"), None);
    assert_eq!(table.first_value("CXCL10"), Some(2));
    assert_eq!(table.first_value("MISSING"), None);
}

#[test]
fn test_parse_correlation_table_rejects_non_integers() {
    let err = parse_correlation_table(Cursor::new("A\t1\nB\t0.5\n")).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("line 2"), "unexpected error: {}", msg);
    assert!(msg.contains("0.5"), "unexpected error: {}", msg);
}

#[test]
fn test_parse_gmt() {
    let input = "HALLMARK_A\thttp://example\tG1\tG2\t\tG3\n\
                 \n\
                 HALLMARK_B\t\tG4\n\
                 EMPTY_SET\tno genes\n";
    let db = parse_gmt(Cursor::new(input)).unwrap();

    assert_eq!(db.gene_sets.len(), 3);
    assert_eq!(db.gene_sets[0].name, "HALLMARK_A");
    assert_eq!(db.gene_sets[0].description.as_deref(), Some("http://example"));
    assert_eq!(db.gene_sets[0].genes, vec!["G1", "G2", "G3"]);
    assert_eq!(db.gene_sets[1].description, None);
    assert_eq!(db.gene_sets[1].genes, vec!["G4"]);
    assert_eq!(db.gene_sets[2].description.as_deref(), Some("no genes"));
    assert!(db.gene_sets[2].genes.is_empty());
}

#[test]
fn test_parse_gmt_reports_malformed_lines() {
    let err = parse_gmt(Cursor::new("SET_A\tdesc\tG1\nSET_B G2 G3\n")).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("line 2"), "unexpected error: {}", msg);
    assert!(msg.contains("SET_B G2 G3"), "unexpected error: {}", msg);

    let err = parse_gmt(Cursor::new("\tdesc\tG1\n")).unwrap_err();
    assert!(format!("{:#}", err).contains("line 1"));
}

#[test]
fn test_parse_correlation_table_i64_boundaries() {
    let input = "MAX\t9223372036854775807\nMIN\t-9223372036854775808\n";
    let table = parse_correlation_table(Cursor::new(input)).unwrap();
    assert_eq!(table.first_value("MAX"), Some(i64::MAX));
    assert_eq!(table.first_value("MIN"), Some(i64::MIN));

    // both values sum past i64 without wrapping
    let profile = ExpressionProfile::new(vec!["Z".to_string()]);
    let gene_set = vec!["MAX".to_string(), "MAX".to_string()];
    assert_eq!(
        calculate_enrichment_score(&profile, &gene_set, &table),
        -2 * Score::from(i64::MAX)
    );

    let err = parse_correlation_table(Cursor::new("A\t1\nB\t2\nC\t9223372036854775808\n"))
        .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("line 3"), "unexpected error: {}", msg);
    assert!(msg.contains("9223372036854775808"), "unexpected error: {}", msg);
}

#[test]
fn test_read_files_and_score() {
    let dir = tempdir().unwrap();
    let profile_path = dir.path().join("gene_expression_profile.txt");
    let set_path = dir.path().join("interferon.txt");
    let table_path = dir.path().join("phenotype_label");

    fs::write(&profile_path, "A B\n").unwrap();
    fs::write(&set_path, "A\nC\nB\n").unwrap();
    fs::write(&table_path, "A\t3\nB\t2\nC\t4\n").unwrap();

    let profile = read_expression_profile(&profile_path).unwrap();
    let gene_set = read_gene_set(&set_path).unwrap();
    let correlations = read_correlation_table(&table_path).unwrap();

    assert_eq!(profile.genes(), &["A", "B"]);
    assert_eq!(gene_set.name, "interferon");
    assert_eq!(
        calculate_enrichment_score(&profile, &gene_set.genes, &correlations),
        3
    );
}

#[test]
fn test_read_missing_file_names_path() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.gmt");
    let err = read_gmt(&missing).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.gmt"));
}

#[test]
fn test_read_gene_sets_puts_files_before_gmt() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    let gmt = dir.path().join("hallmark.gmt");

    fs::write(&first, "A B").unwrap();
    fs::write(&second, "C").unwrap();
    fs::write(&gmt, "GMT_1\t\tA\nGMT_2\t\tB\tC\n").unwrap();

    let sets = read_gene_sets(&[&second, &first], Some(gmt.as_path())).unwrap();
    let names: Vec<&str> = sets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["second", "first", "GMT_1", "GMT_2"]);

    let no_gmt = read_gene_sets(&[&first], None).unwrap();
    assert_eq!(no_gmt.len(), 1);
    assert_eq!(no_gmt[0].genes, vec!["A", "B"]);
}

fn sample_results() -> Vec<EnrichmentResult> {
    vec![
        EnrichmentResult {
            gene_set_name: "KNOWN".to_string(),
            size: 3,
            es: 3,
            max_excursion: 3,
            min_excursion: -1,
            n_in_profile: 2,
            n_not_in_profile: 1,
            n_skipped: 0,
        },
        EnrichmentResult {
            gene_set_name: "WIDE".to_string(),
            size: 2,
            es: -2 * Score::from(i64::MAX),
            max_excursion: 0,
            min_excursion: -2 * Score::from(i64::MAX),
            n_in_profile: 0,
            n_not_in_profile: 2,
            n_skipped: 0,
        },
    ]
}

#[test]
fn test_write_tsv() {
    let mut out = Vec::new();
    write_tsv(&mut out, &sample_results()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "gene_set\tsize\tes\tmax_excursion\tmin_excursion\tn_in_profile\tn_not_in_profile\tn_skipped"
    );
    assert_eq!(lines[0], TSV_HEADER);
    assert_eq!(lines[1], "KNOWN\t3\t3\t3\t-1\t2\t1\t0");
    assert_eq!(
        lines[2],
        "WIDE\t2\t-18446744073709551614\t0\t-18446744073709551614\t0\t2\t0"
    );
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_write_json() {
    let results = sample_results();
    let mut out = Vec::new();
    write_json(&mut out, &results).unwrap();

    let parsed: Vec<EnrichmentResult> = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed, results);
}
