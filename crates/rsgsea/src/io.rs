use crate::core::{
    CorrelationTable, EnrichmentResult, ExpressionProfile, Gene, GeneSet, GeneSetDb,
};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

fn open(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Every whitespace-delimited token of every line, in order.
pub fn parse_genes<R: BufRead>(reader: R) -> Result<Vec<Gene>> {
    let mut genes = Vec::new();
    for line in reader.lines() {
        let line = line?;
        genes.extend(line.split_whitespace().map(str::to_string));
    }
    Ok(genes)
}

pub fn read_genes(path: impl AsRef<Path>) -> Result<Vec<Gene>> {
    let path = path.as_ref();
    parse_genes(open(path)?).with_context(|| format!("Failed to read genes from {}", path.display()))
}

pub fn read_expression_profile(path: impl AsRef<Path>) -> Result<ExpressionProfile> {
    Ok(ExpressionProfile::new(read_genes(path)?))
}

/// Reads a plain gene list as one gene set named after the file stem.
pub fn read_gene_set(path: impl AsRef<Path>) -> Result<GeneSet> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(GeneSet::new(name, read_genes(path)?))
}

/// Parses `gene value*` lines. A gene listed without values gets an empty
/// list; a repeated gene keeps the values of its last line.
pub fn parse_correlation_table<R: BufRead>(reader: R) -> Result<CorrelationTable> {
    let mut table = CorrelationTable::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let mut parts = line.split_whitespace();
        let Some(gene) = parts.next() else {
            continue;
        };

        let values = parts
            .map(|tok| {
                tok.parse::<i64>().with_context(|| {
                    format!(
                        "Failed to parse correlation value {:?} for {} on line {}",
                        tok,
                        gene,
                        line_idx + 1
                    )
                })
            })
            .collect::<Result<Vec<i64>>>()?;

        table.insert(gene, values);
    }

    Ok(table)
}

pub fn read_correlation_table(path: impl AsRef<Path>) -> Result<CorrelationTable> {
    let path = path.as_ref();
    parse_correlation_table(open(path)?)
        .with_context(|| format!("Failed to read correlation table {}", path.display()))
}

/// Parses GMT collections: `name<TAB>description<TAB>gene...` per line.
///
/// A line without a description column, or with an empty name, is an error
/// naming its line. A set may list no genes.
pub fn parse_gmt<R: BufRead>(reader: R) -> Result<GeneSetDb> {
    let mut db = GeneSetDb::default();
    let mut seen = HashSet::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let name = fields.next().map(str::trim).unwrap_or_default();
        let Some(description) = fields.next() else {
            bail!("Missing description column for {:?} on line {}", name, line_idx + 1);
        };
        if name.is_empty() {
            bail!("Empty gene set name on line {}", line_idx + 1);
        }
        if !seen.insert(name.to_string()) {
            tracing::warn!(gene_set = name, line = line_idx + 1, "duplicate gene set name");
        }

        let description = Some(description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let genes = fields
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();

        db.gene_sets.push(GeneSet {
            name: name.to_string(),
            description,
            genes,
        });
    }

    Ok(db)
}

pub fn read_gmt(path: impl AsRef<Path>) -> Result<GeneSetDb> {
    let path = path.as_ref();
    parse_gmt(open(path)?).with_context(|| format!("Failed to read GMT file {}", path.display()))
}

/// Loads plain gene-set files first, in the order given, then every set of
/// the GMT collection.
pub fn read_gene_sets<P: AsRef<Path>>(
    gene_set_paths: &[P],
    gmt: Option<&Path>,
) -> Result<Vec<GeneSet>> {
    let mut gene_sets = gene_set_paths
        .iter()
        .map(read_gene_set)
        .collect::<Result<Vec<GeneSet>>>()?;
    if let Some(gmt) = gmt {
        gene_sets.extend(read_gmt(gmt)?.gene_sets);
    }
    Ok(gene_sets)
}

pub const TSV_HEADER: &str =
    "gene_set\tsize\tes\tmax_excursion\tmin_excursion\tn_in_profile\tn_not_in_profile\tn_skipped";

pub fn write_tsv<W: Write>(out: &mut W, results: &[EnrichmentResult]) -> Result<()> {
    writeln!(out, "{}", TSV_HEADER)?;
    for res in results {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            res.gene_set_name,
            res.size,
            res.es,
            res.max_excursion,
            res.min_excursion,
            res.n_in_profile,
            res.n_not_in_profile,
            res.n_skipped
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, results: &[EnrichmentResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}
