use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type Gene = String;

/// Running-sum and enrichment score values.
pub type Score = i128;

/// Genes observed in the samples under study.
///
/// Keeps the original token order for output and a hash set for membership,
/// which is the only thing the running sum needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Gene>", into = "Vec<Gene>")]
pub struct ExpressionProfile {
    genes: Vec<Gene>,
    members: HashSet<Gene>,
}

impl ExpressionProfile {
    pub fn new(genes: Vec<Gene>) -> Self {
        let members = genes.iter().cloned().collect();
        Self { genes, members }
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.members.contains(gene)
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl From<Vec<Gene>> for ExpressionProfile {
    fn from(genes: Vec<Gene>) -> Self {
        Self::new(genes)
    }
}

impl From<ExpressionProfile> for Vec<Gene> {
    fn from(profile: ExpressionProfile) -> Self {
        profile.genes
    }
}

impl FromIterator<Gene> for ExpressionProfile {
    fn from_iter<I: IntoIterator<Item = Gene>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneSet {
    pub name: String,
    pub description: Option<String>,
    pub genes: Vec<Gene>,
}

impl GeneSet {
    pub fn new(name: impl Into<String>, genes: Vec<Gene>) -> Self {
        Self {
            name: name.into(),
            description: None,
            genes,
        }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneSetDb {
    pub gene_sets: Vec<GeneSet>,
}

/// Phenotype correlation values per gene.
///
/// A gene may carry any number of values, including none; scoring only ever
/// reads the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationTable {
    values: HashMap<Gene, Vec<i64>>,
}

impl CorrelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any values previously stored for `gene`.
    pub fn insert(&mut self, gene: impl Into<Gene>, values: Vec<i64>) {
        self.values.insert(gene.into(), values);
    }

    pub fn get(&self, gene: &str) -> Option<&[i64]> {
        self.values.get(gene).map(Vec::as_slice)
    }

    /// First correlation value of `gene`, or `None` when the gene is absent
    /// or has a blank value list.
    pub fn first_value(&self, gene: &str) -> Option<i64> {
        self.values.get(gene).and_then(|v| v.first().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<G: Into<Gene>> FromIterator<(G, Vec<i64>)> for CorrelationTable {
    fn from_iter<I: IntoIterator<Item = (G, Vec<i64>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (gene, values) in iter {
            table.insert(gene, values);
        }
        table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub gene_set_name: String,
    pub size: usize,
    pub es: Score,
    pub max_excursion: Score,
    pub min_excursion: Score,
    pub n_in_profile: usize,
    pub n_not_in_profile: usize,
    pub n_skipped: usize,
}
