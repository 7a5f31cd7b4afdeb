use crate::core::{CorrelationTable, EnrichmentResult, ExpressionProfile, Gene, GeneSet, Score};
use rayon::prelude::*;

/// Receives per-gene events while the running sum is walked.
pub trait GeneObserver {
    /// Called for every gene of the set that is present in the profile,
    /// whether or not it has a usable correlation value.
    fn profile_hit(&mut self, gene: &str);

    /// Called for every gene whose correlation is missing or blank.
    fn skipped(&mut self, _gene: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GeneObserver for NoopObserver {
    fn profile_hit(&mut self, _gene: &str) {}
}

/// Reports hits and skips as `tracing` events, tagged with the gene set name.
#[derive(Debug, Clone, Copy)]
pub struct TracingObserver<'a> {
    pub gene_set: &'a str,
}

impl<'a> TracingObserver<'a> {
    pub fn new(gene_set: &'a str) -> Self {
        Self { gene_set }
    }
}

impl GeneObserver for TracingObserver<'_> {
    fn profile_hit(&mut self, gene: &str) {
        tracing::debug!(gene_set = self.gene_set, gene, "gene found in expression profile");
    }

    fn skipped(&mut self, gene: &str) {
        tracing::trace!(gene_set = self.gene_set, gene, "no correlation value, skipping");
    }
}

pub fn track_extreme(new_value: Score, old_value: Score, tracking_high: bool) -> Score {
    if tracking_high {
        new_value.max(old_value)
    } else {
        new_value.min(old_value)
    }
}

/// State of the running sum after a full pass over a gene set.
///
/// Accumulators are `i128`, so any gene set of `i64` correlations sums
/// without overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningSumWalk {
    pub running_sum: Score,
    pub max_excursion: Score,
    pub min_excursion: Score,
    /// Genes in the profile that added their correlation.
    pub n_in_profile: usize,
    /// Genes outside the profile that subtracted their correlation.
    pub n_not_in_profile: usize,
    pub n_skipped: usize,
}

impl RunningSumWalk {
    /// The excursion furthest from zero. On equal magnitude the positive
    /// excursion wins.
    pub fn enrichment_score(&self) -> Score {
        if self.min_excursion.unsigned_abs() > self.max_excursion.unsigned_abs() {
            self.min_excursion
        } else {
            self.max_excursion
        }
    }
}

pub fn walk_running_sum<O: GeneObserver + ?Sized>(
    profile: &ExpressionProfile,
    gene_set: &[Gene],
    correlations: &CorrelationTable,
    observer: &mut O,
) -> RunningSumWalk {
    let mut walk = RunningSumWalk::default();

    for gene in gene_set {
        let in_profile = profile.contains(gene);
        if in_profile {
            observer.profile_hit(gene);
        }

        let Some(value) = correlations.first_value(gene) else {
            observer.skipped(gene);
            walk.n_skipped += 1;
            continue;
        };

        if in_profile {
            walk.running_sum += Score::from(value);
            walk.max_excursion = track_extreme(walk.running_sum, walk.max_excursion, true);
            walk.n_in_profile += 1;
        } else {
            walk.running_sum -= Score::from(value);
            walk.min_excursion = track_extreme(walk.running_sum, walk.min_excursion, false);
            walk.n_not_in_profile += 1;
        }
    }

    walk
}

pub fn calculate_enrichment_score(
    profile: &ExpressionProfile,
    gene_set: &[Gene],
    correlations: &CorrelationTable,
) -> Score {
    calculate_enrichment_score_with(profile, gene_set, correlations, &mut NoopObserver)
}

pub fn calculate_enrichment_score_with<O: GeneObserver + ?Sized>(
    profile: &ExpressionProfile,
    gene_set: &[Gene],
    correlations: &CorrelationTable,
    observer: &mut O,
) -> Score {
    walk_running_sum(profile, gene_set, correlations, observer).enrichment_score()
}

/// Scores every gene set whose size lies in `[min_size, max_size]`.
///
/// Sets are scored in parallel; the output keeps the input order of the
/// retained sets.
pub fn run_enrichment(
    profile: &ExpressionProfile,
    gene_sets: &[GeneSet],
    correlations: &CorrelationTable,
    min_size: usize,
    max_size: usize,
) -> Vec<EnrichmentResult> {
    gene_sets
        .par_iter()
        .filter(|gs| (min_size..=max_size).contains(&gs.len()))
        .map(|gs| {
            let mut observer = TracingObserver::new(&gs.name);
            let walk = walk_running_sum(profile, &gs.genes, correlations, &mut observer);
            let es = walk.enrichment_score();
            tracing::debug!(
                gene_set = %gs.name,
                es = %es,
                skipped = walk.n_skipped,
                "scored gene set"
            );

            EnrichmentResult {
                gene_set_name: gs.name.clone(),
                size: gs.len(),
                es,
                max_excursion: walk.max_excursion,
                min_excursion: walk.min_excursion,
                n_in_profile: walk.n_in_profile,
                n_not_in_profile: walk.n_not_in_profile,
                n_skipped: walk.n_skipped,
            }
        })
        .collect()
}
