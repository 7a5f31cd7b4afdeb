pub use crate::algo::{
    calculate_enrichment_score, calculate_enrichment_score_with, run_enrichment, track_extreme,
    walk_running_sum, GeneObserver, NoopObserver, RunningSumWalk, TracingObserver,
};
pub use crate::core::{
    CorrelationTable, EnrichmentResult, ExpressionProfile, Gene, GeneSet, GeneSetDb, Score,
};
pub use crate::io::{
    read_correlation_table, read_expression_profile, read_gene_set, read_gene_sets, read_genes,
    read_gmt, write_json, write_tsv,
};
