// Scoring pipeline: normalization, TF-IDF relevance, structured features,
// composite blend and ranking. Pure and synchronous; no I/O below `handlers`.

pub mod composite;
pub mod features;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod similarity;
