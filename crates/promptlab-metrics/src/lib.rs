//! Promptlab Metrics
//!
//! Deterministic, closed-form quality scoring for generated text. Three
//! independent dimensions (structural, linguistic, relevance) share the
//! tokenization primitives in [`text`] and fold into a single weighted
//! overall score via [`engine::score`].
//!
//! Everything here is pure CPU-bound computation: no I/O, no async, no
//! hidden state.

pub mod engine;
pub mod linguistic;
pub mod relevance;
pub mod structural;
pub mod text;

pub use engine::{score, QualityMetrics, COMPLETENESS_BASELINE};
pub use linguistic::{
    interpret_flesch, LinguisticMetrics, ReadabilityMetrics, RepetitionMetrics,
    VocabularyMetrics, WordQualityMetrics,
};
pub use relevance::{extract_keywords, KeywordMatch, RelevanceMetrics};
pub use structural::{DiscourseMetrics, FormattingMetrics, StructuralMetrics};
