//! ExamForge generation engine
//!
//! Turns a question bank and a distribution pattern into a finished
//! exam paper: resolve the pattern, sample questions per section under
//! the request's filters, run the enabled enrichment stages, then
//! assemble and persist the result.

pub mod accountant;
pub mod assembler;
pub mod cognitive;
pub mod enrichment;
pub mod generator;
pub mod resolver;
pub mod sampler;

pub use accountant::UsageAccountant;
pub use assembler::{PaperAssembler, SectionOutcome};
pub use cognitive::determine_cognitive_level;
pub use enrichment::{EnrichmentPipeline, IntervalPacer, NoopPacer, Pacer};
pub use generator::PaperGenerator;
pub use resolver::PatternResolver;
pub use sampler::{QuestionSampler, SectionSample};
