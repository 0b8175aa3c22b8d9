pub use crate::aggregate::{LabelMatch, MatchSummary, ResultTable};
pub use crate::categories::{Category, CategoryDefinitionError, CategorySet, Taxonomy};
pub use crate::classifier::{Classifier, Outcome};
pub use crate::rate_gate::RateGate;
pub use crate::runner::{
    state::{CancelHandle, LogEntry, RunHandle, RunPhase, RunSnapshot},
    BatchRunner, RunError,
};
pub use crate::table::{RecordTable, TableError, SUMMARY_COLUMN};
pub use taxon_interface::llms::{GenerationApiConfigTrait, GenerationBackend};
pub use taxon_interface::GenerationInterface;
