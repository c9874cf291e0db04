//! Recorder wiring over the in-memory mock ports
//!
//! Gives tests a [`DecisionRecorder`] plus handles to inspect what each mock
//! collaborator saw.

use std::sync::Arc;
use std::time::Duration;

use domain_scoring::{
    DecisionRecorder, ExplanationStrategy, GeneratorBehavior, MockClaimArchive,
    MockDecisionStore, MockTextGenerator, ModelVersions, TextGenerator,
};

/// Timeouts short enough to keep failing-path tests fast
const TEST_GENERATOR_TIMEOUT: Duration = Duration::from_millis(500);
const TEST_ARCHIVE_TIMEOUT: Duration = Duration::from_millis(500);

pub struct MockPipeline {
    pub store: Arc<MockDecisionStore>,
    pub generator: Arc<MockTextGenerator>,
    pub archive: Arc<MockClaimArchive>,
    pub recorder: DecisionRecorder,
}

impl MockPipeline {
    pub fn new(behavior: GeneratorBehavior) -> Self {
        Self::assemble(MockDecisionStore::new(), behavior, MockClaimArchive::new())
    }

    /// Generator not configured; every explanation comes from the template
    pub fn template_only() -> Self {
        Self::new(GeneratorBehavior::Unavailable)
    }

    /// Store writes fail as if the database were down
    pub fn with_failing_store() -> Self {
        Self::assemble(
            MockDecisionStore::failing(),
            GeneratorBehavior::Unavailable,
            MockClaimArchive::new(),
        )
    }

    /// Archive writes fail; decisions must still succeed
    pub fn with_failing_archive() -> Self {
        Self::assemble(
            MockDecisionStore::new(),
            GeneratorBehavior::Unavailable,
            MockClaimArchive::failing(),
        )
    }

    fn assemble(
        store: MockDecisionStore,
        behavior: GeneratorBehavior,
        archive: MockClaimArchive,
    ) -> Self {
        let store = Arc::new(store);
        let generator = Arc::new(MockTextGenerator::new(behavior));
        let archive = Arc::new(archive);
        let dyn_generator: Arc<dyn TextGenerator> = generator.clone();

        let recorder = DecisionRecorder::new(
            store.clone(),
            ExplanationStrategy::new(Some(dyn_generator), TEST_GENERATOR_TIMEOUT),
            ModelVersions::default(),
        )
        .with_archive(archive.clone(), TEST_ARCHIVE_TIMEOUT);

        Self {
            store,
            generator,
            archive,
            recorder,
        }
    }
}
