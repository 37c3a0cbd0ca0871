use crate::error::DerivationError;
use crate::filters::classify;
use crate::postprocess::{PostProcessor, ProcessContext, Stage, register_default_post_processors};
use crate::trace::DerivationTrace;
use ahash::AHashMap;
use tracing::{debug, warn};

/// Runs a descriptor's post-processors in order and enforces their contract.
///
/// In lenient mode a failing or contract-breaking processor is logged and its stage is
/// reverted; in strict mode the error is returned.
pub struct PostProcessorPipeline {
    processors: AHashMap<String, Box<dyn PostProcessor>>,
    strict: bool,
}

impl PostProcessorPipeline {
    pub fn new(strict: bool) -> Self {
        let mut processors: AHashMap<String, Box<dyn PostProcessor>> = AHashMap::new();
        register_default_post_processors(&mut processors);
        Self { processors, strict }
    }

    /// Registers (or replaces) a processor under its own id.
    pub fn with_processor(mut self, processor: Box<dyn PostProcessor>) -> Self {
        self.processors.insert(processor.id().to_string(), processor);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.processors.contains_key(id)
    }

    pub fn run(
        &self,
        ids: &[String],
        mut stage: Stage,
        ctx: &ProcessContext<'_>,
        trace: &mut DerivationTrace,
    ) -> Result<Stage, DerivationError> {
        for id in ids {
            let Some(processor) = self.processors.get(id) else {
                let error = DerivationError::ProcessorFailed {
                    processor: id.clone(),
                    reason: "not registered".to_string(),
                };
                if self.strict {
                    return Err(error);
                }
                warn!(processor = %id, report_type = ctx.report_type, "unknown post-processor skipped");
                trace.record_skipped(id, &stage.across, error.to_string());
                continue;
            };

            let before = stage.clone();
            let outcome = processor
                .process(stage, ctx)
                .and_then(|after| check_contract(processor.as_ref(), &before, after));
            stage = match outcome {
                Ok(after) => {
                    debug!(processor = %id, report_type = ctx.report_type, "post-processor applied");
                    trace.record(id, &after.across, &before.filters, &after.filters);
                    after
                }
                Err(error) if self.strict => return Err(error),
                Err(error) => {
                    warn!(processor = %id, report_type = ctx.report_type, error = %error, "post-processor skipped");
                    trace.record_skipped(id, &before.across, error.to_string());
                    before
                }
            };
        }
        Ok(stage)
    }
}

/// Rejects undeclared key removals and out-of-shape values on touched keys.
fn check_contract(
    processor: &dyn PostProcessor,
    before: &Stage,
    after: Stage,
) -> Result<Stage, DerivationError> {
    let declared = processor.unset_keys();
    if let Some(key) = before
        .filters
        .keys()
        .find(|key| !after.filters.contains_key(*key) && !declared.contains(*key))
    {
        return Err(DerivationError::ContractViolation {
            processor: processor.id().to_string(),
            detail: format!("removed undeclared key '{}'", key),
        });
    }
    for (key, value) in &after.filters {
        if before.filters.get(key) == Some(value) {
            continue;
        }
        classify(value).map_err(|detail| DerivationError::ContractViolation {
            processor: processor.id().to_string(),
            detail: format!("'{}': {}", key, detail),
        })?;
    }
    Ok(after)
}
