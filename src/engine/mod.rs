//! The drilldown orchestrator.
//!
//! `derive` runs registry lookup, filter combination, across resolution, value mapping,
//! the report's post-processors and sanitization, in that order. It reads its inputs
//! only by reference and clones before changing anything, so identical inputs always
//! produce identical payloads.

pub mod across;
pub mod clock;
pub mod combiner;
pub mod config;
pub mod hygiene;
pub mod mapper;
pub mod sanitizer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EngineConfig;
pub use hygiene::merge_hygiene_filters;

use crate::error::{DerivationError, RegistryError};
use crate::filters::Interval;
use crate::model::{ClickEvent, DashboardContext, FilterPayload, WidgetQuery};
use crate::postprocess::{PostProcessor, PostProcessorPipeline, ProcessContext, Stage};
use crate::registry::{ReportDescriptor, ReportTypeRegistry};
use crate::trace::DerivationTrace;
use chrono::Weekday;
use itertools::Itertools;
use mapper::MapContext;
use serde_json::Value;
use tracing::debug;

pub struct DrilldownEngine {
    registry: ReportTypeRegistry,
    pipeline: PostProcessorPipeline,
    config: EngineConfig,
    clock: Box<dyn Clock>,
}

pub struct EngineBuilder {
    registry: Option<ReportTypeRegistry>,
    config: EngineConfig,
    clock: Box<dyn Clock>,
    processors: Vec<Box<dyn PostProcessor>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            config: EngineConfig::default(),
            clock: Box::new(SystemClock),
            processors: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: ReportTypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn strict_post_processors(mut self, strict: bool) -> Self {
        self.config.strict_post_processors = strict;
        self
    }

    pub fn with_post_processor(mut self, processor: Box<dyn PostProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Builds the engine, rejecting descriptors that name unregistered post-processors.
    pub fn build(self) -> Result<DrilldownEngine, RegistryError> {
        let registry = self.registry.unwrap_or_else(ReportTypeRegistry::builtin);
        let pipeline = self
            .processors
            .into_iter()
            .fold(PostProcessorPipeline::new(self.config.strict_post_processors), |pipeline, p| {
                pipeline.with_processor(p)
            });

        for descriptor in registry.descriptors() {
            if let Some(missing) = descriptor
                .post_processors
                .iter()
                .find(|id| !pipeline.contains(id))
            {
                return Err(RegistryError::UnknownPostProcessor {
                    report_type: descriptor.name().to_string(),
                    processor: missing.clone(),
                });
            }
        }

        Ok(DrilldownEngine {
            registry,
            pipeline,
            config: self.config,
            clock: self.clock,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DrilldownEngine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// An engine over the built-in registry, default configuration and the system clock.
    pub fn new() -> Result<Self, RegistryError> {
        EngineBuilder::new().build()
    }

    pub fn registry(&self) -> &ReportTypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Derives the filter payload for a click on a widget of `report_type`.
    ///
    /// A `None` click (an unrecognized chart click) contributes no filter of its own.
    pub fn derive(
        &self,
        report_type: &str,
        query: &WidgetQuery,
        click: Option<&ClickEvent>,
        context: &DashboardContext,
    ) -> Result<FilterPayload, DerivationError> {
        self.derive_with(report_type, query, click, context, &mut DerivationTrace::disabled())
    }

    /// Like `derive`, also returning what every stage did.
    pub fn derive_traced(
        &self,
        report_type: &str,
        query: &WidgetQuery,
        click: Option<&ClickEvent>,
        context: &DashboardContext,
    ) -> Result<(FilterPayload, DerivationTrace), DerivationError> {
        let mut trace = DerivationTrace::new(report_type);
        let payload = self.derive_with(report_type, query, click, context, &mut trace)?;
        Ok((payload, trace))
    }

    /// Derives from raw JSON inputs as produced by the dashboard and charting layers.
    pub fn derive_json(
        &self,
        report_type: &str,
        query: &Value,
        click: &Value,
        context: &Value,
    ) -> Result<FilterPayload, DerivationError> {
        let query: WidgetQuery = parse_input("widget query", query)?;
        let context: DashboardContext = parse_input("dashboard context", context)?;
        let click = ClickEvent::from_value(click);
        self.derive(report_type, &query, click.as_ref(), &context)
    }

    fn week_start(&self, descriptor: &ReportDescriptor) -> Weekday {
        if descriptor.flags.week_starts_on_monday || self.config.week_starts_on_monday {
            Weekday::Mon
        } else {
            Weekday::Sun
        }
    }

    fn derive_with(
        &self,
        report_type: &str,
        query: &WidgetQuery,
        click: Option<&ClickEvent>,
        context: &DashboardContext,
        trace: &mut DerivationTrace,
    ) -> Result<FilterPayload, DerivationError> {
        let descriptor = self.registry.lookup(report_type);
        let interval = query.interval.as_deref().and_then(Interval::parse);
        let week_start = self.week_start(descriptor);
        let now = self.clock.now();
        debug!(report_type, family = ?descriptor.family, "deriving drilldown filters");

        let combined = combiner::combine(&query.filters, descriptor, &context.query_filters);
        let across = across::resolve_across(descriptor, query, click);
        trace.record("combine", &across, &query.filters, &combined);

        let map_ctx = MapContext {
            report_type,
            descriptor,
            registry: &self.registry,
            dashboard: context,
            query,
            interval,
            now,
            week_start,
            sentinel: &self.config.unassigned_sentinel,
        };
        let mapped = mapper::map_click(&map_ctx, &across, click, combined.clone());
        trace.record("map", &mapped.across, &combined, &mapped.filters);

        let process_ctx = ProcessContext {
            report_type,
            descriptor,
            registry: &self.registry,
            click,
            query,
            dashboard: context,
            interval,
            now,
            week_start,
        };
        let stage = self.pipeline.run(
            &descriptor.post_processors,
            Stage {
                across: mapped.across,
                filters: mapped.filters,
            },
            &process_ctx,
            trace,
        )?;

        let unset: Vec<String> = self
            .config
            .default_always_unset
            .iter()
            .chain(descriptor.always_unset.iter())
            .unique()
            .cloned()
            .collect();
        let filter = sanitizer::sanitize(&stage.filters, &unset);
        trace.record("sanitize", &stage.across, &stage.filters, &filter);

        let (ou_ids, ou_exclusions) = self.ou_scope(report_type, descriptor, context, &stage.across);
        let payload = FilterPayload {
            filter,
            interval: descriptor
                .flags
                .include_interval_in_payload
                .then(|| query.interval.clone())
                .flatten(),
            sort: descriptor.default_sort.clone().or_else(|| query.sort.clone()),
            across: stage.across,
            ou_ids,
            ou_exclusions,
        };
        payload.validate()?;
        debug!(report_type, keys = payload.filter.len(), across = %payload.across, "drilldown derived");
        Ok(payload)
    }

    fn ou_scope(
        &self,
        report_type: &str,
        descriptor: &ReportDescriptor,
        context: &DashboardContext,
        across: &str,
    ) -> (Option<Vec<String>>, Option<Vec<String>>) {
        if !descriptor.flags.supports_ou {
            return (None, None);
        }
        let Some(ou_ids) = context.ou_ids.clone().filter(|ids| !ids.is_empty()) else {
            return (None, None);
        };
        let exclude_across = descriptor.flags.include_across_ou_exclusions
            && !across.is_empty()
            && !mapper::is_time_continuous(across, descriptor);
        let exclusions =
            exclude_across.then(|| vec![self.registry.values_to_filter_key(report_type, across)]);
        (Some(ou_ids), exclusions)
    }
}

fn parse_input<T: serde::de::DeserializeOwned>(input: &str, raw: &Value) -> Result<T, DerivationError> {
    let raw = if raw.is_null() {
        Value::Object(Default::default())
    } else {
        raw.clone()
    };
    serde_json::from_value(raw).map_err(|e| DerivationError::InputParseError {
        input: input.to_string(),
        message: e.to_string(),
    })
}
