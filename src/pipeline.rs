use crate::core::{FinalResult, Loader, Processor, Result, Rules, Source, Validator};
use crate::stages::{
    load_config, process_data, validate_data, ConfigLoader, LengthProcessor, MarkerValidator,
};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info_span};

/// Runs the three stages over one source with the given rules.
///
/// The first failure is returned as is and later stages are not invoked.
pub fn run_pipeline(source: &dyn Source, identifier: &str, rules: &Rules) -> Result<FinalResult> {
    load_config(source, identifier, rules)
        .and_then(|config| validate_data(config, rules))
        .and_then(|validated| process_data(validated, rules))
}

pub struct Pipeline {
    loader: Box<dyn Loader>,
    validator: Box<dyn Validator>,
    processor: Box<dyn Processor>,
}

impl Pipeline {
    pub fn new(
        loader: Box<dyn Loader>,
        validator: Box<dyn Validator>,
        processor: Box<dyn Processor>,
    ) -> Self {
        Self {
            loader,
            validator,
            processor,
        }
    }

    /// Standard stages over `source`, all sharing the same rules.
    pub fn from_source<S: Source + 'static>(source: S, rules: Rules) -> Self {
        Self::new(
            Box::new(ConfigLoader::new(source, rules.clone())),
            Box::new(MarkerValidator::new(rules.clone())),
            Box::new(LengthProcessor::new(rules)),
        )
    }

    pub fn run(&self, identifier: &str) -> Result<FinalResult> {
        let span = info_span!("pipeline", identifier);
        let _enter = span.enter();

        let result = self
            .loader
            .load(identifier)
            .and_then(|config| self.validator.validate(config))
            .and_then(|validated| self.processor.process(validated));

        if let Err(e) = &result {
            debug!(kind = e.kind(), stage = %e.stage(), "pipeline short-circuited");
        }
        result
    }

    /// Runs one isolated instance per identifier on the blocking pool.
    ///
    /// Results come back in input order. A panic inside an instance is
    /// propagated to the caller.
    pub async fn run_batch<I, S>(self: Arc<Self>, identifiers: I) -> Vec<(String, Result<FinalResult>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handles: Vec<_> = identifiers
            .into_iter()
            .map(|identifier| {
                let identifier: String = identifier.into();
                let pipeline = Arc::clone(&self);
                tokio::task::spawn_blocking(move || {
                    let result = pipeline.run(&identifier);
                    (identifier, result)
                })
            })
            .collect();

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(outcome) => outcome,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                // Blocking tasks cannot be aborted once started; only a panic ends one early.
                Err(e) => unreachable!("blocking pipeline instance cancelled: {}", e),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, PipelineError, ValidatedData};
    use crate::source::memory::MemorySource;
    use std::sync::Mutex;

    /// Counts how many times each stage was entered.
    #[derive(Default)]
    struct Calls {
        load: Mutex<u32>,
        validate: Mutex<u32>,
        process: Mutex<u32>,
    }

    struct CountingLoader {
        inner: ConfigLoader<MemorySource>,
        calls: Arc<Calls>,
    }

    impl Loader for CountingLoader {
        fn load(&self, identifier: &str) -> Result<Config> {
            *self.calls.load.lock().unwrap() += 1;
            self.inner.load(identifier)
        }
    }

    struct CountingValidator {
        inner: MarkerValidator,
        calls: Arc<Calls>,
    }

    impl Validator for CountingValidator {
        fn validate(&self, config: Config) -> Result<ValidatedData> {
            *self.calls.validate.lock().unwrap() += 1;
            self.inner.validate(config)
        }
    }

    struct CountingProcessor {
        inner: LengthProcessor,
        calls: Arc<Calls>,
    }

    impl Processor for CountingProcessor {
        fn process(&self, data: ValidatedData) -> Result<FinalResult> {
            *self.calls.process.lock().unwrap() += 1;
            self.inner.process(data)
        }
    }

    fn counting_pipeline(source: MemorySource) -> (Pipeline, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let rules = Rules::default();
        let pipeline = Pipeline::new(
            Box::new(CountingLoader {
                inner: ConfigLoader::new(source, rules.clone()),
                calls: Arc::clone(&calls),
            }),
            Box::new(CountingValidator {
                inner: MarkerValidator::new(rules.clone()),
                calls: Arc::clone(&calls),
            }),
            Box::new(CountingProcessor {
                inner: LengthProcessor::new(rules),
                calls: Arc::clone(&calls),
            }),
        );
        (pipeline, calls)
    }

    fn counts(calls: &Calls) -> (u32, u32, u32) {
        (
            *calls.load.lock().unwrap(),
            *calls.validate.lock().unwrap(),
            *calls.process.lock().unwrap(),
        )
    }

    fn demo_source() -> MemorySource {
        MemorySource::new()
            .with_entry("valid.txt", "valid_data_content")
            .with_entry("malformed.txt", "malformed content")
            .with_entry("invalid.txt", "valid_data\ninvalid_field")
            .with_entry("short.txt", "short")
    }

    #[test]
    fn success_runs_every_stage_once() {
        let (pipeline, calls) = counting_pipeline(demo_source());
        let result = pipeline.run("valid.txt").unwrap();
        assert_eq!(result.result_code, 29);
        assert_eq!(counts(&calls), (1, 1, 1));
    }

    #[test]
    fn read_failure_skips_validate_and_process() {
        let (pipeline, calls) = counting_pipeline(demo_source());
        let err = pipeline.run("missing.txt").unwrap_err();
        assert_eq!(
            err,
            PipelineError::ConfigRead {
                source_identifier: "missing.txt".to_string()
            }
        );
        assert_eq!(counts(&calls), (1, 0, 0));
    }

    #[test]
    fn parse_failure_skips_validate_and_process() {
        let (pipeline, calls) = counting_pipeline(demo_source());
        let err = pipeline.run("malformed.txt").unwrap_err();
        assert_eq!(err.kind(), "ConfigParse");
        assert_eq!(counts(&calls), (1, 0, 0));
    }

    #[test]
    fn validation_failure_skips_process() {
        let (pipeline, calls) = counting_pipeline(demo_source());
        let err = pipeline.run("invalid.txt").unwrap_err();
        assert_eq!(err.kind(), "Validation");
        assert_eq!(counts(&calls), (1, 1, 0));
    }

    #[test]
    fn processing_failure_runs_all_three() {
        let (pipeline, calls) = counting_pipeline(demo_source());
        let err = pipeline.run("short.txt").unwrap_err();
        assert_eq!(err.kind(), "Processing");
        assert_eq!(counts(&calls), (1, 1, 1));
    }

    #[test]
    fn struct_and_free_function_agree() {
        let source = demo_source();
        let pipeline = Pipeline::from_source(source.clone(), Rules::default());
        for id in ["valid.txt", "missing.txt", "malformed.txt", "invalid.txt", "short.txt"] {
            assert_eq!(
                pipeline.run(id),
                run_pipeline(&source, id, &Rules::default()),
                "{id}"
            );
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let pipeline = Pipeline::from_source(demo_source(), Rules::default());
        assert_eq!(pipeline.run("valid.txt"), pipeline.run("valid.txt"));
        assert_eq!(pipeline.run("short.txt"), pipeline.run("short.txt"));
    }

    #[tokio::test]
    async fn batch_keeps_input_order_and_isolates_failures() {
        let pipeline = Arc::new(Pipeline::from_source(demo_source(), Rules::default()));
        let outcomes = pipeline
            .run_batch(["short.txt", "valid.txt", "missing.txt"])
            .await;

        let ids: Vec<_> = outcomes.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["short.txt", "valid.txt", "missing.txt"]);
        assert_eq!(outcomes[0].1.as_ref().unwrap_err().kind(), "Processing");
        assert_eq!(outcomes[1].1.as_ref().unwrap().result_code, 29);
        assert_eq!(outcomes[2].1.as_ref().unwrap_err().kind(), "ConfigRead");
    }
}
