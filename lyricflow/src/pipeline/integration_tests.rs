//! End-to-end tests for pipeline execution.

#[cfg(test)]
mod tests {
    use crate::context::{Context, RunIdentity};
    use crate::errors::{LyricflowError, ProviderError, ProviderErrorKind};
    use crate::events::CollectingEventSink;
    use crate::pipeline::{
        lyrics_analysis_builder, PipelineBuilder, StageSpec, GENRE_KEY, SUMMARY_KEY,
    };
    use crate::stages::{Stage, StageOutput};
    use crate::testing::ScriptedGenerationProvider;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct CountingStage {
        key: String,
        inputs: Vec<String>,
        counter: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Stage for CountingStage {
        fn name(&self) -> &str {
            &self.key
        }

        fn input_keys(&self) -> &[String] {
            &self.inputs
        }

        fn output_key(&self) -> &str {
            &self.key
        }

        async fn run(&self, ctx: &Context) -> Result<StageOutput, LyricflowError> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            let seen = ctx.keys().join(",");
            Ok(StageOutput::new(&self.key, format!("{n}:{seen}")))
        }
    }

    #[tokio::test]
    async fn test_stub_summary_and_genre() {
        let provider = Arc::new(ScriptedGenerationProvider::new(["STUB_SUMMARY", "STUB_GENRE"]));
        let pipeline = lyrics_analysis_builder(provider.clone()).unwrap().build().unwrap();

        let result = pipeline.run([("lyrics", "la la la")]).await.unwrap();

        assert_eq!(result.keys(), vec![SUMMARY_KEY, GENRE_KEY]);
        assert_eq!(result.get(SUMMARY_KEY), Some("STUB_SUMMARY"));
        assert_eq!(result.get(GENRE_KEY), Some("STUB_GENRE"));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            serde_json::json!({"summary": "STUB_SUMMARY", "genre": "STUB_GENRE"})
        );
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_second_prompt_contains_first_output() {
        let provider = Arc::new(ScriptedGenerationProvider::new([
            "A song about heartbreak in the rain",
            "Ballad",
        ]));
        let pipeline = lyrics_analysis_builder(provider.clone()).unwrap().build().unwrap();

        pipeline.run([("lyrics", "la la la")]).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts[0], "Summarize the following lyrics:\n\nla la la");
        assert!(prompts[1].contains("A song about heartbreak in the rain"));
        assert!(prompts[1].starts_with("Identify the genre of the song"));
    }

    #[tokio::test]
    async fn test_stage_failure_propagates_unchanged() {
        let rate_limited = ProviderError::rate_limited("openai", "slow down");
        let provider = Arc::new(ScriptedGenerationProvider::from_results(vec![
            Err(rate_limited.clone()),
            Ok("never used".to_string()),
        ]));
        let pipeline = lyrics_analysis_builder(provider.clone()).unwrap().build().unwrap();

        let err = pipeline.run([("lyrics", "la la la")]).await.unwrap_err();

        assert_eq!(err.as_provider_error(), Some(&rate_limited));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_input_runs_nothing() {
        let provider = Arc::new(ScriptedGenerationProvider::new(["x", "y"]));
        let pipeline = lyrics_analysis_builder(provider.clone()).unwrap().build().unwrap();

        let err = pipeline.run([("song", "Bulleya")]).await.unwrap_err();

        assert!(matches!(err, LyricflowError::MissingVariable(ref e) if e.key == "lyrics"));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stages_run_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let stage = |key: &str, inputs: &[&str]| {
            Arc::new(CountingStage {
                key: key.to_string(),
                inputs: inputs.iter().map(ToString::to_string).collect(),
                counter: counter.clone(),
            })
        };

        let pipeline = PipelineBuilder::new("ordered")
            .input_variables(["seed"])
            .stage(stage("first", &["seed"]))
            .stage(stage("second", &["first"]))
            .stage(stage("third", &["second"]))
            .build()
            .unwrap();

        let result = pipeline.run([("seed", "0")]).await.unwrap();

        assert_eq!(result.get("first"), Some("0:seed"));
        assert_eq!(result.get("second"), Some("1:seed,first"));
        assert_eq!(result.get("third"), Some("2:seed,first,second"));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_events_on_success() {
        let sink = Arc::new(CollectingEventSink::new());
        let provider = Arc::new(ScriptedGenerationProvider::new(["s", "g"]));
        let pipeline = lyrics_analysis_builder(provider)
            .unwrap()
            .event_sink(sink.clone())
            .verbose(true)
            .build()
            .unwrap();
        let identity = RunIdentity::new();

        pipeline
            .run_with_identity(&identity, [("lyrics", "la")])
            .await
            .unwrap();

        assert_eq!(
            sink.event_types(),
            vec![
                "pipeline.started",
                "stage.started",
                "stage.completed",
                "stage.started",
                "stage.completed",
                "pipeline.completed",
            ]
        );
        let run_id = identity.run_id.to_string();
        for event in sink.events() {
            assert_eq!(event.data["run_id"], run_id);
        }
    }

    #[tokio::test]
    async fn test_events_on_failure() {
        let sink = Arc::new(CollectingEventSink::new());
        let provider = Arc::new(ScriptedGenerationProvider::from_results(vec![
            Ok("summary".to_string()),
            Err(ProviderError::new(
                "openai",
                ProviderErrorKind::Http { status: 500 },
                "boom",
            )),
        ]));
        let pipeline = lyrics_analysis_builder(provider)
            .unwrap()
            .event_sink(sink.clone())
            .build()
            .unwrap();

        assert!(pipeline.run([("lyrics", "la")]).await.is_err());

        assert_eq!(
            sink.event_types(),
            vec![
                "pipeline.started",
                "stage.started",
                "stage.completed",
                "stage.started",
                "stage.failed",
                "pipeline.failed",
            ]
        );
        let failed = sink.events_of_type("stage.failed");
        assert_eq!(failed[0].data["stage"], "genre");
    }

    #[tokio::test]
    async fn test_sentinel_like_input_still_runs() {
        let provider = Arc::new(ScriptedGenerationProvider::new(["s", "g"]));
        let spec = StageSpec::parse("{lyrics}", "summary").unwrap();
        let pipeline = PipelineBuilder::new("single")
            .input_variables(["lyrics"])
            .llm_stage(spec, provider.clone())
            .build()
            .unwrap();

        let result = pipeline.run([("lyrics", "Lyrics not found.")]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(provider.prompts(), vec!["Lyrics not found.".to_string()]);
    }
}
