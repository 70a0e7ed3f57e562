//! Sequential planner driving the stage chain.

use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::context::{Traveler, TripContext};
use crate::errors::{GenerationError, GeneratorError};
use crate::events::{EventSink, NoOpEventSink, PipelineEvent};
use crate::generator::{GenerationRequest, Generator};
use crate::stages::{ActivitiesStage, DestinationStage, FlightStage, HotelStage, Stage};

/// Executes the fixed destination → flight → hotel → activities chain.
///
/// Stages run strictly one after another: each prompt depends on the
/// fields merged by the stages before it, so there is never more than one
/// generation call in flight per run. One planner can serve any number of
/// concurrent runs; each run owns its own context and the planner shares
/// only the generator and sink handles.
pub struct TripPlanner {
    generator: Arc<dyn Generator>,
    sink: Arc<dyn EventSink>,
}

impl TripPlanner {
    /// Creates a planner with no event sink.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the event sink receiving lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Plans a trip from the caller's free-text preferences.
    ///
    /// On success every stage has merged its fields and the populated
    /// context is returned. On the first generation failure the run aborts:
    /// later stages are never invoked and the partial context is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] naming the failed stage when a
    /// generation call fails or its output does not match the stage's
    /// response schema.
    pub async fn run(
        &self,
        original_input: &str,
        traveler: &Traveler,
    ) -> Result<TripContext, GenerationError> {
        let run_id = Uuid::new_v4();
        let start = Instant::now();
        let mut context = TripContext::new();

        info!(run_id = %run_id, user = %traveler.user_name, "pipeline started");
        self.sink.try_emit(PipelineEvent::pipeline_started(run_id));

        let result = self
            .run_stages(run_id, original_input, traveler, &mut context)
            .await;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        match result {
            Ok(()) => {
                info!(run_id = %run_id, duration_ms, "pipeline completed");
                self.sink
                    .try_emit(PipelineEvent::pipeline_completed(run_id, duration_ms));
                Ok(context)
            }
            Err(err) => {
                warn!(run_id = %run_id, stage = %err.stage, error = %err, "pipeline failed");
                self.sink.try_emit(PipelineEvent::pipeline_failed(
                    run_id,
                    &err.stage,
                    &err.to_string(),
                ));
                Err(err)
            }
        }
    }

    async fn run_stages(
        &self,
        run_id: Uuid,
        original_input: &str,
        traveler: &Traveler,
        context: &mut TripContext,
    ) -> Result<(), GenerationError> {
        self.run_stage(run_id, &DestinationStage, original_input, traveler, context)
            .await?;
        self.run_stage(run_id, &FlightStage, original_input, traveler, context)
            .await?;
        self.run_stage(run_id, &HotelStage, original_input, traveler, context)
            .await?;
        self.run_stage(run_id, &ActivitiesStage, original_input, traveler, context)
            .await?;
        Ok(())
    }

    async fn run_stage<S: Stage>(
        &self,
        run_id: Uuid,
        stage: &S,
        original_input: &str,
        traveler: &Traveler,
        context: &mut TripContext,
    ) -> Result<(), GenerationError> {
        let name = stage.name();
        let prompt = stage.build_prompt(context, traveler, original_input);

        debug!(run_id = %run_id, stage = name, prompt = %prompt, "stage started");
        self.sink.try_emit(PipelineEvent::stage_started(run_id, name));

        let stage_start = Instant::now();
        let request = GenerationRequest {
            prompt,
            instruction: stage.instruction(),
            traveler: traveler.clone(),
            response_schema: stage.response_schema(),
        };

        match self.generate_typed::<S::Output>(request).await {
            Ok(output) => {
                stage.merge(output, context);
                let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;
                debug!(run_id = %run_id, stage = name, duration_ms, "stage completed");
                self.sink
                    .try_emit(PipelineEvent::stage_completed(run_id, name, duration_ms));
                Ok(())
            }
            Err(source) => {
                let err = GenerationError::new(name, source);
                let duration_ms = stage_start.elapsed().as_secs_f64() * 1000.0;
                self.sink.try_emit(
                    PipelineEvent::stage_failed(run_id, name, &err.to_string())
                        .add_data("duration_ms", json!(duration_ms)),
                );
                Err(err)
            }
        }
    }

    /// Calls the generator and validates the value against the stage's
    /// typed record. A value the record cannot deserialize is a stage
    /// failure, same as a transport error.
    async fn generate_typed<T: DeserializeOwned>(
        &self,
        request: GenerationRequest,
    ) -> Result<T, GeneratorError> {
        let value = self.generator.generate(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::testing::ScriptedGenerator;
    use pretty_assertions::assert_eq;

    fn traveler() -> Traveler {
        Traveler::new("Ana", "Boston")
    }

    fn scripted_beach_trip() -> ScriptedGenerator {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": "Cancun" }));
        generator.enqueue_value(json!({
            "from_city": "Boston",
            "to_city": "Cancun",
            "arrival_time": "2025-03-01T14:00"
        }));
        generator.enqueue_value(json!({
            "name": "Hotel Azul",
            "location": "Cancun Beachfront",
            "price_per_night_usd": 150,
            "stars": 4
        }));
        generator.enqueue_value(json!({
            "personalized_for": "Ana",
            "top_activities": ["snorkeling", "sunset cruise"]
        }));
        generator
    }

    fn scripted_city_trip() -> ScriptedGenerator {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": "Kyoto" }));
        generator.enqueue_value(json!({
            "from_city": "Seattle",
            "to_city": "Kyoto",
            "arrival_time": "2025-04-02T09:30"
        }));
        generator.enqueue_value(json!({
            "name": "Gion Ryokan",
            "location": "Gion District",
            "price_per_night_usd": 210,
            "stars": 5
        }));
        generator.enqueue_value(json!({
            "personalized_for": "Bo",
            "top_activities": ["temple walk", "tea ceremony"]
        }));
        generator
    }

    #[tokio::test]
    async fn test_beach_vacation_scenario() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        let context = planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let expected = TripContext {
            destination: Some("Cancun".to_string()),
            from_city: Some("Boston".to_string()),
            arrival_time: Some("2025-03-01T14:00".to_string()),
            hotel_name: Some("Hotel Azul".to_string()),
            hotel_location: Some("Cancun Beachfront".to_string()),
            hotel_price_usd: Some(150),
            hotel_stars: Some(4),
            activities: vec!["snorkeling".to_string(), "sunset cruise".to_string()],
        };
        assert_eq!(context, expected);
        assert_eq!(generator.call_count(), 4);

        // The flight output's to_city is narrowed away, not merged.
        let serialized = serde_json::to_value(&context).unwrap();
        assert!(serialized.get("to_city").is_none());
    }

    #[tokio::test]
    async fn test_flight_prompt_uses_merged_destination() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let flight_prompt = generator.prompt_at(1).unwrap();
        assert_eq!(flight_prompt, "Plan a flight from Boston to Cancun.");
        assert!(!flight_prompt.contains("relaxing beach vacation"));
    }

    #[tokio::test]
    async fn test_hotel_prompt_references_arrival_time() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let hotel_prompt = generator.prompt_at(2).unwrap();
        assert!(hotel_prompt.contains("hotel in Cancun"));
        assert!(hotel_prompt.contains("arriving at 2025-03-01T14:00"));
    }

    #[tokio::test]
    async fn test_activities_prompt_references_hotel_location() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let activities_prompt = generator.prompt_at(3).unwrap();
        assert!(activities_prompt.contains("close to Cancun Beachfront"));
        assert!(activities_prompt.contains("arriving at 2025-03-01T14:00"));
    }

    #[tokio::test]
    async fn test_destination_prompt_is_original_input() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        assert_eq!(
            generator.prompt_at(0).as_deref(),
            Some("a relaxing beach vacation")
        );
    }

    #[tokio::test]
    async fn test_requests_carry_instruction_schema_and_traveler() {
        let generator = Arc::new(scripted_beach_trip());
        let planner = TripPlanner::new(generator.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let requests = generator.requests();
        assert!(requests[0].instruction.contains("travel destination"));
        assert_eq!(
            requests[2].response_schema["required"],
            json!(["name", "location", "price_per_night_usd", "stars"])
        );
        assert_eq!(requests[1].traveler, traveler());
    }

    #[tokio::test]
    async fn test_hotel_failure_short_circuits() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": "Cancun" }));
        generator.enqueue_value(json!({
            "from_city": "Boston",
            "to_city": "Cancun",
            "arrival_time": "2025-03-01T14:00"
        }));
        generator.enqueue_error(GeneratorError::api(503, "model overloaded"));
        let generator = Arc::new(generator);
        let planner = TripPlanner::new(generator.clone());

        let err = planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap_err();

        assert_eq!(err.stage, "hotel");
        assert_eq!(generator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_schema_mismatch_fails_stage() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": 42 }));
        let generator = Arc::new(generator);
        let planner = TripPlanner::new(generator.clone());

        let err = planner.run("anywhere", &traveler()).await.unwrap_err();

        assert_eq!(err.stage, "destination");
        assert!(matches!(err.source, GeneratorError::Json(_)));
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_field_fails_flight_stage() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": "Cancun" }));
        generator.enqueue_value(json!({ "from_city": "Boston", "to_city": "Cancun" }));
        let generator = Arc::new(generator);
        let planner = TripPlanner::new(generator.clone());

        let err = planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap_err();

        assert_eq!(err.stage, "flight");
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_event_stream_order() {
        let sink = Arc::new(CollectingEventSink::new());
        let planner =
            TripPlanner::new(Arc::new(scripted_beach_trip())).with_event_sink(sink.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let types = sink.event_types();
        let types: Vec<&str> = types.iter().map(String::as_str).collect();
        assert_eq!(
            types,
            vec![
                "pipeline.started",
                "stage.started",
                "stage.completed",
                "stage.started",
                "stage.completed",
                "stage.started",
                "stage.completed",
                "stage.started",
                "stage.completed",
                "pipeline.completed",
            ]
        );

        let started = sink.events_of_type("stage.started");
        assert_eq!(started[1].data.get("stage"), Some(&json!("flight")));
    }

    #[tokio::test]
    async fn test_failed_run_emits_pipeline_failed() {
        let generator = ScriptedGenerator::new();
        generator.enqueue_value(json!({ "destination": "Cancun" }));
        generator.enqueue_value(json!({
            "from_city": "Boston",
            "to_city": "Cancun",
            "arrival_time": "2025-03-01T14:00"
        }));
        generator.enqueue_error(GeneratorError::EmptyResponse);

        let sink = Arc::new(CollectingEventSink::new());
        let planner = TripPlanner::new(Arc::new(generator)).with_event_sink(sink.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap_err();

        assert_eq!(sink.events_of_type("stage.started").len(), 3);

        let failed = sink.events_of_type("stage.failed");
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].data.get("stage"), Some(&json!("hotel")));

        let types = sink.event_types();
        assert_eq!(types.last().map(String::as_str), Some("pipeline.failed"));
    }

    #[tokio::test]
    async fn test_events_share_one_run_id() {
        let sink = Arc::new(CollectingEventSink::new());
        let planner =
            TripPlanner::new(Arc::new(scripted_beach_trip())).with_event_sink(sink.clone());

        planner
            .run("a relaxing beach vacation", &traveler())
            .await
            .unwrap();

        let events = sink.events();
        let run_id = events[0].run_id;
        assert!(events.iter().all(|event| event.run_id == run_id));
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let beach_planner = TripPlanner::new(Arc::new(scripted_beach_trip()));
        let city_planner = TripPlanner::new(Arc::new(scripted_city_trip()));

        // The travelers must outlive the join: the futures borrow them.
        let ana = traveler();
        let bo = Traveler::new("Bo", "Seattle");
        let (beach, city) = tokio::join!(
            beach_planner.run("a relaxing beach vacation", &ana),
            city_planner.run("temples and gardens", &bo),
        );

        let beach = beach.unwrap();
        let city = city.unwrap();
        assert_eq!(beach.destination.as_deref(), Some("Cancun"));
        assert_eq!(city.destination.as_deref(), Some("Kyoto"));
        assert_eq!(city.hotel_name.as_deref(), Some("Gion Ryokan"));
    }
}
