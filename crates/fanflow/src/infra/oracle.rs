use fanflow_core::{GameState, PitStopPrediction, Recommendation};
use hyper::header::CONTENT_TYPE;
use log::{debug, error, warn};
use mime::APPLICATION_JSON;
use reqwest_middleware::{
    self,
    reqwest::{Response, StatusCode, Url},
    ClientWithMiddleware,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Error, Debug)]
pub enum Error {
    #[error("problem sending request to oracle: {0}")]
    Send(#[from] reqwest_middleware::reqwest::Error),
    #[error("problem sending request to oracle: {0}")]
    SendMiddleware(#[from] reqwest_middleware::Error),
    #[error("problem requesting oracle: {0}")]
    Request(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("oracle temporarily unavailable: {0}")]
    Transient(String),
    #[error("oracle returned no candidate text")]
    EmptyResponse,
    #[error("oracle answer did not match the response schema: {0}")]
    Schema(String),
    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),
}

/// Turns a game snapshot into a break recommendation
#[async_trait::async_trait]
pub trait PitStopOracle: Send + Sync {
    async fn predict(&self, game: &GameState) -> Result<PitStopPrediction, Error>;
}

/// Asks the oracle, bounded by `timeout`, and swaps any failure for the fallback answer.
///
/// Failures are logged and never surfaced to the caller.
pub async fn predict_or_fallback(
    oracle: &dyn PitStopOracle,
    game: &GameState,
    timeout: Duration,
) -> PitStopPrediction {
    let outcome = match tokio::time::timeout(timeout, oracle.predict(game)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(timeout)),
    };

    match outcome {
        Ok(prediction) => {
            debug!(
                "oracle recommends {} for '{}'",
                prediction.recommendation.token(),
                game.recent_event
            );
            prediction
        }
        Err(e) => {
            warn!("prediction failed for '{}': {}", game.recent_event, e);
            PitStopPrediction::fallback()
        }
    }
}

/// Client for a Gemini-compatible `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    base_url: Url,
    model: String,
    api_key: SecretString,
    client: ClientWithMiddleware,
}

impl GeminiClient {
    pub fn new(
        client: ClientWithMiddleware,
        base_url: &Url,
        model: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        Self {
            base_url: base_url.to_owned(),
            model: model.into(),
            api_key,
            client,
        }
    }

    fn endpoint(&self) -> Result<Url, Error> {
        self.base_url
            .join(&format!("/v1beta/models/{}:generateContent", self.model))
            .map_err(|e| Error::Request(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else if status == StatusCode::BAD_REQUEST {
            Err(Error::BadRequest(
                response
                    .text()
                    .await
                    .unwrap_or(String::from("bad request to oracle")),
            ))
        } else if status == StatusCode::SERVICE_UNAVAILABLE
            || status == StatusCode::BAD_GATEWAY
            || status == StatusCode::GATEWAY_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS
        {
            let body = response.text().await.unwrap_or_default();
            Err(Error::Transient(format!(
                "error response from oracle with status {}: {:?}",
                status, body
            )))
        } else {
            let body = response.text().await?;
            Err(Error::Request(format!(
                "error response from oracle with status {}: {:?}",
                status, body
            )))
        }
    }
}

#[async_trait::async_trait]
impl PitStopOracle for GeminiClient {
    async fn predict(&self, game: &GameState) -> Result<PitStopPrediction, Error> {
        let url = self.endpoint()?;
        let body = serde_json::to_vec(&request_body(game))
            .map_err(|e| Error::Request(format!("Failed to serialize prompt: {}", e)))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, APPLICATION_JSON.to_string())
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("error sending to oracle: {}", e);
                Error::SendMiddleware(e)
            })?;

        let response = Self::check_status(response).await?;
        let content: GenerateContentResponse = response.json().await?;
        let text = content.first_text().ok_or(Error::EmptyResponse)?;

        parse_prediction(text)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .find_map(|part| part.text.as_deref())
    }
}

pub fn build_prompt(game: &GameState) -> String {
    let commercial = if game.is_commercial_break {
        "YES (Orange Sleeve visible)"
    } else {
        "NO"
    };

    format!(
        "Analyze this LIVE STADIUM DATA to determine if a fan should leave their seat NOW for a bathroom/concessions break.

SPORT: {sport}
PHASE: {phase} (LIVE, BREAK, etc.)
PERIOD: {period}
SITUATION: {situation}
EVENT: {event}
COMMERCIAL: {commercial}
SCORE: {home} - {away}

Expert Logic Requirements:
- GO_NOW: Perfect timing (halftime, TV timeout, long injury delay, between innings).
- URGENT: The window is closing fast (e.g., end of timeout).
- WAIT: Critical action is happening or about to happen.

Return JSON with fields: recommendation (GO_NOW, WAIT, URGENT), reasoning (short, high-energy), estimatedWindow (e.g., \"2:30 minutes\").",
        sport = game.sport,
        phase = game.game_phase,
        period = game.current_period,
        situation = game.time_remaining,
        event = game.recent_event,
        commercial = commercial,
        home = game.score.home,
        away = game.score.away,
    )
}

fn response_schema() -> Value {
    let tokens: Vec<&str> = Recommendation::ALL.iter().map(|r| r.token()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendation": { "type": "STRING", "enum": tokens },
            "reasoning": { "type": "STRING" },
            "estimatedWindow": { "type": "STRING" }
        },
        "required": ["recommendation", "reasoning", "estimatedWindow"]
    })
}

fn request_body(game: &GameState) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": build_prompt(game) }] }],
        "generationConfig": {
            "responseMimeType": APPLICATION_JSON.to_string(),
            "responseSchema": response_schema()
        }
    })
}

/// Parses the model's JSON answer, rejecting anything outside the response schema
pub fn parse_prediction(text: &str) -> Result<PitStopPrediction, Error> {
    serde_json::from_str(text.trim()).map_err(|e| Error::Schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::startup::build_reqwest_client;
    use fanflow_core::SportType;
    use reqwest_middleware::ClientBuilder;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn timeout_state() -> GameState {
        GameState {
            recent_event: String::from("TV Timeout"),
            is_commercial_break: true,
            game_phase: fanflow_core::GamePhase::Break,
            ..GameState::kickoff(SportType::Football)
        }
    }

    #[test]
    fn test_prompt_embeds_game_state() {
        let prompt = build_prompt(&timeout_state());

        assert!(prompt.contains("SPORT: Football"));
        assert!(prompt.contains("PHASE: BREAK"));
        assert!(prompt.contains("PERIOD: 1st Quarter"));
        assert!(prompt.contains("SITUATION: 12:45"));
        assert!(prompt.contains("EVENT: TV Timeout"));
        assert!(prompt.contains("COMMERCIAL: YES (Orange Sleeve visible)"));
        assert!(prompt.contains("SCORE: 0 - 0"));
    }

    #[test]
    fn test_request_body_carries_schema() {
        let body = request_body(&timeout_state());
        let config = &body["generationConfig"];

        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["properties"]["recommendation"]["enum"],
            json!(["GO_NOW", "WAIT", "URGENT"])
        );
        assert_eq!(
            config["responseSchema"]["required"],
            json!(["recommendation", "reasoning", "estimatedWindow"])
        );
    }

    #[test]
    fn test_parse_prediction() {
        let prediction = parse_prediction(
            "  {\"recommendation\":\"URGENT\",\"reasoning\":\"Timeout ending!\",\"estimatedWindow\":\"0:45 minutes\"}\n",
        )
        .unwrap();
        assert_eq!(prediction.recommendation, Recommendation::Urgent);

        assert!(matches!(
            parse_prediction("{\"recommendation\":\"GO_NOW\"}"),
            Err(Error::Schema(_))
        ));
        assert!(matches!(parse_prediction("not json"), Err(Error::Schema(_))));
    }

    #[test]
    fn test_first_text_skips_empty_candidates() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [] } },
                { "content": { "parts": [{ "text": "{}" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("{}"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }

    #[tokio::test]
    async fn test_unavailable_oracle_is_asked_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let unavailable = axum::Router::new().fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                axum::http::StatusCode::SERVICE_UNAVAILABLE
            }
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, unavailable).await });

        let oracle = GeminiClient::new(
            build_reqwest_client(),
            &Url::parse(&format!("http://{}", address)).unwrap(),
            "gemini-3-flash-preview",
            SecretString::from("test-key"),
        );

        let result = oracle.predict(&timeout_state()).await;
        assert!(matches!(result, Err(Error::Transient(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let prediction =
            predict_or_fallback(&oracle, &timeout_state(), Duration::from_secs(5)).await;
        assert_eq!(prediction, PitStopPrediction::fallback());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_yields_fallback() {
        let client = ClientBuilder::new(reqwest_middleware::reqwest::Client::new()).build();
        let oracle = GeminiClient::new(
            client,
            &Url::parse("http://127.0.0.1:1").unwrap(),
            "gemini-3-flash-preview",
            SecretString::from("test-key"),
        );

        let prediction =
            predict_or_fallback(&oracle, &timeout_state(), Duration::from_secs(5)).await;

        assert_eq!(prediction, PitStopPrediction::fallback());
        assert!(!prediction.is_go_now());
    }
}
