use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ReasoningError;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.9;
const MAX_TOKENS: u32 = 4000;

/// Role priming sent with every instruction document.
pub const SYSTEM_PROMPT: &str = "Eres un ingeniero geotécnico senior con 30 años de experiencia en estabilización de suelos. \
Realiza análisis técnicos exhaustivos basados en evidencia científica y normativa. \
Sigue estrictamente estos requisitos:\n\
1. Evalúa primero la coherencia de los parámetros ingresados\n\
2. Clasifica el suelo con precisión según los sistemas USCS y AASHTO\n\
3. Identifica problemas específicos basados en los datos\n\
4. Recomienda UN único método ESPECÍFICO después de analizar todas las opciones\n\
5. Justifica con normativas exactas (ASTM, AASHTO, ISO) y artículos científicos indexados\n\
6. Propone 5 aplicaciones específicas con ejemplos reales cuando sea posible\n\
Responde usando exactamente estos encabezados: Evaluación de Parámetros:, Clasificación del Suelo:, \
Problemas Identificados:, Recomendación Óptima:, Justificación Técnica:, Aplicaciones Recomendadas:\n\
Sé extremadamente preciso y técnico en todas las explicaciones.";

/// External free-text generator. Any failure is fatal for the request.
pub trait ReasoningClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError>;
}

#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct ChatCompletionsClient {
    client: Client,
    config: ChatCompletionsConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build reasoning http client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ReasoningClient for ChatCompletionsClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, ReasoningError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
        };

        info!(model = %self.config.model, prompt_chars = prompt.chars().count(), "querying reasoning model");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReasoningError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        let body: ChatResponse = response
            .json()
            .map_err(|err| ReasoningError::Decode(err.to_string()))?;

        extract_content(body)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, ReasoningError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ReasoningError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Section;

    #[test]
    fn system_prompt_restates_every_heading() {
        for section in Section::ALL {
            assert!(
                SYSTEM_PROMPT.contains(section.heading()),
                "missing heading {}",
                section.heading()
            );
        }
    }

    #[test]
    fn empty_choices_are_a_reasoning_failure() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).expect("body");
        assert!(matches!(extract_content(body), Err(ReasoningError::Empty)));

        let body: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "   "}}]}"#)
                .expect("body");
        assert!(matches!(extract_content(body), Err(ReasoningError::Empty)));
    }

    #[test]
    fn first_choice_content_is_returned() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Evaluación de Parámetros: ok"}}]}"#,
        )
        .expect("body");
        assert_eq!(
            extract_content(body).expect("content"),
            "Evaluación de Parámetros: ok"
        );
    }

    #[test]
    fn endpoint_joins_base_without_double_slash() {
        let client = ChatCompletionsClient::new(ChatCompletionsConfig {
            api_base: "http://localhost:8080/v1/".to_string(),
            api_key: "test".to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(1),
        })
        .expect("client");
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }
}
