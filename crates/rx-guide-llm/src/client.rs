//! The seam between the pipeline and whatever generative model answers it.

use std::cell::RefCell;

use thiserror::Error;

use crate::image::ImageInput;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Cannot connect to model endpoint at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse model response: {0}")]
    ResponseParsing(String),

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// One generation call: a text prompt, optionally with an image.
#[derive(Debug, Clone, Copy)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub image: Option<&'a ImageInput>,
    /// Ask the model to answer with JSON only.
    pub json_mode: bool,
}

impl<'a> GenerateRequest<'a> {
    pub fn text(prompt: &'a str) -> Self {
        Self {
            prompt,
            image: None,
            json_mode: false,
        }
    }

    pub fn with_image(mut self, image: &'a ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Anything that turns a prompt into text.
pub trait GenerativeModel {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError>;
}

/// Scripted model for tests.
///
/// Rules are checked in order; the first whose needle occurs in the prompt answers.
/// Requests that match nothing fail with [`ModelError::EmptyResponse`].
#[derive(Default)]
pub struct MockModel {
    rules: Vec<(String, Result<String, u16>)>,
    prompts: RefCell<Vec<(String, bool)>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts containing `needle` with `response`.
    pub fn respond(mut self, needle: &str, response: &str) -> Self {
        self.rules.push((needle.to_string(), Ok(response.to_string())));
        self
    }

    /// Fail prompts containing `needle` with an API error.
    pub fn fail(mut self, needle: &str, status: u16) -> Self {
        self.rules.push((needle.to_string(), Err(status)));
        self
    }

    /// Prompts seen so far, with their JSON-mode flag.
    pub fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl GenerativeModel for MockModel {
    fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ModelError> {
        self.prompts
            .borrow_mut()
            .push((request.prompt.to_string(), request.json_mode));

        match self
            .rules
            .iter()
            .find(|(needle, _)| request.prompt.contains(needle.as_str()))
        {
            Some((_, Ok(response))) => Ok(response.clone()),
            Some((_, Err(status))) => Err(ModelError::Api {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            None => Err(ModelError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_first_rule_wins() {
        let model = MockModel::new()
            .respond("Augmentin", "first")
            .respond("Aug", "second");
        let answer = model.generate(&GenerateRequest::text("About Augmentin")).unwrap();
        assert_eq!(answer, "first");
    }

    #[test]
    fn test_mock_records_prompts() {
        let model = MockModel::new().fail("boom", 503);
        assert!(matches!(
            model.generate(&GenerateRequest::text("boom").json()),
            Err(ModelError::Api { status: 503, .. })
        ));
        assert!(matches!(
            model.generate(&GenerateRequest::text("unmatched")),
            Err(ModelError::EmptyResponse)
        ));
        assert_eq!(
            model.prompts(),
            vec![("boom".to_string(), true), ("unmatched".to_string(), false)]
        );
        assert_eq!(model.call_count(), 2);
    }
}
