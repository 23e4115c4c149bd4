#![allow(dead_code)]

use std::sync::Mutex;

use clipscribe_engine::{ContentGenerator, Credential, FailureKind, GenerateError};

type Script = dyn Fn(&str, &str) -> Result<String, GenerateError> + Send + Sync;

/// Generator driven by a closure over `(credential, input)` that records every call.
pub struct ScriptedGenerator {
    script: Box<Script>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    pub fn new(
        script: impl Fn(&str, &str) -> Result<String, GenerateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every input succeeds with `# {input}` as its content.
    pub fn echo() -> Self {
        Self::new(|_, input| Ok(format!("# {input}\n\nbody")))
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn inputs(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, input)| input).collect()
    }
}

#[async_trait::async_trait]
impl ContentGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        credential: &Credential,
        input: &str,
    ) -> Result<String, GenerateError> {
        self.calls
            .lock()
            .unwrap()
            .push((credential.expose().to_string(), input.to_string()));
        (self.script)(credential.expose(), input)
    }
}

pub fn rate_limited() -> GenerateError {
    GenerateError::new(FailureKind::RateLimited, "quota exceeded")
}

pub fn server_error() -> GenerateError {
    GenerateError::new(FailureKind::HttpStatus(500), "internal")
}

pub fn credentials(tokens: &[&str]) -> Vec<Credential> {
    tokens.iter().map(|t| Credential::new(*t)).collect()
}
