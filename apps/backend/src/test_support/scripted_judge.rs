use std::sync::Mutex;

use async_trait::async_trait;

use crate::judge::{Judge, JudgeError};

enum Reply {
    Text(String),
    Status(u16, String),
    Transport(String),
}

/// A [`Judge`] that answers every prompt the same way and remembers the
/// prompts it was given.
pub struct ScriptedJudge {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedJudge {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Answer with this assistant text.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    /// Fail as if the model API answered with a non-2xx status.
    pub fn failing_with_status(status: u16, body: impl Into<String>) -> Self {
        Self::with_reply(Reply::Status(status, body.into()))
    }

    /// Fail as if the model API could not be reached.
    pub fn unreachable(detail: impl Into<String>) -> Self {
        Self::with_reply(Reply::Transport(detail.into()))
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Judge for ScriptedJudge {
    async fn judge(&self, prompt: &str) -> Result<String, JudgeError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Status(status, body) => Err(JudgeError::Status {
                status: *status,
                body: body.clone(),
            }),
            Reply::Transport(detail) => Err(JudgeError::Transport(detail.clone())),
        }
    }
}
