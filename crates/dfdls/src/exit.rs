use std::process::ExitCode;

/// Outcome of a command: an exit status plus an optional message for stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    success: bool,
    message: Option<String>,
}

impl Exit {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn error() -> Self {
        Self {
            success: false,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
