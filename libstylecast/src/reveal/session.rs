//! A single reveal run and its pure step function.

/// Lifecycle of a [`RevealSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl RevealStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RevealStatus::Idle => "idle",
            RevealStatus::Running => "running",
            RevealStatus::Completed => "completed",
            RevealStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for RevealStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One run of the typewriter reveal over a fixed string
///
/// The visible text is always derived from `revealed_len`, counted in
/// `char`s, so re-rendering between steps can never lose or duplicate
/// characters. `full_text` never changes once the session exists.
/// `revealed_bytes` is the byte offset of that prefix, kept in step with
/// `revealed_len` so reading the prefix never rescans the string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealSession {
    full_text: String,
    total_len: usize,
    revealed_len: usize,
    revealed_bytes: usize,
    status: RevealStatus,
}

impl RevealSession {
    /// An empty session that has not started
    pub fn idle() -> Self {
        Self::default()
    }

    /// Begin revealing `text`
    ///
    /// Without animation, or for an empty string, the session is created
    /// already `Completed` with everything visible.
    pub fn begin(text: impl Into<String>, animate: bool) -> Self {
        let full_text = text.into();
        let total_len = full_text.chars().count();

        if !animate || total_len == 0 {
            return Self {
                revealed_bytes: full_text.len(),
                full_text,
                total_len,
                revealed_len: total_len,
                status: RevealStatus::Completed,
            };
        }

        Self {
            full_text,
            total_len,
            revealed_len: 0,
            revealed_bytes: 0,
            status: RevealStatus::Running,
        }
    }

    /// Reveal exactly one more character
    ///
    /// Returns the session unchanged unless it is `Running`. The step that
    /// exposes the last character moves the session to `Completed`.
    #[must_use]
    pub fn step(self) -> Self {
        if self.status != RevealStatus::Running {
            return self;
        }

        let Some(next) = self.full_text[self.revealed_bytes..].chars().next() else {
            return self;
        };
        let revealed_len = self.revealed_len + 1;
        let revealed_bytes = self.revealed_bytes + next.len_utf8();
        let status = if revealed_len == self.total_len {
            RevealStatus::Completed
        } else {
            RevealStatus::Running
        };

        Self {
            revealed_len,
            revealed_bytes,
            status,
            ..self
        }
    }

    /// Stop a running session, keeping what is already visible
    #[must_use]
    pub fn cancel(self) -> Self {
        if self.status != RevealStatus::Running {
            return self;
        }
        Self {
            status: RevealStatus::Cancelled,
            ..self
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The currently visible prefix of `full_text`
    pub fn revealed_text(&self) -> &str {
        &self.full_text[..self.revealed_bytes]
    }

    pub fn revealed_len(&self) -> usize {
        self.revealed_len
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    pub fn status(&self) -> RevealStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == RevealStatus::Running
    }
}
