//! Toast notifications raised by page actions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
    Info,
}

impl ToastLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// FIFO queue of pending toasts. The front end drains it after each action.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    queue: Vec<Toast>,
}

impl Toasts {
    #[must_use]
    pub const fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.queue.push(Toast {
            level,
            message: message.into(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    #[must_use]
    pub fn last(&self) -> Option<&Toast> {
        self.queue.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every pending toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut toasts = Toasts::new();
        toasts.success("Клиент успешно добавлен");
        toasts.error("Ошибка при обновлении клиента");
        let drained = toasts.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, ToastLevel::Success);
        assert_eq!(drained[1].message, "Ошибка при обновлении клиента");
        assert!(toasts.is_empty());
    }
}
