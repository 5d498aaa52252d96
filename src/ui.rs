//! Seams to the presentation layer. Toast rendering and confirmation dialogs
//! live outside this crate; the stores only ever hand them plain strings.

/// Receives user-facing messages.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
    fn success(&self, message: &str);
}

/// Asks the user to approve a destructive action, such as overwriting the
/// current configuration with an imported one.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Notifier for headless hosts: messages end up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::error!(target: "lintpad::notify", "{}", message);
    }

    fn success(&self, message: &str) {
        tracing::info!(target: "lintpad::notify", "{}", message);
    }
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
