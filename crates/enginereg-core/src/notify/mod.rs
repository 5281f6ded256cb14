//! User-facing notifications.
//!
//! The CLI reports outcomes through a [`Notifier`] so that the blocking
//! message box used on Windows can be swapped for console output in scripts
//! and tests.

#[cfg(windows)]
mod message_box;

#[cfg(windows)]
pub use message_box::MessageBoxNotifier;

use std::io::Write;
use std::sync::Mutex;

/// Something that can tell the user about an outcome.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

/// Writes notifications to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        let _ = writeln!(std::io::stderr(), "[{}] {}", title, message);
    }
}

/// Keeps notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, as `(title, message)`.
    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push((title.to_string(), message.to_string()));
        }
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, title: &str, message: &str) {
        (**self).notify(title, message)
    }
}

/// Pick the notifier for this run.
///
/// Interactive runs on Windows get a blocking message box; everything else
/// goes to the console.
pub fn default_notifier(interactive: bool) -> Box<dyn Notifier> {
    #[cfg(windows)]
    {
        if interactive {
            return Box::new(MessageBoxNotifier);
        }
    }

    #[cfg(not(windows))]
    let _ = interactive;

    Box::new(ConsoleNotifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SharedRecorder(std::sync::Arc<RecordingNotifier>);

    impl Notifier for SharedRecorder {
        fn notify(&self, title: &str, message: &str) {
            self.0.notify(title, message)
        }
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify("Done", "Engine has been registered");
        notifier.notify("Error", "Engine path is not valid");

        assert_eq!(
            notifier.notices(),
            vec![
                ("Done".to_string(), "Engine has been registered".to_string()),
                ("Error".to_string(), "Engine path is not valid".to_string()),
            ]
        );
    }

    #[test]
    fn test_boxed_notifier_forwards() {
        let recorder = std::sync::Arc::new(RecordingNotifier::new());
        let notifier: Box<dyn Notifier> = Box::new(SharedRecorder(recorder.clone()));
        notifier.notify("Done", "forwarded");

        assert_eq!(
            recorder.notices(),
            vec![("Done".to_string(), "forwarded".to_string())]
        );
    }

    #[test]
    fn test_non_interactive_default_is_console() {
        // Must not block on a dialog.
        default_notifier(false).notify("Done", "console only");
    }
}
