//! System clipboard access
//!
//! Copies run on their own thread: on Linux the clipboard owner has to stay
//! alive until a clipboard manager takes the data, which can block.

use crossbeam_channel::Sender;

use crate::app::Action;

pub const COPIED_MESSAGE: &str = "Copied to clipboard";

/// Copy `text` and report the outcome as a status message on `tx`
pub fn copy_text(text: String, tx: Sender<Action>) {
    std::thread::spawn(move || {
        let mut clipboard = match arboard::Clipboard::new() {
            Ok(clipboard) => clipboard,
            Err(e) => {
                tracing::warn!("Failed to access clipboard: {}", e);
                let _ = tx.send(Action::SetStatus(format!("Clipboard unavailable: {}", e)));
                return;
            }
        };

        #[cfg(target_os = "linux")]
        {
            use arboard::SetExtLinux;
            // wait() returns once another client owns the selection
            let _ = tx.send(Action::SetStatus(COPIED_MESSAGE.to_string()));
            let result = clipboard.set().wait().text(text);
            if result.is_err() {
                // Replaces the optimistic status sent above
                let _ = tx.send(Action::SetStatus(copy_status(result)));
            }
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = tx.send(Action::SetStatus(copy_status(clipboard.set_text(text))));
        }
    });
}

fn copy_status(result: Result<(), arboard::Error>) -> String {
    match result {
        Ok(()) => COPIED_MESSAGE.to_string(),
        Err(e) => {
            tracing::warn!("Failed to copy to clipboard: {}", e);
            format!("Copy failed: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_copy_is_reported() {
        let status = copy_status(Err(arboard::Error::ContentNotAvailable));
        assert!(status.starts_with("Copy failed: "));
        assert_ne!(status, COPIED_MESSAGE);
    }

    #[test]
    fn test_successful_copy_status() {
        assert_eq!(copy_status(Ok(())), COPIED_MESSAGE);
    }
}
