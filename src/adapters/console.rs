use crate::domain::ports::Feedback;
use std::sync::Mutex;

/// 狀態列印到終端機
#[derive(Debug, Default)]
pub struct ConsoleFeedback {
    status: Mutex<String>,
}

impl ConsoleFeedback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Feedback for ConsoleFeedback {
    fn set_status(&self, text: &str) {
        tracing::info!("{}", text);
        println!("🗺️  {}", text);
        if let Ok(mut status) = self.status.lock() {
            *status = text.to_string();
        }
    }

    fn status(&self) -> String {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default()
    }

    fn acknowledge(&self, text: &str) {
        tracing::info!("Acknowledgement: {}", text);
        println!("⚠️  {}", text);
    }
}

/// 在記憶體中保留每次狀態更新與確認訊息
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    history: Mutex<Vec<String>>,
    acknowledgements: Mutex<Vec<String>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    pub fn acknowledgements(&self) -> Vec<String> {
        self.acknowledgements
            .lock()
            .map(|acks| acks.clone())
            .unwrap_or_default()
    }
}

impl Feedback for RecordingFeedback {
    fn set_status(&self, text: &str) {
        tracing::debug!("status: {}", text);
        if let Ok(mut history) = self.history.lock() {
            history.push(text.to_string());
        }
    }

    fn status(&self) -> String {
        self.history
            .lock()
            .ok()
            .and_then(|history| history.last().cloned())
            .unwrap_or_default()
    }

    fn acknowledge(&self, text: &str) {
        if let Ok(mut acks) = self.acknowledgements.lock() {
            acks.push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_last_write_wins() {
        let feedback = RecordingFeedback::new();
        assert_eq!(feedback.status(), "");

        feedback.set_status("first");
        feedback.set_status("second");
        assert_eq!(feedback.status(), "second");
        assert_eq!(feedback.history().len(), 2);

        let console = ConsoleFeedback::new();
        console.set_status("one");
        console.set_status("two");
        assert_eq!(console.status(), "two");
    }
}
