use crate::domain::ports::{ListenOptions, RecognitionEvent, SpeechSource};
use crate::utils::error::{Result, VoiceMapError};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// 每一行輸入視為一次辨識結果，候選句以 `separator` 分隔
///
/// ```text
/// zoom in
/// show paris | show pairs
/// ```
pub struct LineRecognizer<R> {
    lines: Lines<R>,
    separator: String,
    listening: bool,
}

impl<R: AsyncBufRead + Unpin + Send> LineRecognizer<R> {
    pub fn new(reader: R, separator: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            separator: separator.into(),
            listening: false,
        }
    }

    fn parse_line(&self, line: &str) -> Vec<String> {
        let alternatives: Vec<String> = if self.separator.is_empty() {
            vec![line.trim().to_string()]
        } else {
            line.split(self.separator.as_str())
                .map(|part| part.trim().to_string())
                .collect()
        };
        alternatives
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect()
    }
}

impl LineRecognizer<BufReader<Stdin>> {
    pub fn stdin(separator: impl Into<String>) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), separator)
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechSource for LineRecognizer<R> {
    async fn start(&mut self, options: &ListenOptions) -> Result<()> {
        tracing::debug!(
            "Line recognizer started (language: {}, continuous: {})",
            options.language,
            options.continuous
        );
        self.listening = true;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        if !self.listening {
            return None;
        }

        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    let phrases = self.parse_line(&line);
                    if !phrases.is_empty() {
                        return Some(RecognitionEvent::Result(phrases));
                    }
                }
                // EOF：輸入來源已關閉，無法重新啟動
                Ok(None) => {
                    self.listening = false;
                    return None;
                }
                Err(e) => {
                    self.listening = false;
                    return Some(RecognitionEvent::Error(e.to_string()));
                }
            }
        }
    }
}

/// 關閉語音輸入時使用
#[derive(Debug, Default)]
pub struct DisabledRecognizer;

#[async_trait]
impl SpeechSource for DisabledRecognizer {
    async fn start(&mut self, _options: &ListenOptions) -> Result<()> {
        Err(VoiceMapError::UnsupportedError {
            capability: "Voice recognition".to_string(),
        })
    }

    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        None
    }
}
