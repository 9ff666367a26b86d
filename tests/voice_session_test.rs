use anyhow::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use voice_map::adapters::console::RecordingFeedback;
use voice_map::adapters::speech::{DisabledRecognizer, LineRecognizer};
use voice_map::core::app::{ListenerState, LISTENING, SPEECH_UNSUPPORTED, TEST_ACK, TEST_OK};
use voice_map::core::search::ROUTING_UNAVAILABLE;
use voice_map::domain::model::{Place, ViewBox};
use voice_map::domain::ports::{
    Feedback, Geocoder, ListenOptions, MapSurface, RecognitionEvent, SpeechSource,
};
use voice_map::{build_app, AppConfig, VoiceMapError};

/// 不連網的 geocoder，記錄呼叫次數
#[derive(Clone, Default)]
struct CountingGeocoder {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn search(
        &self,
        query: &str,
        _viewbox: Option<ViewBox>,
    ) -> voice_map::Result<Vec<Place>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Place {
            lat: 1.0,
            lon: 2.0,
            display_name: query.to_string(),
        }])
    }
}

/// 依序重播固定事件，並記錄每次 (重新) 啟動的時間
struct ScriptedSource {
    events: VecDeque<RecognitionEvent>,
    starts: Arc<AtomicUsize>,
    started_at: Arc<Mutex<Vec<Instant>>>,
}

impl ScriptedSource {
    fn new(events: Vec<RecognitionEvent>) -> Self {
        Self {
            events: events.into(),
            starts: Arc::new(AtomicUsize::new(0)),
            started_at: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SpeechSource for ScriptedSource {
    async fn start(&mut self, options: &ListenOptions) -> voice_map::Result<()> {
        assert!(options.continuous);
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.started_at.lock().unwrap().push(Instant::now());
        Ok(())
    }

    async fn next_event(&mut self) -> Option<RecognitionEvent> {
        self.events.pop_front()
    }
}

fn config(extra: &str) -> Result<AppConfig> {
    Ok(AppConfig::from_toml_str(&format!(
        r#"
[location]
provider = "fixed"
latitude = 40.7128
longitude = -74.006

{}
"#,
        extra
    ))?)
}

fn result(items: &[&str]) -> RecognitionEvent {
    RecognitionEvent::Result(items.iter().map(|p| p.to_string()).collect())
}

#[tokio::test]
async fn test_session_runs_commands_in_order() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;
    let mut source = ScriptedSource::new(vec![
        result(&["zoom in"]),
        result(&["make bigger"]),
        result(&["minus"]),
        result(&["where am I"]),
    ]);

    app.listen(&mut source).await?;

    let history = app.feedback().history();
    assert_eq!(history[0], LISTENING);
    assert!(history.contains(&"I heard: zoom in".to_string()));
    assert!(history.contains(&"Zooming in...".to_string()));
    assert!(history.contains(&"Zooming out...".to_string()));
    // 尚未定位，所以 "where am I" 會先提示再取得位置
    assert!(history.contains(&"Your location is not available yet".to_string()));
    assert_eq!(app.feedback().status(), "Location found: 40.7128, -74.0060");
    assert_eq!(app.map().viewport().zoom, 12);
    assert_eq!(app.state(), ListenerState::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_zoom_only_moves_one_step() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;

    app.handle_phrases(&["plus".to_string()]).await;
    assert_eq!(app.map().viewport().zoom, 6);
    app.handle_phrases(&["zoom out".to_string()]).await;
    app.handle_phrases(&["make smaller".to_string()]).await;
    assert_eq!(app.map().viewport().zoom, 4);
    Ok(())
}

#[tokio::test]
async fn test_route_never_touches_the_map() -> Result<()> {
    let config = config("")?;
    let geocoder = CountingGeocoder::default();
    let mut app = build_app(&config, geocoder.clone(), RecordingFeedback::new())?;

    for phrase in [
        "route from Boston to New York",
        "route from here to there",
        "route from a to b to c",
    ] {
        let before = app.map().viewport();
        app.handle_phrases(&[phrase.to_string()]).await;
        assert_eq!(app.map().viewport(), before);
    }

    assert!(app.map().markers().is_empty());
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.feedback().acknowledgements(), vec![ROUTING_UNAVAILABLE.to_string(); 3]);
    assert_eq!(app.feedback().status(), "Finding route from a to b to c...");
    Ok(())
}

#[tokio::test]
async fn test_fallback_keywords_drive_location_handlers() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;

    // "where" 且尚無位置：先提示，再回退到取得位置
    app.handle_phrases(&["um where are we".to_string()]).await;
    assert!(app
        .feedback()
        .history()
        .contains(&"Your location is not available yet".to_string()));
    assert!(app.location().current().is_some());

    app.handle_phrases(&["where are we now".to_string()]).await;
    assert_eq!(app.feedback().status(), "Your location: 40.7128, -74.0060");
    assert_eq!(app.map().viewport().zoom, 15);

    app.handle_phrases(&["could you refresh that".to_string()]).await;
    assert_eq!(app.feedback().status(), "Location found: 40.7128, -74.0060");
    assert_eq!(app.map().markers().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unmatched_phrase_only_echoes() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;

    app.handle_phrases(&["hello there".to_string(), "yellow hair".to_string()])
        .await;

    assert_eq!(app.feedback().history(), vec!["I heard: hello there".to_string()]);
    assert!(app.map().markers().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_test_command_acknowledges() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;

    app.handle_phrases(&["Test".to_string()]).await;

    assert_eq!(app.feedback().status(), TEST_OK);
    assert_eq!(app.feedback().acknowledgements(), vec![TEST_ACK.to_string()]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_end_event_restarts_the_recognizer() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;
    let mut source = ScriptedSource::new(vec![
        result(&["zoom in"]),
        RecognitionEvent::End,
        RecognitionEvent::Error("no-speech".to_string()),
        result(&["zoom in"]),
    ]);
    let starts = source.starts.clone();

    app.listen(&mut source).await?;

    assert_eq!(starts.load(Ordering::SeqCst), 2);
    assert_eq!(app.map().viewport().zoom, 7);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_restarts_are_throttled() -> Result<()> {
    let config = config("[speech]\nrestart_throttle_ms = 1000")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;
    let mut source = ScriptedSource::new(vec![
        RecognitionEvent::End,
        RecognitionEvent::End,
        RecognitionEvent::End,
    ]);
    let started_at = source.started_at.clone();

    let begin = Instant::now();
    app.listen(&mut source).await?;

    let started_at = started_at.lock().unwrap().clone();
    assert_eq!(started_at.len(), 4);
    // 每次重啟之間至少隔一個節流間隔
    for pair in started_at.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(1000));
    }
    assert!(begin.elapsed() >= Duration::from_secs(3));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_zero_throttle_restarts_immediately() -> Result<()> {
    let config = config("[speech]\nrestart_throttle_ms = 0")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;
    let mut source = ScriptedSource::new(vec![
        RecognitionEvent::End,
        RecognitionEvent::End,
        RecognitionEvent::End,
    ]);
    let starts = source.starts.clone();

    let begin = Instant::now();
    app.listen(&mut source).await?;

    assert_eq!(starts.load(Ordering::SeqCst), 4);
    assert_eq!(begin.elapsed(), Duration::ZERO);
    Ok(())
}

#[tokio::test]
async fn test_end_event_stops_without_auto_restart() -> Result<()> {
    let config = config("[speech]\nauto_restart = false")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;
    let mut source = ScriptedSource::new(vec![
        result(&["zoom in"]),
        RecognitionEvent::End,
        result(&["zoom in"]),
    ]);
    let starts = source.starts.clone();

    app.listen(&mut source).await?;

    assert_eq!(starts.load(Ordering::SeqCst), 1);
    assert_eq!(app.map().viewport().zoom, 6);
    assert_eq!(app.state(), ListenerState::Stopped);
    Ok(())
}

#[tokio::test]
async fn test_disabled_speech_reports_unsupported() -> Result<()> {
    let config = config("")?;
    let mut app = build_app(&config, CountingGeocoder::default(), RecordingFeedback::new())?;

    let err = app.listen(&mut DisabledRecognizer).await.unwrap_err();

    assert!(matches!(err, VoiceMapError::UnsupportedError { .. }));
    assert_eq!(app.feedback().status(), SPEECH_UNSUPPORTED);
    Ok(())
}

#[tokio::test]
async fn test_line_recognizer_session() -> Result<()> {
    let config = config("")?;
    let geocoder = CountingGeocoder::default();
    let mut app = build_app(&config, geocoder.clone(), RecordingFeedback::new())?;

    let input: &[u8] = b"show pairs | show Paris\nfind cafes near me\n";
    let mut source = LineRecognizer::new(input, "|");
    app.listen(&mut source).await?;

    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    // "show pairs" 先命中；之後 nearby 加上一個結果與一個目前位置
    let labels: Vec<_> = app
        .map()
        .markers()
        .into_iter()
        .filter_map(|m| m.popup)
        .collect();
    assert!(labels.contains(&"pairs".to_string()));
    assert!(labels.contains(&"cafes".to_string()));
    assert!(labels.contains(&"You are here".to_string()));
    assert_eq!(app.feedback().status(), "Found nearby cafes.");
    Ok(())
}
