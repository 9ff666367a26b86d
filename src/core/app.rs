use crate::config::AppConfig;
use crate::core::commands::Command;
use crate::core::dispatcher::{CommandDispatcher, Dispatch};
use crate::core::location::LocationService;
use crate::core::search::PlaceSearch;
use crate::domain::model::ZoomLevels;
use crate::domain::ports::{
    Feedback, Geocoder, ListenOptions, MapSurface, PositionProvider, RecognitionEvent, SpeechSource,
};
use crate::utils::error::Result;
use std::time::Duration;
use tokio::time::Instant;

pub const LISTENING: &str = "Voice recognition active. Try speaking a command.";
pub const SPEECH_UNSUPPORTED: &str = "Voice recognition is not supported.";
pub const TEST_OK: &str = "Voice recognition test successful!";
pub const TEST_ACK: &str = "Voice system is working!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Stopped,
    Listening,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub zooms: ZoomLevels,
    pub listen: ListenOptions,
    pub auto_restart: bool,
    pub restart_throttle: Duration,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            zooms: ZoomLevels::default(),
            listen: ListenOptions {
                language: "en-US".to_string(),
                continuous: true,
            },
            auto_restart: true,
            restart_throttle: Duration::from_millis(1000),
        }
    }
}

impl AppSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            zooms: config.map.zoom_levels,
            listen: ListenOptions {
                language: config.speech.language.clone(),
                continuous: config.speech.continuous,
            },
            auto_restart: config.speech.auto_restart,
            restart_throttle: Duration::from_millis(config.speech.restart_throttle_ms),
        }
    }
}

/// 語音控制的地圖：一次處理一個事件，處理完畢才看下一句
pub struct VoiceMap<M, P, G, F>
where
    M: MapSurface,
    P: PositionProvider,
    G: Geocoder,
    F: Feedback,
{
    map: M,
    location: LocationService<P>,
    search: PlaceSearch<G>,
    dispatcher: CommandDispatcher,
    feedback: F,
    settings: AppSettings,
    state: ListenerState,
}

impl<M, P, G, F> VoiceMap<M, P, G, F>
where
    M: MapSurface,
    P: PositionProvider,
    G: Geocoder,
    F: Feedback,
{
    pub fn new(
        map: M,
        location: LocationService<P>,
        search: PlaceSearch<G>,
        dispatcher: CommandDispatcher,
        feedback: F,
        settings: AppSettings,
    ) -> Self {
        Self {
            map,
            location,
            search,
            dispatcher,
            feedback,
            settings,
            state: ListenerState::Stopped,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn location(&self) -> &LocationService<P> {
        &self.location
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn state(&self) -> ListenerState {
        self.state
    }

    /// 啟動時先取得一次位置
    pub async fn initialize(&mut self) {
        tracing::info!(
            "🚀 Map ready at {} @ z{} with {} command patterns",
            self.map.viewport().center,
            self.map.viewport().zoom,
            self.dispatcher.table().len()
        );
        self.refresh_location().await;
    }

    /// 先顯示第一個候選句，再分派並執行對應指令
    pub async fn handle_phrases(&mut self, phrases: &[String]) -> Dispatch {
        tracing::info!("Heard phrases: {:?}", phrases);
        if let Some(top) = phrases.first() {
            self.feedback.set_status(&format!("I heard: {}", top));
        }

        let dispatch = self.dispatcher.dispatch(phrases);
        match &dispatch {
            Dispatch::Matched { command, .. } | Dispatch::Fallback { command, .. } => {
                self.execute(command).await;
            }
            Dispatch::NoMatch => tracing::info!("No match found for: {:?}", phrases),
        }
        dispatch
    }

    pub async fn execute(&mut self, command: &Command) {
        tracing::debug!("Executing {:?}", command);
        let zooms = self.settings.zooms;

        match command {
            Command::FindPlace { place } => {
                self.search
                    .find_place(place, &mut self.map, &self.feedback, zooms.place)
                    .await;
            }
            Command::FindNearby { category } => {
                self.search
                    .find_nearby(
                        category,
                        &mut self.location,
                        &mut self.map,
                        &self.feedback,
                        &zooms,
                    )
                    .await;
            }
            Command::PlanRoute {
                source,
                destination,
            } => self.search.plan_route(source, destination, &self.feedback),
            Command::ZoomIn => {
                let zoom = self.map.zoom_in();
                tracing::debug!("Zoom -> {}", zoom);
                self.feedback.set_status("Zooming in...");
            }
            Command::ZoomOut => {
                let zoom = self.map.zoom_out();
                tracing::debug!("Zoom -> {}", zoom);
                self.feedback.set_status("Zooming out...");
            }
            Command::RefreshLocation => self.refresh_location().await,
            Command::ReportLocation => {
                self.location
                    .report_location(&mut self.map, &self.feedback, zooms.report, zooms.located)
                    .await;
            }
            Command::TestCommand => {
                self.feedback.set_status(TEST_OK);
                self.feedback.acknowledge(TEST_ACK);
            }
        }
    }

    async fn refresh_location(&mut self) {
        let zoom = self.settings.zooms.located;
        self.location
            .refresh_location(&mut self.map, &self.feedback, zoom)
            .await;
    }

    /// 持續聆聽直到語音來源結束。來源回報 `End` 時，若允許則重新啟動 (有節流)。
    pub async fn listen<S: SpeechSource>(&mut self, source: &mut S) -> Result<()> {
        if let Err(e) = source.start(&self.settings.listen).await {
            tracing::warn!("Speech recognition unavailable: {}", e);
            self.feedback.set_status(SPEECH_UNSUPPORTED);
            return Err(e);
        }

        self.state = ListenerState::Listening;
        self.feedback.set_status(LISTENING);
        let mut started_at = Instant::now();

        while let Some(event) = source.next_event().await {
            match event {
                RecognitionEvent::Result(phrases) => {
                    self.handle_phrases(&phrases).await;
                }
                RecognitionEvent::Error(message) => {
                    tracing::warn!("Speech recognition error: {}", message);
                }
                RecognitionEvent::End => {
                    self.state = ListenerState::Stopped;
                    if !self.settings.auto_restart {
                        tracing::info!("Speech recognition ended");
                        break;
                    }

                    let elapsed = started_at.elapsed();
                    if elapsed < self.settings.restart_throttle {
                        tokio::time::sleep(self.settings.restart_throttle - elapsed).await;
                    }

                    tracing::debug!("Restarting speech recognition");
                    source.start(&self.settings.listen).await?;
                    started_at = Instant::now();
                    self.state = ListenerState::Listening;
                }
            }
        }

        self.state = ListenerState::Stopped;
        Ok(())
    }
}
