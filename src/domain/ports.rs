use crate::domain::model::{Coordinate, Marker, MarkerId, Place, ViewBox, Viewport};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 地圖元件：視窗、縮放與標記
pub trait MapSurface: Send {
    fn viewport(&self) -> Viewport;
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    /// 回傳調整後的縮放等級
    fn zoom_in(&mut self) -> u8;
    fn zoom_out(&mut self) -> u8;
    fn add_marker(&mut self, position: Coordinate, popup: Option<String>, open: bool) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId) -> bool;
    fn markers(&self) -> Vec<Marker>;
}

/// 單次取得位置。不支援的平台回傳 `UnsupportedError`
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinate>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn search(&self, query: &str, viewbox: Option<ViewBox>) -> Result<Vec<Place>>;
}

/// 使用者看得到的回饋：一行狀態文字 (後寫者勝) 與阻塞式確認訊息
pub trait Feedback: Send + Sync {
    fn set_status(&self, text: &str);
    fn status(&self) -> String;
    fn acknowledge(&self, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// 候選辨識結果，最可能的排第一
    Result(Vec<String>),
    /// 引擎停止聆聽，可重新啟動
    End,
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListenOptions {
    pub language: String,
    pub continuous: bool,
}

#[async_trait]
pub trait SpeechSource: Send {
    async fn start(&mut self, options: &ListenOptions) -> Result<()>;
    /// 引擎永久結束後回傳 `None`
    async fn next_event(&mut self) -> Option<RecognitionEvent>;
}
