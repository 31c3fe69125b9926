pub mod app;
pub mod view;

pub use app::{AppInit, AppModel};
pub use view::{Frame, LogRenderer, Renderer, TextRenderer};

pub const LOADING_TEXT: &str = "載入中...";
