use serde::{Deserialize, Serialize};

/// The Flask development server's default address.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Serialize, Deserialize, Clone)]
pub struct UiSettings {
    pub server_url: String,
    pub ui_scale: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            ui_scale: 1.0,
        }
    }
}
