use ratatui::style::Color;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Checking,
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Checking => return "Checking backend...",
            HealthStatus::Healthy => return "Backend connected",
            HealthStatus::Unhealthy => return "Backend unavailable",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Checking => return "◌",
            HealthStatus::Healthy => return "●",
            HealthStatus::Unhealthy => return "✕",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            HealthStatus::Checking => return Color::DarkGray,
            HealthStatus::Healthy => return Color::Green,
            HealthStatus::Unhealthy => return Color::Red,
        }
    }
}
