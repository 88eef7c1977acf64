//! Restaurant settings (branding/contact singleton)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSettings {
    pub name: String,
    pub tagline: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// ISO 4217 currency code shown in the UI
    #[serde(default = "default_currency")]
    pub currency: String,
    pub opening_hours: Option<String>,
}

fn default_currency() -> String {
    "INR".to_string()
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        Self {
            name: "Masala".to_string(),
            tagline: None,
            phone: None,
            address: None,
            currency: default_currency(),
            opening_hours: None,
        }
    }
}
