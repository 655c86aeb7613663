//=========================================================================
// Game Configuration
//=========================================================================
//
// Construction options of a game instance.
//
// Every field is presentation-only. The core forwards the whole struct
// to the presentation port once at build time and never reads it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

//=== GameConfig ==========================================================

/// Options recognised when building a game.
///
/// Deserializes from camelCase JSON, with every field optional:
///
/// ```
/// use diorama_engine::prelude::*;
///
/// let config = GameConfig::from_json(r##"{ "container": "#stage", "maxAngle": 8 }"##).unwrap();
/// assert_eq!(config.container.as_deref(), Some("#stage"));
/// assert_eq!(config.max_angle, 8.0);
/// assert_eq!(config.lerp_factor, GameConfig::default().lerp_factor);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    /// Mount target, opaque to the core.
    pub container: Option<String>,

    /// Maximum parallax tilt in degrees.
    pub max_angle: f64,

    /// Smoothing factor for parallax motion.
    pub lerp_factor: f64,

    /// Perspective distance for depth compositing.
    pub perspective: f64,

    /// Custom cursor tint.
    pub cursor_color: String,

    /// Dialogue box styling properties.
    pub theme: BTreeMap<String, String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            container: None,
            max_angle: 10.0,
            lerp_factor: 0.1,
            perspective: 1000.0,
            cursor_color: "#ffffff".to_owned(),
            theme: BTreeMap::new(),
        }
    }
}

impl GameConfig {
    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
