//! Bridge settings.
//!
//! All settings are booleans. They can be set individually on the
//! controller or loaded from JSON; missing keys keep their defaults.
//!
//! # Example
//!
//! ```
//! use leap_bridge::control::BridgeConfig;
//! use leap_bridge::source::policy;
//!
//! let config = BridgeConfig::from_json(r#"{"unique": true, "hmd": true}"#).unwrap();
//! assert!(config.unique);
//! assert!(config.images);
//! assert_eq!(
//!     config.policy_flags(),
//!     policy::BACKGROUND_FRAMES | policy::IMAGES | policy::OPTIMIZE_HMD
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::decompose::Dialect;
use crate::error::Result;
use crate::source::policy;

/// User-facing settings of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Suppress output when no new frame arrived since the last poll.
    pub unique: bool,
    /// Replay every frame since the last emitted one instead of only the latest.
    pub allframes: bool,
    /// Request and emit stereo IR images.
    pub images: bool,
    /// Emit a `serialized_frame` envelope before each frame.
    pub serialize: bool,
    /// Emit the four motion-tracking records per frame.
    pub motion_tracking: bool,
    /// Optimize tracking for a head-mounted sensor.
    pub hmd: bool,
    /// Keep receiving frames while the host application is unfocused.
    pub background: bool,
    /// Use the legacy record dialect.
    #[serde(alias = "aka")]
    pub legacy: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            unique: false,
            allframes: false,
            images: true,
            serialize: false,
            motion_tracking: false,
            hmd: false,
            background: true,
            legacy: false,
        }
    }
}

impl BridgeConfig {
    /// Parse settings from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Sensor policy flags implied by `background`, `images` and `hmd`.
    pub fn policy_flags(&self) -> u32 {
        let mut flags = policy::DEFAULT;
        if self.background {
            flags |= policy::BACKGROUND_FRAMES;
        }
        if self.images {
            flags |= policy::IMAGES;
        }
        if self.hmd {
            flags |= policy::OPTIMIZE_HMD;
        }
        flags
    }

    pub fn dialect(&self) -> Dialect {
        if self.legacy {
            Dialect::Legacy
        } else {
            Dialect::Native
        }
    }
}
