use serde::{Deserialize, Serialize};

/// Below this illuminance (lux) the dark style is used.
pub const DEFAULT_DARK_THRESHOLD_LUX: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayStyle {
    Light,
    Dark,
}

/// Picks the display style from the ambient light sensor and reports only
/// changes.
#[derive(Debug, Clone)]
pub struct AmbientLightSwitch {
    threshold_lux: f64,
    current: Option<DisplayStyle>,
}

impl Default for AmbientLightSwitch {
    fn default() -> Self {
        Self::new(DEFAULT_DARK_THRESHOLD_LUX)
    }
}

impl AmbientLightSwitch {
    pub fn new(threshold_lux: f64) -> Self {
        Self {
            threshold_lux,
            current: None,
        }
    }

    pub fn current(&self) -> Option<DisplayStyle> {
        self.current
    }

    pub fn style_for(&self, lux: f64) -> DisplayStyle {
        if lux < self.threshold_lux {
            DisplayStyle::Dark
        } else {
            DisplayStyle::Light
        }
    }

    /// The new style if the reading changes it; `None` otherwise. The first
    /// reading always reports a style.
    pub fn on_reading(&mut self, lux: f64) -> Option<DisplayStyle> {
        let style = self.style_for(lux);
        if self.current == Some(style) {
            return None;
        }
        log::debug!("switching display style to {style:?} at {lux} lx");
        self.current = Some(style);
        Some(style)
    }
}
