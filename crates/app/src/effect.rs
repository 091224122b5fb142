//! Display effects for the panel controller.
//!
//! The static effect paints the panel assignment. Its `animData` is the panel
//! count followed by one `panelId frames R G B W transitionTime` group per
//! painted panel. The notification effect is a short explode animation that
//! plays over whatever the panels show.

use ledger_leaf_core::{DisplayConfig, PanelAssignment};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct EffectRequest<W> {
    pub write: W,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticEffect {
    pub command: &'static str,
    pub version: &'static str,
    pub anim_type: &'static str,
    pub duration: u32,
    pub anim_data: String,
    #[serde(rename = "loop")]
    pub looping: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplodeEffect {
    pub command: &'static str,
    pub version: &'static str,
    pub anim_type: &'static str,
    pub duration: u32,
    pub explode_factor: f32,
    pub window_size: u32,
    pub trans_time: TimeRange,
    pub delay_time: TimeRange,
    pub palette: Vec<HsbColor>,
    pub color_type: &'static str,
    #[serde(rename = "loop")]
    pub looping: bool,
}

/// Random range in tenths of a second.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub max_value: u32,
    pub min_value: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HsbColor {
    pub hue: u16,
    pub saturation: u8,
    pub brightness: u8,
}

pub fn anim_data(assignment: &PanelAssignment, display: &DisplayConfig) -> String {
    let mut data = assignment.len().to_string();
    for panel in assignment.panels() {
        data.push_str(&format!(
            " {} {} {} {}",
            panel.panel_id, display.frames, panel.color, display.transition_time
        ));
    }
    data
}

/// Builds the request body, or `None` when there is nothing to paint.
pub fn static_effect(
    assignment: &PanelAssignment,
    display: &DisplayConfig,
) -> Option<EffectRequest<StaticEffect>> {
    if assignment.is_empty() {
        return None;
    }

    Some(EffectRequest {
        write: StaticEffect {
            command: "display",
            version: "1.0",
            anim_type: "static",
            duration: display.duration_seconds,
            anim_data: anim_data(assignment, display),
            looping: false,
        },
    })
}

/// Temporary blue and white burst shown for each incoming notification.
pub fn notification_effect(display: &DisplayConfig) -> EffectRequest<ExplodeEffect> {
    let timing = TimeRange {
        max_value: 20,
        min_value: 5,
    };

    EffectRequest {
        write: ExplodeEffect {
            command: "displayTemp",
            version: "1.0",
            anim_type: "explode",
            duration: display.duration_seconds,
            explode_factor: 0.5,
            window_size: 2,
            trans_time: timing,
            delay_time: timing,
            palette: vec![
                HsbColor {
                    hue: 200,
                    saturation: 100,
                    brightness: 100,
                },
                HsbColor {
                    hue: 0,
                    saturation: 0,
                    brightness: 100,
                },
            ],
            color_type: "HSB",
            looping: false,
        },
    }
}
