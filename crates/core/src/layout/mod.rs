use std::{cmp::Ordering, collections::HashSet};

use serde::{Deserialize, Serialize};

use crate::{LeafError, Result};

/// Opaque identifier the device uses to address a single panel.
pub type PanelId = u32;

/// Position of one panel in the device's layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    #[serde(rename = "panelId")]
    pub id: PanelId,
    pub x: f64,
    pub y: f64,
}

impl PanelDescriptor {
    pub fn new(id: PanelId, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }
}

/// Layout snapshot as reported by the device.
///
/// Extra fields in the device payload (side length, orientation, shape type)
/// are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(rename = "numPanels")]
    pub num_panels: usize,
    #[serde(rename = "positionData")]
    pub position_data: Vec<PanelDescriptor>,
}

impl LayoutSnapshot {
    /// Reads a snapshot from the device's JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validates the declared panel count and orders the panels.
    pub fn into_order(self) -> Result<LayoutOrder> {
        if self.num_panels != self.position_data.len() {
            return Err(LeafError::InvalidLayout(format!(
                "layout declares {} panels but lists {}",
                self.num_panels,
                self.position_data.len()
            )));
        }

        build_layout_order(self.position_data)
    }
}

/// Panels sorted top row first, left to right within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOrder {
    panels: Vec<PanelDescriptor>,
}

impl LayoutOrder {
    pub fn panels(&self) -> &[PanelDescriptor] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = PanelId> + '_ {
        self.panels.iter().map(|panel| panel.id)
    }
}

/// Orders panels by `y` descending, then `x` ascending.
///
/// The sort is stable: panels with identical coordinates keep their input
/// order, which decides where each category's run of panels lands.
pub fn build_layout_order(panels: Vec<PanelDescriptor>) -> Result<LayoutOrder> {
    if panels.is_empty() {
        return Err(LeafError::InvalidLayout("layout has no panels".into()));
    }

    let mut seen = HashSet::with_capacity(panels.len());
    for panel in &panels {
        if !seen.insert(panel.id) {
            return Err(LeafError::InvalidLayout(format!(
                "panel id {} appears more than once",
                panel.id
            )));
        }
        if !panel.x.is_finite() || !panel.y.is_finite() {
            return Err(LeafError::InvalidLayout(format!(
                "panel {} has a non-finite position",
                panel.id
            )));
        }
    }

    let mut panels = panels;
    // Positions are finite, so `partial_cmp` always compares; -0.0 equals 0.0.
    panels.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    tracing::debug!(panels = panels.len(), "layout ordered");
    Ok(LayoutOrder { panels })
}
