use std::cmp::Reverse;

use serde::Serialize;

use crate::{AllocationResult, CategoryId, LayoutOrder, LeafError, PanelId, Result, Rgbw};

/// One panel painted with one category's colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignedPanel {
    pub panel_id: PanelId,
    pub category: CategoryId,
    pub color: Rgbw,
}

/// Panels in layout order, grouped into one contiguous run per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PanelAssignment {
    panels: Vec<AssignedPanel>,
}

impl PanelAssignment {
    pub fn panels(&self) -> &[AssignedPanel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// True for blank allocations, where the display should keep whatever it
    /// currently shows.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// `(category, run length)` pairs in display order.
    pub fn runs(&self) -> Vec<(CategoryId, usize)> {
        let mut runs: Vec<(CategoryId, usize)> = Vec::new();
        for panel in &self.panels {
            match runs.last_mut() {
                Some((category, len)) if *category == panel.category => *len += 1,
                _ => runs.push((panel.category, 1)),
            }
        }
        runs
    }
}

/// Lays the category quotas over the ordered panels.
///
/// Categories are visited by descending panel count, best display priority
/// first on ties, and each takes the next `panels` entries of the layout.
pub fn sequence(allocation: &AllocationResult, layout: &LayoutOrder) -> Result<PanelAssignment> {
    if allocation.is_blank() {
        return Ok(PanelAssignment::default());
    }

    let allocated = allocation.total_panels();
    if allocated != layout.len() {
        return Err(LeafError::LayoutSizeMismatch {
            allocated,
            layout: layout.len(),
        });
    }

    let mut quotas: Vec<_> = allocation.quotas().iter().collect();
    quotas.sort_by_key(|quota| (Reverse(quota.panels), quota.priority, quota.id));

    let mut layout_panels = layout.panels().iter();
    let mut panels = Vec::with_capacity(allocated);
    for quota in quotas {
        for panel in layout_panels.by_ref().take(quota.panels) {
            panels.push(AssignedPanel {
                panel_id: panel.id,
                category: quota.id,
                color: quota.color,
            });
        }
    }

    Ok(PanelAssignment { panels })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allocate, build_layout_order, classify, Category, CategorySet, PanelDescriptor};

    const A: Rgbw = Rgbw::new(1, 0, 0, 0);
    const B: Rgbw = Rgbw::new(0, 1, 0, 0);

    fn square() -> LayoutOrder {
        build_layout_order(vec![
            PanelDescriptor::new(1, 0.0, 0.0),
            PanelDescriptor::new(2, 1.0, 0.0),
            PanelDescriptor::new(3, 0.0, 1.0),
            PanelDescriptor::new(4, 1.0, 1.0),
        ])
        .unwrap()
    }

    fn letters() -> CategorySet<char> {
        CategorySet::new(vec![
            Category::new("a", A, |c: &char| *c == 'a'),
            Category::catch_all("b", B),
        ])
        .unwrap()
    }

    fn allocation_for(batch: &str, total_panels: usize) -> AllocationResult {
        let events: Vec<char> = batch.chars().collect();
        let classification = classify(&events, &letters()).unwrap();
        allocate(&classification, total_panels).unwrap()
    }

    #[test]
    fn worked_example_fills_rows_in_order() {
        let assignment = sequence(&allocation_for("aaaaaaabbb", 4), &square()).unwrap();

        let painted: Vec<(PanelId, Rgbw)> = assignment
            .panels()
            .iter()
            .map(|panel| (panel.panel_id, panel.color))
            .collect();
        assert_eq!(painted, vec![(3, A), (4, A), (1, B), (2, B)]);
    }

    #[test]
    fn larger_quota_comes_first() {
        let assignment = sequence(&allocation_for("abbbbbbbbb", 4), &square()).unwrap();
        let letters = letters();
        let a = letters.find("a").unwrap();
        let b = letters.find("b").unwrap();

        assert_eq!(assignment.runs(), vec![(b, 3), (a, 1)]);
        assert_eq!(assignment.len(), 4);
    }

    #[test]
    fn equal_quotas_follow_display_priority() {
        let letters = letters().with_priority(&["b", "a"]).unwrap();
        let events: Vec<char> = "ab".chars().collect();
        let allocation = allocate(&classify(&events, &letters).unwrap(), 4).unwrap();
        let assignment = sequence(&allocation, &square()).unwrap();

        let painted: Vec<(PanelId, Rgbw)> = assignment
            .panels()
            .iter()
            .map(|panel| (panel.panel_id, panel.color))
            .collect();
        assert_eq!(painted, vec![(3, B), (4, B), (1, A), (2, A)]);
    }

    #[test]
    fn every_panel_is_used_once() {
        let assignment = sequence(&allocation_for("aab", 4), &square()).unwrap();
        let mut ids: Vec<PanelId> = assignment.panels().iter().map(|p| p.panel_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn mismatched_layout_is_rejected() {
        let err = sequence(&allocation_for("ab", 6), &square()).unwrap_err();
        assert!(matches!(
            err,
            LeafError::LayoutSizeMismatch {
                allocated: 6,
                layout: 4
            }
        ));
    }

    #[test]
    fn blank_allocation_paints_nothing() {
        let assignment = sequence(&allocation_for("", 4), &square()).unwrap();
        assert!(assignment.is_empty());
        assert!(assignment.runs().is_empty());
    }
}
