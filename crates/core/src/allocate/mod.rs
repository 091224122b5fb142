use std::cmp::Reverse;

use serde::Serialize;

use crate::{CategoryId, ClassificationResult, LeafError, Result, Rgbw};

/// Number of panels granted to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryQuota {
    pub id: CategoryId,
    pub priority: usize,
    pub name: String,
    pub color: Rgbw,
    pub events: usize,
    pub panels: usize,
}

/// Panel quotas for one batch, in category match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    quotas: Vec<CategoryQuota>,
}

impl AllocationResult {
    pub fn quotas(&self) -> &[CategoryQuota] {
        &self.quotas
    }

    /// Sum of all quotas.
    pub fn total_panels(&self) -> usize {
        self.quotas.iter().map(|quota| quota.panels).sum()
    }

    /// An empty batch without a fallback category assigns nothing.
    pub fn is_blank(&self) -> bool {
        self.quotas.iter().all(|quota| quota.panels == 0)
    }

    pub fn panels(&self, id: CategoryId) -> usize {
        self.quotas.get(id.index()).map_or(0, |quota| quota.panels)
    }

    pub fn panels_of(&self, name: &str) -> Option<usize> {
        self.quotas
            .iter()
            .find(|quota| quota.name == name)
            .map(|quota| quota.panels)
    }
}

/// Splits `total_panels` between the categories in proportion to their event
/// counts.
///
/// Every category with at least one event is rounded up so that it stays
/// visible. The overshoot is then removed one panel at a time from whichever
/// category currently holds the most panels; among equals the category with
/// the better display priority gives up a panel first.
///
/// When the batch is empty the classification's fallback category receives
/// every panel. Without a fallback the result is blank.
pub fn allocate(classification: &ClassificationResult, total_panels: usize) -> Result<AllocationResult> {
    let total_events = classification.total();
    let mut quotas: Vec<CategoryQuota> = classification
        .tallies()
        .iter()
        .map(|tally| CategoryQuota {
            id: tally.id,
            priority: tally.priority,
            name: tally.name.clone(),
            color: tally.color,
            events: tally.events,
            panels: 0,
        })
        .collect();

    if total_events == 0 {
        match classification.fallback() {
            Some(id) => {
                let quota = quotas.get_mut(id.index()).ok_or_else(|| {
                    LeafError::AllocationInvariant(format!(
                        "fallback category #{} is not part of the classification",
                        id.index()
                    ))
                })?;
                quota.panels = total_panels;
                tracing::debug!(fallback = %quota.name, total_panels, "empty batch assigned to fallback");
            }
            None => tracing::debug!("empty batch without fallback leaves the panels untouched"),
        }
        return Ok(AllocationResult { quotas });
    }

    let occupied = quotas.iter().filter(|quota| quota.events > 0).count();
    if occupied > total_panels {
        return Err(LeafError::OverAllocation {
            categories: occupied,
            panels: total_panels,
        });
    }

    for quota in &mut quotas {
        quota.panels = raw_share(quota.events, total_events, total_panels);
    }

    let raw_total: usize = quotas.iter().map(|quota| quota.panels).sum();
    let excess = raw_total.checked_sub(total_panels).ok_or_else(|| {
        LeafError::AllocationInvariant(format!(
            "raw shares sum to {raw_total}, below the {total_panels} available panels"
        ))
    })?;
    tracing::debug!(raw_total, excess, "raw shares computed");

    for _ in 0..excess {
        let largest = largest_quota(&quotas).ok_or_else(|| {
            LeafError::AllocationInvariant("no category left to take panels from".into())
        })?;
        if quotas[largest].panels <= 1 {
            return Err(LeafError::OverAllocation {
                categories: occupied,
                panels: total_panels,
            });
        }
        quotas[largest].panels -= 1;
    }

    let result = AllocationResult { quotas };
    if result.total_panels() != total_panels {
        return Err(LeafError::AllocationInvariant(format!(
            "quotas sum to {} instead of {total_panels}",
            result.total_panels()
        )));
    }

    Ok(result)
}

/// `ceil(events / total_events * total_panels)` in exact integer arithmetic.
fn raw_share(events: usize, total_events: usize, total_panels: usize) -> usize {
    let numerator = events as u128 * total_panels as u128;
    let denominator = total_events as u128;
    numerator.div_ceil(denominator) as usize
}

/// Index of the quota with the most panels, preferring the best display
/// priority on ties.
fn largest_quota(quotas: &[CategoryQuota]) -> Option<usize> {
    quotas
        .iter()
        .enumerate()
        .min_by_key(|(_, quota)| (Reverse(quota.panels), quota.priority))
        .map(|(index, _)| index)
}
