use crate::{
    allocate, classify, sequence, AllocationResult, CategorySet, ClassificationResult, LayoutOrder,
    LayoutSnapshot, PanelAssignment, Result,
};

/// Everything one batch run needs, built once from the device layout and the
/// category configuration.
///
/// [`Pipeline::run`] only borrows the context, so independent batches can be
/// processed concurrently against the same pipeline.
#[derive(Debug)]
pub struct Pipeline<E> {
    layout: LayoutOrder,
    categories: CategorySet<E>,
}

/// Artifacts produced by one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    pub classification: ClassificationResult,
    pub allocation: AllocationResult,
    pub assignment: PanelAssignment,
}

impl<E> Pipeline<E> {
    pub fn new(layout: LayoutOrder, categories: CategorySet<E>) -> Self {
        Self { layout, categories }
    }

    pub fn from_snapshot(snapshot: LayoutSnapshot, categories: CategorySet<E>) -> Result<Self> {
        Ok(Self::new(snapshot.into_order()?, categories))
    }

    pub fn layout(&self) -> &LayoutOrder {
        &self.layout
    }

    pub fn categories(&self) -> &CategorySet<E> {
        &self.categories
    }

    /// Swaps in a fresh layout, e.g. after reconnecting to the device.
    pub fn with_layout(self, layout: LayoutOrder) -> Self {
        Self { layout, ..self }
    }

    /// Classifies, allocates and sequences one batch of events.
    pub fn run(&self, events: &[E]) -> Result<PipelineRun> {
        let classification = classify(events, &self.categories)?;
        tracing::debug!(events = classification.total(), "batch classified");

        let allocation = allocate(&classification, self.layout.len())?;
        for quota in allocation.quotas() {
            tracing::info!(
                category = %quota.name,
                events = quota.events,
                panels = quota.panels,
                "category share"
            );
        }

        let assignment = sequence(&allocation, &self.layout)?;
        tracing::debug!(panels = assignment.len(), "panels assigned");

        Ok(PipelineRun {
            classification,
            allocation,
            assignment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_layout_order, Category, LeafError, PanelDescriptor, Rgbw};

    fn row(count: u32) -> LayoutOrder {
        build_layout_order(
            (0..count)
                .map(|id| PanelDescriptor::new(id, f64::from(id), 0.0))
                .collect(),
        )
        .unwrap()
    }

    fn categories() -> CategorySet<&'static str> {
        CategorySet::new(vec![
            Category::new("busy", Rgbw::new(255, 0, 0, 0), |e: &&str| *e == "busy"),
            Category::catch_all("idle", Rgbw::new(0, 0, 0, 32)),
        ])
        .unwrap()
    }

    #[test]
    fn runs_the_whole_batch() {
        let pipeline = Pipeline::new(row(4), categories());
        let run = pipeline.run(&["busy", "busy", "busy", "x"]).unwrap();

        assert_eq!(run.classification.total(), 4);
        assert_eq!(run.allocation.panels_of("busy"), Some(3));
        assert_eq!(run.assignment.len(), 4);
        let ids: Vec<_> = run.assignment.panels().iter().map(|p| p.panel_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let pipeline = Pipeline::new(row(7), categories());
        let batch = ["busy", "a", "b", "busy", "c"];

        assert_eq!(pipeline.run(&batch).unwrap(), pipeline.run(&batch).unwrap());
    }

    #[test]
    fn failed_run_leaves_pipeline_usable() {
        let pipeline = Pipeline::new(
            row(1),
            CategorySet::new(vec![
                Category::new("a", Rgbw::default(), |e: &&str| *e == "a"),
                Category::catch_all("rest", Rgbw::default()),
            ])
            .unwrap(),
        );

        let err = pipeline.run(&["a", "b"]).unwrap_err();
        assert!(matches!(err, LeafError::OverAllocation { .. }));
        assert!(pipeline.run(&["a", "a"]).is_ok());
    }

    #[test]
    fn empty_batch_uses_the_fallback() {
        let pipeline = Pipeline::new(row(3), categories().with_fallback("idle").unwrap());
        let run = pipeline.run(&[]).unwrap();

        let idle = pipeline.categories().find("idle").unwrap();
        assert_eq!(run.assignment.runs(), vec![(idle, 3)]);
    }

    #[test]
    fn layout_can_be_replaced() {
        let pipeline = Pipeline::new(row(2), categories()).with_layout(row(5));
        let run = pipeline.run(&["busy"]).unwrap();
        assert_eq!(run.assignment.len(), 5);
    }
}
