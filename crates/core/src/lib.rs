//! Core library for Ledger Leaf.
//!
//! Turns batches of events into colours on a wall of light panels. Events are
//! sorted into categories, the panel bank is split between the categories in
//! proportion to their counts, and the resulting quotas are laid out over the
//! panels from the top row down. Device discovery, pairing and transport live
//! outside this crate; everything here is pure and synchronous.

pub mod allocate;
pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod palette;
pub mod pipeline;
pub mod sequence;
pub mod tip;

pub use allocate::{allocate, AllocationResult, CategoryQuota};
pub use classify::{
    classify, Category, CategoryId, CategorySet, CategoryTally, ClassificationResult, Predicate,
};
pub use config::{AppConfig, DisplayConfig, LeafConfig, SchemeConfig, TipConfig};
pub use error::{LeafError, Result};
pub use layout::{build_layout_order, LayoutOrder, LayoutSnapshot, PanelDescriptor, PanelId};
pub use ledger::{LedgerBatch, Transaction};
pub use palette::Rgbw;
pub use pipeline::{Pipeline, PipelineRun};
pub use sequence::{sequence, AssignedPanel, PanelAssignment};
pub use tip::TipMessage;
