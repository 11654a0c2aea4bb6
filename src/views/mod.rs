/// Presentation models: pure functions of the filtered view.
///
/// ```text
///   Dataset + FilterSelection
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  → DatasetView
///   └──────────┘
///        │
///        ├──► chart  (bars or placeholder)
///        ├──► map    (points or guidance)
///        └──► stats  (describe)
/// ```
///
/// The `ui` layer only draws what these models contain.

pub mod chart;
pub mod map;
pub mod stats;

use crate::data::filter::{self, FilterSelection};
use crate::data::model::{Dataset, DatasetView};

use chart::ChartModel;
use map::MapModel;
use stats::ColumnSummary;

/// Everything one render pass shows for a loaded dataset.
#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
    pub filtered: DatasetView<'a>,
    pub chart: ChartModel,
    pub map: MapModel,
    pub stats: Vec<ColumnSummary>,
}

impl<'a> Dashboard<'a> {
    /// Run the filter pipeline and derive every view from its output.
    pub fn build(dataset: &'a Dataset, selection: &FilterSelection) -> Self {
        let outcome = filter::apply(dataset, selection);
        let chart = chart::bar_chart(&outcome.view);
        let map = map::map_points(&outcome.view);
        let stats = stats::describe(&outcome.view);
        Self {
            filtered: outcome.view,
            chart,
            map,
            stats,
        }
    }
}
