//! Live charts keyed by identifier.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ChartConfig;
use crate::error::ChartError;

/// A rendered chart owned by the registry.
pub trait ChartHandle {
    /// Replace the chart data and redraw.
    fn update(&mut self, data: Value);

    /// Release the chart's resources.
    fn destroy(&mut self);
}

/// Owns every chart created during a conversation.
///
/// Chart fences in rendered messages only carry an identifier; the registry
/// maps it to the chart built from the matching tool call.
#[derive(Debug)]
pub struct ChartRegistry<H: ChartHandle> {
    charts: HashMap<String, H>,
}

impl<H: ChartHandle> ChartRegistry<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charts: HashMap::new(),
        }
    }

    /// Build `config` and register the handle `factory` creates from it.
    ///
    /// A chart already registered under the same identifier is destroyed.
    pub fn create<F>(&mut self, config: &ChartConfig, factory: F) -> Result<&H, ChartError>
    where
        F: FnOnce(Value) -> H,
    {
        let built = config.build()?;
        let handle = factory(built);

        if let Some(mut previous) = self.charts.remove(&config.chart_id) {
            tracing::debug!(chart_id = %config.chart_id, "Replacing existing chart");
            previous.destroy();
        }

        Ok(self.charts.entry(config.chart_id.clone()).or_insert(handle))
    }

    /// Replace the data of the chart `chart_id`.
    pub fn update(&mut self, chart_id: &str, data: Value) -> Result<(), ChartError> {
        let chart = self
            .charts
            .get_mut(chart_id)
            .ok_or_else(|| ChartError::UnknownChart(chart_id.to_owned()))?;
        chart.update(data);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, chart_id: &str) -> Option<&H> {
        self.charts.get(chart_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Destroy every chart.
    pub fn destroy_all(&mut self) {
        for (chart_id, mut chart) in self.charts.drain() {
            tracing::trace!(%chart_id, "Destroying chart");
            chart.destroy();
        }
    }

    /// Identifiers from `placeholders` that have no chart yet.
    pub fn pending_ids<'a, I>(&self, placeholders: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        placeholders
            .into_iter()
            .filter(|id| !self.charts.contains_key(*id))
            .collect()
    }
}

impl<H: ChartHandle> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
