//! Application context holding everything loaded at startup

use crate::cohort::{ClusterCatalog, Population};
use crate::data::DataSource;
use crate::error::LoadError;
use crate::model::ClusterModel;
use tracing::{debug, info, warn};

/// Read-only resources shared by every view computation.
///
/// Built exactly once per process; each resource is loaded from its
/// [`DataSource`] a single time and then only borrowed.
#[derive(Debug, Clone)]
pub struct AppContext {
    model: ClusterModel,
    catalog: ClusterCatalog,
    population: Population,
}

impl AppContext {
    /// Load all inputs and classify the survey population
    pub fn load<S: DataSource + ?Sized>(source: &S) -> Result<Self, LoadError> {
        let model = source.load_model()?;
        let catalog = source.load_catalog()?;
        let respondents = source.load_respondents()?;

        let population = Population::assign(&model, respondents);
        for (key, size) in population.cluster_sizes() {
            debug!(cluster = %key, size, "population cluster");
            if catalog.get(&key).is_none() {
                warn!(cluster = %key, "cluster has no description");
            }
        }
        info!(
            respondents = population.len(),
            clusters = model.n_clusters(),
            "dashboard context ready"
        );

        Ok(Self::new(model, catalog, population))
    }

    pub fn new(model: ClusterModel, catalog: ClusterCatalog, population: Population) -> Self {
        Self {
            model,
            catalog,
            population,
        }
    }

    pub fn model(&self) -> &ClusterModel {
        &self.model
    }

    pub fn catalog(&self) -> &ClusterCatalog {
        &self.catalog
    }

    pub fn population(&self) -> &Population {
        &self.population
    }
}
