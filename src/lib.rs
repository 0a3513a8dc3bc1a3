//! CohortForge: find the survey group closest to a respondent and describe it
//!
//! A pre-trained clustering model assigns the submitted answers to a cluster.
//! The cluster's name and description are looked up, the survey population
//! is filtered to the members of that cluster, and the answer distributions
//! of that cohort are rendered as text and charts.

pub mod cli;
pub mod cluster;
pub mod cohort;
pub mod context;
pub mod data;
pub mod error;
pub mod model;
pub mod survey;
pub mod view;
pub mod viz;

// Re-export public items for easier access
pub use cli::{Args, OutputFormat};
pub use cluster::{ClusterId, ClusterKey};
pub use cohort::{filter_cohort, resolve_metadata, ClusterCatalog, ClusterDescription, Cohort, Population};
pub use context::AppContext;
pub use data::{DataPaths, DataSource, FileSource};
pub use error::{LoadError, ViewError};
pub use model::{ClusterModel, ModelArtifact};
pub use survey::{Attribute, Observation, Respondent, SurveyRecord};
pub use view::{compute_view, Distribution, ViewModel};
pub use viz::{render_charts, render_summary};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
