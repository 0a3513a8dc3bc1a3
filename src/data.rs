//! Loading the model artifact, cluster metadata and survey population from disk

use crate::cohort::ClusterCatalog;
use crate::error::LoadError;
use crate::model::{ClusterModel, ModelArtifact};
use crate::survey::{Attribute, Respondent};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_MODEL_PATH: &str = "clustering_pipeline_v2.json";
pub const DEFAULT_DATA_PATH: &str = "welcome_survey_simple_v2.csv";
pub const DEFAULT_METADATA_PATH: &str = "welcome_survey_cluster_names_and_descriptions_v1.json";

/// Field separator of the survey file
pub const CSV_SEPARATOR: u8 = b';';

/// Locations of the three inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub model: PathBuf,
    pub data: PathBuf,
    pub metadata: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            data: PathBuf::from(DEFAULT_DATA_PATH),
            metadata: PathBuf::from(DEFAULT_METADATA_PATH),
        }
    }
}

/// Where the dashboard gets its read-only inputs from
pub trait DataSource {
    fn load_model(&self) -> crate::error::Result<ClusterModel>;
    fn load_catalog(&self) -> crate::error::Result<ClusterCatalog>;
    fn load_respondents(&self) -> crate::error::Result<Vec<Respondent>>;
}

/// [`DataSource`] backed by files on disk
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    paths: DataPaths,
}

impl FileSource {
    pub fn new(paths: DataPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }
}

impl DataSource for FileSource {
    fn load_model(&self) -> crate::error::Result<ClusterModel> {
        load_model(&self.paths.model)
    }

    fn load_catalog(&self) -> crate::error::Result<ClusterCatalog> {
        load_catalog(&self.paths.metadata)
    }

    fn load_respondents(&self) -> crate::error::Result<Vec<Respondent>> {
        load_respondents(&self.paths.data)
    }
}

/// Load and validate a JSON model artifact
pub fn load_model(path: impl AsRef<Path>) -> crate::error::Result<ClusterModel> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let artifact: ModelArtifact =
        serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    let model = ClusterModel::from_artifact(artifact).map_err(|source| LoadError::Model {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        clusters = model.n_clusters(),
        features = model.features().len(),
        "loaded clustering model"
    );
    Ok(model)
}

/// Load the UTF-8 JSON mapping of cluster keys to names and descriptions
pub fn load_catalog(path: impl AsRef<Path>) -> crate::error::Result<ClusterCatalog> {
    let path = path.as_ref();
    let contents = read_to_string(path)?;
    let catalog: ClusterCatalog =
        serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), clusters = catalog.len(), "loaded cluster descriptions");
    Ok(catalog)
}

/// Load the semicolon separated survey file.
///
/// Every column is read as text and only the five answer columns are kept;
/// a missing column fails the load. Empty cells become missing answers.
pub fn load_respondents(path: impl AsRef<Path>) -> crate::error::Result<Vec<Respondent>> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let csv_error = |source: PolarsError| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let columns: Vec<Expr> = Attribute::ALL.iter().map(|a| col(a.column())).collect();
    let df = LazyCsvReader::new(path)
        .with_separator(CSV_SEPARATOR)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(|lf| lf.select(columns).collect())
        .map_err(csv_error)?;

    let answers = Attribute::ALL
        .iter()
        .map(|a| df.column(a.column()).and_then(|s| s.str()))
        .collect::<PolarsResult<Vec<_>>>()
        .map_err(csv_error)?;

    let mut respondents = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let cells: [Option<&str>; 5] = std::array::from_fn(|i| answers[i].get(row));
        let respondent = Respondent::from_cells(cells).map_err(|source| LoadError::Category {
            path: path.to_path_buf(),
            // header is line 1
            line: row + 2,
            source,
        })?;
        respondents.push(respondent);
    }

    info!(path = %path.display(), respondents = respondents.len(), "loaded survey population");
    Ok(respondents)
}

fn ensure_exists(path: &Path) -> crate::error::Result<()> {
    if path.is_file() {
        return Ok(());
    }
    Err(LoadError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    })
}

fn read_to_string(path: &Path) -> crate::error::Result<String> {
    debug!(path = %path.display(), "reading file");
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
