//! Pre-trained nearest-centroid clustering pipeline over one-hot encoded answers

use crate::cluster::ClusterId;
use crate::survey::{Attribute, Observation};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One categorical input of the pipeline and its one-hot vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub column: Attribute,
    pub categories: Vec<String>,
    /// Imputation value used when a record has no answer for this column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

/// Serialized form of a fitted pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub features: Vec<FeatureSpec>,
    pub centroids: Vec<Vec<f64>>,
    /// Per-centroid labels; without them assignments are bare indices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Reasons a model artifact is rejected at load time
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model declares no features")]
    NoFeatures,

    #[error("feature '{0}' has an empty vocabulary")]
    EmptyVocabulary(Attribute),

    #[error("feature '{0}' is declared more than once")]
    DuplicateFeature(Attribute),

    #[error("model declares no centroids")]
    NoCentroids,

    #[error("centroid {row} has {actual} values, expected {expected}")]
    CentroidWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("centroid {0} contains a non-finite value")]
    NonFinite(usize),

    #[error("model has {actual} labels for {expected} centroids")]
    LabelCount { expected: usize, actual: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Fitted clustering model
#[derive(Debug, Clone)]
pub struct ClusterModel {
    features: Vec<FeatureSpec>,
    /// Cluster centroids in encoded space (n_clusters, width)
    centroids: Array2<f64>,
    labels: Option<Vec<String>>,
}

impl ClusterModel {
    /// Validate an artifact and build the model from it
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let ModelArtifact {
            features,
            centroids,
            labels,
        } = artifact;

        if features.is_empty() {
            return Err(ModelError::NoFeatures);
        }

        let mut seen = HashSet::new();
        for feature in &features {
            if feature.categories.is_empty() {
                return Err(ModelError::EmptyVocabulary(feature.column));
            }
            if !seen.insert(feature.column) {
                return Err(ModelError::DuplicateFeature(feature.column));
            }
        }

        if centroids.is_empty() {
            return Err(ModelError::NoCentroids);
        }

        let width: usize = features.iter().map(|f| f.categories.len()).sum();
        let n_clusters = centroids.len();
        let mut flat = Vec::with_capacity(n_clusters * width);
        for (row, centroid) in centroids.into_iter().enumerate() {
            if centroid.len() != width {
                return Err(ModelError::CentroidWidth {
                    row,
                    expected: width,
                    actual: centroid.len(),
                });
            }
            if centroid.iter().any(|v| !v.is_finite()) {
                return Err(ModelError::NonFinite(row));
            }
            flat.extend(centroid);
        }

        if let Some(labels) = &labels {
            if labels.len() != n_clusters {
                return Err(ModelError::LabelCount {
                    expected: n_clusters,
                    actual: labels.len(),
                });
            }
        }

        let centroids = Array2::from_shape_vec((n_clusters, width), flat)?;

        Ok(Self {
            features,
            centroids,
            labels,
        })
    }

    pub fn n_clusters(&self) -> usize {
        self.centroids.nrows()
    }

    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    /// Width of the encoded feature vector
    pub fn width(&self) -> usize {
        self.centroids.ncols()
    }

    /// Every assignment this model can produce, in centroid order
    pub fn cluster_ids(&self) -> Vec<ClusterId> {
        (0..self.n_clusters()).map(|i| self.assignment(i)).collect()
    }

    /// One-hot encode a record.
    ///
    /// Values outside a feature's vocabulary leave its segment all zero.
    /// Missing values take the feature's `fill`, if any.
    pub fn encode<O: Observation + ?Sized>(&self, record: &O) -> Array1<f64> {
        let mut encoded = Array1::zeros(self.width());
        let mut offset = 0;

        for feature in &self.features {
            let value = record.value(feature.column).or(feature.fill.as_deref());
            if let Some(position) =
                value.and_then(|v| feature.categories.iter().position(|c| c == v))
            {
                encoded[offset + position] = 1.0;
            }
            offset += feature.categories.len();
        }

        encoded
    }

    /// Assign a record to its nearest centroid
    pub fn classify<O: Observation + ?Sized>(&self, record: &O) -> ClusterId {
        let encoded = self.encode(record);
        self.assignment(self.nearest_centroid(&encoded))
    }

    /// One assignment per record, in input order
    pub fn classify_batch<O: Observation>(&self, records: &[O]) -> Vec<ClusterId> {
        records.iter().map(|record| self.classify(record)).collect()
    }

    /// Ties resolve to the lowest centroid index
    fn nearest_centroid(&self, features: &Array1<f64>) -> usize {
        let mut min_distance = f64::INFINITY;
        let mut closest_cluster = 0;

        for (cluster_idx, centroid) in self.centroids.outer_iter().enumerate() {
            let distance: f64 = features
                .iter()
                .zip(centroid.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();

            if distance < min_distance {
                min_distance = distance;
                closest_cluster = cluster_idx;
            }
        }

        closest_cluster
    }

    fn assignment(&self, index: usize) -> ClusterId {
        match &self.labels {
            Some(labels) => ClusterId::Key(labels[index].clone()),
            None => ClusterId::Int(index as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{FavAnimals, Gender, Respondent, SurveyRecord};

    fn feature(column: Attribute, categories: &[&str]) -> FeatureSpec {
        FeatureSpec {
            column,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            fill: None,
        }
    }

    fn create_test_artifact() -> ModelArtifact {
        ModelArtifact {
            features: vec![
                feature(Attribute::FavAnimals, &["Psy", "Koty", "Inne"]),
                feature(Attribute::Gender, &["Mężczyzna", "Kobieta"]),
            ],
            centroids: vec![
                vec![1.0, 0.0, 0.0, 1.0, 0.0],
                vec![0.0, 1.0, 0.0, 0.0, 1.0],
                vec![0.0, 0.0, 1.0, 0.5, 0.5],
            ],
            labels: None,
        }
    }

    fn record(fav_animals: FavAnimals, gender: Gender) -> SurveyRecord {
        SurveyRecord {
            fav_animals,
            gender,
            ..SurveyRecord::default()
        }
    }

    #[test]
    fn test_encode_one_hot() {
        let model = ClusterModel::from_artifact(create_test_artifact()).unwrap();
        let encoded = model.encode(&record(FavAnimals::Cats, Gender::Female));
        assert_eq!(encoded.to_vec(), vec![0.0, 1.0, 0.0, 0.0, 1.0]);

        // "Brak ulubionych" is not in the vocabulary
        let encoded = model.encode(&record(FavAnimals::NoFavorites, Gender::Male));
        assert_eq!(encoded.to_vec(), vec![0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_classify_nearest_centroid() {
        let model = ClusterModel::from_artifact(create_test_artifact()).unwrap();

        assert_eq!(model.classify(&record(FavAnimals::Dogs, Gender::Male)), ClusterId::Int(0));
        assert_eq!(model.classify(&record(FavAnimals::Cats, Gender::Female)), ClusterId::Int(1));
        assert_eq!(model.classify(&record(FavAnimals::Other, Gender::Female)), ClusterId::Int(2));
    }

    #[test]
    fn test_classify_is_deterministic_on_ties() {
        let model = ClusterModel::from_artifact(create_test_artifact()).unwrap();
        // Equidistant from centroids 0 and 1
        let tied = record(FavAnimals::Dogs, Gender::Female);
        for _ in 0..5 {
            assert_eq!(model.classify(&tied), ClusterId::Int(0));
        }
    }

    #[test]
    fn test_every_form_answer_gets_one_assignment() {
        let model = ClusterModel::from_artifact(create_test_artifact()).unwrap();
        let ids = model.cluster_ids();

        let records: Vec<SurveyRecord> = FavAnimals::ALL
            .iter()
            .flat_map(|&animals| Gender::ALL.iter().map(move |&gender| record(animals, gender)))
            .collect();
        let assignments = model.classify_batch(&records);

        assert_eq!(assignments.len(), records.len());
        assert!(assignments.iter().all(|a| ids.contains(a)));
    }

    #[test]
    fn test_labels_produce_keys() {
        let mut artifact = create_test_artifact();
        artifact.labels = Some(vec!["Cluster 0".into(), "Cluster 1".into(), "Cluster 2".into()]);
        let model = ClusterModel::from_artifact(artifact).unwrap();

        let assignment = model.classify(&record(FavAnimals::Cats, Gender::Female));
        assert_eq!(assignment, ClusterId::Key("Cluster 1".to_string()));
        assert!(assignment.same_cluster(&ClusterId::Int(1)));
    }

    #[test]
    fn test_missing_value_uses_fill() {
        let mut artifact = create_test_artifact();
        artifact.features[1].fill = Some("Kobieta".to_string());
        let model = ClusterModel::from_artifact(artifact).unwrap();

        let respondent = Respondent {
            fav_animals: Some(FavAnimals::Cats),
            ..Respondent::default()
        };
        assert_eq!(model.encode(&respondent).to_vec(), vec![0.0, 1.0, 0.0, 0.0, 1.0]);
        assert_eq!(model.classify(&respondent), ClusterId::Int(1));
    }

    #[test]
    fn test_invalid_artifacts() {
        let mut artifact = create_test_artifact();
        artifact.centroids[2].pop();
        assert!(matches!(
            ClusterModel::from_artifact(artifact),
            Err(ModelError::CentroidWidth { row: 2, expected: 5, actual: 4 })
        ));

        let mut artifact = create_test_artifact();
        artifact.labels = Some(vec!["Cluster 0".into()]);
        assert!(matches!(
            ClusterModel::from_artifact(artifact),
            Err(ModelError::LabelCount { expected: 3, actual: 1 })
        ));

        let mut artifact = create_test_artifact();
        artifact.centroids.clear();
        assert!(matches!(ClusterModel::from_artifact(artifact), Err(ModelError::NoCentroids)));

        let mut artifact = create_test_artifact();
        artifact.centroids[0][0] = f64::NAN;
        assert!(matches!(ClusterModel::from_artifact(artifact), Err(ModelError::NonFinite(0))));

        let mut artifact = create_test_artifact();
        artifact.features.push(feature(Attribute::Gender, &["Kobieta"]));
        assert!(matches!(
            ClusterModel::from_artifact(artifact),
            Err(ModelError::DuplicateFeature(Attribute::Gender))
        ));
    }

    #[test]
    fn test_artifact_json() {
        let json = r#"{
            "features": [{"column": "gender", "categories": ["Mężczyzna", "Kobieta"], "fill": "Kobieta"}],
            "centroids": [[1.0, 0.0], [0.0, 1.0]]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        let model = ClusterModel::from_artifact(artifact).unwrap();

        assert_eq!(model.n_clusters(), 2);
        assert_eq!(model.width(), 2);
        assert_eq!(model.features()[0].fill.as_deref(), Some("Kobieta"));
        assert_eq!(model.classify(&Respondent::default()), ClusterId::Int(1));
    }
}
