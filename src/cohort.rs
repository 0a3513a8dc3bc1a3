//! Cluster metadata lookup and cohort selection over the classified population

use crate::cluster::{ClusterId, ClusterKey};
use crate::error::ViewError;
use crate::model::ClusterModel;
use crate::survey::Respondent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Human readable description of a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDescription {
    pub name: String,
    pub description: String,
}

/// Cluster key to description mapping, as stored in the metadata file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterCatalog {
    entries: BTreeMap<ClusterKey, ClusterDescription>,
}

impl ClusterCatalog {
    pub fn get(&self, key: &ClusterKey) -> Option<&ClusterDescription> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ClusterKey> {
        self.entries.keys()
    }
}

impl<K: Into<ClusterId>> FromIterator<(K, ClusterDescription)> for ClusterCatalog {
    fn from_iter<I: IntoIterator<Item = (K, ClusterDescription)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, description)| (id.into().key(), description))
                .collect(),
        }
    }
}

/// Look up the description of an assigned cluster
pub fn resolve_metadata<'a>(
    assignment: &ClusterId,
    catalog: &'a ClusterCatalog,
) -> Result<&'a ClusterDescription, ViewError> {
    let key = assignment.key();
    catalog
        .get(&key)
        .ok_or(ViewError::MetadataNotFound { key })
}

/// A survey respondent together with the cluster the model put them in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub respondent: Respondent,
    pub cluster: ClusterId,
}

/// The classified survey population
#[derive(Debug, Clone, Default)]
pub struct Population {
    members: Vec<Member>,
}

impl Population {
    /// Classify every respondent once and keep the assignments alongside
    pub fn assign(model: &ClusterModel, respondents: Vec<Respondent>) -> Self {
        let assignments = model.classify_batch(&respondents);
        let members = respondents
            .into_iter()
            .zip(assignments)
            .map(|(respondent, cluster)| Member {
                respondent,
                cluster,
            })
            .collect();
        Self { members }
    }

    pub fn from_members(members: Vec<Member>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of members per cluster key
    pub fn cluster_sizes(&self) -> BTreeMap<ClusterKey, usize> {
        let mut sizes = BTreeMap::new();
        for member in &self.members {
            *sizes.entry(member.cluster.key()).or_insert(0) += 1;
        }
        sizes
    }
}

/// Respondents sharing one cluster assignment, in population order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cohort<'a> {
    key: ClusterKey,
    members: Vec<&'a Respondent>,
}

impl<'a> Cohort<'a> {
    pub fn key(&self) -> &ClusterKey {
        &self.key
    }

    pub fn members(&self) -> &[&'a Respondent] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Select every member assigned to `cluster`.
///
/// Assignments are compared by normalized key, so `Int(1)` and
/// `Key("Cluster 1")` select the same cohort.
pub fn filter_cohort<'a>(population: &'a Population, cluster: &ClusterId) -> Cohort<'a> {
    let key = cluster.key();
    let members = population
        .members
        .iter()
        .filter(|member| member.cluster.key() == key)
        .map(|member| &member.respondent)
        .collect();
    Cohort { key, members }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::{AgeBracket, Gender};

    fn description(name: &str) -> ClusterDescription {
        ClusterDescription {
            name: name.to_string(),
            description: format!("{name} description"),
        }
    }

    fn create_test_population() -> Population {
        let clusters = [0, 1, 1, 2, 1, 0];
        let members = clusters
            .iter()
            .enumerate()
            .map(|(i, &c)| Member {
                respondent: Respondent {
                    age: Some(AgeBracket::ALL[i % AgeBracket::ALL.len()]),
                    gender: Some(if i % 2 == 0 { Gender::Male } else { Gender::Female }),
                    ..Respondent::default()
                },
                cluster: ClusterId::Int(c),
            })
            .collect();
        Population::from_members(members)
    }

    #[test]
    fn test_resolve_metadata_normalizes_assignment() {
        let catalog: ClusterCatalog = [(3i64, description("Explorers"))].into_iter().collect();

        let by_int = resolve_metadata(&ClusterId::Int(3), &catalog).unwrap();
        let by_key = resolve_metadata(&ClusterId::from("Cluster 3"), &catalog).unwrap();
        assert_eq!(by_int, by_key);
        assert_eq!(by_int.name, "Explorers");
    }

    #[test]
    fn test_resolve_metadata_missing_key() {
        let catalog: ClusterCatalog = [(0i64, description("Homebodies"))].into_iter().collect();

        let err = resolve_metadata(&ClusterId::Int(5), &catalog).unwrap_err();
        assert_eq!(
            err,
            ViewError::MetadataNotFound {
                key: ClusterId::Int(5).key()
            }
        );
        assert!(err.to_string().contains("Cluster 5"));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "Cluster 0": {"name": "Miłośnicy gór", "description": "Lubią góry"},
            "Cluster 1": {"name": "Kociarze", "description": "Lubią koty"}
        }"#;
        let catalog: ClusterCatalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&ClusterId::Int(0).key()).unwrap().name, "Miłośnicy gór");
        assert!(catalog.get(&ClusterId::Int(2).key()).is_none());
    }

    #[test]
    fn test_filter_cohort_is_exact() {
        let population = create_test_population();
        let cohort = filter_cohort(&population, &ClusterId::Int(1));

        let expected: Vec<&Respondent> = population
            .members()
            .iter()
            .filter(|m| m.cluster == ClusterId::Int(1))
            .map(|m| &m.respondent)
            .collect();
        assert_eq!(cohort.members(), expected.as_slice());
        assert_eq!(cohort.len(), 3);
        assert_eq!(cohort.key().as_str(), "Cluster 1");
    }

    #[test]
    fn test_filter_cohort_is_idempotent_and_form_agnostic() {
        let population = create_test_population();

        let first = filter_cohort(&population, &ClusterId::Int(0));
        let second = filter_cohort(&population, &ClusterId::Int(0));
        let by_key = filter_cohort(&population, &ClusterId::from("Cluster 0"));
        assert_eq!(first, second);
        assert_eq!(first, by_key);
        assert_eq!(first.len(), 2);

        assert!(filter_cohort(&population, &ClusterId::Int(9)).is_empty());
    }

    #[test]
    fn test_cluster_sizes_cover_population() {
        let population = create_test_population();
        let sizes = population.cluster_sizes();

        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes.values().sum::<usize>(), population.len());
        assert_eq!(sizes[&ClusterId::Int(1).key()], 3);
    }
}
