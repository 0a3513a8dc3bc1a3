//! View model for a submitted survey: the matched cluster and its cohort

use crate::cluster::ClusterKey;
use crate::cohort::{filter_cohort, resolve_metadata, Cohort};
use crate::context::AppContext;
use crate::error::ViewError;
use crate::survey::{Attribute, Observation, SurveyRecord};
use serde::Serialize;
use tracing::debug;

const Y_LABEL: &str = "Number of people";

/// Count of cohort members giving one answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bin {
    pub category: &'static str,
    pub count: usize,
}

/// Per-category counts of one attribute within a cohort
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub attribute: Attribute,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Non-empty categories in the attribute's ordinal order
    pub bins: Vec<Bin>,
}

impl Distribution {
    /// Count answers to `attribute`; members without an answer are skipped
    pub fn from_cohort(cohort: &Cohort<'_>, attribute: Attribute) -> Self {
        let bins = attribute
            .options()
            .iter()
            .map(|&category| Bin {
                category,
                count: cohort
                    .members()
                    .iter()
                    .filter(|member| member.value(attribute) == Some(category))
                    .count(),
            })
            .filter(|bin| bin.count > 0)
            .collect();

        Self {
            attribute,
            title: format!("{} distribution in the group", attribute.label()),
            x_label: attribute.label().to_string(),
            y_label: Y_LABEL.to_string(),
            bins,
        }
    }

    /// Number of members that answered this question
    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

/// Everything the dashboard shows for one submitted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub cluster: ClusterKey,
    pub name: String,
    pub description: String,
    pub cohort_size: usize,
    /// One entry per attribute, in [`Attribute::ALL`] order
    pub distributions: Vec<Distribution>,
}

/// Classify the form, resolve its cluster and summarize the matching cohort.
///
/// Fails without building any part of the view when the cluster has no
/// description.
pub fn compute_view(input: &SurveyRecord, context: &AppContext) -> Result<ViewModel, ViewError> {
    let assignment = context.model().classify(input);
    let metadata = resolve_metadata(&assignment, context.catalog())?;
    let cohort = filter_cohort(context.population(), &assignment);

    debug!(
        cluster = %cohort.key(),
        members = cohort.len(),
        "computed cohort"
    );

    Ok(ViewModel {
        cluster: cohort.key().clone(),
        name: metadata.name.clone(),
        description: metadata.description.clone(),
        cohort_size: cohort.len(),
        distributions: Attribute::ALL
            .iter()
            .map(|&attribute| Distribution::from_cohort(&cohort, attribute))
            .collect(),
    })
}
