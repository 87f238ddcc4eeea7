use std::{collections::HashMap, fs, path::Path};

use crate::error::{DatasetErr, Result};

/// Name of the file holding the feature groups of a dataset directory.
pub const FEATURE_GROUPS_FILE: &str = "_multispec_feature_groups.json";

/// The group a column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Feature,
    Label,
}

/// The feature/label split of a dataset's columns.
///
/// Both name lists keep the order they were given in; that order is the column order of every
/// batch built from them. The name lookup is resolved once on construction.
#[derive(Debug, Clone)]
pub struct FeatureGroups {
    features: Vec<String>,
    labels: Vec<String>,
    index: HashMap<String, (Group, usize)>,
}

impl FeatureGroups {
    /// Creates a new `FeatureGroups`.
    ///
    /// # Arguments
    /// * `features` - The ordered feature column names.
    /// * `labels` - The ordered label column names.
    ///
    /// # Errors
    /// Fails if a name appears twice in a group or in both groups.
    pub fn new<F, L>(features: F, labels: L) -> Result<Self>
    where
        F: IntoIterator,
        F::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(features.len() + labels.len());

        for (group, names) in [(Group::Feature, &features), (Group::Label, &labels)] {
            for (i, name) in names.iter().enumerate() {
                if let Some((prev, _)) = index.insert(name.clone(), (group, i)) {
                    let column = name.clone();
                    return Err(if prev == group {
                        DatasetErr::DuplicateColumn { column }
                    } else {
                        DatasetErr::OverlappingColumn { column }
                    });
                }
            }
        }

        Ok(Self {
            features,
            labels,
            index,
        })
    }

    /// Loads the feature groups of the dataset stored in `dir`.
    ///
    /// The groups file holds a JSON list of name lists; the first one are the features and the
    /// second one the labels.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(FEATURE_GROUPS_FILE);
        let content = fs::read_to_string(&path).map_err(|source| DatasetErr::Io {
            path: path.clone(),
            source,
        })?;

        let groups: Vec<Vec<String>> =
            serde_json::from_str(&content).map_err(|source| DatasetErr::Json {
                path: path.clone(),
                line: 1,
                source,
            })?;

        let [features, labels]: [Vec<String>; 2] = groups
            .try_into()
            .map_err(|groups: Vec<_>| DatasetErr::InvalidFeatureGroups { got: groups.len() })?;

        log::debug!(
            "loaded {} feature and {} label columns from {}",
            features.len(),
            labels.len(),
            path.display()
        );
        Self::new(features, labels)
    }

    #[inline]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The amount of classes, one per label column.
    #[inline]
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Returns the group of `column` and its position inside that group.
    #[inline]
    pub fn resolve(&self, column: &str) -> Option<(Group, usize)> {
        self.index.get(column).copied()
    }
}

/// Returns the dataset context (its feature groups) of the dataset stored in `dir`.
pub fn get_context(dir: &Path) -> Result<FeatureGroups> {
    FeatureGroups::load(dir)
}
