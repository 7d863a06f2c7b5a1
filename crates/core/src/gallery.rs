//! Gallery vocabularies and display partitioning.
//!
//! Project images are bucketed by their `image_type` discriminator; the
//! standalone gallery is bucketed by an enumerated category. Partitioning is
//! purely for display, both live in a single table each.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Project image types
// ---------------------------------------------------------------------------

/// Discriminator stored in `project_images.image_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectImageType {
    Project,
    Construction,
    #[serde(rename = "project_3d_visualizations")]
    Visualization3d,
}

impl ProjectImageType {
    pub const ALL: [Self; 3] = [Self::Project, Self::Construction, Self::Visualization3d];

    /// Parse from the database `image_type` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "project" => Ok(Self::Project),
            "construction" => Ok(Self::Construction),
            "project_3d_visualizations" => Ok(Self::Visualization3d),
            other => Err(CoreError::Validation(format!(
                "Invalid image type '{other}'. Must be one of: project, construction, \
                 project_3d_visualizations"
            ))),
        }
    }

    /// Database value.
    pub fn name(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Construction => "construction",
            Self::Visualization3d => "project_3d_visualizations",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project Pictures",
            Self::Construction => "Construction Pictures",
            Self::Visualization3d => "Project 3D Visualizations",
        }
    }
}

/// A project's images split into display buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectGallery<T> {
    pub project: Vec<T>,
    pub construction: Vec<T>,
    pub visualizations: Vec<T>,
}

impl<T> Default for ProjectGallery<T> {
    fn default() -> Self {
        Self {
            project: Vec::new(),
            construction: Vec::new(),
            visualizations: Vec::new(),
        }
    }
}

impl<T> ProjectGallery<T> {
    /// Partition `items` by their image type, preserving input order inside
    /// each bucket.
    pub fn partition<I, F>(items: I, image_type: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> ProjectImageType,
    {
        let mut gallery = Self::default();
        for item in items {
            match image_type(&item) {
                ProjectImageType::Project => gallery.project.push(item),
                ProjectImageType::Construction => gallery.construction.push(item),
                ProjectImageType::Visualization3d => gallery.visualizations.push(item),
            }
        }
        gallery
    }

    pub fn len(&self) -> usize {
        self.project.len() + self.construction.len() + self.visualizations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Standalone gallery categories
// ---------------------------------------------------------------------------

/// Fixed vocabulary for `gallery_images.category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryCategory {
    Education,
    Health,
    Office,
    Civic,
    Residential,
    Commercial,
    Industrial,
    Recreational,
}

impl GalleryCategory {
    pub const ALL: [Self; 8] = [
        Self::Education,
        Self::Health,
        Self::Office,
        Self::Civic,
        Self::Residential,
        Self::Commercial,
        Self::Industrial,
        Self::Recreational,
    ];

    /// Case-insensitive match against the vocabulary. `None` for anything
    /// outside it.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
    }

    /// Parse a category supplied on write. Unknown values are rejected so
    /// typos never reach the table.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        Self::from_name(name).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
            CoreError::Validation(format!(
                "Invalid gallery category '{name}'. Valid categories: {}",
                valid.join(", ")
            ))
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Health => "health",
            Self::Office => "office",
            Self::Civic => "civic",
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Industrial => "industrial",
            Self::Recreational => "recreational",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Health => "Health",
            Self::Office => "Office",
            Self::Civic => "Civic",
            Self::Residential => "Residential",
            Self::Commercial => "Commercial",
            Self::Industrial => "Industrial",
            Self::Recreational => "Recreational",
        }
    }
}

/// One display bucket of the standalone gallery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryBucket<T> {
    pub category: GalleryCategory,
    pub label: &'static str,
    pub images: Vec<T>,
}

/// Bucket `items` by category in vocabulary order. Every category gets a
/// bucket, empty ones included.
pub fn partition_by_category<T, I, F>(items: I, category: F) -> Vec<GalleryBucket<T>>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> Option<GalleryCategory>,
{
    let mut buckets: Vec<GalleryBucket<T>> = GalleryCategory::ALL
        .into_iter()
        .map(|c| GalleryBucket {
            category: c,
            label: c.label(),
            images: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(c) = category(&item) {
            if let Some(bucket) = buckets.iter_mut().find(|b| b.category == c) {
                bucket.images.push(item);
            }
        }
    }
    buckets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_type_round_trips_names() {
        for t in ProjectImageType::ALL {
            assert_eq!(ProjectImageType::from_name(t.name()).unwrap(), t);
        }
        assert!(ProjectImageType::from_name("aerial").is_err());
    }

    #[test]
    fn image_type_serde_uses_db_names() {
        let json = serde_json::to_string(&ProjectImageType::Visualization3d).unwrap();
        assert_eq!(json, "\"project_3d_visualizations\"");
    }

    #[test]
    fn project_gallery_partitions_in_order() {
        let items = vec![
            (1, ProjectImageType::Project),
            (2, ProjectImageType::Construction),
            (3, ProjectImageType::Project),
            (4, ProjectImageType::Visualization3d),
        ];
        let gallery = ProjectGallery::partition(items, |(_, t)| *t);
        let ids = |v: &[(i32, ProjectImageType)]| v.iter().map(|(id, _)| *id).collect::<Vec<_>>();

        assert_eq!(ids(&gallery.project[..]), vec![1, 3]);
        assert_eq!(ids(&gallery.construction[..]), vec![2]);
        assert_eq!(ids(&gallery.visualizations[..]), vec![4]);
        assert_eq!(gallery.len(), 4);
    }

    #[test]
    fn empty_project_gallery() {
        let gallery: ProjectGallery<i32> = ProjectGallery::partition(Vec::new(), |_| {
            ProjectImageType::Project
        });
        assert!(gallery.is_empty());
    }

    #[test]
    fn category_matching_is_case_insensitive() {
        assert_eq!(GalleryCategory::from_name("EDUCATION"), Some(GalleryCategory::Education));
        assert_eq!(GalleryCategory::from_name(" Health "), Some(GalleryCategory::Health));
        assert_eq!(GalleryCategory::from_name("offce"), None);
    }

    #[test]
    fn category_parse_rejects_typos() {
        assert!(GalleryCategory::parse("civic").is_ok());
        assert!(GalleryCategory::parse("civc").is_err());
    }

    #[test]
    fn partition_by_category_includes_empty_buckets() {
        let items = vec![("a", "office"), ("b", "Health"), ("c", "office"), ("d", "unknown")];
        let buckets = partition_by_category(items, |(_, c)| GalleryCategory::from_name(c));

        assert_eq!(buckets.len(), GalleryCategory::ALL.len());
        let office = buckets
            .iter()
            .find(|b| b.category == GalleryCategory::Office)
            .unwrap();
        assert_eq!(office.images.len(), 2);
        let education = buckets
            .iter()
            .find(|b| b.category == GalleryCategory::Education)
            .unwrap();
        assert!(education.images.is_empty());

        let total: usize = buckets.iter().map(|b| b.images.len()).sum();
        assert_eq!(total, 3);
    }
}
