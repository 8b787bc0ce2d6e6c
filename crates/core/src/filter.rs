//! Hierarchy query filters.
//!
//! A [`FilterSpec`] has four independent dimensions. Each is either unset or
//! a [`FilterDimension`]: an include-set or an exclude-set, never both. All
//! comparisons are case-insensitive.
//!
//! Query strings use comma-separated values, with a leading `-` on every
//! value marking an exclude list (`status=Critical,Warning` vs
//! `status=-OK,-Info`).

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::CoreError;
use crate::sample::Sample;
use crate::severity::Severity;

/// Prefix marking an excluded value in a query string.
const EXCLUDE_PREFIX: char = '-';

// ---------------------------------------------------------------------------
// FilterDimension
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDimension {
    Include(BTreeSet<String>),
    Exclude(BTreeSet<String>),
}

impl FilterDimension {
    pub fn include<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Include(normalize(values))
    }

    pub fn exclude<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Exclude(normalize(values))
    }

    /// Parse a comma-separated query value.
    ///
    /// Returns `None` when no usable values remain. Mixing excluded and
    /// included values in one list is rejected.
    pub fn parse(raw: &str) -> Result<Option<Self>, CoreError> {
        let values: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return Ok(None);
        }

        let excluded = values
            .iter()
            .filter(|v| v.starts_with(EXCLUDE_PREFIX))
            .count();
        if excluded == 0 {
            return Ok(Some(Self::include(values)));
        }
        if excluded != values.len() {
            return Err(CoreError::Validation(format!(
                "filter '{raw}' mixes included and excluded values"
            )));
        }

        let stripped: Vec<&str> = values
            .iter()
            .map(|&v| v.strip_prefix(EXCLUDE_PREFIX).unwrap_or(v).trim())
            .filter(|v| !v.is_empty())
            .collect();
        if stripped.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::exclude(stripped)))
    }

    fn values(&self) -> &BTreeSet<String> {
        match self {
            Self::Include(values) | Self::Exclude(values) => values,
        }
    }

    /// Set semantics: include passes on any intersection, exclude fails on
    /// any intersection. An empty input fails an include and passes an
    /// exclude.
    pub fn matches_any<'a, I>(&self, candidates: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let hit = candidates
            .into_iter()
            .any(|candidate| self.values().contains(&candidate.to_lowercase()));
        match self {
            Self::Include(_) => hit,
            Self::Exclude(_) => !hit,
        }
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.matches_any([candidate])
    }
}

fn normalize<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// The full filter for one hierarchy query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub entity_tags: Option<FilterDimension>,
    pub metric_name: Option<FilterDimension>,
    pub metric_tags: Option<FilterDimension>,
    pub severity: Option<FilterDimension>,
}

impl FilterSpec {
    pub fn with_entity_tags(mut self, dimension: FilterDimension) -> Self {
        self.entity_tags = Some(dimension);
        self
    }

    pub fn with_metric_name(mut self, dimension: FilterDimension) -> Self {
        self.metric_name = Some(dimension);
        self
    }

    pub fn with_metric_tags(mut self, dimension: FilterDimension) -> Self {
        self.metric_tags = Some(dimension);
        self
    }

    pub fn with_severity(mut self, dimension: FilterDimension) -> Self {
        self.severity = Some(dimension);
        self
    }

    /// Whether any per-sample dimension is set.
    pub fn filters_samples(&self) -> bool {
        self.metric_name.is_some() || self.metric_tags.is_some() || self.severity.is_some()
    }

    /// Entity tag check for a subject. Unset passes.
    pub fn entity_passes<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.entity_tags
            .as_ref()
            .map_or(true, |dimension| dimension.matches_any(tags))
    }

    /// Metric name, metric tags and severity checks, ANDed.
    pub fn sample_passes(&self, sample: &Sample) -> bool {
        let name_ok = self
            .metric_name
            .as_ref()
            .map_or(true, |d| d.matches(&sample.metric_name));
        let tags_ok = self
            .metric_tags
            .as_ref()
            .map_or(true, |d| d.matches_any(sample.metric_tags.iter().map(String::as_str)));
        let severity_ok = self
            .severity
            .as_ref()
            .map_or(true, |d| d.matches(sample.status.as_str()));
        name_ok && tags_ok && severity_ok
    }
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Raw hierarchy query parameters as handed over by the invoking layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyQuery {
    pub entity_tags: Option<String>,
    pub metric_name: Option<String>,
    pub metric_tags: Option<String>,
    pub severity: Option<String>,
    pub depth: Option<usize>,
}

impl HierarchyQuery {
    /// Validate and convert into a [`FilterSpec`].
    ///
    /// Severity values must name a known severity.
    pub fn to_filter_spec(&self) -> Result<FilterSpec, CoreError> {
        let parse = |raw: &Option<String>| match raw {
            Some(raw) => FilterDimension::parse(raw),
            None => Ok(None),
        };

        let severity = parse(&self.severity)?;
        if let Some(dimension) = &severity {
            for value in dimension.values() {
                value.parse::<Severity>()?;
            }
        }

        Ok(FilterSpec {
            entity_tags: parse(&self.entity_tags)?,
            metric_name: parse(&self.metric_name)?,
            metric_tags: parse(&self.metric_tags)?,
            severity,
        })
    }
}
