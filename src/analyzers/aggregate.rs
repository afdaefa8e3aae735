use serde::Serialize;
use std::fmt;

use crate::analyzers::utility::mean;
use crate::filter::FilteredSet;

/// Mean rating for one attribute, or "N/A" when there is nothing to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttributeAverage {
    Available { mean: f64, sample_count: usize },
    Unavailable,
}

/// `4.00` or `N/A`.
impl fmt::Display for AttributeAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeAverage::Available { mean, .. } => write!(f, "{:.2}", mean),
            AttributeAverage::Unavailable => write!(f, "N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSummary {
    pub name: String,
    pub average: AttributeAverage,
}

/// Averages each of `attributes`, in the order given, over `set`.
///
/// Attributes missing from the source table, or with no numeric value in
/// any filtered record, are [`AttributeAverage::Unavailable`].
pub fn aggregate_attributes(set: &FilteredSet, attributes: &[String]) -> Vec<AttributeSummary> {
    attributes
        .iter()
        .map(|name| {
            let average = if set.attribute_columns.contains(name) {
                let values: Vec<f64> = set
                    .records
                    .iter()
                    .filter_map(|r| r.attribute_scores.get(name).copied())
                    .collect();
                match mean(&values) {
                    Some(mean) => AttributeAverage::Available {
                        mean,
                        sample_count: values.len(),
                    },
                    None => AttributeAverage::Unavailable,
                }
            } else {
                AttributeAverage::Unavailable
            };

            AttributeSummary {
                name: name.clone(),
                average,
            }
        })
        .collect()
}
