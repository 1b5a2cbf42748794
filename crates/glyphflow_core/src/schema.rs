//! Depth/type schema for the workflow tree.
//!
//! # Responsibility
//! - Fix the maximum tree depth and the required type label at each depth.
//! - Answer "what child type belongs under this parent" for validation.
//!
//! # Invariants
//! - Labels are non-empty and pairwise distinct.
//! - Depth is 1-based everywhere in this module.

/// Fallback hierarchy used when no configured schema is available.
pub const DEFAULT_SCHEMA: [&str; 4] = ["Project", "Phase", "Task", "Subtask"];

/// Ordered list of type labels; position = depth - 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSchema {
    labels: Vec<String>,
}

/// Why a label list cannot form a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLabelError {
    /// No labels supplied.
    Empty,
    /// The same label appears at two depths.
    Duplicate(String),
}

impl NodeSchema {
    /// Builds a schema from ordered labels.
    pub fn new(labels: Vec<String>) -> Result<Self, SchemaLabelError> {
        if labels.is_empty() {
            return Err(SchemaLabelError::Empty);
        }
        for (index, label) in labels.iter().enumerate() {
            if labels[..index].iter().any(|seen| seen == label) {
                return Err(SchemaLabelError::Duplicate(label.clone()));
            }
        }
        Ok(Self { labels })
    }

    /// Ordered labels, outermost depth first.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Maximum tree depth allowed by this schema.
    pub fn max_depth(&self) -> usize {
        self.labels.len()
    }

    /// Label required at a 1-based depth, or `None` past the schema.
    pub fn label_at(&self, depth: usize) -> Option<&str> {
        if depth == 0 {
            return None;
        }
        self.labels.get(depth - 1).map(String::as_str)
    }

    /// Type expected for a child of a parent at `parent_depth` (0 = root
    /// level), or `None` when the parent already sits at max depth.
    pub fn expected_child_type(&self, parent_depth: usize) -> Option<&str> {
        self.label_at(parent_depth + 1)
    }
}

impl Default for NodeSchema {
    fn default() -> Self {
        Self {
            labels: DEFAULT_SCHEMA.iter().map(|label| label.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NodeSchema, SchemaLabelError, DEFAULT_SCHEMA};

    #[test]
    fn default_schema_matches_fallback() {
        let schema = NodeSchema::default();
        assert_eq!(schema.max_depth(), 4);
        assert_eq!(schema.labels()[0], DEFAULT_SCHEMA[0]);
        assert_eq!(schema.label_at(4), Some("Subtask"));
        assert_eq!(schema.label_at(5), None);
        assert_eq!(schema.label_at(0), None);
    }

    #[test]
    fn expected_child_type_walks_one_level_down() {
        let schema = NodeSchema::default();
        assert_eq!(schema.expected_child_type(0), Some("Project"));
        assert_eq!(schema.expected_child_type(1), Some("Phase"));
        assert_eq!(schema.expected_child_type(4), None);
    }

    #[test]
    fn new_rejects_empty_and_duplicates() {
        assert_eq!(NodeSchema::new(Vec::new()).unwrap_err(), SchemaLabelError::Empty);
        let err = NodeSchema::new(vec!["Goal".to_string(), "Goal".to_string()]).unwrap_err();
        assert_eq!(err, SchemaLabelError::Duplicate("Goal".to_string()));
    }
}
