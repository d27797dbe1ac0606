//! Feature rows - one ordered set of named model inputs

use serde::{Deserialize, Serialize};

/// A single feature value, numeric or categorical
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn category(value: &str) -> Self {
        FeatureValue::Category(value.to_string())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(c) => Some(c.as_str()),
            FeatureValue::Number(_) => None,
        }
    }
}

/// One request's feature values, kept in insertion order.
///
/// Order matters: explanations break ties on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, FeatureValue)>,
    {
        let mut row = Self::new();
        for (name, value) in pairs {
            row.set(name, value);
        }
        row
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Insert or overwrite a value; new names are appended
    pub fn set(&mut self, name: &str, value: FeatureValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Copy of this row with one feature replaced
    pub fn with_value(&self, name: &str, value: FeatureValue) -> Self {
        let mut row = self.clone();
        row.set(name, value);
        row
    }

    pub fn value_at(&self, index: usize) -> Option<&FeatureValue> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn set_at(&mut self, index: usize, value: FeatureValue) {
        if let Some((_, slot)) = self.entries.get_mut(index) {
            *slot = value;
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_position() {
        let mut row = FeatureRow::from_pairs([
            ("a", FeatureValue::Number(1.0)),
            ("b", FeatureValue::category("x")),
        ]);
        row.set("a", FeatureValue::Number(5.0));
        row.set("c", FeatureValue::Number(2.0));

        let names: Vec<&str> = row.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(row.get("a"), Some(&FeatureValue::Number(5.0)));
    }

    #[test]
    fn test_untagged_values() {
        let number: FeatureValue = serde_json::from_str("4").unwrap();
        let category: FeatureValue = serde_json::from_str("\"Steady\"").unwrap();
        assert_eq!(number, FeatureValue::Number(4.0));
        assert_eq!(category.as_category(), Some("Steady"));
    }
}
