// Taxonomy store: the two-level scam category tree and canned summaries.
//
// Built once and never mutated. The hierarchical labeler reads the parent
// list and per-parent child lists; the summarizer reads the template table.

mod data;

use std::collections::HashMap;

/// Immutable two-level category tree plus summary templates keyed by child label.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    parents: Vec<String>,
    children: HashMap<String, Vec<String>>,
    templates: HashMap<String, String>,
}

impl Taxonomy {
    /// The built-in scam taxonomy (10 parents x 10 children, 8 templates).
    pub fn builtin() -> Self {
        let tree = data::CHILD_LABELS
            .iter()
            .map(|(parent, kids)| {
                (
                    parent.to_string(),
                    kids.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect::<HashMap<String, Vec<String>>>();

        // Keep the display order from PARENT_CATEGORIES rather than the map
        let parents: Vec<(String, Vec<String>)> = data::PARENT_CATEGORIES
            .iter()
            .map(|p| (p.to_string(), tree.get(*p).cloned().unwrap_or_default()))
            .collect();

        let templates = data::SUMMARY_TEMPLATES
            .iter()
            .map(|(label, text)| (label.to_string(), text.to_string()))
            .collect();

        Self::from_parts(parents, templates)
    }

    /// Build a taxonomy from explicit parts. A parent may have no children.
    pub fn from_parts(
        parents: Vec<(String, Vec<String>)>,
        templates: Vec<(String, String)>,
    ) -> Self {
        let mut order = Vec::with_capacity(parents.len());
        let mut children = HashMap::with_capacity(parents.len());
        for (parent, kids) in parents {
            if !children.contains_key(&parent) {
                order.push(parent.clone());
            }
            children.insert(parent, kids);
        }

        Self {
            parents: order,
            children,
            templates: templates.into_iter().collect(),
        }
    }

    /// Parent category names in display order.
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Child labels for a parent, or an empty slice for unknown/childless parents.
    pub fn children(&self, parent: &str) -> &[String] {
        self.children
            .get(parent)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `child` is listed under `parent`.
    pub fn contains_child(&self, parent: &str, child: &str) -> bool {
        self.children(parent).iter().any(|c| c == child)
    }

    /// Canned summary for a child label, if one exists.
    pub fn template(&self, child_label: &str) -> Option<&str> {
        self.templates.get(child_label).map(|s| s.as_str())
    }

    /// Total number of child labels across all parents.
    pub fn child_count(&self) -> usize {
        self.children.values().map(|v| v.len()).sum()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Map a parent category to its short system code (`"other"` when unknown).
pub fn category_code(parent: &str) -> &'static str {
    data::CATEGORY_CODES
        .iter()
        .find(|(name, _)| *name == parent)
        .map(|(_, code)| *code)
        .unwrap_or("other")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shape() {
        let tax = Taxonomy::builtin();
        assert_eq!(tax.parents().len(), 10);
        assert_eq!(tax.child_count(), 100);
        for parent in tax.parents() {
            assert_eq!(tax.children(parent).len(), 10, "{parent} should have 10 children");
        }
    }

    #[test]
    fn test_builtin_parent_order() {
        let tax = Taxonomy::builtin();
        assert_eq!(tax.parents()[0], "identity and account scams");
        assert_eq!(tax.parents()[9], "banking and institutional scams");
    }

    #[test]
    fn test_every_template_belongs_to_some_parent() {
        let tax = Taxonomy::builtin();
        for (label, _) in data::SUMMARY_TEMPLATES {
            assert!(
                tax.parents().iter().any(|p| tax.contains_child(p, label)),
                "template label {label} is not in the tree"
            );
        }
    }

    #[test]
    fn test_unknown_parent_has_no_children() {
        let tax = Taxonomy::builtin();
        assert!(tax.children("not a category").is_empty());
    }

    #[test]
    fn test_from_parts_allows_childless_parent() {
        let tax = Taxonomy::from_parts(
            vec![
                ("a".to_string(), vec!["a1".to_string()]),
                ("b".to_string(), vec![]),
            ],
            vec![],
        );
        assert_eq!(tax.parents(), &["a".to_string(), "b".to_string()]);
        assert!(tax.children("b").is_empty());
        assert!(tax.contains_child("a", "a1"));
    }

    #[test]
    fn test_category_code_lookup() {
        assert_eq!(category_code("investment and trading scams"), "investment");
        assert_eq!(category_code("tech support and service scams"), "tech_support");
        assert_eq!(category_code(""), "other");
    }
}
