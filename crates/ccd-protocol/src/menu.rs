//! Main menu payload.

use serde::{Deserialize, Serialize};

/// One entry of the main menu. Entries nest through `below`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub key: String,
    pub title: String,
    pub description: String,
    pub uri: String,
    pub alias: String,
    pub external: bool,
    pub absolute: String,
    pub relative: String,
    pub existing: bool,
    pub weight: String,
    pub expanded: bool,
    pub enabled: bool,
    pub uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub below: Option<Vec<MenuItem>>,
}

impl MenuItem {
    /// Child entries, empty for a leaf.
    pub fn children(&self) -> &[MenuItem] {
        self.below.as_deref().unwrap_or_default()
    }

    /// Visits this entry and all descendants depth-first, passing the depth
    /// (0 for `self`).
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(usize, &'a MenuItem)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(usize, &'a MenuItem)) {
        visit(depth, self);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU: &str = r#"[
        {"key": "standard.front_page", "title": "Home", "description": "", "uri": "internal:/",
         "alias": "", "external": false, "absolute": "https://ccd.example/", "relative": "/",
         "existing": true, "weight": "-50", "expanded": false, "enabled": true, "uuid": null},
        {"key": "menu_link_content:abc", "title": "Dances", "uri": "internal:/dances",
         "external": false, "weight": "0", "expanded": true, "enabled": true, "uuid": "abc",
         "below": [
            {"key": "menu_link_content:def", "title": "Schedule", "relative": "/schedule",
             "weight": "1", "enabled": true}
         ]}
    ]"#;

    #[test]
    fn test_menu_parses_nested_entries_with_missing_fields() {
        let items: Vec<MenuItem> = serde_json::from_str(MENU).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Home");
        assert!(items[0].uuid.is_none());
        assert!(items[0].children().is_empty());
        assert_eq!(items[1].children().len(), 1);
        assert_eq!(items[1].children()[0].title, "Schedule");
        assert_eq!(items[1].children()[0].description, "");
    }

    #[test]
    fn test_walk_visits_depth_first() {
        let items: Vec<MenuItem> = serde_json::from_str(MENU).unwrap();
        let mut seen = Vec::new();
        for item in &items {
            item.walk(&mut |depth, entry| seen.push((depth, entry.title.clone())));
        }
        assert_eq!(
            seen,
            vec![
                (0, "Home".to_string()),
                (0, "Dances".to_string()),
                (1, "Schedule".to_string()),
            ]
        );
    }
}
