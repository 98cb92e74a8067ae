//! Process-wide format registry, built on first access

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::categories::get_categories;
use crate::value_format::{ValueFormatCategory, ValueFormatter};

/// Categories plus an id index. Immutable once built.
pub struct FormatRegistry {
    categories: Vec<ValueFormatCategory>,
    index: HashMap<String, ValueFormatter>,
}

impl FormatRegistry {
    pub fn build() -> Self {
        let categories = get_categories();
        let index: HashMap<String, ValueFormatter> = categories
            .iter()
            .flat_map(|category| category.formats.iter())
            .map(|format| (format.id.clone(), format.format.clone()))
            .collect();
        debug!(
            "Built format registry: {} categories, {} formats",
            categories.len(),
            index.len()
        );
        Self { categories, index }
    }

    pub fn get(&self, id: &str) -> Option<&ValueFormatter> {
        self.index.get(id)
    }

    pub fn categories(&self) -> &[ValueFormatCategory] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

static FORMAT_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::build);

pub fn format_registry() -> &'static FormatRegistry {
    &FORMAT_REGISTRY
}

/// Formatter for a unit id, `None` when the id is not registered
pub fn get_value_format(id: &str) -> Option<&'static ValueFormatter> {
    FORMAT_REGISTRY.get(id)
}

/// One entry of the unit picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatMenuItem {
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatMenu {
    pub text: String,
    pub submenu: Vec<FormatMenuItem>,
}

/// Categories as nested menu entries
pub fn get_value_formats() -> Vec<FormatMenu> {
    FORMAT_REGISTRY
        .categories()
        .iter()
        .map(|category| FormatMenu {
            text: category.name.clone(),
            submenu: category
                .formats
                .iter()
                .map(|format| FormatMenuItem {
                    text: format.name.clone(),
                    value: format.id.clone(),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let ms = get_value_format("ms").expect("ms registered");
        assert_eq!(ms(250.0, Some(0), None, false), "250 ms");

        let none = get_value_format("none").expect("none registered");
        assert_eq!(none(3.0, Some(0), None, false), "3");

        assert!(get_value_format("furlongs").is_none());
    }

    #[test]
    fn test_registry_is_shared() {
        let a = format_registry() as *const FormatRegistry;
        let b = format_registry() as *const FormatRegistry;
        assert_eq!(a, b);
        assert!(!format_registry().is_empty());
    }

    #[test]
    fn test_menu_shape() {
        let menu = get_value_formats();
        assert_eq!(menu[0].text, "Misc");
        assert_eq!(menu[0].submenu[0].value, "none");

        let json = serde_json::to_value(&menu[0].submenu[1]).unwrap();
        assert_eq!(json["text"], "short");
        assert_eq!(json["value"], "short");

        let total: usize = menu.iter().map(|m| m.submenu.len()).sum();
        assert_eq!(total, format_registry().len());
    }

    #[test]
    fn test_short_scale() {
        let short = get_value_format("short").unwrap();
        assert_eq!(short(1500.0, Some(1), None, false), "1.5 K");
        assert_eq!(short(2_000_000.0, Some(0), None, false), "2 Mil");
    }
}
