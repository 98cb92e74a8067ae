//! Display values and resolved links

use serde::{Deserialize, Serialize};

/// A formatted projection of one value, computed on demand.
///
/// `numeric` is `NaN` when the value has no numeric reading
/// (it serializes as `null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayValue {
    pub text: String,
    pub numeric: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl DisplayValue {
    pub fn new(text: impl Into<String>, numeric: f64) -> Self {
        Self {
            text: text.into(),
            numeric,
            color: None,
            title: None,
        }
    }
}

/// Where a resolved link opens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    #[serde(rename = "_blank")]
    Blank,
    #[default]
    #[serde(rename = "_self")]
    SelfTarget,
}

impl LinkTarget {
    pub fn from_blank(target_blank: bool) -> Self {
        if target_blank {
            LinkTarget::Blank
        } else {
            LinkTarget::SelfTarget
        }
    }
}

/// A link with its templates already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkModel {
    pub href: String,
    pub title: String,
    pub target: LinkTarget,
}
