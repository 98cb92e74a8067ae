//! Template substitution and link resolution
//!
//! The display pipeline only depends on the [`VariableReplacer`] and
//! [`Linker`] traits. Closures implement both, so callers can plug in
//! their own template engine; [`TemplateReplacer`] and
//! [`DataLinkResolver`] are the stock implementations.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashframe_types::{builtin, DataLink, LinkModel, LinkTarget, ScopedVar, ScopedVars};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `$name`, `${name}`, `${name:format}`, `[[name]]`, `[[name:format]]`
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(\w+)|\[\[([\s\S]+?)(?::(\w+))?\]\]|\$\{(\w+)(?::(\w+))?\}")
        .expect("variable pattern is valid")
});

/// Replaces template variables in a string
pub trait VariableReplacer {
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String;
}

impl<F> VariableReplacer for F
where
    F: Fn(&str, &ScopedVars) -> String,
{
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String {
        self(template, scoped_vars)
    }
}

/// What a linker receives for one display value
#[derive(Debug, Clone, Copy)]
pub struct LinkOptions<'a> {
    pub links: &'a [DataLink],
    pub scoped_vars: &'a ScopedVars,
}

/// Resolves a field's link templates for one display value
pub trait Linker {
    fn links(&self, options: LinkOptions<'_>) -> Vec<LinkModel>;
}

impl<F> Linker for F
where
    F: Fn(LinkOptions<'_>) -> Vec<LinkModel>,
{
    fn links(&self, options: LinkOptions<'_>) -> Vec<LinkModel> {
        self(options)
    }
}

/// Substitutes scoped variables first, then global template variables.
/// Unknown names are left in place.
#[derive(Debug, Clone, Default)]
pub struct TemplateReplacer {
    variables: BTreeMap<String, String>,
}

impl TemplateReplacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    fn lookup(&self, name: &str, scoped_vars: &ScopedVars) -> Option<String> {
        scoped_vars
            .get(name)
            .map(ScopedVar::value_text)
            .or_else(|| self.variables.get(name).cloned())
    }

    /// `var-<name>=<value>` pairs for every global variable, with scoped
    /// values taking precedence
    pub fn variables_query(&self, scoped_vars: &ScopedVars) -> String {
        let params: Vec<(String, String)> = self
            .variables
            .iter()
            .map(|(name, value)| {
                let value = scoped_vars
                    .get(name)
                    .map(ScopedVar::value_text)
                    .unwrap_or_else(|| value.clone());
                (format!("var-{}", name), value)
            })
            .collect();
        to_url_params(&params)
    }
}

impl VariableReplacer for TemplateReplacer {
    fn replace(&self, template: &str, scoped_vars: &ScopedVars) -> String {
        VARIABLE_PATTERN
            .replace_all(template, |caps: &Captures| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                self.lookup(name, scoped_vars)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// A time range rendered as URL parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTimeRange {
    pub from: String,
    pub to: String,
}

/// Supplies the dashboard's current time range
pub trait TimeRangeProvider: Send + Sync {
    fn time_range_for_url(&self) -> UrlTimeRange;
}

/// A fixed range, e.g. one given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTimeRange(pub UrlTimeRange);

impl StaticTimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self(UrlTimeRange {
            from: from.into(),
            to: to.into(),
        })
    }
}

impl TimeRangeProvider for StaticTimeRange {
    fn time_range_for_url(&self) -> UrlTimeRange {
        self.0.clone()
    }
}

/// Resolves link titles and urls through a [`TemplateReplacer`], adding
/// `__url_time_range` and `__all_variables` to the scope
pub struct DataLinkResolver {
    replacer: TemplateReplacer,
    time_range: Arc<dyn TimeRangeProvider>,
}

impl DataLinkResolver {
    pub fn new(replacer: TemplateReplacer, time_range: Arc<dyn TimeRangeProvider>) -> Self {
        Self {
            replacer,
            time_range,
        }
    }

    pub fn link_model(&self, link: &DataLink, scoped_vars: &ScopedVars) -> LinkModel {
        let range = self.time_range.time_range_for_url();
        let time_query = to_url_params(&[
            ("from".to_string(), range.from),
            ("to".to_string(), range.to),
        ]);
        let variables_query = self.replacer.variables_query(scoped_vars);

        let mut url_vars = scoped_vars.clone();
        url_vars.insert(
            builtin::KEEP_TIME.to_string(),
            ScopedVar::new(time_query.clone(), time_query),
        );
        url_vars.insert(
            builtin::INCLUDE_VARS.to_string(),
            ScopedVar::new(variables_query.clone(), variables_query),
        );

        LinkModel {
            href: self.replacer.replace(&link.url, &url_vars),
            title: self.replacer.replace(&link.title, scoped_vars),
            target: LinkTarget::from_blank(link.target_blank),
        }
    }
}

impl Linker for DataLinkResolver {
    fn links(&self, options: LinkOptions<'_>) -> Vec<LinkModel> {
        options
            .links
            .iter()
            .map(|link| self.link_model(link, options.scoped_vars))
            .collect()
    }
}

/// `a=1&b=x%20y`
pub fn to_url_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_uri_component(key),
                encode_uri_component(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode everything except unreserved characters
fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(pairs: &[(&str, &str)]) -> ScopedVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), ScopedVar::new(*v, *v)))
            .collect()
    }

    #[test]
    fn test_replace_all_syntaxes() {
        let replacer = TemplateReplacer::new().with_variable("host", "web-1");
        let vars = scope(&[("__series_name", "cpu")]);
        assert_eq!(
            replacer.replace("$__series_name on ${host} / [[host]]", &vars),
            "cpu on web-1 / web-1"
        );
        assert_eq!(replacer.replace("${host:raw}", &vars), "web-1");
        assert_eq!(replacer.replace("$missing stays", &vars), "$missing stays");
    }

    #[test]
    fn test_scoped_vars_shadow_globals() {
        let replacer = TemplateReplacer::new().with_variable("host", "web-1");
        let vars = scope(&[("host", "web-2")]);
        assert_eq!(replacer.replace("$host", &vars), "web-2");
        assert_eq!(replacer.variables_query(&vars), "var-host=web-2");
    }

    #[test]
    fn test_data_link_resolver() {
        let replacer = TemplateReplacer::new().with_variable("env", "prod");
        let resolver = DataLinkResolver::new(
            replacer,
            Arc::new(StaticTimeRange::new("now-1h", "now")),
        );
        let link = DataLink {
            title: "Open $__series_name".into(),
            url: "http://x/d?${__url_time_range}&${__all_variables}".into(),
            target_blank: true,
        };
        let vars = scope(&[("__series_name", "cpu")]);
        let models = resolver.links(LinkOptions {
            links: std::slice::from_ref(&link),
            scoped_vars: &vars,
        });
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].title, "Open cpu");
        assert_eq!(models[0].href, "http://x/d?from=now-1h&to=now&var-env=prod");
        assert_eq!(models[0].target, LinkTarget::Blank);
    }

    #[test]
    fn test_closures_as_collaborators() {
        let upper = |template: &str, _: &ScopedVars| template.to_uppercase();
        assert_eq!(upper.replace("abc", &ScopedVars::new()), "ABC");

        let linker = |options: LinkOptions<'_>| -> Vec<LinkModel> {
            options
                .links
                .iter()
                .map(|l| LinkModel {
                    href: l.url.clone(),
                    title: l.title.clone(),
                    target: LinkTarget::SelfTarget,
                })
                .collect()
        };
        let links = vec![DataLink::default()];
        let vars = ScopedVars::new();
        let out = linker.links(LinkOptions {
            links: &links,
            scoped_vars: &vars,
        });
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_url_encoding() {
        let params = vec![("q".to_string(), "a b&c".to_string())];
        assert_eq!(to_url_params(&params), "q=a%20b%26c");
    }
}
