//! The field display pipeline: frames in, formatted display values out

use dashframe_core::{Field, Frame, Vector};
use dashframe_types::{
    builtin, DisplayValue, FieldConfig, FieldType, LinkModel, ScopedVar, ScopedVars,
};
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::field_properties::get_field_properties;
use crate::links::{LinkOptions, Linker, VariableReplacer};
use crate::processor::{get_color_from_threshold, value_text, DisplayProcessor};
use crate::reducers::{reduce_field, reducer_id};

/// Selects the fields an override applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "id", content = "options", rename_all = "camelCase")]
pub enum FieldMatcher {
    ByName(String),
    ByType(FieldType),
    /// Regex over the field name
    ByRegex(String),
    Any,
}

impl FieldMatcher {
    pub fn matches(&self, field: &Field) -> bool {
        match self {
            FieldMatcher::ByName(name) => field.name == *name,
            FieldMatcher::ByType(field_type) => field.field_type == *field_type,
            FieldMatcher::ByRegex(pattern) => match Regex::new(pattern) {
                Ok(re) => re.is_match(&field.name),
                Err(e) => {
                    warn!("Ignoring invalid field matcher regex '{}': {}", pattern, e);
                    false
                }
            },
            FieldMatcher::Any => true,
        }
    }
}

/// Config applied to every field the matcher selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    pub matcher: FieldMatcher,
    #[serde(default)]
    pub config: FieldConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldDisplayOptions {
    /// One display value per row instead of per reducer
    pub values: bool,
    /// Cap on the number of rows shown in values mode; unset means all
    pub limit: Option<usize>,
    /// Reducer ids; empty means `last`
    pub calcs: Vec<String>,
    pub defaults: FieldConfig,
    pub overrides: Vec<FieldOverride>,
    /// Field types that produce display values
    pub include: Vec<FieldType>,
}

impl Default for FieldDisplayOptions {
    fn default() -> Self {
        Self {
            values: false,
            limit: None,
            calcs: Vec::new(),
            defaults: FieldConfig::default(),
            overrides: Vec::new(),
            include: vec![FieldType::Number],
        }
    }
}

impl FieldDisplayOptions {
    /// Merge defaults, the field's own config and matching overrides
    pub fn resolve_config(&self, field: &Field) -> FieldConfig {
        let mut layers: Vec<&FieldConfig> = vec![&self.defaults, &field.config];
        layers.extend(
            self.overrides
                .iter()
                .filter(|o| o.matcher.matches(field))
                .map(|o| &o.config),
        );
        get_field_properties(&layers)
    }

    fn reducer_ids(&self) -> Vec<String> {
        if self.calcs.is_empty() {
            vec![reducer_id::LAST.to_string()]
        } else {
            self.calcs.clone()
        }
    }
}

/// One display value plus where it came from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDisplay {
    /// Reducer id, or the field name in values mode
    pub name: String,
    /// The resolved config the value was formatted with
    pub field: FieldConfig,
    pub display: DisplayValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkModel>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
}

/// Everything the pipeline reads. Frames must not change while it runs.
pub struct FieldDisplayRequest<'a> {
    pub frames: &'a [&'a dyn Frame],
    pub options: &'a FieldDisplayOptions,
    pub replacer: &'a dyn VariableReplacer,
    pub linker: &'a dyn Linker,
    /// Caller variables, visible to titles and links
    pub scoped_vars: Option<&'a ScopedVars>,
    pub is_utc: bool,
}

impl<'a> FieldDisplayRequest<'a> {
    pub fn new(
        frames: &'a [&'a dyn Frame],
        options: &'a FieldDisplayOptions,
        replacer: &'a dyn VariableReplacer,
        linker: &'a dyn Linker,
    ) -> Self {
        Self {
            frames,
            options,
            replacer,
            linker,
            scoped_vars: None,
            is_utc: false,
        }
    }

    pub fn with_scoped_vars(mut self, scoped_vars: &'a ScopedVars) -> Self {
        self.scoped_vars = Some(scoped_vars);
        self
    }

    pub fn with_utc(mut self, is_utc: bool) -> Self {
        self.is_utc = is_utc;
        self
    }
}

const NO_DATA: &str = "No data";

/// Produce display values for every included field of every frame.
///
/// In values mode each row becomes one value (field-major, row-minor),
/// stopping at the limit. Otherwise each reducer yields one value per
/// field. When nothing matches, placeholders built from the defaults are
/// returned so the result is never empty.
pub fn get_field_display_values(request: &FieldDisplayRequest<'_>) -> Vec<FieldDisplay> {
    let options = request.options;
    let calcs = options.reducer_ids();
    let limit = match options.limit {
        Some(0) | None => usize::MAX,
        Some(limit) => limit,
    };
    let default_title = get_title_template(
        options.defaults.title.as_deref(),
        &calcs,
        request.frames,
        &options.include,
    );

    let mut scoped_vars = request.scoped_vars.cloned().unwrap_or_default();
    let mut values = Vec::new();

    'frames: for (frame_index, frame) in request.frames.iter().enumerate() {
        let series_name = frame
            .name()
            .or_else(|| frame.ref_id())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Series[{}]", frame_index));
        set_var(&mut scoped_vars, builtin::SERIES_NAME, &series_name);

        let fields = frame.fields();
        let time_field = fields.iter().find(|f| f.field_type == FieldType::Time);

        for (column_index, field) in fields.iter().enumerate() {
            if !options.include.contains(&field.field_type) {
                continue;
            }

            let config = options.resolve_config(field);
            let name = if field.name.is_empty() {
                format!("Field[{}]", column_index)
            } else {
                field.name.clone()
            };
            set_var(&mut scoped_vars, builtin::FIELD_NAME, &name);

            let processor = DisplayProcessor::new(config.clone(), request.is_utc);
            let title = config.title.clone().unwrap_or_else(|| default_title.clone());

            if options.values {
                let uses_cells = title.contains(builtin::CELL_PREFIX);
                for row_index in 0..field.len() {
                    if uses_cells {
                        set_cell_vars(&mut scoped_vars, fields, row_index);
                    }

                    let raw = cell(field, row_index);
                    let mut display = processor.display(&raw);
                    display.title = Some(request.replacer.replace(&title, &scoped_vars));

                    let value_time = time_field.map(|t| cell(t, row_index));
                    let links = resolve_links(
                        request.linker,
                        &config,
                        &scoped_vars,
                        &display,
                        value_time.as_ref(),
                    );

                    values.push(FieldDisplay {
                        name: name.clone(),
                        field: config.clone(),
                        display,
                        links,
                        frame_index: Some(frame_index),
                        column_index: Some(column_index),
                        row_index: Some(row_index),
                    });

                    if values.len() >= limit {
                        debug!("Display value limit of {} reached", limit);
                        break 'frames;
                    }
                }
            } else {
                for (calc, result) in reduce_field(field, calcs.as_slice()) {
                    set_var(&mut scoped_vars, builtin::CALC, calc);

                    let mut display = processor.display(&result);
                    display.title = Some(request.replacer.replace(&title, &scoped_vars));
                    let links =
                        resolve_links(request.linker, &config, &scoped_vars, &display, None);

                    values.push(FieldDisplay {
                        name: calc.to_string(),
                        field: config.clone(),
                        display,
                        links,
                        frame_index: Some(frame_index),
                        column_index: Some(column_index),
                        row_index: None,
                    });
                }
            }
        }
    }

    if values.is_empty() {
        debug!("No matching fields, returning placeholder display values");
        return no_values_field_display(options, &calcs);
    }
    values
}

/// Title used when the defaults don't set one: `$__calc` with several
/// reducers, `$__series_name` with several frames, and `$__field_name`
/// with several fields or when nothing else was added
pub fn get_title_template(
    title: Option<&str>,
    calcs: &[String],
    frames: &[&dyn Frame],
    include: &[FieldType],
) -> String {
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let mut parts = Vec::new();
    if calcs.len() > 1 {
        parts.push(format!("${}", builtin::CALC));
    }
    if frames.len() > 1 {
        parts.push(format!("${}", builtin::SERIES_NAME));
    }

    let field_count: usize = frames
        .iter()
        .map(|frame| {
            frame
                .fields()
                .iter()
                .filter(|f| include.contains(&f.field_type))
                .count()
        })
        .sum();
    if field_count > 1 || parts.is_empty() {
        parts.push(format!("${}", builtin::FIELD_NAME));
    }

    parts.join(" ")
}

fn cell(field: &Field, row: usize) -> Value {
    field.values.get(row).cloned().unwrap_or(Value::Null)
}

fn set_var(scoped_vars: &mut ScopedVars, name: &str, value: &str) {
    scoped_vars.insert(name.to_string(), ScopedVar::new(value, value));
}

fn set_cell_vars(scoped_vars: &mut ScopedVars, fields: &[Field], row: usize) {
    for (k, field) in fields.iter().enumerate() {
        let value = cell(field, row);
        scoped_vars.insert(builtin::cell(k), ScopedVar::new(value_text(&value), value));
    }
}

fn resolve_links(
    linker: &dyn Linker,
    config: &FieldConfig,
    scoped_vars: &ScopedVars,
    display: &DisplayValue,
    value_time: Option<&Value>,
) -> Option<Vec<LinkModel>> {
    let links = config.links.as_deref().filter(|l| !l.is_empty())?;

    let mut link_vars = scoped_vars.clone();
    let numeric = if display.numeric.is_nan() {
        Value::Null
    } else {
        Value::from(display.numeric)
    };
    link_vars.insert(
        builtin::VALUE.to_string(),
        ScopedVar::new(display.text.clone(), numeric),
    );
    if let Some(time) = value_time {
        link_vars.insert(
            builtin::VALUE_TIME.to_string(),
            ScopedVar::new(value_text(time), time.clone()),
        );
    }

    Some(linker.links(LinkOptions {
        links,
        scoped_vars: &link_vars,
    }))
}

/// Placeholders for panels without data: one per reducer (one in values
/// mode), styled from the defaults alone
fn no_values_field_display(options: &FieldDisplayOptions, calcs: &[String]) -> Vec<FieldDisplay> {
    let mut config = get_field_properties(&[&options.defaults]);
    config.min.get_or_insert(0.0);
    config.max.get_or_insert(0.0);

    let text = config
        .no_value
        .clone()
        .unwrap_or_else(|| NO_DATA.to_string());
    let color = config
        .thresholds
        .as_deref()
        .and_then(|t| get_color_from_threshold(f64::NEG_INFINITY, t));

    let names: Vec<String> = if options.values {
        vec![NO_DATA.to_string()]
    } else {
        calcs.to_vec()
    };

    names
        .into_iter()
        .map(|name| FieldDisplay {
            name,
            field: config.clone(),
            display: DisplayValue {
                text: text.clone(),
                numeric: f64::NAN,
                color: color.clone(),
                title: None,
            },
            links: None,
            frame_index: None,
            column_index: None,
            row_index: None,
        })
        .collect()
}
