//! Dashboard manifests: the encoded widget layout of a dashboard.
//!
//! A manifest is base64-encoded JSON of the shape
//! `{ "widgets": { "<id>": Widget, ... }, "config": { ... } }`.
//!
//! Decoding goes through typed structs, so re-encoding a decoded manifest
//! yields a sanitized copy: unknown fields anywhere in a widget or data
//! selection are dropped and every filter tree has passed the key
//! allow-list of [`crate::filters`].

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::filters::FilterGroup;
use crate::query::Interval;

/// Maximum number of data selections a widget may carry.
pub const MAX_DATA_SELECTIONS: usize = 5;

/// Reasons a manifest cannot be decoded.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("manifest is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("widget {widget} has {count} data selections (max {max})", max = MAX_DATA_SELECTIONS)]
    TooManySelections { widget: String, count: usize },

    #[error("widget stored under key {key} declares id {id}")]
    MismatchedId { key: String, id: String },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which side of the graph a widget or selection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    Entities,
    Relationships,
    Audits,
}

/// Decoded dashboard manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub widgets: BTreeMap<String, Widget>,
    #[serde(default)]
    pub config: ManifestConfig,
}

/// Dashboard-wide display settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
    #[serde(rename = "relativeDate", default, skip_serializing_if = "Option::is_none")]
    pub relative_date: Option<String>,
    #[serde(rename = "startDate", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One widget of a manifest. Value object; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,
    /// Index 0 is the main selection, index 1 the breakdown when present.
    #[serde(rename = "dataSelection", default)]
    pub data_selection: Vec<DataSelection>,
    #[serde(default)]
    pub parameters: WidgetParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<WidgetLayout>,
}

/// Display and query hints of a widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Interval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributed: Option<bool>,
}

/// Grid position of a widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetLayout {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    #[serde(default)]
    pub w: i64,
    #[serde(default)]
    pub h: i64,
}

/// One query specification of a widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_attribute: Option<String>,
    /// Result limit (bucket count or page size).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(rename = "centerLat", default, skip_serializing_if = "Option::is_none")]
    pub center_lat: Option<f64>,
    #[serde(rename = "centerLng", default, skip_serializing_if = "Option::is_none")]
    pub center_lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterGroup>,
    #[serde(rename = "dynamicFrom", default, skip_serializing_if = "Option::is_none")]
    pub dynamic_from: Option<FilterGroup>,
    #[serde(rename = "dynamicTo", default, skip_serializing_if = "Option::is_none")]
    pub dynamic_to: Option<FilterGroup>,
    #[serde(rename = "isTo", default, skip_serializing_if = "Option::is_none")]
    pub is_to: Option<bool>,
    #[serde(rename = "toTypes", default, skip_serializing_if = "Option::is_none")]
    pub to_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perspective: Option<Perspective>,
}

impl DataSelection {
    /// Layout-only copy: no filter tree and no pivot flags.
    pub fn display_only(&self) -> Self {
        Self {
            label: self.label.clone(),
            attribute: self.attribute.clone(),
            date_attribute: self.date_attribute.clone(),
            number: self.number,
            center_lat: self.center_lat,
            center_lng: self.center_lng,
            zoom: self.zoom,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

impl Manifest {
    /// Decode and validate a base64 manifest.
    pub fn decode(encoded: &str) -> Result<Self, ManifestError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let json = String::from_utf8(bytes)?;
        let manifest: Manifest = serde_json::from_str(&json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Encode as base64 JSON.
    pub fn encode(&self) -> Result<String, ManifestError> {
        let json = serde_json::to_string(self)?;
        Ok(STANDARD.encode(json))
    }

    /// Structural checks beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (key, widget) in &self.widgets {
            if key != &widget.id {
                return Err(ManifestError::MismatchedId {
                    key: key.clone(),
                    id: widget.id.clone(),
                });
            }
            if widget.data_selection.len() > MAX_DATA_SELECTIONS {
                return Err(ManifestError::TooManySelections {
                    widget: widget.id.clone(),
                    count: widget.data_selection.len(),
                });
            }
        }
        Ok(())
    }

    /// A manifest without widgets cannot be published.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.get(id)
    }

    /// Copy suitable for rendering the layout in an anonymous client.
    pub fn display_view(&self) -> Self {
        let widgets = self
            .widgets
            .iter()
            .map(|(id, w)| {
                let widget = Widget {
                    data_selection: w.data_selection.iter().map(DataSelection::display_only).collect(),
                    ..w.clone()
                };
                (id.clone(), widget)
            })
            .collect();
        Self {
            widgets,
            config: self.config.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NUMBER_WIDGET: &str = "ebb25410-7048-4de7-9288-704e962215f6";

    fn encode_json(value: &serde_json::Value) -> String {
        STANDARD.encode(value.to_string())
    }

    fn sample() -> serde_json::Value {
        json!({
            "widgets": {
                NUMBER_WIDGET: {
                    "id": NUMBER_WIDGET,
                    "type": "number",
                    "perspective": "entities",
                    "dataSelection": [{
                        "label": "malwares",
                        "attribute": "entity_type",
                        "date_attribute": "created_at",
                        "perspective": "entities",
                        "isTo": true,
                        "internalNote": "do not publish",
                        "filters": {
                            "mode": "and",
                            "filters": [{ "key": "entity_type", "values": ["Malware"], "operator": "eq", "mode": "or" }],
                            "filterGroups": []
                        }
                    }],
                    "parameters": { "title": "malwares number" },
                    "layout": { "w": 4, "h": 2, "x": 4, "y": 0, "i": NUMBER_WIDGET, "moved": false, "static": false }
                }
            },
            "config": {}
        })
    }

    #[test]
    fn decodes_number_widget() {
        let manifest = Manifest::decode(&encode_json(&sample())).unwrap();
        let widget = manifest.widget(NUMBER_WIDGET).unwrap();

        assert_eq!(widget.widget_type, "number");
        assert_eq!(widget.perspective, Some(Perspective::Entities));
        assert_eq!(widget.data_selection.len(), 1);
        assert_eq!(widget.data_selection[0].is_to, Some(true));
        assert!(widget.data_selection[0].filters.is_some());
    }

    #[test]
    fn reencoding_drops_unknown_fields() {
        let manifest = Manifest::decode(&encode_json(&sample())).unwrap();
        let reencoded = manifest.encode().unwrap();
        let json = String::from_utf8(STANDARD.decode(reencoded).unwrap()).unwrap();

        assert!(!json.contains("internalNote"));
        assert!(!json.contains("moved"));
        assert!(json.contains("Malware"));
    }

    #[test]
    fn display_view_strips_filters() {
        let manifest = Manifest::decode(&encode_json(&sample())).unwrap();
        let view = manifest.display_view();
        let selection = &view.widget(NUMBER_WIDGET).unwrap().data_selection[0];

        assert_eq!(selection.label.as_deref(), Some("malwares"));
        assert_eq!(selection.attribute.as_deref(), Some("entity_type"));
        assert!(selection.filters.is_none());
        assert!(selection.is_to.is_none());
        assert!(selection.perspective.is_none());
    }

    #[test]
    fn rejects_unknown_filter_key() {
        let mut value = sample();
        value["widgets"][NUMBER_WIDGET]["dataSelection"][0]["filters"]["filters"][0]["key"] =
            json!("internal_secret");
        let err = Manifest::decode(&encode_json(&value)).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
    }

    #[test]
    fn rejects_too_many_selections() {
        let mut value = sample();
        let selection = value["widgets"][NUMBER_WIDGET]["dataSelection"][0].clone();
        value["widgets"][NUMBER_WIDGET]["dataSelection"] =
            json!(vec![selection; MAX_DATA_SELECTIONS + 1]);
        let err = Manifest::decode(&encode_json(&value)).unwrap_err();
        assert!(matches!(err, ManifestError::TooManySelections { count: 6, .. }));
    }

    #[test]
    fn rejects_mismatched_widget_key() {
        let mut value = sample();
        value["widgets"][NUMBER_WIDGET]["id"] = json!("other");
        let err = Manifest::decode(&encode_json(&value)).unwrap_err();
        assert!(matches!(err, ManifestError::MismatchedId { .. }));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = Manifest::decode("not base64 !!").unwrap_err();
        assert!(matches!(err, ManifestError::Encoding(_)));
    }

    #[test]
    fn empty_widgets_is_empty() {
        let manifest = Manifest::decode(&encode_json(&json!({ "widgets": {}, "config": {} }))).unwrap();
        assert!(manifest.is_empty());
    }
}
