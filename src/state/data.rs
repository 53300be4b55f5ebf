/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog/gateway layer, the layout session and the UI layer.
/// The serde shape matches the site API: PascalCase keys, placements keyed
/// by photograph id.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Smallest grid span a placed photograph can have
pub const MIN_SPAN: u8 = 1;
/// Largest grid span a placed photograph can have
pub const MAX_SPAN: u8 = 3;
/// Number of columns in the rendered site grid
pub const GRID_COLUMNS: u8 = 4;

/// Kind of stored image variant
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Full,
    Thumbnail,
}

impl ImageKind {
    /// Name used in the catalog database
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Full => "Full",
            ImageKind::Thumbnail => "Thumbnail",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Full" => Some(ImageKind::Full),
            "Thumbnail" => Some(ImageKind::Thumbnail),
            _ => None,
        }
    }
}

/// One stored variant of a photograph
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Image {
    #[serde(rename = "Type")]
    pub kind: ImageKind,
    /// Key of the object in the image store (a file path for the local catalog)
    pub object_key: String,
}

/// Grid dimension that can be resized
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

/// Where a photograph sits in the layout
///
/// `order` is the 1-based rank among placed photographs. `width` and
/// `height` are grid spans in `MIN_SPAN..=MAX_SPAN`; `None` reads as 1.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Placement {
    pub order: u32,
    pub width: Option<u8>,
    pub height: Option<u8>,
}

impl Placement {
    /// Placement for a photograph just added to the layout
    pub fn new(order: u32) -> Self {
        Self {
            order,
            width: Some(MIN_SPAN),
            height: Some(MIN_SPAN),
        }
    }

    /// Span along `dimension`, treating an absent value as 1
    pub fn span(&self, dimension: Dimension) -> u8 {
        let value = match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        };
        value.unwrap_or(MIN_SPAN)
    }

    /// Copy of this placement with `dimension` set to `value`
    pub fn with_span(self, dimension: Dimension, value: u8) -> Self {
        match dimension {
            Dimension::Width => Self { width: Some(value), ..self },
            Dimension::Height => Self { height: Some(value), ..self },
        }
    }

    pub fn with_order(self, order: u32) -> Self {
        Self { order, ..self }
    }
}

/// Represents a single photograph in the catalog
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Photograph {
    /// Opaque, stable identifier
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub capture_time: DateTime<Utc>,
    pub upload_time: DateTime<Utc>,
    /// Present only while the photograph is part of the layout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Placement>,
}

impl Photograph {
    /// Whether this photograph is part of the layout
    pub fn is_placed(&self) -> bool {
        self.layout.is_some()
    }

    /// Layout order, or 0 for an unplaced photograph
    pub fn order(&self) -> u32 {
        self.layout.map(|p| p.order).unwrap_or(0)
    }

    /// Copy of this photograph with a different placement
    pub fn with_layout(&self, layout: Option<Placement>) -> Self {
        Self {
            layout,
            ..self.clone()
        }
    }
}

/// Editable metadata of a photograph
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PhotographUpdate {
    pub title: String,
    pub capture_time: DateTime<Utc>,
}

/// The persisted layout: placement of every placed photograph, keyed by id
pub type LayoutMapping = BTreeMap<String, Placement>;

/// Build the sparse mapping for a photograph set (unplaced photographs are left out)
pub fn layout_mapping(photographs: &[Photograph]) -> LayoutMapping {
    photographs
        .iter()
        .filter_map(|p| p.layout.map(|layout| (p.id.clone(), layout)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn photo(id: &str, layout: Option<Placement>) -> Photograph {
        let time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Photograph {
            id: id.to_string(),
            title: format!("Photo {}", id),
            images: Vec::new(),
            capture_time: time,
            upload_time: time,
            layout,
        }
    }

    #[test]
    fn test_unplaced_order_is_zero() {
        let p = photo("a", None);
        assert!(!p.is_placed());
        assert_eq!(p.order(), 0);
    }

    #[test]
    fn test_missing_span_reads_as_one() {
        let placement = Placement { order: 1, width: None, height: Some(3) };
        assert_eq!(placement.span(Dimension::Width), 1);
        assert_eq!(placement.span(Dimension::Height), 3);
    }

    #[test]
    fn test_mapping_wire_shape() {
        let photos = vec![
            photo("a", Some(Placement { order: 1, width: Some(2), height: None })),
            photo("b", None),
        ];

        let json = serde_json::to_value(layout_mapping(&photos)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "a": { "Order": 1, "Width": 2, "Height": null } })
        );
    }

    #[test]
    fn test_photograph_api_json() {
        let json = r#"{
            "Id": "p1",
            "Title": "Harbour",
            "Images": [{ "Type": "Thumbnail", "ObjectKey": "thumbs/p1.jpg" }],
            "CaptureTime": "2023-08-14T06:30:00Z",
            "UploadTime": "2023-08-15T10:00:00Z",
            "Layout": { "Order": 4, "Width": null, "Height": 2 }
        }"#;

        let p: Photograph = serde_json::from_str(json).unwrap();

        assert_eq!(p.id, "p1");
        assert_eq!(p.images[0].kind, ImageKind::Thumbnail);
        assert_eq!(p.order(), 4);
        assert_eq!(p.layout.unwrap().span(Dimension::Width), 1);
    }
}
