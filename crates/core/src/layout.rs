//! Category layout descriptor and view selection.
//!
//! Every category carries a layout descriptor that decides how its public page
//! is rendered and where it sits among the homepage sections. The view type is
//! stored as text; reads are lenient (unknown or missing falls back to grid)
//! while writes are strict.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of grid columns when a layout does not set one.
pub const DEFAULT_COLUMNS: i16 = 3;

/// Smallest allowed column count.
pub const MIN_COLUMNS: i16 = 1;

/// Largest allowed column count.
pub const MAX_COLUMNS: i16 = 6;

/// The seven supported page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    #[default]
    Grid,
    BannerGrid,
    Lookbook,
    Story,
    CarouselGrid,
    Subcategory,
    RichText,
}

impl ViewType {
    pub const ALL: [ViewType; 7] = [
        ViewType::Grid,
        ViewType::BannerGrid,
        ViewType::Lookbook,
        ViewType::Story,
        ViewType::CarouselGrid,
        ViewType::Subcategory,
        ViewType::RichText,
    ];

    /// Wire/storage name of the view type.
    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::Grid => "grid",
            ViewType::BannerGrid => "banner-grid",
            ViewType::Lookbook => "lookbook",
            ViewType::Story => "story",
            ViewType::CarouselGrid => "carousel-grid",
            ViewType::Subcategory => "subcategory",
            ViewType::RichText => "rich-text",
        }
    }

    /// Lenient parse used on the read path: anything unrecognised is grid.
    pub fn parse_or_default(value: Option<&str>) -> ViewType {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewType::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown view type '{s}'")))
    }
}

/// Rendering strategy chosen for a category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStrategy {
    Grid,
    BannerGrid,
    Lookbook,
    Story,
    CarouselGrid,
    Subcategory,
    RichText,
}

impl From<ViewType> for RenderStrategy {
    fn from(view: ViewType) -> Self {
        match view {
            ViewType::Grid => RenderStrategy::Grid,
            ViewType::BannerGrid => RenderStrategy::BannerGrid,
            ViewType::Lookbook => RenderStrategy::Lookbook,
            ViewType::Story => RenderStrategy::Story,
            ViewType::CarouselGrid => RenderStrategy::CarouselGrid,
            ViewType::Subcategory => RenderStrategy::Subcategory,
            ViewType::RichText => RenderStrategy::RichText,
        }
    }
}

/// Pick the rendering strategy for a stored view type.
///
/// Unknown or missing values select the grid strategy.
pub fn select_view(view_type: Option<&str>) -> RenderStrategy {
    ViewType::parse_or_default(view_type).into()
}

/// Per-category layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDescriptor {
    #[serde(default)]
    pub view_type: ViewType,
    #[serde(default)]
    pub is_homepage_section: bool,
    #[serde(default)]
    pub layout_order: i32,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default = "default_columns")]
    pub columns: i16,
}

fn default_columns() -> i16 {
    DEFAULT_COLUMNS
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        Self {
            view_type: ViewType::Grid,
            is_homepage_section: false,
            layout_order: 0,
            section_title: None,
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl LayoutDescriptor {
    /// Check the column range and normalise a blank section title to `None`.
    pub fn validated(mut self) -> Result<Self, CoreError> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(CoreError::Validation(format!(
                "columns must be between {MIN_COLUMNS} and {MAX_COLUMNS}, got {}",
                self.columns
            )));
        }
        self.section_title = self
            .section_title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(self)
    }

    /// Column count clamped into the supported range.
    pub fn effective_columns(&self) -> i16 {
        self.columns.clamp(MIN_COLUMNS, MAX_COLUMNS)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn view_type_names_round_trip_through_from_str() {
        for view in ViewType::ALL {
            assert_eq!(view.as_str().parse::<ViewType>().unwrap(), view);
        }
    }

    #[test]
    fn serde_names_match_storage_names() {
        for view in ViewType::ALL {
            let json = serde_json::to_value(view).unwrap();
            assert_eq!(json, serde_json::Value::String(view.as_str().into()));
        }
    }

    #[test]
    fn unknown_view_type_is_rejected_on_parse() {
        assert_matches!("masonry".parse::<ViewType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn select_view_falls_back_to_grid() {
        let grid = select_view(Some("grid"));
        assert_eq!(select_view(None), grid);
        assert_eq!(select_view(Some("")), grid);
        assert_eq!(select_view(Some("masonry")), grid);
        assert_eq!(select_view(Some("GRID")), grid);
    }

    #[test]
    fn select_view_maps_each_type() {
        assert_eq!(select_view(Some("banner-grid")), RenderStrategy::BannerGrid);
        assert_eq!(select_view(Some("lookbook")), RenderStrategy::Lookbook);
        assert_eq!(select_view(Some("story")), RenderStrategy::Story);
        assert_eq!(select_view(Some("carousel-grid")), RenderStrategy::CarouselGrid);
        assert_eq!(select_view(Some("subcategory")), RenderStrategy::Subcategory);
        assert_eq!(select_view(Some("rich-text")), RenderStrategy::RichText);
    }

    #[test]
    fn layout_defaults_from_empty_json() {
        let layout: LayoutDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(layout, LayoutDescriptor::default());
        assert_eq!(layout.columns, DEFAULT_COLUMNS);
    }

    #[test]
    fn layout_rejects_out_of_range_columns() {
        let layout = LayoutDescriptor {
            columns: 7,
            ..LayoutDescriptor::default()
        };
        assert_matches!(layout.validated(), Err(CoreError::Validation(_)));

        let layout = LayoutDescriptor {
            columns: 0,
            ..LayoutDescriptor::default()
        };
        assert!(layout.validated().is_err());
    }

    #[test]
    fn layout_blank_section_title_becomes_none() {
        let layout = LayoutDescriptor {
            section_title: Some("   ".into()),
            ..LayoutDescriptor::default()
        }
        .validated()
        .unwrap();
        assert_eq!(layout.section_title, None);
    }

    #[test]
    fn layout_rejects_unknown_fields() {
        let parsed: Result<LayoutDescriptor, _> =
            serde_json::from_str(r#"{"view_type":"story","colour":"red"}"#);
        assert!(parsed.is_err());
    }
}
