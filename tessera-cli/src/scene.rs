//! JSON scene files.
//!
//! A scene is a canvas size, a clear color and a list of styled boxes:
//!
//! ```json
//! {
//!   "width": 400, "height": 300, "clear": "#ffffff",
//!   "boxes": [{
//!     "offset": [20, 20], "content": [200, 100],
//!     "padding": 10, "border": [5, 5, 5, 5],
//!     "border_radius": 10,
//!     "background": "#ffffff", "border_color": ["#000", "#f00", "#000", "#f00"]
//!   }]
//! }
//! ```
//!
//! Edge and radius lists take one number for all four sides or four numbers
//! (top, right, bottom, left; radii start at the top-left corner). Border
//! colors take one color or four.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tessera_geometry::gradient::resolve_color_stops;
use tessera_geometry::{
    BoxArea, BoxModel, ColorStop, ColorValue, CornerSizes, EdgeSizes, GradientDirection,
    PremultipliedColor, ResolvedColorStop, Vector2f,
};
use thiserror::Error;

/// Minimum distance kept between gradient stops.
const GRADIENT_SOFT_SPACING: f32 = 0.001;

/// Failures while loading a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The file could not be read.
    #[error("failed to read scene '{}': {source}", path.display())]
    Io {
        /// Scene path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid scene JSON.
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A color string is neither hex nor a known name.
    #[error("box {index}: invalid color '{value}'")]
    InvalidColor {
        /// Box position in the scene.
        index: usize,
        /// Offending color text.
        value: String,
    },
    /// The canvas clear color is neither hex nor a known name.
    #[error("invalid clear color '{0}'")]
    InvalidClearColor(String),
    /// A size, edge or radius is negative or not finite.
    #[error("box {index}: '{field}' must be finite and non-negative, got {value}")]
    InvalidLength {
        /// Box position in the scene.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
    /// An offset is not finite.
    #[error("box {index}: 'offset' must be finite, got {value}")]
    InvalidOffset {
        /// Box position in the scene.
        index: usize,
        /// Offending value.
        value: f32,
    },
    /// An edge or radius list has neither one nor four entries.
    #[error("box {index}: '{field}' needs 1 or 4 values, got {count}")]
    Arity {
        /// Box position in the scene.
        index: usize,
        /// Field name.
        field: &'static str,
        /// Number of values given.
        count: usize,
    },
}

/// One value for all four sides, or one per side.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Sides<T> {
    Uniform(T),
    Each(Vec<T>),
}

impl<T> Default for Sides<T> {
    fn default() -> Self {
        Self::Each(Vec::new())
    }
}

impl<T: Clone> Sides<T> {
    fn resolve(&self, index: usize, field: &'static str, default: T) -> Result<[T; 4], SceneError> {
        match self {
            Self::Uniform(value) => Ok([value.clone(), value.clone(), value.clone(), value.clone()]),
            Self::Each(values) if values.is_empty() => {
                Ok([default.clone(), default.clone(), default.clone(), default])
            }
            Self::Each(values) => match values.as_slice() {
                [one] => Ok([one.clone(), one.clone(), one.clone(), one.clone()]),
                [a, b, c, d] => Ok([a.clone(), b.clone(), c.clone(), d.clone()]),
                _ => Err(SceneError::Arity {
                    index,
                    field,
                    count: values.len(),
                }),
            },
        }
    }
}

/// A gradient stop: a bare color, or a color at a position in `[0, 1]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StopSpec {
    Auto(String),
    At { color: String, position: f32 },
}

#[derive(Debug, Clone, Deserialize)]
struct GradientSpec {
    direction: GradientDirection,
    stops: Vec<StopSpec>,
}

const fn default_opacity() -> f32 {
    1.0
}

const fn default_fill_area() -> BoxArea {
    BoxArea::Padding
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct BoxSpec {
    #[serde(default)]
    offset: [f32; 2],
    content: [f32; 2],
    #[serde(default)]
    padding: Sides<f32>,
    #[serde(default)]
    border: Sides<f32>,
    #[serde(default)]
    margin: Sides<f32>,
    #[serde(default)]
    border_radius: Sides<f32>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    border_color: Sides<String>,
    #[serde(default = "default_opacity")]
    opacity: f32,
    #[serde(default = "default_fill_area")]
    fill_area: BoxArea,
    #[serde(default)]
    gradient: Option<GradientSpec>,
}

const fn default_width() -> u32 {
    800
}

const fn default_height() -> u32 {
    600
}

fn default_clear() -> String {
    String::from("#ffffff")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneSpec {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_clear")]
    clear: String,
    #[serde(default)]
    boxes: Vec<BoxSpec>,
}

/// A straight gradient over a box's fill area.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGradient {
    /// Gradient axis.
    pub direction: GradientDirection,
    /// Stops with opacity applied.
    pub stops: Vec<ResolvedColorStop>,
}

/// A box with every style value resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBox {
    /// Box geometry.
    pub box_model: BoxModel,
    /// Top-left of the border area on the canvas.
    pub offset: Vector2f,
    /// Requested corner radii.
    pub border_radius: CornerSizes,
    /// Background color, opacity applied.
    pub background: PremultipliedColor,
    /// Border color per edge, opacity applied.
    pub border_colors: [PremultipliedColor; 4],
    /// Area the background fills.
    pub fill_area: BoxArea,
    /// Optional gradient replacing the flat background.
    pub gradient: Option<SceneGradient>,
}

/// A loaded scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Canvas clear color.
    pub clear: ColorValue,
    /// Boxes in paint order.
    pub boxes: Vec<SceneBox>,
}

impl Scene {
    /// Read and resolve a scene file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid scene JSON,
    /// or holds an invalid color or list.
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse and resolve scene JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid scene JSON or holds an
    /// invalid color or list.
    pub fn from_json(text: &str) -> Result<Self, SceneError> {
        let spec: SceneSpec = serde_json::from_str(text)?;

        let clear = ColorValue::parse(&spec.clear)
            .ok_or_else(|| SceneError::InvalidClearColor(spec.clear.clone()))?;
        let boxes = spec
            .boxes
            .iter()
            .enumerate()
            .map(|(index, spec)| resolve_box(index, spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            width: spec.width,
            height: spec.height,
            clear,
            boxes,
        })
    }
}

fn parse_color(value: &str, index: usize) -> Result<ColorValue, SceneError> {
    ColorValue::parse(value).ok_or_else(|| SceneError::InvalidColor {
        index,
        value: value.to_string(),
    })
}

/// Lengths reach the engine unchecked, so reject anything it cannot draw.
fn check_lengths<const N: usize>(
    index: usize,
    field: &'static str,
    values: [f32; N],
) -> Result<[f32; N], SceneError> {
    match values.iter().find(|v| !v.is_finite() || **v < 0.0) {
        Some(&value) => Err(SceneError::InvalidLength { index, field, value }),
        None => Ok(values),
    }
}

fn resolve_box(index: usize, spec: &BoxSpec) -> Result<SceneBox, SceneError> {
    let edges = |sides: &Sides<f32>, field: &'static str| -> Result<EdgeSizes, SceneError> {
        check_lengths(index, field, sides.resolve(index, field, 0.0)?)
    };

    if let Some(&value) = spec.offset.iter().find(|v| !v.is_finite()) {
        return Err(SceneError::InvalidOffset { index, value });
    }
    let content = check_lengths(index, "content", spec.content)?;
    let border_radius = edges(&spec.border_radius, "border_radius")?;

    let box_model = BoxModel::new(Vector2f::from(content))
        .with_edges(BoxArea::Padding, edges(&spec.padding, "padding")?)
        .with_edges(BoxArea::Border, edges(&spec.border, "border")?)
        .with_edges(BoxArea::Margin, edges(&spec.margin, "margin")?);

    let opacity = spec.opacity.clamp(0.0, 1.0);
    let premultiply = |value: &str| -> Result<PremultipliedColor, SceneError> {
        Ok(parse_color(value, index)?.to_premultiplied_with_opacity(opacity))
    };

    let background = match &spec.background {
        Some(value) => premultiply(value)?,
        None => PremultipliedColor::default(),
    };

    let border_color_names = spec
        .border_color
        .resolve(index, "border_color", String::from("black"))?;
    let [top, right, bottom, left] = &border_color_names;
    let border_colors = [
        premultiply(top)?,
        premultiply(right)?,
        premultiply(bottom)?,
        premultiply(left)?,
    ];

    let gradient = match &spec.gradient {
        Some(gradient) => {
            let stops = gradient
                .stops
                .iter()
                .map(|stop| match stop {
                    StopSpec::Auto(color) => Ok(ColorStop::auto(premultiply(color)?)),
                    StopSpec::At { color, position } => {
                        Ok(ColorStop::at(premultiply(color)?, *position))
                    }
                })
                .collect::<Result<Vec<_>, SceneError>>()?;
            Some(SceneGradient {
                direction: gradient.direction,
                stops: resolve_color_stops(&stops, GRADIENT_SOFT_SPACING),
            })
        }
        None => None,
    };

    Ok(SceneBox {
        box_model,
        offset: Vector2f::from(spec.offset),
        border_radius,
        background,
        border_colors,
        fill_area: spec.fill_area,
        gradient,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scene_defaults() {
        let scene = Scene::from_json(r#"{ "boxes": [{ "content": [10, 20] }] }"#).unwrap();
        assert_eq!((scene.width, scene.height), (800, 600));
        assert_eq!(scene.clear, ColorValue::WHITE);

        let b = &scene.boxes[0];
        assert_eq!(b.box_model.size(BoxArea::Border), Vector2f::new(10.0, 20.0));
        assert_eq!(b.border_radius, [0.0; 4]);
        assert!(b.background.is_transparent());
        assert_eq!(b.border_colors, [ColorValue::BLACK.to_premultiplied(); 4]);
        assert_eq!(b.fill_area, BoxArea::Padding);
        assert!(b.gradient.is_none());
    }

    #[test]
    fn test_uniform_and_per_side_edges() {
        let scene = Scene::from_json(
            r#"{ "boxes": [{
                "content": [100, 50], "padding": 10, "border": [1, 2, 3, 4],
                "margin": [5], "border_radius": [1, 2, 3, 4]
            }] }"#,
        )
        .unwrap();
        let b = &scene.boxes[0];
        assert_eq!(b.box_model.edges(BoxArea::Padding), [10.0; 4]);
        assert_eq!(b.box_model.edges(BoxArea::Border), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(b.box_model.edges(BoxArea::Margin), [5.0; 4]);
        assert_eq!(b.border_radius, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let err = Scene::from_json(r#"{ "boxes": [{ "content": [1, 1], "border": [1, 2] }] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::Arity {
                field: "border",
                count: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_lengths_are_rejected() {
        let err = Scene::from_json(r#"{ "boxes": [{ "content": [1, 1], "padding": [1, -2, 1, 1] }] }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            SceneError::InvalidLength {
                index: 0,
                field: "padding",
                ..
            }
        ));

        let err = Scene::from_json(r#"{ "boxes": [{ "content": [-5, 1] }] }"#).unwrap_err();
        assert!(matches!(err, SceneError::InvalidLength { field: "content", .. }));

        let err = Scene::from_json(r#"{ "boxes": [{ "content": [1, 1], "border_radius": -1 }] }"#)
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidLength { field: "border_radius", .. }));
    }

    #[test]
    fn test_overflowing_lengths_are_rejected() {
        // Too large for f32, so the value arrives as infinity.
        let err = Scene::from_json(r#"{ "boxes": [{ "content": [1e39, 1] }] }"#).unwrap_err();
        assert!(matches!(err, SceneError::InvalidLength { field: "content", .. }));

        let err = Scene::from_json(r#"{ "boxes": [{ "content": [1, 1], "offset": [0, -1e39] }] }"#)
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidOffset { index: 0, .. }));
    }

    #[test]
    fn test_negative_offset_is_allowed() {
        let scene = Scene::from_json(r#"{ "boxes": [{ "content": [1, 1], "offset": [-10, -20] }] }"#)
            .unwrap();
        assert_eq!(scene.boxes[0].offset, Vector2f::new(-10.0, -20.0));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let err = Scene::from_json(
            r#"{ "boxes": [{}, { "content": [1, 1], "background": "chartreuse-ish" }] }"#,
        )
        .unwrap_err();
        // The first box is missing its content, which fails earlier.
        assert!(matches!(err, SceneError::Json(_)));

        let err = Scene::from_json(
            r#"{ "boxes": [{ "content": [1, 1] }, { "content": [1, 1], "background": "nope" }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SceneError::InvalidColor { index: 1, .. }));
    }

    #[test]
    fn test_opacity_premultiplies_colors() {
        let scene = Scene::from_json(
            r##"{ "boxes": [{ "content": [1, 1], "background": "#ff0000", "opacity": 0.5 }] }"##,
        )
        .unwrap();
        assert_eq!(scene.boxes[0].background.a, 127);
        assert_eq!(scene.boxes[0].background.r, 127);
    }

    #[test]
    fn test_gradient_stops_are_resolved() {
        let scene = Scene::from_json(
            r##"{ "boxes": [{
                "content": [10, 10],
                "gradient": { "direction": "horizontal",
                              "stops": ["#fff", { "color": "red", "position": 0.25 }, "black"] }
            }] }"##,
        )
        .unwrap();
        let gradient = scene.boxes[0].gradient.as_ref().unwrap();
        assert_eq!(gradient.direction, GradientDirection::Horizontal);
        let positions: Vec<f32> = gradient.stops.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_invalid_clear_color() {
        let err = Scene::from_json(r##"{ "clear": "#zzz" }"##).unwrap_err();
        assert!(matches!(err, SceneError::InvalidClearColor(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Scene::from_path(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
