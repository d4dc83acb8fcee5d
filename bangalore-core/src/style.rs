//! Simple single-symbol styles for vector layers.

use std::fmt;

use thiserror::Error;

use crate::GeometryKind;

/// Stroke width used when a line style does not set one, in millimetres.
pub const DEFAULT_LINE_WIDTH: f64 = 0.5;

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Rgba {
    /// Build a colour from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Colour in the `r,g,b,a` form QGIS symbol properties use.
    #[must_use]
    pub fn to_qgis(&self) -> String {
        format!("{},{},{},{}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// A renderer symbol ready to be written to a project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Symbol {
    /// Simple fill for polygons.
    Fill {
        /// Fill colour.
        color: Rgba,
    },
    /// Simple line for line layers.
    Line {
        /// Stroke colour.
        color: Rgba,
        /// Stroke width in millimetres.
        width: f64,
    },
}

/// Errors returned when a style cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StyleError {
    /// The layer's geometry has no simple fill or line symbol.
    #[error("no simple style for {kind} layers")]
    UnsupportedGeometry {
        /// Geometry of the layer being styled.
        kind: GeometryKind,
    },
}

/// A colour plus optional line width, resolved to a [`Symbol`] per layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    /// Fill or stroke colour.
    pub color: Rgba,
    /// Stroke width for line layers.
    pub line_width: Option<f64>,
}

impl LayerStyle {
    /// A style with the default line width.
    #[must_use]
    pub const fn new(color: Rgba) -> Self {
        Self {
            color,
            line_width: None,
        }
    }

    /// A style with an explicit line width.
    #[must_use]
    pub const fn with_width(color: Rgba, width: f64) -> Self {
        Self {
            color,
            line_width: Some(width),
        }
    }

    /// Resolve the symbol for a layer of geometry `kind`.
    ///
    /// Polygons get a fill and lines get a stroke; the width is ignored for
    /// fills. Points and unknown geometries are rejected.
    pub fn symbol_for(&self, kind: GeometryKind) -> Result<Symbol, StyleError> {
        match kind {
            GeometryKind::Polygon => Ok(Symbol::Fill { color: self.color }),
            GeometryKind::Line => Ok(Symbol::Line {
                color: self.color,
                width: self.line_width.unwrap_or(DEFAULT_LINE_WIDTH),
            }),
            GeometryKind::Point | GeometryKind::Unknown => {
                Err(StyleError::UnsupportedGeometry { kind })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn displays_css_form() {
        assert_eq!(Rgba::new(30, 144, 255, 255).to_string(), "rgba(30,144,255,255)");
    }

    #[rstest]
    fn formats_for_qgis() {
        assert_eq!(Rgba::new(255, 165, 0, 50).to_qgis(), "255,165,0,50");
    }

    #[rstest]
    fn line_without_width_uses_default() {
        let style = LayerStyle::new(Rgba::new(1, 2, 3, 4));

        assert_eq!(
            style.symbol_for(GeometryKind::Line),
            Ok(Symbol::Line {
                color: Rgba::new(1, 2, 3, 4),
                width: DEFAULT_LINE_WIDTH
            })
        );
    }

    #[rstest]
    fn polygon_ignores_width() {
        let style = LayerStyle::with_width(Rgba::new(1, 2, 3, 4), 0.8);

        assert_eq!(
            style.symbol_for(GeometryKind::Polygon),
            Ok(Symbol::Fill {
                color: Rgba::new(1, 2, 3, 4)
            })
        );
    }

    #[rstest]
    #[case(GeometryKind::Point)]
    #[case(GeometryKind::Unknown)]
    fn points_have_no_simple_style(#[case] kind: GeometryKind) {
        let style = LayerStyle::new(Rgba::new(0, 0, 0, 255));

        assert_eq!(
            style.symbol_for(kind),
            Err(StyleError::UnsupportedGeometry { kind })
        );
    }
}
