//! Pixel/NDC coordinate mapping and box derivation.
//!
//! Backends place labels and legends relative to an anchor corner with
//! margin-aware insets. Expressing that once as a composable transform keeps
//! the margin arithmetic out of every call site.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::stack::StyleSet;

/// Horizontal anchor: the edge offsets are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAnchor {
    Left,
    Right,
}

impl FromStr for XAnchor {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "left" | "l" => Ok(XAnchor::Left),
            "right" | "r" => Ok(XAnchor::Right),
            _ => Err(Error::invalid(format!("unknown x anchor '{token}'"))),
        }
    }
}

/// Vertical anchor. `Bottom` is the near side: NDC y grows upwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YAnchor {
    Bottom,
    Top,
}

impl FromStr for YAnchor {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "bottom" | "b" => Ok(YAnchor::Bottom),
            "top" | "t" => Ok(YAnchor::Top),
            _ => Err(Error::invalid(format!("unknown y anchor '{token}'"))),
        }
    }
}

/// A one-axis coordinate, either already normalized or in pixels of the
/// frame extent it is resolved against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Ndc(f64),
    Px(f64),
}

impl Coord {
    pub const ZERO: Coord = Coord::Ndc(0.0);

    pub fn to_ndc(self, extent_px: f64) -> f64 {
        match self {
            Coord::Ndc(value) => value,
            Coord::Px(pixels) => {
                if extent_px > 0.0 {
                    pixels / extent_px
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// A drawing surface: pixel extent, NDC margins, and optionally the surface
/// it is nested in. Margin queries accumulate through the parent chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: f64,
    height: f64,
    margins: Margins,
    parent: Option<Box<Frame>>,
}

impl Frame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
            parent: None,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn inside(mut self, parent: Frame) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// The outermost enclosing frame, i.e. the canvas this frame lives on.
    pub fn root(&self) -> &Frame {
        let mut frame = self;
        while let Some(parent) = frame.parent.as_deref() {
            frame = parent;
        }
        frame
    }

    /// Own margins plus the margins of every ancestor, per side.
    pub fn accumulated_margins(&self) -> Margins {
        let mut total = self.margins;
        let mut next = self.parent.as_deref();
        while let Some(frame) = next {
            total.left += frame.margins.left;
            total.right += frame.margins.right;
            total.top += frame.margins.top;
            total.bottom += frame.margins.bottom;
            next = frame.parent.as_deref();
        }
        total
    }
}

/// Maps a horizontal coordinate: pixel conversion, additive offset, far-side
/// flip, margin inset, optional conversion back to pixels.
///
/// `value` and `offset` are measured from the anchor edge; for the right
/// anchor the result is expressed back in left-origin NDC, so an input of
/// zero with margins included lands at `1 - right_margin`.
pub fn map_x(
    value: Coord,
    frame: &Frame,
    anchor: XAnchor,
    offset: Coord,
    include_margins: bool,
    as_pixel: bool,
) -> f64 {
    let extent = frame.width();
    let mut x = value.to_ndc(extent) + offset.to_ndc(extent);
    if anchor == XAnchor::Right {
        x = 1.0 - x;
    }
    if include_margins {
        let margins = frame.accumulated_margins();
        match anchor {
            XAnchor::Left => x += margins.left,
            XAnchor::Right => x -= margins.right,
        }
    }
    if as_pixel { x * extent } else { x }
}

/// Vertical counterpart of [`map_x`]; the top is the far side.
pub fn map_y(
    value: Coord,
    frame: &Frame,
    anchor: YAnchor,
    offset: Coord,
    include_margins: bool,
    as_pixel: bool,
) -> f64 {
    let extent = frame.height();
    let mut y = value.to_ndc(extent) + offset.to_ndc(extent);
    if anchor == YAnchor::Top {
        y = 1.0 - y;
    }
    if include_margins {
        let margins = frame.accumulated_margins();
        match anchor {
            YAnchor::Bottom => y += margins.bottom,
            YAnchor::Top => y -= margins.top,
        }
    }
    if as_pixel { y * extent } else { y }
}

/// Partial legend box: any subset of bounds, extents and row geometry; the
/// rest is derived by [`compute_legend_box`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegendBoxSpec {
    pub x1: Option<f64>,
    pub x2: Option<f64>,
    pub width: Option<f64>,
    pub y1: Option<f64>,
    pub y2: Option<f64>,
    pub height: Option<f64>,
    pub row_spacing: Option<f64>,
    pub rows: Option<usize>,
}

/// Fallback extents when neither an explicit extent nor row geometry is
/// given, matching the built-in default style's legend block.
const DEFAULT_BOX_WIDTH: f64 = 0.28;
const DEFAULT_BOX_HEIGHT: f64 = 0.135;
const DEFAULT_BOX_X2: f64 = 0.96;
const DEFAULT_BOX_Y2: f64 = 0.92;

/// Derives `(x1, y1, x2, y2)` from a partial spec.
///
/// Priority per axis: both coordinates explicit > one coordinate plus an
/// extent hint > one coordinate plus the default extent. For y the extent
/// hint is `height`, else `row_spacing * rows`. Supplying both coordinates
/// and an extent hint, or only half of the row geometry, is rejected.
pub fn compute_legend_box(spec: &LegendBoxSpec) -> Result<(f64, f64, f64, f64)> {
    let (x1, x2) = resolve_span(
        "x",
        spec.x1,
        spec.x2,
        spec.width,
        DEFAULT_BOX_X2,
        DEFAULT_BOX_WIDTH,
    )?;

    let row_extent = match (spec.row_spacing, spec.rows) {
        (Some(spacing), Some(rows)) => Some(spacing * rows as f64),
        (None, None) => None,
        _ => {
            return Err(Error::invalid(
                "row_spacing and rows must be given together",
            ));
        }
    };
    let y_extent = match (spec.height, row_extent) {
        (Some(_), Some(_)) => {
            return Err(Error::invalid(
                "height and row geometry are alternative extent hints",
            ));
        }
        (height, rows) => height.or(rows),
    };
    let (y1, y2) = resolve_span("y", spec.y1, spec.y2, y_extent, DEFAULT_BOX_Y2, DEFAULT_BOX_HEIGHT)?;

    Ok((x1, y1, x2, y2))
}

fn resolve_span(
    axis: &str,
    lo: Option<f64>,
    hi: Option<f64>,
    extent: Option<f64>,
    default_hi: f64,
    default_extent: f64,
) -> Result<(f64, f64)> {
    match (lo, hi) {
        (Some(lo), Some(hi)) => {
            if extent.is_some() {
                Err(Error::invalid(format!(
                    "{axis} axis is over-specified: both bounds and an extent given"
                )))
            } else {
                Ok((lo, hi))
            }
        }
        (Some(lo), None) => Ok((lo, lo + extent.unwrap_or(default_extent))),
        (None, Some(hi)) => Ok((hi - extent.unwrap_or(default_extent), hi)),
        (None, None) => Ok((
            default_hi - extent.unwrap_or(default_extent),
            default_hi,
        )),
    }
}

/// The simple legend coordinate helper: the box hangs from `(x1, y2, x2)`
/// and grows downwards by `dy` per entry. Unset values come from the active
/// style's layout constants.
pub fn legend_coords(
    n_entries: usize,
    styles: &StyleSet,
    x1: Option<f64>,
    x2: Option<f64>,
    y2: Option<f64>,
    dy: Option<f64>,
) -> (f64, f64, f64, f64) {
    let x1 = x1.or_else(|| styles.layout_number("legend_x1")).unwrap_or(0.68);
    let x2 = x2.or_else(|| styles.layout_number("legend_x2")).unwrap_or(0.96);
    let y2 = y2.or_else(|| styles.layout_number("legend_y2")).unwrap_or(0.92);
    let dy = dy.or_else(|| styles.layout_number("legend_dy")).unwrap_or(0.045);
    let y1 = y2 - dy * n_entries as f64;
    (x1, y1, x2, y2)
}

/// Horizontal placement token for [`anchor_coords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HPos {
    Left,
    Center,
    Right,
}

impl FromStr for HPos {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "left" | "l" => Ok(HPos::Left),
            "center" | "c" => Ok(HPos::Center),
            "right" | "r" => Ok(HPos::Right),
            _ => Err(Error::invalid(format!(
                "unknown horizontal position '{token}'"
            ))),
        }
    }
}

/// Vertical placement token for [`anchor_coords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VPos {
    Top,
    Center,
    Bottom,
}

impl FromStr for VPos {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "top" | "t" => Ok(VPos::Top),
            "center" | "c" => Ok(VPos::Center),
            "bottom" | "b" => Ok(VPos::Bottom),
            _ => Err(Error::invalid(format!(
                "unknown vertical position '{token}'"
            ))),
        }
    }
}

/// Inward offsets for [`anchor_coords`]; the shared `offset` fills whichever
/// per-axis value is unset, and centered axes default to no offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnchorOffsets {
    pub offset: Option<f64>,
    pub h_offset: Option<f64>,
    pub v_offset: Option<f64>,
}

const EDGE_OFFSET: f64 = 0.005;

/// Pad-anchored NDC position: the offset always points inwards, and margins
/// come from the active style's `pad` component.
pub fn anchor_coords(
    h: HPos,
    v: VPos,
    styles: &StyleSet,
    offsets: AnchorOffsets,
) -> (f64, f64) {
    let pad = styles.component("pad");
    let margin = |name: &str| pad.and_then(|p| p.number(name)).unwrap_or(0.0);
    let left = margin("left_margin");
    let right = margin("right_margin");
    let top = margin("top_margin");
    let bottom = margin("bottom_margin");

    let h_offset = offsets.h_offset.or(offsets.offset).unwrap_or(if h == HPos::Center {
        0.0
    } else {
        EDGE_OFFSET
    });
    let v_offset = offsets.v_offset.or(offsets.offset).unwrap_or(if v == VPos::Center {
        0.0
    } else {
        EDGE_OFFSET
    });

    let x = match h {
        HPos::Left => left + h_offset,
        HPos::Center => (1.0 - right + left) / 2.0 + h_offset,
        HPos::Right => 1.0 - right - h_offset,
    };
    let y = match v {
        VPos::Top => 1.0 - top - v_offset,
        VPos::Center => (1.0 - top + bottom) / 2.0 + v_offset,
        VPos::Bottom => bottom + v_offset,
    };
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::new(800.0, 640.0).with_margins(Margins::new(0.13, 0.03, 0.05, 0.105))
    }

    #[test]
    fn anchor_tokens_parse() {
        assert_eq!("left".parse::<XAnchor>().unwrap(), XAnchor::Left);
        assert_eq!("r".parse::<XAnchor>().unwrap(), XAnchor::Right);
        assert_eq!("t".parse::<YAnchor>().unwrap(), YAnchor::Top);
        assert!(matches!(
            "up".parse::<YAnchor>(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn near_edge_with_margins_is_the_margin() {
        let frame = frame();
        let x = map_x(Coord::ZERO, &frame, XAnchor::Left, Coord::ZERO, true, false);
        assert!((x - 0.13).abs() < 1e-12);
        let y = map_y(Coord::ZERO, &frame, YAnchor::Bottom, Coord::ZERO, true, false);
        assert!((y - 0.105).abs() < 1e-12);
    }

    #[test]
    fn far_edge_with_margins_is_one_minus_margin() {
        let frame = frame();
        let x = map_x(Coord::ZERO, &frame, XAnchor::Right, Coord::ZERO, true, false);
        assert!((x - (1.0 - 0.03)).abs() < 1e-12);
        let y = map_y(Coord::ZERO, &frame, YAnchor::Top, Coord::ZERO, true, false);
        assert!((y - (1.0 - 0.05)).abs() < 1e-12);
    }

    #[test]
    fn pixel_values_scale_by_extent() {
        let frame = Frame::new(800.0, 640.0);
        let x = map_x(Coord::Px(80.0), &frame, XAnchor::Left, Coord::ZERO, false, false);
        assert!((x - 0.1).abs() < 1e-12);
        let back = map_x(Coord::Ndc(0.1), &frame, XAnchor::Left, Coord::ZERO, false, true);
        assert!((back - 80.0).abs() < 1e-9);
    }

    #[test]
    fn offsets_point_inwards_from_the_anchor() {
        let frame = frame();
        let x = map_x(
            Coord::Px(16.0),
            &frame,
            XAnchor::Right,
            Coord::ZERO,
            true,
            false,
        );
        // 16px inwards from the right edge, inside the margin.
        assert!((x - (1.0 - 16.0 / 800.0 - 0.03)).abs() < 1e-12);
    }

    #[test]
    fn margins_accumulate_through_parents() {
        let canvas = Frame::new(800.0, 640.0).with_margins(Margins::new(0.02, 0.02, 0.0, 0.0));
        let pad = Frame::new(400.0, 640.0)
            .with_margins(Margins::new(0.13, 0.03, 0.05, 0.105))
            .inside(canvas);
        let total = pad.accumulated_margins();
        assert!((total.left - 0.15).abs() < 1e-12);
        assert!((total.right - 0.05).abs() < 1e-12);
        let x = map_x(Coord::ZERO, &pad, XAnchor::Left, Coord::ZERO, true, false);
        assert!((x - 0.15).abs() < 1e-12);
        assert_eq!(pad.root().width(), 800.0);
    }

    #[test]
    fn legend_box_from_far_corner_and_row_geometry() {
        let spec = LegendBoxSpec {
            x2: Some(0.96),
            width: Some(0.28),
            y2: Some(0.92),
            row_spacing: Some(0.045),
            rows: Some(3),
            ..Default::default()
        };
        let (x1, y1, x2, y2) = compute_legend_box(&spec).unwrap();
        assert!((x1 - 0.68).abs() < 1e-12);
        assert!((y1 - (0.92 - 3.0 * 0.045)).abs() < 1e-12);
        assert_eq!(x2, 0.96);
        assert_eq!(y2, 0.92);
    }

    #[test]
    fn legend_box_defaults_when_unconstrained() {
        let (x1, y1, x2, y2) = compute_legend_box(&LegendBoxSpec::default()).unwrap();
        assert!((x2 - 0.96).abs() < 1e-12);
        assert!((x1 - (0.96 - 0.28)).abs() < 1e-12);
        assert!((y2 - 0.92).abs() < 1e-12);
        assert!((y1 - (0.92 - 0.135)).abs() < 1e-12);
    }

    #[test]
    fn legend_box_rejects_over_specification() {
        let spec = LegendBoxSpec {
            x1: Some(0.1),
            x2: Some(0.9),
            width: Some(0.5),
            ..Default::default()
        };
        assert!(matches!(
            compute_legend_box(&spec),
            Err(Error::InvalidArgument(_))
        ));
        let spec = LegendBoxSpec {
            rows: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            compute_legend_box(&spec),
            Err(Error::InvalidArgument(_))
        ));
        let spec = LegendBoxSpec {
            y2: Some(0.9),
            height: Some(0.2),
            row_spacing: Some(0.05),
            rows: Some(4),
            ..Default::default()
        };
        assert!(matches!(
            compute_legend_box(&spec),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn legend_coords_grow_downwards() {
        let styles = StyleSet::new();
        let (x1, y1, x2, y2) = legend_coords(2, &styles, None, None, None, Some(0.075));
        assert!((x1 - 0.68).abs() < 1e-12);
        assert!((x2 - 0.96).abs() < 1e-12);
        assert!((y2 - 0.92).abs() < 1e-12);
        assert!((y1 - (0.92 - 2.0 * 0.075)).abs() < 1e-12);
    }

    #[test]
    fn anchor_coords_respect_style_margins() {
        let styles = StyleSet::new();
        let (x, y) = anchor_coords(HPos::Left, VPos::Top, &styles, AnchorOffsets::default());
        assert!((x - (0.13 + 0.005)).abs() < 1e-12);
        assert!((y - (1.0 - 0.05 - 0.005)).abs() < 1e-12);
        let (x, _) = anchor_coords(
            HPos::Center,
            VPos::Center,
            &styles,
            AnchorOffsets::default(),
        );
        assert!((x - (1.0 - 0.03 + 0.13) / 2.0).abs() < 1e-12);
        let (x, _) = anchor_coords(
            HPos::Right,
            VPos::Bottom,
            &styles,
            AnchorOffsets {
                h_offset: Some(0.02),
                ..Default::default()
            },
        );
        assert!((x - (1.0 - 0.03 - 0.02)).abs() < 1e-12);
    }
}
