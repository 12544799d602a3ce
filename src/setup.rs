//! Style-driven component setup.
//!
//! Each helper merges the active style's component block with caller
//! overrides and applies the result through the backend's property table.
//! The axis helpers additionally derive tick length and title offset from
//! the frame geometry, so axes keep their visual proportions when a canvas
//! is resized or a pad covers only part of it.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::apply::{set_color, PropertyTable};
use crate::coords::{map_x, map_y, Coord, Frame, XAnchor, YAnchor};
use crate::error::Result;
use crate::stack::StyleSet;
use crate::style::{merge_props, PropMap, PropValue};

/// Applies the style component `component`, then `props`, to `target`.
pub fn setup_component<T>(
    table: &PropertyTable<T>,
    target: &mut T,
    styles: &StyleSet,
    component: &str,
    props: Option<&PropMap>,
) -> Result<()> {
    let mut layers: Vec<&PropMap> = Vec::new();
    if let Some(base) = styles.component(component) {
        layers.push(base);
    }
    if let Some(extra) = props {
        layers.push(extra);
    }
    table.apply_layers(target, &layers)
}

fn setup_with_color<T>(
    table: &PropertyTable<T>,
    target: &mut T,
    styles: &StyleSet,
    component: &str,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
    flags: &str,
) -> Result<()> {
    setup_component(table, target, styles, component, props)?;
    if let Some(color) = color {
        set_color(table, target, &styles.resolve_color(color), flags)?;
    }
    Ok(())
}

/// Canvas setup; explicit `width`/`height` win over the style's layout
/// constants and are injected as `width`/`height` properties.
pub fn setup_canvas<T>(
    table: &PropertyTable<T>,
    canvas: &mut T,
    styles: &StyleSet,
    width: Option<f64>,
    height: Option<f64>,
    props: Option<&PropMap>,
) -> Result<()> {
    let mut sized = PropMap::new();
    if let Some(width) = width.or_else(|| styles.layout_number("canvas_width")) {
        sized.insert("width", width);
    }
    if let Some(height) = height.or_else(|| styles.layout_number("canvas_height")) {
        sized.insert("height", height);
    }
    if let Some(extra) = props {
        sized = merge_props(&[&sized, extra]);
    }
    setup_component(table, canvas, styles, "canvas", Some(&sized))
}

pub fn setup_pad<T>(
    table: &PropertyTable<T>,
    pad: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
) -> Result<()> {
    setup_component(table, pad, styles, "pad", props)
}

/// X-axis setup with derived properties: tick length scaled so ticks keep
/// the same on-screen length regardless of the plot area's aspect ratio,
/// and title offset scaled against the style's reference canvas height.
pub fn setup_x_axis<T>(
    table: &PropertyTable<T>,
    axis: &mut T,
    frame: &Frame,
    styles: &StyleSet,
    props: Option<&PropMap>,
) -> Result<()> {
    let mut derived = styles.component("x_axis").cloned().unwrap_or_default();

    let margins = frame.margins();
    let plot_width = 1.0 - margins.left - margins.right;
    if plot_width != 0.0
        && frame.height() != 0.0
        && let Some(auto) = styles.layout_number("auto_ticklength")
    {
        derived.insert(
            "tick_length",
            auto / plot_width * frame.width() / frame.height(),
        );
    }

    let canvas_height = frame.root().height();
    if canvas_height != 0.0
        && let Some(reference) = styles.layout_number("canvas_height")
    {
        derived.insert("title_offset", 1.075 * reference / canvas_height);
    }

    let mut layers: Vec<&PropMap> = vec![&derived];
    if let Some(extra) = props {
        layers.push(extra);
    }
    table.apply_layers(axis, &layers)
}

/// Y-axis counterpart of [`setup_x_axis`]; tick length depends only on the
/// plot height, title offset on the reference canvas width.
pub fn setup_y_axis<T>(
    table: &PropertyTable<T>,
    axis: &mut T,
    frame: &Frame,
    styles: &StyleSet,
    props: Option<&PropMap>,
) -> Result<()> {
    let mut derived = styles.component("y_axis").cloned().unwrap_or_default();

    let margins = frame.margins();
    let plot_height = 1.0 - margins.top - margins.bottom;
    if plot_height != 0.0
        && let Some(auto) = styles.layout_number("auto_ticklength")
    {
        derived.insert("tick_length", auto / plot_height);
    }

    let canvas_width = frame.root().width();
    if canvas_width != 0.0
        && let Some(reference) = styles.layout_number("canvas_width")
    {
        derived.insert("title_offset", 1.4 * reference / canvas_width);
    }

    let mut layers: Vec<&PropMap> = vec![&derived];
    if let Some(extra) = props {
        layers.push(extra);
    }
    table.apply_layers(axis, &layers)
}

pub fn setup_z_axis<T>(
    table: &PropertyTable<T>,
    axis: &mut T,
    frame: &Frame,
    styles: &StyleSet,
    props: Option<&PropMap>,
) -> Result<()> {
    let mut derived = styles.component("z_axis").cloned().unwrap_or_default();

    let canvas_width = frame.root().width();
    if canvas_width != 0.0
        && let Some(reference) = styles.layout_number("canvas_width")
    {
        derived.insert("title_offset", 1.4 * reference / canvas_width);
    }

    let mut layers: Vec<&PropMap> = vec![&derived];
    if let Some(extra) = props {
        layers.push(extra);
    }
    table.apply_layers(axis, &layers)
}

pub fn setup_legend<T>(
    table: &PropertyTable<T>,
    legend: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, legend, styles, "legend", props, color, "lf")
}

pub fn setup_label<T>(
    table: &PropertyTable<T>,
    label: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, label, styles, "label", props, color, "t")
}

pub fn setup_hist<T>(
    table: &PropertyTable<T>,
    hist: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, hist, styles, "hist", props, color, "lmf")
}

pub fn setup_graph<T>(
    table: &PropertyTable<T>,
    graph: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, graph, styles, "graph", props, color, "lm")
}

pub fn setup_line<T>(
    table: &PropertyTable<T>,
    line: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, line, styles, "line", props, color, "lm")
}

pub fn setup_box<T>(
    table: &PropertyTable<T>,
    target: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, target, styles, "box", props, color, "lf")
}

pub fn setup_func<T>(
    table: &PropertyTable<T>,
    func: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
    color: Option<&PropValue>,
) -> Result<()> {
    setup_with_color(table, func, styles, "func", props, color, "l")
}

pub fn setup_ellipse<T>(
    table: &PropertyTable<T>,
    ellipse: &mut T,
    styles: &StyleSet,
    props: Option<&PropMap>,
) -> Result<()> {
    setup_component(table, ellipse, styles, "ellipse", props)
}

/// A positioned text label: NDC coordinates plus the merged properties to
/// apply to the backend's label object.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub x: f64,
    pub y: f64,
    pub props: PropMap,
}

fn corner_label(frame: &Frame, styles: &StyleSet, anchor: XAnchor, align: i64) -> LabelSpec {
    let x = map_x(Coord::Px(2.0), frame, anchor, Coord::ZERO, true, false);
    let y = map_y(Coord::Px(-6.0), frame, YAnchor::Top, Coord::ZERO, true, false);
    let base = styles.component("label").cloned().unwrap_or_default();
    let align = PropMap::new().with("text_align", align);
    LabelSpec {
        x,
        y,
        props: merge_props(&[&base, &align]),
    }
}

/// Label hanging just above the top left corner of the plot area.
pub fn top_left_label(frame: &Frame, styles: &StyleSet) -> LabelSpec {
    corner_label(frame, styles, XAnchor::Left, 11)
}

/// Right-aligned counterpart of [`top_left_label`].
pub fn top_right_label(frame: &Frame, styles: &StyleSet) -> LabelSpec {
    corner_label(frame, styles, XAnchor::Right, 31)
}

static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-unique object name, `<prefix>_<counter>`.
pub fn unique_name(prefix: &str) -> String {
    let n = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
    if prefix.is_empty() {
        format!("obj_{n:04}")
    } else {
        format!("{prefix}_{n:04}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::{number, text};
    use crate::coords::Margins;

    #[derive(Debug, Default)]
    struct Axis {
        tick_length: f64,
        title_offset: f64,
        title_size: f64,
    }

    fn axis_table() -> PropertyTable<Axis> {
        PropertyTable::new()
            .with("tick_length", |axis: &mut Axis, value| {
                axis.tick_length = number(value)?;
                Ok(())
            })
            .with("title_offset", |axis: &mut Axis, value| {
                axis.title_offset = number(value)?;
                Ok(())
            })
            .with("title_size", |axis: &mut Axis, value| {
                axis.title_size = number(value)?;
                Ok(())
            })
    }

    #[derive(Debug, Default)]
    struct Hist {
        line_width: f64,
        line_color: String,
        marker_color: String,
        fill_color: String,
    }

    fn hist_table() -> PropertyTable<Hist> {
        PropertyTable::new()
            .with("line_width", |hist: &mut Hist, value| {
                hist.line_width = number(value)?;
                Ok(())
            })
            .with("line_color", |hist: &mut Hist, value| {
                hist.line_color = text(value)?.to_string();
                Ok(())
            })
            .with("marker_color", |hist: &mut Hist, value| {
                hist.marker_color = text(value)?.to_string();
                Ok(())
            })
            .with("fill_color", |hist: &mut Hist, value| {
                hist.fill_color = text(value)?.to_string();
                Ok(())
            })
    }

    fn pad_frame() -> Frame {
        let canvas = Frame::new(800.0, 640.0);
        Frame::new(800.0, 640.0)
            .with_margins(Margins::new(0.13, 0.03, 0.05, 0.105))
            .inside(canvas)
    }

    #[test]
    fn x_axis_derives_tick_length_and_title_offset() {
        let styles = StyleSet::new();
        let table = axis_table();
        let mut axis = Axis::default();
        let frame = pad_frame();
        setup_x_axis(&table, &mut axis, &frame, &styles, None).unwrap();

        let plot_width = 1.0 - 0.13 - 0.03;
        let expected_tick = 0.015 / plot_width * 800.0 / 640.0;
        assert!((axis.tick_length - expected_tick).abs() < 1e-12);
        // The frame matches the reference canvas size, so the offset is the
        // bare factor.
        assert!((axis.title_offset - 1.075).abs() < 1e-12);
        assert_eq!(axis.title_size, 25.0);
    }

    #[test]
    fn y_axis_scales_title_offset_with_canvas_width() {
        let styles = StyleSet::new();
        let table = axis_table();
        let mut axis = Axis::default();
        let canvas = Frame::new(1600.0, 640.0);
        let frame = Frame::new(1600.0, 640.0)
            .with_margins(Margins::new(0.13, 0.03, 0.05, 0.105))
            .inside(canvas);
        setup_y_axis(&table, &mut axis, &frame, &styles, None).unwrap();

        let plot_height = 1.0 - 0.05 - 0.105;
        assert!((axis.tick_length - 0.015 / plot_height).abs() < 1e-12);
        assert!((axis.title_offset - 1.4 * 800.0 / 1600.0).abs() < 1e-12);
    }

    #[test]
    fn overrides_win_over_derived_props() {
        let styles = StyleSet::new();
        let table = axis_table();
        let mut axis = Axis::default();
        let frame = pad_frame();
        let props = PropMap::new().with("tick_length", 0.5);
        setup_x_axis(&table, &mut axis, &frame, &styles, Some(&props)).unwrap();
        assert_eq!(axis.tick_length, 0.5);
    }

    #[test]
    fn hist_setup_applies_style_then_color() {
        let styles = StyleSet::new();
        let table = hist_table();
        let mut hist = Hist::default();
        let color = PropValue::from("red");
        setup_hist(&table, &mut hist, &styles, None, Some(&color)).unwrap();
        assert_eq!(hist.line_width, 2.0);
        // Named colors resolve through the style's color table and cover
        // line, marker and fill.
        assert_eq!(hist.line_color, "#e5484d");
        assert_eq!(hist.marker_color, "#e5484d");
        assert_eq!(hist.fill_color, "#e5484d");
    }

    #[test]
    fn corner_labels_sit_inside_margins() {
        let styles = StyleSet::new();
        let frame = pad_frame();
        let left = top_left_label(&frame, &styles);
        assert!((left.x - (2.0 / 800.0 + 0.13)).abs() < 1e-12);
        assert!((left.y - (1.0 + 6.0 / 640.0 - 0.05)).abs() < 1e-12);
        assert_eq!(left.props.integer("text_align"), Some(11));

        let right = top_right_label(&frame, &styles);
        assert!((right.x - (1.0 - 2.0 / 800.0 - 0.03)).abs() < 1e-12);
        assert_eq!(right.props.integer("text_align"), Some(31));
    }

    #[test]
    fn unique_names_do_not_repeat() {
        let a = unique_name("canvas");
        let b = unique_name("canvas");
        assert_ne!(a, b);
        assert!(a.starts_with("canvas_"));
    }
}
