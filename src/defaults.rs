//! The built-in `"default"` style.

use crate::style::{PropMap, Style};

/// Flat layout constants live in the `layout` component; everything else is
/// keyed by the component kind the setup helpers apply it to.
pub fn default_style() -> Style {
    let mut style = Style::new();

    style.insert_component(
        "layout",
        PropMap::new()
            .with("canvas_width", 800.0)
            .with("canvas_height", 640.0)
            .with("text_size", 22.0)
            .with("auto_ticklength", 0.015)
            .with("legend_x1", 0.68)
            .with("legend_x2", 0.96)
            .with("legend_y2", 0.92)
            .with("legend_dy", 0.045),
    );

    style.insert_component(
        "colors",
        PropMap::new()
            .with("black", "#000000")
            .with("blue", "#2a3fd4")
            .with("red", "#e5484d")
            .with("magenta", "#c23ac2")
            .with("yellow", "#f5a623")
            .with("green", "#1f8a3d")
            .with("brightgreen", "#4cc564")
            .with("darkgreen", "#145a27")
            .with("creamblue", "#6f8fc9")
            .with("creamred", "#c96f6f")
            .with("white", "#ffffff"),
    );

    // The canvas itself carries no margins; insets live on the pad.
    style.insert_component(
        "canvas",
        PropMap::new()
            .with("top_margin", 0.0)
            .with("right_margin", 0.0)
            .with("bottom_margin", 0.0)
            .with("left_margin", 0.0),
    );

    style.insert_component(
        "pad",
        PropMap::new()
            .with("rect", (0.0, 0.0, 1.0, 1.0))
            .with("top_margin", 0.05)
            .with("right_margin", 0.03)
            .with("bottom_margin", 0.105)
            .with("left_margin", 0.13)
            .with("ticks", (true, true)),
    );

    let axis = PropMap::new()
        .with("title_size", 25.0)
        .with("label_size", 22.0);
    style.insert_component("x_axis", axis.clone());
    style.insert_component("y_axis", axis.clone());
    style.insert_component("z_axis", axis.with("title_offset", 0.7));

    style.insert_component(
        "label",
        PropMap::new()
            .with("text_size", 22.0)
            .with("text_align", 11)
            .with("ndc", true),
    );

    style.insert_component(
        "legend",
        PropMap::new()
            .with("border_size", 0)
            .with("fill_color", "#ffffff")
            .with("line_width", 0)
            .with("text_size", 22.0)
            .with("column_separation", 0.0),
    );

    style.insert_component(
        "hist",
        PropMap::new()
            .with("line_width", 2.0)
            .with("line_color", "#000000")
            .with("marker_color", "#000000"),
    );

    style.insert_component(
        "graph",
        PropMap::new()
            .with("line_width", 2.0)
            .with("line_color", "#000000")
            .with("fill_color", "#ffffff")
            .with("marker_style", 10)
            .with("marker_color", "#000000"),
    );

    style.insert_component(
        "line",
        PropMap::new()
            .with("line_width", 2.0)
            .with("line_color", "#000000")
            .with("ndc", true),
    );

    style.insert_component(
        "box",
        PropMap::new()
            .with("line_width", 2.0)
            .with("line_color", "#000000")
            .with("fill_color", "#ffffff"),
    );

    style.insert_component(
        "func",
        PropMap::new()
            .with("line_width", 2.0)
            .with("line_color", "#000000"),
    );

    style.insert_component(
        "ellipse",
        PropMap::new()
            .with("line_width", 1.0)
            .with("line_color", "#000000"),
    );

    style
}
