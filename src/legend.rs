//! Column-major legend layout.
//!
//! Backends usually fill multi-column legends row first, which reads badly
//! when entries form logical groups. [`fill_legend`] assigns slots column
//! first instead: entries run down the first column, then down the next.
//! Labels are right-padded with spaces to a common rendered width so every
//! cell occupies the same box, and surplus slots of the rectangular grid are
//! filled with blank placeholders.

use crate::error::{Error, Result};
use crate::measure::{FontSpec, TextMeasure};

/// A drawable series handle the legend can describe.
pub trait Drawable {
    fn name(&self) -> &str;
    fn title(&self) -> &str;
}

/// The legend object being filled, as exposed by the plotting backend.
pub trait LegendSink<H: ?Sized> {
    /// Number of display columns. Zero is rejected by [`fill_legend`].
    fn columns(&self) -> usize;

    /// The legend's own text font, or `None`/zero-size when unset.
    fn font(&self) -> Option<FontSpec>;

    /// Appends one entry. `option` is `None` for the backend's default draw
    /// option and `Some("")` for the blank placeholder.
    fn append(&mut self, handle: &H, label: &str, option: Option<&str>);
}

/// One legend entry: a handle plus an optional label and draw option.
#[derive(Debug, Clone)]
pub struct LegendEntry<'a, H: ?Sized> {
    pub handle: &'a H,
    pub label: Option<String>,
    pub option: Option<String>,
}

impl<'a, H: Drawable + ?Sized> LegendEntry<'a, H> {
    pub fn new(handle: &'a H) -> Self {
        Self {
            handle,
            label: None,
            option: None,
        }
    }

    pub fn labeled(handle: &'a H, label: impl Into<String>) -> Self {
        Self {
            handle,
            label: Some(label.into()),
            option: None,
        }
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    /// The label to render: the explicit one, else the handle's title, else
    /// its name.
    fn display_label(&self) -> String {
        if let Some(label) = &self.label
            && !label.is_empty()
        {
            return label.clone();
        }
        let title = self.handle.title();
        if !title.is_empty() {
            return title.to_string();
        }
        self.handle.name().to_string()
    }
}

/// Lays `entries` out into `sink` column-major.
///
/// `default_font` is used when the sink reports no usable text font;
/// callers typically build it from the active style's text size.
///
/// Entries must not be empty and the sink must report at least one column;
/// both are rejected with [`Error::InvalidArgument`].
pub fn fill_legend<H, S>(
    sink: &mut S,
    entries: &[LegendEntry<'_, H>],
    ruler: &impl TextMeasure,
    default_font: &FontSpec,
) -> Result<()>
where
    H: Drawable + ?Sized,
    S: LegendSink<H>,
{
    if entries.is_empty() {
        return Err(Error::invalid("legend entries must not be empty"));
    }
    let columns = sink.columns();
    if columns == 0 {
        return Err(Error::invalid("legend column count must be positive"));
    }

    let font = match sink.font() {
        Some(font) if !font.is_unset() => font,
        _ => default_font.clone(),
    };

    let labels: Vec<String> = entries.iter().map(LegendEntry::display_label).collect();
    let widths: Vec<f32> = labels
        .iter()
        .map(|label| ruler.text_width(label, &font))
        .collect();
    let max_width = widths.iter().copied().fold(0.0_f32, f32::max);
    let space_width = ruler.space_width(&font);
    if space_width <= 0.0 {
        return Err(Error::invalid("text ruler reports a non-positive space width"));
    }

    // Equal-width cells: pad each label with the number of whole space
    // glyphs that fits into its deficit.
    let padded: Vec<String> = labels
        .into_iter()
        .zip(&widths)
        .map(|(mut label, width)| {
            let pad = ((max_width - width) / space_width).floor().max(0.0) as usize;
            label.push_str(&" ".repeat(pad));
            label
        })
        .collect();
    let blank = " ".repeat((max_width / space_width).floor().max(0.0) as usize);

    let rows = entries.len().div_ceil(columns);
    let last = entries.len() - 1;
    for row in 0..rows {
        for col in 0..columns {
            let idx = row + rows * col;
            if idx < entries.len() {
                sink.append(entries[idx].handle, &padded[idx], entries[idx].option.as_deref());
            } else {
                sink.append(entries[last].handle, &blank, Some(""));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Series {
        name: String,
        title: String,
    }

    impl Series {
        fn new(name: &str, title: &str) -> Self {
            Self {
                name: name.to_string(),
                title: title.to_string(),
            }
        }
    }

    impl Drawable for Series {
        fn name(&self) -> &str {
            &self.name
        }

        fn title(&self) -> &str {
            &self.title
        }
    }

    /// Every character one unit wide, so padding math is exact.
    struct MonoRuler;

    impl TextMeasure for MonoRuler {
        fn text_width(&self, text: &str, font: &FontSpec) -> f32 {
            text.chars().count() as f32 * font.size
        }
    }

    struct Recorder {
        columns: usize,
        font: Option<FontSpec>,
        entries: Vec<(String, String, Option<String>)>,
    }

    impl Recorder {
        fn new(columns: usize) -> Self {
            Self {
                columns,
                font: None,
                entries: Vec::new(),
            }
        }
    }

    impl LegendSink<Series> for Recorder {
        fn columns(&self) -> usize {
            self.columns
        }

        fn font(&self) -> Option<FontSpec> {
            self.font.clone()
        }

        fn append(&mut self, handle: &Series, label: &str, option: Option<&str>) {
            self.entries.push((
                handle.name.clone(),
                label.to_string(),
                option.map(str::to_string),
            ));
        }
    }

    fn font() -> FontSpec {
        FontSpec::new("monospace", 1.0)
    }

    #[test]
    fn five_entries_two_columns() {
        let series: Vec<Series> = (0..5)
            .map(|i| Series::new(&format!("s{i}"), &format!("series {i}")))
            .collect();
        let entries: Vec<LegendEntry<'_, Series>> =
            series.iter().map(LegendEntry::new).collect();
        let mut sink = Recorder::new(2);
        fill_legend(&mut sink, &entries, &MonoRuler, &font()).unwrap();

        // Three rows, traversed row by row across both columns; the final
        // slot is the blank placeholder carrying the last real handle.
        assert_eq!(sink.entries.len(), 6);
        let order: Vec<&str> = sink.entries.iter().map(|e| e.0.as_str()).collect();
        assert_eq!(order, ["s0", "s3", "s1", "s4", "s2", "s4"]);
        assert_eq!(sink.entries[5].1.trim(), "");
        assert_eq!(sink.entries[5].2.as_deref(), Some(""));
        // Real entries keep the backend's default draw option.
        assert!(sink.entries[0].2.is_none());
    }

    #[test]
    fn labels_pad_to_equal_width() {
        let a = Series::new("a", "x");
        let b = Series::new("b", "long label");
        let entries = [LegendEntry::new(&a), LegendEntry::new(&b)];
        let mut sink = Recorder::new(1);
        fill_legend(&mut sink, &entries, &MonoRuler, &font()).unwrap();

        let max = sink.entries.iter().map(|e| e.1.chars().count()).max().unwrap();
        for (_, label, _) in &sink.entries {
            assert_eq!(label.chars().count(), max);
        }
    }

    #[test]
    fn placeholder_width_matches_labels() {
        let series: Vec<Series> = (0..3)
            .map(|i| Series::new(&format!("s{i}"), "same"))
            .collect();
        let entries: Vec<LegendEntry<'_, Series>> =
            series.iter().map(LegendEntry::new).collect();
        let mut sink = Recorder::new(2);
        fill_legend(&mut sink, &entries, &MonoRuler, &font()).unwrap();
        let blank = &sink.entries.last().unwrap().1;
        assert_eq!(blank.chars().count(), "same".len());
    }

    #[test]
    fn label_falls_back_to_title_then_name() {
        let titled = Series::new("h1", "Signal");
        let untitled = Series::new("h2", "");
        let entries = [
            LegendEntry::new(&titled),
            LegendEntry::new(&untitled),
            LegendEntry::labeled(&titled, "Override"),
        ];
        let mut sink = Recorder::new(3);
        fill_legend(&mut sink, &entries, &MonoRuler, &font()).unwrap();
        assert_eq!(sink.entries[0].1.trim_end(), "Signal");
        assert_eq!(sink.entries[1].1.trim_end(), "h2");
        assert_eq!(sink.entries[2].1.trim_end(), "Override");
    }

    #[test]
    fn sink_font_wins_over_default() {
        let a = Series::new("a", "aa");
        let entries = [LegendEntry::new(&a)];
        let mut sink = Recorder::new(1);
        sink.font = Some(FontSpec::new("monospace", 2.0));
        // MonoRuler pads in units of the font size, so a doubled size does
        // not change the count of padding spaces for equal labels.
        fill_legend(&mut sink, &entries, &MonoRuler, &font()).unwrap();
        assert_eq!(sink.entries[0].1, "aa");
    }

    #[test]
    fn zero_columns_is_rejected() {
        let a = Series::new("a", "aa");
        let entries = [LegendEntry::new(&a)];
        let mut sink = Recorder::new(0);
        assert!(matches!(
            fill_legend(&mut sink, &entries, &MonoRuler, &font()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_entries_are_rejected() {
        let mut sink = Recorder::new(2);
        let entries: [LegendEntry<'_, Series>; 0] = [];
        assert!(matches!(
            fill_legend(&mut sink, &entries, &MonoRuler, &font()),
            Err(Error::InvalidArgument(_))
        ));
    }
}
