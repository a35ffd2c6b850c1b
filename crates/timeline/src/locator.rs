use crate::error::TimelineError;
use crate::format::{TimelineLabel, format_year};
use crate::node::TimelineNode;

/// Hover positions closer than this to the slider do not refresh the preview.
pub const PREVIEW_THRESHOLD: f64 = 2.0;

/// Index of the item whose `value` is nearest to `position`; ties go to the
/// earlier item.
pub fn locate_index(position: f64, items: &[TimelineNode]) -> Result<usize, TimelineError> {
    let mut best: Option<(usize, f64)> = None;
    for (index, item) in items.iter().enumerate() {
        let distance = (position - item.value).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }
    best.map(|(index, _)| index).ok_or(TimelineError::EmptyLevel)
}

/// The item of a level nearest to a scrubber position.
pub fn locate(position: f64, items: &[TimelineNode]) -> Result<&TimelineNode, TimelineError> {
    locate_index(position, items).map(|index| &items[index])
}

/// Label for a resolved item, dimmed while previewing.
pub fn update_display(node: &TimelineNode, is_preview: bool) -> TimelineLabel {
    TimelineLabel::new(
        format!("{} - {}", node.name, format_year(node.year_start)),
        is_preview,
    )
}

/// Whether a hover at `position` is far enough from the slider to preview.
pub fn preview_needed(position: f64, slider_value: f64, threshold: f64) -> bool {
    (position - slider_value).abs() > threshold
}
