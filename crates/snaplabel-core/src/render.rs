use snaplabel_types::Label;

use crate::error::CycleError;

/// Highest-confidence label. On ties the first one encountered wins.
pub fn top_label(labels: &[Label]) -> Option<&Label> {
    labels.iter().fold(None, |best: Option<&Label>, label| match best {
        Some(current) if label.confidence <= current.confidence => Some(current),
        Some(_) | None => Some(label),
    })
}

pub fn format_label(label: &Label) -> String {
    format!(
        "Label: {}\nConfidence: {:.2}%",
        label.text,
        label.confidence * 100.0
    )
}

/// Text shown for a successful labeling response
pub fn render_labels(labels: &[Label]) -> Result<String, CycleError> {
    top_label(labels)
        .map(format_label)
        .ok_or(CycleError::NoLabelsFound)
}
