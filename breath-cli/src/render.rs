//! Terminal rendering of the breathing circle

use breath_core::exercise::{CircleVisuals, StepView};

/// Width of the circle bar at full scale
const BAR_WIDTH: usize = 40;

/// Number of hold dots
const DOT_COUNT: usize = 3;

/// One status line for the current frame
pub fn status_line(visuals: &CircleVisuals, elapsed_ms: u64) -> String {
    let filled = bar_cells(visuals.circle_scale * visuals.entrance_scale);
    let label = match &visuals.step {
        Some(step) if visuals.label_opacity > 0.05 => step_label(step, elapsed_ms),
        _ => String::new(),
    };

    format!(
        "[{}{}] {:<16} {:>4}s",
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        label,
        elapsed_ms / 1000
    )
}

/// Header printed when a step starts
pub fn step_header(step: &StepView) -> String {
    format!("-- {} ({:?}) --", step.label, step.id)
}

fn step_label(step: &StepView, elapsed_ms: u64) -> String {
    if !step.show_dots {
        return step.label.to_string();
    }
    // One more dot each second, cycling
    let dots = (elapsed_ms / 1000) as usize % DOT_COUNT + 1;
    format!("{}{}", step.label, ".".repeat(dots))
}

fn bar_cells(scale: f32) -> usize {
    let cells = (scale.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    cells.min(BAR_WIDTH)
}
