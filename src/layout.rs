use tracing::trace;

use crate::domain::SizingPolicy;

// Absorbs representation error of weights like 0.3 before flooring.
const WEIGHT_EPSILON: f64 = 1e-9;

/// Split `total_width` pixels across `column_count` columns.
///
/// Column `i` with a weight gets `max(1, floor(total_width * weight))`. The
/// columns without a weight share what is left evenly. Weights beyond the
/// column count are ignored.
pub fn distribute_column_widths(total_width: u32, weights: &[f64], column_count: usize) -> Vec<u32> {
    let weighted = weights.len().min(column_count);
    let mut widths: Vec<u32> = weights[..weighted]
        .iter()
        .map(|w| {
            let width = (total_width as f64 * w.max(0.0) + WEIGHT_EPSILON).floor();
            (width as u32).max(1)
        })
        .collect();

    let unweighted = column_count - weighted;
    if unweighted > 0 {
        let assigned: u32 = widths.iter().sum();
        let remaining = total_width.saturating_sub(assigned);
        let share = remaining / unweighted as u32;
        widths.extend(std::iter::repeat_n(share, unweighted));
    }
    trace!("Column widths for {total_width}px with weights {weights:?}: {widths:?}");
    widths
}

/// Preferred viewport height for `policy`. `natural_height` is the height
/// the content would take without any policy.
pub fn preferred_viewport_height(
    policy: SizingPolicy,
    row_height: u32,
    row_count: usize,
    max_visible_rows: usize,
    natural_height: u32,
) -> u32 {
    let rows = match policy {
        SizingPolicy::None => return natural_height,
        SizingPolicy::FitsRows => row_count.min(max_visible_rows),
        SizingPolicy::Fixed => max_visible_rows,
    };
    row_height.saturating_mul(rows.min(u32::MAX as usize) as u32)
}
