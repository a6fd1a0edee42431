//! Greedy IoU non-maximum suppression.

use crate::candidate::Candidate;
use crate::geometry::Rect;
use crate::trace::{trace_event, trace_span};
use crate::util::math::{check_unit_interval, score_cmp_desc};
use crate::util::{UltraFaceError, UltraFaceResult};

/// Suppresses overlapping candidates and returns the kept indices.
///
/// Candidates are visited by descending score; equal scores keep their
/// slice order. Each visited candidate that survives is kept and removes
/// every later candidate whose IoU with it is strictly greater than
/// `max_iou`. The result lists indices into `candidates` in selection
/// order. `max_iou` must lie in `[0, 1]`.
pub fn suppress(candidates: &[Candidate], max_iou: f32) -> UltraFaceResult<Vec<usize>> {
    check_unit_interval("max_iou", max_iou)?;
    Ok(greedy(
        candidates.len(),
        |i| candidates[i].score,
        |i| candidates[i].rect,
        max_iou,
    ))
}

/// Suppression over parallel rectangle and score slices.
pub fn non_max_suppression(
    rects: &[Rect],
    scores: &[f32],
    max_iou: f32,
) -> UltraFaceResult<Vec<usize>> {
    if rects.len() != scores.len() {
        return Err(UltraFaceError::ShapeMismatch {
            scores: scores.len(),
            boxes: rects.len(),
        });
    }
    check_unit_interval("max_iou", max_iou)?;
    Ok(greedy(rects.len(), |i| scores[i], |i| rects[i], max_iou))
}

fn greedy<S, R>(len: usize, score_at: S, rect_at: R, max_iou: f32) -> Vec<usize>
where
    S: Fn(usize) -> f32,
    R: Fn(usize) -> Rect,
{
    let _span = trace_span!("suppress", candidates = len).entered();

    // Stable sort: ties stay in index order.
    let mut order: Vec<usize> = (0..len).collect();
    order.sort_by(|&a, &b| score_cmp_desc(score_at(a), score_at(b)));

    let mut suppressed = vec![false; len];
    let mut kept = Vec::new();
    for (pos, &idx) in order.iter().enumerate() {
        if suppressed[idx] {
            continue;
        }
        kept.push(idx);
        let best = rect_at(idx);
        for &other in &order[pos + 1..] {
            if !suppressed[other] && best.iou(&rect_at(other)) > max_iou {
                suppressed[other] = true;
            }
        }
    }

    trace_event!("suppressed", kept = kept.len(), dropped = len - kept.len());
    kept
}
