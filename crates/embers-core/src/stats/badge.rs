//! Score percentage to badge tier.

use crate::definitions::Badge;

/// The active badge with the highest `min_score` not above `score_percent`.
///
/// Badges are ordered by `(min_score, sort_order)`; among equal thresholds
/// the one with the larger `sort_order` wins. Returns `None` when no badge
/// qualifies.
pub fn resolve_badge(score_percent: f64, badges: &[Badge]) -> Option<&Badge> {
    let mut ordered: Vec<&Badge> = badges.iter().filter(|badge| badge.active).collect();
    ordered.sort_by(|left, right| {
        left.min_score
            .total_cmp(&right.min_score)
            .then(left.sort_order.cmp(&right.sort_order))
    });

    let mut winner = None;
    for badge in ordered {
        if score_percent >= badge.min_score {
            winner = Some(badge);
        }
    }
    winner
}
