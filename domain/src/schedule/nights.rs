//! Night count calculation

use super::day::DAYS_PER_WEEK;

/// Convert an arc length into a night count.
///
/// The last selected day is the checkout day and contributes no night, so a
/// partial-week arc of `n` days yields `n - 1` nights. The full week is
/// continuous occupancy with no checkout day and yields 7.
///
/// ```
/// use schedule_domain::schedule::calculate_nights;
///
/// assert_eq!(calculate_nights(4, false), 3);
/// assert_eq!(calculate_nights(7, true), 7);
/// assert_eq!(calculate_nights(1, false), 0);
/// ```
pub fn calculate_nights(arc_length: usize, is_full_week: bool) -> u32 {
    if is_full_week {
        return DAYS_PER_WEEK as u32;
    }
    arc_length.saturating_sub(1) as u32
}
