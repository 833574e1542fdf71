//! Effectiveness and distance-to-target primitives
//!
//! Pure functions. Everything else in the crate derives percentages from
//! here so the rounding rule lives in exactly one place.

use tally_common::db::models::Criteria;

use crate::stats::PersonTotals;

/// Conversion rate as a percentage with two decimal places.
///
/// Returns 0.00 when guests is 0. Rounding is half-up on the second
/// decimal, done in integer arithmetic so 0.125 becomes 0.13 rather
/// than whatever the nearest binary float happens to be.
pub fn effectiveness(guests: i64, registrations: i64) -> f64 {
    if guests == 0 {
        return 0.0;
    }

    // registrations / guests * 100, carried at 1e-4 precision for the
    // half-up step
    let scaled = registrations * 10_000;
    let quotient = scaled / guests;
    let remainder = scaled % guests;

    let rounded = if remainder * 2 >= guests {
        quotient + 1
    } else {
        quotient
    };

    rounded as f64 / 100.0
}

/// Mean relative deviation from the applicable targets.
///
/// Each target dimension contributes |actual - target| / target, but
/// only when the target is present and positive. Returns None when no
/// dimension qualifies: a profile with no usable targets is
/// incomparable, not a perfect match.
pub fn normalized_distance(totals: &PersonTotals, criteria: &Criteria) -> Option<f64> {
    let mut distance = 0.0;
    let mut dimensions = 0u32;

    if let Some(target) = criteria.guests_target {
        if target > 0 {
            distance += (totals.total_guests - target).abs() as f64 / target as f64;
            dimensions += 1;
        }
    }

    if let Some(target) = criteria.registrations_target {
        if target > 0 {
            distance += (totals.total_registrations - target).abs() as f64 / target as f64;
            dimensions += 1;
        }
    }

    if let Some(target) = criteria.effectiveness_target_pct {
        if target > 0.0 {
            distance += (totals.effectiveness_pct - target).abs() / target;
            dimensions += 1;
        }
    }

    if dimensions == 0 {
        None
    } else {
        Some(distance / dimensions as f64)
    }
}
