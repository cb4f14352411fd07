//! `Decimal` helpers for distribution summaries.
//!
//! Session bankrolls can be large enough that squaring a deviation leaves the
//! `Decimal` range, so the moments here scale before they multiply.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SQRT_MAX_STEPS: usize = 8;

/// Arithmetic mean, or zero for an empty slice.
#[must_use]
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let n = Decimal::from(values.len());
    let sum = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, &x| acc.checked_add(x));
    match sum {
        Some(sum) => sum / n,
        None => values
            .iter()
            .fold(Decimal::ZERO, |acc, &x| acc.saturating_add(x / n)),
    }
}

/// Population standard deviation around `mean`.
///
/// Deviations are divided by the largest one before squaring, so the result
/// is defined for any slice of finite bankrolls.
#[must_use]
pub fn std_dev(values: &[Decimal], mean: Decimal) -> Decimal {
    let deviations: Option<Vec<Decimal>> =
        values.iter().map(|&x| x.checked_sub(mean)).collect();
    let Some(deviations) = deviations else {
        return Decimal::MAX;
    };
    let scale = deviations
        .iter()
        .map(|d| d.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    if scale.is_zero() {
        return Decimal::ZERO;
    }

    let n = Decimal::from(deviations.len());
    let variance = deviations
        .iter()
        .map(|&d| {
            let unit = d / scale;
            unit * unit
        })
        .sum::<Decimal>()
        / n;
    sqrt(variance).checked_mul(scale).unwrap_or(Decimal::MAX)
}

/// Square root, zero for non-positive input.
///
/// Starts from the `f64` root and refines with Newton steps until the
/// estimate stops moving.
#[must_use]
pub fn sqrt(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut guess = x
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|g| *g > Decimal::ZERO)
        .unwrap_or(Decimal::ONE);

    for _ in 0..SQRT_MAX_STEPS {
        let next = (guess + x / guess) / dec!(2);
        if next == guess {
            break;
        }
        guess = next;
    }
    guess
}

/// Percentile of a sorted slice, interpolating linearly between ranks.
///
/// `p` is clamped to `[0, 1]` and resolved to a hundredth of a percent. An
/// empty slice yields zero.
#[must_use]
pub fn percentile(sorted: &[Decimal], p: f64) -> Decimal {
    let Some(&first) = sorted.first() else {
        return Decimal::ZERO;
    };
    let last = sorted.len() - 1;
    let p = Decimal::new((p.clamp(0.0, 1.0) * 10_000.0).round() as i64, 4);

    let rank = p * Decimal::from(last);
    let lower = rank.floor().to_usize().unwrap_or(0).min(last);
    let upper = (lower + 1).min(last);
    let fraction = rank - rank.floor();

    let low = sorted.get(lower).copied().unwrap_or(first);
    let high = sorted.get(upper).copied().unwrap_or(low);
    high.checked_sub(low)
        .and_then(|gap| gap.checked_mul(fraction))
        .and_then(|step| low.checked_add(step))
        .unwrap_or(low)
}
