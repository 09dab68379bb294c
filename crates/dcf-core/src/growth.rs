use rust_decimal::Decimal;

use crate::types::Rate;

/// Build an annual growth-rate path for the projection horizon.
///
/// The rate holds flat at `start_rate` through `fade_after_year`, then fades
/// linearly to zero at the final year. When `fade_after_year >= years` the
/// path is flat throughout. Consumers clamp the path, so a shorter path than
/// the horizon carries its last value forward.
pub fn growth_vector(start_rate: Rate, years: u32, fade_after_year: u32) -> Vec<Rate> {
    let mut path = Vec::with_capacity(years as usize);
    for year in 1..=years {
        if fade_after_year >= years || year <= fade_after_year {
            path.push(start_rate);
        } else {
            let step = Decimal::from(year - fade_after_year);
            let span = Decimal::from(years - fade_after_year);
            path.push(start_rate * (Decimal::ONE - step / span));
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flat_when_fade_covers_horizon() {
        let path = growth_vector(dec!(0.08), 5, 5);
        assert_eq!(path, vec![dec!(0.08); 5]);
    }

    #[test]
    fn test_fade_reaches_zero_at_final_year() {
        let path = growth_vector(dec!(0.10), 5, 2);
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], dec!(0.10));
        assert_eq!(path[1], dec!(0.10));
        // Years 3-5 step down by a third of the start rate each year
        assert!((path[2] - dec!(0.10) * dec!(2) / dec!(3)).abs() < dec!(0.0000001));
        assert!((path[3] - dec!(0.10) / dec!(3)).abs() < dec!(0.0000001));
        assert_eq!(path[4], Decimal::ZERO);
    }

    #[test]
    fn test_fade_from_year_one() {
        let path = growth_vector(dec!(0.06), 3, 0);
        assert_eq!(path.len(), 3);
        assert!(path[0] < dec!(0.06));
        assert_eq!(path[2], Decimal::ZERO);
    }

    #[test]
    fn test_zero_years_yields_empty_path() {
        assert!(growth_vector(dec!(0.08), 0, 0).is_empty());
    }
}
