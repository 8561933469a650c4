//! COPD risk from smoking exposure (COPD-PS style mapping).

use serde::{Deserialize, Serialize};

use crate::models::client::finite;
use crate::models::ClientRecord;

/// Points added for current smoking.
const SMOKER_BONUS: f64 = 2.0;

const MAX_INPUT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CopdScore {
    pub input: f64,
    pub percent: f64,
}

/// Screening input: pack-years / 5 plus the smoker bonus, clamped to [0, 10].
/// `None` when neither pack-years nor smoking status is known.
pub fn input_score(pack_years: Option<f64>, smoker: Option<bool>) -> Option<f64> {
    let pack_years = finite(pack_years);
    if pack_years.is_none() && smoker.is_none() {
        return None;
    }

    let mut input = pack_years.unwrap_or(0.0) / 5.0;
    if smoker == Some(true) {
        input += SMOKER_BONUS;
    }
    Some(input.clamp(0.0, MAX_INPUT))
}

/// Input → percentage band.
pub fn input_to_percent(input: f64) -> f64 {
    match input {
        i if i <= 2.0 => 2.0,
        i if i <= 4.0 => 5.0,
        i if i <= 6.0 => 12.0,
        _ => 25.0,
    }
}

pub fn score(record: &ClientRecord) -> Option<CopdScore> {
    let input = input_score(record.lifestyle.pack_years, record.lifestyle.smoker)?;
    Some(CopdScore {
        input,
        percent: input_to_percent(input),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_exposure_is_unavailable() {
        assert!(input_score(None, None).is_none());
        assert_eq!(input_score(None, Some(false)), Some(0.0));
    }

    #[test]
    fn pack_years_and_bonus() {
        assert_eq!(input_score(Some(20.0), Some(true)), Some(6.0));
        assert_eq!(input_score(Some(20.0), Some(false)), Some(4.0));
    }

    #[test]
    fn input_is_capped() {
        assert_eq!(input_score(Some(100.0), Some(true)), Some(10.0));
        assert_eq!(input_score(Some(-10.0), None), Some(0.0));
    }

    #[test]
    fn bands() {
        assert_eq!(input_to_percent(0.0), 2.0);
        assert_eq!(input_to_percent(2.0), 2.0);
        assert_eq!(input_to_percent(4.0), 5.0);
        assert_eq!(input_to_percent(6.0), 12.0);
        assert_eq!(input_to_percent(6.2), 25.0);
    }

    #[test]
    fn score_from_record() {
        let mut r = ClientRecord::default();
        r.lifestyle.smoker = Some(true);
        r.lifestyle.pack_years = Some(30.0);
        let s = score(&r).unwrap();
        assert_eq!(s.input, 8.0);
        assert_eq!(s.percent, 25.0);
    }
}
