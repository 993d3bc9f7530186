//! Income-to-rent applicant score shown on the review board.

pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;
const INCOME_MULTIPLIER: f64 = 2.5;

/// `monthly_income / monthly_rent * 2.5`, clamped to `1..=10`. Free units score the maximum.
pub fn applicant_score(monthly_income: f64, monthly_rent: u32) -> f64 {
    if monthly_rent == 0 {
        return MAX_SCORE;
    }
    let raw = monthly_income / f64::from(monthly_rent) * INCOME_MULTIPLIER;
    if raw.is_nan() {
        return MIN_SCORE;
    }
    raw.clamp(MIN_SCORE, MAX_SCORE)
}
