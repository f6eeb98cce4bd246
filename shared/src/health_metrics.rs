//! Derived health metrics
//!
//! Pure classification and estimation functions over stored readings:
//! heart-rate training zones, blood-pressure categories, BMI, resting energy
//! expenditure and hydration targets.

use crate::models::{ActivityLevel, Gender};
use crate::tags::tagged_enum;

// ============================================================================
// Heart rate
// ============================================================================

tagged_enum! {
    /// Training zone as a share of age-predicted maximum heart rate
    pub enum HeartRateZone ("heart rate zone") {
        Resting => "RESTING",
        FatBurn => "FAT_BURN",
        Cardio => "CARDIO",
        Peak => "PEAK",
        AboveMax => "ABOVE_MAX",
    }
}

impl HeartRateZone {
    pub fn description(&self) -> &'static str {
        match self {
            HeartRateZone::Resting => "Resting / very light",
            HeartRateZone::FatBurn => "Fat burn (60-70% of max)",
            HeartRateZone::Cardio => "Cardio (70-85% of max)",
            HeartRateZone::Peak => "Peak (85-100% of max)",
            HeartRateZone::AboveMax => "Above predicted maximum",
        }
    }
}

/// Age-predicted maximum heart rate, `220 - age`
pub fn max_heart_rate(age_years: u32) -> i32 {
    220 - age_years.min(219) as i32
}

/// Zone for `bpm` given the age-predicted maximum
pub fn classify_heart_rate(bpm: i32, age_years: u32) -> HeartRateZone {
    let pct = f64::from(bpm) / f64::from(max_heart_rate(age_years)) * 100.0;
    if pct < 60.0 {
        HeartRateZone::Resting
    } else if pct < 70.0 {
        HeartRateZone::FatBurn
    } else if pct < 85.0 {
        HeartRateZone::Cardio
    } else if pct <= 100.0 {
        HeartRateZone::Peak
    } else {
        HeartRateZone::AboveMax
    }
}

// ============================================================================
// Blood pressure
// ============================================================================

tagged_enum! {
    pub enum BloodPressureCategory ("blood pressure category") {
        Normal => "NORMAL",
        Elevated => "ELEVATED",
        Stage1 => "STAGE_1",
        Stage2 => "STAGE_2",
        Crisis => "CRISIS",
    }
}

/// ACC/AHA category; the more severe of the two readings wins
pub fn classify_blood_pressure(systolic: i32, diastolic: i32) -> BloodPressureCategory {
    if systolic > 180 || diastolic > 120 {
        BloodPressureCategory::Crisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::Stage2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Stage1
    } else if systolic >= 120 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

// ============================================================================
// Body composition and energy
// ============================================================================

tagged_enum! {
    pub enum BmiCategory ("BMI category") {
        Underweight => "UNDERWEIGHT",
        Normal => "NORMAL",
        Overweight => "OVERWEIGHT",
        Obese => "OBESE",
    }
}

pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

impl ActivityLevel {
    /// Multiplier applied to BMR to estimate daily expenditure
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

/// Mifflin-St Jeor basal metabolic rate in kcal/day.
///
/// Genders other than male and female use the midpoint of the two constants.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Option<Gender>) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match gender {
        Some(Gender::Male) => base + 5.0,
        Some(Gender::Female) => base - 161.0,
        _ => base - 78.0,
    }
}

/// Total daily energy expenditure in kcal/day
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Daily water target: 30 ml per kg, scaled up with activity
pub fn calculate_daily_water_ml(weight_kg: f64, activity_level: ActivityLevel) -> f64 {
    let base_ml = weight_kg * 30.0;
    let factor = match activity_level {
        ActivityLevel::Sedentary => 1.0,
        ActivityLevel::LightlyActive => 1.1,
        ActivityLevel::ModeratelyActive => 1.2,
        ActivityLevel::VeryActive => 1.3,
        ActivityLevel::ExtremelyActive => 1.4,
    };
    (base_ml * factor).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 30, HeartRateZone::Resting)]
    #[case(120, 30, HeartRateZone::FatBurn)]
    #[case(140, 30, HeartRateZone::Cardio)]
    #[case(170, 30, HeartRateZone::Peak)]
    #[case(190, 30, HeartRateZone::Peak)]
    #[case(200, 30, HeartRateZone::AboveMax)]
    fn test_heart_rate_zones(#[case] bpm: i32, #[case] age: u32, #[case] expected: HeartRateZone) {
        assert_eq!(classify_heart_rate(bpm, age), expected);
    }

    #[rstest]
    #[case(115, 75, BloodPressureCategory::Normal)]
    #[case(125, 75, BloodPressureCategory::Elevated)]
    #[case(125, 85, BloodPressureCategory::Stage1)]
    #[case(135, 70, BloodPressureCategory::Stage1)]
    #[case(145, 85, BloodPressureCategory::Stage2)]
    #[case(120, 95, BloodPressureCategory::Stage2)]
    #[case(185, 100, BloodPressureCategory::Crisis)]
    #[case(150, 125, BloodPressureCategory::Crisis)]
    fn test_blood_pressure_categories(
        #[case] systolic: i32,
        #[case] diastolic: i32,
        #[case] expected: BloodPressureCategory,
    ) {
        assert_eq!(classify_blood_pressure(systolic, diastolic), expected);
    }

    #[test]
    fn test_max_heart_rate() {
        assert_eq!(max_heart_rate(40), 180);
        assert_eq!(max_heart_rate(0), 220);
    }

    #[test]
    fn test_bmi() {
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.857).abs() < 0.001);
        assert_eq!(classify_bmi(bmi), BmiCategory::Normal);
        assert_eq!(classify_bmi(31.0), BmiCategory::Obese);
    }

    #[test]
    fn test_bmr_and_tdee() {
        let male = calculate_bmr(80.0, 180.0, 30, Some(Gender::Male));
        assert!((male - 1780.0).abs() < 1e-9);
        let female = calculate_bmr(80.0, 180.0, 30, Some(Gender::Female));
        assert!((male - female - 166.0).abs() < 1e-9);
        let tdee = calculate_tdee(male, ActivityLevel::Sedentary);
        assert!((tdee - 2136.0).abs() < 1e-9);
    }

    #[test]
    fn test_water_target() {
        assert_eq!(calculate_daily_water_ml(70.0, ActivityLevel::Sedentary), 2100.0);
        assert_eq!(calculate_daily_water_ml(70.0, ActivityLevel::ExtremelyActive), 2940.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_zone_is_monotonic_in_bpm(age in 15u32..90, bpm in 30i32..220) {
            let lower = classify_heart_rate(bpm, age);
            let higher = classify_heart_rate(bpm + 1, age);
            prop_assert!(higher >= lower);
        }

        #[test]
        fn prop_bp_category_is_monotonic(sys in 80i32..200, dia in 40i32..130) {
            let base = classify_blood_pressure(sys, dia);
            prop_assert!(classify_blood_pressure(sys + 5, dia) >= base);
            prop_assert!(classify_blood_pressure(sys, dia + 5) >= base);
        }
    }
}
