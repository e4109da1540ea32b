// ABOUTME: Energy expenditure estimate using the Mifflin-St Jeor equation
// ABOUTME: Basal rate, activity-adjusted total, and a fixed percentage display range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Estimate Calculator
//!
//! Computes basal and total daily energy expenditure for a complete profile.
//!
//! # Scientific References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy expenditure.
//!   *American Journal of Clinical Nutrition*, 51(2), 241-247.
//!   <https://doi.org/10.1093/ajcn/51.2.241>

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::estimate::RANGE_FRACTION;
use crate::errors::AppError;
use crate::models::{Profile, Sex};

/// Mifflin-St Jeor coefficients
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BmrConfig {
    /// Multiplier on weight in kilograms
    pub msj_weight_coef: f64,
    /// Multiplier on height in centimeters
    pub msj_height_coef: f64,
    /// Multiplier on age in years (negative)
    pub msj_age_coef: f64,
    /// Constant added for males
    pub msj_male_constant: f64,
    /// Constant added for females
    pub msj_female_constant: f64,
}

impl Default for BmrConfig {
    fn default() -> Self {
        Self {
            msj_weight_coef: 10.0,
            msj_height_coef: 6.25,
            msj_age_coef: -5.0,
            msj_male_constant: 5.0,
            msj_female_constant: -161.0,
        }
    }
}

/// Display band around the total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRange {
    /// Lower bound (kcal/day)
    pub low: f64,
    /// Upper bound (kcal/day)
    pub high: f64,
}

/// Basal and total expenditure for one profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    /// Basal metabolic rate (kcal/day)
    pub basal: f64,
    /// Basal times the activity factor (kcal/day)
    pub total: f64,
    /// Fixed percentage band around `total`
    pub range: EnergyRange,
}

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation (1990)
///
/// Formula: BMR = (10 x `weight_kg`) + (6.25 x `height_cm`) - (5 x age) + `sex_constant`
/// - Men: +5
/// - Women: -161
///
/// # Reference
/// Mifflin et al. (1990) DOI: 10.1093/ajcn/51.2.241
///
/// # Errors
///
/// Returns an error if an input is outside the range the formula was
/// validated for, or if sex is unknown
pub fn calculate_mifflin_st_jeor(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: Sex,
    config: &BmrConfig,
) -> Result<f64, AppError> {
    if weight_kg <= 0.0 || weight_kg > 300.0 {
        return Err(AppError::invalid_input(
            "Weight must be between 0 and 300 kg",
        ));
    }
    if height_cm <= 0.0 || height_cm > 300.0 {
        return Err(AppError::invalid_input(
            "Height must be between 0 and 300 cm",
        ));
    }
    if !(10..=120).contains(&age) {
        return Err(AppError::invalid_input(
            "Age must be between 10 and 120 years",
        ));
    }

    let sex_constant = match sex {
        Sex::Male => config.msj_male_constant,
        Sex::Female => config.msj_female_constant,
        Sex::Unknown => {
            return Err(AppError::invalid_input(
                "Sex is required for the basal rate",
            ))
        }
    };

    Ok(config.msj_weight_coef * weight_kg
        + config.msj_height_coef * height_cm
        + config.msj_age_coef * f64::from(age)
        + sex_constant)
}

/// Calculate Total Daily Energy Expenditure (TDEE)
///
/// Formula: TDEE = BMR x Activity Factor
///
/// # Errors
///
/// Returns an error if BMR or the factor is not positive
pub fn calculate_tdee(bmr: f64, activity_factor: f64) -> Result<f64, AppError> {
    if bmr <= 0.0 {
        return Err(AppError::invalid_input("BMR must be positive"));
    }
    if activity_factor <= 0.0 {
        return Err(AppError::invalid_input("Activity factor must be positive"));
    }
    Ok(bmr * activity_factor)
}

/// Estimate for a complete profile; `None` while any field is missing
#[must_use]
pub fn estimate_energy(profile: &Profile, config: &BmrConfig) -> Option<EstimateResult> {
    if !profile.is_complete() {
        return None;
    }
    let (age, weight_kg, height_cm, factor) = (
        profile.age?,
        profile.weight_kg?,
        profile.height_cm?,
        profile.activity_factor?,
    );

    let computed = calculate_mifflin_st_jeor(weight_kg, height_cm, age, profile.sex, config)
        .and_then(|basal| calculate_tdee(basal, factor).map(|total| (basal, total)));

    match computed {
        Ok((basal, total)) => Some(EstimateResult {
            basal,
            total,
            range: EnergyRange {
                low: total * (1.0 - RANGE_FRACTION),
                high: total * (1.0 + RANGE_FRACTION),
            },
        }),
        Err(error) => {
            debug!(%error, "Profile outside estimate range; no estimate");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> Profile {
        Profile {
            sex: Sex::Male,
            age: Some(25),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_factor: Some(1.55),
        }
    }

    #[test]
    fn test_reference_male() {
        let estimate = estimate_energy(&complete(), &BmrConfig::default()).unwrap();
        assert!((estimate.basal - 1673.75).abs() < 1e-9);
        assert!((estimate.total - 2594.3125).abs() < 1e-9);
        assert!((estimate.range.low - 2464.596_875).abs() < 1e-6);
        assert!((estimate.range.high - 2724.028_125).abs() < 1e-6);
    }

    #[test]
    fn test_female_constant() {
        let bmr =
            calculate_mifflin_st_jeor(60.0, 165.0, 40, Sex::Female, &BmrConfig::default()).unwrap();
        assert!((bmr - 1270.25).abs() < 1e-9);
    }

    #[test]
    fn test_partial_profile_has_no_estimate() {
        let config = BmrConfig::default();
        let base = complete();
        let partials = [
            Profile { sex: Sex::Unknown, ..base },
            Profile { age: None, ..base },
            Profile { weight_kg: None, ..base },
            Profile { height_cm: None, ..base },
            Profile { activity_factor: None, ..base },
        ];
        for profile in partials {
            assert!(estimate_energy(&profile, &config).is_none());
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let config = BmrConfig::default();
        assert!(calculate_mifflin_st_jeor(0.0, 175.0, 25, Sex::Male, &config).is_err());
        assert!(calculate_mifflin_st_jeor(70.0, 175.0, 5, Sex::Male, &config).is_err());
        assert!(calculate_mifflin_st_jeor(70.0, 175.0, 25, Sex::Unknown, &config).is_err());
        assert!(calculate_tdee(-1.0, 1.2).is_err());
    }
}
