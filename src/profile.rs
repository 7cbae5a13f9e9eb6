//! User profile and body-mass index
//!
//! BMI is derived state: it is computed at onboarding and recomputed
//! whenever weight or height change, never edited directly.

use rust_decimal::Decimal;

use crate::models::UserProfile;

/// BMI categories over the standard half-open intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    /// Below 18.5
    Underweight,
    /// 18.5 to 25
    Normal,
    /// 25 to 30
    Overweight,
    /// 30 and above
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: Decimal) -> Self {
        if bmi < Decimal::new(185, 1) {
            BmiCategory::Underweight
        } else if bmi < Decimal::from(25) {
            BmiCategory::Normal
        } else if bmi < Decimal::from(30) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Compute BMI from weight in kilograms and height in centimeters,
/// rounded to one decimal. Inputs must be positive; this is the caller's
/// obligation (the CLI validates at its parse boundary).
pub fn calculate_bmi(weight_kg: Decimal, height_cm: Decimal) -> Decimal {
    let height_m = height_cm / Decimal::from(100);
    (weight_kg / (height_m * height_m)).round_dp(1)
}

impl UserProfile {
    /// Create a profile at onboarding completion, computing BMI
    pub fn new(name: String, age: u8, weight_kg: Decimal, height_cm: Decimal) -> Self {
        let bmi = calculate_bmi(weight_kg, height_cm);
        Self {
            name,
            age,
            weight_kg,
            height_cm,
            bmi,
        }
    }

    pub fn bmi_category(&self) -> BmiCategory {
        BmiCategory::from_bmi(self.bmi)
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn set_age(&mut self, age: u8) {
        self.age = age;
    }

    /// Update weight and recompute BMI
    pub fn set_weight(&mut self, weight_kg: Decimal) {
        self.weight_kg = weight_kg;
        self.bmi = calculate_bmi(self.weight_kg, self.height_cm);
    }

    /// Update height and recompute BMI
    pub fn set_height(&mut self, height_cm: Decimal) {
        self.height_cm = height_cm;
        self.bmi = calculate_bmi(self.weight_kg, self.height_cm);
    }
}
