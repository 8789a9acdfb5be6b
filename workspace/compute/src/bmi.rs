use common::BmiClass;

/// Body-mass index: weight in kilograms over squared height in meters.
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    weight / (height * height)
}

/// Classifies a BMI value. Each bracket excludes its upper bound, so the
/// boundary values 18.5, 25 and 30 fall into the higher bracket.
pub fn classify_bmi(bmi: f64) -> BmiClass {
    if bmi < 18.5 {
        BmiClass::Underweight
    } else if bmi < 25.0 {
        BmiClass::Healthy
    } else if bmi < 30.0 {
        BmiClass::Overweight
    } else {
        BmiClass::Obese
    }
}
