//! Unit system preference and conversion
//!
//! All values are stored in metric units (kg, cm, ml, m). The user's `Units`
//! preference only affects how values are presented and how free-form input
//! is normalized before it reaches storage.

use crate::tags::tagged_enum;

const KG_PER_LB: f64 = 0.453_592_37;
const CM_PER_INCH: f64 = 2.54;
const ML_PER_FL_OZ: f64 = 29.573_529_6;
const M_PER_MILE: f64 = 1_609.344;

tagged_enum! {
    /// Display unit system
    #[derive(Default)]
    pub enum Units ("unit system") {
        #[default]
        Metric => "METRIC",
        Imperial => "IMPERIAL",
    }
}

impl Units {
    /// Convert a weight in this system to kilograms
    pub fn weight_to_kg(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => value * KG_PER_LB,
        }
    }

    /// Convert kilograms to this system
    pub fn weight_from_kg(&self, kg: f64) -> f64 {
        match self {
            Units::Metric => kg,
            Units::Imperial => kg / KG_PER_LB,
        }
    }

    pub fn height_to_cm(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => value * CM_PER_INCH,
        }
    }

    pub fn height_from_cm(&self, cm: f64) -> f64 {
        match self {
            Units::Metric => cm,
            Units::Imperial => cm / CM_PER_INCH,
        }
    }

    pub fn volume_to_ml(&self, value: f64) -> f64 {
        match self {
            Units::Metric => value,
            Units::Imperial => value * ML_PER_FL_OZ,
        }
    }

    pub fn volume_from_ml(&self, ml: f64) -> f64 {
        match self {
            Units::Metric => ml,
            Units::Imperial => ml / ML_PER_FL_OZ,
        }
    }

    pub fn distance_from_m(&self, meters: f64) -> f64 {
        match self {
            Units::Metric => meters / 1000.0,
            Units::Imperial => meters / M_PER_MILE,
        }
    }

    pub fn weight_label(&self) -> &'static str {
        match self {
            Units::Metric => "kg",
            Units::Imperial => "lbs",
        }
    }

    pub fn height_label(&self) -> &'static str {
        match self {
            Units::Metric => "cm",
            Units::Imperial => "in",
        }
    }

    pub fn volume_label(&self) -> &'static str {
        match self {
            Units::Metric => "ml",
            Units::Imperial => "fl oz",
        }
    }

    pub fn distance_label(&self) -> &'static str {
        match self {
            Units::Metric => "km",
            Units::Imperial => "mi",
        }
    }

    /// Render a stored kilogram weight in this system, one decimal place
    pub fn format_weight(&self, kg: f64) -> String {
        format!("{:.1} {}", self.weight_from_kg(kg), self.weight_label())
    }
}
