//! Dual-unit catch mass.
//!
//! The angler enters a mass in either kilograms or ounces. The entered value is
//! the source of truth; the other unit is derived by [`CatchMass::reconcile`]
//! immediately before the owning catch is stored.
//!
//! The kg -> oz direction rounds to [`OZ_SCALE`] fractional digits, so a
//! kg -> oz -> kg round trip only reproduces the original value within
//! `0.005 oz` (about `0.00015 kg`). That loss is expected and is not corrected.

use crate::utils::error::{RcrError, Result};
use crate::utils::validation::Validate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Kilograms per avoirdupois ounce.
pub const KG_PER_OZ: Decimal = Decimal::from_parts(2_579_719_349, 6, 0, false, 12);

/// Largest mass accepted in either unit.
pub const MAX_MASS: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Fractional digits kept for derived ounce values.
pub const OZ_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasurementType {
    Metric,
    Imperial,
}

impl std::str::FromStr for MeasurementType {
    type Err = RcrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "metric" | "kg" => Ok(MeasurementType::Metric),
            "imperial" | "oz" => Ok(MeasurementType::Imperial),
            other => Err(RcrError::validation(
                "mass.type",
                format!("unknown measurement type '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatchMass {
    #[serde(rename = "type")]
    measurement_type: Option<MeasurementType>,
    kg: Option<Decimal>,
    oz: Option<Decimal>,
}

impl CatchMass {
    pub fn new(measurement_type: MeasurementType, mass: Decimal) -> Self {
        let mut catch_mass = Self::default();
        catch_mass.set(measurement_type, mass);
        catch_mass
    }

    /// Record the user-entered mass. The other unit is left stale until
    /// the next [`reconcile`](Self::reconcile).
    pub fn set(&mut self, measurement_type: MeasurementType, mass: Decimal) {
        self.measurement_type = Some(measurement_type);
        match measurement_type {
            MeasurementType::Metric => self.kg = Some(mass),
            MeasurementType::Imperial => self.oz = Some(mass),
        }
    }

    /// Derive the non-authoritative unit from the authoritative one.
    ///
    /// Expects a validated mass: with no measurement type or no source value
    /// this does nothing. A source value that overflows the conversion leaves
    /// the derived unit unset.
    pub fn reconcile(&mut self) {
        match self.measurement_type {
            Some(MeasurementType::Imperial) => {
                if let Some(oz) = self.oz {
                    self.kg = oz.checked_mul(KG_PER_OZ);
                }
            }
            Some(MeasurementType::Metric) => {
                if let Some(kg) = self.kg {
                    self.oz = kg.checked_div(KG_PER_OZ).map(|oz| {
                        oz.round_dp_with_strategy(OZ_SCALE, RoundingStrategy::MidpointAwayFromZero)
                    });
                }
            }
            None => {}
        }
    }

    pub fn measurement_type(&self) -> Option<MeasurementType> {
        self.measurement_type
    }

    pub fn kg(&self) -> Option<Decimal> {
        self.kg
    }

    pub fn oz(&self) -> Option<Decimal> {
        self.oz
    }

    /// The value the user entered, in the unit they chose.
    pub fn source_value(&self) -> Option<Decimal> {
        match self.measurement_type? {
            MeasurementType::Metric => self.kg,
            MeasurementType::Imperial => self.oz,
        }
    }
}

impl Validate for CatchMass {
    fn validate(&self) -> Result<()> {
        if self.measurement_type.is_none() {
            return Err(RcrError::validation("mass.type", "measurement type is required"));
        }
        match self.source_value() {
            None => Err(RcrError::validation("mass", "a mass value is required")),
            Some(value) if value <= Decimal::ZERO => {
                Err(RcrError::validation("mass", "mass must be greater than zero"))
            }
            Some(value) if value > MAX_MASS => Err(RcrError::validation(
                "mass",
                format!("mass must not exceed {}", MAX_MASS),
            )),
            Some(_) => Ok(()),
        }
    }
}
