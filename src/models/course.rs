use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use crate::models::Holes;

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("rating must be a decimal number, got {0:?}")]
    Invalid(String),

    #[error("rating must be between 0.0 and 99.9, got {0}")]
    OutOfRange(Decimal),
}

/// Course rating, kept as a decimal with exactly one fractional digit.
///
/// Serialises as a string (`"71.2"`) and accepts either a JSON number or a
/// JSON string on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "String")]
pub struct Rating(Decimal);

impl Rating {
    pub const SCALE: u32 = 1;

    pub fn new(value: Decimal) -> Result<Self, RatingError> {
        let mut value = value;
        // rounds half away from zero when the scale shrinks
        value.rescale(Self::SCALE);
        if value.is_zero() {
            value.set_sign_positive(true);
        }
        if value < Decimal::ZERO || value >= Decimal::ONE_HUNDRED {
            return Err(RatingError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Rating {
    type Err = RatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| RatingError::Invalid(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = RatingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for Rating {
    type Error = RatingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rating> for String {
    fn from(rating: Rating) -> Self {
        rating.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub handle: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub rating: Rating,
    pub slope: i32,
}

/// A course together with its pars and handicaps rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub pars: Holes,
    pub handicaps: Holes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCourseRequest {
    pub handle: String,
    pub name: String,
    pub rating: Rating,
    pub slope: i32,
    pub pars: Holes,
    pub handicaps: Holes,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub rating: Option<Rating>,
    pub slope: Option<i32>,
}

impl UpdateCourseRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.rating.is_none() && self.slope.is_none()
    }
}
