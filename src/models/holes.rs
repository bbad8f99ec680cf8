use std::collections::BTreeMap;
use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

macro_rules! holes {
    ($($variant:ident => $field:ident),+ $(,)?) => {
        /// One of the 18 holes of a course. Serialises as `hole1` .. `hole18`,
        /// which is also the column name in `pars` and `handicaps`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum Hole {
            $($variant),+
        }

        impl Hole {
            pub const ALL: [Hole; 18] = [$(Hole::$variant),+];

            pub fn column(self) -> &'static str {
                match self {
                    $(Hole::$variant => stringify!($field)),+
                }
            }
        }

        /// A complete per-hole row: every hole is always present.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
        #[serde(deny_unknown_fields)]
        pub struct Holes {
            $(pub $field: i32),+
        }

        impl Holes {
            pub fn get(&self, hole: Hole) -> i32 {
                match hole {
                    $(Hole::$variant => self.$field),+
                }
            }

            pub fn set(&mut self, hole: Hole, value: i32) {
                match hole {
                    $(Hole::$variant => self.$field = value),+
                }
            }

            pub fn try_from_fn<E>(mut f: impl FnMut(Hole) -> Result<i32, E>) -> Result<Self, E> {
                Ok(Self {
                    $($field: f(Hole::$variant)?),+
                })
            }
        }
    };
}

holes! {
    Hole1 => hole1,
    Hole2 => hole2,
    Hole3 => hole3,
    Hole4 => hole4,
    Hole5 => hole5,
    Hole6 => hole6,
    Hole7 => hole7,
    Hole8 => hole8,
    Hole9 => hole9,
    Hole10 => hole10,
    Hole11 => hole11,
    Hole12 => hole12,
    Hole13 => hole13,
    Hole14 => hole14,
    Hole15 => hole15,
    Hole16 => hole16,
    Hole17 => hole17,
    Hole18 => hole18,
}

impl Hole {
    /// 1-based hole number.
    pub fn number(self) -> usize {
        self as usize + 1
    }
}

impl FromStr for Hole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hole::ALL
            .into_iter()
            .find(|hole| hole.column() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown hole: {}", s)))
    }
}

impl Holes {
    pub fn from_fn(mut f: impl FnMut(Hole) -> i32) -> Self {
        match Self::try_from_fn::<Infallible>(|hole| Ok(f(hole))) {
            Ok(holes) => holes,
            Err(never) => match never {},
        }
    }

    /// Builds a row from values listed in hole order.
    pub fn from_array(values: [i32; 18]) -> Self {
        Self::from_fn(|hole| values[hole.number() - 1])
    }
}

/// A pars or handicaps row as stored, keyed by its course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CourseHoles {
    pub course_handle: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub holes: Holes,
}

/// Sparse update of a pars or handicaps row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolePatch(BTreeMap<Hole, i32>);

impl HolePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `holeN -> value` pairs, rejecting names outside `hole1..hole18`.
    pub fn from_named<I, K>(pairs: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, i32)>,
        K: AsRef<str>,
    {
        pairs
            .into_iter()
            .map(|(name, value)| -> Result<(Hole, i32), AppError> {
                Ok((name.as_ref().parse()?, value))
            })
            .collect()
    }

    pub fn set(mut self, hole: Hole, value: i32) -> Self {
        self.0.insert(hole, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Hole, i32)> + '_ {
        self.0.iter().map(|(hole, value)| (*hole, *value))
    }
}

impl FromIterator<(Hole, i32)> for HolePatch {
    fn from_iter<T: IntoIterator<Item = (Hole, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hole_columns_follow_hole_order() {
        let columns: Vec<&str> = Hole::ALL.iter().map(|h| h.column()).collect();
        assert_eq!(columns.first(), Some(&"hole1"));
        assert_eq!(columns.last(), Some(&"hole18"));
        assert_eq!(Hole::Hole10.number(), 10);
    }

    #[test]
    fn test_parse_hole_names() {
        assert_eq!("hole7".parse::<Hole>().unwrap(), Hole::Hole7);
        assert!(matches!("hole19".parse::<Hole>(), Err(AppError::BadRequest(_))));
        assert!(matches!("hole07".parse::<Hole>(), Err(AppError::BadRequest(_))));
        assert!(matches!("Hole1".parse::<Hole>(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_holes_get_set() {
        let mut holes = Holes::from_fn(|hole| hole.number() as i32);
        assert_eq!(holes.get(Hole::Hole18), 18);

        holes.set(Hole::Hole18, 5);
        assert_eq!(holes.hole18, 5);
        assert_eq!(holes.hole17, 17);
    }

    #[test]
    fn test_patch_rejects_unknown_hole() {
        let err = HolePatch::from_named([("hole3", 3), ("green", 4)]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let patch = HolePatch::from_named([("hole3", 3), ("hole18", 5)]).unwrap();
        assert_eq!(patch.len(), 2);
    }

    #[test]
    fn test_patch_json_keys() {
        let patch: HolePatch = serde_json::from_str(r#"{"hole18": 5, "hole3": 3}"#).unwrap();
        let entries: Vec<(Hole, i32)> = patch.iter().collect();
        assert_eq!(entries, vec![(Hole::Hole3, 3), (Hole::Hole18, 5)]);

        assert!(serde_json::from_str::<HolePatch>(r#"{"hole19": 5}"#).is_err());
    }

    #[test]
    fn test_holes_json_requires_every_hole() {
        let mut value = serde_json::to_value(Holes::from_fn(|_| 4)).unwrap();
        value.as_object_mut().unwrap().remove("hole9");
        assert!(serde_json::from_value::<Holes>(value).is_err());
    }
}
