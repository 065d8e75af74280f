//! Output document: the parameterized multi-week program.

use crate::types::{ExerciseCategory, ExperienceLevel, Location, Percent};
use crate::Result;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

/// A complete generated program
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterizedWorkout {
    pub id: Uuid,
    pub name: String,
    pub weeks: u32,
    pub days_per_week: u32,
    pub difficulty: ExperienceLevel,
    /// Equipment-access descriptor the program was generated for
    pub equipment: String,
    /// Mean estimated session length in minutes
    pub estimated_duration: u32,
    pub days: BTreeMap<u32, ParameterizedDay>,
}

impl ParameterizedWorkout {
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterizedDay {
    pub day_number: u32,
    #[serde(rename = "type")]
    pub location: Location,
    pub focus: String,
    pub exercises: Vec<ParameterizedExercise>,
}

/// An exercise (or compound parent) with one parameter set per week
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ParameterizedExercise {
    pub name: String,
    /// Present only on compound parents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExerciseCategory>,
    #[serde(flatten)]
    pub weeks: WeekMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_exercises: Option<Vec<SubExercise>>,
}

impl ParameterizedExercise {
    pub fn is_compound_parent(&self) -> bool {
        self.category.as_ref().is_some_and(|c| c.is_compound())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SubExercise {
    pub name: String,
    #[serde(flatten)]
    pub weeks: WeekMap,
}

/// Week number -> parameters, serialized as `week1`, `week2`, ...
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeekMap(pub BTreeMap<u32, WeekParameters>);

impl WeekMap {
    pub fn get(&self, week: u32) -> Option<&WeekParameters> {
        self.0.get(&week)
    }

    pub fn weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &WeekParameters)> {
        self.0.iter().map(|(week, params)| (*week, params))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, WeekParameters)> for WeekMap {
    fn from_iter<T: IntoIterator<Item = (u32, WeekParameters)>>(iter: T) -> Self {
        WeekMap(iter.into_iter().collect())
    }
}

impl Serialize for WeekMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (week, params) in &self.0 {
            map.serialize_entry(&format!("week{}", week), params)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeekMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct WeekMapVisitor;

        impl<'de> Visitor<'de> for WeekMapVisitor {
            type Value = WeekMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of week1..weekN parameter objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<WeekMap, A::Error> {
                let mut weeks = BTreeMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    let week = key
                        .strip_prefix("week")
                        .and_then(|n| n.parse::<u32>().ok())
                        .filter(|n| *n > 0)
                        .ok_or_else(|| de::Error::custom(format!("unexpected field '{}'", key)))?;
                    let params: WeekParameters = access.next_value()?;
                    if weeks.insert(week, params).is_some() {
                        return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                    }
                }
                Ok(WeekMap(weeks))
            }
        }

        deserializer.deserialize_map(WeekMapVisitor)
    }
}

/// Prescription for one week
///
/// Which fields are populated is fixed per exercise across all weeks.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct WeekParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<Reps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<TimeSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_time: Option<TimeSpec>,
}

impl WeekParameters {
    /// Names of the non-empty fields
    pub fn populated_fields(&self) -> BTreeSet<&'static str> {
        [
            ("sets", self.sets.is_some()),
            ("reps", self.reps.is_some()),
            ("weight", self.weight.is_some()),
            ("rest", self.rest.is_some()),
            ("work_time", self.work_time.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

/// Repetitions: a count or a description such as "30s hold"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Text(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Weight {
    /// Percentage of training max
    PercentTm { percent: Percent },
    Absolute { value: f64, unit: String },
    Descriptor { text: String },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSpec {
    pub value: u32,
    pub unit: TimeUnit,
}

impl TimeSpec {
    pub fn seconds(value: u32) -> Self {
        Self {
            value,
            unit: TimeUnit::Seconds,
        }
    }

    pub fn minutes(value: u32) -> Self {
        Self {
            value,
            unit: TimeUnit::Minutes,
        }
    }
}

impl fmt::Display for TimeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TimeUnit::Seconds => write!(f, "{}s", self.value),
            TimeUnit::Minutes => write!(f, "{} min", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompoundKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn week(reps: u32) -> WeekParameters {
        WeekParameters {
            sets: Some(3),
            reps: Some(Reps::Count(reps)),
            weight: Some(Weight::PercentTm {
                percent: Percent::from_hundredths(7250),
            }),
            rest: Some(TimeSpec::seconds(90)),
            work_time: None,
        }
    }

    #[test]
    fn test_exercise_json_shape() {
        let exercise = ParameterizedExercise {
            name: "Goblet Squat".into(),
            category: None,
            weeks: [(1, week(10)), (2, week(9))].into_iter().collect(),
            sub_exercises: None,
        };

        let value = serde_json::to_value(&exercise).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Goblet Squat",
                "week1": {
                    "sets": 3,
                    "reps": 10,
                    "weight": {"type": "percent_tm", "percent": 72.5},
                    "rest": {"value": 90, "unit": "seconds"}
                },
                "week2": {
                    "sets": 3,
                    "reps": 9,
                    "weight": {"type": "percent_tm", "percent": 72.5},
                    "rest": {"value": 90, "unit": "seconds"}
                }
            })
        );

        let parsed: ParameterizedExercise = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, exercise);
    }

    #[test]
    fn test_compound_parent_json() {
        let value = json!({
            "name": "EMOM Push",
            "category": "emom",
            "week1": {"work_time": {"value": 6, "unit": "minutes"}},
            "sub_exercises": [
                {"name": "Push-Up", "week1": {"sets": 1, "reps": "30s hold"}}
            ]
        });
        let parsed: ParameterizedExercise = serde_json::from_value(value).unwrap();

        assert!(parsed.is_compound_parent());
        assert_eq!(parsed.category, Some(ExerciseCategory::Compound(CompoundKind::Emom)));
        let subs = parsed.sub_exercises.unwrap();
        assert_eq!(
            subs[0].weeks.get(1).unwrap().reps,
            Some(Reps::Text("30s hold".into()))
        );
    }

    #[test]
    fn test_unknown_week_key_rejected() {
        let value = json!({"name": "Plank", "week0": {"sets": 3}});
        assert!(serde_json::from_value::<ParameterizedExercise>(value).is_err());

        let value = json!({"name": "Plank", "notes": "hold"});
        assert!(serde_json::from_value::<ParameterizedExercise>(value).is_err());
    }

    #[test]
    fn test_populated_fields() {
        let fields = week(8).populated_fields();
        assert_eq!(
            fields,
            BTreeSet::from(["reps", "rest", "sets", "weight"])
        );
        assert!(WeekParameters::default().populated_fields().is_empty());
    }

    #[test]
    fn test_day_keys_serialize_as_strings() {
        let workout = ParameterizedWorkout {
            id: Uuid::nil(),
            name: "Tone Full Body - 1 Weeks".into(),
            weeks: 1,
            days_per_week: 1,
            difficulty: ExperienceLevel::Beginner,
            equipment: "bodyweight_only".into(),
            estimated_duration: 43,
            days: BTreeMap::from([(
                1,
                ParameterizedDay {
                    day_number: 1,
                    location: Location::Home,
                    focus: "Full Body-Volume".into(),
                    exercises: Vec::new(),
                },
            )]),
        };
        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["days"]["1"]["dayNumber"], json!(1));
        assert_eq!(value["days"]["1"]["type"], json!("home"));
        assert_eq!(value["daysPerWeek"], json!(1));

        let parsed: ParameterizedWorkout = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, workout);
    }
}
