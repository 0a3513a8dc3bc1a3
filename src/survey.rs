//! Survey attributes, their option literals and the records built from them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A string that is not one of an attribute's option literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {attribute}, expected one of: {}", .attribute.options().join(", "))]
pub struct ParseCategoryError {
    pub attribute: Attribute,
    pub value: String,
}

/// Unknown attribute name in a `field=value` assignment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown field '{0}', expected one of: age, edu_level, fav_animals, fav_place, gender")]
pub struct ParseAttributeError(pub String);

/// The five survey questions, in column order of the survey file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Age,
    EduLevel,
    FavAnimals,
    FavPlace,
    Gender,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Age,
        Attribute::EduLevel,
        Attribute::FavAnimals,
        Attribute::FavPlace,
        Attribute::Gender,
    ];

    /// Column name in the survey file and the model artifact
    pub fn column(self) -> &'static str {
        match self {
            Attribute::Age => "age",
            Attribute::EduLevel => "edu_level",
            Attribute::FavAnimals => "fav_animals",
            Attribute::FavPlace => "fav_place",
            Attribute::Gender => "gender",
        }
    }

    /// Human readable label used for chart axes
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Age => "Age",
            Attribute::EduLevel => "Education",
            Attribute::FavAnimals => "Favorite animals",
            Attribute::FavPlace => "Favorite place",
            Attribute::Gender => "Gender",
        }
    }

    /// Option literals in ordinal order
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Attribute::Age => AgeBracket::OPTIONS,
            Attribute::EduLevel => EduLevel::OPTIONS,
            Attribute::FavAnimals => FavAnimals::OPTIONS,
            Attribute::FavPlace => FavPlace::OPTIONS,
            Attribute::Gender => Gender::OPTIONS,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Attribute {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Attribute::ALL
            .into_iter()
            .find(|attribute| attribute.column() == normalized)
            .ok_or_else(|| ParseAttributeError(s.trim().to_string()))
    }
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident for $attribute:expr => {
            $($variant:ident => $literal:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $literal)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const OPTIONS: &'static [&'static str] = &[$($literal),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $literal,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($literal => Ok($name::$variant),)+
                    other => Err(ParseCategoryError {
                        attribute: $attribute,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

categorical! {
    /// Age bracket; variant order is the natural ordering used for charts
    AgeBracket for Attribute::Age => {
        Under18 => "<18",
        From18To24 => "18-24",
        From25To34 => "25-34",
        From35To44 => "35-44",
        From45To54 => "45-54",
        From55To64 => "55-64",
        Over65 => ">=65",
        Unknown => "unknown",
    }
}

categorical! {
    /// Highest completed education level
    EduLevel for Attribute::EduLevel => {
        Primary => "Podstawowe",
        Secondary => "Średnie",
        Higher => "Wyższe",
    }
}

categorical! {
    FavAnimals for Attribute::FavAnimals => {
        NoFavorites => "Brak ulubionych",
        Dogs => "Psy",
        Cats => "Koty",
        Other => "Inne",
        CatsAndDogs => "Koty i Psy",
    }
}

categorical! {
    FavPlace for Attribute::FavPlace => {
        ByTheWater => "Nad wodą",
        InTheForest => "W lesie",
        InTheMountains => "W górach",
        Other => "Inne",
    }
}

categorical! {
    Gender for Attribute::Gender => {
        Male => "Mężczyzna",
        Female => "Kobieta",
    }
}

/// Anything the classifier can read attribute values from
pub trait Observation {
    /// Option literal for `attribute`, or `None` when the value is missing
    fn value(&self, attribute: Attribute) -> Option<&'static str>;
}

/// One complete set of answers submitted through the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub age: AgeBracket,
    pub edu_level: EduLevel,
    pub fav_animals: FavAnimals,
    pub fav_place: FavPlace,
    pub gender: Gender,
}

impl SurveyRecord {
    /// Replace one answer, parsing `value` as an option literal of `attribute`
    pub fn set(&mut self, attribute: Attribute, value: &str) -> Result<(), ParseCategoryError> {
        match attribute {
            Attribute::Age => self.age = value.parse()?,
            Attribute::EduLevel => self.edu_level = value.parse()?,
            Attribute::FavAnimals => self.fav_animals = value.parse()?,
            Attribute::FavPlace => self.fav_place = value.parse()?,
            Attribute::Gender => self.gender = value.parse()?,
        }
        Ok(())
    }
}

/// The first option of every question, as a freshly opened form shows it
impl Default for SurveyRecord {
    fn default() -> Self {
        Self {
            age: AgeBracket::Under18,
            edu_level: EduLevel::Primary,
            fav_animals: FavAnimals::NoFavorites,
            fav_place: FavPlace::ByTheWater,
            gender: Gender::Male,
        }
    }
}

impl Observation for SurveyRecord {
    fn value(&self, attribute: Attribute) -> Option<&'static str> {
        Some(match attribute {
            Attribute::Age => self.age.as_str(),
            Attribute::EduLevel => self.edu_level.as_str(),
            Attribute::FavAnimals => self.fav_animals.as_str(),
            Attribute::FavPlace => self.fav_place.as_str(),
            Attribute::Gender => self.gender.as_str(),
        })
    }
}

/// A row of the population survey; any answer may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    pub age: Option<AgeBracket>,
    pub edu_level: Option<EduLevel>,
    pub fav_animals: Option<FavAnimals>,
    pub fav_place: Option<FavPlace>,
    pub gender: Option<Gender>,
}

impl Respondent {
    /// Parse raw cells given in [`Attribute::ALL`] order
    pub fn from_cells(cells: [Option<&str>; 5]) -> Result<Self, ParseCategoryError> {
        let [age, edu_level, fav_animals, fav_place, gender] = cells;
        Ok(Self {
            age: parse_optional(age)?,
            edu_level: parse_optional(edu_level)?,
            fav_animals: parse_optional(fav_animals)?,
            fav_place: parse_optional(fav_place)?,
            gender: parse_optional(gender)?,
        })
    }
}

impl From<SurveyRecord> for Respondent {
    fn from(record: SurveyRecord) -> Self {
        Self {
            age: Some(record.age),
            edu_level: Some(record.edu_level),
            fav_animals: Some(record.fav_animals),
            fav_place: Some(record.fav_place),
            gender: Some(record.gender),
        }
    }
}

impl Observation for Respondent {
    fn value(&self, attribute: Attribute) -> Option<&'static str> {
        match attribute {
            Attribute::Age => self.age.map(AgeBracket::as_str),
            Attribute::EduLevel => self.edu_level.map(EduLevel::as_str),
            Attribute::FavAnimals => self.fav_animals.map(FavAnimals::as_str),
            Attribute::FavPlace => self.fav_place.map(FavPlace::as_str),
            Attribute::Gender => self.gender.map(Gender::as_str),
        }
    }
}

/// Empty and blank cells are missing answers
fn parse_optional<T>(raw: Option<&str>) -> Result<Option<T>, ParseCategoryError>
where
    T: FromStr<Err = ParseCategoryError>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}
