//! Command-line interface definitions and argument parsing

use crate::data::{DataPaths, DEFAULT_DATA_PATH, DEFAULT_METADATA_PATH, DEFAULT_MODEL_PATH};
use crate::survey::{AgeBracket, Attribute, EduLevel, FavAnimals, FavPlace, Gender, SurveyRecord};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Find the survey group closest to your answers and see who is in it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Age bracket: <18, 18-24, 25-34, 35-44, 45-54, 55-64, >=65, unknown
    #[arg(long, default_value = "<18")]
    pub age: AgeBracket,

    /// Education level: Podstawowe, Średnie, Wyższe
    #[arg(long, default_value = "Podstawowe")]
    pub edu_level: EduLevel,

    /// Favorite animals: "Brak ulubionych", Psy, Koty, Inne, "Koty i Psy"
    #[arg(long, default_value = "Brak ulubionych")]
    pub fav_animals: FavAnimals,

    /// Favorite place: "Nad wodą", "W lesie", "W górach", Inne
    #[arg(long, default_value = "Nad wodą")]
    pub fav_place: FavPlace,

    /// Gender: Mężczyzna, Kobieta
    #[arg(long, default_value = "Mężczyzna")]
    pub gender: Gender,

    /// Path to the clustering model artifact
    #[arg(long, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Path to the semicolon separated survey file
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Path to the cluster names and descriptions file
    #[arg(long, default_value = DEFAULT_METADATA_PATH)]
    pub metadata: PathBuf,

    /// Directory to save one PNG chart per answer distribution
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format for the group summary
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Read `field=value` updates from stdin and refresh the view after each one
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// The form as filled in on the command line
    pub fn survey_record(&self) -> SurveyRecord {
        SurveyRecord {
            age: self.age,
            edu_level: self.edu_level,
            fav_animals: self.fav_animals,
            fav_place: self.fav_place,
            gender: self.gender,
        }
    }

    pub fn data_paths(&self) -> DataPaths {
        DataPaths {
            model: self.model.clone(),
            data: self.data.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// Parse one interactive update of the form
/// Expected format: "field=value", e.g. "fav_place=W górach"
pub fn parse_field_assignment(line: &str) -> crate::Result<(Attribute, &str)> {
    let Some((field, value)) = line.split_once('=') else {
        anyhow::bail!("Update must be in format 'field=value'");
    };

    let attribute: Attribute = field.parse()?;
    let value = value.trim();
    if value.is_empty() {
        anyhow::bail!("Missing value for field '{}'", attribute);
    }

    Ok((attribute, value))
}
