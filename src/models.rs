use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{
    entities::{box_office, movie},
    error::AppError,
};

pub const MISSING_REQUIRED_FIELDS: &str = "Title, Year, and Industry ID required";
pub const NO_UPDATABLE_FIELDS: &str = "No updatable fields provided";
pub const INVALID_YEARS: &str = "Start Year and End Year must be valid integers.";
pub const MISSING_NAMES: &str = "At least one name is required.";

/// One row of the movie search listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieRecord {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub duration: Option<i32>,
    pub rating: Option<f64>,
    pub plot: Option<String>,
    pub industry: String,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub genres: Option<String>,
    pub cast_crew: Option<String>,
    pub awards: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromQueryResult)]
pub struct CollaborationMovie {
    #[serde(rename = "Movie_ID")]
    pub movie_id: i32,
    pub title: String,
    pub year: i32,
    pub industries: String,
}

#[derive(Debug, Serialize)]
pub struct FilmographyResponse {
    pub count: usize,
    pub movies: Vec<CollaborationMovie>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    #[serde(rename = "Movie_ID")]
    pub movie_id: i32,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FilmographyQuery {
    pub names: Option<String>,
    pub start_year: Option<String>,
    pub end_year: Option<String>,
}

/// Validated filmography search parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collaboration {
    pub names: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
}

impl FilmographyQuery {
    /// Years are checked before names so a request with both problems reports the years.
    pub fn validate(&self) -> Result<Collaboration, AppError> {
        let parse_year = |raw: &Option<String>| raw.as_deref().and_then(|s| s.trim().parse::<i32>().ok());
        let (Some(start_year), Some(end_year)) = (parse_year(&self.start_year), parse_year(&self.end_year))
        else {
            return Err(AppError::BadRequest(INVALID_YEARS.to_string()));
        };

        let names = split_list(self.names.as_deref().unwrap_or_default());
        if names.is_empty() {
            return Err(AppError::BadRequest(MISSING_NAMES.to_string()));
        }

        Ok(Collaboration { names, start_year, end_year })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub duration: Option<i32>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub industry: Option<i32>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient_float")]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastCredit {
    pub name: String,
    pub role: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub duration: Option<i32>,
    pub rating: Option<f64>,
    pub plot: Option<String>,
    pub industry_id: i32,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub genres: Vec<String>,
    pub cast: Vec<CastCredit>,
    pub awards: Vec<String>,
}

impl CreateMovieRequest {
    pub fn validate(self) -> Result<NewMovie, AppError> {
        let title = self.title.filter(|t| !t.trim().is_empty());
        let year = self.year.filter(|&y| y != 0);
        let industry_id = self.industry.filter(|&i| i != 0);
        let (Some(title), Some(year), Some(industry_id)) = (title, year, industry_id) else {
            return Err(AppError::BadRequest(MISSING_REQUIRED_FIELDS.to_string()));
        };

        Ok(NewMovie {
            title,
            year,
            duration: self.duration,
            rating: self.rating,
            plot: self.plot,
            industry_id,
            budget: self.budget,
            revenue: self.revenue,
            genres: split_list(self.genres.as_deref().unwrap_or_default()),
            cast: parse_cast(self.cast.as_deref().unwrap_or_default()),
            awards: split_list(self.awards.as_deref().unwrap_or_default()),
        })
    }
}

/// Splits a comma-separated list, trimming entries and dropping blanks and repeats.
pub fn split_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Parses `"Name: Role, Name: Role"`. Entries without exactly one colon or with a
/// blank name are skipped.
pub fn parse_cast(raw: &str) -> Vec<CastCredit> {
    let mut out: Vec<CastCredit> = Vec::new();
    for entry in raw.split(',') {
        let parts: Vec<&str> = entry.split(':').collect();
        let [name, role] = parts.as_slice() else {
            continue;
        };
        let credit = CastCredit { name: name.trim().to_string(), role: role.trim().to_string() };
        if credit.name.is_empty() || out.contains(&credit) {
            continue;
        }
        out.push(credit);
    }
    out
}

/// The fields a client may change through the update endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MovieField {
    Title,
    Year,
    Duration,
    Rating,
    Plot,
    Industry,
    Budget,
    Revenue,
}

#[derive(Clone, Copy, Debug)]
pub enum FieldTarget {
    Movie(movie::Column),
    BoxOffice(box_office::Column),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FieldKind {
    Text,
    Integer,
    Decimal,
}

impl MovieField {
    pub const ALL: [MovieField; 8] = [
        MovieField::Title,
        MovieField::Year,
        MovieField::Duration,
        MovieField::Rating,
        MovieField::Plot,
        MovieField::Industry,
        MovieField::Budget,
        MovieField::Revenue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MovieField::Title => "title",
            MovieField::Year => "year",
            MovieField::Duration => "duration",
            MovieField::Rating => "rating",
            MovieField::Plot => "plot",
            MovieField::Industry => "industry",
            MovieField::Budget => "budget",
            MovieField::Revenue => "revenue",
        }
    }

    pub fn target(self) -> FieldTarget {
        match self {
            MovieField::Title => FieldTarget::Movie(movie::Column::TitleEnglish),
            MovieField::Year => FieldTarget::Movie(movie::Column::ReleaseYear),
            MovieField::Duration => FieldTarget::Movie(movie::Column::DurationMin),
            MovieField::Rating => FieldTarget::Movie(movie::Column::ImdbRating),
            MovieField::Plot => FieldTarget::Movie(movie::Column::PlotSummary),
            MovieField::Industry => FieldTarget::Movie(movie::Column::IndustryId),
            MovieField::Budget => FieldTarget::BoxOffice(box_office::Column::BudgetInrCr),
            MovieField::Revenue => FieldTarget::BoxOffice(box_office::Column::RevenueInrCr),
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            MovieField::Title | MovieField::Plot => FieldKind::Text,
            MovieField::Year | MovieField::Duration | MovieField::Industry => FieldKind::Integer,
            MovieField::Rating | MovieField::Budget | MovieField::Revenue => FieldKind::Decimal,
        }
    }

    fn to_value(self, raw: &JsonValue) -> Result<Value, String> {
        match self.kind() {
            FieldKind::Text => match raw {
                JsonValue::Null => Ok(Option::<String>::None.into()),
                JsonValue::String(s) => Ok(Some(s.clone()).into()),
                JsonValue::Number(n) => Ok(Some(n.to_string()).into()),
                _ => Err(format!("{} must be a string", self.key())),
            },
            FieldKind::Integer => {
                json_to_i32(raw).map(Value::from).map_err(|_| format!("{} must be an integer", self.key()))
            },
            FieldKind::Decimal => {
                json_to_f64(raw).map(Value::from).map_err(|_| format!("{} must be a number", self.key()))
            },
        }
    }
}

/// Column assignments for an update, split by the table they land in.
#[derive(Clone, Debug, Default)]
pub struct MovieUpdate {
    pub movie: Vec<(movie::Column, Value)>,
    pub box_office: Vec<(box_office::Column, Value)>,
}

impl MovieUpdate {
    /// Keys outside [`MovieField::ALL`] are ignored; a present `null` clears the column.
    pub fn from_json(body: &Map<String, JsonValue>) -> Result<Self, AppError> {
        let mut update = MovieUpdate::default();
        for field in MovieField::ALL {
            let Some(raw) = body.get(field.key()) else {
                continue;
            };
            let value = field.to_value(raw).map_err(AppError::BadRequest)?;
            match field.target() {
                FieldTarget::Movie(col) => update.movie.push((col, value)),
                FieldTarget::BoxOffice(col) => update.box_office.push((col, value)),
            }
        }

        if update.movie.is_empty() && update.box_office.is_empty() {
            return Err(AppError::BadRequest(NO_UPDATABLE_FIELDS.to_string()));
        }
        Ok(update)
    }
}

fn json_to_i32(raw: &JsonValue) -> Result<Option<i32>, ()> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => {
            let wide = match n.as_i64() {
                Some(i) => i,
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => f as i64,
                    _ => return Err(()),
                },
            };
            i32::try_from(wide).map(Some).map_err(|_| ())
        },
        JsonValue::String(s) if s.trim().is_empty() => Ok(None),
        JsonValue::String(s) => s.trim().parse::<i32>().map(Some).map_err(|_| ()),
        _ => Err(()),
    }
}

fn json_to_f64(raw: &JsonValue) -> Result<Option<f64>, ()> {
    match raw {
        JsonValue::Null => Ok(None),
        JsonValue::Number(n) => n.as_f64().map(Some).ok_or(()),
        JsonValue::String(s) if s.trim().is_empty() => Ok(None),
        JsonValue::String(s) => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Some(f)),
            _ => Err(()),
        },
        _ => Err(()),
    }
}

// Form-driven clients send numbers as strings, so accept either.
fn lenient_int<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i32>, D::Error> {
    let raw = JsonValue::deserialize(de)?;
    json_to_i32(&raw).map_err(|_| serde::de::Error::custom(format!("expected an integer, got {raw}")))
}

fn lenient_float<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    let raw = JsonValue::deserialize(de)?;
    json_to_f64(&raw).map_err(|_| serde::de::Error::custom(format!("expected a number, got {raw}")))
}
