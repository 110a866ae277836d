use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{InterestFields, PersonalityTraits, Profile, ProfileId, QuestionAnswers};

#[derive(Debug)]
pub enum ProfileImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    DuplicateProfile(ProfileId),
    MissingProfileId { line: usize },
}

impl std::fmt::Display for ProfileImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileImportError::Io(err) => write!(f, "failed to read profile export: {}", err),
            ProfileImportError::Csv(err) => write!(f, "invalid profile CSV data: {}", err),
            ProfileImportError::DuplicateProfile(id) => {
                write!(f, "profile {} appears more than once in the export", id)
            }
            ProfileImportError::MissingProfileId { line } => {
                write!(f, "row on line {} has no profile id", line)
            }
        }
    }
}

impl std::error::Error for ProfileImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileImportError::Io(err) => Some(err),
            ProfileImportError::Csv(err) => Some(err),
            ProfileImportError::DuplicateProfile(_)
            | ProfileImportError::MissingProfileId { .. } => None,
        }
    }
}

impl From<std::io::Error> for ProfileImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ProfileImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads profiles from a CSV export of the profiles table.
pub struct ProfileCsvImporter;

impl ProfileCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>, ProfileImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Profile>, ProfileImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();

        for (index, record) in csv_reader.deserialize::<ProfileRow>().enumerate() {
            let row = record?;
            if row.id.trim().is_empty() {
                // header occupies line 1
                return Err(ProfileImportError::MissingProfileId { line: index + 2 });
            }
            let profile = row.into_profile();
            if !seen.insert(profile.id.clone()) {
                return Err(ProfileImportError::DuplicateProfile(profile.id));
            }
            profiles.push(profile);
        }

        Ok(profiles)
    }
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    zodiac_sign: Option<String>,
    #[serde(default)]
    mind: Option<f64>,
    #[serde(default)]
    energy: Option<f64>,
    #[serde(default)]
    nature: Option<f64>,
    #[serde(default)]
    tactics: Option<f64>,
    #[serde(default)]
    age: Option<u16>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    hobbies: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    free_time: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bio: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    music_genres: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    music_artists: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    streaming_channels: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    video_subscriptions: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    question_one: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    question_two: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    question_three: Option<String>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: ProfileId(self.id),
            zodiac_sign: self.zodiac_sign,
            personality: PersonalityTraits {
                mind: self.mind,
                energy: self.energy,
                nature: self.nature,
                tactics: self.tactics,
            },
            age: self.age,
            interests: InterestFields {
                hobbies: self.hobbies,
                free_time: self.free_time,
                bio: self.bio,
                music_genres: self.music_genres,
                music_artists: self.music_artists,
                streaming_channels: self.streaming_channels,
                video_subscriptions: self.video_subscriptions,
            },
            answers: QuestionAnswers {
                question_one: self.question_one,
                question_two: self.question_two,
                question_three: self.question_three,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "id,zodiac_sign,mind,energy,nature,tactics,age,hobbies,free_time,bio,music_genres,music_artists,streaming_channels,video_subscriptions,question_one,question_two,question_three";

    #[test]
    fn empty_cells_become_absent_fields() {
        let csv = format!("{HEADER}\nlucia,♌ Leone,50,,70,,29,trekking,,,jazz,,,,,,\n");
        let profiles = ProfileCsvImporter::from_reader(Cursor::new(csv)).expect("csv parses");

        assert_eq!(profiles.len(), 1);
        let lucia = &profiles[0];
        assert_eq!(lucia.id, ProfileId::new("lucia"));
        assert_eq!(lucia.zodiac_sign.as_deref(), Some("♌ Leone"));
        assert_eq!(lucia.personality.mind, Some(50.0));
        assert_eq!(lucia.personality.energy, None);
        assert_eq!(lucia.age, Some(29));
        assert_eq!(lucia.interests.hobbies.as_deref(), Some("trekking"));
        assert_eq!(lucia.interests.bio, None);
        assert_eq!(lucia.answers.question_one, None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let csv = format!("{HEADER}\nmarco,,,,,,,,,,,,,,,,\nmarco,,,,,,,,,,,,,,,,\n");
        match ProfileCsvImporter::from_reader(Cursor::new(csv)) {
            Err(ProfileImportError::DuplicateProfile(id)) => assert_eq!(id.as_str(), "marco"),
            other => panic!("expected duplicate profile error, got {other:?}"),
        }
    }

    #[test]
    fn blank_ids_are_rejected_with_their_line() {
        let csv = format!("{HEADER}\nmarco,,,,,,,,,,,,,,,,\n  ,Leone,,,,,,,,,,,,,,,\n");
        match ProfileCsvImporter::from_reader(Cursor::new(csv)) {
            Err(ProfileImportError::MissingProfileId { line }) => assert_eq!(line, 3),
            other => panic!("expected missing profile id error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_numbers_surface_csv_errors() {
        let csv = format!("{HEADER}\nmarco,,tanto,,,,,,,,,,,,,,\n");
        assert!(matches!(
            ProfileCsvImporter::from_reader(Cursor::new(csv)),
            Err(ProfileImportError::Csv(_))
        ));
    }
}
