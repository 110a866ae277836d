use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a member profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subset of a member profile that feeds the compatibility estimate.
///
/// Every field apart from the identifier is optional; absent fields simply
/// contribute nothing to the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    #[serde(default)]
    pub zodiac_sign: Option<String>,
    #[serde(default)]
    pub personality: PersonalityTraits,
    #[serde(default)]
    pub age: Option<u16>,
    #[serde(default)]
    pub interests: InterestFields,
    #[serde(default)]
    pub answers: QuestionAnswers,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProfileId::new(id),
            ..Self::default()
        }
    }

    /// Parsed zodiac sign, `None` when absent or not one of the twelve signs.
    pub fn sign(&self) -> Option<ZodiacSign> {
        self.zodiac_sign.as_deref().and_then(ZodiacSign::from_label)
    }
}

/// Personality dimensions on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    #[serde(default)]
    pub mind: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub nature: Option<f64>,
    #[serde(default)]
    pub tactics: Option<f64>,
}

impl PersonalityTraits {
    pub fn uniform(value: f64) -> Self {
        Self {
            mind: Some(value),
            energy: Some(value),
            nature: Some(value),
            tactics: Some(value),
        }
    }

    pub(crate) fn dimensions(&self) -> [Option<f64>; 4] {
        [self.mind, self.energy, self.nature, self.tactics]
    }
}

/// Free-text interest fields, grouped into scoring categories by the estimator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestFields {
    #[serde(default)]
    pub hobbies: Option<String>,
    #[serde(default)]
    pub free_time: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub music_genres: Option<String>,
    #[serde(default)]
    pub music_artists: Option<String>,
    #[serde(default)]
    pub streaming_channels: Option<String>,
    #[serde(default)]
    pub video_subscriptions: Option<String>,
}

/// Answers to the three free-text profile questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswers {
    #[serde(default)]
    pub question_one: Option<String>,
    #[serde(default)]
    pub question_two: Option<String>,
    #[serde(default)]
    pub question_three: Option<String>,
}

impl QuestionAnswers {
    pub(crate) fn iter(&self) -> impl Iterator<Item = &str> {
        [&self.question_one, &self.question_two, &self.question_three]
            .into_iter()
            .filter_map(|answer| answer.as_deref())
    }
}

/// The four classical elements used to group zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Air,
    Earth,
    Water,
}

impl Element {
    /// Fire pairs with Air, Earth pairs with Water.
    pub fn complements(self, other: Element) -> bool {
        matches!(
            (self, other),
            (Element::Fire, Element::Air)
                | (Element::Air, Element::Fire)
                | (Element::Earth, Element::Water)
                | (Element::Water, Element::Earth)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Parses labels as stored on profiles, e.g. `"♌ Leone"`, `"leone"` or `"Leo"`.
    pub fn from_label(raw: &str) -> Option<Self> {
        let name: String = raw
            .chars()
            .filter(|ch| ch.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();

        let sign = match name.as_str() {
            "ariete" | "aries" => ZodiacSign::Aries,
            "toro" | "taurus" => ZodiacSign::Taurus,
            "gemelli" | "gemini" => ZodiacSign::Gemini,
            "cancro" | "cancer" => ZodiacSign::Cancer,
            "leone" | "leo" => ZodiacSign::Leo,
            "vergine" | "virgo" => ZodiacSign::Virgo,
            "bilancia" | "libra" => ZodiacSign::Libra,
            "scorpione" | "scorpio" => ZodiacSign::Scorpio,
            "sagittario" | "sagittarius" => ZodiacSign::Sagittarius,
            "capricorno" | "capricorn" => ZodiacSign::Capricorn,
            "acquario" | "aquarius" => ZodiacSign::Aquarius,
            "pesci" | "pisces" => ZodiacSign::Pisces,
            _ => return None,
        };
        Some(sign)
    }

    pub fn element(self) -> Element {
        match self {
            ZodiacSign::Aries | ZodiacSign::Leo | ZodiacSign::Sagittarius => Element::Fire,
            ZodiacSign::Taurus | ZodiacSign::Virgo | ZodiacSign::Capricorn => Element::Earth,
            ZodiacSign::Gemini | ZodiacSign::Libra | ZodiacSign::Aquarius => Element::Air,
            ZodiacSign::Cancer | ZodiacSign::Scorpio | ZodiacSign::Pisces => Element::Water,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "♈ Ariete",
            ZodiacSign::Taurus => "♉ Toro",
            ZodiacSign::Gemini => "♊ Gemelli",
            ZodiacSign::Cancer => "♋ Cancro",
            ZodiacSign::Leo => "♌ Leone",
            ZodiacSign::Virgo => "♍ Vergine",
            ZodiacSign::Libra => "♎ Bilancia",
            ZodiacSign::Scorpio => "♏ Scorpione",
            ZodiacSign::Sagittarius => "♐ Sagittario",
            ZodiacSign::Capricorn => "♑ Capricorno",
            ZodiacSign::Aquarius => "♒ Acquario",
            ZodiacSign::Pisces => "♓ Pesci",
        }
    }
}

/// Canonical, order-independent identifier for a pair of profiles.
///
/// Equality and hashing use the two sorted ids, so identifiers containing
/// [`PairKey::SEPARATOR`] never make distinct pairs collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(ProfileId, ProfileId)")]
pub struct PairKey(ProfileId, ProfileId);

impl PairKey {
    pub const SEPARATOR: char = '_';

    pub fn new(a: &ProfileId, b: &ProfileId) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self(low.clone(), high.clone())
    }

    pub fn for_profiles(a: &Profile, b: &Profile) -> Self {
        Self::new(&a.id, &b.id)
    }

    /// Both ids, lowest first.
    pub fn ids(&self) -> (&ProfileId, &ProfileId) {
        (&self.0, &self.1)
    }

    pub fn contains(&self, id: &ProfileId) -> bool {
        self.0 == *id || self.1 == *id
    }

    /// Sorted ids joined with the separator. Only the chemistry hash and
    /// human-facing output read this form.
    pub fn joined(&self) -> String {
        format!("{}{}{}", self.0, Self::SEPARATOR, self.1)
    }
}

impl From<(ProfileId, ProfileId)> for PairKey {
    fn from((a, b): (ProfileId, ProfileId)) -> Self {
        Self::new(&a, &b)
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0, Self::SEPARATOR, self.1)
    }
}

/// Which tier produced a displayed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOrigin {
    Estimated,
    Confirmed,
}

impl ScoreOrigin {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreOrigin::Estimated => "Estimated",
            ScoreOrigin::Confirmed => "Confirmed",
        }
    }
}

/// Score shown for a pair together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub origin: ScoreOrigin,
}

impl CompatibilityResult {
    pub fn estimated(score: u8) -> Self {
        Self {
            score,
            explanation: None,
            origin: ScoreOrigin::Estimated,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.origin == ScoreOrigin::Confirmed
    }
}

/// Authoritative record persisted by the score store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedScore {
    pub pair: PairKey,
    pub score: u8,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ConfirmedScore> for CompatibilityResult {
    fn from(record: ConfirmedScore) -> Self {
        Self {
            score: record.score,
            explanation: record.explanation,
            origin: ScoreOrigin::Confirmed,
        }
    }
}
