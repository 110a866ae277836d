use super::super::domain::{InterestFields, PairKey, Profile};
use super::config::EstimatorConfig;
use super::tokens::{shared_token_count, tokenize};
use super::{AffinityFactor, ScoreComponent};

pub(crate) fn score_pair(
    a: &Profile,
    b: &Profile,
    config: &EstimatorConfig,
) -> (Vec<ScoreComponent>, i32) {
    let (a, b) = if a.id <= b.id { (a, b) } else { (b, a) };
    let mut components = Vec::new();

    let offset = chemistry_offset(&PairKey::for_profiles(a, b), config);
    components.push(ScoreComponent {
        factor: AffinityFactor::Chemistry,
        score: offset,
        notes: format!("pair chemistry offset {offset:+}"),
    });

    if let Some(component) = zodiac_component(a, b, config) {
        components.push(component);
    }
    if let Some(component) = personality_component(a, b, config) {
        components.push(component);
    }
    if let Some(component) = age_component(a, b, config) {
        components.push(component);
    }
    if let Some(component) = interest_component(a, b, config) {
        components.push(component);
    }
    if let Some(component) = answers_component(a, b, config) {
        components.push(component);
    }

    let total = config.base_score
        + components
            .iter()
            .map(|component| component.score)
            .sum::<i32>();

    (components, total)
}

/// Deterministic per-pair offset in `[-modulus/2, modulus/2]`.
pub(crate) fn chemistry_offset(pair: &PairKey, config: &EstimatorConfig) -> i32 {
    let modulus = config.chemistry_modulus.max(1);
    let hash = pair
        .joined()
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        });
    hash.rem_euclid(modulus) - modulus / 2
}

fn zodiac_component(
    a: &Profile,
    b: &Profile,
    config: &EstimatorConfig,
) -> Option<ScoreComponent> {
    let (left, right) = (a.sign()?, b.sign()?);
    let (le, re) = (left.element(), right.element());

    let (score, relation) = if le == re {
        (config.same_element_bonus, "same element")
    } else if le.complements(re) {
        (config.complementary_element_bonus, "complementary elements")
    } else {
        (-config.clashing_element_penalty, "clashing elements")
    };

    Some(ScoreComponent {
        factor: AffinityFactor::Zodiac,
        score,
        notes: format!("{relation}: {le:?} / {re:?}"),
    })
}

fn personality_component(
    a: &Profile,
    b: &Profile,
    config: &EstimatorConfig,
) -> Option<ScoreComponent> {
    let divisor = if config.personality_distance_divisor > 0.0 {
        config.personality_distance_divisor
    } else {
        1.0
    };

    let mut available = 0usize;
    let mut sum = 0.0;
    for (left, right) in a
        .personality
        .dimensions()
        .into_iter()
        .zip(b.personality.dimensions())
    {
        let (Some(left), Some(right)) = (normalize_dimension(left), normalize_dimension(right))
        else {
            continue;
        };
        available += 1;
        sum += config.personality_max_per_dimension - (left - right).abs() / divisor;
    }

    if available == 0 {
        return None;
    }

    // Missing dimensions shrink both the sum and the scale factor.
    let score = round_half_up(sum * available as f64 / 4.0);
    Some(ScoreComponent {
        factor: AffinityFactor::Personality,
        score,
        notes: format!("{available} of 4 personality dimensions compared"),
    })
}

fn normalize_dimension(value: Option<f64>) -> Option<f64> {
    value
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0))
}

fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

fn age_component(a: &Profile, b: &Profile, config: &EstimatorConfig) -> Option<ScoreComponent> {
    let gap = a.age?.abs_diff(b.age?);
    if gap <= config.age_gap_tolerance {
        return None;
    }

    let excess = i32::from(gap - config.age_gap_tolerance);
    let penalty = excess
        .saturating_mul(config.age_penalty_per_year)
        .min(config.age_penalty_cap);

    Some(ScoreComponent {
        factor: AffinityFactor::AgeGap,
        score: -penalty,
        notes: format!("age gap of {gap} years"),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterestCategory {
    Streaming,
    Music,
    Hobbies,
}

impl InterestCategory {
    const ALL: [InterestCategory; 3] = [
        InterestCategory::Streaming,
        InterestCategory::Music,
        InterestCategory::Hobbies,
    ];

    fn texts(self, fields: &InterestFields) -> Vec<&str> {
        let sources = match self {
            InterestCategory::Streaming => {
                vec![&fields.streaming_channels, &fields.video_subscriptions]
            }
            InterestCategory::Music => vec![&fields.music_genres, &fields.music_artists],
            InterestCategory::Hobbies => vec![&fields.hobbies, &fields.free_time, &fields.bio],
        };
        sources
            .into_iter()
            .filter_map(|text| text.as_deref())
            .collect()
    }
}

fn interest_component(
    a: &Profile,
    b: &Profile,
    config: &EstimatorConfig,
) -> Option<ScoreComponent> {
    let mut total_matches = 0;
    let mut per_category = Vec::new();
    for category in InterestCategory::ALL {
        let left = tokenize(category.texts(&a.interests), config);
        let right = tokenize(category.texts(&b.interests), config);
        let shared = shared_token_count(&left, &right);
        if shared > 0 {
            per_category.push(format!("{category:?} {shared}"));
        }
        total_matches += shared;
    }

    if total_matches == 0 {
        return None;
    }

    Some(ScoreComponent {
        factor: AffinityFactor::SharedInterests,
        score: config.interests.points_for(total_matches),
        notes: format!(
            "{total_matches} shared interest keyword(s) ({})",
            per_category.join(", ")
        ),
    })
}

fn answers_component(
    a: &Profile,
    b: &Profile,
    config: &EstimatorConfig,
) -> Option<ScoreComponent> {
    let left = tokenize(a.answers.iter(), config);
    let right = tokenize(b.answers.iter(), config);
    let shared = shared_token_count(&left, &right);
    if shared == 0 {
        return None;
    }

    Some(ScoreComponent {
        factor: AffinityFactor::SharedAnswers,
        score: config.questions.points_for(shared),
        notes: format!("{shared} shared keyword(s) across question answers"),
    })
}
