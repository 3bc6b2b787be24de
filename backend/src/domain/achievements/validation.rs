//! Field-level validation helpers shared by achievement constructors.

use std::collections::HashSet;

use serde_json::Value;

use super::{Achievement, AchievementValidationError};

const MAX_ID_LEN: usize = 64;

pub(super) fn is_valid_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_ID_LEN
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
}

pub(super) fn validate_non_empty_field(
    value: String,
    field: &'static str,
) -> Result<String, AchievementValidationError> {
    if value.trim().is_empty() {
        return Err(AchievementValidationError::EmptyField { field });
    }
    Ok(value)
}

pub(super) fn ensure_positive<T>(value: T, field: &'static str) -> Result<(), AchievementValidationError>
where
    T: PartialEq + Default,
{
    if value == T::default() {
        return Err(AchievementValidationError::ZeroThreshold { field });
    }
    Ok(())
}

/// Validate an untyped achievement record.
///
/// Missing required fields and wrong-typed fields are rejected; unknown
/// extra fields are ignored.
///
/// # Examples
/// ```
/// use fitquest::domain::achievements::parse_achievement;
/// use serde_json::json;
///
/// let parsed = parse_achievement(json!({
///     "id": "first-workout",
///     "name": "First Steps",
///     "description": "Complete your first workout",
///     "category": "WORKOUT",
///     "rank": "E",
///     "points": 10,
///     "xpReward": 25,
///     "iconName": "dumbbell",
///     "requirements": { "type": "total_count", "count": 1 },
///     "legacyColour": "green"
/// }));
/// assert!(parsed.is_ok());
/// ```
pub fn parse_achievement(value: Value) -> Result<Achievement, AchievementValidationError> {
    serde_json::from_value::<super::AchievementDraft>(value)
        .map_err(|err| AchievementValidationError::Malformed {
            message: err.to_string(),
        })?
        .try_into()
}

/// Validate a catalogue document: a JSON array of achievement records
/// with unique ids.
///
/// # Errors
///
/// The first invalid entry, wrapped with its position, or
/// [`AchievementValidationError::DuplicateId`].
pub fn parse_catalogue(value: Value) -> Result<Vec<Achievement>, AchievementValidationError> {
    let Value::Array(entries) = value else {
        return Err(AchievementValidationError::Malformed {
            message: "catalogue must be a JSON array".to_owned(),
        });
    };
    let mut seen = HashSet::with_capacity(entries.len());
    let mut parsed = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let achievement = parse_achievement(entry).map_err(|source| {
            AchievementValidationError::Entry {
                index,
                source: Box::new(source),
            }
        })?;
        if !seen.insert(achievement.id().clone()) {
            return Err(AchievementValidationError::DuplicateId {
                id: achievement.id().to_string(),
            });
        }
        parsed.push(achievement);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn valid() -> Value {
        json!({
            "id": "workouts-10",
            "name": "Getting Serious",
            "description": "Complete ten workouts",
            "category": "WORKOUT",
            "rank": "D",
            "points": 20,
            "xpReward": 50,
            "iconName": "medal",
            "requirements": { "type": "total_count", "count": 10 }
        })
    }

    fn without(mut value: Value, field: &str) -> Value {
        if let Some(map) = value.as_object_mut() {
            map.remove(field);
        }
        value
    }

    fn with(mut value: Value, field: &str, replacement: Value) -> Value {
        if let Some(map) = value.as_object_mut() {
            map.insert(field.to_owned(), replacement);
        }
        value
    }

    #[rstest]
    fn accepts_fully_formed_achievement(valid: Value) {
        let achievement = parse_achievement(valid).expect("valid achievement");
        assert_eq!(achievement.id().as_ref(), "workouts-10");
        assert_eq!(achievement.points(), 20);
    }

    #[rstest]
    fn accepts_unknown_extra_fields(valid: Value) {
        let value = with(valid, "seasonTag", json!("winter"));
        assert!(parse_achievement(value).is_ok());
    }

    #[rstest]
    #[case("name")]
    #[case("id")]
    #[case("category")]
    #[case("rank")]
    #[case("points")]
    #[case("requirements")]
    fn rejects_missing_required_field(valid: Value, #[case] field: &str) {
        let result = parse_achievement(without(valid, field));
        assert!(matches!(result, Err(AchievementValidationError::Malformed { .. })));
    }

    #[rstest]
    #[case("points", json!("10"))]
    #[case("xpReward", json!(-5))]
    #[case("name", json!(42))]
    fn rejects_wrong_typed_field(valid: Value, #[case] field: &str, #[case] replacement: Value) {
        assert!(parse_achievement(with(valid, field, replacement)).is_err());
    }

    #[rstest]
    fn rejects_unknown_category(valid: Value) {
        let result = parse_achievement(with(valid, "category", json!("SOCIAL_MEDIA")));
        assert!(result.is_err());
    }

    #[rstest]
    fn rejects_unknown_rank(valid: Value) {
        let result = parse_achievement(with(valid, "rank", json!("Z")));
        assert!(result.is_err());
    }

    #[rstest]
    fn rejects_blank_name(valid: Value) {
        let result = parse_achievement(with(valid, "name", json!("  ")));
        assert!(matches!(
            result,
            Err(AchievementValidationError::EmptyField { field: "achievement.name" })
        ));
    }

    #[rstest]
    #[case(json!({ "type": "streak" }))]
    #[case(json!({ "type": "xp", "count": 100 }))]
    #[case(json!({ "type": "guild", "value": 1 }))]
    #[case(json!({ "type": "teleport", "value": 1 }))]
    fn rejects_requirement_missing_its_field(valid: Value, #[case] requirement: Value) {
        assert!(parse_achievement(with(valid, "requirements", requirement)).is_err());
    }

    #[rstest]
    fn rejects_zero_threshold(valid: Value) {
        let value = with(valid, "requirements", json!({ "type": "level", "value": 0 }));
        assert!(matches!(
            parse_achievement(value),
            Err(AchievementValidationError::ZeroThreshold { .. })
        ));
    }

    #[rstest]
    #[case("ab", true)]
    #[case("pr_first", true)]
    #[case("Pr-First", false)]
    #[case("", false)]
    #[case("has space", false)]
    fn id_character_set(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(is_valid_id(raw), expected);
    }

    #[rstest]
    fn bundled_catalogue_is_valid() {
        let document: Value =
            serde_json::from_str(include_str!("../../../fixtures/achievements.json"))
                .expect("fixture is JSON");
        let catalogue = parse_catalogue(document).expect("fixture validates");
        assert!(catalogue.iter().any(|a| a.id().as_ref() == "first-workout"));
        assert!(catalogue.iter().any(|a| a.id().as_ref() == "weekly-5"));
    }

    #[rstest]
    fn catalogue_reports_the_failing_entry(valid: Value) {
        let broken = without(valid.clone(), "rank");
        let err = parse_catalogue(json!([valid, broken])).expect_err("second entry invalid");
        assert!(matches!(err, AchievementValidationError::Entry { index: 1, .. }));
    }

    #[rstest]
    fn catalogue_rejects_duplicate_ids(valid: Value) {
        let err = parse_catalogue(json!([valid.clone(), valid])).expect_err("duplicate");
        assert_eq!(
            err,
            AchievementValidationError::DuplicateId {
                id: "workouts-10".into()
            }
        );
    }

    #[rstest]
    fn catalogue_must_be_an_array(valid: Value) {
        assert!(matches!(
            parse_catalogue(valid),
            Err(AchievementValidationError::Malformed { .. })
        ));
    }
}
