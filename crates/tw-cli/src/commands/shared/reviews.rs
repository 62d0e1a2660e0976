use std::collections::BTreeMap;

use anyhow::Context;
use tw_core::responses::MentorReview;

/// Parse `<user>=<rating>[:<review>]` arguments into a review map.
///
/// The rating is only checked to be a number here; the 1..=5 range is
/// enforced per entry when the reflection is applied.
pub fn parse_reviews(raw: &[String]) -> anyhow::Result<BTreeMap<String, MentorReview>> {
    let mut reviews = BTreeMap::new();
    for entry in raw {
        let (user, rest) = entry
            .split_once('=')
            .with_context(|| format!("invalid review '{entry}': expected <user>=<rating>[:<review>]"))?;
        let (rating, review) = rest.split_once(':').unwrap_or((rest, ""));
        let rating: u8 = rating
            .trim()
            .parse()
            .with_context(|| format!("invalid rating in review '{entry}'"))?;
        if reviews
            .insert(
                user.trim().to_string(),
                MentorReview {
                    rating,
                    review: review.to_string(),
                },
            )
            .is_some()
        {
            anyhow::bail!("duplicate review for '{user}'");
        }
    }
    Ok(reviews)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_rating_and_optional_text() {
        let reviews = parse_reviews(&args(&["usr-a=3:clear: and kind", "usr-b=2"])).unwrap();
        assert_eq!(reviews["usr-a"].rating, 3);
        assert_eq!(reviews["usr-a"].review, "clear: and kind");
        assert_eq!(reviews["usr-b"].review, "");
    }

    #[test]
    fn out_of_range_rating_is_left_to_the_service() {
        let reviews = parse_reviews(&args(&["usr-a=9"])).unwrap();
        assert_eq!(reviews["usr-a"].rating, 9);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(parse_reviews(&args(&["usr-a"])).is_err());
        assert!(parse_reviews(&args(&["usr-a=great"])).is_err());
        assert!(parse_reviews(&args(&["usr-a=1", "usr-a=2"])).is_err());
    }
}
