use crate::services::catalog::{GENERAL_CARE, SYMPTOM_VOCABULARY};
use crate::services::query::contains_any;

struct Rule {
    triggers: &'static [&'static str],
    specializations: &'static [&'static str],
}

// Order matters: the first matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        triggers: &["pregnan", "prenatal", "antenatal"],
        specializations: &["Pregnancy Care", "ANC Care", "Postnatal Care"],
    },
    Rule {
        triggers: &["wound"],
        specializations: &["Wound Care"],
    },
    Rule {
        triggers: &["elder"],
        specializations: &["Elder Care"],
    },
];

/// Deterministic keyword backstop used when AI extraction produced nothing.
/// Always returns at least one specialization.
pub fn classify(normalized_query: &str) -> Vec<String> {
    let query = normalized_query.to_lowercase();

    RULES
        .iter()
        .find(|rule| contains_any(&query, rule.triggers))
        .map(|rule| rule.specializations.iter().map(|s| s.to_string()).collect())
        .unwrap_or_else(|| vec![GENERAL_CARE.to_string()])
}

/// Vocabulary words present in the query, in vocabulary order, without duplicates.
pub fn sniff_symptoms(normalized_query: &str) -> Vec<String> {
    let words: Vec<String> = normalized_query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    SYMPTOM_VOCABULARY
        .iter()
        .filter(|symptom| words.iter().any(|w| w == *symptom))
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pregnancy_rule_wins_over_wound() {
        assert_eq!(
            classify("i am pregnant and have a wound"),
            vec!["Pregnancy Care", "ANC Care", "Postnatal Care"]
        );
        assert_eq!(
            classify("PREGNANCY check"),
            vec!["Pregnancy Care", "ANC Care", "Postnatal Care"]
        );
    }

    #[test]
    fn wound_rule() {
        assert_eq!(classify("i have a wound"), vec!["Wound Care"]);
    }

    #[test]
    fn wound_beats_elder() {
        assert_eq!(classify("elderly father with a wound"), vec!["Wound Care"]);
    }

    #[test]
    fn elder_rule_covers_elderly() {
        assert_eq!(classify("care for my elderly mother"), vec!["Elder Care"]);
        assert_eq!(classify("elder care"), vec!["Elder Care"]);
    }

    #[test]
    fn default_is_general_care() {
        assert_eq!(classify("need help at home"), vec!["General Care"]);
        assert_eq!(classify(""), vec!["General Care"]);
    }

    #[test]
    fn sniff_symptoms_matches_whole_words() {
        assert_eq!(sniff_symptoms("fever and cough, painful"), vec!["fever", "cough"]);
        assert!(sniff_symptoms("need a nurse").is_empty());
    }
}
