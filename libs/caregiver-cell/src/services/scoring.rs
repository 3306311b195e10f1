use std::cmp::Ordering;

use crate::models::{Caregiver, Language, ScoredResult};
use crate::services::catalog::persona_name;

pub const BASE_SCORE: u32 = 30;
pub const SPECIALIZATION_MATCH_SCORE: u32 = 90;
pub const VERIFIED_BONUS: u32 = 5;
pub const SYMPTOM_HIT_BONUS: u32 = 5;
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStrategy {
    /// Base score, boolean specialization override, verification bonus.
    Simple,
    /// `Simple` plus a bonus per symptom mentioned in the caregiver's profile text.
    Keyword,
}

/// What a request is looking for. Built once per request, shared across candidates.
#[derive(Debug, Clone)]
pub struct MatchCriteria {
    pub specializations: Vec<String>,
    pub symptoms: Vec<String>,
    pub language: Language,
    pub ai_powered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breakdown {
    specialization_match: bool,
    symptom_hits: u32,
    score: u32,
}

// Blank labels never overlap; an empty string would otherwise match every label.
fn labels_overlap(have: &str, wanted: &[String]) -> bool {
    let have = have.trim().to_lowercase();
    !have.is_empty()
        && wanted.iter().any(|want| {
            let want = want.trim().to_lowercase();
            !want.is_empty() && (want.contains(&have) || have.contains(&want))
        })
}

/// Case-insensitive substring overlap in either direction.
pub fn specialization_overlap(caregiver: &Caregiver, wanted: &[String]) -> bool {
    caregiver.specializations.iter().any(|have| labels_overlap(have, wanted))
}

/// Number of distinct symptoms mentioned in the bio or specialization list.
pub fn symptom_hits(caregiver: &Caregiver, symptoms: &[String]) -> u32 {
    let mut haystack = caregiver.bio.clone().unwrap_or_default().to_lowercase();
    for specialization in &caregiver.specializations {
        haystack.push(' ');
        haystack.push_str(&specialization.to_lowercase());
    }

    let mut seen: Vec<String> = Vec::new();
    for symptom in symptoms {
        let symptom = symptom.trim().to_lowercase();
        if !symptom.is_empty() && !seen.contains(&symptom) && haystack.contains(&symptom) {
            seen.push(symptom);
        }
    }
    seen.len() as u32
}

fn breakdown(caregiver: &Caregiver, criteria: &MatchCriteria, strategy: RankingStrategy) -> Breakdown {
    let specialization_match = specialization_overlap(caregiver, &criteria.specializations);

    // The overlap replaces the base score; it is not added to it.
    let mut score = if specialization_match { SPECIALIZATION_MATCH_SCORE } else { BASE_SCORE };

    if caregiver.is_verified {
        score += VERIFIED_BONUS;
    }

    let hits = match strategy {
        RankingStrategy::Simple => 0,
        RankingStrategy::Keyword => symptom_hits(caregiver, &criteria.symptoms),
    };
    score = (score + hits * SYMPTOM_HIT_BONUS).min(MAX_SCORE);

    Breakdown { specialization_match, symptom_hits: hits, score }
}

pub fn score(caregiver: &Caregiver, criteria: &MatchCriteria, strategy: RankingStrategy) -> u32 {
    breakdown(caregiver, criteria, strategy).score
}

/// `"{first} {last}"`, or a persona name derived from the first specialization.
pub fn display_name(caregiver: &Caregiver) -> String {
    let full = format!("{} {}", caregiver.first_name.trim(), caregiver.last_name.trim());
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }

    let Some(primary) = caregiver.specializations.iter().map(|s| s.trim()).find(|s| !s.is_empty()) else {
        return "Care Specialist".to_string();
    };

    match persona_name(primary) {
        Some(name) => name.to_string(),
        None => {
            let first_word = primary.split_whitespace().next().unwrap_or(primary);
            format!("{} Specialist", first_word)
        }
    }
}

fn match_reason(caregiver: &Caregiver, criteria: &MatchCriteria, breakdown: &Breakdown) -> String {
    let matched: Vec<&str> = caregiver
        .specializations
        .iter()
        .map(String::as_str)
        .filter(|have| labels_overlap(have, &criteria.specializations))
        .collect();

    let mut reason = match (criteria.language, breakdown.specialization_match) {
        (Language::En, true) => format!("Specializes in {}", matched.join(", ")),
        (Language::Hi, true) => format!("{} में विशेषज्ञ", matched.join(", ")),
        (Language::En, false) => "Available verified caregiver".to_string(),
        (Language::Hi, false) => "उपलब्ध सत्यापित देखभालकर्ता".to_string(),
    };

    if breakdown.symptom_hits > 0 {
        match criteria.language {
            Language::En => reason.push_str(&format!("; experienced with {} of your symptoms", breakdown.symptom_hits)),
            Language::Hi => reason.push_str(&format!("; आपके {} लक्षणों का अनुभव", breakdown.symptom_hits)),
        }
    }

    if criteria.ai_powered {
        match criteria.language {
            Language::En => reason.push_str(" (AI match)"),
            Language::Hi => reason.push_str(" (एआई मिलान)"),
        }
    }

    reason
}

/// Scores every candidate, orders by score descending then id ascending, truncates to `limit`.
pub fn rank(
    candidates: &[Caregiver],
    criteria: &MatchCriteria,
    strategy: RankingStrategy,
    limit: usize,
) -> Vec<ScoredResult> {
    let mut results: Vec<ScoredResult> = candidates
        .iter()
        .map(|caregiver| {
            let breakdown = breakdown(caregiver, criteria, strategy);
            ScoredResult {
                display_name: display_name(caregiver),
                match_score: breakdown.score,
                match_reason: match_reason(caregiver, criteria, &breakdown),
                ai_powered: criteria.ai_powered,
                caregiver: caregiver.clone(),
            }
        })
        .collect();

    results.sort_by(compare_results);
    results.truncate(limit);
    results
}

/// Score descending, then caregiver id ascending.
pub fn compare_results(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| a.caregiver.id.cmp(&b.caregiver.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caregiver(id: &str, specializations: &[&str]) -> Caregiver {
        Caregiver {
            id: id.to_string(),
            first_name: "Asha".to_string(),
            last_name: "Nair".to_string(),
            specializations: specializations.iter().map(|s| s.to_string()).collect(),
            is_verified: true,
            is_active: true,
            ..Caregiver::default()
        }
    }

    fn criteria(specializations: &[&str], symptoms: &[&str]) -> MatchCriteria {
        MatchCriteria {
            specializations: specializations.iter().map(|s| s.to_string()).collect(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            language: Language::En,
            ai_powered: false,
        }
    }

    #[test]
    fn overlap_overrides_base_score() {
        let c = criteria(&["Wound Care"], &[]);
        assert_eq!(score(&caregiver("a", &["Wound Care"]), &c, RankingStrategy::Simple), 95);
        assert_eq!(score(&caregiver("b", &["Elder Care"]), &c, RankingStrategy::Simple), 35);
    }

    #[test]
    fn overlap_is_bidirectional_substring() {
        let c = criteria(&["Pregnancy Care"], &[]);
        assert!(specialization_overlap(&caregiver("a", &["pregnancy"]), &c.specializations));
        let c = criteria(&["Wound"], &[]);
        assert!(specialization_overlap(&caregiver("a", &["Advanced Wound Care"]), &c.specializations));
    }

    #[test]
    fn blank_labels_never_match() {
        let c = criteria(&["Wound Care"], &[]);
        assert_eq!(score(&caregiver("a", &[""]), &c, RankingStrategy::Simple), 35);
        assert_eq!(score(&caregiver("b", &["  "]), &c, RankingStrategy::Simple), 35);

        let blank_wanted = criteria(&[""], &[]);
        assert_eq!(score(&caregiver("c", &["Wound Care"]), &blank_wanted, RankingStrategy::Simple), 35);
    }

    #[test]
    fn multiple_matches_do_not_accumulate() {
        let c = criteria(&["Pregnancy Care", "ANC Care", "Postnatal Care"], &[]);
        let many = caregiver("a", &["Pregnancy Care", "ANC Care", "Postnatal Care"]);
        assert_eq!(score(&many, &c, RankingStrategy::Simple), 95);
    }

    #[test]
    fn simple_scores_are_two_valued() {
        let c = criteria(&["Elder Care"], &["fever"]);
        let pool = vec![
            caregiver("a", &["Elder Care", "Wound Care"]),
            caregiver("b", &[]),
            caregiver("c", &["Physiotherapy"]),
            caregiver("d", &["elder"]),
        ];
        for result in rank(&pool, &c, RankingStrategy::Simple, 10) {
            assert!(result.match_score == 35 || result.match_score == 95);
        }
    }

    #[test]
    fn unverified_gets_no_bonus() {
        let mut c = caregiver("a", &["Wound Care"]);
        c.is_verified = false;
        assert_eq!(score(&c, &criteria(&["Wound Care"], &[]), RankingStrategy::Simple), 90);
    }

    #[test]
    fn keyword_strategy_adds_symptom_hits_with_cap() {
        let mut c = caregiver("a", &["Wound Care"]);
        c.bio = Some("Dressing for infection, bedsore and diabetic wound".to_string());
        let crit = criteria(&["Wound Care"], &["infection", "bedsore", "wound", "fever"]);
        assert_eq!(symptom_hits(&c, &crit.symptoms), 3);
        assert_eq!(score(&c, &crit, RankingStrategy::Keyword), 100);

        let crit = criteria(&["Elder Care"], &["infection"]);
        assert_eq!(score(&c, &crit, RankingStrategy::Keyword), 40);
    }

    #[test]
    fn ties_break_on_id() {
        let c = criteria(&["Wound Care"], &[]);
        let pool = vec![
            caregiver("c", &["Elder Care"]),
            caregiver("b", &["Wound Care"]),
            caregiver("a", &["Elder Care"]),
            caregiver("d", &["Wound Care"]),
        ];
        let ids: Vec<String> = rank(&pool, &c, RankingStrategy::Simple, 10)
            .into_iter()
            .map(|r| r.caregiver.id)
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn rank_is_deterministic_and_truncates() {
        let c = criteria(&["General Care"], &[]);
        let pool: Vec<Caregiver> = (0..15)
            .map(|i| caregiver(&format!("id-{:02}", 14 - i), &["General Care"]))
            .collect();
        let first = rank(&pool, &c, RankingStrategy::Simple, 10);
        let second = rank(&pool, &c, RankingStrategy::Simple, 10);
        assert_eq!(first.len(), 10);
        assert_eq!(first, second);
        assert_eq!(first[0].caregiver.id, "id-00");
    }

    #[test]
    fn display_name_prefers_real_name() {
        assert_eq!(display_name(&caregiver("a", &["Wound Care"])), "Asha Nair");
    }

    #[test]
    fn display_name_uses_persona_then_first_word() {
        let mut c = caregiver("a", &["Wound Care"]);
        c.first_name.clear();
        c.last_name.clear();
        assert_eq!(display_name(&c), "Nurse Rahul Gupta");

        c.specializations = vec!["Dialysis Support".to_string()];
        assert_eq!(display_name(&c), "Dialysis Specialist");

        c.specializations.clear();
        assert_eq!(display_name(&c), "Care Specialist");
    }

    #[test]
    fn reason_mentions_matched_specialization() {
        let c = criteria(&["Wound Care"], &[]);
        let results = rank(&[caregiver("a", &["Elder Care", "Wound Care"])], &c, RankingStrategy::Simple, 10);
        assert_eq!(results[0].match_reason, "Specializes in Wound Care");
    }

    #[test]
    fn reason_is_localized() {
        let mut c = criteria(&["Wound Care"], &[]);
        c.language = Language::Hi;
        c.ai_powered = true;
        let results = rank(&[caregiver("a", &["Elder Care"])], &c, RankingStrategy::Simple, 10);
        assert_eq!(results[0].match_reason, "उपलब्ध सत्यापित देखभालकर्ता (एआई मिलान)");
        assert!(results[0].ai_powered);
    }
}
