//! Fixed vocabularies shared by extraction, classification and display.

pub const GENERAL_CARE: &str = "General Care";

/// Closed set of specialization labels the extraction prompt may return.
pub const ALLOWED_SPECIALIZATIONS: &[&str] = &[
    "General Care",
    "Pregnancy Care",
    "ANC Care",
    "Postnatal Care",
    "Wound Care",
    "Elder Care",
    "Physiotherapy",
    "Palliative Care",
    "Pediatric Care",
    "Diabetes Care",
    "Post-Surgery Care",
    "Mental Health Support",
];

/// Persona names shown for caregivers whose profile has no name yet.
const PERSONA_NAMES: &[(&str, &str)] = &[
    ("General Care", "Nurse Anjali Verma"),
    ("Pregnancy Care", "Nurse Priya Sharma"),
    ("ANC Care", "Midwife Kavita Rao"),
    ("Postnatal Care", "Nurse Meera Iyer"),
    ("Wound Care", "Nurse Rahul Gupta"),
    ("Elder Care", "Caregiver Sunita Patel"),
    ("Physiotherapy", "Physio Arjun Mehta"),
    ("Palliative Care", "Nurse Fatima Khan"),
    ("Pediatric Care", "Nurse Neha Joshi"),
];

/// Symptom words recognised when no AI analysis is available.
pub const SYMPTOM_VOCABULARY: &[&str] = &[
    "fever",
    "cough",
    "pain",
    "wound",
    "bleeding",
    "swelling",
    "nausea",
    "vomiting",
    "dizziness",
    "weakness",
    "fatigue",
    "headache",
    "infection",
    "diabetes",
    "pregnant",
    "pregnancy",
    "bedsore",
    "fracture",
    "anxiety",
    "breathlessness",
];

/// Case-insensitive lookup into the persona table.
pub fn persona_name(specialization: &str) -> Option<&'static str> {
    PERSONA_NAMES
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(specialization.trim()))
        .map(|(_, name)| *name)
}

/// Maps a free-form label onto its canonical spelling in `allowed`.
pub fn canonical_specialization<'a>(label: &str, allowed: &[&'a str]) -> Option<&'a str> {
    allowed
        .iter()
        .find(|allowed| allowed.eq_ignore_ascii_case(label.trim()))
        .copied()
}
