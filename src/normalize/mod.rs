// ==========================================
// Expo Lead Fusion - Value Normalizer
// ==========================================
// Responsibility: pure canonical forms for comparing raw field values
// Red line: every function is total - never panics, never errors,
// blank/absent input maps to the empty string
// ==========================================

/// Corporate/legal stop-words removed from company names before
/// comparison, Persian and English. Substring removal: over-matching
/// on words like "coordination" is accepted behavior, keep the list
/// and the mechanism in sync with what the identity tests pin down.
const COMPANY_STOPWORDS: &[&str] = &[
    "شرکت",
    "company",
    "co.",
    "co",
    "ltd",
    "inc",
    "corp",
    "سهامی",
    "خاص",
    "عام",
    "private",
    "public",
    "holding",
    "international",
    "بین المللی",
    "گروه",
    "group",
];

/// Sentinels that upstream tabular tooling leaks for missing cells.
const NULL_SENTINELS: &[&str] = &["nan", "none", "null", "nat"];

/// Trim + lowercase; null-ish sentinels become empty.
///
/// This is the loose equality basis used during fusion - the
/// specialized normalizers below are deliberately NOT applied there.
pub fn normalize_generic(value: &str) -> String {
    let lowered = value.trim().to_lowercase();
    if NULL_SENTINELS.contains(&lowered.as_str()) {
        return String::new();
    }
    lowered
}

/// Canonical website host: lowercase, scheme and leading `www.`
/// stripped, cut at the first `/` or `?`, trailing dots removed.
pub fn normalize_website(value: &str) -> String {
    let mut url = normalize_generic(value);
    if url.is_empty() {
        return url;
    }
    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            url = rest.to_string();
            break;
        }
    }
    if let Some(rest) = url.strip_prefix("www.") {
        url = rest.to_string();
    }
    let cut = url.find(|c| c == '/' || c == '?').unwrap_or(url.len());
    url.truncate(cut);
    url.trim_end_matches('.').to_string()
}

/// Keep digits and one leading `+` only.
pub fn normalize_phone(value: &str) -> String {
    let trimmed = value.trim();
    let mut out = String::with_capacity(trimmed.len());
    for (i, ch) in trimmed.chars().enumerate() {
        if ch.is_ascii_digit() || (ch == '+' && i == 0) {
            out.push(ch);
        }
    }
    if out == "+" {
        return String::new();
    }
    out
}

/// Canonical company name: lowercase, stop-words removed, punctuation
/// flattened to spaces, whitespace collapsed.
pub fn normalize_company_name(value: &str) -> String {
    let mut name = normalize_generic(value);
    if name.is_empty() {
        return name;
    }
    for word in COMPANY_STOPWORDS {
        name = name.replace(word, " ");
    }
    let flattened: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Loose equality used as the conflict test during fusion.
pub fn values_equal(a: &str, b: &str) -> bool {
    normalize_generic(a) == normalize_generic(b)
}

/// Whether the value carries any Persian/Arabic-script character
/// (U+0600..=U+06FF). Drives the post-processor's script splitting.
pub fn is_native_script(value: &str) -> bool {
    value.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}
