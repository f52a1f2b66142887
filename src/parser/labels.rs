use std::collections::BTreeMap;

use regex::Regex;

/// A case-insensitive line prefix that fills one named field, e.g.
/// `"Impact:"` → `Impact`.
#[derive(Debug, Clone)]
pub struct LabelRule {
    field: String,
    re: Regex,
}

impl LabelRule {
    pub fn new(field: &str, prefix: &str) -> Self {
        let re = Regex::new(&format!(r"(?is)^{}(.*)$", regex::escape(prefix)))
            .expect("escaped literal is a valid pattern");
        LabelRule {
            field: field.to_string(),
            re,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// The trimmed remainder of `line` after the prefix, if it carries it.
    pub fn strip<'l>(&self, line: &'l str) -> Option<&'l str> {
        let caps = self.re.captures(line.trim_start())?;
        caps.get(1).map(|m| m.as_str().trim())
    }
}

/// Every field of `rules` mapped to an empty value.
pub fn empty_fields(rules: &[LabelRule]) -> BTreeMap<String, String> {
    rules
        .iter()
        .map(|r| (r.field.clone(), String::new()))
        .collect()
}

/// Apply `rules` to each line left to right. The first rule matching a line
/// claims it; a later line for the same field overwrites an earlier one.
pub fn apply_lines<S: AsRef<str>>(
    rules: &[LabelRule],
    lines: &[S],
    fields: &mut BTreeMap<String, String>,
) {
    for line in lines {
        let line = line.as_ref();
        if let Some((rule, value)) = rules
            .iter()
            .find_map(|r| r.strip(line).map(|v| (r, v)))
        {
            fields.insert(rule.field.clone(), value.to_string());
        }
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn advisor_rules() -> Vec<LabelRule> {
        vec![
            LabelRule::new("Impact", "Impact:"),
            LabelRule::new("ResourceType", "ResourceType:"),
            LabelRule::new("RecommendationID", "Recommendation ID:"),
        ]
    }

    #[test]
    fn prefix_is_case_insensitive_and_trimmed() {
        let rule = LabelRule::new("RecommendationID", "Recommendation ID:");
        assert_eq!(rule.strip("recommendation id:   abc-123 "), Some("abc-123"));
        assert_eq!(rule.strip("RECOMMENDATION ID:abc"), Some("abc"));
        assert_eq!(rule.strip("Recommendation: abc"), None);
        assert_eq!(rule.strip("see Recommendation ID: abc"), None);
    }

    #[test]
    fn empty_value_is_empty_string() {
        let rule = LabelRule::new("Impact", "Impact:");
        assert_eq!(rule.strip("Impact:"), Some(""));
        assert_eq!(rule.strip("Impact:    "), Some(""));
    }

    #[test]
    fn prefix_special_chars_are_literal() {
        let rule = LabelRule::new("Cost", "Cost (USD)?:");
        assert_eq!(rule.strip("cost (usd)?: 12"), Some("12"));
        assert_eq!(rule.strip("Cost USD: 12"), None);
    }

    #[test]
    fn later_lines_overwrite_and_unmatched_stay_empty() {
        let rules = advisor_rules();
        let mut fields = empty_fields(&rules);
        apply_lines(
            &rules,
            &["Impact: Low", "Some prose", "impact: High", "ResourceType: Compute"],
            &mut fields,
        );
        assert_eq!(fields["Impact"], "High");
        assert_eq!(fields["ResourceType"], "Compute");
        assert_eq!(fields["RecommendationID"], "");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn first_rule_claims_the_line() {
        let rules = vec![
            LabelRule::new("Short", "Recommendation"),
            LabelRule::new("Long", "Recommendation ID:"),
        ];
        let mut fields = empty_fields(&rules);
        apply_lines(&rules, &["Recommendation ID: x"], &mut fields);
        assert_eq!(fields["Short"], "ID: x");
        assert_eq!(fields["Long"], "");
    }
}
