//! Cognitive-level classification
//!
//! Keyword heuristic over Bloom's taxonomy. Checked from the highest
//! level down so a question asking to "design" is classified as create
//! even when it also mentions lower-level verbs.

/// Bloom level keyword table, highest level first
const LEVELS: &[(&str, &[&str])] = &[
    (
        "create",
        &[
            "design",
            "create",
            "construct",
            "develop",
            "formulate",
            "plan",
            "propose",
        ],
    ),
    (
        "evaluate",
        &[
            "evaluate",
            "judge",
            "critique",
            "justify",
            "recommend",
            "assess",
            "rate",
        ],
    ),
    (
        "analyze",
        &[
            "analyze",
            "compare",
            "contrast",
            "differentiate",
            "examine",
            "investigate",
            "categorize",
        ],
    ),
    (
        "apply",
        &[
            "apply",
            "use",
            "demonstrate",
            "calculate",
            "solve",
            "implement",
            "execute",
        ],
    ),
    (
        "understand",
        &[
            "explain",
            "describe",
            "interpret",
            "summarize",
            "paraphrase",
            "classify",
            "discuss",
        ],
    ),
    (
        "remember",
        &[
            "what is", "define", "list", "name", "identify", "recall", "state",
        ],
    ),
];

/// Classify a question's cognitive demand by its phrasing
pub fn determine_cognitive_level(question: &str) -> &'static str {
    let lower = question.to_lowercase();

    for (level, keywords) in LEVELS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return level;
        }
    }

    "remember"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        assert_eq!(
            determine_cognitive_level("Design an experiment to separate a mixture."),
            "create"
        );
        assert_eq!(
            determine_cognitive_level("Justify the use of a salt bridge."),
            "evaluate"
        );
        assert_eq!(
            determine_cognitive_level("Compare SN1 and SN2 mechanisms."),
            "analyze"
        );
        assert_eq!(
            determine_cognitive_level("Calculate the molarity of the solution."),
            "apply"
        );
        assert_eq!(
            determine_cognitive_level("Explain Le Chatelier's principle."),
            "understand"
        );
        assert_eq!(determine_cognitive_level("What is an isotope?"), "remember");
    }

    #[test]
    fn test_higher_level_wins() {
        assert_eq!(
            determine_cognitive_level("Design and explain a voltaic cell."),
            "create"
        );
    }

    #[test]
    fn test_default_is_remember() {
        assert_eq!(
            determine_cognitive_level("The boiling point of water at sea level?"),
            "remember"
        );
    }
}
