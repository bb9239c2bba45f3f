//! Prompt construction and response cleanup for the live provider

use regex_lite::Regex;
use std::sync::OnceLock;

/// Native-script display name for a target language
pub fn language_display(language: &str) -> &str {
    match language.to_lowercase().as_str() {
        "nepali" => "नेपाली",
        "hindi" => "हिन्दी",
        "newari" => "नेवारी",
        "maithili" => "मैथिली",
        "english" => "English",
        _ => language,
    }
}

/// System prompt for paraphrase requests
pub fn paraphrase_system(subject: &str) -> String {
    format!(
        "You are an expert {subject} teacher creating exam questions for Nepali students.\n\
         \n\
         CRITICAL PARAPHRASING RULES:\n\
         1. PRESERVE CORE CONCEPT - Test the exact same educational objective\n\
         2. CHANGE EVERYTHING ELSE - Different wording, structure, examples, numbers\n\
         3. ENHANCE CRITICAL THINKING - Require analysis, application, evaluation\n\
         4. USE NEPALI CONTEXT - Local examples, names, places, currency when relevant\n\
         5. OPTIMIZE CLARITY - Make it unambiguous and precise\n\
         6. MAINTAIN DIFFICULTY - Same cognitive demand level\n\
         \n\
         OUTPUT REQUIREMENTS:\n\
         - Return ONLY the rewritten question\n\
         - No explanations, no numbering\n\
         - If original has calculations, use different numbers\n\
         - Keep technical terms accurate\n\
         - Use age-appropriate language for Class 12"
    )
}

/// User prompt for paraphrase requests
pub fn paraphrase_user(question: &str) -> String {
    format!(
        "ORIGINAL QUESTION: \"{question}\"\n\n\
         Generate ONE optimized version that follows all the rules above:"
    )
}

/// Prompt for translation with cultural adaptation
pub fn translate(question: &str, language: &str, subject: &str) -> String {
    let display = language_display(language);
    format!(
        "Translate and culturally adapt this {subject} question for {display} \
         speaking students in Nepal.\n\
         \n\
         ORIGINAL (English): \"{question}\"\n\
         \n\
         TRANSLATION RULES:\n\
         1. ACCURATE TRANSLATION: Preserve exact meaning and technical accuracy\n\
         2. CULTURAL ADAPTATION: Use local examples, names, currency (NPR), places\n\
         3. EDUCATIONAL CONTEXT: Make it relatable to Nepali classroom experience\n\
         4. MAINTAIN FORMAT: Keep any mathematical notation, formulas, scientific terms\n\
         5. AGE APPROPRIATE: Language suitable for Class 12 students\n\
         \n\
         Translate ONLY the question, no explanations.\n\
         \n\
         {display} VERSION:"
    )
}

/// Prompt for explanation generation
pub fn explain(question: &str, answer: &str, subject: &str) -> String {
    format!(
        "As a {subject} teacher in Nepal, provide a comprehensive explanation \
         for this exam question:\n\
         \n\
         QUESTION: {question}\n\
         CORRECT ANSWER: {answer}\n\
         \n\
         EXPLANATION STRUCTURE:\n\
         1. CONCEPT OVERVIEW: Main concept being tested (in simple terms)\n\
         2. STEP-BY-STEP SOLUTION: Clear reasoning process\n\
         3. NEPALI CONTEXT: Real-world application in Nepal if applicable\n\
         4. COMMON MISTAKES: Typical errors Nepali students make and how to avoid\n\
         5. STUDY TIPS: How to remember this concept\n\
         \n\
         Use simple, clear language suitable for Class 12 students."
    )
}

fn quote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^["']|["']$"#).unwrap())
}

fn prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:Rewritten|Paraphrase|Version|Answer):\s*").unwrap()
    })
}

fn numbering_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s*").unwrap())
}

fn translation_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:Translation|Translated|Answer):\s*").unwrap()
    })
}

/// Strip quotes, label prefixes and list numbering from a paraphrase
/// response
pub fn clean_paraphrase(response: &str) -> String {
    let cleaned = response.trim();
    let cleaned = quote_re().replace_all(cleaned, "");
    let cleaned = prefix_re().replace(&cleaned, "");
    let cleaned = numbering_re().replace(&cleaned, "");
    cleaned.trim().to_string()
}

/// Strip label prefixes from a translation response
pub fn clean_translation(response: &str) -> String {
    translation_prefix_re()
        .replace(response.trim(), "")
        .trim()
        .to_string()
}
