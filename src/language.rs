//! Response language
//!
//! The UI lets farmers pick one of 23 Indian languages. The choice travels
//! with every request as an explicit value and decides the instruction that
//! opens each prompt.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Marathi,
    Bengali,
    Tamil,
    Telugu,
    Gujarati,
    Kannada,
    Malayalam,
    Punjabi,
    Odia,
    Assamese,
    Urdu,
    Kashmiri,
    Konkani,
    Sindhi,
    Sanskrit,
    Nepali,
    Manipuri,
    Maithili,
    Dogri,
    Santali,
    Bodo,
}

/// (language, code, response instruction)
static LANGUAGES: &[(Language, &str, &str)] = &[
    (Language::English, "en", "Respond ONLY in ENGLISH. Do not include any other language."),
    (Language::Hindi, "hi", "Respond ONLY in HINDI. Use farmer-friendly Indian Hindi terms. No English."),
    (Language::Marathi, "mr", "Respond ONLY in MARATHI. Use farmer-friendly Marathi terms. No English."),
    (Language::Bengali, "bn", "Respond ONLY in BENGALI (বাংলা). No English."),
    (Language::Tamil, "ta", "Respond ONLY in TAMIL (தமிழ்). No English."),
    (Language::Telugu, "te", "Respond ONLY in TELUGU (తెలుగు). No English."),
    (Language::Gujarati, "gu", "Respond ONLY in GUJARATI (ગુજરાતી). No English."),
    (Language::Kannada, "kn", "Respond ONLY in KANNADA (ಕನ್ನಡ). No English."),
    (Language::Malayalam, "ml", "Respond ONLY in MALAYALAM (മലയാളം). No English."),
    (Language::Punjabi, "pa", "Respond ONLY in PUNJABI (ਪੰਜਾਬੀ). No English."),
    (Language::Odia, "or", "Respond ONLY in ODIA (ଓଡିଆ). No English."),
    (Language::Assamese, "as", "Respond ONLY in ASSAMESE (অসমীয়া). No English."),
    (Language::Urdu, "ur", "Respond ONLY in URDU (اُردُو). No English."),
    (Language::Kashmiri, "ks", "Respond ONLY in KASHMIRI. No English."),
    (Language::Konkani, "kok", "Respond ONLY in KONKANI (कोंकणी). No English."),
    (Language::Sindhi, "sd", "Respond ONLY in SINDHI (سنڌي). No English."),
    (Language::Sanskrit, "sa", "Respond ONLY in SANSKRIT (संस्कृतम्). No English."),
    (Language::Nepali, "ne", "Respond ONLY in NEPALI (नेपाली). No English."),
    (Language::Manipuri, "mni", "Respond ONLY in MANIPURI. No English."),
    (Language::Maithili, "mai", "Respond ONLY in MAITHILI (मैथिली). No English."),
    (Language::Dogri, "doi", "Respond ONLY in DOGRI (डोगरी). No English."),
    (Language::Santali, "sat", "Respond ONLY in SANTALI (ᱥᱟᱱᱛᱟᱲᱤ). No English."),
    (Language::Bodo, "brx", "Respond ONLY in BODO. No English."),
];

impl Language {
    /// Parse a UI language code; unknown codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        LANGUAGES
            .iter()
            .find(|(_, c, _)| c.eq_ignore_ascii_case(code))
            .map(|(lang, _, _)| *lang)
            .unwrap_or_default()
    }

    pub fn code(self) -> &'static str {
        self.entry().1
    }

    /// Instruction placed at the top of every prompt.
    pub fn response_instruction(self) -> &'static str {
        self.entry().2
    }

    /// BCP-47 locale for speech recognition/synthesis in the voice assistant.
    pub fn speech_locale(self) -> &'static str {
        match self {
            Language::Hindi => "hi-IN",
            Language::Marathi => "mr-IN",
            Language::Bengali => "bn-IN",
            Language::Tamil => "ta-IN",
            Language::Telugu => "te-IN",
            Language::Gujarati => "gu-IN",
            Language::Kannada => "kn-IN",
            Language::Malayalam => "ml-IN",
            Language::Punjabi => "pa-IN",
            Language::Odia => "or-IN",
            Language::Assamese => "as-IN",
            Language::Urdu => "ur-IN",
            Language::Nepali => "ne-NP",
            Language::Sanskrit => "sa-IN",
            _ => "en-US",
        }
    }

    /// Persona for the conversational assistant. Only English, Hindi and
    /// Marathi have a native persona; the rest use English plus the
    /// response instruction.
    pub fn assistant_persona(self) -> &'static str {
        match self {
            Language::Hindi => "आप एक सहायक कृषि सलाहकार हैं। कृषि, फसलों, कीट-पतंगों, मौसम और खेती की तकनीकों के बारे में सवालों के जवाब दें। व्यावहारिक, कार्य-उन्मुख सलाह प्रदान करें। हिंदी में स्थानीय कृषि शब्दावली का उपयोग करके संक्षिप्त उत्तर दें।",
            Language::Marathi => "तुम्ही एक उपयुक्त शेती सल्लागार आहात। शेती, पिके, कीड-पतंग, हवामान आणि शेतीच्या तंत्रांबद्दल प्रश्नांची उत्तरे द्या। व्यावहारिक, कृती-केंद्रित सल्ला द्या. मराठीत स्थानिक शेतकी शब्दावली वापरून संक्षिप्त उत्तर द्या.",
            _ => "You are a helpful farming assistant. Answer questions about agriculture, crops, pests, weather, and farming techniques. Provide practical, actionable advice. Be concise and farmer-friendly.",
        }
    }

    fn entry(self) -> &'static (Language, &'static str, &'static str) {
        // Every variant has a row
        LANGUAGES
            .iter()
            .find(|(lang, _, _)| *lang == self)
            .unwrap_or(&LANGUAGES[0])
    }
}

impl From<String> for Language {
    fn from(code: String) -> Self {
        Language::from_code(&code)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_round_trips_its_code() {
        assert_eq!(LANGUAGES.len(), 23);
        for (lang, code, _) in LANGUAGES {
            assert_eq!(Language::from_code(code), *lang);
            assert_eq!(lang.code(), *code);
        }
    }

    #[test]
    fn test_unknown_code_falls_back_to_english() {
        assert_eq!(Language::from_code("fr"), Language::English);
        assert_eq!(Language::from_code(""), Language::English);
        assert_eq!(Language::from_code(" HI "), Language::Hindi);
    }

    #[test]
    fn test_serde_uses_codes() {
        let lang: Language = serde_json::from_str("\"kok\"").unwrap();
        assert_eq!(lang, Language::Konkani);
        assert_eq!(serde_json::to_string(&Language::Tamil).unwrap(), "\"ta\"");
        let lang: Language = serde_json::from_str("\"xx\"").unwrap();
        assert_eq!(lang, Language::English);
    }

    #[test]
    fn test_speech_locale() {
        assert_eq!(Language::Nepali.speech_locale(), "ne-NP");
        assert_eq!(Language::Bodo.speech_locale(), "en-US");
    }
}
