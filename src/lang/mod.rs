use whatlang::Lang;

/// Identifies the language of the raw query text.
///
/// Returns the ISO 639-1 code for the common languages, the detector's
/// ISO 639-3 code for the rest, and `"und"` when the text is too short or
/// too ambiguous to classify.
pub fn detect_language(text: &str) -> String {
    match whatlang::detect_lang(text) {
        Some(lang) => iso_639_1(lang)
            .map(str::to_string)
            .unwrap_or_else(|| lang.code().to_string()),
        None => "und".to_string(),
    }
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Fra => "fr",
        Lang::Eng => "en",
        Lang::Ara => "ar",
        Lang::Spa => "es",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Ron => "ro",
        Lang::Hun => "hu",
        Lang::Bul => "bg",
        Lang::Ell => "el",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Fin => "fi",
        Lang::Tur => "tr",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Ind => "id",
        Lang::Vie => "vi",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_french_query() {
        let code = detect_language(
            "Quelles sont les dernières nouvelles sur l'économie marocaine cette année ?",
        );
        assert_eq!(code, "fr");
    }

    #[test]
    fn detects_english_query() {
        let code = detect_language(
            "What happened to the national inflation rate during the last twelve months?",
        );
        assert_eq!(code, "en");
    }

    #[test]
    fn empty_text_is_undetermined() {
        assert_eq!(detect_language(""), "und");
    }

    #[test]
    fn uncommon_language_falls_back_to_detector_code() {
        assert_eq!(iso_639_1(Lang::Epo), None);
        assert_eq!(Lang::Epo.code(), "epo");
    }
}
