// ==========================================
// Internationalisation (i18n)
// ==========================================
// Backed by rust-i18n
// Locales: pt-BR (default) and en
// ==========================================
// Note: the rust_i18n::i18n! macro is initialised in lib.rs
// ==========================================

/// Default locale of the commercial team
pub const DEFAULT_LOCALE: &str = "pt-BR";

/// Current locale
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch locale
///
/// # Arguments
/// - locale: "pt-BR" or "en"
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// Translate a message without arguments
///
/// # Example
/// ```no_run
/// use proposal_desk::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate a message with `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use proposal_desk::i18n::t_with_args;
/// let msg = t_with_args("import.analysis_done", &[("sheet", "Informações de Evento")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n keeps the locale in global state and tests run in parallel.
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale(DEFAULT_LOCALE);
        assert_eq!(current_locale(), DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale(DEFAULT_LOCALE);
        assert_eq!(t("validation.invalid_slots"), "Quantidade de vagas inválida");

        set_locale("en");
        assert_eq!(t("validation.invalid_slots"), "Invalid slot count");

        set_locale(DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale(DEFAULT_LOCALE);
        let msg = t_with_args("import.analysis_done", &[("sheet", "Informações de Evento")]);
        assert_eq!(msg, "Análise da aba \"Informações de Evento\" concluída.");

        set_locale("en");
        let msg = t_with_args("import.commit_failed", &[("error", "disk full")]);
        assert!(msg.contains("disk full"));
        assert!(msg.starts_with("Failed"));

        set_locale(DEFAULT_LOCALE);
    }
}
