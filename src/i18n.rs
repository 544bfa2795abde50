// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

/// 语言环境变量
pub const LOCALE_ENV: &str = "POD_LOCALE";

/// 按环境变量初始化语言（缺省为法语）
pub fn init_locale() {
    let locale = std::env::var(LOCALE_ENV)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    set_locale(&locale);
}

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"fr" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use pod_catalog_import::i18n::t;
/// let msg = t("cli.usage");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use pod_catalog_import::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/feed.csv")]);
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

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");
        assert_eq!(current_locale(), "en");

        set_locale(DEFAULT_LOCALE);
        assert_eq!(current_locale(), "fr");
    }

    #[test]
    fn test_translate_simple() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("fr");
        assert_eq!(
            t("cli.usage"),
            "Usage : pod-catalog-import <feed.csv> <owner_id> [db_path]"
        );

        set_locale("en");
        assert_eq!(t("import.auth_required"), "You must be signed in to import products");

        set_locale(DEFAULT_LOCALE);
    }

    #[test]
    fn test_cli_messages() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("fr");
        let line = t_with_args(
            "cli.warning_line",
            &[("line", "3"), ("kind", "MalformedNumber"), ("message", "prix invalide")],
        );
        assert_eq!(line, "[ligne 3] MalformedNumber : prix invalide");
        assert_eq!(
            t_with_args("cli.assigned_ids", &[("ids", "42, 43")]),
            "Identifiants attribués : 42, 43"
        );

        set_locale("en");
        assert_eq!(
            t_with_args("cli.assigned_ids", &[("ids", "7")]),
            "Assigned ids: 7"
        );

        set_locale(DEFAULT_LOCALE);
    }

    #[test]
    fn test_translate_with_args() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("en");
        let msg = t_with_args(
            "import.summary",
            &[("total", "5"), ("success", "4"), ("failed", "1"), ("warnings", "2")],
        );
        assert_eq!(
            msg,
            "Import finished: 4/5 products saved, 1 failed, 2 warnings"
        );

        set_locale("fr");
        let msg = t_with_args("import.file_not_found", &[("path", "/tmp/feed.csv")]);
        assert!(msg.contains("/tmp/feed.csv"));
        assert!(msg.contains("Fichier introuvable"));

        set_locale(DEFAULT_LOCALE);
    }
}
