use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const SUBTITLE: &str = "subtitle";
    pub const INPUT_LABEL: &str = "inputLabel";
    pub const INPUT_PLACEHOLDER: &str = "inputPlaceholder";

    pub const EXAMPLE_LOUD_BREATHING: &str = "exampleLoudBreathing";
    pub const EXAMPLE_DOOR_HOLDING: &str = "exampleDoorHolding";
    pub const EXAMPLE_FISH_MICROWAVER: &str = "exampleFishMicrowaver";
    pub const EXAMPLE_WRONG_TP: &str = "exampleWrongTP";
    pub const GRIEVANCE_LOUD_BREATHING: &str = "grievanceLoudBreathing";
    pub const GRIEVANCE_DOOR_HOLDING: &str = "grievanceDoorHolding";
    pub const GRIEVANCE_FISH_MICROWAVER: &str = "grievanceFishMicrowaver";
    pub const GRIEVANCE_WRONG_TP: &str = "grievanceWrongTP";

    pub const ERROR_MESSAGE: &str = "errorMessage";
    pub const ANALYZE_BUTTON: &str = "analyzeButton";
    pub const ANALYZING_BUTTON: &str = "analyzingButton";
    pub const ANALYSIS_TITLE: &str = "analysisTitle";
    pub const ADVICE_TITLE: &str = "adviceTitle";
    pub const TRY_ANOTHER_BUTTON: &str = "tryAnotherButton";
    pub const FAILED_ANALYSIS: &str = "failedAnalysis";

    pub const SETTINGS_TITLE: &str = "settingsTitle";
    pub const SETTINGS_LANGUAGE: &str = "settingsLanguage";
    pub const SETTINGS_LANGUAGE_AUTO: &str = "settingsLanguageAuto";
    pub const SETTINGS_ALPHA: &str = "settingsAlpha";
    pub const SETTINGS_SAVE: &str = "settingsSave";
    pub const SETTINGS_SAVED: &str = "settingsSaved";
    pub const SETTINGS_SAVE_FAILED: &str = "settingsSaveFailed";
    pub const CLI_PROMPT: &str = "cliPrompt";
    pub const CLI_CATEGORY: &str = "cliCategory";

    /// 모든 로케일이 정의해야 하는 키 목록.
    pub const ALL: &[&str] = &[
        TITLE,
        SUBTITLE,
        INPUT_LABEL,
        INPUT_PLACEHOLDER,
        EXAMPLE_LOUD_BREATHING,
        EXAMPLE_DOOR_HOLDING,
        EXAMPLE_FISH_MICROWAVER,
        EXAMPLE_WRONG_TP,
        GRIEVANCE_LOUD_BREATHING,
        GRIEVANCE_DOOR_HOLDING,
        GRIEVANCE_FISH_MICROWAVER,
        GRIEVANCE_WRONG_TP,
        ERROR_MESSAGE,
        ANALYZE_BUTTON,
        ANALYZING_BUTTON,
        ANALYSIS_TITLE,
        ADVICE_TITLE,
        TRY_ANOTHER_BUTTON,
        FAILED_ANALYSIS,
        SETTINGS_TITLE,
        SETTINGS_LANGUAGE,
        SETTINGS_LANGUAGE_AUTO,
        SETTINGS_ALPHA,
        SETTINGS_SAVE,
        SETTINGS_SAVED,
        SETTINGS_SAVE_FAILED,
        CLI_PROMPT,
        CLI_CATEGORY,
    ];
}

/// 언어 결정이 모두 실패했을 때 사용하는 로케일.
pub const FALLBACK_LOCALE: &str = "en-US";

/// 내장 로케일 테이블의 키. 순서가 기본 언어 매칭 우선순위가 된다.
pub const LOCALES: &[&str] = &["en-US", "es-ES"];

/// 빌드 시 치환되지 않은 오버라이드 값.
const BUILD_LOCALE_SENTINEL: &str = "{{APP_LOCALE}}";

/// 로케일 태그로 내장 테이블에서 문자열을 찾는다.
pub fn table_lookup(locale: &str, key: &str) -> Option<&'static str> {
    match locale {
        "en-US" => en_us(key),
        "es-ES" => es_es(key),
        _ => None,
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: &'static str,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 로케일 태그로 번역기를 생성한다. 테이블에 없는 태그는 매칭 규칙을 거쳐 폴백한다.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: match_locale(locale).unwrap_or(FALLBACK_LOCALE),
            overrides: None,
        }
    }

    /// 로케일 + 언어팩 디렉터리를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 문자열만 사용한다.
    pub fn new_with_pack(locale: &str, pack_dir: Option<&str>) -> Self {
        let mut tr = Self::new(locale);
        tr.overrides = pack_dir.and_then(|dir| load_overrides(dir, tr.locale));
        tr
    }

    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// 번역을 가져온다. 언어팩 → 활성 로케일 → 폴백 로케일 → 키 문자열 순이다.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(v) = self.overrides.as_ref().and_then(|m| m.get(key)) {
            return v;
        }
        table_lookup(self.locale, key)
            .or_else(|| table_lookup(FALLBACK_LOCALE, key))
            .unwrap_or(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LOCALE)
    }
}

/// 시스템이 보고하는 선호 언어 목록.
pub trait SystemLocale {
    fn preferred_languages(&self) -> Vec<String>;
}

/// `sys-locale` 기반 구현.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysLocale;

impl SystemLocale for SysLocale {
    fn preferred_languages(&self) -> Vec<String> {
        sys_locale::get_locales().collect()
    }
}

/// 빌드 시 `APP_LOCALE`로 주입된 오버라이드. 미설정/센티널/빈 문자열이면 None.
pub fn build_time_override() -> Option<&'static str> {
    parse_build_override(option_env!("APP_LOCALE"))
}

fn parse_build_override(raw: Option<&'static str>) -> Option<&'static str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && *v != BUILD_LOCALE_SENTINEL)
}

/// 오버라이드 → 첫 번째 선호 언어 → 폴백 순으로 활성 로케일을 고른다.
/// 반환값은 항상 `LOCALES` 중 하나다.
pub fn resolve_locale(override_tag: Option<&str>, preferred: &[String]) -> &'static str {
    override_tag
        .and_then(match_locale)
        .or_else(|| preferred.first().and_then(|p| match_locale(p)))
        .unwrap_or(FALLBACK_LOCALE)
}

/// CLI 플래그/설정/빌드 오버라이드/시스템 순으로 로케일을 결정한다.
/// `auto`나 빈 값은 지정하지 않은 것으로 본다.
pub fn resolve_startup_locale(
    cli_arg: Option<&str>,
    config_lang: Option<&str>,
    system: &impl SystemLocale,
) -> &'static str {
    let explicit = [cli_arg, config_lang]
        .into_iter()
        .flatten()
        .filter(|v| !is_auto(v))
        .find_map(match_locale);
    if let Some(locale) = explicit {
        return locale;
    }
    resolve_locale(build_time_override(), &system.preferred_languages())
}

fn is_auto(v: &str) -> bool {
    let v = v.trim();
    v.is_empty() || v.eq_ignore_ascii_case("auto")
}

/// 태그를 테이블 키에 맞춘다. 정확히 일치하는 키, 아니면 기본 언어가 같은 첫 번째 키.
pub fn match_locale(tag: &str) -> Option<&'static str> {
    let normalized = normalize_tag(tag)?;
    if let Some(exact) = LOCALES
        .iter()
        .find(|l| l.eq_ignore_ascii_case(&normalized))
    {
        return Some(*exact);
    }
    let base = base_language(&normalized);
    LOCALES
        .iter()
        .find(|l| base_language(l).eq_ignore_ascii_case(base))
        .copied()
}

/// `es_ES.UTF-8`, `en-US@posix` 같은 시스템 표기를 `es-ES` 형태로 정리한다.
fn normalize_tag(raw: &str) -> Option<String> {
    let stripped = raw.trim().split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.replace('_', "-"))
}

fn base_language(tag: &str) -> &str {
    tag.split('-').next().unwrap_or(tag)
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵.
fn load_overrides(dir: &str, locale: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., es-ES)
    if let Some(map) = try_load(locale) {
        return Some(map);
    }
    // 2) base code (e.g., es)
    try_load(base_language(locale))
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Table = toml::from_str(src).ok()?;
    let map: HashMap<String, String> = value
        .into_iter()
        .filter_map(|(k, v)| match v {
            toml::Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect();

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

fn en_us(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        TITLE => "How petty are you?",
        SUBTITLE => "Share your grievance and let Claude be the judge",
        INPUT_LABEL => "What's bothering you?",
        INPUT_PLACEHOLDER => "My roommate ate the last slice of pizza I was saving...",
        EXAMPLE_LOUD_BREATHING => "Loud breathing",
        EXAMPLE_DOOR_HOLDING => "Door holding",
        EXAMPLE_FISH_MICROWAVER => "Fish microwaver",
        EXAMPLE_WRONG_TP => "Wrong TP",
        GRIEVANCE_LOUD_BREATHING => "My roommate breathes too loudly",
        GRIEVANCE_DOOR_HOLDING => "Someone didn't say thank you when I held the door",
        GRIEVANCE_FISH_MICROWAVER => "My coworker microwaves fish at lunch",
        GRIEVANCE_WRONG_TP => "They put the toilet paper roll on backwards",
        ERROR_MESSAGE => "Please enter a grievance to analyze!",
        ANALYZE_BUTTON => "Measure my pettiness!",
        ANALYZING_BUTTON => "Analyzing pettiness...",
        ANALYSIS_TITLE => "Analysis",
        ADVICE_TITLE => "Advice",
        TRY_ANOTHER_BUTTON => "Try another grievance",
        FAILED_ANALYSIS => "Failed to analyze grievance. Please try again!",
        SETTINGS_TITLE => "Settings",
        SETTINGS_LANGUAGE => "Language",
        SETTINGS_LANGUAGE_AUTO => "System",
        SETTINGS_ALPHA => "Window transparency",
        SETTINGS_SAVE => "Save settings",
        SETTINGS_SAVED => "Saved.",
        SETTINGS_SAVE_FAILED => "Could not save settings",
        CLI_PROMPT => "What's bothering you? > ",
        CLI_CATEGORY => "Category",
        _ => return None,
    })
}

fn es_es(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        TITLE => "¿Qué tan mezquino eres?",
        SUBTITLE => "Comparte tu queja y deja que Claude sea el juez",
        INPUT_LABEL => "¿Qué te molesta?",
        INPUT_PLACEHOLDER => {
            "Mi compañero de cuarto se comió la última rebanada de pizza que estaba guardando..."
        }
        EXAMPLE_LOUD_BREATHING => "Respiración fuerte",
        EXAMPLE_DOOR_HOLDING => "Sujetar puerta",
        EXAMPLE_FISH_MICROWAVER => "Pescado en microondas",
        EXAMPLE_WRONG_TP => "Papel higiénico mal",
        GRIEVANCE_LOUD_BREATHING => "Mi compañero de cuarto respira muy fuerte",
        GRIEVANCE_DOOR_HOLDING => "Alguien no dijo gracias cuando le sostuve la puerta",
        GRIEVANCE_FISH_MICROWAVER => {
            "Mi compañero de trabajo calienta pescado en el microondas en el almuerzo"
        }
        GRIEVANCE_WRONG_TP => "Pusieron el rollo de papel higiénico al revés",
        ERROR_MESSAGE => "¡Por favor ingresa una queja para analizar!",
        ANALYZE_BUTTON => "¡Mide mi mezquindad!",
        ANALYZING_BUTTON => "Analizando mezquindad...",
        ANALYSIS_TITLE => "Análisis",
        ADVICE_TITLE => "Consejo",
        TRY_ANOTHER_BUTTON => "Probar otra queja",
        FAILED_ANALYSIS => "Error al analizar la queja. ¡Por favor intenta de nuevo!",
        SETTINGS_TITLE => "Configuración",
        SETTINGS_LANGUAGE => "Idioma",
        SETTINGS_LANGUAGE_AUTO => "Sistema",
        SETTINGS_ALPHA => "Transparencia de la ventana",
        SETTINGS_SAVE => "Guardar configuración",
        SETTINGS_SAVED => "Guardado.",
        SETTINGS_SAVE_FAILED => "No se pudo guardar la configuración",
        CLI_PROMPT => "¿Qué te molesta? > ",
        CLI_CATEGORY => "Categoría",
        _ => return None,
    })
}
