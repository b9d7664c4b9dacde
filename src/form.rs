use crate::i18n::{keys, Translator};

/// 사용자에게 보여주는 오류. 표시 문자열은 렌더링 시점의 로케일로 결정된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    /// 공백만 있거나 비어 있는 입력
    EmptyGrievance,
    /// 요청/파싱 실패. 원인은 사용자에게 구분하지 않는다.
    AnalysisFailed,
}

impl FormError {
    pub fn message_key(self) -> &'static str {
        match self {
            FormError::EmptyGrievance => keys::ERROR_MESSAGE,
            FormError::AnalysisFailed => keys::FAILED_ANALYSIS,
        }
    }

    pub fn message(self, tr: &Translator) -> &str {
        tr.t(self.message_key())
    }
}

/// 예시 칩. 누르면 입력창을 해당 문장으로 교체한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Example {
    LoudBreathing,
    DoorHolding,
    FishMicrowaver,
    WrongTp,
}

impl Example {
    pub const ALL: [Example; 4] = [
        Example::LoudBreathing,
        Example::DoorHolding,
        Example::FishMicrowaver,
        Example::WrongTp,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            Example::LoudBreathing => keys::EXAMPLE_LOUD_BREATHING,
            Example::DoorHolding => keys::EXAMPLE_DOOR_HOLDING,
            Example::FishMicrowaver => keys::EXAMPLE_FISH_MICROWAVER,
            Example::WrongTp => keys::EXAMPLE_WRONG_TP,
        }
    }

    pub fn text_key(self) -> &'static str {
        match self {
            Example::LoudBreathing => keys::GRIEVANCE_LOUD_BREATHING,
            Example::DoorHolding => keys::GRIEVANCE_DOOR_HOLDING,
            Example::FishMicrowaver => keys::GRIEVANCE_FISH_MICROWAVER,
            Example::WrongTp => keys::GRIEVANCE_WRONG_TP,
        }
    }

    /// CLI `--example` 값.
    pub fn slug(self) -> &'static str {
        match self {
            Example::LoudBreathing => "loud-breathing",
            Example::DoorHolding => "door-holding",
            Example::FishMicrowaver => "fish-microwaver",
            Example::WrongTp => "wrong-tp",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.slug() == slug.trim())
    }
}

/// 제출 가능 여부를 검사한다. 앞뒤 공백을 제거한 결과가 비어 있으면 오류.
/// 통과하면 원문 그대로를 돌려준다 (프롬프트에는 입력을 가공 없이 넣는다).
pub fn validate(text: &str) -> Result<&str, FormError> {
    if text.trim().is_empty() {
        Err(FormError::EmptyGrievance)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_is_rejected() {
        assert_eq!(validate(""), Err(FormError::EmptyGrievance));
        assert_eq!(validate(" \t\n "), Err(FormError::EmptyGrievance));
        assert_eq!(validate("  pizza "), Ok("  pizza "));
    }

    #[test]
    fn error_messages_follow_locale() {
        let es = Translator::new("es-ES");
        assert_eq!(
            FormError::EmptyGrievance.message(&es),
            "¡Por favor ingresa una queja para analizar!"
        );
        let en = Translator::new("en-US");
        assert_eq!(
            FormError::AnalysisFailed.message(&en),
            "Failed to analyze grievance. Please try again!"
        );
    }

    #[test]
    fn example_slugs_round_trip() {
        for e in Example::ALL {
            assert_eq!(Example::from_slug(e.slug()), Some(e));
        }
        assert_eq!(Example::from_slug("nope"), None);
    }
}
