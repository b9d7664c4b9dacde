//! 불만 분석: 프롬프트 생성 → 완성 호출 → JSON 파싱.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::completion::{Completion, CompletionError};

/// 분석 결과. 파싱에 성공했을 때만 만들어지며 리셋 시 통째로 버린다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// 0..=100
    pub score: u8,
    pub category: String,
    pub judgment: String,
    pub advice: String,
}

/// 응답 원문 형식. score는 정수/실수 모두 허용하고 검증 후 반올림한다.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    score: f64,
    category: String,
    judgment: String,
    advice: String,
}

/// 분석 실패 원인. 사용자에게는 구분 없이 하나의 메시지로 보인다.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("response is not the expected JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(f64),
}

/// 점수 구간 (프롬프트에 그대로 들어간다).
pub const BANDS: [(&str, &str, &str); 5] = [
    ("0-20", "Legitimate concern", "This is actually serious!"),
    ("21-40", "Reasonable gripe", "Fair enough, that's annoying"),
    ("41-60", "Getting petty", "Okay, but maybe chill a bit?"),
    ("61-80", "Pretty petty", "You might want to let this one go..."),
    ("81-100", "Peak pettiness", "Seriously? Let it go!"),
];

/// 완성 서비스에 보낼 지시문을 만든다. 불만 문장은 가공 없이 그대로 넣는다.
pub fn build_prompt(grievance: &str, locale: &str) -> String {
    let mut prompt = String::from(
        "You are a humorous but fair judge of pettiness. Analyze the following grievance and rate it on a scale from 0 to 100, where:\n",
    );
    for (range, name, flavour) in BANDS {
        prompt.push_str(&format!("- {range}: {name} ({flavour})\n"));
    }
    prompt.push_str(&format!(
        r#"
Grievance: "{grievance}"

Respond ONLY with a valid JSON object in this exact format:
{{
  "score": [number between 0-100],
  "category": "[one of the category names above]",
  "judgment": "[A funny but not mean 1-2 sentence judgment about their grievance]",
  "advice": "[A humorous but helpful suggestion in 1 sentence]"
}}

DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON.

Please respond in {locale} language"#
    ));
    prompt
}

/// 응답 텍스트를 결과로 파싱한다. 네 필드 중 하나라도 없거나 점수가 범위를 벗어나면 실패.
pub fn parse_response(payload: &str) -> Result<AnalysisResult, AnalysisError> {
    let raw: RawAnalysis = serde_json::from_str(payload.trim())?;
    if !raw.score.is_finite() || !(0.0..=100.0).contains(&raw.score) {
        return Err(AnalysisError::ScoreOutOfRange(raw.score));
    }
    Ok(AnalysisResult {
        score: raw.score.round() as u8,
        category: raw.category,
        judgment: raw.judgment,
        advice: raw.advice,
    })
}

/// 한 번의 분석을 수행한다. 재시도는 하지 않는다.
pub fn analyze(
    completion: &dyn Completion,
    grievance: &str,
    locale: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let prompt = build_prompt(grievance, locale);
    tracing::debug!(locale, prompt_len = prompt.len(), "requesting analysis");
    let payload = completion.complete(&prompt)?;
    parse_response(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_grievance_bands_and_locale() {
        let p = build_prompt("They \"borrowed\" my stapler", "es-ES");
        assert!(p.contains(r#"Grievance: "They "borrowed" my stapler""#));
        for (range, name, _) in BANDS {
            assert!(p.contains(&format!("- {range}: {name}")), "missing band {name}");
        }
        assert!(p.contains("DO NOT OUTPUT ANYTHING OTHER THAN VALID JSON."));
        assert!(p.ends_with("Please respond in es-ES language"));
        for field in ["\"score\"", "\"category\"", "\"judgment\"", "\"advice\""] {
            assert!(p.contains(field));
        }
    }

    #[test]
    fn parses_well_formed_payload() {
        let r = parse_response(
            r#" {"score":75,"category":"Pretty petty","judgment":"j","advice":"a"} "#,
        )
        .unwrap();
        assert_eq!(r.score, 75);
        assert_eq!(r.category, "Pretty petty");
    }

    #[test]
    fn fractional_score_is_rounded() {
        let r = parse_response(r#"{"score":62.6,"category":"c","judgment":"j","advice":"a"}"#)
            .unwrap();
        assert_eq!(r.score, 63);
    }

    #[test]
    fn rejects_prose_missing_fields_and_out_of_range() {
        assert!(matches!(
            parse_response("Sure! Here's your JSON"),
            Err(AnalysisError::Json(_))
        ));
        assert!(matches!(
            parse_response(r#"{"score":10,"category":"c","judgment":"j"}"#),
            Err(AnalysisError::Json(_))
        ));
        assert!(matches!(
            parse_response(r#"{"score":"high","category":"c","judgment":"j","advice":"a"}"#),
            Err(AnalysisError::Json(_))
        ));
        assert!(matches!(
            parse_response(r#"{"score":101,"category":"c","judgment":"j","advice":"a"}"#),
            Err(AnalysisError::ScoreOutOfRange(_))
        ));
        assert!(matches!(
            parse_response(r#"{"score":-1,"category":"c","judgment":"j","advice":"a"}"#),
            Err(AnalysisError::ScoreOutOfRange(_))
        ));
    }

    #[test]
    fn analyze_passes_prompt_to_completion() {
        let stub = |prompt: &str| -> Result<String, CompletionError> {
            assert!(prompt.contains("Grievance: \"loud chewing\""));
            Ok(r#"{"score":40,"category":"Reasonable gripe","judgment":"j","advice":"a"}"#.into())
        };
        let r = analyze(&stub, "loud chewing", "en-US").unwrap();
        assert_eq!(r.score, 40);
    }

    #[test]
    fn completion_failure_is_propagated() {
        let stub = |_: &str| -> Result<String, CompletionError> {
            Err(CompletionError::Rejected("offline".into()))
        };
        assert!(matches!(
            analyze(&stub, "x", "en-US"),
            Err(AnalysisError::Completion(_))
        ));
    }
}
