//! UI 상태와 상태 전이 함수.
//!
//! 모든 전이는 [`reduce`] 하나를 거친다. 입력 상태는 바꾸지 않고 새 상태와
//! 필요한 부수효과([`Effect`])를 돌려준다. 부수효과 실행은 [`crate::app`]이 맡는다.

use crate::analysis::AnalysisResult;
use crate::form::{self, FormError};
use crate::i18n::Translator;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub grievance_text: String,
    pub is_loading: bool,
    pub result: Option<AnalysisResult>,
    pub error: Option<FormError>,
    /// 애니메이션이 갱신하는 표시 점수. 사용자 입력이 아니다.
    pub display_score: u8,
}

/// 현재 보여줄 화면.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Form,
    Result,
}

impl UiState {
    pub fn view(&self) -> View {
        if self.result.is_some() {
            View::Result
        } else {
            View::Form
        }
    }

    /// 게이지에 표시할 점수. 결과가 없으면 0.
    pub fn shown_score(&self) -> u8 {
        if self.result.is_some() {
            self.display_score
        } else {
            0
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading && self.result.is_none()
    }

    pub fn error_message<'a>(&self, tr: &'a Translator) -> Option<&'a str> {
        self.error.map(|e| e.message(tr))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// 입력창 교체 (예시 칩 포함)
    SetText(String),
    Submit,
    AnalysisSucceeded(AnalysisResult),
    AnalysisFailed,
    /// 애니메이션 한 프레임
    ScoreFrame(u8),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestAnalysis { grievance: String },
    StartAnimation { target: u8 },
    CancelAnimation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: UiState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn unchanged(state: &UiState) -> Self {
        Self {
            state: state.clone(),
            effect: None,
        }
    }

    fn to(state: UiState) -> Self {
        Self {
            state,
            effect: None,
        }
    }

    fn with(state: UiState, effect: Effect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

pub fn reduce(state: &UiState, msg: Msg) -> Transition {
    match msg {
        Msg::SetText(text) => Transition::to(UiState {
            grievance_text: text,
            ..state.clone()
        }),

        Msg::Submit => {
            if !state.can_submit() {
                return Transition::unchanged(state);
            }
            match form::validate(&state.grievance_text) {
                Err(err) => Transition::to(UiState {
                    error: Some(err),
                    ..state.clone()
                }),
                Ok(grievance) => Transition::with(
                    UiState {
                        error: None,
                        is_loading: true,
                        display_score: 0,
                        ..state.clone()
                    },
                    Effect::RequestAnalysis {
                        grievance: grievance.to_string(),
                    },
                ),
            }
        }

        Msg::AnalysisSucceeded(result) => {
            if !state.is_loading {
                return Transition::unchanged(state);
            }
            let target = result.score;
            Transition::with(
                UiState {
                    is_loading: false,
                    result: Some(result),
                    display_score: 0,
                    ..state.clone()
                },
                Effect::StartAnimation { target },
            )
        }

        Msg::AnalysisFailed => {
            if !state.is_loading {
                return Transition::unchanged(state);
            }
            Transition::to(UiState {
                is_loading: false,
                error: Some(FormError::AnalysisFailed),
                ..state.clone()
            })
        }

        Msg::ScoreFrame(score) => match &state.result {
            Some(result) => Transition::to(UiState {
                display_score: score.min(result.score),
                ..state.clone()
            }),
            None => Transition::unchanged(state),
        },

        Msg::Reset => Transition::with(
            UiState {
                grievance_text: String::new(),
                result: None,
                display_score: 0,
                ..state.clone()
            },
            Effect::CancelAnimation,
        ),
    }
}
