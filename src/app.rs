use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use thiserror::Error;

use crate::analysis::{self, AnalysisError, AnalysisResult};
use crate::animation::{ScoreAnimator, Ticker};
use crate::completion::{Completion, CompletionError};
use crate::config::ConfigError;
use crate::form::Example;
use crate::i18n::Translator;
use crate::state::{self, Effect, Msg, UiState};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("완성 서비스 오류: {0}")]
    Completion(#[from] CompletionError),
    #[error("{0}")]
    Failed(String),
}

type Outcome = Result<AnalysisResult, AnalysisError>;

/// 상태, 애니메이터, 진행 중인 요청 하나를 묶어 관리한다.
/// 프런트엔드는 사용자 입력을 [`Controller::dispatch`]로 넘기고 매 프레임 [`Controller::poll`]을 부른다.
pub struct Controller {
    state: UiState,
    tr: Translator,
    completion: Arc<dyn Completion>,
    animator: ScoreAnimator,
    pending: Option<Receiver<Outcome>>,
    waker: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl Controller {
    pub fn new(tr: Translator, completion: Arc<dyn Completion>) -> Self {
        Self {
            state: UiState::default(),
            tr,
            completion,
            animator: ScoreAnimator::new(),
            pending: None,
            waker: None,
        }
    }

    /// 워커 스레드가 결과를 보낸 직후 호출된다 (egui 재그리기 요청 등).
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn translator(&self) -> &Translator {
        &self.tr
    }

    /// 언어를 바꾼다. 이미 표시 중인 결과 텍스트는 그대로 둔다.
    pub fn set_translator(&mut self, tr: Translator) {
        tracing::info!(locale = tr.locale(), "locale changed");
        self.tr = tr;
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn dispatch(&mut self, msg: Msg, now: Instant, ticker: &mut impl Ticker) {
        let transition = state::reduce(&self.state, msg);
        self.state = transition.state;
        if let Some(effect) = transition.effect {
            self.run_effect(effect, now, ticker);
        }
    }

    /// 예시 칩: 현재 로케일의 예시 문장으로 입력을 교체한다.
    pub fn use_example(&mut self, example: Example, now: Instant, ticker: &mut impl Ticker) {
        let text = self.tr.t(example.text_key()).to_string();
        self.dispatch(Msg::SetText(text), now, ticker);
    }

    /// 도착한 분석 결과와 애니메이션 프레임을 반영한다.
    pub fn poll(&mut self, now: Instant, ticker: &mut impl Ticker) {
        if let Some(rx) = &self.pending {
            match rx.try_recv() {
                Ok(outcome) => {
                    self.pending = None;
                    self.settle(outcome, now, ticker);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    tracing::error!("analysis worker exited without a result");
                    self.dispatch(Msg::AnalysisFailed, now, ticker);
                }
            }
        }
        if let Some(frame) = self.animator.tick(now, ticker) {
            self.dispatch(Msg::ScoreFrame(frame.score), now, ticker);
        }
    }

    /// 진행 중인 요청이 끝날 때까지 블록한다. CLI와 테스트용.
    pub fn wait_for_analysis(&mut self, ticker: &mut impl Ticker) {
        let Some(rx) = self.pending.take() else {
            return;
        };
        let outcome = rx.recv().unwrap_or_else(|_| {
            Err(AnalysisError::Completion(CompletionError::Rejected(
                "analysis worker exited without a result".into(),
            )))
        });
        self.settle(outcome, Instant::now(), ticker);
    }

    fn settle(&mut self, outcome: Outcome, now: Instant, ticker: &mut impl Ticker) {
        match outcome {
            Ok(result) => {
                tracing::info!(score = result.score, category = %result.category, "analysis complete");
                self.dispatch(Msg::AnalysisSucceeded(result), now, ticker);
            }
            Err(err) => {
                tracing::error!(error = %err, "analysis failed");
                self.dispatch(Msg::AnalysisFailed, now, ticker);
            }
        }
    }

    fn run_effect(&mut self, effect: Effect, now: Instant, ticker: &mut impl Ticker) {
        match effect {
            Effect::RequestAnalysis { grievance } => {
                tracing::info!(chars = grievance.chars().count(), locale = self.tr.locale(), "submitting grievance");
                match self.spawn_analysis(grievance) {
                    Ok(rx) => self.pending = Some(rx),
                    Err(err) => {
                        tracing::error!(error = %err, "could not start analysis worker");
                        self.dispatch(Msg::AnalysisFailed, now, ticker);
                    }
                }
            }
            Effect::StartAnimation { target } => {
                self.animator.start(target, now, ticker);
            }
            Effect::CancelAnimation => {
                if let Some(handle) = self.animator.current() {
                    self.animator.cancel(handle);
                }
            }
        }
    }

    fn spawn_analysis(&self, grievance: String) -> std::io::Result<Receiver<Outcome>> {
        let (tx, rx) = mpsc::channel();
        let completion = Arc::clone(&self.completion);
        let locale = self.tr.locale();
        let waker = self.waker.clone();
        thread::Builder::new()
            .name("analysis".into())
            .spawn(move || {
                let outcome = analysis::analyze(completion.as_ref(), &grievance, locale);
                // 수신 측이 사라졌으면 버린다.
                let _ = tx.send(outcome);
                if let Some(wake) = waker {
                    wake();
                }
            })?;
        Ok(rx)
    }
}
