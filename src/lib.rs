//! 불만 한 줄을 언어 모델에 보내 쪼잔함 점수(0~100)를 받아오는 위젯.
//! 핵심 로직을 라이브러리로 분리하여 GUI와 CLI가 같은 상태 전이를 공유한다.

pub mod analysis;
pub mod animation;
pub mod app;
pub mod completion;
pub mod config;
pub mod form;
pub mod gauge;
pub mod i18n;
pub mod state;
pub mod ui_cli;
