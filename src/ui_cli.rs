use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use crate::animation::Ticker;
use crate::app::{AppError, Controller};
use crate::gauge;
use crate::i18n::keys;
use crate::state::Msg;

/// 터미널 게이지 칸 수. 호 길이 220을 10 단위로 나눈 값.
pub const GAUGE_CELLS: usize = 22;
/// 대략 60Hz.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// 다음 틱 요청을 기록해 두었다가 루프가 짧게 쉬고 다시 돈다.
#[derive(Debug, Default)]
pub struct SleepTicker {
    requested: bool,
}

impl SleepTicker {
    /// 예약된 틱이 있으면 한 프레임 쉬고 true.
    pub fn wait_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.requested) {
            return false;
        }
        thread::sleep(FRAME_INTERVAL);
        true
    }
}

impl Ticker for SleepTicker {
    fn request_tick(&mut self) {
        self.requested = true;
    }
}

/// 점수를 `[█████░░░]  42%` 형태로 그린다. 채움 칸은 dash 패턴의 채움 길이를 따른다.
pub fn gauge_line(score: u8) -> String {
    let [fill, _] = gauge::dash_pattern(score);
    let filled = ((fill / gauge::ARC_LENGTH) * GAUGE_CELLS as f64).round() as usize;
    let filled = filled.min(GAUGE_CELLS);
    format!(
        "[{}{}] {score:>3}%",
        "█".repeat(filled),
        "░".repeat(GAUGE_CELLS - filled)
    )
}

/// 입력 프롬프트를 출력하고 한 줄을 읽는다.
pub fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

/// 요청을 보내고 결과를 기다린 뒤 애니메이션을 끝까지 재생한다.
/// 성공하면 true, 검증/분석 실패면 오류 메시지를 출력하고 false.
pub fn run_analysis(
    controller: &mut Controller,
    grievance: String,
    animate: bool,
) -> Result<bool, AppError> {
    let mut ticker = SleepTicker::default();
    controller.dispatch(Msg::SetText(grievance), Instant::now(), &mut ticker);
    controller.dispatch(Msg::Submit, Instant::now(), &mut ticker);
    if controller.state().is_loading {
        println!("{}", controller.translator().t(keys::ANALYZING_BUTTON));
        controller.wait_for_analysis(&mut ticker);
    }

    if let Some(msg) = controller.state().error_message(controller.translator()) {
        eprintln!("{msg}");
        return Ok(false);
    }

    if animate {
        let mut out = io::stdout();
        while ticker.wait_frame() {
            controller.poll(Instant::now(), &mut ticker);
            write!(out, "\r{}", gauge_line(controller.state().shown_score()))?;
            out.flush()?;
        }
        writeln!(out)?;
    } else {
        let t_end = Instant::now() + crate::animation::DURATION;
        controller.poll(t_end, &mut ticker);
        println!("{}", gauge_line(controller.state().shown_score()));
    }

    print_result(controller);
    Ok(true)
}

fn print_result(controller: &Controller) {
    let Some(result) = &controller.state().result else {
        return;
    };
    let tr = controller.translator();
    println!("{}: {}", tr.t(keys::CLI_CATEGORY), result.category);
    println!();
    println!("-- {} --", tr.t(keys::ANALYSIS_TITLE));
    println!("{}", result.judgment);
    println!();
    println!("-- {} --", tr.t(keys::ADVICE_TITLE));
    println!("{}", result.advice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_line_fills_proportionally() {
        assert_eq!(gauge_line(0), format!("[{}]   0%", "░".repeat(GAUGE_CELLS)));
        assert_eq!(gauge_line(100), format!("[{}] 100%", "█".repeat(GAUGE_CELLS)));
        let half = gauge_line(50);
        assert_eq!(half.matches('█').count(), GAUGE_CELLS / 2);
    }

    #[test]
    fn sleep_ticker_only_waits_when_requested() {
        let mut t = SleepTicker::default();
        assert!(!t.wait_frame());
        t.request_tick();
        assert!(t.wait_frame());
        assert!(!t.wait_frame());
    }
}
