//! 점수 애니메이션. 0에서 목표 점수까지 1.5초 동안 cubic ease-out으로 올라간다.
//!
//! 실제 프레임 스케줄링은 프런트엔드가 [`Ticker`]로 제공한다 (egui 재그리기 요청,
//! CLI 슬립 루프 등).

use std::time::{Duration, Instant};

/// 애니메이션 전체 길이.
pub const DURATION: Duration = Duration::from_millis(1500);

/// 다음 프레임을 예약하는 스케줄러.
pub trait Ticker {
    fn request_tick(&mut self);
}

/// 진행 중인 애니메이션을 가리키는 취소 핸들.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationHandle(u64);

/// 한 틱의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub score: u8,
    pub done: bool,
}

#[derive(Debug, Clone, Copy)]
struct Run {
    handle: AnimationHandle,
    target: u8,
    started: Instant,
}

/// idle / animating 두 상태를 가진 점수 애니메이터.
#[derive(Debug, Default)]
pub struct ScoreAnimator {
    run: Option<Run>,
    next_id: u64,
}

impl ScoreAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 새 애니메이션을 시작한다. 진행 중인 것이 있으면 먼저 취소하고 0부터 다시 시작한다.
    pub fn start(&mut self, target: u8, now: Instant, ticker: &mut impl Ticker) -> AnimationHandle {
        self.next_id += 1;
        let handle = AnimationHandle(self.next_id);
        self.run = Some(Run {
            handle,
            target: target.min(100),
            started: now,
        });
        ticker.request_tick();
        handle
    }

    /// 핸들이 현재 실행 중인 애니메이션과 같을 때만 멈춘다.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        match self.run {
            Some(run) if run.handle == handle => {
                self.run = None;
                true
            }
            _ => false,
        }
    }

    /// 진행 중인 애니메이션을 무조건 멈춘다.
    pub fn stop(&mut self) {
        self.run = None;
    }

    pub fn is_animating(&self) -> bool {
        self.run.is_some()
    }

    pub fn current(&self) -> Option<AnimationHandle> {
        self.run.map(|r| r.handle)
    }

    /// 한 프레임 진행한다. 끝나지 않았으면 다음 틱을 예약하고, 끝나면 idle로 돌아간다.
    /// idle 상태면 None.
    pub fn tick(&mut self, now: Instant, ticker: &mut impl Ticker) -> Option<Frame> {
        let run = self.run?;
        let progress = progress(run.started, now);
        let frame = Frame {
            score: eased_score(run.target, progress),
            done: progress >= 1.0,
        };
        if frame.done {
            self.run = None;
        } else {
            ticker.request_tick();
        }
        Some(frame)
    }
}

/// `clamp((now - start) / DURATION, 0, 1)`
pub fn progress(started: Instant, now: Instant) -> f64 {
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f64() / DURATION.as_secs_f64()).clamp(0.0, 1.0)
}

/// `1 - (1 - p)^3`
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress.clamp(0.0, 1.0)).powi(3)
}

/// 시작값은 항상 0.
pub fn eased_score(target: u8, progress: f64) -> u8 {
    (ease_out_cubic(progress) * f64::from(target)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingTicker {
        requests: usize,
    }

    impl Ticker for CountingTicker {
        fn request_tick(&mut self) {
            self.requests += 1;
        }
    }

    #[test]
    fn ease_out_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn runs_from_zero_to_target_monotonically() {
        for target in [0u8, 1, 37, 75, 100] {
            let mut ticker = CountingTicker::default();
            let mut anim = ScoreAnimator::new();
            let t0 = Instant::now();
            anim.start(target, t0, &mut ticker);

            let first = anim.tick(t0, &mut ticker).unwrap();
            assert_eq!(first.score, 0);

            let mut last = first.score;
            let mut final_frame = first;
            for ms in (16..=1600).step_by(16) {
                let Some(frame) = anim.tick(t0 + Duration::from_millis(ms), &mut ticker) else {
                    break;
                };
                assert!(frame.score >= last, "target {target} went backwards at {ms}ms");
                last = frame.score;
                final_frame = frame;
            }
            assert!(final_frame.done);
            assert_eq!(final_frame.score, target);
            assert!(!anim.is_animating());
        }
    }

    #[test]
    fn completes_exactly_at_duration() {
        let mut ticker = CountingTicker::default();
        let mut anim = ScoreAnimator::new();
        let t0 = Instant::now();
        anim.start(90, t0, &mut ticker);
        let frame = anim.tick(t0 + DURATION, &mut ticker).unwrap();
        assert_eq!(frame, Frame { score: 90, done: true });
        assert_eq!(anim.tick(t0 + DURATION * 2, &mut ticker), None);
    }

    #[test]
    fn stops_requesting_ticks_once_idle() {
        let mut ticker = CountingTicker::default();
        let mut anim = ScoreAnimator::new();
        let t0 = Instant::now();
        anim.start(50, t0, &mut ticker);
        assert_eq!(ticker.requests, 1);
        anim.tick(t0 + Duration::from_millis(100), &mut ticker);
        assert_eq!(ticker.requests, 2);
        anim.tick(t0 + DURATION, &mut ticker);
        assert_eq!(ticker.requests, 2);
    }

    #[test]
    fn restart_cancels_previous_run() {
        let mut ticker = CountingTicker::default();
        let mut anim = ScoreAnimator::new();
        let t0 = Instant::now();
        let first = anim.start(100, t0, &mut ticker);
        anim.tick(t0 + Duration::from_millis(700), &mut ticker);

        let t1 = t0 + Duration::from_millis(800);
        let second = anim.start(20, t1, &mut ticker);
        assert_ne!(first, second);
        assert_eq!(anim.tick(t1, &mut ticker).unwrap().score, 0);

        // 이전 핸들로는 새 애니메이션을 멈출 수 없다.
        assert!(!anim.cancel(first));
        assert!(anim.is_animating());
        assert!(anim.cancel(second));
        assert!(!anim.is_animating());
    }
}
