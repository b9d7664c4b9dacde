//! 점수(0~100)를 게이지 표시값으로 바꾸는 순수 함수 모음.
//!
//! 좌표계는 200x130 뷰박스 기준이며, 반원 호의 전체 길이를 220으로 본다.

/// 호 전체 길이(좌표 단위).
pub const ARC_LENGTH: f64 = 220.0;
/// 반원 호의 중심 (뷰박스 좌표).
pub const ARC_CENTER: (f64, f64) = (100.0, 100.0);
/// 반원 호의 반지름.
pub const ARC_RADIUS: f64 = 70.0;
/// 호 선 두께.
pub const ARC_STROKE_WIDTH: f64 = 20.0;

/// 배경 트랙 색.
pub const TRACK_COLOR: Rgb = Rgb(0xE5, 0xE7, 0xEB);
/// 강조 색 (채움 호, 점수 텍스트, 버튼).
pub const ACCENT_COLOR: Rgb = Rgb(0xA8, 0x55, 0xF7);
/// 로딩 중 버튼 색.
pub const ACCENT_LIGHT_COLOR: Rgb = Rgb(0xC0, 0x84, 0xFC);
/// 본문 텍스트 색.
pub const TEXT_COLOR: Rgb = Rgb(0x45, 0x26, 0x0C);
/// 창 배경 색.
pub const PAGE_COLOR: Rgb = Rgb(0xE9, 0xD5, 0xFF);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// 점수 구간. 낮은 쪽부터 평가하며 처음 맞는 구간이 선택된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBand {
    /// 0..=20
    Band1,
    /// 21..=40
    Band2,
    /// 41..=60
    Band3,
    /// 61..=80
    Band4,
    /// 81..=100
    Band5,
}

impl ColorBand {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=20 => ColorBand::Band1,
            21..=40 => ColorBand::Band2,
            41..=60 => ColorBand::Band3,
            61..=80 => ColorBand::Band4,
            _ => ColorBand::Band5,
        }
    }

    /// 밝아지는 보라색 → 흰색 순서.
    pub fn color(self) -> Rgb {
        match self {
            ColorBand::Band1 => Rgb(0x93, 0x33, 0xEA),
            ColorBand::Band2 => Rgb(0xA8, 0x55, 0xF7),
            ColorBand::Band3 => Rgb(0xC0, 0x84, 0xFC),
            ColorBand::Band4 => Rgb(0xE9, 0xD5, 0xFF),
            ColorBand::Band5 => Rgb(0xFF, 0xFF, 0xFF),
        }
    }
}

/// 바늘 회전각. 0 → -90°, 100 → +90°.
pub fn rotation_deg(score: u8) -> f64 {
    f64::from(clamp_score(score)) * 1.8 - 90.0
}

/// 채워진 호 길이.
pub fn fill_length(score: u8) -> f64 {
    f64::from(clamp_score(score)) / 100.0 * ARC_LENGTH
}

/// stroke-dash 패턴 `[채움, 나머지]`. 나머지 구간은 보이지 않는다.
pub fn dash_pattern(score: u8) -> [f64; 2] {
    let fill = fill_length(score);
    [fill, ARC_LENGTH - fill]
}

/// 채움 비율(0.0~1.0).
pub fn fill_fraction(score: u8) -> f64 {
    fill_length(score) / ARC_LENGTH
}

/// 좌측(180°)에서 위쪽을 지나 우측(0°)까지 가는 반원 호 위의 점들을 만든다.
/// `fraction`만큼의 구간만 반환하며, y축은 화면 좌표(아래가 +)다.
pub fn arc_points(
    center: (f64, f64),
    radius: f64,
    fraction: f64,
    segments: usize,
) -> Vec<(f64, f64)> {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction <= 0.0 || segments == 0 {
        return Vec::new();
    }
    let sweep = std::f64::consts::PI * fraction;
    (0..=segments)
        .map(|i| {
            let theta = std::f64::consts::PI - sweep * (i as f64 / segments as f64);
            (
                center.0 + radius * theta.cos(),
                center.1 - radius * theta.sin(),
            )
        })
        .collect()
}

fn clamp_score(score: u8) -> u8 {
    score.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_length_endpoints_and_slope() {
        assert_eq!(fill_length(0), 0.0);
        assert!((fill_length(100) - 220.0).abs() < 1e-9);
        for s in 0..=100u8 {
            assert!((fill_length(s) - f64::from(s) * 2.2).abs() < 1e-9, "score {s}");
        }
    }

    #[test]
    fn fill_length_is_monotonic() {
        for s in 0..100u8 {
            assert!(fill_length(s) <= fill_length(s + 1));
        }
    }

    #[test]
    fn dash_pattern_sums_to_arc_length() {
        let [fill, rest] = dash_pattern(75);
        assert!((fill - 165.0).abs() < 1e-9);
        assert!((fill + rest - ARC_LENGTH).abs() < 1e-9);
    }

    #[test]
    fn band_boundaries_are_left_closed() {
        assert_eq!(ColorBand::for_score(0), ColorBand::Band1);
        assert_eq!(ColorBand::for_score(20), ColorBand::Band1);
        assert_eq!(ColorBand::for_score(21), ColorBand::Band2);
        assert_eq!(ColorBand::for_score(40), ColorBand::Band2);
        assert_eq!(ColorBand::for_score(41), ColorBand::Band3);
        assert_eq!(ColorBand::for_score(60), ColorBand::Band3);
        assert_eq!(ColorBand::for_score(61), ColorBand::Band4);
        assert_eq!(ColorBand::for_score(80), ColorBand::Band4);
        assert_eq!(ColorBand::for_score(81), ColorBand::Band5);
        assert_eq!(ColorBand::for_score(100), ColorBand::Band5);
    }

    #[test]
    fn band_colors_match_palette() {
        assert_eq!(ColorBand::Band1.color().hex(), "#9333EA");
        assert_eq!(ColorBand::Band5.color().hex(), "#FFFFFF");
    }

    #[test]
    fn rotation_maps_to_half_turn() {
        assert_eq!(rotation_deg(0), -90.0);
        assert!((rotation_deg(50) - 0.0).abs() < 1e-9);
        assert!((rotation_deg(100) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn full_arc_runs_left_to_right_through_top() {
        let pts = arc_points(ARC_CENTER, ARC_RADIUS, 1.0, 4);
        assert_eq!(pts.len(), 5);
        let (x0, y0) = pts[0];
        let (xm, ym) = pts[2];
        let (x1, y1) = pts[4];
        assert!((x0 - 30.0).abs() < 1e-9 && (y0 - 100.0).abs() < 1e-9);
        assert!((xm - 100.0).abs() < 1e-9 && (ym - 30.0).abs() < 1e-9);
        assert!((x1 - 170.0).abs() < 1e-9 && (y1 - 100.0).abs() < 1e-9);
        assert!(arc_points(ARC_CENTER, ARC_RADIUS, 0.0, 4).is_empty());
    }
}
