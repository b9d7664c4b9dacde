#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use std::{env, path::PathBuf, sync::Arc, time::Instant};
use pettiness_meter::{
    animation::Ticker,
    app::Controller,
    completion::{Completion, CompletionError, MessagesClient},
    config,
    form::Example,
    gauge::{self, Rgb},
    i18n::{self, keys, SysLocale, Translator},
    state::{Msg, UiState, View},
};

/// 게이지 뷰박스(200x130)를 화면에 그릴 배율.
const GAUGE_SCALE: f32 = 1.6;
const CARD_COLOR: egui::Color32 = egui::Color32::WHITE;
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xDC, 0x26, 0x26);
const QUOTE_FILL: Rgb = Rgb(0xF9, 0xFA, 0xFB);
const JUDGMENT_FILL: Rgb = Rgb(0xFA, 0xF5, 0xFF);
const ADVICE_FILL: Rgb = Rgb(0xF3, 0xE8, 0xFF);

fn main() -> Result<(), eframe::Error> {
    // CLI 옵션 처리: --lang xx / --lang=xx, --config path
    let mut cli_lang: Option<String> = None;
    let mut config_path = PathBuf::from(config::DEFAULT_CONFIG_PATH);
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if let Some(val) = a.strip_prefix("--config=") {
            config_path = PathBuf::from(val);
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        } else if a == "--config" && i + 1 < args.len() {
            config_path = PathBuf::from(&args[i + 1]);
            i += 1;
        }
        i += 1;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    let app_cfg = config::load_or_default(&config_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "falling back to default config");
        config::Config::default()
    });

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([640.0, 820.0])
        .with_min_inner_size([420.0, 560.0])
        .with_transparent(true);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Pettiness Meter",
        options,
        Box::new(move |cc| {
            let mut app = GuiApp::new(app_cfg, config_path, cli_lang);
            let ctx = cc.egui_ctx.clone();
            app.controller.set_waker(move || ctx.request_repaint());
            Box::new(app)
        }),
    )
}

/// egui 프레임 루프를 애니메이션 스케줄러로 쓴다.
struct RepaintTicker<'a>(&'a egui::Context);

impl Ticker for RepaintTicker<'_> {
    fn request_tick(&mut self) {
        self.0.request_repaint();
    }
}

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// 한 프레임 동안 모은 사용자 입력.
enum UiAction {
    Dispatch(Msg),
    Example(Example),
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    controller: Controller,
    show_settings: bool,
    lang_input: String,
    window_alpha: f32,
    save_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, config_path: PathBuf, cli_lang: Option<String>) -> Self {
        let locale =
            i18n::resolve_startup_locale(cli_lang.as_deref(), config.language_override(), &SysLocale);
        tracing::info!(locale, "starting GUI");
        let tr = Translator::new_with_pack(locale, config.language_pack_dir.as_deref());
        let completion: Arc<dyn Completion> = match MessagesClient::from_config(&config.api) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                // 창은 띄우고, 요청마다 일반 실패 메시지를 보여준다.
                tracing::error!(error = %e, "HTTP client setup failed");
                let reason = e.to_string();
                Arc::new(move |_: &str| -> Result<String, CompletionError> {
                    Err(CompletionError::Rejected(reason.clone()))
                })
            }
        };
        Self {
            lang_input: config.language.clone(),
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            controller: Controller::new(tr, completion),
            config,
            config_path,
            show_settings: false,
            save_status: None,
        }
    }

    /// 설정창에서 고른 언어를 즉시 반영한다.
    fn apply_language(&mut self, lang: &str) {
        self.config.language = lang.to_string();
        let locale = i18n::resolve_startup_locale(None, self.config.language_override(), &SysLocale);
        self.controller.set_translator(Translator::new_with_pack(
            locale,
            self.config.language_pack_dir.as_deref(),
        ));
    }

    fn save_settings(&mut self) {
        let lang = self.lang_input.clone();
        self.apply_language(&lang);
        self.config.window_alpha = self.window_alpha;
        let tr = self.controller.translator();
        self.save_status = Some(match self.config.save(&self.config_path) {
            Ok(()) => tr.t(keys::SETTINGS_SAVED).to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "settings save failed");
                format!("{}: {e}", tr.t(keys::SETTINGS_SAVE_FAILED))
            }
        });
    }

    fn ui_gauge(ui: &mut egui::Ui, state: &UiState) {
        let size = egui::vec2(200.0 * GAUGE_SCALE, 130.0 * GAUGE_SCALE);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let origin = response.rect.min;
        let to_screen = |(x, y): (f64, f64)| {
            origin + egui::vec2(x as f32 * GAUGE_SCALE, y as f32 * GAUGE_SCALE)
        };
        let stroke_w = gauge::ARC_STROKE_WIDTH as f32 * GAUGE_SCALE;

        let draw_arc = |fraction: f64, c: egui::Color32| {
            let points: Vec<egui::Pos2> =
                gauge::arc_points(gauge::ARC_CENTER, gauge::ARC_RADIUS, fraction, 96)
                    .into_iter()
                    .map(to_screen)
                    .collect();
            if let (Some(first), Some(last)) = (points.first().copied(), points.last().copied()) {
                painter.add(egui::Shape::line(points, egui::Stroke::new(stroke_w, c)));
                // round cap
                painter.circle_filled(first, stroke_w / 2.0, c);
                painter.circle_filled(last, stroke_w / 2.0, c);
            }
        };

        let score = state.shown_score();
        draw_arc(1.0, color(gauge::TRACK_COLOR));
        draw_arc(gauge::fill_fraction(score), color(gauge::ACCENT_COLOR));

        // 바늘: -90°(왼쪽) ~ +90°(오른쪽)
        let angle = gauge::rotation_deg(score).to_radians();
        let center = to_screen(gauge::ARC_CENTER);
        let len = 52.0 * GAUGE_SCALE;
        let tip = center + egui::vec2(angle.sin() as f32 * len, -(angle.cos() as f32) * len);
        let text_color = color(gauge::TEXT_COLOR);
        painter.line_segment([center, tip], egui::Stroke::new(3.0, text_color));
        painter.circle(
            tip,
            6.0,
            color(gauge::ColorBand::for_score(score).color()),
            egui::Stroke::new(2.0, color(gauge::ACCENT_COLOR)),
        );
        painter.circle_filled(center, 5.0, text_color);

        let label_font = egui::FontId::proportional(12.0);
        for (pos, text) in [((28.0, 125.0), "0"), ((100.0, 15.0), "50"), ((172.0, 125.0), "100")] {
            painter.text(
                to_screen(pos),
                egui::Align2::CENTER_CENTER,
                text,
                label_font.clone(),
                text_color,
            );
        }

        ui.vertical_centered(|ui| {
            ui.label(
                egui::RichText::new(format!("{score}%"))
                    .size(44.0)
                    .strong()
                    .color(color(gauge::ACCENT_COLOR)),
            );
            if let Some(result) = &state.result {
                ui.label(
                    egui::RichText::new(&result.category)
                        .size(14.0)
                        .color(color(gauge::ACCENT_COLOR)),
                );
            }
        });
    }

    fn ui_form(ui: &mut egui::Ui, state: &UiState, tr: &Translator, actions: &mut Vec<UiAction>) {
        let mut text = state.grievance_text.clone();
        let edit = egui::TextEdit::multiline(&mut text)
            .hint_text(tr.t(keys::INPUT_PLACEHOLDER))
            .desired_rows(4)
            .desired_width(f32::INFINITY);
        if ui.add(edit).changed() {
            actions.push(UiAction::Dispatch(Msg::SetText(text)));
        }

        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            for example in Example::ALL {
                let chip = egui::Button::new(
                    egui::RichText::new(tr.t(example.label_key())).color(color(gauge::TEXT_COLOR)),
                )
                .fill(CARD_COLOR)
                .stroke(egui::Stroke::new(1.0, color(gauge::ACCENT_COLOR)));
                if ui.add(chip).clicked() {
                    actions.push(UiAction::Example(example));
                }
            }
        });

        if let Some(msg) = state.error_message(tr) {
            ui.add_space(6.0);
            ui.label(egui::RichText::new(format!("⚠ {msg}")).color(ERROR_COLOR));
        }

        ui.add_space(10.0);
        let (label, fill) = if state.is_loading {
            (tr.t(keys::ANALYZING_BUTTON), gauge::ACCENT_LIGHT_COLOR)
        } else {
            (tr.t(keys::ANALYZE_BUTTON), gauge::ACCENT_COLOR)
        };
        let button = egui::Button::new(
            egui::RichText::new(label)
                .strong()
                .size(16.0)
                .color(egui::Color32::WHITE),
        )
        .fill(color(fill))
        .min_size(egui::vec2(ui.available_width(), 44.0));
        if ui.add_enabled(state.can_submit(), button).clicked() {
            actions.push(UiAction::Dispatch(Msg::Submit));
        }
        if state.is_loading {
            ui.vertical_centered(|ui| {
                ui.spinner();
            });
        }
    }

    fn ui_result(ui: &mut egui::Ui, state: &UiState, tr: &Translator, actions: &mut Vec<UiAction>) {
        let Some(result) = &state.result else {
            return;
        };
        let text_color = color(gauge::TEXT_COLOR);
        let boxed = |ui: &mut egui::Ui, fill: Rgb, text: egui::RichText| {
            egui::Frame::none()
                .fill(color(fill))
                .rounding(8.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(text);
                });
        };

        boxed(
            ui,
            QUOTE_FILL,
            egui::RichText::new(format!("\"{}\"", state.grievance_text))
                .italics()
                .color(text_color),
        );
        ui.add_space(12.0);
        ui.separator();
        ui.add_space(12.0);

        ui.label(egui::RichText::new(tr.t(keys::ANALYSIS_TITLE)).size(18.0).strong().color(text_color));
        boxed(ui, JUDGMENT_FILL, egui::RichText::new(&result.judgment).color(text_color));
        ui.add_space(12.0);
        ui.label(egui::RichText::new(tr.t(keys::ADVICE_TITLE)).size(18.0).strong().color(text_color));
        boxed(ui, ADVICE_FILL, egui::RichText::new(&result.advice).color(text_color));

        ui.add_space(16.0);
        let reset = egui::Button::new(
            egui::RichText::new(tr.t(keys::TRY_ANOTHER_BUTTON))
                .strong()
                .color(color(gauge::ACCENT_COLOR)),
        )
        .fill(CARD_COLOR)
        .stroke(egui::Stroke::new(2.0, color(gauge::ACCENT_COLOR)))
        .min_size(egui::vec2(ui.available_width(), 40.0));
        if ui.add(reset).clicked() {
            actions.push(UiAction::Dispatch(Msg::Reset));
        }
    }

    fn ui_settings(&mut self, ctx: &egui::Context) {
        let tr = self.controller.translator().clone();
        let mut save_clicked = false;
        egui::Window::new(tr.t(keys::SETTINGS_TITLE))
            .collapsible(false)
            .resizable(false)
            .open(&mut self.show_settings)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::SETTINGS_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.as_str())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".into(),
                            tr.t(keys::SETTINGS_LANGUAGE_AUTO),
                        );
                        ui.selectable_value(&mut self.lang_input, "en-US".into(), "English (US)");
                        ui.selectable_value(&mut self.lang_input, "es-ES".into(), "Español");
                    });
                ui.separator();
                ui.label(tr.t(keys::SETTINGS_ALPHA));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.separator();
                if ui.button(tr.t(keys::SETTINGS_SAVE)).clicked() {
                    save_clicked = true;
                }
                if let Some(msg) = &self.save_status {
                    ui.label(msg.as_str());
                }
            });
        if save_clicked {
            self.save_settings();
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut ticker = RepaintTicker(ctx);
        self.controller.poll(Instant::now(), &mut ticker);

        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.panel_fill = color(gauge::PAGE_COLOR).linear_multiply(self.window_alpha);
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let tr = self.controller.translator().clone();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(tr.t(keys::SETTINGS_TITLE)).clicked() {
                        self.show_settings = true;
                    }
                });
            });
        });

        if self.show_settings {
            self.ui_settings(ctx);
        }

        let state = self.controller.state().clone();
        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let text_color = color(gauge::TEXT_COLOR);
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(tr.t(keys::TITLE)).size(36.0).strong().color(text_color));
                        ui.label(egui::RichText::new(tr.t(keys::SUBTITLE)).color(text_color));
                    });
                    ui.add_space(16.0);

                    egui::Frame::none()
                        .fill(CARD_COLOR)
                        .rounding(16.0)
                        .inner_margin(24.0)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.vertical_centered(|ui| Self::ui_gauge(ui, &state));
                            ui.add_space(16.0);
                            ui.label(
                                egui::RichText::new(tr.t(keys::INPUT_LABEL))
                                    .size(18.0)
                                    .strong()
                                    .color(text_color),
                            );
                            ui.add_space(6.0);
                            match state.view() {
                                View::Form => Self::ui_form(ui, &state, &tr, &mut actions),
                                View::Result => Self::ui_result(ui, &state, &tr, &mut actions),
                            }
                        });
                });
        });

        let now = Instant::now();
        for action in actions {
            match action {
                UiAction::Dispatch(msg) => self.controller.dispatch(msg, now, &mut ticker),
                UiAction::Example(example) => self.controller.use_example(example, now, &mut ticker),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GuiApp {
        let dir = std::env::temp_dir();
        GuiApp::new(
            config::Config::default(),
            dir.join("pettiness_meter_gui_test.toml"),
            Some("en-US".into()),
        )
    }

    #[test]
    fn cli_language_is_applied_on_start() {
        let app = app();
        assert_eq!(app.controller.translator().locale(), "en-US");
        assert_eq!(app.lang_input, "auto");
    }

    #[test]
    fn switching_language_updates_translator() {
        let mut app = app();
        app.apply_language("es-ES");
        assert_eq!(app.controller.translator().locale(), "es-ES");
        assert_eq!(app.config.language, "es-ES");
        assert_eq!(app.controller.translator().t(keys::ADVICE_TITLE), "Consejo");
    }

    #[test]
    fn saving_settings_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = GuiApp::new(config::Config::default(), path.clone(), None);
        app.lang_input = "es-ES".into();
        app.window_alpha = 0.5;
        app.save_settings();
        assert_eq!(app.save_status.as_deref(), Some("Guardado."));
        let saved = config::load_or_default(&path).unwrap();
        assert_eq!(saved.language, "es-ES");
        assert_eq!(saved.window_alpha, 0.5);
    }
}
