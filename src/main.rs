use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pettiness_meter::{
    app::{AppError, Controller},
    completion::MessagesClient,
    config,
    form::Example,
    i18n::{self, keys, SysLocale, Translator},
    ui_cli,
};

/// 터미널에서 불만을 입력받아 쪼잔함 점수를 보여준다.
#[derive(Debug, Parser)]
#[command(name = "pettiness_meter_cli", version)]
struct Cli {
    /// 분석할 불만. 생략하면 표준 입력에서 묻는다.
    grievance: Option<String>,

    /// 예시 불만 사용: loud-breathing, door-holding, fish-microwaver, wrong-tp
    #[arg(long, value_parser = parse_example, conflicts_with = "grievance")]
    example: Option<Example>,

    /// 표시 언어 (auto, en-US, es-ES, ...)
    #[arg(long, short = 'L')]
    lang: Option<String>,

    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// 게이지 애니메이션 없이 최종 점수만 출력
    #[arg(long)]
    no_animation: bool,
}

fn parse_example(s: &str) -> Result<Example, String> {
    Example::from_slug(s).ok_or_else(|| {
        let valid: Vec<_> = Example::ALL.iter().map(|e| e.slug()).collect();
        format!("unknown example '{s}' (expected one of: {})", valid.join(", "))
    })
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 한 번의 분석을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match try_run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("오류: {err}");
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<bool, AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let locale = i18n::resolve_startup_locale(
        cli.lang.as_deref(),
        cfg.language_override(),
        &SysLocale,
    );
    tracing::debug!(locale, "resolved locale");
    let tr = Translator::new_with_pack(locale, cfg.language_pack_dir.as_deref());

    let grievance = match (cli.grievance, cli.example) {
        (Some(text), _) => text,
        (None, Some(example)) => tr.t(example.text_key()).to_string(),
        (None, None) => {
            println!("{}", tr.t(keys::TITLE));
            println!("{}", tr.t(keys::SUBTITLE));
            ui_cli::read_line(tr.t(keys::CLI_PROMPT))?
        }
    };

    let client = MessagesClient::from_config(&cfg.api)?;
    let mut controller = Controller::new(tr, Arc::new(client));
    ui_cli::run_analysis(&mut controller, grievance, !cli.no_animation)
}
