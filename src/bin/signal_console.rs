use anyhow::{Context, Result, bail};
use chrono::Utc;
use log::{debug, info, warn};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use trading_signals::analyzer::AnalysisFrame;
use trading_signals::bar_series::BarSeries;
use trading_signals::config::AnalysisConfig;
use trading_signals::config_loader::{ConfigFormat, ConfigLoader};
use trading_signals::indicator::obv::VolumePressure;
use trading_signals::model::{Bar, PivotKind};
use trading_signals::period::AnalysisPeriod;

const HELP: &str = "\
명령어:
  summary        최근 봉 요약
  pivots         지지/저항 후보와 가격대
  flow           OBV 매집/분산 국면
  volume         가격/거래량 동반 변화
  rows [n]       최근 n개 행 (기본값 10)
  period <기간>  분석 기간 변경 (예: 1w, 3m, 1y, ytd, all)
  help           도움말
  quit           종료";

/// 콘솔 명령
#[derive(Debug, PartialEq)]
enum Command {
    Summary,
    Pivots,
    Flow,
    Volume,
    Rows(usize),
    Period(AnalysisPeriod),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts.next();

    let command = match (name.as_str(), arg) {
        ("summary" | "s", _) => Command::Summary,
        ("pivots" | "p", _) => Command::Pivots,
        ("flow" | "f", _) => Command::Flow,
        ("volume" | "v", _) => Command::Volume,
        ("rows" | "r", None) => Command::Rows(10),
        ("rows" | "r", Some(n)) => Command::Rows(
            n.parse()
                .with_context(|| format!("행 수는 숫자여야 합니다: {}", n))?,
        ),
        ("period", Some(p)) => Command::Period(p.parse()?),
        ("period", None) => bail!("기간을 입력하세요 (예: period 3m)"),
        ("help" | "h" | "?", _) => Command::Help,
        ("quit" | "q" | "exit", _) => Command::Quit,
        (other, _) => bail!("알 수 없는 명령: '{}' (help 입력)", other),
    };
    Ok(command)
}

/// 분석 세션 (전체 시계열과 현재 기간의 분석 프레임)
struct Session {
    series: BarSeries<Bar>,
    config: AnalysisConfig,
    period: AnalysisPeriod,
    view: BarSeries<Bar>,
    frame: AnalysisFrame,
}

impl Session {
    fn new(series: BarSeries<Bar>, config: AnalysisConfig) -> Result<Session> {
        let period = config.analysis_period()?;
        let view = series.since(period.start_date(Utc::now())?);
        let frame = AnalysisFrame::build(&view, &config)?;
        Ok(Session {
            series,
            config,
            period,
            view,
            frame,
        })
    }

    fn set_period(&mut self, period: AnalysisPeriod) -> Result<()> {
        let view = self.series.since(period.start_date(Utc::now())?);
        self.frame = AnalysisFrame::build(&view, &self.config)?;
        self.view = view;
        self.period = period;
        info!("분석 기간 변경: {} ({}개 봉)", period, self.view.len());
        Ok(())
    }

    /// 명령 실행 (false를 반환하면 종료)
    fn dispatch(&mut self, command: Command) -> Result<bool> {
        debug!("명령 실행: {:?}", command);
        match command {
            Command::Summary => self.print_summary(),
            Command::Pivots => self.print_pivots(),
            Command::Flow => self.print_flow(),
            Command::Volume => self.print_volume(),
            Command::Rows(n) => {
                let rows = self.frame.rows();
                for row in &rows[rows.len().saturating_sub(n)..] {
                    println!("{}", row);
                }
            }
            Command::Period(period) => {
                self.set_period(period)?;
                println!("분석 기간: {} ({}개 봉)", self.period, self.view.len());
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn print_summary(&self) {
        let Some(latest) = self.frame.latest() else {
            println!("선택한 기간({})에 데이터가 없습니다.", self.period);
            return;
        };

        println!("기간: {} ({}개 봉)", self.period, self.frame.len());
        println!("최근: {}", latest);
        for (period, sma) in self.frame.sma_periods().iter().zip(&latest.smas) {
            println!("  SMA({}): {}", period, sma);
        }
        if self.view.is_rise(3) {
            println!("  최근 3봉 연속 상승");
        } else if self.view.is_fall(3) {
            println!("  최근 3봉 연속 하락");
        }

        match self.frame.nearest_zone(PivotKind::Support, latest.close) {
            Some(zone) => println!("  가까운 지지 가격대: {}", zone),
            None => println!("  가까운 지지 가격대: 없음"),
        }
        match self.frame.nearest_zone(PivotKind::Resistance, latest.close) {
            Some(zone) => println!("  가까운 저항 가격대: {}", zone),
            None => println!("  가까운 저항 가격대: 없음"),
        }
    }

    fn print_pivots(&self) {
        let extrema = self.frame.extrema();
        println!("극값 (order={}): {}", self.config.extrema_order, extrema);
        for kind in [PivotKind::Support, PivotKind::Resistance] {
            let zones = self.frame.zones_of(kind);
            println!("{} 가격대 {}개:", kind, zones.len());
            for zone in zones {
                let rows = self.frame.rows();
                let (start, end) = (&rows[zone.start_index], &rows[zone.end_index]);
                println!(
                    "  {} ({} ~ {})",
                    zone,
                    start.datetime.format("%Y-%m-%d"),
                    end.datetime.format("%Y-%m-%d")
                );
            }
        }
    }

    fn print_flow(&self) {
        let accumulation = self.frame.accumulation_flags().iter().filter(|f| **f).count();
        let distribution = self.frame.distribution_flags().iter().filter(|f| **f).count();
        println!(
            "OBV 매집 {}봉 / 분산 {}봉 / 전체 {}봉",
            accumulation,
            distribution,
            self.frame.len()
        );
        if let Some(latest) = self.frame.latest() {
            println!("최근 OBV: {} ({})", latest.obv, latest.flow);
        }
    }

    fn print_volume(&self) {
        let count = |pressure: VolumePressure| {
            self.frame
                .rows()
                .iter()
                .filter(|row| row.volume_pressure == pressure)
                .count()
        };
        println!(
            "{}: {}봉, {}: {}봉, {}: {}봉",
            VolumePressure::BuyingPressure,
            count(VolumePressure::BuyingPressure),
            VolumePressure::SellingPressure,
            count(VolumePressure::SellingPressure),
            VolumePressure::Neutral,
            count(VolumePressure::Neutral)
        );
    }
}

fn load_bars(path: &Path) -> Result<BarSeries<Bar>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("봉 데이터 파일 읽기 실패: {}", path.display()))?;
    let bars: Vec<Bar> = serde_json::from_str(&content)
        .with_context(|| format!("봉 데이터 파싱 실패: {}", path.display()))?;
    let series = BarSeries::new(bars)?;
    info!("봉 데이터 로드 완료: {}개 ({})", series.len(), path.display());
    Ok(series)
}

fn load_config(path: Option<PathBuf>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => Ok(ConfigLoader::load_from_file(&path, ConfigFormat::Auto)?),
        None => {
            debug!("기본 분석 설정 사용");
            Ok(AnalysisConfig::default())
        }
    }
}

fn main() -> Result<()> {
    // 로그 초기화
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("사용법: {} <봉_데이터.json> [설정_파일(.toml|.json)]", args[0]);
        return Ok(());
    }

    let series = load_bars(Path::new(&args[1]))?;
    let config = load_config(args.get(2).map(PathBuf::from))?;
    let mut session = Session::new(series, config)?;

    println!("신호 분석 콘솔 ('help' 입력)");
    session.print_summary();

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let result = parse_command(&line).and_then(|command| session.dispatch(command));
        match result {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                warn!("명령 실패: {:#}", e);
                println!("오류: {:#}", e);
            }
        }
    }

    println!("종료합니다.");
    Ok(())
}
