use afltables::{
    export::{write_csv, write_parquet, Frame, ToFrame},
    AflTables, Config, HttpFetcher, GAME_BY_GAME_YEARS, PLAYER_STATS_YEARS,
};
use anyhow::{Context, Result};
use std::{
    env, fs,
    future::Future,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};
use tokio::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const PLAYER_DATA: &str = "afl_player_data";
const GAME_DATA: &str = "afl_game_by_game_data";
const RESULTS_DATA: &str = "afl_game_by_game_results";

fn year_var(name: &str) -> Result<Option<i32>> {
    env::var(name)
        .ok()
        .map(|v| v.trim().parse::<i32>())
        .transpose()
        .with_context(|| format!("{} must be a year", name))
}

/// The default span of a dataset, narrowed by the overrides and clamped to
/// the years the site publishes.
fn years(
    default: RangeInclusive<i32>,
    valid: &RangeInclusive<i32>,
    from: Option<i32>,
    to: Option<i32>,
) -> RangeInclusive<i32> {
    let start = from.unwrap_or(*default.start()).max(*valid.start());
    let end = to.unwrap_or(*default.end()).min(*valid.end());
    start..=end
}

/// Extract every year in turn; a failed year is logged and left out.
async fn collect_years<T, Fut, E>(name: &str, years: RangeInclusive<i32>, extract: E) -> Frame
where
    T: ToFrame,
    Fut: Future<Output = afltables::Result<T>>,
    E: Fn(i32) -> Fut,
{
    let start = Instant::now();
    let mut frames = Vec::new();
    for year in years {
        match extract(year).await {
            Ok(table) => frames.push(table.to_frame()),
            Err(e) => error!(dataset = name, year, error = %e, "year failed"),
        }
    }
    let years_ok = frames.len();
    let frame = Frame::concat(frames);
    info!(dataset = name, years = years_ok, rows = frame.len(), elapsed = ?start.elapsed(), "extracted");
    frame
}

fn write_dataset(out_dir: &Path, name: &str, frame: &Frame) -> Result<()> {
    if frame.columns().is_empty() {
        warn!(dataset = name, "nothing extracted; not writing");
        return Ok(());
    }
    write_csv(frame, out_dir.join(format!("{}.csv", name)))
        .with_context(|| format!("writing {} csv", name))?;
    write_parquet(frame, out_dir.join(format!("{}.parquet", name)))
        .with_context(|| format!("writing {} parquet", name))?;
    info!(dataset = name, rows = frame.len(), dir = %out_dir.display(), "written");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config = match env::var("AFLTABLES_CONFIG") {
        Ok(path) => Config::load(&path)?,
        Err(_) => Config::default(),
    };
    info!(base_url = %config.base_url, teams = config.teams.len(), "config");

    // ─── 3) configure output & years ─────────────────────────────────
    let out_dir = PathBuf::from(env::var("AFLTABLES_OUT").unwrap_or_else(|_| "data".into()));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;
    let from = year_var("AFLTABLES_FROM")?;
    let to = year_var("AFLTABLES_TO")?;

    // ─── 4) build client ─────────────────────────────────────────────
    let fetcher = HttpFetcher::new(&config).context("building http client")?;
    let client = AflTables::new(fetcher, config)?;

    // ─── 5) extract the three datasets concurrently ──────────────────
    let (players, games, results) = tokio::join!(
        collect_years(
            PLAYER_DATA,
            years(1897..=2021, &PLAYER_STATS_YEARS, from, to),
            |y| client.get_player_stats(y),
        ),
        collect_years(
            GAME_DATA,
            years(1965..=2019, &GAME_BY_GAME_YEARS, from, to),
            |y| client.get_game_by_game_stats(y),
        ),
        collect_years(
            RESULTS_DATA,
            years(1965..=2019, &GAME_BY_GAME_YEARS, from, to),
            |y| client.get_game_by_game_results(y),
        ),
    );

    // ─── 6) write csv + parquet on the blocking pool ─────────────────
    for (name, frame) in [(PLAYER_DATA, players), (GAME_DATA, games), (RESULTS_DATA, results)] {
        let dir = out_dir.clone();
        tokio::task::spawn_blocking(move || write_dataset(&dir, name, &frame)).await??;
    }

    info!("all done");
    Ok(())
}
