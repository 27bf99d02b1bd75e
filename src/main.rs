//! Fuzzy Bird entry point
//!
//! Headless native runner: loads settings, lets the autopilot fly and logs
//! each game's score. `RUST_LOG=debug` shows every decision.

mod native {
    use std::error::Error;
    use std::io;

    use fuzzy_bird::Settings;
    use fuzzy_bird::runner::{
        AutoTap, FixedPacer, JsonLinesSink, NullSink, Pacer, RenderSink, RunSummary, Runner,
        Unpaced,
    };
    use fuzzy_bird::sim::{Autopilot, GameState};

    pub const USAGE: &str =
        "usage: fuzzy-bird [CONFIG.json] [--ticks N] [--games N] [--manual] [--unpaced] [--trace]";

    /// Cadence of blind flaps when nobody is steering
    const MANUAL_FLAP_EVERY: u32 = 12;

    #[derive(Debug, Default)]
    pub struct Options {
        config: Option<String>,
        ticks: Option<u64>,
        games: Option<u32>,
        manual: bool,
        unpaced: bool,
        trace: bool,
    }

    impl Options {
        pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
            let mut options = Self::default();
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--ticks" => options.ticks = Some(number(&arg, args.next())?),
                    "--games" => options.games = Some(number(&arg, args.next())?),
                    "--manual" => options.manual = true,
                    "--unpaced" => options.unpaced = true,
                    "--trace" => options.trace = true,
                    flag if flag.starts_with("--") => return Err(format!("unknown flag `{flag}`")),
                    path if options.config.is_none() => options.config = Some(path.to_string()),
                    extra => return Err(format!("unexpected argument `{extra}`")),
                }
            }
            Ok(options)
        }
    }

    fn number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
        let value = value.ok_or_else(|| format!("`{flag}` needs a value"))?;
        value
            .parse()
            .map_err(|_| format!("`{flag}` expects a number, got `{value}`"))
    }

    pub fn run(options: &Options) -> Result<RunSummary, Box<dyn Error>> {
        let settings = match &options.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        let mut input = AutoTap::new();
        if let Some(games) = options.games {
            input = input.with_game_limit(games);
        }
        let autopilot = if options.manual || !settings.autopilot.enabled {
            log::info!("Autopilot off, flapping every {} ticks", MANUAL_FLAP_EVERY);
            input = input.with_flap_every(MANUAL_FLAP_EVERY);
            None
        } else {
            Some(Autopilot::new(&settings.autopilot)?)
        };

        let pacer: Box<dyn Pacer> = if options.unpaced {
            Box::new(Unpaced)
        } else {
            Box::new(FixedPacer::new(settings.tick_rate))
        };
        let sink: Box<dyn RenderSink> = if options.trace {
            Box::new(JsonLinesSink::new(io::BufWriter::new(io::stdout().lock())))
        } else {
            Box::new(NullSink)
        };

        let mut state = GameState::new(settings)?;
        let mut runner = Runner::new(input, sink, pacer);
        if let Some(pilot) = autopilot {
            runner = runner.with_autopilot(pilot);
        }
        if let Some(ticks) = options.ticks {
            runner = runner.with_max_ticks(ticks);
        }

        Ok(runner.run(&mut state)?)
    }
}

fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Fuzzy Bird (native) starting...");

    let options = match native::Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("{msg}\n{}", native::USAGE);
            return ExitCode::from(2);
        }
    };

    match native::run(&options) {
        Ok(summary) => {
            for (game, score) in summary.scores.iter().enumerate() {
                log::info!("Game {}: {}", game + 1, score);
            }
            if let Some(stats) = summary.stats {
                log::info!(
                    "Decisions: {} queries, {} flaps, {} degenerate, {} over budget",
                    stats.queries,
                    stats.flaps,
                    stats.degenerate,
                    stats.over_budget
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("fuzzy-bird: {err}");
            ExitCode::FAILURE
        }
    }
}
