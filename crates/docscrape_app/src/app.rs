use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use docscrape_core::{
    scrape_route, update, AppState, AppViewModel, HealthStatus, Msg, PhaseScript, ScrapeTarget,
    SessionStatus, SourceKind,
};
use docscrape_engine::{export_result, EngineSettings};
use docscrape_logging::{scrape_info, scrape_warn};

use crate::cli::ScrapeArgs;
use crate::config::AppConfig;
use crate::effects::EffectRunner;
use crate::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Headroom on top of the transport timeout before the loop gives up.
const WAIT_SLACK: Duration = Duration::from_secs(5);
const LOGIN_PROMPT: &str =
    "Sign in using the browser, then press Enter to verify ('launch' reopens, 'cancel' aborts): ";

/// Owns the core state and feeds it messages from the operator and the engine.
pub struct App {
    state: AppState,
    view: AppViewModel,
    runner: EffectRunner,
    wait_limit: Duration,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let transport = config.transport_settings();
        let wait_limit = transport.request_timeout + WAIT_SLACK;
        let runner = EffectRunner::new(EngineSettings {
            transport,
            phases: PhaseScript::default(),
        })
        .context("failed to start the engine")?;
        let state = AppState::new();
        Ok(Self {
            view: state.view(),
            state,
            runner,
            wait_limit,
        })
    }

    pub fn health(&mut self) -> Result<()> {
        self.dispatch(Msg::HealthCheckRequested);
        self.wait_for("the health check", |state| {
            state.view().health != HealthStatus::Checking
        })?;
        match self.state.view().health {
            HealthStatus::Reachable => Ok(()),
            HealthStatus::Unreachable(reason) => bail!("backend unreachable: {reason}"),
            other => bail!("unexpected health state {other:?}"),
        }
    }

    /// Interactive login: open the browser, then verify each time the
    /// operator presses Enter until the backend confirms or they cancel.
    pub fn login(&mut self, input: &mut impl BufRead) -> Result<()> {
        if self.state.session().is_authenticated() {
            return Ok(());
        }
        self.launch()?;
        if self.state.session().status() == SessionStatus::Unauthenticated {
            let reason = self.state.session().message().unwrap_or("unknown error");
            bail!("could not open the login browser: {reason}");
        }

        loop {
            eprint!("{LOGIN_PROMPT}");
            io::stderr().flush().ok();

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                self.dispatch(Msg::CancelRequested);
                bail!("login aborted: input closed");
            }
            match line.trim().to_ascii_lowercase().as_str() {
                "cancel" | "c" => {
                    self.dispatch(Msg::CancelRequested);
                    bail!("login cancelled");
                }
                "launch" | "l" => {
                    self.launch()?;
                    continue;
                }
                _ => {}
            }

            self.dispatch(Msg::VerifyRequested);
            let finished = self.wait_for("verification", |state| {
                state.session().status() != SessionStatus::Verifying
            });
            if let Err(err) = finished {
                self.dispatch(Msg::CancelRequested);
                return Err(err);
            }
            if self.state.session().is_authenticated() {
                scrape_info!("session authenticated");
                eprintln!("Signed in.");
                return Ok(());
            }
        }
    }

    pub fn scrape(
        &mut self,
        args: &ScrapeArgs,
        config: &AppConfig,
        input: &mut impl BufRead,
    ) -> Result<()> {
        let mut target = ScrapeTarget::new(args.source, args.url.clone());
        if args.no_session_gate {
            target = target.with_session_gate(false);
        }
        if target.requires_session && !self.state.session().is_authenticated() {
            eprintln!("{} needs a signed-in session.", target.kind.label());
            self.login(input)?;
        }

        self.dispatch(Msg::scrape(target));
        if self.state.desk().in_flight_count() == 0 {
            let reason = self.state.view().last_error.unwrap_or_default();
            bail!("scrape not started: {reason}");
        }
        self.wait_for("the scrape", |state| state.desk().in_flight_count() == 0)?;

        if let Some(error) = self.state.view().last_error {
            bail!("scrape failed: {error}");
        }
        let result = self
            .state
            .result()
            .cloned()
            .context("backend returned no result")?;

        let out_dir = match (&args.out, args.save) {
            (Some(dir), _) => Some(dir.as_path()),
            (None, true) => Some(config.output_dir.as_path()),
            (None, false) => None,
        };
        match out_dir {
            Some(dir) => {
                let summary = export_result(dir, &result, &Utc::now().to_rfc3339())
                    .with_context(|| format!("failed to export to {}", dir.display()))?;
                scrape_info!("exported {}", summary.markdown_path.display());
                println!("{}", summary.markdown_path.display());
                if let Some(articles) = summary.articles_path {
                    println!("{}", articles.display());
                }
            }
            None => {
                print!("{}", result.markdown);
                if !result.markdown.ends_with('\n') {
                    println!();
                }
                if !result.items.is_empty() {
                    eprintln!("{} articles (use --out to save them as JSON)", result.items.len());
                }
            }
        }
        self.dispatch(Msg::ResultCleared);
        Ok(())
    }

    fn launch(&mut self) -> Result<()> {
        self.dispatch(Msg::LaunchRequested);
        self.wait_for("the login browser", |state| !state.session().launch_pending())
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            for line in render(&self.view, &view) {
                eprintln!("{line}");
            }
            self.view = view;
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn wait_for(&mut self, what: &str, done: impl Fn(&AppState) -> bool) -> Result<()> {
        let started = Instant::now();
        while !done(&self.state) {
            if started.elapsed() >= self.wait_limit {
                scrape_warn!("gave up waiting for {} after {:?}", what, self.wait_limit);
                bail!("timed out waiting for {what}");
            }
            if let Some(msg) = self.runner.next_msg(POLL_INTERVAL) {
                self.dispatch(msg);
            }
        }
        Ok(())
    }
}

pub fn print_sources(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{:<18} {:<8} {:<28} {:<14} SESSION", "SOURCE", "METHOD", "PATH", "FIELD")?;
    for kind in SourceKind::ALL {
        let route = scrape_route(kind);
        writeln!(
            out,
            "{:<18} {:<8} {:<28} {:<14} {}",
            kind.slug(),
            format!("{:?}", route.endpoint.method).to_uppercase(),
            route.endpoint.path,
            route.field.key(),
            if kind.default_requires_session() { "required" } else { "-" },
        )?;
    }
    Ok(())
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    let written = AppConfig::default().save(path, force)?;
    println!("wrote {}", written.display());
    Ok(())
}
