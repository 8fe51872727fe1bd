//! Simulate subcommand: a scripted session against an in-memory page.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use autoscroll_bus::{CrossContextBus, LocalPageHost};
use autoscroll_config::{Config, ShortcutAction};
use autoscroll_engine::{is_at_bottom, LocalEvent, PageHandle, SimulatedContainer, SimulatedDocument};
use autoscroll_protocols::ScrollContainer;

/// One scripted shortcut press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScriptStep {
    /// Seconds since the simulation started.
    pub at: f64,
    pub action: ShortcutAction,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ScriptStepParseError(String);

impl fmt::Display for ScriptStepParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ScriptStepParseError {}

impl FromStr for ScriptStep {
    type Err = ScriptStepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (at, action) = s
            .split_once('=')
            .ok_or_else(|| ScriptStepParseError(format!("expected SECONDS=ACTION, got '{}'", s)))?;
        let at: f64 = at
            .trim()
            .parse()
            .map_err(|_| ScriptStepParseError(format!("invalid time '{}'", at)))?;
        if !(at.is_finite() && at >= 0.0) {
            return Err(ScriptStepParseError(format!("time must be >= 0, got {}", at)));
        }
        let action = ShortcutAction::from_name(action.trim())
            .ok_or_else(|| ScriptStepParseError(format!("unknown action '{}'", action)))?;
        Ok(Self { at, action })
    }
}

/// Parameters of a simulation run.
#[derive(Debug, Clone)]
pub(crate) struct SimulateOptions {
    pub viewport: f64,
    pub content: f64,
    pub feed: bool,
    pub batch: f64,
    pub duration: f64,
    pub script: Vec<ScriptStep>,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            viewport: 800.0,
            content: 6000.0,
            feed: false,
            batch: 2000.0,
            duration: 10.0,
            script: Vec::new(),
        }
    }
}

impl SimulateOptions {
    /// The scripted steps in firing order. Without a script: start, speed
    /// up, pause, resume.
    fn steps(&self) -> Vec<ScriptStep> {
        let mut steps = if self.script.is_empty() {
            vec![
                ScriptStep { at: 0.0, action: ShortcutAction::StartStop },
                ScriptStep { at: 2.0, action: ShortcutAction::SpeedUp },
                ScriptStep { at: 4.0, action: ShortcutAction::PauseResume },
                ScriptStep { at: 5.0, action: ShortcutAction::PauseResume },
            ]
        } else {
            self.script.clone()
        };
        steps.sort_by(|a, b| a.at.total_cmp(&b.at));
        steps
    }
}

/// Run one scripted session and print a summary.
pub(crate) async fn run_simulation(
    config: Config,
    options: SimulateOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting AutoScroll simulation v{}", env!("CARGO_PKG_VERSION"));

    let (host, notices) = LocalPageHost::new(&config);
    let bus = Arc::new(CrossContextBus::new(host.clone(), &config));
    let notice_loop = bus.start(notices);

    let container = SimulatedContainer::new(options.viewport, options.content);
    let handle = host.open_page(SimulatedDocument::new(container.clone()));
    let page = handle.page();
    info!(
        "Opened {} (viewport {}, content {})",
        page, options.viewport, options.content
    );

    let observer = tokio::spawn(observe_page(
        handle.clone(),
        container.clone(),
        config.scroll.threshold,
        options.feed.then_some(options.batch),
    ));

    let started = Instant::now();
    for step in options.steps() {
        if step.at > options.duration {
            warn!("Skipping {:?} at {}s, past the end of the run", step.action, step.at);
            continue;
        }
        tokio::time::sleep_until(started + Duration::from_secs_f64(step.at)).await;
        let reply = bus.handle_shortcut(step.action).await;
        if reply.ok {
            info!("{:>6.2}s  {:?}", step.at, step.action);
        } else {
            warn!("{:>6.2}s  {:?} failed: {:?}", step.at, step.action, reply.error);
        }
    }
    tokio::time::sleep_until(started + Duration::from_secs_f64(options.duration)).await;

    let state = bus.query_state(page).await;
    let geometry = container.geometry();
    println!();
    println!("Page:          {}", page);
    println!("Offset:        {:.1} / {:.1}", geometry.offset, geometry.total - geometry.visible);
    println!("Scrolling:     {}", state.is_scrolling);
    println!("Paused:        {}", state.is_paused);
    println!("Speed:         {}", state.speed);
    println!("Bottom hits:   {}", bus.bottom_hits(page));

    host.close_page(page).await;
    observer.abort();
    notice_loop.abort();
    Ok(())
}

/// Log what the page's overlay would show, and grow the feed on demand.
async fn observe_page(
    handle: PageHandle,
    container: Arc<SimulatedContainer>,
    threshold: f64,
    batch: Option<f64>,
) {
    let mut events = handle.subscribe();
    let mut suspected = false;
    loop {
        match events.recv().await {
            Ok(LocalEvent::State(state)) => {
                debug!(
                    "{} overlay: scrolling={} paused={} speed={}",
                    handle.page(),
                    state.is_scrolling,
                    state.is_paused,
                    state.speed
                );
            }
            Ok(LocalEvent::ReachedBottom { suspected_infinite }) => {
                if suspected_infinite && !suspected {
                    suspected = true;
                    info!("{} looks like an infinite feed", handle.page());
                }
                if let Some(batch) = batch {
                    if is_at_bottom(container.as_ref(), threshold) {
                        container.append_content(batch);
                        info!(
                            "Feed loaded {} more, content now {}",
                            batch,
                            container.total_extent()
                        );
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                debug!("Observer skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script_step() {
        let step: ScriptStep = "2.5=speed_up".parse().unwrap();
        assert_eq!(
            step,
            ScriptStep {
                at: 2.5,
                action: ShortcutAction::SpeedUp
            }
        );
    }

    #[test]
    fn test_parse_script_step_errors() {
        assert!("speed_up".parse::<ScriptStep>().is_err());
        assert!("soon=speed_up".parse::<ScriptStep>().is_err());
        assert!("-1=speed_up".parse::<ScriptStep>().is_err());
        assert!("1=jump".parse::<ScriptStep>().is_err());
    }

    #[test]
    fn test_default_script() {
        let steps = SimulateOptions::default().steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].action, ShortcutAction::StartStop);
    }

    #[test]
    fn test_script_is_sorted() {
        let options = SimulateOptions {
            script: vec![
                "3=pause_resume".parse().unwrap(),
                "1=start_stop".parse().unwrap(),
            ],
            ..SimulateOptions::default()
        };
        let steps = options.steps();
        assert_eq!(steps[0].at, 1.0);
        assert_eq!(steps[1].at, 3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_grows_during_simulation() {
        let options = SimulateOptions {
            viewport: 500.0,
            content: 1000.0,
            feed: true,
            batch: 1000.0,
            duration: 3.0,
            script: vec!["0=start_stop".parse().unwrap()],
        };
        run_simulation(Config::default(), options).await.unwrap();
    }
}
