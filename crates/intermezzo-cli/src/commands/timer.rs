//! The live timer driver.
//!
//! The core never schedules itself: this module owns the periodic tick
//! source (a tokio interval) and feeds `tick()` batches sized so that
//! `ticks_per_second` driver ticks land per second of countdown. All
//! decisions stay in the core; this is rendering and cadence only.

use std::io::Write;
use std::time::Duration;

use clap::Subcommand;
use intermezzo_core::{Config, CoreError, Event, IntervalTimer, Phase, TimerConfig};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Drive a live session in the terminal
    Run {
        /// Work phase duration in seconds (overrides config)
        #[arg(long)]
        work: Option<u64>,
        /// Relax phase duration in seconds (overrides config)
        #[arg(long)]
        relax: Option<u64>,
        /// Driver ticks per second of countdown (overrides config)
        #[arg(long)]
        ticks_per_second: Option<u64>,
        /// How many phase completions to run before exiting
        #[arg(long, default_value = "1")]
        phases: u32,
        /// Redraw cadence in milliseconds (overrides config)
        #[arg(long)]
        refresh_ms: Option<u64>,
        /// Emit events as JSON lines instead of a live display
        #[arg(long)]
        json: bool,
    },
    /// Print the configured timer's initial state as JSON
    Status,
}

pub fn run(action: TimerAction) -> Result<(), CoreError> {
    match action {
        TimerAction::Run {
            work,
            relax,
            ticks_per_second,
            phases,
            refresh_ms,
            json,
        } => {
            let config = Config::load_or_default();
            let timer_config = TimerConfig {
                work_secs: work.unwrap_or(config.timer.work_secs),
                relax_secs: relax.unwrap_or(config.timer.relax_secs),
                ticks_per_second: ticks_per_second.unwrap_or(config.timer.ticks_per_second),
                catch_up: config.timer.catch_up,
            };
            timer_config.validate()?;
            let refresh_ms = refresh_ms.unwrap_or(config.display.refresh_ms).max(1);
            let session = Session {
                timer: IntervalTimer::new(timer_config),
                refresh_ms,
                progress_bar: config.display.progress_bar,
                phases: phases.max(1),
                json,
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;
            runtime.block_on(session.drive())
        }
        TimerAction::Status => {
            let config = Config::load_or_default();
            let timer = IntervalTimer::new(config.timer);
            println!("{}", serde_json::to_string_pretty(&timer.snapshot())?);
            Ok(())
        }
    }
}

struct Session {
    timer: IntervalTimer,
    refresh_ms: u64,
    progress_bar: bool,
    phases: u32,
    json: bool,
}

impl Session {
    async fn drive(mut self) -> Result<(), CoreError> {
        // Ticks delivered per wakeup so that `ticks_per_second` of them
        // land per second of wall time.
        let units = (self.timer.config().ticks_per_second * self.refresh_ms / 1000).max(1);
        let mut interval = tokio::time::interval(Duration::from_millis(self.refresh_ms));
        let mut completed = 0u32;

        let started = self.timer.toggle_running();
        self.emit(&started)?;

        loop {
            interval.tick().await;
            let events = self.timer.tick(units);
            for event in &events {
                if matches!(event, Event::PhaseCompleted { .. }) {
                    completed += 1;
                }
                self.emit(event)?;
            }
            if !self.json {
                self.render()?;
            }

            // The core auto-pauses at every phase boundary; restarting the
            // next phase is this adapter's choice, not the engine's.
            if !self.timer.running() {
                if completed >= self.phases {
                    break;
                }
                let event = self.timer.toggle_running();
                self.emit(&event)?;
            }
        }
        if !self.json {
            println!();
        }
        Ok(())
    }

    fn emit(&self, event: &Event) -> Result<(), CoreError> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }
        match event {
            Event::PhaseCompleted { phase, .. } => {
                println!("\n{} phase complete", phase_name(*phase));
            }
            Event::PhaseStarted { phase, duration_secs, .. } => {
                println!("{} phase ready ({duration_secs}s)", phase_name(*phase));
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&self) -> Result<(), CoreError> {
        let label = self.timer.remaining_label();
        let phase = phase_name(self.timer.phase());
        if self.progress_bar {
            let filled = ((self.timer.progress_fraction() * 20.0).round() as usize).min(20);
            let bar: String = "#".repeat(filled) + &"-".repeat(20 - filled);
            print!("\r[{phase}] {label} [{bar}]");
        } else {
            print!("\r[{phase}] {label}");
        }
        std::io::stdout().flush()?;
        Ok(())
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "work",
        Phase::Relax => "relax",
    }
}
