//! The dashboard: collects inputs, configures the options store, builds the
//! scenario request, delegates to the engine, and displays the outcome.
//!
//! This is deliberately thin glue. All modeling happens in the engine; all
//! configuration semantics live in [`crate::options`].

use approx::abs_diff_eq;
use clap::{ArgAction, Parser, ValueEnum};

use crate::engine::ScenarioEngine;
use crate::error::DashError;
use crate::log::info;
use crate::options::{Options, Overrides};
use crate::scenarios::{dashboard_request, TracingInputs, DEFAULT_START_DAY};

/// Input bundles matching the dashboard's quick-select buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    Min,
    Mid,
    Max,
}

impl Preset {
    #[must_use]
    pub fn inputs(self) -> TracingInputs {
        let adherence_pct = match self {
            Preset::Min => 1.0,
            Preset::Mid => 10.0,
            Preset::Max => 20.0,
        };
        TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct,
        }
    }
}

/// Command-line arguments for the dashboard binary.
#[derive(Parser, Debug)]
#[command(
    name = "covasim-dash",
    about = "Configure and run epidemic intervention scenarios"
)]
pub struct DashboardArgs {
    /// Accuracy of detecting an infection, in percent
    #[arg(long, default_value_t = 77.0)]
    pub accuracy: f64,

    /// Share of people who quarantine after an alert, in percent
    #[arg(long, default_value_t = 1.0)]
    pub adherence: f64,

    /// Quick-select input bundle; overrides --accuracy/--adherence
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// First day interventions take effect
    #[arg(long, default_value = DEFAULT_START_DAY)]
    pub start_day: String,

    /// Plotting style to use
    #[arg(long)]
    pub style: Option<String>,

    /// Figure resolution override
    #[arg(long)]
    pub dpi: Option<i64>,

    /// Build and print the scenario request without running the engine
    #[arg(long)]
    pub dry_run: bool,

    /// Increase logging detail (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl DashboardArgs {
    /// The effective inputs: a preset wins over the individual flags.
    #[must_use]
    pub fn inputs(&self) -> TracingInputs {
        self.preset.map_or(
            TracingInputs {
                accuracy_pct: self.accuracy,
                adherence_pct: self.adherence,
            },
            Preset::inputs,
        )
    }
}

/// Reference outcomes for the quick-select bundles, keyed by trace
/// probability: (label, percent difference, delta).
const PRESET_METRICS: [(f64, &str, f64, f64); 3] = [
    (0.0077, "Min", 1842.0, -14.03),
    (0.077, "Mid", 1674.0, -23.5),
    (0.154, "Max", 1481.0, -35.49),
];

fn preset_metric(total: f64) -> Option<(&'static str, f64, f64)> {
    PRESET_METRICS
        .iter()
        .find(|(key, ..)| abs_diff_eq!(total, *key, epsilon = 1e-9))
        .map(|(_, label, value, delta)| (*label, *value, *delta))
}

/// Groups digits with the given thousands separator.
fn format_with_sep(value: u64, sep: &str) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// Runs the dashboard: applies any option overrides from the command line,
/// builds the request, and either runs it through `engine` or (with no engine
/// or `--dry-run`) prints the request itself.
///
/// # Errors
///
/// Propagates option validation errors (bad style, unavailable backend) and
/// engine failures.
pub fn run(
    args: &DashboardArgs,
    options: &mut Options,
    engine: Option<&mut dyn ScenarioEngine>,
) -> Result<(), DashError> {
    let mut overrides = Overrides::new();
    if let Some(style) = &args.style {
        overrides.insert("style", style.clone());
    }
    if let Some(dpi) = args.dpi {
        overrides.insert("dpi", dpi);
    }
    if !overrides.is_empty() {
        options.update(overrides)?;
    }

    let inputs = args.inputs();
    if !inputs.is_runnable() {
        info!("accuracy or adherence is zero, nothing to run");
        return Ok(());
    }

    let request = dashboard_request(&inputs, &args.start_day, options);
    let sep = options
        .get("sep")?
        .as_str()
        .unwrap_or(",")
        .to_string();
    println!(
        "Running {} scenarios over a population of {}",
        request.scenarios.len(),
        format_with_sep(u64::from(request.basepars.pop_size), &sep)
    );

    match engine {
        Some(engine) if !args.dry_run => {
            let results = engine.run(&request)?;
            if options.resolve_show(None) {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
    }

    if let Some((label, value, delta)) = preset_metric(inputs.trace_probability()) {
        println!("{label}");
        println!("Percent difference: {value} ({delta:+})");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScenarioResults;
    use crate::options::OptionValue;
    use crate::scenarios::ScenarioRequest;
    use serde_json::json;

    struct RecordingEngine {
        calls: usize,
        last_pop_size: Option<u32>,
    }

    impl RecordingEngine {
        fn new() -> Self {
            RecordingEngine {
                calls: 0,
                last_pop_size: None,
            }
        }
    }

    impl ScenarioEngine for RecordingEngine {
        fn run(&mut self, request: &ScenarioRequest) -> Result<ScenarioResults, DashError> {
            self.calls += 1;
            self.last_pop_size = Some(request.basepars.pop_size);
            Ok(json!({ "status": "ok" }))
        }
    }

    fn parse(argv: &[&str]) -> DashboardArgs {
        DashboardArgs::try_parse_from(
            std::iter::once("covasim-dash").chain(argv.iter().copied()),
        )
        .unwrap()
    }

    #[test]
    fn argument_defaults() {
        let args = parse(&[]);
        assert_eq!(args.accuracy, 77.0);
        assert_eq!(args.adherence, 1.0);
        assert_eq!(args.start_day, DEFAULT_START_DAY);
        assert!(!args.dry_run);
    }

    #[test]
    fn presets_override_individual_flags() {
        let args = parse(&["--accuracy", "50", "--adherence", "5", "--preset", "mid"]);
        let inputs = args.inputs();
        assert_eq!(inputs.accuracy_pct, 77.0);
        assert_eq!(inputs.adherence_pct, 10.0);
    }

    #[test]
    fn preset_metrics_match_float_artifacts() {
        // Products of the percent inputs, not round literals
        assert_eq!(preset_metric(0.77 * 0.01).unwrap().0, "Min");
        assert_eq!(preset_metric(0.77 * 0.1).unwrap().0, "Mid");
        assert_eq!(preset_metric(0.77 * 0.2).unwrap().0, "Max");
        assert!(preset_metric(0.5).is_none());
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_with_sep(2000, ","), "2,000");
        assert_eq!(format_with_sep(999, ","), "999");
        assert_eq!(format_with_sep(1_234_567, "."), "1.234.567");
    }

    #[test]
    fn engine_runs_unless_dry() {
        let args = parse(&["--preset", "max"]);
        let mut options = Options::default();
        let mut engine = RecordingEngine::new();
        run(&args, &mut options, Some(&mut engine)).unwrap();
        assert_eq!(engine.calls, 1);
        assert_eq!(engine.last_pop_size, Some(2000));

        let args = parse(&["--preset", "max", "--dry-run"]);
        run(&args, &mut options, Some(&mut engine)).unwrap();
        assert_eq!(engine.calls, 1, "dry runs never reach the engine");
    }

    #[test]
    fn zero_adherence_runs_nothing() {
        let args = parse(&["--adherence", "0"]);
        let mut options = Options::default();
        let mut engine = RecordingEngine::new();
        run(&args, &mut options, Some(&mut engine)).unwrap();
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn option_overrides_are_validated() {
        let args = parse(&["--style", "not-a-real-style"]);
        let mut options = Options::default();
        let result = run(&args, &mut options, None);
        assert!(matches!(result, Err(DashError::InvalidStyle(_))));

        let args = parse(&["--style", "ggplot", "--dpi", "150"]);
        run(&args, &mut options, None).unwrap();
        assert_eq!(options.get("dpi").unwrap(), &OptionValue::Int(150));
        assert_eq!(options.render().current_style().as_deref(), Some("ggplot"));
    }

    #[test]
    fn binary_dry_run_smoke_test() {
        // The entry point is src/main.rs
        let output = assert_cmd::Command::cargo_bin("covasim-dash")
            .unwrap()
            .args(["--dry-run", "--preset", "mid"])
            .assert()
            .success();
        let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
        assert!(stdout.contains("Test-trace-quarantine"));
        assert!(stdout.contains("Mid"));
        assert!(stdout.contains("2,000"));
    }
}
