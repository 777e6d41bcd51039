//! Scenario parameter construction for the external simulation engine.
//!
//! Everything here is transient input data: plain, serializable parameter
//! bundles the dashboard assembles from user inputs and hands to whatever
//! [`crate::engine::ScenarioEngine`] implementation the host wires in. The
//! epidemic modeling itself (transmission, contact networks, intervention
//! effects) happens entirely on the engine's side.

use serde_derive::{Deserialize, Serialize};

use crate::options::{OptionValue, Options};

/// First day interventions take effect, unless overridden.
pub const DEFAULT_START_DAY: &str = "2020-04-04";

/// Transmission multiplier applied by the social-distancing scenario.
const DISTANCING_BETA_CHANGE: f64 = 0.7;

/// Parameters shared by every simulation in a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePars {
    pub pop_size: u32,
    pub verbose: f64,
}

impl BasePars {
    /// Dashboard defaults, with verbosity taken from the options store.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let verbose = options
            .get("verbose")
            .ok()
            .and_then(OptionValue::as_f64)
            .unwrap_or(0.1);
        BasePars {
            pop_size: 2000,
            verbose,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantiles {
    pub low: f64,
    pub high: f64,
}

/// Scenario metaparameters: how many runs, how much noise, which seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaPars {
    pub n_runs: u32,
    pub noise: f64,
    pub noisepar: String,
    pub rand_seed: u64,
    pub quantiles: Quantiles,
}

impl Default for MetaPars {
    fn default() -> Self {
        MetaPars {
            // 3 for quick runs; 11 for real ones
            n_runs: 3,
            noise: 0.1,
            noisepar: "beta".to_string(),
            rand_seed: 1,
            quantiles: Quantiles {
                low: 0.1,
                high: 0.9,
            },
        }
    }
}

/// Intervention payloads understood by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "which", rename_all = "snake_case")]
pub enum Intervention {
    /// Scale transmissibility from a given day onward.
    ChangeBeta { days: String, changes: f64 },
    /// Probabilistic testing of symptomatic/asymptomatic people.
    TestProb {
        start_day: String,
        symp_prob: f64,
        asymp_prob: f64,
        test_delay: f64,
    },
    /// Trace and notify contacts of positives.
    ContactTracing {
        start_day: String,
        trace_probs: f64,
        trace_time: f64,
    },
}

/// One named scenario: a short key, a display name, and its interventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub key: String,
    pub name: String,
    pub interventions: Vec<Intervention>,
}

/// The complete parameter bundle handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub basepars: BasePars,
    pub metapars: MetaPars,
    pub scenarios: Vec<ScenarioSpec>,
}

/// The dashboard's user inputs, both in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracingInputs {
    /// Accuracy of detecting an infection.
    pub accuracy_pct: f64,
    /// Share of people who quarantine after an alert.
    pub adherence_pct: f64,
}

impl Default for TracingInputs {
    fn default() -> Self {
        TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 1.0,
        }
    }
}

impl TracingInputs {
    /// Zero accuracy or adherence means there is nothing worth running.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.accuracy_pct != 0.0 && self.adherence_pct != 0.0
    }

    /// Probability that a contact of a detected case is actually traced and
    /// quarantines: detection accuracy times adherence.
    #[must_use]
    pub fn trace_probability(&self) -> f64 {
        (self.accuracy_pct / 100.0) * (self.adherence_pct / 100.0)
    }
}

/// Builds the three dashboard scenarios: no intervention, social distancing,
/// and test-trace-quarantine.
#[must_use]
pub fn build_scenarios(inputs: &TracingInputs, start_day: &str) -> Vec<ScenarioSpec> {
    vec![
        ScenarioSpec {
            key: "baseline".to_string(),
            name: "Baseline".to_string(),
            interventions: Vec::new(),
        },
        ScenarioSpec {
            key: "distance".to_string(),
            name: "Social distancing".to_string(),
            interventions: vec![Intervention::ChangeBeta {
                days: start_day.to_string(),
                changes: DISTANCING_BETA_CHANGE,
            }],
        },
        ScenarioSpec {
            key: "ttq".to_string(),
            name: "Test-trace-quarantine".to_string(),
            interventions: vec![
                Intervention::TestProb {
                    start_day: start_day.to_string(),
                    symp_prob: 0.2,
                    asymp_prob: 0.05,
                    test_delay: 1.0,
                },
                Intervention::ContactTracing {
                    start_day: start_day.to_string(),
                    trace_probs: inputs.trace_probability(),
                    trace_time: 1.0,
                },
            ],
        },
    ]
}

/// Assembles the full engine request for the dashboard inputs.
#[must_use]
pub fn dashboard_request(
    inputs: &TracingInputs,
    start_day: &str,
    options: &Options,
) -> ScenarioRequest {
    ScenarioRequest {
        basepars: BasePars::from_options(options),
        metapars: MetaPars::default(),
        scenarios: build_scenarios(inputs, start_day),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn trace_probability_math() {
        let min = TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 1.0,
        };
        let mid = TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 10.0,
        };
        let max = TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 20.0,
        };
        assert_abs_diff_eq!(min.trace_probability(), 0.0077, epsilon = 1e-12);
        assert_abs_diff_eq!(mid.trace_probability(), 0.077, epsilon = 1e-12);
        assert_abs_diff_eq!(max.trace_probability(), 0.154, epsilon = 1e-12);
    }

    #[test]
    fn runnability() {
        assert!(TracingInputs::default().is_runnable());
        let zeroed = TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 0.0,
        };
        assert!(!zeroed.is_runnable());
    }

    #[test]
    fn scenario_structure() {
        let inputs = TracingInputs {
            accuracy_pct: 77.0,
            adherence_pct: 10.0,
        };
        let scenarios = build_scenarios(&inputs, DEFAULT_START_DAY);
        assert_eq!(scenarios.len(), 3);
        assert!(scenarios[0].interventions.is_empty());
        assert_eq!(scenarios[1].name, "Social distancing");

        let ttq = &scenarios[2];
        assert_eq!(ttq.key, "ttq");
        assert_eq!(ttq.interventions.len(), 2);
        match &ttq.interventions[1] {
            Intervention::ContactTracing {
                start_day,
                trace_probs,
                ..
            } => {
                assert_eq!(start_day, DEFAULT_START_DAY);
                assert_abs_diff_eq!(*trace_probs, 0.077, epsilon = 1e-12);
            }
            other => panic!("unexpected intervention: {other:?}"),
        }
    }

    #[test]
    fn request_serializes_as_plain_dictionaries() {
        let options = Options::default();
        let request = dashboard_request(&TracingInputs::default(), DEFAULT_START_DAY, &options);
        assert_eq!(request.basepars.pop_size, 2000);
        assert_abs_diff_eq!(request.basepars.verbose, 0.1);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["metapars"]["noisepar"], "beta");
        assert_eq!(json["scenarios"][1]["interventions"][0]["which"], "change_beta");
        assert_eq!(json["scenarios"][1]["interventions"][0]["changes"], 0.7);
    }
}
