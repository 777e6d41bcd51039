//! Seam to the external epidemic-simulation engine.
//!
//! The engine is an opaque collaborator: it receives plain parameter bundles
//! ([`crate::scenarios::ScenarioRequest`]) and returns an opaque results
//! payload this crate displays but never inspects structurally.

use crate::error::DashError;
use crate::scenarios::ScenarioRequest;

/// Whatever the engine returns: a results/plot object, kept opaque.
pub type ScenarioResults = serde_json::Value;

/// An external engine capable of running a set of scenarios.
pub trait ScenarioEngine {
    /// Runs every scenario in the request and returns the engine's results
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine rejects the parameters or fails
    /// mid-run; the dashboard surfaces it unchanged.
    fn run(&mut self, request: &ScenarioRequest) -> Result<ScenarioResults, DashError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::scenarios::{dashboard_request, TracingInputs, DEFAULT_START_DAY};
    use serde_json::json;

    struct CountingEngine {
        calls: usize,
    }

    impl ScenarioEngine for CountingEngine {
        fn run(&mut self, request: &ScenarioRequest) -> Result<ScenarioResults, DashError> {
            self.calls += 1;
            Ok(json!({ "n_scenarios": request.scenarios.len() }))
        }
    }

    #[test]
    fn engines_receive_the_request_verbatim() {
        let options = Options::default();
        let request = dashboard_request(&TracingInputs::default(), DEFAULT_START_DAY, &options);
        let mut engine = CountingEngine { calls: 0 };
        let results = engine.run(&request).unwrap();
        assert_eq!(engine.calls, 1);
        assert_eq!(results["n_scenarios"], 3);
    }
}
