//! Numeric kernels specialized by the precision/parallelism/cache options.
//!
//! Specializing is treated as expensive (engines typically compile kernels),
//! so profiles are cached and only regenerated when the options store's
//! kernel generation counter has moved on. Objects built under an older
//! profile are not converted retroactively.

use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::DashError;
use crate::log::info;
use crate::options::Options;

/// Arithmetic precision for kernel internals. 32-bit is the default for
/// efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Single,
    Double,
}

impl Precision {
    #[must_use]
    pub fn bits(self) -> u32 {
        match self {
            Precision::Single => 32,
            Precision::Double => 64,
        }
    }
}

impl TryFrom<i64> for Precision {
    type Error = DashError;

    fn try_from(bits: i64) -> Result<Self, Self::Error> {
        match bits {
            32 => Ok(Precision::Single),
            64 => Ok(Precision::Double),
            other => Err(DashError::DashError(format!(
                "Precision {other} not supported; choices are 32 or 64"
            ))),
        }
    }
}

/// Kernel multithreading mode. `Full` is faster but makes results
/// nondeterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ParallelMode {
    #[default]
    None,
    Safe,
    Full,
}

/// A specialization of the numeric kernels, stamped with the option
/// generation it was built under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelProfile {
    pub precision: Precision,
    pub parallel: ParallelMode,
    pub cache: bool,
    generation: u64,
}

impl KernelProfile {
    /// Builds a profile from the current kernel-affecting options.
    ///
    /// # Errors
    ///
    /// Returns an error when `precision` or `numba_parallel` hold values the
    /// kernels cannot be specialized for.
    pub fn from_options(options: &Options) -> Result<Self, DashError> {
        let bits = options
            .get("precision")?
            .as_i64()
            .ok_or_else(|| DashError::from("precision must be an integer"))?;
        let precision = Precision::try_from(bits)?;

        let parallel_raw = options
            .get("numba_parallel")?
            .as_str()
            .ok_or_else(|| DashError::from("numba_parallel must be a string"))?
            .to_string();
        let parallel = ParallelMode::from_str(&parallel_raw).map_err(|_| {
            DashError::DashError(format!(
                "Parallel mode \"{parallel_raw}\" not recognized; choices are none, safe, full"
            ))
        })?;

        let cache = options
            .get("numba_cache")?
            .as_bool()
            .ok_or_else(|| DashError::from("numba_cache must be a boolean"))?;

        Ok(KernelProfile {
            precision,
            parallel,
            cache,
            generation: options.kernel_generation(),
        })
    }

    /// The option generation this profile was specialized under.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accumulates `values` at the profile's precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn accumulate(&self, values: &[f64]) -> f64 {
        match self.precision {
            Precision::Single => f64::from(values.iter().fold(0.0f32, |acc, v| acc + *v as f32)),
            Precision::Double => values.iter().sum(),
        }
    }
}

/// Holds the active kernel specialization and rebuilds it when the options
/// store reports a newer generation.
#[derive(Debug, Default)]
pub struct KernelCache {
    profile: Option<KernelProfile>,
}

impl KernelCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the profile for the current option generation, respecializing
    /// first if the cached one is stale.
    ///
    /// # Errors
    ///
    /// As [`KernelProfile::from_options`].
    pub fn profile(&mut self, options: &Options) -> Result<&KernelProfile, DashError> {
        let stale = match &self.profile {
            None => true,
            Some(profile) => profile.generation != options.kernel_generation(),
        };
        if stale {
            info!(
                "specializing numeric kernels for generation {}",
                options.kernel_generation()
            );
            self.profile = Some(KernelProfile::from_options(options)?);
        }
        Ok(self.profile.as_ref().expect("profile was just ensured"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_profile() {
        let options = Options::default();
        let profile = KernelProfile::from_options(&options).unwrap();
        assert_eq!(profile.precision, Precision::Single);
        assert_eq!(profile.precision.bits(), 32);
        assert_eq!(profile.parallel, ParallelMode::None);
        assert!(profile.cache);
        assert_eq!(profile.generation(), 0);
    }

    #[test]
    fn parallel_mode_strings() {
        assert_eq!(ParallelMode::from_str("none").unwrap(), ParallelMode::None);
        assert_eq!(ParallelMode::from_str("safe").unwrap(), ParallelMode::Safe);
        assert_eq!(ParallelMode::from_str("full").unwrap(), ParallelMode::Full);
        assert_eq!(ParallelMode::Full.to_string(), "full");
        assert!(ParallelMode::from_str("turbo").is_err());
    }

    #[test]
    fn invalid_settings_surface_as_errors() {
        let mut options = Options::default();
        options.set("precision", 48).unwrap();
        assert!(KernelProfile::from_options(&options).is_err());

        options.set("precision", 64).unwrap();
        options.set("numba_parallel", "turbo").unwrap();
        assert!(KernelProfile::from_options(&options).is_err());
    }

    #[test]
    fn accumulation_precision_differs() {
        let mut values = vec![1.0e8];
        values.extend(std::iter::repeat(1.0e-3).take(1000));

        let options = Options::default();
        let single = KernelProfile::from_options(&options).unwrap();
        // Increments below single precision's resolution are lost
        assert_relative_eq!(single.accumulate(&values), 1.0e8);

        let mut options = Options::default();
        options.set("precision", 64).unwrap();
        let double = KernelProfile::from_options(&options).unwrap();
        assert_relative_eq!(double.accumulate(&values), 1.0e8 + 1.0, epsilon = 1.0e-4);
    }

    #[test]
    fn cache_respecializes_only_on_new_generations() {
        let mut options = Options::default();
        let mut cache = KernelCache::new();
        assert_eq!(
            cache.profile(&options).unwrap().precision,
            Precision::Single
        );

        // Non-kernel settings do not invalidate the profile
        options.set("font_size", 18).unwrap();
        assert_eq!(cache.profile(&options).unwrap().generation(), 0);

        options.set("precision", 64).unwrap();
        let profile = cache.profile(&options).unwrap();
        assert_eq!(profile.precision, Precision::Double);
        assert_eq!(profile.generation(), 1);
    }
}
