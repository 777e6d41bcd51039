//! Seam to the plotting library's global render state.
//!
//! The options store never draws anything itself; it pushes settings (backend,
//! style, resolution, fonts) into whatever render library the host application
//! uses. That library is modeled by the [`RenderGlobals`] trait so the store
//! can be exercised against an in-process stand-in, [`InProcessRender`], which
//! keeps the same registries (backends, styles, fonts, rc parameters) a real
//! plotting toolkit exposes globally.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DashError;
use crate::log::debug;

/// Fallback font stack appended to every font list.
pub const DEFAULT_FONTS: [&str; 4] = ["Arial", "Liberation Sans", "DejaVu Sans", "sans-serif"];

/// A single render (rc) parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RcValue {
    Bool(bool),
    Num(f64),
    Str(String),
    List(Vec<String>),
}

impl From<bool> for RcValue {
    fn from(value: bool) -> Self {
        RcValue::Bool(value)
    }
}

impl From<f64> for RcValue {
    fn from(value: f64) -> Self {
        RcValue::Num(value)
    }
}

impl From<&str> for RcValue {
    fn from(value: &str) -> Self {
        RcValue::Str(value.to_string())
    }
}

impl From<Vec<String>> for RcValue {
    fn from(value: Vec<String>) -> Self {
        RcValue::List(value)
    }
}

/// An ordered record of render (rc) parameters, keyed the way plotting
/// libraries key their global run-control tables (`"axes.grid"`, etc.).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RcParams(IndexMap<String, RcValue>);

impl RcParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RcValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RcValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RcValue> {
        self.0.get(key)
    }

    /// Merges `other` on top of `self`, later entries winning.
    #[must_use]
    pub fn merged(mut self, other: &RcParams) -> Self {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RcValue)> {
        self.0.iter()
    }
}

fn font_stack(preferred: &[&str]) -> Vec<String> {
    preferred
        .iter()
        .chain(DEFAULT_FONTS.iter())
        .map(|s| (*s).to_string())
        .collect()
}

/// Simple render parameters, close to a plotting library's own defaults.
#[must_use]
pub fn rc_simple() -> RcParams {
    RcParams::new()
        .with("figure.facecolor", "white")
        .with("axes.spines.right", false)
        .with("axes.spines.top", false)
        .with("font.family", "sans-serif")
        .with("font.sans-serif", font_stack(&["Muli"]))
        .with("legend.frameon", false)
}

/// Default render parameters, used with the "covasim" style.
#[must_use]
pub fn rc_covasim() -> RcParams {
    rc_simple().merged(
        &RcParams::new()
            .with("axes.facecolor", "efefff")
            .with("axes.grid", true)
            .with("grid.color", "white")
            .with("grid.linestyle", "-")
            .with("grid.linewidth", 1.0)
            .with("font.sans-serif", font_stack(&["Rosario", "Muli"])),
    )
}

/// Global state of the host render library, as far as the options store is
/// concerned. The store mutates this state as a side effect of `set`; it
/// never reads plot data back.
pub trait RenderGlobals {
    fn font_size(&self) -> f64;
    fn set_font_size(&mut self, size: f64);

    fn dpi(&self) -> f64;
    fn set_dpi(&mut self, dpi: f64);

    fn font_family(&self) -> String;
    /// Sets the global font family. When a font registry is present, unknown
    /// families are ignored rather than set, so rendering keeps working.
    fn set_font_family(&mut self, family: &str);

    fn current_backend(&self) -> String;
    fn backend_available(&self, name: &str) -> bool;
    /// Switches the active backend.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::BackendUnavailable`] if the named backend cannot
    /// be activated in this environment.
    fn switch_backend(&mut self, name: &str) -> Result<(), DashError>;

    /// Names of the registered styles, excluding the built-in baseline.
    fn styles(&self) -> Vec<String>;
    fn has_style(&self, name: &str) -> bool {
        self.styles().iter().any(|s| s == name)
    }
    /// Activates a registered style.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::InvalidStyle`] if the style is not registered.
    fn use_style(&mut self, name: &str) -> Result<(), DashError>;
    /// Returns to the built-in baseline style.
    fn reset_style(&mut self);
    fn current_style(&self) -> Option<String>;

    /// Adds every font file in `dir` to the font registry, returning how many
    /// were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn register_fonts(&mut self, dir: &Path) -> Result<usize, DashError>;
    fn registered_fonts(&self) -> Vec<String>;

    /// Cosmetic display-format hint for notebook-style frontends.
    ///
    /// # Errors
    ///
    /// Returns an error if the format is not supported; callers treat this as
    /// best-effort.
    fn set_display_format(&mut self, format: &str) -> Result<(), DashError>;
}

const BACKENDS: [&str; 5] = ["qtagg", "tkagg", "agg", "svg", "pdf"];
const STYLES: [&str; 9] = [
    "simple",
    "classic",
    "bmh",
    "dark_background",
    "fast",
    "fivethirtyeight",
    "ggplot",
    "grayscale",
    "seaborn-v0_8",
];
const DISPLAY_FORMATS: [&str; 4] = ["png", "retina", "svg", "pdf"];

/// In-process stand-in for a plotting library's global configuration. Tracks
/// rc parameters, the active backend and style, and a font registry.
#[derive(Debug, Clone)]
pub struct InProcessRender {
    rc: RcParams,
    backend: String,
    style: Option<String>,
    fonts: Vec<String>,
    display_format: Option<String>,
}

impl Default for InProcessRender {
    fn default() -> Self {
        InProcessRender {
            rc: RcParams::new()
                .with("figure.dpi", 100.0)
                .with("font.size", 10.0)
                .with("font.family", "sans-serif"),
            // The first backend is the interactive default.
            backend: BACKENDS[0].to_string(),
            style: None,
            fonts: Vec::new(),
            display_format: None,
        }
    }
}

impl InProcessRender {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn rc_num(&self, key: &str, fallback: f64) -> f64 {
        match self.rc.get(key) {
            Some(RcValue::Num(n)) => *n,
            _ => fallback,
        }
    }

    #[must_use]
    pub fn display_format(&self) -> Option<String> {
        self.display_format.clone()
    }
}

impl RenderGlobals for InProcessRender {
    fn font_size(&self) -> f64 {
        self.rc_num("font.size", 10.0)
    }

    fn set_font_size(&mut self, size: f64) {
        self.rc.insert("font.size", size);
    }

    fn dpi(&self) -> f64 {
        self.rc_num("figure.dpi", 100.0)
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.rc.insert("figure.dpi", dpi);
    }

    fn font_family(&self) -> String {
        match self.rc.get("font.family") {
            Some(RcValue::Str(family)) => family.clone(),
            _ => "sans-serif".to_string(),
        }
    }

    fn set_font_family(&mut self, family: &str) {
        if !self.fonts.is_empty() && !self.fonts.iter().any(|f| f == family) {
            debug!("font family \"{}\" not in the registry, ignoring", family);
            return;
        }
        self.rc.insert("font.family", family);
    }

    fn current_backend(&self) -> String {
        self.backend.clone()
    }

    fn backend_available(&self, name: &str) -> bool {
        BACKENDS.contains(&name)
    }

    fn switch_backend(&mut self, name: &str) -> Result<(), DashError> {
        if !self.backend_available(name) {
            return Err(DashError::BackendUnavailable(format!(
                "Backend \"{}\" is not available; choices are:\n{}",
                name,
                BACKENDS.join("\n")
            )));
        }
        self.backend = name.to_string();
        Ok(())
    }

    fn styles(&self) -> Vec<String> {
        STYLES.iter().map(|s| (*s).to_string()).collect()
    }

    fn use_style(&mut self, name: &str) -> Result<(), DashError> {
        if !self.has_style(name) {
            return Err(DashError::InvalidStyle(format!(
                "Style \"{}\" not found; choices are:\n{}",
                name,
                STYLES.join("\n")
            )));
        }
        self.style = Some(name.to_string());
        Ok(())
    }

    fn reset_style(&mut self) {
        self.style = None;
    }

    fn current_style(&self) -> Option<String> {
        self.style.clone()
    }

    fn register_fonts(&mut self, dir: &Path) -> Result<usize, DashError> {
        let mut added = 0;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_font = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("ttf" | "otf")
            );
            if !is_font {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                if !self.fonts.iter().any(|f| f == name) {
                    self.fonts.push(name.to_string());
                    added += 1;
                }
            }
        }
        debug!("registered {} fonts from {}", added, dir.display());
        Ok(added)
    }

    fn registered_fonts(&self) -> Vec<String> {
        self.fonts.clone()
    }

    fn set_display_format(&mut self, format: &str) -> Result<(), DashError> {
        if !DISPLAY_FORMATS.contains(&format) {
            return Err(DashError::DashError(format!(
                "Display format \"{}\" not supported",
                format
            )));
        }
        self.display_format = Some(format.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn rc_covasim_extends_rc_simple() {
        let simple = rc_simple();
        let covasim = rc_covasim();
        // Inherited unchanged
        assert_eq!(covasim.get("legend.frameon"), Some(&RcValue::Bool(false)));
        assert_eq!(
            covasim.get("figure.facecolor"),
            simple.get("figure.facecolor")
        );
        // Added
        assert_eq!(covasim.get("axes.grid"), Some(&RcValue::Bool(true)));
        // Overridden: the font stack gains Rosario at the front
        match covasim.get("font.sans-serif") {
            Some(RcValue::List(fonts)) => assert_eq!(fonts[0], "Rosario"),
            other => panic!("unexpected rc value: {other:?}"),
        }
        assert!(covasim.len() > simple.len());
    }

    #[test]
    fn backend_switching() {
        let mut render = InProcessRender::new();
        assert_eq!(render.current_backend(), "qtagg");
        render.switch_backend("agg").unwrap();
        assert_eq!(render.current_backend(), "agg");

        let result = render.switch_backend("holographic");
        assert!(matches!(result, Err(DashError::BackendUnavailable(_))));
        // A failed switch leaves the backend untouched
        assert_eq!(render.current_backend(), "agg");
    }

    #[test]
    fn style_registry() {
        let mut render = InProcessRender::new();
        assert!(render.current_style().is_none());
        render.use_style("ggplot").unwrap();
        assert_eq!(render.current_style().as_deref(), Some("ggplot"));

        let result = render.use_style("not-a-style");
        assert!(matches!(result, Err(DashError::InvalidStyle(_))));
        assert_eq!(render.current_style().as_deref(), Some("ggplot"));

        render.reset_style();
        assert!(render.current_style().is_none());
    }

    #[test]
    fn font_family_respects_registry() {
        let mut render = InProcessRender::new();
        // No registry yet: anything goes
        render.set_font_family("Comic Sans");
        assert_eq!(render.font_family(), "Comic Sans");

        render.fonts = vec!["Rosario".to_string()];
        render.set_font_family("Wingdings");
        // Ignored, not an error
        assert_eq!(render.font_family(), "Comic Sans");
        render.set_font_family("Rosario");
        assert_eq!(render.font_family(), "Rosario");
    }

    #[test]
    fn font_registration_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("Rosario.ttf")).unwrap();
        File::create(dir.path().join("Muli.otf")).unwrap();
        File::create(dir.path().join("README.md")).unwrap();

        let mut render = InProcessRender::new();
        let added = render.register_fonts(dir.path()).unwrap();
        assert_eq!(added, 2);
        let mut fonts = render.registered_fonts();
        fonts.sort();
        assert_eq!(fonts, vec!["Muli".to_string(), "Rosario".to_string()]);

        // Missing directories surface as IO errors for the caller to swallow
        let result = render.register_fonts(&dir.path().join("nope"));
        assert!(matches!(result, Err(DashError::IoError(_))));
    }

    #[test]
    fn display_format_hint() {
        let mut render = InProcessRender::new();
        render.set_display_format("retina").unwrap();
        assert_eq!(render.display_format().as_deref(), Some("retina"));
        assert!(render.set_display_format("vhs").is_err());
    }
}
