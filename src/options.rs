//! The process-wide options store.
//!
//! [`Options`] is the single source of truth for settings that influence
//! downstream simulation code (arithmetic precision, kernel parallelism and
//! caching) and the global render state (backend, style, resolution, fonts).
//! It is constructed once at startup, seeded from `COVASIM_*` environment
//! variables, and passed by reference to every consumer that needs it.
//!
//! Values are mutated through [`Options::set`] and friends; every recognized
//! key keeps an immutable default captured at construction, so
//! `set(key, "default")` or `set("defaults", ...)` restores the original
//! state exactly. Changes to render-affecting keys are pushed into the
//! injected [`RenderGlobals`] collaborator immediately; changes to
//! kernel-affecting keys bump a generation counter that dependent numeric
//! code checks before reusing specialized profiles (see [`crate::kernels`]).
//!
//! The store is not thread-safe: concurrent mutation from multiple threads is
//! unsupported.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DashError;
use crate::log::{debug, warn};
use crate::render::{rc_covasim, rc_simple, InProcessRender, RcParams, RenderGlobals};

/// Keys whose changes are pushed into the render library's global state.
pub const RENDER_KEYS: [&str; 5] = ["backend", "style", "dpi", "font_size", "font_family"];

/// Keys whose changes require dependent numeric kernels to regenerate.
pub const KERNEL_KEYS: [&str; 3] = ["precision", "numba_parallel", "numba_cache"];

/// Custom plot fonts are loaded from here at construction, when present.
const FONT_ASSET_DIR: &str = "data/assets";

/// A single option value. Options are heterogeneous: scalars for most keys,
/// structured [`RcParams`] records for the `rc`/`rc_simple` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Rc(RcParams),
}

impl OptionValue {
    /// Truthiness in the sense the option semantics use it: false/zero/empty
    /// values are falsy, everything else (including rc records) is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Int(i) => *i != 0,
            OptionValue::Float(f) => *f != 0.0,
            OptionValue::Str(s) => !s.is_empty(),
            OptionValue::Rc(_) => true,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Int(i) => Some(*i as f64),
            OptionValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_rc(&self) -> Option<&RcParams> {
        match self {
            OptionValue::Rc(rc) => Some(rc),
            _ => None,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "boolean",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::Rc(_) => "rc params",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(i) => write!(f, "{i}"),
            OptionValue::Float(v) => write!(f, "{v}"),
            OptionValue::Str(s) => write!(f, "{s}"),
            OptionValue::Rc(rc) => write!(f, "<rc params, {} entries>", rc.len()),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

impl From<RcParams> for OptionValue {
    fn from(value: RcParams) -> Self {
        OptionValue::Rc(value)
    }
}

/// An ordered set of key/value overrides, the bulk-set argument to
/// [`Options::update`]. Later insertions of the same key replace earlier ones
/// without changing their position.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    entries: IndexMap<String, OptionValue>,
}

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Overrides {
    type Item = (String, OptionValue);
    type IntoIter = indexmap::map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for Overrides {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut overrides = Overrides::new();
        for (key, value) in iter {
            overrides.insert(key, value);
        }
        overrides
    }
}

/// Everything there is to know about one option, as reported by
/// [`Options::describe`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionInfo {
    pub key: String,
    pub current: OptionValue,
    pub default: OptionValue,
    /// Whether the current value differs from the default.
    pub modified: bool,
    /// The seeding environment variable, absent for structured options.
    pub env_var: Option<String>,
    pub description: String,
}

/// The options store. See the [module docs](self) for semantics.
pub struct Options {
    options: IndexMap<String, OptionValue>,
    orig_options: IndexMap<String, OptionValue>,
    optdesc: IndexMap<String, &'static str>,
    render: Box<dyn RenderGlobals>,
    generation: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options::new(Box::new(InProcessRender::new()))
    }
}

impl Options {
    /// Creates the store with defaults seeded from the process environment.
    #[must_use]
    pub fn new(render: Box<dyn RenderGlobals>) -> Self {
        Self::new_with_env(render, |var| std::env::var(var).ok())
    }

    /// Creates the store with an explicit environment lookup. `lookup`
    /// receives variable names like `COVASIM_DPI`; a set-but-unparseable
    /// value falls back to the hardcoded default with a warning.
    pub fn new_with_env(
        render: Box<dyn RenderGlobals>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut store = Options {
            options: IndexMap::new(),
            orig_options: IndexMap::new(),
            optdesc: IndexMap::new(),
            render,
            generation: 0,
        };
        store.declare_defaults(&lookup);
        // Deep, independent copy: the live values get mutated later, the
        // defaults must not.
        store.orig_options = store.options.clone();
        store.load_custom_fonts();
        store
    }

    fn declare_defaults(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        let default_backend = self.render.current_backend();
        #[allow(clippy::cast_possible_truncation)]
        let default_dpi = self.render.dpi() as i64;
        #[allow(clippy::cast_possible_truncation)]
        let default_font_size = self.render.font_size() as i64;

        let mut declare = |key: &'static str, desc: &'static str, default: OptionValue| {
            let value = env_var_for(key)
                .and_then(|var| {
                    let raw = lookup(&var)?;
                    let parsed = parse_env(&default, &raw);
                    if parsed.is_none() {
                        warn!(
                            "could not parse {}={:?} as a {} value, using the default",
                            var,
                            raw,
                            default.kind_name()
                        );
                    }
                    parsed
                })
                .unwrap_or(default);
            self.optdesc.insert(key.to_string(), desc);
            self.options.insert(key.to_string(), value);
        };

        declare(
            "verbose",
            "Default level of verbosity for simulations to use",
            OptionValue::Float(0.1),
        );
        declare(
            "sep",
            "Thousands separator for text output",
            OptionValue::from(","),
        );
        declare(
            "show",
            "Whether to show figures automatically",
            OptionValue::Bool(true),
        );
        declare(
            "close",
            "Whether to close figures automatically",
            OptionValue::Bool(false),
        );
        declare(
            "backend",
            "Render backend (use \"agg\" for non-interactive)",
            OptionValue::Str(default_backend),
        );
        declare(
            "interactive",
            "Convenience option that sets show, close, and backend together",
            OptionValue::Bool(true),
        );
        declare(
            "style",
            "Default plotting style: \"covasim\", \"simple\", or any registered style; see also the rc option",
            OptionValue::from("covasim"),
        );
        declare(
            "rc",
            "Default render (rc) parameters, used with style=\"covasim\"",
            OptionValue::Rc(rc_covasim()),
        );
        declare(
            "rc_simple",
            "Simplified render (rc) parameters, used with style=\"simple\"",
            OptionValue::Rc(rc_simple()),
        );
        declare(
            "dpi",
            "Default figure resolution in dots per inch",
            OptionValue::Int(default_dpi),
        );
        declare(
            "font_size",
            "Default font size for plots",
            OptionValue::Int(default_font_size),
        );
        declare(
            "font_family",
            "Default font family, e.g. Arial",
            OptionValue::from("Rosario"),
        );
        declare(
            "precision",
            "Arithmetic precision for numeric kernels: 32 or 64 bits",
            OptionValue::Int(32),
        );
        declare(
            "numba_parallel",
            "Kernel multithreading: none, safe, or full; full is faster but nondeterministic",
            OptionValue::from("none"),
        );
        declare(
            "numba_cache",
            "Whether to cache specialized kernels; disabling is not recommended",
            OptionValue::Bool(true),
        );
    }

    fn load_custom_fonts(&mut self) {
        // Optional; a missing assets directory is the common case.
        let dir = Path::new(FONT_ASSET_DIR);
        match self.render.register_fonts(dir) {
            Ok(count) => debug!("loaded {} custom fonts from {}", count, dir.display()),
            Err(error) => debug!("no custom fonts loaded from {}: {}", dir.display(), error),
        }
    }

    /// Returns the current value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::KeyNotFound`] for unrecognized keys.
    pub fn get(&self, key: &str) -> Result<&OptionValue, DashError> {
        self.options.get(key).ok_or_else(|| self.key_not_found(key))
    }

    /// Returns the default captured at construction for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::KeyNotFound`] for unrecognized keys.
    pub fn get_default(&self, key: &str) -> Result<&OptionValue, DashError> {
        self.orig_options
            .get(key)
            .ok_or_else(|| self.key_not_found(key))
    }

    /// Sets a single option, with two sentinel keys: `"default"`/`"defaults"`
    /// restores every option to its captured default (the value argument is
    /// ignored), and any key containing `"jupyter"` (case-insensitive)
    /// applies the notebook preset. A value of `"default"` restores that one
    /// key's default.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::KeyNotFound`] for unrecognized keys,
    /// [`DashError::InvalidStyle`] / [`DashError::BackendUnavailable`] for
    /// bad render settings, and a generic error for type mismatches. Nothing
    /// is mutated when an error is returned.
    pub fn set(&mut self, key: &str, value: impl Into<OptionValue>) -> Result<(), DashError> {
        if key == "default" || key == "defaults" {
            return self.reset_defaults();
        }
        if key.to_ascii_lowercase().contains("jupyter") {
            return self.apply_jupyter(Overrides::new());
        }
        self.apply(Overrides::new().with(key, value))
    }

    /// Bulk set: applies every override in insertion order, atomically.
    ///
    /// # Errors
    ///
    /// As [`Options::set`]; if any pair fails validation, no pair is applied.
    pub fn update(&mut self, overrides: Overrides) -> Result<(), DashError> {
        self.apply(overrides)
    }

    /// Restores every option to its captured default.
    ///
    /// # Errors
    ///
    /// Only fails if the render collaborator rejects a default it previously
    /// accepted, which indicates an environment change.
    pub fn reset_defaults(&mut self) -> Result<(), DashError> {
        let all: Overrides = self
            .orig_options
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.apply(all)
    }

    /// Restores one option to its captured default.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::KeyNotFound`] for unrecognized keys.
    pub fn reset_to_default(&mut self, key: &str) -> Result<(), DashError> {
        self.set(key, "default")
    }

    /// Applies the notebook preset `{dpi: 100, show: false, close: true}`,
    /// with any explicit `extra` overrides winning over the preset, then
    /// hints a high-resolution inline display format (best effort).
    ///
    /// # Errors
    ///
    /// As [`Options::update`] for the merged overrides; the display-format
    /// hint never fails the call.
    pub fn apply_jupyter(&mut self, extra: Overrides) -> Result<(), DashError> {
        let mut overrides = Overrides::new()
            .with("dpi", 100)
            .with("show", false)
            .with("close", true);
        for (key, value) in extra {
            overrides.insert(key, value);
        }
        self.apply(overrides)?;
        // Nicer inline plots where the frontend supports them; optional and
        // environment-dependent.
        if let Err(error) = self.render.set_display_format("retina") {
            debug!("skipping display format hint: {}", error);
        }
        Ok(())
    }

    fn apply(&mut self, overrides: Overrides) -> Result<(), DashError> {
        let overrides = self.expand_interactive(overrides);

        // Validate and resolve every pair before mutating anything, so a
        // failure partway through a multi-key set cannot leave the store
        // half-updated.
        let mut resolved: Vec<(String, OptionValue)> = Vec::with_capacity(overrides.len());
        for (key, value) in overrides {
            let Some(template) = self.orig_options.get(&key) else {
                return Err(self.key_not_found(&key));
            };
            let value = if is_default_sentinel(&value) {
                template.clone()
            } else {
                coerce(&key, template, value)?
            };
            match key.as_str() {
                "style" => self.validate_style(&value)?,
                "backend" => self.validate_backend(&value)?,
                _ => {}
            }
            resolved.push((key, value));
        }

        let mut reload_required = false;
        for (key, value) in resolved {
            self.options.insert(key.clone(), value.clone());
            if KERNEL_KEYS.contains(&key.as_str()) {
                reload_required = true;
            }
            if RENDER_KEYS.contains(&key.as_str()) {
                self.apply_render_global(&key, &value)?;
            }
        }
        if reload_required {
            self.reload_kernels();
        }
        Ok(())
    }

    /// The `interactive` pseudo-option expands into concrete overrides:
    /// truthy forces figures shown, kept open, on the original default
    /// backend; falsy forces figures hidden on the non-interactive "agg"
    /// backend, leaving `close` untouched.
    fn expand_interactive(&self, mut overrides: Overrides) -> Overrides {
        let Some(value) = overrides.get("interactive").cloned() else {
            return overrides;
        };
        let value = if is_default_sentinel(&value) {
            self.orig_options["interactive"].clone()
        } else {
            value
        };
        if value.is_truthy() {
            overrides.insert("show", true);
            overrides.insert("close", false);
            overrides.insert("backend", self.orig_options["backend"].clone());
        } else {
            overrides.insert("show", false);
            overrides.insert("backend", "agg");
        }
        overrides
    }

    fn validate_style(&self, value: &OptionValue) -> Result<(), DashError> {
        if !value.is_truthy() {
            return Ok(());
        }
        let name = value.as_str().unwrap_or_default();
        if name.eq_ignore_ascii_case("covasim") || self.render.has_style(name) {
            return Ok(());
        }
        Err(DashError::InvalidStyle(format!(
            "Style \"{}\" not found; options are \"covasim\" (default) plus:\n{}",
            name,
            self.render.styles().join("\n")
        )))
    }

    fn validate_backend(&self, value: &OptionValue) -> Result<(), DashError> {
        if !value.is_truthy() {
            return Ok(());
        }
        let name = value.as_str().unwrap_or_default();
        if self.render.backend_available(name) {
            return Ok(());
        }
        Err(DashError::BackendUnavailable(format!(
            "Backend \"{}\" is not available in this environment",
            name
        )))
    }

    /// Pushes a single render-affecting value into the render library's
    /// global state. Falsy values are skipped: the render state is never
    /// reset to an empty value.
    fn apply_render_global(&mut self, key: &str, value: &OptionValue) -> Result<(), DashError> {
        if !value.is_truthy() {
            return Ok(());
        }
        match key {
            "font_size" => {
                let size = expect_number(key, value)?;
                self.render.set_font_size(size);
            }
            "dpi" => {
                let dpi = expect_number(key, value)?;
                self.render.set_dpi(dpi);
            }
            "backend" => {
                let name = expect_string(key, value)?;
                self.render.switch_backend(name)?;
            }
            "font_family" => {
                let family = expect_string(key, value)?;
                self.render.set_font_family(family);
            }
            "style" => {
                let name = expect_string(key, value)?;
                if name.eq_ignore_ascii_case("covasim") {
                    self.render.reset_style();
                } else {
                    self.render.use_style(name)?;
                }
            }
            other => {
                return Err(DashError::KeyNotFound(format!(
                    "Key \"{other}\" is not a render option"
                )))
            }
        }
        Ok(())
    }

    fn reload_kernels(&mut self) {
        self.generation += 1;
        // Expensive and observable for every consumer, so always announce it.
        println!(
            "Regenerating numeric kernels so the new settings take effect; \
             objects created under the old settings are not converted."
        );
    }

    /// Generation counter for kernel-affecting settings. Dependent numeric
    /// code compares this against the generation its specialized profiles
    /// were built under.
    #[must_use]
    pub fn kernel_generation(&self) -> u64 {
        self.generation
    }

    /// Reports current value, default, modified flag, seeding environment
    /// variable, and description for every option, in declaration order.
    #[must_use]
    pub fn describe(&self) -> Vec<OptionInfo> {
        self.options
            .keys()
            .map(|key| {
                self.describe_key(key)
                    .expect("describe iterates recognized keys")
            })
            .collect()
    }

    /// As [`Options::describe`], for a single key.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::KeyNotFound`] for unrecognized keys.
    pub fn describe_key(&self, key: &str) -> Result<OptionInfo, DashError> {
        let current = self.get(key)?.clone();
        let default = self.orig_options[key].clone();
        Ok(OptionInfo {
            key: key.to_string(),
            modified: current != default,
            current,
            default,
            env_var: env_var_for(key),
            description: (*self.optdesc.get(key).unwrap_or(&"")).to_string(),
        })
    }

    /// Prints the full option listing to stdout.
    pub fn print_help(&self) {
        println!("Covasim dashboard options (\"Environment\" = name of the seeding environment variable):");
        for info in self.describe() {
            let changestr = if info.modified { " (modified)" } else { "" };
            println!();
            println!("{}", info.key);
            println!("      Current: {}{}", info.current, changestr);
            println!("      Default: {}", info.default);
            println!(
                "  Environment: {}",
                info.env_var.as_deref().unwrap_or("No environment variable")
            );
            println!("  Description: {}", info.description);
        }
    }

    /// Resolves whether a figure should be shown: an explicit `do_show` wins,
    /// otherwise the `show` option applies; a non-interactive backend always
    /// suppresses showing.
    #[must_use]
    pub fn resolve_show(&self, do_show: Option<bool>) -> bool {
        if self.render.current_backend() == "agg" {
            return false;
        }
        do_show.unwrap_or_else(|| self.options["show"].is_truthy())
    }

    /// Read access to the render collaborator's state.
    #[must_use]
    pub fn render(&self) -> &dyn RenderGlobals {
        self.render.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.options.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &OptionValue> {
        self.options.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.options.iter()
    }

    fn key_not_found(&self, key: &str) -> DashError {
        let keys: Vec<&str> = self.options.keys().map(String::as_str).collect();
        DashError::KeyNotFound(format!(
            "Option \"{}\" not recognized; options are \"defaults\" or:\n{}",
            key,
            keys.join("\n")
        ))
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Covasim dashboard options (see also print_help()):")?;
        for (key, value) in &self.options {
            writeln!(f, "  {key:>14}: {value}")?;
        }
        Ok(())
    }
}

fn env_var_for(key: &str) -> Option<String> {
    if key.starts_with("rc") {
        None
    } else {
        Some(format!("COVASIM_{}", key.to_ascii_uppercase()))
    }
}

fn is_default_sentinel(value: &OptionValue) -> bool {
    matches!(value, OptionValue::Str(s) if s == "default")
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => other.parse::<i64>().ok().map(|i| i != 0),
    }
}

/// Parses an environment string as the same type as `template`. `None` means
/// unparseable (the caller falls back to the default).
fn parse_env(template: &OptionValue, raw: &str) -> Option<OptionValue> {
    match template {
        OptionValue::Bool(_) => parse_bool(raw).map(OptionValue::Bool),
        OptionValue::Int(_) => raw.trim().parse::<i64>().ok().map(OptionValue::Int),
        OptionValue::Float(_) => raw.trim().parse::<f64>().ok().map(OptionValue::Float),
        OptionValue::Str(_) => Some(OptionValue::Str(raw.to_string())),
        OptionValue::Rc(_) => None,
    }
}

/// Coerces `value` to the type of `template` (the key's declared type).
/// Numeric widening and 0/1-to-bool conversions are accepted; anything else
/// is an error.
fn coerce(key: &str, template: &OptionValue, value: OptionValue) -> Result<OptionValue, DashError> {
    let mismatch = |value: &OptionValue| {
        DashError::DashError(format!(
            "Option \"{}\" expects a {} value, not {} ({:?})",
            key,
            template.kind_name(),
            value.kind_name(),
            value
        ))
    };
    match template {
        OptionValue::Bool(_) => match value {
            OptionValue::Bool(_) => Ok(value),
            OptionValue::Int(i) => Ok(OptionValue::Bool(i != 0)),
            OptionValue::Float(f) => Ok(OptionValue::Bool(f != 0.0)),
            OptionValue::Str(ref s) => parse_bool(s)
                .map(OptionValue::Bool)
                .ok_or_else(|| mismatch(&value)),
            OptionValue::Rc(_) => Err(mismatch(&value)),
        },
        OptionValue::Int(_) => match value {
            OptionValue::Int(_) => Ok(value),
            OptionValue::Bool(b) => Ok(OptionValue::Int(i64::from(b))),
            #[allow(clippy::cast_possible_truncation)]
            OptionValue::Float(f) if f.fract() == 0.0 => Ok(OptionValue::Int(f as i64)),
            _ => Err(mismatch(&value)),
        },
        OptionValue::Float(_) => match value {
            OptionValue::Float(_) => Ok(value),
            OptionValue::Int(i) => Ok(OptionValue::Float(i as f64)),
            OptionValue::Bool(b) => Ok(OptionValue::Float(f64::from(u8::from(b)))),
            _ => Err(mismatch(&value)),
        },
        OptionValue::Str(_) => match value {
            OptionValue::Str(_) => Ok(value),
            _ => Err(mismatch(&value)),
        },
        OptionValue::Rc(_) => match value {
            OptionValue::Rc(_) => Ok(value),
            _ => Err(mismatch(&value)),
        },
    }
}

fn expect_number(key: &str, value: &OptionValue) -> Result<f64, DashError> {
    value
        .as_f64()
        .ok_or_else(|| DashError::DashError(format!("Option \"{key}\" holds a non-numeric value")))
}

fn expect_string<'a>(key: &str, value: &'a OptionValue) -> Result<&'a str, DashError> {
    value
        .as_str()
        .ok_or_else(|| DashError::DashError(format!("Option \"{key}\" holds a non-string value")))
}
