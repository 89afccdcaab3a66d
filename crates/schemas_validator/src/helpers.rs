//! Helper predicate catalog.
//!
//! Schemas reference helpers by name (`type: helper`). The catalog maps each
//! name to a pure predicate; it is filled before the engine is built and is
//! read-only afterwards.

use crate::utils::{general, mf};
use schemas_core::{ComputationError, ComputationResult, Payload, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a helper predicate.
pub type HelperFn = dyn Fn(&HelperCall<'_>) -> ComputationResult<bool> + Send + Sync;

/// Everything a helper may look at.
#[derive(Debug, Clone, Copy)]
pub struct HelperCall<'a> {
    /// Helper name, used in errors
    pub helper: &'a str,
    /// Name of the field being checked
    pub field: &'a str,
    /// Value of the field being checked
    pub value: &'a Value,
    /// Whole payload, for cross-field helpers
    pub payload: &'a Payload,
    /// Arguments given in the schema
    pub args: &'a BTreeMap<String, Value>,
}

impl<'a> HelperCall<'a> {
    /// The checked value as text.
    pub fn text(&self) -> ComputationResult<&'a str> {
        self.value.as_str().ok_or_else(|| {
            ComputationError::invalid_input(
                self.helper,
                format!("expected text, got {}", self.value.type_name()),
            )
        })
    }

    /// A text argument that the schema must provide.
    pub fn required_arg(&self, key: &str) -> ComputationResult<&'a str> {
        self.optional_arg(key)?.ok_or_else(|| {
            ComputationError::defect(self.helper, format!("missing argument '{}'", key))
        })
    }

    /// A text argument the schema may provide.
    pub fn optional_arg(&self, key: &str) -> ComputationResult<Option<&'a str>> {
        match self.args.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ComputationError::defect(
                self.helper,
                format!("argument '{}' must be text, got {}", key, other.type_name()),
            )),
        }
    }

    /// Another payload value, treating null as absent.
    pub fn related(&self, field: &str) -> ComputationResult<&'a Value> {
        self.payload
            .get(field)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                ComputationError::invalid_input(
                    self.helper,
                    format!("related field '{}' is missing", field),
                )
            })
    }
}

/// Named helper predicates.
#[derive(Clone, Default)]
pub struct HelperCatalog {
    helpers: BTreeMap<String, Arc<HelperFn>>,
}

impl HelperCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the built-in general and manifest helpers.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register("general.non_empty", non_empty);
        catalog.register("general.lowercase", |call| {
            let text = call.text()?;
            Ok(text == text.to_lowercase())
        });
        catalog.register("general.trimmed", |call| {
            let text = call.text()?;
            Ok(text == text.trim())
        });
        catalog.register("general.url", |call| Ok(general::is_valid_url(call.text()?)));
        catalog.register("mf.md5_checksum", |call| Ok(mf::is_lc_checksum(call.text()?)));
        catalog.register("mf.manifest_file_name", |call| {
            let (prefix, extension) = manifest_naming(call)?;
            Ok(mf::manifest_file_name(call.text()?, prefix, extension))
        });
        catalog.register("mf.remote_manifest_path", remote_manifest_path);
        catalog.register("mf.bungie_success", |call| {
            let code = general::as_integer(call.value).map_err(|_| {
                ComputationError::invalid_input(
                    call.helper,
                    format!("expected an integer error code, got {}", call.value.type_name()),
                )
            })?;
            Ok(mf::classify_error_code(code) == mf::BungieErrorClass::Success)
        });
        catalog.register("mf.checksum_matches", checksum_matches);
        catalog.register("mf.language_available", language_available);
        catalog
    }

    /// Adds or replaces a helper.
    pub fn register<F>(&mut self, name: impl Into<String>, helper: F)
    where
        F: Fn(&HelperCall<'_>) -> ComputationResult<bool> + Send + Sync + 'static,
    {
        self.helpers.insert(name.into(), Arc::new(helper));
    }

    /// Whether a helper is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }

    /// Registered helper names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.helpers.keys().map(String::as_str)
    }

    /// Runs the helper named in `call`.
    ///
    /// An unknown name is a defect, not a rule failure.
    pub fn call(&self, call: &HelperCall<'_>) -> ComputationResult<bool> {
        let helper = self.helpers.get(call.helper).ok_or_else(|| {
            ComputationError::defect(call.helper, "no helper registered under this name")
        })?;
        helper(call)
    }
}

impl fmt::Debug for HelperCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelperCatalog")
            .field("helpers", &self.helpers.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn non_empty(call: &HelperCall<'_>) -> ComputationResult<bool> {
    match call.value {
        Value::String(s) => Ok(!s.trim().is_empty()),
        other => general::length_of(other)
            .map(|len| len > 0)
            .map_err(|err| ComputationError::invalid_input(call.helper, err.message)),
    }
}

fn manifest_naming<'a>(call: &HelperCall<'a>) -> ComputationResult<(&'a str, &'a str)> {
    Ok((
        call.optional_arg("starts_with")?
            .unwrap_or(mf::DEFAULT_MANIFEST_PREFIX),
        call.optional_arg("extension")?
            .unwrap_or(mf::DEFAULT_MANIFEST_EXTENSION),
    ))
}

fn remote_manifest_path(call: &HelperCall<'_>) -> ComputationResult<bool> {
    let path = call.text()?;
    let expected_dir = call
        .optional_arg("expected_dir")?
        .unwrap_or(mf::EXPECTED_REMOTE_MANIFEST_DIR);
    let (prefix, extension) = manifest_naming(call)?;

    Ok(mf::check_remote_manifest_dir(path, expected_dir)
        && mf::manifest_file_name(mf::remote_manifest_name(path), prefix, extension))
}

/// Compares the checked checksum with the one embedded in a file name field.
fn checksum_matches(call: &HelperCall<'_>) -> ComputationResult<bool> {
    let name_field = call.required_arg("name_field")?;
    let checksum = mf::lc_checksum(call.text()?)
        .map_err(|err| ComputationError::invalid_input(call.helper, err.message))?;

    let name = call.related(name_field)?.as_str().ok_or_else(|| {
        ComputationError::invalid_input(
            call.helper,
            format!("related field '{}' must be text", name_field),
        )
    })?;
    let (prefix, extension) = manifest_naming(call)?;
    let expected = mf::checksum_from_manifest_name(name, prefix, extension)
        .map_err(|err| ComputationError::invalid_input(call.helper, err.message))?;

    Ok(checksum == expected)
}

/// Whether the desired language has a close match among the languages listed
/// in another field (a list of tags or a map keyed by tag).
fn language_available(call: &HelperCall<'_>) -> ComputationResult<bool> {
    let languages_field = call.required_arg("languages_field")?;
    let desired = call.text()?;

    let available: Vec<&str> = match call.related(languages_field)? {
        Value::Map(map) => map.keys().map(String::as_str).collect(),
        Value::List(items) => items.iter().filter_map(Value::as_str).collect(),
        other => {
            return Err(ComputationError::invalid_input(
                call.helper,
                format!(
                    "related field '{}' must be a list or map, got {}",
                    languages_field,
                    other.type_name()
                ),
            ));
        }
    };

    Ok(mf::closest_language(desired, &available).is_some())
}
