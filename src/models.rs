// src/models.rs

//! The profile store document and its building blocks.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- PROFILE STORE MODELS (what is read from and written to config.yaml) ---

/// A single environment variable assignment of a profile.
///
/// Values are kept exactly as written in the store; resolution (home
/// expansion, `$VAR` references, `$(...)` substitution) happens at launch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Env {
    /// Variable name.
    pub name: String,
    /// Raw value, before resolution.
    #[serde(deserialize_with = "scalar_as_string")]
    pub value: String,
}

impl Env {
    /// Creates a new `NAME=VALUE` pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// The nested namespace of profiles, keyed by segment name.
///
/// The same type is used at the root of the store and for the children of
/// every profile. Keys are kept sorted so the file stays stable across saves.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Profiles(pub(crate) BTreeMap<String, Profile>);

impl<'de> Deserialize<'de> for Profiles {
    /// A node written as an empty placeholder (`lab:` with nothing under it)
    /// is an empty profile, at any depth.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nodes = BTreeMap::<String, Option<Profile>>::deserialize(deserializer)?;
        Ok(Self(
            nodes
                .into_iter()
                .map(|(name, node)| (name, node.unwrap_or_default()))
                .collect(),
        ))
    }
}

impl Profiles {
    /// Returns the direct child with the given segment name.
    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.0.get(name)
    }

    /// Iterates over the direct children in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Profile)> {
        self.0.iter()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no direct children.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A profile node. A node without envs but with children is a pure group.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty", deserialize_with = "nullable")]
    pub desc: String,
    /// Variables, in the order they are resolved and applied.
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable")]
    pub env: Vec<Env>,
    /// Runs before the target, unless skipped.
    #[serde(rename = "init-script", default, skip_serializing_if = "Option::is_none")]
    pub init_script: Option<InitScript>,
    /// Any other key at this level is a nested profile.
    #[serde(flatten)]
    pub children: Profiles,
}

impl Profile {
    /// Creates a profile with a description and a list of envs.
    pub fn new(desc: impl Into<String>, env: Vec<Env>) -> Self {
        Self {
            desc: desc.into(),
            env,
            ..Default::default()
        }
    }

    /// Returns the init-scripts of this profile as an ordered list.
    pub fn init_scripts(&self) -> Vec<&str> {
        self.init_script
            .as_ref()
            .map(InitScript::scripts)
            .unwrap_or_default()
    }
}

/// Shell fragments run right before the target command or shell.
///
/// In the file this is either a bare string or a list of maps carrying a
/// `run` key; list entries without `run` are dropped when decoding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "RawInitScript", into = "RawInitScript")]
pub enum InitScript {
    /// `init-script: "..."`
    Single(String),
    /// `init-script: [{ run: "..." }, ...]`
    Sequence(Vec<String>),
}

impl InitScript {
    /// Normalizes the script into an ordered list of fragments.
    pub fn scripts(&self) -> Vec<&str> {
        match self {
            Self::Single(script) => vec![script.as_str()],
            Self::Sequence(scripts) => scripts.iter().map(String::as_str).collect(),
        }
    }
}

/// On-disk shape of `init-script`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
enum RawInitScript {
    Single(String),
    Sequence(Vec<serde_yaml::Value>),
}

impl From<RawInitScript> for InitScript {
    fn from(raw: RawInitScript) -> Self {
        match raw {
            RawInitScript::Single(script) => Self::Single(script),
            RawInitScript::Sequence(entries) => Self::Sequence(
                entries
                    .iter()
                    .filter_map(|entry| {
                        let run = entry.get("run").and_then(scalar_to_string);
                        if run.is_none() {
                            log::warn!("Ignoring init-script entry without a 'run' key: {:?}", entry);
                        }
                        run
                    })
                    .collect(),
            ),
        }
    }
}

impl From<InitScript> for RawInitScript {
    fn from(script: InitScript) -> Self {
        match script {
            InitScript::Single(script) => Self::Single(script),
            InitScript::Sequence(scripts) => Self::Sequence(
                scripts
                    .into_iter()
                    .map(|run| {
                        let mut entry = serde_yaml::Mapping::new();
                        entry.insert("run".into(), serde_yaml::Value::String(run));
                        serde_yaml::Value::Mapping(entry)
                    })
                    .collect(),
            ),
        }
    }
}

/// The whole profile store: the default profile name and the profile tree.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Name of the profile used when none is given. Empty when unset.
    #[serde(default, deserialize_with = "nullable")]
    pub default: String,
    /// Root of the profile tree.
    #[serde(default, deserialize_with = "nullable")]
    pub profiles: Profiles,
}

// --- RUNTIME MODELS (never persisted) ---

/// A profile found by its dotted path, as returned by a lookup on `Config`.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedProfile<'a> {
    /// Dotted path it was found under.
    pub name: &'a str,
    /// The node itself.
    pub profile: &'a Profile,
    /// Whether it is the store's default.
    pub is_default: bool,
}

// --- SERDE HELPERS ---

/// Treats an explicit YAML `null` as the type's default value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts strings, numbers and booleans for env values (`PORT: 8080`).
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        other => scalar_to_string(&other).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a scalar env value, found {:?}", other))
        }),
    }
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
default: lab.cluster1
profiles:
  docker:
    desc: local docker
    env:
      - name: DOCKER_HOST
        value: ssh://me@host
    init-script: echo hello
  lab:
    desc: lab group
    cluster1:
      env:
        - name: KUBECONFIG
          value: ~/.kube/lab1
        - name: PORT
          value: 8080
      init-script:
        - run: echo one
        - name: no run key here
        - run: echo two
"#;

    #[test]
    fn test_parse_nested_profiles_with_inline_children() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.default, "lab.cluster1");

        let lab = config.profiles.get("lab").unwrap();
        assert_eq!(lab.desc, "lab group");
        assert!(lab.env.is_empty());

        let cluster1 = lab.children.get("cluster1").unwrap();
        assert_eq!(cluster1.env.len(), 2);
        assert_eq!(cluster1.env[1], Env::new("PORT", "8080"));
    }

    #[test]
    fn test_empty_placeholder_nodes_load_at_every_depth() {
        let config: Config = serde_yaml::from_str("profiles:\n  lab:\n    cluster1:\n  docker:\n").unwrap();

        let lab = config.profiles.get("lab").unwrap();
        assert_eq!(lab.children.get("cluster1"), Some(&Profile::default()));
        assert_eq!(config.profiles.get("docker"), Some(&Profile::default()));
        assert!(config.profiles.list_names().is_empty());
    }

    #[test]
    fn test_init_script_entries_without_run_are_dropped() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        let cluster1 = config.profiles.get("lab").unwrap().children.get("cluster1").unwrap();
        assert_eq!(cluster1.init_scripts(), vec!["echo one", "echo two"]);

        let docker = config.profiles.get("docker").unwrap();
        assert_eq!(docker.init_scripts(), vec!["echo hello"]);
    }

    #[test]
    fn test_serialized_form_reads_back_identically() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Empty fields are omitted and children are written inline.
        assert!(!yaml.contains("children"));
        assert!(yaml.contains("init-script"));

        let reread: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(reread, config);
    }

    #[test]
    fn test_null_sections_fall_back_to_defaults() {
        let config: Config = serde_yaml::from_str("default:\nprofiles:\n").unwrap();
        assert!(config.default.is_empty());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_env_display_is_key_value() {
        assert_eq!(Env::new("A", "b=c").to_string(), "A=b=c");
    }
}
