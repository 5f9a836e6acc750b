//! Party file: the roster on disk.
//!
//! A party file maps each participant's name to their contact address and
//! forbidden list. Key order is the draw order. Files ending in `.yaml` or
//! `.yml` are read as YAML, anything else as JSON:
//!
//! ```yaml
//! Alice:
//!   email: alice@example.com
//!   forbidden: [Bob]
//! Bob:
//!   email: bob@example.com
//!   forbidden: []
//! ```
//!
//! ```json
//! {
//!   "Alice": { "email": "alice@example.com", "forbidden": ["Bob"] },
//!   "Bob":   { "email": "bob@example.com" }
//! }
//! ```
//!
//! The same format is written back by [`write_next_cycle`], so next year's
//! draw can start from this year's exclusions. A name that appears twice is
//! an error, never a silent overwrite.

use std::{
    fmt, fs, io,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};
use thiserror::Error;
use tinsel_core::{NextCycleEntry, Participant, Roster, RosterError};

/// One participant as stored in the party file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyEntry {
    /// Where the notification goes.
    pub email: String,
    /// Names this participant must not draw.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub forbidden: Vec<String>,
}

// `forbidden:` with nothing after it is YAML null
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// On-disk encoding of a party file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyFormat {
    /// JSON object.
    Json,
    /// YAML mapping.
    Yaml,
}

impl PartyFormat {
    /// Format implied by `path`: `.yaml` and `.yml` are YAML, anything else
    /// is JSON.
    pub fn from_path(path: &Path) -> Self {
        let is_yaml = path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| {
            ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml")
        });
        if is_yaml { Self::Yaml } else { Self::Json }
    }
}

/// Encoding or decoding failure in either format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors from reading or writing a party file.
#[derive(Debug, Error)]
pub enum PartyError {
    /// File could not be read or written.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// File is not a valid party document.
    #[error("{}: {source}", .path.display())]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: FormatError,
    },

    /// A participant's entry is malformed.
    #[error("{}: entry for {name}: {source}", .path.display())]
    Entry {
        /// File involved.
        path: PathBuf,
        /// Participant whose entry failed.
        name: String,
        /// Underlying error.
        source: FormatError,
    },

    /// Entries could not be serialized.
    #[error("{}: {source}", .path.display())]
    Render {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: FormatError,
    },

    /// Entries parsed but do not form a valid roster.
    #[error("{}: {source}", .path.display())]
    Roster {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        source: RosterError,
    },
}

/// Top-level mapping kept as an ordered list of pairs.
///
/// Repeated keys are kept, so the roster sees them and rejects the file.
struct Entries<V>(Vec<(String, V)>);

impl<V: Serialize> Serialize for Entries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

struct EntriesVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
    type Value = Entries<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of participant names to entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(pair) = access.next_entry::<String, V>()? {
            entries.push(pair);
        }
        Ok(Entries(entries))
    }
}

/// Parse a party document into a roster.
///
/// The format is chosen from `path`, which is otherwise only used for error
/// messages.
pub fn parse_party(text: &str, path: &Path) -> Result<Roster, PartyError> {
    let parse_err = |source: FormatError| PartyError::Parse { path: path.to_path_buf(), source };

    let entries = match PartyFormat::from_path(path) {
        PartyFormat::Json => {
            let Entries(raw) = serde_json::from_str::<Entries<serde_json::Value>>(text)
                .map_err(|e| parse_err(e.into()))?;
            decode(raw, path, |value| serde_json::from_value(value).map_err(FormatError::from))?
        },
        PartyFormat::Yaml => {
            let Entries(raw) = serde_yaml::from_str::<Entries<serde_yaml::Value>>(text)
                .map_err(|e| parse_err(e.into()))?;
            decode(raw, path, |value| serde_yaml::from_value(value).map_err(FormatError::from))?
        },
    };

    let participants = entries
        .into_iter()
        .map(|(name, entry)| Participant::new(name, entry.email, entry.forbidden))
        .collect();

    Roster::new(participants)
        .map_err(|source| PartyError::Roster { path: path.to_path_buf(), source })
}

fn decode<V>(
    raw: Vec<(String, V)>,
    path: &Path,
    convert: impl Fn(V) -> Result<PartyEntry, FormatError>,
) -> Result<Vec<(String, PartyEntry)>, PartyError> {
    raw.into_iter()
        .map(|(name, value)| match convert(value) {
            Ok(entry) => Ok((name, entry)),
            Err(source) => Err(PartyError::Entry { path: path.to_path_buf(), name, source }),
        })
        .collect()
}

/// Read a party file from disk.
pub fn load_party(path: &Path) -> Result<Roster, PartyError> {
    let text = fs::read_to_string(path)
        .map_err(|source| PartyError::Io { path: path.to_path_buf(), source })?;
    let roster = parse_party(&text, path)?;

    tracing::info!(path = %path.display(), participants = roster.len(), "party loaded");
    Ok(roster)
}

/// Render next cycle's entries as a party document.
pub fn render_next_cycle(
    entries: &[NextCycleEntry],
    format: PartyFormat,
) -> Result<String, FormatError> {
    let document = Entries(
        entries
            .iter()
            .map(|entry| {
                let stored =
                    PartyEntry { email: entry.address.clone(), forbidden: entry.forbidden.clone() };
                (entry.name.clone(), stored)
            })
            .collect(),
    );

    match format {
        PartyFormat::Json => {
            let mut text = serde_json::to_string_pretty(&document)?;
            text.push('\n');
            Ok(text)
        },
        PartyFormat::Yaml => Ok(serde_yaml::to_string(&document)?),
    }
}

/// Write next cycle's entries to `path`, in the format its extension implies.
pub fn write_next_cycle(path: &Path, entries: &[NextCycleEntry]) -> Result<(), PartyError> {
    let text = render_next_cycle(entries, PartyFormat::from_path(path))
        .map_err(|source| PartyError::Render { path: path.to_path_buf(), source })?;
    fs::write(path, text).map_err(|source| PartyError::Io { path: path.to_path_buf(), source })?;

    tracing::info!(path = %path.display(), participants = entries.len(), "next cycle written");
    Ok(())
}
