//! Anonymous response labels and the label -> identity map

use crate::core::model::Model;
use crate::orchestration::value_objects::PanelAnswer;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Anonymous single-letter label standing in for a panel member ("Response A")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(char);

impl Label {
    /// Number of distinct labels (A..=Z)
    pub const MAX: usize = 26;

    /// Label for the answer at `index` in enumeration order
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::MAX).then(|| Label((b'A' + index as u8) as char))
    }

    /// Label for an uppercase ASCII letter
    pub fn from_letter(letter: char) -> Option<Self> {
        letter.is_ascii_uppercase().then_some(Label(letter))
    }

    pub fn letter(self) -> char {
        self.0
    }

    pub fn index(self) -> usize {
        (self.0 as u8 - b'A') as usize
    }

    /// Labels in assignment order
    pub fn all() -> impl Iterator<Item = Label> {
        (b'A'..=b'Z').map(|b| Label(b as char))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response {}", self.0)
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    /// Accepts `Response A` or a bare `A`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let letter = s.strip_prefix("Response").map(str::trim).unwrap_or(s);
        let mut chars = letter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Label::from_letter(c).ok_or_else(|| format!("invalid label: {s}")),
            _ => Err(format!("invalid label: {s}")),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Bijection between labels and panel identities for one council run.
///
/// Built once from the Stage 1 survivors and shared by the ranking prompt,
/// the aggregate ranker and the result metadata. Entries are kept in label
/// order, which is the panel configuration order of the survivors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(Label, Model)>,
}

impl LabelMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identity behind a label, if the label was assigned in this run
    pub fn resolve(&self, label: Label) -> Option<&Model> {
        self.entries
            .get(label.index())
            .filter(|(l, _)| *l == label)
            .map(|(_, model)| model)
    }

    /// Label assigned to an identity
    pub fn label_of(&self, model: &Model) -> Option<Label> {
        self.entries
            .iter()
            .find(|(_, m)| m == model)
            .map(|(label, _)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Label, &Model)> {
        self.entries.iter().map(|(label, model)| (*label, model))
    }

    /// Pair each answer with its label, in label order
    pub fn labeled<'a>(&self, answers: &'a [PanelAnswer]) -> Vec<(Label, &'a PanelAnswer)> {
        self.entries
            .iter()
            .filter_map(|(label, model)| {
                answers
                    .iter()
                    .find(|answer| &answer.model == model)
                    .map(|answer| (*label, answer))
            })
            .collect()
    }
}

/// Assign labels A, B, C, ... to the Stage 1 survivors in the order given.
///
/// Answers past the 26th are left unlabeled; panel validation prevents
/// that from happening in a configured council.
pub fn anonymize(answers: &[PanelAnswer]) -> LabelMap {
    LabelMap {
        entries: Label::all()
            .zip(answers)
            .map(|(label, answer)| (label, answer.model.clone()))
            .collect(),
    }
}

impl Serialize for LabelMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, model) in &self.entries {
            map.serialize_entry(label, model)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LabelMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LabelMapVisitor;

        impl<'de> Visitor<'de> for LabelMapVisitor {
            type Value = LabelMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of \"Response X\" labels to model identities")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<LabelMap, A::Error> {
                let mut entries: Vec<(Label, Model)> = Vec::new();
                while let Some((label, model)) = access.next_entry::<Label, Model>()? {
                    entries.push((label, model));
                }
                entries.sort_by_key(|(label, _)| *label);
                for (expected, (label, _)) in Label::all().zip(&entries) {
                    if expected != *label {
                        return Err(de::Error::custom(format!(
                            "labels must be contiguous from Response A, missing {expected}"
                        )));
                    }
                }
                Ok(LabelMap { entries })
            }
        }

        deserializer.deserialize_map(LabelMapVisitor)
    }
}
