//! Participants and the roster
//!
//! A participant is identified solely by its display name. Renaming a
//! participant is therefore the same as removing one and adding another.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::BillError;

/// A participant's display name, trimmed and never blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticipantName(String);

impl ParticipantName {
    /// Creates a participant name
    ///
    /// # Errors
    ///
    /// Returns `InvalidParticipantName` if the name is blank after trimming
    pub fn new(name: impl AsRef<str>) -> Result<Self, BillError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BillError::InvalidParticipantName(name.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ParticipantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ParticipantName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ParticipantName {
    type Error = BillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ParticipantName {
    type Error = BillError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ParticipantName> for String {
    fn from(name: ParticipantName) -> String {
        name.0
    }
}

/// The participants of one bill, in the order they were added
///
/// # Invariants
///
/// - Names are unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ParticipantName>", into = "Vec<ParticipantName>")]
pub struct Roster {
    members: Vec<ParticipantName>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from a list of names, rejecting blanks and duplicates
    pub fn from_names<I, S>(names: I) -> Result<Self, BillError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        for name in names {
            roster.add(ParticipantName::new(name)?)?;
        }
        Ok(roster)
    }

    /// Adds a participant
    ///
    /// # Errors
    ///
    /// Returns `DuplicateParticipant` if the name is already present
    pub fn add(&mut self, name: ParticipantName) -> Result<(), BillError> {
        if self.contains(name.as_str()) {
            return Err(BillError::DuplicateParticipant(name.into()));
        }
        self.members.push(name);
        Ok(())
    }

    /// Removes a participant, returning the removed name
    pub fn remove(&mut self, name: &str) -> Result<ParticipantName, BillError> {
        let index = self
            .members
            .iter()
            .position(|m| m.as_str() == name)
            .ok_or_else(|| BillError::ParticipantNotFound(name.to_string()))?;
        Ok(self.members.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == name)
    }

    pub fn get(&self, name: &str) -> Option<&ParticipantName> {
        self.members.iter().find(|m| m.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantName> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[ParticipantName] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl TryFrom<Vec<ParticipantName>> for Roster {
    type Error = BillError;

    fn try_from(members: Vec<ParticipantName>) -> Result<Self, Self::Error> {
        let mut roster = Self::new();
        for member in members {
            roster.add(member)?;
        }
        Ok(roster)
    }
}

impl From<Roster> for Vec<ParticipantName> {
    fn from(roster: Roster) -> Self {
        roster.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_trimmed() {
        let name = ParticipantName::new("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(matches!(
            ParticipantName::new("   "),
            Err(BillError::InvalidParticipantName(_))
        ));
    }

    #[test]
    fn test_duplicate_rejected_after_trimming() {
        let mut roster = Roster::from_names(["Alice"]).unwrap();
        let result = roster.add(ParticipantName::new(" Alice").unwrap());
        assert!(matches!(result, Err(BillError::DuplicateParticipant(n)) if n == "Alice"));
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut roster = Roster::from_names(["A", "B", "C"]).unwrap();
        roster.remove("B").unwrap();
        let names: Vec<&str> = roster.iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let result: Result<Roster, _> = serde_json::from_str(r#"["A", "A"]"#);
        assert!(result.is_err());
    }
}
