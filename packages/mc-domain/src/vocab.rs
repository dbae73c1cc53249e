//! Closed vocabularies stored as text columns.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {field} value {value:?}.")]
pub struct UnknownValue {
	pub field: &'static str,
	pub value: String,
}
impl UnknownValue {
	fn new(field: &'static str, value: &str) -> Self {
		Self { field, value: value.to_string() }
	}
}

/// Outcome recorded on an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
	Success,
	Error,
	Info,
}
impl EventStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
			Self::Info => "info",
		}
	}
}
impl FromStr for EventStatus {
	type Err = UnknownValue;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"success" => Ok(Self::Success),
			"error" => Ok(Self::Error),
			"info" => Ok(Self::Info),
			other => Err(UnknownValue::new("status", other)),
		}
	}
}
impl fmt::Display for EventStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Who reported an activity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventSource {
	Web,
	ExternalSystem,
	System,
}
impl EventSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Web => "web",
			Self::ExternalSystem => "external-system",
			Self::System => "system",
		}
	}
}
impl FromStr for EventSource {
	type Err = UnknownValue;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"web" => Ok(Self::Web),
			"external-system" => Ok(Self::ExternalSystem),
			"system" => Ok(Self::System),
			other => Err(UnknownValue::new("source", other)),
		}
	}
}
impl fmt::Display for EventSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Schedule flavor of a mirrored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
	Cron,
	At,
	Every,
}
impl TaskKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Cron => "cron",
			Self::At => "at",
			Self::Every => "every",
		}
	}

	/// Sync feeds send free-form kinds; anything unrecognized is treated as cron.
	pub fn from_feed(raw: Option<&str>) -> Self {
		raw.and_then(|value| value.trim().parse().ok()).unwrap_or(Self::Cron)
	}
}
impl FromStr for TaskKind {
	type Err = UnknownValue;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"cron" => Ok(Self::Cron),
			"at" => Ok(Self::At),
			"every" => Ok(Self::Every),
			other => Err(UnknownValue::new("kind", other)),
		}
	}
}
impl fmt::Display for TaskKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
	Memory,
	Note,
	Doc,
}
impl DocumentKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Memory => "memory",
			Self::Note => "note",
			Self::Doc => "doc",
		}
	}
}
impl FromStr for DocumentKind {
	type Err = UnknownValue;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw {
			"memory" => Ok(Self::Memory),
			"note" => Ok(Self::Note),
			"doc" => Ok(Self::Doc),
			other => Err(UnknownValue::new("kind", other)),
		}
	}
}
impl fmt::Display for DocumentKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
