//! Semantic column kinds and their factories.
//!
//! A [`ColumnKind`] fixes the value-shape contract of a column: which [`ValueType`] it
//! implies, how it compares, whether it can be aggregated, and how a value reads as plain
//! text. Rendering itself is out of scope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::processing::sort::{Comparison, temporal_millis};
use crate::types::{ColumnDefinition, Value, ValueType, display_string};

/// Entity a foreign-key column points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Event,
    Venue,
    Ticket,
    TicketType,
    Order,
    User,
    Organizer,
}

/// Data-side description of a relation: which field of the related record to show, where
/// its detail page lives, and what to call it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub display_field: &'static str,
    /// Route with an `{id}` placeholder.
    pub route_template: &'static str,
    pub entity_label: &'static str,
}

impl RelationDescriptor {
    /// Detail route for the related record `id`.
    pub fn route_for(&self, id: &str) -> String {
        self.route_template.replace("{id}", id)
    }
}

impl RelationKind {
    pub fn descriptor(self) -> RelationDescriptor {
        match self {
            Self::Event => RelationDescriptor {
                display_field: "title",
                route_template: "/events/{id}",
                entity_label: "Event",
            },
            Self::Venue => RelationDescriptor {
                display_field: "name",
                route_template: "/venues/{id}",
                entity_label: "Venue",
            },
            Self::Ticket => RelationDescriptor {
                display_field: "code",
                route_template: "/tickets/{id}",
                entity_label: "Ticket",
            },
            Self::TicketType => RelationDescriptor {
                display_field: "name",
                route_template: "/ticket-types/{id}",
                entity_label: "Ticket Type",
            },
            Self::Order => RelationDescriptor {
                display_field: "reference",
                route_template: "/orders/{id}",
                entity_label: "Order",
            },
            Self::User => RelationDescriptor {
                display_field: "email",
                route_template: "/users/{id}",
                entity_label: "User",
            },
            Self::Organizer => RelationDescriptor {
                display_field: "name",
                route_template: "/organizers/{id}",
                entity_label: "Organizer",
            },
        }
    }

    /// Infer the relation from a foreign-key column name such as `event_id`.
    pub fn from_column_key(key: &str) -> Option<Self> {
        let base = key.strip_suffix("_id").or_else(|| key.strip_suffix("Id"))?;
        match base.to_ascii_lowercase().as_str() {
            "event" => Some(Self::Event),
            "venue" => Some(Self::Venue),
            "ticket" => Some(Self::Ticket),
            "ticket_type" | "tickettype" => Some(Self::TicketType),
            "order" => Some(Self::Order),
            "user" | "owner" | "attendee" | "created_by" | "createdby" => Some(Self::User),
            "organizer" => Some(Self::Organizer),
            _ => None,
        }
    }
}

/// Semantic kind of a column, each carrying its own configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    Text,
    /// Image URL; `alt_field` names the row field holding alt text.
    Image {
        #[serde(default)]
        alt_field: Option<String>,
    },
    /// Date or timestamp shown with a `chrono` format string (default `%b %-d, %Y`).
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    Relation { relation: RelationKind },
    /// Array of role names.
    RoleList,
    /// Array of badge labels.
    BadgeList,
    /// Object with `street`, `city`, `state`, `zip` fields.
    Address,
    /// Arbitrary JSON document.
    Json,
}

const DEFAULT_DATE_FORMAT: &str = "%b %-d, %Y";

impl ColumnKind {
    /// The value type a column of this kind declares.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Image { .. } => ValueType::Url,
            Self::Date { .. } => ValueType::Date,
            Self::Text
            | Self::Relation { .. }
            | Self::RoleList
            | Self::BadgeList
            | Self::Address
            | Self::Json => ValueType::Text,
        }
    }

    /// How values of this kind are ordered.
    pub fn comparison(&self) -> Comparison {
        match self {
            Self::Date { .. } => Comparison::Temporal,
            _ => Comparison::Text,
        }
    }

    /// Whether grouping and aggregation over this kind is meaningful.
    ///
    /// Structured values (lists, addresses, JSON documents) and images are not.
    pub fn aggregatable(&self) -> bool {
        matches!(self, Self::Text | Self::Date { .. } | Self::Relation { .. })
    }

    /// Plain-text reading of `value`.
    pub fn display(&self, value: Option<&Value>) -> String {
        match self {
            Self::Text | Self::Image { .. } => display_string(value),
            Self::Date { format } => format_date(value, format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)),
            Self::Relation { relation } => match value {
                Some(Value::Object(map)) => {
                    display_string(map.get(relation.descriptor().display_field))
                }
                other => display_string(other),
            },
            Self::RoleList | Self::BadgeList => match value {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|v| display_string(Some(v)))
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join(", "),
                other => display_string(other),
            },
            Self::Address => match value {
                Some(Value::Object(map)) => format_address(map),
                other => display_string(other),
            },
            Self::Json => match value {
                None | Some(Value::Null) => String::new(),
                Some(v) => serde_json::to_string_pretty(v).unwrap_or_default(),
            },
        }
    }
}

fn format_date(value: Option<&Value>, format: &str) -> String {
    let Some(millis) = temporal_millis(value) else {
        return display_string(value);
    };
    match DateTime::<Utc>::from_timestamp_millis(millis as i64) {
        Some(dt) => dt.format(format).to_string(),
        None => display_string(value),
    }
}

fn format_address(map: &serde_json::Map<String, Value>) -> String {
    let part = |k: &str| display_string(map.get(k));
    let state_zip = [part("state"), part("zip")]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    [part("street"), part("city"), state_zip]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Plain-text reading of `value` in column `def`.
pub fn display_value(def: &ColumnDefinition, value: Option<&Value>) -> String {
    match &def.kind {
        Some(kind) => kind.display(value),
        None => display_string(value),
    }
}

// Factories. Each returns a definition whose value type follows the kind.

pub fn image(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label)
        .kind(ColumnKind::Image { alt_field: None })
        .sortable(false)
        .filterable(false)
}

pub fn date(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label).kind(ColumnKind::Date { format: None })
}

pub fn date_with_format(
    key: impl Into<String>,
    label: impl Into<String>,
    format: impl Into<String>,
) -> ColumnDefinition {
    ColumnDefinition::new(key, label).kind(ColumnKind::Date {
        format: Some(format.into()),
    })
}

pub fn created_date(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    date(key, label).value_type(ValueType::CreatedDate).editable(false)
}

/// Relation column; the relation is inferred from the key when `relation` is `None`.
/// Keys that name no known relation fall back to a text column.
pub fn relation(
    key: impl Into<String>,
    label: impl Into<String>,
    relation: Option<RelationKind>,
) -> ColumnDefinition {
    let key = key.into();
    match relation.or_else(|| RelationKind::from_column_key(&key)) {
        Some(relation) => ColumnDefinition::new(key, label).kind(ColumnKind::Relation { relation }),
        None => ColumnDefinition::new(key, label).kind(ColumnKind::Text),
    }
}

pub fn roles(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label).kind(ColumnKind::RoleList).sortable(false)
}

pub fn badges(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label).kind(ColumnKind::BadgeList).sortable(false)
}

pub fn address(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label).kind(ColumnKind::Address)
}

pub fn json(key: impl Into<String>, label: impl Into<String>) -> ColumnDefinition {
    ColumnDefinition::new(key, label)
        .kind(ColumnKind::Json)
        .sortable(false)
        .filterable(false)
}
