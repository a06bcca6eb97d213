// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filter composer.
//!
//! [`TicketFilter`] is what a client asks for. [`TicketQuery::compose`] pairs
//! it with the principal's [`TicketScope`], discarding clauses the role may
//! not use, and yields a query that the store renders to SQL. The same query
//! can be evaluated in memory with [`TicketQuery::apply`].

use hub_common_ticket::{
	CategoryId, TeamId, Ticket, TicketPriority, TicketStatus, TicketType, UserId,
};
use serde::de::{value::StrDeserializer, DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::scope::{scope_for, TicketScope};
use crate::types::Principal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
	/// Anything not closed.
	Open,
	Closed,
}

impl StatusFilter {
	pub fn matches(&self, status: TicketStatus) -> bool {
		match self {
			StatusFilter::Open => status != TicketStatus::Closed,
			StatusFilter::Closed => status == TicketStatus::Closed,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TicketOrdering {
	#[serde(rename = "ascending_created_on")]
	CreatedAsc,
	#[serde(rename = "descending_created_on")]
	CreatedDesc,
	#[serde(rename = "ascending_updated_on")]
	UpdatedAsc,
	#[default]
	#[serde(rename = "descending_updated_on")]
	UpdatedDesc,
}

impl TicketOrdering {
	pub fn is_descending(&self) -> bool {
		matches!(self, TicketOrdering::CreatedDesc | TicketOrdering::UpdatedDesc)
	}

	/// Compare on the ordering column, then on id in the same direction.
	pub fn compare(&self, a: &Ticket, b: &Ticket) -> Ordering {
		let by_column = match self {
			TicketOrdering::CreatedAsc | TicketOrdering::CreatedDesc => a.created_at.cmp(&b.created_at),
			TicketOrdering::UpdatedAsc | TicketOrdering::UpdatedDesc => a.updated_at.cmp(&b.updated_at),
		};
		let ascending = by_column.then_with(|| a.id.cmp(&b.id));
		if self.is_descending() {
			ascending.reverse()
		} else {
			ascending
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeFilter {
	Me,
	All,
}

/// Listing parameters as supplied by the client. Every clause is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketFilter {
	#[serde(deserialize_with = "lenient_choice")]
	pub status: Option<StatusFilter>,
	#[serde(deserialize_with = "lenient_choice")]
	pub ordering: Option<TicketOrdering>,
	/// Elevated only: author username contains.
	pub author: Option<String>,
	/// Elevated only: assigned technician username contains.
	pub technician: Option<String>,
	/// Elevated only.
	pub title: Option<String>,
	/// Elevated only.
	pub description: Option<String>,
	/// Elevated only.
	#[serde(deserialize_with = "lenient_choice")]
	pub priority: Option<TicketPriority>,
	/// Elevated only.
	#[serde(deserialize_with = "lenient_id")]
	pub team: Option<TeamId>,
	/// Elevated only.
	#[serde(deserialize_with = "lenient_id")]
	pub category: Option<CategoryId>,
	/// Elevated only.
	#[serde(rename = "type", deserialize_with = "lenient_choice")]
	pub ticket_type: Option<TicketType>,
	/// Elevated only.
	#[serde(deserialize_with = "lenient_choice")]
	pub assignee: Option<AssigneeFilter>,
}

/// A blank or unrecognised clause value reads as absent.
fn lenient_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let Some(raw) = deserialize_non_blank(deserializer)? else {
		return Ok(None);
	};
	let value: StrDeserializer<'_, serde::de::value::Error> = raw.as_str().into_deserializer();
	Ok(T::deserialize(value).ok())
}

fn lenient_id<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: FromStr,
{
	Ok(deserialize_non_blank(deserializer)?.and_then(|raw| raw.parse().ok()))
}

fn deserialize_non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	let raw = Option::<String>::deserialize(deserializer)?;
	Ok(raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}

impl TicketFilter {
	pub fn has_elevated_clauses(&self) -> bool {
		self.author.is_some()
			|| self.technician.is_some()
			|| self.title.is_some()
			|| self.description.is_some()
			|| self.priority.is_some()
			|| self.team.is_some()
			|| self.category.is_some()
			|| self.ticket_type.is_some()
			|| self.assignee.is_some()
	}
}

/// A ticket row joined with the usernames the contains-clauses match on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketListing {
	#[serde(flatten)]
	pub ticket: Ticket,
	pub author_username: String,
	pub technician_username: Option<String>,
}

/// Scope plus the clauses that survived composition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketQuery {
	pub scope: TicketScope,
	pub status: Option<StatusFilter>,
	pub ordering: TicketOrdering,
	pub author_contains: Option<String>,
	pub technician_contains: Option<String>,
	pub title_contains: Option<String>,
	pub description_contains: Option<String>,
	pub priority: Option<TicketPriority>,
	pub team: Option<TeamId>,
	pub category: Option<CategoryId>,
	pub ticket_type: Option<TicketType>,
	pub assigned_to: Option<UserId>,
}

fn non_blank(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

/// Case-insensitive for ASCII letters only, the same folding SQLite's
/// `lower()` applies, so in-memory and SQL listings agree.
fn contains_ci(haystack: &str, needle: &str) -> bool {
	haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

impl TicketQuery {
	/// Combine the principal's scope with a client filter.
	///
	/// Elevated-only clauses supplied by a customer are ignored, not
	/// rejected. Blank strings count as absent.
	pub fn compose(principal: &Principal, filter: TicketFilter) -> Self {
		let scope = scope_for(principal);
		let mut query = TicketQuery {
			scope,
			status: filter.status,
			ordering: filter.ordering.unwrap_or_default(),
			author_contains: None,
			technician_contains: None,
			title_contains: None,
			description_contains: None,
			priority: None,
			team: None,
			category: None,
			ticket_type: None,
			assigned_to: None,
		};

		if !principal.is_elevated() {
			if filter.has_elevated_clauses() {
				tracing::debug!(user_id = %principal.id, "ignoring elevated filter clauses for customer");
			}
			return query;
		}

		query.author_contains = non_blank(filter.author);
		query.technician_contains = non_blank(filter.technician);
		query.title_contains = non_blank(filter.title);
		query.description_contains = non_blank(filter.description);
		query.priority = filter.priority;
		query.team = filter.team;
		query.category = filter.category;
		query.ticket_type = filter.ticket_type;
		query.assigned_to = match filter.assignee {
			Some(AssigneeFilter::Me) => Some(principal.id),
			Some(AssigneeFilter::All) | None => None,
		};
		query
	}

	/// In-memory evaluation of the query. Contains-clauses fold ASCII case
	/// only; non-ASCII letters must match exactly.
	pub fn matches(&self, listing: &TicketListing) -> bool {
		let ticket = &listing.ticket;
		if !self.scope.permits(ticket) {
			return false;
		}
		if let Some(status) = self.status {
			if !status.matches(ticket.status) {
				return false;
			}
		}
		if let Some(needle) = &self.author_contains {
			if !contains_ci(&listing.author_username, needle) {
				return false;
			}
		}
		if let Some(needle) = &self.technician_contains {
			match &listing.technician_username {
				Some(username) if contains_ci(username, needle) => {}
				_ => return false,
			}
		}
		if let Some(needle) = &self.title_contains {
			if !contains_ci(&ticket.title, needle) {
				return false;
			}
		}
		if let Some(needle) = &self.description_contains {
			if !contains_ci(&ticket.description, needle) {
				return false;
			}
		}
		if self.priority.is_some_and(|p| p != ticket.priority) {
			return false;
		}
		if self.team.is_some() && self.team != ticket.assigned_team {
			return false;
		}
		if self.category.is_some() && self.category != ticket.category {
			return false;
		}
		if self.ticket_type.is_some_and(|t| t != ticket.ticket_type) {
			return false;
		}
		if self.assigned_to.is_some() && self.assigned_to != ticket.assigned_technician {
			return false;
		}
		true
	}

	/// Filter and order in memory.
	pub fn apply(&self, listings: impl IntoIterator<Item = TicketListing>) -> Vec<TicketListing> {
		let mut matched: Vec<TicketListing> = listings.into_iter().filter(|l| self.matches(l)).collect();
		matched.sort_by(|a, b| self.ordering.compare(&a.ticket, &b.ticket));
		matched
	}
}

/// Profile listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFilter {
	/// Case-insensitive username contains.
	pub username: Option<String>,
}

impl ProfileFilter {
	pub fn username_contains(&self) -> Option<&str> {
		self.username.as_deref().filter(|v| !v.trim().is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::Role;
	use chrono::{Duration, TimeZone, Utc};
	use hub_common_ticket::TicketId;
	use proptest::prelude::*;

	const ALICE: i64 = 1;
	const BOB: i64 = 2;
	const CAROL: i64 = 3;
	const DAN: i64 = 4;

	fn username(id: i64) -> String {
		match id {
			ALICE => "alice",
			BOB => "bob",
			CAROL => "carol",
			_ => "dan",
		}
		.to_string()
	}

	fn listing(id: i64, author: i64, status: TicketStatus, technician: Option<i64>) -> TicketListing {
		let base = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
		let created = base + Duration::minutes(id);
		TicketListing {
			ticket: Ticket {
				id: TicketId::new(id),
				author: UserId::new(author),
				title: format!("Printer problem number {id}"),
				description: format!("Printer on floor {id} jams constantly"),
				status,
				ticket_type: if id % 2 == 0 { TicketType::Incident } else { TicketType::Request },
				priority: TicketPriority::Low,
				category: None,
				assigned_team: None,
				assigned_technician: technician.map(UserId::new),
				attachment: None,
				created_at: created,
				updated_at: base + Duration::minutes(200 - id),
			},
			author_username: username(author),
			technician_username: technician.map(username),
		}
	}

	fn fixture() -> Vec<TicketListing> {
		vec![
			listing(1, ALICE, TicketStatus::Open, Some(BOB)),
			listing(2, ALICE, TicketStatus::Closed, None),
			listing(3, BOB, TicketStatus::InProgress, Some(BOB)),
			listing(4, CAROL, TicketStatus::OnHold, Some(DAN)),
			listing(5, CAROL, TicketStatus::Closed, None),
		]
	}

	fn ids(listings: &[TicketListing]) -> Vec<i64> {
		listings.iter().map(|l| l.ticket.id.into_inner()).collect()
	}

	fn principal(id: i64, role: Role) -> Principal {
		Principal::new(UserId::new(id), username(id), role)
	}

	mod status {
		use super::*;

		#[test]
		fn open_excludes_only_closed() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				status: Some(StatusFilter::Open),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&dan, filter).apply(fixture())), vec![1, 3, 4]);
		}

		#[test]
		fn closed_keeps_only_closed() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				status: Some(StatusFilter::Closed),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&dan, filter).apply(fixture())), vec![2, 5]);
		}
	}

	mod ordering {
		use super::*;

		#[test]
		fn default_is_updated_descending() {
			let dan = principal(DAN, Role::Administrator);
			let query = TicketQuery::compose(&dan, TicketFilter::default());
			assert_eq!(query.ordering, TicketOrdering::UpdatedDesc);
			// lower ids were updated later in the fixture
			assert_eq!(ids(&query.apply(fixture())), vec![1, 2, 3, 4, 5]);
		}

		#[test]
		fn created_descending() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				ordering: Some(TicketOrdering::CreatedDesc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&dan, filter).apply(fixture())), vec![5, 4, 3, 2, 1]);
		}

		#[test]
		fn ties_break_on_id_in_same_direction() {
			let mut a = listing(7, ALICE, TicketStatus::Open, None);
			let mut b = listing(8, ALICE, TicketStatus::Open, None);
			b.ticket.updated_at = a.ticket.updated_at;
			a.ticket.created_at = b.ticket.created_at;
			let alice = principal(ALICE, Role::Customer);
			let desc = TicketQuery::compose(&alice, TicketFilter::default());
			assert_eq!(ids(&desc.apply(vec![a.clone(), b.clone()])), vec![8, 7]);
			let asc = TicketQuery::compose(
				&alice,
				TicketFilter {
					ordering: Some(TicketOrdering::UpdatedAsc),
					..Default::default()
				},
			);
			assert_eq!(ids(&asc.apply(vec![b, a])), vec![7, 8]);
		}

		#[test]
		fn wire_names() {
			let ordering: TicketOrdering = serde_json::from_str("\"ascending_created_on\"").unwrap();
			assert_eq!(ordering, TicketOrdering::CreatedAsc);
		}
	}

	mod elevated_clauses {
		use super::*;

		#[test]
		fn customer_clauses_are_silently_ignored() {
			let alice = principal(ALICE, Role::Customer);
			let filter = TicketFilter {
				author: Some("carol".to_string()),
				assignee: Some(AssigneeFilter::Me),
				ticket_type: Some(TicketType::Incident),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			let query = TicketQuery::compose(&alice, filter);
			assert_eq!(query.author_contains, None);
			assert_eq!(query.assigned_to, None);
			assert_eq!(ids(&query.apply(fixture())), vec![1, 2]);
		}

		#[test]
		fn contains_folds_ascii_case_only() {
			assert!(contains_ci("Printer JAM", "jam"));
			assert!(contains_ci("Écran noir", "ÉCRAN"));
			assert!(!contains_ci("Écran noir", "écran"));
		}

		#[test]
		fn author_contains_is_case_insensitive() {
			let bob = principal(BOB, Role::Technician);
			let filter = TicketFilter {
				author: Some("CaR".to_string()),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&bob, filter).apply(fixture())), vec![4, 5]);
		}

		#[test]
		fn technician_contains_skips_unassigned() {
			let bob = principal(BOB, Role::Technician);
			let filter = TicketFilter {
				technician: Some("b".to_string()),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&bob, filter).apply(fixture())), vec![1, 3]);
		}

		#[test]
		fn assignee_me_resolves_to_principal() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				assignee: Some(AssigneeFilter::Me),
				..Default::default()
			};
			let query = TicketQuery::compose(&dan, filter);
			assert_eq!(query.assigned_to, Some(UserId::new(DAN)));
			assert_eq!(ids(&query.apply(fixture())), vec![4]);
		}

		#[test]
		fn assignee_all_is_unconstrained() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				assignee: Some(AssigneeFilter::All),
				..Default::default()
			};
			assert_eq!(TicketQuery::compose(&dan, filter).apply(fixture()).len(), 5);
		}

		#[test]
		fn blank_strings_are_absent() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				title: Some("   ".to_string()),
				..Default::default()
			};
			assert_eq!(TicketQuery::compose(&dan, filter).title_contains, None);
		}

		#[test]
		fn type_and_title_clauses_combine() {
			let dan = principal(DAN, Role::Administrator);
			let filter = TicketFilter {
				title: Some("PRINTER".to_string()),
				ticket_type: Some(TicketType::Incident),
				ordering: Some(TicketOrdering::CreatedAsc),
				..Default::default()
			};
			assert_eq!(ids(&TicketQuery::compose(&dan, filter).apply(fixture())), vec![2, 4]);
		}
	}

	#[test]
	fn administrator_sees_tickets_of_every_author() {
		let dan = principal(DAN, Role::Administrator);
		let result = TicketQuery::compose(&dan, TicketFilter::default()).apply(fixture());
		let authors: Vec<i64> = result.iter().map(|l| l.ticket.author.into_inner()).collect();
		assert!(authors.contains(&ALICE));
		assert!(authors.contains(&BOB));
		assert!(authors.contains(&CAROL));
	}

	fn filter_strategy() -> impl Strategy<Value = TicketFilter> {
		(
			prop::option::of(prop_oneof![Just(StatusFilter::Open), Just(StatusFilter::Closed)]),
			prop::option::of("[a-z]{0,3}"),
			prop::option::of("[a-z]{0,3}"),
			prop::option::of(prop_oneof![Just(TicketType::Request), Just(TicketType::Incident)]),
			prop::option::of(prop_oneof![Just(AssigneeFilter::Me), Just(AssigneeFilter::All)]),
		)
			.prop_map(|(status, author, title, ticket_type, assignee)| TicketFilter {
				status,
				author,
				title,
				ticket_type,
				assignee,
				..Default::default()
			})
	}

	mod query_values {
		use super::*;

		fn parse(json: &str) -> TicketFilter {
			serde_json::from_str(json).unwrap()
		}

		#[test]
		fn well_formed_values_parse() {
			let filter = parse(
				r#"{"status":"closed","priority":"high","team":"3","category":"4","type":"incident","assignee":"me","ordering":"descending_updated_on"}"#,
			);
			assert_eq!(filter.status, Some(StatusFilter::Closed));
			assert_eq!(filter.priority, Some(TicketPriority::High));
			assert_eq!(filter.team, Some(TeamId::new(3)));
			assert_eq!(filter.category, Some(CategoryId::new(4)));
			assert_eq!(filter.ticket_type, Some(TicketType::Incident));
			assert_eq!(filter.assignee, Some(AssigneeFilter::Me));
			assert_eq!(filter.ordering, Some(TicketOrdering::UpdatedDesc));
		}

		#[test]
		fn malformed_values_read_as_absent() {
			let filter = parse(
				r#"{"status":"pending","priority":"urgent","team":"abc","category":"-2","type":"bug","assignee":"someone","ordering":"sideways"}"#,
			);
			assert_eq!(filter, TicketFilter::default());
		}

		#[test]
		fn blank_values_read_as_absent() {
			let filter = parse(r#"{"type":"","priority":"  ","team":""}"#);
			assert_eq!(filter, TicketFilter::default());
			assert!(!filter.has_elevated_clauses());
		}

		#[test]
		fn surrounding_whitespace_is_ignored() {
			let filter = parse(r#"{"priority":" low ","team":" 7 "}"#);
			assert_eq!(filter.priority, Some(TicketPriority::Low));
			assert_eq!(filter.team, Some(TeamId::new(7)));
		}
	}

	proptest! {
		#[test]
		fn filters_never_widen_customer_scope(filter in filter_strategy(), who in 1i64..4) {
			let p = principal(who, Role::Customer);
			let result = TicketQuery::compose(&p, filter).apply(fixture());
			prop_assert!(result.iter().all(|l| l.ticket.author == p.id));
		}

		#[test]
		fn filtered_result_is_subset_of_unfiltered(filter in filter_strategy(), elevated in any::<bool>()) {
			let role = if elevated { Role::Technician } else { Role::Customer };
			let p = principal(BOB, role);
			let all = ids(&TicketQuery::compose(&p, TicketFilter::default()).apply(fixture()));
			let narrowed = ids(&TicketQuery::compose(&p, filter).apply(fixture()));
			prop_assert!(narrowed.iter().all(|id| all.contains(id)));
		}

		#[test]
		fn output_is_deterministic(filter in filter_strategy()) {
			let p = principal(DAN, Role::Administrator);
			let mut reversed = fixture();
			reversed.reverse();
			let a = ids(&TicketQuery::compose(&p, filter.clone()).apply(fixture()));
			let b = ids(&TicketQuery::compose(&p, filter).apply(reversed));
			prop_assert_eq!(a, b);
		}
	}
}
